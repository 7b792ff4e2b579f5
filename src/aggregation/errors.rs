//! aggregation::errors — per-scale failures collected by the aggregator.
//!
//! Every error that can stop a single horizon or expiry is wrapped in
//! [`ScaleError`]. The aggregation loops log and skip these; the
//! single-expiry report returns them to the caller.
use crate::{bayes::errors::CalibError, market::errors::MarketError, returns::errors::ReturnsError};

pub type ScaleResult<T> = Result<T, ScaleError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ScaleError {
    Returns(ReturnsError),
    Market(MarketError),
    Calibration(CalibError),
}

impl std::error::Error for ScaleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScaleError::Returns(e) => Some(e),
            ScaleError::Market(e) => Some(e),
            ScaleError::Calibration(e) => Some(e),
        }
    }
}

impl std::fmt::Display for ScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleError::Returns(e) => write!(f, "Return extraction failed: {e}"),
            ScaleError::Market(e) => write!(f, "Market data unusable: {e}"),
            ScaleError::Calibration(e) => write!(f, "Calibration failed: {e}"),
        }
    }
}

impl From<ReturnsError> for ScaleError {
    fn from(err: ReturnsError) -> Self {
        ScaleError::Returns(err)
    }
}

impl From<MarketError> for ScaleError {
    fn from(err: MarketError) -> Self {
        ScaleError::Market(err)
    }
}

impl From<CalibError> for ScaleError {
    fn from(err: CalibError) -> Self {
        ScaleError::Calibration(err)
    }
}
