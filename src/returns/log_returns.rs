//! returns::log_returns — lagged log-return series from a price series.
//!
//! Purpose
//! -------
//! Turn an ordered price series into `r_t = ln(p_t / p_{t−lag})` for
//! `t = lag..len`, the observation vector of the historical calibration
//! model and the data behind per-horizon return distributions.
//!
//! Invariants & assumptions
//! ------------------------
//! - Prices are validated in full before any return is computed.
//! - Overlapping windows are used: consecutive returns at `lag > 1` share
//!   `lag − 1` underlying steps.
//!
//! Conventions
//! -----------
//! - Summary statistics use the sample standard deviation (`n − 1`).
use crate::returns::errors::{ReturnsError, ReturnsResult};
use ndarray::Array1;

/// Lagged log-returns of one price series.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    lag: usize,
    values: Array1<f64>,
}

impl ReturnSeries {
    pub fn lag(&self) -> usize {
        self.lag
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn as_slice(&self) -> &[f64] {
        self.values.as_slice().unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Arithmetic mean of the returns.
    pub fn mean(&self) -> f64 {
        self.values.mean().unwrap_or(f64::NAN)
    }

    /// Sample standard deviation (`n − 1` denominator); `NaN` for a single
    /// return.
    pub fn std(&self) -> f64 {
        if self.values.len() < 2 {
            return f64::NAN;
        }
        self.values.std(1.0)
    }

    pub fn into_inner(self) -> Array1<f64> {
        self.values
    }
}

/// log_returns — compute `ln(p_t / p_{t−lag})` for `t = lag..len`.
///
/// Errors
/// ------
/// - `ReturnsError::InvalidLag` if `lag == 0`.
/// - `ReturnsError::InsufficientData` if `prices.len() <= lag`.
/// - `ReturnsError::NonFinitePrice` / `NonPositivePrice` for the first bad
///   price.
///
/// Examples
/// --------
/// ```
/// use rust_gbm::returns::log_returns;
///
/// let r = log_returns(&[100.0, 105.0, 110.25], 1).unwrap();
/// assert_eq!(r.len(), 2);
/// assert!((r.values()[1] - 1.05_f64.ln()).abs() < 1e-12);
/// ```
pub fn log_returns(prices: &[f64], lag: usize) -> ReturnsResult<ReturnSeries> {
    if lag == 0 {
        return Err(ReturnsError::InvalidLag { lag });
    }
    if prices.len() <= lag {
        return Err(ReturnsError::InsufficientData { len: prices.len(), lag });
    }
    for (index, &value) in prices.iter().enumerate() {
        if !value.is_finite() {
            return Err(ReturnsError::NonFinitePrice { index, value });
        }
        if value <= 0.0 {
            return Err(ReturnsError::NonPositivePrice { index, value });
        }
    }
    let values = Array1::from_iter((lag..prices.len()).map(|t| (prices[t] / prices[t - lag]).ln()));
    Ok(ReturnSeries { lag, values })
}

/// horizon_returns — one [`ReturnSeries`] per lag, in input order.
///
/// Errors
/// ------
/// - The first error raised by [`log_returns`] for any lag.
pub fn horizon_returns(prices: &[f64], lags: &[usize]) -> ReturnsResult<Vec<ReturnSeries>> {
    lags.iter().map(|&lag| log_returns(prices, lag)).collect()
}
