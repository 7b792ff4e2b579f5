//! returns — lagged log-return extraction.
//!
//! Purpose
//! -------
//! Derive log-return series at arbitrary horizons from ordered price
//! series, validating the input and exposing the summary statistics used
//! by calibration starting points.
//!
//! Downstream usage
//! ----------------
//! - `bayes::model::HistoricalGbmModel` consumes a [`ReturnSeries`].
//! - `aggregation::MultiScaleAggregator::across_horizons` calls
//!   [`log_returns`] once per horizon.

pub mod errors;
pub mod log_returns;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{ReturnsError, ReturnsResult};
pub use self::log_returns::{ReturnSeries, horizon_returns, log_returns};
