//! aggregation — calibrations across return horizons and option expiries.
//!
//! - [`aggregate`]: generic skip-and-continue loop over scales.
//! - [`MultiScaleAggregator`]: historical calibration per lag, implied-vol
//!   calibration per expiry, and the single-expiry [`ExpiryReport`].
//! - [`ScaleError`]: wrapper for anything that stops one scale.

pub mod errors;
pub mod multi_scale;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{ScaleError, ScaleResult};
pub use self::multi_scale::{
    CalibrationPoint, DEFAULT_EXPIRY_INDEX, ExpiryReport, MultiScaleAggregator, Scale, aggregate,
};
