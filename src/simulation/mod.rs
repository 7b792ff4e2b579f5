//! simulation — Monte Carlo path generation for Geometric Brownian Motion.
//!
//! Purpose
//! -------
//! Generate synthetic price ensembles under GBM for calibration experiments
//! and distributional validation.
//!
//! Key behaviors
//! -------------
//! - [`SimulationConfig`] validates all parameters on construction.
//! - [`simulate`] applies the exact log-normal transition on a uniform grid
//!   and returns an immutable [`PathEnsemble`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Ensemble entries are finite and strictly positive; column 0 equals
//!   the initial price.
//! - Caller-supplied configuration fields are always used as given.
//!
//! Downstream usage
//! ----------------
//! - `returns::log_returns` and `PathEnsemble::step_log_returns` feed the
//!   normality harness in `statistical_tests` and the calibrator in `bayes`.

pub mod config;
pub mod errors;
pub mod gbm;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::config::{MAX_STEPS, SimulationConfig};
pub use self::errors::{SimError, SimResult};
pub use self::gbm::{PathEnsemble, simulate};
