//! statistical_tests — normality diagnostics for simulated and observed returns.
//!
//! Purpose
//! -------
//! Collect the normality tests used as the acceptance layer for the GBM
//! simulator together with their shared validation and error handling.
//!
//! Key behaviors
//! -------------
//! - [`SWOutcome::shapiro_wilk`]: Shapiro–Wilk W with Royston's p-value.
//! - [`JBOutcome::jarque_bera`]: skewness/kurtosis test with a χ²(2)
//!   p-value from statrs.
//! - [`is_normal`] / [`is_normal_with`]: boolean decisions at level `alpha`.
//! - [`validate_sample`] / [`validate_alpha`]: guards applied once per call.
//!
//! Invariants & assumptions
//! ------------------------
//! - Routines never panic on user input; all failures are
//!   [`NormalityError`] values.
//! - Samples are treated as i.i.d.; no serial-dependence correction.
//!
//! Downstream usage
//! ----------------
//! - Integration tests assert that `PathEnsemble::step_log_returns` passes
//!   [`is_normal`] in most trials while terminal price levels do not.
//! - Python bindings expose `is_normal` directly.
//!
//! Testing notes
//! -------------
//! - Reference values for both tests are checked against published
//!   examples in the submodules.

pub mod errors;
pub mod jarque_bera;
pub mod normality;
pub mod shapiro_wilk;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{NormalityError, NormalityResult};
pub use self::jarque_bera::JBOutcome;
pub use self::normality::{NormalityTest, is_normal, is_normal_with};
pub use self::shapiro_wilk::SWOutcome;
pub use self::validation::{validate_alpha, validate_sample};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::errors::{NormalityError, NormalityResult};
    pub use super::normality::{NormalityTest, is_normal, is_normal_with};
    pub use super::{JBOutcome, SWOutcome};
}
