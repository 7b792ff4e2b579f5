//! statistical_tests::validation — shared input guards for test statistics.
//!
//! Purpose
//! -------
//! Centralize the checks every normality routine needs before sorting or
//! computing moments: sample length bounds, finiteness, a non-degenerate
//! range, and the significance level of the accept/reject helpers.
//!
//! Conventions
//! -----------
//! - Checks run in a fixed order: length bounds, finiteness, then range.
//! - Validation never allocates beyond the returned error.
use crate::statistical_tests::errors::{NormalityError, NormalityResult};

/// Validate a sample for a test supporting `min_len ≤ n ≤ max_len`.
///
/// Errors
/// ------
/// - `NormalityError::InsufficientData` when `n < min_len`.
/// - `NormalityError::TooManyObservations` when `n > max_len`.
/// - `NormalityError::InvalidData` for the first non-finite entry.
/// - `NormalityError::ZeroRange` when every entry is identical.
///
/// Examples
/// --------
/// ```rust
/// # use rust_gbm::statistical_tests::validation::validate_sample;
/// # use rust_gbm::statistical_tests::errors::NormalityError;
/// assert!(validate_sample(&[0.1, -0.2, 0.3], 3, 5000).is_ok());
/// match validate_sample(&[1.0, 1.0, 1.0], 3, 5000) {
///     Err(NormalityError::ZeroRange) => (),
///     other => panic!("expected ZeroRange, got {other:?}"),
/// }
/// ```
pub fn validate_sample(data: &[f64], min_len: usize, max_len: usize) -> NormalityResult<()> {
    let len = data.len();
    if len < min_len {
        return Err(NormalityError::InsufficientData { len, min: min_len });
    }
    if len > max_len {
        return Err(NormalityError::TooManyObservations { len, max: max_len });
    }
    for (index, &value) in data.iter().enumerate() {
        if !value.is_finite() {
            return Err(NormalityError::InvalidData { index, value });
        }
    }
    let (lo, hi) = data
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if hi - lo <= 0.0 {
        return Err(NormalityError::ZeroRange);
    }
    Ok(())
}

/// Validate a significance level.
///
/// Errors
/// ------
/// - `NormalityError::InvalidAlpha` unless `0 < alpha < 1`.
pub fn validate_alpha(alpha: f64) -> NormalityResult<()> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(NormalityError::InvalidAlpha { alpha });
    }
    Ok(())
}
