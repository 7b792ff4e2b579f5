//! statistical_tests::errors — error surface for normality tests.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias shared by the Shapiro–Wilk and
//! Jarque–Bera routines and by the `is_normal` acceptance helpers.
//!
//! Conventions
//! -----------
//! - Messages are phrased in terms of domain constraints ("3 ≤ n ≤ 5000",
//!   "0 < alpha < 1").
//! - At the Python boundary every variant becomes a `ValueError` carrying
//!   the `Display` message (see `crate::utils`).
//!
//! Testing notes
//! -------------
//! - Unit tests check that each variant's message embeds its payload.

pub type NormalityResult<T> = Result<T, NormalityError>;

#[derive(Debug, Clone, PartialEq)]
pub enum NormalityError {
    /// Significance level outside `(0, 1)`.
    InvalidAlpha { alpha: f64 },
    /// Fewer observations than the test supports.
    InsufficientData { len: usize, min: usize },
    /// More observations than the test's approximation supports.
    TooManyObservations { len: usize, max: usize },
    /// Non-finite observation.
    InvalidData { index: usize, value: f64 },
    /// All observations identical; the statistic is undefined.
    ZeroRange,
    /// Reference distribution could not be constructed.
    Distribution { reason: String },
}

impl std::error::Error for NormalityError {}

impl std::fmt::Display for NormalityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalityError::InvalidAlpha { alpha } => {
                write!(f, "Invalid significance level {alpha}: must satisfy 0 < alpha < 1")
            }
            NormalityError::InsufficientData { len, min } => {
                write!(f, "Need at least {min} observations, got {len}")
            }
            NormalityError::TooManyObservations { len, max } => {
                write!(f, "At most {max} observations are supported, got {len}")
            }
            NormalityError::InvalidData { index, value } => {
                write!(f, "Invalid data value {value} at index {index}: must be finite")
            }
            NormalityError::ZeroRange => write!(f, "All observations are identical"),
            NormalityError::Distribution { reason } => {
                write!(f, "Reference distribution unavailable: {reason}")
            }
        }
    }
}
