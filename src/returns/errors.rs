//! returns::errors — input validation failures for log-return extraction.

/// Result alias for return-extraction operations.
pub type ReturnsResult<T> = Result<T, ReturnsError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ReturnsError {
    /// Lag must be at least one observation.
    InvalidLag { lag: usize },
    /// Series is too short to produce a single return at this lag.
    InsufficientData { len: usize, lag: usize },
    /// Prices must be strictly positive for the logarithm to be defined.
    NonPositivePrice { index: usize, value: f64 },
    /// Prices must be finite.
    NonFinitePrice { index: usize, value: f64 },
}

impl std::error::Error for ReturnsError {}

impl std::fmt::Display for ReturnsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReturnsError::InvalidLag { lag } => write!(f, "Invalid lag {lag}: must be >= 1"),
            ReturnsError::InsufficientData { len, lag } => {
                write!(f, "Insufficient data: {len} prices cannot produce returns at lag {lag}")
            }
            ReturnsError::NonPositivePrice { index, value } => {
                write!(f, "Non-positive price {value} at index {index}")
            }
            ReturnsError::NonFinitePrice { index, value } => {
                write!(f, "Non-finite price {value} at index {index}")
            }
        }
    }
}
