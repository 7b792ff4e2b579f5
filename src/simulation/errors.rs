//! simulation::errors — configuration and numerical failures of the GBM simulator.
//!
//! Every invalid [`SimulationConfig`](super::SimulationConfig) field is
//! reported before any work is done. [`SimError::DegeneratePath`] is the
//! only error raised mid-simulation, when floating-point overflow or
//! underflow would break the ensemble's positivity invariant.

/// Result alias for simulation operations.
pub type SimResult<T> = Result<T, SimError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    // ---- Configuration ----
    /// Initial price must be finite and strictly positive.
    InvalidInitialPrice { value: f64 },
    /// Horizon must be finite and strictly positive.
    InvalidHorizon { value: f64 },
    /// Step size must be finite and strictly positive.
    InvalidStep { value: f64 },
    /// Volatility must be finite and non-negative.
    InvalidVolatility { value: f64 },
    /// Drift must be finite.
    NonFiniteDrift { value: f64 },
    /// `round(T / dt)` must be at least one step.
    ZeroSteps { horizon: f64, step: f64 },
    /// `round(T / dt)` exceeds the supported grid length (or is infinite).
    TooManySteps { horizon: f64, step: f64, max: usize },

    // ---- Numerical ----
    /// A simulated price left `(0, ∞)`.
    DegeneratePath { path: usize, step: usize, value: f64 },
}

impl std::error::Error for SimError {}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::InvalidInitialPrice { value } => {
                write!(f, "Invalid initial price {value}: must be finite and > 0")
            }
            SimError::InvalidHorizon { value } => {
                write!(f, "Invalid horizon {value}: must be finite and > 0")
            }
            SimError::InvalidStep { value } => {
                write!(f, "Invalid step size {value}: must be finite and > 0")
            }
            SimError::InvalidVolatility { value } => {
                write!(f, "Invalid volatility {value}: must be finite and >= 0")
            }
            SimError::NonFiniteDrift { value } => write!(f, "Drift must be finite, got {value}"),
            SimError::ZeroSteps { horizon, step } => {
                write!(f, "Horizon {horizon} with step {step} rounds to zero steps")
            }
            SimError::TooManySteps { horizon, step, max } => {
                write!(f, "Horizon {horizon} with step {step} needs more than {max} steps")
            }
            SimError::DegeneratePath { path, step, value } => {
                write!(
                    f,
                    "Degenerate price {value} on path {path} at step {step}: \
                     prices must stay finite and > 0"
                )
            }
        }
    }
}
