//! bayes::errors — error surface for Bayesian calibration.
//!
//! Input problems (observations, strikes, priors, sampler settings) are
//! reported before any sampling starts. Anything that goes wrong inside the
//! posterior-sampling engine, including a run that finishes without
//! converging, is collapsed into [`CalibError::InferenceFailure`] carrying
//! the engine's diagnostic text.
use crate::optimization::errors::OptError;

pub type CalibResult<T> = Result<T, CalibError>;

#[derive(Debug, Clone, PartialEq)]
pub enum CalibError {
    // ---- Observations ----
    /// No observations were supplied.
    EmptyObservations,
    /// Observations must be finite.
    NonFiniteObservation { index: usize, value: f64 },
    /// Implied-volatility mode needs exactly one strike per observed price.
    StrikeCountMismatch { prices: usize, strikes: usize },
    /// A model input (spot, strike, maturity, rate, lag) is out of range.
    InvalidModelInput { name: &'static str, value: f64 },

    // ---- Priors ----
    /// Prior names/count do not match the latent parameters of the mode.
    PriorMismatch { expected: Vec<String>, found: Vec<String> },
    /// Prior hyper-parameters must be finite and strictly positive scales.
    InvalidPrior { name: String, reason: &'static str },

    // ---- Sampler ----
    /// `SamplerConfig` field outside its admissible range.
    InvalidSamplerConfig { field: &'static str, reason: &'static str },

    // ---- Engine ----
    /// The posterior engine failed or did not converge.
    InferenceFailure { diagnostic: String },
}

impl std::error::Error for CalibError {}

impl std::fmt::Display for CalibError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Observations ----
            CalibError::EmptyObservations => {
                write!(f, "At least one observation is required for calibration.")
            }
            CalibError::NonFiniteObservation { index, value } => {
                write!(f, "Observation at index {index} is not finite: {value}")
            }
            CalibError::StrikeCountMismatch { prices, strikes } => {
                write!(f, "Got {prices} observed prices but {strikes} strikes.")
            }
            CalibError::InvalidModelInput { name, value } => {
                write!(f, "Invalid model input '{name}': {value}")
            }

            // ---- Priors ----
            CalibError::PriorMismatch { expected, found } => {
                write!(f, "Prior mismatch: expected parameters {expected:?}, found {found:?}")
            }
            CalibError::InvalidPrior { name, reason } => {
                write!(f, "Invalid prior for '{name}': {reason}")
            }

            // ---- Sampler ----
            CalibError::InvalidSamplerConfig { field, reason } => {
                write!(f, "Invalid sampler configuration '{field}': {reason}")
            }

            // ---- Engine ----
            CalibError::InferenceFailure { diagnostic } => {
                write!(f, "Posterior inference failed: {diagnostic}")
            }
        }
    }
}

impl From<anyhow::Error> for CalibError {
    fn from(err: anyhow::Error) -> Self {
        CalibError::InferenceFailure { diagnostic: format!("{err:#}") }
    }
}

impl From<OptError> for CalibError {
    fn from(err: OptError) -> Self {
        CalibError::InferenceFailure { diagnostic: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    // Purpose
    // -------
    // Engine-side errors collapse into `InferenceFailure` with their text.
    //
    // Given
    // -----
    // - An `anyhow` error with context and an optimizer error.
    //
    // Expect
    // ------
    // - Both map to `InferenceFailure`; the anyhow chain is preserved.
    fn engine_errors_become_inference_failure() {
        let err: CalibError = anyhow!("step size collapsed").context("chain 2").into();
        match err {
            CalibError::InferenceFailure { diagnostic } => {
                assert!(diagnostic.contains("chain 2"));
                assert!(diagnostic.contains("step size collapsed"));
            }
            other => panic!("expected InferenceFailure, got {other:?}"),
        }

        let err: CalibError = OptError::MissingThetaHat.into();
        assert!(matches!(err, CalibError::InferenceFailure { .. }));
    }
}
