//! bayes — Bayesian calibration of GBM drift, volatility and implied volatility.
//!
//! Purpose
//! -------
//! Infer latent diffusion parameters from data by declaring priors,
//! building a likelihood, delegating to a posterior-sampling engine, and
//! reducing the draws to per-parameter summaries.
//!
//! Key behaviors
//! -------------
//! - [`Calibrator::calibrate`] is the single entry point for both
//!   [`CalibrationMode`]s.
//! - [`PosteriorSampler`] is the engine seam; [`HamiltonianSampler`] is the
//!   built-in engine (MAP start via `optimization::map_search`, Laplace
//!   preconditioning, parallel HMC chains).
//! - [`PosteriorModel`] supplies priors and a constrained log-likelihood;
//!   the unconstrained log-posterior is derived from it.
//!
//! Invariants & assumptions
//! ------------------------
//! - Positive parameters carry HalfNormal priors and are sampled through
//!   softplus.
//! - A non-converged run never yields summaries.
//!
//! Conventions
//! -----------
//! - Annualization uses 252 trading days per year.
//! - Summary standard deviations use the `n − 1` denominator.
//!
//! Downstream usage
//! ----------------
//! - `aggregation` calls [`Calibrator::calibrate`] once per horizon or
//!   expiry.
//! - Python bindings expose historical and implied-vol calibration.

pub mod calibrator;
pub mod diagnostics;
pub mod errors;
pub mod laplace;
pub mod model;
pub mod priors;
pub mod sampler;
pub mod summary;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::calibrator::{CalibrationMode, CalibrationOutcome, Calibrator};
pub use self::errors::{CalibError, CalibResult};
pub use self::model::{
    HistoricalGbmModel, ImpliedVolModel, PosteriorModel, TRADING_DAYS_PER_YEAR,
    historical_default_priors, implied_vol_default_priors,
};
pub use self::priors::{Prior, PriorSpec};
pub use self::sampler::{HamiltonianSampler, PosteriorSampler, SamplerConfig};
pub use self::summary::{PosteriorDraws, PosteriorSummary, SamplerDiagnostics};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::calibrator::{CalibrationMode, CalibrationOutcome, Calibrator};
    pub use super::errors::{CalibError, CalibResult};
    pub use super::priors::{Prior, PriorSpec};
    pub use super::sampler::{HamiltonianSampler, PosteriorSampler, SamplerConfig};
    pub use super::summary::PosteriorSummary;
}
