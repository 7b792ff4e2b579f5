//! optimization — posterior-mode search, numerical helpers, unified errors.
//!
//! Purpose
//! -------
//! Provide the deterministic numerical layer underneath the Bayesian
//! calibrator: an Argmin-backed L-BFGS search for the posterior mode,
//! finite-difference derivatives, stable positive-parameter transforms,
//! and a single error/result surface.
//!
//! Key behaviors
//! -------------
//! - `map_search`: maximize a log-density `log p(θ)` by minimizing
//!   `c(θ) = -log p(θ)` with configurable line search and tolerances.
//! - `numerical_stability`: softplus/logistic transforms and the shared
//!   eigenvalue floor.
//! - `errors`: every configuration, numerical and backend failure becomes
//!   an [`errors::OptError`] with result alias [`errors::OptResult`].
//!
//! Conventions
//! -----------
//! - Parameters, gradients and Hessians are `ndarray` aliases (`Theta`,
//!   `Grad`, `Hessian`).
//! - Public entrypoints that can fail return `OptResult<T>`; raw Argmin
//!   errors never leak out.
//! - This layer does not log except behind the `obs_slog` feature; the
//!   Bayesian layer above it reports fallbacks.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; end-to-end behavior is
//!   exercised by the calibration tests in `bayes` and `tests/`.

pub mod errors;
pub mod map_search;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_gbm::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::map_search::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
