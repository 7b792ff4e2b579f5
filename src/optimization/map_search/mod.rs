//! map_search — argmin-powered posterior-mode search.
//!
//! Purpose
//! -------
//! Locate the maximum a-posteriori point of an (unnormalized) log-density
//! over an unconstrained parameter vector. The Bayesian layer uses the
//! mode as the starting point and preconditioning centre for its
//! Hamiltonian sampler; callers implement [`LogDensity`] and invoke
//! [`maximize`].
//!
//! Key behaviors
//! -------------
//! - Convert `log p(θ)` into an Argmin cost `c(θ) = -log p(θ)` via
//!   [`adapter::ArgMinAdapter`].
//! - Select an L-BFGS solver in [`builders`] from [`LineSearcher`] and run
//!   it with [`run::run_lbfgs`], normalizing results into [`OptimOutcome`].
//! - Provide finite-difference gradients and Hessians in [`finite_diff`]
//!   for densities that only expose values.
//!
//! Invariants & assumptions
//! ------------------------
//! - Objectives treat invalid inputs as recoverable [`OptError`](crate::optimization::errors::OptError)
//!   values, not panics.
//! - Configuration types ([`Tolerances`], [`MapOptions`]) are validated on
//!   construction.
//!
//! Conventions
//! -----------
//! - Parameters live in unconstrained space; constrained-to-unconstrained
//!   mappings (softplus for positive parameters) happen in the model layer.
//! - [`OptimOutcome::value`] is a log-density, never a cost.
//!
//! Downstream usage
//! ----------------
//! - `bayes::sampler` runs [`maximize`] for the mode, then
//!   [`finite_diff::compute_hessian`] for the Laplace preconditioner and
//!   [`finite_diff::fd_gradient`] inside leapfrog steps.
//!
//! Testing notes
//! -------------
//! - Unit tests in each submodule cover sign conventions, solver wiring,
//!   finite-difference accuracy and validation failures.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::finite_diff::{compute_hessian, fd_gradient};
pub use self::traits::{LineSearcher, LogDensity, MapOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Hessian, Theta};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogDensity, MapOptions, OptimOutcome, Tolerances};
    pub use super::types::{Grad, Theta};
}
