//! numerical_stability — numerically robust transforms for constrained parameters.
//!
//! Purpose
//! -------
//! Collect the stable scalar transforms used to move strictly positive
//! model parameters (volatilities, drift prior scales) in and out of the
//! unconstrained space the MAP search and sampler operate in, together with
//! the eigenvalue floor shared by curvature inversions.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite `f64`; domain checks live in the calling layer.
//! - These helpers never log, allocate, or touch global state.
//!
//! Downstream usage
//! ----------------
//! - `bayes::priors` maps half-normal parameters through
//!   `safe_softplus` and adds `log_softplus_jacobian` to the density.
//! - `bayes::laplace` uses `EIGEN_EPS` to floor curvature eigenvalues.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    EIGEN_EPS, log_softplus_jacobian, safe_logistic, safe_softplus, safe_softplus_inv,
};

pub mod prelude {
    pub use super::transformations::{EIGEN_EPS, safe_softplus, safe_softplus_inv};
}
