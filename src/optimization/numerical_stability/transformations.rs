//! Numerical stability utilities.
//!
//! Safe implementations of the nonlinear transforms used to map positive
//! model parameters (volatility, drift scale) onto an unconstrained
//! optimizer/sampler space. Explicit cutoffs (`x > 20.0`) keep `f64`
//! arithmetic in a well-conditioned regime.
//!
//! # Provided items
//! - [`EIGEN_EPS`]: eigenvalue floor used when inverting curvature matrices.
//! - [`safe_softplus`]: `ln(1 + exp(x))`, ℝ → (0, ∞) without overflow.
//! - [`safe_softplus_inv`]: inverse of softplus on (0, ∞).
//! - [`safe_logistic`]: `1 / (1 + exp(-x))`, the derivative of softplus.
//! - [`log_softplus_jacobian`]: `ln softplus'(x)`, the log-Jacobian term for
//!   densities expressed in softplus coordinates.

/// Eigenvalues at or below this threshold are treated as zero curvature
/// when building pseudo-inverses.
pub const EIGEN_EPS: f64 = 1e-10;

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// For `x > 20`, `softplus(x) ≈ x` to within `f64` precision; otherwise
/// `ln1p(exp(x))` is used.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

/// Stable inverse of softplus on `(0, ∞)`: returns `t = ln(exp(x) - 1)`.
///
/// # Parameters
/// - `x`: finite and `> 0`.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp_m1().ln() }
}

/// Numerically stable logistic function `σ(x) = 1 / (1 + exp(-x))`.
///
/// Evaluated through `exp(-|x|)` so neither tail overflows.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// `ln(d softplus(x) / dx) = ln σ(x) = -softplus(-x)`.
pub fn log_softplus_jacobian(x: f64) -> f64 {
    -safe_softplus(-x)
}
