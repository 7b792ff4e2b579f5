//! bayes::laplace — Gaussian approximation at the posterior mode.
//!
//! Purpose
//! -------
//! Turn the Hessian of the log-posterior at the MAP point into a whitening
//! factor `L` with `L Lᵀ ≈ (−H)⁻¹`, so that the sampler can work in
//! coordinates `u` where the posterior is roughly isotropic:
//! `θ = θ* + L u`.
//!
//! Key behaviors
//! -------------
//! - Copies the `ndarray` Hessian into a `nalgebra::DMatrix` and takes the
//!   symmetric eigendecomposition of `−H = Q Λ Qᵀ`.
//! - Eigenvalues `λ ≤ EIGEN_EPS` (flat or non-concave directions) are
//!   replaced by 1 so those directions keep unit scale.
//! - Returns `L = Q Λ^{-1/2}`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The Hessian is square, finite and symmetric (enforced by
//!   `compute_hessian`).
//! - No explicit matrix inverse is formed.
use crate::optimization::{
    errors::OptResult,
    map_search::{finite_diff::compute_hessian, types::Theta},
    numerical_stability::transformations::EIGEN_EPS,
};
use nalgebra::DMatrix;
use ndarray::Array2;

/// laplace_whitening — whitening factor from the curvature at `theta_map`.
///
/// Parameters
/// ----------
/// - `log_post`: fallible log-posterior in unconstrained coordinates.
/// - `theta_map`: the posterior mode (or best available point).
///
/// Returns
/// -------
/// `OptResult<Array2<f64>>`: an `n × n` matrix `L` with `L Lᵀ ≈ (−H)⁻¹`.
///
/// Errors
/// ------
/// - Anything raised by [`compute_hessian`] (failed evaluations, non-finite
///   entries).
pub fn laplace_whitening<F>(log_post: &F, theta_map: &Theta) -> OptResult<Array2<f64>>
where
    F: Fn(&Theta) -> OptResult<f64>,
{
    let hess = compute_hessian(log_post, theta_map)?;
    let mut precision = DMatrix::<f64>::zeros(hess.nrows(), hess.ncols());
    fill_neg_dmatrix(&hess, &mut precision);
    Ok(whitening_from_precision(precision))
}

// ---- Helper methods ----

/// Copy `−H` into a preallocated `DMatrix`, column by column.
fn fill_neg_dmatrix(hess: &Array2<f64>, out: &mut DMatrix<f64>) {
    let n = hess.ncols();
    for j in 0..n {
        for i in 0..n {
            out[(i, j)] = -hess[[i, j]];
        }
    }
}

/// `L = Q Λ^{-1/2}` with truncated eigenvalues.
fn whitening_from_precision(precision: DMatrix<f64>) -> Array2<f64> {
    let n = precision.nrows();
    let eigen = precision.symmetric_eigen();
    let q = eigen.eigenvectors;
    let mut l = Array2::<f64>::zeros((n, n));
    for (k, &lambda) in eigen.eigenvalues.iter().enumerate() {
        let lambda = if lambda > EIGEN_EPS && lambda.is_finite() { lambda } else { 1.0 };
        let scale = lambda.sqrt().recip();
        for i in 0..n {
            l[[i, k]] = q[(i, k)] * scale;
        }
    }
    l
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Recovery of a known covariance from a Gaussian log-density.
    // - Unit scale along directions without positive curvature.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `L Lᵀ` reproduces the covariance of a correlated Gaussian.
    //
    // Given
    // -----
    // - `log p(θ) = −½ θᵀ P θ` with `P = [[4, 1], [1, 2]]`.
    //
    // Expect
    // ------
    // - `L Lᵀ ≈ P⁻¹ = [[2, −1], [−1, 4]] / 7`.
    fn whitening_recovers_gaussian_covariance() {
        // Arrange
        let log_post = |t: &Theta| -> OptResult<f64> {
            Ok(-0.5 * (4.0 * t[0] * t[0] + 2.0 * t[0] * t[1] + 2.0 * t[1] * t[1]))
        };

        // Act
        let l = laplace_whitening(&log_post, &array![0.3, -0.2]).unwrap();
        let cov = l.dot(&l.t());

        // Assert
        assert_abs_diff_eq!(cov[[0, 0]], 2.0 / 7.0, epsilon = 1e-5);
        assert_abs_diff_eq!(cov[[0, 1]], -1.0 / 7.0, epsilon = 1e-5);
        assert_abs_diff_eq!(cov[[1, 1]], 4.0 / 7.0, epsilon = 1e-5);
    }

    #[test]
    fn flat_directions_keep_unit_scale() {
        let log_post = |t: &Theta| -> OptResult<f64> { Ok(-0.5 * 9.0 * t[0] * t[0]) };
        let l = laplace_whitening(&log_post, &array![0.0, 1.0]).unwrap();
        let cov = l.dot(&l.t());
        assert_abs_diff_eq!(cov[[0, 0]], 1.0 / 9.0, epsilon = 1e-5);
        assert_abs_diff_eq!(cov[[1, 1]], 1.0, epsilon = 1e-9);
    }
}
