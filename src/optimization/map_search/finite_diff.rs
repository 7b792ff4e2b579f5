//! map_search::finite_diff — finite-difference gradient and Hessian helpers.
//!
//! Purpose
//! -------
//! Provide finite-difference derivatives of fallible scalar objectives so
//! the MAP search, the Laplace preconditioner and the Hamiltonian sampler
//! can all work with models that only expose a log-density value.
//!
//! Key behaviors
//! -------------
//! - [`fd_gradient`]: central differences first, forward differences as a
//!   fallback, with error capture around the `finitediff` closures.
//! - [`run_fd_diff`]: the forward-difference fallback on its own.
//! - [`compute_hessian`]: second-order central differences of the value
//!   with a relative step of `ε^{1/4}`, validated and symmetrized.
//!
//! Invariants & assumptions
//! ------------------------
//! - `finitediff` closures must return `f64`, so the first error raised by
//!   the objective is parked in a `RefCell` and `NaN` is returned; the
//!   captured error is surfaced after differencing.
//! - Returned gradients satisfy [`validate_grad`]; returned Hessians
//!   satisfy [`validate_hessian`] and are exactly symmetric.
//!
//! Testing notes
//! -------------
//! - Unit tests check quadratic objectives with known derivatives, error
//!   propagation from the closure, and the forward fallback.
use crate::optimization::{
    errors::{OptError, OptResult},
    map_search::{
        types::{Grad, Hessian, Theta},
        validation::{validate_grad, validate_hessian},
    },
};
use finitediff::FiniteDiff;
use ndarray::Array2;
use std::cell::RefCell;

/// Relative step for the value-based Hessian (`≈ ε^{1/4}`).
const HESSIAN_STEP: f64 = 1.220_703_125e-4;

/// fd_gradient — finite-difference gradient of a fallible objective.
///
/// Parameters
/// ----------
/// - `func`: objective `θ ↦ OptResult<f64>`.
/// - `theta`: evaluation point.
///
/// Returns
/// -------
/// `OptResult<Grad>` of length `theta.len()` with finite entries.
///
/// Errors
/// ------
/// - The first error raised by `func` during the forward-difference pass.
/// - `OptError::InvalidGradient` when neither scheme yields a finite
///   gradient.
///
/// Notes
/// -----
/// - A failed evaluation during the central pass (e.g. a step crossing a
///   domain boundary) triggers the forward pass rather than an error.
pub fn fd_gradient<F>(func: &F, theta: &Theta) -> OptResult<Grad>
where
    F: Fn(&Theta) -> OptResult<f64>,
{
    let closure_err: RefCell<Option<OptError>> = RefCell::new(None);
    let scalar = |x: &Theta| -> f64 {
        match func(x) {
            Ok(v) => v,
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                f64::NAN
            }
        }
    };
    let central = theta.central_diff(&scalar);
    if closure_err.borrow().is_none() && validate_grad(&central, theta.len()).is_ok() {
        return Ok(central);
    }
    run_fd_diff(theta, &scalar, &closure_err)
}

/// run_fd_diff — forward-difference gradient with error capture and validation.
///
/// `closure_err` is cleared on entry; any error written into it by `func`
/// during differencing is returned instead of the gradient.
///
/// # Errors
/// - The captured closure error, if any.
/// - [`OptError::GradientDimMismatch`] / [`OptError::InvalidGradient`] from
///   [`validate_grad`].
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<OptError>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

/// compute_hessian — central second differences of a fallible objective.
///
/// Purpose
/// -------
/// Approximate `∇² f(θ)` from function values only. Diagonal entries use
/// `(f(θ+hᵢ) − 2f(θ) + f(θ−hᵢ)) / hᵢ²`; off-diagonal entries use the
/// four-point stencil. Steps are `hᵢ = HESSIAN_STEP · max(1, |θᵢ|)`.
///
/// Returns
/// -------
/// `OptResult<Hessian>`: a validated, symmetrized `n × n` matrix.
///
/// Errors
/// ------
/// - Any error raised by `func`.
/// - `OptError::InvalidHessian` if an entry is non-finite.
///
/// Notes
/// -----
/// - Costs `1 + 2n + 4·n(n−1)/2` evaluations; intended for the small
///   parameter vectors of the calibration models.
pub fn compute_hessian<F>(func: &F, theta: &Theta) -> OptResult<Hessian>
where
    F: Fn(&Theta) -> OptResult<f64>,
{
    let dim = theta.len();
    let steps: Vec<f64> = theta.iter().map(|t| HESSIAN_STEP * t.abs().max(1.0)).collect();
    let f0 = func(theta)?;
    let shifted = |moves: &[(usize, f64)]| -> OptResult<f64> {
        let mut x = theta.clone();
        for &(idx, delta) in moves {
            x[idx] += delta;
        }
        func(&x)
    };

    let mut hess: Hessian = Array2::zeros((dim, dim));
    for i in 0..dim {
        let hi = steps[i];
        let fp = shifted(&[(i, hi)])?;
        let fm = shifted(&[(i, -hi)])?;
        hess[[i, i]] = (fp - 2.0 * f0 + fm) / (hi * hi);
        for j in 0..i {
            let hj = steps[j];
            let fpp = shifted(&[(i, hi), (j, hj)])?;
            let fpm = shifted(&[(i, hi), (j, -hj)])?;
            let fmp = shifted(&[(i, -hi), (j, hj)])?;
            let fmm = shifted(&[(i, -hi), (j, -hj)])?;
            hess[[i, j]] = (fpp - fpm - fmp + fmm) / (4.0 * hi * hj);
        }
    }
    validate_hessian(&hess, dim)?;
    symmetrize_hess(&mut hess);
    Ok(hess)
}

// ---- Helper methods ----

/// Mirror the strict lower triangle onto the upper triangle.
fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            hess[[j, i]] = hess[[i, j]];
        }
    }
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
    // - Central gradients on smooth objectives and the forward fallback.
    // - Error propagation out of the finite-difference closures.
    // - Value-based Hessians on quadratics with known curvature.
    //
    // They intentionally DO NOT cover:
    // - End-to-end MAP search (see `api`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify `fd_gradient` recovers the analytic gradient of a quadratic.
    //
    // Given
    // -----
    // - `f(θ) = -(θ₀² + 3θ₁²)` at `θ = (1, -2)`.
    //
    // Expect
    // ------
    // - Gradient ≈ `(-2, 12)`.
    fn fd_gradient_matches_quadratic() {
        // Arrange
        let f = |x: &Theta| -> OptResult<f64> { Ok(-(x[0] * x[0] + 3.0 * x[1] * x[1])) };
        let theta = array![1.0, -2.0];

        // Act
        let g = fd_gradient(&f, &theta).unwrap();

        // Assert
        assert_abs_diff_eq!(g[0], -2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(g[1], 12.0, epsilon = 1e-5);
    }

    #[test]
    // Purpose
    // -------
    // An objective that fails everywhere surfaces its own error.
    //
    // Given
    // -----
    // - A closure always returning `OptError::NonFiniteCost`.
    //
    // Expect
    // ------
    // - `fd_gradient` returns that same error.
    fn fd_gradient_propagates_objective_error() {
        let f = |_: &Theta| -> OptResult<f64> { Err(OptError::NonFiniteCost { value: 1.0 }) };
        let theta = array![0.0];
        match fd_gradient(&f, &theta) {
            Err(OptError::NonFiniteCost { .. }) => (),
            other => panic!("Expected NonFiniteCost, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // A domain boundary just below θ breaks the central stencil only, so
    // the forward fallback must kick in.
    //
    // Given
    // -----
    // - `f(x) = ln(x)` defined for `x ≥ 1`, evaluated at `x = 1`.
    //
    // Expect
    // ------
    // - Gradient ≈ 1 from the forward pass.
    fn fd_gradient_falls_back_to_forward_differences() {
        let f = |x: &Theta| -> OptResult<f64> {
            if x[0] < 1.0 { Err(OptError::NonFiniteCost { value: f64::NAN }) } else { Ok(x[0].ln()) }
        };
        let g = fd_gradient(&f, &array![1.0]).unwrap();
        assert_abs_diff_eq!(g[0], 1.0, epsilon = 1e-4);
    }

    #[test]
    // Purpose
    // -------
    // Verify the value-based Hessian on a coupled quadratic.
    //
    // Given
    // -----
    // - `f(θ) = -(2θ₀² + θ₀θ₁ + 0.5θ₁²)`; Hessian `[[-4, -1], [-1, -1]]`.
    //
    // Expect
    // ------
    // - Entries within 1e-4 and exact symmetry.
    fn compute_hessian_matches_coupled_quadratic() {
        // Arrange
        let f = |x: &Theta| -> OptResult<f64> {
            Ok(-(2.0 * x[0] * x[0] + x[0] * x[1] + 0.5 * x[1] * x[1]))
        };
        let theta = array![0.3, -0.7];

        // Act
        let h = compute_hessian(&f, &theta).unwrap();

        // Assert
        assert_abs_diff_eq!(h[[0, 0]], -4.0, epsilon = 1e-4);
        assert_abs_diff_eq!(h[[1, 1]], -1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(h[[0, 1]], -1.0, epsilon = 1e-4);
        assert_eq!(h[[0, 1]], h[[1, 0]]);
    }

    #[test]
    fn compute_hessian_rejects_non_finite_curvature() {
        let f = |x: &Theta| -> OptResult<f64> { Ok(if x[0] > 0.0 { f64::INFINITY } else { 0.0 }) };
        match compute_hessian(&f, &array![0.0]) {
            Err(OptError::InvalidHessian { row: 0, col: 0, .. }) => (),
            other => panic!("Expected InvalidHessian, got {other:?}"),
        }
    }
}
