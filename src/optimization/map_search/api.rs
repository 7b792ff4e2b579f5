//! High-level entry point for maximizing a [`LogDensity`].
//!
//! Selects an L-BFGS solver with either Hager–Zhang or More–Thuente line
//! search, wraps the model in an [`ArgMinAdapter`] (which *minimizes*
//! `-log p(θ)`), and delegates the run to [`run_lbfgs`].
use crate::optimization::{
    errors::OptResult,
    map_search::{
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogDensity, MapOptions, OptimOutcome},
        types::Theta,
        validation::validate_theta0,
    },
};

/// Maximize a log-density `log p(θ)` using L-BFGS.
///
/// # Behavior
/// - Validates `theta0` against `f.dim()` and runs `f.check(theta0, data)`.
/// - Builds the solver named by `opts.line_searcher` and runs it.
///
/// # Errors
/// - [`OptError::DimensionMismatch`](crate::optimization::errors::OptError::DimensionMismatch) /
///   [`OptError::InvalidStartingPoint`](crate::optimization::errors::OptError::InvalidStartingPoint)
///   for a bad starting point.
/// - Anything returned by `f.check`, the builders, or the run itself.
///
/// # Example
/// ```
/// use ndarray::array;
/// use rust_gbm::optimization::errors::OptResult;
/// use rust_gbm::optimization::map_search::{maximize, LogDensity, MapOptions, Theta};
///
/// struct Bowl;
/// impl LogDensity for Bowl {
///     type Data = ();
///     fn dim(&self) -> usize { 2 }
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-(theta[0] - 1.0).powi(2) - (theta[1] + 2.0).powi(2))
///     }
/// }
///
/// let out = maximize(&Bowl, array![0.0, 0.0], &(), &MapOptions::default()).unwrap();
/// assert!((out.theta_hat[0] - 1.0).abs() < 1e-4);
/// ```
pub fn maximize<F: LogDensity>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MapOptions,
) -> OptResult<OptimOutcome> {
    validate_theta0(&theta0, f.dim())?;
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError,
        map_search::traits::Tolerances,
    };
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - End-to-end maximization of a concave log-density with both line
    //   searches and the finite-difference gradient path.
    // - Starting-point validation before any solver work.
    // -------------------------------------------------------------------------

    /// Independent normal log-density with means (0.5, -1.5) and scales (1, 0.1).
    struct Anisotropic;

    impl LogDensity for Anisotropic {
        type Data = ();

        fn dim(&self) -> usize {
            2
        }

        fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
            let a = theta[0] - 0.5;
            let b = (theta[1] + 1.5) / 0.1;
            Ok(-0.5 * (a * a + b * b))
        }
    }

    #[test]
    // Purpose
    // -------
    // Both line searches reach the mode of an anisotropic Gaussian using
    // finite-difference gradients only.
    //
    // Given
    // -----
    // - `Anisotropic` starting from the origin.
    //
    // Expect
    // ------
    // - `theta_hat ≈ (0.5, -1.5)` and `value ≈ 0`.
    fn maximize_reaches_mode_with_both_line_searches() {
        for ls in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
            // Arrange
            let tols = Tolerances::new(Some(1e-8), None, Some(500)).unwrap();
            let opts = MapOptions::new(tols, ls, false, None).unwrap();

            // Act
            let out = maximize(&Anisotropic, array![0.0, 0.0], &(), &opts).unwrap();

            // Assert
            assert_abs_diff_eq!(out.theta_hat[0], 0.5, epsilon = 1e-4);
            assert_abs_diff_eq!(out.theta_hat[1], -1.5, epsilon = 1e-4);
            assert_abs_diff_eq!(out.value, 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    // Purpose
    // -------
    // Invalid starting points fail before the solver is built.
    //
    // Given
    // -----
    // - A length-1 θ₀ for a 2-dimensional density.
    //
    // Expect
    // ------
    // - `OptError::DimensionMismatch`.
    fn maximize_rejects_wrong_length_start() {
        match maximize(&Anisotropic, array![0.0], &(), &MapOptions::default()) {
            Err(OptError::DimensionMismatch { expected: 2, actual: 1 }) => (),
            other => panic!("Expected DimensionMismatch, got {other:?}"),
        }
    }
}
