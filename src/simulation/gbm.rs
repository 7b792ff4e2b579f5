//! simulation::gbm — exact-transition Monte Carlo for Geometric Brownian Motion.
//!
//! Purpose
//! -------
//! Produce an ensemble of `M` GBM price paths on the grid
//! `t_j = j·dt, j = 0..=N`, using the exact log-normal transition
//! `S[j] = S[j−1]·exp((μ − ½σ²)·dt + σ·√dt·Z)`.
//!
//! Key behaviors
//! -------------
//! - Normals are drawn step-major: all `M` shocks for step 1, then all for
//!   step 2, and so on. Seeded runs are bit-for-bit reproducible.
//! - Every new price is checked; overflow/underflow surfaces as
//!   [`SimError::DegeneratePath`] instead of a silently invalid ensemble.
//! - The returned [`PathEnsemble`] is read-only.
//!
//! Invariants & assumptions
//! ------------------------
//! - `config` is already validated (see [`SimulationConfig::new`]).
//! - Column 0 of the ensemble equals `initial_price` on every row.
//!
//! Testing notes
//! -------------
//! - Unit tests cover shape, seeding, the zero-volatility closed form and
//!   the empty ensemble. Distributional checks live in `tests/`.
use crate::simulation::{
    config::SimulationConfig,
    errors::{SimError, SimResult},
};
use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, StandardNormal};

/// Dense `(M, N+1)` matrix of simulated prices plus its time grid.
#[derive(Debug, Clone, PartialEq)]
pub struct PathEnsemble {
    prices: Array2<f64>,
    step: f64,
}

impl PathEnsemble {
    /// Read-only view of the `(M, N+1)` price matrix.
    pub fn prices(&self) -> ArrayView2<'_, f64> {
        self.prices.view()
    }

    /// Take ownership of the underlying price matrix.
    pub fn into_inner(self) -> Array2<f64> {
        self.prices
    }

    pub fn n_paths(&self) -> usize {
        self.prices.nrows()
    }

    /// Number of time steps `N` (one less than the number of columns).
    pub fn n_steps(&self) -> usize {
        self.prices.ncols() - 1
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Time grid `t_j = j·dt` for `j = 0..=N`.
    pub fn time_grid(&self) -> Array1<f64> {
        Array1::from_iter((0..self.prices.ncols()).map(|j| j as f64 * self.step))
    }

    /// Prices at `t_N`, one per path.
    pub fn terminal_prices(&self) -> Array1<f64> {
        self.prices.column(self.n_steps()).to_owned()
    }

    /// All one-step log-returns `ln(S[j] / S[j−1])`, flattened row-major
    /// (path 0's `N` returns first).
    pub fn step_log_returns(&self) -> Array1<f64> {
        let n = self.n_steps();
        let mut out = Vec::with_capacity(self.n_paths() * n);
        for row in self.prices.axis_iter(Axis(0)) {
            out.extend(row.iter().zip(row.iter().skip(1)).map(|(prev, next)| (next / prev).ln()));
        }
        Array1::from(out)
    }
}

/// simulate — run the GBM Monte Carlo described by `config`.
///
/// Parameters
/// ----------
/// - `config`: validated simulation parameters.
/// - `seed`: `Some(s)` seeds a `StdRng` for reproducible output; `None`
///   draws the seed from OS entropy.
///
/// Returns
/// -------
/// `SimResult<PathEnsemble>` of shape `(M, N+1)`. `M = 0` yields an empty
/// `(0, N+1)` ensemble.
///
/// Errors
/// ------
/// - `SimError::DegeneratePath` if any price becomes non-finite or
///   non-positive (e.g. extreme `σ²·T` overflowing `exp`).
///
/// Examples
/// --------
/// ```
/// use rust_gbm::simulation::{simulate, SimulationConfig};
///
/// let cfg = SimulationConfig::new(100.0, 0.05, 0.2, 1.0, 0.01, 8).unwrap();
/// let paths = simulate(&cfg, Some(42)).unwrap();
/// assert_eq!(paths.prices().dim(), (8, 101));
/// ```
pub fn simulate(config: &SimulationConfig, seed: Option<u64>) -> SimResult<PathEnsemble> {
    let n_paths = config.path_count();
    let n_steps = config.n_steps();
    let dt = config.step();
    let sigma = config.volatility();
    let drift_term = (config.drift() - 0.5 * sigma * sigma) * dt;
    let diffusion_term = sigma * dt.sqrt();

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let mut prices = Array2::from_elem((n_paths, n_steps + 1), config.initial_price());
    for j in 1..=n_steps {
        for path in 0..n_paths {
            let z: f64 = StandardNormal.sample(&mut rng);
            let next = prices[[path, j - 1]] * (drift_term + diffusion_term * z).exp();
            if !next.is_finite() || next <= 0.0 {
                return Err(SimError::DegeneratePath { path, step: j, value: next });
            }
            prices[[path, j]] = next;
        }
    }
    Ok(PathEnsemble { prices, step: dt })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Ensemble shape, initial column and positivity.
    // - Determinism under a fixed seed and divergence across seeds.
    // - The σ = 0 closed form `S₀·exp(μ t)`.
    // - Empty ensembles and the degenerate-path guard.
    //
    // They intentionally DO NOT cover:
    // - Distributional properties (see `tests/integration_gbm_pipeline.rs`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify shape and the column-0 / positivity invariants.
    //
    // Given
    // -----
    // - `S₀ = 50`, `M = 7`, `T = 0.5`, `dt = 0.05`.
    //
    // Expect
    // ------
    // - Shape `(7, 11)`, column 0 all 50, every entry finite and > 0.
    fn simulate_produces_valid_ensemble() {
        // Arrange
        let cfg = SimulationConfig::new(50.0, 0.1, 0.3, 0.5, 0.05, 7).unwrap();

        // Act
        let paths = simulate(&cfg, Some(7)).unwrap();

        // Assert
        assert_eq!(paths.prices().dim(), (7, 11));
        assert!(paths.prices().column(0).iter().all(|&p| p == 50.0));
        assert!(paths.prices().iter().all(|&p| p.is_finite() && p > 0.0));
        assert_eq!(paths.n_steps(), 10);
        assert_relative_eq!(paths.time_grid()[10], 0.5, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Same config and seed reproduce the ensemble exactly.
    //
    // Given
    // -----
    // - The default configuration run twice with seed 2024 and once with 2025.
    //
    // Expect
    // ------
    // - The first two ensembles are identical; the third differs.
    fn simulate_is_deterministic_under_seed() {
        let cfg = SimulationConfig::default();
        let a = simulate(&cfg, Some(2024)).unwrap();
        let b = simulate(&cfg, Some(2024)).unwrap();
        let c = simulate(&cfg, Some(2025)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    // Purpose
    // -------
    // With zero volatility every path follows `S₀·exp(μ t)`.
    //
    // Given
    // -----
    // - `σ = 0`, `μ = 0.08`, `T = 1`, `dt = 0.25`.
    //
    // Expect
    // ------
    // - Every terminal price ≈ `100·e^{0.08}`.
    fn simulate_zero_volatility_matches_closed_form() {
        let cfg = SimulationConfig::new(100.0, 0.08, 0.0, 1.0, 0.25, 3).unwrap();
        let paths = simulate(&cfg, None).unwrap();
        for &p in paths.terminal_prices().iter() {
            assert_relative_eq!(p, 100.0 * 0.08_f64.exp(), max_relative = 1e-12);
        }
    }

    #[test]
    fn simulate_zero_paths_returns_empty_ensemble() {
        let cfg = SimulationConfig::new(100.0, 0.05, 0.2, 1.0, 0.1, 0).unwrap();
        let paths = simulate(&cfg, Some(1)).unwrap();
        assert_eq!(paths.prices().dim(), (0, 11));
        assert!(paths.step_log_returns().is_empty());
    }

    #[test]
    // Purpose
    // -------
    // Overflow of the exponential is reported instead of producing `+∞`.
    //
    // Given
    // -----
    // - `μ = 1e6` over one unit step.
    //
    // Expect
    // ------
    // - `SimError::DegeneratePath` on path 0, step 1.
    fn simulate_reports_degenerate_path() {
        let cfg = SimulationConfig::new(100.0, 1e6, 0.0, 1.0, 1.0, 2).unwrap();
        match simulate(&cfg, Some(3)) {
            Err(SimError::DegeneratePath { path: 0, step: 1, .. }) => (),
            other => panic!("Expected DegeneratePath, got {other:?}"),
        }
    }

    #[test]
    fn step_log_returns_are_row_major() {
        let cfg = SimulationConfig::new(100.0, 0.05, 0.2, 1.0, 0.5, 2).unwrap();
        let paths = simulate(&cfg, Some(11)).unwrap();
        let prices = paths.prices();
        let r = paths.step_log_returns();
        assert_eq!(r.len(), 4);
        assert_relative_eq!(r[1], (prices[[0, 2]] / prices[[0, 1]]).ln(), epsilon = 1e-15);
        assert_relative_eq!(r[2], (prices[[1, 1]] / prices[[1, 0]]).ln(), epsilon = 1e-15);
    }
}
