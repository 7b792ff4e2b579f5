//! simulation::config — validated GBM simulation parameters.
//!
//! Purpose
//! -------
//! Hold the six parameters of a Monte Carlo GBM run and guarantee, by
//! construction, that they describe a well-posed simulation.
//!
//! Invariants & assumptions
//! ------------------------
//! - `initial_price > 0`, `horizon > 0`, `step > 0`, `volatility ≥ 0`,
//!   every field finite, and `1 ≤ round(horizon / step) ≤ MAX_STEPS`.
//! - Fields are private; the only ways in are [`SimulationConfig::new`]
//!   and [`Default`], so the simulator never re-validates.
//!
//! Conventions
//! -----------
//! - Time is measured in years; `drift` and `volatility` are annualized.
//! - `path_count = 0` is legal and yields an empty ensemble.
use crate::simulation::errors::{SimError, SimResult};

/// Longest supported time grid, in steps.
pub const MAX_STEPS: usize = 1 << 24;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    initial_price: f64,
    drift: f64,
    volatility: f64,
    horizon: f64,
    step: f64,
    path_count: usize,
}

impl SimulationConfig {
    /// Construct a validated configuration.
    ///
    /// Parameters
    /// ----------
    /// - `initial_price`: `S₀`, finite and `> 0`.
    /// - `drift`: `μ`, finite.
    /// - `volatility`: `σ`, finite and `≥ 0`.
    /// - `horizon`: `T`, finite and `> 0`.
    /// - `step`: `dt`, finite and `> 0`.
    /// - `path_count`: `M`, number of simulated paths.
    ///
    /// Errors
    /// ------
    /// - The [`SimError`] variant naming the first invalid field, checked
    ///   in the order above, then [`SimError::ZeroSteps`] and
    ///   [`SimError::TooManySteps`].
    pub fn new(
        initial_price: f64, drift: f64, volatility: f64, horizon: f64, step: f64,
        path_count: usize,
    ) -> SimResult<Self> {
        if !initial_price.is_finite() || initial_price <= 0.0 {
            return Err(SimError::InvalidInitialPrice { value: initial_price });
        }
        if !drift.is_finite() {
            return Err(SimError::NonFiniteDrift { value: drift });
        }
        if !volatility.is_finite() || volatility < 0.0 {
            return Err(SimError::InvalidVolatility { value: volatility });
        }
        if !horizon.is_finite() || horizon <= 0.0 {
            return Err(SimError::InvalidHorizon { value: horizon });
        }
        if !step.is_finite() || step <= 0.0 {
            return Err(SimError::InvalidStep { value: step });
        }
        let steps = (horizon / step).round();
        if steps < 1.0 {
            return Err(SimError::ZeroSteps { horizon, step });
        }
        if !steps.is_finite() || steps > MAX_STEPS as f64 {
            return Err(SimError::TooManySteps { horizon, step, max: MAX_STEPS });
        }
        Ok(Self { initial_price, drift, volatility, horizon, step, path_count })
    }

    /// Number of time steps `N = round(T / dt)`.
    pub fn n_steps(&self) -> usize {
        (self.horizon / self.step).round() as usize
    }

    pub fn initial_price(&self) -> f64 {
        self.initial_price
    }

    pub fn drift(&self) -> f64 {
        self.drift
    }

    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn path_count(&self) -> usize {
        self.path_count
    }
}

/// `S₀ = 100`, `μ = 0.05`, `σ = 0.2`, `T = 1`, `dt = 0.01`, `M = 1000`.
impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_price: 100.0,
            drift: 0.05,
            volatility: 0.2,
            horizon: 1.0,
            step: 0.01,
            path_count: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Rejection of each invalid field with its dedicated variant.
    // - Step-count rounding, including the zero-step edge case.
    // - The documented default configuration.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Each invalid field maps to its own error variant.
    //
    // Given
    // -----
    // - Configurations each breaking exactly one constraint.
    //
    // Expect
    // ------
    // - The matching `SimError` variant for each.
    fn new_rejects_each_invalid_field() {
        match SimulationConfig::new(0.0, 0.05, 0.2, 1.0, 0.01, 10) {
            Err(SimError::InvalidInitialPrice { .. }) => (),
            other => panic!("Expected InvalidInitialPrice, got {other:?}"),
        }
        match SimulationConfig::new(100.0, f64::NAN, 0.2, 1.0, 0.01, 10) {
            Err(SimError::NonFiniteDrift { .. }) => (),
            other => panic!("Expected NonFiniteDrift, got {other:?}"),
        }
        match SimulationConfig::new(100.0, 0.05, -0.1, 1.0, 0.01, 10) {
            Err(SimError::InvalidVolatility { .. }) => (),
            other => panic!("Expected InvalidVolatility, got {other:?}"),
        }
        match SimulationConfig::new(100.0, 0.05, 0.2, 0.0, 0.01, 10) {
            Err(SimError::InvalidHorizon { .. }) => (),
            other => panic!("Expected InvalidHorizon, got {other:?}"),
        }
        match SimulationConfig::new(100.0, 0.05, 0.2, 1.0, -0.01, 10) {
            Err(SimError::InvalidStep { .. }) => (),
            other => panic!("Expected InvalidStep, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // A step larger than twice the horizon rounds to zero steps.
    //
    // Given
    // -----
    // - `T = 1`, `dt = 3`.
    //
    // Expect
    // ------
    // - `SimError::ZeroSteps`.
    fn new_rejects_zero_step_grid() {
        match SimulationConfig::new(100.0, 0.05, 0.2, 1.0, 3.0, 10) {
            Err(SimError::ZeroSteps { .. }) => (),
            other => panic!("Expected ZeroSteps, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Grids too long to index (or with an infinite step ratio) are rejected
    // before any cast to `usize`.
    //
    // Given
    // -----
    // - `T = 1e300`, `dt = 1e-300` (ratio overflows to infinity), `M = 0`.
    // - `T = 1`, `dt = 1e-9` (finite ratio above `MAX_STEPS`).
    // - `T = MAX_STEPS`, `dt = 1` (exactly at the limit).
    //
    // Expect
    // ------
    // - `SimError::TooManySteps` for the first two; the last is accepted.
    fn new_rejects_oversized_grid() {
        for (horizon, step) in [(1e300, 1e-300), (1.0, 1e-9)] {
            match SimulationConfig::new(100.0, 0.0, 0.2, horizon, step, 0) {
                Err(SimError::TooManySteps { max: MAX_STEPS, .. }) => (),
                other => panic!("Expected TooManySteps, got {other:?}"),
            }
        }
        let at_limit = SimulationConfig::new(100.0, 0.0, 0.2, MAX_STEPS as f64, 1.0, 0).unwrap();
        assert_eq!(at_limit.n_steps(), MAX_STEPS);
    }

    #[test]
    fn n_steps_rounds_to_nearest() {
        let cfg = SimulationConfig::new(100.0, 0.0, 0.2, 1.0, 0.3, 5).unwrap();
        assert_eq!(cfg.n_steps(), 3);
        assert_eq!(SimulationConfig::default().n_steps(), 100);
    }

    #[test]
    fn zero_volatility_and_zero_paths_are_valid() {
        let cfg = SimulationConfig::new(50.0, 0.1, 0.0, 2.0, 0.5, 0).unwrap();
        assert_eq!(cfg.path_count(), 0);
        assert_eq!(cfg.n_steps(), 4);
    }
}
