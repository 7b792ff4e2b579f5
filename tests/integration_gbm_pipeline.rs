//! Integration tests for the GBM simulation and calibration pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end flow: simulated ensembles → log-returns →
//!   normality harness → Bayesian calibration → multi-scale aggregation.
//! - Use realistic parameter regimes (daily steps, ten-year histories,
//!   annualized drift and volatility).
//!
//! Coverage
//! --------
//! - `simulation`: shape, positivity, initial column and seeded determinism.
//! - `statistical_tests`: step log-returns pass `is_normal` in most seeded
//!   trials; terminal price levels with large volatility do not.
//! - `returns` and `pricing`: reference values.
//! - `bayes` + `aggregation`: drift/volatility recovery from a simulated
//!   path and skip-and-continue across horizons.
//!
//! Exclusions
//! ----------
//! - Sampler internals (step-size adaptation, R̂, ESS): unit tests.
//! - Python bindings.
use approx::assert_abs_diff_eq;
use rust_gbm::{
    aggregation::{MultiScaleAggregator, Scale},
    bayes::{CalibrationMode, Calibrator, SamplerConfig},
    pricing::bs_call_price,
    returns::log_returns,
    simulation::{SimulationConfig, simulate},
    statistical_tests::{NormalityTest, is_normal, is_normal_with},
};

/// One ten-year daily path with `μ = 0.1`, `σ = 0.2`.
fn ten_year_path(seed: u64) -> Vec<f64> {
    let config = SimulationConfig::new(100.0, 0.1, 0.2, 10.0, 1.0 / 252.0, 1).unwrap();
    simulate(&config, Some(seed)).unwrap().prices().row(0).to_vec()
}

#[test]
// Purpose
// -------
// Ensembles have the documented shape, start at S0, stay positive and are
// reproducible under a fixed seed.
//
// Given
// -----
// - S0 = 100, μ = 0.05, σ = 0.2, T = 1, dt = 0.01, M = 25.
//
// Expect
// ------
// - Shape (25, 101); column 0 all 100; all prices > 0.
// - Same seed → identical arrays; different seed → different arrays.
fn simulation_shape_positivity_and_determinism() {
    // Arrange
    let config = SimulationConfig::new(100.0, 0.05, 0.2, 1.0, 0.01, 25).unwrap();

    // Act
    let a = simulate(&config, Some(42)).unwrap();
    let b = simulate(&config, Some(42)).unwrap();
    let c = simulate(&config, Some(43)).unwrap();

    // Assert
    assert_eq!(a.prices().dim(), (25, 101));
    assert!(a.prices().column(0).iter().all(|&p| p == 100.0));
    assert!(a.prices().iter().all(|&p| p > 0.0 && p.is_finite()));
    assert_eq!(a.prices(), b.prices());
    assert_ne!(a.prices(), c.prices());
}

#[test]
// Purpose
// -------
// Step log-returns are normal "statistically": most seeded trials pass.
//
// Given
// -----
// - 20 seeds; each ensemble has M = 20 paths and N = 50 steps (1000
//   returns).
//
// Expect
// ------
// - At least 15 of 20 trials accept normality at α = 0.05 (expected
//   rejections ≈ 1).
fn step_log_returns_are_normal_across_trials() {
    let config = SimulationConfig::new(100.0, 0.05, 0.2, 1.0, 0.02, 20).unwrap();

    let passed = (0..20_u64)
        .filter(|&seed| {
            let returns = simulate(&config, Some(seed)).unwrap().step_log_returns();
            is_normal(returns.as_slice().unwrap(), 0.05).unwrap()
        })
        .count();

    assert!(passed >= 15, "only {passed}/20 trials accepted normality");
}

#[test]
// Purpose
// -------
// Raw terminal price levels are log-normal, not normal.
//
// Given
// -----
// - σ = 0.5, T = 1, M = 1000 terminal prices.
//
// Expect
// ------
// - Both Shapiro–Wilk and Jarque–Bera reject at α = 0.05.
fn terminal_prices_are_not_normal() {
    let config = SimulationConfig::new(100.0, 0.05, 0.5, 1.0, 0.01, 1000).unwrap();
    let terminal = simulate(&config, Some(7)).unwrap().terminal_prices();
    let terminal = terminal.as_slice().unwrap();

    assert!(!is_normal(terminal, 0.05).unwrap());
    assert!(!is_normal_with(terminal, 0.05, NormalityTest::JarqueBera).unwrap());
}

#[test]
fn reference_values_for_returns_and_pricing() {
    let returns = log_returns(&[100.0, 105.0, 110.25], 1).unwrap();
    assert_eq!(returns.len(), 2);
    assert_abs_diff_eq!(returns.as_slice()[0], 0.048_790_164_169_432, epsilon = 1e-12);
    assert_abs_diff_eq!(returns.as_slice()[1], 0.048_790_164_169_432, epsilon = 1e-12);

    assert_abs_diff_eq!(bs_call_price(100.0, 100.0, 0.05, 1.0, 0.2), 10.4506, epsilon = 1e-4);
}

#[test]
// Purpose
// -------
// Historical calibration recovers the log-return drift and volatility of a
// simulated path.
//
// Given
// -----
// - 2520 daily returns from μ = 0.1, σ = 0.2.
// - 500 tuning + 500 draws, 2 chains, seed 3.
//
// Expect
// ------
// - Posterior mean of `mu` within 4 posterior sd of μ − σ²/2 = 0.08.
// - Posterior mean of `sigma` within 4 posterior sd of 0.2.
fn historical_calibration_recovers_simulated_parameters() {
    // Arrange
    let prices = ten_year_path(2024);
    let returns = log_returns(&prices, 1).unwrap();
    let config = SamplerConfig::new(500, 500, 0.9, 2).unwrap().with_seed(3);
    let calibrator = Calibrator::new(config).unwrap();

    // Act
    let outcome = calibrator
        .calibrate(returns.as_slice(), &CalibrationMode::HistoricalReturns { lag: 1 }, None)
        .unwrap();

    // Assert
    let mu = outcome.summary("mu").unwrap();
    let sigma = outcome.summary("sigma").unwrap();
    assert!((mu.mean - 0.08).abs() < 4.0 * mu.std, "mu = {} ± {}", mu.mean, mu.std);
    assert!((sigma.mean - 0.2).abs() < 4.0 * sigma.std, "sigma = {} ± {}", sigma.mean, sigma.std);
    assert!(outcome.draws.diagnostics.converged);
}

#[test]
// Purpose
// -------
// Horizon aggregation calibrates each lag independently and skips lags the
// history cannot support.
//
// Given
// -----
// - The ten-year path; horizons [1, 5, 5000].
//
// Expect
// ------
// - Two points in order (lags 1 and 5), each with a `sigma` summary near
//   0.2.
fn horizon_aggregation_skips_unsupported_lags() {
    let prices = ten_year_path(99);
    let config = SamplerConfig::new(300, 300, 0.9, 2).unwrap().with_seed(8);
    let aggregator = MultiScaleAggregator::new(Calibrator::new(config).unwrap());

    let points = aggregator.across_horizons(&prices, &[1, 5, 5000]);

    let scales: Vec<Scale> = points.iter().map(|p| p.scale).collect();
    assert_eq!(scales, vec![Scale::Horizon { lag: 1 }, Scale::Horizon { lag: 5 }]);
    for point in &points {
        let sigma = &point.summaries["sigma"];
        assert!((sigma.mean - 0.2).abs() < 0.05, "{}: sigma = {}", point.scale, sigma.mean);
    }
}
