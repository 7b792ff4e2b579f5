//! rust_gbm — GBM simulation and Bayesian calibration with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes simulation, return extraction, normality checks and calibration
//! to Python via the `_rust_gbm` extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core modules: `simulation`, `returns`, `statistical_tests`,
//!   `pricing`, `bayes`, `market`, `aggregation` and the shared
//!   `optimization` layer.
//! - With `python-bindings`, define the `#[pyfunction]` / `#[pyclass]`
//!   wrappers and the `#[pymodule]` initializer, registering the
//!   `simulation`, `statistical_tests` and `calibration` submodules.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue, argument defaults and error mapping.
//! - Calibration runs release the GIL for their duration.
//!
//! Conventions
//! -----------
//! - Errors from core Rust code are converted to `ValueError` at the PyO3
//!   boundary (see `utils`).
//! - Python defaults mirror the Rust defaults (`SamplerConfig::default`,
//!   `alpha = 0.05`, the `is_normal` test choice).
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on the inner modules and ignore the items
//!   guarded by the `python-bindings` feature.

pub mod aggregation;
pub mod bayes;
pub mod market;
pub mod optimization;
pub mod pricing;
pub mod returns;
pub mod simulation;
pub mod statistical_tests;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    bayes::{CalibrationMode, CalibrationOutcome, Calibrator, PriorSpec, SamplerConfig},
    simulation::{SimulationConfig, simulate},
    statistical_tests::{NormalityTest, is_normal_with},
    utils::extract_f64_vec,
};

/// Posterior — Python-facing view of a calibration outcome.
///
/// Exposes per-parameter `(mean, std)` summaries, the pooled draws and the
/// sampler diagnostics. Rust callers should use [`bayes::CalibrationOutcome`]
/// directly.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_gbm.calibration")]
pub struct Posterior {
    inner: CalibrationOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl Posterior {
    /// Parameter names in model order.
    #[getter]
    pub fn names(&self) -> Vec<String> {
        self.inner.draws.names().to_vec()
    }

    /// `(mean, std)` of the named parameter.
    pub fn summary(&self, name: &str) -> PyResult<(f64, f64)> {
        self.inner
            .summary(name)
            .map(|s| (s.mean, s.std))
            .ok_or_else(|| PyValueError::new_err(format!("unknown parameter {name:?}")))
    }

    /// Draws of the named parameter, chains concatenated.
    pub fn draws<'py>(&self, py: Python<'py>, name: &str) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let pooled = self
            .inner
            .draws
            .pooled(name)
            .ok_or_else(|| PyValueError::new_err(format!("unknown parameter {name:?}")))?;
        Ok(pooled.into_pyarray_bound(py))
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.draws.diagnostics.converged
    }

    #[getter]
    pub fn diagnostics(&self) -> String {
        self.inner.draws.diagnostics.to_string()
    }
}

/// simulate_gbm(initial_price, drift, volatility, horizon, step, path_count, seed=None)
///
/// Returns an `(M, N + 1)` price array.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (initial_price, drift, volatility, horizon, step, path_count, seed = None))]
pub fn simulate_gbm<'py>(
    py: Python<'py>, initial_price: f64, drift: f64, volatility: f64, horizon: f64, step: f64,
    path_count: usize, seed: Option<u64>,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let config = SimulationConfig::new(initial_price, drift, volatility, horizon, step, path_count)?;
    let ensemble = py.allow_threads(|| simulate(&config, seed))?;
    Ok(ensemble.into_inner().into_pyarray_bound(py))
}

/// log_returns(prices, lag=1)
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (prices, lag = 1))]
pub fn log_returns<'py>(
    py: Python<'py>, prices: &Bound<'py, PyAny>, lag: usize,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let prices = extract_f64_vec(py, prices, "prices")?;
    let series = returns::log_returns(&prices, lag)?;
    Ok(series.into_inner().into_pyarray_bound(py))
}

/// is_normal(sample, alpha=0.05, test="auto")
///
/// `"auto"` uses Shapiro–Wilk up to 5000 observations and Jarque–Bera above.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (sample, alpha = 0.05, test = "auto"))]
pub fn is_normal<'py>(
    py: Python<'py>, sample: &Bound<'py, PyAny>, alpha: f64, test: &str,
) -> PyResult<bool> {
    let test = match test.to_lowercase().as_str() {
        "auto" => None,
        "shapiro_wilk" | "shapiro" | "sw" => Some(NormalityTest::ShapiroWilk),
        "jarque_bera" | "jb" => Some(NormalityTest::JarqueBera),
        other => {
            return Err(PyValueError::new_err(format!(
                "invalid normality test {other:?} (expected 'auto', 'shapiro_wilk' or 'jarque_bera')"
            )));
        }
    };
    let sample = extract_f64_vec(py, sample, "sample")?;
    let accepted = match test {
        Some(test) => is_normal_with(&sample, alpha, test)?,
        None => statistical_tests::is_normal(&sample, alpha)?,
    };
    Ok(accepted)
}

/// calibrate_gbm(returns, lag=1, draws=2000, tune=2000, target_accept=0.95, chains=4, seed=None)
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (
    returns, lag = 1, draws = 2000, tune = 2000, target_accept = 0.95, chains = 4, seed = None,
    mu_prior = None, sigma_prior = None
))]
#[allow(clippy::too_many_arguments)]
pub fn calibrate_gbm<'py>(
    py: Python<'py>, returns: &Bound<'py, PyAny>, lag: usize, draws: usize, tune: usize,
    target_accept: f64, chains: usize, seed: Option<u64>, mu_prior: Option<(f64, f64)>,
    sigma_prior: Option<f64>,
) -> PyResult<Posterior> {
    let returns = extract_f64_vec(py, returns, "returns")?;
    let calibrator = build_calibrator(draws, tune, target_accept, chains, seed)?;
    let priors = match (mu_prior, sigma_prior) {
        (None, None) => None,
        (mu, sigma) => {
            let (mu_mean, mu_sd) = mu.unwrap_or((0.0, 10.0));
            Some(vec![
                PriorSpec::normal("mu", mu_mean, mu_sd),
                PriorSpec::half_normal("sigma", sigma.unwrap_or(10.0)),
            ])
        }
    };
    let mode = CalibrationMode::HistoricalReturns { lag };
    let inner = py.allow_threads(|| calibrator.calibrate(&returns, &mode, priors.as_deref()))?;
    Ok(Posterior { inner })
}

/// calibrate_implied_vol(prices, strikes, spot, rate, maturity, draws=2000, tune=2000,
/// target_accept=0.95, chains=4, seed=None)
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (
    prices, strikes, spot, rate, maturity, draws = 2000, tune = 2000, target_accept = 0.95,
    chains = 4, seed = None
))]
#[allow(clippy::too_many_arguments)]
pub fn calibrate_implied_vol<'py>(
    py: Python<'py>, prices: &Bound<'py, PyAny>, strikes: &Bound<'py, PyAny>, spot: f64,
    rate: f64, maturity: f64, draws: usize, tune: usize, target_accept: f64, chains: usize,
    seed: Option<u64>,
) -> PyResult<Posterior> {
    let prices = extract_f64_vec(py, prices, "prices")?;
    let strikes = extract_f64_vec(py, strikes, "strikes")?;
    let calibrator = build_calibrator(draws, tune, target_accept, chains, seed)?;
    let mode = CalibrationMode::ImpliedVolatility { spot, rate, maturity, strikes };
    let inner = py.allow_threads(|| calibrator.calibrate(&prices, &mode, None))?;
    Ok(Posterior { inner })
}

#[cfg(feature = "python-bindings")]
fn build_calibrator(
    draws: usize, tune: usize, target_accept: f64, chains: usize, seed: Option<u64>,
) -> PyResult<Calibrator> {
    let mut config = SamplerConfig::new(draws, tune, target_accept, chains)?;
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    Ok(Calibrator::new(config)?)
}

/// _rust_gbm — PyO3 module initializer.
///
/// Creates the `simulation`, `statistical_tests` and `calibration`
/// submodules, attaches them to the parent and registers them in
/// `sys.modules` so dotted imports work.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_gbm(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();
    let simulation_mod = PyModule::new_bound(py, "simulation")?;
    let statistical_tests_mod = PyModule::new_bound(py, "statistical_tests")?;
    let calibration_mod = PyModule::new_bound(py, "calibration")?;

    simulation_mod.add_function(wrap_pyfunction!(simulate_gbm, &simulation_mod)?)?;
    simulation_mod.add_function(wrap_pyfunction!(log_returns, &simulation_mod)?)?;
    statistical_tests_mod.add_function(wrap_pyfunction!(is_normal, &statistical_tests_mod)?)?;
    calibration_mod.add_class::<Posterior>()?;
    calibration_mod.add_function(wrap_pyfunction!(calibrate_gbm, &calibration_mod)?)?;
    calibration_mod.add_function(wrap_pyfunction!(calibrate_implied_vol, &calibration_mod)?)?;

    let modules = py.import_bound("sys")?.getattr("modules")?;
    for sub in [simulation_mod, statistical_tests_mod, calibration_mod] {
        m.add_submodule(&sub)?;
        let name = format!("rust_gbm.{}", sub.name()?);
        modules.set_item(name, sub)?;
    }
    Ok(())
}
