//! bayes::calibrator — declare priors, build the likelihood, sample, summarize.
//!
//! Purpose
//! -------
//! Provide the single calibration entry point shared by both modes:
//! [`Calibrator::calibrate`] validates the inputs, builds the posterior
//! model for the requested [`CalibrationMode`], hands it to the configured
//! [`PosteriorSampler`], and reduces the draws to one [`PosteriorSummary`]
//! per latent parameter.
//!
//! Key behaviors
//! -------------
//! - `HistoricalReturns { lag }`: observations are log-returns at `lag`
//!   trading days; latent `(mu, sigma)`.
//! - `ImpliedVolatility { spot, rate, maturity, strikes }`: observations are
//!   call prices, one per strike; latent `(sigma, obs_sigma)`.
//! - `priors = None` selects the mode's default priors.
//! - Engine errors and non-converged runs both surface as
//!   [`CalibError::InferenceFailure`]; no summary is produced in that case.
//!
//! Invariants & assumptions
//! ------------------------
//! - The calibrator holds no mutable state; concurrent calls are
//!   independent.
//! - With a deterministic sampler, repeated calls return identical outcomes.
use crate::bayes::{
    errors::{CalibError, CalibResult},
    model::{
        HistoricalGbmModel, ImpliedVolModel, PosteriorModel, historical_default_priors,
        implied_vol_default_priors,
    },
    priors::PriorSpec,
    sampler::{HamiltonianSampler, PosteriorSampler, SamplerConfig},
    summary::{PosteriorDraws, PosteriorSummary},
};
use std::collections::BTreeMap;

/// Which latent parameters to infer, and from what.
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationMode {
    HistoricalReturns { lag: usize },
    ImpliedVolatility { spot: f64, rate: f64, maturity: f64, strikes: Vec<f64> },
}

impl CalibrationMode {
    pub fn default_priors(&self) -> Vec<PriorSpec> {
        match self {
            CalibrationMode::HistoricalReturns { .. } => historical_default_priors(),
            CalibrationMode::ImpliedVolatility { .. } => implied_vol_default_priors(),
        }
    }
}

/// Posterior summaries keyed by parameter name, plus the raw draws.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationOutcome {
    pub summaries: BTreeMap<String, PosteriorSummary>,
    pub draws: PosteriorDraws,
}

impl CalibrationOutcome {
    pub fn summary(&self, name: &str) -> Option<&PosteriorSummary> {
        self.summaries.get(name)
    }
}

/// Calibrator — owns the sampler and its configuration.
#[derive(Debug, Clone)]
pub struct Calibrator<S = HamiltonianSampler> {
    sampler: S,
    config: SamplerConfig,
}

impl Calibrator<HamiltonianSampler> {
    /// Calibrator backed by the built-in HMC engine.
    ///
    /// # Errors
    /// - [`CalibError::InvalidSamplerConfig`] from [`SamplerConfig::validate`].
    pub fn new(config: SamplerConfig) -> CalibResult<Self> {
        Self::with_sampler(HamiltonianSampler, config)
    }
}

impl<S: PosteriorSampler> Calibrator<S> {
    /// Calibrator backed by any [`PosteriorSampler`].
    pub fn with_sampler(sampler: S, config: SamplerConfig) -> CalibResult<Self> {
        config.validate()?;
        Ok(Self { sampler, config })
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// calibrate — posterior summaries for the latent parameters of `mode`.
    ///
    /// Parameters
    /// ----------
    /// - `observations`: log-returns (historical) or observed call prices
    ///   (implied volatility), all finite, at least one.
    /// - `mode`: calibration mode and its fixed data.
    /// - `priors`: one [`PriorSpec`] per latent parameter, any order; `None`
    ///   for the mode defaults.
    ///
    /// Returns
    /// -------
    /// `CalibResult<CalibrationOutcome>` with one summary per parameter.
    ///
    /// Errors
    /// ------
    /// - Observation, model-input and prior errors from the model
    ///   constructors.
    /// - `CalibError::InferenceFailure` when the sampler fails or reports a
    ///   non-converged run.
    pub fn calibrate(
        &self, observations: &[f64], mode: &CalibrationMode, priors: Option<&[PriorSpec]>,
    ) -> CalibResult<CalibrationOutcome> {
        let defaults;
        let priors = match priors {
            Some(p) => p,
            None => {
                defaults = mode.default_priors();
                &defaults
            }
        };
        match mode {
            CalibrationMode::HistoricalReturns { lag } => {
                let model = HistoricalGbmModel::new(observations, *lag, priors)?;
                self.run(&model)
            }
            CalibrationMode::ImpliedVolatility { spot, rate, maturity, strikes } => {
                let model =
                    ImpliedVolModel::new(observations, strikes, *spot, *rate, *maturity, priors)?;
                self.run(&model)
            }
        }
    }

    fn run<M: PosteriorModel>(&self, model: &M) -> CalibResult<CalibrationOutcome> {
        let draws = self.sampler.sample(model, &self.config)?;
        if !draws.diagnostics.converged {
            return Err(CalibError::InferenceFailure {
                diagnostic: format!("sampler did not converge: {}", draws.diagnostics),
            });
        }
        let summaries = draws
            .summarize()
            .into_iter()
            .map(|s| (s.parameter_name.clone(), s))
            .collect();
        Ok(CalibrationOutcome { summaries, draws })
    }
}
