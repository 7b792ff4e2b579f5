//! bayes::sampler — posterior-sampling contract and the built-in HMC engine.
//!
//! Purpose
//! -------
//! Define the narrow seam between the calibrator and whatever produces
//! posterior draws ([`PosteriorSampler`]), the settings the calibrator owns
//! ([`SamplerConfig`]), and a small Hamiltonian Monte Carlo engine
//! ([`HamiltonianSampler`]) good enough for the low-dimensional models in
//! this crate.
//!
//! Key behaviors
//! -------------
//! - MAP start: L-BFGS on the unconstrained log-posterior from the model's
//!   moment-based guess (`optimization::map_search`). On failure the guess
//!   itself is used and a warning is logged.
//! - Laplace preconditioning: `θ = θ* + L u` with `L Lᵀ ≈ (−H)⁻¹`, so chains
//!   move in roughly isotropic coordinates `u`.
//! - Chains: static-trajectory HMC with finite-difference gradients,
//!   jittered step size, dual-averaging adaptation toward `target_accept`
//!   during `tune`, then `draws` retained transitions. Chains run on the
//!   rayon pool with seeds `seed, seed + 1, …`.
//! - Diagnostics: acceptance rate, adapted step size, divergences, split-R̂
//!   and ESS per parameter; `converged` iff every R̂ is finite and
//!   `≤ max_rhat` and every draw is finite.
//!
//! Invariants & assumptions
//! ------------------------
//! - With `seed = Some(_)`, output is bit-for-bit reproducible regardless of
//!   thread scheduling.
//! - Draws are reported in constrained space, columns in prior order.
//!
//! Testing notes
//! -------------
//! - Unit tests sample a conjugate Normal model with a known posterior and
//!   check reproducibility and config validation. End-to-end recovery is in
//!   `calibrator` and the integration tests.
use crate::{
    bayes::{
        diagnostics::{effective_sample_size, split_rhat},
        errors::{CalibError, CalibResult},
        laplace::laplace_whitening,
        model::PosteriorModel,
        summary::{PosteriorDraws, SamplerDiagnostics},
    },
    optimization::{
        errors::{OptError, OptResult},
        map_search::{
            LogDensity, MapOptions, maximize,
            finite_diff::fd_gradient,
            types::{Grad, Theta},
        },
    },
};
use anyhow::Context;
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::StandardNormal;
use rayon::prelude::*;
use std::f64::consts::FRAC_PI_2;

/// Energy error beyond which a transition counts as divergent.
const MAX_ENERGY_ERROR: f64 = 1000.0;
/// Starting leapfrog step in whitened coordinates.
const INITIAL_STEP: f64 = 1.0;

// Dual-averaging constants (Hoffman & Gelman, 2014).
const DA_GAMMA: f64 = 0.05;
const DA_T0: f64 = 10.0;
const DA_KAPPA: f64 = 0.75;

/// Settings owned by the calibrator and handed to the engine.
///
/// Default: `draws = 2000`, `tune = 2000`, `target_accept = 0.95`,
/// `chains = 4`, `seed = None`, `max_rhat = 1.05`, `max_leapfrog = 64`,
/// `map_options = MapOptions::default()`.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerConfig {
    pub draws: usize,
    pub tune: usize,
    pub target_accept: f64,
    pub chains: usize,
    pub seed: Option<u64>,
    pub max_rhat: f64,
    pub max_leapfrog: usize,
    pub map_options: MapOptions,
}

impl SamplerConfig {
    /// Validated configuration with the remaining fields at their defaults.
    ///
    /// # Errors
    /// - [`CalibError::InvalidSamplerConfig`] unless `draws ≥ 2`,
    ///   `chains ≥ 1` and `0 < target_accept < 1`.
    pub fn new(draws: usize, tune: usize, target_accept: f64, chains: usize) -> CalibResult<Self> {
        let config = Self { draws, tune, target_accept, chains, ..Self::default() };
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// # Errors
    /// - [`CalibError::InvalidSamplerConfig`] unless `max_rhat > 1` and finite.
    pub fn with_max_rhat(mut self, max_rhat: f64) -> CalibResult<Self> {
        self.max_rhat = max_rhat;
        self.validate()?;
        Ok(self)
    }

    /// # Errors
    /// - [`CalibError::InvalidSamplerConfig`] unless `max_leapfrog ≥ 1`.
    pub fn with_max_leapfrog(mut self, max_leapfrog: usize) -> CalibResult<Self> {
        self.max_leapfrog = max_leapfrog;
        self.validate()?;
        Ok(self)
    }

    pub fn with_map_options(mut self, map_options: MapOptions) -> Self {
        self.map_options = map_options;
        self
    }

    /// Re-check every field; fields are public and may have been edited.
    pub fn validate(&self) -> CalibResult<()> {
        let fail = |field: &'static str, reason: &'static str| {
            Err(CalibError::InvalidSamplerConfig { field, reason })
        };
        if self.draws < 2 {
            return fail("draws", "At least two draws per chain are required.");
        }
        if self.chains == 0 {
            return fail("chains", "At least one chain is required.");
        }
        if !(self.target_accept > 0.0 && self.target_accept < 1.0) {
            return fail("target_accept", "Target acceptance must lie in (0, 1).");
        }
        if !(self.max_rhat.is_finite() && self.max_rhat > 1.0) {
            return fail("max_rhat", "R-hat threshold must be finite and greater than 1.");
        }
        if self.max_leapfrog == 0 {
            return fail("max_leapfrog", "At least one leapfrog step is required.");
        }
        Ok(())
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            draws: 2000,
            tune: 2000,
            target_accept: 0.95,
            chains: 4,
            seed: None,
            max_rhat: 1.05,
            max_leapfrog: 64,
            map_options: MapOptions::default(),
        }
    }
}

/// Anything that can turn a [`PosteriorModel`] into posterior draws.
///
/// Implementations report engine problems as `anyhow::Error`; the
/// calibrator converts them into [`CalibError::InferenceFailure`]. A run
/// that completes without converging is returned as `Ok` with
/// `diagnostics.converged = false`.
pub trait PosteriorSampler {
    fn sample<M: PosteriorModel>(
        &self, model: &M, config: &SamplerConfig,
    ) -> anyhow::Result<PosteriorDraws>;
}

/// Laplace-preconditioned static HMC with dual-averaging step adaptation.
#[derive(Debug, Clone, Copy, Default)]
pub struct HamiltonianSampler;

impl PosteriorSampler for HamiltonianSampler {
    fn sample<M: PosteriorModel>(
        &self, model: &M, config: &SamplerConfig,
    ) -> anyhow::Result<PosteriorDraws> {
        config.validate()?;
        let dim = model.dim();
        let guess = model.to_unconstrained(&model.initial_guess());

        let (center, map_converged) =
            match maximize(&MapObjective(model), guess.clone(), &(), &config.map_options) {
                Ok(out) => (out.theta_hat, out.converged),
                Err(err) => {
                    log::warn!("MAP search failed ({err}); starting from the moment-based guess");
                    (guess, false)
                }
            };
        let log_post = |theta: &Theta| finite_log_posterior(model, theta);
        let whitening = match laplace_whitening(&log_post, &center) {
            Ok(l) => l,
            Err(err) => {
                log::warn!("Laplace step failed ({err}); using identity preconditioning");
                Array2::eye(dim)
            }
        };
        let target = WhitenedTarget { model, center, whitening };

        let base_seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let outputs = (0..config.chains)
            .into_par_iter()
            .map(|chain| {
                run_chain(&target, config, base_seed.wrapping_add(chain as u64))
                    .with_context(|| format!("chain {chain}"))
            })
            .collect::<anyhow::Result<Vec<ChainOutput>>>()?;

        let mut diagnostics = SamplerDiagnostics {
            acceptance_rate: outputs.iter().map(|o| o.acceptance).collect(),
            step_size: outputs.iter().map(|o| o.step_size).collect(),
            divergences: outputs.iter().map(|o| o.divergences).sum(),
            map_converged,
            ..SamplerDiagnostics::default()
        };
        let mut draws = PosteriorDraws::new(
            model.param_names(),
            outputs.into_iter().map(|o| o.draws).collect(),
            SamplerDiagnostics::default(),
        );
        for idx in 0..dim {
            let per_chain = draws.per_chain(idx);
            diagnostics.r_hat.push(split_rhat(&per_chain));
            diagnostics.ess.push(effective_sample_size(&per_chain));
        }
        diagnostics.converged = draws.all_finite()
            && diagnostics.r_hat.iter().all(|r| r.is_finite() && *r <= config.max_rhat);
        log::debug!("HMC finished: {diagnostics}");
        draws.diagnostics = diagnostics;
        Ok(draws)
    }
}

// ---- Helper methods ----

/// The model's log-posterior as a MAP-search objective.
struct MapObjective<'a, M>(&'a M);

impl<M: PosteriorModel> LogDensity for MapObjective<'_, M> {
    type Data = ();

    fn dim(&self) -> usize {
        self.0.dim()
    }

    fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
        Ok(self.0.log_posterior(theta))
    }
}

fn finite_log_posterior<M: PosteriorModel>(model: &M, theta: &Theta) -> OptResult<f64> {
    let value = model.log_posterior(theta);
    if value.is_finite() { Ok(value) } else { Err(OptError::NonFiniteCost { value }) }
}

/// Log-posterior in whitened coordinates `u`, `θ = center + whitening · u`.
struct WhitenedTarget<'a, M> {
    model: &'a M,
    center: Theta,
    whitening: Array2<f64>,
}

/// A position with its log-density and gradient.
#[derive(Clone)]
struct Point {
    u: Theta,
    logp: f64,
    grad: Grad,
}

impl<M: PosteriorModel> WhitenedTarget<'_, M> {
    fn theta(&self, u: &Theta) -> Theta {
        &self.center + &self.whitening.dot(u)
    }

    fn log_density(&self, u: &Theta) -> OptResult<f64> {
        finite_log_posterior(self.model, &self.theta(u))
    }

    fn point(&self, u: Theta) -> OptResult<Point> {
        let logp = self.log_density(&u)?;
        let grad = fd_gradient(&|x: &Theta| self.log_density(x), &u)?;
        Ok(Point { u, logp, grad })
    }

    fn constrained(&self, u: &Theta) -> Vec<f64> {
        self.model.to_constrained(&self.theta(u))
    }
}

struct ChainOutput {
    draws: Array2<f64>,
    acceptance: f64,
    step_size: f64,
    divergences: usize,
}

struct Transition {
    proposal: Option<Point>,
    accept_prob: f64,
    divergent: bool,
}

impl Transition {
    fn divergent() -> Self {
        Self { proposal: None, accept_prob: 0.0, divergent: true }
    }
}

fn run_chain<M: PosteriorModel>(
    target: &WhitenedTarget<'_, M>, config: &SamplerConfig, seed: u64,
) -> anyhow::Result<ChainOutput> {
    let mut rng = StdRng::seed_from_u64(seed);
    let dim = target.center.len();

    // One posterior standard deviation of spread around the mode.
    let start: Theta = (0..dim).map(|_| rng.sample::<f64, _>(StandardNormal)).collect();
    let mut current = match target.point(start) {
        Ok(p) => p,
        Err(_) => target
            .point(Array1::zeros(dim))
            .context("log-posterior is not finite at the posterior mode")?,
    };

    let mut adapt = DualAveraging::new(INITIAL_STEP, config.target_accept);
    let mut step = INITIAL_STEP;
    let mut draws = Array2::<f64>::zeros((config.draws, dim));
    let (mut accept_sum, mut divergences) = (0.0, 0);

    for iter in 0..config.tune + config.draws {
        let jittered = step * rng.gen_range(0.9..1.1);
        let n_leapfrog = ((FRAC_PI_2 / jittered).ceil() as usize).clamp(1, config.max_leapfrog);
        let transition = leapfrog(target, &current, jittered, n_leapfrog, &mut rng);
        if let Some(next) = transition.proposal {
            current = next;
        }

        if iter < config.tune {
            step = adapt.update(transition.accept_prob);
            if iter + 1 == config.tune {
                step = adapt.adapted();
            }
            continue;
        }
        let row = iter - config.tune;
        accept_sum += transition.accept_prob;
        divergences += usize::from(transition.divergent);
        for (j, value) in target.constrained(&current.u).into_iter().enumerate() {
            draws[[row, j]] = value;
        }
    }
    if !step.is_finite() {
        anyhow::bail!("step size adaptation diverged");
    }

    Ok(ChainOutput {
        draws,
        acceptance: accept_sum / config.draws as f64,
        step_size: step,
        divergences,
    })
}

/// One static-length leapfrog trajectory with a Metropolis correction.
fn leapfrog<M: PosteriorModel>(
    target: &WhitenedTarget<'_, M>, start: &Point, step: f64, n_leapfrog: usize, rng: &mut StdRng,
) -> Transition {
    let dim = start.u.len();
    let momentum0: Array1<f64> = (0..dim).map(|_| rng.sample::<f64, _>(StandardNormal)).collect();
    let h0 = -start.logp + 0.5 * momentum0.dot(&momentum0);
    let draw: f64 = rng.gen();

    let mut p = momentum0;
    p.scaled_add(0.5 * step, &start.grad);
    let mut u = start.u.clone();
    let mut end: Option<Point> = None;
    for i in 0..n_leapfrog {
        u.scaled_add(step, &p);
        let point = match target.point(u.clone()) {
            Ok(point) => point,
            Err(_) => return Transition::divergent(),
        };
        let weight = if i + 1 == n_leapfrog { 0.5 } else { 1.0 };
        p.scaled_add(weight * step, &point.grad);
        end = Some(point);
    }
    let Some(end) = end else { return Transition::divergent() };

    let delta = -end.logp + 0.5 * p.dot(&p) - h0;
    if !delta.is_finite() || delta > MAX_ENERGY_ERROR {
        return Transition::divergent();
    }
    let accept_prob = (-delta).exp().min(1.0);
    let proposal = (draw < accept_prob).then_some(end);
    Transition { proposal, accept_prob, divergent: false }
}

/// Nesterov dual averaging of `ln ε` toward a target acceptance rate.
struct DualAveraging {
    mu: f64,
    target: f64,
    h_bar: f64,
    log_step_bar: f64,
    t: f64,
}

impl DualAveraging {
    fn new(initial_step: f64, target: f64) -> Self {
        Self { mu: (10.0 * initial_step).ln(), target, h_bar: 0.0, log_step_bar: 0.0, t: 0.0 }
    }

    /// Record one acceptance probability and return the next step size.
    fn update(&mut self, accept_prob: f64) -> f64 {
        self.t += 1.0;
        let eta = 1.0 / (self.t + DA_T0);
        self.h_bar = (1.0 - eta) * self.h_bar + eta * (self.target - accept_prob);
        let log_step = self.mu - self.t.sqrt() / DA_GAMMA * self.h_bar;
        let w = self.t.powf(-DA_KAPPA);
        self.log_step_bar = w * log_step + (1.0 - w) * self.log_step_bar;
        log_step.exp()
    }

    /// Averaged step size used after tuning.
    fn adapted(&self) -> f64 {
        self.log_step_bar.exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bayes::priors::PriorSpec;
    use statrs::consts::LN_SQRT_2PI;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Config validation and defaults.
    // - Posterior moments of a conjugate Normal–Normal model.
    // - Seeded reproducibility across rayon scheduling.
    // - Dual averaging moving the step toward the target acceptance.
    //
    // They intentionally DO NOT cover:
    // - GBM-specific models (see `calibrator` and integration tests).
    // -------------------------------------------------------------------------

    /// `x_i ~ N(theta, 1)`, `theta ~ N(0, 10)`; posterior is Normal.
    struct ConjugateMean {
        priors: Vec<PriorSpec>,
        data: Vec<f64>,
    }

    impl ConjugateMean {
        fn new(data: Vec<f64>) -> Self {
            Self { priors: vec![PriorSpec::normal("theta", 0.0, 10.0)], data }
        }

        /// Exact posterior (mean, sd).
        fn exact(&self) -> (f64, f64) {
            let n = self.data.len() as f64;
            let precision = n + 1.0 / 100.0;
            (self.data.iter().sum::<f64>() / precision, precision.sqrt().recip())
        }
    }

    impl PosteriorModel for ConjugateMean {
        fn priors(&self) -> &[PriorSpec] {
            &self.priors
        }

        fn log_likelihood(&self, params: &[f64]) -> f64 {
            self.data.iter().map(|x| -LN_SQRT_2PI - 0.5 * (x - params[0]).powi(2)).sum()
        }

        fn initial_guess(&self) -> Vec<f64> {
            vec![0.0]
        }
    }

    fn small_config(seed: u64) -> SamplerConfig {
        SamplerConfig::new(600, 400, 0.9, 3).unwrap().with_seed(seed)
    }

    #[test]
    // Purpose
    // -------
    // HMC reproduces a known posterior.
    //
    // Given
    // -----
    // - 20 observations with mean 1.5 under the conjugate model.
    //
    // Expect
    // ------
    // - Converged; posterior mean within 0.05 and sd within 20% of exact.
    fn hmc_matches_conjugate_posterior() {
        // Arrange
        let data: Vec<f64> = (0..20).map(|i| 1.5 + if i % 2 == 0 { 0.7 } else { -0.7 }).collect();
        let model = ConjugateMean::new(data);
        let (mean, sd) = model.exact();

        // Act
        let draws = HamiltonianSampler.sample(&model, &small_config(7)).unwrap();
        let summary = &draws.summarize()[0];

        // Assert
        assert!(draws.diagnostics.converged, "{}", draws.diagnostics);
        assert!(draws.diagnostics.map_converged);
        assert!((summary.mean - mean).abs() < 0.05, "mean {} vs {mean}", summary.mean);
        assert!((summary.std / sd - 1.0).abs() < 0.2, "sd {} vs {sd}", summary.std);
        assert_eq!((draws.n_chains(), draws.n_draws()), (3, 600));
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let model = ConjugateMean::new(vec![0.2, -0.4, 1.1, 0.3]);
        let a = HamiltonianSampler.sample(&model, &small_config(42)).unwrap();
        let b = HamiltonianSampler.sample(&model, &small_config(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    // Purpose
    // -------
    // Each invalid field is reported by name.
    //
    // Given
    // -----
    // - draws = 1, chains = 0, target_accept = 1, max_rhat = 1.
    //
    // Expect
    // ------
    // - `InvalidSamplerConfig` naming the offending field.
    fn sampler_config_rejects_invalid_fields() {
        let field_of = |r: CalibResult<SamplerConfig>| match r {
            Err(CalibError::InvalidSamplerConfig { field, .. }) => field,
            other => panic!("expected InvalidSamplerConfig, got {other:?}"),
        };
        assert_eq!(field_of(SamplerConfig::new(1, 10, 0.9, 2)), "draws");
        assert_eq!(field_of(SamplerConfig::new(10, 10, 0.9, 0)), "chains");
        assert_eq!(field_of(SamplerConfig::new(10, 10, 1.0, 2)), "target_accept");
        assert_eq!(field_of(SamplerConfig::default().with_max_rhat(1.0)), "max_rhat");

        let default = SamplerConfig::default();
        assert_eq!((default.draws, default.tune, default.chains), (2000, 2000, 4));
        assert_eq!(default.target_accept, 0.95);
    }

    #[test]
    fn dual_averaging_shrinks_step_on_rejections() {
        let mut da = DualAveraging::new(1.0, 0.8);
        let mut step = 1.0;
        for _ in 0..50 {
            step = da.update(0.0);
        }
        assert!(step < 0.1);
        assert!(da.adapted() < 1.0);
    }
}
