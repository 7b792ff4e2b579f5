//! bayes::summary — raw posterior draws and their per-parameter reduction.
use ndarray::{Array2, ArrayView1};
use std::fmt;

/// Per-parameter posterior summary (std uses the `n − 1` denominator).
#[derive(Debug, Clone, PartialEq)]
pub struct PosteriorSummary {
    pub parameter_name: String,
    pub mean: f64,
    pub std: f64,
}

impl PosteriorSummary {
    /// Summarize pooled draws of one parameter.
    pub fn from_draws(parameter_name: impl Into<String>, draws: &[f64]) -> Self {
        let n = draws.len() as f64;
        let mean = draws.iter().sum::<f64>() / n;
        let std = if draws.len() < 2 {
            f64::NAN
        } else {
            (draws.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1.0)).sqrt()
        };
        Self { parameter_name: parameter_name.into(), mean, std }
    }
}

/// Engine diagnostics attached to every set of draws.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SamplerDiagnostics {
    /// Mean acceptance probability per chain over retained draws.
    pub acceptance_rate: Vec<f64>,
    /// Adapted leapfrog step size per chain (whitened coordinates).
    pub step_size: Vec<f64>,
    /// Retained transitions whose energy error exceeded the divergence bound.
    pub divergences: usize,
    /// Split-R̂ per parameter, in parameter order.
    pub r_hat: Vec<f64>,
    /// Effective sample size per parameter, in parameter order.
    pub ess: Vec<f64>,
    /// Whether the MAP search converged (otherwise the moment guess was used).
    pub map_converged: bool,
    pub converged: bool,
}

impl fmt::Display for SamplerDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "converged={}, r_hat={:?}, ess={:?}, divergences={}, acceptance={:?}, step_size={:?}, map_converged={}",
            self.converged,
            self.r_hat,
            self.ess,
            self.divergences,
            self.acceptance_rate,
            self.step_size,
            self.map_converged
        )
    }
}

/// Per-chain posterior draws in constrained parameter space.
///
/// Each chain is a `(draws, dim)` matrix; columns follow `names`.
#[derive(Debug, Clone, PartialEq)]
pub struct PosteriorDraws {
    names: Vec<String>,
    chains: Vec<Array2<f64>>,
    pub diagnostics: SamplerDiagnostics,
}

impl PosteriorDraws {
    pub fn new(names: Vec<String>, chains: Vec<Array2<f64>>, diagnostics: SamplerDiagnostics) -> Self {
        Self { names, chains, diagnostics }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn chains(&self) -> &[Array2<f64>] {
        &self.chains
    }

    pub fn n_chains(&self) -> usize {
        self.chains.len()
    }

    pub fn n_draws(&self) -> usize {
        self.chains.first().map_or(0, |c| c.nrows())
    }

    pub fn param_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Draws of parameter `idx`, one vector per chain.
    pub fn per_chain(&self, idx: usize) -> Vec<Vec<f64>> {
        self.chains.iter().map(|c| column(c.column(idx))).collect()
    }

    /// All chains of `name` concatenated in chain order.
    pub fn pooled(&self, name: &str) -> Option<Vec<f64>> {
        self.param_index(name).map(|idx| self.per_chain(idx).concat())
    }

    /// `true` iff every retained draw is finite.
    pub fn all_finite(&self) -> bool {
        self.chains.iter().all(|c| c.iter().all(|v| v.is_finite()))
    }

    /// One [`PosteriorSummary`] per parameter, in parameter order.
    pub fn summarize(&self) -> Vec<PosteriorSummary> {
        self.names
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let pooled: Vec<f64> = self.per_chain(idx).concat();
                PosteriorSummary::from_draws(name.as_str(), &pooled)
            })
            .collect()
    }
}

fn column(view: ArrayView1<'_, f64>) -> Vec<f64> {
    view.iter().copied().collect()
}
