//! bayes::model — posterior models for the two calibration modes.
//!
//! Purpose
//! -------
//! Pair a set of [`PriorSpec`]s with a log-likelihood in constrained
//! parameter space. The [`PosteriorModel`] trait then supplies the
//! unconstrained log-posterior that the sampling engine explores.
//!
//! Key behaviors
//! -------------
//! - [`HistoricalGbmModel`]: latent `(mu, sigma)`,
//!   `r ~ Normal(mu·dt, sigma·√dt)` with `dt = lag / 252`. The likelihood is
//!   evaluated from sufficient statistics (`n`, mean, centered sum of
//!   squares), so its cost does not grow with the series.
//! - [`ImpliedVolModel`]: latent `(sigma, obs_sigma)`,
//!   `C_obs,i ~ Normal(BS_call(S, K_i, r, T, sigma), obs_sigma)`.
//! - Both provide a moment-based [`PosteriorModel::initial_guess`] used to
//!   start the MAP search.
//!
//! Invariants & assumptions
//! ------------------------
//! - Constructors validate observations, model inputs and priors, so a
//!   model that exists can always be evaluated.
//! - `log_posterior` returns `-∞` rather than panicking when a value falls
//!   outside the support.
use crate::{
    bayes::{
        errors::{CalibError, CalibResult},
        priors::{PriorSpec, match_priors},
    },
    optimization::map_search::types::Theta,
    pricing::bs_call_price,
};
use ndarray::Array1;
use statrs::consts::LN_SQRT_2PI;

/// Trading days per year used to annualize return lags.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// A posterior over a small vector of named latent parameters.
///
/// Required:
/// - `priors()`: one [`PriorSpec`] per parameter, in model order.
/// - `log_likelihood(params)`: `ln p(data | params)` for constrained params.
/// - `initial_guess()`: constrained starting point inside the support.
///
/// Provided:
/// - `to_unconstrained` / `to_constrained`: per-parameter transforms.
/// - `log_posterior(theta)`: log-prior + log-likelihood + log-Jacobian in
///   unconstrained coordinates.
///
/// `Sync` is required because chains evaluate the model in parallel.
pub trait PosteriorModel: Sync {
    fn priors(&self) -> &[PriorSpec];
    fn log_likelihood(&self, params: &[f64]) -> f64;
    fn initial_guess(&self) -> Vec<f64>;

    fn dim(&self) -> usize {
        self.priors().len()
    }

    fn param_names(&self) -> Vec<String> {
        self.priors().iter().map(|p| p.name.clone()).collect()
    }

    fn to_unconstrained(&self, params: &[f64]) -> Theta {
        self.priors().iter().zip(params).map(|(p, &x)| p.prior.to_unconstrained(x)).collect()
    }

    fn to_constrained(&self, theta: &Theta) -> Vec<f64> {
        self.priors().iter().zip(theta.iter()).map(|(p, &u)| p.prior.to_constrained(u)).collect()
    }

    fn log_posterior(&self, theta: &Theta) -> f64 {
        let mut params = Vec::with_capacity(theta.len());
        let mut lp = 0.0;
        for (spec, &u) in self.priors().iter().zip(theta.iter()) {
            let x = spec.prior.to_constrained(u);
            lp += spec.prior.log_density(x) + spec.prior.log_jacobian(u);
            params.push(x);
        }
        if !lp.is_finite() {
            return f64::NEG_INFINITY;
        }
        lp + self.log_likelihood(&params)
    }
}

/// Default priors for historical calibration: `mu ~ N(0, 10)`, `sigma ~ HN(10)`.
pub fn historical_default_priors() -> Vec<PriorSpec> {
    vec![PriorSpec::normal("mu", 0.0, 10.0), PriorSpec::half_normal("sigma", 10.0)]
}

/// Default priors for implied-vol calibration: `sigma ~ HN(1)`, `obs_sigma ~ HN(0.5)`.
pub fn implied_vol_default_priors() -> Vec<PriorSpec> {
    vec![PriorSpec::half_normal("sigma", 1.0), PriorSpec::half_normal("obs_sigma", 0.5)]
}

/// HistoricalGbmModel — drift and volatility from lagged log-returns.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalGbmModel {
    priors: Vec<PriorSpec>,
    dt: f64,
    n: f64,
    mean: f64,
    centered_ss: f64,
}

impl HistoricalGbmModel {
    pub const PARAMS: [&'static str; 2] = ["mu", "sigma"];

    /// Build the model from log-returns at `lag` trading days.
    ///
    /// # Errors
    /// - `CalibError::InvalidModelInput` for `lag = 0`.
    /// - `CalibError::EmptyObservations` / `NonFiniteObservation`.
    /// - Prior errors from [`match_priors`].
    pub fn new(returns: &[f64], lag: usize, priors: &[PriorSpec]) -> CalibResult<Self> {
        if lag == 0 {
            return Err(CalibError::InvalidModelInput { name: "lag", value: 0.0 });
        }
        validate_observations(returns)?;
        let priors = match_priors(&Self::PARAMS, &["sigma"], priors)?;
        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let centered_ss = returns.iter().map(|r| (r - mean) * (r - mean)).sum();
        Ok(Self { priors, dt: lag as f64 / TRADING_DAYS_PER_YEAR, n, mean, centered_ss })
    }

    /// Year fraction covered by one return.
    pub fn dt(&self) -> f64 {
        self.dt
    }
}

impl PosteriorModel for HistoricalGbmModel {
    fn priors(&self) -> &[PriorSpec] {
        &self.priors
    }

    fn log_likelihood(&self, params: &[f64]) -> f64 {
        let (mu, sigma) = (params[0], params[1]);
        let scale = sigma * self.dt.sqrt();
        if !(scale > 0.0) {
            return f64::NEG_INFINITY;
        }
        let loc = mu * self.dt;
        let ss = self.centered_ss + self.n * (self.mean - loc) * (self.mean - loc);
        -self.n * (LN_SQRT_2PI + scale.ln()) - 0.5 * ss / (scale * scale)
    }

    fn initial_guess(&self) -> Vec<f64> {
        let sd = if self.n > 1.0 { (self.centered_ss / (self.n - 1.0)).sqrt() } else { 0.0 };
        let sigma = (sd / self.dt.sqrt()).max(1e-3);
        vec![self.mean / self.dt, sigma]
    }
}

/// ImpliedVolModel — a single Black–Scholes volatility behind observed calls.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpliedVolModel {
    priors: Vec<PriorSpec>,
    prices: Array1<f64>,
    strikes: Array1<f64>,
    spot: f64,
    rate: f64,
    maturity: f64,
}

impl ImpliedVolModel {
    pub const PARAMS: [&'static str; 2] = ["sigma", "obs_sigma"];

    /// Build the model from observed call prices and their strikes.
    ///
    /// # Errors
    /// - `CalibError::EmptyObservations` / `NonFiniteObservation`.
    /// - `CalibError::StrikeCountMismatch` unless `strikes.len() == prices.len()`.
    /// - `CalibError::InvalidModelInput` for non-positive spot, maturity or
    ///   strike, or a non-finite rate.
    /// - Prior errors from [`match_priors`].
    pub fn new(
        prices: &[f64], strikes: &[f64], spot: f64, rate: f64, maturity: f64,
        priors: &[PriorSpec],
    ) -> CalibResult<Self> {
        validate_observations(prices)?;
        if strikes.len() != prices.len() {
            return Err(CalibError::StrikeCountMismatch {
                prices: prices.len(),
                strikes: strikes.len(),
            });
        }
        for (name, value) in [("spot", spot), ("maturity", maturity)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(CalibError::InvalidModelInput { name, value });
            }
        }
        if !rate.is_finite() {
            return Err(CalibError::InvalidModelInput { name: "rate", value: rate });
        }
        if let Some(&bad) = strikes.iter().find(|k| !(k.is_finite() && **k > 0.0)) {
            return Err(CalibError::InvalidModelInput { name: "strike", value: bad });
        }
        let priors = match_priors(&Self::PARAMS, &Self::PARAMS, priors)?;
        Ok(Self {
            priors,
            prices: Array1::from(prices.to_vec()),
            strikes: Array1::from(strikes.to_vec()),
            spot,
            rate,
            maturity,
        })
    }

    fn model_prices(&self, sigma: f64) -> impl Iterator<Item = f64> + '_ {
        self.strikes.iter().map(move |&k| bs_call_price(self.spot, k, self.rate, self.maturity, sigma))
    }
}

impl PosteriorModel for ImpliedVolModel {
    fn priors(&self) -> &[PriorSpec] {
        &self.priors
    }

    fn log_likelihood(&self, params: &[f64]) -> f64 {
        let (sigma, obs_sigma) = (params[0], params[1]);
        if !(sigma >= 0.0 && obs_sigma > 0.0) {
            return f64::NEG_INFINITY;
        }
        let ss: f64 =
            self.prices.iter().zip(self.model_prices(sigma)).map(|(c, m)| (c - m) * (c - m)).sum();
        let n = self.prices.len() as f64;
        -n * (LN_SQRT_2PI + obs_sigma.ln()) - 0.5 * ss / (obs_sigma * obs_sigma)
    }

    /// Mean of per-quote implied vols, and the RMS pricing error at that vol.
    fn initial_guess(&self) -> Vec<f64> {
        let vols: Vec<f64> = self
            .prices
            .iter()
            .zip(self.strikes.iter())
            .filter_map(|(&c, &k)| invert_call(c, self.spot, k, self.rate, self.maturity))
            .collect();
        let sigma = if vols.is_empty() { 0.2 } else { vols.iter().sum::<f64>() / vols.len() as f64 };
        let n = self.prices.len() as f64;
        let rms = (self
            .prices
            .iter()
            .zip(self.model_prices(sigma))
            .map(|(c, m)| (c - m) * (c - m))
            .sum::<f64>()
            / n)
            .sqrt();
        vec![sigma, rms.max(0.01)]
    }
}

// ---- Helper methods ----

fn validate_observations(obs: &[f64]) -> CalibResult<()> {
    if obs.is_empty() {
        return Err(CalibError::EmptyObservations);
    }
    if let Some((index, &value)) = obs.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(CalibError::NonFiniteObservation { index, value });
    }
    Ok(())
}

/// Bisection for the Black–Scholes volatility reproducing `price`.
///
/// Returns `None` when `price` lies outside the attainable range on
/// `[1e-4, 5]`.
fn invert_call(price: f64, spot: f64, strike: f64, rate: f64, maturity: f64) -> Option<f64> {
    let (mut lo, mut hi) = (1e-4, 5.0);
    let f = |s: f64| bs_call_price(spot, strike, rate, maturity, s) - price;
    if f(lo) > 0.0 || f(hi) < 0.0 {
        return None;
    }
    for _ in 0..100 {
        let mid = 0.5 * (lo + hi);
        if f(mid) > 0.0 {
            hi = mid;
        } else {
            lo = mid;
        }
        if hi - lo < 1e-10 {
            break;
        }
    }
    Some(0.5 * (lo + hi))
}
