//! aggregation::multi_scale — repeat a calibration across horizons or expiries.
//!
//! Purpose
//! -------
//! Run one independent calibration per scale (return lag or option expiry)
//! and collect the posterior summaries in input order, so that parameter
//! estimates can be compared across time scales.
//!
//! Key behaviors
//! -------------
//! - [`aggregate`] is the generic skip-and-continue loop: a failing scale is
//!   logged with `log::warn!` and dropped; the rest proceed.
//! - [`MultiScaleAggregator::across_horizons`]: historical mode per lag;
//!   [`MultiScaleAggregator::across_horizons_from_source`] pulls the closes
//!   for a date range from a [`MarketDataSource`] first.
//! - [`MultiScaleAggregator::across_expiries`] /
//!   [`MultiScaleAggregator::across_listed_expiries`]: implied-vol mode per
//!   expiry with the moneyness filter, price floor and day-count maturity.
//! - [`MultiScaleAggregator::calibrate_expiry`]: a full report for one
//!   expiry (default: the fourth listed); errors are returned, not skipped.
//!
//! Invariants & assumptions
//! ------------------------
//! - Output order follows input order; skipped scales leave no gap.
//! - Scales never share state; each builds its own model.
use crate::{
    aggregation::errors::{ScaleError, ScaleResult},
    bayes::{
        calibrator::{CalibrationMode, CalibrationOutcome, Calibrator},
        errors::CalibError,
        sampler::{HamiltonianSampler, PosteriorSampler},
        summary::{PosteriorDraws, PosteriorSummary},
    },
    market::{
        errors::MarketError,
        options::{MoneynessFilter, OptionQuote, mean_implied_vol, time_to_maturity},
        source::MarketDataSource,
    },
    returns::log_returns,
};
use chrono::NaiveDate;
use std::{collections::BTreeMap, fmt};

/// Zero-based index of the expiry used when none is requested.
pub const DEFAULT_EXPIRY_INDEX: usize = 3;

/// The scale a calibration point belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// Return lag in trading days.
    Horizon { lag: usize },
    /// Option expiry and its year fraction from the valuation date.
    Expiry { expiry: NaiveDate, maturity: f64 },
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scale::Horizon { lag } => write!(f, "horizon {lag}"),
            Scale::Expiry { expiry, .. } => write!(f, "expiry {expiry}"),
        }
    }
}

/// Posterior summaries for one scale.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationPoint {
    pub scale: Scale,
    pub summaries: BTreeMap<String, PosteriorSummary>,
    /// Mean source-reported implied vol of the filtered quotes (expiries only).
    pub market_implied_vol: Option<f64>,
}

/// Single-expiry comparison between the posterior and market implied vols.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpiryReport {
    pub expiry: NaiveDate,
    pub maturity: f64,
    pub spot: f64,
    pub sigma: PosteriorSummary,
    pub obs_sigma: PosteriorSummary,
    pub market_implied_vol: f64,
    pub quotes: Vec<OptionQuote>,
    pub draws: PosteriorDraws,
}

/// aggregate — calibrate every scale, skipping the ones that fail.
///
/// Parameters
/// ----------
/// - `scales`: scale identifiers, in the order results should appear.
/// - `calibrate_one`: per-scale calibration.
///
/// Returns
/// -------
/// The successful points in input order.
///
/// Examples
/// --------
/// ```rust
/// use rust_gbm::aggregation::{aggregate, CalibrationPoint, Scale, ScaleError};
/// use rust_gbm::market::MarketError;
///
/// let points = aggregate(&[1_usize, 5, 10], |&lag| {
///     if lag == 5 {
///         return Err(ScaleError::Market(MarketError::EmptyFilter { spot: 1.0, lower: 0.9, upper: 1.1 }));
///     }
///     Ok(CalibrationPoint { scale: Scale::Horizon { lag }, summaries: Default::default(), market_implied_vol: None })
/// });
/// assert_eq!(points.len(), 2);
/// ```
pub fn aggregate<T, F>(scales: &[T], mut calibrate_one: F) -> Vec<CalibrationPoint>
where
    T: fmt::Display,
    F: FnMut(&T) -> ScaleResult<CalibrationPoint>,
{
    scales
        .iter()
        .filter_map(|scale| match calibrate_one(scale) {
            Ok(point) => Some(point),
            Err(err) => {
                log::warn!("Skipping scale {scale}: {err}");
                None
            }
        })
        .collect()
}

/// Runs a [`Calibrator`] across horizons or expiries.
#[derive(Debug, Clone)]
pub struct MultiScaleAggregator<S = HamiltonianSampler> {
    calibrator: Calibrator<S>,
    filter: MoneynessFilter,
}

impl<S: PosteriorSampler> MultiScaleAggregator<S> {
    pub fn new(calibrator: Calibrator<S>) -> Self {
        Self { calibrator, filter: MoneynessFilter::default() }
    }

    pub fn with_filter(mut self, filter: MoneynessFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn calibrator(&self) -> &Calibrator<S> {
        &self.calibrator
    }

    /// Historical calibration of `(mu, sigma)` for each return lag.
    pub fn across_horizons(&self, prices: &[f64], horizons: &[usize]) -> Vec<CalibrationPoint> {
        aggregate(horizons, |&lag| {
            let returns = log_returns(prices, lag)?;
            let mode = CalibrationMode::HistoricalReturns { lag };
            let outcome = self.calibrator.calibrate(returns.as_slice(), &mode, None)?;
            Ok(CalibrationPoint {
                scale: Scale::Horizon { lag },
                summaries: outcome.summaries,
                market_implied_vol: None,
            })
        })
    }

    /// Historical calibration per lag on the source's closes in
    /// `start ≤ date ≤ end`.
    ///
    /// # Errors
    /// - [`ScaleError::Market`] when the source has no closes in the range
    ///   ([`MarketError::EmptyHistory`]) or cannot be read.
    pub fn across_horizons_from_source<D: MarketDataSource>(
        &self, source: &D, start: NaiveDate, end: NaiveDate, horizons: &[usize],
    ) -> ScaleResult<Vec<CalibrationPoint>> {
        let prices: Vec<f64> =
            source.close_prices(start, end)?.into_iter().map(|(_, close)| close).collect();
        Ok(self.across_horizons(&prices, horizons))
    }

    /// Implied-vol calibration for each requested expiry.
    pub fn across_expiries<D: MarketDataSource>(
        &self, source: &D, valuation: NaiveDate, expiries: &[NaiveDate], rate: f64,
    ) -> Vec<CalibrationPoint> {
        aggregate(expiries, |&expiry| {
            let run = self.implied_vol_at(source, valuation, expiry, rate)?;
            Ok(CalibrationPoint {
                scale: Scale::Expiry { expiry, maturity: run.maturity },
                market_implied_vol: Some(mean_implied_vol(&run.quotes)),
                summaries: run.outcome.summaries,
            })
        })
    }

    /// Implied-vol calibration for the first `max_expiries` listed expiries.
    ///
    /// # Errors
    /// - [`ScaleError::Market`] when the source cannot list expiries.
    pub fn across_listed_expiries<D: MarketDataSource>(
        &self, source: &D, valuation: NaiveDate, max_expiries: usize, rate: f64,
    ) -> ScaleResult<Vec<CalibrationPoint>> {
        let listed = source.expiries()?;
        let take = max_expiries.min(listed.len());
        Ok(self.across_expiries(source, valuation, &listed[..take], rate))
    }

    /// Full report for one expiry.
    ///
    /// `expiry = None` selects the listed expiry at [`DEFAULT_EXPIRY_INDEX`].
    ///
    /// # Errors
    /// - [`MarketError::UnknownExpiry`] (listing the available dates) for an
    ///   expiry that is not listed.
    /// - [`MarketError::NotEnoughExpiries`] when the default is requested
    ///   but fewer expiries are listed.
    /// - Any maturity, filter or calibration error for that expiry.
    pub fn calibrate_expiry<D: MarketDataSource>(
        &self, source: &D, valuation: NaiveDate, expiry: Option<NaiveDate>, rate: f64,
    ) -> ScaleResult<ExpiryReport> {
        let listed = source.expiries()?;
        let expiry = match expiry {
            Some(requested) if listed.contains(&requested) => requested,
            Some(requested) => {
                return Err(MarketError::UnknownExpiry { requested, available: listed }.into());
            }
            None => *listed.get(DEFAULT_EXPIRY_INDEX).ok_or(MarketError::NotEnoughExpiries {
                needed: DEFAULT_EXPIRY_INDEX + 1,
                available: listed.len(),
            })?,
        };
        let mut run = self.implied_vol_at(source, valuation, expiry, rate)?;
        let mut take = |name: &str| {
            run.outcome.summaries.remove(name).ok_or_else(|| {
                ScaleError::from(CalibError::InferenceFailure {
                    diagnostic: format!("no posterior summary for '{name}'"),
                })
            })
        };
        let sigma = take("sigma")?;
        let obs_sigma = take("obs_sigma")?;
        Ok(ExpiryReport {
            expiry,
            maturity: run.maturity,
            spot: run.spot,
            sigma,
            obs_sigma,
            market_implied_vol: mean_implied_vol(&run.quotes),
            quotes: run.quotes,
            draws: run.outcome.draws,
        })
    }

    fn implied_vol_at<D: MarketDataSource>(
        &self, source: &D, valuation: NaiveDate, expiry: NaiveDate, rate: f64,
    ) -> ScaleResult<ExpiryRun> {
        let maturity = time_to_maturity(valuation, expiry)?;
        let spot = source.spot()?;
        let quotes = self.filter.filter(&source.call_chain(expiry)?, spot)?;
        let (prices, strikes): (Vec<f64>, Vec<f64>) =
            quotes.iter().map(|q| (q.observed_price, q.strike)).unzip();
        let mode = CalibrationMode::ImpliedVolatility { spot, rate, maturity, strikes };
        let outcome = self.calibrator.calibrate(&prices, &mode, None)?;
        Ok(ExpiryRun { maturity, spot, quotes, outcome })
    }
}

struct ExpiryRun {
    maturity: f64,
    spot: f64,
    quotes: Vec<OptionQuote>,
    outcome: CalibrationOutcome,
}
