//! market::options — from a raw call chain to calibration-ready quotes.
//!
//! Purpose
//! -------
//! Apply the filters used before implied-volatility calibration: keep calls
//! whose strike lies strictly inside a moneyness window around spot, floor
//! the observed price at [`MIN_OPTION_PRICE`], and compute the year fraction
//! to expiry.
//!
//! Conventions
//! -----------
//! - Maturity is calendar days / 365.
//! - Quotes with a non-finite strike, last price or implied vol are dropped
//!   before the window is applied.
use crate::market::errors::{MarketError, MarketResult};
use chrono::NaiveDate;

/// Floor applied to observed option prices.
pub const MIN_OPTION_PRICE: f64 = 0.01;
/// Calendar days per year for time-to-maturity.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// A call quote as delivered by a data source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawOptionQuote {
    pub strike: f64,
    pub last_price: f64,
    pub implied_vol: f64,
}

/// A filtered call quote: `strike > 0`, `observed_price ≥ MIN_OPTION_PRICE`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionQuote {
    pub strike: f64,
    pub observed_price: f64,
    pub market_implied_vol: f64,
}

/// Strict moneyness window `lower·S < K < upper·S`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoneynessFilter {
    lower: f64,
    upper: f64,
}

impl MoneynessFilter {
    /// # Errors
    /// - [`MarketError::InvalidMoneynessWindow`] unless `0 < lower < upper`,
    ///   both finite.
    pub fn new(lower: f64, upper: f64) -> MarketResult<Self> {
        if !(lower.is_finite() && upper.is_finite() && lower > 0.0 && lower < upper) {
            return Err(MarketError::InvalidMoneynessWindow { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn contains(&self, spot: f64, strike: f64) -> bool {
        strike > self.lower * spot && strike < self.upper * spot
    }

    /// filter — calibration-ready quotes from a raw chain.
    ///
    /// # Errors
    /// - [`MarketError::InvalidSpot`] for a non-positive or non-finite spot.
    /// - [`MarketError::EmptyFilter`] when no quote survives.
    pub fn filter(&self, chain: &[RawOptionQuote], spot: f64) -> MarketResult<Vec<OptionQuote>> {
        if !(spot.is_finite() && spot > 0.0) {
            return Err(MarketError::InvalidSpot { value: spot });
        }
        let quotes: Vec<OptionQuote> = chain
            .iter()
            .filter(|q| {
                q.strike.is_finite() && q.last_price.is_finite() && q.implied_vol.is_finite()
            })
            .filter(|q| self.contains(spot, q.strike))
            .map(|q| OptionQuote {
                strike: q.strike,
                observed_price: q.last_price.max(MIN_OPTION_PRICE),
                market_implied_vol: q.implied_vol.max(0.0),
            })
            .collect();
        if quotes.is_empty() {
            return Err(MarketError::EmptyFilter { spot, lower: self.lower, upper: self.upper });
        }
        Ok(quotes)
    }
}

impl Default for MoneynessFilter {
    fn default() -> Self {
        Self { lower: 0.9, upper: 1.1 }
    }
}

/// Year fraction from `valuation` to `expiry`.
///
/// # Errors
/// - [`MarketError::NonPositiveMaturity`] when `expiry ≤ valuation`.
pub fn time_to_maturity(valuation: NaiveDate, expiry: NaiveDate) -> MarketResult<f64> {
    let days = (expiry - valuation).num_days();
    if days <= 0 {
        return Err(MarketError::NonPositiveMaturity { expiry, valuation });
    }
    Ok(days as f64 / DAYS_PER_YEAR)
}

/// Mean of the source-reported implied vols (`NaN` for no quotes).
pub fn mean_implied_vol(quotes: &[OptionQuote]) -> f64 {
    quotes.iter().map(|q| q.market_implied_vol).sum::<f64>() / quotes.len() as f64
}
