//! market::source — the market-data seam.
//!
//! Data acquisition is always an explicit call on a [`MarketDataSource`];
//! nothing in the crate fetches data on its own. [`InMemoryMarketData`]
//! serves tests and offline use from values supplied up front.
use crate::market::{
    errors::{MarketError, MarketResult},
    options::RawOptionQuote,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Read-only access to prices and option chains for one underlying.
pub trait MarketDataSource {
    /// Daily closes with `start ≤ date ≤ end`, ascending by date.
    fn close_prices(&self, start: NaiveDate, end: NaiveDate) -> MarketResult<Vec<(NaiveDate, f64)>>;

    /// Latest spot price of the underlying.
    fn spot(&self) -> MarketResult<f64>;

    /// Listed option expiries, ascending.
    fn expiries(&self) -> MarketResult<Vec<NaiveDate>>;

    /// Call quotes for one listed expiry.
    fn call_chain(&self, expiry: NaiveDate) -> MarketResult<Vec<RawOptionQuote>>;
}

/// In-memory [`MarketDataSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryMarketData {
    spot: f64,
    closes: Vec<(NaiveDate, f64)>,
    chains: BTreeMap<NaiveDate, Vec<RawOptionQuote>>,
}

impl InMemoryMarketData {
    /// # Errors
    /// - [`MarketError::InvalidSpot`] unless `spot` is finite and `> 0`.
    pub fn new(spot: f64) -> MarketResult<Self> {
        if !(spot.is_finite() && spot > 0.0) {
            return Err(MarketError::InvalidSpot { value: spot });
        }
        Ok(Self { spot, closes: Vec::new(), chains: BTreeMap::new() })
    }

    /// Replace the close history; entries are sorted by date.
    pub fn with_closes(mut self, mut closes: Vec<(NaiveDate, f64)>) -> Self {
        closes.sort_by_key(|(date, _)| *date);
        self.closes = closes;
        self
    }

    /// Add (or replace) the call chain for `expiry`.
    pub fn with_chain(mut self, expiry: NaiveDate, quotes: Vec<RawOptionQuote>) -> Self {
        self.chains.insert(expiry, quotes);
        self
    }
}

impl MarketDataSource for InMemoryMarketData {
    fn close_prices(&self, start: NaiveDate, end: NaiveDate) -> MarketResult<Vec<(NaiveDate, f64)>> {
        let window: Vec<(NaiveDate, f64)> =
            self.closes.iter().copied().filter(|(d, _)| *d >= start && *d <= end).collect();
        if window.is_empty() {
            return Err(MarketError::EmptyHistory { start, end });
        }
        Ok(window)
    }

    fn spot(&self) -> MarketResult<f64> {
        Ok(self.spot)
    }

    fn expiries(&self) -> MarketResult<Vec<NaiveDate>> {
        Ok(self.chains.keys().copied().collect())
    }

    fn call_chain(&self, expiry: NaiveDate) -> MarketResult<Vec<RawOptionQuote>> {
        self.chains.get(&expiry).cloned().ok_or_else(|| MarketError::UnknownExpiry {
            requested: expiry,
            available: self.chains.keys().copied().collect(),
        })
    }
}
