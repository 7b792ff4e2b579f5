//! market::errors — failures while reading or filtering market data.
use chrono::NaiveDate;

pub type MarketResult<T> = Result<T, MarketError>;

#[derive(Debug, Clone, PartialEq)]
pub enum MarketError {
    // ---- Filtering ----
    /// No quote survived the moneyness window.
    EmptyFilter { spot: f64, lower: f64, upper: f64 },
    /// Moneyness bounds must satisfy `0 < lower < upper` and be finite.
    InvalidMoneynessWindow { lower: f64, upper: f64 },

    // ---- Expiries ----
    /// Requested expiry is not listed by the source.
    UnknownExpiry { requested: NaiveDate, available: Vec<NaiveDate> },
    /// Fewer listed expiries than the default selection needs.
    NotEnoughExpiries { needed: usize, available: usize },
    /// Expiry is on or before the valuation date.
    NonPositiveMaturity { expiry: NaiveDate, valuation: NaiveDate },

    // ---- Source ----
    /// Spot price must be finite and strictly positive.
    InvalidSpot { value: f64 },
    /// No closing prices in the requested window.
    EmptyHistory { start: NaiveDate, end: NaiveDate },
    /// Error reported by an external data source.
    Source { message: String },
}

impl std::error::Error for MarketError {}

impl std::fmt::Display for MarketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Filtering ----
            MarketError::EmptyFilter { spot, lower, upper } => {
                write!(
                    f,
                    "No call quotes with strike strictly between {:.4} and {:.4} (spot {spot:.4}).",
                    lower * spot,
                    upper * spot
                )
            }
            MarketError::InvalidMoneynessWindow { lower, upper } => {
                write!(f, "Invalid moneyness window ({lower}, {upper}); need 0 < lower < upper.")
            }

            // ---- Expiries ----
            MarketError::UnknownExpiry { requested, available } => {
                let listed: Vec<String> = available.iter().map(|d| d.to_string()).collect();
                write!(
                    f,
                    "Expiry {requested} is not listed. Available expiries: [{}]",
                    listed.join(", ")
                )
            }
            MarketError::NotEnoughExpiries { needed, available } => {
                write!(f, "Need at least {needed} listed expiries, found {available}.")
            }
            MarketError::NonPositiveMaturity { expiry, valuation } => {
                write!(f, "Expiry {expiry} is not after the valuation date {valuation}.")
            }

            // ---- Source ----
            MarketError::InvalidSpot { value } => {
                write!(f, "Spot price must be finite and positive, got {value}.")
            }
            MarketError::EmptyHistory { start, end } => {
                write!(f, "No closing prices between {start} and {end}.")
            }
            MarketError::Source { message } => write!(f, "Market data source error: {message}"),
        }
    }
}

impl From<anyhow::Error> for MarketError {
    fn from(err: anyhow::Error) -> Self {
        MarketError::Source { message: format!("{err:#}") }
    }
}
