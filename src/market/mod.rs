//! market — market-data access and option-quote preparation.
//!
//! - [`MarketDataSource`]: trait over close history, spot, listed expiries
//!   and call chains. Implementations live outside the crate (HTTP clients,
//!   databases); [`InMemoryMarketData`] is provided for tests and offline
//!   runs.
//! - [`MoneynessFilter`]: strict `0.9·S < K < 1.1·S` window by default,
//!   with the [`MIN_OPTION_PRICE`] floor on observed prices.
//! - [`time_to_maturity`]: calendar days / 365, strictly positive.

pub mod errors;
pub mod options;
pub mod source;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{MarketError, MarketResult};
pub use self::options::{
    DAYS_PER_YEAR, MIN_OPTION_PRICE, MoneynessFilter, OptionQuote, RawOptionQuote,
    mean_implied_vol, time_to_maturity,
};
pub use self::source::{InMemoryMarketData, MarketDataSource};
