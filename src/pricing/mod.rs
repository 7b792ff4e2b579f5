//! pricing — closed-form option pricing used by the implied-volatility model.
//!
//! - [`bs_call_price`]: Black–Scholes European call.
//! - [`std_normal_cdf`] / [`std_normal_inv_cdf`]: standard normal helpers,
//!   shared with the Shapiro–Wilk test.

pub mod black_scholes;
pub mod normal;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::black_scholes::bs_call_price;
pub use self::normal::{std_normal_cdf, std_normal_inv_cdf};
