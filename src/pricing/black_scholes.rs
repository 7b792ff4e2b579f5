//! pricing::black_scholes — European call price under Black–Scholes.
//!
//! Purpose
//! -------
//! Provide the deterministic mean function of the implied-volatility
//! likelihood: `C = S·Φ(d1) − K·e^{−rT}·Φ(d2)` with
//! `d1 = [ln(S/K) + (r + ½σ²)T] / (σ√T)` and `d2 = d1 − σ√T`.
//!
//! Invariants & assumptions
//! ------------------------
//! - No dividends, constant rate, European exercise only.
//! - Inputs are not validated here; callers (the implied-vol model and the
//!   market layer) guarantee `S > 0`, `K > 0`, `T > 0`, `σ ≥ 0`.
//! - `σ√T = 0` degenerates to the discounted intrinsic value
//!   `max(S − K e^{−rT}, 0)`, the `σ → 0⁺` limit of the formula.
use crate::pricing::normal::std_normal_cdf;

/// bs_call_price — Black–Scholes price of a European call.
///
/// Parameters
/// ----------
/// - `spot`: `S`, current underlying price.
/// - `strike`: `K`.
/// - `rate`: `r`, continuously compounded risk-free rate.
/// - `maturity`: `T`, time to expiry in years.
/// - `sigma`: `σ`, annualized volatility.
///
/// Examples
/// --------
/// ```
/// use rust_gbm::pricing::bs_call_price;
///
/// let c = bs_call_price(100.0, 100.0, 0.05, 1.0, 0.2);
/// assert!((c - 10.4506).abs() < 1e-4);
/// ```
pub fn bs_call_price(spot: f64, strike: f64, rate: f64, maturity: f64, sigma: f64) -> f64 {
    let discounted_strike = strike * (-rate * maturity).exp();
    let vol_sqrt_t = sigma * maturity.sqrt();
    if vol_sqrt_t <= 0.0 {
        return (spot - discounted_strike).max(0.0);
    }
    let d1 = ((spot / strike).ln() + (rate + 0.5 * sigma * sigma) * maturity) / vol_sqrt_t;
    let d2 = d1 - vol_sqrt_t;
    spot * std_normal_cdf(d1) - discounted_strike * std_normal_cdf(d2)
}
