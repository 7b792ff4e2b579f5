//! statistical_tests::normality — accept/reject helpers used as acceptance tests.
//!
//! Purpose
//! -------
//! Reduce a normality test to a boolean at significance level `alpha`:
//! the sample "looks normal" iff the p-value exceeds `alpha`. This is the
//! validation harness applied to simulated log-returns (expected normal)
//! and price levels (expected not normal).
//!
//! Conventions
//! -----------
//! - [`is_normal`] uses Shapiro–Wilk up to [`SW_MAX_N`] observations and
//!   Jarque–Bera above it, so full ensembles can be judged;
//!   [`is_normal_with`] runs exactly the selected test.
//! - `alpha` is validated before the sample.
use crate::statistical_tests::{
    errors::NormalityResult,
    jarque_bera::JBOutcome,
    shapiro_wilk::{SW_MAX_N, SWOutcome},
    validation::validate_alpha,
};

/// Which normality test to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalityTest {
    #[default]
    ShapiroWilk,
    JarqueBera,
}

/// is_normal — accept/reject at level `alpha`.
///
/// Shapiro–Wilk for `n ≤ SW_MAX_N`; Jarque–Bera beyond, where the Royston
/// approximation is not calibrated and the χ²(2) asymptotics are accurate.
///
/// Returns
/// -------
/// `true` iff the p-value is strictly greater than `alpha`.
///
/// Errors
/// ------
/// - `NormalityError::InvalidAlpha` unless `0 < alpha < 1`.
/// - Sample validation errors (`n ≥ 3`, finite, non-zero range).
///
/// Examples
/// --------
/// ```rust
/// use rust_gbm::statistical_tests::is_normal;
///
/// let skewed = [148.0, 154.0, 158.0, 160.0, 161.0, 162.0, 166.0, 170.0, 182.0, 195.0, 236.0];
/// assert!(!is_normal(&skewed, 0.05).unwrap());
/// ```
pub fn is_normal(sample: &[f64], alpha: f64) -> NormalityResult<bool> {
    let test = if sample.len() > SW_MAX_N {
        log::debug!("n = {} exceeds {SW_MAX_N}; using Jarque–Bera", sample.len());
        NormalityTest::JarqueBera
    } else {
        NormalityTest::ShapiroWilk
    };
    is_normal_with(sample, alpha, test)
}

/// is_normal_with — accept/reject at level `alpha` with the chosen test.
pub fn is_normal_with(sample: &[f64], alpha: f64, test: NormalityTest) -> NormalityResult<bool> {
    validate_alpha(alpha)?;
    let p_value = match test {
        NormalityTest::ShapiroWilk => SWOutcome::shapiro_wilk(sample)?.p_value(),
        NormalityTest::JarqueBera => JBOutcome::jarque_bera(sample)?.p_value(),
    };
    Ok(p_value > alpha)
}
