//! statistical_tests::shapiro_wilk — Shapiro–Wilk W test for normality.
//!
//! Purpose
//! -------
//! Test the null hypothesis that a sample was drawn from a normal
//! distribution, using Royston's (1992, 1995) approximation of the W
//! coefficients and of the null distribution of W (algorithm AS R94).
//!
//! Key behaviors
//! -------------
//! - Coefficients: `mᵢ = Φ⁻¹((i − 0.375)/(n + 0.25))`; the two outermost
//!   weights are polynomial corrections in `u = 1/√n`, the rest are
//!   `mᵢ` rescaled to unit norm.
//! - Statistic: `W = (Σ aᵢ (x₍ₙ₊₁₋ᵢ₎ − x₍ᵢ₎))² / Σ(xᵢ − x̄)²`, capped at 1.
//! - p-value: exact for `n = 3`; otherwise `ln(1 − W)` (after a
//!   small-sample transform for `n ≤ 11`) is treated as normal with
//!   polynomial mean and log-scale, and the upper tail is reported.
//!
//! Invariants & assumptions
//! ------------------------
//! - `3 ≤ n ≤ 5000`, all observations finite, non-zero range.
//! - p-values lie in `[0, 1]`; `1e-99` is reported when the small-sample
//!   transform is undefined (W far in the lower tail).
//!
//! Testing notes
//! -------------
//! - Reference values come from the 11-observation weight data of
//!   Shapiro & Wilk (1965) and the sequence 1..=20.
use crate::{
    pricing::normal::{std_normal_cdf, std_normal_inv_cdf},
    statistical_tests::{errors::NormalityResult, validation::validate_sample},
};
use std::f64::consts::{FRAC_PI_3, PI};

/// Smallest sample the approximation supports.
pub const SW_MIN_N: usize = 3;
/// Largest sample the approximation supports.
pub const SW_MAX_N: usize = 5000;

const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

/// SWOutcome — result of a Shapiro–Wilk test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SWOutcome {
    n: usize,
    w: f64,
    p_value: f64,
}

impl SWOutcome {
    /// Run the Shapiro–Wilk test on `data`.
    ///
    /// Parameters
    /// ----------
    /// - `data`: sample of `3 ≤ n ≤ 5000` finite observations, any order.
    ///
    /// Returns
    /// -------
    /// `NormalityResult<SWOutcome>` with the W statistic and its p-value.
    ///
    /// Errors
    /// ------
    /// - Any error from [`validate_sample`].
    ///
    /// Examples
    /// --------
    /// ```rust
    /// use rust_gbm::statistical_tests::SWOutcome;
    ///
    /// let weights = [148.0, 154.0, 158.0, 160.0, 161.0, 162.0, 166.0, 170.0, 182.0, 195.0, 236.0];
    /// let out = SWOutcome::shapiro_wilk(&weights).unwrap();
    /// assert!((out.w() - 0.7888).abs() < 1e-3);
    /// assert!(out.p_value() < 0.01);
    /// ```
    pub fn shapiro_wilk(data: &[f64]) -> NormalityResult<Self> {
        validate_sample(data, SW_MIN_N, SW_MAX_N)?;
        let n = data.len();
        let mut x = data.to_vec();
        x.sort_by(f64::total_cmp);

        let a = coefficients(n);
        let mean = x.iter().sum::<f64>() / n as f64;
        let ssq: f64 = x.iter().map(|v| (v - mean) * (v - mean)).sum();
        let num: f64 = a.iter().enumerate().map(|(i, ai)| ai * (x[n - 1 - i] - x[i])).sum();
        let w = (num * num / ssq).min(1.0);

        Ok(Self { n, w, p_value: p_value(w, n) })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// The W statistic in `(0, 1]`.
    pub fn w(&self) -> f64 {
        self.w
    }

    pub fn p_value(&self) -> f64 {
        self.p_value
    }
}

// ---- Helper methods ----

/// Horner evaluation of `c[0] + c[1]·x + c[2]·x² + …`.
fn poly(c: &[f64], x: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, &ci| acc * x + ci)
}

/// Positive weights for the `n / 2` outermost order-statistic differences.
fn coefficients(n: usize) -> Vec<f64> {
    let half = n / 2;
    if n == 3 {
        return vec![0.5_f64.sqrt()];
    }
    let an25 = n as f64 + 0.25;
    let m: Vec<f64> =
        (0..half).map(|i| std_normal_inv_cdf((i as f64 + 1.0 - 0.375) / an25)).collect();
    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / (n as f64).sqrt();
    let a1 = poly(&C1, rsn) - m[0] / ssumm2;

    let mut a = vec![0.0; half];
    a[0] = a1;
    let (first_scaled, fac) = if n > 5 {
        let a2 = -m[1] / ssumm2 + poly(&C2, rsn);
        a[1] = a2;
        let fac = ((summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1])
            / (1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2))
            .sqrt();
        (2, fac)
    } else {
        let fac = ((summ2 - 2.0 * m[0] * m[0]) / (1.0 - 2.0 * a1 * a1)).sqrt();
        (1, fac)
    };
    for i in first_scaled..half {
        a[i] = -m[i] / fac;
    }
    a
}

/// Royston's p-value for W at sample size `n`.
fn p_value(w: f64, n: usize) -> f64 {
    if n == 3 {
        return (6.0 / PI * (w.sqrt().asin() - FRAC_PI_3)).max(0.0);
    }
    let nf = n as f64;
    let w1 = (1.0 - w).ln();
    let (y, m, s) = if n <= 11 {
        let gamma = poly(&G, nf);
        if w1 >= gamma {
            return 1e-99;
        }
        (-(gamma - w1).ln(), poly(&C3, nf), poly(&C4, nf).exp())
    } else {
        let ln_n = nf.ln();
        (w1, poly(&C5, ln_n), poly(&C6, ln_n).exp())
    };
    // Upper tail, evaluated as Φ(−z) to keep precision for small p.
    std_normal_cdf(-(y - m) / s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistical_tests::errors::NormalityError;
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Published reference values for W and p (n = 11 and n = 20).
    // - The exact n = 3 branch.
    // - Input validation passthrough.
    //
    // They intentionally DO NOT cover:
    // - Size/power across random samples (see the integration tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Reproduce the classic Shapiro & Wilk weight example.
    //
    // Given
    // -----
    // - Weights of 11 men: 148 … 236 lb (right-skewed).
    //
    // Expect
    // ------
    // - `W ≈ 0.78881`, `p ≈ 0.006704`.
    fn shapiro_wilk_matches_weight_example() {
        // Arrange
        let weights =
            [148.0, 154.0, 158.0, 160.0, 161.0, 162.0, 166.0, 170.0, 182.0, 195.0, 236.0];

        // Act
        let out = SWOutcome::shapiro_wilk(&weights).unwrap();

        // Assert
        assert_eq!(out.n(), 11);
        assert_abs_diff_eq!(out.w(), 0.788_814_694_835, epsilon = 1e-6);
        assert_abs_diff_eq!(out.p_value(), 0.006_703_814, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Exercise the large-sample (n > 11) branch on an evenly spaced sample.
    //
    // Given
    // -----
    // - `1, 2, …, 20`.
    //
    // Expect
    // ------
    // - `W ≈ 0.96038`, `p ≈ 0.5514`; order of input does not matter.
    fn shapiro_wilk_matches_uniform_grid() {
        let mut data: Vec<f64> = (1..=20).map(f64::from).collect();
        data.reverse();
        let out = SWOutcome::shapiro_wilk(&data).unwrap();
        assert_abs_diff_eq!(out.w(), 0.960_375_183, epsilon = 1e-6);
        assert_abs_diff_eq!(out.p_value(), 0.551_371_743, epsilon = 1e-5);
    }

    #[test]
    fn shapiro_wilk_three_points_uses_exact_distribution() {
        let even = SWOutcome::shapiro_wilk(&[1.0, 2.0, 3.0]).unwrap();
        assert_abs_diff_eq!(even.w(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(even.p_value(), 1.0, epsilon = 1e-6);

        let skewed = SWOutcome::shapiro_wilk(&[1.0, 2.0, 4.0]).unwrap();
        assert_abs_diff_eq!(skewed.w(), 0.964_285_714, epsilon = 1e-8);
        assert_abs_diff_eq!(skewed.p_value(), 0.636_886_845, epsilon = 1e-7);
    }

    #[test]
    fn shapiro_wilk_rejects_constant_sample() {
        assert_eq!(SWOutcome::shapiro_wilk(&[2.0; 10]), Err(NormalityError::ZeroRange));
    }
}
