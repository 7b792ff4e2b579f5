//! statistical_tests::jarque_bera — moment-based normality test.
//!
//! `JB = n/6 · (S² + (K − 3)²/4)` with population skewness `S` and kurtosis
//! `K`; under normality `JB ~ χ²(2)` asymptotically. Cheaper than
//! Shapiro–Wilk and without an upper sample-size limit, but weak for small
//! `n`.
use crate::statistical_tests::{
    errors::{NormalityError, NormalityResult},
    validation::validate_sample,
};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Minimum sample size accepted by [`JBOutcome::jarque_bera`].
pub const JB_MIN_N: usize = 3;
/// Degrees of freedom of the asymptotic null distribution.
const JB_DOF: f64 = 2.0;

/// JBOutcome — result of a Jarque–Bera test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JBOutcome {
    skewness: f64,
    kurtosis: f64,
    stat: f64,
    p_value: f64,
}

impl JBOutcome {
    /// Run the Jarque–Bera test on `data`.
    ///
    /// Errors
    /// ------
    /// - Any error from [`validate_sample`] (`n ≥ 3`, finite, non-zero range).
    /// - `NormalityError::Distribution` if the χ² reference cannot be built.
    pub fn jarque_bera(data: &[f64]) -> NormalityResult<Self> {
        validate_sample(data, JB_MIN_N, usize::MAX)?;
        let reference = chi_squared(JB_DOF)?;
        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        let (m2, m3, m4) = data.iter().fold((0.0, 0.0, 0.0), |(m2, m3, m4), &v| {
            let d = v - mean;
            let d2 = d * d;
            (m2 + d2, m3 + d2 * d, m4 + d2 * d2)
        });
        let (m2, m3, m4) = (m2 / n, m3 / n, m4 / n);
        let skewness = m3 / m2.powf(1.5);
        let kurtosis = m4 / (m2 * m2);
        let stat = n / 6.0 * (skewness * skewness + 0.25 * (kurtosis - 3.0).powi(2));
        Ok(Self {
            skewness,
            kurtosis,
            stat,
            p_value: reference.sf(stat),
        })
    }

    pub fn skewness(&self) -> f64 {
        self.skewness
    }

    /// Non-excess kurtosis (3 under normality).
    pub fn kurtosis(&self) -> f64 {
        self.kurtosis
    }

    pub fn stat(&self) -> f64 {
        self.stat
    }

    pub fn p_value(&self) -> f64 {
        self.p_value
    }
}

fn chi_squared(freedom: f64) -> NormalityResult<ChiSquared> {
    ChiSquared::new(freedom).map_err(|err| NormalityError::Distribution { reason: err.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    // Purpose
    // -------
    // Verify moments, statistic and χ²(2) p-value on a skewed sample.
    //
    // Given
    // -----
    // - The 11-observation weight data.
    //
    // Expect
    // ------
    // - `S ≈ 1.6785`, `K ≈ 4.9913`, `JB ≈ 6.9828`, `p = e^{−JB/2} ≈ 0.03046`.
    fn jarque_bera_matches_hand_computation() {
        // Arrange
        let weights =
            [148.0, 154.0, 158.0, 160.0, 161.0, 162.0, 166.0, 170.0, 182.0, 195.0, 236.0];

        // Act
        let out = JBOutcome::jarque_bera(&weights).unwrap();

        // Assert
        assert_abs_diff_eq!(out.skewness(), 1.678_543_902, epsilon = 1e-8);
        assert_abs_diff_eq!(out.kurtosis(), 4.991_297_749, epsilon = 1e-8);
        assert_abs_diff_eq!(out.stat(), 6.982_848_237, epsilon = 1e-8);
        assert_abs_diff_eq!(out.p_value(), 0.030_457_466, epsilon = 1e-8);
    }

    #[test]
    fn jarque_bera_symmetric_sample_has_zero_skew() {
        let data: Vec<f64> = (1..=20).map(f64::from).collect();
        let out = JBOutcome::jarque_bera(&data).unwrap();
        assert_abs_diff_eq!(out.skewness(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out.p_value(), 0.545_512_198, epsilon = 1e-8);
    }

    #[test]
    fn invalid_reference_distribution_is_an_error() {
        match chi_squared(-1.0) {
            Err(NormalityError::Distribution { reason }) => assert!(!reason.is_empty()),
            other => panic!("expected Distribution, got {other:?}"),
        }
        assert!(chi_squared(JB_DOF).is_ok());
    }
}
