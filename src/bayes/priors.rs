//! bayes::priors — declarative prior specifications.
//!
//! Purpose
//! -------
//! Describe the prior on each latent parameter as plain data. The sampling
//! engine consumes these to evaluate the log-prior and to decide how a
//! parameter is mapped onto the unconstrained sampling space.
//!
//! Key behaviors
//! -------------
//! - [`Prior::Normal`] parameters live on ℝ and are sampled directly.
//! - [`Prior::HalfNormal`] parameters live on `(0, ∞)` and are sampled as
//!   `u` with `x = softplus(u)`; the log-Jacobian `ln σ(u)` is added to the
//!   log-density.
//! - [`match_priors`] checks a user-supplied prior list against the names
//!   a calibration mode expects and returns it in the mode's order.
//!
//! Invariants & assumptions
//! ------------------------
//! - Scales are finite and `> 0`; Normal locations are finite.
//! - Log-densities are normalized (include the `ln √(2π)` constant).
use crate::{
    bayes::errors::{CalibError, CalibResult},
    optimization::numerical_stability::transformations::{
        log_softplus_jacobian, safe_softplus, safe_softplus_inv,
    },
};
use statrs::consts::LN_SQRT_2PI;
use std::f64::consts::LN_2;

/// Prior family for a single latent parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Prior {
    Normal { mu: f64, sigma: f64 },
    HalfNormal { sigma: f64 },
}

impl Prior {
    /// `true` when the parameter is constrained to `(0, ∞)`.
    pub fn is_positive(&self) -> bool {
        matches!(self, Prior::HalfNormal { .. })
    }

    /// Log-density at a constrained value `x`.
    ///
    /// `HalfNormal` returns `-∞` for `x < 0`.
    pub fn log_density(&self, x: f64) -> f64 {
        match *self {
            Prior::Normal { mu, sigma } => {
                let z = (x - mu) / sigma;
                -LN_SQRT_2PI - sigma.ln() - 0.5 * z * z
            }
            Prior::HalfNormal { sigma } => {
                if x < 0.0 {
                    return f64::NEG_INFINITY;
                }
                let z = x / sigma;
                LN_2 - LN_SQRT_2PI - sigma.ln() - 0.5 * z * z
            }
        }
    }

    /// Map a constrained value onto the sampling space.
    pub fn to_unconstrained(&self, x: f64) -> f64 {
        if self.is_positive() { safe_softplus_inv(x) } else { x }
    }

    /// Map a sampling-space value back to the parameter's support.
    pub fn to_constrained(&self, u: f64) -> f64 {
        if self.is_positive() { safe_softplus(u) } else { u }
    }

    /// `ln |dx/du|` at sampling-space value `u`.
    pub fn log_jacobian(&self, u: f64) -> f64 {
        if self.is_positive() { log_softplus_jacobian(u) } else { 0.0 }
    }

    /// Check hyper-parameters.
    ///
    /// # Errors
    /// - [`CalibError::InvalidPrior`] for a non-finite location or a scale
    ///   that is not finite and `> 0`.
    pub fn validate(&self, name: &str) -> CalibResult<()> {
        let (mu, sigma) = match *self {
            Prior::Normal { mu, sigma } => (mu, sigma),
            Prior::HalfNormal { sigma } => (0.0, sigma),
        };
        if !mu.is_finite() {
            return Err(CalibError::InvalidPrior {
                name: name.to_string(),
                reason: "Location must be finite.",
            });
        }
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(CalibError::InvalidPrior {
                name: name.to_string(),
                reason: "Scale must be finite and strictly positive.",
            });
        }
        Ok(())
    }
}

/// A named prior, one per latent parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorSpec {
    pub name: String,
    pub prior: Prior,
}

impl PriorSpec {
    pub fn new(name: impl Into<String>, prior: Prior) -> Self {
        Self { name: name.into(), prior }
    }

    pub fn normal(name: impl Into<String>, mu: f64, sigma: f64) -> Self {
        Self::new(name, Prior::Normal { mu, sigma })
    }

    pub fn half_normal(name: impl Into<String>, sigma: f64) -> Self {
        Self::new(name, Prior::HalfNormal { sigma })
    }
}

/// match_priors — align user priors with the parameters a mode expects.
///
/// Parameters
/// ----------
/// - `expected`: latent parameter names in model order.
/// - `positive`: names that must be constrained to `(0, ∞)`.
/// - `priors`: user-supplied specifications, any order.
///
/// Returns
/// -------
/// The priors reordered to match `expected`.
///
/// Errors
/// ------
/// - `CalibError::PriorMismatch` when counts differ, a name is missing, or a
///   name is repeated.
/// - `CalibError::InvalidPrior` for bad hyper-parameters, or a Normal prior
///   on a parameter listed in `positive`.
pub fn match_priors(
    expected: &[&str], positive: &[&str], priors: &[PriorSpec],
) -> CalibResult<Vec<PriorSpec>> {
    let mismatch = || CalibError::PriorMismatch {
        expected: expected.iter().map(|s| s.to_string()).collect(),
        found: priors.iter().map(|p| p.name.clone()).collect(),
    };
    if priors.len() != expected.len() {
        return Err(mismatch());
    }
    let mut ordered = Vec::with_capacity(expected.len());
    for name in expected {
        let mut hits = priors.iter().filter(|p| p.name == *name);
        let spec = match (hits.next(), hits.next()) {
            (Some(spec), None) => spec,
            _ => return Err(mismatch()),
        };
        spec.prior.validate(name)?;
        if positive.contains(name) && !spec.prior.is_positive() {
            return Err(CalibError::InvalidPrior {
                name: name.to_string(),
                reason: "Parameter is strictly positive and needs a HalfNormal prior.",
            });
        }
        ordered.push(spec.clone());
    }
    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Normalized log-densities for both families.
    // - Softplus round trip and the Jacobian term.
    // - Matching, reordering and rejection in `match_priors`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Log-densities agree with closed-form values.
    //
    // Given
    // -----
    // - Normal(0, 1) at 0, HalfNormal(1) at 0 and at -1.
    //
    // Expect
    // ------
    // - `-ln √(2π)`, `ln 2 - ln √(2π)` and `-∞` respectively.
    fn log_density_matches_closed_form() {
        let normal = Prior::Normal { mu: 0.0, sigma: 1.0 };
        let half = Prior::HalfNormal { sigma: 1.0 };

        assert_abs_diff_eq!(normal.log_density(0.0), -0.918_938_533_204_672_7, epsilon = 1e-12);
        assert_abs_diff_eq!(half.log_density(0.0), -0.225_791_352_644_727_4, epsilon = 1e-12);
        assert_eq!(half.log_density(-1.0), f64::NEG_INFINITY);
    }

    #[test]
    fn positive_priors_round_trip_through_softplus() {
        let half = Prior::HalfNormal { sigma: 0.5 };
        for x in [1e-3, 0.2, 3.0, 50.0] {
            assert_abs_diff_eq!(half.to_constrained(half.to_unconstrained(x)), x, epsilon = 1e-9);
        }
        let normal = Prior::Normal { mu: 0.0, sigma: 10.0 };
        assert_eq!(normal.to_unconstrained(-2.5), -2.5);
        assert_eq!(normal.log_jacobian(-2.5), 0.0);
        assert_abs_diff_eq!(half.log_jacobian(0.0), -LN_2, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Priors are reordered by name and mismatches are rejected.
    //
    // Given
    // -----
    // - Expected `["mu", "sigma"]`, priors listed as `sigma, mu`.
    // - A list missing `mu`, a duplicated name, and a Normal `sigma`.
    //
    // Expect
    // ------
    // - Reordered output; `PriorMismatch` twice; `InvalidPrior` once.
    fn match_priors_reorders_and_rejects() {
        // Arrange
        let expected = ["mu", "sigma"];
        let swapped = [PriorSpec::half_normal("sigma", 10.0), PriorSpec::normal("mu", 0.0, 10.0)];

        // Act
        let ordered = match_priors(&expected, &["sigma"], &swapped).unwrap();

        // Assert
        assert_eq!(ordered[0].name, "mu");
        assert_eq!(ordered[1].name, "sigma");

        let missing = [PriorSpec::half_normal("sigma", 10.0)];
        match match_priors(&expected, &["sigma"], &missing) {
            Err(CalibError::PriorMismatch { .. }) => (),
            other => panic!("expected PriorMismatch, got {other:?}"),
        }
        let duplicated =
            [PriorSpec::half_normal("sigma", 10.0), PriorSpec::half_normal("sigma", 1.0)];
        match match_priors(&expected, &["sigma"], &duplicated) {
            Err(CalibError::PriorMismatch { .. }) => (),
            other => panic!("expected PriorMismatch, got {other:?}"),
        }
        let unconstrained = [PriorSpec::normal("mu", 0.0, 1.0), PriorSpec::normal("sigma", 0.0, 1.0)];
        match match_priors(&expected, &["sigma"], &unconstrained) {
            Err(CalibError::InvalidPrior { name, .. }) => assert_eq!(name, "sigma"),
            other => panic!("expected InvalidPrior, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_non_positive_scale() {
        match (Prior::HalfNormal { sigma: 0.0 }).validate("sigma") {
            Err(CalibError::InvalidPrior { .. }) => (),
            other => panic!("expected InvalidPrior, got {other:?}"),
        }
    }
}
