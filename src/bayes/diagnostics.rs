//! bayes::diagnostics — convergence diagnostics for multi-chain output.
//!
//! Purpose
//! -------
//! Summarize whether independent chains agree (split-R̂) and how many
//! effectively independent draws they contain (ESS), following Gelman et
//! al., *Bayesian Data Analysis* (3rd ed.), §11.4–11.5.
//!
//! Key behaviors
//! -------------
//! - [`split_rhat`]: each chain is cut into two halves (the middle draw of
//!   an odd-length chain is dropped) and the potential scale reduction
//!   `√(var⁺/W)` is computed over the `2m` half-chains.
//! - [`effective_sample_size`]: autocorrelations from the multi-chain
//!   variogram, summed over Geyer's initial positive, monotone sequence.
//!
//! Invariants & assumptions
//! ------------------------
//! - All chains have the same length.
//! - Degenerate inputs (fewer than two draws per half-chain, zero
//!   within-chain variance) yield `NaN`, which callers treat as
//!   "not converged".

/// Sample mean and unbiased variance (`NaN` variance for fewer than 2 values).
fn mean_var(xs: &[f64]) -> (f64, f64) {
    let n = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / n;
    if xs.len() < 2 {
        return (mean, f64::NAN);
    }
    let var = xs.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1.0);
    (mean, var)
}

/// Within-chain variance `W` and `var⁺` for equal-length chains.
fn variance_components(chains: &[&[f64]]) -> (f64, f64) {
    let n = chains[0].len() as f64;
    let stats: Vec<(f64, f64)> = chains.iter().map(|c| mean_var(c)).collect();
    let w = stats.iter().map(|s| s.1).sum::<f64>() / stats.len() as f64;
    let means: Vec<f64> = stats.iter().map(|s| s.0).collect();
    let b_over_n = if means.len() > 1 { mean_var(&means).1 } else { 0.0 };
    (w, (n - 1.0) / n * w + b_over_n)
}

/// split_rhat — potential scale reduction factor over split chains.
///
/// Returns `NaN` when a half-chain has fewer than two draws or when the
/// pooled within-chain variance is zero.
pub fn split_rhat(chains: &[Vec<f64>]) -> f64 {
    if chains.is_empty() {
        return f64::NAN;
    }
    let half = chains[0].len() / 2;
    if half < 2 {
        return f64::NAN;
    }
    let halves: Vec<&[f64]> = chains
        .iter()
        .flat_map(|c| [&c[..half], &c[c.len() - half..]])
        .collect();
    let (w, var_plus) = variance_components(&halves);
    if !(w > 0.0) {
        return f64::NAN;
    }
    (var_plus / w).sqrt()
}

/// effective_sample_size — multi-chain ESS with Geyer truncation.
///
/// Returns `NaN` for chains shorter than four draws or with zero variance.
pub fn effective_sample_size(chains: &[Vec<f64>]) -> f64 {
    if chains.is_empty() || chains[0].len() < 4 {
        return f64::NAN;
    }
    let m = chains.len();
    let n = chains[0].len();
    let slices: Vec<&[f64]> = chains.iter().map(|c| c.as_slice()).collect();
    let (_, var_plus) = variance_components(&slices);
    if !(var_plus > 0.0) {
        return f64::NAN;
    }
    let rho = |t: usize| -> f64 {
        let variogram = chains
            .iter()
            .map(|c| c.windows(t + 1).map(|w| (w[t] - w[0]) * (w[t] - w[0])).sum::<f64>())
            .sum::<f64>()
            / (m * (n - t)) as f64;
        1.0 - variogram / (2.0 * var_plus)
    };

    let mut tau = -1.0;
    let mut prev_pair = f64::INFINITY;
    let mut t = 0;
    while t + 1 < n {
        let rho_even = if t == 0 { 1.0 } else { rho(t) };
        let pair = (rho_even + rho(t + 1)).min(prev_pair);
        if pair <= 0.0 {
            break;
        }
        tau += 2.0 * pair;
        prev_pair = pair;
        t += 2;
    }
    let total = (m * n) as f64;
    total / tau.max(1.0 / total.log10())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use rand_distr::{Distribution, StandardNormal};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - R̂ ≈ 1 for well-mixed chains and R̂ ≫ 1 for chains stuck apart.
    // - ESS near the draw count for white noise and far below it for a
    //   strongly autocorrelated AR(1) chain.
    // - NaN on degenerate input.
    // -------------------------------------------------------------------------

    fn white_noise(seed: u64, len: usize) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..len).map(|_| StandardNormal.sample(&mut rng)).collect()
    }

    #[test]
    // Purpose
    // -------
    // R̂ separates agreeing chains from chains centered apart.
    //
    // Given
    // -----
    // - Four white-noise chains of 1000 draws; then the same chains with
    //   chain k shifted by 3k.
    //
    // Expect
    // ------
    // - `R̂ < 1.01` for the first set, `R̂ > 1.5` for the second.
    fn split_rhat_detects_disagreeing_chains() {
        // Arrange
        let mixed: Vec<Vec<f64>> = (0..4).map(|s| white_noise(s, 1000)).collect();
        let apart: Vec<Vec<f64>> = mixed
            .iter()
            .enumerate()
            .map(|(k, c)| c.iter().map(|x| x + 3.0 * k as f64).collect())
            .collect();

        // Act / Assert
        assert!(split_rhat(&mixed) < 1.01);
        assert!(split_rhat(&apart) > 1.5);
    }

    #[test]
    // Purpose
    // -------
    // ESS tracks autocorrelation.
    //
    // Given
    // -----
    // - Two white-noise chains of 2000 draws.
    // - Two AR(1) chains with coefficient 0.9 built from the same noise.
    //
    // Expect
    // ------
    // - White noise: ESS within [2800, 5200].
    // - AR(1): ESS below 600 (theory: 4000·0.1/1.9 ≈ 210).
    fn ess_tracks_autocorrelation() {
        let noise: Vec<Vec<f64>> = (10..12).map(|s| white_noise(s, 2000)).collect();
        let ar: Vec<Vec<f64>> = noise
            .iter()
            .map(|c| {
                let mut x = 0.0;
                c.iter()
                    .map(|e| {
                        x = 0.9 * x + e;
                        x
                    })
                    .collect()
            })
            .collect();

        let ess_noise = effective_sample_size(&noise);
        let ess_ar = effective_sample_size(&ar);

        assert!((2800.0..=5200.0).contains(&ess_noise), "white-noise ESS = {ess_noise}");
        assert!(ess_ar < 600.0, "AR(1) ESS = {ess_ar}");
    }

    #[test]
    fn degenerate_chains_give_nan() {
        assert!(split_rhat(&[vec![1.0; 10], vec![1.0; 10]]).is_nan());
        assert!(split_rhat(&[vec![0.1, 0.2, 0.3]]).is_nan());
        assert!(effective_sample_size(&[vec![2.0; 50]]).is_nan());
    }
}
