//! Parametric distribution families and the sampler.
//!
//! [`DistributionSpec`] is a closed set of families with their
//! parameters. [`sample`] validates a spec and draws a fixed number of
//! independent observations from an injected random source.
//!
//! # Supported Families
//!
//! | Family | Parameters | Mean | Variance |
//! |---|---|---|---|
//! | Normal | μ, σ | μ | σ² |
//! | Uniform | low, high | (a+b)/2 | (b−a)²/12 |
//! | Exponential | scale θ | θ | θ² |
//! | Bimodal | μ₁, σ₁, μ₂, σ₂ | (μ₁+μ₂)/2 | mixture, see [`variance`] |
//! | Binomial | n, p | np | np(1−p) |
//! | Poisson | λ | λ | λ |
//!
//! Discrete families produce integral-valued `f64` observations.
//!
//! [`variance`]: DistributionSpec::variance

use rand::Rng;
use rand_distr::{Binomial, Distribution, Exp, Normal, Poisson};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Result, SimulationError};
use crate::special;

/// A distribution family together with its parameters.
///
/// Values are immutable and cheap to copy. Parameter constraints are
/// checked by [`validate`](Self::validate), which [`sample`] calls first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum DistributionSpec {
    /// Gaussian with the given mean and standard deviation.
    Normal { mean: f64, std_dev: f64 },
    /// Continuous uniform. Draws fall in `[low, high)`; the density is
    /// `1/(high − low)` on the closed interval `[low, high]`.
    Uniform { low: f64, high: f64 },
    /// Exponential with scale `θ = 1/λ`.
    Exponential { scale: f64 },
    /// Two Gaussian halves, concatenated in draw order.
    Bimodal {
        mean1: f64,
        std_dev1: f64,
        mean2: f64,
        std_dev2: f64,
    },
    /// Number of successes in `trials` Bernoulli(`success_prob`) trials.
    Binomial { trials: u64, success_prob: f64 },
    /// Poisson counts with the given rate λ.
    Poisson { rate: f64 },
}

impl DistributionSpec {
    /// Checks parameter constraints.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidParameter`] when:
    /// - Normal/Bimodal: a mean is not finite, or a σ is negative or not finite
    /// - Uniform: `low >= high` or a bound is not finite
    /// - Exponential: `scale <= 0` or not finite
    /// - Binomial: `success_prob` outside `[0, 1]`
    /// - Poisson: `rate <= 0` or not finite
    pub fn validate(&self) -> Result<()> {
        match *self {
            DistributionSpec::Normal { mean, std_dev } => check_gaussian("Normal", mean, std_dev),
            DistributionSpec::Uniform { low, high } => {
                if !low.is_finite() || !high.is_finite() || low >= high || !(high - low).is_finite()
                {
                    return Err(SimulationError::invalid(format!(
                        "Uniform requires finite low < high, got low={low}, high={high}"
                    )));
                }
                Ok(())
            }
            DistributionSpec::Exponential { scale } => {
                if !scale.is_finite() || scale <= 0.0 {
                    return Err(SimulationError::invalid(format!(
                        "Exponential requires finite scale > 0, got scale={scale}"
                    )));
                }
                Ok(())
            }
            DistributionSpec::Bimodal {
                mean1,
                std_dev1,
                mean2,
                std_dev2,
            } => {
                check_gaussian("Bimodal (first mode)", mean1, std_dev1)?;
                check_gaussian("Bimodal (second mode)", mean2, std_dev2)
            }
            DistributionSpec::Binomial { success_prob, .. } => {
                if !(0.0..=1.0).contains(&success_prob) {
                    return Err(SimulationError::invalid(format!(
                        "Binomial requires success_prob in [0, 1], got {success_prob}"
                    )));
                }
                Ok(())
            }
            DistributionSpec::Poisson { rate } => {
                if !rate.is_finite() || rate <= 0.0 {
                    return Err(SimulationError::invalid(format!(
                        "Poisson requires finite rate > 0, got rate={rate}"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Short family name, used in log fields and labels.
    pub fn family_name(&self) -> &'static str {
        match self {
            DistributionSpec::Normal { .. } => "normal",
            DistributionSpec::Uniform { .. } => "uniform",
            DistributionSpec::Exponential { .. } => "exponential",
            DistributionSpec::Bimodal { .. } => "bimodal",
            DistributionSpec::Binomial { .. } => "binomial",
            DistributionSpec::Poisson { .. } => "poisson",
        }
    }

    /// Whether observations are counts.
    pub fn is_discrete(&self) -> bool {
        matches!(
            self,
            DistributionSpec::Binomial { .. } | DistributionSpec::Poisson { .. }
        )
    }

    /// Theoretical mean.
    ///
    /// For Bimodal this is the equal-weight mixture mean, which matches an
    /// even-length sample exactly and an odd-length one up to a one-element
    /// imbalance.
    pub fn mean(&self) -> f64 {
        match *self {
            DistributionSpec::Normal { mean, .. } => mean,
            DistributionSpec::Uniform { low, high } => (low + high) / 2.0,
            DistributionSpec::Exponential { scale } => scale,
            DistributionSpec::Bimodal { mean1, mean2, .. } => (mean1 + mean2) / 2.0,
            DistributionSpec::Binomial {
                trials,
                success_prob,
            } => trials as f64 * success_prob,
            DistributionSpec::Poisson { rate } => rate,
        }
    }

    /// Theoretical variance.
    ///
    /// Bimodal uses the equal-weight mixture variance
    /// `(σ₁² + σ₂²)/2 + (μ₁ − μ₂)²/4`.
    pub fn variance(&self) -> f64 {
        match *self {
            DistributionSpec::Normal { std_dev, .. } => std_dev * std_dev,
            DistributionSpec::Uniform { low, high } => {
                let range = high - low;
                range * range / 12.0
            }
            DistributionSpec::Exponential { scale } => scale * scale,
            DistributionSpec::Bimodal {
                mean1,
                std_dev1,
                mean2,
                std_dev2,
            } => {
                let gap = mean1 - mean2;
                (std_dev1 * std_dev1 + std_dev2 * std_dev2) / 2.0 + gap * gap / 4.0
            }
            DistributionSpec::Binomial {
                trials,
                success_prob,
            } => trials as f64 * success_prob * (1.0 - success_prob),
            DistributionSpec::Poisson { rate } => rate,
        }
    }

    /// Theoretical standard deviation.
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Density at `x`: the PDF for continuous families, the PMF for
    /// discrete ones (zero off the integer support).
    ///
    /// Degenerate Gaussians (σ = 0) have no density and return 0.
    pub fn density(&self, x: f64) -> f64 {
        match *self {
            DistributionSpec::Normal { mean, std_dev } => gaussian_pdf(x, mean, std_dev),
            DistributionSpec::Uniform { low, high } => {
                if x >= low && x <= high {
                    1.0 / (high - low)
                } else {
                    0.0
                }
            }
            DistributionSpec::Exponential { scale } => {
                if x < 0.0 {
                    0.0
                } else {
                    (-x / scale).exp() / scale
                }
            }
            DistributionSpec::Bimodal {
                mean1,
                std_dev1,
                mean2,
                std_dev2,
            } => 0.5 * (gaussian_pdf(x, mean1, std_dev1) + gaussian_pdf(x, mean2, std_dev2)),
            DistributionSpec::Binomial {
                trials,
                success_prob,
            } => match support_point(x) {
                Some(k) if k <= trials => binomial_pmf(trials, success_prob, k),
                _ => 0.0,
            },
            DistributionSpec::Poisson { rate } => match support_point(x) {
                Some(k) => {
                    let k = k as f64;
                    (k * rate.ln() - rate - special::ln_gamma(k + 1.0)).exp()
                }
                None => 0.0,
            },
        }
    }
}

fn check_gaussian(label: &str, mean: f64, std_dev: f64) -> Result<()> {
    if !mean.is_finite() || !std_dev.is_finite() || std_dev < 0.0 {
        return Err(SimulationError::invalid(format!(
            "{label} requires finite mean and std_dev >= 0, got mean={mean}, std_dev={std_dev}"
        )));
    }
    Ok(())
}

fn gaussian_pdf(x: f64, mean: f64, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }
    special::standard_normal_pdf((x - mean) / std_dev) / std_dev
}

fn support_point(x: f64) -> Option<u64> {
    if x >= 0.0 && x.fract() == 0.0 && x.is_finite() {
        Some(x as u64)
    } else {
        None
    }
}

fn binomial_pmf(trials: u64, p: f64, k: u64) -> f64 {
    // Endpoints avoid ln(0).
    if p == 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    if p == 1.0 {
        return if k == trials { 1.0 } else { 0.0 };
    }
    let (kf, nf) = (k as f64, trials as f64);
    (special::ln_binomial_coefficient(trials, k) + kf * p.ln() + (nf - kf) * (1.0 - p).ln())
        .exp()
}

/// Draws exactly `count` independent observations from `spec`.
///
/// Parameters are validated even when `count == 0`, which returns an
/// empty sequence.
///
/// Bimodal draws `count / 2` values from the first mode followed by the
/// remaining `count - count / 2` from the second; the halves are not
/// interleaved.
///
/// # Errors
/// [`SimulationError::InvalidParameter`] for parameters rejected by
/// [`DistributionSpec::validate`].
///
/// # Examples
/// ```
/// use prob_laws::distributions::{sample, DistributionSpec};
/// use prob_laws::random::create_rng;
///
/// let mut rng = create_rng(7);
/// let spec = DistributionSpec::Poisson { rate: 5.0 };
/// let draws = sample(&spec, 100, &mut rng).unwrap();
/// assert_eq!(draws.len(), 100);
/// assert!(draws.iter().all(|x| x.fract() == 0.0));
///
/// let bad = DistributionSpec::Uniform { low: 5.0, high: 5.0 };
/// assert!(sample(&bad, 10, &mut rng).is_err());
/// ```
pub fn sample<R: Rng + ?Sized>(
    spec: &DistributionSpec,
    count: usize,
    rng: &mut R,
) -> Result<Vec<f64>> {
    spec.validate()?;
    trace!(family = spec.family_name(), count, "sampling");

    let data = match *spec {
        DistributionSpec::Normal { mean, std_dev } => draw_gaussian(mean, std_dev, count, rng)?,
        DistributionSpec::Uniform { low, high } => {
            (0..count).map(|_| rng.random_range(low..high)).collect()
        }
        DistributionSpec::Exponential { scale } => {
            let dist = Exp::new(1.0 / scale).map_err(|e| {
                SimulationError::invalid(format!("Exponential(scale={scale}): {e}"))
            })?;
            draw(&dist, count, rng)
        }
        DistributionSpec::Bimodal {
            mean1,
            std_dev1,
            mean2,
            std_dev2,
        } => {
            let half = count / 2;
            let mut data = draw_gaussian(mean1, std_dev1, half, rng)?;
            data.extend(draw_gaussian(mean2, std_dev2, count - half, rng)?);
            data
        }
        DistributionSpec::Binomial {
            trials,
            success_prob,
        } => {
            let dist = Binomial::new(trials, success_prob).map_err(|e| {
                SimulationError::invalid(format!(
                    "Binomial(trials={trials}, success_prob={success_prob}): {e}"
                ))
            })?;
            (0..count).map(|_| dist.sample(rng) as f64).collect()
        }
        DistributionSpec::Poisson { rate } => {
            let dist = Poisson::new(rate)
                .map_err(|e| SimulationError::invalid(format!("Poisson(rate={rate}): {e}")))?;
            draw(&dist, count, rng)
        }
    };
    Ok(data)
}

fn draw_gaussian<R: Rng + ?Sized>(
    mean: f64,
    std_dev: f64,
    count: usize,
    rng: &mut R,
) -> Result<Vec<f64>> {
    let dist = Normal::new(mean, std_dev).map_err(|e| {
        SimulationError::invalid(format!("Normal(mean={mean}, std_dev={std_dev}): {e}"))
    })?;
    Ok(draw(&dist, count, rng))
}

fn draw<D: Distribution<f64>, R: Rng + ?Sized>(dist: &D, count: usize, rng: &mut R) -> Vec<f64> {
    (0..count).map(|_| dist.sample(rng)).collect()
}

// ============================================================================
// Fixed-shape families
// ============================================================================

/// The families offered by the central-limit and small-sample
/// demonstrations, each with a fixed shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// N(0, 1).
    Normal,
    /// U[0, 1).
    Uniform,
    /// Exponential with scale 1.
    Exponential,
    /// N(−2, 1) and N(2, 1) halves.
    Bimodal,
}

impl Family {
    /// Every family, in presentation order.
    pub const ALL: [Family; 4] = [
        Family::Normal,
        Family::Uniform,
        Family::Exponential,
        Family::Bimodal,
    ];

    /// The fixed parameterization of this family.
    pub fn spec(self) -> DistributionSpec {
        match self {
            Family::Normal => DistributionSpec::Normal {
                mean: 0.0,
                std_dev: 1.0,
            },
            Family::Uniform => DistributionSpec::Uniform {
                low: 0.0,
                high: 1.0,
            },
            Family::Exponential => DistributionSpec::Exponential { scale: 1.0 },
            Family::Bimodal => DistributionSpec::Bimodal {
                mean1: -2.0,
                std_dev1: 1.0,
                mean2: 2.0,
                std_dev2: 1.0,
            },
        }
    }

    /// Expected value that a running mean converges to.
    pub fn theoretical_mean(self) -> f64 {
        self.spec().mean()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::stats;

    fn all_specs() -> Vec<DistributionSpec> {
        vec![
            DistributionSpec::Normal {
                mean: 50.0,
                std_dev: 10.0,
            },
            DistributionSpec::Uniform {
                low: -1.0,
                high: 1.0,
            },
            DistributionSpec::Exponential { scale: 2.0 },
            Family::Bimodal.spec(),
            DistributionSpec::Binomial {
                trials: 20,
                success_prob: 0.3,
            },
            DistributionSpec::Poisson { rate: 5.0 },
        ]
    }

    // --- validation ---

    #[test]
    fn test_uniform_degenerate_rejected() {
        let spec = DistributionSpec::Uniform {
            low: 5.0,
            high: 5.0,
        };
        let mut rng = create_rng(1);
        assert!(matches!(
            sample(&spec, 10, &mut rng),
            Err(SimulationError::InvalidParameter(_))
        ));
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_invalid_parameters() {
        let bad = [
            DistributionSpec::Uniform {
                low: 3.0,
                high: 1.0,
            },
            DistributionSpec::Exponential { scale: 0.0 },
            DistributionSpec::Exponential { scale: -1.0 },
            DistributionSpec::Binomial {
                trials: 10,
                success_prob: 1.5,
            },
            DistributionSpec::Binomial {
                trials: 10,
                success_prob: -0.1,
            },
            DistributionSpec::Poisson { rate: 0.0 },
            DistributionSpec::Normal {
                mean: 0.0,
                std_dev: -1.0,
            },
            DistributionSpec::Normal {
                mean: f64::NAN,
                std_dev: 1.0,
            },
            DistributionSpec::Bimodal {
                mean1: 0.0,
                std_dev1: 1.0,
                mean2: 0.0,
                std_dev2: f64::INFINITY,
            },
        ];
        let mut rng = create_rng(2);
        for spec in bad {
            assert!(
                matches!(
                    sample(&spec, 5, &mut rng),
                    Err(SimulationError::InvalidParameter(_))
                ),
                "{spec:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_zero_count_still_validates() {
        let mut rng = create_rng(3);
        let bad = DistributionSpec::Poisson { rate: -2.0 };
        assert!(sample(&bad, 0, &mut rng).is_err());
        let good = DistributionSpec::Poisson { rate: 2.0 };
        assert!(sample(&good, 0, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_binomial_endpoints_valid() {
        let mut rng = create_rng(4);
        let never = DistributionSpec::Binomial {
            trials: 8,
            success_prob: 0.0,
        };
        assert!(sample(&never, 20, &mut rng).unwrap().iter().all(|&x| x == 0.0));
        let always = DistributionSpec::Binomial {
            trials: 8,
            success_prob: 1.0,
        };
        assert!(sample(&always, 20, &mut rng).unwrap().iter().all(|&x| x == 8.0));
    }

    // --- sampling ---

    #[test]
    fn test_sample_lengths() {
        let mut rng = create_rng(5);
        for spec in all_specs() {
            for count in [0, 1, 2, 7, 100] {
                let data = sample(&spec, count, &mut rng).unwrap();
                assert_eq!(data.len(), count, "{spec:?} count={count}");
            }
        }
    }

    #[test]
    fn test_sample_deterministic_for_seed() {
        for spec in all_specs() {
            let a = sample(&spec, 50, &mut create_rng(99)).unwrap();
            let b = sample(&spec, 50, &mut create_rng(99)).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_uniform_in_range() {
        let mut rng = create_rng(6);
        let spec = DistributionSpec::Uniform {
            low: 2.0,
            high: 3.0,
        };
        let data = sample(&spec, 1000, &mut rng).unwrap();
        assert!(data.iter().all(|&x| (2.0..3.0).contains(&x)));
    }

    #[test]
    fn test_discrete_support() {
        let mut rng = create_rng(7);
        let binom = DistributionSpec::Binomial {
            trials: 20,
            success_prob: 0.5,
        };
        let data = sample(&binom, 500, &mut rng).unwrap();
        assert!(data.iter().all(|&x| x.fract() == 0.0 && (0.0..=20.0).contains(&x)));
        assert!(binom.is_discrete());
    }

    #[test]
    fn test_sample_moments_match_theory() {
        let mut rng = create_rng(8);
        for spec in all_specs() {
            let data = sample(&spec, 20_000, &mut rng).unwrap();
            let m = stats::mean(&data).unwrap();
            let sd = spec.std_dev();
            // 5 standard errors
            let tol = 5.0 * sd / (data.len() as f64).sqrt();
            assert!(
                (m - spec.mean()).abs() < tol,
                "{spec:?}: mean {m} vs {}",
                spec.mean()
            );
            let emp_sd = stats::std_dev(&data).unwrap();
            assert!(
                (emp_sd - sd).abs() < 0.05 * sd,
                "{spec:?}: sd {emp_sd} vs {sd}"
            );
        }
    }

    #[test]
    fn test_bimodal_halves_not_interleaved() {
        let spec = DistributionSpec::Bimodal {
            mean1: -100.0,
            std_dev1: 1.0,
            mean2: 100.0,
            std_dev2: 1.0,
        };
        let mut rng = create_rng(9);
        let data = sample(&spec, 11, &mut rng).unwrap();
        // floor(11 / 2) = 5 from the first mode, 6 from the second
        assert!(data[..5].iter().all(|&x| x < 0.0));
        assert!(data[5..].iter().all(|&x| x > 0.0));
    }

    // --- theory ---

    #[test]
    fn test_family_specs() {
        assert_eq!(Family::Normal.theoretical_mean(), 0.0);
        assert_eq!(Family::Uniform.theoretical_mean(), 0.5);
        assert_eq!(Family::Exponential.theoretical_mean(), 1.0);
        assert_eq!(Family::Bimodal.theoretical_mean(), 0.0);
        // mixture variance: (1 + 1)/2 + 16/4
        assert!((Family::Bimodal.spec().variance() - 5.0).abs() < 1e-12);
        for family in Family::ALL {
            assert!(family.spec().validate().is_ok());
        }
    }

    #[test]
    fn test_density_values() {
        let n = DistributionSpec::Normal {
            mean: 0.0,
            std_dev: 1.0,
        };
        assert!((n.density(0.0) - 0.3989422804014327).abs() < 1e-12);

        let u = DistributionSpec::Uniform {
            low: 0.0,
            high: 2.0,
        };
        assert_eq!(u.density(1.0), 0.5);
        assert_eq!(u.density(0.0), 0.5);
        assert_eq!(u.density(2.0), 0.5);
        assert_eq!(u.density(2.5), 0.0);
        assert_eq!(u.density(-0.5), 0.0);

        let e = DistributionSpec::Exponential { scale: 1.0 };
        assert!((e.density(0.0) - 1.0).abs() < 1e-12);
        assert_eq!(e.density(-1.0), 0.0);

        let p = DistributionSpec::Poisson { rate: 5.0 };
        // P(X = 5) = 5^5 e^-5 / 120
        let expected = 5.0_f64.powi(5) * (-5.0_f64).exp() / 120.0;
        assert!((p.density(5.0) - expected).abs() < 1e-9);
        assert_eq!(p.density(2.5), 0.0);
    }

    #[test]
    fn test_binomial_pmf_sums_to_one() {
        let b = DistributionSpec::Binomial {
            trials: 20,
            success_prob: 0.3,
        };
        let total: f64 = (0..=20).map(|k| b.density(k as f64)).sum();
        assert!((total - 1.0).abs() < 1e-8, "sum = {total}");
        assert_eq!(b.density(21.0), 0.0);
    }

    #[test]
    fn test_spec_serde_tagged() {
        let spec = DistributionSpec::Binomial {
            trials: 20,
            success_prob: 0.5,
        };
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"family\":\"binomial\""), "{json}");
        let back: DistributionSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }
}
