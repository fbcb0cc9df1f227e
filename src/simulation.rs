//! Simulations behind each probability-law demonstration.
//!
//! | Demonstration | Routine |
//! |---|---|
//! | Central limit theorem | [`repeated_sample_means`], [`clt_progression`] |
//! | Law of large numbers | [`cumulative_running_mean`] |
//! | Regression to the mean | [`regression_to_mean_trial`] |
//! | Three-sigma rule | [`sigma_coverage`] |
//! | Law of small numbers | [`small_sample_means`] |
//!
//! Every routine that draws takes its random source explicitly, except
//! [`small_sample_means`], which derives one generator per repetition
//! from a base seed.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::distributions::{sample, DistributionSpec, Family};
use crate::error::{Result, SimulationError};
use crate::random::iteration_rng;
use crate::special;
use crate::stats::{self, SummaryStatistics, WelfordAccumulator};

fn arithmetic_mean(data: &[f64]) -> f64 {
    stats::kahan_sum(data) / data.len() as f64
}

// ============================================================================
// Central limit theorem
// ============================================================================

/// Draws `sample_count` samples of `sample_size` from `family` and returns
/// the mean of each.
///
/// As `sample_size` grows the output concentrates around the family mean
/// with spread `σ / √sample_size`, and its shape approaches a Gaussian
/// whatever the family.
///
/// # Errors
/// [`SimulationError::InvalidParameter`] if `sample_size == 0`.
///
/// # Examples
/// ```
/// use prob_laws::distributions::Family;
/// use prob_laws::random::create_rng;
/// use prob_laws::simulation::repeated_sample_means;
///
/// let mut rng = create_rng(1);
/// let means = repeated_sample_means(Family::Exponential, 30, 200, &mut rng).unwrap();
/// assert_eq!(means.len(), 200);
/// ```
pub fn repeated_sample_means<R: Rng + ?Sized>(
    family: Family,
    sample_size: usize,
    sample_count: usize,
    rng: &mut R,
) -> Result<Vec<f64>> {
    if sample_size == 0 {
        return Err(SimulationError::invalid(
            "sample_size must be at least 1 to take a sample mean",
        ));
    }
    let spec = family.spec();
    let mut means = Vec::with_capacity(sample_count);
    for _ in 0..sample_count {
        let draws = sample(&spec, sample_size, rng)?;
        means.push(arithmetic_mean(&draws));
    }
    debug!(?family, sample_size, sample_count, "computed sample means");
    Ok(means)
}

/// How visibly the central limit theorem acts at a given sample size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CltStage {
    /// n ≤ 10: the family's own shape still dominates.
    Weak,
    /// 10 < n ≤ 30.
    Emerging,
    /// n > 30.
    Clear,
}

impl CltStage {
    /// Classifies a sample size: ≤ 10 is [`Weak`](Self::Weak), ≤ 30 is
    /// [`Emerging`](Self::Emerging), anything larger is [`Clear`](Self::Clear).
    pub fn for_sample_size(sample_size: usize) -> Self {
        match sample_size {
            0..=10 => CltStage::Weak,
            11..=30 => CltStage::Emerging,
            _ => CltStage::Clear,
        }
    }
}

/// The sample-mean distribution at one sample size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CltSnapshot {
    pub sample_size: usize,
    pub means: Vec<f64>,
    pub summary: SummaryStatistics,
    /// `σ / √n` for the family's σ.
    pub expected_std_dev: f64,
    pub stage: CltStage,
}

/// Runs [`repeated_sample_means`] for each size in `sample_sizes`, in order.
///
/// # Errors
/// [`SimulationError::InvalidParameter`] if any size is zero.
pub fn clt_progression<R: Rng + ?Sized>(
    family: Family,
    sample_sizes: &[usize],
    sample_count: usize,
    rng: &mut R,
) -> Result<Vec<CltSnapshot>> {
    let sigma = family.spec().std_dev();
    sample_sizes
        .iter()
        .map(|&n| {
            let means = repeated_sample_means(family, n, sample_count, rng)?;
            Ok(CltSnapshot {
                sample_size: n,
                summary: stats::summarize(&means),
                means,
                expected_std_dev: sigma / (n as f64).sqrt(),
                stage: CltStage::for_sample_size(n),
            })
        })
        .collect()
}

// ============================================================================
// Law of large numbers
// ============================================================================

/// Prefix means: element `i` is the mean of `observations[..=i]`.
///
/// # Errors
/// [`SimulationError::EmptyInput`] if `observations` is empty.
///
/// # Examples
/// ```
/// use prob_laws::simulation::cumulative_running_mean;
/// assert_eq!(cumulative_running_mean(&[2.0, 4.0, 6.0]).unwrap(), vec![2.0, 3.0, 4.0]);
/// assert!(cumulative_running_mean(&[]).is_err());
/// ```
pub fn cumulative_running_mean(observations: &[f64]) -> Result<Vec<f64>> {
    if observations.is_empty() {
        return Err(SimulationError::EmptyInput);
    }
    let mut acc = WelfordAccumulator::new();
    Ok(observations
        .iter()
        .map(|&x| {
            acc.update(x);
            acc.mean().unwrap_or(x)
        })
        .collect())
}

// ============================================================================
// Regression to the mean
// ============================================================================

/// Inputs of one regression-to-the-mean trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionParams {
    pub population_mean: f64,
    pub population_std_dev: f64,
    pub subject_count: usize,
    /// Selection threshold as a percentile of the first test, in `[0, 100]`.
    pub selection_percentile: f64,
}

impl RegressionParams {
    fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.selection_percentile) {
            return Err(SimulationError::invalid(format!(
                "selection_percentile must be in [0, 100], got {}",
                self.selection_percentile
            )));
        }
        self.half_spread().validate()
    }

    /// Both the latent ability and each measurement's noise use σ/2.
    fn half_spread(&self) -> DistributionSpec {
        DistributionSpec::Normal {
            mean: self.population_mean,
            std_dev: self.population_std_dev / 2.0,
        }
    }
}

/// Scores and means of a trial that selected at least one subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionResult {
    pub test1: Vec<f64>,
    pub test2: Vec<f64>,
    /// The `selection_percentile`-th percentile of `test1`.
    pub threshold: f64,
    pub selected_test1: Vec<f64>,
    pub selected_test2: Vec<f64>,
    pub population_mean_test1: f64,
    pub population_mean_test2: f64,
    pub selected_mean_test1: f64,
    pub selected_mean_test2: f64,
}

impl RegressionResult {
    /// Number of subjects at or above the threshold.
    pub fn selected_count(&self) -> usize {
        self.selected_test1.len()
    }

    /// Drop of the selected group's mean from the first to the second test.
    pub fn regression_effect(&self) -> f64 {
        self.selected_mean_test1 - self.selected_mean_test2
    }

    /// [`regression_effect`](Self::regression_effect) as a percentage of
    /// the selected group's first-test mean; 0 when that mean is 0.
    pub fn regression_percent(&self) -> f64 {
        if self.selected_mean_test1 == 0.0 {
            0.0
        } else {
            self.regression_effect() / self.selected_mean_test1 * 100.0
        }
    }
}

/// Outcome of [`regression_to_mean_trial`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RegressionOutcome {
    Selected(RegressionResult),
    /// No subject reached the threshold (or there were no subjects).
    NoSubjectsSelected,
}

impl RegressionOutcome {
    /// The trial data, if anyone was selected.
    pub fn result(&self) -> Option<&RegressionResult> {
        match self {
            RegressionOutcome::Selected(result) => Some(result),
            RegressionOutcome::NoSubjectsSelected => None,
        }
    }
}

/// Simulates two noisy measurements of the same subjects and selects the
/// top scorers of the first.
///
/// Latent abilities are drawn from N(μ, σ/2); each test adds independent
/// N(0, σ/2) noise. Subjects whose first score is at least the
/// `selection_percentile`-th percentile (linear interpolation) are
/// selected. Because selection favours positive noise that does not
/// repeat, the selected group's second-test mean sits closer to μ.
///
/// # Errors
/// [`SimulationError::InvalidParameter`] for a percentile outside
/// `[0, 100]` or an invalid mean/σ.
pub fn regression_to_mean_trial<R: Rng + ?Sized>(
    params: &RegressionParams,
    rng: &mut R,
) -> Result<RegressionOutcome> {
    params.validate()?;
    let n = params.subject_count;
    let noise = DistributionSpec::Normal {
        mean: 0.0,
        std_dev: params.population_std_dev / 2.0,
    };

    let abilities = sample(&params.half_spread(), n, rng)?;
    let noise1 = sample(&noise, n, rng)?;
    let noise2 = sample(&noise, n, rng)?;
    let test1: Vec<f64> = abilities.iter().zip(&noise1).map(|(a, e)| a + e).collect();
    let test2: Vec<f64> = abilities.iter().zip(&noise2).map(|(a, e)| a + e).collect();

    let Some(threshold) = stats::quantile(&test1, params.selection_percentile / 100.0) else {
        return Ok(RegressionOutcome::NoSubjectsSelected);
    };
    let (selected_test1, selected_test2): (Vec<f64>, Vec<f64>) = test1
        .iter()
        .zip(&test2)
        .filter(|(&t1, _)| t1 >= threshold)
        .map(|(&t1, &t2)| (t1, t2))
        .unzip();
    if selected_test1.is_empty() {
        return Ok(RegressionOutcome::NoSubjectsSelected);
    }

    debug!(
        subjects = n,
        selected = selected_test1.len(),
        threshold,
        "regression trial"
    );
    Ok(RegressionOutcome::Selected(RegressionResult {
        population_mean_test1: arithmetic_mean(&test1),
        population_mean_test2: arithmetic_mean(&test2),
        selected_mean_test1: arithmetic_mean(&selected_test1),
        selected_mean_test2: arithmetic_mean(&selected_test2),
        test1,
        test2,
        threshold,
        selected_test1,
        selected_test2,
    }))
}

// ============================================================================
// Three-sigma rule
// ============================================================================

/// Share of observations within ±1σ, ±2σ and ±3σ of a centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SigmaCoverage {
    /// Observed fractions for k = 1, 2, 3.
    pub empirical: [f64; 3],
    /// Normal-theory fractions `2Φ(k) − 1` (≈ 0.683, 0.954, 0.997).
    pub theoretical: [f64; 3],
}

/// Measures how much of `data` lies within `k·std_dev` of `mean`.
///
/// # Errors
/// - [`SimulationError::EmptyInput`] if `data` is empty.
/// - [`SimulationError::InvalidParameter`] if `std_dev` is not a positive
///   finite number or `mean` is not finite.
pub fn sigma_coverage(data: &[f64], mean: f64, std_dev: f64) -> Result<SigmaCoverage> {
    if !mean.is_finite() || !std_dev.is_finite() || std_dev <= 0.0 {
        return Err(SimulationError::invalid(format!(
            "sigma coverage requires finite mean and std_dev > 0, \
             got mean={mean}, std_dev={std_dev}"
        )));
    }
    if data.is_empty() {
        return Err(SimulationError::EmptyInput);
    }
    let n = data.len() as f64;
    let mut empirical = [0.0; 3];
    let mut theoretical = [0.0; 3];
    for (i, k) in (1..=3).map(f64::from).enumerate() {
        let within = data
            .iter()
            .filter(|&&x| (x - mean).abs() <= k * std_dev)
            .count();
        empirical[i] = within as f64 / n;
        theoretical[i] = 2.0 * special::standard_normal_cdf(k) - 1.0;
    }
    Ok(SigmaCoverage {
        empirical,
        theoretical,
    })
}

// ============================================================================
// Law of small numbers
// ============================================================================

/// Means of `simulations` small samples, repetition `i` drawn from a
/// generator seeded with `base_seed + i`.
///
/// The same arguments always reproduce the same means, and no shared
/// random state is touched.
///
/// # Errors
/// [`SimulationError::InvalidParameter`] if `sample_size == 0`.
pub fn small_sample_means(
    family: Family,
    sample_size: usize,
    simulations: usize,
    base_seed: u64,
) -> Result<Vec<f64>> {
    if sample_size == 0 {
        return Err(SimulationError::invalid(
            "sample_size must be at least 1 to take a sample mean",
        ));
    }
    let spec = family.spec();
    (0..simulations as u64)
        .map(|i| {
            let mut rng = iteration_rng(base_seed, i);
            let draws = sample(&spec, sample_size, &mut rng)?;
            Ok(arithmetic_mean(&draws))
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
