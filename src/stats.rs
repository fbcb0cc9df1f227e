//! Descriptive statistics with numerical stability guarantees.
//!
//! All functions in this module handle edge cases explicitly and return
//! `None` instead of panicking or producing NaN. [`summarize`] bundles
//! them into a [`SummaryStatistics`] record in which each field fails
//! independently.
//!
//! # Algorithms
//!
//! - **Mean**: Kahan compensated summation for O(ε) error independent of n.
//! - **Variance/StdDev**: Welford's online algorithm, population (n)
//!   denominator.
//!   Reference: Welford (1962), "Note on a Method for Calculating
//!   Corrected Sums of Squares and Products", *Technometrics* 4(3).
//! - **Quantile**: R-7 linear interpolation (default in R, NumPy, Excel).
//!   Reference: Hyndman & Fan (1996), "Sample Quantiles in Statistical
//!   Packages", *The American Statistician* 50(4).
//! - **Shape**: biased moment estimators g₁ and g₂ (the defaults of
//!   `scipy.stats.skew` and `scipy.stats.kurtosis`).

use std::fmt;

use serde::Serialize;

/// Computes the arithmetic mean using Kahan compensated summation.
///
/// # Complexity
/// Time: O(n), Space: O(1)
///
/// # Returns
/// - `None` if `data` is empty, contains any NaN/Inf, or the sum overflows.
///
/// # Examples
/// ```
/// use prob_laws::stats::mean;
/// let v = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert!((mean(&v).unwrap() - 3.0).abs() < 1e-15);
/// ```
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    if !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    Some(kahan_sum(data) / data.len() as f64).filter(|m| m.is_finite())
}

/// Computes the population variance (denominator `n`) with Welford's
/// online algorithm.
///
/// # Returns
/// - `None` if `data` is empty or contains NaN/Inf.
///
/// # Examples
/// ```
/// use prob_laws::stats::population_variance;
/// let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((population_variance(&v).unwrap() - 4.0).abs() < 1e-10);
/// ```
pub fn population_variance(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    if !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    let mut acc = WelfordAccumulator::new();
    for &x in data {
        acc.update(x);
    }
    acc.population_variance().filter(|v| v.is_finite())
}

/// Computes the population standard deviation, `sqrt(population_variance)`.
///
/// A single observation has standard deviation zero.
///
/// # Returns
/// - `None` if `data` is empty or contains NaN/Inf.
pub fn std_dev(data: &[f64]) -> Option<f64> {
    population_variance(data).map(f64::sqrt)
}

/// Returns the minimum value in the slice.
///
/// # Returns
/// - `None` if `data` is empty or contains NaN.
///
/// # Examples
/// ```
/// use prob_laws::stats::min;
/// assert_eq!(min(&[3.0, 1.0, 4.0, 1.0, 5.0]), Some(1.0));
/// ```
pub fn min(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    data.iter().copied().try_fold(f64::INFINITY, |acc, x| {
        if x.is_nan() {
            None
        } else {
            Some(acc.min(x))
        }
    })
}

/// Returns the maximum value in the slice.
///
/// # Returns
/// - `None` if `data` is empty or contains NaN.
pub fn max(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    data.iter().copied().try_fold(f64::NEG_INFINITY, |acc, x| {
        if x.is_nan() {
            None
        } else {
            Some(acc.max(x))
        }
    })
}

/// Computes the median of `data` without mutating the input.
///
/// Even-length data yields the average of the two middle elements.
///
/// # Complexity
/// Time: O(n log n), Space: O(n)
///
/// # Returns
/// - `None` if `data` is empty or contains NaN.
///
/// # Examples
/// ```
/// use prob_laws::stats::median;
/// assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
/// ```
pub fn median(data: &[f64]) -> Option<f64> {
    let sorted = sorted_copy(data)?;
    let n = sorted.len();
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

/// Computes the `p`-th quantile using the R-7 linear interpolation method.
///
/// This is the default method of `numpy.percentile`, so
/// `quantile(data, q / 100.0)` reproduces `np.percentile(data, q)`.
///
/// # Algorithm
/// For sorted data `x[0..n]` and quantile `p ∈ [0, 1]`:
/// 1. Compute `h = (n − 1) × p`
/// 2. Let `j = ⌊h⌋` and `g = h − j`
/// 3. Return `(1 − g) × x[j] + g × x[j+1]`, evaluated from the nearer
///    neighbour so the result stays within `[x[j], x[j+1]]`
///
/// # Returns
/// - `None` if `data` is empty, `p` is outside `[0, 1]`, or data contains NaN.
///
/// # Examples
/// ```
/// use prob_laws::stats::quantile;
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(quantile(&data, 0.0), Some(1.0));
/// assert_eq!(quantile(&data, 1.0), Some(5.0));
/// assert_eq!(quantile(&data, 0.5), Some(3.0));
/// ```
pub fn quantile(data: &[f64], p: f64) -> Option<f64> {
    if !(0.0..=1.0).contains(&p) {
        return None;
    }
    let sorted = sorted_copy(data)?;
    quantile_sorted(&sorted, p)
}

/// Computes the `p`-th quantile on **pre-sorted** data (R-7 method).
///
/// The caller must guarantee that `sorted_data` is sorted in
/// non-decreasing order.
///
/// # Returns
/// - `None` if `sorted_data` is empty or `p` is outside `[0, 1]`.
pub fn quantile_sorted(sorted_data: &[f64], p: f64) -> Option<f64> {
    let n = sorted_data.len();
    if n == 0 || !(0.0..=1.0).contains(&p) {
        return None;
    }
    if n == 1 {
        return Some(sorted_data[0]);
    }

    let h = (n - 1) as f64 * p;
    let j = h.floor() as usize;
    let g = h - h.floor();

    if j + 1 >= n {
        Some(sorted_data[n - 1])
    } else {
        Some(lerp(sorted_data[j], sorted_data[j + 1], g))
    }
}

/// Linear interpolation that never leaves `[a, b]` and is exact when
/// `a == b`. Interpolates from the nearer endpoint.
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    if a == b || t == 0.0 {
        return a;
    }
    let diff = b - a;
    if t >= 0.5 {
        b - diff * (1.0 - t)
    } else {
        a + diff * t
    }
}

/// Computes the biased sample skewness g₁ (Fisher–Pearson coefficient).
///
/// # Formula
/// ```text
/// g₁ = m₃ / m₂^{3/2}
/// ```
/// where `m₂`, `m₃` are the biased (denominator `n`) central moments.
///
/// # Returns
/// - `None` if `data.len() < 3`, data contains NaN/Inf, or variance is zero.
///
/// # Examples
/// ```
/// use prob_laws::stats::skewness;
/// assert!(skewness(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap().abs() < 1e-14);
/// assert!(skewness(&[1.0, 2.0, 3.0, 4.0, 50.0]).unwrap() > 0.0);
/// ```
pub fn skewness(data: &[f64]) -> Option<f64> {
    let moments = CentralMoments::of(data)?;
    Some(moments.m3 / moments.m2.powf(1.5)).filter(|g| g.is_finite())
}

/// Computes the biased excess kurtosis g₂ (Fisher definition).
///
/// # Formula
/// ```text
/// g₂ = m₄ / m₂² − 3
/// ```
///
/// Returns **0** for a normal distribution, positive for heavy tails,
/// negative for light tails.
///
/// # Returns
/// - `None` if `data.len() < 3`, data contains NaN/Inf, or variance is zero.
pub fn kurtosis(data: &[f64]) -> Option<f64> {
    let moments = CentralMoments::of(data)?;
    Some(moments.m4 / (moments.m2 * moments.m2) - 3.0).filter(|g| g.is_finite())
}

/// Biased second, third and fourth central moments.
struct CentralMoments {
    m2: f64,
    m3: f64,
    m4: f64,
}

impl CentralMoments {
    /// Two-pass moment computation; `None` below three finite points or
    /// for zero variance.
    fn of(data: &[f64]) -> Option<Self> {
        let n = data.len();
        if n < 3 {
            return None;
        }
        let m = mean(data)?;
        let nf = n as f64;
        let mut sum2 = 0.0;
        let mut sum3 = 0.0;
        let mut sum4 = 0.0;
        for &x in data {
            let d = x - m;
            let d2 = d * d;
            sum2 += d2;
            sum3 += d2 * d;
            sum4 += d2 * d2;
        }
        let m2 = sum2 / nf;
        if m2 == 0.0 || !m2.is_finite() {
            return None;
        }
        Some(Self {
            m2,
            m3: sum3 / nf,
            m4: sum4 / nf,
        })
    }
}

fn sorted_copy(data: &[f64]) -> Option<Vec<f64>> {
    if data.is_empty() || data.iter().any(|x| x.is_nan()) {
        return None;
    }
    let mut sorted = data.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    Some(sorted)
}

// ---------------------------------------------------------------------------
// Kahan compensated summation
// ---------------------------------------------------------------------------

/// Neumaier compensated summation for O(ε) error independent of `n`.
///
/// Reference: Neumaier (1974), "Rundungsfehleranalyse einiger Verfahren
/// zur Summation endlicher Summen", *ZAMM* 54(1), pp. 39–51.
pub fn kahan_sum(data: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for &x in data {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

// ---------------------------------------------------------------------------
// Welford online accumulator
// ---------------------------------------------------------------------------

/// Streaming accumulator for the running mean and variance.
///
/// After each [`update`](Self::update), [`mean`](Self::mean) is the mean of
/// every value seen so far, which is exactly the prefix mean used by the
/// law-of-large-numbers demonstration.
///
/// # Examples
/// ```
/// use prob_laws::stats::WelfordAccumulator;
/// let mut acc = WelfordAccumulator::new();
/// for &x in &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     acc.update(x);
/// }
/// assert!((acc.mean().unwrap() - 5.0).abs() < 1e-15);
/// assert!((acc.population_variance().unwrap() - 4.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WelfordAccumulator {
    count: u64,
    mean_acc: f64,
    m2: f64,
}

impl WelfordAccumulator {
    /// Creates a new empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a new sample into the accumulator.
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        let n = self.count as f64;
        let delta = value - self.mean_acc;
        self.mean_acc += delta / n;
        self.m2 += delta * (value - self.mean_acc);
    }

    /// Returns the number of samples seen so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the running mean, or `None` if no samples have been added.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.mean_acc)
        }
    }

    /// Returns the population variance (n denominator), or `None` if no
    /// samples have been added.
    pub fn population_variance(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.m2 / self.count as f64)
        }
    }
}

// ---------------------------------------------------------------------------
// Summary record
// ---------------------------------------------------------------------------

/// Descriptive summary of one observation sequence.
///
/// Every field is computed independently; `None` marks a field that is
/// undefined for this input (empty data, fewer than three points for the
/// shape statistics, zero variance, non-finite values) while the other
/// fields stay usable.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SummaryStatistics {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
}

impl SummaryStatistics {
    /// Field names paired with their values, in display order.
    pub fn fields(&self) -> [(&'static str, Option<f64>); 7] {
        [
            ("mean", self.mean),
            ("median", self.median),
            ("std_dev", self.std_dev),
            ("min", self.min),
            ("max", self.max),
            ("skewness", self.skewness),
            ("kurtosis", self.kurtosis),
        ]
    }

    /// True when every field is defined.
    pub fn is_complete(&self) -> bool {
        self.fields().iter().all(|(_, v)| v.is_some())
    }
}

impl fmt::Display for SummaryStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.fields().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match value {
                Some(v) => write!(f, "{name}: {v:.4}")?,
                None => write!(f, "{name}: undefined")?,
            }
        }
        Ok(())
    }
}

/// Summarizes `data`. Never panics; see [`SummaryStatistics`].
///
/// # Examples
/// ```
/// use prob_laws::stats::summarize;
/// let s = summarize(&[1.0, 1.0]);
/// assert_eq!(s.mean, Some(1.0));
/// assert_eq!(s.std_dev, Some(0.0));
/// assert_eq!(s.skewness, None);
/// assert!(summarize(&[]).mean.is_none());
/// ```
pub fn summarize(data: &[f64]) -> SummaryStatistics {
    SummaryStatistics {
        mean: mean(data),
        median: median(data),
        std_dev: std_dev(data),
        min: min(data),
        max: max(data),
        skewness: skewness(data),
        kurtosis: kurtosis(data),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for generating finite f64 vectors of reasonable size.
    fn finite_vec(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
        proptest::collection::vec(-1e6_f64..1e6, min_len..=max_len)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn std_dev_non_negative(data in finite_vec(1, 100)) {
            let sd = std_dev(&data).unwrap();
            prop_assert!(sd >= 0.0, "std_dev must be >= 0, got {}", sd);
        }

        #[test]
        fn summarize_never_panics_and_tracks_length(
            data in proptest::collection::vec(prop::num::f64::ANY, 0..40)
        ) {
            let s = summarize(&data);
            if data.is_empty() {
                prop_assert_eq!(s, SummaryStatistics::default());
            }
            if data.len() < 3 {
                prop_assert!(s.skewness.is_none() && s.kurtosis.is_none());
            }
        }

        #[test]
        fn summarize_defined_for_finite_input(data in finite_vec(1, 100)) {
            let s = summarize(&data);
            prop_assert!(s.mean.is_some());
            prop_assert!(s.median.is_some());
            prop_assert!(s.std_dev.is_some());
            prop_assert!(s.min.is_some() && s.max.is_some());
            let (lo, hi) = (s.min.unwrap(), s.max.unwrap());
            let m = s.mean.unwrap();
            prop_assert!(lo <= hi);
            prop_assert!(m >= lo - 1e-6 && m <= hi + 1e-6);
        }

        #[test]
        fn summarize_is_pure(data in finite_vec(0, 60)) {
            prop_assert_eq!(summarize(&data), summarize(&data));
        }

        #[test]
        fn quantile_extremes_are_min_max(data in finite_vec(1, 100)) {
            prop_assert_eq!(quantile(&data, 0.0), min(&data));
            prop_assert_eq!(quantile(&data, 1.0), max(&data));
        }

        #[test]
        fn quantile_stays_between_neighbours(data in finite_vec(2, 100), p in 0.0_f64..=1.0) {
            let mut sorted = data.clone();
            sorted.sort_by(f64::total_cmp);
            let q = quantile_sorted(&sorted, p).unwrap();
            let h = (sorted.len() - 1) as f64 * p;
            let lo = sorted[h.floor() as usize];
            let hi = sorted[(h.ceil() as usize).min(sorted.len() - 1)];
            prop_assert!(q >= lo && q <= hi, "q={} not in [{}, {}]", q, lo, hi);
        }

        #[test]
        fn median_equals_quantile_half(data in finite_vec(1, 100)) {
            let med = median(&data).unwrap();
            let q50 = quantile(&data, 0.5).unwrap();
            prop_assert!((med - q50).abs() < 1e-9, "median={} q50={}", med, q50);
        }

        #[test]
        fn skewness_of_symmetric_is_zero(
            half in proptest::collection::vec(-1e6_f64..1e6, 2..=50),
        ) {
            let mut data: Vec<f64> = half.clone();
            data.extend(half.iter().map(|x| -x));
            if let Some(s) = skewness(&data) {
                prop_assert!(s.abs() < 1e-8, "symmetric data should have ~0 skewness, got {}", s);
            }
        }
    }
}
