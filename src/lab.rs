//! Memoized simulation session.
//!
//! A [`Lab`] owns a random source and a handle to a (possibly shared)
//! [`MemoCache`]. Each method keys its result on the call's parameters
//! only, so repeating a call with the same parameters replays the stored
//! draws instead of advancing the generator.
//!
//! ```
//! use prob_laws::config::LabConfig;
//! use prob_laws::distributions::DistributionSpec;
//! use prob_laws::lab::Lab;
//!
//! let mut lab = Lab::new(LabConfig::seeded(42)).unwrap();
//! let spec = DistributionSpec::Normal { mean: 0.0, std_dev: 1.0 };
//! let first = lab.sample(spec, 100).unwrap();
//! let again = lab.sample(spec, 100).unwrap();
//! assert_eq!(first, again);
//! assert_eq!(lab.cache().stats().hits, 1);
//! ```

use std::convert::Infallible;
use std::sync::Arc;

use rand::rngs::SmallRng;
use serde::Serialize;
use tracing::debug;

use crate::config::LabConfig;
use crate::distributions::{sample, DistributionSpec, Family};
use crate::error::Result;
use crate::gallery::{self, GalleryCurve, GalleryEntry};
use crate::memo::MemoCache;
use crate::random::{create_rng, entropy_rng};
use crate::simulation::{
    self, CltSnapshot, RegressionOutcome, RegressionParams, SigmaCoverage,
};
use crate::stats::{self, SummaryStatistics};

/// Two specs sampled at the same size, side by side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub first: DistributionSpec,
    pub second: DistributionSpec,
    pub first_data: Vec<f64>,
    pub second_data: Vec<f64>,
    pub first_summary: SummaryStatistics,
    pub second_summary: SummaryStatistics,
}

/// A simulation session: one random source, a memo cache and the
/// configuration they were built from.
///
/// Methods that draw advance the session generator only on a cache miss.
pub struct Lab {
    cache: Arc<MemoCache>,
    rng: SmallRng,
    config: LabConfig,
}

impl Lab {
    /// Creates a session with its own cache, sized by `config.cache_capacity`.
    pub fn new(config: LabConfig) -> Result<Self> {
        config.validate()?;
        let cache = match config.cache_capacity() {
            Some(capacity) => MemoCache::with_capacity(capacity),
            None => MemoCache::new(),
        };
        Self::with_cache(config, Arc::new(cache))
    }

    /// Creates a session that shares `cache` with other sessions.
    ///
    /// `config.cache_capacity` is ignored; the cache keeps its own bound.
    pub fn with_cache(config: LabConfig, cache: Arc<MemoCache>) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => entropy_rng(),
        };
        debug!(seed = ?config.seed, capacity = ?cache.capacity(), "lab session created");
        Ok(Self { cache, rng, config })
    }

    /// The cache backing this session, possibly shared.
    pub fn cache(&self) -> &Arc<MemoCache> {
        &self.cache
    }

    /// The validated configuration.
    pub fn config(&self) -> &LabConfig {
        &self.config
    }

    /// Memoized [`distributions::sample`](crate::distributions::sample).
    pub fn sample(&mut self, spec: DistributionSpec, count: usize) -> Result<Vec<f64>> {
        self.cache.memoize("sample", (spec, count), |(spec, count)| {
            sample(spec, *count, &mut self.rng)
        })
    }

    /// Memoized [`stats::summarize`].
    pub fn summarize(&self, data: &[f64]) -> SummaryStatistics {
        let result: std::result::Result<_, Infallible> = self
            .cache
            .memoize("summarize", data, |data| Ok(stats::summarize(data)));
        match result {
            Ok(summary) => summary,
            Err(never) => match never {},
        }
    }

    /// Memoized [`simulation::repeated_sample_means`].
    pub fn sample_means(
        &mut self,
        family: Family,
        sample_size: usize,
        sample_count: usize,
    ) -> Result<Vec<f64>> {
        self.cache.memoize(
            "repeated_sample_means",
            (family, sample_size, sample_count),
            |&(family, sample_size, sample_count)| {
                simulation::repeated_sample_means(family, sample_size, sample_count, &mut self.rng)
            },
        )
    }

    /// Memoized [`simulation::cumulative_running_mean`].
    pub fn running_mean(&self, observations: &[f64]) -> Result<Vec<f64>> {
        self.cache.memoize("cumulative_running_mean", observations, |data| {
            simulation::cumulative_running_mean(data)
        })
    }

    /// Draws `count` values from `spec` and returns them with their
    /// prefix means.
    pub fn running_mean_of(
        &mut self,
        spec: DistributionSpec,
        count: usize,
    ) -> Result<(Vec<f64>, Vec<f64>)> {
        let draws = self.sample(spec, count)?;
        let running = self.running_mean(&draws)?;
        Ok((draws, running))
    }

    /// Memoized [`simulation::regression_to_mean_trial`].
    pub fn regression(&mut self, params: RegressionParams) -> Result<RegressionOutcome> {
        self.cache.memoize("regression_to_mean_trial", params, |params| {
            simulation::regression_to_mean_trial(params, &mut self.rng)
        })
    }

    /// Samples `first` and `second` at `size` each and summarizes both.
    pub fn compare(
        &mut self,
        first: DistributionSpec,
        second: DistributionSpec,
        size: usize,
    ) -> Result<Comparison> {
        self.cache
            .memoize("compare", (first, second, size), |&(first, second, size)| {
                let first_data = sample(&first, size, &mut self.rng)?;
                let second_data = sample(&second, size, &mut self.rng)?;
                Ok(Comparison {
                    first,
                    second,
                    first_summary: stats::summarize(&first_data),
                    second_summary: stats::summarize(&second_data),
                    first_data,
                    second_data,
                })
            })
    }

    /// Memoized [`simulation::small_sample_means`] seeded from
    /// `config.small_sample_base_seed`.
    ///
    /// Does not touch the session generator.
    pub fn small_sample_means(
        &self,
        family: Family,
        sample_size: usize,
        simulations: usize,
    ) -> Result<Vec<f64>> {
        let base_seed = self.config.small_sample_base_seed;
        self.cache.memoize(
            "small_sample_means",
            (family, sample_size, simulations, base_seed),
            |&(family, sample_size, simulations, base_seed)| {
                simulation::small_sample_means(family, sample_size, simulations, base_seed)
            },
        )
    }

    /// Memoized [`simulation::clt_progression`] over `config.clt_sample_sizes`.
    pub fn clt_progression(
        &mut self,
        family: Family,
        sample_count: usize,
    ) -> Result<Vec<CltSnapshot>> {
        let sizes = self.config.clt_sample_sizes.clone();
        self.cache.memoize(
            "clt_progression",
            (family, sizes, sample_count),
            |(family, sizes, sample_count)| {
                simulation::clt_progression(*family, sizes, *sample_count, &mut self.rng)
            },
        )
    }

    /// Memoized [`gallery::curve`].
    pub fn gallery_curve(&self, entry: GalleryEntry, resolution: usize) -> Result<GalleryCurve> {
        self.cache
            .memoize("gallery_curve", (entry, resolution), |&(entry, resolution)| {
                gallery::curve(entry, resolution)
            })
    }

    /// Draws `count` values from N(`mean`, `std_dev`) and measures their
    /// ±1σ/±2σ/±3σ coverage.
    pub fn sigma_coverage(
        &mut self,
        mean: f64,
        std_dev: f64,
        count: usize,
    ) -> Result<SigmaCoverage> {
        let spec = DistributionSpec::Normal { mean, std_dev };
        let data = self.sample(spec, count)?;
        simulation::sigma_coverage(&data, mean, std_dev)
    }
}

// ============================================================================
// Tests
// ============================================================================
