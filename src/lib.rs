//! # prob-laws
//!
//! Simulation core for demonstrating the laws of probability: the central
//! limit theorem, the law of large numbers, regression to the mean, the
//! three-sigma rule and the law of small numbers.
//!
//! ## Modules
//!
//! - [`distributions`] — Parameterized distributions, validation and sampling
//! - [`stats`] — Descriptive statistics with numerical stability guarantees
//! - [`gallery`] — Theoretical density curves, including log-normal, χ² and t
//! - [`simulation`] — Derived quantities behind each demonstration
//! - [`memo`] — Value-keyed memoization of expensive results
//! - [`lab`] — A session combining a random source, a cache and configuration
//! - [`config`] — Session configuration loaded from JSON
//! - [`random`] — Seeded random source construction
//! - [`special`] — Normal CDF/PDF, χ² and t densities, log-gamma
//! - [`error`] — Error type shared by all modules
//!
//! ## Design Philosophy
//!
//! - **Explicit randomness**: every sampler takes `&mut impl Rng`; nothing
//!   reads global random state
//! - **Partial results over errors**: summary fields that are undefined for
//!   the input are `None` rather than failing the whole summary
//! - **Numerical stability first**: Welford's algorithm for variance,
//!   Kahan summation for accumulation
//! - **Property-based testing**: Mathematical invariants verified via proptest

pub mod config;
pub mod distributions;
pub mod error;
pub mod gallery;
pub mod lab;
pub mod memo;
pub mod random;
pub mod simulation;
pub mod special;
pub mod stats;

pub use distributions::{sample, DistributionSpec, Family};
pub use error::{Result, SimulationError};
pub use lab::Lab;
pub use memo::MemoCache;
pub use stats::{summarize, SummaryStatistics};
