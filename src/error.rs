//! Error types for simulation and configuration failures.

use thiserror::Error;

/// Errors produced by sampling, derivation, and configuration loading.
///
/// Degenerate-but-valid outcomes (an empty percentile selection, an
/// undefined summary field) are not errors; see
/// [`RegressionOutcome`](crate::simulation::RegressionOutcome) and
/// [`SummaryStatistics`](crate::stats::SummaryStatistics).
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Distribution or simulation parameters violate their constraints.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A derivation was requested on a zero-length sequence.
    #[error("input sequence is empty")]
    EmptyInput,

    /// Configuration text could not be parsed or failed validation.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error while reading a configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimulationError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SimulationError::InvalidParameter(msg.into())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimulationError>;
