//! Session configuration.
//!
//! A [`LabConfig`] is plain data: every field has a default, so a JSON
//! document only needs the keys it wants to change.
//!
//! ```
//! use prob_laws::config::LabConfig;
//!
//! let config = LabConfig::from_json_str(r#"{ "seed": 42, "cache_capacity": 64 }"#).unwrap();
//! assert_eq!(config.seed, Some(42));
//! assert_eq!(config.small_sample_base_seed, 1000);
//! ```

use std::num::NonZeroUsize;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// Sample sizes stepped through by the CLT progression.
pub const DEFAULT_CLT_SAMPLE_SIZES: [usize; 7] = [2, 5, 10, 20, 30, 50, 100];

/// First seed of the law-of-small-numbers repetitions.
pub const DEFAULT_SMALL_SAMPLE_BASE_SEED: u64 = 1000;

/// Settings for a [`Lab`](crate::lab::Lab) session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabConfig {
    /// Seed of the session generator; OS entropy when absent.
    pub seed: Option<u64>,
    /// Maximum number of memoized results; unbounded when absent.
    pub cache_capacity: Option<usize>,
    pub small_sample_base_seed: u64,
    pub clt_sample_sizes: Vec<usize>,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            seed: None,
            cache_capacity: None,
            small_sample_base_seed: DEFAULT_SMALL_SAMPLE_BASE_SEED,
            clt_sample_sizes: DEFAULT_CLT_SAMPLE_SIZES.to_vec(),
        }
    }
}

impl LabConfig {
    /// Default configuration with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| SimulationError::Config(format!("invalid JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text).map_err(|e| match e {
            SimulationError::Config(msg) => {
                SimulationError::Config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;
        tracing::debug!(path = %path.display(), ?config, "loaded lab config");
        Ok(config)
    }

    /// # Errors
    /// [`SimulationError::Config`] for a zero capacity, an empty size list,
    /// or a zero sample size.
    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == Some(0) {
            return Err(SimulationError::Config(
                "cache_capacity must be positive when set".into(),
            ));
        }
        if self.clt_sample_sizes.is_empty() {
            return Err(SimulationError::Config(
                "clt_sample_sizes must not be empty".into(),
            ));
        }
        if self.clt_sample_sizes.contains(&0) {
            return Err(SimulationError::Config(
                "clt_sample_sizes must all be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub(crate) fn cache_capacity(&self) -> Option<NonZeroUsize> {
        self.cache_capacity.and_then(NonZeroUsize::new)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LabConfig::default();
        assert_eq!(config.seed, None);
        assert_eq!(config.cache_capacity, None);
        assert_eq!(config.small_sample_base_seed, 1000);
        assert_eq!(config.clt_sample_sizes, vec![2, 5, 10, 20, 30, 50, 100]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(LabConfig::from_json_str("{}").unwrap(), LabConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = LabConfig::from_json_str(r#"{"clt_sample_sizes": [3, 30]}"#).unwrap();
        assert_eq!(config.clt_sample_sizes, vec![3, 30]);
        assert_eq!(config.small_sample_base_seed, 1000);
    }

    #[test]
    fn test_rejects_invalid_values() {
        for text in [
            r#"{"cache_capacity": 0}"#,
            r#"{"clt_sample_sizes": []}"#,
            r#"{"clt_sample_sizes": [5, 0]}"#,
            r#"{"seed": -1}"#,
            r#"{"unknown": true}"#,
            "not json",
        ] {
            assert!(
                matches!(LabConfig::from_json_str(text), Err(SimulationError::Config(_))),
                "accepted {text}"
            );
        }
    }

    #[test]
    fn test_from_path() {
        let name = format!("prob-laws-config-{}.json", std::process::id());
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, r#"{"seed": 7, "cache_capacity": 16}"#).unwrap();
        let config = LabConfig::from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.cache_capacity(), NonZeroUsize::new(16));
    }

    #[test]
    fn test_from_missing_path() {
        let result = LabConfig::from_path("/nonexistent/prob-laws.json");
        assert!(matches!(result, Err(SimulationError::Io(_))));
    }

    #[test]
    fn test_seeded() {
        let config = LabConfig::seeded(3);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.clt_sample_sizes.len(), 7);
    }
}
