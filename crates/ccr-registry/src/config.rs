//! # Engine Configuration
//!
//! Policy knobs of the adjudication engine, loadable from YAML. Every field
//! has a default, so an empty document yields [`EngineConfig::default`].
//!
//! ```yaml
//! supersede_open_dispute: true
//! max_participants: 16
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading an [`EngineConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Adjudication policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Whether `set_state` may replace an `IN_DISPUTE` record whose dispute
    /// window has not elapsed.
    pub supersede_open_dispute: bool,
    /// Largest participant set `set_state` accepts.
    pub max_participants: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            supersede_open_dispute: true,
            max_participants: 16,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_participants == 0 {
            return Err(ConfigError::Invalid(
                "max_participants must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
