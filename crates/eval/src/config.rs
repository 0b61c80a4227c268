//! Engine configuration, loaded from TOML.
//!
//! ```toml
//! max_reference_depth = 16
//! max_nesting = 96
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default bound on nested foreign references.
pub const DEFAULT_MAX_REFERENCE_DEPTH: usize = 32;

/// Default bound on composite and reference nesting across all units of
/// one instantiation. Sized so a full-depth evaluation fits the stack of a
/// 2 MiB worker thread.
pub const DEFAULT_MAX_NESTING: usize = 128;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode config")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Longest chain of foreign references one instantiation may follow.
    pub max_reference_depth: usize,
    /// Deepest composite nesting one instantiation may reach, counting
    /// every referenced unit's tree on top of its referrer's.
    pub max_nesting: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_reference_depth: DEFAULT_MAX_REFERENCE_DEPTH,
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_reference_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_reference_depth must be at least 1".to_owned(),
            ));
        }
        if self.max_nesting == 0 {
            return Err(ConfigError::Invalid("max_nesting must be at least 1".to_owned()));
        }
        Ok(())
    }
}
