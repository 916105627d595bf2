//! Configuration loading utilities

use super::traits::WeaveConfig;
use crate::WeaveError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration source tracking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Configuration from default values
    Defaults,
    /// Configuration loaded from a file
    File(PathBuf),
    /// Configuration from environment variables
    Environment,
}

/// Configuration loader with source tracking
///
/// Sources apply in call order; later sources override earlier ones.
pub struct ConfigLoader<T> {
    config: Option<T>,
    sources: Vec<ConfigSource>,
}

impl<T: WeaveConfig> ConfigLoader<T> {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            config: None,
            sources: Vec::new(),
        }
    }

    /// Load configuration with default values
    pub fn with_defaults(mut self) -> Self {
        self.config = Some(T::defaults());
        self.sources.push(ConfigSource::Defaults);
        self
    }

    /// Replace the configuration with the contents of a TOML file
    pub fn with_file(mut self, path: &Path) -> Result<Self, WeaveError> {
        let config = T::load_from_file(path)?;
        debug!(path = %path.display(), "Loaded engine configuration file");
        self.config = Some(config);
        self.sources.push(ConfigSource::File(path.to_path_buf()));
        Ok(self)
    }

    /// Apply environment overrides on top of the current configuration
    pub fn with_env(mut self) -> Result<Self, WeaveError> {
        let mut config = self.config.take().unwrap_or_default();
        config.merge_with_env()?;
        self.config = Some(config);
        self.sources.push(ConfigSource::Environment);
        Ok(self)
    }

    /// Sources applied so far
    pub fn sources(&self) -> &[ConfigSource] {
        &self.sources
    }

    /// Validate and return the final configuration
    pub fn build(self) -> Result<T, WeaveError> {
        let config = self
            .config
            .ok_or_else(|| WeaveError::config("No configuration provided"))?;
        config.validate()?;
        Ok(config)
    }
}

impl<T: WeaveConfig> Default for ConfigLoader<T> {
    fn default() -> Self {
        Self::new()
    }
}
