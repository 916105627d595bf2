//! Core configuration traits for the Weave configuration system

use crate::WeaveError;
use std::path::Path;

/// Core trait for Weave configuration types
pub trait WeaveConfig: Clone + Default + Send + Sync + 'static {
    /// Prefix of environment variables that override this configuration
    const ENV_PREFIX: &'static str;

    /// Get default configuration values
    fn defaults() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    fn load_from_file(path: &Path) -> Result<Self, WeaveError>;

    /// Keys that may be overridden from the environment
    const ENV_KEYS: &'static [&'static str];

    /// Merge with `<ENV_PREFIX><KEY>` environment variables for each of
    /// `ENV_KEYS`; other variables with the prefix are left alone
    fn merge_with_env(&mut self) -> Result<(), WeaveError> {
        for key in Self::ENV_KEYS {
            let var = format!("{}{}", Self::ENV_PREFIX, key.to_uppercase());
            if let Ok(value) = std::env::var(&var) {
                self.set_from_string(key, &value)?;
            }
        }
        Ok(())
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), WeaveError>;

    /// Set a configuration value from a string (environment and CLI overrides)
    fn set_from_string(&mut self, key: &str, value: &str) -> Result<(), WeaveError>;
}

/// Parse a boolean override the way environment variables usually spell it
pub fn parse_bool(key: &str, value: &str) -> Result<bool, WeaveError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(WeaveError::config(format!(
            "Invalid boolean for {key}: {other}"
        ))),
    }
}
