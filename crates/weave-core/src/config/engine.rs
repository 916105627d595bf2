//! Composition engine configuration

use super::traits::{parse_bool, WeaveConfig};
use super::validation::ConfigValidator;
use crate::WeaveError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Naming conventions used by the composition engine
///
/// ```toml
/// chain_suffix = "Chain"
/// reverse_suffix = "Rev"
/// label_separator = "$"
/// fallback_bundle_name = "mixin"
/// decapitalize_bundle_ids = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Appended to a method name to form its forward chain entry point
    pub chain_suffix: String,
    /// Appended after `chain_suffix` to form the reverse entry point
    pub reverse_suffix: String,
    /// Separator between a name and its counter in labels and generated ids
    pub label_separator: String,
    /// Name used for generated bundle ids of anonymous types
    pub fallback_bundle_name: String,
    /// Lower-case the first character of generated bundle ids
    pub decapitalize_bundle_ids: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chain_suffix: "Chain".to_string(),
            reverse_suffix: "Rev".to_string(),
            label_separator: "$".to_string(),
            fallback_bundle_name: "mixin".to_string(),
            decapitalize_bundle_ids: true,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from TOML text; missing keys take defaults
    pub fn from_toml_str(text: &str) -> Result<Self, WeaveError> {
        Ok(toml::from_str(text)?)
    }
}

impl WeaveConfig for EngineConfig {
    const ENV_PREFIX: &'static str = "WEAVE_";
    const ENV_KEYS: &'static [&'static str] = &[
        "chain_suffix",
        "reverse_suffix",
        "label_separator",
        "fallback_bundle_name",
        "decapitalize_bundle_ids",
    ];

    fn load_from_file(path: &Path) -> Result<Self, WeaveError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), WeaveError> {
        let mut validator = ConfigValidator::new();
        validator
            .non_empty("chain_suffix", &self.chain_suffix)
            .identifier("chain_suffix", &self.chain_suffix)
            .non_empty("reverse_suffix", &self.reverse_suffix)
            .identifier("reverse_suffix", &self.reverse_suffix)
            .non_empty("label_separator", &self.label_separator)
            .non_empty("fallback_bundle_name", &self.fallback_bundle_name);
        validator.result().map_err(WeaveError::from)
    }

    fn set_from_string(&mut self, key: &str, value: &str) -> Result<(), WeaveError> {
        match key {
            "chain_suffix" => self.chain_suffix = value.to_string(),
            "reverse_suffix" => self.reverse_suffix = value.to_string(),
            "label_separator" => self.label_separator = value.to_string(),
            "fallback_bundle_name" => self.fallback_bundle_name = value.to_string(),
            "decapitalize_bundle_ids" => self.decapitalize_bundle_ids = parse_bool(key, value)?,
            other => {
                return Err(WeaveError::config(format!(
                    "Unknown engine configuration key: {other}"
                )))
            }
        }
        Ok(())
    }
}
