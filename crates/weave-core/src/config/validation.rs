//! Configuration validation utilities and rules

use crate::WeaveError;
use std::fmt;

/// Configuration validation result
pub type ValidationResult = Result<(), ValidationError>;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value is required but missing or empty
    Required { field: String },
    /// Value format is invalid
    InvalidFormat {
        field: String,
        expected: String,
        actual: String,
    },
    /// Custom validation failed
    Custom { field: String, message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Required { field } => {
                write!(f, "Field '{field}' is required but missing")
            }
            ValidationError::InvalidFormat {
                field,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Field '{field}' has invalid format. Expected: {expected}, got: {actual}"
                )
            }
            ValidationError::Custom { field, message } => {
                write!(f, "Field '{field}': {message}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for WeaveError {
    fn from(err: ValidationError) -> Self {
        WeaveError::config(err.to_string())
    }
}

/// Configuration validator that accumulates validation rules
pub struct ConfigValidator {
    errors: Vec<ValidationError>,
    field_prefix: String,
}

impl ConfigValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            field_prefix: String::new(),
        }
    }

    /// Create a validator for a nested field
    pub fn for_field(&self, field_name: &str) -> Self {
        Self {
            errors: Vec::new(),
            field_prefix: self.full_field_name(field_name),
        }
    }

    /// Validate that a string is present and not empty
    pub fn non_empty(&mut self, field_name: &str, value: &str) -> &mut Self {
        if value.is_empty() {
            self.errors.push(ValidationError::Required {
                field: self.full_field_name(field_name),
            });
        }
        self
    }

    /// Validate that a string only uses identifier characters
    ///
    /// Entry point names are built by appending suffixes to method names, so
    /// suffixes are restricted to `[A-Za-z0-9_]`.
    pub fn identifier(&mut self, field_name: &str, value: &str) -> &mut Self {
        if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.errors.push(ValidationError::InvalidFormat {
                field: self.full_field_name(field_name),
                expected: "identifier".to_string(),
                actual: value.to_string(),
            });
        }
        self
    }

    /// Validate using a custom predicate
    pub fn custom<T, F>(
        &mut self,
        field_name: &str,
        value: &T,
        predicate: F,
        message: &str,
    ) -> &mut Self
    where
        F: FnOnce(&T) -> bool,
    {
        if !predicate(value) {
            self.errors.push(ValidationError::Custom {
                field: self.full_field_name(field_name),
                message: message.to_string(),
            });
        }
        self
    }

    /// Get validation result
    pub fn result(self) -> ValidationResult {
        match self.errors.into_iter().next() {
            None => Ok(()),
            Some(first) => Err(first),
        }
    }

    /// Get all validation errors
    pub fn all_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    fn full_field_name(&self, field_name: &str) -> String {
        if self.field_prefix.is_empty() {
            field_name.to_string()
        } else {
            format!("{}.{}", self.field_prefix, field_name)
        }
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_errors_in_order() {
        let mut validator = ConfigValidator::new();
        validator
            .non_empty("chain_suffix", "")
            .identifier("reverse_suffix", "Re-v");
        let errors = validator.all_errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0],
            ValidationError::Required {
                field: "chain_suffix".to_string()
            }
        );
        assert!(matches!(errors[1], ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn test_nested_field_prefix() {
        let parent = ConfigValidator::new();
        let mut nested = parent.for_field("engine");
        nested.non_empty("label_separator", "");
        let err = nested.result().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Field 'engine.label_separator' is required but missing"
        );
    }

    #[test]
    fn test_custom_predicate() {
        let mut validator = ConfigValidator::new();
        validator.custom("suffixes", &("Chain", "Chain"), |(a, b)| a != b, "must differ");
        assert!(validator.result().is_err());
    }
}
