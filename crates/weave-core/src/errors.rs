//! Unified error system for Weave
//!
//! Every engine failure is a synchronous, fatal-to-the-operation condition
//! raised while a type hierarchy is being assembled. There is no retry path;
//! callers surface these as startup errors.

use serde::{Deserialize, Serialize};

/// Unified error type for all Weave operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum WeaveError {
    /// The type is already sealed and can no longer be composed into
    #[error("Too late to apply a mixin into {label}: type is sealed")]
    Sealed {
        /// Identity label of the sealed type
        label: String,
    },

    /// The operation requires a sealed type
    #[error("Type {label} is incomplete: seal it before {operation}")]
    Incomplete {
        /// Identity label of the unsealed type
        label: String,
        /// Operation that needed the sealed state
        operation: String,
    },

    /// A type handle does not belong to this registry
    #[error("Unknown type handle {index}")]
    UnknownType {
        /// Raw arena index of the handle
        index: u32,
    },

    /// Lookup of a chain, member or capability failed
    #[error("Not found: {message}")]
    NotFound {
        /// Error message describing what was not found
        message: String,
    },

    /// Invalid input or composition request
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {message}")]
    Config {
        /// Error message describing the configuration failure
        message: String,
    },
}

impl WeaveError {
    /// Create a sealed-type error
    pub fn sealed(label: impl Into<String>) -> Self {
        Self::Sealed {
            label: label.into(),
        }
    }

    /// Create an incomplete-type error
    pub fn incomplete(label: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::Incomplete {
            label: label.into(),
            operation: operation.into(),
        }
    }

    /// Create an unknown-type error
    pub fn unknown_type(index: u32) -> Self {
        Self::UnknownType { index }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True when the error reports a composition attempted after sealing
    pub fn is_sealed(&self) -> bool {
        matches!(self, Self::Sealed { .. })
    }

    /// True when the error reports a missing seal
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::Incomplete { .. })
    }
}

/// Standard Result type for Weave operations
pub type Result<T> = std::result::Result<T, WeaveError>;

impl From<std::io::Error> for WeaveError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(err.to_string()),
            _ => Self::config(err.to_string()),
        }
    }
}

impl From<toml::de::Error> for WeaveError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err.to_string())
    }
}

impl From<serde_json::Error> for WeaveError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid(err.to_string())
    }
}
