//! Weave Core - shared foundation for the composition engine
//!
//! This crate holds the pieces every other Weave crate agrees on:
//!
//! - `TypeHandle`, `BundleId`, `SymbolKey`, `MemberKey`: identifiers for
//!   registered types, capability bundles and members
//! - `WeaveError`: the single error type for engine operations
//! - `EngineConfig`: naming conventions (chain entry point suffixes, label
//!   separators, generated bundle ids) loaded from defaults, TOML or env
//! - process-wide label and bundle-id counters

#![forbid(unsafe_code)]

/// Engine configuration
pub mod config;

/// Unified error handling
pub mod errors;

/// Type, bundle and member identifiers
pub mod identifiers;

/// Identity labels and generated names
pub mod naming;

pub use config::{ConfigLoader, EngineConfig, WeaveConfig};
pub use errors::{Result as WeaveResult, WeaveError};
pub use identifiers::{BundleId, MemberKey, SymbolKey, TypeHandle};
