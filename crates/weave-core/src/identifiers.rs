//! Identifier types used across the composition engine
//!
//! Types live in an arena owned by the registry, so a type is named by a
//! small copyable handle. Capability bundles are named by string ids, and
//! members are keyed either by name or by a process-unique symbol.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Handle of a registered type
///
/// Handles are arena indices; they are only meaningful for the registry that
/// issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeHandle(pub u32);

impl TypeHandle {
    /// Arena index of this handle
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type-{}", self.0)
    }
}

/// Identifier under which a capability bundle is recorded in a receiving type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BundleId(String);

impl BundleId {
    /// Create a bundle id from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Empty ids are never recorded in a capability registry
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for BundleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BundleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for BundleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

static SYMBOL_SEED: AtomicU64 = AtomicU64::new(0);

/// Process-unique member key that is not a plain name
///
/// Two symbols are equal only when they came from the same `SymbolKey::new`
/// call, even if their descriptions match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolKey {
    id: u64,
    description: Option<String>,
}

impl SymbolKey {
    /// Allocate a fresh symbol
    pub fn new(description: Option<&str>) -> Self {
        Self {
            id: SYMBOL_SEED.fetch_add(1, Ordering::Relaxed) + 1,
            description: description.map(str::to_string),
        }
    }

    /// Debug description given at creation
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for SymbolKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SymbolKey {}

impl std::hash::Hash for SymbolKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description.as_deref().unwrap_or(""))
    }
}

/// Key of a member in a type's instance or static namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberKey {
    /// Ordinary named member
    Name(String),
    /// Member keyed by a unique symbol
    Symbol(SymbolKey),
}

impl MemberKey {
    /// Name of the member when it is keyed by a string
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Symbol(_) => None,
        }
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Symbol(symbol) => symbol.fmt(f),
        }
    }
}

impl From<&str> for MemberKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for MemberKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<SymbolKey> for MemberKey {
    fn from(symbol: SymbolKey) -> Self {
        Self::Symbol(symbol)
    }
}
