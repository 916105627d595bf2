//! # Weave Composition - runtime type composition engine
//!
//! Types are registered with a [`TypeRegistry`], which attaches a metadata
//! record to each one and tracks its ancestor set, capability bundles and
//! method chains.
//!
//! # Architecture
//!
//! - **Registry**: arena of types keyed by [`TypeHandle`], parent links and
//!   sealing
//! - **Bundles**: `add_mixin` merges a bundle's ancestor set into a receiver
//!   and records it under a [`BundleId`]
//! - **Chains**: `add_chains` declares methods that run every own
//!   implementation along the ancestor set, forward or reverse, with a live
//!   flag that short-circuits chains nobody implements
//! - **Members**: own instance and static member tables, derived once a type
//!   is sealed
//!
//! ```rust,ignore
//! let mut registry = TypeRegistry::new();
//! let base = registry.register(TypeDecl::new("Base"))?;
//! registry.add_chains(base, &["init"])?;
//! let widget = registry.register(TypeDecl::new("Widget").extends(base).method("init", init))?;
//! let instance = registry.instantiate(widget)?;
//! registry.dispatch(&instance, "initChain", &[])?;
//! ```

#![forbid(unsafe_code)]

mod chains;
mod mixins;
mod snapshot;

pub mod config_hook;
pub mod instance;
pub mod invocation;
pub mod members;
pub mod metadata;
pub mod registry;

pub use config_hook::{ConfigHook, NoopConfigHook};
pub use instance::Instance;
pub use invocation::{CallMode, ChainDirection, Invocation};
pub use members::{
    GetterFn, MemberDescriptor, MemberTable, MemberValue, MethodFn, OwnMembers, SetterFn,
    TypeDecl,
};
pub use metadata::Metadata;
pub use registry::{ChainStats, TypeRegistry};
pub use snapshot::MetadataSnapshot;

pub use weave_core::{BundleId, EngineConfig, MemberKey, SymbolKey, TypeHandle, WeaveError, WeaveResult};
