//! Type registry: the arena owning every type and its metadata record
//!
//! Registration, composition and sealing take `&mut self` and are expected
//! to happen during bootstrap, before instances are used. Chain invocation and
//! member lookup take `&self`; the caches they fill use interior mutability so
//! a finished registry can be shared across threads.

use crate::config_hook::{ConfigHook, NoopConfigHook};
use crate::instance::Instance;
use crate::members::{MemberTable, OwnMembers, TypeDecl};
use crate::metadata::Metadata;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};
use weave_core::naming;
use weave_core::{EngineConfig, TypeHandle, WeaveError, WeaveResult};

pub(crate) struct TypeEntry {
    pub(crate) decl: TypeDecl,
    pub(crate) meta: Metadata,
}

/// Counters for chain invocation, useful to observe the live-flag shortcut
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChainStats {
    /// Chain walks actually performed
    pub scans: u64,
    /// Method bodies called by chain walks
    pub calls: u64,
    /// Invocations skipped because the chain was known dead
    pub skipped: u64,
}

#[derive(Default)]
pub(crate) struct ChainCounters {
    pub(crate) scans: AtomicU64,
    pub(crate) calls: AtomicU64,
    pub(crate) skipped: AtomicU64,
}

/// Registry of composable types
pub struct TypeRegistry {
    pub(crate) entries: Vec<TypeEntry>,
    pub(crate) config: EngineConfig,
    pub(crate) config_hook: Box<dyn ConfigHook>,
    pub(crate) counters: ChainCounters,
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &format!("arena with {} entries", self.entries.len()))
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create an empty registry with default naming conventions
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an empty registry with the given configuration
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            entries: Vec::new(),
            config,
            config_hook: Box::new(NoopConfigHook),
            counters: ChainCounters::default(),
        }
    }

    /// Install the collaborator that receives `add_configs` calls
    pub fn with_config_hook(mut self, hook: Box<dyn ConfigHook>) -> Self {
        self.config_hook = hook;
        self
    }

    /// Naming conventions in effect
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no type has been registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a type and attach a fresh metadata record to it
    ///
    /// # Errors
    ///
    /// Fails when the declared parent is not a handle of this registry.
    pub fn register(&mut self, decl: TypeDecl) -> WeaveResult<TypeHandle> {
        let index = u32::try_from(self.entries.len())
            .map_err(|_| WeaveError::invalid("type arena is full"))?;
        let handle = TypeHandle(index);
        let label = naming::next_type_label(&decl.name, &self.config);

        let meta = match decl.parent {
            Some(parent) => {
                let meta = Metadata::derived(label, handle, &self.entry(parent)?.meta);
                // Own implementations re-activate chains declared above.
                for method in decl.method_names() {
                    if self.is_chain_declared(parent, method) {
                        meta.set_live_flag(method, true);
                    }
                }
                meta
            }
            None => Metadata::root(label, handle),
        };

        debug!(
            type_id = %handle,
            label = %meta.id(),
            parent = ?decl.parent,
            "Registered type"
        );
        self.entries.push(TypeEntry { decl, meta });
        Ok(handle)
    }

    /// Metadata record of a type
    pub fn metadata(&self, ty: TypeHandle) -> WeaveResult<&Metadata> {
        Ok(&self.entry(ty)?.meta)
    }

    /// Declaration a type was registered with
    pub fn type_decl(&self, ty: TypeHandle) -> WeaveResult<&TypeDecl> {
        Ok(&self.entry(ty)?.decl)
    }

    /// Declared name of a type
    pub fn name(&self, ty: TypeHandle) -> WeaveResult<&str> {
        Ok(self.entry(ty)?.decl.name())
    }

    /// True once the type is sealed
    pub fn is_sealed(&self, ty: TypeHandle) -> WeaveResult<bool> {
        Ok(self.entry(ty)?.meta.is_sealed())
    }

    /// Seal a type, sealing unsealed ancestors first
    ///
    /// Idempotent: a sealed type is left untouched.
    pub fn complete(&mut self, ty: TypeHandle) -> WeaveResult<()> {
        let mut pending = Vec::new();
        let mut cursor = Some(ty);
        while let Some(current) = cursor {
            let meta = &self.entry(current)?.meta;
            if meta.is_sealed() {
                break;
            }
            pending.push(current);
            cursor = meta.parent();
        }

        // Root-most first.
        for current in pending.into_iter().rev() {
            let meta = &mut self.entry_mut(current)?.meta;
            meta.seal();
            debug!(
                type_id = %current,
                label = %meta.id(),
                ancestors = meta.bases().len(),
                "Sealed type"
            );
        }
        Ok(())
    }

    /// Own member tables of a sealed type, computed once
    ///
    /// # Errors
    ///
    /// Fails with `WeaveError::Incomplete` when the type is not sealed.
    pub fn get_members(&self, ty: TypeHandle) -> WeaveResult<&OwnMembers> {
        let entry = self.entry(ty)?;
        if !entry.meta.is_sealed() {
            return Err(WeaveError::incomplete(
                entry.meta.id(),
                "deriving its members",
            ));
        }
        Ok(entry.meta.members.get_or_init(|| {
            trace!(type_id = %ty, "Deriving own member table");
            OwnMembers {
                owner: ty,
                instance: MemberTable::from_members(&entry.decl.members),
                statics: MemberTable::from_members(&entry.decl.statics),
            }
        }))
    }

    /// Create an instance, sealing its type first
    pub fn instantiate(&mut self, ty: TypeHandle) -> WeaveResult<Instance> {
        self.complete(ty)?;
        self.entry(ty)?.meta.instances.fetch_add(1, Ordering::Relaxed);
        Ok(Instance::new(ty))
    }

    /// Hand config-property declarations to the installed collaborator
    pub fn add_configs(&self, ty: TypeHandle, configs: &Map<String, Value>) -> WeaveResult<()> {
        let meta = &self.entry(ty)?.meta;
        self.config_hook.add_configs(ty, meta, configs)
    }

    /// Counters of chain invocations so far
    pub fn stats(&self) -> ChainStats {
        ChainStats {
            scans: self.counters.scans.load(Ordering::Relaxed),
            calls: self.counters.calls.load(Ordering::Relaxed),
            skipped: self.counters.skipped.load(Ordering::Relaxed),
        }
    }

    /// Walk `start` and its parents until `lookup` finds a value
    pub(crate) fn resolve_layer<T>(
        &self,
        start: TypeHandle,
        mut lookup: impl FnMut(&Metadata) -> Option<T>,
    ) -> Option<T> {
        let mut cursor = Some(start);
        while let Some(current) = cursor {
            let meta = &self.entries.get(current.index())?.meta;
            if let Some(found) = lookup(meta) {
                return Some(found);
            }
            cursor = meta.parent();
        }
        None
    }

    /// `start` followed by its parent chain, most derived first
    pub(crate) fn lineage(&self, start: TypeHandle) -> Vec<TypeHandle> {
        let mut out = Vec::new();
        let mut cursor = Some(start);
        while let Some(current) = cursor {
            match self.entries.get(current.index()) {
                Some(entry) => {
                    out.push(current);
                    cursor = entry.meta.parent();
                }
                None => break,
            }
        }
        out
    }

    pub(crate) fn entry(&self, ty: TypeHandle) -> WeaveResult<&TypeEntry> {
        self.entries
            .get(ty.index())
            .ok_or_else(|| WeaveError::unknown_type(ty.0))
    }

    pub(crate) fn entry_mut(&mut self, ty: TypeHandle) -> WeaveResult<&mut TypeEntry> {
        self.entries
            .get_mut(ty.index())
            .ok_or_else(|| WeaveError::unknown_type(ty.0))
    }
}
