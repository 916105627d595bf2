//! Per-type metadata records
//!
//! One record per registered type. Registries, live flags, capabilities and
//! chain entry points are stored as layers: a record holds only its own
//! entries and lookups that miss fall through to the parent record (see
//! `TypeRegistry::resolve_layer`). Writing to a layer therefore affects the
//! type and its descendants, never its ancestors or siblings.

use crate::invocation::ChainDirection;
use crate::members::OwnMembers;
use indexmap::IndexSet;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use weave_core::{BundleId, TypeHandle, WeaveError, WeaveResult};

/// Cached chain plan: implementing types in call order
pub(crate) type ChainPlan = Arc<[TypeHandle]>;

/// Engine bookkeeping for one type
#[derive(Debug)]
pub struct Metadata {
    pub(crate) id: String,
    pub(crate) owner: TypeHandle,
    pub(crate) parent: Option<TypeHandle>,
    pub(crate) bases: IndexSet<TypeHandle>,
    pub(crate) sealed: bool,
    pub(crate) classes: Option<Vec<TypeHandle>>,
    pub(crate) classes_rev: OnceCell<Vec<TypeHandle>>,
    pub(crate) chains: Option<HashMap<String, bool>>,
    pub(crate) live_chains: RwLock<HashMap<String, bool>>,
    pub(crate) entry_points: HashMap<String, (String, ChainDirection)>,
    pub(crate) capabilities: HashMap<BundleId, TypeHandle>,
    pub(crate) bundle_id: Option<BundleId>,
    pub(crate) members: OnceCell<OwnMembers>,
    pub(crate) chain_plans: RwLock<HashMap<(String, ChainDirection), ChainPlan>>,
    pub(crate) instances: AtomicU64,
}

impl Metadata {
    /// Record for a root type: empty bases, its own chain registry
    pub(crate) fn root(id: String, owner: TypeHandle) -> Self {
        Self::build(id, owner, None, IndexSet::new(), Some(HashMap::new()))
    }

    /// Record for a derived type: parent's bases plus the parent, no chain
    /// registry of its own
    pub(crate) fn derived(id: String, owner: TypeHandle, parent: &Metadata) -> Self {
        let mut bases = parent.bases.clone();
        bases.insert(parent.owner);
        Self::build(id, owner, Some(parent.owner), bases, None)
    }

    fn build(
        id: String,
        owner: TypeHandle,
        parent: Option<TypeHandle>,
        bases: IndexSet<TypeHandle>,
        chains: Option<HashMap<String, bool>>,
    ) -> Self {
        Self {
            id,
            owner,
            parent,
            bases,
            sealed: false,
            classes: None,
            classes_rev: OnceCell::new(),
            chains,
            live_chains: RwLock::new(HashMap::new()),
            entry_points: HashMap::new(),
            capabilities: HashMap::new(),
            bundle_id: None,
            members: OnceCell::new(),
            chain_plans: RwLock::new(HashMap::new()),
            instances: AtomicU64::new(0),
        }
    }

    /// Debug identity label, `<name>$<n>`
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Type this record describes
    pub fn owner(&self) -> TypeHandle {
        self.owner
    }

    /// Direct parent type
    pub fn parent(&self) -> Option<TypeHandle> {
        self.parent
    }

    /// True once the type has been sealed
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Ancestors collected so far (parent chain and composed bundles)
    ///
    /// Never contains the type itself.
    pub fn bases(&self) -> &IndexSet<TypeHandle> {
        &self.bases
    }

    /// Ancestor-and-self list in composition order; sealed types only
    pub fn classes(&self) -> WeaveResult<&[TypeHandle]> {
        self.classes
            .as_deref()
            .ok_or_else(|| WeaveError::incomplete(&self.id, "reading its ancestor set"))
    }

    /// Reverse of `classes`, materialised on first use
    pub fn classes_rev(&self) -> WeaveResult<&[TypeHandle]> {
        let classes = self.classes()?;
        Ok(self
            .classes_rev
            .get_or_init(|| classes.iter().rev().copied().collect()))
    }

    /// Ancestor-and-self list in the requested direction
    pub fn ordered(&self, direction: ChainDirection) -> WeaveResult<&[TypeHandle]> {
        match direction {
            ChainDirection::Forward => self.classes(),
            ChainDirection::Reverse => self.classes_rev(),
        }
    }

    /// True when this record owns a chain registry layer
    pub fn owns_chain_registry(&self) -> bool {
        self.chains.is_some()
    }

    /// Bundle id resolved for this type, if it has been composed somewhere
    pub fn bundle_id(&self) -> Option<&BundleId> {
        self.bundle_id.as_ref()
    }

    /// Own capability layer (bundles composed directly into this type)
    pub fn own_capabilities(&self) -> &HashMap<BundleId, TypeHandle> {
        &self.capabilities
    }

    /// Number of instances created from this type
    pub fn instance_count(&self) -> u64 {
        self.instances.load(Ordering::Relaxed)
    }

    pub(crate) fn own_live_flag(&self, method: &str) -> Option<bool> {
        self.live_chains.read().get(method).copied()
    }

    pub(crate) fn set_live_flag(&self, method: &str, live: bool) {
        self.live_chains.write().insert(method.to_string(), live);
    }

    pub(crate) fn own_chain_flag(&self, method: &str) -> Option<bool> {
        self.chains.as_ref().and_then(|c| c.get(method).copied())
    }

    pub(crate) fn cached_plan(&self, method: &str, direction: ChainDirection) -> Option<ChainPlan> {
        self.chain_plans
            .read()
            .get(&(method.to_string(), direction))
            .cloned()
    }

    pub(crate) fn store_plan(&self, method: &str, direction: ChainDirection, plan: ChainPlan) {
        self.chain_plans
            .write()
            .insert((method.to_string(), direction), plan);
    }

    pub(crate) fn seal(&mut self) {
        let mut classes: Vec<TypeHandle> = self.bases.iter().copied().collect();
        classes.push(self.owner);
        self.classes = Some(classes);
        self.sealed = true;
    }
}
