//! Capability bundle composition
//!
//! A bundle is an ordinary registered type. Composing it into a receiver adds
//! the bundle and everything in its ancestor set to the receiver's ancestor
//! set, so chain walks on the receiver visit the bundle's own implementations,
//! and records the bundle under its id in the receiver's capability layer.

use crate::registry::TypeRegistry;
use std::collections::BTreeMap;
use tracing::debug;
use weave_core::naming;
use weave_core::{BundleId, TypeHandle, WeaveError, WeaveResult};

impl TypeRegistry {
    /// Compose `bundle` into `target`
    ///
    /// The bundle is sealed first. Members are never copied: the receiver
    /// reaches the bundle's methods through its ancestor set.
    ///
    /// # Errors
    ///
    /// - `WeaveError::Sealed` when `target` is already sealed
    /// - `WeaveError::Invalid` when `bundle` is `target` or already has
    ///   `target` in its ancestor set
    pub fn add_mixin(
        &mut self,
        target: TypeHandle,
        bundle: TypeHandle,
        id: Option<BundleId>,
    ) -> WeaveResult<()> {
        let target_meta = &self.entry(target)?.meta;
        if target_meta.is_sealed() {
            return Err(WeaveError::sealed(target_meta.id()));
        }
        let bundle_meta = &self.entry(bundle)?.meta;
        if bundle == target || bundle_meta.bases().contains(&target) {
            return Err(WeaveError::invalid(format!(
                "cannot compose {} into {}: it would become its own ancestor",
                bundle_meta.id(),
                target_meta.id()
            )));
        }

        self.complete(bundle)?;

        let incoming = self.entry(bundle)?.meta.classes()?.to_vec();
        let id = match id {
            Some(id) => id,
            None => self.mixin_id(bundle)?,
        };
        let record = !id.is_empty() && self.capability(target, &id).is_none();

        // Chains declared on the receiver that the bundle side implements.
        let revived: Vec<String> = self
            .declared_chains(target)
            .into_iter()
            .filter(|method| {
                incoming.iter().any(|ty| {
                    self.entries
                        .get(ty.index())
                        .is_some_and(|e| e.decl.own_method(method).is_some())
                })
            })
            .collect();

        let meta = &mut self.entry_mut(target)?.meta;
        for ty in incoming {
            meta.bases.insert(ty);
        }
        if record {
            meta.capabilities.insert(id.clone(), bundle);
        }
        for method in &revived {
            meta.set_live_flag(method, true);
        }

        debug!(
            target = %target,
            label = %meta.id(),
            bundle = %bundle,
            bundle_id = %id.as_str(),
            recorded = record,
            ancestors = meta.bases().len(),
            "Composed bundle"
        );
        Ok(())
    }

    /// Id a type is recorded under when composed without an explicit id
    ///
    /// Uses the declared id if there is one, otherwise generates one from the
    /// type's name. Either way the result is stored on the type's record and
    /// returned unchanged by later calls.
    pub fn mixin_id(&mut self, ty: TypeHandle) -> WeaveResult<BundleId> {
        let entry = self.entry(ty)?;
        if let Some(id) = entry.meta.bundle_id() {
            return Ok(id.clone());
        }
        let id = match &entry.decl.bundle_id {
            Some(declared) => declared.clone(),
            None => naming::next_bundle_id(entry.decl.name(), &self.config),
        };
        self.entry_mut(ty)?.meta.bundle_id = Some(id.clone());
        Ok(id)
    }

    /// Bundle composed into `ty` or one of its parents under `id`
    pub fn capability(&self, ty: TypeHandle, id: &BundleId) -> Option<TypeHandle> {
        self.resolve_layer(ty, |meta| meta.own_capabilities().get(id).copied())
    }

    /// Every capability visible from `ty`; nearer layers shadow farther ones
    pub fn capabilities(&self, ty: TypeHandle) -> BTreeMap<BundleId, TypeHandle> {
        let mut out = BTreeMap::new();
        for current in self.lineage(ty) {
            if let Ok(entry) = self.entry(current) {
                for (id, bundle) in entry.meta.own_capabilities() {
                    out.entry(id.clone()).or_insert(*bundle);
                }
            }
        }
        out
    }
}
