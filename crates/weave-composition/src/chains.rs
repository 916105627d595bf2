//! Method chains and member dispatch
//!
//! A chain method runs every implementation that a type in the instance's
//! ancestor-and-self list defines as an *own* member, in composition order or
//! its reverse. Implementations inherited without being redefined are not
//! called twice.
//!
//! Each type keeps a live flag per chain name. The first walk that finds no
//! implementation turns the flag off for that type, and later invocations
//! return without walking.

use crate::instance::Instance;
use crate::invocation::{CallMode, ChainDirection, Invocation};
use crate::members::MethodFn;
use crate::metadata::ChainPlan;
use crate::registry::TypeRegistry;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::Ordering;
use tracing::{debug, trace};
use weave_core::naming;
use weave_core::{TypeHandle, WeaveError, WeaveResult};

/// How a member name resolves on a type
enum Resolved<'r> {
    Method(TypeHandle, &'r MethodFn),
    Chain(String, ChainDirection),
}

impl TypeRegistry {
    /// Declare chain methods on a type
    ///
    /// Marks every name declared and live, and installs the `<name>Chain` and
    /// `<name>ChainRev` entry points for the type and its descendants. The
    /// plain method of the same name keeps ordinary dispatch.
    pub fn add_chains(&mut self, ty: TypeHandle, methods: &[&str]) -> WeaveResult<()> {
        let entry_points: Vec<(String, String, String)> = methods
            .iter()
            .map(|m| {
                (
                    (*m).to_string(),
                    naming::chain_entry_name(m, &self.config),
                    naming::reverse_chain_entry_name(m, &self.config),
                )
            })
            .collect();

        let meta = &mut self.entry_mut(ty)?.meta;
        let chains = meta.chains.get_or_insert_with(HashMap::new);
        for (method, _, _) in &entry_points {
            chains.insert(method.clone(), true);
        }
        for (method, forward, reverse) in entry_points {
            meta.set_live_flag(&method, true);
            meta.entry_points
                .insert(forward, (method.clone(), ChainDirection::Forward));
            meta.entry_points
                .insert(reverse, (method.clone(), ChainDirection::Reverse));
            debug!(type_id = %ty, label = %meta.id(), method = %method, "Declared chain");
        }

        // Descendants registered or composed before the declaration.
        for descendant in self.descendants(ty) {
            for method in methods {
                if self.has_implementer(descendant, method) {
                    self.entry(descendant)?.meta.set_live_flag(method, true);
                }
            }
        }
        Ok(())
    }

    /// Types whose parent chain passes through `ty`, excluding `ty`
    fn descendants(&self, ty: TypeHandle) -> Vec<TypeHandle> {
        self.entries
            .iter()
            .skip(ty.index() + 1)
            .map(|e| e.meta.owner())
            .filter(|&t| self.lineage(t).contains(&ty))
            .collect()
    }

    /// True when `ty` or anything in its ancestor set defines `method` as an
    /// own member
    fn has_implementer(&self, ty: TypeHandle, method: &str) -> bool {
        let Ok(meta) = self.metadata(ty) else {
            return false;
        };
        std::iter::once(ty)
            .chain(meta.bases().iter().copied())
            .filter_map(|t| self.entries.get(t.index()))
            .any(|e| e.decl.own_method(method).is_some())
    }

    /// True when `method` is a declared chain for `ty` (own or inherited)
    pub fn is_chain_declared(&self, ty: TypeHandle, method: &str) -> bool {
        self.resolve_layer(ty, |meta| meta.own_chain_flag(method))
            .unwrap_or(false)
    }

    /// True while a chain walk for `method` on `ty` may still find an
    /// implementation
    pub fn is_chain_live(&self, ty: TypeHandle, method: &str) -> bool {
        self.resolve_layer(ty, |meta| meta.own_live_flag(method))
            .unwrap_or(false)
    }

    /// All chain names visible from `ty`, sorted
    pub fn declared_chains(&self, ty: TypeHandle) -> Vec<String> {
        let mut seen: BTreeMap<String, bool> = BTreeMap::new();
        for current in self.lineage(ty) {
            if let Ok(entry) = self.entry(current) {
                if let Some(chains) = &entry.meta.chains {
                    for (name, declared) in chains {
                        seen.entry(name.clone()).or_insert(*declared);
                    }
                }
            }
        }
        seen.into_iter()
            .filter_map(|(name, declared)| declared.then_some(name))
            .collect()
    }

    /// Walk the ancestor-and-self list of the instance's type and call every
    /// own implementation of `method`
    ///
    /// Returns the number of implementations called. The list of implementing
    /// types is computed once per (type, method, direction) and cached.
    ///
    /// # Errors
    ///
    /// Fails when the instance's type is not sealed, or with the first error
    /// returned by a method body (later implementations are not called).
    pub fn invoke_method_chain(
        &self,
        instance: &Instance,
        direction: ChainDirection,
        method: &str,
        args: &[Value],
    ) -> WeaveResult<usize> {
        let plan = self.chain_plan(instance.type_handle(), method, direction)?;
        self.counters.scans.fetch_add(1, Ordering::Relaxed);

        for &ty in plan.iter() {
            let body = self.entry(ty)?.decl.own_method(method).ok_or_else(|| {
                WeaveError::not_found(format!("{method} vanished from {ty}"))
            })?;
            let invocation = Invocation {
                registry: self,
                instance,
                defining_type: ty,
                method,
                mode: CallMode::Chain(direction),
            };
            body(&invocation, args)?;
            self.counters.calls.fetch_add(1, Ordering::Relaxed);
        }

        trace!(
            type_id = %instance.type_handle(),
            method,
            reverse = direction.is_reverse(),
            calls = plan.len(),
            "Walked method chain"
        );
        Ok(plan.len())
    }

    /// Chain invoker: run `method` across the chain unless it is known dead
    ///
    /// A walk that calls nothing demotes the live flag of the instance's type,
    /// so the next invocation returns immediately.
    pub fn invoke_chain(
        &self,
        instance: &Instance,
        method: &str,
        args: &[Value],
        direction: ChainDirection,
    ) -> WeaveResult<()> {
        let ty = instance.type_handle();
        if !self.is_chain_declared(ty, method) {
            return Err(WeaveError::not_found(format!(
                "no chain named {method} on {}",
                self.entry(ty)?.meta.id()
            )));
        }

        if !self.is_chain_live(ty, method) {
            self.counters.skipped.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        }

        if self.invoke_method_chain(instance, direction, method, args)? == 0 {
            let meta = &self.entry(ty)?.meta;
            meta.set_live_flag(method, false);
            debug!(type_id = %ty, label = %meta.id(), method, "Chain has no implementations; marked dead");
        }
        Ok(())
    }

    /// Call a member on an instance by name
    ///
    /// Chain entry points (`<name>Chain`, `<name>ChainRev`) run the chain and
    /// return null. Any other name runs the most derived own implementation
    /// along the parent chain, falling back to composed bundles, most
    /// recently composed first.
    pub fn dispatch(&self, instance: &Instance, member: &str, args: &[Value]) -> WeaveResult<Value> {
        match self.resolve_member(instance.type_handle(), member)? {
            Resolved::Chain(method, direction) => {
                self.invoke_chain(instance, &method, args, direction)?;
                Ok(Value::Null)
            }
            Resolved::Method(defining_type, body) => {
                let invocation = Invocation {
                    registry: self,
                    instance,
                    defining_type,
                    method: member,
                    mode: CallMode::Direct,
                };
                body(&invocation, args)
            }
        }
    }

    /// Call the implementation of `method` found above `defining_type` on its
    /// parent chain
    pub(crate) fn call_super(
        &self,
        instance: &Instance,
        defining_type: TypeHandle,
        method: &str,
        args: &[Value],
    ) -> WeaveResult<Value> {
        let parent = self.entry(defining_type)?.meta.parent();
        for ty in parent.map(|p| self.lineage(p)).unwrap_or_default() {
            if let Some(body) = self.entry(ty)?.decl.own_method(method) {
                let invocation = Invocation {
                    registry: self,
                    instance,
                    defining_type: ty,
                    method,
                    mode: CallMode::Direct,
                };
                return body(&invocation, args);
            }
        }
        Err(WeaveError::not_found(format!(
            "no super implementation of {method} above {}",
            self.entry(defining_type)?.meta.id()
        )))
    }

    fn resolve_member(&self, ty: TypeHandle, member: &str) -> WeaveResult<Resolved<'_>> {
        let lineage = self.lineage(ty);
        for &current in &lineage {
            let entry = self.entry(current)?;
            if let Some(body) = entry.decl.own_method(member) {
                return Ok(Resolved::Method(current, body));
            }
            if let Some((method, direction)) = entry.meta.entry_points.get(member) {
                return Ok(Resolved::Chain(method.clone(), *direction));
            }
        }

        let own_line: BTreeSet<TypeHandle> = lineage.into_iter().collect();
        let meta = &self.entry(ty)?.meta;
        if let Ok(order) = meta.classes_rev() {
            for &current in order.iter().filter(|t| !own_line.contains(t)) {
                if let Some(body) = self.entry(current)?.decl.own_method(member) {
                    return Ok(Resolved::Method(current, body));
                }
            }
        }

        Err(WeaveError::not_found(format!(
            "no member {member} on {}",
            meta.id()
        )))
    }

    fn chain_plan(
        &self,
        ty: TypeHandle,
        method: &str,
        direction: ChainDirection,
    ) -> WeaveResult<ChainPlan> {
        let meta = &self.entry(ty)?.meta;
        if let Some(plan) = meta.cached_plan(method, direction) {
            return Ok(plan);
        }
        let order = meta.ordered(direction)?;
        let plan: ChainPlan = order
            .iter()
            .copied()
            .filter(|t| {
                self.entries
                    .get(t.index())
                    .is_some_and(|e| e.decl.own_method(method).is_some())
            })
            .collect();
        meta.store_plan(method, direction, plan.clone());
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::members::TypeDecl;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;

    type Log = Arc<Mutex<Vec<String>>>;

    fn logging(
        log: &Log,
        tag: &'static str,
    ) -> impl Fn(&Invocation<'_>, &[Value]) -> WeaveResult<Value> + Send + Sync + 'static {
        let log = log.clone();
        move |_inv, _args| {
            log.lock().push(tag.to_string());
            Ok(Value::Null)
        }
    }

    #[test]
    fn test_add_chains_installs_entry_points() {
        let mut registry = TypeRegistry::new();
        let base = registry.register(TypeDecl::new("Base")).unwrap();
        registry.add_chains(base, &["init"]).unwrap();

        let meta = registry.metadata(base).unwrap();
        assert_eq!(
            meta.entry_points.get("initChain"),
            Some(&("init".to_string(), ChainDirection::Forward))
        );
        assert_eq!(
            meta.entry_points.get("initChainRev"),
            Some(&("init".to_string(), ChainDirection::Reverse))
        );
        assert!(registry.is_chain_declared(base, "init"));
        assert!(registry.is_chain_live(base, "init"));
        assert!(!registry.is_chain_declared(base, "destroy"));
    }

    #[test]
    fn test_entry_point_names_follow_config() {
        let config = weave_core::EngineConfig {
            chain_suffix: "Seq".to_string(),
            reverse_suffix: "Back".to_string(),
            ..weave_core::EngineConfig::default()
        };
        let mut registry = TypeRegistry::with_config(config);
        let base = registry.register(TypeDecl::new("Base")).unwrap();
        registry.add_chains(base, &["init"]).unwrap();

        let meta = registry.metadata(base).unwrap();
        assert!(meta.entry_points.contains_key("initSeq"));
        assert!(meta.entry_points.contains_key("initSeqBack"));
        assert!(!meta.entry_points.contains_key("initChain"));
    }

    #[test]
    fn test_descendants_see_root_chains_without_own_registry() {
        let mut registry = TypeRegistry::new();
        let base = registry.register(TypeDecl::new("Base")).unwrap();
        registry.add_chains(base, &["init"]).unwrap();
        let leaf = registry.register(TypeDecl::new("Leaf").extends(base)).unwrap();

        assert!(registry.is_chain_declared(leaf, "init"));
        assert!(!registry.metadata(leaf).unwrap().owns_chain_registry());
        assert_eq!(registry.declared_chains(leaf), vec!["init".to_string()]);
    }

    #[test]
    fn test_chain_on_derived_type_does_not_leak_upwards() {
        let mut registry = TypeRegistry::new();
        let base = registry.register(TypeDecl::new("Base")).unwrap();
        let leaf = registry.register(TypeDecl::new("Leaf").extends(base)).unwrap();
        registry.add_chains(leaf, &["render"]).unwrap();

        assert!(registry.metadata(leaf).unwrap().owns_chain_registry());
        assert!(registry.is_chain_declared(leaf, "render"));
        assert!(!registry.is_chain_declared(base, "render"));
    }

    #[test]
    fn test_reverse_walk() {
        let log: Log = Arc::default();
        let mut registry = TypeRegistry::new();
        let base = registry
            .register(TypeDecl::new("Base").method("init", logging(&log, "base")))
            .unwrap();
        registry.add_chains(base, &["init"]).unwrap();
        let leaf = registry
            .register(
                TypeDecl::new("Leaf")
                    .extends(base)
                    .method("init", logging(&log, "leaf")),
            )
            .unwrap();
        let instance = registry.instantiate(leaf).unwrap();

        registry
            .invoke_chain(&instance, "init", &[], ChainDirection::Reverse)
            .unwrap();
        assert_eq!(*log.lock(), vec!["leaf", "base"]);
    }

    #[test]
    fn test_undeclared_chain_is_not_found() {
        let mut registry = TypeRegistry::new();
        let ty = registry.register(TypeDecl::new("Base")).unwrap();
        let instance = registry.instantiate(ty).unwrap();
        let err = registry
            .invoke_chain(&instance, "init", &[], ChainDirection::Forward)
            .unwrap_err();
        assert!(matches!(err, WeaveError::NotFound { .. }));
    }

    #[test]
    fn test_chain_requires_sealed_type() {
        let mut registry = TypeRegistry::new();
        let ty = registry.register(TypeDecl::new("Base")).unwrap();
        registry.add_chains(ty, &["init"]).unwrap();
        let detached = Instance::new(ty);
        let err = registry
            .invoke_method_chain(&detached, ChainDirection::Forward, "init", &[])
            .unwrap_err();
        assert!(err.is_incomplete());
    }

    #[test]
    fn test_dispatch_resolves_entry_points_and_plain_methods() {
        let log: Log = Arc::default();
        let mut registry = TypeRegistry::new();
        let base = registry
            .register(TypeDecl::new("Base").method("init", logging(&log, "base")))
            .unwrap();
        registry.add_chains(base, &["init"]).unwrap();
        let leaf = registry
            .register(
                TypeDecl::new("Leaf")
                    .extends(base)
                    .method("init", logging(&log, "leaf")),
            )
            .unwrap();
        let instance = registry.instantiate(leaf).unwrap();

        registry.dispatch(&instance, "init", &[]).unwrap();
        assert_eq!(*log.lock(), vec!["leaf"]);

        log.lock().clear();
        assert_eq!(registry.dispatch(&instance, "initChain", &[]).unwrap(), Value::Null);
        assert_eq!(*log.lock(), vec!["base", "leaf"]);

        let err = registry.dispatch(&instance, "missing", &[]).unwrap_err();
        assert!(matches!(err, WeaveError::NotFound { .. }));
    }

    #[test]
    fn test_method_error_stops_chain() {
        let log: Log = Arc::default();
        let mut registry = TypeRegistry::new();
        let base = registry
            .register(
                TypeDecl::new("Base")
                    .method("init", |_, _| Err(WeaveError::invalid("refused"))),
            )
            .unwrap();
        registry.add_chains(base, &["init"]).unwrap();
        let leaf = registry
            .register(
                TypeDecl::new("Leaf")
                    .extends(base)
                    .method("init", logging(&log, "leaf")),
            )
            .unwrap();
        let instance = registry.instantiate(leaf).unwrap();

        let err = registry
            .invoke_chain(&instance, "init", &[json!(1)], ChainDirection::Forward)
            .unwrap_err();
        assert_eq!(err, WeaveError::invalid("refused"));
        assert!(log.lock().is_empty());
    }
}
