//! Composition Invariant Property Tests
//!
//! Replays random hierarchies and bundle compositions and checks:
//!
//! - ancestor sets never contain their own type or repeats
//! - sealed lists include the parent chain in order and every accepted
//!   bundle's own list
//! - sealing is idempotent
//! - composing the same bundle twice records one capability
//! - composition into a sealed type fails and changes nothing
//! - a chain declared after its implementers exist still reaches them

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use serde_json::Value;
use weave_composition::{BundleId, ChainDirection, TypeDecl, TypeRegistry};
use weave_testkit::assertions::{
    assert_bases_well_formed, assert_classes_superset, assert_parent_chain_included,
};
use weave_testkit::strategies::{arb_hierarchy, arb_method_name};
use weave_testkit::CallCounter;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_sealed_lists_are_complete(plan in arb_hierarchy(10)) {
        let mut built = plan.build();
        for &ty in &built.types {
            built.registry.complete(ty).unwrap();
        }

        for &ty in &built.types {
            assert_bases_well_formed(&built.registry, ty);
            assert_parent_chain_included(&built.registry, ty);
        }
        for &(target, bundle) in &built.accepted {
            assert_classes_superset(&built.registry, target, bundle);
        }
    }

    #[test]
    fn prop_rejections_are_sealed_or_cyclic(plan in arb_hierarchy(10)) {
        let built = plan.build();
        for (target, bundle, err) in &built.rejected {
            let cyclic = target == bundle
                || built.registry.metadata(*bundle).unwrap().bases().contains(target);
            prop_assert!(err.is_sealed() || cyclic, "unexpected rejection {err}");
        }
    }

    #[test]
    fn prop_sealing_is_idempotent(plan in arb_hierarchy(8)) {
        let mut built = plan.build();
        let last = *built.types.last().unwrap();
        built.registry.complete(last).unwrap();
        let first = built.registry.metadata(last).unwrap().classes().unwrap().to_vec();
        built.registry.complete(last).unwrap();
        prop_assert_eq!(built.registry.metadata(last).unwrap().classes().unwrap(), &first[..]);
    }

    #[test]
    fn prop_capability_idempotence(id in "[a-z]{1,6}", twice in any::<bool>()) {
        let mut registry = TypeRegistry::new();
        let target = registry.register(TypeDecl::new("Target")).unwrap();
        let bundle = registry.register(TypeDecl::new("Bundle")).unwrap();
        let id = BundleId::from(id);

        registry.add_mixin(target, bundle, Some(id.clone())).unwrap();
        if twice {
            registry.add_mixin(target, bundle, Some(id.clone())).unwrap();
        }
        registry.add_mixin(target, bundle, None).unwrap();

        prop_assert_eq!(registry.capability(target, &id), Some(bundle));
        let bases = registry.metadata(target).unwrap().bases();
        prop_assert_eq!(bases.iter().filter(|b| **b == bundle).count(), 1);
    }

    #[test]
    fn prop_post_seal_composition_rejected(plan in arb_hierarchy(8)) {
        let mut built = plan.build();
        let target = built.types[0];
        built.registry.complete(target).unwrap();
        let before = built.registry.metadata(target).unwrap().bases().clone();

        let bundle = built.registry.register(TypeDecl::new("Late")).unwrap();
        let err = built.registry.add_mixin(target, bundle, None).unwrap_err();
        prop_assert!(err.is_sealed());
        prop_assert_eq!(built.registry.metadata(target).unwrap().bases(), &before);
    }

    #[test]
    fn prop_late_declared_chain_runs_every_implementer(
        method in arb_method_name(),
        depth in 1usize..6,
        implementers in prop::collection::vec(any::<bool>(), 6),
    ) {
        let counter = CallCounter::new();
        let mut registry = TypeRegistry::new();
        let root = registry.register(TypeDecl::new("Root")).unwrap();
        let mut parent = root;
        let mut expected = 0;
        for (level, implements) in implementers.iter().take(depth).enumerate() {
            let mut decl = TypeDecl::new(format!("Level{level}")).extends(parent);
            if *implements {
                decl = decl.method(&method, counter.method());
                expected += 1;
            }
            parent = registry.register(decl).unwrap();
        }
        registry.add_chains(root, &[method.as_str()]).unwrap();

        // Demote the root first; the leaf must not inherit the dead flag
        // while any of its ancestors implements the chain.
        let root_instance = registry.instantiate(root).unwrap();
        registry.invoke_chain(&root_instance, &method, &[], ChainDirection::Forward).unwrap();
        let leaf_instance = registry.instantiate(parent).unwrap();
        registry.invoke_chain(&leaf_instance, &method, &[Value::Null], ChainDirection::Forward).unwrap();

        prop_assert_eq!(counter.hits(), expected);
        prop_assert_eq!(registry.is_chain_live(parent, &method), expected > 0);
    }
}
