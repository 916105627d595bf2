//! Chain ordering across parent, bundle and self
//!
//! Uses the C/D/M hierarchy from the testkit: chains visit the parent's
//! implementation, then the composed bundle's, then the type's own, while
//! plain dispatch keeps ordinary single-dispatch semantics.

#![allow(clippy::unwrap_used)]

use serde_json::{json, Value};
use weave_composition::ChainDirection;
use weave_testkit::{assert_classes, assert_sealed, init_test_tracing, LifecycleFixture};

#[test]
fn test_forward_chain_runs_parent_bundle_self() {
    init_test_tracing();
    let mut fixture = LifecycleFixture::build();
    let instance = fixture.instance();

    fixture
        .registry
        .invoke_chain(&instance, "foo", &[json!(42)], ChainDirection::Forward)
        .unwrap();

    assert_eq!(
        fixture.log.entries(),
        vec!["C.foo=42", "M.foo=42", "D.foo=42"]
    );
}

#[test]
fn test_reverse_chain_runs_self_bundle_parent() {
    let mut fixture = LifecycleFixture::build();
    let instance = fixture.instance();

    fixture
        .registry
        .invoke_chain(&instance, "foo", &[json!(42)], ChainDirection::Reverse)
        .unwrap();

    assert_eq!(
        fixture.log.entries(),
        vec!["D.foo=42", "M.foo=42", "C.foo=42"]
    );
}

#[test]
fn test_direct_call_ignores_bundle() {
    let mut fixture = LifecycleFixture::build();
    let instance = fixture.instance();

    let result = fixture.registry.dispatch(&instance, "foo", &[json!(42)]).unwrap();
    assert_eq!(result, json!("dc42"));
    assert_eq!(fixture.log.entries(), vec!["C.foo=42", "D.foo=42"]);
}

#[test]
fn test_entry_points_match_chain_invoker() {
    let mut fixture = LifecycleFixture::build();
    let instance = fixture.instance();

    let forward = fixture
        .registry
        .dispatch(&instance, "fooChain", &[json!(7)])
        .unwrap();
    assert_eq!(forward, Value::Null);
    assert_eq!(fixture.log.entries(), vec!["C.foo=7", "M.foo=7", "D.foo=7"]);

    fixture.log.clear();
    fixture
        .registry
        .dispatch(&instance, "fooChainRev", &[json!(7)])
        .unwrap();
    assert_eq!(fixture.log.entries(), vec!["D.foo=7", "M.foo=7", "C.foo=7"]);
}

#[test]
fn test_sealing_and_ancestor_layout() {
    let mut fixture = LifecycleFixture::build();
    let _instance = fixture.instance();
    let LifecycleFixture { registry, c, d, m, .. } = &fixture;

    assert_sealed!(registry, *c);
    assert_sealed!(registry, *d);
    assert_classes!(registry, *d, [*c, *m, *d]);
    assert_classes!(registry, *m, [*m]);
    assert_eq!(registry.metadata(*d).unwrap().instance_count(), 1);
}

#[test]
fn test_instance_metadata_and_capability() {
    let mut fixture = LifecycleFixture::build();
    let instance = fixture.instance();
    let registry = &fixture.registry;

    let meta = instance.metadata(registry).unwrap();
    assert!(meta.id().starts_with("D$"));

    let id = registry.metadata(fixture.m).unwrap().bundle_id().cloned().unwrap();
    assert!(id.as_str().starts_with("m$"));
    assert_eq!(instance.capability(registry, &id), Some(fixture.m));
}
