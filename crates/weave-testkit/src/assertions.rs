//! Standard assertion helpers for tests
//!
//! Macros and helper functions for the checks that recur across the
//! composition tests: sealing, chain liveness and ancestor-set shape.

use std::collections::HashSet;
use weave_composition::TypeRegistry;
use weave_core::TypeHandle;

/// Assert that a type has been sealed
#[macro_export]
macro_rules! assert_sealed {
    ($registry:expr, $ty:expr) => {
        assert!(
            $registry.is_sealed($ty).unwrap(),
            "Expected {} to be sealed",
            $ty
        )
    };
}

/// Assert that a chain may still find implementations on a type
#[macro_export]
macro_rules! assert_chain_live {
    ($registry:expr, $ty:expr, $method:expr) => {
        assert!(
            $registry.is_chain_live($ty, $method),
            "Expected chain {} to be live on {}",
            $method,
            $ty
        )
    };
}

/// Assert that a chain has been marked dead on a type
#[macro_export]
macro_rules! assert_chain_dead {
    ($registry:expr, $ty:expr, $method:expr) => {
        assert!(
            !$registry.is_chain_live($ty, $method),
            "Expected chain {} to be dead on {}",
            $method,
            $ty
        )
    };
}

/// Assert the exact ancestor-and-self list of a sealed type
#[macro_export]
macro_rules! assert_classes {
    ($registry:expr, $ty:expr, [$($expected:expr),* $(,)?]) => {
        assert_eq!(
            $registry.metadata($ty).unwrap().classes().unwrap(),
            &[$($expected),*][..],
            "Unexpected ancestor-and-self list for {}",
            $ty
        )
    };
}

/// Helper function to assert a type's ancestor set is a set: no repeats, no self
pub fn assert_bases_well_formed(registry: &TypeRegistry, ty: TypeHandle) {
    let meta = registry.metadata(ty).unwrap();
    assert!(
        !meta.bases().contains(&ty),
        "{ty} appears in its own ancestor set"
    );
    let unique: HashSet<_> = meta.bases().iter().collect();
    assert_eq!(unique.len(), meta.bases().len(), "Duplicate ancestors for {ty}");
}

/// Helper function to assert that every parent-chain ancestor of a sealed type
/// appears in its ancestor-and-self list, root first
pub fn assert_parent_chain_included(registry: &TypeRegistry, ty: TypeHandle) {
    let classes = registry.metadata(ty).unwrap().classes().unwrap();
    assert_eq!(classes.last(), Some(&ty), "{ty} must close its own list");

    let mut last_position = classes.len();
    let mut cursor = registry.metadata(ty).unwrap().parent();
    while let Some(parent) = cursor {
        let position = classes
            .iter()
            .position(|c| *c == parent)
            .unwrap_or_else(|| panic!("{parent} missing from ancestors of {ty}"));
        assert!(
            position < last_position,
            "{parent} must precede its descendants in {ty}'s list"
        );
        last_position = position;
        cursor = registry.metadata(parent).unwrap().parent();
    }
}

/// Helper function to assert that `outer`'s list contains all of `inner`'s
pub fn assert_classes_superset(registry: &TypeRegistry, outer: TypeHandle, inner: TypeHandle) {
    let outer_classes = registry.metadata(outer).unwrap().classes().unwrap();
    for ty in registry.metadata(inner).unwrap().classes().unwrap() {
        assert!(
            outer_classes.contains(ty),
            "{ty} from {inner} missing in {outer}"
        );
    }
}
