//! Property test strategies for type hierarchies
//!
//! A [`HierarchyPlan`] describes a random forest of types plus a list of
//! bundle compositions. Building it replays the plan against a fresh
//! registry and keeps track of which compositions were accepted.
//!
//! # Example
//!
//! ```rust
//! use weave_testkit::strategies::arb_hierarchy;
//! use proptest::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn test_hierarchy_property(plan in arb_hierarchy(8)) {
//!         let built = plan.build();
//!         prop_assert_eq!(built.types.len(), plan.parents.len());
//!     }
//! }
//! ```

use proptest::prelude::*;
use proptest::sample::Index;

// Re-export proptest for convenience
pub use proptest;

use weave_composition::{TypeDecl, TypeRegistry};
use weave_core::{BundleId, TypeHandle, WeaveError};

/// Random hierarchy: parent of each type (always an earlier type) and a
/// sequence of `(target, bundle, id)` compositions by index
#[derive(Debug, Clone)]
pub struct HierarchyPlan {
    /// Parent index per type; `None` for roots
    pub parents: Vec<Option<usize>>,
    /// Compositions as `(target, bundle, explicit id)` indices
    pub mixins: Vec<(usize, usize, Option<String>)>,
}

/// Result of replaying a plan
#[derive(Debug)]
pub struct BuiltHierarchy {
    /// Registry after replaying the plan
    pub registry: TypeRegistry,
    /// Handle per planned type, in plan order
    pub types: Vec<TypeHandle>,
    /// Compositions that succeeded, as `(target, bundle)` handles
    pub accepted: Vec<(TypeHandle, TypeHandle)>,
    /// Compositions that failed, with the error
    pub rejected: Vec<(TypeHandle, TypeHandle, WeaveError)>,
}

impl HierarchyPlan {
    /// Register every type in order, then apply the compositions
    pub fn build(&self) -> BuiltHierarchy {
        let mut registry = TypeRegistry::new();
        let mut types: Vec<TypeHandle> = Vec::with_capacity(self.parents.len());
        for (i, parent) in self.parents.iter().enumerate() {
            let mut decl = TypeDecl::new(format!("T{i}"));
            if let Some(p) = parent {
                decl = decl.extends(types[*p]);
            }
            types.push(registry.register(decl).unwrap());
        }

        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        for (target, bundle, id) in &self.mixins {
            let (target, bundle) = (types[*target], types[*bundle]);
            match registry.add_mixin(target, bundle, id.as_deref().map(BundleId::from)) {
                Ok(()) => accepted.push((target, bundle)),
                Err(err) => rejected.push((target, bundle, err)),
            }
        }

        BuiltHierarchy {
            registry,
            types,
            accepted,
            rejected,
        }
    }
}

/// Strategy for hierarchies of 1..=`max_types` types
pub fn arb_hierarchy(max_types: usize) -> impl Strategy<Value = HierarchyPlan> {
    (1..=max_types.max(1)).prop_flat_map(|n| {
        (
            prop::collection::vec(prop::option::weighted(0.7, any::<Index>()), n),
            prop::collection::vec(
                (
                    any::<Index>(),
                    any::<Index>(),
                    prop::option::of("[a-c]{0,1}"),
                ),
                0..=n,
            ),
        )
            .prop_map(move |(parents, mixins)| HierarchyPlan {
                parents: parents
                    .into_iter()
                    .enumerate()
                    .map(|(i, p)| if i == 0 { None } else { p.map(|idx| idx.index(i)) })
                    .collect(),
                mixins: mixins
                    .into_iter()
                    .map(|(t, b, id)| (t.index(n), b.index(n), id))
                    .collect(),
            })
    })
}

/// Strategy for chain method names
pub fn arb_method_name() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z]{0,8}"
}
