//! Reusable test fixtures
//!
//! **CallLog** (ordered record of method bodies that ran), **CallCounter**
//! (counts calls of one method body), **LifecycleFixture** (the C/D/M
//! hierarchy used to check parent-before-bundle-before-self chain order).

pub mod lifecycle;
pub mod recorders;

pub use lifecycle::*;
pub use recorders::*;
