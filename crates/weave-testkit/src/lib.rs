//! Weave Testing Infrastructure
//!
//! Shared setup for the workspace's tests: tracing initialisation, call-log
//! and call-counter fixtures, the lifecycle fixture used by the chain ordering
//! tests, proptest strategies for random hierarchies and assertion macros.

//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! weave-testkit = { path = "../weave-testkit" }
//! ```
//!
//! ```rust,no_run
//! use weave_testkit::*;
//!
//! #[test]
//! fn my_test() {
//!     init_test_tracing();
//!     let mut fixture = LifecycleFixture::build();
//!     let instance = fixture.instance();
//!     // ... test logic
//! }
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

pub mod assertions;
pub mod fixtures;
pub mod strategies;

pub use fixtures::*;

use tracing_subscriber::EnvFilter;

/// Install a test-friendly tracing subscriber once per process
///
/// Honours `RUST_LOG`; defaults to `warn`. Later calls are no-ops.
pub fn init_test_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .with_target(false)
        .try_init();
}
