//! The C/D/M lifecycle hierarchy
//!
//! - `C` defines `foo(x)`: logs `C.foo=x`, returns `"c" + x`
//! - `D` extends `C`, declares `foo` as a chain and defines `foo(x)`: calls
//!   the parent implementation, logs `D.foo=x`, returns `"d" + parent result`
//! - `M` is a bundle defining `foo(x)`: logs `M.foo=x`
//!
//! `M` is composed into `D` before anything is sealed.

use super::recorders::{arg_text, CallLog};
use serde_json::Value;
use weave_composition::{Instance, TypeDecl, TypeRegistry};
use weave_core::TypeHandle;

/// Registry holding the C/D/M hierarchy, plus the shared call log
pub struct LifecycleFixture {
    /// Registry the three types live in
    pub registry: TypeRegistry,
    /// Base type
    pub c: TypeHandle,
    /// Derived type declaring the `foo` chain
    pub d: TypeHandle,
    /// Bundle composed into `d`
    pub m: TypeHandle,
    /// Lines written by every `foo` implementation
    pub log: CallLog,
}

impl LifecycleFixture {
    /// Register C, D and M and compose M into D; nothing is sealed yet
    pub fn build() -> Self {
        let log = CallLog::new();
        let mut registry = TypeRegistry::new();

        let c_log = log.clone();
        let c = registry
            .register(TypeDecl::new("C").method("foo", move |_inv, args| {
                let x = args.first().map(arg_text).unwrap_or_default();
                c_log.push(format!("C.foo={x}"));
                Ok(Value::String(format!("c{x}")))
            }))
            .unwrap();

        let d_log = log.clone();
        let d = registry
            .register(TypeDecl::new("D").extends(c).method("foo", move |inv, args| {
                let parent = inv.call_super(args)?;
                let x = args.first().map(arg_text).unwrap_or_default();
                d_log.push(format!("D.foo={x}"));
                Ok(Value::String(format!("d{}", arg_text(&parent))))
            }))
            .unwrap();
        registry.add_chains(d, &["foo"]).unwrap();

        let m = registry
            .register(TypeDecl::new("M").method("foo", log.recorder("M.foo")))
            .unwrap();
        registry.add_mixin(d, m, None).unwrap();

        Self {
            registry,
            c,
            d,
            m,
            log,
        }
    }

    /// A fresh instance of `D`
    pub fn instance(&mut self) -> Instance {
        self.registry.instantiate(self.d).unwrap()
    }
}
