//! Call context handed to method bodies

use crate::instance::Instance;
use crate::registry::TypeRegistry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use weave_core::{TypeHandle, WeaveResult};

/// Order in which a chain visits the ancestor-and-self list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainDirection {
    /// Composition order: ancestors, then bundles, then self
    Forward,
    /// Exact reverse of `Forward`
    Reverse,
}

impl ChainDirection {
    /// True for `Reverse`
    pub fn is_reverse(self) -> bool {
        matches!(self, Self::Reverse)
    }
}

/// How the current method body was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMode {
    /// Ordinary single dispatch
    Direct,
    /// One step of a chain walk
    Chain(ChainDirection),
}

/// Context of one method call
pub struct Invocation<'a> {
    pub(crate) registry: &'a TypeRegistry,
    pub(crate) instance: &'a Instance,
    pub(crate) defining_type: TypeHandle,
    pub(crate) method: &'a str,
    pub(crate) mode: CallMode,
}

impl<'a> Invocation<'a> {
    /// Registry the instance belongs to
    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    /// Receiver of the call
    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    /// Type whose own member is executing
    pub fn defining_type(&self) -> TypeHandle {
        self.defining_type
    }

    /// Name of the executing method
    pub fn method(&self) -> &'a str {
        self.method
    }

    /// How this call was reached
    pub fn mode(&self) -> CallMode {
        self.mode
    }

    /// True when the call is one step of a chain walk
    pub fn in_chain(&self) -> bool {
        matches!(self.mode, CallMode::Chain(_))
    }

    /// Call the next implementation of this method along the parent chain
    ///
    /// Inside a chain walk this returns null without calling anything: the
    /// chain itself visits every ancestor implementation.
    pub fn call_super(&self, args: &[Value]) -> WeaveResult<Value> {
        if self.in_chain() {
            return Ok(Value::Null);
        }
        self.registry
            .call_super(self.instance, self.defining_type, self.method, args)
    }

    /// Dispatch another member on the same instance
    pub fn call(&self, member: &str, args: &[Value]) -> WeaveResult<Value> {
        self.registry.dispatch(self.instance, member, args)
    }
}
