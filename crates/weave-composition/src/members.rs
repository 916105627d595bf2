//! Member descriptors and type declarations
//!
//! A type is declared with its own instance members and its own static
//! members. Methods are ordinary members whose value is callable; the engine
//! never copies members between types, it only records where they live.

use crate::instance::Instance;
use crate::invocation::Invocation;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use weave_core::{BundleId, MemberKey, TypeHandle, WeaveResult};

/// Callable member body
pub type MethodFn = Arc<dyn Fn(&Invocation<'_>, &[Value]) -> WeaveResult<Value> + Send + Sync>;

/// Accessor getter
pub type GetterFn = Arc<dyn Fn(&Instance) -> Value + Send + Sync>;

/// Accessor setter
pub type SetterFn = Arc<dyn Fn(&Instance, Value) + Send + Sync>;

/// Value slot of a member descriptor
#[derive(Clone)]
pub enum MemberValue {
    /// Plain data value
    Data(Value),
    /// Callable method
    Method(MethodFn),
    /// Computed property
    Accessor {
        /// Read side
        get: Option<GetterFn>,
        /// Write side
        set: Option<SetterFn>,
    },
}

impl fmt::Debug for MemberValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(value) => f.debug_tuple("Data").field(value).finish(),
            Self::Method(_) => f.write_str("Method(..)"),
            Self::Accessor { get, set } => f
                .debug_struct("Accessor")
                .field("get", &get.is_some())
                .field("set", &set.is_some())
                .finish(),
        }
    }
}

/// Full descriptor of one member
#[derive(Debug, Clone)]
pub struct MemberDescriptor {
    /// Value, method or accessor pair
    pub value: MemberValue,
    /// Shows up in enumeration of the namespace
    pub enumerable: bool,
    /// May be redefined or removed
    pub configurable: bool,
    /// Data value may be reassigned (ignored for accessors)
    pub writable: bool,
}

impl MemberDescriptor {
    /// Method descriptor: non-enumerable, configurable, writable
    pub fn method<F>(body: F) -> Self
    where
        F: Fn(&Invocation<'_>, &[Value]) -> WeaveResult<Value> + Send + Sync + 'static,
    {
        Self {
            value: MemberValue::Method(Arc::new(body)),
            enumerable: false,
            configurable: true,
            writable: true,
        }
    }

    /// Data descriptor: enumerable, configurable, writable
    pub fn data(value: Value) -> Self {
        Self {
            value: MemberValue::Data(value),
            enumerable: true,
            configurable: true,
            writable: true,
        }
    }

    /// Accessor descriptor: non-enumerable, configurable
    pub fn accessor(get: Option<GetterFn>, set: Option<SetterFn>) -> Self {
        Self {
            value: MemberValue::Accessor { get, set },
            enumerable: false,
            configurable: true,
            writable: false,
        }
    }

    /// Mark the descriptor enumerable or not
    pub fn enumerable(mut self, enumerable: bool) -> Self {
        self.enumerable = enumerable;
        self
    }

    /// The callable body, if this member is a method
    pub fn as_method(&self) -> Option<&MethodFn> {
        match &self.value {
            MemberValue::Method(body) => Some(body),
            _ => None,
        }
    }

    /// True for method members
    pub fn is_method(&self) -> bool {
        self.as_method().is_some()
    }
}

/// Ordered own-member table of one namespace
#[derive(Debug, Clone, Default)]
pub struct MemberTable {
    /// Keys in declaration order
    pub keys: Vec<MemberKey>,
    /// Descriptor per key
    pub props: IndexMap<MemberKey, MemberDescriptor>,
}

impl MemberTable {
    pub(crate) fn from_members(members: &IndexMap<MemberKey, MemberDescriptor>) -> Self {
        Self {
            keys: members.keys().cloned().collect(),
            props: members.clone(),
        }
    }

    /// Descriptor of a named member
    pub fn get(&self, name: &str) -> Option<&MemberDescriptor> {
        self.props.get(&MemberKey::from(name))
    }

    /// Descriptor for any key
    pub fn get_key(&self, key: &MemberKey) -> Option<&MemberDescriptor> {
        self.props.get(key)
    }

    /// Number of own members
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when the namespace has no own members
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Own members of a type, split by namespace
#[derive(Debug, Clone)]
pub struct OwnMembers {
    /// Type the table was derived from
    pub owner: TypeHandle,
    /// Members reachable from instances
    pub instance: MemberTable,
    /// Members of the type itself
    pub statics: MemberTable,
}

/// Declaration of a type handed to `TypeRegistry::register`
///
/// ```rust,ignore
/// let decl = TypeDecl::new("Widget")
///     .extends(base)
///     .method("render", |_inv, _args| Ok(Value::Null))
///     .static_value("version", json!(2));
/// ```
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub(crate) name: String,
    pub(crate) parent: Option<TypeHandle>,
    pub(crate) members: IndexMap<MemberKey, MemberDescriptor>,
    pub(crate) statics: IndexMap<MemberKey, MemberDescriptor>,
    pub(crate) bundle_id: Option<BundleId>,
}

impl TypeDecl {
    /// Declare a type; an empty name is allowed for anonymous types
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            members: IndexMap::new(),
            statics: IndexMap::new(),
            bundle_id: None,
        }
    }

    /// Set the direct parent type
    pub fn extends(mut self, parent: TypeHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Add an instance method
    pub fn method<F>(self, name: &str, body: F) -> Self
    where
        F: Fn(&Invocation<'_>, &[Value]) -> WeaveResult<Value> + Send + Sync + 'static,
    {
        self.member(name, MemberDescriptor::method(body))
    }

    /// Add an instance data value
    pub fn value(self, name: &str, value: Value) -> Self {
        self.member(name, MemberDescriptor::data(value))
    }

    /// Add any instance member
    pub fn member(mut self, key: impl Into<MemberKey>, descriptor: MemberDescriptor) -> Self {
        self.members.insert(key.into(), descriptor);
        self
    }

    /// Add a static data value
    pub fn static_value(self, name: &str, value: Value) -> Self {
        self.static_member(name, MemberDescriptor::data(value))
    }

    /// Add any static member
    pub fn static_member(
        mut self,
        key: impl Into<MemberKey>,
        descriptor: MemberDescriptor,
    ) -> Self {
        self.statics.insert(key.into(), descriptor);
        self
    }

    /// Declare the id this type is recorded under when composed as a bundle
    pub fn bundle_id(mut self, id: impl Into<BundleId>) -> Self {
        self.bundle_id = Some(id.into());
        self
    }

    /// Declared name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Own instance method body by name
    pub(crate) fn own_method(&self, name: &str) -> Option<&MethodFn> {
        self.members
            .get(&MemberKey::from(name))
            .and_then(MemberDescriptor::as_method)
    }

    /// Names of own instance methods
    pub(crate) fn method_names(&self) -> impl Iterator<Item = &str> {
        self.members
            .iter()
            .filter(|(_, d)| d.is_method())
            .filter_map(|(k, _)| k.as_name())
    }
}
