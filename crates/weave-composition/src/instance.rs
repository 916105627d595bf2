//! Instances of registered types

use crate::metadata::Metadata;
use crate::registry::TypeRegistry;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use weave_core::{BundleId, TypeHandle, WeaveResult};

/// An instance created by `TypeRegistry::instantiate`
///
/// Holds its type handle and a field map that methods read and write.
#[derive(Debug)]
pub struct Instance {
    type_handle: TypeHandle,
    fields: RwLock<Map<String, Value>>,
}

impl Instance {
    pub(crate) fn new(type_handle: TypeHandle) -> Self {
        Self {
            type_handle,
            fields: RwLock::new(Map::new()),
        }
    }

    /// Handle of the instance's type
    pub fn type_handle(&self) -> TypeHandle {
        self.type_handle
    }

    /// The metadata record of the instance's type
    ///
    /// Identical to `registry.metadata(instance.type_handle())`.
    pub fn metadata<'r>(&self, registry: &'r TypeRegistry) -> WeaveResult<&'r Metadata> {
        registry.metadata(self.type_handle)
    }

    /// Bundle composed into the instance's type (or an ancestor) under `id`
    pub fn capability(&self, registry: &TypeRegistry, id: &BundleId) -> Option<TypeHandle> {
        registry.capability(self.type_handle, id)
    }

    /// Read a field
    pub fn get(&self, key: &str) -> Option<Value> {
        self.fields.read().get(key).cloned()
    }

    /// Write a field, returning the previous value
    pub fn set(&self, key: &str, value: Value) -> Option<Value> {
        self.fields.write().insert(key.to_string(), value)
    }

    /// Apply `update` to a field in place, inserting null first when absent
    pub fn update<F>(&self, key: &str, update: F)
    where
        F: FnOnce(&mut Value),
    {
        let mut fields = self.fields.write();
        update(fields.entry(key.to_string()).or_insert(Value::Null));
    }

    /// Copy of all fields
    pub fn fields(&self) -> Map<String, Value> {
        self.fields.read().clone()
    }
}
