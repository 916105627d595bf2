//! Serialisable view of a metadata record

use crate::registry::TypeRegistry;
use serde::{Deserialize, Serialize};
use weave_core::{TypeHandle, WeaveResult};

/// Point-in-time copy of one type's metadata, for tooling and debugging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSnapshot {
    /// Debug identity label
    pub id: String,
    /// Type the record describes
    pub owner: TypeHandle,
    /// Direct parent type
    pub parent: Option<TypeHandle>,
    /// Whether the ancestor set has been finalised
    pub sealed: bool,
    /// Labels of the ancestor set in composition order (self excluded)
    pub ancestors: Vec<String>,
    /// Chain names visible from the type, sorted
    pub chains: Vec<String>,
    /// Capability ids visible from the type, sorted
    pub capabilities: Vec<String>,
    /// Instances created so far
    pub instances: u64,
}

impl TypeRegistry {
    /// Capture the current state of a type's metadata
    pub fn snapshot(&self, ty: TypeHandle) -> WeaveResult<MetadataSnapshot> {
        let meta = self.metadata(ty)?;
        let ancestors = meta
            .bases()
            .iter()
            .map(|&base| self.metadata(base).map(|m| m.id().to_string()))
            .collect::<WeaveResult<Vec<_>>>()?;

        Ok(MetadataSnapshot {
            id: meta.id().to_string(),
            owner: meta.owner(),
            parent: meta.parent(),
            sealed: meta.is_sealed(),
            ancestors,
            chains: self.declared_chains(ty),
            capabilities: self
                .capabilities(ty)
                .into_keys()
                .map(|id| id.as_str().to_string())
                .collect(),
            instances: meta.instance_count(),
        })
    }
}
