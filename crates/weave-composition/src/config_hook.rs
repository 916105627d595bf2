//! Extension point for config-property declarations
//!
//! The engine does not interpret config properties. A collaborator installs a
//! `ConfigHook` with `TypeRegistry::with_config_hook` and receives every
//! `add_configs` call.

use crate::metadata::Metadata;
use serde_json::{Map, Value};
use weave_core::{TypeHandle, WeaveResult};

/// Receiver of `TypeRegistry::add_configs`
pub trait ConfigHook: Send + Sync {
    /// Apply config-property declarations to a type
    fn add_configs(
        &self,
        ty: TypeHandle,
        meta: &Metadata,
        configs: &Map<String, Value>,
    ) -> WeaveResult<()>;
}

/// Default hook: accepts and ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopConfigHook;

impl ConfigHook for NoopConfigHook {
    fn add_configs(
        &self,
        _ty: TypeHandle,
        _meta: &Metadata,
        _configs: &Map<String, Value>,
    ) -> WeaveResult<()> {
        Ok(())
    }
}
