//! Engine configuration: defaults, TOML files and `WEAVE_*` overrides

mod engine;
mod loader;
mod traits;
mod validation;

pub use engine::EngineConfig;
pub use loader::{ConfigLoader, ConfigSource};
pub use traits::{parse_bool, WeaveConfig};
pub use validation::{ConfigValidator, ValidationError, ValidationResult};
