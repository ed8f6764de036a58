//! YAML configuration holding structure descriptions, plus an explicit cache
//! of loaded configurations.

mod cache;
mod structure_config;

pub use cache::ConfigCache;
pub use structure_config::{DEFAULT_SECTION, StructureConfig, StructureConfigError};
