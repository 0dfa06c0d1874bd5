pub mod config;
pub mod generate;
pub mod strategies;

use std::path::Path;

use famplan_core::EngineConfig;

/// Engine config from `--config`, or the default location. A missing file
/// means defaults.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, famplan_core::ConfigError> {
    match path {
        Some(path) if path.exists() => EngineConfig::load_from(path),
        Some(_) => Ok(EngineConfig::default()),
        None => EngineConfig::load_or_default(),
    }
}
