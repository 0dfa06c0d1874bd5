use std::path::{Path, PathBuf};

use clap::Subcommand;
use famplan_core::EngineConfig;

use super::load_config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective config as TOML
    Show,
    /// Print the config file location
    Path,
    /// Get a config value
    Get {
        /// Dot-separated key (e.g. "default_strategy", "allowed_hours.start")
        key: String,
    },
    /// Set a config value and save
    Set {
        /// Dot-separated key
        key: String,
        /// New value
        value: String,
    },
    /// Reset config to defaults
    Reset,
}

fn config_path(path: Option<&Path>) -> PathBuf {
    path.map_or_else(EngineConfig::path, Path::to_path_buf)
}

pub fn run(action: ConfigAction, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = load_config(path)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", config_path(path).display());
        }
        ConfigAction::Get { key } => {
            let config = load_config(path)?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(famplan_core::ConfigError::UnknownKey(key).into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = load_config(path)?;
            config.set(&key, &value)?;
            config.save_to(&config_path(path))?;
            tracing::info!(%key, %value, "config updated");
            println!("ok");
        }
        ConfigAction::Reset => {
            EngineConfig::default().save_to(&config_path(path))?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
