//! TOML-based engine configuration.
//!
//! Holds the placement policy knobs:
//! - Allowed hours window goals may be placed in (default 06:00-22:00)
//! - Boundaries of morning / afternoon / evening
//! - Default strategy and scoring weights
//!
//! Configuration is stored at `~/.config/famplan/engine.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::strategy::StrategyKind;
use crate::window::{PreferredTime, TimeOfDay, TimeWindow};

/// Returns `~/.config/famplan[-dev]/` based on FAMPLAN_ENV.
///
/// Set FAMPLAN_ENV=dev to use the development config directory. The
/// directory is not created here.
pub fn config_dir() -> PathBuf {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FAMPLAN_ENV").unwrap_or_else(|_| "production".to_string());

    if env == "dev" {
        base_dir.join("famplan-dev")
    } else {
        base_dir.join("famplan")
    }
}

/// Boundaries of the named parts of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDayWindows {
    #[serde(default = "default_morning")]
    pub morning: TimeWindow,
    #[serde(default = "default_afternoon")]
    pub afternoon: TimeWindow,
    #[serde(default = "default_evening")]
    pub evening: TimeWindow,
}

impl TimeOfDayWindows {
    pub fn window(&self, part: TimeOfDay) -> TimeWindow {
        match part {
            TimeOfDay::Morning => self.morning,
            TimeOfDay::Afternoon => self.afternoon,
            TimeOfDay::Evening => self.evening,
        }
    }

    /// Resolve a goal's preference entry to a concrete window.
    pub fn resolve(&self, preferred: &PreferredTime) -> TimeWindow {
        match preferred {
            PreferredTime::Named(part) => self.window(*part),
            PreferredTime::Window(window) => *window,
        }
    }
}

/// Bias weights applied by the slot scorer. They only decide between slots
/// that are equally close to the preferred window and leave the same number
/// of unusable slivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    #[serde(default = "default_energy_bonus")]
    pub energy_bonus: i64,
    #[serde(default = "default_prefer_mornings_bonus")]
    pub prefer_mornings_bonus: i64,
    #[serde(default = "default_family_time_bonus")]
    pub family_time_bonus: i64,
}

/// Engine configuration.
///
/// Serialized to/from TOML at `~/.config/famplan/engine.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_allowed_hours")]
    pub allowed_hours: TimeWindow,
    #[serde(default)]
    pub time_of_day: TimeOfDayWindows,
    #[serde(default)]
    pub default_strategy: StrategyKind,
    /// Free slivers shorter than this left behind by a placement count as
    /// fragmentation.
    #[serde(default = "default_min_useful_gap_minutes")]
    pub min_useful_gap_minutes: i64,
    #[serde(default)]
    pub scoring: ScoringWeights,
}

// Default functions
fn hm(start: (u32, u32), end: (u32, u32)) -> TimeWindow {
    match TimeWindow::from_hm(start, end) {
        Some(window) => window,
        None => unreachable!("built-in window {start:?}-{end:?} is well formed"),
    }
}
fn default_allowed_hours() -> TimeWindow {
    hm((6, 0), (22, 0))
}
fn default_morning() -> TimeWindow {
    hm((6, 0), (12, 0))
}
fn default_afternoon() -> TimeWindow {
    hm((12, 0), (17, 0))
}
fn default_evening() -> TimeWindow {
    hm((17, 0), (22, 0))
}
fn default_min_useful_gap_minutes() -> i64 {
    15
}
fn default_energy_bonus() -> i64 {
    120
}
fn default_prefer_mornings_bonus() -> i64 {
    60
}
fn default_family_time_bonus() -> i64 {
    60
}

impl Default for TimeOfDayWindows {
    fn default() -> Self {
        Self {
            morning: default_morning(),
            afternoon: default_afternoon(),
            evening: default_evening(),
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            energy_bonus: default_energy_bonus(),
            prefer_mornings_bonus: default_prefer_mornings_bonus(),
            family_time_bonus: default_family_time_bonus(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            allowed_hours: default_allowed_hours(),
            time_of_day: TimeOfDayWindows::default(),
            default_strategy: StrategyKind::default(),
            min_useful_gap_minutes: default_min_useful_gap_minutes(),
            scoring: ScoringWeights::default(),
        }
    }
}

impl EngineConfig {
    /// Default on-disk location.
    pub fn path() -> PathBuf {
        config_dir().join("engine.toml")
    }

    /// Parse a TOML document and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: EngineConfig = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from the default location, falling back to defaults when the file
    /// does not exist. Nothing is written to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is invalid.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = Self::path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Persist to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let windows = [
            ("allowed_hours", self.allowed_hours),
            ("time_of_day.morning", self.time_of_day.morning),
            ("time_of_day.afternoon", self.time_of_day.afternoon),
            ("time_of_day.evening", self.time_of_day.evening),
        ];
        for (key, window) in windows {
            if window.start >= window.end {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("start must be before end, got {}", window),
                });
            }
        }
        if self.min_useful_gap_minutes < 0 {
            return Err(ConfigError::InvalidValue {
                key: "min_useful_gap_minutes".to_string(),
                message: "must not be negative".to_string(),
            });
        }
        Ok(())
    }

    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. The result is re-validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        let mut parts = key.split('.').peekable();
        let mut current = &mut json;
        loop {
            let part = parts
                .next()
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
            if parts.peek().is_some() {
                current = current
                    .get_mut(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                continue;
            }

            let obj = current
                .as_object_mut()
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
            let existing = obj
                .get(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
            let new_value = match existing {
                serde_json::Value::Number(_) => value
                    .parse::<i64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?,
                serde_json::Value::Object(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.to_string()),
            };
            obj.insert(part.to_string(), new_value);
            break;
        }

        let updated: EngineConfig =
            serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}
