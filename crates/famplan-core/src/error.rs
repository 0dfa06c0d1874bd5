//! Core error types for famplan-core.
//!
//! A generation run can only fail in two ways: the request is malformed
//! ([`ValidationError`]) or two fixed commitments collide ([`OverlapError`]).
//! A goal that cannot be placed is not an error; it is reported in the
//! schedule summary.

use std::path::PathBuf;

use chrono::{NaiveDate, Weekday};
use thiserror::Error;

use crate::household::RecurringCommitment;

/// Core error type for file-backed helpers and the CLI.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Schedule generation failed
    #[error("Schedule generation failed: {0}")]
    Engine(#[from] EngineError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors returned by a generation run.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The request was rejected before any placement work began.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Two supplied fixed commitments conflict with each other.
    #[error(transparent)]
    Overlap(#[from] Box<OverlapError>),
}

impl From<OverlapError> for EngineError {
    fn from(err: OverlapError) -> Self {
        EngineError::Overlap(Box::new(err))
    }
}

/// Two fixed commitments booked on top of each other.
///
/// Both commitments are carried back to the caller; the engine does not guess
/// which one is authoritative.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Fixed commitments overlap on {day}: {first} and {second}")]
pub struct OverlapError {
    pub day: Weekday,
    pub first: RecurringCommitment,
    pub second: RecurringCommitment,
}

/// Malformed request or household input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Week start must be a Monday
    #[error("Week start {0} is a {1}, expected a Monday")]
    WeekStartNotMonday(NaiveDate, Weekday),

    /// Unknown strategy name
    #[error("Unknown strategy '{0}' (expected balanced, energy-optimized or goal-focused)")]
    UnknownStrategy(String),

    /// Member id appears twice in the roster
    #[error("Duplicate family member id '{0}'")]
    DuplicateMember(String),

    /// Goal id appears twice in the catalog
    #[error("Duplicate goal id '{0}'")]
    DuplicateGoal(String),

    /// Owner is neither a roster member nor `shared`
    #[error("{context} references unknown family member '{member}'")]
    UnknownMember { context: String, member: String },

    /// Day of week outside 1..=7
    #[error("{context} has day of week {day}, expected 1 (Monday) to 7 (Sunday)")]
    InvalidDay { context: String, day: u8 },

    /// Invalid time range
    #[error("{context} has an invalid time range: end ({end}) must be after start ({start})")]
    InvalidTimeRange {
        context: String,
        start: String,
        end: String,
    },

    /// Negative frequency
    #[error("Goal '{goal}' has negative frequency {frequency}")]
    NegativeFrequency { goal: String, frequency: i32 },

    /// Non-positive duration
    #[error("Goal '{goal}' has non-positive duration {minutes} minutes")]
    NonPositiveDuration { goal: String, minutes: i32 },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}
