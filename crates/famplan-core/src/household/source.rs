use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{FamilyMember, RecurringCommitment, RecurringGoal};
use crate::error::CoreError;

/// Collaborator that supplies a household's inputs for one run.
///
/// Persistence layers implement this; the engine only sees the returned
/// values.
pub trait HouseholdSource {
    /// The household roster.
    fn members(&self) -> Vec<FamilyMember>;

    /// Fixed commitments already resolved to days of the week starting at
    /// `week_start`.
    fn commitments(&self, week_start: NaiveDate) -> Vec<RecurringCommitment>;

    /// The household's goal catalog.
    fn goals(&self) -> Vec<RecurringGoal>;
}

/// In-memory household, also the JSON document accepted by the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Household {
    #[serde(default)]
    pub members: Vec<FamilyMember>,
    #[serde(default)]
    pub commitments: Vec<RecurringCommitment>,
    #[serde(default)]
    pub goals: Vec<RecurringGoal>,
}

impl Household {
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

impl HouseholdSource for Household {
    fn members(&self) -> Vec<FamilyMember> {
        self.members.clone()
    }

    fn commitments(&self, _week_start: NaiveDate) -> Vec<RecurringCommitment> {
        self.commitments.clone()
    }

    fn goals(&self) -> Vec<RecurringGoal> {
        self.goals.clone()
    }
}
