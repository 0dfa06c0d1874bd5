use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::{EnergyLevel, Owner};
use crate::schedule::BlockType;
use crate::window::{weekday_from_number, PreferredTime, WEEK};

/// Goal priority. Ordinal: LOW < MEDIUM < HIGH.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low = 0,
    #[default]
    Medium = 1,
    High = 2,
}

/// A flexible weekly goal, e.g. "exercise 3x/week, 30 min, mornings".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringGoal {
    pub id: String,
    pub owner: Owner,
    pub name: String,
    pub frequency_per_week: i32,
    pub preferred_duration_minutes: i32,
    /// Ordered preference; the first entry is tried on every day before the
    /// next one.
    #[serde(default)]
    pub preferred_times: Vec<PreferredTime>,
    /// Days to try first (1 = Monday). Remaining days follow Monday first.
    #[serde(default)]
    pub preferred_days: Vec<u8>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub energy: Option<EnergyLevel>,
    #[serde(default)]
    pub block_type: Option<BlockType>,
}

impl RecurringGoal {
    pub fn new(
        id: impl Into<String>,
        owner: Owner,
        name: impl Into<String>,
        frequency_per_week: i32,
        preferred_duration_minutes: i32,
    ) -> Self {
        Self {
            id: id.into(),
            owner,
            name: name.into(),
            frequency_per_week,
            preferred_duration_minutes,
            preferred_times: Vec::new(),
            preferred_days: Vec::new(),
            priority: Priority::default(),
            energy: None,
            block_type: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_preferred_time(mut self, time: PreferredTime) -> Self {
        self.preferred_times.push(time);
        self
    }

    pub fn with_preferred_days(mut self, days: &[u8]) -> Self {
        self.preferred_days = days.to_vec();
        self
    }

    pub fn with_energy(mut self, energy: EnergyLevel) -> Self {
        self.energy = Some(energy);
        self
    }

    pub fn with_block_type(mut self, block_type: BlockType) -> Self {
        self.block_type = Some(block_type);
        self
    }

    pub fn block_type(&self) -> BlockType {
        self.block_type.unwrap_or(BlockType::Goal)
    }

    /// Day search order: preferred days first, then the rest of the week
    /// Monday to Sunday. Each weekday appears once.
    pub fn day_order(&self) -> Vec<Weekday> {
        let mut order: Vec<Weekday> = Vec::with_capacity(7);
        let preferred = self.preferred_days.iter().filter_map(|d| weekday_from_number(*d));
        for day in preferred.chain(WEEK) {
            if !order.contains(&day) {
                order.push(day);
            }
        }
        order
    }
}
