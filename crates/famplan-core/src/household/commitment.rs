use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::Owner;
use crate::schedule::BlockType;
use crate::window::{hhmm, weekday_from_number, TimeWindow};

/// A fixed weekly commitment such as work or school.
///
/// Already resolved by the collaborator to a concrete day of the target week.
/// The engine never moves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringCommitment {
    #[serde(default)]
    pub id: Option<String>,
    pub owner: Owner,
    /// 1 = Monday ... 7 = Sunday
    pub day_of_week: u8,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub title: String,
    pub block_type: BlockType,
}

impl RecurringCommitment {
    pub fn new(
        owner: Owner,
        day_of_week: u8,
        window: TimeWindow,
        title: impl Into<String>,
        block_type: BlockType,
    ) -> Self {
        Self {
            id: None,
            owner,
            day_of_week,
            start_time: window.start,
            end_time: window.end,
            title: title.into(),
            block_type,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn weekday(&self) -> Option<Weekday> {
        weekday_from_number(self.day_of_week)
    }

    /// `None` when the commitment does not satisfy `start < end`.
    pub fn window(&self) -> Option<TimeWindow> {
        TimeWindow::new(self.start_time, self.end_time)
    }
}

impl std::fmt::Display for RecurringCommitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'{}' ({}, day {}, {}-{})",
            self.title,
            self.owner,
            self.day_of_week,
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}
