//! Schedule output types and the assembler that packages a run's blocks.

use std::fmt::Write as _;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::household::{Owner, RecurringCommitment, RecurringGoal};
use crate::ids::IdGenerator;
use crate::strategy::StrategyKind;
use crate::window::{hhmm, weekday_from_number, weekday_number, TimeWindow};

/// Type of schedule block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Work,
    School,
    Exercise,
    Family,
    Chore,
    Meal,
    Personal,
    Appointment,
    /// Default for goal-derived blocks
    Goal,
    Other,
}

/// The atomic scheduled unit.
///
/// Either copied from a fixed commitment (`goal_id` is `None`) or created by
/// the placement engine for one goal instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBlock {
    pub id: String,
    pub schedule_id: String,
    pub goal_id: Option<String>,
    pub commitment_id: Option<String>,
    pub title: String,
    pub block_type: BlockType,
    pub owner: Owner,
    pub day_of_week: u8,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub is_shared: bool,
}

impl TimeBlock {
    pub fn weekday(&self) -> Option<Weekday> {
        weekday_from_number(self.day_of_week)
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow {
            start: self.start_time,
            end: self.end_time,
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    pub fn is_fixed(&self) -> bool {
        self.goal_id.is_none()
    }

    /// Whether the two blocks may not coexist: same day, overlapping time,
    /// and the same owner or either one shared.
    pub fn conflicts_with(&self, other: &TimeBlock) -> bool {
        let same_calendar = self.owner == other.owner || self.is_shared || other.is_shared;
        self.date == other.date && same_calendar && self.window().overlaps(&other.window())
    }
}

/// Builds blocks for one schedule, drawing ids from the caller's generator.
pub struct BlockFactory<'a> {
    schedule_id: String,
    week_start: NaiveDate,
    ids: &'a mut dyn IdGenerator,
}

impl<'a> BlockFactory<'a> {
    pub fn new(week_start: NaiveDate, ids: &'a mut dyn IdGenerator) -> Self {
        let schedule_id = ids.schedule_id();
        Self {
            schedule_id,
            week_start,
            ids,
        }
    }

    pub fn schedule_id(&self) -> &str {
        &self.schedule_id
    }

    pub fn date_of(&self, day: Weekday) -> NaiveDate {
        self.week_start + Duration::days(i64::from(day.num_days_from_monday()))
    }

    /// Copy a fixed commitment verbatim into a block.
    pub fn fixed(&mut self, commitment: &RecurringCommitment, day: Weekday) -> TimeBlock {
        TimeBlock {
            id: self.ids.block_id(),
            schedule_id: self.schedule_id.clone(),
            goal_id: None,
            commitment_id: commitment.id.clone(),
            title: commitment.title.clone(),
            block_type: commitment.block_type,
            owner: commitment.owner.clone(),
            day_of_week: commitment.day_of_week,
            date: self.date_of(day),
            start_time: commitment.start_time,
            end_time: commitment.end_time,
            is_shared: commitment.owner.is_shared(),
        }
    }

    /// A block placed for one occurrence of `goal`.
    pub fn for_goal(
        &mut self,
        goal: &RecurringGoal,
        day: Weekday,
        window: TimeWindow,
    ) -> TimeBlock {
        TimeBlock {
            id: self.ids.block_id(),
            schedule_id: self.schedule_id.clone(),
            goal_id: Some(goal.id.clone()),
            commitment_id: None,
            title: goal.name.clone(),
            block_type: goal.block_type(),
            owner: goal.owner.clone(),
            day_of_week: weekday_number(day),
            date: self.date_of(day),
            start_time: window.start,
            end_time: window.end,
            is_shared: goal.owner.is_shared(),
        }
    }
}

/// The generated week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySchedule {
    pub id: String,
    pub user_id: String,
    pub week_start: NaiveDate,
    pub is_generated: bool,
    pub strategy: StrategyKind,
    pub generated_at: DateTime<Utc>,
    /// Ordered by day, then start time.
    pub blocks: Vec<TimeBlock>,
}

impl WeeklySchedule {
    /// Package fixed and placed blocks into one schedule ordered by day then
    /// start time. Ties fall back to end time, owner, title and id so the
    /// order never depends on insertion order.
    pub fn assemble(
        id: String,
        user_id: String,
        week_start: NaiveDate,
        strategy: StrategyKind,
        generated_at: DateTime<Utc>,
        fixed: Vec<TimeBlock>,
        placed: Vec<TimeBlock>,
    ) -> Self {
        let mut blocks: Vec<TimeBlock> = fixed.into_iter().chain(placed).collect();
        blocks.sort_by(|a, b| {
            (a.date, a.start_time, a.end_time, &a.owner, &a.title, &a.id).cmp(&(
                b.date,
                b.start_time,
                b.end_time,
                &b.owner,
                &b.title,
                &b.id,
            ))
        });

        Self {
            id,
            user_id,
            week_start,
            is_generated: true,
            strategy,
            generated_at,
            blocks,
        }
    }

    /// Blocks visible on `owner`'s calendar: their own plus shared ones.
    pub fn blocks_for<'s>(&'s self, owner: &'s Owner) -> impl Iterator<Item = &'s TimeBlock> + 's {
        self.blocks
            .iter()
            .filter(move |b| &b.owner == owner || b.is_shared)
    }

    pub fn blocks_on(&self, day: Weekday) -> impl Iterator<Item = &TimeBlock> {
        let number = weekday_number(day);
        self.blocks.iter().filter(move |b| b.day_of_week == number)
    }

    /// Plain-text agenda, one heading per day that has blocks.
    pub fn agenda(&self) -> String {
        let mut out = String::new();
        let mut current: Option<NaiveDate> = None;
        for block in &self.blocks {
            if current != Some(block.date) {
                if current.is_some() {
                    out.push('\n');
                }
                let _ = writeln!(out, "{} {}", block.date.format("%a"), block.date);
                current = Some(block.date);
            }
            let marker = if block.is_fixed() { "fixed" } else { "goal" };
            let _ = writeln!(
                out,
                "  {} {:<10} {} [{:?}, {}]",
                block.window(),
                block.owner.to_string(),
                block.title,
                block.block_type,
                marker
            );
        }
        out
    }
}
