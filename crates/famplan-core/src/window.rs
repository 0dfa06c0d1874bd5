//! Wall-clock time primitives shared by the grid, the strategies and the
//! schedule types.
//!
//! All times are local `HH:MM` values inside a single day; nothing here knows
//! about timezones.

use chrono::{Duration, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Days of the target week, Monday first.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Convert a 1-based day number (Monday = 1) into a weekday.
pub fn weekday_from_number(day: u8) -> Option<Weekday> {
    match day {
        1..=7 => Some(WEEK[usize::from(day - 1)]),
        _ => None,
    }
}

/// 1-based day number of a weekday (Monday = 1).
pub fn weekday_number(day: Weekday) -> u8 {
    day.number_from_monday() as u8
}

/// Add minutes to a time of day, refusing to wrap past midnight.
pub fn add_minutes(time: NaiveTime, minutes: i64) -> Option<NaiveTime> {
    let (shifted, wrapped) = time.overflowing_add_signed(Duration::minutes(minutes));
    if wrapped == 0 {
        Some(shifted)
    } else {
        None
    }
}

/// Serde adapter storing a `NaiveTime` as `"HH:MM"`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M").map_err(serde::de::Error::custom)
    }
}

/// A half-open `[start, end)` span of wall-clock time within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Create a window; `None` unless `start < end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Build a window from hour/minute pairs.
    pub fn from_hm(start: (u32, u32), end: (u32, u32)) -> Option<Self> {
        let start = NaiveTime::from_hms_opt(start.0, start.1, 0)?;
        let end = NaiveTime::from_hms_opt(end.0, end.1, 0)?;
        Self::new(start, end)
    }

    /// Window of `minutes` length starting at `start`.
    pub fn starting_at(start: NaiveTime, minutes: i64) -> Option<Self> {
        Self::new(start, add_minutes(start, minutes)?)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Half-open intersection test.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, other: &TimeWindow) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn intersect(&self, other: &TimeWindow) -> Option<TimeWindow> {
        Self::new(self.start.max(other.start), self.end.min(other.end))
    }

    /// Minutes of `self` lying outside `target`, plus the gap between them
    /// when they do not touch at all. Zero when `target` contains `self`.
    pub fn distance_from(&self, target: &TimeWindow) -> i64 {
        let inside = self
            .intersect(target)
            .map(|shared| shared.duration_minutes())
            .unwrap_or(0);
        let outside = self.duration_minutes() - inside;
        let gap = if self.end <= target.start {
            (target.start - self.end).num_minutes()
        } else if target.end <= self.start {
            (self.start - target.end).num_minutes()
        } else {
            0
        };
        outside + gap
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// Named part of the day a goal may prefer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

/// One entry of a goal's ordered time preference: either a named part of the
/// day or an explicit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferredTime {
    Named(TimeOfDay),
    Window(TimeWindow),
}
