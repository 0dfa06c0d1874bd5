//! Time grid: booked intervals per owner per day of the target week.
//!
//! A member's calendar is blocked by their own bookings and by every shared
//! booking. A shared booking is blocked by anything booked on that day.

use std::collections::BTreeMap;

use chrono::Weekday;
use thiserror::Error;

use crate::error::{EngineError, OverlapError, ValidationError};
use crate::household::{Owner, RecurringCommitment};
use crate::window::TimeWindow;

/// What put a booking on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingSource {
    /// Index into the commitments passed to [`TimeGrid::seed`]
    Commitment(usize),
    /// Index of the goal in the run's goal list
    Goal(usize),
}

/// A booked interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Booking {
    pub window: TimeWindow,
    pub source: BookingSource,
}

/// An insert that no longer fits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{owner} is already booked on {day} at {existing} (requested {requested})")]
pub struct GridConflict {
    pub owner: Owner,
    pub day: Weekday,
    pub requested: TimeWindow,
    pub existing: TimeWindow,
}

/// Per-run record of occupied time. Never shared between runs.
#[derive(Debug, Clone, Default)]
pub struct TimeGrid {
    days: [BTreeMap<Owner, Vec<Booking>>; 7],
}

impl TimeGrid {
    pub fn new() -> Self {
        Self::default()
    }

    fn day(&self, day: Weekday) -> &BTreeMap<Owner, Vec<Booking>> {
        &self.days[day.num_days_from_monday() as usize]
    }

    /// Bookings that block `owner` on `day`.
    fn blocking<'a>(
        &'a self,
        owner: &'a Owner,
        day: Weekday,
    ) -> impl Iterator<Item = &'a Booking> + 'a {
        self.day(day)
            .iter()
            .filter(move |(booked_for, _)| {
                owner.is_shared() || booked_for.is_shared() || *booked_for == owner
            })
            .flat_map(|(_, bookings)| bookings.iter())
    }

    /// First booking that intersects `window` on `owner`'s calendar.
    pub fn first_conflict(
        &self,
        owner: &Owner,
        day: Weekday,
        window: TimeWindow,
    ) -> Option<Booking> {
        self.blocking(owner, day)
            .filter(|b| b.window.overlaps(&window))
            .min_by_key(|b| b.window)
            .copied()
    }

    pub fn is_free(&self, owner: &Owner, day: Weekday, window: TimeWindow) -> bool {
        self.first_conflict(owner, day, window).is_none()
    }

    /// Bookings held directly by `owner` on `day`, ordered by start.
    pub fn bookings(&self, owner: &Owner, day: Weekday) -> &[Booking] {
        self.day(day).get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Commit an interval.
    ///
    /// # Errors
    ///
    /// Returns [`GridConflict`] if the interval intersects anything blocking
    /// `owner` on that day.
    pub fn insert(
        &mut self,
        owner: &Owner,
        day: Weekday,
        window: TimeWindow,
        source: BookingSource,
    ) -> Result<(), GridConflict> {
        if let Some(existing) = self.first_conflict(owner, day, window) {
            return Err(GridConflict {
                owner: owner.clone(),
                day,
                requested: window,
                existing: existing.window,
            });
        }

        let bookings = self.days[day.num_days_from_monday() as usize]
            .entry(owner.clone())
            .or_default();
        let at = bookings.partition_point(|b| b.window.start < window.start);
        bookings.insert(at, Booking { window, source });
        Ok(())
    }

    /// Book every fixed commitment.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidInput`] for a commitment with a bad day or time
    /// range, [`EngineError::Overlap`] naming both commitments when two of
    /// them collide.
    pub fn seed(&mut self, commitments: &[RecurringCommitment]) -> Result<(), EngineError> {
        for (index, commitment) in commitments.iter().enumerate() {
            let day = commitment.weekday().ok_or_else(|| ValidationError::InvalidDay {
                context: format!("Commitment {commitment}"),
                day: commitment.day_of_week,
            })?;
            let window = commitment.window().ok_or_else(|| ValidationError::InvalidTimeRange {
                context: format!("Commitment '{}'", commitment.title),
                start: commitment.start_time.format("%H:%M").to_string(),
                end: commitment.end_time.format("%H:%M").to_string(),
            })?;

            let clash = self
                .blocking(&commitment.owner, day)
                .filter(|b| b.window.overlaps(&window))
                .filter_map(|b| match b.source {
                    BookingSource::Commitment(i) => Some(i),
                    BookingSource::Goal(_) => None,
                })
                .min();
            if let Some(earlier) = clash {
                return Err(OverlapError {
                    day,
                    first: commitments[earlier].clone(),
                    second: commitment.clone(),
                }
                .into());
            }

            self.days[day.num_days_from_monday() as usize]
                .entry(commitment.owner.clone())
                .or_default()
                .push(Booking {
                    window,
                    source: BookingSource::Commitment(index),
                });
        }

        for day in self.days.iter_mut() {
            for bookings in day.values_mut() {
                bookings.sort_by_key(|b| b.window);
            }
        }
        tracing::debug!(commitments = commitments.len(), "time grid seeded");
        Ok(())
    }

    /// All maximal free sub-intervals of `allowed` on `owner`'s calendar that
    /// are at least `duration_minutes` long, in ascending start order.
    pub fn candidate_windows(
        &self,
        owner: &Owner,
        day: Weekday,
        duration_minutes: i64,
        allowed: TimeWindow,
    ) -> Vec<TimeWindow> {
        let mut busy: Vec<TimeWindow> = self
            .blocking(owner, day)
            .map(|b| b.window)
            .filter(|w| w.overlaps(&allowed))
            .collect();
        busy.sort();

        let mut windows = Vec::new();
        let mut cursor = allowed.start;

        for booked in &busy {
            if booked.end <= cursor {
                continue;
            }
            if booked.start > cursor {
                let gap_end = booked.start.min(allowed.end);
                if let Some(gap) = TimeWindow::new(cursor, gap_end) {
                    if gap.duration_minutes() >= duration_minutes {
                        windows.push(gap);
                    }
                }
            }
            cursor = cursor.max(booked.end.min(allowed.end));
            if cursor >= allowed.end {
                break;
            }
        }

        if let Some(tail) = TimeWindow::new(cursor, allowed.end) {
            if tail.duration_minutes() >= duration_minutes {
                windows.push(tail);
            }
        }

        windows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::BlockType;

    fn w(start: (u32, u32), end: (u32, u32)) -> TimeWindow {
        TimeWindow::from_hm(start, end).unwrap()
    }

    fn commitment(owner: Owner, day: u8, window: TimeWindow, title: &str) -> RecurringCommitment {
        RecurringCommitment::new(owner, day, window, title, BlockType::Work)
    }

    fn allowed() -> TimeWindow {
        w((6, 0), (22, 0))
    }

    #[test]
    fn empty_day_yields_whole_allowed_window() {
        let grid = TimeGrid::new();
        let windows = grid.candidate_windows(&Owner::member("a"), Weekday::Mon, 30, allowed());
        assert_eq!(windows, vec![allowed()]);
    }

    #[test]
    fn seeded_commitment_splits_the_day() {
        let mut grid = TimeGrid::new();
        grid.seed(&[commitment(Owner::member("a"), 1, w((8, 0), (16, 0)), "Work")])
            .unwrap();

        let windows = grid.candidate_windows(&Owner::member("a"), Weekday::Mon, 30, allowed());
        assert_eq!(windows, vec![w((6, 0), (8, 0)), w((16, 0), (22, 0))]);

        // Other members and other days are unaffected.
        let other = grid.candidate_windows(&Owner::member("b"), Weekday::Mon, 30, allowed());
        assert_eq!(other, vec![allowed()]);
        let tuesday = grid.candidate_windows(&Owner::member("a"), Weekday::Tue, 30, allowed());
        assert_eq!(tuesday, vec![allowed()]);
    }

    #[test]
    fn windows_shorter_than_duration_are_dropped() {
        let mut grid = TimeGrid::new();
        grid.seed(&[commitment(Owner::member("a"), 2, w((6, 20), (21, 0)), "Long shift")])
            .unwrap();

        let windows = grid.candidate_windows(&Owner::member("a"), Weekday::Tue, 30, allowed());
        assert_eq!(windows, vec![w((21, 0), (22, 0))]);
    }

    #[test]
    fn bookings_outside_allowed_hours_are_clipped() {
        let mut grid = TimeGrid::new();
        grid.seed(&[
            commitment(Owner::member("a"), 1, w((5, 0), (7, 0)), "Early"),
            commitment(Owner::member("a"), 1, w((21, 0), (23, 0)), "Late"),
        ])
        .unwrap();

        let windows = grid.candidate_windows(&Owner::member("a"), Weekday::Mon, 15, allowed());
        assert_eq!(windows, vec![w((7, 0), (21, 0))]);
    }

    #[test]
    fn shared_booking_blocks_every_member() {
        let mut grid = TimeGrid::new();
        grid.seed(&[commitment(Owner::Shared, 3, w((18, 0), (19, 0)), "Dinner")])
            .unwrap();

        assert!(!grid.is_free(&Owner::member("a"), Weekday::Wed, w((18, 30), (19, 30))));
        assert!(grid.is_free(&Owner::member("a"), Weekday::Wed, w((19, 0), (19, 30))));
    }

    #[test]
    fn shared_request_checked_against_every_member() {
        let mut grid = TimeGrid::new();
        grid.seed(&[commitment(Owner::member("kid"), 4, w((15, 0), (16, 0)), "Soccer")])
            .unwrap();

        assert!(!grid.is_free(&Owner::Shared, Weekday::Thu, w((15, 30), (16, 30))));
        let windows = grid.candidate_windows(&Owner::Shared, Weekday::Thu, 60, allowed());
        assert_eq!(windows, vec![w((6, 0), (15, 0)), w((16, 0), (22, 0))]);
    }

    #[test]
    fn overlapping_commitments_fail_seeding() {
        let mut grid = TimeGrid::new();
        let err = grid
            .seed(&[
                commitment(Owner::member("a"), 1, w((8, 0), (16, 0)), "Work"),
                commitment(Owner::member("a"), 1, w((15, 0), (17, 0)), "Class"),
            ])
            .unwrap_err();

        match err {
            EngineError::Overlap(overlap) => {
                assert_eq!(overlap.day, Weekday::Mon);
                assert_eq!(overlap.first.title, "Work");
                assert_eq!(overlap.second.title, "Class");
            }
            other => panic!("expected overlap, got {other:?}"),
        }
    }

    #[test]
    fn different_members_may_overlap() {
        let mut grid = TimeGrid::new();
        grid.seed(&[
            commitment(Owner::member("a"), 1, w((8, 0), (16, 0)), "Work"),
            commitment(Owner::member("b"), 1, w((8, 0), (15, 0)), "School"),
        ])
        .unwrap();
    }

    #[test]
    fn seed_rejects_malformed_commitment() {
        let mut grid = TimeGrid::new();
        let mut bad = commitment(Owner::member("a"), 1, w((8, 0), (9, 0)), "Oops");
        bad.day_of_week = 9;
        assert!(matches!(
            grid.seed(&[bad]),
            Err(EngineError::InvalidInput(ValidationError::InvalidDay { day: 9, .. }))
        ));
    }

    #[test]
    fn insert_keeps_bookings_sorted_and_rejects_overlap() {
        let mut grid = TimeGrid::new();
        let owner = Owner::member("a");
        grid.insert(&owner, Weekday::Fri, w((12, 0), (13, 0)), BookingSource::Goal(0))
            .unwrap();
        grid.insert(&owner, Weekday::Fri, w((7, 0), (8, 0)), BookingSource::Goal(1))
            .unwrap();

        let starts: Vec<_> = grid
            .bookings(&owner, Weekday::Fri)
            .iter()
            .map(|b| b.window)
            .collect();
        assert_eq!(starts, vec![w((7, 0), (8, 0)), w((12, 0), (13, 0))]);

        let err = grid
            .insert(&owner, Weekday::Fri, w((12, 30), (13, 30)), BookingSource::Goal(2))
            .unwrap_err();
        assert_eq!(err.existing, w((12, 0), (13, 0)));
    }
}
