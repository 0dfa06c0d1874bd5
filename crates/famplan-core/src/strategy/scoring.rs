use chrono::{NaiveTime, Weekday};

use super::{Strategy, StrategyKind};
use crate::household::{EnergyLevel, RecurringGoal};
use crate::window::TimeWindow;

/// Everything the scorer knows about the instance being placed.
#[derive(Debug, Clone, Copy)]
pub struct SlotContext<'a> {
    pub goal: &'a RecurringGoal,
    /// Energy level of the owning member, if they declared one
    pub owner_energy: Option<EnergyLevel>,
    pub day: Weekday,
    /// The goal's first preferred window, if any
    pub preferred: Option<TimeWindow>,
}

impl SlotContext<'_> {
    /// The goal's own tag wins over the member's.
    pub fn energy(&self) -> Option<EnergyLevel> {
        self.goal.energy.or(self.owner_energy)
    }
}

/// Lower is better, compared field by field: proximity to the preferred
/// window first, then fragmentation, then the strategy's biases, then the
/// earliest start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SlotScore {
    /// Minutes outside the preferred window, plus any gap to it
    pub distance: i64,
    /// Free slivers shorter than the useful minimum left beside the block
    pub fragmentation: u8,
    /// Energy, morning and family-time adjustments; negative is a bonus
    pub bias: i64,
    pub start: NaiveTime,
}

/// The block chosen inside a candidate free window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedSlot {
    pub block: TimeWindow,
    pub score: SlotScore,
}

impl Strategy {
    /// Start times worth trying inside one free window: the window start,
    /// plus every part-of-day boundary strictly inside it that still leaves
    /// room for `duration_minutes`.
    pub fn anchors(&self, free: TimeWindow, duration_minutes: i64) -> Vec<NaiveTime> {
        let mut anchors = vec![free.start];
        let boundaries = [
            self.windows.morning.start,
            self.windows.afternoon.start,
            self.windows.evening.start,
        ];
        for boundary in boundaries {
            let fits = TimeWindow::starting_at(boundary, duration_minutes)
                .is_some_and(|block| free.contains(&block));
            if boundary > free.start && fits && !anchors.contains(&boundary) {
                anchors.push(boundary);
            }
        }
        anchors
    }

    /// Score a block of the goal's duration starting at `start` inside the
    /// free window `free`; `None` if it does not fit.
    pub fn score(
        &self,
        ctx: &SlotContext<'_>,
        free: TimeWindow,
        start: NaiveTime,
    ) -> Option<RankedSlot> {
        let duration = i64::from(ctx.goal.preferred_duration_minutes);
        let block = TimeWindow::starting_at(start, duration)?;
        if !free.contains(&block) {
            return None;
        }

        let distance = ctx
            .preferred
            .map(|preferred| block.distance_from(&preferred))
            .unwrap_or(0);

        let before = (block.start - free.start).num_minutes();
        let after = (free.end - block.end).num_minutes();
        let fragmentation = [before, after]
            .into_iter()
            .filter(|sliver| *sliver > 0 && *sliver < self.min_useful_gap_minutes)
            .count() as u8;

        let mut bias = 0;
        if self.kind == StrategyKind::EnergyOptimized {
            bias -= self.energy_bonus(ctx, &block);
        }
        if self.prefer_mornings && self.windows.morning.contains(&block) {
            bias -= self.weights.prefer_mornings_bonus;
        }
        if self.maximize_family_time {
            bias += self.family_time_adjustment(ctx, &block);
        }

        Some(RankedSlot {
            block,
            score: SlotScore {
                distance,
                fragmentation,
                bias,
                start: block.start,
            },
        })
    }

    /// Best-scoring block across the free windows of one day, or `None` when
    /// nothing fits.
    pub fn rank(&self, ctx: &SlotContext<'_>, free_windows: &[TimeWindow]) -> Option<RankedSlot> {
        let duration = i64::from(ctx.goal.preferred_duration_minutes);
        free_windows
            .iter()
            .flat_map(|free| {
                self.anchors(*free, duration)
                    .into_iter()
                    .map(move |start| (*free, start))
            })
            .filter_map(|(free, start)| self.score(ctx, free, start))
            .min_by_key(|slot| slot.score)
    }

    fn energy_bonus(&self, ctx: &SlotContext<'_>, block: &TimeWindow) -> i64 {
        let favoured = match ctx.energy() {
            Some(EnergyLevel::High) => self.windows.morning,
            Some(EnergyLevel::Low) => self.windows.evening,
            Some(EnergyLevel::Medium) | None => return 0,
        };
        if favoured.contains(block) {
            self.weights.energy_bonus
        } else {
            0
        }
    }

    /// Shared goals are pulled towards evenings and weekends; individual
    /// goals are nudged out of the evening so it stays free for the family.
    fn family_time_adjustment(&self, ctx: &SlotContext<'_>, block: &TimeWindow) -> i64 {
        let evening = self.windows.evening;
        if ctx.goal.owner.is_shared() {
            let weekend = matches!(ctx.day, Weekday::Sat | Weekday::Sun);
            if weekend || evening.contains(block) {
                -self.weights.family_time_bonus
            } else {
                0
            }
        } else if evening.overlaps(block) {
            self.weights.family_time_bonus
        } else {
            0
        }
    }
}
