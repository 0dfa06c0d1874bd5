use std::cmp::Ordering;

use super::{Strategy, StrategyKind};
use crate::household::Priority;

/// What the comparator sees of a pending goal instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderKey {
    pub priority: Priority,
    pub duration_minutes: i32,
    /// Instances of the same goal still waiting to be attempted
    pub remaining: usize,
    pub goal_index: usize,
    pub sequence: u32,
}

impl Strategy {
    /// Order in which pending instances are attempted; `Less` goes first.
    ///
    /// Balanced and energy-optimized: priority descending, shorter goals
    /// first. Goal-focused: priority descending, then the goal with the most
    /// occurrences still pending, which rotates between goals of equal
    /// priority instead of exhausting one before the next.
    pub fn compare(&self, a: &OrderKey, b: &OrderKey) -> Ordering {
        let by_priority = b.priority.cmp(&a.priority);
        let by_strategy = match self.kind {
            StrategyKind::Balanced | StrategyKind::EnergyOptimized => {
                a.duration_minutes.cmp(&b.duration_minutes)
            }
            StrategyKind::GoalFocused => b.remaining.cmp(&a.remaining),
        };
        by_priority
            .then(by_strategy)
            .then(a.goal_index.cmp(&b.goal_index))
            .then(a.sequence.cmp(&b.sequence))
    }
}
