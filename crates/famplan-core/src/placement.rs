//! Placement engine: the search that turns pending goal instances into
//! time blocks.
//!
//! For each instance, in strategy order:
//! - Walk the goal's preferred windows in order, then the whole allowed
//!   window as a fallback
//! - Within each pass walk the goal's day order, skipping days already used by
//!   another instance of the same goal
//! - On the first day with candidates, rank them and book the winner
//!
//! An instance no day can take is marked unplaced. That is a reported
//! outcome, never an error.

use std::collections::HashMap;

use chrono::Weekday;

use crate::expander::{GoalInstance, PlacementState};
use crate::grid::{BookingSource, TimeGrid};
use crate::household::{EnergyLevel, FamilyMember};
use crate::schedule::{BlockFactory, TimeBlock};
use crate::strategy::{OrderKey, RankedSlot, SlotContext, Strategy};
use crate::window::TimeWindow;

/// One search pass: a sub-window of the allowed hours plus the window the
/// scorer measures proximity against.
#[derive(Debug, Clone, Copy)]
struct Pass {
    search: TimeWindow,
    preferred: Option<TimeWindow>,
}

pub struct PlacementEngine<'r> {
    strategy: &'r Strategy,
    allowed: TimeWindow,
    owner_energy: HashMap<&'r str, EnergyLevel>,
}

impl<'r> PlacementEngine<'r> {
    pub fn new(strategy: &'r Strategy, allowed: TimeWindow, members: &'r [FamilyMember]) -> Self {
        let owner_energy = members
            .iter()
            .filter_map(|m| m.preferences.energy_level.map(|level| (m.id.as_str(), level)))
            .collect();
        Self {
            strategy,
            allowed,
            owner_energy,
        }
    }

    /// Attempt every pending instance, mutating `grid` and each instance's
    /// state. Returns the goal blocks in placement order.
    pub fn place_all(
        &self,
        grid: &mut TimeGrid,
        instances: &mut [GoalInstance<'_>],
        factory: &mut BlockFactory<'_>,
    ) -> Vec<TimeBlock> {
        let goal_count = instances.iter().map(|i| i.goal_index + 1).max().unwrap_or(0);
        let mut remaining = vec![0usize; goal_count];
        for instance in instances.iter().filter(|i| i.is_pending()) {
            remaining[instance.goal_index] += 1;
        }
        let mut used_days: Vec<Vec<Weekday>> = vec![Vec::new(); goal_count];
        let mut placed = Vec::new();

        while let Some(next) = self.next_instance(instances, &remaining) {
            let instance = &instances[next];
            let goal = instance.goal;
            let goal_index = instance.goal_index;
            remaining[goal_index] -= 1;

            let found = self.find_slot(grid, instance, &used_days[goal_index]);
            let state = match found {
                Some((day, slot)) => {
                    let booking = BookingSource::Goal(goal_index);
                    match grid.insert(&goal.owner, day, slot.block, booking) {
                        Ok(()) => {
                            tracing::debug!(
                                goal = %goal.id,
                                sequence = instance.sequence,
                                day = %day,
                                slot = %slot.block,
                                distance = slot.score.distance,
                                bias = slot.score.bias,
                                "goal instance placed"
                            );
                            let block = factory.for_goal(goal, day, slot.block);
                            used_days[goal_index].push(day);
                            placed.push(block.clone());
                            PlacementState::Placed(block)
                        }
                        Err(conflict) => {
                            tracing::warn!(
                                goal = %goal.id,
                                %conflict,
                                "chosen slot no longer free"
                            );
                            PlacementState::Unplaced
                        }
                    }
                }
                None => {
                    tracing::warn!(
                        goal = %goal.id,
                        owner = %goal.owner,
                        sequence = instance.sequence,
                        duration_minutes = goal.preferred_duration_minutes,
                        "no free window for goal instance this week"
                    );
                    PlacementState::Unplaced
                }
            };
            instances[next].state = state;
        }

        placed
    }

    /// Index of the pending instance the strategy wants next.
    fn next_instance(&self, instances: &[GoalInstance<'_>], remaining: &[usize]) -> Option<usize> {
        instances
            .iter()
            .enumerate()
            .filter(|(_, instance)| instance.is_pending())
            .map(|(index, instance)| {
                let key = OrderKey {
                    priority: instance.goal.priority,
                    duration_minutes: instance.goal.preferred_duration_minutes,
                    remaining: remaining[instance.goal_index],
                    goal_index: instance.goal_index,
                    sequence: instance.sequence,
                };
                (index, key)
            })
            .min_by(|(_, a), (_, b)| self.strategy.compare(a, b))
            .map(|(index, _)| index)
    }

    /// Search passes for a goal: each preferred window clipped to the allowed
    /// hours, then the whole allowed window.
    fn passes(&self, instance: &GoalInstance<'_>) -> Vec<Pass> {
        let windows = self.strategy.windows();
        let preferred: Vec<TimeWindow> = instance
            .goal
            .preferred_times
            .iter()
            .map(|p| windows.resolve(p))
            .collect();

        let mut passes: Vec<Pass> = preferred
            .iter()
            .filter_map(|window| {
                window.intersect(&self.allowed).map(|search| Pass {
                    search,
                    preferred: Some(*window),
                })
            })
            .collect();
        passes.push(Pass {
            search: self.allowed,
            preferred: preferred.first().copied(),
        });
        passes
    }

    fn find_slot(
        &self,
        grid: &TimeGrid,
        instance: &GoalInstance<'_>,
        used_days: &[Weekday],
    ) -> Option<(Weekday, RankedSlot)> {
        let goal = instance.goal;
        let duration = i64::from(goal.preferred_duration_minutes);
        let owner_energy = goal
            .owner
            .member_id()
            .and_then(|id| self.owner_energy.get(id).copied());
        let days: Vec<Weekday> = goal
            .day_order()
            .into_iter()
            .filter(|day| !used_days.contains(day))
            .collect();

        for pass in self.passes(instance) {
            for &day in &days {
                let candidates = grid.candidate_windows(&goal.owner, day, duration, pass.search);
                if candidates.is_empty() {
                    continue;
                }
                let ctx = SlotContext {
                    goal,
                    owner_energy,
                    day,
                    preferred: pass.preferred,
                };
                if let Some(slot) = self.strategy.rank(&ctx, &candidates) {
                    return Some((day, slot));
                }
            }
        }
        None
    }
}
