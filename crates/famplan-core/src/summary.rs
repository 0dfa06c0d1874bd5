//! Fulfillment summary of a generation run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::expander::{GoalInstance, PlacementState};
use crate::household::Owner;
use crate::schedule::{BlockType, TimeBlock};

/// A goal that did not get all of its requested occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnplacedGoal {
    pub goal_id: String,
    pub name: String,
    pub owner: Owner,
    pub requested: usize,
    pub placed: usize,
}

/// Derived, read-only view of a run's outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub total_blocks: usize,
    /// Distinct goals with at least one placed instance
    pub goals_scheduled: usize,
    /// Distinct goals with a positive weekly frequency
    pub total_goals: usize,
    /// Goal instances that could not be placed anywhere this week
    pub conflicts: usize,
    pub requested_instances: usize,
    pub placed_instances: usize,
    pub distribution: BTreeMap<BlockType, usize>,
    pub unplaced_goals: Vec<UnplacedGoal>,
}

impl ScheduleSummary {
    /// Tally instances and the final block set (fixed plus placed).
    pub fn from_run(instances: &[GoalInstance<'_>], blocks: &[TimeBlock]) -> Self {
        let mut per_goal: BTreeMap<usize, (usize, usize)> = BTreeMap::new();
        let mut conflicts = 0;
        let mut placed_instances = 0;

        for instance in instances {
            let entry = per_goal.entry(instance.goal_index).or_default();
            entry.0 += 1;
            match instance.state {
                PlacementState::Placed(_) => {
                    entry.1 += 1;
                    placed_instances += 1;
                }
                PlacementState::Unplaced | PlacementState::Pending => conflicts += 1,
            }
        }

        let unplaced_goals = per_goal
            .iter()
            .filter(|(_, (requested, placed))| placed < requested)
            .filter_map(|(goal_index, (requested, placed))| {
                let goal = instances.iter().find(|i| i.goal_index == *goal_index)?.goal;
                Some(UnplacedGoal {
                    goal_id: goal.id.clone(),
                    name: goal.name.clone(),
                    owner: goal.owner.clone(),
                    requested: *requested,
                    placed: *placed,
                })
            })
            .collect();

        let mut distribution = BTreeMap::new();
        for block in blocks {
            *distribution.entry(block.block_type).or_insert(0) += 1;
        }

        Self {
            total_blocks: blocks.len(),
            goals_scheduled: per_goal.values().filter(|(_, placed)| *placed > 0).count(),
            total_goals: per_goal.len(),
            conflicts,
            requested_instances: instances.len(),
            placed_instances,
            distribution,
            unplaced_goals,
        }
    }

    /// Share of requested instances that were placed, 1.0 when nothing was
    /// requested.
    pub fn fulfillment_ratio(&self) -> f64 {
        if self.requested_instances == 0 {
            1.0
        } else {
            self.placed_instances as f64 / self.requested_instances as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::RecurringGoal;
    use crate::ids::SequentialIds;
    use crate::schedule::BlockFactory;
    use crate::window::TimeWindow;
    use chrono::{NaiveDate, Weekday};

    #[test]
    fn counts_conflicts_and_distinct_goals() {
        let run = RecurringGoal::new("run", Owner::member("a"), "Run", 2, 30)
            .with_block_type(BlockType::Exercise);
        let read = RecurringGoal::new("read", Owner::member("a"), "Read", 1, 30);

        let mut ids = SequentialIds::new();
        let mut factory =
            BlockFactory::new(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(), &mut ids);
        let window = TimeWindow::from_hm((6, 0), (6, 30)).unwrap();
        let block = factory.for_goal(&run, Weekday::Mon, window);

        let instances = vec![
            GoalInstance {
                goal: &run,
                goal_index: 0,
                sequence: 0,
                state: PlacementState::Placed(block.clone()),
            },
            GoalInstance {
                goal: &run,
                goal_index: 0,
                sequence: 1,
                state: PlacementState::Unplaced,
            },
            GoalInstance {
                goal: &read,
                goal_index: 1,
                sequence: 0,
                state: PlacementState::Unplaced,
            },
        ];

        let summary = ScheduleSummary::from_run(&instances, &[block]);
        assert_eq!(summary.total_goals, 2);
        assert_eq!(summary.goals_scheduled, 1);
        assert_eq!(summary.conflicts, 2);
        assert_eq!(summary.placed_instances + summary.conflicts, summary.requested_instances);
        assert_eq!(summary.distribution.get(&BlockType::Exercise), Some(&1));
        assert_eq!(summary.unplaced_goals.len(), 2);
        assert_eq!(summary.unplaced_goals[0].goal_id, "run");
        assert_eq!(summary.unplaced_goals[0].placed, 1);
        assert!((summary.fulfillment_ratio() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_run_is_fully_fulfilled() {
        let summary = ScheduleSummary::from_run(&[], &[]);
        assert_eq!(summary.total_goals, 0);
        assert_eq!(summary.conflicts, 0);
        assert_eq!(summary.fulfillment_ratio(), 1.0);
    }

    #[test]
    fn distribution_serializes_with_type_names() {
        let mut summary = ScheduleSummary::default();
        summary.distribution.insert(BlockType::Work, 5);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["distribution"]["work"], 5);
    }
}
