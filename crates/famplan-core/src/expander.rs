//! Goal expansion: one pending instance per required weekly occurrence.

use crate::engine::GenerationPreferences;
use crate::household::RecurringGoal;
use crate::schedule::TimeBlock;

/// Placement state of one goal instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementState {
    Pending,
    Placed(TimeBlock),
    Unplaced,
}

/// One occurrence of a recurring goal to place this week.
#[derive(Debug, Clone)]
pub struct GoalInstance<'g> {
    pub goal: &'g RecurringGoal,
    /// Position of the goal in the expanded goal list
    pub goal_index: usize,
    /// Occurrence number within the goal; only used for tie-breaking
    pub sequence: u32,
    pub state: PlacementState,
}

impl GoalInstance<'_> {
    pub fn is_pending(&self) -> bool {
        matches!(self.state, PlacementState::Pending)
    }
}

/// Goals taking part in this run, ordered by id (stable for equal ids).
///
/// When `include_all_goals` is off, goals named in `excluded_goal_ids` are
/// dropped before expansion.
pub fn select_goals<'g>(
    goals: &'g [RecurringGoal],
    preferences: &GenerationPreferences,
) -> Vec<&'g RecurringGoal> {
    let mut selected: Vec<&RecurringGoal> = goals
        .iter()
        .filter(|goal| {
            preferences.include_all_goals || !preferences.excluded_goal_ids.contains(&goal.id)
        })
        .collect();
    selected.sort_by(|a, b| a.id.cmp(&b.id));
    selected
}

/// Expand each goal into `frequency_per_week` pending instances.
///
/// Pure and order-preserving: goal order first, then occurrence number.
/// Goals with frequency zero (or negative, which validation rejects) emit
/// nothing.
pub fn expand_goals<'g>(goals: &[&'g RecurringGoal]) -> Vec<GoalInstance<'g>> {
    goals
        .iter()
        .enumerate()
        .flat_map(|(goal_index, &goal)| {
            let count = u32::try_from(goal.frequency_per_week).unwrap_or(0);
            (0..count).map(move |sequence| GoalInstance {
                goal,
                goal_index,
                sequence,
                state: PlacementState::Pending,
            })
        })
        .collect()
}
