//! Strategy policy: how goal instances are ordered and how candidate slots
//! are ranked.
//!
//! The three strategies are a closed set resolved once per run from the
//! request's strategy name. Each pairs an ordering comparator with a slot
//! scorer; both are pure functions of their inputs.

mod ordering;
mod scoring;

pub use ordering::OrderKey;
pub use scoring::{RankedSlot, SlotContext, SlotScore};

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, ScoringWeights, TimeOfDayWindows};
use crate::engine::GenerationPreferences;
use crate::error::ValidationError;

/// Named optimization strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    #[default]
    Balanced,
    EnergyOptimized,
    GoalFocused,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::Balanced,
        StrategyKind::EnergyOptimized,
        StrategyKind::GoalFocused,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Balanced => "balanced",
            StrategyKind::EnergyOptimized => "energy-optimized",
            StrategyKind::GoalFocused => "goal-focused",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StrategyKind::Balanced => {
                "High priority first, short goals early; slots nearest the preferred time"
            }
            StrategyKind::EnergyOptimized => {
                "Like balanced, but high-energy goals lean to mornings \
                 and low-energy goals to evenings"
            }
            StrategyKind::GoalFocused => {
                "High priority first, then goals with the most occurrences left, round-robin"
            }
        }
    }
}

impl FromStr for StrategyKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownStrategy(s.to_string()))
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strategy resolved for one run, with the request's bias hints applied.
#[derive(Debug, Clone)]
pub struct Strategy {
    kind: StrategyKind,
    windows: TimeOfDayWindows,
    weights: ScoringWeights,
    min_useful_gap_minutes: i64,
    prefer_mornings: bool,
    maximize_family_time: bool,
}

impl Strategy {
    pub fn new(
        kind: StrategyKind,
        config: &EngineConfig,
        preferences: &GenerationPreferences,
    ) -> Self {
        Self {
            kind,
            windows: config.time_of_day,
            weights: config.scoring,
            min_useful_gap_minutes: config.min_useful_gap_minutes,
            prefer_mornings: preferences.prefer_mornings,
            maximize_family_time: preferences.maximize_family_time,
        }
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    pub fn windows(&self) -> &TimeOfDayWindows {
        &self.windows
    }
}
