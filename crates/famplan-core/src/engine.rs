//! Schedule generation entry point.
//!
//! Flow of one run:
//! 1. Resolve the strategy name and validate every input
//! 2. Seed a fresh [`TimeGrid`] with the fixed commitments
//! 3. Expand goals into instances and place them in strategy order
//! 4. Assemble the [`WeeklySchedule`] and its [`ScheduleSummary`]
//!
//! The engine holds no mutable state between runs, so independent runs may
//! execute in parallel. Nothing is returned until a run completes.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::error::{EngineError, ValidationError};
use crate::expander::{expand_goals, select_goals};
use crate::grid::TimeGrid;
use crate::household::{FamilyMember, HouseholdSource, Owner, RecurringCommitment, RecurringGoal};
use crate::ids::IdGenerator;
use crate::placement::PlacementEngine;
use crate::schedule::{BlockFactory, WeeklySchedule};
use crate::strategy::{Strategy, StrategyKind};
use crate::summary::ScheduleSummary;
use crate::window::PreferredTime;

fn default_true() -> bool {
    true
}

/// Preference flags attached to a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationPreferences {
    /// Fixed blocks are never overridden; `false` is accepted but ignored.
    #[serde(default = "default_true")]
    pub respect_fixed_blocks: bool,
    /// When off, goals listed in `excluded_goal_ids` are skipped.
    #[serde(default = "default_true")]
    pub include_all_goals: bool,
    #[serde(default)]
    pub prefer_mornings: bool,
    #[serde(default)]
    pub maximize_family_time: bool,
    #[serde(default)]
    pub excluded_goal_ids: Vec<String>,
}

impl Default for GenerationPreferences {
    fn default() -> Self {
        Self {
            respect_fixed_blocks: true,
            include_all_goals: true,
            prefer_mornings: false,
            maximize_family_time: false,
            excluded_goal_ids: Vec::new(),
        }
    }
}

/// What the caller asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub user_id: String,
    /// Must be a Monday.
    pub week_start: NaiveDate,
    /// Strategy name; the configured default when absent.
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub preferences: GenerationPreferences,
}

impl GenerationRequest {
    pub fn new(user_id: impl Into<String>, week_start: NaiveDate) -> Self {
        Self {
            user_id: user_id.into(),
            week_start,
            strategy: None,
            preferences: GenerationPreferences::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    pub fn with_preferences(mut self, preferences: GenerationPreferences) -> Self {
        self.preferences = preferences;
        self
    }
}

/// Everything a completed run hands back for persistence and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub schedule: WeeklySchedule,
    pub summary: ScheduleSummary,
}

/// The schedule generation engine.
#[derive(Debug, Clone, Default)]
pub struct ScheduleEngine {
    config: EngineConfig,
}

impl ScheduleEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Run the engine over inputs pulled from a household source.
    pub fn generate_from(
        &self,
        source: &dyn HouseholdSource,
        request: &GenerationRequest,
        ids: &mut dyn IdGenerator,
        clock: &dyn Clock,
    ) -> Result<GenerationResult, EngineError> {
        let members = source.members();
        let commitments = source.commitments(request.week_start);
        let goals = source.goals();
        self.generate(&members, &commitments, &goals, request, ids, clock)
    }

    /// Generate a week.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidInput`] if the request or household is
    /// malformed, [`EngineError::Overlap`] if two fixed commitments collide.
    /// Goals that cannot be placed are reported in the summary instead.
    pub fn generate(
        &self,
        members: &[FamilyMember],
        commitments: &[RecurringCommitment],
        goals: &[RecurringGoal],
        request: &GenerationRequest,
        ids: &mut dyn IdGenerator,
        clock: &dyn Clock,
    ) -> Result<GenerationResult, EngineError> {
        let kind = match &request.strategy {
            Some(name) => name.parse::<StrategyKind>()?,
            None => self.config.default_strategy,
        };
        validate(members, commitments, goals, request)?;

        if !request.preferences.respect_fixed_blocks {
            tracing::warn!("respectFixedBlocks=false ignored: fixed blocks are never overridden");
        }
        tracing::info!(
            user = %request.user_id,
            week_start = %request.week_start,
            strategy = %kind,
            members = members.len(),
            commitments = commitments.len(),
            goals = goals.len(),
            "generating weekly schedule"
        );

        let mut grid = TimeGrid::new();
        grid.seed(commitments)?;

        let selected = select_goals(goals, &request.preferences);
        let mut instances = expand_goals(&selected);
        let strategy = Strategy::new(kind, &self.config, &request.preferences);

        let mut factory = BlockFactory::new(request.week_start, ids);
        let fixed = commitments
            .iter()
            .filter_map(|c| c.weekday().map(|day| factory.fixed(c, day)))
            .collect::<Vec<_>>();

        let placement = PlacementEngine::new(&strategy, self.config.allowed_hours, members);
        let placed = placement.place_all(&mut grid, &mut instances, &mut factory);

        let schedule = WeeklySchedule::assemble(
            factory.schedule_id().to_string(),
            request.user_id.clone(),
            request.week_start,
            kind,
            clock.now(),
            fixed,
            placed,
        );
        let summary = ScheduleSummary::from_run(&instances, &schedule.blocks);

        tracing::info!(
            schedule = %schedule.id,
            blocks = summary.total_blocks,
            goals_scheduled = summary.goals_scheduled,
            total_goals = summary.total_goals,
            conflicts = summary.conflicts,
            "weekly schedule generated"
        );

        Ok(GenerationResult { schedule, summary })
    }
}

/// Reject malformed input before any placement work.
pub fn validate(
    members: &[FamilyMember],
    commitments: &[RecurringCommitment],
    goals: &[RecurringGoal],
    request: &GenerationRequest,
) -> Result<(), ValidationError> {
    let weekday = request.week_start.weekday();
    if weekday != Weekday::Mon {
        return Err(ValidationError::WeekStartNotMonday(request.week_start, weekday));
    }

    let mut roster: HashSet<&str> = HashSet::with_capacity(members.len());
    for member in members {
        if !roster.insert(member.id.as_str()) {
            return Err(ValidationError::DuplicateMember(member.id.clone()));
        }
    }
    let check_owner = |owner: &Owner, context: String| match owner {
        Owner::Member(id) if !roster.contains(id.as_str()) => Err(ValidationError::UnknownMember {
            context,
            member: id.clone(),
        }),
        _ => Ok(()),
    };

    for commitment in commitments {
        let context = format!("Commitment '{}'", commitment.title);
        check_owner(&commitment.owner, context.clone())?;
        if commitment.weekday().is_none() {
            return Err(ValidationError::InvalidDay {
                context,
                day: commitment.day_of_week,
            });
        }
        if commitment.window().is_none() {
            return Err(ValidationError::InvalidTimeRange {
                context,
                start: commitment.start_time.format("%H:%M").to_string(),
                end: commitment.end_time.format("%H:%M").to_string(),
            });
        }
    }

    let mut goal_ids: HashSet<&str> = HashSet::with_capacity(goals.len());
    for goal in goals {
        if !goal_ids.insert(goal.id.as_str()) {
            return Err(ValidationError::DuplicateGoal(goal.id.clone()));
        }
        let context = format!("Goal '{}'", goal.id);
        check_owner(&goal.owner, context.clone())?;
        if goal.frequency_per_week < 0 {
            return Err(ValidationError::NegativeFrequency {
                goal: goal.id.clone(),
                frequency: goal.frequency_per_week,
            });
        }
        if goal.preferred_duration_minutes <= 0 {
            return Err(ValidationError::NonPositiveDuration {
                goal: goal.id.clone(),
                minutes: goal.preferred_duration_minutes,
            });
        }
        if let Some(day) = goal
            .preferred_days
            .iter()
            .copied()
            .find(|d| !(1..=7).contains(d))
        {
            return Err(ValidationError::InvalidDay { context, day });
        }
        for preferred in &goal.preferred_times {
            if let PreferredTime::Window(window) = preferred {
                if window.start >= window.end {
                    return Err(ValidationError::InvalidTimeRange {
                        context: format!("{context} preferred window"),
                        start: window.start.format("%H:%M").to_string(),
                        end: window.end.format("%H:%M").to_string(),
                    });
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::household::MemberRole;
    use crate::ids::SequentialIds;
    use crate::schedule::BlockType;
    use crate::window::TimeWindow;
    use chrono::{DateTime, Utc};

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn roster() -> Vec<FamilyMember> {
        vec![FamilyMember::new("mom", "Mom", MemberRole::Primary)]
    }

    fn clock() -> FixedClock {
        FixedClock(DateTime::<Utc>::UNIX_EPOCH)
    }

    #[test]
    fn week_start_must_be_monday() {
        let request = GenerationRequest::new("u", monday().succ_opt().unwrap());
        let err = validate(&roster(), &[], &[], &request).unwrap_err();
        assert!(matches!(err, ValidationError::WeekStartNotMonday(_, Weekday::Tue)));
    }

    #[test]
    fn unknown_owner_rejected() {
        let goal = RecurringGoal::new("g", Owner::member("ghost"), "Haunt", 1, 30);
        let err = validate(&roster(), &[], &[goal], &GenerationRequest::new("u", monday()))
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UnknownMember { ref member, .. } if member == "ghost"
        ));
    }

    #[test]
    fn shared_owner_needs_no_roster_entry() {
        let goal = RecurringGoal::new("g", Owner::Shared, "Dinner", 1, 60);
        assert!(validate(&roster(), &[], &[goal], &GenerationRequest::new("u", monday())).is_ok());
    }

    #[test]
    fn negative_frequency_and_bad_duration_rejected() {
        let request = GenerationRequest::new("u", monday());
        let negative = RecurringGoal::new("g", Owner::member("mom"), "Run", -1, 30);
        assert!(matches!(
            validate(&roster(), &[], &[negative], &request),
            Err(ValidationError::NegativeFrequency { .. })
        ));
        let zero = RecurringGoal::new("g", Owner::member("mom"), "Run", 1, 0);
        assert!(matches!(
            validate(&roster(), &[], &[zero], &request),
            Err(ValidationError::NonPositiveDuration { .. })
        ));
    }

    #[test]
    fn inverted_commitment_rejected() {
        let mut work = RecurringCommitment::new(
            Owner::member("mom"),
            1,
            TimeWindow::from_hm((8, 0), (16, 0)).unwrap(),
            "Work",
            BlockType::Work,
        );
        std::mem::swap(&mut work.start_time, &mut work.end_time);
        assert!(matches!(
            validate(&roster(), &[work], &[], &GenerationRequest::new("u", monday())),
            Err(ValidationError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn duplicate_member_rejected() {
        let mut members = roster();
        members.push(FamilyMember::new("mom", "Other mom", MemberRole::Spouse));
        assert_eq!(
            validate(&members, &[], &[], &GenerationRequest::new("u", monday())),
            Err(ValidationError::DuplicateMember("mom".into()))
        );
    }

    #[test]
    fn duplicate_goal_rejected() {
        let goals = [
            RecurringGoal::new("run", Owner::member("mom"), "Run", 1, 30),
            RecurringGoal::new("run", Owner::member("mom"), "Evening run", 1, 30),
        ];
        let request = GenerationRequest::new("u", monday());
        assert_eq!(
            validate(&roster(), &[], &goals, &request),
            Err(ValidationError::DuplicateGoal("run".into()))
        );

        let err = ScheduleEngine::default()
            .generate(&roster(), &[], &goals, &request, &mut SequentialIds::new(), &clock())
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidInput(ValidationError::DuplicateGoal(_))
        ));
    }

    #[test]
    fn unknown_strategy_fails_before_any_work() {
        let engine = ScheduleEngine::default();
        let request = GenerationRequest::new("u", monday()).with_strategy("fastest");
        let err = engine
            .generate(&roster(), &[], &[], &request, &mut SequentialIds::new(), &clock())
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidInput(ValidationError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn default_strategy_comes_from_config() {
        let config = EngineConfig {
            default_strategy: StrategyKind::GoalFocused,
            ..EngineConfig::default()
        };
        let engine = ScheduleEngine::new(config);
        let result = engine
            .generate(
                &roster(),
                &[],
                &[],
                &GenerationRequest::new("u", monday()),
                &mut SequentialIds::new(),
                &clock(),
            )
            .unwrap();
        assert_eq!(result.schedule.strategy, StrategyKind::GoalFocused);
        assert_eq!(result.schedule.generated_at, DateTime::<Utc>::UNIX_EPOCH);
        assert!(result.schedule.is_generated);
        assert_eq!(result.schedule.id, "sched-0001");
    }

    #[test]
    fn request_parses_with_defaults() {
        let request: GenerationRequest =
            serde_json::from_str(r#"{"userId": "u1", "weekStart": "2026-10-19"}"#).unwrap();
        assert_eq!(request.week_start, monday());
        assert!(request.preferences.respect_fixed_blocks);
        assert!(request.preferences.include_all_goals);
        assert_eq!(request.strategy, None);
    }
}
