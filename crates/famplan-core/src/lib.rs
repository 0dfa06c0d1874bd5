//! # Famplan Core Library
//!
//! This library turns a household's fixed weekly commitments and flexible
//! recurring goals into a conflict-free weekly time-block assignment per
//! family member. A CLI binary drives the same library; persistence,
//! authentication and UI live with the caller.
//!
//! ## Architecture
//!
//! - **Time Grid**: booked intervals per owner per day, with free-window queries
//! - **Goal Expander**: one instance per required weekly occurrence
//! - **Strategy Policy**: `balanced`, `energy-optimized`, `goal-focused`
//! - **Placement Engine**: places instances into the grid in strategy order
//! - **Summary / Assembler**: fulfillment counts and the ordered schedule
//!
//! ## Key Components
//!
//! - [`ScheduleEngine`]: entry point for a generation run
//! - [`TimeGrid`]: per-run record of occupied time
//! - [`EngineConfig`]: allowed hours, time-of-day windows and scoring weights
//! - [`HouseholdSource`]: collaborator trait supplying household inputs

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod expander;
pub mod grid;
pub mod household;
pub mod ids;
pub mod placement;
pub mod schedule;
pub mod strategy;
pub mod summary;
pub mod window;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{EngineConfig, ScoringWeights, TimeOfDayWindows};
pub use engine::{GenerationPreferences, GenerationRequest, GenerationResult, ScheduleEngine};
pub use error::{ConfigError, CoreError, EngineError, OverlapError, ValidationError};
pub use expander::{GoalInstance, PlacementState};
pub use grid::{Booking, BookingSource, GridConflict, TimeGrid};
pub use household::{
    EnergyLevel, FamilyMember, Household, HouseholdSource, MemberPreferences, MemberRole, Owner,
    Priority, RecurringCommitment, RecurringGoal,
};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use schedule::{BlockType, TimeBlock, WeeklySchedule};
pub use strategy::StrategyKind;
pub use summary::{ScheduleSummary, UnplacedGoal};
pub use window::{PreferredTime, TimeOfDay, TimeWindow};
