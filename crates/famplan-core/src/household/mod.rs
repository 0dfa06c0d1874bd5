//! Household inputs supplied by the caller: roster, fixed commitments and
//! recurring goals.
//!
//! The engine never loads these itself; it receives them through
//! [`HouseholdSource`] and treats them as read-only for one run.

mod commitment;
mod goal;
mod member;
mod source;

pub use commitment::RecurringCommitment;
pub use goal::{Priority, RecurringGoal};
pub use member::{EnergyLevel, FamilyMember, MemberPreferences, MemberRole};
pub use source::{Household, HouseholdSource};

use serde::{Deserialize, Serialize};

/// Owner of a booking: one member, or the whole family.
///
/// Serialized as a plain string; the literal `"shared"` is the family
/// pseudo-owner, anything else is a member id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Owner {
    Shared,
    Member(String),
}

impl Owner {
    pub const SHARED: &'static str = "shared";

    pub fn member(id: impl Into<String>) -> Self {
        Owner::Member(id.into())
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, Owner::Shared)
    }

    pub fn member_id(&self) -> Option<&str> {
        match self {
            Owner::Shared => None,
            Owner::Member(id) => Some(id),
        }
    }
}

impl From<String> for Owner {
    fn from(value: String) -> Self {
        if value == Owner::SHARED {
            Owner::Shared
        } else {
            Owner::Member(value)
        }
    }
}

impl From<Owner> for String {
    fn from(owner: Owner) -> Self {
        match owner {
            Owner::Shared => Owner::SHARED.to_string(),
            Owner::Member(id) => id,
        }
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Owner::Shared => f.write_str(Owner::SHARED),
            Owner::Member(id) => f.write_str(id),
        }
    }
}
