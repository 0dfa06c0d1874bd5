use serde::{Deserialize, Serialize};

/// Role of a family member in the household.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MemberRole {
    Primary,
    Spouse,
    Child,
}

/// Energy category used by the energy-optimized strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    Low,
    Medium,
    High,
}

/// Optional preference tags attached to a member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPreferences {
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub energy_level: Option<EnergyLevel>,
}

/// A member of the household roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    pub id: String,
    pub name: String,
    pub role: MemberRole,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub preferences: MemberPreferences,
}

impl FamilyMember {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: MemberRole) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            age: None,
            preferences: MemberPreferences::default(),
        }
    }

    pub fn with_energy(mut self, level: EnergyLevel) -> Self {
        self.preferences.energy_level = Some(level);
        self
    }
}
