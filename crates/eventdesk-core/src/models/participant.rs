use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Age bracket a participant registered under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum AgeGroup {
    #[default]
    #[serde(rename = "adult")]
    Adult,
    #[serde(rename = "student-15+")]
    Student15Plus,
    #[serde(rename = "child-8-14")]
    Child8To14,
    #[serde(rename = "child-2-7")]
    Child2To7,
    #[serde(rename = "infant-0-2")]
    Infant0To2,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 5] = [
        AgeGroup::Adult,
        AgeGroup::Student15Plus,
        AgeGroup::Child8To14,
        AgeGroup::Child2To7,
        AgeGroup::Infant0To2,
    ];
}

impl std::fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgeGroup::Adult => write!(f, "Adult"),
            AgeGroup::Student15Plus => write!(f, "Student (15+)"),
            AgeGroup::Child8To14 => write!(f, "Child (8-14)"),
            AgeGroup::Child2To7 => write!(f, "Child (2-7)"),
            AgeGroup::Infant0To2 => write!(f, "Infant (0-2)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Participant {
    /// `p<row>_<slot>`, slot 1 being the primary contact
    pub id: String,
    pub name: String,
    #[serde(rename = "ageGroup", default)]
    pub age_group: AgeGroup,
    #[serde(rename = "familyId")]
    pub family_id: u32,
    #[serde(default)]
    pub roles: BTreeSet<String>,
    #[serde(rename = "checkedIn", default)]
    pub checked_in: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "isPrimaryContact", default)]
    pub is_primary_contact: bool,
    #[serde(rename = "needsTransportation", default)]
    pub needs_transportation: bool,
}

impl Participant {
    /// Build the participant id for a data row and party slot
    pub fn make_id(row_index: usize, slot: usize) -> String {
        format!("p{}_{}", row_index, slot)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}
