//! Joined views over parsed participants and families.
//!
//! Participants reference their family by `family_id`. The join tolerates
//! participants whose family is missing: they are collected as orphans
//! instead of being dropped or causing a failure.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::{AgeGroup, Family, Participant};
use crate::parser::SETUP_CREW_ROLE;

/// Both entity lists produced from one registration sheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub participants: Vec<Participant>,
    pub families: Vec<Family>,
}

/// A family together with the participants that reference it
#[derive(Debug, Clone)]
pub struct Household<'a> {
    pub family: &'a Family,
    pub members: Vec<&'a Participant>,
}

impl Household<'_> {
    pub fn primary_contact(&self) -> Option<&Participant> {
        self.members
            .iter()
            .copied()
            .find(|p| p.id == self.family.primary_contact_id)
    }

    pub fn needs_transportation(&self) -> bool {
        self.members.iter().any(|p| p.needs_transportation)
    }
}

/// Group participants under their families, preserving family order.
/// Returns the households and the participants with no matching family.
pub fn build_households<'a>(
    participants: &'a [Participant],
    families: &'a [Family],
) -> (Vec<Household<'a>>, Vec<&'a Participant>) {
    let mut by_family: HashMap<u32, Vec<&Participant>> = HashMap::new();
    for p in participants {
        by_family.entry(p.family_id).or_default().push(p);
    }

    let households = families
        .iter()
        .map(|family| Household {
            family,
            members: by_family.remove(&family.id).unwrap_or_default(),
        })
        .collect();

    // Whatever is left never matched a family id
    let mut orphans: Vec<&Participant> = by_family.into_values().flatten().collect();
    orphans.sort_by(|a, b| a.family_id.cmp(&b.family_id).then_with(|| a.id.cmp(&b.id)));

    (households, orphans)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterStats {
    pub participants: usize,
    pub families: usize,
    pub by_age_group: BTreeMap<AgeGroup, usize>,
    pub needs_transportation: usize,
    pub setup_crew: usize,
    pub checked_in: usize,
}

impl RosterStats {
    pub fn compute(roster: &Roster) -> Self {
        let mut stats = RosterStats {
            participants: roster.participants.len(),
            families: roster.families.len(),
            ..Default::default()
        };

        for p in &roster.participants {
            *stats.by_age_group.entry(p.age_group).or_insert(0) += 1;
            if p.needs_transportation {
                stats.needs_transportation += 1;
            }
            if p.has_role(SETUP_CREW_ROLE) {
                stats.setup_crew += 1;
            }
            if p.checked_in {
                stats.checked_in += 1;
            }
        }

        stats
    }

    pub fn count_for(&self, group: AgeGroup) -> usize {
        self.by_age_group.get(&group).copied().unwrap_or(0)
    }
}
