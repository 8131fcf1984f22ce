//! Column labels of the registration form.
//!
//! Row-level fields are found by plain substring. Fields that depend on
//! the declared party size exist once per party width, so they are
//! described by regex templates with `{party}` and `{slot}` placeholders
//! that get expanded for each width before lookup.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::locator::{locate, Pattern};

/// Largest party the form accepts
pub const MAX_PARTY_SIZE: u8 = 7;

const PARTY_PLACEHOLDER: &str = "{party}";
const SLOT_PLACEHOLDER: &str = "{slot}";

#[derive(Error, Debug)]
#[error("invalid column pattern {pattern:?}: {source}")]
pub struct TemplateError {
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLabels {
    pub party_size: String,
    pub email: String,
    pub transportation: String,
    pub organizer: String,
    pub phone: String,
    pub primary_first_name: String,
    pub primary_last_name: String,
    pub primary_age_category: String,
    pub member_first_name: String,
    pub member_last_name: String,
    pub member_age_category: String,
}

impl Default for SheetLabels {
    fn default() -> Self {
        Self {
            party_size: "How many people are in your party".to_string(),
            email: "Email Address".to_string(),
            transportation: "How will you be getting to the event".to_string(),
            organizer: "help organize".to_string(),
            phone: r"Phone Number[\s\S]*\(Party of {party}\)".to_string(),
            primary_first_name: r"Primary Contact: First Name[\s\S]*\(Party of {party}\)".to_string(),
            primary_last_name: r"Primary Contact: Last Name[\s\S]*\(Party of {party}\)".to_string(),
            primary_age_category: r"Primary Contact: Age Category[\s\S]*\(Party of {party}\)"
                .to_string(),
            member_first_name: r"Person {slot}: First Name[\s\S]*\(Party of {party}\)".to_string(),
            member_last_name: r"Person {slot}: Last Name[\s\S]*\(Party of {party}\)".to_string(),
            member_age_category: r"Person {slot}: Age Category[\s\S]*\(Party of {party}\)"
                .to_string(),
        }
    }
}

/// Column indexes of one additional party member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberColumns {
    pub slot: usize,
    pub first_name: Option<usize>,
    pub last_name: Option<usize>,
    pub age_category: Option<usize>,
}

/// Every party-size dependent column for one party width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidthColumns {
    pub party: u8,
    pub phone: Option<usize>,
    pub first_name: Option<usize>,
    pub last_name: Option<usize>,
    pub age_category: Option<usize>,
    /// Slots 2..=party, in order
    pub members: Vec<MemberColumns>,
}

impl SheetLabels {
    pub fn party_size_pattern(&self) -> Pattern {
        Pattern::substring(self.party_size.as_str())
    }

    pub fn email_pattern(&self) -> Pattern {
        Pattern::substring(self.email.as_str())
    }

    pub fn transportation_pattern(&self) -> Pattern {
        Pattern::substring(self.transportation.as_str())
    }

    pub fn organizer_pattern(&self) -> Pattern {
        Pattern::substring(self.organizer.as_str())
    }

    /// Resolve the columns used by rows that declare `party` people
    pub fn resolve_width(&self, headers: &[String], party: u8) -> Result<WidthColumns, TemplateError> {
        let find = |template: &str, slot: Option<usize>| -> Result<Option<usize>, TemplateError> {
            let pattern = expand(template, party, slot)?;
            Ok(locate(headers, &pattern))
        };

        let members = (2..=usize::from(party))
            .map(|slot| {
                Ok(MemberColumns {
                    slot,
                    first_name: find(&self.member_first_name, Some(slot))?,
                    last_name: find(&self.member_last_name, Some(slot))?,
                    age_category: find(&self.member_age_category, Some(slot))?,
                })
            })
            .collect::<Result<Vec<_>, TemplateError>>()?;

        Ok(WidthColumns {
            party,
            phone: find(&self.phone, None)?,
            first_name: find(&self.primary_first_name, None)?,
            last_name: find(&self.primary_last_name, None)?,
            age_category: find(&self.primary_age_category, None)?,
            members,
        })
    }
}

fn expand(template: &str, party: u8, slot: Option<usize>) -> Result<Pattern, TemplateError> {
    let mut source = template.replace(PARTY_PLACEHOLDER, &party.to_string());
    if let Some(slot) = slot {
        source = source.replace(SLOT_PLACEHOLDER, &slot.to_string());
    }
    Pattern::regex(&source).map_err(|source_err| TemplateError {
        pattern: source,
        source: source_err,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        [
            "How many people are in your party",
            "Primary Contact: First Name\n(Prénom)\n(Party of 1)",
            "Primary Contact: Last Name\n(Nom de famille)\n(Party of 1)",
            "Primary Contact: First Name\n(Prénom)\n(Party of 2)",
            "Primary Contact: Last Name\n(Nom de famille)\n(Party of 2)",
            "Phone Number\n(Numéro de téléphone)\n(Party of 2)",
            "Person 2: First Name\n(Prénom)\n(Party of 2)",
            "Person 2: Last Name\n(Nom de famille)\n(Party of 2)",
            "Person 2: Age Category\n(Catégorie d'âge)\n(Party of 2)",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn test_resolve_width_one() {
        let cols = SheetLabels::default().resolve_width(&headers(), 1).unwrap();
        assert_eq!(cols.first_name, Some(1));
        assert_eq!(cols.last_name, Some(2));
        assert_eq!(cols.phone, None);
        assert_eq!(cols.age_category, None);
        assert!(cols.members.is_empty());
    }

    #[test]
    fn test_resolve_width_two() {
        let cols = SheetLabels::default().resolve_width(&headers(), 2).unwrap();
        assert_eq!(cols.first_name, Some(3));
        assert_eq!(cols.last_name, Some(4));
        assert_eq!(cols.phone, Some(5));
        assert_eq!(
            cols.members,
            vec![MemberColumns {
                slot: 2,
                first_name: Some(6),
                last_name: Some(7),
                age_category: Some(8),
            }]
        );
    }

    #[test]
    fn test_resolve_width_missing_member_columns() {
        let cols = SheetLabels::default().resolve_width(&headers(), 3).unwrap();
        assert_eq!(cols.first_name, None);
        assert_eq!(cols.members.len(), 2);
        assert!(cols.members.iter().all(|m| m.first_name.is_none()));
        assert_eq!(cols.members[1].slot, 3);
    }

    #[test]
    fn test_invalid_template_reports_pattern() {
        let labels = SheetLabels {
            phone: r"Phone (Party of {party}".to_string(),
            ..SheetLabels::default()
        };
        let err = labels.resolve_width(&headers(), 2).unwrap_err();
        assert_eq!(err.pattern, "Phone (Party of 2");
    }

    #[test]
    fn test_partial_labels_fill_defaults() {
        let labels: SheetLabels = serde_json::from_str(r#"{"email":"Courriel"}"#).unwrap();
        assert_eq!(labels.email, "Courriel");
        assert_eq!(labels.party_size, SheetLabels::default().party_size);
    }
}
