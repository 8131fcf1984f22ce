//! Free-text normalization for registration cells.
//!
//! Keyword tables are evaluated in order and the first match wins, so the
//! ordering of `AGE_SIGNATURES` decides ambiguous answers.

use crate::models::AgeGroup;
use crate::sheet::MAX_PARTY_SIZE;

/// Role granted to primary contacts who offered to help organize
pub const SETUP_CREW_ROLE: &str = "setup-crew";

/// Ordered (keywords, age group) pairs, matched against lowercased text
const AGE_SIGNATURES: &[(&[&str], AgeGroup)] = &[
    (&["adult", "18+"], AgeGroup::Adult),
    (
        &["15+", "15-17", "student", "étudiant", "etudiant", "teen", "adolescent"],
        AgeGroup::Student15Plus,
    ),
    (&["8-14", "8 - 14", "8 to 14", "8 à 14"], AgeGroup::Child8To14),
    (&["2-7", "2 - 7", "2 to 7", "2 à 7"], AgeGroup::Child2To7),
    (
        &["0-2", "0 - 2", "infant", "baby", "bébé", "bebe", "nourrisson"],
        AgeGroup::Infant0To2,
    ),
];

/// Transportation answers that mean the party rides the event shuttle
const TRANSPORT_KEYWORDS: &[&str] = &["bus", "shuttle", "navette", "autobus", "autocar"];

const TRUTHY_PREFIXES: &[&str] = &["yes", "oui"];
const TRUTHY_VALUES: &[&str] = &["true", "y", "1", "x"];

impl AgeGroup {
    /// Map a free-text age category answer. Blank or unrecognised text is `Adult`.
    pub fn from_category(text: Option<&str>) -> AgeGroup {
        let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
            return AgeGroup::Adult;
        };
        let lower = text.to_lowercase();
        AGE_SIGNATURES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(_, group)| *group)
            .unwrap_or(AgeGroup::Adult)
    }
}

pub fn needs_transportation(method: &str) -> bool {
    let lower = method.to_lowercase();
    TRANSPORT_KEYWORDS.iter().any(|k| lower.contains(k))
}

pub fn is_truthy(answer: &str) -> bool {
    let lower = answer.trim().to_lowercase();
    TRUTHY_PREFIXES.iter().any(|p| lower.starts_with(p)) || TRUTHY_VALUES.contains(&lower.as_str())
}

/// Parse a declared party size the way form sheets report integers:
/// leading sign and digits are read, trailing text is ignored.
/// Only sizes 1 through `MAX_PARTY_SIZE` are accepted.
pub fn parse_party_size(text: &str) -> Option<u8> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if negative || end == 0 {
        return None;
    }
    // Anything too long for u64 is far outside the accepted range anyway
    let value: u64 = digits[..end].parse().ok()?;
    u8::try_from(value)
        .ok()
        .filter(|size| (1..=MAX_PARTY_SIZE).contains(size))
}

/// "First Last" with surrounding whitespace removed
pub fn join_name(first: &str, last: &str) -> String {
    format!("{} {}", first.trim(), last.trim()).trim().to_string()
}

pub fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_group_default_is_adult() {
        assert_eq!(AgeGroup::from_category(None), AgeGroup::Adult);
        assert_eq!(AgeGroup::from_category(Some("")), AgeGroup::Adult);
        assert_eq!(AgeGroup::from_category(Some("   ")), AgeGroup::Adult);
        assert_eq!(AgeGroup::from_category(Some("Senior")), AgeGroup::Adult);
    }

    #[test]
    fn test_age_group_keywords() {
        assert_eq!(AgeGroup::from_category(Some("Adult / Adulte")), AgeGroup::Adult);
        assert_eq!(AgeGroup::from_category(Some("Student (15+)")), AgeGroup::Student15Plus);
        assert_eq!(AgeGroup::from_category(Some("Étudiant")), AgeGroup::Student15Plus);
        assert_eq!(AgeGroup::from_category(Some("Child (8-14)")), AgeGroup::Child8To14);
        assert_eq!(AgeGroup::from_category(Some("Enfant 2 à 7 ans")), AgeGroup::Child2To7);
        assert_eq!(AgeGroup::from_category(Some("Infant (0-2)")), AgeGroup::Infant0To2);
        assert_eq!(AgeGroup::from_category(Some("BÉBÉ")), AgeGroup::Infant0To2);
    }

    #[test]
    fn test_age_group_first_signature_wins() {
        // Mentions both brackets; the earlier signature takes it
        assert_eq!(
            AgeGroup::from_category(Some("Child 8-14 (sibling 2-7 registered separately)")),
            AgeGroup::Child8To14
        );
        assert_eq!(
            AgeGroup::from_category(Some("Teen 15+ or child 8-14")),
            AgeGroup::Student15Plus
        );
        assert_eq!(AgeGroup::from_category(Some("Adult chaperone for 0-2")), AgeGroup::Adult);
    }

    #[test]
    fn test_needs_transportation() {
        assert!(needs_transportation("Event Bus / Autobus"));
        assert!(needs_transportation("shuttle from the airport"));
        assert!(needs_transportation("Navette"));
        assert!(!needs_transportation("Car / Voiture"));
        assert!(!needs_transportation(""));
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy("Yes"));
        assert!(is_truthy("Yes / Oui"));
        assert!(is_truthy("oui, avec plaisir"));
        assert!(is_truthy(" TRUE "));
        assert!(is_truthy("x"));
        assert!(!is_truthy("No / Non"));
        assert!(!is_truthy(""));
        assert!(!is_truthy("maybe"));
    }

    #[test]
    fn test_parse_party_size_bounds() {
        assert_eq!(parse_party_size("1"), Some(1));
        assert_eq!(parse_party_size("7"), Some(7));
        assert_eq!(parse_party_size(" 3 "), Some(3));
        assert_eq!(parse_party_size("+2"), Some(2));
        assert_eq!(parse_party_size("0"), None);
        assert_eq!(parse_party_size("8"), None);
        assert_eq!(parse_party_size("-1"), None);
        assert_eq!(parse_party_size("abc"), None);
        assert_eq!(parse_party_size(""), None);
        assert_eq!(parse_party_size("99999999999999999999999"), None);
    }

    #[test]
    fn test_parse_party_size_ignores_trailing_text() {
        assert_eq!(parse_party_size("3 people"), Some(3));
        assert_eq!(parse_party_size("2.5"), Some(2));
        assert_eq!(parse_party_size("people: 3"), None);
    }

    #[test]
    fn test_join_name_and_non_empty() {
        assert_eq!(join_name(" Jane ", "Doe"), "Jane Doe");
        assert_eq!(join_name("Jane", ""), "Jane");
        assert_eq!(non_empty("  "), None);
        assert_eq!(non_empty(" 555-1234 ").as_deref(), Some("555-1234"));
    }
}
