use regex::Regex;
use tracing::debug;

/// How a column label is recognised
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Case-sensitive substring containment
    Substring(String),
    /// Regex match anywhere in the label
    Regex(Regex),
}

impl Pattern {
    pub fn substring(text: impl Into<String>) -> Self {
        Pattern::Substring(text.into())
    }

    pub fn regex(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Pattern::Regex)
    }

    pub fn matches(&self, label: &str) -> bool {
        match self {
            Pattern::Substring(needle) => label.contains(needle.as_str()),
            Pattern::Regex(re) => re.is_match(label),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Pattern::Substring(needle) => needle,
            Pattern::Regex(re) => re.as_str(),
        }
    }
}

/// Index of the first header whose raw text matches `pattern`.
///
/// Labels are matched as-is, embedded newlines included.
pub fn locate(headers: &[String], pattern: &Pattern) -> Option<usize> {
    if headers.is_empty() {
        return None;
    }

    let found = headers.iter().position(|label| pattern.matches(label));
    if found.is_none() {
        debug!(pattern = pattern.as_str(), "Column not found");
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        vec![
            "Timestamp".to_string(),
            "".to_string(),
            "How many people are in your party? / Combien de personnes?".to_string(),
            "Primary Contact: First Name\n(Prénom)\n(Party of 1)".to_string(),
            "Primary Contact: First Name\n(Prénom)\n(Party of 2)".to_string(),
            "Email Address".to_string(),
            "Email Address (confirm)".to_string(),
        ]
    }

    #[test]
    fn test_locate_substring_first_match() {
        let h = headers();
        assert_eq!(locate(&h, &Pattern::substring("How many people are in your party")), Some(2));
        assert_eq!(locate(&h, &Pattern::substring("Email Address")), Some(5));
    }

    #[test]
    fn test_locate_substring_is_case_sensitive() {
        let h = headers();
        assert_eq!(locate(&h, &Pattern::substring("email address")), None);
    }

    #[test]
    fn test_locate_regex_across_newlines() {
        let h = headers();
        let party_2 = Pattern::regex(r"Primary Contact: First Name[\s\S]*\(Party of 2\)").unwrap();
        assert_eq!(locate(&h, &party_2), Some(4));

        // The literal newline-separated label also works as a substring
        let literal = Pattern::substring("First Name\n(Prénom)\n(Party of 1)");
        assert_eq!(locate(&h, &literal), Some(3));
    }

    #[test]
    fn test_locate_not_found_and_empty_headers() {
        let h = headers();
        assert_eq!(locate(&h, &Pattern::substring("Phone Number")), None);
        assert_eq!(locate(&[], &Pattern::substring("Timestamp")), None);
    }
}
