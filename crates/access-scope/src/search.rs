//! Free-text employee search.
//!
//! A term matches an employee when any of the following hold:
//!
//! - the term is a substring of the employee's plantilla key;
//! - the term is numeric and the term prefixed with
//!   [`crate::PLANTILLA_PREFIX`] is a substring of the plantilla key;
//! - any whitespace-separated word longer than one character is a
//!   case-insensitive substring of the name;
//! - the whole term is a case-insensitive substring of the name.

use serde::Serialize;

use crate::employee::{Employee, PLANTILLA_PREFIX};

/// Parsed free-text search term.
///
/// # Examples
/// ```
/// use access_scope::SearchTerm;
///
/// let term = SearchTerm::parse("  maria  de lopez ").expect("non-empty term");
/// assert_eq!(term.as_str(), "maria  de lopez");
/// assert_eq!(term.name_patterns(), ["maria", "de", "lopez", "maria  de lopez"]);
/// assert!(SearchTerm::parse("   ").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SearchTerm {
    term: String,
}

impl SearchTerm {
    /// Parse user input; blank input yields no term.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let term = input.trim();
        if term.is_empty() {
            return None;
        }
        Some(Self {
            term: term.to_owned(),
        })
    }

    /// Trimmed term.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.term
    }

    /// Whether the term consists solely of ASCII digits.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.term.chars().all(|c| c.is_ascii_digit())
    }

    /// Substrings searched for in the plantilla key.
    #[must_use]
    pub fn plantilla_patterns(&self) -> Vec<String> {
        let mut patterns = vec![self.term.clone()];
        if self.is_numeric() {
            patterns.push(format!("{PLANTILLA_PREFIX}{}", self.term));
        }
        patterns
    }

    /// Lowercased substrings searched for in the name.
    ///
    /// Single-character words are skipped; the whole term comes last unless
    /// it is itself one of the words.
    #[must_use]
    pub fn name_patterns(&self) -> Vec<String> {
        let mut patterns: Vec<String> = self
            .term
            .split_whitespace()
            .filter(|word| word.chars().count() > 1)
            .map(str::to_lowercase)
            .collect();
        let whole = self.term.to_lowercase();
        if !patterns.contains(&whole) {
            patterns.push(whole);
        }
        patterns
    }

    /// Whether `employee` matches the term.
    #[must_use]
    pub fn matches(&self, employee: &Employee) -> bool {
        let key = employee.employee_number.plantilla_key();
        if self
            .plantilla_patterns()
            .iter()
            .any(|pattern| key.contains(pattern.as_str()))
        {
            return true;
        }
        let name = employee.name.to_lowercase();
        self.name_patterns()
            .iter()
            .any(|pattern| name.contains(pattern.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::employee::EmployeeNumber;
    use crate::scope::OrganizationalScope;

    #[fixture]
    fn employee() -> Employee {
        Employee::new(
            EmployeeNumber::new(20902),
            "María Fernanda LÓPEZ Ortiz",
            OrganizationalScope::general_direction(18),
        )
    }

    #[rstest]
    #[case("20902")]
    #[case("0902")]
    #[case("120902")]
    #[case("lópez")]
    #[case("fernanda")]
    #[case("ortiz garcía")]
    #[case("FERNANDA LÓPEZ")]
    fn matching_terms(employee: Employee, #[case] raw: &str) {
        let term = SearchTerm::parse(raw).expect("non-empty term");
        assert!(term.matches(&employee), "{raw} should match");
    }

    #[rstest]
    #[case("30874")]
    #[case("garcía")]
    #[case("a b")]
    fn non_matching_terms(employee: Employee, #[case] raw: &str) {
        let term = SearchTerm::parse(raw).expect("non-empty term");
        assert!(!term.matches(&employee), "{raw} should not match");
    }

    #[rstest]
    fn numeric_terms_add_a_prefixed_pattern() {
        let term = SearchTerm::parse("209").expect("non-empty term");
        assert_eq!(term.plantilla_patterns(), ["209", "1209"]);
    }

    #[rstest]
    fn text_terms_search_the_key_verbatim_only() {
        let term = SearchTerm::parse("ana").expect("non-empty term");
        assert_eq!(term.plantilla_patterns(), ["ana"]);
    }
}
