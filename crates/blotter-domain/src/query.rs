//! Search query and per-name search outcome

use crate::record::BookingRecord;

/// One `(last, first)` name pair to look up on the portal
///
/// Each component is trimmed to its first whitespace-separated token, so
/// `"Smith Jr., John Paul"` queries as `("Smith", "John")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    /// Last name, first token only
    pub last_name: String,

    /// First name, first token only
    pub first_name: String,
}

impl SearchQuery {
    /// Create a query, trimming each name to its first token
    pub fn new(last_name: &str, first_name: &str) -> Self {
        Self {
            last_name: first_token(last_name),
            first_name: first_token(first_name),
        }
    }

    /// Parse one input line of the form `"Lastname, Firstname"`
    ///
    /// Returns `None` for blank lines, comment lines starting with `#`,
    /// and lines without a separator. Lines using a tab instead of a
    /// comma (two-column delimited files) are accepted as well.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let (last, first) = line
            .split_once(',')
            .or_else(|| line.split_once('\t'))?;

        let query = Self::new(last, first);
        if query.last_name.is_empty() || query.first_name.is_empty() {
            return None;
        }
        Some(query)
    }

    /// Display name in the portal's `"Last, First"` convention
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

fn first_token(s: &str) -> String {
    s.split_whitespace().next().unwrap_or("").to_string()
}

/// The triple every search task yields, success or failure
///
/// On failure `summary` carries the diagnostic text and `records` is
/// empty; the caller always receives all three parts.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Display name of the query, "Last, First"
    pub name: String,

    /// Human-readable result text (or failure diagnostic)
    pub summary: String,

    /// Structured records extracted from the result blocks
    pub records: Vec<BookingRecord>,
}

impl SearchOutcome {
    /// Outcome for a task that failed before producing any records
    pub fn failure(name: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            summary: diagnostic.into(),
            records: Vec::new(),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: parsed names are single non-empty tokens
        #[test]
        fn test_parsed_names_are_single_tokens(line in ".{0,80}") {
            if let Some(query) = SearchQuery::parse_line(&line) {
                prop_assert!(!query.last_name.contains(char::is_whitespace));
                prop_assert!(!query.first_name.contains(char::is_whitespace));
                prop_assert!(!query.last_name.is_empty());
                prop_assert!(!query.first_name.is_empty());
            }
        }

        /// Property: display_name round-trips through parse_line
        #[test]
        fn test_display_name_reparses(last in "[A-Za-z]{1,12}", first in "[A-Za-z]{1,12}") {
            let query = SearchQuery::new(&last, &first);
            let reparsed = SearchQuery::parse_line(&query.display_name());
            prop_assert_eq!(reparsed, Some(query));
        }
    }
}
