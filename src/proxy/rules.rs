//! Trailing-slash path normalization.
//!
//! # Responsibilities
//! - Decide whether a backend path must end with a trailing slash
//! - Encode the backend's routing contract: collections take a slash,
//!   action endpoints and item-by-id endpoints reject one
//!
//! # Design Decisions
//! - A closed decision table of typed rules in fixed priority order,
//!   not a generic router: exact no-slash → exact slash → numeric id
//!   → collection prefix → default (no slash). First match wins.
//! - Numeric-id detection is a plain ASCII digit check, no regex, so
//!   UUID-like or alphabetic suffixes never misfire.
//! - `normalize` is a pure function; trailing slashes on the input are
//!   trimmed before matching.

use std::collections::HashSet;

use crate::config::schema::RulesConfig;

/// Which rule classified a path. Order is the evaluation priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Exact match in the no-slash table (action/auth endpoints).
    ExactNoSlash,
    /// Exact match in the slash table (bare collection).
    ExactSlash,
    /// Final segment is one or more decimal digits (resource by id).
    NumericId,
    /// First segment is a known collection (nested collection path).
    Collection,
    /// No rule matched; the backend default is no trailing slash.
    Default,
}

/// Compiled trailing-slash rule tables.
#[derive(Debug, Clone)]
pub struct PathRules {
    no_slash: HashSet<String>,
    slash: HashSet<String>,
}

impl PathRules {
    pub fn from_config(config: &RulesConfig) -> Self {
        Self {
            no_slash: config.no_slash.iter().cloned().collect(),
            slash: config.slash.iter().cloned().collect(),
        }
    }

    /// Classify a path (already trimmed of trailing slashes) against the
    /// rule table, in fixed priority order.
    fn classify(&self, path: &str) -> Rule {
        if self.no_slash.contains(path) {
            return Rule::ExactNoSlash;
        }
        if self.slash.contains(path) {
            return Rule::ExactSlash;
        }
        if ends_in_numeric_id(path) {
            return Rule::NumericId;
        }
        let first = path.split('/').next().unwrap_or("");
        if !first.is_empty() && self.slash.contains(first) {
            return Rule::Collection;
        }
        Rule::Default
    }

    /// Normalize a backend path to the trailing-slash convention the
    /// backend expects. Pure function; `normalize("")` returns `""`.
    pub fn normalize(&self, path: &str) -> String {
        let trimmed = path.trim_end_matches('/');
        let rule = self.classify(trimmed);
        tracing::trace!(path = trimmed, rule = ?rule, "path classified");
        match rule {
            Rule::ExactSlash | Rule::Collection => format!("{trimmed}/"),
            Rule::ExactNoSlash | Rule::NumericId | Rule::Default => trimmed.to_string(),
        }
    }
}

/// True when the path ends with `/` followed by one or more ASCII digits.
/// A bare numeric path ("123") has no slash and does not match.
fn ends_in_numeric_id(path: &str) -> bool {
    match path.rsplit_once('/') {
        Some((_, last)) => !last.is_empty() && last.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> PathRules {
        PathRules::from_config(&RulesConfig::default())
    }

    #[test]
    fn auth_endpoints_never_take_a_slash() {
        let rules = rules();
        for path in ["auth/login", "auth/register", "auth/refresh", "auth/me"] {
            assert_eq!(rules.normalize(path), path);
            // Even when the caller supplied one.
            assert_eq!(rules.normalize(&format!("{path}/")), path);
        }
    }

    #[test]
    fn action_endpoints_never_take_a_slash() {
        let rules = rules();
        for path in [
            "transcriptions/upload",
            "texts/normalize",
            "texts/extract",
            "texts/compare",
            "texts/export/docx",
        ] {
            assert_eq!(rules.normalize(path), path);
        }
    }

    #[test]
    fn bare_collection_gets_exactly_one_slash() {
        let rules = rules();
        assert_eq!(rules.normalize("transcriptions"), "transcriptions/");
        assert_eq!(rules.normalize("transcriptions/"), "transcriptions/");
        assert_eq!(rules.normalize("transcriptions//"), "transcriptions/");
    }

    #[test]
    fn numeric_ids_strip_the_slash() {
        let rules = rules();
        assert_eq!(rules.normalize("transcriptions/123"), "transcriptions/123");
        assert_eq!(rules.normalize("transcriptions/123/"), "transcriptions/123");
        assert_eq!(rules.normalize("users/1"), "users/1");
        assert_eq!(rules.normalize("texts/999"), "texts/999");
    }

    #[test]
    fn numeric_id_beats_collection_default() {
        let rules = rules();
        // "transcriptions" is in the slash set, but an item-by-id path
        // under it must not carry a slash.
        assert_eq!(rules.classify("transcriptions/456789"), Rule::NumericId);
    }

    #[test]
    fn nested_collection_paths_get_a_slash() {
        let rules = rules();
        assert_eq!(
            rules.normalize("transcriptions/something"),
            "transcriptions/something/"
        );
        assert_eq!(
            rules.normalize("transcriptions/123/segments"),
            "transcriptions/123/segments/"
        );
    }

    #[test]
    fn uuid_like_suffixes_are_not_numeric_ids() {
        let rules = rules();
        assert_eq!(
            rules.normalize("transcriptions/abc-123-def"),
            "transcriptions/abc-123-def/"
        );
        assert_eq!(
            rules.normalize("transcriptions/uuid-string"),
            "transcriptions/uuid-string/"
        );
    }

    #[test]
    fn unknown_paths_default_to_no_slash() {
        let rules = rules();
        assert_eq!(rules.normalize("some/random/path"), "some/random/path");
        assert_eq!(rules.normalize("unknown/endpoint/"), "unknown/endpoint");
    }

    #[test]
    fn empty_path_stays_empty() {
        assert_eq!(rules().normalize(""), "");
    }
}
