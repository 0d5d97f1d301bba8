//! Query matching module
//!
//! Picks at most one asset file name for a free-form query string:
//! 1. Containment: case-insensitive substring test, first candidate wins
//! 2. Fuzzy: approximate substring search, best score wins
//!
//! The containment result is final whenever one exists; the fuzzy stage is
//! only consulted when no candidate contains the query.

mod fuzzy;

pub use fuzzy::{fuzzy_score, fuzzy_search, FuzzyHit, FuzzyOptions};

/// Which stage produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Containment,
    Fuzzy,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Containment => write!(f, "containment"),
            Self::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

/// Result of a match attempt
///
/// `NotFound` is a normal outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchOutcome<'a> {
    Found {
        name: &'a str,
        stage: Stage,
        /// Fuzzy score of the winning hit, `0.0` for containment matches
        score: f64,
    },
    NotFound,
}

impl<'a> MatchOutcome<'a> {
    pub const fn name(&self) -> Option<&'a str> {
        match self {
            Self::Found { name, .. } => Some(*name),
            Self::NotFound => None,
        }
    }

    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}

/// Two-stage query matcher
///
/// Holds only the fuzzy options, so one instance can be shared across
/// requests without synchronization.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    options: FuzzyOptions,
}

impl Matcher {
    pub const fn new(options: FuzzyOptions) -> Self {
        Self { options }
    }

    /// Select the best candidate for `query`
    pub fn find<'a, S: AsRef<str>>(&self, candidates: &'a [S], query: &str) -> MatchOutcome<'a> {
        if let Some(name) = contains_match(candidates, query) {
            return MatchOutcome::Found {
                name,
                stage: Stage::Containment,
                score: 0.0,
            };
        }

        fuzzy_search(candidates, query, &self.options)
            .into_iter()
            .next()
            .map_or(MatchOutcome::NotFound, |hit| MatchOutcome::Found {
                name: hit.name,
                stage: Stage::Fuzzy,
                score: hit.score,
            })
    }
}

/// Find the best match using default fuzzy options
///
/// # Examples
/// ```
/// use picfind::matcher::find_best_match;
///
/// let files = ["cat.png", "dog.jpg", "catdog.svg"];
/// assert_eq!(find_best_match(&files, "cat"), Some("cat.png"));
/// assert_eq!(find_best_match(&files, "zzz"), None);
/// ```
pub fn find_best_match<'a, S: AsRef<str>>(candidates: &'a [S], query: &str) -> Option<&'a str> {
    Matcher::default().find(candidates, query).name()
}

/// Containment stage: first candidate that contains `query`, ignoring case
pub fn contains_match<'a, S: AsRef<str>>(candidates: &'a [S], query: &str) -> Option<&'a str> {
    let needle = query.to_lowercase();
    candidates
        .iter()
        .map(AsRef::as_ref)
        .find(|candidate| candidate.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_containment_match_wins() {
        let files = ["cat.png", "dog.jpg", "catdog.svg"];
        assert_eq!(find_best_match(&files, "cat"), Some("cat.png"));
        assert_eq!(find_best_match(&files, "dog"), Some("dog.jpg"));
    }

    #[test]
    fn test_containment_ignores_case() {
        let files = ["Logo.PNG"];
        assert_eq!(find_best_match(&files, "logo"), Some("Logo.PNG"));
        assert_eq!(find_best_match(&files, "LOGO.png"), Some("Logo.PNG"));
    }

    #[test]
    fn test_containment_short_circuits_fuzzy() {
        // "sunset.png" scores better by edit distance, but "xsunsetx.jpg"
        // contains the query verbatim and must win outright
        let files = ["sunset.png", "xsunsetx.jpg"];
        let outcome = Matcher::default().find(&files, "sunsetx");
        assert_eq!(outcome.name(), Some("xsunsetx.jpg"));
        assert!(matches!(
            outcome,
            MatchOutcome::Found {
                stage: Stage::Containment,
                ..
            }
        ));
    }

    #[test]
    fn test_fuzzy_fallback_on_typo() {
        let files = ["sunrise.jpg", "sunset.png"];
        let outcome = Matcher::default().find(&files, "sunst");
        assert_eq!(outcome.name(), Some("sunset.png"));
        assert!(matches!(
            outcome,
            MatchOutcome::Found {
                stage: Stage::Fuzzy,
                ..
            }
        ));
    }

    #[test]
    fn test_not_found() {
        let files = ["a.png", "b.png"];
        assert_eq!(
            Matcher::default().find(&files, "zzz"),
            MatchOutcome::NotFound
        );
    }

    #[test]
    fn test_empty_candidates() {
        let files: [&str; 0] = [];
        assert_eq!(find_best_match(&files, "anything"), None);
        assert_eq!(find_best_match(&files, ""), None);
    }

    #[test]
    fn test_empty_query_returns_first() {
        let files = ["b.png", "a.png"];
        assert_eq!(find_best_match(&files, ""), Some("b.png"));
    }

    #[test]
    fn test_special_characters_are_literal() {
        let files = ["a.png", "weird (1).png", "x+y.gif"];
        assert_eq!(find_best_match(&files, "(1)"), Some("weird (1).png"));
        assert_eq!(find_best_match(&files, "x+y"), Some("x+y.gif"));
        assert_eq!(contains_match(&files, ".*"), None);
        assert_eq!(contains_match(&files, "[a-z]"), None);
    }

    #[test]
    fn test_owned_candidates() {
        let files = vec!["Cat.png".to_string(), "dog.png".to_string()];
        assert_eq!(find_best_match(&files, "CAT"), Some("Cat.png"));
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Containment.to_string(), "containment");
        assert_eq!(Stage::Fuzzy.to_string(), "fuzzy");
    }
}
