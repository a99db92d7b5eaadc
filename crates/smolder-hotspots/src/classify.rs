//! Keyword classification of pull request titles.

use smolder_core::ChangeRequest;

/// Title words that mark a pull request as a bugfix.
///
/// Matching is whole-word against the lowercased title split at every
/// non-alphanumeric boundary. No stemming, no substring matching, no
/// negation handling: "fix-typo-in-docs-no-bug-here" still matches.
pub const BUGFIX_WORDS: [&str; 5] = ["bugfix", "fix", "bug", "fixes", "fixing"];

/// Decide whether a pull request title describes a bugfix.
///
/// # Examples
///
/// ```
/// use smolder_hotspots::classify::is_bugfix;
///
/// assert!(is_bugfix("Bugfix: null pointer"));
/// assert!(is_bugfix("FIX the bug"));
/// assert!(!is_bugfix("Refactor internals"));
/// ```
pub fn is_bugfix(title: &str) -> bool {
    title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| BUGFIX_WORDS.contains(&word))
}

/// Keep only the pull requests classified as bugfixes.
///
/// Non-matches are discarded silently.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use smolder_core::ChangeRequest;
/// use smolder_hotspots::classify::filter_bugfixes;
///
/// let requests = vec![
///     ChangeRequest {
///         number: 1,
///         title: "Fix login timeout".into(),
///         created_at: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
///     },
///     ChangeRequest {
///         number: 2,
///         title: "Add dark mode".into(),
///         created_at: Utc.with_ymd_and_hms(2024, 2, 2, 0, 0, 0).unwrap(),
///     },
/// ];
/// let bugfixes = filter_bugfixes(requests);
/// assert_eq!(bugfixes.len(), 1);
/// assert_eq!(bugfixes[0].number, 1);
/// ```
pub fn filter_bugfixes(requests: Vec<ChangeRequest>) -> Vec<ChangeRequest> {
    requests
        .into_iter()
        .filter(|request| is_bugfix(&request.title))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn request(number: u64, title: &str) -> ChangeRequest {
        ChangeRequest {
            number,
            title: title.into(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn bugfix_prefix_title_matches() {
        assert!(is_bugfix("Bugfix: null pointer"));
    }

    #[test]
    fn refactor_title_does_not_match() {
        assert!(!is_bugfix("Refactor internals"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(is_bugfix("FIX the bug"));
        assert!(is_bugfix("Fixes flaky retry loop"));
        assert!(is_bugfix("fixing timezone handling"));
    }

    #[test]
    fn no_negation_handling() {
        assert!(is_bugfix("fix-typo-in-docs-no-bug-here"));
    }

    #[test]
    fn keyword_embedded_in_a_longer_word_does_not_match() {
        // No substring matching: "prefix" and "bugfixes" are not keywords.
        assert!(!is_bugfix("Add prefix support"));
        assert!(!is_bugfix("Collect bugfixes dashboard"));
    }

    #[test]
    fn duplicate_keywords_still_match_once() {
        assert!(is_bugfix("fix fix fix"));
    }

    #[test]
    fn empty_title_does_not_match() {
        assert!(!is_bugfix(""));
    }

    #[test]
    fn filter_keeps_only_bugfixes() {
        let requests = vec![
            request(1, "Fix pagination overflow"),
            request(2, "Bump dependencies"),
            request(3, "bug in session expiry"),
        ];
        let bugfixes = filter_bugfixes(requests);
        let numbers: Vec<u64> = bugfixes.iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![1, 3]);
    }

    #[test]
    fn filter_of_empty_input_is_empty() {
        assert!(filter_bugfixes(Vec::new()).is_empty());
    }
}
