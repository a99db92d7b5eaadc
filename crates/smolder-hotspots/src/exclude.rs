//! Path exclusion for non-defect locations.

/// Substrings that exclude a path from scoring.
///
/// Test and migration files are presumed not to be genuine defect locations.
/// The match is case-sensitive and positional-agnostic: any occurrence
/// anywhere in the path excludes it, so `latest_report.csv` and
/// `migrationtool.py` are excluded too.
pub const EXCLUDED_MARKERS: [&str; 2] = ["test", "migration"];

/// Whether a path is excluded from scoring.
///
/// # Examples
///
/// ```
/// use smolder_hotspots::exclude::is_excluded;
///
/// assert!(is_excluded("src/tests/foo.py"));
/// assert!(is_excluded("db/migrations/0001.sql"));
/// assert!(!is_excluded("src/app.py"));
/// ```
pub fn is_excluded(path: &str) -> bool {
    EXCLUDED_MARKERS.iter().any(|marker| path.contains(marker))
}

/// Drop excluded paths, preserving the order of the rest.
pub fn filter_paths(paths: Vec<String>) -> Vec<String> {
    paths.into_iter().filter(|path| !is_excluded(path)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directories_are_excluded() {
        assert!(is_excluded("src/tests/foo.py"));
        assert!(is_excluded("test/unit.rs"));
    }

    #[test]
    fn migration_directories_are_excluded() {
        assert!(is_excluded("db/migrations/0001.sql"));
    }

    #[test]
    fn substring_match_excludes_incidental_hits() {
        assert!(is_excluded("latest_report.csv"));
        assert!(is_excluded("src/migrationtool.py"));
    }

    #[test]
    fn match_is_case_sensitive() {
        assert!(!is_excluded("src/Tests/foo.py"));
        assert!(!is_excluded("db/Migrations/0001.sql"));
    }

    #[test]
    fn ordinary_sources_are_retained() {
        assert!(!is_excluded("src/app.py"));
        assert!(!is_excluded("lib/parser.rs"));
    }

    #[test]
    fn filter_preserves_order_of_survivors() {
        let paths = vec![
            "src/app.py".to_string(),
            "src/tests/app_test.py".to_string(),
            "src/db.py".to_string(),
        ];
        assert_eq!(filter_paths(paths), vec!["src/app.py", "src/db.py"]);
    }
}
