use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One historical pull request, as returned by the data source.
///
/// Immutable once fetched; owned by the scoring pipeline for the duration of
/// one run.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use smolder_core::ChangeRequest;
///
/// let request = ChangeRequest {
///     number: 42,
///     title: "Fix off-by-one in pagination".into(),
///     created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
/// };
/// assert_eq!(request.number, 42);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRequest {
    /// Pull request number.
    pub number: u64,
    /// Pull request title, as written.
    pub title: String,
    /// When the pull request was opened.
    pub created_at: DateTime<Utc>,
}

/// A change request joined with the file paths it touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSet {
    /// The pull request.
    pub request: ChangeRequest,
    /// Paths touched by the pull request, relative to the repository root.
    pub files: Vec<String>,
}

/// A change request classified as a bugfix, annotated with its decayed
/// weight and its touched files after exclusion filtering.
///
/// The weight lies in the open interval (0, 1): near 0 for fixes as old as
/// the repository, near 1 for very recent fixes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BugfixRecord {
    /// The underlying pull request.
    pub request: ChangeRequest,
    /// Recency-decayed contribution weight.
    pub weight: f64,
    /// Touched paths that survived exclusion filtering.
    pub files: Vec<String>,
}

/// One entry in the ranked hotspot table.
///
/// # Examples
///
/// ```
/// use smolder_core::FileScore;
///
/// let entry = FileScore {
///     path: "src/app.py".into(),
///     score: 0.7,
/// };
/// assert!(entry.score > 0.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileScore {
    /// File path relative to the repository root.
    pub path: String,
    /// Accumulated bugfix weight.
    pub score: f64,
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument
/// parsing.
///
/// # Examples
///
/// ```
/// use smolder_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "markdown".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn output_format_default_is_text() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }

    #[test]
    fn change_request_serializes_camel_case() {
        let request = ChangeRequest {
            number: 7,
            title: "Fix crash on empty input".into(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn change_request_timestamp_roundtrips() {
        let request = ChangeRequest {
            number: 1,
            title: "bugfix".into(),
            created_at: Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap(),
        };
        let json = serde_json::to_string(&request).unwrap();
        let parsed: ChangeRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.created_at, request.created_at);
    }

    #[test]
    fn file_score_serializes_camel_case() {
        let entry = FileScore {
            path: "src/main.rs".into(),
            score: 1.5,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json.get("path").unwrap(), "src/main.rs");
        assert!(json.get("score").is_some());
    }
}
