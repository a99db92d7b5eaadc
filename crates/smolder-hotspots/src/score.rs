//! Score accumulation and ranking.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use smolder_core::{BugfixRecord, ChangeSet, FileScore, SmolderError};

use crate::{classify, exclude, weight};

/// Number of entries in the ranked output.
pub const MAX_RESULTS: usize = 10;

/// Classify and weigh a run's change sets into bugfix records.
///
/// Non-bugfix requests are dropped; surviving requests carry their decayed
/// weight and their touched files after exclusion filtering.
///
/// # Errors
///
/// Returns [`SmolderError::Domain`] when the repository age is not strictly
/// positive.
pub fn weigh_bugfixes(
    now: DateTime<Utc>,
    repository_created_at: DateTime<Utc>,
    changes: &[ChangeSet],
) -> Result<Vec<BugfixRecord>, SmolderError> {
    let mut records = Vec::new();
    for change in changes {
        if !classify::is_bugfix(&change.request.title) {
            continue;
        }
        let w = weight::recency_weight(now, repository_created_at, change.request.created_at)?;
        records.push(BugfixRecord {
            request: change.request.clone(),
            weight: w,
            files: exclude::filter_paths(change.files.clone()),
        });
    }
    Ok(records)
}

/// Fold bugfix records into a score table by pure addition.
///
/// Each record contributes its weight once per listed file; a file listed
/// twice in one record contributes twice. Entries keep first-contribution
/// order, which later becomes the tie-break order of the ranking.
pub fn accumulate(records: &[BugfixRecord]) -> Vec<FileScore> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut table: Vec<FileScore> = Vec::new();
    for record in records {
        for file in &record.files {
            match index.get(file) {
                Some(&slot) => table[slot].score += record.weight,
                None => {
                    index.insert(file.clone(), table.len());
                    table.push(FileScore {
                        path: file.clone(),
                        score: record.weight,
                    });
                }
            }
        }
    }
    table
}

/// Run the full scoring pipeline: classify → weight → accumulate → rank.
///
/// Returns at most [`MAX_RESULTS`] entries, sorted by score descending; equal
/// scores keep first-contribution order. An empty input produces an empty
/// list.
///
/// # Errors
///
/// Returns [`SmolderError::Domain`] when the repository age is not strictly
/// positive, even when no change set survives classification.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use smolder_core::{ChangeRequest, ChangeSet};
/// use smolder_hotspots::score::rank_hotspots;
///
/// let created = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
/// let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let changes = vec![ChangeSet {
///     request: ChangeRequest {
///         number: 1,
///         title: "Fix pagination overflow".into(),
///         created_at: now,
///     },
///     files: vec!["src/app.py".into(), "src/tests/app_test.py".into()],
/// }];
///
/// let ranked = rank_hotspots(now, created, &changes).unwrap();
/// assert_eq!(ranked.len(), 1);
/// assert_eq!(ranked[0].path, "src/app.py");
/// assert_eq!(ranked[0].score, 0.5);
/// ```
pub fn rank_hotspots(
    now: DateTime<Utc>,
    repository_created_at: DateTime<Utc>,
    changes: &[ChangeSet],
) -> Result<Vec<FileScore>, SmolderError> {
    // The age precondition holds for the run, not per record.
    weight::repository_age_seconds(now, repository_created_at)?;

    let records = weigh_bugfixes(now, repository_created_at, changes)?;
    let mut table = accumulate(&records);
    table.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    table.truncate(MAX_RESULTS);
    Ok(table)
}
