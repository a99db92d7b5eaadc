//! Logistic recency decay.
//!
//! Converts a bugfix's age, relative to the repository's lifetime, into a
//! contribution weight in (0, 1). Fixes as old as the repository score near
//! zero, very recent fixes score near one, with the curve's steep region
//! concentrated near full recency. The functional form and its constant
//! follow Google's bug prediction heuristic:
//! <https://google-engtools.blogspot.co.uk/2011/12/bug-prediction-at-google.html>

use chrono::{DateTime, Utc};
use smolder_core::SmolderError;

/// Steepness (and midpoint offset) of the logistic decay curve.
pub const DECAY_STEEPNESS: f64 = 12.0;

/// Repository age in seconds at the captured `now`.
///
/// # Errors
///
/// Returns [`SmolderError::Domain`] when the age is not strictly positive
/// (clock skew, or a repository "created" at or after `now`). Failing here
/// keeps NaN and infinity out of every downstream score.
pub fn repository_age_seconds(
    now: DateTime<Utc>,
    repository_created_at: DateTime<Utc>,
) -> Result<f64, SmolderError> {
    let age = seconds_between(repository_created_at, now);
    if age <= 0.0 {
        return Err(SmolderError::Domain(format!(
            "repository age must be positive, got {age} seconds"
        )));
    }
    Ok(age)
}

/// Weight for one bugfix, from the logistic recency curve.
///
/// `now` is captured once at run start and reused for every call, so a run's
/// weights are mutually consistent and reproducible.
///
/// # Errors
///
/// Returns [`SmolderError::Domain`] when the repository age is not strictly
/// positive.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use smolder_hotspots::weight::recency_weight;
///
/// let created = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
/// let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
///
/// // A fix opened at `now` sits at the curve's midpoint.
/// let w = recency_weight(now, created, now).unwrap();
/// assert_eq!(w, 0.5);
///
/// // A fix as old as the repository is worth almost nothing.
/// let w = recency_weight(now, created, created).unwrap();
/// assert!(w < 1e-5);
/// ```
pub fn recency_weight(
    now: DateTime<Utc>,
    repository_created_at: DateTime<Utc>,
    bugfix_created_at: DateTime<Utc>,
) -> Result<f64, SmolderError> {
    let repository_age = repository_age_seconds(now, repository_created_at)?;
    let bugfix_age = seconds_between(bugfix_created_at, now);
    let relative_recency = 1.0 - (bugfix_age / repository_age);
    Ok(1.0 / (1.0 + f64::exp(-DECAY_STEEPNESS * relative_recency + DECAY_STEEPNESS)))
}

fn seconds_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn fix_at_repository_creation_scores_near_zero() {
        let created = at(2023, 1, 1);
        let now = at(2024, 1, 1);
        let w = recency_weight(now, created, created).unwrap();
        let expected = 1.0 / (1.0 + f64::exp(12.0));
        assert!((w - expected).abs() < 1e-12, "weight {w} != {expected}");
        assert!(w < 1e-5);
    }

    #[test]
    fn fix_at_now_scores_exactly_half() {
        let created = at(2023, 1, 1);
        let now = at(2024, 1, 1);
        let w = recency_weight(now, created, now).unwrap();
        assert_eq!(w, 0.5);
    }

    #[test]
    fn fix_at_now_scores_half_for_unit_age_repository() {
        let created = at(2024, 1, 1);
        let now = created + Duration::seconds(1);
        let w = recency_weight(now, created, now).unwrap();
        assert_eq!(w, 0.5);
    }

    #[test]
    fn weight_strictly_increases_with_recency() {
        let created = at(2020, 1, 1);
        let now = at(2024, 1, 1);
        let mut previous = 0.0;
        for months in 1..=48 {
            let opened = created + Duration::days(30 * months);
            let w = recency_weight(now, created, opened).unwrap();
            assert!(
                w > previous,
                "weight {w} at month {months} not above {previous}"
            );
            previous = w;
        }
    }

    #[test]
    fn weight_stays_in_open_unit_interval() {
        let created = at(2019, 6, 1);
        let now = at(2024, 6, 1);
        for days in [0i64, 1, 400, 900, 1500, 1826] {
            let opened = created + Duration::days(days);
            let w = recency_weight(now, created, opened).unwrap();
            assert!(w > 0.0 && w < 1.0, "weight {w} out of (0, 1) at day {days}");
        }
    }

    #[test]
    fn zero_repository_age_is_a_domain_error() {
        let now = at(2024, 1, 1);
        let result = recency_weight(now, now, now);
        assert!(matches!(result, Err(SmolderError::Domain(_))));
    }

    #[test]
    fn negative_repository_age_is_a_domain_error() {
        let now = at(2024, 1, 1);
        let created = at(2024, 6, 1);
        let result = repository_age_seconds(now, created);
        assert!(matches!(result, Err(SmolderError::Domain(_))));
    }

    #[test]
    fn repository_age_counts_seconds() {
        let created = at(2024, 1, 1);
        let now = created + Duration::seconds(3600);
        assert_eq!(repository_age_seconds(now, created).unwrap(), 3600.0);
    }
}
