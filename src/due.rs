//! Due-date evaluation.
//!
//! Date tokens must be exactly `YYYY-MM-DD`; anything else fails with
//! [`DuewatchError::InvalidDateFormat`] and the candidate is skipped from
//! due evaluation (not surfaced as a user error - sync only needs the raw
//! token). A parsed date means local midnight of that day.

use crate::error::{DuewatchError, Result};
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};
use regex::Regex;
use std::sync::LazyLock;

static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Classification of a due date against the current instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    /// Due instant is strictly before now.
    Overdue,
    /// Due instant is at or after now, within the threshold window.
    DueSoon {
        /// Whole hours remaining, floor of seconds-remaining / 3600.
        hours_left: i64,
    },
    /// Due instant is beyond the threshold window.
    NotYetDue,
}

impl DueStatus {
    /// Whether the status warrants a reminder.
    pub fn is_urgent(&self) -> bool {
        !matches!(self, Self::NotYetDue)
    }
}

/// Parse a `YYYY-MM-DD` token to local midnight of that date.
pub fn parse_due_date(token: &str) -> Result<DateTime<Local>> {
    if !DATE_SHAPE.is_match(token) {
        return Err(DuewatchError::invalid_date(token));
    }
    let date = NaiveDate::parse_from_str(token, "%Y-%m-%d")
        .map_err(|_| DuewatchError::invalid_date(token))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| DuewatchError::invalid_date(token))?;
    // On a DST gap the earliest valid local time stands in for midnight.
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .ok_or_else(|| DuewatchError::invalid_date(token))
}

/// Classify a due instant against `now` and the due-soon threshold.
pub fn classify(due: DateTime<Local>, now: DateTime<Local>, threshold: Duration) -> DueStatus {
    if due < now {
        return DueStatus::Overdue;
    }
    let remaining = due - now;
    if remaining <= threshold {
        DueStatus::DueSoon {
            hours_left: remaining.num_seconds().div_euclid(3600),
        }
    } else {
        DueStatus::NotYetDue
    }
}

/// Parse and classify in one step.
///
/// Returns `Err(InvalidDateFormat)` for tokens that fail the shape or
/// name no real calendar date.
pub fn evaluate(token: &str, now: DateTime<Local>, threshold: Duration) -> Result<DueStatus> {
    let due = parse_due_date(token)?;
    Ok(classify(due, now, threshold))
}
