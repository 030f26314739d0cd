//! Weekly progress calculations.
//!
//! Pure functions, callable at arbitrary read time against live data.
//! Weeks are Monday-anchored: the current week runs from the most recent
//! Monday through today, inclusive on both ends.

use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeSet;

/// Most recent Monday on or before `today`.
///
/// A Sunday anchors back to the previous Monday rather than forward to
/// the next one (Monday-first week convention).
pub fn week_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
}

/// Count of completion days inside `[week_start(today), today]`.
///
/// Dates outside that window never contribute, no matter how many there
/// are.
pub fn completed_this_week(completion_days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    completion_days.range(week_start(today)..=today).count() as u32
}

/// Completion percentage for `completed` distinct days against a weekly
/// target, clamped to `[0, 100]`.
///
/// A target of zero yields 0% instead of dividing by zero.
pub fn progress_percent(completed: u32, times_per_week: u8) -> f64 {
    if times_per_week == 0 {
        return 0.0;
    }
    (f64::from(completed) / f64::from(times_per_week) * 100.0).min(100.0)
}

/// This week's percentage for a task: window count composed with the
/// clamped percentage.
pub fn weekly_progress_percent(
    completion_days: &BTreeSet<NaiveDate>,
    times_per_week: u8,
    today: NaiveDate,
) -> f64 {
    progress_percent(completed_this_week(completion_days, today), times_per_week)
}
