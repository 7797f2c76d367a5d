//! Calibration due-date interpretation.
//!
//! Due markers come from spreadsheets and manual entry, so they arrive in
//! several date layouts or as a "not applicable" sentinel. Everything here is
//! total: a marker that cannot be read behaves like a tool without a due date.

use chrono::{Days, NaiveDate};

/// Layouts tried in order; the first that parses wins. A string such as
/// `03/04/2025` therefore reads as March 4th.
const DUE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y"];

const NOT_APPLICABLE: [&str; 3] = ["N/A", "NA", "NONE"];

pub fn parse_due(marker: &str) -> Option<NaiveDate> {
    let marker = marker.trim();
    if marker.is_empty()
        || NOT_APPLICABLE
            .iter()
            .any(|sentinel| marker.eq_ignore_ascii_case(sentinel))
    {
        return None;
    }
    // Timestamps such as `2025-01-31 00:00:00` carry the date in front.
    let date_part: String = marker.chars().take(10).collect();
    DUE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&date_part, format).ok())
}

pub fn is_overdue(marker: &str, today: NaiveDate) -> bool {
    parse_due(marker).is_some_and(|due| due < today)
}

/// Due within `[today, today + window_days]`, both ends inclusive.
pub fn is_due_soon(marker: &str, today: NaiveDate, window_days: i64) -> bool {
    parse_due(marker).is_some_and(|due| due >= today && within_window(due, today, window_days))
}

/// A negative window holds nothing; one reaching past the last representable
/// date has no upper bound.
fn within_window(due: NaiveDate, today: NaiveDate, window_days: i64) -> bool {
    match u64::try_from(window_days) {
        Ok(days) => today
            .checked_add_days(Days::new(days))
            .map_or(true, |end| due <= end),
        Err(_) => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationStatus {
    NotApplicable,
    Overdue,
    DueSoon,
    Scheduled,
}

pub fn classify(marker: &str, today: NaiveDate, window_days: i64) -> CalibrationStatus {
    match parse_due(marker) {
        None => CalibrationStatus::NotApplicable,
        Some(due) if due < today => CalibrationStatus::Overdue,
        Some(due) if within_window(due, today, window_days) => CalibrationStatus::DueSoon,
        Some(_) => CalibrationStatus::Scheduled,
    }
}

/// Dashboard calibration summary buckets, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationBucket {
    Overdue,
    DueIn30Days,
    DueIn60Days,
    DueIn90PlusDays,
}

impl CalibrationBucket {
    pub const ALL: [CalibrationBucket; 4] = [
        CalibrationBucket::Overdue,
        CalibrationBucket::DueIn30Days,
        CalibrationBucket::DueIn60Days,
        CalibrationBucket::DueIn90PlusDays,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CalibrationBucket::Overdue => "Overdue",
            CalibrationBucket::DueIn30Days => "Due in 30 days",
            CalibrationBucket::DueIn60Days => "Due in 60 days",
            CalibrationBucket::DueIn90PlusDays => "Due in 90+ days",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            CalibrationBucket::Overdue => "amber",
            CalibrationBucket::DueIn30Days => "yellow",
            CalibrationBucket::DueIn60Days => "blue",
            CalibrationBucket::DueIn90PlusDays => "emerald",
        }
    }
}

pub fn bucket(marker: &str, today: NaiveDate) -> Option<CalibrationBucket> {
    let due = parse_due(marker)?;
    let bucket = if due < today {
        CalibrationBucket::Overdue
    } else if within_window(due, today, 30) {
        CalibrationBucket::DueIn30Days
    } else if within_window(due, today, 60) {
        CalibrationBucket::DueIn60Days
    } else {
        CalibrationBucket::DueIn90PlusDays
    };
    Some(bucket)
}
