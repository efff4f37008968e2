//! Time windows and small aggregates backing the dashboard endpoints.
//!
//! Counts themselves are computed by the database at request time; this
//! module only decides which half-open `[start, end)` ranges "today" and
//! "this week" cover.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Number of upcoming sessions listed on a dashboard.
pub const UPCOMING_SESSIONS_LIMIT: i64 = 5;

/// A half-open UTC time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

/// Years accepted by the `?date` override.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

fn out_of_range(date: NaiveDate) -> CoreError {
    CoreError::Validation(format!("Date {date} is outside the supported range"))
}

fn start_of(date: NaiveDate) -> Timestamp {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn window(start: Timestamp, days: i64, date: NaiveDate) -> Result<TimeWindow, CoreError> {
    let end = start
        .checked_add_signed(Duration::days(days))
        .ok_or_else(|| out_of_range(date))?;
    Ok(TimeWindow { start, end })
}

/// The UTC calendar day containing `date`.
pub fn day_window(date: NaiveDate) -> Result<TimeWindow, CoreError> {
    window(start_of(date), 1, date)
}

/// The ISO week (Monday 00:00 UTC to the following Monday) containing `date`.
pub fn week_window(date: NaiveDate) -> Result<TimeWindow, CoreError> {
    let monday = date
        .checked_sub_signed(Duration::days(i64::from(date.weekday().num_days_from_monday())))
        .ok_or_else(|| out_of_range(date))?;
    window(start_of(monday), 7, date)
}

/// Parse the optional `?date=YYYY-MM-DD` override, defaulting to `today`.
pub fn reference_date(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, CoreError> {
    let Some(s) = raw else {
        return Ok(today);
    };
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| CoreError::Validation(format!("Invalid date '{s}'. Expected YYYY-MM-DD")))?;
    if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        return Err(out_of_range(date));
    }
    Ok(date)
}

/// Arithmetic mean of the given ratings, `None` when empty.
pub fn average_rating(ratings: &[i16]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    Some(sum as f64 / ratings.len() as f64)
}
