//! Calendar date utilities
//!
//! Dates cross every boundary of the scheduler (database rows, JSON bodies,
//! query strings) as eight ASCII digits, `YYYYMMDD`, with no separators,
//! time-of-day or time zone.

use crate::error::{Result, SchedulerError};
use chrono::{Local, NaiveDate};

/// `strftime` layout of the persisted date format
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Parse a `YYYYMMDD` string into a calendar date
///
/// # Errors
/// Returns `InvalidDate` if the input is not exactly eight ASCII digits or
/// does not name a real calendar day (e.g. `20230230`).
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SchedulerError::InvalidDate(value.to_string()));
    }

    // Slicing is safe: all eight bytes are ASCII digits.
    let year: i32 = value[0..4]
        .parse()
        .map_err(|_| SchedulerError::InvalidDate(value.to_string()))?;
    let month: u32 = value[4..6]
        .parse()
        .map_err(|_| SchedulerError::InvalidDate(value.to_string()))?;
    let day: u32 = value[6..8]
        .parse()
        .map_err(|_| SchedulerError::InvalidDate(value.to_string()))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| SchedulerError::InvalidDate(value.to_string()))
}

/// Render a date in the persisted `YYYYMMDD` form
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The local calendar date used as the default reference date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
