use crate::constants::DAY_FORMAT;
use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;

/// Validates that a day string is exactly `YYYY-MM-DD` and a real calendar date.
pub fn validate_day_format(day: &str) -> AppResult<()> {
    parse_day(day).map(|_| ())
}

/// Parses a strict `YYYY-MM-DD` day.
///
/// Returns `InvalidInput` for anything else, including timestamps with a time part.
pub fn parse_day(day: &str) -> AppResult<NaiveDate> {
    if day.len() != 10 {
        return Err(AppError::InvalidInput(format!(
            "Day must be YYYY-MM-DD, got: {day}"
        )));
    }
    NaiveDate::parse_from_str(day, DAY_FORMAT)
        .map_err(|e| AppError::InvalidInput(format!("Invalid day '{day}': {e}")))
}

/// Optional user restriction on the days fetched: `[start, end)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DayWindow {
    /// Builds a window from optional `YYYY-MM-DD` strings.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a day is malformed or `start` is not before `end`.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> AppResult<Self> {
        let start = start.map(parse_day).transpose()?;
        let end = end.map(parse_day).transpose()?;

        if let (Some(s), Some(e)) = (start, end) {
            if s >= e {
                return Err(AppError::InvalidInput(format!(
                    "Start day '{s}' must be before end day '{e}'"
                )));
            }
        }

        Ok(Self { start, end })
    }
}

/// Intersects a measuring point's `[day_min, day_max)` with the window.
pub fn clamp_range(
    day_min: NaiveDate,
    day_max: NaiveDate,
    window: &DayWindow,
) -> (NaiveDate, NaiveDate) {
    let start = window.start.map_or(day_min, |s| s.max(day_min));
    let end = window.end.map_or(day_max, |e| e.min(day_max));
    (start, end)
}

/// Every calendar day in `[start, end)`; empty when `start >= end`.
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day < end)
}
