//! Time-of-day parsing and the small formatting helpers shared by the
//! renderers.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::ValidationError;

/// Accepted time-of-day formats, tried in order.
const TIME_FORMATS: [&str; 6] = [
    "%H:%M",
    "%H:%M:%S",
    "%I:%M%p",
    "%I:%M %p",
    "%I:%M:%S%p",
    "%I:%M:%S %p",
];

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parse a wall-clock time such as `14:30`, `2:30 PM` or `9:05:10am`.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, ValidationError> {
    let cleaned = value.trim().to_uppercase();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(&cleaned, fmt).ok())
        .ok_or_else(|| ValidationError::InvalidTimeOfDay {
            input: value.to_string(),
        })
}

/// Parse a local timestamp. A bare date means the end of that day (23:59).
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, ValidationError> {
    let cleaned = value.trim();
    if let Some(ts) = TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(cleaned, fmt).ok())
    {
        return Ok(ts);
    }

    NaiveDate::parse_from_str(cleaned, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(23, 59, 0))
        .ok_or_else(|| ValidationError::InvalidTimestamp {
            input: value.to_string(),
        })
}

/// Format a span as `HH:MM:SS`. Negative spans render as zero.
pub fn format_countdown(span: Duration) -> String {
    let total = span.num_seconds().max(0);
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

/// Format a time of day as `HH:MM`.
pub fn format_clock(t: NaiveTime) -> String {
    format!("{:02}:{:02}", t.hour(), t.minute())
}

/// Monday-based weekday index (0 = Monday ... 6 = Sunday).
pub fn weekday_index<D: Datelike>(d: &D) -> u8 {
    d.weekday().num_days_from_monday() as u8
}

/// Get day name abbreviation for a Monday-based index.
pub fn day_name(weekday: u8) -> &'static str {
    match weekday {
        0 => "Mon",
        1 => "Tue",
        2 => "Wed",
        3 => "Thu",
        4 => "Fri",
        5 => "Sat",
        6 => "Sun",
        _ => "?",
    }
}
