//! Lenient date and time parsing for user input and imported values.
//!
//! Dates typed at the prompt or found in older spreadsheets come in several
//! shapes. The parsers here try each known format in turn; the `_or` variants
//! return a fallback instead of failing.

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m-%d-%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M:%S", "%m/%d/%Y %I:%M:%S %p"];
const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p", "%I:%M:%S %p"];

/// Parses `today`, `yesterday`, `tomorrow`, or a date in any supported format.
///
/// A date-time string is accepted too; its time part is dropped.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let value = input.trim();
    let today = Local::now().date_naive();
    match value.to_lowercase().as_str() {
        "today" => return Ok(today),
        "yesterday" => return Ok(today.pred_opt().unwrap_or(today)),
        "tomorrow" => return Ok(today.succ_opt().unwrap_or(today)),
        _ => {}
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(datetime.date());
        }
    }
    Err(anyhow!("unrecognized date '{}', expected YYYY-MM-DD or MM/DD/YYYY", input))
}

pub fn parse_date_or(input: &str, fallback: NaiveDate) -> NaiveDate {
    parse_date(input).unwrap_or(fallback)
}

/// Parses an optional date; blank input means "no date".
pub fn parse_optional_date(input: &str) -> Result<Option<NaiveDate>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_date(input).map(Some)
}

/// Parses a clock time in 24-hour or `h:MM AM/PM` form.
pub fn parse_time(input: &str) -> Result<NaiveTime> {
    let value = input.trim().to_uppercase();
    for format in TIME_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(&value, format) {
            return Ok(time);
        }
    }
    Err(anyhow!("unrecognized time '{}', expected HH:MM or h:MM AM/PM", input))
}

pub fn parse_optional_time(input: &str) -> Result<Option<NaiveTime>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_time(input).map(Some)
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

pub fn format_time(time: Option<NaiveTime>) -> String {
    time.map(|t| t.format("%H:%M").to_string()).unwrap_or_default()
}

/// Hours between two clock times, negative when `end` precedes `start`.
pub fn hours_between(start: NaiveTime, end: NaiveTime) -> f64 {
    (end - start).num_minutes() as f64 / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 9, 3).unwrap();
        assert_eq!(parse_date("2024-09-03").unwrap(), expected);
        assert_eq!(parse_date("09/03/2024").unwrap(), expected);
        assert_eq!(parse_date("9/3/2024").unwrap(), expected);
        assert_eq!(parse_date("2024-09-03 07:15:00").unwrap(), expected);
        assert!(parse_date("third of september").is_err());
    }

    #[test]
    fn test_parse_date_fallback() {
        let fallback = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert_eq!(parse_date_or("not a date", fallback), fallback);
        assert_eq!(parse_optional_date("  ").unwrap(), None);
    }

    #[test]
    fn test_parse_time_formats() {
        let expected = NaiveTime::from_hms_opt(14, 30, 0).unwrap();
        assert_eq!(parse_time("14:30").unwrap(), expected);
        assert_eq!(parse_time("2:30 PM").unwrap(), expected);
        assert_eq!(parse_time("2:30 pm").unwrap(), expected);
        assert_eq!(parse_time("14:30:00").unwrap(), expected);
        assert!(parse_time("25:00").is_err());
    }

    #[test]
    fn test_hours_between() {
        let start = NaiveTime::from_hms_opt(6, 0, 0).unwrap();
        let end = NaiveTime::from_hms_opt(14, 30, 0).unwrap();
        assert_eq!(hours_between(start, end), 8.5);
        assert_eq!(hours_between(end, start), -8.5);
    }
}
