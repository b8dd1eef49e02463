//! DATE and DATE-TIME values.
//!
//! All instants are written in the basic UTC form. Formatting goes through
//! chrono format strings, so nothing here holds state between calls.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

pub const DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%SZ";
pub const DATE_FORMAT: &str = "%Y%m%d";
const FLOATING_DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

pub fn format_date_time(dt: &DateTime<Utc>) -> String {
    dt.format(DATE_TIME_FORMAT).to_string()
}

/// The UTC calendar date of `dt`.
pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.format(DATE_FORMAT).to_string()
}

/// Parses `yyyyMMddTHHmmssZ`. A value without the trailing `Z` (floating
/// time) is read as UTC.
pub fn parse_date_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    let naive = value
        .strip_suffix('Z')
        .or_else(|| value.strip_suffix('z'))
        .unwrap_or(value);
    NaiveDateTime::parse_from_str(naive, FLOATING_DATE_TIME_FORMAT)
        .ok()
        .map(|dt| dt.and_utc())
}

/// Parses `yyyyMMdd` as midnight UTC.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.len() != 8 {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

/// Parses a DATE or DATE-TIME value.
///
/// `date_hint` is set when the property carried `VALUE=DATE`. Without it a
/// bare eight-digit value is still accepted as a date. The returned flag
/// tells whether the value was a date.
pub fn parse_temporal(value: &str, date_hint: bool) -> Option<(DateTime<Utc>, bool)> {
    if date_hint {
        return parse_date(value).map(|dt| (dt, true));
    }
    parse_date_time(value)
        .map(|dt| (dt, false))
        .or_else(|| parse_date(value).map(|dt| (dt, true)))
}

/// Parses a comma-separated list, skipping entries that do not parse.
pub fn parse_date_list(value: &str, date_hint: bool) -> Vec<DateTime<Utc>> {
    value
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .filter_map(|s| parse_temporal(s, date_hint).map(|(dt, _)| dt))
        .collect()
}

pub fn format_date_list(dates: &[DateTime<Utc>]) -> String {
    dates
        .iter()
        .map(format_date_time)
        .collect::<Vec<_>>()
        .join(",")
}
