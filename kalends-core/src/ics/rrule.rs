//! RRULE value codec (RFC 5545 §3.3.10).

use std::str::FromStr;

use crate::recurrence::{Frequency, RecurrenceRule, Weekday};

use super::values::{format_date_time, parse_temporal};

/// Encodes a rule as an RRULE value (without the `RRULE:` name).
pub fn encode_rrule(rule: &RecurrenceRule) -> String {
    let mut parts = vec![format!("FREQ={}", rule.frequency.as_ics_str())];

    if rule.interval > 1 {
        parts.push(format!("INTERVAL={}", rule.interval));
    }
    if let Some(count) = rule.count {
        parts.push(format!("COUNT={count}"));
    }
    if let Some(until) = &rule.until {
        parts.push(format!("UNTIL={}", format_date_time(until)));
    }
    if !rule.by_day.is_empty() {
        let days: Vec<&str> = rule.by_day.iter().map(|d| d.as_ics_str()).collect();
        parts.push(format!("BYDAY={}", days.join(",")));
    }
    if !rule.by_month_day.is_empty() {
        parts.push(format!("BYMONTHDAY={}", join_numbers(&rule.by_month_day)));
    }
    if !rule.by_month.is_empty() {
        parts.push(format!("BYMONTH={}", join_numbers(&rule.by_month)));
    }
    if !rule.by_set_pos.is_empty() {
        parts.push(format!("BYSETPOS={}", join_numbers(&rule.by_set_pos)));
    }
    if rule.week_start != Weekday::default() {
        parts.push(format!("WKST={}", rule.week_start.as_ics_str()));
    }

    parts.join(";")
}

/// Decodes an RRULE value.
///
/// Returns `None` when FREQ is missing or not one of the supported
/// frequencies. Any other malformed part is skipped and its field keeps the
/// default.
pub fn decode_rrule(value: &str) -> Option<RecurrenceRule> {
    let value = value.trim();
    let value = value.strip_prefix("RRULE:").unwrap_or(value);

    let mut frequency = None;
    let mut rule = RecurrenceRule::new(Frequency::Daily);

    for part in value.split(';') {
        let Some((key, val)) = part.split_once('=') else {
            continue;
        };
        let val = val.trim();

        match key.trim().to_ascii_uppercase().as_str() {
            "FREQ" => frequency = Frequency::from_ics_str(val),
            "INTERVAL" => {
                if let Some(interval) = val.parse::<u32>().ok().filter(|n| *n > 0) {
                    rule.interval = interval;
                }
            }
            "COUNT" => {
                if let Ok(count) = val.parse() {
                    rule.count = Some(count);
                }
            }
            "UNTIL" => {
                if let Some((until, _)) = parse_temporal(val, false) {
                    rule.until = Some(until);
                }
            }
            "BYDAY" => rule.by_day = val.split(',').filter_map(decode_day).collect(),
            "BYMONTHDAY" => rule.by_month_day = parse_numbers(val),
            "BYMONTH" => rule.by_month = parse_numbers(val),
            "BYSETPOS" => rule.by_set_pos = parse_numbers(val),
            "WKST" => {
                if let Some(day) = Weekday::from_ics_str(val) {
                    rule.week_start = day;
                }
            }
            other => tracing::trace!(key = other, "Ignoring RRULE part"),
        }
    }

    let Some(frequency) = frequency else {
        tracing::debug!(rrule = value, "RRULE without a supported FREQ");
        return None;
    };
    rule.frequency = frequency;
    Some(rule)
}

/// Maps a BYDAY entry to a weekday, discarding any ordinal prefix
/// (`-1FR` is Friday). Unrecognized codes fall back to Monday.
fn decode_day(entry: &str) -> Option<Weekday> {
    let entry = entry.trim();
    if entry.is_empty() {
        return None;
    }
    let code = entry.trim_start_matches(|c: char| c.is_ascii_digit() || c == '+' || c == '-');
    Some(Weekday::from_ics_str(code).unwrap_or(Weekday::FALLBACK))
}

fn parse_numbers<T: FromStr>(value: &str) -> Vec<T> {
    value
        .split(',')
        .filter_map(|n| n.trim().parse().ok())
        .collect()
}

fn join_numbers<T: ToString>(numbers: &[T]) -> String {
    numbers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
