//! Recurrence rule types (RRULE).
//!
//! Rules are carried as data only; occurrences are never expanded here.
//! See `ics::rrule` for the wire codec.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{lookup_token, lookup_variant};

/// A recurrence rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    /// Omitted from the wire form when 1
    #[serde(default = "default_interval")]
    pub interval: u32,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub by_day: Vec<Weekday>,
    #[serde(default)]
    pub by_month_day: Vec<i32>,
    #[serde(default)]
    pub by_month: Vec<u32>,
    #[serde(default)]
    pub by_set_pos: Vec<i32>,
    /// Omitted from the wire form when Monday
    #[serde(default)]
    pub week_start: Weekday,
}

fn default_interval() -> u32 {
    1
}

impl RecurrenceRule {
    pub fn new(frequency: Frequency) -> Self {
        RecurrenceRule {
            frequency,
            interval: 1,
            count: None,
            until: None,
            by_day: Vec::new(),
            by_month_day: Vec::new(),
            by_month: Vec::new(),
            by_set_pos: Vec::new(),
            week_start: Weekday::default(),
        }
    }

    pub fn daily(interval: u32) -> Self {
        Self::new(Frequency::Daily).with_interval(interval)
    }

    pub fn weekly(interval: u32, days: Vec<Weekday>) -> Self {
        let mut rule = Self::new(Frequency::Weekly).with_interval(interval);
        rule.by_day = days;
        rule
    }

    pub fn monthly(interval: u32, days_of_month: Vec<i32>) -> Self {
        let mut rule = Self::new(Frequency::Monthly).with_interval(interval);
        rule.by_month_day = days_of_month;
        rule
    }

    pub fn yearly(interval: u32) -> Self {
        Self::new(Frequency::Yearly).with_interval(interval)
    }

    fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval.max(1);
        self
    }
}

/// Human-readable summary, e.g. "every 2 weeks on Mon, Wed, 10 times".
impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.frequency {
            Frequency::Daily => "day",
            Frequency::Weekly => "week",
            Frequency::Monthly => "month",
            Frequency::Yearly => "year",
        };

        if self.interval > 1 {
            write!(f, "every {} {unit}s", self.interval)?;
        } else {
            write!(f, "every {unit}")?;
        }

        if !self.by_day.is_empty() {
            let days: Vec<&str> = self.by_day.iter().map(|d| d.short_name()).collect();
            write!(f, " on {}", days.join(", "))?;
        } else if !self.by_month_day.is_empty() {
            let days: Vec<String> = self.by_month_day.iter().map(i32::to_string).collect();
            write!(f, " on day {}", days.join(", "))?;
        }

        if let Some(count) = self.count {
            write!(f, ", {count} times")?;
        }
        if let Some(until) = self.until {
            write!(f, ", until {}", until.format("%Y-%m-%d"))?;
        }

        Ok(())
    }
}

/// Recurrence frequency (FREQ)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    const TOKENS: [(Frequency, &'static str); 4] = [
        (Frequency::Daily, "DAILY"),
        (Frequency::Weekly, "WEEKLY"),
        (Frequency::Monthly, "MONTHLY"),
        (Frequency::Yearly, "YEARLY"),
    ];

    pub fn as_ics_str(self) -> &'static str {
        lookup_token(&Self::TOKENS, self)
    }

    pub fn from_ics_str(s: &str) -> Option<Self> {
        lookup_variant(&Self::TOKENS, s)
    }
}

/// Day of the week, numbered 1 (Sunday) through 7 (Saturday)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Weekday {
    Sunday = 1,
    #[default]
    Monday = 2,
    Tuesday = 3,
    Wednesday = 4,
    Thursday = 5,
    Friday = 6,
    Saturday = 7,
}

/// Two-letter RRULE day codes, indexed by `Weekday::number() - 1`.
/// Both the encoder and the decoder go through this table.
pub const DAY_CODES: [(Weekday, &str); 7] = [
    (Weekday::Sunday, "SU"),
    (Weekday::Monday, "MO"),
    (Weekday::Tuesday, "TU"),
    (Weekday::Wednesday, "WE"),
    (Weekday::Thursday, "TH"),
    (Weekday::Friday, "FR"),
    (Weekday::Saturday, "SA"),
];

impl Weekday {
    /// Returned for day codes that are not in [`DAY_CODES`].
    pub const FALLBACK: Weekday = Weekday::Monday;

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        let index = usize::from(n).checked_sub(1)?;
        DAY_CODES.get(index).map(|(day, _)| *day)
    }

    pub fn as_ics_str(self) -> &'static str {
        lookup_token(&DAY_CODES, self)
    }

    pub fn from_ics_str(s: &str) -> Option<Self> {
        lookup_variant(&DAY_CODES, s)
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Weekday::Sunday => "Sun",
            Weekday::Monday => "Mon",
            Weekday::Tuesday => "Tue",
            Weekday::Wednesday => "Wed",
            Weekday::Thursday => "Thu",
            Weekday::Friday => "Fri",
            Weekday::Saturday => "Sat",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Sun => Weekday::Sunday,
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
        }
    }
}
