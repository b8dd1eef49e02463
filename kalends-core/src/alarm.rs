//! Alarm (VALARM) types.

use serde::{Deserialize, Serialize};

use crate::event::{lookup_token, lookup_variant};

/// Reminder lead time used when none is given.
pub const DEFAULT_MINUTES_BEFORE: u32 = 15;

/// A reminder attached to an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventAlarm {
    #[serde(default)]
    pub action: AlarmAction,
    #[serde(default)]
    pub trigger_type: TriggerType,
    /// Offset before the event start
    #[serde(default = "default_minutes_before")]
    pub minutes_before: u32,
    #[serde(default)]
    pub description: Option<String>,
    /// Number of additional firings after the first
    #[serde(default)]
    pub repeat: u32,
    /// Seconds between repeats, only meaningful when `repeat > 0`
    #[serde(default)]
    pub duration_secs: u32,
}

fn default_minutes_before() -> u32 {
    DEFAULT_MINUTES_BEFORE
}

impl Default for EventAlarm {
    fn default() -> Self {
        EventAlarm {
            action: AlarmAction::default(),
            trigger_type: TriggerType::default(),
            minutes_before: DEFAULT_MINUTES_BEFORE,
            description: None,
            repeat: 0,
            duration_secs: 0,
        }
    }
}

impl EventAlarm {
    pub fn new(minutes_before: u32) -> Self {
        EventAlarm {
            minutes_before,
            ..Default::default()
        }
    }

    /// A display alarm with a generated description such as "2 hours before".
    pub fn standard(minutes_before: u32) -> Self {
        EventAlarm {
            description: Some(describe_offset(minutes_before)),
            ..Self::new(minutes_before)
        }
    }

    /// Fire `repeat` more times, `interval_secs` apart.
    pub fn with_repeat(mut self, repeat: u32, interval_secs: u32) -> Self {
        self.repeat = repeat;
        self.duration_secs = interval_secs;
        self
    }
}

fn describe_offset(minutes: u32) -> String {
    fn plural(n: u32, unit: &str) -> String {
        if n == 1 {
            format!("1 {unit} before")
        } else {
            format!("{n} {unit}s before")
        }
    }

    match minutes {
        0 => "At start of event".to_string(),
        m if m < 60 => plural(m, "minute"),
        m if m < 1440 => plural(m / 60, "hour"),
        m => plural(m / 1440, "day"),
    }
}

/// What the alarm does when it fires (ACTION)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmAction {
    Audio,
    #[default]
    Display,
    Email,
}

impl AlarmAction {
    const TOKENS: [(AlarmAction, &'static str); 3] = [
        (AlarmAction::Audio, "AUDIO"),
        (AlarmAction::Display, "DISPLAY"),
        (AlarmAction::Email, "EMAIL"),
    ];

    pub fn as_ics_str(self) -> &'static str {
        lookup_token(&Self::TOKENS, self)
    }

    pub fn from_ics_str(s: &str) -> Option<Self> {
        lookup_variant(&Self::TOKENS, s)
    }
}

/// How the trigger is anchored. Only `Relative` triggers are written to ICS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerType {
    #[default]
    Relative,
    Absolute,
}

impl TriggerType {
    const TOKENS: [(TriggerType, &'static str); 2] = [
        (TriggerType::Relative, "RELATIVE"),
        (TriggerType::Absolute, "ABSOLUTE"),
    ];

    pub fn as_ics_str(self) -> &'static str {
        lookup_token(&Self::TOKENS, self)
    }

    pub fn from_ics_str(s: &str) -> Option<Self> {
        lookup_variant(&Self::TOKENS, s)
    }
}
