//! Calendar event types.
//!
//! A `CalendarEvent` is one occurrence definition, not an expanded instance.
//! The storage and UI layers create and persist these; the ICS codec turns
//! them into text and back without mutating them.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::alarm::EventAlarm;
use crate::error::KalendsResult;
use crate::recurrence::RecurrenceRule;

/// Domain appended to generated UIDs.
pub const UID_DOMAIN: &str = "kalends";

/// Color assigned to events that do not pick one.
pub const DEFAULT_COLOR: &str = "#4CAF50";

/// Priority assigned to new events (RFC 5545 "medium").
pub const DEFAULT_PRIORITY: u8 = 5;

/// Highest value PRIORITY may carry.
pub const MAX_PRIORITY: u8 = 9;

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_priority() -> u8 {
    DEFAULT_PRIORITY
}

/// A calendar event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Storage-layer row id, never written to ICS
    #[serde(default)]
    pub id: Option<i64>,
    /// Globally unique identifier (UID), preserved across edits and round-trips
    pub uid: String,

    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Free text (CATEGORIES)
    #[serde(default)]
    pub category: Option<String>,
    /// Free text or calendar address (ORGANIZER)
    #[serde(default)]
    pub organizer: Option<String>,

    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Start and end are whole dates (midnight UTC) rather than instants
    #[serde(default)]
    pub all_day: bool,
    /// Informational IANA zone name; times are always stored in UTC
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub class: EventClass,
    /// 0 (undefined) to 9 (lowest); see [`CalendarEvent::set_priority`]
    #[serde(default = "default_priority")]
    pub priority: u8,
    /// Hex color, e.g. `#4CAF50`
    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub recurrence: Option<RecurrenceRule>,
    /// Excluded occurrences (EXDATE)
    #[serde(default)]
    pub exception_dates: Vec<DateTime<Utc>>,
    /// Extra occurrences (RDATE)
    #[serde(default)]
    pub recurrence_dates: Vec<DateTime<Utc>>,

    #[serde(default)]
    pub alarms: Vec<EventAlarm>,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
}

impl CalendarEvent {
    /// Create an event with a fresh UID and default classification.
    pub fn new(title: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        CalendarEvent {
            id: None,
            uid: generate_uid(),
            title: title.into(),
            description: None,
            location: None,
            category: None,
            organizer: None,
            start,
            end,
            all_day: false,
            timezone: None,
            created: None,
            last_modified: None,
            status: EventStatus::default(),
            class: EventClass::default(),
            priority: DEFAULT_PRIORITY,
            color: default_color(),
            recurrence: None,
            exception_dates: Vec::new(),
            recurrence_dates: Vec::new(),
            alarms: Vec::new(),
            attendees: Vec::new(),
        }
    }

    /// Create an all-day event spanning `first` through `last` inclusive.
    pub fn all_day(title: impl Into<String>, first: NaiveDate, last: NaiveDate) -> Self {
        let start = first.and_time(chrono::NaiveTime::MIN).and_utc();
        let end = (last + Duration::days(1)).and_time(chrono::NaiveTime::MIN).and_utc();
        let mut event = Self::new(title, start, end);
        event.all_day = true;
        event
    }

    /// Set the priority, clamping it into `0..=9`.
    pub fn set_priority(&mut self, priority: i64) {
        self.priority = clamp_priority(priority);
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Whether any part of the event falls on the given UTC calendar day.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        let day_start = date.and_time(chrono::NaiveTime::MIN).and_utc();
        let day_end = day_start + Duration::days(1);

        if self.start == self.end {
            return self.start >= day_start && self.start < day_end;
        }
        self.start < day_end && self.end > day_start
    }
}

impl std::fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Generate a UID of the form `<uuid>@kalends`.
pub fn generate_uid() -> String {
    format!("{}@{}", Uuid::new_v4(), UID_DOMAIN)
}

/// Parse a JSON array of events.
pub fn events_from_json(json: &str) -> KalendsResult<Vec<CalendarEvent>> {
    Ok(serde_json::from_str(json)?)
}

/// Serialize events as a pretty-printed JSON array.
pub fn events_to_json(events: &[CalendarEvent]) -> KalendsResult<String> {
    Ok(serde_json::to_string_pretty(events)?)
}

pub(crate) fn clamp_priority(priority: i64) -> u8 {
    // Lossless: the value is clamped into 0..=9 first.
    priority.clamp(0, i64::from(MAX_PRIORITY)) as u8
}

/// Event status (STATUS)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Tentative,
    #[default]
    Confirmed,
    Cancelled,
}

impl EventStatus {
    const TOKENS: [(EventStatus, &'static str); 3] = [
        (EventStatus::Tentative, "TENTATIVE"),
        (EventStatus::Confirmed, "CONFIRMED"),
        (EventStatus::Cancelled, "CANCELLED"),
    ];

    pub fn as_ics_str(self) -> &'static str {
        lookup_token(&Self::TOKENS, self)
    }

    pub fn from_ics_str(s: &str) -> Option<Self> {
        lookup_variant(&Self::TOKENS, s)
    }
}

/// Access classification (CLASS)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventClass {
    #[default]
    Public,
    Private,
    Confidential,
}

impl EventClass {
    const TOKENS: [(EventClass, &'static str); 3] = [
        (EventClass::Public, "PUBLIC"),
        (EventClass::Private, "PRIVATE"),
        (EventClass::Confidential, "CONFIDENTIAL"),
    ];

    pub fn as_ics_str(self) -> &'static str {
        lookup_token(&Self::TOKENS, self)
    }

    pub fn from_ics_str(s: &str) -> Option<Self> {
        lookup_variant(&Self::TOKENS, s)
    }
}

/// An event attendee (ATTENDEE)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    /// Display name (CN)
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub role: AttendeeRole,
    #[serde(default)]
    pub status: AttendeeStatus,
    /// Whether a reply is requested
    #[serde(default)]
    pub rsvp: bool,
}

impl Attendee {
    /// A required participant who has not answered yet and is asked to reply.
    pub fn new(name: Option<String>, email: impl Into<String>) -> Self {
        Attendee {
            name,
            email: email.into(),
            role: AttendeeRole::default(),
            status: AttendeeStatus::default(),
            rsvp: true,
        }
    }
}

/// Participation role (ROLE parameter)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendeeRole {
    Chair,
    #[default]
    ReqParticipant,
    OptParticipant,
    NonParticipant,
}

impl AttendeeRole {
    const TOKENS: [(AttendeeRole, &'static str); 4] = [
        (AttendeeRole::Chair, "CHAIR"),
        (AttendeeRole::ReqParticipant, "REQ-PARTICIPANT"),
        (AttendeeRole::OptParticipant, "OPT-PARTICIPANT"),
        (AttendeeRole::NonParticipant, "NON-PARTICIPANT"),
    ];

    pub fn as_ics_str(self) -> &'static str {
        lookup_token(&Self::TOKENS, self)
    }

    pub fn from_ics_str(s: &str) -> Option<Self> {
        lookup_variant(&Self::TOKENS, s)
    }
}

/// Participation status (PARTSTAT parameter)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendeeStatus {
    #[default]
    NeedsAction,
    Accepted,
    Declined,
    Tentative,
    Delegated,
}

impl AttendeeStatus {
    const TOKENS: [(AttendeeStatus, &'static str); 5] = [
        (AttendeeStatus::NeedsAction, "NEEDS-ACTION"),
        (AttendeeStatus::Accepted, "ACCEPTED"),
        (AttendeeStatus::Declined, "DECLINED"),
        (AttendeeStatus::Tentative, "TENTATIVE"),
        (AttendeeStatus::Delegated, "DELEGATED"),
    ];

    pub fn as_ics_str(self) -> &'static str {
        lookup_token(&Self::TOKENS, self)
    }

    pub fn from_ics_str(s: &str) -> Option<Self> {
        lookup_variant(&Self::TOKENS, s)
    }
}

/// Find the wire token for a variant in its mapping table.
pub(crate) fn lookup_token<T: Copy + PartialEq>(table: &[(T, &'static str)], value: T) -> &'static str {
    table
        .iter()
        .find(|(variant, _)| *variant == value)
        .map(|(_, token)| *token)
        .unwrap_or_default()
}

/// Find the variant for a wire token (case-insensitive, surrounding whitespace ignored).
pub(crate) fn lookup_variant<T: Copy>(table: &[(T, &'static str)], token: &str) -> Option<T> {
    let token = token.trim();
    table
        .iter()
        .find(|(_, t)| t.eq_ignore_ascii_case(token))
        .map(|(variant, _)| *variant)
}
