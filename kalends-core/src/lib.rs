//! Core library for kalends.
//!
//! - `CalendarEvent` and the recurrence, alarm and attendee types it owns
//! - `ics` for turning events into RFC 5545 text and back
//! - `KalendsConfig` for the user's export settings

pub mod alarm;
pub mod config;
pub mod error;
pub mod event;
pub mod ics;
pub mod recurrence;

pub use alarm::{AlarmAction, EventAlarm, TriggerType};
pub use config::KalendsConfig;
pub use error::{KalendsError, KalendsResult};
pub use event::{
    events_from_json, events_to_json, generate_uid, Attendee, AttendeeRole, AttendeeStatus,
    CalendarEvent, EventClass, EventStatus,
};
pub use ics::{decode, encode, encode_with, read_ics, write_ics, ExportOptions};
pub use recurrence::{Frequency, RecurrenceRule, Weekday};
