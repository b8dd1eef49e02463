//! ICS file parsing.
//!
//! Decoding is a single pass over unfolded content lines. Anything the
//! decoder does not understand is skipped, and an event is only produced
//! once its SUMMARY, DTSTART and DTEND have all been seen.

use chrono::{DateTime, Utc};

use crate::alarm::EventAlarm;
use crate::event::{
    clamp_priority, generate_uid, Attendee, CalendarEvent, EventClass, EventStatus,
    DEFAULT_COLOR, DEFAULT_PRIORITY,
};
use crate::recurrence::RecurrenceRule;

use super::alarm::decode_alarm;
use super::attendee::decode_attendee;
use super::generate::COLOR_PROPERTY;
use super::lexer::ContentLine;
use super::rrule::decode_rrule;
use super::text::{unescape_text, unfold};
use super::values::{parse_date_list, parse_temporal};

/// Decode every complete VEVENT in `input`.
///
/// Never fails. Incomplete events, unterminated components and malformed
/// values are dropped or ignored.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn decode(input: &str) -> Vec<CalendarEvent> {
    let unfolded = unfold(input);
    let mut events = Vec::new();
    let mut open: Option<OpenEvent> = None;

    for raw in unfolded.split('\n') {
        let raw = raw.trim_end_matches('\r');
        if raw.trim().is_empty() {
            continue;
        }
        let Some(line) = ContentLine::parse(raw) else {
            tracing::trace!(line = raw, "Skipping line without a colon");
            continue;
        };

        match open.as_mut() {
            None => {
                if is_boundary(&line, "BEGIN", "VEVENT") {
                    open = Some(OpenEvent::default());
                }
            }
            Some(event) => {
                if event.feed(line, &mut events) == Flow::Closed {
                    open = None;
                }
            }
        }
    }

    if let Some(event) = open {
        tracing::debug!(uid = ?event.builder.uid, "Dropping VEVENT without END:VEVENT");
    }

    tracing::debug!(count = events.len(), "Decoded events");
    events
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Open,
    Closed,
}

/// An event being read, with whatever child component is currently open.
#[derive(Default)]
struct OpenEvent {
    builder: EventBuilder,
    /// Lines of the VALARM being read, if any
    alarm: Option<Vec<ContentLine>>,
    /// Names of nested components being skipped, innermost last
    skipped: Vec<String>,
}

impl OpenEvent {
    fn feed(&mut self, line: ContentLine, events: &mut Vec<CalendarEvent>) -> Flow {
        if is_boundary(&line, "BEGIN", "VEVENT") {
            tracing::debug!(uid = ?self.builder.uid, "Dropping VEVENT interrupted by BEGIN:VEVENT");
            *self = OpenEvent::default();
            return Flow::Open;
        }

        if !self.skipped.is_empty() {
            match line.name.as_str() {
                "BEGIN" => {
                    self.skipped.push(component_name(&line));
                    return Flow::Open;
                }
                "END" => {
                    let name = component_name(&line);
                    match self.skipped.iter().rposition(|s| *s == name) {
                        Some(depth) => {
                            self.skipped.truncate(depth);
                            return Flow::Open;
                        }
                        // Closes something outside the skipped block.
                        None => self.skipped.clear(),
                    }
                }
                _ => return Flow::Open,
            }
        }

        if let Some(lines) = self.alarm.as_mut() {
            if is_boundary(&line, "END", "VALARM") {
                let alarm = decode_alarm(lines.as_slice());
                self.alarm = None;
                self.builder.alarms.push(alarm);
            } else if is_boundary(&line, "END", "VEVENT") {
                tracing::debug!("Dropping VALARM without END:VALARM");
                return self.finish(events);
            } else if line.name == "BEGIN" {
                self.skipped.push(component_name(&line));
            } else {
                lines.push(line);
            }
            return Flow::Open;
        }

        match line.name.as_str() {
            "BEGIN" => {
                let name = component_name(&line);
                if name == "VALARM" {
                    self.alarm = Some(Vec::new());
                } else {
                    tracing::trace!(component = %name, "Skipping nested component");
                    self.skipped.push(name);
                }
            }
            "END" => {
                if component_name(&line) == "VEVENT" {
                    return self.finish(events);
                }
                tracing::trace!(component = %line.value, "Ignoring stray END inside VEVENT");
            }
            _ => self.builder.apply(&line),
        }

        Flow::Open
    }

    fn finish(&mut self, events: &mut Vec<CalendarEvent>) -> Flow {
        finish_event(std::mem::take(&mut self.builder), events);
        Flow::Closed
    }
}

fn finish_event(builder: EventBuilder, events: &mut Vec<CalendarEvent>) {
    match builder.build() {
        Some(event) => events.push(event),
        None => tracing::debug!("Dropping VEVENT without SUMMARY, DTSTART and DTEND"),
    }
}

fn component_name(line: &ContentLine) -> String {
    line.value.trim().to_ascii_uppercase()
}

fn is_boundary(line: &ContentLine, keyword: &str, component: &str) -> bool {
    line.name == keyword && line.value.trim().eq_ignore_ascii_case(component)
}

/// Accumulates properties of one VEVENT.
#[derive(Default)]
struct EventBuilder {
    uid: Option<String>,
    title: Option<String>,
    description: Option<String>,
    location: Option<String>,
    category: Option<String>,
    organizer: Option<String>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    all_day: bool,
    timezone: Option<String>,
    created: Option<DateTime<Utc>>,
    last_modified: Option<DateTime<Utc>>,
    status: Option<EventStatus>,
    class: Option<EventClass>,
    priority: Option<u8>,
    color: Option<String>,
    recurrence: Option<RecurrenceRule>,
    exception_dates: Vec<DateTime<Utc>>,
    recurrence_dates: Vec<DateTime<Utc>>,
    alarms: Vec<EventAlarm>,
    attendees: Vec<Attendee>,
}

impl EventBuilder {
    fn apply(&mut self, line: &ContentLine) {
        let value = line.value.trim();

        match line.name.as_str() {
            "UID" => {
                if !value.is_empty() {
                    self.uid = Some(value.to_string());
                }
            }
            "SUMMARY" => self.title = Some(unescape_text(&line.value)),
            "DESCRIPTION" => self.description = Some(unescape_text(&line.value)),
            "LOCATION" => self.location = Some(unescape_text(&line.value)),
            "CATEGORIES" => self.category = Some(line.value.clone()),
            "ORGANIZER" => self.organizer = Some(line.value.clone()),
            "DTSTART" => match parse_temporal(value, line.is_date_value()) {
                Some((start, is_date)) => {
                    self.start = Some(start);
                    self.all_day = is_date;
                    self.timezone = line.param("TZID").map(str::to_string);
                }
                None => tracing::debug!(value = value, "Unparseable DTSTART"),
            },
            "DTEND" => match parse_temporal(value, line.is_date_value()) {
                Some((end, _)) => self.end = Some(end),
                None => tracing::debug!(value = value, "Unparseable DTEND"),
            },
            "CREATED" => {
                if let Some((created, _)) = parse_temporal(value, false) {
                    self.created = Some(created);
                }
            }
            "LAST-MODIFIED" => {
                if let Some((modified, _)) = parse_temporal(value, false) {
                    self.last_modified = Some(modified);
                }
            }
            "STATUS" => {
                if let Some(status) = EventStatus::from_ics_str(value) {
                    self.status = Some(status);
                }
            }
            "CLASS" => {
                if let Some(class) = EventClass::from_ics_str(value) {
                    self.class = Some(class);
                }
            }
            "PRIORITY" => {
                if let Ok(priority) = value.parse::<i64>() {
                    self.priority = Some(clamp_priority(priority));
                }
            }
            "RRULE" => self.recurrence = decode_rrule(value),
            "EXDATE" => self
                .exception_dates
                .extend(parse_date_list(value, line.is_date_value())),
            "RDATE" => self
                .recurrence_dates
                .extend(parse_date_list(value, line.is_date_value())),
            "ATTENDEE" => {
                if let Some(attendee) = decode_attendee(line) {
                    self.attendees.push(attendee);
                }
            }
            // An empty color leaves the default in place.
            name if name == COLOR_PROPERTY || name == "COLOR" => {
                if !value.is_empty() {
                    self.color = Some(value.to_string());
                }
            }
            other => tracing::trace!(property = other, "Ignoring VEVENT property"),
        }
    }

    /// The finished event, or `None` if a required field is missing.
    fn build(self) -> Option<CalendarEvent> {
        let (Some(title), Some(start), Some(end)) = (self.title, self.start, self.end) else {
            return None;
        };

        Some(CalendarEvent {
            id: None,
            uid: self.uid.unwrap_or_else(generate_uid),
            title,
            description: self.description,
            location: self.location,
            category: self.category,
            organizer: self.organizer,
            start,
            end,
            all_day: self.all_day,
            timezone: self.timezone,
            created: self.created,
            last_modified: self.last_modified,
            status: self.status.unwrap_or_default(),
            class: self.class.unwrap_or_default(),
            priority: self.priority.unwrap_or(DEFAULT_PRIORITY),
            color: self.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            recurrence: self.recurrence,
            exception_dates: self.exception_dates,
            recurrence_dates: self.recurrence_dates,
            alarms: self.alarms,
            attendees: self.attendees,
        })
    }
}
