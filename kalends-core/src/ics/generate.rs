//! ICS file generation.

use chrono::{DateTime, Utc};

use crate::config::KalendsConfig;
use crate::event::{CalendarEvent, MAX_PRIORITY};

use super::alarm::write_alarm;
use super::attendee::encode_attendee;
use super::rrule::encode_rrule;
use super::text::escape_text;
use super::values::{format_date, format_date_list, format_date_time};
use super::writer::ContentWriter;

pub const DEFAULT_PRODUCT_ID: &str = "-//Kalends//Calendar//EN";
pub const DEFAULT_METHOD: &str = "PUBLISH";

/// Vendor property carrying the event color.
pub const COLOR_PROPERTY: &str = "X-APPLE-CALENDAR-COLOR";

/// Calendar-level header values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub product_id: String,
    /// METHOD header; omitted when `None`
    pub method: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            product_id: DEFAULT_PRODUCT_ID.to_string(),
            method: Some(DEFAULT_METHOD.to_string()),
        }
    }
}

impl From<&KalendsConfig> for ExportOptions {
    fn from(config: &KalendsConfig) -> Self {
        ExportOptions {
            product_id: config.product_id.clone(),
            method: config.method.clone().filter(|m| !m.trim().is_empty()),
        }
    }
}

/// Encode events as one VCALENDAR document with default headers.
pub fn encode(events: &[CalendarEvent]) -> String {
    encode_with(events, &ExportOptions::default())
}

/// Encode events as one VCALENDAR document.
#[tracing::instrument(skip_all, fields(events = events.len()))]
pub fn encode_with(events: &[CalendarEvent], options: &ExportOptions) -> String {
    let dtstamp = Utc::now();
    let mut w = ContentWriter::new();

    w.begin("VCALENDAR");
    w.property("VERSION", "2.0");
    w.property("PRODID", &options.product_id);
    w.property("CALSCALE", "GREGORIAN");
    if let Some(method) = &options.method {
        w.property("METHOD", method);
    }

    for event in events {
        write_event(&mut w, event, &dtstamp);
    }

    w.end("VCALENDAR");

    let output = w.finish();
    tracing::debug!(bytes = output.len(), "Encoded calendar");
    output
}

fn write_event(w: &mut ContentWriter, event: &CalendarEvent, dtstamp: &DateTime<Utc>) {
    w.begin("VEVENT");

    w.property("UID", &event.uid);
    w.property("DTSTAMP", format_date_time(dtstamp));
    if let Some(created) = &event.created {
        w.property("CREATED", format_date_time(created));
    }
    if let Some(modified) = &event.last_modified {
        w.property("LAST-MODIFIED", format_date_time(modified));
    }

    w.property("SUMMARY", escape_text(&event.title));
    if let Some(desc) = non_empty(&event.description) {
        w.property("DESCRIPTION", escape_text(desc));
    }
    if let Some(loc) = non_empty(&event.location) {
        w.property("LOCATION", escape_text(loc));
    }

    write_temporal(w, "DTSTART", &event.start, event.all_day);
    write_temporal(w, "DTEND", &event.end, event.all_day);

    w.property("STATUS", event.status.as_ics_str());
    w.property("CLASS", event.class.as_ics_str());
    w.property("PRIORITY", event.priority.min(MAX_PRIORITY));

    if let Some(category) = non_empty(&event.category) {
        w.property("CATEGORIES", category);
    }
    if let Some(organizer) = non_empty(&event.organizer) {
        w.property("ORGANIZER", organizer);
    }

    for attendee in &event.attendees {
        w.line(&encode_attendee(attendee));
    }

    if let Some(rule) = &event.recurrence {
        w.property("RRULE", encode_rrule(rule));
    }
    if !event.exception_dates.is_empty() {
        w.property("EXDATE", format_date_list(&event.exception_dates));
    }
    if !event.recurrence_dates.is_empty() {
        w.property("RDATE", format_date_list(&event.recurrence_dates));
    }

    for alarm in &event.alarms {
        write_alarm(w, alarm);
    }

    w.property(COLOR_PROPERTY, &event.color);

    w.end("VEVENT");
}

fn write_temporal(w: &mut ContentWriter, name: &str, value: &DateTime<Utc>, all_day: bool) {
    if all_day {
        w.line(&format!("{name};VALUE=DATE:{}", format_date(value)));
    } else {
        w.property(name, format_date_time(value));
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::EventAlarm;
    use crate::event::{Attendee, EventClass, EventStatus};
    use crate::ics::parse::decode;
    use crate::ics::text::unfold;
    use crate::recurrence::{RecurrenceRule, Weekday};
    use chrono::{NaiveDate, TimeZone};

    fn make_test_event() -> CalendarEvent {
        let mut event = CalendarEvent::new(
            "Planning",
            Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 20, 16, 0, 0).unwrap(),
        );
        event.uid = "abc-123@kalends".to_string();
        event
    }

    /// The property names of the first VEVENT, in order.
    fn event_property_names(ics: &str) -> Vec<String> {
        let unfolded = unfold(ics);
        unfolded
            .lines()
            .skip_while(|l| *l != "BEGIN:VEVENT")
            .skip(1)
            .take_while(|l| *l != "END:VEVENT")
            .map(|l| l.split([':', ';']).next().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn calendar_header_and_footer() {
        let ics = encode(&[]);
        assert_eq!(
            ics,
            "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Kalends//Calendar//EN\r\n\
             CALSCALE:GREGORIAN\r\nMETHOD:PUBLISH\r\nEND:VCALENDAR\r\n"
        );
    }

    #[test]
    fn method_can_be_omitted() {
        let options = ExportOptions {
            product_id: "-//Test//EN".to_string(),
            method: None,
        };
        let ics = encode_with(&[], &options);
        assert!(ics.contains("PRODID:-//Test//EN\r\n"));
        assert!(!ics.contains("METHOD"));
    }

    #[test]
    fn minimal_event_lines() {
        let ics = encode(&[make_test_event()]);

        assert!(ics.contains("UID:abc-123@kalends\r\n"));
        assert!(ics.contains("SUMMARY:Planning\r\n"));
        assert!(ics.contains("DTSTART:20250320T150000Z\r\n"));
        assert!(ics.contains("DTEND:20250320T160000Z\r\n"));
        assert!(ics.contains("STATUS:CONFIRMED\r\n"));
        assert!(ics.contains("CLASS:PUBLIC\r\n"));
        assert!(ics.contains("PRIORITY:5\r\n"));
        assert!(ics.contains("X-APPLE-CALENDAR-COLOR:#4CAF50\r\n"));
        assert!(!ics.contains("DESCRIPTION"));
        assert!(!ics.contains("LOCATION"));
        assert!(!ics.contains("RRULE"));
        assert!(!ics.contains("EXDATE"));
        assert!(!ics.contains("CREATED"));
    }

    #[test]
    fn properties_follow_fixed_order() {
        let mut event = make_test_event();
        event.created = Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        event.last_modified = Some(Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap());
        event.description = Some("Quarterly".to_string());
        event.location = Some("Room 4".to_string());
        event.category = Some("Work".to_string());
        event.organizer = Some("mailto:boss@example.com".to_string());
        event.attendees = vec![Attendee::new(None, "a@example.com")];
        event.recurrence = Some(RecurrenceRule::weekly(1, vec![Weekday::Thursday]));
        event.exception_dates = vec![Utc.with_ymd_and_hms(2025, 3, 27, 15, 0, 0).unwrap()];
        event.recurrence_dates = vec![Utc.with_ymd_and_hms(2025, 3, 29, 15, 0, 0).unwrap()];
        event.alarms = vec![EventAlarm::new(10)];

        let names = event_property_names(&encode(&[event]));
        assert_eq!(
            names,
            [
                "UID",
                "DTSTAMP",
                "CREATED",
                "LAST-MODIFIED",
                "SUMMARY",
                "DESCRIPTION",
                "LOCATION",
                "DTSTART",
                "DTEND",
                "STATUS",
                "CLASS",
                "PRIORITY",
                "CATEGORIES",
                "ORGANIZER",
                "ATTENDEE",
                "RRULE",
                "EXDATE",
                "RDATE",
                "BEGIN",
                "ACTION",
                "TRIGGER",
                "END",
                "X-APPLE-CALENDAR-COLOR",
            ]
        );
    }

    #[test]
    fn all_day_event_uses_date_values() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let ics = encode(&[CalendarEvent::all_day("New Year", day, day)]);

        assert!(ics.contains("DTSTART;VALUE=DATE:20240101\r\n"));
        assert!(ics.contains("DTEND;VALUE=DATE:20240102\r\n"));
    }

    #[test]
    fn text_is_escaped_and_priority_clamped() {
        let mut event = make_test_event();
        event.title = "Lunch, then; review".to_string();
        event.description = Some("line one\nline two".to_string());
        event.priority = 12;
        event.status = EventStatus::Tentative;
        event.class = EventClass::Private;

        let ics = encode(&[event]);
        assert!(ics.contains("SUMMARY:Lunch\\, then\\; review\r\n"));
        assert!(ics.contains("DESCRIPTION:line one\\nline two\r\n"));
        assert!(ics.contains("PRIORITY:9\r\n"));
        assert!(ics.contains("STATUS:TENTATIVE\r\n"));
        assert!(ics.contains("CLASS:PRIVATE\r\n"));
    }

    #[test]
    fn empty_optional_text_is_omitted() {
        let mut event = make_test_event();
        event.description = Some(String::new());
        event.category = Some(String::new());

        let ics = encode(&[event]);
        assert!(!ics.contains("DESCRIPTION"));
        assert!(!ics.contains("CATEGORIES"));
    }

    #[test]
    fn empty_color_is_still_written_and_decodes_as_default() {
        let mut event = make_test_event();
        event.color = String::new();

        let ics = encode(&[event]);
        assert!(ics.contains("X-APPLE-CALENDAR-COLOR:\r\n"));
        assert_eq!(decode(&ics)[0].color, crate::event::DEFAULT_COLOR);
    }

    #[test]
    fn line_breaks_in_verbatim_values_cannot_inject_components() {
        let mut event = make_test_event();
        event.category = Some(
            "Work\r\nEND:VEVENT\r\nBEGIN:VEVENT\r\nSUMMARY:Injected\r\n\
             DTSTART:20250321T100000Z\r\nDTEND:20250321T110000Z"
                .to_string(),
        );
        event.organizer = Some("mailto:boss@example.com\nX-EVIL:1".to_string());
        event.uid = "abc\r\n-123@kalends".to_string();
        event.color = "#FF0000\r\nEND:VCALENDAR".to_string();
        event.attendees = vec![Attendee::new(None, "a@example.com\r\nBEGIN:VTODO")];

        let ics = encode(&[event]);
        assert!(ics.split("\r\n").all(|l| !l.contains(['\r', '\n'])));

        let events = decode(&ics);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Planning");
        assert_eq!(events[0].uid, "abc-123@kalends");
        assert_eq!(
            events[0].category.as_deref(),
            Some(
                "WorkEND:VEVENTBEGIN:VEVENTSUMMARY:InjectedDTSTART:20250321T100000Z\
                 DTEND:20250321T110000Z"
            )
        );
        assert_eq!(events[0].attendees[0].email, "a@example.comBEGIN:VTODO");
        assert_eq!(ics.lines().filter(|l| *l == "END:VCALENDAR").count(), 1);
    }

    #[test]
    fn long_description_is_folded() {
        let mut event = make_test_event();
        let description = "A long agenda, covering budget; hiring and the roadmap for the next two quarters";
        event.description = Some(description.to_string());

        let ics = encode(&[event]);
        let physical: Vec<&str> = ics.split("\r\n").collect();
        let start = physical
            .iter()
            .position(|l| l.starts_with("DESCRIPTION:"))
            .unwrap();

        assert!(physical[start + 1].starts_with(' '));
        assert!(physical.iter().all(|l| l.len() <= 75));

        let unfolded = unfold(&ics);
        let line = unfolded
            .lines()
            .find_map(|l| l.strip_prefix("DESCRIPTION:"))
            .unwrap();
        assert_eq!(crate::ics::text::unescape_text(line), description);
    }

    #[test]
    fn every_event_shares_one_dtstamp() {
        let ics = encode(&[make_test_event(), make_test_event()]);
        let stamps: Vec<&str> = ics.lines().filter(|l| l.starts_with("DTSTAMP:")).collect();

        assert_eq!(stamps.len(), 2);
        assert_eq!(stamps[0], stamps[1]);
    }

    #[test]
    fn options_from_config() {
        let config = KalendsConfig {
            method: Some(" ".to_string()),
            ..KalendsConfig::default()
        };
        let options = ExportOptions::from(&config);
        assert_eq!(options.product_id, DEFAULT_PRODUCT_ID);
        assert_eq!(options.method, None);
    }
}
