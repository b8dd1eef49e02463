//! TUI rendering traits for kalends types.
//!
//! This module provides extension traits that add colored terminal rendering
//! to kalends-core types using owo_colors.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use kalends_core::{Attendee, AttendeeStatus, CalendarEvent, EventAlarm, EventStatus};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors, in a display time zone.
pub trait Render {
    fn render(&self, tz: Tz) -> String;
}

impl Render for CalendarEvent {
    fn render(&self, tz: Tz) -> String {
        let title = match self.status {
            EventStatus::Confirmed => self.title.bold().to_string(),
            EventStatus::Tentative => format!("{} {}", self.title.bold(), "(tentative)".yellow()),
            EventStatus::Cancelled => format!("{} {}", self.title.strikethrough(), "(cancelled)".red()),
        };

        let mut lines = vec![
            format!("📅 {title}"),
            format!("   {}", render_time_range(self, tz).dimmed()),
        ];

        if let Some(location) = self.location.as_deref().filter(|l| !l.is_empty()) {
            lines.push(format!("   📍 {location}"));
        }
        if let Some(rule) = &self.recurrence {
            let mut text = format!("   ↻ {rule}");
            if !self.exception_dates.is_empty() {
                text.push_str(&format!(" ({} excluded)", self.exception_dates.len()));
            }
            lines.push(text.cyan().to_string());
        }
        for alarm in &self.alarms {
            lines.push(format!("   {}", alarm.render(tz)));
        }
        for attendee in &self.attendees {
            lines.push(format!("   {}", attendee.render(tz)));
        }

        lines.join("\n")
    }
}

impl Render for EventAlarm {
    fn render(&self, _tz: Tz) -> String {
        let text = match self.description.as_deref().filter(|d| !d.is_empty()) {
            Some(desc) => format!("⏰ {desc}"),
            None => format!("⏰ {} min before", self.minutes_before),
        };
        text.dimmed().to_string()
    }
}

impl Render for Attendee {
    fn render(&self, _tz: Tz) -> String {
        let who = match &self.name {
            Some(name) => format!("{name} <{}>", self.email),
            None => self.email.clone(),
        };
        match self.status {
            AttendeeStatus::Accepted => format!("{} {who}", "✓".green()),
            AttendeeStatus::Declined => format!("{} {who}", "✗".red()),
            _ => format!("{} {who}", "?".yellow()),
        }
    }
}

/// Plain-text time span of an event in `tz`.
///
/// All-day events show their dates as stored, without zone conversion, and
/// their exclusive end as the last day.
pub fn render_time_range(event: &CalendarEvent, tz: Tz) -> String {
    if event.all_day {
        let first = event.start.date_naive();
        let last = (event.end - Duration::days(1)).date_naive().max(first);
        return if first == last {
            format!("{first} (all day)")
        } else {
            format!("{first} – {last} (all day)")
        };
    }

    let start = local(&event.start, tz);
    let end = local(&event.end, tz);
    if start.date_naive() == end.date_naive() {
        format!(
            "{} – {} {}",
            start.format("%Y-%m-%d %H:%M"),
            end.format("%H:%M"),
            tz.name()
        )
    } else {
        format!(
            "{} – {} {}",
            start.format("%Y-%m-%d %H:%M"),
            end.format("%Y-%m-%d %H:%M"),
            tz.name()
        )
    }
}

fn local(dt: &DateTime<Utc>, tz: Tz) -> DateTime<Tz> {
    dt.with_timezone(&tz)
}
