//! VALARM codec.
//!
//! Triggers are always written in a single unit (`-PT2H`), but any
//! combination of units is accepted when reading (`-P1DT2H30M`).

use crate::alarm::{AlarmAction, EventAlarm, TriggerType};

use super::lexer::ContentLine;
use super::text::{escape_text, unescape_text};
use super::writer::ContentWriter;

const MINUTES_PER_HOUR: u32 = 60;
const MINUTES_PER_DAY: u32 = 24 * MINUTES_PER_HOUR;

/// Writes one `BEGIN:VALARM` .. `END:VALARM` block.
pub(crate) fn write_alarm(w: &mut ContentWriter, alarm: &EventAlarm) {
    w.begin("VALARM");
    w.property("ACTION", alarm.action.as_ics_str());

    if alarm.trigger_type == TriggerType::Relative {
        w.property("TRIGGER", format_trigger(alarm.minutes_before));
    }

    if let Some(desc) = alarm.description.as_deref().filter(|d| !d.is_empty()) {
        w.property("DESCRIPTION", escape_text(desc));
    }

    if alarm.repeat > 0 {
        w.property("REPEAT", alarm.repeat);
        w.property("DURATION", format!("PT{}S", alarm.duration_secs));
    }

    w.end("VALARM");
}

/// Formats a lead time in its largest whole unit: days, then hours, then
/// minutes. Remainders below that unit are dropped.
pub fn format_trigger(minutes_before: u32) -> String {
    if minutes_before >= MINUTES_PER_DAY {
        format!("-PT{}D", minutes_before / MINUTES_PER_DAY)
    } else if minutes_before >= MINUTES_PER_HOUR {
        format!("-PT{}H", minutes_before / MINUTES_PER_HOUR)
    } else {
        format!("-PT{minutes_before}M")
    }
}

/// Parses a relative TRIGGER into whole minutes.
///
/// The sign is ignored: the model only stores a magnitude before start.
/// Seconds are truncated to minutes.
pub fn parse_trigger(value: &str) -> Option<u32> {
    let seconds = parse_duration_seconds(value)?;
    u32::try_from(seconds / 60).ok()
}

/// Parses a DURATION value (e.g. `PT5M`, `-P1DT12H`, `P2W`) into seconds.
///
/// Accepts W, D, H, M and S components in any combination. `M` always means
/// minutes. Returns `None` for anything that is not a duration.
pub fn parse_duration_seconds(value: &str) -> Option<u64> {
    let value = value.trim();
    let value = value
        .strip_prefix(['-', '+'])
        .unwrap_or(value);
    let body = value.strip_prefix(['P', 'p'])?;

    let mut total: u64 = 0;
    let mut digits = String::new();
    let mut components = 0;

    for c in body.chars() {
        match c.to_ascii_uppercase() {
            d if d.is_ascii_digit() => digits.push(d),
            'T' if digits.is_empty() => {}
            unit @ ('W' | 'D' | 'H' | 'M' | 'S') => {
                let n: u64 = digits.parse().ok()?;
                digits.clear();
                let factor = match unit {
                    'W' => 7 * 24 * 3600,
                    'D' => 24 * 3600,
                    'H' => 3600,
                    'M' => 60,
                    _ => 1,
                };
                total = total.saturating_add(n.saturating_mul(factor));
                components += 1;
            }
            _ => return None,
        }
    }

    if components == 0 || !digits.is_empty() {
        return None;
    }
    Some(total)
}

/// Builds an alarm from the lines between `BEGIN:VALARM` and `END:VALARM`.
///
/// Fields that are missing or malformed keep their defaults.
pub(crate) fn decode_alarm(lines: &[ContentLine]) -> EventAlarm {
    let mut alarm = EventAlarm::default();

    for line in lines {
        let value = line.value.trim();
        match line.name.as_str() {
            "ACTION" => {
                if let Some(action) = AlarmAction::from_ics_str(value) {
                    alarm.action = action;
                }
            }
            "TRIGGER" => match parse_trigger(value) {
                Some(minutes) => alarm.minutes_before = minutes,
                None => tracing::debug!(trigger = value, "Unsupported TRIGGER, keeping default"),
            },
            "DESCRIPTION" => alarm.description = Some(unescape_text(&line.value)),
            "REPEAT" => {
                if let Ok(repeat) = value.parse() {
                    alarm.repeat = repeat;
                }
            }
            "DURATION" => {
                if let Some(secs) = parse_duration_seconds(value).and_then(|s| u32::try_from(s).ok()) {
                    alarm.duration_secs = secs;
                }
            }
            other => tracing::trace!(property = other, "Ignoring VALARM property"),
        }
    }

    alarm
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(input: &str) -> Vec<ContentLine> {
        input.lines().filter_map(ContentLine::parse).collect()
    }

    fn encode(alarm: &EventAlarm) -> String {
        let mut w = ContentWriter::new();
        write_alarm(&mut w, alarm);
        w.finish()
    }

    #[test]
    fn trigger_uses_largest_whole_unit() {
        assert_eq!(format_trigger(0), "-PT0M");
        assert_eq!(format_trigger(15), "-PT15M");
        assert_eq!(format_trigger(60), "-PT1H");
        assert_eq!(format_trigger(90), "-PT1H");
        assert_eq!(format_trigger(1440), "-PT1D");
        assert_eq!(format_trigger(4000), "-PT2D");
    }

    #[test]
    fn trigger_sums_all_components() {
        assert_eq!(parse_trigger("-PT1H30M"), Some(90));
        assert_eq!(parse_trigger("-PT1D"), Some(1440));
        assert_eq!(parse_trigger("-P1DT2H"), Some(1560));
        assert_eq!(parse_trigger("PT15M"), Some(15));
        assert_eq!(parse_trigger("-PT90S"), Some(1));
        assert_eq!(parse_trigger("-P1W"), Some(10080));
    }

    #[test]
    fn trigger_rejects_non_durations() {
        assert_eq!(parse_trigger("20240101T090000Z"), None);
        assert_eq!(parse_trigger("-PT"), None);
        assert_eq!(parse_trigger("-PT15"), None);
        assert_eq!(parse_trigger("-PT1X"), None);
        assert_eq!(parse_trigger(""), None);
    }

    #[test]
    fn encode_display_alarm() {
        let alarm = EventAlarm {
            description: Some("Leave now; traffic".to_string()),
            ..EventAlarm::new(30)
        };

        assert_eq!(
            encode(&alarm),
            "BEGIN:VALARM\r\nACTION:DISPLAY\r\nTRIGGER:-PT30M\r\n\
             DESCRIPTION:Leave now\\; traffic\r\nEND:VALARM\r\n"
        );
    }

    #[test]
    fn repeat_and_duration_written_together() {
        let alarm = EventAlarm::new(10).with_repeat(2, 300);
        let out = encode(&alarm);
        assert!(out.contains("REPEAT:2\r\nDURATION:PT300S\r\n"));

        let out = encode(&EventAlarm::new(10).with_repeat(0, 300));
        assert!(!out.contains("REPEAT"));
        assert!(!out.contains("DURATION"));
    }

    #[test]
    fn absolute_trigger_is_not_written() {
        let alarm = EventAlarm {
            trigger_type: TriggerType::Absolute,
            ..EventAlarm::default()
        };
        assert!(!encode(&alarm).contains("TRIGGER"));
    }

    #[test]
    fn decode_full_alarm() {
        let alarm = decode_alarm(&lines(
            "ACTION:AUDIO\nTRIGGER:-PT1H30M\nDESCRIPTION:Call\\, then go\nREPEAT:3\nDURATION:PT5M",
        ));

        assert_eq!(
            alarm,
            EventAlarm {
                action: AlarmAction::Audio,
                trigger_type: TriggerType::Relative,
                minutes_before: 90,
                description: Some("Call, then go".to_string()),
                repeat: 3,
                duration_secs: 300,
            }
        );
    }

    #[test]
    fn decode_bad_fields_keep_defaults() {
        let alarm = decode_alarm(&lines(
            "ACTION:PROCEDURE\nTRIGGER;VALUE=DATE-TIME:20240101T090000Z\nREPEAT:many\nDURATION:soon",
        ));

        assert_eq!(alarm, EventAlarm::default());
    }

    #[test]
    fn round_trip_keeps_single_unit_values() {
        for minutes in [0, 5, 45, 60, 120, 1440, 2880] {
            let alarm = EventAlarm::standard(minutes).with_repeat(1, 60);
            let decoded = decode_alarm(&lines(&encode(&alarm)));
            assert_eq!(decoded, alarm, "minutes = {minutes}");
        }
    }
}
