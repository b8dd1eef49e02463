use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, SubsecRound, TimeZone, Utc};
use chrono_tz::Tz;
use kalends_core::{CalendarEvent, EventAlarm, ExportOptions, KalendsConfig, write_ics};
use owo_colors::OwoColorize;

use super::open_output;
use crate::utils::filename::base_filename;
use crate::utils::tz::resolve_tz;

/// Local date-time forms accepted for `--start` and `--end`.
const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Default)]
pub struct NewEvent {
    pub title: String,
    pub start: String,
    pub end: Option<String>,
    pub duration: Option<String>,
    pub all_day: bool,
    pub alarms: Vec<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub tz: Option<String>,
    pub output: Option<PathBuf>,
}

pub fn run(args: NewEvent) -> Result<()> {
    let config = KalendsConfig::load()?;
    let tz = resolve_tz(args.tz.as_deref())?;
    let event = build_event(&args, tz, &config)?;

    let path = match &args.output {
        Some(path) => path.clone(),
        None => config.export_path().join(base_filename(&event)),
    };

    let mut out = open_output(Some(&path))?;
    write_ics(&mut out, std::slice::from_ref(&event), &ExportOptions::from(&config))
        .with_context(|| format!("Could not write {}", path.display()))?;

    println!(
        "{}",
        format!("  Created: {} ({})", event.title, path.display()).green()
    );
    Ok(())
}

/// A parsed `--start`/`--end` value.
#[derive(Debug, Clone, Copy, PartialEq)]
enum When {
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

impl When {
    fn date(self, tz: Tz) -> NaiveDate {
        match self {
            When::Date(d) => d,
            When::DateTime(dt) => dt.with_timezone(&tz).date_naive(),
        }
    }

    /// A date is taken as local midnight.
    fn instant(self, tz: Tz) -> Result<DateTime<Utc>> {
        match self {
            When::DateTime(dt) => Ok(dt),
            When::Date(d) => local_to_utc(d.and_time(chrono::NaiveTime::MIN), tz),
        }
    }
}

fn parse_when(input: &str, tz: Tz) -> Result<When> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(When::Date(date));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(When::DateTime(dt.with_timezone(&Utc)));
    }
    for format in LOCAL_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return local_to_utc(naive, tz).map(When::DateTime);
        }
    }

    bail!("Could not parse date/time: \"{input}\" (expected YYYY-MM-DD or YYYY-MM-DDTHH:MM)")
}

fn local_to_utc(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| anyhow!("{naive} does not exist in {}", tz.name()))
}

fn parse_duration(input: &str) -> Result<Duration> {
    let std_dur = humantime::parse_duration(input)
        .with_context(|| format!("Could not parse duration: \"{input}\""))?;
    Duration::from_std(std_dur).context("Duration too large")
}

fn build_event(args: &NewEvent, tz: Tz, config: &KalendsConfig) -> Result<CalendarEvent> {
    let start = parse_when(&args.start, tz)?;
    let all_day = args.all_day || matches!(start, When::Date(_));

    let mut event = if all_day {
        let first = start.date(tz);
        let last = match (&args.end, &args.duration) {
            (Some(end), _) => parse_when(end, tz)?.date(tz),
            (None, Some(duration)) => {
                let days = parse_duration(duration)?.num_days().max(1);
                first + Duration::days(days - 1)
            }
            (None, None) => first,
        };
        if last < first {
            bail!("End date {last} is before start date {first}");
        }
        CalendarEvent::all_day(&args.title, first, last)
    } else {
        let start = start.instant(tz)?;
        let end = match (&args.end, &args.duration) {
            (Some(end), _) => parse_when(end, tz)?.instant(tz)?,
            (None, Some(duration)) => start + parse_duration(duration)?,
            (None, None) => start + Duration::hours(1),
        };
        if end < start {
            bail!("End {end} is before start {start}");
        }
        let mut event = CalendarEvent::new(&args.title, start, end);
        event.timezone = Some(tz.name().to_string());
        event
    };

    event.location = args.location.clone().filter(|l| !l.is_empty());
    event.description = args.description.clone().filter(|d| !d.is_empty());
    event.color = config.default_color.clone();

    let now = Utc::now().trunc_subsecs(0);
    event.created = Some(now);
    event.last_modified = Some(now);

    for alarm in &args.alarms {
        let minutes = parse_duration(alarm)?.num_minutes();
        let minutes = u32::try_from(minutes).context("Alarm offset too large")?;
        event.alarms.push(EventAlarm::standard(minutes));
    }
    if args.alarms.is_empty() {
        event.alarms.extend(config.default_alarm());
    }

    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(start: &str) -> NewEvent {
        NewEvent {
            title: "Dentist".to_string(),
            start: start.to_string(),
            ..NewEvent::default()
        }
    }

    fn build(args: &NewEvent) -> Result<CalendarEvent> {
        build_event(args, chrono_tz::Europe::Berlin, &KalendsConfig::default())
    }

    // --- parse_when ---

    #[test]
    fn parse_when_date_only() {
        assert_eq!(
            parse_when("2025-03-20", chrono_tz::UTC).unwrap(),
            When::Date(NaiveDate::from_ymd_opt(2025, 3, 20).unwrap())
        );
    }

    #[test]
    fn parse_when_local_time_uses_zone() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 20, 14, 0, 0).unwrap();
        assert_eq!(
            parse_when("2025-03-20T15:00", chrono_tz::Europe::Berlin).unwrap(),
            When::DateTime(expected)
        );
        assert_eq!(
            parse_when("2025-03-20 15:00:00", chrono_tz::Europe::Berlin).unwrap(),
            When::DateTime(expected)
        );
    }

    #[test]
    fn parse_when_rfc3339_ignores_zone() {
        assert_eq!(
            parse_when("2025-03-20T15:00:00Z", chrono_tz::Europe::Berlin).unwrap(),
            When::DateTime(Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap())
        );
    }

    #[test]
    fn parse_when_rejects_garbage_and_gaps() {
        assert!(parse_when("next tuesday", chrono_tz::UTC).is_err());
        // Clocks jump from 02:00 to 03:00 in Berlin on this day.
        assert!(parse_when("2025-03-30T02:30", chrono_tz::Europe::Berlin).is_err());
    }

    // --- build_event ---

    #[test]
    fn timed_event_defaults_to_one_hour() {
        let event = build(&args("2025-03-20T15:00")).unwrap();

        assert!(!event.all_day);
        assert_eq!(event.start, Utc.with_ymd_and_hms(2025, 3, 20, 14, 0, 0).unwrap());
        assert_eq!(event.duration_minutes(), 60);
        assert_eq!(event.timezone.as_deref(), Some("Europe/Berlin"));
        assert!(event.alarms.is_empty());
        assert!(event.created.is_some());
    }

    #[test]
    fn timed_event_with_duration_or_end() {
        let mut a = args("2025-03-20T15:00");
        a.duration = Some("45m".to_string());
        assert_eq!(build(&a).unwrap().duration_minutes(), 45);

        let mut a = args("2025-03-20T15:00");
        a.end = Some("2025-03-20T17:30".to_string());
        assert_eq!(build(&a).unwrap().duration_minutes(), 150);
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut a = args("2025-03-20T15:00");
        a.end = Some("2025-03-20T14:00".to_string());
        assert!(build(&a).is_err());
    }

    #[test]
    fn date_start_makes_all_day_event() {
        let event = build(&args("2025-12-24")).unwrap();

        assert!(event.all_day);
        assert_eq!(event.start, Utc.with_ymd_and_hms(2025, 12, 24, 0, 0, 0).unwrap());
        assert_eq!(event.end, Utc.with_ymd_and_hms(2025, 12, 25, 0, 0, 0).unwrap());
    }

    #[test]
    fn all_day_end_is_inclusive() {
        let mut a = args("2025-12-24");
        a.end = Some("2025-12-26".to_string());
        let event = build(&a).unwrap();
        assert_eq!(event.end, Utc.with_ymd_and_hms(2025, 12, 27, 0, 0, 0).unwrap());

        let mut a = args("2025-12-24");
        a.duration = Some("2days".to_string());
        let event = build(&a).unwrap();
        assert_eq!(event.end, Utc.with_ymd_and_hms(2025, 12, 26, 0, 0, 0).unwrap());
    }

    #[test]
    fn all_day_flag_uses_local_date() {
        let mut a = args("2025-03-20T23:30");
        a.all_day = true;
        let event = build_event(&a, chrono_tz::Asia::Tokyo, &KalendsConfig::default()).unwrap();

        assert!(event.all_day);
        assert_eq!(event.start, Utc.with_ymd_and_hms(2025, 3, 20, 0, 0, 0).unwrap());
    }

    #[test]
    fn alarms_are_parsed_with_descriptions() {
        let mut a = args("2025-03-20T15:00");
        a.alarms = vec!["15m".to_string(), "1day".to_string()];
        let event = build(&a).unwrap();

        let minutes: Vec<u32> = event.alarms.iter().map(|a| a.minutes_before).collect();
        assert_eq!(minutes, [15, 1440]);
        assert_eq!(event.alarms[1].description.as_deref(), Some("1 day before"));

        a.alarms = vec!["soon".to_string()];
        assert!(build(&a).is_err());
    }

    #[test]
    fn config_supplies_color_and_default_alarm() {
        let config = KalendsConfig {
            default_color: "#123456".to_string(),
            default_alarm_minutes: Some(10),
            ..KalendsConfig::default()
        };
        let event = build_event(&args("2025-03-20T15:00"), chrono_tz::UTC, &config).unwrap();

        assert_eq!(event.color, "#123456");
        assert_eq!(event.alarms.len(), 1);
        assert_eq!(event.alarms[0].minutes_before, 10);
    }
}
