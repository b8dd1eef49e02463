use kalends_core::CalendarEvent;

/// File name for a single exported event, e.g. `2025-03-20T1500__standup.ics`.
pub fn base_filename(event: &CalendarEvent) -> String {
    let slug = slugify(&event.title);
    let slug = if slug.is_empty() { "event".to_string() } else { slug };

    if event.recurrence.is_some() {
        return format!("_recurring__{slug}.ics");
    }

    let date = if event.all_day {
        event.start.format("%Y-%m-%d").to_string()
    } else {
        event.start.format("%Y-%m-%dT%H%M").to_string()
    };

    format!("{date}__{slug}.ics")
}

pub fn slugify(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(50)
        .collect()
}
