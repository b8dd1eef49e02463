use anyhow::{Result, anyhow};
use chrono_tz::Tz;

/// The named zone, or the system zone when no name is given.
pub fn resolve_tz(name: Option<&str>) -> Result<Tz> {
    match name {
        Some(name) => name
            .parse::<Tz>()
            .map_err(|e| anyhow!("Unknown time zone \"{name}\": {e}")),
        None => Ok(system_tz()),
    }
}

/// The system's IANA zone, falling back to UTC when it cannot be determined.
pub fn system_tz() -> Tz {
    match iana_time_zone::get_timezone() {
        Ok(name) => name.parse().unwrap_or_else(|_| {
            tracing::debug!(zone = %name, "System time zone not in tz database, using UTC");
            chrono_tz::UTC
        }),
        Err(e) => {
            tracing::debug!(error = %e, "Could not determine system time zone, using UTC");
            chrono_tz::UTC
        }
    }
}
