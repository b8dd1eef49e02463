//! ATTENDEE property codec.

use crate::event::{Attendee, AttendeeRole, AttendeeStatus};

use super::lexer::ContentLine;
use super::text::quote_param_value;

/// Renders a full `ATTENDEE;...:mailto:...` line (unfolded).
pub fn encode_attendee(attendee: &Attendee) -> String {
    let mut line = String::from("ATTENDEE");

    if let Some(name) = attendee.name.as_deref().filter(|n| !n.is_empty()) {
        line.push_str(";CN=");
        line.push_str(&quote_param_value(name));
    }
    line.push_str(";ROLE=");
    line.push_str(attendee.role.as_ics_str());
    line.push_str(";PARTSTAT=");
    line.push_str(attendee.status.as_ics_str());
    line.push_str(";RSVP=");
    line.push_str(if attendee.rsvp { "TRUE" } else { "FALSE" });

    line.push_str(":mailto:");
    line.push_str(&attendee.email);
    line
}

/// Reads an ATTENDEE line. Returns `None` when there is no address.
pub fn decode_attendee(line: &ContentLine) -> Option<Attendee> {
    let value = line.value.trim();
    let email = match value.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("mailto:") => &value[7..],
        _ => value,
    };
    if email.is_empty() {
        return None;
    }

    Some(Attendee {
        name: line.param("CN").filter(|n| !n.is_empty()).map(str::to_string),
        email: email.to_string(),
        role: line
            .param("ROLE")
            .and_then(AttendeeRole::from_ics_str)
            .unwrap_or_default(),
        status: line
            .param("PARTSTAT")
            .and_then(AttendeeStatus::from_ics_str)
            .unwrap_or_default(),
        rsvp: line
            .param("RSVP")
            .is_some_and(|v| v.eq_ignore_ascii_case("TRUE")),
    })
}
