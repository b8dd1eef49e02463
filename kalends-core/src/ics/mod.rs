//! ICS file generation and parsing.
//!
//! This module handles reading and writing .ics files according to RFC 5545,
//! restricted to VEVENT with nested VALARM.

mod alarm;
mod attendee;
mod generate;
mod lexer;
mod parse;
mod rrule;
mod text;
mod values;
mod writer;

use std::io::{Read, Write};

use crate::error::KalendsResult;
use crate::event::CalendarEvent;

pub use alarm::{format_trigger, parse_duration_seconds, parse_trigger};
pub use attendee::{decode_attendee, encode_attendee};
pub use generate::{encode, encode_with, ExportOptions, COLOR_PROPERTY, DEFAULT_PRODUCT_ID};
pub use lexer::{ContentLine, Param};
pub use parse::decode;
pub use rrule::{decode_rrule, encode_rrule};
pub use text::{escape_text, fold_line, unescape_text, unfold, MAX_LINE_OCTETS};
pub use values::{format_date, format_date_time, parse_date, parse_date_time};

/// Encode `events` and write the document to `out`.
///
/// The caller owns the writer; it is flushed but not closed.
pub fn write_ics<W: Write>(
    out: &mut W,
    events: &[CalendarEvent],
    options: &ExportOptions,
) -> KalendsResult<()> {
    out.write_all(encode_with(events, options).as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Read a whole document from `input` and decode it.
///
/// Invalid UTF-8 sequences are replaced rather than rejected, so only I/O
/// errors are reported.
pub fn read_ics<R: Read>(input: &mut R) -> KalendsResult<Vec<CalendarEvent>> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;
    Ok(decode(&String::from_utf8_lossy(&bytes)))
}
