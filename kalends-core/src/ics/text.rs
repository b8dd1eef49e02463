//! Text escaping and line folding (RFC 5545 §3.1, §3.3.11).

use std::borrow::Cow;

/// Maximum physical line length in octets, not counting the CRLF.
pub const MAX_LINE_OCTETS: usize = 75;

/// Escapes a TEXT value: backslash, newline, comma and semicolon.
///
/// CR is dropped, so CRLF and LF both become `\n`.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '\r' => {}
            '\n' => result.push_str("\\n"),
            ',' => result.push_str("\\,"),
            ';' => result.push_str("\\;"),
            _ => result.push(c),
        }
    }
    result
}

/// Reverses [`escape_text`].
///
/// Scans left to right so an escaped backslash is never re-read as the start
/// of another escape. `\N` is accepted for newline; unknown escapes are kept
/// as-is.
#[must_use]
pub fn unescape_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => result.push('\\'),
            Some('n' | 'N') => result.push('\n'),
            Some(',') => result.push(','),
            Some(';') => result.push(';'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    result
}

/// Quotes a parameter value if it contains a delimiter, DQUOTE, caret or
/// newline.
///
/// Inside the quotes `^`, newline and `"` use RFC 6868 caret encoding.
#[must_use]
pub fn quote_param_value(value: &str) -> Cow<'_, str> {
    if !value.contains([':', ';', ',', '"', '^', '\n', '\r']) {
        return Cow::Borrowed(value);
    }

    let mut result = String::with_capacity(value.len() + 10);
    result.push('"');
    for c in value.chars() {
        match c {
            '^' => result.push_str("^^"),
            '\r' => {}
            '\n' => result.push_str("^n"),
            '"' => result.push_str("^'"),
            _ => result.push(c),
        }
    }
    result.push('"');
    Cow::Owned(result)
}

/// Reverses the caret encoding of [`quote_param_value`].
///
/// Unknown `^` sequences are kept as-is.
#[must_use]
pub fn unescape_param_value(value: &str) -> Cow<'_, str> {
    if !value.contains('^') {
        return Cow::Borrowed(value);
    }

    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '^' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some('^') => result.push('^'),
            Some('n' | 'N') => result.push('\n'),
            Some('\'') => result.push('"'),
            _ => {
                result.push('^');
                continue;
            }
        }
        chars.next();
    }
    Cow::Owned(result)
}

/// Removes raw CR and LF so a value cannot end its content line early.
#[must_use]
pub fn strip_line_breaks(line: &str) -> Cow<'_, str> {
    if line.contains(['\r', '\n']) {
        Cow::Owned(line.replace(['\r', '\n'], ""))
    } else {
        Cow::Borrowed(line)
    }
}

/// Folds a logical line into physical lines of at most 75 octets.
///
/// Continuation lines start with a single space, which counts toward their
/// 75 octets. Physical lines are joined with CRLF; the caller terminates the
/// last one. UTF-8 characters are never split.
#[must_use]
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut result = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut current_len = 0;
    let mut first_segment = true;

    for c in line.chars() {
        let char_len = c.len_utf8();

        let effective_max = if first_segment {
            MAX_LINE_OCTETS
        } else {
            MAX_LINE_OCTETS - 1
        };

        if current_len + char_len > effective_max {
            result.push_str("\r\n ");
            current_len = 0;
            first_segment = false;
        }

        result.push(c);
        current_len += char_len;
    }

    result
}

/// Unfolds content lines by removing each line break that is followed by a
/// single SPACE or HTAB, along with that whitespace character.
///
/// Bare LF line breaks are accepted as well as CRLF.
#[must_use]
pub fn unfold(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                if matches!(chars.peek(), Some(' ' | '\t')) {
                    chars.next();
                } else {
                    result.push_str("\r\n");
                }
            }
            '\n' => {
                if matches!(chars.peek(), Some(' ' | '\t')) {
                    chars.next();
                } else {
                    result.push('\n');
                }
            }
            _ => result.push(c),
        }
    }

    result
}
