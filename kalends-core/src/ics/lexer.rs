//! Content line tokenization (RFC 5545 §3.1).
//!
//! Input is expected to be unfolded already.

use super::text::unescape_param_value;

/// A property parameter such as `VALUE=DATE`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Upper-cased parameter name
    pub name: String,
    /// Value with surrounding DQUOTEs removed and caret encoding decoded
    pub value: String,
}

/// One logical line: `name *(";" param) ":" value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Upper-cased property name
    pub name: String,
    pub params: Vec<Param>,
    /// Raw value, still escaped
    pub value: String,
}

impl ContentLine {
    /// Parses a single unfolded line.
    ///
    /// The line is split at the first `:` that is not inside a quoted
    /// parameter value. Returns `None` when there is no colon or the name is
    /// empty.
    pub fn parse(line: &str) -> Option<Self> {
        let colon = find_unquoted(line, ':')?;
        let (head, value) = (&line[..colon], &line[colon + 1..]);

        let mut segments = split_unquoted(head, ';').into_iter();
        let name = segments.next()?.trim().to_ascii_uppercase();
        if name.is_empty() {
            return None;
        }

        let params = segments
            .filter_map(|segment| {
                let (key, val) = segment.split_once('=')?;
                let key = key.trim().to_ascii_uppercase();
                if key.is_empty() {
                    return None;
                }
                Some(Param {
                    name: key,
                    value: unescape_param_value(val.trim().trim_matches('"')).into_owned(),
                })
            })
            .collect();

        Some(ContentLine {
            name,
            params,
            value: value.to_string(),
        })
    }

    /// Value of the first parameter with this (upper-case) name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Whether the line carries `VALUE=DATE`.
    pub fn is_date_value(&self) -> bool {
        self.param("VALUE")
            .is_some_and(|v| v.eq_ignore_ascii_case("DATE"))
    }
}

/// Byte offset of the first `needle` outside double quotes.
fn find_unquoted(s: &str, needle: char) -> Option<usize> {
    let mut in_quotes = false;
    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c == needle && !in_quotes => return Some(i),
            _ => {}
        }
    }
    None
}

fn split_unquoted(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = s;
    while let Some(i) = find_unquoted(rest, sep) {
        parts.push(&rest[..i]);
        rest = &rest[i + sep.len_utf8()..];
    }
    parts.push(rest);
    parts
}
