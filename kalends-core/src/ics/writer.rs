//! Folded CRLF line output.

use std::fmt::Display;

use super::text::{fold_line, strip_line_breaks};

pub const CRLF: &str = "\r\n";

/// Accumulates content lines, folding each one at 75 octets.
#[derive(Debug, Default)]
pub struct ContentWriter {
    buf: String,
}

impl ContentWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a complete logical line. Raw CR and LF in it are removed.
    pub fn line(&mut self, line: &str) {
        self.buf.push_str(&fold_line(&strip_line_breaks(line)));
        self.buf.push_str(CRLF);
    }

    /// Write `NAME:value`. The value must already be escaped.
    pub fn property(&mut self, name: &str, value: impl Display) {
        self.line(&format!("{name}:{value}"));
    }

    pub fn begin(&mut self, component: &str) {
        self.property("BEGIN", component);
    }

    pub fn end(&mut self, component: &str) {
        self.property("END", component);
    }

    pub fn finish(self) -> String {
        self.buf
    }
}
