// SPDX-License-Identifier: MPL-2.0
//! Clipboard adapters.
//!
//! - [`SystemClipboard`]: the desktop clipboard through `arboard`
//! - [`Osc52Clipboard`]: the terminal's OSC 52 selection escape, used when
//!   the desktop clipboard is unavailable (headless sessions, SSH)

use crate::application::port::ClipboardSink;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::io::Write;

/// Maximum text size accepted for clipboard copies (10 MB).
pub const MAX_CLIPBOARD_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Desktop clipboard.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn name(&self) -> &'static str {
        "system"
    }

    fn write_text(&mut self, text: &str) -> Result<(), String> {
        if text.len() > MAX_CLIPBOARD_SIZE_BYTES {
            return Err(format!("content too large: {} bytes", text.len()));
        }
        let mut clipboard = arboard::Clipboard::new().map_err(|e| e.to_string())?;
        clipboard.set_text(text).map_err(|e| e.to_string())
    }
}

/// Terminal clipboard via the OSC 52 escape sequence.
#[derive(Debug)]
pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl Osc52Clipboard<std::io::Stdout> {
    /// OSC 52 clipboard writing to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

/// Builds the OSC 52 "set clipboard" sequence for `text`.
#[must_use]
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

impl<W: Write> ClipboardSink for Osc52Clipboard<W> {
    fn name(&self) -> &'static str {
        "osc52"
    }

    fn write_text(&mut self, text: &str) -> Result<(), String> {
        if text.len() > MAX_CLIPBOARD_SIZE_BYTES {
            return Err(format!("content too large: {} bytes", text.len()));
        }
        self.out
            .write_all(osc52_sequence(text).as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn osc52_sequence_is_base64_wrapped() {
        assert_eq!(osc52_sequence("hi"), "\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn osc52_writes_sequence() {
        let mut sink = Osc52Clipboard::new(Vec::new());
        sink.write_text("link").unwrap();
        let written = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(written, osc52_sequence("link"));
    }

    #[test]
    fn rejects_oversized_text() {
        let mut sink = Osc52Clipboard::new(Vec::new());
        let big = "x".repeat(MAX_CLIPBOARD_SIZE_BYTES + 1);
        assert!(sink.write_text(&big).is_err());
    }
}
