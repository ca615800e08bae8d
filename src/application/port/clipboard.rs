// SPDX-License-Identifier: MPL-2.0
//! Clipboard port definition.

/// Port for anything that can receive copied text.
pub trait ClipboardSink {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Copies `text`.
    ///
    /// # Errors
    ///
    /// Returns a description of the failure if the text could not be copied.
    fn write_text(&mut self, text: &str) -> Result<(), String>;
}
