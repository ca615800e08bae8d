// SPDX-License-Identifier: MPL-2.0
//! Collector storing recent user actions.

use super::buffer::CircularBuffer;
use super::events::{DiagnosticEvent, SerializableEvent, UserAction};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// JSON report produced by [`DiagnosticsCollector::export_json`].
#[derive(Debug, Serialize)]
pub struct DiagnosticReport {
    pub app_version: &'static str,
    /// RFC 3339 wall-clock time collection started.
    pub collection_started_at: String,
    pub collection_duration_ms: u64,
    pub event_count: usize,
    pub events: Vec<SerializableEvent>,
}

/// Bounded log of recent [`UserAction`]s, exportable as JSON.
#[derive(Debug)]
pub struct DiagnosticsCollector {
    buffer: CircularBuffer<DiagnosticEvent>,
    started_at: Instant,
    started_at_utc: DateTime<Utc>,
}

impl DiagnosticsCollector {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: CircularBuffer::new(capacity),
            started_at: Instant::now(),
            started_at_utc: Utc::now(),
        }
    }

    pub fn log_action(&mut self, action: UserAction) {
        self.log_action_with_details(action, None);
    }

    pub fn log_action_with_details(&mut self, action: UserAction, details: Option<String>) {
        self.buffer.push(DiagnosticEvent::new(action, details));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Recorded actions, oldest first.
    pub fn actions(&self) -> impl Iterator<Item = &UserAction> {
        self.buffer.iter().map(|event| &event.action)
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    #[allow(clippy::cast_possible_truncation)] // Duration in ms fits comfortably in u64
    fn build_report(&self) -> DiagnosticReport {
        let events: Vec<SerializableEvent> = self
            .buffer
            .iter()
            .map(|event| SerializableEvent::new(event, self.started_at))
            .collect();
        DiagnosticReport {
            app_version: env!("CARGO_PKG_VERSION"),
            collection_started_at: self.started_at_utc.to_rfc3339(),
            collection_duration_ms: self.started_at.elapsed().as_millis() as u64,
            event_count: events.len(),
            events,
        }
    }

    /// Exports all recorded actions as a pretty-printed JSON report.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.build_report())
    }

    /// Writes the JSON report to `path` atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any file operation fails.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> io::Result<PathBuf> {
        let path = path.as_ref();
        let json = self.export_json().map_err(io::Error::other)?;
        write_atomic(path, &json)?;
        Ok(path.to_path_buf())
    }
}

impl Default for DiagnosticsCollector {
    fn default() -> Self {
        Self::new(super::buffer::DEFAULT_CAPACITY)
    }
}

/// Default report file name: `race_ana_diagnostics_YYYYMMDD_HHMMSS.json`.
#[must_use]
pub fn generate_default_filename() -> String {
    let now = Local::now();
    format!("race_ana_diagnostics_{}.json", now.format("%Y%m%d_%H%M%S"))
}

/// Writes through a `.tmp` sibling then renames over `path`.
///
/// # Errors
///
/// Returns an error if writing or renaming fails.
pub fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content)?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(())
}
