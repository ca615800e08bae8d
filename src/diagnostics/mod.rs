// SPDX-License-Identifier: MPL-2.0
//! Diagnostics: a bounded log of user actions exportable as JSON.
//!
//! Every command the workspace executes is recorded as a [`UserAction`].
//! The CLI prints the report with `--diagnostics`.

mod buffer;
mod collector;
mod events;

pub use buffer::{CircularBuffer, DEFAULT_CAPACITY};
pub use collector::{generate_default_filename, write_atomic, DiagnosticReport, DiagnosticsCollector};
pub use events::{DiagnosticEvent, SerializableEvent, UserAction};
