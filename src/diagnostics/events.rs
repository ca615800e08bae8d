// SPDX-License-Identifier: MPL-2.0
//! Diagnostic event types.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// User-initiated actions recorded for diagnostics.
///
/// Sides are recorded as `"left"` / `"right"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UserAction {
    // ==========================================================================
    // Sources
    // ==========================================================================
    /// Load a video into a side.
    LoadVideo {
        side: String,
        /// `local` or `youtube`.
        kind: String,
    },

    /// A stale local source was re-acquired from its file handle.
    RecoverSource { side: String },

    // ==========================================================================
    // Playback
    // ==========================================================================
    /// Global play/pause toggle.
    ToggleGlobalPlayback { playing: bool },

    /// Per-side play/pause toggle.
    ToggleSidePlayback { side: String, playing: bool },

    /// Frame step. `side` is absent for steps driving both players.
    Step {
        #[serde(skip_serializing_if = "Option::is_none")]
        side: Option<String>,
        forward: bool,
    },

    /// Relative seek from a held key.
    LongPressSeek {
        key: String,
        seconds: f64,
    },

    SetSyncMode { enabled: bool },

    // ==========================================================================
    // Markers
    // ==========================================================================
    SetMarker {
        label: String,
        side: String,
        time_secs: f64,
    },

    EditMarker { id: u64, side: String },

    DeleteMarker { id: u64 },

    /// Jump to a marker. `side` is absent for synchronized jumps.
    JumpToMarker {
        label: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        side: Option<String>,
    },

    // ==========================================================================
    // Session
    // ==========================================================================
    ShareLink {
        include_markers: bool,
        include_time: bool,
    },

    OpenShareLink,

    ClearSession,
}

/// A recorded action with its capture time.
#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    pub timestamp: Instant,
    pub action: UserAction,
    pub details: Option<String>,
}

impl DiagnosticEvent {
    #[must_use]
    pub fn new(action: UserAction, details: Option<String>) -> Self {
        Self {
            timestamp: Instant::now(),
            action,
            details,
        }
    }
}

/// Exported form of [`DiagnosticEvent`], with the time relative to the start
/// of collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerializableEvent {
    pub offset_ms: u64,
    #[serde(flatten)]
    pub action: UserAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl SerializableEvent {
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Duration in ms fits comfortably in u64
    pub fn new(event: &DiagnosticEvent, started_at: Instant) -> Self {
        Self {
            offset_ms: event
                .timestamp
                .saturating_duration_since(started_at)
                .as_millis() as u64,
            action: event.action.clone(),
            details: event.details.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_serialize_with_tag() {
        let json = serde_json::to_value(UserAction::SetMarker {
            label: "3".into(),
            side: "left".into(),
            time_secs: 12.5,
        })
        .unwrap();
        assert_eq!(json["action"], "set_marker");
        assert_eq!(json["label"], "3");
    }

    #[test]
    fn both_side_step_omits_side() {
        let json = serde_json::to_string(&UserAction::Step {
            side: None,
            forward: true,
        })
        .unwrap();
        assert_eq!(json, r#"{"action":"step","forward":true}"#);
    }

    #[test]
    fn serializable_event_flattens_action() {
        let started = Instant::now();
        let event = DiagnosticEvent::new(UserAction::ClearSession, Some("cli".into()));
        let json = serde_json::to_value(SerializableEvent::new(&event, started)).unwrap();
        assert_eq!(json["action"], "clear_session");
        assert_eq!(json["details"], "cli");
        assert!(json["offset_ms"].is_u64());
    }
}
