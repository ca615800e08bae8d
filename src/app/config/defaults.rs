// SPDX-License-Identifier: MPL-2.0
//! Default values for every configuration setting.
//!
//! # Categories
//!
//! - **Playback**: Sync mode and playback rate at startup
//! - **Keyboard**: Long-press stage spacing and repeat interval
//! - **Session**: Session name and stale-source probe interval
//! - **Share**: Share link base URL and include toggles

// ==========================================================================
// Playback Defaults
// ==========================================================================

/// Sync mode for a session that never stored one.
pub const DEFAULT_SYNC_MODE: bool = true;

/// Playback rate applied to freshly loaded players.
pub const DEFAULT_PLAYBACK_RATE: f64 = 1.0;

// ==========================================================================
// Keyboard Defaults
// ==========================================================================

/// Spacing between long-press stages (ms). Stage `n` fires at `(n + 1) * spacing`.
pub const DEFAULT_LONG_PRESS_STAGE_MS: u64 = 500;

/// Smallest accepted stage spacing (ms).
pub const MIN_LONG_PRESS_STAGE_MS: u64 = 100;

/// Largest accepted stage spacing (ms).
pub const MAX_LONG_PRESS_STAGE_MS: u64 = 2_000;

/// Interval of repeated 5 s jumps once the last stage fired (ms).
pub const DEFAULT_LONG_PRESS_REPEAT_MS: u64 = 1_000;

/// Smallest accepted repeat interval (ms).
pub const MIN_LONG_PRESS_REPEAT_MS: u64 = 100;

/// Largest accepted repeat interval (ms).
pub const MAX_LONG_PRESS_REPEAT_MS: u64 = 5_000;

// ==========================================================================
// Session Defaults
// ==========================================================================

/// Session namespace used when none is configured.
pub const DEFAULT_SESSION_NAME: &str = "default";

/// Interval between stale local source checks (seconds).
pub const DEFAULT_PROBE_INTERVAL_SECS: u64 = 5;

/// Smallest accepted probe interval (seconds).
pub const MIN_PROBE_INTERVAL_SECS: u64 = 1;

/// Largest accepted probe interval (seconds).
pub const MAX_PROBE_INTERVAL_SECS: u64 = 60;

// ==========================================================================
// Share Defaults
// ==========================================================================

/// Page the share link points to.
pub const DEFAULT_SHARE_BASE_URL: &str = "https://raceana.app/";

/// Whether share links carry marker labels by default.
pub const DEFAULT_SHARE_INCLUDE_MARKERS: bool = true;

/// Whether share links carry start times by default.
pub const DEFAULT_SHARE_INCLUDE_TIME: bool = true;
