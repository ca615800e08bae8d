// SPDX-License-Identifier: MPL-2.0
//! User settings stored in `settings.toml`.
//!
//! # Configuration Sections
//!
//! - `[playback]` - Sync mode and playback rate at startup
//! - `[keyboard]` - Long-press timing
//! - `[session]` - Session namespace and stale-source probe interval
//! - `[share]` - Share link base URL and include toggles
//!
//! Every field is optional; missing values fall back to [`defaults`], and
//! out-of-range values are clamped by the typed accessors.
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. `--config-dir` flag or `RACE_ANA_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use race_ana::app::config::{self, Config};
//!
//! let (mut config, _warning) = config::load();
//! config.playback.default_sync_mode = Some(false);
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::domain::video::PlaybackRate;
use crate::error::{Error, Result};
use crate::input::LongPressTiming;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const CONFIG_FILE: &str = "settings.toml";

/// Warning key returned when an existing config file cannot be parsed.
pub const CONFIG_LOAD_WARNING: &str = "config-load-error";

// =============================================================================
// Section Structs
// =============================================================================

/// Playback settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PlaybackConfig {
    /// Sync mode used when the session has none stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sync_mode: Option<bool>,

    /// Playback rate applied to both players at startup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_rate: Option<f64>,
}

/// Keyboard settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct KeyboardConfig {
    /// Spacing between long-press stages (ms).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_press_stage_ms: Option<u64>,

    /// Repeat interval of 5 s jumps after the last stage (ms).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_press_repeat_ms: Option<u64>,
}

/// Session settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SessionConfig {
    /// Session namespace under the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Interval between stale local source checks (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe_interval_secs: Option<u64>,
}

/// Share link settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ShareConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_markers: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_time: Option<bool>,
}

// =============================================================================
// Main Config Struct
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub keyboard: KeyboardConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub share: ShareConfig,
}

impl Config {
    #[must_use]
    pub fn default_sync_mode(&self) -> bool {
        self.playback.default_sync_mode.unwrap_or(DEFAULT_SYNC_MODE)
    }

    /// Startup playback rate, snapped to the nearest preset.
    #[must_use]
    pub fn default_rate(&self) -> PlaybackRate {
        PlaybackRate::new(self.playback.default_rate.unwrap_or(DEFAULT_PLAYBACK_RATE))
    }

    /// Long-press timing with both values clamped to their accepted ranges.
    #[must_use]
    pub fn long_press_timing(&self) -> LongPressTiming {
        let stage = self
            .keyboard
            .long_press_stage_ms
            .unwrap_or(DEFAULT_LONG_PRESS_STAGE_MS)
            .clamp(MIN_LONG_PRESS_STAGE_MS, MAX_LONG_PRESS_STAGE_MS);
        let repeat = self
            .keyboard
            .long_press_repeat_ms
            .unwrap_or(DEFAULT_LONG_PRESS_REPEAT_MS)
            .clamp(MIN_LONG_PRESS_REPEAT_MS, MAX_LONG_PRESS_REPEAT_MS);
        LongPressTiming::new(Duration::from_millis(stage), Duration::from_millis(repeat))
    }

    #[must_use]
    pub fn session_name(&self) -> &str {
        self.session
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_SESSION_NAME)
    }

    #[must_use]
    pub fn probe_interval(&self) -> Duration {
        let secs = self
            .session
            .probe_interval_secs
            .unwrap_or(DEFAULT_PROBE_INTERVAL_SECS)
            .clamp(MIN_PROBE_INTERVAL_SECS, MAX_PROBE_INTERVAL_SECS);
        Duration::from_secs(secs)
    }

    /// Base URL of share links.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configured URL does not parse.
    pub fn share_base_url(&self) -> Result<Url> {
        let raw = self
            .share
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_SHARE_BASE_URL);
        Url::parse(raw).map_err(|e| Error::Config(format!("invalid share base_url {raw}: {e}")))
    }

    #[must_use]
    pub fn share_include_markers(&self) -> bool {
        self.share
            .include_markers
            .unwrap_or(DEFAULT_SHARE_INCLUDE_MARKERS)
    }

    #[must_use]
    pub fn share_include_time(&self) -> bool {
        self.share.include_time.unwrap_or(DEFAULT_SHARE_INCLUDE_TIME)
    }
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning key explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    let Some(path) = get_config_path_with_override(base_dir) else {
        return (Config::default(), None);
    };
    if !path.exists() {
        return (Config::default(), None);
    }
    match load_from_path(&path) {
        Ok(config) => (config, None),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "falling back to default config");
            (Config::default(), Some(CONFIG_LOAD_WARNING.to_string()))
        }
    }
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}
