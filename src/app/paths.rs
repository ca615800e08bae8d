// SPDX-License-Identifier: MPL-2.0
//! Application directory resolution.
//!
//! Both the data directory (sessions) and the config directory
//! (`settings.toml`) resolve the same way, first match wins:
//! 1. Explicit override passed to a `_with_override()` function (tests)
//! 2. CLI flags `--data-dir` / `--config-dir`, set via [`init_cli_overrides`]
//! 3. Environment variables `RACE_ANA_DATA_DIR` / `RACE_ANA_CONFIG_DIR`
//! 4. Platform default from `dirs`, with the app name appended

use std::path::PathBuf;
use std::sync::OnceLock;

/// Directory name under the platform data/config roots.
const APP_NAME: &str = "RaceAna";

/// Environment variable overriding the data directory.
pub const ENV_DATA_DIR: &str = "RACE_ANA_DATA_DIR";

/// Environment variable overriding the config directory.
pub const ENV_CONFIG_DIR: &str = "RACE_ANA_CONFIG_DIR";

static CLI_DATA_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();
static CLI_CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Records the `--data-dir` / `--config-dir` flags.
///
/// Only the first call takes effect; later calls are logged and ignored.
pub fn init_cli_overrides(data_dir: Option<String>, config_dir: Option<String>) {
    if CLI_DATA_DIR.set(data_dir.map(PathBuf::from)).is_err()
        || CLI_CONFIG_DIR.set(config_dir.map(PathBuf::from)).is_err()
    {
        tracing::warn!("CLI directory overrides already initialized, ignoring");
    }
}

fn resolve(
    override_path: Option<PathBuf>,
    cli: &OnceLock<Option<PathBuf>>,
    env_var: &str,
    platform_root: Option<PathBuf>,
) -> Option<PathBuf> {
    if override_path.is_some() {
        return override_path;
    }
    if let Some(path) = cli.get().and_then(Clone::clone) {
        return Some(path);
    }
    match std::env::var(env_var) {
        Ok(value) if !value.is_empty() => return Some(PathBuf::from(value)),
        _ => {}
    }
    platform_root.map(|root| root.join(APP_NAME))
}

/// Data directory holding saved sessions.
///
/// Platform default is `~/.local/share/RaceAna/` on Linux,
/// `~/Library/Application Support/RaceAna/` on macOS and
/// `%APPDATA%\RaceAna\` on Windows. `None` only if the platform has no
/// data directory.
#[must_use]
pub fn get_app_data_dir() -> Option<PathBuf> {
    get_app_data_dir_with_override(None)
}

/// Data directory, preferring `override_path` when given.
#[must_use]
pub fn get_app_data_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve(override_path, &CLI_DATA_DIR, ENV_DATA_DIR, dirs::data_dir())
}

/// Config directory holding `settings.toml`.
#[must_use]
pub fn get_app_config_dir() -> Option<PathBuf> {
    get_app_config_dir_with_override(None)
}

/// Config directory, preferring `override_path` when given.
#[must_use]
pub fn get_app_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve(
        override_path,
        &CLI_CONFIG_DIR,
        ENV_CONFIG_DIR,
        dirs::config_dir(),
    )
}
