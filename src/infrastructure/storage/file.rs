// SPDX-License-Identifier: MPL-2.0
//! File-backed session storage.
//!
//! Each key is stored in its own `<key>.json` file inside the session
//! directory, so a change to one key never rewrites the others. Values are
//! written to a temporary file first and renamed into place.
//!
//! # Path Resolution
//!
//! The session directory is `<data dir>/sessions/<session name>/`:
//! 1. Use `open_in()` with an explicit data directory (tests, portable use)
//! 2. Set `RACE_ANA_DATA_DIR` environment variable
//! 3. Falls back to platform-specific data directory

use crate::app::paths;
use crate::application::port::SessionStorage;
use crate::diagnostics::write_atomic;
use crate::error::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Sub-directory of the data directory holding sessions.
const SESSIONS_DIR: &str = "sessions";

/// Extension of stored values.
const VALUE_EXT: &str = "json";

/// Session storage persisted as one file per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens the named session under the default data directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the data directory cannot be determined
    /// or the session name is not a plain identifier.
    pub fn open(session: &str) -> Result<Self> {
        Self::open_in(None, session)
    }

    /// Opens the named session under a custom data directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the data directory cannot be determined
    /// or the session name is not a plain identifier.
    pub fn open_in(base_dir: Option<PathBuf>, session: &str) -> Result<Self> {
        if !is_plain_name(session) {
            return Err(Error::Storage(format!("invalid session name: {session}")));
        }
        let mut dir = paths::get_app_data_dir_with_override(base_dir)
            .ok_or_else(|| Error::Storage("data directory unavailable".to_string()))?;
        dir.push(SESSIONS_DIR);
        dir.push(session);
        Ok(Self { dir })
    }

    /// Directory holding this session's values.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn value_path(&self, key: &str) -> Result<PathBuf> {
        if !is_plain_name(key) {
            return Err(Error::Storage(format!("invalid storage key: {key}")));
        }
        Ok(self.dir.join(format!("{key}.{VALUE_EXT}")))
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.value_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.value_path(key)?;
        fs::create_dir_all(&self.dir)?;
        write_atomic(&path, value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.value_path(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn values_survive_reopen() {
        let temp_dir = tempdir().expect("create temp dir");
        let base = temp_dir.path().to_path_buf();

        let mut storage = FileStorage::open_in(Some(base.clone()), "default").unwrap();
        storage.set("syncMode", "false").unwrap();

        let reopened = FileStorage::open_in(Some(base), "default").unwrap();
        assert_eq!(reopened.get("syncMode").unwrap().as_deref(), Some("false"));
        assert!(reopened.dir().ends_with("sessions/default"));
    }

    #[test]
    fn missing_key_is_none_and_remove_is_idempotent() {
        let temp_dir = tempdir().expect("create temp dir");
        let mut storage = FileStorage::open_in(Some(temp_dir.path().to_path_buf()), "s1").unwrap();

        assert!(storage.get("markers").unwrap().is_none());
        storage.remove("markers").unwrap();
        storage.set("markers", "[]").unwrap();
        storage.remove("markers").unwrap();
        assert!(storage.get("markers").unwrap().is_none());
    }

    #[test]
    fn sessions_are_isolated() {
        let temp_dir = tempdir().expect("create temp dir");
        let base = temp_dir.path().to_path_buf();

        let mut a = FileStorage::open_in(Some(base.clone()), "a").unwrap();
        let b = FileStorage::open_in(Some(base), "b").unwrap();
        a.set("leftVideo", "{}").unwrap();
        assert!(b.get("leftVideo").unwrap().is_none());
    }

    #[test]
    fn rejects_path_like_names() {
        let temp_dir = tempdir().expect("create temp dir");
        let base = Some(temp_dir.path().to_path_buf());
        assert!(FileStorage::open_in(base.clone(), "../escape").is_err());

        let storage = FileStorage::open_in(base, "ok").unwrap();
        assert!(storage.get("../x").is_err());
    }

    #[test]
    fn overwrite_leaves_no_temporary_file() {
        let temp_dir = tempdir().expect("create temp dir");
        let mut storage = FileStorage::open_in(Some(temp_dir.path().to_path_buf()), "s2").unwrap();

        storage.set("markers", "[1]").unwrap();
        storage.set("markers", "[1,2]").unwrap();

        assert_eq!(storage.get("markers").unwrap().as_deref(), Some("[1,2]"));
        let names: Vec<String> = fs::read_dir(storage.dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["markers.json".to_string()]);
    }
}
