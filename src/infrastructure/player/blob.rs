// SPDX-License-Identifier: MPL-2.0
//! Revocable object URLs for local files.
//!
//! A picked local file is not handed to the player by path. Instead it is
//! registered here and referenced through an opaque `blob:` URL, which is
//! revoked when the side's video is replaced or the session is cleared. A
//! revoked (or restored-but-never-registered) URL is what the reachability
//! probe detects as a stale source.
//!
//! Each registry mints URLs under its own scope, so a URL persisted by an
//! earlier run never resolves to a file registered by this one.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

/// URL scheme prefix of registered local files.
pub const BLOB_PREFIX: &str = "blob:race-ana/";

/// Registry shared between the workspace, backends and probes.
pub type SharedBlobRegistry = Arc<Mutex<BlobRegistry>>;

/// Creates an empty shared registry.
#[must_use]
pub fn shared_registry() -> SharedBlobRegistry {
    Arc::new(Mutex::new(BlobRegistry::default()))
}

static REGISTRIES: AtomicU64 = AtomicU64::new(0);

/// Maps object URLs to the files they stand for.
#[derive(Debug)]
pub struct BlobRegistry {
    entries: HashMap<String, PathBuf>,
    next_id: u64,
    scope: String,
}

impl Default for BlobRegistry {
    fn default() -> Self {
        let started = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();
        let instance = REGISTRIES.fetch_add(1, Ordering::Relaxed);
        Self {
            entries: HashMap::new(),
            next_id: 0,
            scope: format!("{started:x}-{:x}-{instance}", std::process::id()),
        }
    }
}

impl BlobRegistry {
    /// Registers a file and returns a fresh object URL for it.
    pub fn create_object_url(&mut self, path: &Path) -> String {
        self.next_id += 1;
        let url = format!("{BLOB_PREFIX}{}/{}", self.scope, self.next_id);
        self.entries.insert(url.clone(), path.to_path_buf());
        url
    }

    /// Revokes an object URL. Returns true if it was registered.
    pub fn revoke(&mut self, url: &str) -> bool {
        self.entries.remove(url).is_some()
    }

    /// Resolves an object URL to its file, if still registered.
    #[must_use]
    pub fn resolve(&self, url: &str) -> Option<PathBuf> {
        self.entries.get(url).cloned()
    }

    /// Number of live object URLs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Returns true if `url` is an object URL from this registry's scheme.
#[must_use]
pub fn is_blob_url(url: &str) -> bool {
    url.starts_with(BLOB_PREFIX)
}

/// Resolves a local source URL to a file path.
///
/// Object URLs go through the registry; `file://` URLs and plain paths are
/// taken as-is.
#[must_use]
pub fn resolve_local(registry: &SharedBlobRegistry, url: &str) -> Option<PathBuf> {
    if is_blob_url(url) {
        return registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .resolve(url);
    }
    let path = url.strip_prefix("file://").unwrap_or(url);
    Some(PathBuf::from(path))
}

/// Returns true if the local source behind `url` can currently be read.
#[must_use]
pub fn is_reachable(registry: &SharedBlobRegistry, url: &str) -> bool {
    resolve_local(registry, url)
        .map(|path| path.is_file())
        .unwrap_or(false)
}

/// A retained handle to a picked file, allowing a fresh object URL to be
/// created after the original one went stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    path: PathBuf,
}

impl FileHandle {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-acquires the file, failing if it is gone or unreadable.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    pub fn get_file(&self) -> std::io::Result<fs::File> {
        fs::File::open(&self.path)
    }
}
