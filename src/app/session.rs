// SPDX-License-Identifier: MPL-2.0
//! Session persistence.
//!
//! The session is four JSON values in a [`SessionStorage`]:
//!
//! | Key | Value |
//! |-----|-------|
//! | `leftVideo`, `rightVideo` | `{"type":"local"\|"youtube","url":…,"title":…,"filePath":…}` |
//! | `markers` | `[{"id":…,"label":…,"leftTime":…,"rightTime":…}]` |
//! | `syncMode` | `true` / `false` |
//!
//! `filePath` is the retained handle of a picked local file; it lets a
//! later process register a fresh object URL for the same file.
//!
//! Videos are written when present and markers once non-empty, so clearing
//! a value in memory never erases the stored one; only [`clear`] does.
//! Hydration skips any value that fails to parse and keeps the rest.

use super::share::ShareParams;
use crate::application::port::SessionStorage;
use crate::domain::marker::{Marker, MarkerId};
use crate::domain::video::{Side, SourceKind, VideoSource};
use crate::error::Result;
use crate::infrastructure::player::FileHandle;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage keys.
pub mod session_keys {
    pub const LEFT_VIDEO: &str = "leftVideo";
    pub const RIGHT_VIDEO: &str = "rightVideo";
    pub const MARKERS: &str = "markers";
    pub const SYNC_MODE: &str = "syncMode";

    pub const ALL: [&str; 4] = [LEFT_VIDEO, RIGHT_VIDEO, MARKERS, SYNC_MODE];
}

use session_keys::{LEFT_VIDEO, MARKERS, RIGHT_VIDEO, SYNC_MODE};

#[must_use]
pub fn video_key(side: Side) -> &'static str {
    match side {
        Side::Left => LEFT_VIDEO,
        Side::Right => RIGHT_VIDEO,
    }
}

// =============================================================================
// Stored Forms
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum StoredKind {
    Local,
    Youtube,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct StoredVideo {
    #[serde(rename = "type")]
    kind: StoredKind,
    url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_path: Option<PathBuf>,
}

impl StoredVideo {
    fn new(source: &VideoSource, handle: Option<&FileHandle>) -> Self {
        Self {
            kind: match source.kind {
                SourceKind::Local => StoredKind::Local,
                SourceKind::Youtube => StoredKind::Youtube,
            },
            url: source.url.clone(),
            title: source.title.clone(),
            file_path: handle
                .filter(|_| source.is_local())
                .map(|handle| handle.path().to_path_buf()),
        }
    }

    fn into_parts(self) -> (VideoSource, Option<FileHandle>) {
        let kind = match self.kind {
            StoredKind::Local => SourceKind::Local,
            StoredKind::Youtube => SourceKind::Youtube,
        };
        let handle = self
            .file_path
            .filter(|_| kind == SourceKind::Local)
            .map(FileHandle::new);
        let source = VideoSource {
            kind,
            url: self.url,
            title: self.title,
        };
        (source, handle)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct StoredMarker {
    id: u64,
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    left_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    right_time: Option<f64>,
}

impl From<&Marker> for StoredMarker {
    fn from(marker: &Marker) -> Self {
        Self {
            id: marker.id.0,
            label: marker.label.clone(),
            left_time: marker.left_time,
            right_time: marker.right_time,
        }
    }
}

impl From<StoredMarker> for Marker {
    fn from(stored: StoredMarker) -> Self {
        Self {
            id: MarkerId(stored.id),
            label: stored.label,
            left_time: stored.left_time,
            right_time: stored.right_time,
        }
    }
}

// =============================================================================
// Save
// =============================================================================

/// Persists a side's video, with the retained file handle of a local
/// source. `None` leaves the stored value alone.
pub fn save_video(
    storage: &mut dyn SessionStorage,
    side: Side,
    source: Option<&VideoSource>,
    handle: Option<&FileHandle>,
) -> Result<()> {
    let Some(source) = source else {
        return Ok(());
    };
    let json = serde_json::to_string(&StoredVideo::new(source, handle))?;
    storage.set(video_key(side), &json)
}

/// Persists the marker list once it is non-empty.
pub fn save_markers(storage: &mut dyn SessionStorage, markers: &[Marker]) -> Result<()> {
    if markers.is_empty() {
        return Ok(());
    }
    let stored: Vec<StoredMarker> = markers.iter().map(StoredMarker::from).collect();
    storage.set(MARKERS, &serde_json::to_string(&stored)?)
}

pub fn save_sync_mode(storage: &mut dyn SessionStorage, enabled: bool) -> Result<()> {
    storage.set(SYNC_MODE, &serde_json::to_string(&enabled)?)
}

/// Removes every session key.
pub fn clear(storage: &mut dyn SessionStorage) -> Result<()> {
    for key in session_keys::ALL {
        storage.remove(key)?;
    }
    Ok(())
}

// =============================================================================
// Load
// =============================================================================

/// Session state restored from storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub left_video: Option<VideoSource>,
    pub right_video: Option<VideoSource>,
    /// Retained handles of local sources.
    pub left_handle: Option<FileHandle>,
    pub right_handle: Option<FileHandle>,
    pub markers: Vec<Marker>,
    /// `None` when never stored; the configured default applies.
    pub sync_mode: Option<bool>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn video(&self, side: Side) -> Option<&VideoSource> {
        match side {
            Side::Left => self.left_video.as_ref(),
            Side::Right => self.right_video.as_ref(),
        }
    }

    #[must_use]
    pub fn handle(&self, side: Side) -> Option<&FileHandle> {
        match side {
            Side::Left => self.left_handle.as_ref(),
            Side::Right => self.right_handle.as_ref(),
        }
    }

    /// Replaces a side's video; any retained handle goes with the old one.
    fn set_video(&mut self, side: Side, source: VideoSource) {
        match side {
            Side::Left => {
                self.left_video = Some(source);
                self.left_handle = None;
            }
            Side::Right => {
                self.right_video = Some(source);
                self.right_handle = None;
            }
        }
    }
}

/// Reads and decodes one key. Unreadable or malformed values are reported
/// in `warnings` and treated as absent.
fn read_value<T: serde::de::DeserializeOwned>(
    storage: &dyn SessionStorage,
    key: &str,
    warnings: &mut Vec<String>,
) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(raw) => raw?,
        Err(err) => {
            tracing::warn!(%key, error = %err, "session value unreadable, skipping");
            warnings.push(key.to_string());
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(%key, error = %err, "session value malformed, skipping");
            warnings.push(key.to_string());
            None
        }
    }
}

/// Loads the stored session.
///
/// Returns the snapshot and the keys that were skipped because they could
/// not be read or decoded.
pub fn load_snapshot(storage: &dyn SessionStorage) -> (SessionSnapshot, Vec<String>) {
    let mut warnings = Vec::new();
    let (left_video, left_handle) = read_value::<StoredVideo>(storage, LEFT_VIDEO, &mut warnings)
        .map(StoredVideo::into_parts)
        .unzip();
    let (right_video, right_handle) =
        read_value::<StoredVideo>(storage, RIGHT_VIDEO, &mut warnings)
            .map(StoredVideo::into_parts)
            .unzip();
    let markers = read_value::<Vec<StoredMarker>>(storage, MARKERS, &mut warnings)
        .map(|stored| stored.into_iter().map(Marker::from).collect())
        .unwrap_or_default();
    let sync_mode = read_value::<bool>(storage, SYNC_MODE, &mut warnings);

    let snapshot = SessionSnapshot {
        left_video,
        right_video,
        left_handle: left_handle.flatten(),
        right_handle: right_handle.flatten(),
        markers,
        sync_mode,
    };
    (snapshot, warnings)
}

/// Session state to restore at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hydrated {
    pub snapshot: SessionSnapshot,
    pub left_start_time: Option<f64>,
    pub right_start_time: Option<f64>,
}

impl Hydrated {
    #[must_use]
    pub fn start_time(&self, side: Side) -> Option<f64> {
        match side {
            Side::Left => self.left_start_time,
            Side::Right => self.right_start_time,
        }
    }
}

/// Loads the stored session, letting share link parameters override it.
///
/// Each parameter present in `share` replaces the stored counterpart: a
/// video id replaces that side's video and any label list replaces the whole
/// marker set. Start times only come from the link.
pub fn hydrate(
    storage: &dyn SessionStorage,
    share: Option<&ShareParams>,
) -> (Hydrated, Vec<String>) {
    let (mut snapshot, warnings) = load_snapshot(storage);
    let Some(share) = share else {
        return (
            Hydrated {
                snapshot,
                ..Hydrated::default()
            },
            warnings,
        );
    };

    for side in Side::BOTH {
        if let Some(video) = share.video(side) {
            snapshot.set_video(side, video);
        }
    }
    if share.has_markers() {
        snapshot.markers = share.markers();
    }

    let hydrated = Hydrated {
        snapshot,
        left_start_time: share.left_start_time,
        right_start_time: share.right_start_time,
    };
    (hydrated, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::MemoryStorage;
    use url::Url;

    fn marker(id: u64, label: &str, left: Option<f64>, right: Option<f64>) -> Marker {
        Marker {
            id: MarkerId(id),
            label: label.to_string(),
            left_time: left,
            right_time: right,
        }
    }

    #[test]
    fn stored_values_use_camel_case_json() {
        let mut storage = MemoryStorage::default();
        save_markers(&mut storage, &[marker(7, "1", Some(1.5), None)]).unwrap();
        save_video(&mut storage, Side::Right, Some(&VideoSource::youtube_id("abc")), None)
        .unwrap();

        assert_eq!(
            storage.get(MARKERS).unwrap().as_deref(),
            Some(r#"[{"id":7,"label":"1","leftTime":1.5}]"#)
        );
        assert_eq!(
            storage.get(RIGHT_VIDEO).unwrap().as_deref(),
            Some(r#"{"type":"youtube","url":"https://www.youtube.com/watch?v=abc"}"#)
        );
    }

    #[test]
    fn empty_values_are_not_written() {
        let mut storage = MemoryStorage::default();
        save_markers(&mut storage, &[marker(1, "1", Some(1.0), None)]).unwrap();
        save_markers(&mut storage, &[]).unwrap();
        save_video(&mut storage, Side::Left, None, None).unwrap();

        assert!(storage.get(MARKERS).unwrap().is_some());
        assert!(storage.get(LEFT_VIDEO).unwrap().is_none());
    }

    #[test]
    fn snapshot_round_trip() {
        let mut storage = MemoryStorage::default();
        let left = VideoSource::from_input("/videos/a.mp4", Side::Left).unwrap();
        let markers = vec![marker(1, "1", Some(1.0), Some(2.0)), marker(2, "2", None, Some(3.0))];
        save_video(&mut storage, Side::Left, Some(&left), None).unwrap();
        save_markers(&mut storage, &markers).unwrap();
        save_sync_mode(&mut storage, false).unwrap();

        let (snapshot, warnings) = load_snapshot(&storage);
        assert!(warnings.is_empty());
        assert_eq!(snapshot.left_video, Some(left));
        assert!(snapshot.right_video.is_none());
        assert_eq!(snapshot.markers, markers);
        assert_eq!(snapshot.sync_mode, Some(false));
    }

    #[test]
    fn malformed_value_is_skipped_and_rest_hydrates() {
        let mut storage = MemoryStorage::default();
        storage.set(MARKERS, "{not json").unwrap();
        storage.set(LEFT_VIDEO, r#"{"type":"vimeo","url":"x"}"#).unwrap();
        save_sync_mode(&mut storage, false).unwrap();

        let (snapshot, warnings) = load_snapshot(&storage);
        assert_eq!(warnings, vec![LEFT_VIDEO.to_string(), MARKERS.to_string()]);
        assert!(snapshot.markers.is_empty());
        assert!(snapshot.left_video.is_none());
        assert_eq!(snapshot.sync_mode, Some(false));
    }

    #[test]
    fn legacy_marker_fields_are_ignored() {
        let mut storage = MemoryStorage::default();
        storage
            .set(
                MARKERS,
                r#"[{"id":1700000000000,"label":"1","leftTime":2,"videoSide":"left"}]"#,
            )
            .unwrap();

        let (snapshot, warnings) = load_snapshot(&storage);
        assert!(warnings.is_empty());
        assert_eq!(snapshot.markers[0].id, MarkerId(1_700_000_000_000));
        assert_eq!(snapshot.markers[0].left_time, Some(2.0));
    }

    #[test]
    fn clear_removes_every_key() {
        let mut storage = MemoryStorage::default();
        save_video(&mut storage, Side::Left, Some(&VideoSource::youtube_id("a")), None).unwrap();
        save_sync_mode(&mut storage, true).unwrap();
        clear(&mut storage).unwrap();

        let (snapshot, _) = load_snapshot(&storage);
        assert_eq!(snapshot, SessionSnapshot::default());
    }

    #[test]
    fn share_params_override_storage() {
        let mut storage = MemoryStorage::default();
        save_video(&mut storage, Side::Left, Some(&VideoSource::youtube_id("stored")), None).unwrap();
        save_video(&mut storage, Side::Right, Some(&VideoSource::youtube_id("kept")), None).unwrap();
        save_markers(&mut storage, &[marker(1, "old", Some(1.0), None)]).unwrap();

        let url = Url::parse("https://raceana.app/?left=shared&leftLabels=1-4.00&leftStartTime=9.50")
            .unwrap();
        let share = ShareParams::parse(&url);
        let (hydrated, _) = hydrate(&storage, Some(&share));

        assert_eq!(
            hydrated.snapshot.left_video,
            Some(VideoSource::youtube_id("shared"))
        );
        assert_eq!(
            hydrated.snapshot.right_video,
            Some(VideoSource::youtube_id("kept"))
        );
        assert_eq!(hydrated.snapshot.markers.len(), 1);
        assert_eq!(hydrated.snapshot.markers[0].label, "1");
        assert_eq!(hydrated.start_time(Side::Left), Some(9.5));
        assert_eq!(hydrated.start_time(Side::Right), None);
    }

    #[test]
    fn without_share_link_storage_is_used_as_is() {
        let mut storage = MemoryStorage::default();
        save_markers(&mut storage, &[marker(3, "3", Some(12.5), None)]).unwrap();

        let (hydrated, warnings) = hydrate(&storage, None);
        assert!(warnings.is_empty());
        assert_eq!(hydrated.snapshot.markers[0].id, MarkerId(3));
        assert!(hydrated.left_start_time.is_none());
    }

    #[test]
    fn local_file_handle_is_stored_and_restored() {
        let mut storage = MemoryStorage::default();
        let local = VideoSource {
            kind: SourceKind::Local,
            url: "blob:race-ana/1".to_string(),
            title: Some("onboard.mp4".to_string()),
        };
        let handle = FileHandle::new("/videos/onboard.mp4");
        save_video(&mut storage, Side::Left, Some(&local), Some(&handle)).unwrap();
        save_video(
            &mut storage,
            Side::Right,
            Some(&VideoSource::youtube_id("abc")),
            Some(&handle),
        )
        .unwrap();

        assert_eq!(
            storage.get(LEFT_VIDEO).unwrap().as_deref(),
            Some(
                r#"{"type":"local","url":"blob:race-ana/1","title":"onboard.mp4","filePath":"/videos/onboard.mp4"}"#
            )
        );
        let (snapshot, warnings) = load_snapshot(&storage);
        assert!(warnings.is_empty());
        assert_eq!(snapshot.left_video, Some(local));
        assert_eq!(snapshot.handle(Side::Left), Some(&handle));
        assert_eq!(snapshot.handle(Side::Right), None);
    }

    #[test]
    fn shared_video_drops_the_stored_handle() {
        let mut storage = MemoryStorage::default();
        storage
            .set(
                LEFT_VIDEO,
                r#"{"type":"local","url":"blob:race-ana/4","filePath":"/videos/a.mp4"}"#,
            )
            .unwrap();
        let url = Url::parse("https://raceana.app/?left=shared").unwrap();

        let (hydrated, _) = hydrate(&storage, Some(&ShareParams::parse(&url)));
        assert_eq!(
            hydrated.snapshot.left_video,
            Some(VideoSource::youtube_id("shared"))
        );
        assert_eq!(hydrated.snapshot.handle(Side::Left), None);
    }
}
