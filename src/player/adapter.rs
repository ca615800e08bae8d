// SPDX-License-Identifier: MPL-2.0
//! Per-side player adapter.
//!
//! The adapter is the uniform seek/step/rate surface over whichever backend
//! plays the side's source. It owns the side's [`PlaybackState`] mirror and
//! reports every position change through the time-update callback.

use crate::application::port::{PlayerBackend, PlayerEvent};
use crate::domain::video::{PlaybackRate, PlaybackState, Side, SourceKind, VideoSource};
use crate::domain::video::source::is_accepted_video_file;
use crate::error::PlayerError;
use crate::infrastructure::player::blob::{is_blob_url, SharedBlobRegistry};
use crate::infrastructure::player::{backend_for, FileHandle};
use std::path::Path;
use std::sync::PoisonError;

/// Callback invoked with the side and its new position after seeks, steps
/// and progress samples.
pub type TimeUpdateCallback = Box<dyn FnMut(Side, f64) + Send>;

/// Outcome of a reachability check on a local source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Source is readable; nothing to do.
    Reachable,
    /// Source went stale and was re-acquired from the retained file handle.
    Recovered,
    /// Source went stale and the user has to pick it again.
    NeedsReselect,
}

/// Uniform control surface for one side's player.
pub struct PlayerAdapter {
    side: Side,
    registry: SharedBlobRegistry,
    backend: Option<Box<dyn PlayerBackend>>,
    source: Option<VideoSource>,
    file_handle: Option<FileHandle>,
    state: PlaybackState,
    error: Option<PlayerError>,
    needs_reselect: bool,
    pending_start: Option<f64>,
    on_time_update: Option<TimeUpdateCallback>,
}

impl std::fmt::Debug for PlayerAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerAdapter")
            .field("side", &self.side)
            .field("source", &self.source)
            .field("state", &self.state)
            .field("error", &self.error)
            .field("needs_reselect", &self.needs_reselect)
            .finish_non_exhaustive()
    }
}

impl PlayerAdapter {
    #[must_use]
    pub fn new(side: Side, registry: SharedBlobRegistry) -> Self {
        Self {
            side,
            registry,
            backend: None,
            source: None,
            file_handle: None,
            state: PlaybackState::default(),
            error: None,
            needs_reselect: false,
            pending_start: None,
            on_time_update: None,
        }
    }

    /// Registers the time-update callback, replacing any previous one.
    pub fn set_time_update_callback(&mut self, callback: TimeUpdateCallback) {
        self.on_time_update = Some(callback);
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    #[must_use]
    pub fn source(&self) -> Option<&VideoSource> {
        self.source.as_ref()
    }

    /// True once a backend accepted the current source.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.backend.is_some()
    }

    /// True if the player reported a load or playback error.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    #[must_use]
    pub fn error(&self) -> Option<&PlayerError> {
        self.error.as_ref()
    }

    /// True if the local source went stale and could not be recovered.
    #[must_use]
    pub fn needs_reselect(&self) -> bool {
        self.needs_reselect
    }

    #[must_use]
    pub fn file_handle(&self) -> Option<&FileHandle> {
        self.file_handle.as_ref()
    }

    /// Loads a source, replacing the current one.
    ///
    /// The previous source's object URL is revoked. A failing load keeps the
    /// new source (so the UI can show what failed) and sets the failed flag;
    /// there is no automatic retry.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`PlayerError`] if the source cannot be opened.
    pub fn load(
        &mut self,
        source: VideoSource,
        file_handle: Option<FileHandle>,
    ) -> Result<(), PlayerError> {
        if self.source.as_ref().map(|s| s.url.as_str()) != Some(source.url.as_str()) {
            self.release_blob();
        }
        self.backend = None;
        self.state = PlaybackState {
            playback_rate: self.state.playback_rate,
            ..PlaybackState::default()
        };
        self.error = None;
        self.needs_reselect = false;
        self.pending_start = None;
        self.file_handle = file_handle;

        let mut backend = backend_for(source.kind, &self.registry);
        let result = backend.load(&source);
        self.source = Some(source);

        match result {
            Ok(()) => {
                backend.set_playback_rate(self.state.playback_rate);
                self.backend = Some(backend);
                self.pump();
                Ok(())
            }
            Err(err) => {
                tracing::warn!(side = %self.side, error = %err, "video failed to load");
                self.needs_reselect = err.needs_reselect();
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Picks a local file: validates the extension, registers an object URL
    /// and loads it with a retained handle for later recovery.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::UnsupportedFormat`] without any state change if
    /// the file type is not accepted, or the load error otherwise.
    pub fn load_local_file(&mut self, path: &Path) -> Result<(), PlayerError> {
        if !is_accepted_video_file(path) {
            return Err(PlayerError::UnsupportedFormat {
                file: path.display().to_string(),
            });
        }

        let url = self
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .create_object_url(path);
        let title = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string());
        let source = VideoSource {
            kind: SourceKind::Local,
            url,
            title,
        };
        self.load(source, Some(FileHandle::new(path)))
    }

    /// Drops the current source and revokes its object URL.
    pub fn unload(&mut self) {
        self.release_blob();
        self.backend = None;
        self.source = None;
        self.file_handle = None;
        self.error = None;
        self.needs_reselect = false;
        self.pending_start = None;
        self.state = PlaybackState::default();
    }

    fn release_blob(&mut self) {
        if let Some(source) = &self.source {
            if source.is_local() && is_blob_url(&source.url) {
                self.registry
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .revoke(&source.url);
            }
        }
    }

    fn notify(&mut self) {
        let time = self.state.current_time;
        if let Some(callback) = self.on_time_update.as_mut() {
            callback(self.side, time);
        }
    }

    /// Seeks to `time`, or by `time` relative to the current position.
    ///
    /// The target is clamped to `[0, duration]`. Returns the position after
    /// the seek; without a loaded backend this is a no-op.
    pub fn seek_to(&mut self, time: f64, relative: bool) -> f64 {
        let Some(backend) = self.backend.as_mut() else {
            return self.state.current_time;
        };
        let target = self.state.seek_target(time, relative);
        backend.seek_to(target);
        self.state.current_time = target;
        self.notify();
        target
    }

    /// Steps one nominal frame (1/30 s) forward.
    pub fn step_forward(&mut self) -> f64 {
        let target = self.state.frame_forward_target();
        self.seek_to(target, false)
    }

    /// Steps one nominal frame (1/30 s) backward.
    pub fn step_backward(&mut self) -> f64 {
        let target = self.state.frame_backward_target();
        self.seek_to(target, false)
    }

    /// Forwards a playback rate to the player.
    pub fn set_playback_rate(&mut self, rate: PlaybackRate) {
        self.state.playback_rate = rate;
        if let Some(backend) = self.backend.as_mut() {
            backend.set_playback_rate(rate);
        }
    }

    /// Commands play or pause and mirrors the flag.
    pub fn set_playing(&mut self, playing: bool) {
        self.state.is_playing = playing;
        if let Some(backend) = self.backend.as_mut() {
            if playing {
                backend.play();
            } else {
                backend.pause();
            }
        }
        self.pump();
    }

    /// Requests a start position, applied as soon as the duration is known.
    pub fn set_start_time(&mut self, time: f64) {
        if self.state.duration > 0.0 {
            self.seek_to(time, false);
        } else {
            self.pending_start = Some(time);
        }
    }

    /// Applies a player callback event.
    pub fn handle_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::Ready { duration } => {
                self.state.set_duration(duration);
                if let Some(start) = self.pending_start.take() {
                    self.seek_to(start, false);
                }
            }
            PlayerEvent::Progress { played_seconds } => {
                self.state.record_sample(played_seconds);
                self.notify();
            }
            PlayerEvent::Play => self.state.is_playing = true,
            PlayerEvent::Pause => self.state.is_playing = false,
            PlayerEvent::Error { message } => {
                tracing::warn!(side = %self.side, %message, "player reported an error");
                self.error = Some(PlayerError::LoadFailed(message));
            }
        }
    }

    /// Drains and applies events the backend produced on its own.
    pub fn pump(&mut self) {
        let events = self
            .backend
            .as_mut()
            .map(|backend| backend.poll_events())
            .unwrap_or_default();
        for event in events {
            self.handle_event(event);
        }
    }

    /// Reacts to a reachability probe of the current local source.
    ///
    /// An unreachable source is re-acquired from the retained file handle
    /// when possible (new object URL, same position); otherwise the side is
    /// flagged as needing reselection.
    pub fn apply_probe(&mut self, reachable: bool) -> ProbeOutcome {
        if reachable {
            return ProbeOutcome::Reachable;
        }
        let Some(source) = self.source.clone() else {
            return ProbeOutcome::Reachable;
        };
        if !source.is_local() {
            return ProbeOutcome::Reachable;
        }

        if let Some(handle) = self.file_handle.clone() {
            if handle.get_file().is_ok() {
                let resume_at = self.state.current_time;
                let duration = self.state.duration;
                let url = self
                    .registry
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .create_object_url(handle.path());
                let recovered = VideoSource { url, ..source };
                if self.load(recovered, Some(handle)).is_ok() {
                    tracing::info!(side = %self.side, "stale local source recovered from file handle");
                    if duration > 0.0 {
                        self.state.set_duration(duration);
                        self.seek_to(resume_at, false);
                    } else {
                        self.pending_start = Some(resume_at);
                    }
                    return ProbeOutcome::Recovered;
                }
            }
        }

        tracing::warn!(side = %self.side, "local source is stale and needs reselection");
        self.needs_reselect = true;
        ProbeOutcome::NeedsReselect
    }
}
