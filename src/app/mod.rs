// SPDX-License-Identifier: MPL-2.0
//! Application root.
//!
//! [`Workspace`] owns every piece of mutable comparison state: both player
//! adapters (through the [`SyncCoordinator`]), the marker store, the session
//! storage and the long-press controller. It is the only writer. Background
//! timers and source probes talk to it through channels, and their messages
//! are applied by [`Workspace::drain_pending`] or [`Workspace::run_for`].

pub mod config;
pub mod logging;
pub mod paths;
pub mod session;
pub mod share;
pub mod sync;

pub use config::Config;
pub use share::{CopyOutcome, ShareOptions, ShareParams};
pub use sync::SyncCoordinator;

use crate::application::port::{ClipboardSink, PlayerEvent, SessionStorage};
use crate::diagnostics::{DiagnosticsCollector, UserAction};
use crate::domain::marker::{Marker, MarkerError, MarkerId, MarkerStore};
use crate::domain::video::{PlaybackRate, Side, SourceKind, VideoSource};
use crate::error::{Error, PlayerError, Result};
use crate::infrastructure::player::blob::is_blob_url;
use crate::infrastructure::player::{shared_registry, FileHandle, SharedBlobRegistry};
use crate::input::{
    shortcut_for, shortcuts_enabled, Direction, FocusTarget, Jump, LongPressAction,
    LongPressController, Shortcut,
};
use crate::player::{PlayerAdapter, ProbeOutcome, ProbeReport, SourceProbe, TimeUpdateCallback};
use session::Hydrated;
use std::path::{Path, PathBuf};
use std::sync::PoisonError;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use url::Url;

/// Session storage the workspace can own across tasks.
pub type BoxedStorage = Box<dyn SessionStorage + Send>;

fn side_index(side: Side) -> usize {
    match side {
        Side::Left => 0,
        Side::Right => 1,
    }
}

fn local_path(input: &str) -> PathBuf {
    PathBuf::from(input.strip_prefix("file://").unwrap_or(input))
}

/// The comparison workspace.
pub struct Workspace {
    config: Config,
    registry: SharedBlobRegistry,
    sync: SyncCoordinator,
    markers: MarkerStore,
    storage: BoxedStorage,
    long_press: LongPressController,
    long_press_rx: UnboundedReceiver<LongPressAction>,
    probes: [Option<SourceProbe>; 2],
    probe_tx: UnboundedSender<ProbeReport>,
    probe_rx: UnboundedReceiver<ProbeReport>,
    diagnostics: DiagnosticsCollector,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("sync", &self.sync)
            .field("markers", &self.markers)
            .finish_non_exhaustive()
    }
}

impl Workspace {
    /// Creates an empty workspace.
    #[must_use]
    pub fn new(config: Config, storage: BoxedStorage) -> Self {
        let registry = shared_registry();
        let mut sync = SyncCoordinator::new(registry.clone(), config.default_sync_mode());
        let rate = config.default_rate();
        for side in Side::BOTH {
            sync.set_playback_rate(side, rate);
        }
        let (long_press, long_press_rx) = LongPressController::new(config.long_press_timing());
        let (probe_tx, probe_rx) = unbounded_channel();
        Self {
            config,
            registry,
            sync,
            markers: MarkerStore::new(),
            storage,
            long_press,
            long_press_rx,
            probes: [None, None],
            probe_tx,
            probe_rx,
            diagnostics: DiagnosticsCollector::default(),
        }
    }

    /// Creates a workspace from the stored session, overridden by the
    /// parameters of `share_link` if given.
    ///
    /// Returns the workspace and the session keys skipped as malformed.
    /// Videos that fail to load keep their failed flag; they do not abort
    /// the restore.
    pub fn restore(
        config: Config,
        storage: BoxedStorage,
        share_link: Option<&Url>,
    ) -> (Self, Vec<String>) {
        let share = share_link.map(ShareParams::parse);
        let (hydrated, warnings) = session::hydrate(storage.as_ref(), share.as_ref());
        let mut workspace = Self::new(config, storage);
        if share.is_some() {
            workspace.diagnostics.log_action(UserAction::OpenShareLink);
        }
        workspace.apply_hydrated(hydrated);
        (workspace, warnings)
    }

    fn apply_hydrated(&mut self, hydrated: Hydrated) {
        let Hydrated {
            snapshot,
            left_start_time,
            right_start_time,
        } = hydrated;

        if let Some(sync_mode) = snapshot.sync_mode {
            self.sync.set_sync_mode(sync_mode);
        }
        self.markers = MarkerStore::from_markers(snapshot.markers);

        let sides = [
            (Side::Left, snapshot.left_video, snapshot.left_handle, left_start_time),
            (Side::Right, snapshot.right_video, snapshot.right_handle, right_start_time),
        ];
        for (side, video, handle, start) in sides {
            if let Some(video) = video {
                if let Err(err) = self.restore_source(side, video, handle) {
                    tracing::warn!(%side, error = %err, "restored video failed to load");
                }
            }
            if let Some(start) = start {
                self.sync.adapter_mut(side).set_start_time(start);
            }
        }

        if let Err(err) = self.persist_all() {
            tracing::warn!(error = %err, "failed to persist restored session");
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn sync(&self) -> &SyncCoordinator {
        &self.sync
    }

    #[must_use]
    pub fn adapter(&self, side: Side) -> &PlayerAdapter {
        self.sync.adapter(side)
    }

    #[must_use]
    pub fn current_time(&self, side: Side) -> f64 {
        self.sync.adapter(side).state().current_time
    }

    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        self.markers.markers()
    }

    #[must_use]
    pub fn marker_store(&self) -> &MarkerStore {
        &self.markers
    }

    #[must_use]
    pub fn diagnostics(&self) -> &DiagnosticsCollector {
        &self.diagnostics
    }

    #[must_use]
    pub fn registry(&self) -> &SharedBlobRegistry {
        &self.registry
    }

    /// Registers a callback fired on every position change of `side`.
    pub fn set_time_update_callback(&mut self, side: Side, callback: TimeUpdateCallback) {
        self.sync.adapter_mut(side).set_time_update_callback(callback);
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn persist_video(&mut self, side: Side) -> Result<()> {
        let adapter = self.sync.adapter(side);
        let source = adapter.source().cloned();
        let handle = adapter.file_handle().cloned();
        session::save_video(
            self.storage.as_mut(),
            side,
            source.as_ref(),
            handle.as_ref(),
        )
    }

    fn persist_markers(&mut self) -> Result<()> {
        session::save_markers(self.storage.as_mut(), self.markers.markers())
    }

    fn persist_sync_mode(&mut self) -> Result<()> {
        session::save_sync_mode(self.storage.as_mut(), self.sync.sync_mode())
    }

    fn persist_all(&mut self) -> Result<()> {
        for side in Side::BOTH {
            self.persist_video(side)?;
        }
        self.persist_markers()?;
        self.persist_sync_mode()
    }

    // =========================================================================
    // Sources
    // =========================================================================

    /// Loads a video from free-form input: a YouTube URL, a local path or
    /// `file://` URL, or an object URL from this workspace's registry.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::LoadFailed`] for blank input,
    /// [`PlayerError::UnsupportedFormat`] (with no state change) for a file
    /// type that is not accepted, or the load error of the player. A failed
    /// load still replaces the side's source and is persisted.
    pub fn load_video(&mut self, side: Side, input: &str) -> Result<()> {
        let source = VideoSource::from_input(input, side)
            .ok_or_else(|| PlayerError::LoadFailed("no video source given".to_string()))?;
        if source.kind == SourceKind::Local && !is_blob_url(&source.url) {
            return self.load_local_file(side, &local_path(&source.url));
        }
        self.load_source(side, source)
    }

    /// Loads a picked local file.
    ///
    /// # Errors
    ///
    /// See [`Workspace::load_video`].
    pub fn load_local_file(&mut self, side: Side, path: &Path) -> Result<()> {
        let result = self.sync.adapter_mut(side).load_local_file(path);
        if matches!(result, Err(PlayerError::UnsupportedFormat { .. })) {
            return result.map_err(Error::from);
        }
        self.after_source_change(side)?;
        result.map_err(Error::from)
    }

    fn load_source(&mut self, side: Side, source: VideoSource) -> Result<()> {
        let result = self.sync.adapter_mut(side).load(source, None);
        self.after_source_change(side)?;
        result.map_err(Error::from)
    }

    /// Loads a stored source. A local source whose retained file is still
    /// readable gets a fresh object URL from this workspace's registry;
    /// otherwise the stored URL is tried as is.
    fn restore_source(
        &mut self,
        side: Side,
        source: VideoSource,
        handle: Option<FileHandle>,
    ) -> Result<()> {
        let source = match &handle {
            Some(handle) if source.is_local() && handle.get_file().is_ok() => {
                let url = self
                    .registry
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .create_object_url(handle.path());
                tracing::debug!(%side, path = %handle.path().display(), "reopened retained file");
                VideoSource { url, ..source }
            }
            _ => source,
        };
        let result = self.sync.adapter_mut(side).load(source, handle);
        self.after_source_change(side)?;
        result.map_err(Error::from)
    }

    fn after_source_change(&mut self, side: Side) -> Result<()> {
        let Some(source) = self.sync.adapter(side).source().cloned() else {
            return Ok(());
        };
        self.diagnostics.log_action(UserAction::LoadVideo {
            side: side.to_string(),
            kind: match source.kind {
                SourceKind::Local => "local".to_string(),
                SourceKind::Youtube => "youtube".to_string(),
            },
        });

        self.probes[side_index(side)] = None;
        if source.is_local() && tokio::runtime::Handle::try_current().is_ok() {
            self.probes[side_index(side)] = Some(SourceProbe::spawn(
                side,
                source.url.clone(),
                self.registry.clone(),
                self.config.probe_interval(),
                self.probe_tx.clone(),
            ));
        }

        if side == Side::Left && self.markers.seed_defaults() {
            tracing::debug!("seeded default markers");
            self.persist_markers()?;
        }
        self.persist_video(side)
    }

    /// Feeds a player callback event (duration ready, progress, ...) to a side.
    pub fn handle_player_event(&mut self, side: Side, event: PlayerEvent) {
        self.sync.adapter_mut(side).handle_event(event);
    }

    // =========================================================================
    // Playback
    // =========================================================================

    /// Space: toggles global playback.
    pub fn global_play_pause(&mut self) -> bool {
        let playing = self.sync.global_play_pause();
        self.diagnostics
            .log_action(UserAction::ToggleGlobalPlayback { playing });
        playing
    }

    pub fn toggle_side(&mut self, side: Side) -> bool {
        let playing = self.sync.toggle_side(side);
        self.diagnostics.log_action(UserAction::ToggleSidePlayback {
            side: side.to_string(),
            playing,
        });
        playing
    }

    pub fn step_forward(&mut self) {
        self.sync.step_forward();
        self.diagnostics.log_action(UserAction::Step {
            side: None,
            forward: true,
        });
    }

    pub fn step_backward(&mut self) {
        self.sync.step_backward();
        self.diagnostics.log_action(UserAction::Step {
            side: None,
            forward: false,
        });
    }

    pub fn step_side(&mut self, side: Side, direction: Direction) -> f64 {
        let time = self.sync.step_side(side, direction);
        self.diagnostics.log_action(UserAction::Step {
            side: Some(side.to_string()),
            forward: direction == Direction::Forward,
        });
        time
    }

    /// Seeks one side to an absolute position.
    pub fn seek(&mut self, side: Side, time: f64) -> f64 {
        self.sync.adapter_mut(side).seek_to(time, false)
    }

    pub fn set_playback_rate(&mut self, side: Side, rate: PlaybackRate) {
        self.sync.set_playback_rate(side, rate);
    }

    /// Switches sync mode and persists it.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub fn set_sync_mode(&mut self, enabled: bool) -> Result<()> {
        self.sync.set_sync_mode(enabled);
        self.diagnostics
            .log_action(UserAction::SetSyncMode { enabled });
        self.persist_sync_mode()
    }

    // =========================================================================
    // Markers
    // =========================================================================

    /// Sets the marker labeled `label` to `side`'s current position.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub fn set_marker_at_current(&mut self, label: &str, side: Side) -> Result<MarkerId> {
        let time = self.current_time(side);
        self.set_marker(label, side, time)
    }

    /// Sets the marker labeled `label` to `time` on `side`.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerError::InvalidLabel`] or [`MarkerError::InvalidTime`]
    /// without touching the store, or an error if the session cannot be
    /// written.
    pub fn set_marker(&mut self, label: &str, side: Side, time: f64) -> Result<MarkerId> {
        let id = self.markers.add_or_update(time, label, side)?;
        self.diagnostics.log_action(UserAction::SetMarker {
            label: label.to_string(),
            side: side.to_string(),
            time_secs: time,
        });
        self.persist_markers()?;
        Ok(id)
    }

    /// Removes a marker.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerError::NotFound`] for an unknown id, or a storage error.
    pub fn delete_marker(&mut self, id: MarkerId) -> Result<Marker> {
        let removed = self.markers.delete(id).ok_or(MarkerError::NotFound(id))?;
        self.diagnostics
            .log_action(UserAction::DeleteMarker { id: id.0 });
        self.persist_markers()?;
        Ok(removed)
    }

    /// Overwrites a marker side-time from `m:ss` text.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerError::InvalidTimeText`] for malformed text (the
    /// marker is unchanged), [`MarkerError::NotFound`], or a storage error.
    pub fn edit_marker_time(&mut self, id: MarkerId, side: Side, text: &str) -> Result<f64> {
        let seconds = self.markers.edit_time(id, side, text)?;
        self.diagnostics.log_action(UserAction::EditMarker {
            id: id.0,
            side: side.to_string(),
        });
        self.persist_markers()?;
        Ok(seconds)
    }

    fn marker(&self, id: MarkerId) -> Result<Marker> {
        self.markers
            .get(id)
            .cloned()
            .ok_or_else(|| MarkerError::NotFound(id).into())
    }

    /// Seeks one side to a marker. Returns false if the marker has no time
    /// for that side.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerError::NotFound`] for an unknown id.
    pub fn jump_to_marker(&mut self, id: MarkerId, side: Side) -> Result<bool> {
        let marker = self.marker(id)?;
        self.diagnostics.log_action(UserAction::JumpToMarker {
            label: marker.label.clone(),
            side: Some(side.to_string()),
        });
        Ok(self.sync.jump_to_marker(&marker, side))
    }

    /// Seeks both sides to a marker and pauses global playback.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerError::NotFound`] for an unknown id.
    pub fn sync_jump_to_marker(&mut self, id: MarkerId) -> Result<()> {
        let marker = self.marker(id)?;
        self.diagnostics.log_action(UserAction::JumpToMarker {
            label: marker.label.clone(),
            side: None,
        });
        self.sync.sync_jump_to_marker(&marker);
        Ok(())
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    /// Handles a key-down. Returns true if the key triggered a shortcut
    /// (or was a held repeat of one).
    pub fn handle_key_down(&mut self, key: &str, focus: FocusTarget) -> bool {
        if !shortcuts_enabled(focus) {
            return false;
        }
        let Some(shortcut) = shortcut_for(key) else {
            return false;
        };
        match shortcut {
            Shortcut::Step { scope, direction } => {
                if let Some(action) = self.long_press.key_down(key, scope, direction) {
                    self.apply_long_press(&action);
                }
            }
            Shortcut::ToggleSide(side) => {
                self.toggle_side(side);
            }
            Shortcut::ToggleGlobal => {
                self.global_play_pause();
            }
            Shortcut::SetMarker(label) => {
                let side = self.sync.active_side();
                if let Err(err) = self.set_marker_at_current(&label, side) {
                    tracing::warn!(error = %err, "failed to persist marker");
                }
            }
        }
        true
    }

    /// Handles a key-up; releases any long-press on that key.
    pub fn handle_key_up(&mut self, key: &str) {
        self.long_press.key_up(key);
    }

    fn apply_long_press(&mut self, action: &LongPressAction) {
        if let Jump::Seconds(seconds) = action.jump {
            self.diagnostics.log_action(UserAction::LongPressSeek {
                key: action.key.clone(),
                seconds: action.direction.sign() * seconds,
            });
        } else {
            self.diagnostics.log_action(UserAction::Step {
                side: match action.scope {
                    crate::input::StepScope::Side(side) => Some(side.to_string()),
                    crate::input::StepScope::Both => None,
                },
                forward: action.direction == Direction::Forward,
            });
        }
        self.sync.apply_long_press(action);
    }

    // =========================================================================
    // Background messages
    // =========================================================================

    fn apply_probe_report(&mut self, report: ProbeReport) {
        let adapter = self.sync.adapter_mut(report.side);
        if adapter.source().map(|s| s.url.as_str()) != Some(report.url.as_str()) {
            return;
        }
        match adapter.apply_probe(report.reachable) {
            ProbeOutcome::Recovered => {
                self.diagnostics.log_action(UserAction::RecoverSource {
                    side: report.side.to_string(),
                });
                if let Err(err) = self.after_source_change(report.side) {
                    tracing::warn!(error = %err, "failed to persist recovered source");
                }
            }
            ProbeOutcome::NeedsReselect | ProbeOutcome::Reachable => {}
        }
    }

    /// Applies every queued long-press action and probe report, then pumps
    /// both players. Returns the number of messages applied.
    pub fn drain_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(action) = self.long_press_rx.try_recv() {
            self.apply_long_press(&action);
            applied += 1;
        }
        while let Ok(report) = self.probe_rx.try_recv() {
            self.apply_probe_report(report);
            applied += 1;
        }
        for side in Side::BOTH {
            self.sync.adapter_mut(side).pump();
        }
        applied
    }

    /// Applies background messages as they arrive for `duration`.
    pub async fn run_for(&mut self, duration: Duration) {
        let deadline = tokio::time::sleep(duration);
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                () = &mut deadline => break,
                Some(action) = self.long_press_rx.recv() => self.apply_long_press(&action),
                Some(report) = self.probe_rx.recv() => self.apply_probe_report(report),
            }
        }
        self.drain_pending();
    }

    // =========================================================================
    // Share & session
    // =========================================================================

    /// Builds the share link of the current state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configured base URL is invalid.
    pub fn share_url(&mut self, options: ShareOptions) -> Result<Url> {
        let base = self.config.share_base_url()?;
        let state = share::ShareState {
            left_video: self.sync.adapter(Side::Left).source(),
            right_video: self.sync.adapter(Side::Right).source(),
            markers: self.markers.markers(),
            left_time: self.current_time(Side::Left),
            right_time: self.current_time(Side::Right),
        };
        let url = share::build_share_url(&base, &state, options);
        self.diagnostics.log_action(UserAction::ShareLink {
            include_markers: options.include_markers,
            include_time: options.include_time,
        });
        Ok(url)
    }

    /// Share options from the `[share]` config section.
    #[must_use]
    pub fn default_share_options(&self) -> ShareOptions {
        ShareOptions {
            include_markers: self.config.share_include_markers(),
            include_time: self.config.share_include_time(),
        }
    }

    /// Builds the share link and copies it through the first working
    /// clipboard in `sinks`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configured base URL is invalid.
    pub fn copy_share_link(
        &mut self,
        options: ShareOptions,
        sinks: &mut [&mut dyn ClipboardSink],
    ) -> Result<CopyOutcome> {
        let url = self.share_url(options)?;
        Ok(share::copy_link(url.as_str(), sinks))
    }

    /// Clears the session: stored keys, both videos (revoking their object
    /// URLs), markers and playback flags. Returns the bare base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be cleared or the base URL is
    /// invalid.
    pub fn clear(&mut self) -> Result<Url> {
        session::clear(self.storage.as_mut())?;
        self.long_press.shutdown();
        self.probes = [None, None];
        self.markers = MarkerStore::new();
        self.sync
            .reset(self.config.default_sync_mode(), self.config.default_rate());
        self.diagnostics.log_action(UserAction::ClearSession);
        Ok(share::bare_url(&self.config.share_base_url()?))
    }

    /// Cancels every background timer and probe.
    pub fn shutdown(&mut self) {
        self.long_press.shutdown();
        self.probes = [None, None];
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        self.shutdown();
    }
}
