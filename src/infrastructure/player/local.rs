// SPDX-License-Identifier: MPL-2.0
//! Local file player backend.
//!
//! Decoding is out of scope for this crate: the backend resolves and
//! validates the file, mirrors commanded transport state, and reports load
//! failures. The host feeds it real durations and progress samples through
//! the adapter.

use super::blob::{resolve_local, SharedBlobRegistry};
use crate::application::port::{PlayerBackend, PlayerEvent};
use crate::domain::video::source::is_accepted_video_file;
use crate::domain::video::{PlaybackRate, SourceKind, VideoSource};
use crate::error::PlayerError;
use std::path::PathBuf;

/// Backend for files picked from disk.
#[derive(Debug)]
pub struct LocalFileBackend {
    registry: SharedBlobRegistry,
    path: Option<PathBuf>,
    position: f64,
    duration: f64,
    playing: bool,
    rate: PlaybackRate,
    events: Vec<PlayerEvent>,
}

impl LocalFileBackend {
    #[must_use]
    pub fn new(registry: SharedBlobRegistry) -> Self {
        Self {
            registry,
            path: None,
            position: 0.0,
            duration: 0.0,
            playing: false,
            rate: PlaybackRate::default(),
            events: Vec::new(),
        }
    }

    /// File currently loaded, if any.
    #[must_use]
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Current playback rate.
    #[must_use]
    pub fn rate(&self) -> PlaybackRate {
        self.rate
    }

    fn fail(&mut self, err: PlayerError) -> Result<(), PlayerError> {
        self.events.push(PlayerEvent::Error {
            message: err.to_string(),
        });
        Err(err)
    }
}

impl PlayerBackend for LocalFileBackend {
    fn kind(&self) -> SourceKind {
        SourceKind::Local
    }

    fn load(&mut self, source: &VideoSource) -> Result<(), PlayerError> {
        self.path = None;
        self.position = 0.0;
        self.duration = 0.0;
        self.playing = false;

        let Some(path) = resolve_local(&self.registry, &source.url) else {
            return self.fail(PlayerError::SourceUnavailable(source.url.clone()));
        };
        if !is_accepted_video_file(&path) {
            return self.fail(PlayerError::UnsupportedFormat {
                file: path.display().to_string(),
            });
        }
        if !path.is_file() {
            return self.fail(PlayerError::SourceUnavailable(source.url.clone()));
        }

        tracing::debug!(path = %path.display(), "local source loaded");
        self.path = Some(path);
        Ok(())
    }

    fn play(&mut self) {
        if self.path.is_some() && !self.playing {
            self.playing = true;
            self.events.push(PlayerEvent::Play);
        }
    }

    fn pause(&mut self) {
        if self.playing {
            self.playing = false;
            self.events.push(PlayerEvent::Pause);
        }
    }

    fn seek_to(&mut self, seconds: f64) {
        self.position = seconds;
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn set_playback_rate(&mut self, rate: PlaybackRate) {
        self.rate = rate;
    }

    fn poll_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.events)
    }
}
