// SPDX-License-Identifier: MPL-2.0
//! Player backend port definition.
//!
//! This module defines the [`PlayerBackend`] trait: the capability interface
//! every embeddable player must satisfy so the adapter can drive a local
//! file and a YouTube embed through the same seek/step/rate contract.
//!
//! # Design Notes
//!
//! - Backends are selected by [`SourceKind`] tag, never by inheritance
//! - Commands are fire-and-forget; completion is observed through events
//! - Events are pulled with [`PlayerBackend::poll_events`] so the owner stays
//!   the single writer of playback state

use crate::domain::video::{PlaybackRate, SourceKind, VideoSource};
use crate::error::PlayerError;

/// Callback events emitted by a player backend.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Media is loaded and its duration is known.
    Ready { duration: f64 },
    /// Periodic position sample.
    Progress { played_seconds: f64 },
    /// Playback started.
    Play,
    /// Playback paused.
    Pause,
    /// Loading or playback failed.
    Error { message: String },
}

/// Port for embeddable video players.
///
/// # Lifecycle
///
/// 1. Create the backend for a source kind
/// 2. Call `load()` with the source
/// 3. Issue `play()`/`pause()`/`seek_to()` commands
/// 4. Drain `poll_events()` to observe readiness, progress and errors
pub trait PlayerBackend: Send {
    /// Which source kind this backend plays.
    fn kind(&self) -> SourceKind;

    /// Loads a source, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns a [`PlayerError`] if the source cannot be opened by this backend.
    fn load(&mut self, source: &VideoSource) -> Result<(), PlayerError>;

    /// Starts playback.
    fn play(&mut self);

    /// Pauses playback.
    fn pause(&mut self);

    /// Seeks to an absolute position in seconds.
    fn seek_to(&mut self, seconds: f64);

    /// Native playback position in seconds.
    fn current_time(&self) -> f64;

    /// Media duration in seconds (0 when unknown).
    fn duration(&self) -> f64;

    /// Changes the playback rate; takes effect on the player's next tick.
    fn set_playback_rate(&mut self, rate: PlaybackRate);

    /// Drains events produced since the last call.
    fn poll_events(&mut self) -> Vec<PlayerEvent>;
}
