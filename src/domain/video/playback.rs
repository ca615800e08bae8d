// SPDX-License-Identifier: MPL-2.0
//! Per-side playback time model.
//!
//! `current_time` is the last position sample reported by the player (or the
//! last commanded seek target). It is never advanced locally, which keeps it
//! from drifting away from the player's native clock.

use super::newtypes::{frame_bounds, PlaybackRate};

/// Playback state of one video slot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackState {
    /// Whether this side is currently playing.
    pub is_playing: bool,
    /// Last known position in seconds.
    pub current_time: f64,
    /// Media duration in seconds (0 until the player reports it).
    pub duration: f64,
    /// Current playback rate.
    pub playback_rate: PlaybackRate,
}

impl PlaybackState {
    /// Clamps a time to `[0, duration]`.
    ///
    /// Non-finite targets collapse to 0.
    #[must_use]
    pub fn clamp(&self, time: f64) -> f64 {
        if !time.is_finite() {
            return 0.0;
        }
        time.clamp(0.0, self.duration.max(0.0))
    }

    /// Resolves a seek target, optionally relative to the current time,
    /// clamped to the media bounds.
    #[must_use]
    pub fn seek_target(&self, time: f64, relative: bool) -> f64 {
        let target = if relative {
            self.current_time + time
        } else {
            time
        };
        self.clamp(target)
    }

    /// Target of a single nominal frame step forward.
    #[must_use]
    pub fn frame_forward_target(&self) -> f64 {
        self.clamp(self.current_time + frame_bounds::FRAME_DURATION_SECS)
    }

    /// Target of a single nominal frame step backward.
    #[must_use]
    pub fn frame_backward_target(&self) -> f64 {
        self.clamp(self.current_time - frame_bounds::FRAME_DURATION_SECS)
    }

    /// Records a progress sample from the player.
    pub fn record_sample(&mut self, played_seconds: f64) {
        if played_seconds.is_finite() {
            self.current_time = played_seconds.max(0.0);
        }
    }

    /// Records the media duration once the player knows it.
    ///
    /// The current time is re-clamped so it never exceeds a shorter duration.
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = if duration.is_finite() {
            duration.max(0.0)
        } else {
            0.0
        };
        self.current_time = self.clamp(self.current_time);
    }

    /// Returns the position as a fraction of the duration (0.0 when unknown).
    #[must_use]
    pub fn progress_fraction(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
