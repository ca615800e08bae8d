// SPDX-License-Identifier: MPL-2.0
//! Video playback newtypes.
//!
//! This module provides type-safe wrappers for video playback values,
//! ensuring they are always within valid ranges.

// =============================================================================
// Frame stepping
// =============================================================================

/// Nominal frame timing used for frame stepping.
///
/// Stepping assumes 30 fps regardless of the real source frame rate, so a
/// "frame" step is an approximation rather than a frame-accurate seek.
pub mod frame_bounds {
    /// Nominal frames per second.
    pub const NOMINAL_FPS: f64 = 30.0;
    /// Duration of one nominal frame in seconds.
    pub const FRAME_DURATION_SECS: f64 = 1.0 / NOMINAL_FPS;
}

// =============================================================================
// PlaybackRate
// =============================================================================

/// Playback rate presets offered by both player kinds.
pub mod rate_presets {
    /// The enumerated set of supported rates, ascending.
    pub const PRESETS: &[f64] = &[0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 2.0];
    /// Default playback rate (1.0 = normal speed).
    pub const DEFAULT: f64 = 1.0;
}

/// Playback rate, guaranteed to be one of [`rate_presets::PRESETS`].
///
/// Arbitrary values are snapped to the nearest preset, so a rate forwarded to
/// a player backend is always one the embed libraries accept.
///
/// # Example
///
/// ```
/// use race_ana::domain::video::PlaybackRate;
///
/// assert_eq!(PlaybackRate::new(1.5).value(), 1.5);
/// assert_eq!(PlaybackRate::new(1.6).value(), 1.5);
/// assert_eq!(PlaybackRate::new(100.0).value(), 2.0);
/// assert!(PlaybackRate::try_new(1.1).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackRate(f64);

impl PlaybackRate {
    /// Creates a playback rate, snapping to the nearest preset.
    #[must_use]
    pub fn new(rate: f64) -> Self {
        let nearest = rate_presets::PRESETS
            .iter()
            .copied()
            .min_by(|a, b| (a - rate).abs().total_cmp(&(b - rate).abs()))
            .unwrap_or(rate_presets::DEFAULT);
        Self(nearest)
    }

    /// Creates a playback rate only if `rate` is exactly one of the presets.
    #[must_use]
    pub fn try_new(rate: f64) -> Option<Self> {
        rate_presets::PRESETS
            .iter()
            .find(|&&preset| (preset - rate).abs() < 0.001)
            .map(|&preset| Self(preset))
    }

    /// Returns the rate value as f64.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns the next faster preset, or self if already at the fastest.
    #[must_use]
    pub fn faster(self) -> Self {
        let next = rate_presets::PRESETS
            .iter()
            .find(|&&s| s > self.0 + 0.001)
            .copied()
            .unwrap_or(self.0);
        Self(next)
    }

    /// Returns the next slower preset, or self if already at the slowest.
    #[must_use]
    pub fn slower(self) -> Self {
        let prev = rate_presets::PRESETS
            .iter()
            .rev()
            .find(|&&s| s < self.0 - 0.001)
            .copied()
            .unwrap_or(self.0);
        Self(prev)
    }
}

impl Default for PlaybackRate {
    fn default() -> Self {
        Self(rate_presets::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_snaps_to_nearest_preset() {
        assert!((PlaybackRate::new(0.3).value() - 0.25).abs() < 0.001);
        assert!((PlaybackRate::new(0.9).value() - 1.0).abs() < 0.001);
        assert!((PlaybackRate::new(-4.0).value() - 0.25).abs() < 0.001);
        assert!((PlaybackRate::new(16.0).value() - 2.0).abs() < 0.001);
    }

    #[test]
    fn try_new_accepts_only_presets() {
        for &preset in rate_presets::PRESETS {
            assert!(PlaybackRate::try_new(preset).is_some());
        }
        assert!(PlaybackRate::try_new(3.0).is_none());
        assert!(PlaybackRate::try_new(0.33).is_none());
    }

    #[test]
    fn default_is_normal_speed() {
        assert!((PlaybackRate::default().value() - 1.0).abs() < 0.001);
    }

    #[test]
    fn faster_and_slower_walk_presets() {
        let rate = PlaybackRate::default();
        assert!((rate.faster().value() - 1.25).abs() < 0.001);
        assert!((rate.slower().value() - 0.75).abs() < 0.001);
    }

    #[test]
    fn faster_and_slower_saturate() {
        let max = PlaybackRate::new(2.0);
        assert_eq!(max.faster(), max);

        let min = PlaybackRate::new(0.25);
        assert_eq!(min.slower(), min);
    }

    #[test]
    fn frame_duration_matches_nominal_fps() {
        assert!((frame_bounds::FRAME_DURATION_SECS * frame_bounds::NOMINAL_FPS - 1.0).abs() < 1e-12);
    }
}
