// SPDX-License-Identifier: MPL-2.0
//! Fan-out of playback commands to one or both players.
//!
//! Only play/pause is gated by sync mode. Steps, seeks and marker jumps
//! always go where the command says, whatever the mode.

use crate::domain::marker::Marker;
use crate::domain::video::{PlaybackRate, Side};
use crate::infrastructure::player::SharedBlobRegistry;
use crate::input::{Direction, Jump, LongPressAction, StepScope};
use crate::player::PlayerAdapter;

/// Owns both side adapters and the global playback flags.
#[derive(Debug)]
pub struct SyncCoordinator {
    left: PlayerAdapter,
    right: PlayerAdapter,
    sync_mode: bool,
    is_playing: bool,
    active_side: Side,
    selected_marker: Option<String>,
}

impl SyncCoordinator {
    #[must_use]
    pub fn new(registry: SharedBlobRegistry, sync_mode: bool) -> Self {
        Self {
            left: PlayerAdapter::new(Side::Left, registry.clone()),
            right: PlayerAdapter::new(Side::Right, registry),
            sync_mode,
            is_playing: false,
            active_side: Side::Left,
            selected_marker: None,
        }
    }

    #[must_use]
    pub fn adapter(&self, side: Side) -> &PlayerAdapter {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn adapter_mut(&mut self, side: Side) -> &mut PlayerAdapter {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    #[must_use]
    pub fn sync_mode(&self) -> bool {
        self.sync_mode
    }

    /// Global playing flag.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Side that digit shortcuts apply to: the last side driven by a
    /// per-side command.
    #[must_use]
    pub fn active_side(&self) -> Side {
        self.active_side
    }

    pub fn set_active_side(&mut self, side: Side) {
        self.active_side = side;
    }

    #[must_use]
    pub fn selected_marker(&self) -> Option<&str> {
        self.selected_marker.as_deref()
    }

    /// Highlights a marker label. Purely informational.
    pub fn select_marker(&mut self, label: Option<String>) {
        self.selected_marker = label;
    }

    /// Switches sync mode. On a change both loaded sides are re-seeked to
    /// their own position so the players agree with the shown state.
    pub fn set_sync_mode(&mut self, enabled: bool) {
        if self.sync_mode == enabled {
            return;
        }
        tracing::debug!(enabled, "sync mode changed");
        self.sync_mode = enabled;
        for adapter in [&mut self.left, &mut self.right] {
            if adapter.is_loaded() {
                let time = adapter.state().current_time;
                adapter.seek_to(time, false);
            }
        }
    }

    /// Unloads both sides and returns every flag to its initial value.
    /// Registered time-update callbacks are kept.
    pub fn reset(&mut self, sync_mode: bool, rate: PlaybackRate) {
        for adapter in [&mut self.left, &mut self.right] {
            adapter.unload();
            adapter.set_playback_rate(rate);
        }
        self.sync_mode = sync_mode;
        self.is_playing = false;
        self.active_side = Side::Left;
        self.selected_marker = None;
    }

    /// Flips the global playing flag; in sync mode both sides follow it.
    /// Returns the new flag.
    pub fn global_play_pause(&mut self) -> bool {
        self.is_playing = !self.is_playing;
        if self.sync_mode {
            let playing = self.is_playing;
            self.left.set_playing(playing);
            self.right.set_playing(playing);
        }
        self.is_playing
    }

    /// Flips one side's playing flag, leaving the global flag alone.
    /// Returns the side's new flag.
    pub fn toggle_side(&mut self, side: Side) -> bool {
        self.active_side = side;
        let adapter = self.adapter_mut(side);
        let playing = !adapter.state().is_playing;
        adapter.set_playing(playing);
        playing
    }

    /// Steps both sides one frame forward and clears the global playing flag.
    pub fn step_forward(&mut self) {
        self.left.step_forward();
        self.right.step_forward();
        self.is_playing = false;
    }

    /// Steps both sides one frame backward and clears the global playing flag.
    pub fn step_backward(&mut self) {
        self.left.step_backward();
        self.right.step_backward();
        self.is_playing = false;
    }

    /// Steps one side a frame and pauses that side.
    pub fn step_side(&mut self, side: Side, direction: Direction) -> f64 {
        self.active_side = side;
        let adapter = self.adapter_mut(side);
        let time = match direction {
            Direction::Forward => adapter.step_forward(),
            Direction::Backward => adapter.step_backward(),
        };
        adapter.set_playing(false);
        time
    }

    /// Seeks by `seconds` relative to the current position.
    pub fn seek_relative(&mut self, scope: StepScope, seconds: f64) {
        match scope {
            StepScope::Side(side) => {
                self.active_side = side;
                self.adapter_mut(side).seek_to(seconds, true);
            }
            StepScope::Both => {
                self.left.seek_to(seconds, true);
                self.right.seek_to(seconds, true);
            }
        }
    }

    /// Seeks each side that has a time in `marker`, then pauses global
    /// playback.
    pub fn sync_jump_to_marker(&mut self, marker: &Marker) {
        for side in Side::BOTH {
            if let Some(time) = marker.time(side) {
                self.adapter_mut(side).seek_to(time, false);
            }
        }
        self.is_playing = false;
        self.selected_marker = Some(marker.label.clone());
    }

    /// Seeks one side to its marker time and pauses that side. No-op if the
    /// marker has no time for `side`.
    pub fn jump_to_marker(&mut self, marker: &Marker, side: Side) -> bool {
        let Some(time) = marker.time(side) else {
            return false;
        };
        self.active_side = side;
        let adapter = self.adapter_mut(side);
        adapter.seek_to(time, false);
        adapter.set_playing(false);
        self.selected_marker = Some(marker.label.clone());
        true
    }

    pub fn set_playback_rate(&mut self, side: Side, rate: PlaybackRate) {
        self.adapter_mut(side).set_playback_rate(rate);
    }

    /// Applies an action produced by the long-press controller.
    pub fn apply_long_press(&mut self, action: &LongPressAction) {
        match (action.jump, action.scope) {
            (Jump::Frame, StepScope::Side(side)) => {
                self.step_side(side, action.direction);
            }
            (Jump::Frame, StepScope::Both) => match action.direction {
                Direction::Forward => self.step_forward(),
                Direction::Backward => self.step_backward(),
            },
            (Jump::Seconds(seconds), scope) => {
                self.seek_relative(scope, action.direction.sign() * seconds);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::PlayerEvent;
    use crate::domain::marker::MarkerId;
    use crate::domain::video::VideoSource;
    use crate::infrastructure::player::shared_registry;
    use crate::input::Trigger;
    use crate::test_utils::assert_abs_diff_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn loaded(sync_mode: bool) -> SyncCoordinator {
        let mut sync = SyncCoordinator::new(shared_registry(), sync_mode);
        for (side, id) in [(Side::Left, "aaa"), (Side::Right, "bbb")] {
            let adapter = sync.adapter_mut(side);
            adapter.load(VideoSource::youtube_id(id), None).unwrap();
            adapter.handle_event(PlayerEvent::Ready { duration: 120.0 });
        }
        sync
    }

    fn marker(left: Option<f64>, right: Option<f64>) -> Marker {
        Marker {
            id: MarkerId(1),
            label: "3".into(),
            left_time: left,
            right_time: right,
        }
    }

    fn time(sync: &SyncCoordinator, side: Side) -> f64 {
        sync.adapter(side).state().current_time
    }

    fn playing(sync: &SyncCoordinator, side: Side) -> bool {
        sync.adapter(side).state().is_playing
    }

    #[test]
    fn space_in_sync_mode_drives_both_sides() {
        let mut sync = loaded(true);
        sync.toggle_side(Side::Left);
        assert!(playing(&sync, Side::Left));

        assert!(sync.global_play_pause());
        assert!(playing(&sync, Side::Left) && playing(&sync, Side::Right));

        assert!(!sync.global_play_pause());
        assert!(!playing(&sync, Side::Left) && !playing(&sync, Side::Right));
    }

    #[test]
    fn space_without_sync_mode_leaves_sides_alone() {
        let mut sync = loaded(false);
        sync.toggle_side(Side::Right);

        assert!(sync.global_play_pause());
        assert!(!playing(&sync, Side::Left));
        assert!(playing(&sync, Side::Right));
    }

    #[test]
    fn side_toggle_does_not_touch_global_flag() {
        let mut sync = loaded(true);
        assert!(sync.toggle_side(Side::Left));
        assert!(!sync.is_playing());
        assert_eq!(sync.active_side(), Side::Left);
    }

    #[test]
    fn global_step_moves_both_and_pauses_globally() {
        let mut sync = loaded(false);
        sync.adapter_mut(Side::Left).seek_to(10.0, false);
        sync.global_play_pause();

        sync.step_forward();
        assert_abs_diff_eq!(time(&sync, Side::Left), 10.0 + 1.0 / 30.0);
        assert_abs_diff_eq!(time(&sync, Side::Right), 1.0 / 30.0);
        assert!(!sync.is_playing());
    }

    #[test]
    fn side_step_pauses_that_side_only() {
        let mut sync = loaded(true);
        sync.global_play_pause();

        sync.step_side(Side::Right, Direction::Backward);
        assert!(!playing(&sync, Side::Right));
        assert!(playing(&sync, Side::Left));
        assert_eq!(sync.active_side(), Side::Right);
    }

    #[test]
    fn sync_jump_seeks_only_defined_sides() {
        let mut sync = loaded(true);
        sync.adapter_mut(Side::Right).seek_to(50.0, false);
        sync.global_play_pause();

        sync.sync_jump_to_marker(&marker(Some(12.5), None));
        assert_abs_diff_eq!(time(&sync, Side::Left), 12.5);
        assert_abs_diff_eq!(time(&sync, Side::Right), 50.0);
        assert!(!sync.is_playing());
        assert_eq!(sync.selected_marker(), Some("3"));
    }

    #[test]
    fn side_jump_without_time_is_noop() {
        let mut sync = loaded(true);
        sync.adapter_mut(Side::Left).seek_to(7.0, false);

        assert!(!sync.jump_to_marker(&marker(None, Some(3.0)), Side::Left));
        assert_abs_diff_eq!(time(&sync, Side::Left), 7.0);

        sync.toggle_side(Side::Right);
        assert!(sync.jump_to_marker(&marker(None, Some(3.0)), Side::Right));
        assert_abs_diff_eq!(time(&sync, Side::Right), 3.0);
        assert!(!playing(&sync, Side::Right));
    }

    #[test]
    fn long_press_seconds_seek_relative() {
        let mut sync = loaded(true);
        sync.adapter_mut(Side::Left).seek_to(20.0, false);
        let action = LongPressAction {
            key: "a".into(),
            scope: StepScope::Side(Side::Left),
            direction: Direction::Backward,
            jump: Jump::Seconds(5.0),
            trigger: Trigger::Repeat,
        };

        sync.apply_long_press(&action);
        assert_abs_diff_eq!(time(&sync, Side::Left), 15.0);
        assert_abs_diff_eq!(time(&sync, Side::Right), 0.0);
    }

    #[test]
    fn long_press_arrow_frame_steps_both() {
        let mut sync = loaded(true);
        let action = LongPressAction {
            key: "arrowright".into(),
            scope: StepScope::Both,
            direction: Direction::Forward,
            jump: Jump::Frame,
            trigger: Trigger::Stage(0),
        };

        sync.apply_long_press(&action);
        assert_abs_diff_eq!(time(&sync, Side::Left), 1.0 / 30.0);
        assert_abs_diff_eq!(time(&sync, Side::Right), 1.0 / 30.0);
    }

    fn counting(sync: &mut SyncCoordinator, side: Side) -> Arc<AtomicUsize> {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        sync.adapter_mut(side)
            .set_time_update_callback(Box::new(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        calls
    }

    #[test]
    fn changing_sync_mode_reseeks_loaded_sides() {
        let mut sync = loaded(true);
        sync.adapter_mut(Side::Left).seek_to(12.0, false);
        let left = counting(&mut sync, Side::Left);
        let right = counting(&mut sync, Side::Right);

        sync.set_sync_mode(true);
        assert_eq!(left.load(Ordering::SeqCst), 0);

        sync.set_sync_mode(false);
        assert_eq!(left.load(Ordering::SeqCst), 1);
        assert_eq!(right.load(Ordering::SeqCst), 1);
        assert_abs_diff_eq!(time(&sync, Side::Left), 12.0);
        assert_abs_diff_eq!(time(&sync, Side::Right), 0.0);
    }

    #[test]
    fn reset_keeps_callbacks_and_clears_flags() {
        let mut sync = loaded(false);
        let calls = counting(&mut sync, Side::Right);
        sync.toggle_side(Side::Right);
        sync.global_play_pause();
        sync.select_marker(Some("2".into()));

        sync.reset(true, PlaybackRate::new(0.5));
        assert!(sync.sync_mode());
        assert!(!sync.is_playing());
        assert_eq!(sync.active_side(), Side::Left);
        assert_eq!(sync.selected_marker(), None);
        assert!(!sync.adapter(Side::Right).is_loaded());
        assert_abs_diff_eq!(
            sync.adapter(Side::Right).state().playback_rate.value(),
            0.5
        );

        let adapter = sync.adapter_mut(Side::Right);
        adapter.load(VideoSource::youtube_id("ccc"), None).unwrap();
        adapter.handle_event(PlayerEvent::Ready { duration: 60.0 });
        let before = calls.load(Ordering::SeqCst);
        adapter.seek_to(3.0, false);
        assert!(calls.load(Ordering::SeqCst) > before);
    }
}
