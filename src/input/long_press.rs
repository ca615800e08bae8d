// SPDX-License-Identifier: MPL-2.0
//! Graduated long-press seeking.
//!
//! Pressing a step key emits one frame step immediately. Holding it escalates
//! through four staged jumps, then repeats 5 s jumps until the key is
//! released:
//!
//! | Offset (default) | Jump |
//! |------------------|------|
//! | 0 ms (press) | 1 frame |
//! | 500 ms | 1 frame |
//! | 1000 ms | 1 frame |
//! | 1500 ms | 2 s |
//! | 2000 ms | 5 s, then 5 s every 1000 ms |
//!
//! Timers are tokio tasks. They never touch playback state: each one checks
//! that the press that spawned it is still the held one and sends a
//! [`LongPressAction`] to the owner, which applies it. Releasing the key aborts its timers; dropping the
//! controller aborts all of them.

use super::keymap::{normalize_key, Direction, StepScope};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};

/// Size of one jump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Jump {
    /// One nominal frame (1/30 s).
    Frame,
    /// A relative seek by this many seconds.
    Seconds(f64),
}

/// Stage layout of a held key.
pub mod stage_table {
    use super::Jump;

    /// Number of one-shot stages after the initial press.
    pub const STAGE_COUNT: usize = 4;

    /// Jump emitted by each stage, in firing order.
    pub const STAGE_JUMPS: [Jump; STAGE_COUNT] = [
        Jump::Frame,
        Jump::Frame,
        Jump::Seconds(2.0),
        Jump::Seconds(5.0),
    ];

    /// Jump emitted by every repeat tick after the last stage.
    pub const REPEAT_JUMP: Jump = Jump::Seconds(5.0);
}

use stage_table::{REPEAT_JUMP, STAGE_COUNT, STAGE_JUMPS};

/// What produced an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Press,
    /// One-shot stage, `0..STAGE_COUNT`.
    Stage(u8),
    Repeat,
}

/// A jump requested by a pressed or held key.
#[derive(Debug, Clone, PartialEq)]
pub struct LongPressAction {
    pub key: String,
    pub scope: StepScope,
    pub direction: Direction,
    pub jump: Jump,
    pub trigger: Trigger,
}

/// Stage spacing and repeat interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongPressTiming {
    stage_spacing: Duration,
    repeat_interval: Duration,
}

impl LongPressTiming {
    #[must_use]
    pub fn new(stage_spacing: Duration, repeat_interval: Duration) -> Self {
        Self {
            stage_spacing,
            repeat_interval,
        }
    }

    /// Offsets from the press at which each stage fires.
    #[must_use]
    pub fn stage_offsets(&self) -> [Duration; STAGE_COUNT] {
        std::array::from_fn(|i| self.stage_spacing * (i as u32 + 1))
    }

    #[must_use]
    pub fn repeat_interval(&self) -> Duration {
        self.repeat_interval
    }
}

impl Default for LongPressTiming {
    fn default() -> Self {
        Self::new(Duration::from_millis(500), Duration::from_millis(1000))
    }
}

/// Held keys and the generation of the press holding each.
type HeldKeys = Arc<Mutex<HashMap<String, u64>>>;

fn is_held(held: &HeldKeys, key: &str) -> bool {
    held.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(key)
}

/// True while `key` is held by the press numbered `generation`.
fn is_current(held: &HeldKeys, key: &str, generation: u64) -> bool {
    held.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(key)
        .is_some_and(|held_by| *held_by == generation)
}

/// Per-key staged timer state machine.
#[derive(Debug)]
pub struct LongPressController {
    timing: LongPressTiming,
    held: HeldKeys,
    next_generation: u64,
    timers: HashMap<String, Vec<JoinHandle<()>>>,
    tx: UnboundedSender<LongPressAction>,
}

impl LongPressController {
    /// Creates a controller and the receiver its timers deliver to.
    #[must_use]
    pub fn new(timing: LongPressTiming) -> (Self, UnboundedReceiver<LongPressAction>) {
        let (tx, rx) = unbounded_channel();
        let controller = Self {
            timing,
            held: Arc::default(),
            next_generation: 0,
            timers: HashMap::new(),
            tx,
        };
        (controller, rx)
    }

    #[must_use]
    pub fn timing(&self) -> LongPressTiming {
        self.timing
    }

    /// Returns true while `key` is held.
    #[must_use]
    pub fn is_held(&self, key: &str) -> bool {
        is_held(&self.held, &normalize_key(key))
    }

    /// Handles a key-down.
    ///
    /// Returns the immediate single-step action, or `None` if the key is
    /// already held (auto-repeat keydowns). Staged timers are scheduled after
    /// the immediate action is built; outside a tokio runtime only the
    /// immediate action is produced.
    pub fn key_down(
        &mut self,
        key: &str,
        scope: StepScope,
        direction: Direction,
    ) -> Option<LongPressAction> {
        let key = normalize_key(key);
        let generation = {
            let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
            if held.contains_key(&key) {
                return None;
            }
            self.next_generation = self.next_generation.wrapping_add(1);
            held.insert(key.clone(), self.next_generation);
            self.next_generation
        };

        let immediate = LongPressAction {
            key: key.clone(),
            scope,
            direction,
            jump: Jump::Frame,
            trigger: Trigger::Press,
        };

        if tokio::runtime::Handle::try_current().is_err() {
            tracing::warn!(%key, "no async runtime, long-press stages disabled");
            return Some(immediate);
        }

        let start = Instant::now();
        let handles = self
            .timing
            .stage_offsets()
            .into_iter()
            .zip(STAGE_JUMPS)
            .enumerate()
            .map(|(index, (offset, jump))| {
                let action = LongPressAction {
                    jump,
                    trigger: Trigger::Stage(index as u8),
                    ..immediate.clone()
                };
                let repeat = (index == STAGE_COUNT - 1).then_some(self.timing.repeat_interval);
                self.spawn_stage(start + offset, action, generation, repeat)
            })
            .collect();
        self.timers.insert(key, handles);

        Some(immediate)
    }

    fn spawn_stage(
        &self,
        fire_at: Instant,
        action: LongPressAction,
        generation: u64,
        repeat: Option<Duration>,
    ) -> JoinHandle<()> {
        let held = Arc::clone(&self.held);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            sleep_until(fire_at).await;
            if !is_current(&held, &action.key, generation) || tx.send(action.clone()).is_err() {
                return;
            }
            let Some(period) = repeat else {
                return;
            };

            let mut ticker = interval_at(fire_at + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !is_current(&held, &action.key, generation) {
                    break;
                }
                let tick = LongPressAction {
                    jump: REPEAT_JUMP,
                    trigger: Trigger::Repeat,
                    ..action.clone()
                };
                if tx.send(tick).is_err() {
                    break;
                }
            }
        })
    }

    /// Handles a key-up: cancels the key's pending stages and repeat.
    pub fn key_up(&mut self, key: &str) {
        let key = normalize_key(key);
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key);
        if let Some(handles) = self.timers.remove(&key) {
            for handle in handles {
                handle.abort();
            }
            tracing::trace!(%key, "long-press released");
        }
    }

    /// Cancels every timer of every key.
    pub fn shutdown(&mut self) {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        for (_, handles) in self.timers.drain() {
            for handle in handles {
                handle.abort();
            }
        }
    }
}

impl Drop for LongPressController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
