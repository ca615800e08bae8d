// SPDX-License-Identifier: MPL-2.0
//! Keyboard input: shortcut table and long-press escalation.

pub mod keymap;
pub mod long_press;

pub use keymap::{shortcut_for, shortcuts_enabled, Direction, FocusTarget, Shortcut, StepScope};
pub use long_press::{Jump, LongPressAction, LongPressController, LongPressTiming, Trigger};
