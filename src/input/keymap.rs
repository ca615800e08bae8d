// SPDX-License-Identifier: MPL-2.0
//! Keyboard shortcut table.
//!
//! | Key | Action |
//! |-----|--------|
//! | `a` / `d` | Left side frame back / forward (long-press capable) |
//! | `j` / `l` | Right side frame back / forward (long-press capable) |
//! | `ArrowLeft` / `ArrowRight` | Both sides frame back / forward (long-press capable) |
//! | `s` / `k` | Toggle left / right playback |
//! | `Space` | Toggle global playback |
//! | `1`-`5` | Set that marker at the active side's current time |

use crate::domain::marker::DEFAULT_LABELS;
use crate::domain::video::Side;

/// Where keyboard focus sat when the key event fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    /// Nothing focused, or a non-input control.
    #[default]
    None,
    /// A text-like input; shortcuts are suppressed so typing works.
    TextInput,
    /// A range slider; shortcuts pass through.
    RangeSlider,
}

/// Returns true if shortcuts should fire for an event from `focus`.
#[must_use]
pub fn shortcuts_enabled(focus: FocusTarget) -> bool {
    !matches!(focus, FocusTarget::TextInput)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

impl Direction {
    /// `-1.0` for backward, `1.0` for forward.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Backward => -1.0,
            Direction::Forward => 1.0,
        }
    }
}

/// Which players a step command drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepScope {
    Side(Side),
    Both,
}

/// Action bound to a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shortcut {
    /// Frame step; holding the key escalates through the long-press stages.
    Step {
        scope: StepScope,
        direction: Direction,
    },
    ToggleSide(Side),
    ToggleGlobal,
    /// Set the marker with this label.
    SetMarker(String),
}

impl Shortcut {
    #[must_use]
    pub fn is_long_press(&self) -> bool {
        matches!(self, Shortcut::Step { .. })
    }
}

/// Normalizes a key name: lowercase, with `Space`/`Spacebar` mapped to `" "`.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    let lower = key.to_lowercase();
    match lower.as_str() {
        "space" | "spacebar" => " ".to_string(),
        _ => lower,
    }
}

/// Looks up the shortcut bound to `key` (any case).
#[must_use]
pub fn shortcut_for(key: &str) -> Option<Shortcut> {
    let key = normalize_key(key);
    let step = |scope, direction| Some(Shortcut::Step { scope, direction });
    match key.as_str() {
        "a" => step(StepScope::Side(Side::Left), Direction::Backward),
        "d" => step(StepScope::Side(Side::Left), Direction::Forward),
        "j" => step(StepScope::Side(Side::Right), Direction::Backward),
        "l" => step(StepScope::Side(Side::Right), Direction::Forward),
        "arrowleft" => step(StepScope::Both, Direction::Backward),
        "arrowright" => step(StepScope::Both, Direction::Forward),
        "s" => Some(Shortcut::ToggleSide(Side::Left)),
        "k" => Some(Shortcut::ToggleSide(Side::Right)),
        " " => Some(Shortcut::ToggleGlobal),
        digit if DEFAULT_LABELS.contains(&digit) => Some(Shortcut::SetMarker(digit.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_keys_map_to_side_steps() {
        assert_eq!(
            shortcut_for("D"),
            Some(Shortcut::Step {
                scope: StepScope::Side(Side::Left),
                direction: Direction::Forward
            })
        );
        assert_eq!(
            shortcut_for("j"),
            Some(Shortcut::Step {
                scope: StepScope::Side(Side::Right),
                direction: Direction::Backward
            })
        );
    }

    #[test]
    fn arrows_step_both_sides() {
        assert_eq!(
            shortcut_for("ArrowLeft"),
            Some(Shortcut::Step {
                scope: StepScope::Both,
                direction: Direction::Backward
            })
        );
    }

    #[test]
    fn toggles_are_not_long_press() {
        for key in ["s", "k", " ", "Space"] {
            let shortcut = shortcut_for(key).expect("bound key");
            assert!(!shortcut.is_long_press(), "{key}");
        }
        assert_eq!(shortcut_for("space"), Some(Shortcut::ToggleGlobal));
    }

    #[test]
    fn digits_one_to_five_set_markers() {
        assert_eq!(shortcut_for("3"), Some(Shortcut::SetMarker("3".into())));
        assert_eq!(shortcut_for("6"), None);
        assert_eq!(shortcut_for("0"), None);
    }

    #[test]
    fn unbound_keys_are_ignored() {
        assert_eq!(shortcut_for("x"), None);
        assert_eq!(shortcut_for("Enter"), None);
    }

    #[test]
    fn text_inputs_suppress_shortcuts_but_sliders_do_not() {
        assert!(shortcuts_enabled(FocusTarget::None));
        assert!(shortcuts_enabled(FocusTarget::RangeSlider));
        assert!(!shortcuts_enabled(FocusTarget::TextInput));
    }
}
