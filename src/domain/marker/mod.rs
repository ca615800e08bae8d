// SPDX-License-Identifier: MPL-2.0
//! Dual-time markers.
//!
//! A marker is a labeled bookmark holding up to one timestamp per side. Labels
//! are the lookup key for "set marker at current time"; ids are the key for
//! editing and deleting.

mod time_text;

pub use time_text::{format_optional_time, format_time, parse_time_text};

use super::video::Side;
use std::fmt;

/// Labels of the markers seeded when the first left video loads.
pub const DEFAULT_LABELS: [&str; 5] = ["1", "2", "3", "4", "5"];

/// Stable marker identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A labeled bookmark with an optional time per side.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    pub label: String,
    pub left_time: Option<f64>,
    pub right_time: Option<f64>,
}

impl Marker {
    /// Returns the time recorded for `side`, if any.
    #[must_use]
    pub fn time(&self, side: Side) -> Option<f64> {
        match side {
            Side::Left => self.left_time,
            Side::Right => self.right_time,
        }
    }

    /// Sets the time for `side`.
    pub fn set_time(&mut self, side: Side, time: f64) {
        match side {
            Side::Left => self.left_time = Some(time),
            Side::Right => self.right_time = Some(time),
        }
    }

    /// Returns true if both sides have a time.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.left_time.is_some() && self.right_time.is_some()
    }
}

/// Errors raised by marker operations.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerError {
    /// No marker has this id.
    NotFound(MarkerId),
    /// Edited time text is not in `m:ss` form.
    InvalidTimeText(String),
    /// Label is blank or contains the `,` list separator.
    InvalidLabel(String),
    /// Time is negative or not finite.
    InvalidTime(f64),
}

impl fmt::Display for MarkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerError::NotFound(id) => write!(f, "no marker with id {id}"),
            MarkerError::InvalidTimeText(text) => {
                write!(f, "invalid time \"{text}\", expected m:ss")
            }
            MarkerError::InvalidLabel(label) => {
                write!(f, "invalid marker label \"{label}\", must be non-empty without ','")
            }
            MarkerError::InvalidTime(time) => write!(f, "invalid marker time {time}"),
        }
    }
}

impl std::error::Error for MarkerError {}

/// Checks that a label can be stored and round-tripped through a label list.
///
/// # Errors
///
/// Returns [`MarkerError::InvalidLabel`] for a blank label or one containing `,`.
pub fn validate_label(label: &str) -> Result<(), MarkerError> {
    if label.trim().is_empty() || label.contains(',') {
        return Err(MarkerError::InvalidLabel(label.to_string()));
    }
    Ok(())
}

/// Checks that a side-time is a finite, non-negative number of seconds.
///
/// # Errors
///
/// Returns [`MarkerError::InvalidTime`] otherwise.
pub fn validate_time(time: f64) -> Result<(), MarkerError> {
    if !time.is_finite() || time < 0.0 {
        return Err(MarkerError::InvalidTime(time));
    }
    Ok(())
}

/// Ordered set of markers with unique labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerStore {
    markers: Vec<Marker>,
    next_id: u64,
}

impl MarkerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            markers: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuilds a store from restored markers.
    ///
    /// Markers with an invalid label, and later duplicates of a label or id,
    /// are dropped; invalid side-times are cleared. This keeps the store's
    /// invariants for hand-edited session data. Fresh ids continue above the
    /// highest restored id.
    #[must_use]
    pub fn from_markers(markers: Vec<Marker>) -> Self {
        let mut store = Self::new();
        for mut marker in markers {
            if validate_label(&marker.label).is_err()
                || store.find_by_label(&marker.label).is_some()
                || store.get(marker.id).is_some()
            {
                continue;
            }
            marker.left_time = marker.left_time.filter(|t| validate_time(*t).is_ok());
            marker.right_time = marker.right_time.filter(|t| validate_time(*t).is_ok());
            store.next_id = store.next_id.max(marker.id.0.saturating_add(1));
            store.markers.push(marker);
        }
        store
    }

    /// Markers in insertion order.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    #[must_use]
    pub fn find_by_label(&self, label: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.label == label)
    }

    /// Next unused id. Past `u64::MAX` the search wraps to 1.
    fn fresh_id(&mut self) -> MarkerId {
        let mut candidate = self.next_id.max(1);
        while self.get(MarkerId(candidate)).is_some() {
            candidate = candidate.checked_add(1).unwrap_or(1);
        }
        self.next_id = candidate.saturating_add(1);
        MarkerId(candidate)
    }

    /// Sets `side`'s time on the marker labeled `label`, creating it if needed.
    ///
    /// A newly created marker only has the given side set. Returns the id of
    /// the touched marker.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerError::InvalidLabel`] or [`MarkerError::InvalidTime`]
    /// without touching the store.
    pub fn add_or_update(
        &mut self,
        time: f64,
        label: &str,
        side: Side,
    ) -> Result<MarkerId, MarkerError> {
        validate_label(label)?;
        validate_time(time)?;
        if let Some(marker) = self.markers.iter_mut().find(|m| m.label == label) {
            marker.set_time(side, time);
            return Ok(marker.id);
        }

        let id = self.fresh_id();
        let mut marker = Marker {
            id,
            label: label.to_string(),
            left_time: None,
            right_time: None,
        };
        marker.set_time(side, time);
        self.markers.push(marker);
        Ok(id)
    }

    /// Removes a marker by id. Returns the removed marker.
    pub fn delete(&mut self, id: MarkerId) -> Option<Marker> {
        let index = self.markers.iter().position(|m| m.id == id)?;
        Some(self.markers.remove(index))
    }

    /// Overwrites `side`'s time with a value parsed from `m:ss` text.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerError::InvalidTimeText`] without touching the marker if
    /// the text does not parse, or [`MarkerError::NotFound`] for an unknown id.
    pub fn edit_time(&mut self, id: MarkerId, side: Side, text: &str) -> Result<f64, MarkerError> {
        let seconds =
            parse_time_text(text).ok_or_else(|| MarkerError::InvalidTimeText(text.to_string()))?;
        self.edit_time_secs(id, side, seconds)?;
        Ok(seconds)
    }

    /// Overwrites `side`'s time directly.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerError::InvalidTime`] for a negative or non-finite
    /// time, or [`MarkerError::NotFound`] for an unknown id.
    pub fn edit_time_secs(&mut self, id: MarkerId, side: Side, seconds: f64) -> Result<(), MarkerError> {
        validate_time(seconds)?;
        let marker = self
            .markers
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(MarkerError::NotFound(id))?;
        marker.set_time(side, seconds);
        Ok(())
    }

    /// Seeds the five default markers if the store is empty.
    ///
    /// Returns true if markers were created.
    pub fn seed_defaults(&mut self) -> bool {
        if !self.markers.is_empty() {
            return false;
        }
        for label in DEFAULT_LABELS {
            let id = self.fresh_id();
            self.markers.push(Marker {
                id,
                label: label.to_string(),
                left_time: Some(0.0),
                right_time: Some(0.0),
            });
        }
        true
    }

    /// Removes every marker.
    pub fn clear(&mut self) {
        self.markers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    #[test]
    fn add_creates_partial_marker() {
        let mut store = MarkerStore::new();
        let id = store.add_or_update(12.5, "A", Side::Left).unwrap();

        let marker = store.get(id).unwrap();
        assert_eq!(marker.label, "A");
        assert_eq!(marker.left_time, Some(12.5));
        assert_eq!(marker.right_time, None);
        assert!(!marker.is_complete());
    }

    #[test]
    fn add_or_update_is_idempotent_per_label_and_side() {
        let mut store = MarkerStore::new();
        let first = store.add_or_update(3.0, "lap", Side::Right).unwrap();
        let second = store.add_or_update(3.0, "lap", Side::Right).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(first).unwrap().right_time, Some(3.0));
    }

    #[test]
    fn update_keeps_other_side() {
        let mut store = MarkerStore::new();
        let id = store.add_or_update(1.0, "x", Side::Left).unwrap();
        store.add_or_update(2.0, "x", Side::Right).unwrap();

        let marker = store.get(id).unwrap();
        assert_eq!(marker.left_time, Some(1.0));
        assert_eq!(marker.right_time, Some(2.0));
        assert!(marker.is_complete());
    }

    #[test]
    fn delete_removes_by_id() {
        let mut store = MarkerStore::new();
        let a = store.add_or_update(1.0, "a", Side::Left).unwrap();
        let b = store.add_or_update(2.0, "b", Side::Left).unwrap();

        assert!(store.delete(a).is_some());
        assert!(store.delete(a).is_none());
        assert_eq!(store.len(), 1);
        assert!(store.get(b).is_some());
    }

    #[test]
    fn ids_are_never_reused() {
        let mut store = MarkerStore::new();
        let a = store.add_or_update(1.0, "a", Side::Left).unwrap();
        store.delete(a);
        let b = store.add_or_update(1.0, "b", Side::Left).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn edit_time_parses_text() {
        let mut store = MarkerStore::new();
        let id = store.add_or_update(0.0, "1", Side::Left).unwrap();

        let secs = store.edit_time(id, Side::Right, "1:05").unwrap();
        assert_abs_diff_eq!(secs, 65.0);
        assert_eq!(store.get(id).unwrap().right_time, Some(65.0));
    }

    #[test]
    fn edit_time_rejects_malformed_text_without_change() {
        let mut store = MarkerStore::new();
        let id = store.add_or_update(9.0, "1", Side::Left).unwrap();

        let err = store.edit_time(id, Side::Left, "nine").unwrap_err();
        assert_eq!(err, MarkerError::InvalidTimeText("nine".to_string()));
        assert_eq!(store.get(id).unwrap().left_time, Some(9.0));
    }

    #[test]
    fn edit_time_unknown_id() {
        let mut store = MarkerStore::new();
        let err = store.edit_time_secs(MarkerId(42), Side::Left, 1.0).unwrap_err();
        assert_eq!(err, MarkerError::NotFound(MarkerId(42)));
    }

    #[test]
    fn seed_defaults_only_on_empty_store() {
        let mut store = MarkerStore::new();
        assert!(store.seed_defaults());
        let labels: Vec<_> = store.markers().iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, DEFAULT_LABELS);
        assert!(store
            .markers()
            .iter()
            .all(|m| m.left_time == Some(0.0) && m.right_time == Some(0.0)));

        assert!(!store.seed_defaults());
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn from_markers_drops_duplicate_labels_and_advances_ids() {
        let restored = vec![
            Marker {
                id: MarkerId(7),
                label: "a".into(),
                left_time: Some(1.0),
                right_time: None,
            },
            Marker {
                id: MarkerId(8),
                label: "a".into(),
                left_time: Some(2.0),
                right_time: None,
            },
        ];
        let mut store = MarkerStore::from_markers(restored);
        assert_eq!(store.len(), 1);
        assert_eq!(store.find_by_label("a").unwrap().left_time, Some(1.0));

        let id = store.add_or_update(0.0, "b", Side::Left).unwrap();
        assert!(id.0 > 7);
    }

    #[test]
    fn invalid_labels_are_rejected() {
        let mut store = MarkerStore::new();
        for label in ["", "  ", "a,b"] {
            assert_eq!(
                store.add_or_update(3.0, label, Side::Left),
                Err(MarkerError::InvalidLabel(label.to_string()))
            );
        }
        assert!(store.is_empty());

        store.add_or_update(3.0, "T1-exit", Side::Left).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn invalid_times_are_rejected() {
        let mut store = MarkerStore::new();
        assert_eq!(
            store.add_or_update(-5.0, "1", Side::Left),
            Err(MarkerError::InvalidTime(-5.0))
        );
        assert!(matches!(
            store.add_or_update(f64::NAN, "1", Side::Left),
            Err(MarkerError::InvalidTime(_))
        ));
        assert!(store.is_empty());

        let id = store.add_or_update(4.0, "1", Side::Left).unwrap();
        assert_eq!(
            store.edit_time_secs(id, Side::Left, f64::INFINITY),
            Err(MarkerError::InvalidTime(f64::INFINITY))
        );
        assert_eq!(store.get(id).unwrap().left_time, Some(4.0));
    }

    #[test]
    fn from_markers_drops_invalid_labels_and_times() {
        let restored = vec![
            Marker {
                id: MarkerId(1),
                label: "a,b".into(),
                left_time: Some(1.0),
                right_time: None,
            },
            Marker {
                id: MarkerId(2),
                label: "c".into(),
                left_time: Some(-1.0),
                right_time: Some(2.0),
            },
        ];
        let store = MarkerStore::from_markers(restored);
        assert_eq!(store.len(), 1);
        let marker = store.find_by_label("c").unwrap();
        assert_eq!(marker.left_time, None);
        assert_eq!(marker.right_time, Some(2.0));
    }

    #[test]
    fn restoring_the_largest_id_does_not_overflow() {
        let restored = vec![Marker {
            id: MarkerId(u64::MAX),
            label: "1".into(),
            left_time: Some(2.0),
            right_time: None,
        }];
        let mut store = MarkerStore::from_markers(restored);

        let a = store.add_or_update(1.0, "a", Side::Left).unwrap();
        let b = store.add_or_update(1.0, "b", Side::Left).unwrap();
        assert_ne!(a, MarkerId(u64::MAX));
        assert_ne!(a, b);
        assert_eq!(store.len(), 3);
    }
}
