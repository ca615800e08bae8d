// SPDX-License-Identifier: MPL-2.0
//! Video slot domain types.
//!
//! This module contains video-related value objects and enums that are
//! independent of any presentation or infrastructure concerns.

pub mod newtypes;
pub mod playback;
pub mod source;

// Re-export commonly used types
pub use newtypes::{frame_bounds, rate_presets, PlaybackRate};
pub use playback::PlaybackState;
pub use source::{Side, SourceKind, VideoSource, ACCEPTED_EXTENSIONS};
