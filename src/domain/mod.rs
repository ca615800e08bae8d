// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core comparison logic with ZERO external dependencies.
//!
//! This module contains pure domain types, value objects, and business rules.
//! It has no dependencies on external crates (except `std`) to ensure
//! testability and architectural purity. Serialization lives in the `app`
//! layer, which maps these types to their stored representation.
//!
//! # Modules
//!
//! - [`marker`]: Dual-time bookmarks ([`Marker`](marker::Marker),
//!   [`MarkerStore`](marker::MarkerStore)) and `m:ss` time text
//! - [`video`]: Video slot types ([`Side`](video::Side),
//!   [`VideoSource`](video::VideoSource), [`PlaybackState`](video::PlaybackState),
//!   [`PlaybackRate`](video::PlaybackRate))

pub mod marker;
pub mod video;
