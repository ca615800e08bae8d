// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters implement.
//! These traits use only domain types, ensuring the application layer remains
//! independent of concrete implementations.
//!
//! # Available Ports
//!
//! - [`clipboard`]: Text sinks for share-link copying
//! - [`player`]: Embeddable video players (local file, YouTube)
//! - [`storage`]: Ephemeral session key/value storage
//!
//! # Example
//!
//! ```ignore
//! use race_ana::application::port::{PlayerBackend, PlayerEvent};
//!
//! fn ready_duration(backend: &mut impl PlayerBackend) -> Option<f64> {
//!     backend.poll_events().into_iter().find_map(|event| match event {
//!         PlayerEvent::Ready { duration } => Some(duration),
//!         _ => None,
//!     })
//! }
//! ```

pub mod clipboard;
pub mod player;
pub mod storage;

// Re-export main types for convenience
pub use clipboard::ClipboardSink;
pub use player::{PlayerBackend, PlayerEvent};
pub use storage::SessionStorage;
