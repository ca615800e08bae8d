// SPDX-License-Identifier: MPL-2.0
//! Player backends.
//!
//! One backend per concrete player kind, chosen by the source's kind tag.

pub mod blob;
pub mod local;
pub mod youtube;

pub use blob::{shared_registry, BlobRegistry, FileHandle, SharedBlobRegistry};
pub use local::LocalFileBackend;
pub use youtube::YoutubeBackend;

use crate::application::port::PlayerBackend;
use crate::domain::video::SourceKind;

/// Creates the backend that plays sources of `kind`.
#[must_use]
pub fn backend_for(kind: SourceKind, registry: &SharedBlobRegistry) -> Box<dyn PlayerBackend> {
    match kind {
        SourceKind::Local => Box::new(LocalFileBackend::new(registry.clone())),
        SourceKind::Youtube => Box::new(YoutubeBackend::new()),
    }
}
