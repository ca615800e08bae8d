// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer - Adapters implementing application ports.
//!
//! - [`clipboard`]: Desktop and terminal clipboards ([`ClipboardSink`](crate::application::port::ClipboardSink))
//! - [`player`]: Local file and YouTube backends ([`PlayerBackend`](crate::application::port::PlayerBackend))
//! - [`storage`]: File and memory session stores ([`SessionStorage`](crate::application::port::SessionStorage))

pub mod clipboard;
pub mod player;
pub mod storage;
