// SPDX-License-Identifier: MPL-2.0
//! `race_ana` compares two videos side by side.
//!
//! It drives two players (local files or YouTube embeds) in lockstep or
//! independently, steps them frame by frame with long-press acceleration,
//! keeps labeled markers with a time per side, and persists the whole
//! comparison to a session store or a shareable link.

#![doc(html_root_url = "https://docs.rs/race_ana/0.3.0")]

pub mod app;
pub mod application;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod input;
pub mod player;

#[cfg(test)]
pub(crate) mod test_utils;
