// SPDX-License-Identifier: MPL-2.0
//! Side players: the adapter every command goes through and the background
//! probe watching local sources.

pub mod adapter;
pub mod probe;

pub use adapter::{PlayerAdapter, ProbeOutcome, TimeUpdateCallback};
pub use probe::{ProbeReport, SourceProbe};
