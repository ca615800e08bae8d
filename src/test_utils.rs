// SPDX-License-Identifier: MPL-2.0
//! Test helpers shared by unit tests.
//!
//! Times are `f64` seconds everywhere, so comparisons go through the `approx`
//! macros rather than `assert_eq!`.

pub use approx::{assert_abs_diff_eq, assert_relative_eq};

/// Tolerance of values that went through the two-decimal share encoding.
pub const SHARE_EPSILON: f64 = 0.01;
