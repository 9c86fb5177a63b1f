// SPDX-License-Identifier: MPL-2.0
//! Shared helpers for unit tests.
//!
//! Re-exports the `approx` crate's assertion macros so float comparisons in
//! tests tolerate rounding instead of relying on exact `assert_eq!` matches.

pub use approx::{assert_abs_diff_eq, assert_relative_eq};

/// Default epsilon for f32 comparisons of layout and scroll fractions.
pub const F32_EPSILON: f32 = 1e-6;
