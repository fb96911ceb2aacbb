//! Basic structs and traits shared across the nurbs kernel: vector re-exports,
//! tolerance comparisons, a small Newton-method solver, intervals and bounding boxes.

#![cfg_attr(not(debug_assertions), deny(warnings))]
#![deny(clippy::all, rust_2018_idioms)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

/// Defines bounding box
pub mod bounding_box;
/// Redefines vectors with scalar = f64.
pub mod cgmath64;
/// Closed real interval `[t0, t1]`.
pub mod interval;
/// Implementation of Newton's method
pub mod newton;
/// Setting tolerance
pub mod tolerance;

pub use bounding_box::BoundingBox;
pub use interval::Interval;
pub use tolerance::{Tolerance, TOLERANCE, TOLERANCE2};
