//! # Overview
//! `nurbs_geometry` is a NURBS (Non-Uniform Rational B-Spline) geometric
//! kernel for parametric curves and surfaces in 2D and 3D. It covers
//! knot-vector span lookup, B-spline/NURBS shape functions with
//! derivatives, curve and surface evaluators, curve-on-surface
//! composition, adaptive tessellation, Gauss-Legendre integration,
//! curve-knot-line intersection, Newton-refined point-on-curve
//! projection accelerated by a bulk-loaded Hilbert R-tree, a discrete
//! Hilbert curve, and polyline projection.
//!
//! Geometries are constructed once, validated up front, and thereafter
//! read-only with respect to degree, knot count, and pole count; pole,
//! weight, and knot *values* may still be mutated in place. Derived
//! views such as [`CurveOnSurface`] hold a non-owning reference and must
//! not outlive the geometry they wrap.

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

/// NURBS curve evaluation.
pub mod curve;
/// Composition of a 2D curve with a surface.
pub mod curve_on_surface;
/// The crate's error type.
pub mod errors;
/// A discrete n-dimensional Hilbert space-filling curve.
pub mod hilbert;
/// Gauss-Legendre quadrature.
pub mod integration;
/// Curve-vs-axis-aligned-knot-line intersection.
pub mod intersection;
/// Knot vectors: span lookup and degree/pole/knot arithmetic.
pub mod knot_vector;
/// 2D polyline projection.
pub mod polyline;
/// Point-on-curve projection.
pub mod projection;
/// A static, bulk-loaded AABB R-tree.
pub mod rtree;
/// B-spline/NURBS shape functions and their derivatives.
pub mod shape_functions;
/// NURBS surface evaluation.
pub mod surface;
/// Adaptive chord-deviation tessellation.
pub mod tessellation;

pub use curve::NurbsCurveGeometry;
pub use curve_on_surface::CurveOnSurface;
pub use errors::{Error, Result};
pub use hilbert::{index_at as hilbert_index_at, point_at as hilbert_point_at};
pub use integration::{integrate_over_curve, integrate_over_surface, integration_points, integration_points_2d};
pub use intersection::CurveSpanIntersection;
pub use knot_vector::KnotVector;
pub use polyline::PolylineMapper;
pub use projection::PointOnCurveProjection;
pub use rtree::RTree;
pub use shape_functions::ShapeFunctions;
pub use surface::NurbsSurfaceGeometry;
pub use tessellation::tessellate;

pub use nurbs_base::Interval;
