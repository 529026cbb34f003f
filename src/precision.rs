// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tolerances used throughout the crate.
//!
//! Drawing units are millimetres in practice, and the values below are
//! chosen with that scale in mind.

/// Two points closer than this are the same point.
pub const CONFUSION: f64 = 1e-7;

/// A curve whose start and end are closer than this is closed.
pub const CLOSED_TOLERANCE: f64 = 0.00001;

/// Squared endpoint distance below which a circular or elliptical edge may
/// be a full curve rather than an arc.
pub const ARC_CLOSURE_SQ: f64 = 0.001;

/// Parameter span, in radians, above which a circular or elliptical edge
/// may be a full curve rather than an arc.
pub const ARC_SPAN_MIN: f64 = 1.0;

/// Allowed deviation when decomposing a B-spline into Bézier segments.
pub const APPROX_TOLERANCE: f64 = 0.001;

/// Allowed radius and center disagreement when fitting a circle to a B-spline.
pub const CIRCLE_FIT_TOLERANCE: f64 = 0.001;

/// Mean curvature deviation below which a B-spline is circular.
pub const CURVATURE_LIMIT: f64 = 0.0001;

/// Line/line determinant below which the lines are parallel.
pub const PARALLEL_LIMIT: f64 = 0.01;

/// Circle/line discriminant below which the line is tangent.
pub const TANGENT_LINE_LIMIT: f64 = 0.01;

/// Circle/circle discriminant below which the circles touch.
pub const TANGENT_CIRCLE_LIMIT: f64 = 0.1;

/// Accuracy used for arc length and nearest-point searches.
pub const QUERY_ACCURACY: f64 = 1e-9;

/// Relative tolerance for comparing two lengths.
pub(crate) const LENGTH_COMPARE: f64 = 1e-7;

/// Compare two lengths with a tolerance relative to their size.
#[inline]
pub(crate) fn lengths_match(a: f64, b: f64) -> bool {
    (a - b).abs() <= LENGTH_COMPARE * a.abs().max(b.abs()).max(1.0)
}
