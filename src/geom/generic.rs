// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lines and polylines.

use crate::kernel::{CurveKind, EdgeCurve};
use crate::{GeometryError, Point, Vec3};

/// A line or polyline, as an ordered list of points.
///
/// A true line has exactly two points.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Generic {
    /// The points, in the curve's natural direction.
    pub points: Vec<Point>,
}

impl Generic {
    /// Sample an edge: its stored polygon if it has one, else its ends.
    pub(crate) fn from_edge(edge: &dyn EdgeCurve) -> Generic {
        let points = match edge.polygon() {
            Some(points) if points.len() >= 2 && edge.kind() != CurveKind::Line => points,
            _ => vec![edge.start(), edge.end()],
        };
        Generic { points }
    }

    /// First point, or the origin for an empty list.
    #[inline]
    pub fn first(&self) -> Point {
        self.points.first().copied().unwrap_or(Point::ZERO)
    }

    /// Last point, or the origin for an empty list.
    #[inline]
    pub fn last(&self) -> Point {
        self.points.last().copied().unwrap_or(Point::ZERO)
    }

    /// The displacement from the first point to the last.
    pub fn as_vector(&self) -> Vec3 {
        self.last() - self.first()
    }

    /// Slope dy/dx of the chord; infinite for a vertical chord.
    pub fn slope(&self) -> f64 {
        let v = self.as_vector();
        if v.x == 0.0 {
            f64::INFINITY
        } else {
            v.y / v.x
        }
    }

    /// Where the infinite extensions of two chords meet.
    ///
    /// Fails with [`GeometryError::ParallelLines`] when the chords are
    /// parallel.
    pub fn apparent_intersection(&self, other: &Generic) -> Result<Point, GeometryError> {
        let dir0 = self.as_vector();
        let dir1 = other.as_vector();
        let det = dir0.x * dir1.y - dir0.y * dir1.x;
        if det.abs() < 1e-10 {
            return Err(GeometryError::ParallelLines);
        }
        let p0 = self.first();
        let p1 = other.first();
        let c0 = dir0.y * p0.x - dir0.x * p0.y;
        let c1 = dir1.y * p1.x - dir1.x * p1.y;
        let x = (dir0.x * c1 - dir1.x * c0) / det;
        let y = (dir0.y * c1 - dir1.y * c0) / det;
        Ok(Point::planar(x, y))
    }
}
