// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line segments.

use core::ops::Range;

use crate::kernel::{CurveKind, EdgeCurve, Nearest};
use crate::{Point, Vec3};

/// A single line segment, parameterized over `0..1`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    /// The line's start point.
    pub p0: Point,
    /// The line's end point.
    pub p1: Point,
}

impl Line {
    /// Create a new line.
    #[inline]
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Line {
        Line {
            p0: p0.into(),
            p1: p1.into(),
        }
    }

    /// Returns a copy of this `Line` with the end points swapped.
    #[inline]
    #[must_use]
    pub fn reversed(&self) -> Line {
        Line {
            p0: self.p1,
            p1: self.p0,
        }
    }

    /// The length of the line.
    #[inline]
    pub fn length(&self) -> f64 {
        self.p0.distance(self.p1)
    }
}

impl EdgeCurve for Line {
    #[inline]
    fn eval(&self, t: f64) -> Point {
        self.p0.lerp(self.p1, t)
    }

    #[inline]
    fn bounds(&self) -> Range<f64> {
        0.0..1.0
    }

    fn kind(&self) -> CurveKind {
        CurveKind::Line
    }

    fn clone_box(&self) -> Box<dyn EdgeCurve> {
        Box::new(*self)
    }

    #[inline]
    fn start(&self) -> Point {
        self.p0
    }

    #[inline]
    fn end(&self) -> Point {
        self.p1
    }

    fn bezier_segments(&self) -> Option<Vec<Vec<Point>>> {
        Some(vec![vec![self.p0, self.p1]])
    }

    #[inline]
    fn deriv(&self, _t: f64) -> Vec3 {
        self.p1 - self.p0
    }

    #[inline]
    fn deriv2(&self, _t: f64) -> Vec3 {
        Vec3::ZERO
    }

    fn curvature(&self, _t: f64) -> Option<f64> {
        Some(0.0)
    }

    fn center_of_curvature(&self, _t: f64) -> Option<Point> {
        None
    }

    fn arclen(&self, range: Range<f64>, _accuracy: f64) -> f64 {
        (range.end - range.start).abs() * Line::length(self)
    }

    fn inv_arclen(&self, arclen: f64, _accuracy: f64) -> Option<f64> {
        let len = Line::length(self);
        if len <= 0.0 || arclen < 0.0 || arclen > len {
            return None;
        }
        Some(arclen / len)
    }

    fn nearest(&self, p: Point, _accuracy: f64) -> Option<Nearest> {
        let d = self.p1 - self.p0;
        let dotp = d.dot(p - self.p0);
        let d_squared = d.dot(d);
        let (t, distance_sq) = if dotp <= 0.0 {
            (0.0, p.distance_squared(self.p0))
        } else if dotp >= d_squared {
            (1.0, p.distance_squared(self.p1))
        } else {
            let t = dotp / d_squared;
            (t, p.distance_squared(self.eval(t)))
        };
        distance_sq.is_finite().then_some(Nearest { t, distance_sq })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_arclen() {
        let l = Line::new((0.0, 0.0), (1.0, 1.0));
        let true_len = 2.0f64.sqrt();
        let accuracy = 1e-9;
        assert!((l.length() - true_len).abs() < accuracy);
        assert!((l.arclen(0.0..0.5, accuracy) - 0.5 * true_len).abs() < accuracy);
        let t = l.inv_arclen(true_len / 3.0, accuracy).unwrap();
        assert!((t - 1.0 / 3.0).abs() < accuracy);
        assert!(l.inv_arclen(2.0 * true_len, accuracy).is_none());
    }

    #[test]
    fn line_nearest() {
        let l = Line::new((0.0, 0.0), (4.0, 0.0));
        let n = l.nearest(Point::planar(1.0, 3.0), 1e-9).unwrap();
        assert!((n.t - 0.25).abs() < 1e-12);
        assert!((n.distance_sq - 9.0).abs() < 1e-12);
        let n = l.nearest(Point::planar(-2.0, 0.0), 1e-9).unwrap();
        assert_eq!(n.t, 0.0);
        let n = l.nearest(Point::planar(7.0, 4.0), 1e-9).unwrap();
        assert_eq!(n.t, 1.0);
        assert!((n.distance_sq - 25.0).abs() < 1e-12);
    }

    #[test]
    fn line_is_not_closed() {
        let l = Line::new((0.0, 0.0), (1.0, 0.0));
        assert!(!l.is_closed());
        assert_eq!(l.reversed().start(), Point::planar(1.0, 0.0));
    }
}
