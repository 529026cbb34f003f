// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Open polylines.

use core::ops::Range;

use crate::kernel::{CurveKind, EdgeCurve, Line, Nearest};
use crate::{Point, Vec3};

/// A sequence of line segments. Segment `i` covers the parameter range
/// `i..i + 1`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polyline {
    points: Vec<Point>,
}

impl Polyline {
    /// Create a polyline; `None` for fewer than two points.
    pub fn new(points: Vec<Point>) -> Option<Polyline> {
        (points.len() >= 2).then_some(Polyline { points })
    }

    /// The vertices.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    fn segment(&self, t: f64) -> (usize, f64) {
        let last = self.points.len() - 2;
        let i = (t.floor().max(0.0) as usize).min(last);
        (i, t - i as f64)
    }

    fn segments(&self) -> impl Iterator<Item = Line> + '_ {
        self.points.windows(2).map(|w| Line::new(w[0], w[1]))
    }
}

impl EdgeCurve for Polyline {
    fn eval(&self, t: f64) -> Point {
        let (i, local) = self.segment(t);
        self.points[i].lerp(self.points[i + 1], local)
    }

    fn bounds(&self) -> Range<f64> {
        0.0..(self.points.len() - 1) as f64
    }

    fn kind(&self) -> CurveKind {
        CurveKind::Other
    }

    fn clone_box(&self) -> Box<dyn EdgeCurve> {
        Box::new(self.clone())
    }

    fn polygon(&self) -> Option<Vec<Point>> {
        Some(self.points.clone())
    }

    fn deriv(&self, t: f64) -> Vec3 {
        let (i, _) = self.segment(t);
        self.points[i + 1] - self.points[i]
    }

    fn deriv2(&self, _t: f64) -> Vec3 {
        Vec3::ZERO
    }

    fn arclen(&self, range: Range<f64>, accuracy: f64) -> f64 {
        let (i0, _) = self.segment(range.start);
        let (i1, _) = self.segment(range.end);
        (i0..=i1)
            .map(|i| {
                let lo = range.start.max(i as f64) - i as f64;
                let hi = range.end.min((i + 1) as f64) - i as f64;
                Line::new(self.points[i], self.points[i + 1]).arclen(lo..hi.max(lo), accuracy)
            })
            .sum()
    }

    fn nearest(&self, p: Point, accuracy: f64) -> Option<Nearest> {
        self.segments()
            .enumerate()
            .filter_map(|(i, line)| {
                line.nearest(p, accuracy).map(|n| Nearest {
                    t: n.t + i as f64,
                    distance_sq: n.distance_sq,
                })
            })
            .min_by(|a, b| a.distance_sq.total_cmp(&b.distance_sq))
    }
}
