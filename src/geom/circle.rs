// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Circles and circular arcs.

use crate::common::normalize_angle;
use crate::kernel::{CircleCurve, EdgeCurve};
use crate::Point;

/// A full circle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Circle {
    /// The center; `z` is zero by convention.
    pub center: Point,
    /// The radius.
    pub radius: f64,
}

/// An arc of a circle.
///
/// Angles are stored in `[0, 2π)`. The sample points are taken at the start,
/// parameter midpoint, and end of the curve in its natural direction.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArcOfCircle {
    /// The underlying circle.
    pub circle: Circle,
    /// Angle of the start point, in radians.
    pub start_angle: f64,
    /// Angle of the end point, in radians.
    pub end_angle: f64,
    /// The start point.
    pub start_pnt: Point,
    /// The point halfway through the parameter range.
    pub mid_pnt: Point,
    /// The end point.
    pub end_pnt: Point,
    /// Winding as seen on a y-down drawing canvas.
    pub cw: bool,
    /// Whether the arc spans more than half a turn.
    pub large_arc: bool,
}

impl Circle {
    pub(crate) fn from_edge(edge: &dyn EdgeCurve) -> Option<Circle> {
        let c = edge.as_circle()?;
        Some(Circle {
            center: c.center,
            radius: c.radius,
        })
    }
}

impl ArcOfCircle {
    pub(crate) fn from_edge(edge: &dyn EdgeCurve) -> Option<ArcOfCircle> {
        let circle = Circle::from_edge(edge)?;
        Some(ArcOfCircle::from_curve(edge, circle))
    }

    pub(crate) fn from_curve(edge: &dyn EdgeCurve, circle: Circle) -> ArcOfCircle {
        let s = ArcSamples::new(edge);
        ArcOfCircle {
            circle,
            start_angle: s.start_angle,
            end_angle: s.end_angle,
            start_pnt: s.start,
            mid_pnt: s.mid,
            end_pnt: s.end,
            cw: s.cw,
            large_arc: s.large_arc,
        }
    }

    /// The kernel curve for this arc.
    pub fn to_curve(&self) -> CircleCurve {
        let mut end = self.end_angle;
        if end <= self.start_angle {
            end += core::f64::consts::TAU;
        }
        CircleCurve::new(self.circle.center, self.circle.radius, self.start_angle, end)
    }
}

/// Start, middle and end of an arc-like edge and the flags derived from them.
pub(crate) struct ArcSamples {
    pub(crate) start_angle: f64,
    pub(crate) end_angle: f64,
    pub(crate) start: Point,
    pub(crate) mid: Point,
    pub(crate) end: Point,
    pub(crate) cw: bool,
    pub(crate) large_arc: bool,
}

impl ArcSamples {
    pub(crate) fn new(edge: &dyn EdgeCurve) -> ArcSamples {
        let range = edge.bounds();
        let (f, l) = (range.start, range.end);
        let start = edge.eval(f);
        let mid = edge.eval(0.5 * (f + l));
        let end = edge.eval(l);
        let a = (start - mid).cross_z(end - mid);
        ArcSamples {
            start_angle: normalize_angle(f),
            end_angle: normalize_angle(l),
            start,
            mid,
            end,
            cw: a < 0.0,
            large_arc: (l - f).abs() > core::f64::consts::PI,
        }
    }
}
