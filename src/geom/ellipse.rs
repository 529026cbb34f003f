// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ellipses and elliptical arcs.

use crate::geom::circle::ArcSamples;
use crate::kernel::{EdgeCurve, EllipseCurve};
use crate::Point;

/// A full ellipse.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ellipse {
    /// The center.
    pub center: Point,
    /// Radius along the major axis.
    pub major: f64,
    /// Radius along the minor axis.
    pub minor: f64,
    /// Angle of the major axis from the x axis, in radians.
    pub angle: f64,
}

/// An arc of an ellipse, with the same derived fields as an arc of a
/// circle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArcOfEllipse {
    /// The underlying ellipse.
    pub ellipse: Ellipse,
    /// Start parameter, in radians.
    pub start_angle: f64,
    /// End parameter, in radians.
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

impl Ellipse {
    pub(crate) fn from_edge(edge: &dyn EdgeCurve) -> Option<Ellipse> {
        let e = edge.as_ellipse()?;
        Some(Ellipse::from_curve(&e))
    }

    fn from_curve(e: &EllipseCurve) -> Ellipse {
        Ellipse {
            center: e.center,
            major: e.major,
            minor: e.minor,
            angle: e.rotation,
        }
    }
}

impl ArcOfEllipse {
    pub(crate) fn from_edge(edge: &dyn EdgeCurve) -> Option<ArcOfEllipse> {
        let ellipse = Ellipse::from_edge(edge)?;
        Some(ArcOfEllipse::from_curve(edge, ellipse))
    }

    pub(crate) fn from_curve(edge: &dyn EdgeCurve, ellipse: Ellipse) -> ArcOfEllipse {
        let s = ArcSamples::new(edge);
        ArcOfEllipse {
            ellipse,
            start_angle: s.start_angle,
            end_angle: s.end_angle,
            start_pnt: s.start,
            mid_pnt: s.mid,
            end_pnt: s.end,
            cw: s.cw,
            large_arc: s.large_arc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arc_of_ellipse_fields() {
        let curve = EllipseCurve::new(Point::ZERO, 4.0, 2.0, 0.0, 0.0, 4.0);
        let arc = ArcOfEllipse::from_edge(&curve).unwrap();
        assert_eq!(arc.ellipse.major, 4.0);
        assert_eq!(arc.ellipse.minor, 2.0);
        assert!(arc.large_arc);
        assert!(arc.start_pnt.distance(Point::planar(4.0, 0.0)) < 1e-12);
        assert!(arc.mid_pnt.distance(curve.eval(2.0)) < 1e-12);
    }
}
