// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ellipses and elliptical arcs.

use core::f64::consts::TAU;
use core::ops::Range;

use crate::kernel::{CurveKind, EdgeCurve};
use crate::{Point, Vec3};

/// An ellipse, or an arc of one, parameterized by eccentric angle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EllipseCurve {
    /// The center.
    pub center: Point,
    /// Radius along the major axis.
    pub major: f64,
    /// Radius along the minor axis.
    pub minor: f64,
    /// Angle of the major axis from the x axis, in radians.
    pub rotation: f64,
    /// Start of the parameter range.
    pub start_angle: f64,
    /// End of the parameter range.
    pub end_angle: f64,
}

impl EllipseCurve {
    /// Create an elliptical arc.
    pub fn new(
        center: impl Into<Point>,
        major: f64,
        minor: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Self {
        EllipseCurve {
            center: center.into(),
            major,
            minor,
            rotation,
            start_angle,
            end_angle,
        }
    }

    /// A full ellipse.
    pub fn full(center: impl Into<Point>, major: f64, minor: f64, rotation: f64) -> Self {
        EllipseCurve::new(center, major, minor, rotation, 0.0, TAU)
    }

    #[inline]
    fn axes(&self) -> (Vec3, Vec3) {
        let x = Vec3::from_angle(self.rotation);
        (x * self.major, x.perp() * self.minor)
    }
}

impl EdgeCurve for EllipseCurve {
    fn eval(&self, t: f64) -> Point {
        let (a, b) = self.axes();
        let (s, c) = t.sin_cos();
        self.center + a * c + b * s
    }

    fn bounds(&self) -> Range<f64> {
        self.start_angle..self.end_angle
    }

    fn kind(&self) -> CurveKind {
        CurveKind::Ellipse
    }

    fn clone_box(&self) -> Box<dyn EdgeCurve> {
        Box::new(*self)
    }

    fn as_ellipse(&self) -> Option<EllipseCurve> {
        Some(*self)
    }

    fn deriv(&self, t: f64) -> Vec3 {
        let (a, b) = self.axes();
        let (s, c) = t.sin_cos();
        b * c - a * s
    }

    fn deriv2(&self, t: f64) -> Vec3 {
        let (a, b) = self.axes();
        let (s, c) = t.sin_cos();
        -(a * c + b * s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn rotated_ellipse_points() {
        let e = EllipseCurve::full(Point::planar(1.0, 1.0), 3.0, 1.0, FRAC_PI_2);
        assert!(e.eval(0.0).distance(Point::planar(1.0, 4.0)) < 1e-12);
        assert!(e.eval(FRAC_PI_2).distance(Point::planar(0.0, 1.0)) < 1e-12);
        assert!(e.is_closed());
    }

    #[test]
    fn ellipse_perimeter() {
        // Ramanujan's second approximation is accurate to ~1e-10 here.
        let (a, b) = (5.0, 3.0);
        let h = ((a - b) / (a + b)) * ((a - b) / (a + b));
        let ramanujan = PI * (a + b) * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt()));
        let e = EllipseCurve::full(Point::ZERO, a, b, 0.3);
        assert!((e.length() - ramanujan).abs() < 1e-6, "{} vs {ramanujan}", e.length());
    }

    #[test]
    fn vertex_curvature() {
        let e = EllipseCurve::full(Point::ZERO, 4.0, 2.0, 0.0);
        // At the end of the major axis, k = a / b^2.
        let k = e.curvature(0.0).unwrap();
        assert!((k - 1.0).abs() < 1e-9);
    }
}
