// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Circles and circular arcs.

use core::f64::consts::TAU;
use core::ops::Range;

use crate::common::{circle_through, normalize_angle};
use crate::kernel::{CurveKind, EdgeCurve, Nearest};
use crate::{Point, Vec3};

/// A circle, or an arc of one, parameterized by angle.
///
/// The parameter runs counter-clockwise from `start_angle` to `end_angle`,
/// with `end_angle > start_angle`. A full circle spans `0..2π`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CircleCurve {
    /// The center.
    pub center: Point,
    /// The radius.
    pub radius: f64,
    /// Angle at the start of the parameter range, in radians.
    pub start_angle: f64,
    /// Angle at the end of the parameter range, in radians.
    pub end_angle: f64,
}

impl CircleCurve {
    /// Create a circular arc.
    #[inline]
    pub fn new(center: impl Into<Point>, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        CircleCurve {
            center: center.into(),
            radius,
            start_angle,
            end_angle,
        }
    }

    /// A full circle.
    #[inline]
    pub fn full(center: impl Into<Point>, radius: f64) -> Self {
        CircleCurve::new(center, radius, 0.0, TAU)
    }

    /// The full circle through three points.
    ///
    /// Returns `None` when the points are collinear.
    pub fn through(a: Point, b: Point, c: Point) -> Option<CircleCurve> {
        let (center, radius) = circle_through(a, b, c)?;
        Some(CircleCurve::full(center, radius))
    }

    /// The arc from `start` through `mid` to `end`.
    ///
    /// The returned curve always runs counter-clockwise; the flag is true
    /// when the arc as given runs clockwise, so the edge must be reversed
    /// to go from `start` to `end`.
    pub fn arc_through(start: Point, mid: Point, end: Point) -> Option<(CircleCurve, bool)> {
        let (center, radius) = circle_through(start, mid, end)?;
        let clockwise = (start - mid).cross_z(end - mid) > 0.0;
        let (from, to) = if clockwise { (end, start) } else { (start, end) };
        let a0 = normalize_angle((from - center).atan2());
        let mut a1 = normalize_angle((to - center).atan2());
        if a1 <= a0 {
            a1 += TAU;
        }
        Some((CircleCurve::new(center, radius, a0, a1), clockwise))
    }

    /// The angular span of the arc.
    #[inline]
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Does the arc cover the whole circle?
    #[inline]
    pub fn is_full(&self) -> bool {
        self.sweep() >= TAU - 1e-12
    }

    /// Does the arc's angular range contain the angle of `p`?
    pub fn contains_angle(&self, angle: f64) -> bool {
        if self.is_full() {
            return true;
        }
        let rel = normalize_angle(angle - self.start_angle);
        rel <= self.sweep() + 1e-12
    }
}

impl EdgeCurve for CircleCurve {
    #[inline]
    fn eval(&self, t: f64) -> Point {
        self.center + Vec3::from_angle(t) * self.radius
    }

    #[inline]
    fn bounds(&self) -> Range<f64> {
        self.start_angle..self.end_angle
    }

    fn kind(&self) -> CurveKind {
        CurveKind::Circle
    }

    fn clone_box(&self) -> Box<dyn EdgeCurve> {
        Box::new(*self)
    }

    fn as_circle(&self) -> Option<CircleCurve> {
        Some(*self)
    }

    #[inline]
    fn deriv(&self, t: f64) -> Vec3 {
        Vec3::from_angle(t).perp() * self.radius
    }

    #[inline]
    fn deriv2(&self, t: f64) -> Vec3 {
        -Vec3::from_angle(t) * self.radius
    }

    fn curvature(&self, _t: f64) -> Option<f64> {
        (self.radius > 0.0).then(|| self.radius.recip())
    }

    fn center_of_curvature(&self, _t: f64) -> Option<Point> {
        (self.radius > 0.0).then_some(self.center)
    }

    fn arclen(&self, range: Range<f64>, _accuracy: f64) -> f64 {
        (range.end - range.start).abs() * self.radius
    }

    fn inv_arclen(&self, arclen: f64, _accuracy: f64) -> Option<f64> {
        let total = self.sweep() * self.radius;
        if !(self.radius > 0.0) || arclen < 0.0 || arclen > total {
            return None;
        }
        Some(self.start_angle + arclen / self.radius)
    }

    fn nearest(&self, p: Point, _accuracy: f64) -> Option<Nearest> {
        let v = p - self.center;
        let candidate = if v.length_squared() > 0.0 {
            let angle = v.atan2();
            if self.contains_angle(angle) {
                let rel = normalize_angle(angle - self.start_angle);
                Some(self.start_angle + rel.min(self.sweep()))
            } else {
                None
            }
        } else {
            // Every point of the circle is equally near the center.
            Some(self.start_angle)
        };
        let t = candidate.unwrap_or_else(|| {
            let d0 = p.distance_squared(self.eval(self.start_angle));
            let d1 = p.distance_squared(self.eval(self.end_angle));
            if d0 <= d1 {
                self.start_angle
            } else {
                self.end_angle
            }
        });
        let distance_sq = p.distance_squared(self.eval(t));
        distance_sq.is_finite().then_some(Nearest { t, distance_sq })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_PI_2, PI};
    use rand::{Rng, SeedableRng};

    #[test]
    fn samples_lie_on_circle() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(17);
        for _ in 0..100 {
            let center = Point::planar(rng.random_range(-100.0..100.0), rng.random_range(-100.0..100.0));
            let r = rng.random_range(0.01..50.0);
            let c = CircleCurve::full(center, r);
            for _ in 0..20 {
                let t = rng.random_range(c.bounds());
                let d = c.eval(t).distance(center);
                assert!((d - r).abs() < 1e-9, "{d} != {r}");
            }
        }
    }

    #[test]
    fn arc_through_ccw() {
        let (arc, cw) = CircleCurve::arc_through(
            Point::planar(1.0, 0.0),
            Point::planar(0.0, 1.0),
            Point::planar(-1.0, 0.0),
        )
        .unwrap();
        assert!(!cw);
        assert!(arc.center.distance(Point::ZERO) < 1e-12);
        assert!(arc.start_angle.abs() < 1e-12);
        assert!((arc.end_angle - PI).abs() < 1e-12);
    }

    #[test]
    fn arc_through_cw() {
        let (arc, cw) = CircleCurve::arc_through(
            Point::planar(-1.0, 0.0),
            Point::planar(0.0, 1.0),
            Point::planar(1.0, 0.0),
        )
        .unwrap();
        assert!(cw);
        // Stored counter-clockwise from the given end to the given start.
        assert!(arc.start().distance(Point::planar(1.0, 0.0)) < 1e-12);
        assert!(arc.end().distance(Point::planar(-1.0, 0.0)) < 1e-12);
        assert!(arc.eval(FRAC_PI_2).distance(Point::planar(0.0, 1.0)) < 1e-12);
    }

    #[test]
    fn arc_nearest_outside_span() {
        let arc = CircleCurve::new(Point::ZERO, 1.0, 0.0, FRAC_PI_2);
        let n = arc.nearest(Point::planar(0.0, -3.0), 1e-9).unwrap();
        assert_eq!(n.t, 0.0);
        let n = arc.nearest(Point::planar(2.0, 2.0), 1e-9).unwrap();
        assert!((n.t - PI / 4.0).abs() < 1e-12);
        assert!((n.distance_sq.sqrt() - (8.0f64.sqrt() - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn exact_arclen() {
        let c = CircleCurve::full(Point::ZERO, 2.0);
        assert!((c.length() - 4.0 * PI).abs() < 1e-12);
        let t = c.inv_arclen(PI, 1e-9).unwrap();
        assert!((t - FRAC_PI_2).abs() < 1e-12);
        assert!(c.is_closed());
    }
}
