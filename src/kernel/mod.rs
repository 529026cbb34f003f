// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The parametric curve kernel.
//!
//! Curve variants never evaluate geometry themselves; they hold a handle to
//! something implementing [`EdgeCurve`] and ask it for points, parameter
//! bounds and the curve family. Any curve library can sit behind the trait.
//! This module also provides a small built-in kernel ([`KernelEdge`]) that
//! covers lines, circles, ellipses, Bézier curves, B-splines and polylines.

use core::fmt;
use core::ops::Range;

use crate::common::{golden_section_min, integrate_gl8};
use crate::precision::CONFUSION;
use crate::{GeometryError, Point, Vec3};

mod bezier;
mod bspline;
mod circle;
mod edge;
mod ellipse;
mod line;
mod polyline;

pub(crate) use bezier::de_casteljau;
pub use bezier::BezierCurve;
pub use bspline::BSplineCurve;
pub use circle::CircleCurve;
pub use edge::{KernelCurve, KernelEdge};
pub use ellipse::EllipseCurve;
pub use line::Line;
pub use polyline::Polyline;

/// The mathematical family of a parametric curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CurveKind {
    /// A straight line.
    Line,
    /// A circle or circular arc.
    Circle,
    /// An ellipse or elliptical arc.
    Ellipse,
    /// A Bézier curve.
    Bezier,
    /// A B-spline curve.
    BSpline,
    /// Anything else.
    Other,
}

/// The result of a nearest-point query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nearest {
    /// The parameter of the nearest point on the curve.
    pub t: f64,
    /// The squared distance from the query to the nearest point.
    pub distance_sq: f64,
}

/// A finite parametric curve in the drawing plane.
///
/// Only [`eval`](EdgeCurve::eval), [`bounds`](EdgeCurve::bounds),
/// [`kind`](EdgeCurve::kind) and [`clone_box`](EdgeCurve::clone_box) are
/// required. Everything else has a numerical default built on `eval` that
/// a kernel may replace with a closed form.
pub trait EdgeCurve: fmt::Debug + Send + Sync {
    /// Evaluate the curve at parameter `t`.
    fn eval(&self, t: f64) -> Point;

    /// The parameter range of the curve.
    fn bounds(&self) -> Range<f64>;

    /// The family of the curve.
    fn kind(&self) -> CurveKind;

    /// Clone into a new box.
    fn clone_box(&self) -> Box<dyn EdgeCurve>;

    /// The point at the start of the parameter range.
    fn start(&self) -> Point {
        self.eval(self.bounds().start)
    }

    /// The point at the end of the parameter range.
    fn end(&self) -> Point {
        self.eval(self.bounds().end)
    }

    /// Whether the curve returns to its start.
    fn is_closed(&self) -> bool {
        self.start().is_equal(self.end(), CONFUSION)
    }

    /// Whether the edge runs against the curve's natural direction.
    fn is_reversed(&self) -> bool {
        false
    }

    /// The underlying circle, if this is a circular curve.
    fn as_circle(&self) -> Option<CircleCurve> {
        None
    }

    /// The underlying ellipse, if this is an elliptical curve.
    fn as_ellipse(&self) -> Option<EllipseCurve> {
        None
    }

    /// Control points, for Bézier and B-spline curves.
    fn poles(&self) -> Option<&[Point]> {
        None
    }

    /// A stored discretization of the curve, if the kernel keeps one.
    fn polygon(&self) -> Option<Vec<Point>> {
        None
    }

    /// An exact decomposition into Bézier control polygons, if available.
    fn bezier_segments(&self) -> Option<Vec<Vec<Point>>> {
        None
    }

    /// First derivative with respect to the parameter.
    fn deriv(&self, t: f64) -> Vec3 {
        numeric_deriv(self, t)
    }

    /// Second derivative with respect to the parameter.
    fn deriv2(&self, t: f64) -> Vec3 {
        numeric_deriv2(self, t)
    }

    /// Unsigned curvature at `t`.
    ///
    /// Returns `None` where the curve is stationary.
    fn curvature(&self, t: f64) -> Option<f64> {
        signed_curvature(self.deriv(t), self.deriv2(t)).map(f64::abs)
    }

    /// Center of the osculating circle at `t`.
    ///
    /// Returns `None` where the curve is straight or stationary.
    fn center_of_curvature(&self, t: f64) -> Option<Point> {
        let d = self.deriv(t);
        let k = signed_curvature(d, self.deriv2(t))?;
        if k.abs() < f64::EPSILON {
            return None;
        }
        let normal = d.perp().normalize()?;
        let center = self.eval(t) + normal * k.recip();
        center.is_finite().then_some(center)
    }

    /// The arc length over a parameter range.
    fn arclen(&self, range: Range<f64>, accuracy: f64) -> f64 {
        adaptive_arclen(self, range, accuracy)
    }

    /// The total arc length.
    fn length(&self) -> f64 {
        self.arclen(self.bounds(), crate::precision::QUERY_ACCURACY)
    }

    /// Solve for the parameter that has the given arc length from the start.
    ///
    /// Returns `None` if the search does not converge or `arclen` is outside
    /// the curve.
    fn inv_arclen(&self, arclen: f64, accuracy: f64) -> Option<f64> {
        bisect_arclen(self, arclen, accuracy)
    }

    /// Find the point on the curve nearest to `p`.
    ///
    /// Returns `None` if the curve cannot be evaluated.
    fn nearest(&self, p: Point, accuracy: f64) -> Option<Nearest> {
        sampled_nearest(self, p, accuracy)
    }
}

impl Clone for Box<dyn EdgeCurve> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// A circle radius must be positive and finite.
pub(crate) fn check_radius(radius: f64) -> Result<(), GeometryError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidGeometry(format!(
            "circle radius {radius} is not positive"
        )))
    }
}

/// Ellipse axes must satisfy `major >= minor > 0`.
pub(crate) fn check_axes(major: f64, minor: f64) -> Result<(), GeometryError> {
    if major.is_finite() && minor.is_finite() && minor > 0.0 && major >= minor {
        Ok(())
    } else {
        Err(GeometryError::InvalidGeometry(format!(
            "ellipse axes {major} and {minor} do not satisfy major >= minor > 0"
        )))
    }
}

/// Apply the validity heuristic to an edge.
///
/// Rejects non-finite geometry, empty parameter ranges, and edges too short
/// to draw. Circles need a positive radius and ellipses a major axis no
/// shorter than a positive minor axis.
pub fn validate_edge(edge: &dyn EdgeCurve) -> Result<(), GeometryError> {
    if let Some(circle) = edge.as_circle() {
        check_radius(circle.radius)?;
    }
    if let Some(ellipse) = edge.as_ellipse() {
        check_axes(ellipse.major, ellipse.minor)?;
    }
    let range = edge.bounds();
    if !range.start.is_finite() || !range.end.is_finite() {
        return Err(GeometryError::InvalidGeometry(
            "parameter range is not finite".into(),
        ));
    }
    if range.end <= range.start {
        return Err(GeometryError::InvalidGeometry(format!(
            "empty parameter range {}..{}",
            range.start, range.end
        )));
    }
    const N: usize = 8;
    let mut prev = edge.eval(range.start);
    let mut rough_len = 0.0;
    for i in 1..=N {
        let t = range.start + (range.end - range.start) * (i as f64 / N as f64);
        let p = edge.eval(t);
        if !p.is_finite() || !prev.is_finite() {
            return Err(GeometryError::InvalidGeometry(format!(
                "curve evaluates to a non-finite point near t = {t}"
            )));
        }
        rough_len += prev.distance(p);
        prev = p;
    }
    if rough_len < CONFUSION {
        return Err(GeometryError::InvalidGeometry(format!(
            "edge length {rough_len:e} is below the confusion tolerance"
        )));
    }
    Ok(())
}

#[inline]
fn signed_curvature(d: Vec3, d2: Vec3) -> Option<f64> {
    let speed2 = d.length_squared();
    if !(speed2 > 0.0) {
        return None;
    }
    let k = d.cross_z(d2) * speed2.powf(-1.5);
    k.is_finite().then_some(k)
}

fn deriv_step<C: EdgeCurve + ?Sized>(curve: &C, scale: f64) -> (Range<f64>, f64) {
    let range = curve.bounds();
    let h = (range.end - range.start).abs().max(1e-3) * scale;
    (range, h)
}

/// Central-difference first derivative, one-sided at the ends.
pub(crate) fn numeric_deriv<C: EdgeCurve + ?Sized>(curve: &C, t: f64) -> Vec3 {
    let (range, h) = deriv_step(curve, 1e-6);
    if t - h < range.start {
        let (p0, p1, p2) = (curve.eval(t), curve.eval(t + h), curve.eval(t + 2.0 * h));
        ((p1 - p0) * 4.0 - (p2 - p0)) / (2.0 * h)
    } else if t + h > range.end {
        let (p0, p1, p2) = (curve.eval(t), curve.eval(t - h), curve.eval(t - 2.0 * h));
        ((p1 - p0) * 4.0 - (p2 - p0)) / (-2.0 * h)
    } else {
        (curve.eval(t + h) - curve.eval(t - h)) / (2.0 * h)
    }
}

/// Central-difference second derivative, one-sided at the ends.
pub(crate) fn numeric_deriv2<C: EdgeCurve + ?Sized>(curve: &C, t: f64) -> Vec3 {
    let (range, h) = deriv_step(curve, 1e-4);
    let sample = |dir: f64| {
        let p0 = curve.eval(t);
        let p1 = curve.eval(t + dir * h);
        let p2 = curve.eval(t + dir * 2.0 * h);
        let p3 = curve.eval(t + dir * 3.0 * h);
        // 2 f0 - 5 f1 + 4 f2 - f3, expressed on displacements from f0.
        ((p2 - p0) * 4.0 - (p1 - p0) * 5.0 - (p3 - p0)) / (h * h)
    };
    if t - h < range.start {
        sample(1.0)
    } else if t + h > range.end {
        sample(-1.0)
    } else {
        let p0 = curve.eval(t);
        ((curve.eval(t + h) - p0) + (curve.eval(t - h) - p0)) / (h * h)
    }
}

fn adaptive_arclen<C: EdgeCurve + ?Sized>(curve: &C, range: Range<f64>, accuracy: f64) -> f64 {
    const MAX_DEPTH: usize = 16;
    // Coarse start so a closed curve is never judged from a single panel.
    const INITIAL_PANELS: usize = 8;
    let speed = |t: f64| curve.deriv(t).length();
    fn rec(
        speed: &impl Fn(f64) -> f64,
        a: f64,
        b: f64,
        whole: f64,
        accuracy: f64,
        depth: usize,
    ) -> f64 {
        let m = 0.5 * (a + b);
        let left = integrate_gl8(speed, a, m);
        let right = integrate_gl8(speed, m, b);
        let halves = left + right;
        if (halves - whole).abs() <= accuracy || depth >= MAX_DEPTH {
            halves
        } else {
            rec(speed, a, m, left, accuracy * 0.5, depth + 1)
                + rec(speed, m, b, right, accuracy * 0.5, depth + 1)
        }
    }
    let (a, b) = (range.start, range.end);
    if b <= a {
        return 0.0;
    }
    let step = (b - a) / INITIAL_PANELS as f64;
    let panel_accuracy = accuracy / INITIAL_PANELS as f64;
    (0..INITIAL_PANELS)
        .map(|i| {
            let t0 = a + step * i as f64;
            let t1 = if i + 1 == INITIAL_PANELS { b } else { t0 + step };
            rec(&speed, t0, t1, integrate_gl8(&speed, t0, t1), panel_accuracy, 0)
        })
        .sum()
}

fn bisect_arclen<C: EdgeCurve + ?Sized>(curve: &C, arclen: f64, accuracy: f64) -> Option<f64> {
    let range = curve.bounds();
    let total = curve.arclen(range.clone(), accuracy);
    if !total.is_finite() || arclen < -accuracy || arclen > total + accuracy {
        return None;
    }
    // invariant: the curve's arclen on [range.start..t_last] + remaining = arclen
    let mut remaining = arclen;
    let mut t_last = range.start;
    let mut t0 = range.start;
    let mut t1 = range.end;
    let inner_accuracy = accuracy * 0.1;
    const MAX_ITER: usize = 64;
    for _ in 0..MAX_ITER {
        let tm = 0.5 * (t0 + t1);
        let (seg, dir) = if tm > t_last {
            (t_last..tm, 1.0)
        } else {
            (tm..t_last, -1.0)
        };
        let range_size = seg.end - seg.start;
        let arc = curve.arclen(seg, inner_accuracy);
        if !arc.is_finite() {
            return None;
        }
        remaining -= arc * dir;
        if remaining.abs() < accuracy {
            // Allocate remaining arc evenly.
            let t = if arc > 0.0 {
                tm + range_size * remaining / arc
            } else {
                tm
            };
            return Some(t.clamp(range.start, range.end));
        }
        if remaining > 0.0 {
            t0 = tm;
        } else {
            t1 = tm;
        }
        t_last = tm;
    }
    None
}

fn sampled_nearest<C: EdgeCurve + ?Sized>(curve: &C, p: Point, accuracy: f64) -> Option<Nearest> {
    const N: usize = 64;
    let range = curve.bounds();
    let step = (range.end - range.start) / N as f64;
    let dist = |t: f64| curve.eval(t).distance_squared(p);
    let mut best: Option<(usize, f64)> = None;
    for i in 0..=N {
        let d = dist(range.start + step * i as f64);
        if d.is_finite() && best.map(|(_, best_d)| d < best_d).unwrap_or(true) {
            best = Some((i, d));
        }
    }
    let (i, sample_d) = best?;
    let lo = range.start + step * i.saturating_sub(1) as f64;
    let hi = (range.start + step * (i + 1).min(N) as f64).min(range.end);
    let (t, d) = golden_section_min(dist, lo, hi, accuracy.max(f64::EPSILON));
    if d.is_finite() && d <= sample_d {
        Some(Nearest { t, distance_sq: d })
    } else {
        Some(Nearest {
            t: range.start + step * i as f64,
            distance_sq: sample_d,
        })
    }
}
