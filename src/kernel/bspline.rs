// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! B-spline curves, optionally rational.

use core::ops::Range;

use smallvec::SmallVec;

use crate::kernel::bezier::elevate_poles;
use crate::kernel::{CurveKind, EdgeCurve};
use crate::{Point, Vec3};

/// A B-spline curve with an explicit knot vector.
///
/// The knot vector is stored flat, with repeated knots written out, so it
/// has `poles.len() + degree + 1` entries. When weights are present the
/// curve is rational and evaluated in homogeneous coordinates.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BSplineCurve {
    poles: Vec<Point>,
    weights: Option<Vec<f64>>,
    knots: Vec<f64>,
    degree: usize,
}

/// A pole in homogeneous form: `(x w, y w, z w, w)`.
type Homogeneous = [f64; 4];

#[inline]
fn lift(p: Point, w: f64) -> Homogeneous {
    [p.x * w, p.y * w, p.z * w, w]
}

#[inline]
fn project(h: Homogeneous) -> Point {
    Point::new(h[0] / h[3], h[1] / h[3], h[2] / h[3])
}

#[inline]
fn blend(a: Homogeneous, b: Homogeneous, alpha: f64) -> Homogeneous {
    let beta = 1.0 - alpha;
    [
        beta * a[0] + alpha * b[0],
        beta * a[1] + alpha * b[1],
        beta * a[2] + alpha * b[2],
        beta * a[3] + alpha * b[3],
    ]
}

impl BSplineCurve {
    /// Create a curve from its parts.
    ///
    /// Returns `None` if the knot vector has the wrong length or is
    /// decreasing, if the weights do not match the poles or are not
    /// positive, or if there are too few poles for the degree.
    pub fn new(
        poles: Vec<Point>,
        weights: Option<Vec<f64>>,
        knots: Vec<f64>,
        degree: usize,
    ) -> Option<BSplineCurve> {
        if degree == 0 || poles.len() <= degree {
            return None;
        }
        if knots.len() != poles.len() + degree + 1 {
            return None;
        }
        if knots.windows(2).any(|w| !(w[0] <= w[1])) {
            return None;
        }
        if knots[degree] >= knots[poles.len()] {
            return None;
        }
        if let Some(w) = &weights {
            if w.len() != poles.len() || w.iter().any(|w| !(*w > 0.0)) {
                return None;
            }
        }
        Some(BSplineCurve {
            poles,
            weights,
            knots,
            degree,
        })
    }

    /// A non-rational curve with clamped, uniformly spaced knots on `0..1`.
    pub fn clamped_uniform(poles: Vec<Point>, degree: usize) -> Option<BSplineCurve> {
        if degree == 0 || poles.len() <= degree {
            return None;
        }
        let spans = poles.len() - degree;
        let mut knots = vec![0.0; degree + 1];
        knots.extend((1..spans).map(|i| i as f64 / spans as f64));
        knots.extend(core::iter::repeat(1.0).take(degree + 1));
        BSplineCurve::new(poles, None, knots, degree)
    }

    /// Join Bézier control polygons into one curve.
    ///
    /// Segments are elevated to a common degree and the end pole of each
    /// is shared with the start of the next. Segment `i` covers the
    /// parameter range `i..i + 1`.
    pub fn from_bezier_segments(segments: &[Vec<Point>]) -> Option<BSplineCurve> {
        let degree = segments.iter().map(|s| s.len().saturating_sub(1)).max()?;
        if degree == 0 || segments.iter().any(|s| s.len() < 2) {
            return None;
        }
        let mut poles = Vec::with_capacity(segments.len() * degree + 1);
        for (i, segment) in segments.iter().enumerate() {
            let mut elevated = segment.clone();
            while elevated.len() - 1 < degree {
                elevated = elevate_poles(&elevated);
            }
            let skip = if i == 0 { 0 } else { 1 };
            poles.extend(elevated.into_iter().skip(skip));
        }
        let n_seg = segments.len();
        let mut knots = vec![0.0; degree + 1];
        for i in 1..n_seg {
            knots.extend(core::iter::repeat(i as f64).take(degree));
        }
        knots.extend(core::iter::repeat(n_seg as f64).take(degree + 1));
        BSplineCurve::new(poles, None, knots, degree)
    }

    /// The polynomial degree.
    #[inline]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// The flat knot vector.
    #[inline]
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// The weights, if the curve is rational.
    #[inline]
    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    /// Whether the weights actually differ from each other.
    pub fn is_rational(&self) -> bool {
        match &self.weights {
            Some(w) => w.iter().any(|x| (x - w[0]).abs() > f64::EPSILON),
            None => false,
        }
    }

    /// Whether the curve interpolates its end poles.
    pub fn is_clamped(&self) -> bool {
        let p = self.degree;
        let n = self.knots.len();
        self.knots[..=p].iter().all(|k| *k == self.knots[0])
            && self.knots[n - p - 1..].iter().all(|k| *k == self.knots[n - 1])
    }

    #[inline]
    fn weight(&self, i: usize) -> f64 {
        self.weights.as_ref().map_or(1.0, |w| w[i])
    }

    /// Index `k` of the knot span with `knots[k] <= u < knots[k + 1]`.
    fn find_span(&self, u: f64) -> usize {
        let n = self.poles.len();
        let p = self.degree;
        if u >= self.knots[n] {
            // Last non-empty span.
            let mut k = n - 1;
            while k > p && self.knots[k] >= self.knots[n] {
                k -= 1;
            }
            return k;
        }
        if u <= self.knots[p] {
            let mut k = p;
            while k + 1 < n && self.knots[k + 1] <= u {
                k += 1;
            }
            return k;
        }
        let (mut low, mut high) = (p, n);
        let mut mid = (low + high) / 2;
        while u < self.knots[mid] || u >= self.knots[mid + 1] {
            if u < self.knots[mid] {
                high = mid;
            } else {
                low = mid;
            }
            mid = (low + high) / 2;
        }
        mid
    }

    fn de_boor(&self, u: f64) -> Point {
        let p = self.degree;
        let k = self.find_span(u);
        let mut d: SmallVec<[Homogeneous; 4]> = (0..=p)
            .map(|j| lift(self.poles[j + k - p], self.weight(j + k - p)))
            .collect();
        for r in 1..=p {
            for j in (r..=p).rev() {
                let lo = self.knots[j + k - p];
                let hi = self.knots[j + 1 + k - r];
                let alpha = if hi > lo { (u - lo) / (hi - lo) } else { 0.0 };
                d[j] = blend(d[j - 1], d[j], alpha);
            }
        }
        project(d[p])
    }

    /// The derivative as a curve of one lower degree.
    ///
    /// Only available for non-rational curves.
    fn derivative_curve(&self) -> Option<BSplineCurve> {
        if self.is_rational() || self.degree == 0 {
            return None;
        }
        let p = self.degree;
        let poles = self
            .poles
            .windows(2)
            .enumerate()
            .map(|(i, w)| {
                let span = self.knots[i + p + 1] - self.knots[i + 1];
                if span > 0.0 {
                    ((w[1] - w[0]) * (p as f64 / span)).to_point()
                } else {
                    Point::ZERO
                }
            })
            .collect();
        Some(BSplineCurve {
            poles,
            weights: None,
            knots: self.knots[1..self.knots.len() - 1].to_vec(),
            degree: p - 1,
        })
    }

    /// Insert a knot once, leaving the curve unchanged.
    #[must_use]
    pub fn insert_knot(&self, u: f64) -> BSplineCurve {
        let p = self.degree;
        let range = self.bounds();
        if !(u > range.start && u < range.end) {
            return self.clone();
        }
        let k = self.find_span(u);
        let n = self.poles.len();
        let mut lifted = Vec::with_capacity(n + 1);
        for i in 0..=n {
            let h = if i + p <= k {
                lift(self.poles[i], self.weight(i))
            } else if i > k {
                lift(self.poles[i - 1], self.weight(i - 1))
            } else {
                let alpha = (u - self.knots[i]) / (self.knots[i + p] - self.knots[i]);
                blend(
                    lift(self.poles[i - 1], self.weight(i - 1)),
                    lift(self.poles[i], self.weight(i)),
                    alpha,
                )
            };
            lifted.push(h);
        }
        let mut knots = self.knots.clone();
        knots.insert(k + 1, u);
        let weights = self
            .weights
            .as_ref()
            .map(|_| lifted.iter().map(|h| h[3]).collect());
        BSplineCurve {
            poles: lifted.into_iter().map(project).collect(),
            weights,
            knots,
            degree: p,
        }
    }

    fn multiplicity(&self, u: f64) -> usize {
        self.knots.iter().filter(|k| **k == u).count()
    }
}

impl EdgeCurve for BSplineCurve {
    fn eval(&self, t: f64) -> Point {
        self.de_boor(t)
    }

    fn bounds(&self) -> Range<f64> {
        self.knots[self.degree]..self.knots[self.poles.len()]
    }

    fn kind(&self) -> CurveKind {
        CurveKind::BSpline
    }

    fn clone_box(&self) -> Box<dyn EdgeCurve> {
        Box::new(self.clone())
    }

    fn poles(&self) -> Option<&[Point]> {
        Some(&self.poles)
    }

    /// Exact extraction for clamped, non-rational curves of degree 3 or less.
    fn bezier_segments(&self) -> Option<Vec<Vec<Point>>> {
        let p = self.degree;
        if p > 3 || self.is_rational() || !self.is_clamped() {
            return None;
        }
        let range = self.bounds();
        let mut interior: Vec<f64> = self
            .knots
            .iter()
            .copied()
            .filter(|k| *k > range.start && *k < range.end)
            .collect();
        interior.dedup();
        let mut curve = self.clone();
        for u in interior {
            while curve.multiplicity(u) < p {
                curve = curve.insert_knot(u);
            }
        }
        let n_seg = (curve.poles.len() - 1) / p;
        Some(
            (0..n_seg)
                .map(|s| curve.poles[s * p..=s * p + p].to_vec())
                .collect(),
        )
    }

    fn deriv(&self, t: f64) -> Vec3 {
        match self.derivative_curve() {
            Some(d) => d.de_boor(t).to_vec3(),
            None => crate::kernel::numeric_deriv(self, t),
        }
    }

    fn deriv2(&self, t: f64) -> Vec3 {
        match self.derivative_curve() {
            Some(d) if d.degree == 0 => Vec3::ZERO,
            Some(d) => d.deriv(t),
            None => crate::kernel::numeric_deriv2(self, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_1_SQRT_2;

    fn wavy() -> BSplineCurve {
        BSplineCurve::clamped_uniform(
            vec![
                Point::planar(0.0, 0.0),
                Point::planar(1.0, 2.0),
                Point::planar(3.0, -1.0),
                Point::planar(4.0, 1.0),
                Point::planar(6.0, 0.0),
                Point::planar(7.0, 3.0),
            ],
            3,
        )
        .unwrap()
    }

    #[test]
    fn clamped_endpoints() {
        let c = wavy();
        assert_eq!(c.bounds(), 0.0..1.0);
        assert!(c.start().distance(Point::planar(0.0, 0.0)) < 1e-12);
        assert!(c.end().distance(Point::planar(7.0, 3.0)) < 1e-12);
        assert!(c.is_clamped());
    }

    #[test]
    fn invalid_construction() {
        assert!(BSplineCurve::clamped_uniform(vec![Point::ZERO, Point::planar(1.0, 0.0)], 2).is_none());
        let poles = vec![Point::ZERO, Point::planar(1.0, 0.0), Point::planar(2.0, 0.0)];
        assert!(BSplineCurve::new(poles.clone(), None, vec![0.0, 0.0, 1.0, 1.0], 2).is_none());
        assert!(BSplineCurve::new(poles.clone(), Some(vec![1.0, 0.0, 1.0]), vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0], 2).is_none());
        assert!(BSplineCurve::new(poles, None, vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0], 2).is_some());
    }

    #[test]
    fn knot_insertion_preserves_shape() {
        let c = wavy();
        let refined = c.insert_knot(0.3).insert_knot(0.3).insert_knot(0.71);
        assert_eq!(refined.poles.len(), c.poles.len() + 3);
        for i in 0..=20 {
            let t = i as f64 / 20.0;
            assert!(c.eval(t).distance(refined.eval(t)) < 1e-12, "t = {t}");
        }
    }

    #[test]
    fn bezier_extraction() {
        let c = wavy();
        let segments = c.bezier_segments().unwrap();
        // Three interior spans for six poles of degree three.
        assert_eq!(segments.len(), 3);
        let spans = [0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0];
        for (s, seg) in segments.iter().enumerate() {
            assert_eq!(seg.len(), 4);
            for i in 0..=10 {
                let local = i as f64 / 10.0;
                let t = spans[s] + (spans[s + 1] - spans[s]) * local;
                let b = crate::kernel::bezier::de_casteljau(seg, local);
                assert!(b.distance(c.eval(t)) < 1e-9);
            }
        }
    }

    #[test]
    fn from_segments_round_trip() {
        let line = vec![Point::planar(0.0, 0.0), Point::planar(1.0, 0.0)];
        let cubic = vec![
            Point::planar(1.0, 0.0),
            Point::planar(2.0, 1.0),
            Point::planar(3.0, 1.0),
            Point::planar(4.0, 0.0),
        ];
        let c = BSplineCurve::from_bezier_segments(&[line, cubic]).unwrap();
        assert_eq!(c.degree(), 3);
        assert_eq!(c.bounds(), 0.0..2.0);
        assert!(c.eval(0.5).distance(Point::planar(0.5, 0.0)) < 1e-12);
        assert!(c.eval(2.0).distance(Point::planar(4.0, 0.0)) < 1e-12);
        assert_eq!(c.bezier_segments().unwrap().len(), 2);
    }

    #[test]
    fn rational_quarter_circle() {
        let c = BSplineCurve::new(
            vec![Point::planar(1.0, 0.0), Point::planar(1.0, 1.0), Point::planar(0.0, 1.0)],
            Some(vec![1.0, FRAC_1_SQRT_2, 1.0]),
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            2,
        )
        .unwrap();
        assert!(c.is_rational());
        assert!(c.bezier_segments().is_none());
        for i in 0..=10 {
            let p = c.eval(i as f64 / 10.0);
            assert!((p.distance(Point::ZERO) - 1.0).abs() < 1e-12);
        }
        let split = c.insert_knot(0.5);
        assert!(split.eval(0.25).distance(c.eval(0.25)) < 1e-12);
    }

    #[test]
    fn analytic_derivative() {
        let c = wavy();
        for &t in &[0.0, 0.1, 0.5, 0.77, 1.0] {
            let exact = c.deriv(t);
            let numeric = crate::kernel::numeric_deriv(&c, t);
            assert!((exact - numeric).length() < 1e-4, "{t}: {exact:?} vs {numeric:?}");
        }
    }
}
