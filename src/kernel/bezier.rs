// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bézier curves of any degree.

use core::ops::Range;

use smallvec::SmallVec;

use crate::kernel::{CurveKind, EdgeCurve};
use crate::{Point, Vec3};

/// A Bézier curve given by its control points, parameterized over `0..1`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BezierCurve {
    poles: SmallVec<[Point; 4]>,
}

impl BezierCurve {
    /// Create a curve from its control points.
    ///
    /// Returns `None` for fewer than two points.
    pub fn new(poles: impl IntoIterator<Item = Point>) -> Option<BezierCurve> {
        let poles: SmallVec<[Point; 4]> = poles.into_iter().collect();
        (poles.len() >= 2).then_some(BezierCurve { poles })
    }

    /// The polynomial degree.
    #[inline]
    pub fn degree(&self) -> usize {
        self.poles.len() - 1
    }

    /// Raise the degree by one without changing the curve.
    #[must_use]
    pub fn elevate(&self) -> BezierCurve {
        BezierCurve {
            poles: elevate_poles(&self.poles).into(),
        }
    }
}

/// De Casteljau evaluation of a control polygon.
pub(crate) fn de_casteljau(poles: &[Point], t: f64) -> Point {
    let mut work: SmallVec<[Point; 8]> = poles.iter().copied().collect();
    let n = work.len();
    for level in 1..n {
        for i in 0..n - level {
            work[i] = work[i].lerp(work[i + 1], t);
        }
    }
    work.first().copied().unwrap_or(Point::ZERO)
}

/// Degree elevation of a control polygon.
pub(crate) fn elevate_poles(poles: &[Point]) -> Vec<Point> {
    let n = poles.len();
    if n == 0 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(n + 1);
    out.push(poles[0]);
    for i in 1..n {
        let a = i as f64 / n as f64;
        out.push(poles[i - 1] + (poles[i] - poles[i - 1]) * (1.0 - a));
    }
    out.push(poles[n - 1]);
    out
}

fn hodograph(poles: &[Point]) -> SmallVec<[Point; 4]> {
    let n = poles.len().saturating_sub(1) as f64;
    poles
        .windows(2)
        .map(|w| ((w[1] - w[0]) * n).to_point())
        .collect()
}

impl EdgeCurve for BezierCurve {
    fn eval(&self, t: f64) -> Point {
        de_casteljau(&self.poles, t)
    }

    fn bounds(&self) -> Range<f64> {
        0.0..1.0
    }

    fn kind(&self) -> CurveKind {
        CurveKind::Bezier
    }

    fn clone_box(&self) -> Box<dyn EdgeCurve> {
        Box::new(self.clone())
    }

    #[inline]
    fn start(&self) -> Point {
        self.poles[0]
    }

    #[inline]
    fn end(&self) -> Point {
        self.poles[self.poles.len() - 1]
    }

    fn poles(&self) -> Option<&[Point]> {
        Some(&self.poles)
    }

    fn bezier_segments(&self) -> Option<Vec<Vec<Point>>> {
        (self.degree() <= 3).then(|| vec![self.poles.to_vec()])
    }

    fn deriv(&self, t: f64) -> Vec3 {
        if self.poles.len() < 2 {
            return Vec3::ZERO;
        }
        de_casteljau(&hodograph(&self.poles), t).to_vec3()
    }

    fn deriv2(&self, t: f64) -> Vec3 {
        if self.poles.len() < 3 {
            return Vec3::ZERO;
        }
        de_casteljau(&hodograph(&hodograph(&self.poles)), t).to_vec3()
    }
}
