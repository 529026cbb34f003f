// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Oriented edges over the built-in curve types.

use core::ops::Range;

use crate::kernel::{
    BSplineCurve, BezierCurve, CircleCurve, CurveKind, EdgeCurve, EllipseCurve, Line, Nearest,
    Polyline,
};
use crate::{Point, Vec3};

/// One of the built-in curve types.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KernelCurve {
    /// A line segment.
    Line(Line),
    /// A circle or circular arc.
    Circle(CircleCurve),
    /// An ellipse or elliptical arc.
    Ellipse(EllipseCurve),
    /// A Bézier curve.
    Bezier(BezierCurve),
    /// A B-spline.
    BSpline(BSplineCurve),
    /// A polyline.
    Polyline(Polyline),
}

impl KernelCurve {
    /// The curve as a trait object.
    pub fn as_dyn(&self) -> &dyn EdgeCurve {
        match self {
            KernelCurve::Line(c) => c,
            KernelCurve::Circle(c) => c,
            KernelCurve::Ellipse(c) => c,
            KernelCurve::Bezier(c) => c,
            KernelCurve::BSpline(c) => c,
            KernelCurve::Polyline(c) => c,
        }
    }
}

/// A curve together with the direction it is traversed in.
///
/// The curve itself is always evaluated in its natural direction; the
/// `reversed` flag is reported through [`EdgeCurve::is_reversed`] and
/// honored by the curve model when it picks start and end points.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KernelEdge {
    /// The underlying curve.
    pub curve: KernelCurve,
    /// Whether the edge runs against the curve's parameter direction.
    pub reversed: bool,
}

impl KernelEdge {
    /// An edge in the curve's natural direction.
    pub fn new(curve: impl Into<KernelCurve>) -> KernelEdge {
        KernelEdge {
            curve: curve.into(),
            reversed: false,
        }
    }

    /// The same edge traversed the other way.
    #[must_use]
    pub fn reverse(mut self) -> KernelEdge {
        self.reversed = !self.reversed;
        self
    }

    /// Box the edge for handing to the curve model.
    pub fn boxed(self) -> Box<dyn EdgeCurve> {
        Box::new(self)
    }
}

macro_rules! impl_from_curve {
    ($($ty:ident => $variant:ident),*) => {
        $(
            impl From<$ty> for KernelCurve {
                fn from(c: $ty) -> KernelCurve {
                    KernelCurve::$variant(c)
                }
            }
        )*
    };
}

impl_from_curve!(
    Line => Line,
    CircleCurve => Circle,
    EllipseCurve => Ellipse,
    BezierCurve => Bezier,
    BSplineCurve => BSpline,
    Polyline => Polyline
);

impl EdgeCurve for KernelEdge {
    fn eval(&self, t: f64) -> Point {
        self.curve.as_dyn().eval(t)
    }

    fn bounds(&self) -> Range<f64> {
        self.curve.as_dyn().bounds()
    }

    fn kind(&self) -> CurveKind {
        self.curve.as_dyn().kind()
    }

    fn clone_box(&self) -> Box<dyn EdgeCurve> {
        Box::new(self.clone())
    }

    fn start(&self) -> Point {
        self.curve.as_dyn().start()
    }

    fn end(&self) -> Point {
        self.curve.as_dyn().end()
    }

    fn is_closed(&self) -> bool {
        self.curve.as_dyn().is_closed()
    }

    fn is_reversed(&self) -> bool {
        self.reversed
    }

    fn as_circle(&self) -> Option<CircleCurve> {
        self.curve.as_dyn().as_circle()
    }

    fn as_ellipse(&self) -> Option<EllipseCurve> {
        self.curve.as_dyn().as_ellipse()
    }

    fn poles(&self) -> Option<&[Point]> {
        self.curve.as_dyn().poles()
    }

    fn polygon(&self) -> Option<Vec<Point>> {
        self.curve.as_dyn().polygon()
    }

    fn bezier_segments(&self) -> Option<Vec<Vec<Point>>> {
        self.curve.as_dyn().bezier_segments()
    }

    fn deriv(&self, t: f64) -> Vec3 {
        self.curve.as_dyn().deriv(t)
    }

    fn deriv2(&self, t: f64) -> Vec3 {
        self.curve.as_dyn().deriv2(t)
    }

    fn curvature(&self, t: f64) -> Option<f64> {
        self.curve.as_dyn().curvature(t)
    }

    fn center_of_curvature(&self, t: f64) -> Option<Point> {
        self.curve.as_dyn().center_of_curvature(t)
    }

    fn arclen(&self, range: Range<f64>, accuracy: f64) -> f64 {
        self.curve.as_dyn().arclen(range, accuracy)
    }

    fn inv_arclen(&self, arclen: f64, accuracy: f64) -> Option<f64> {
        self.curve.as_dyn().inv_arclen(arclen, accuracy)
    }

    fn nearest(&self, p: Point, accuracy: f64) -> Option<Nearest> {
        self.curve.as_dyn().nearest(p, accuracy)
    }
}
