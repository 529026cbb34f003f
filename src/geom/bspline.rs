// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! B-splines, and recognizing splines that are really lines or circles.

use crate::common::{circle_through, normalize_angle};
use crate::fit::{bezier_decomposition, ApproxParams};
use crate::geom::BezierSegment;
use crate::kernel::{CircleCurve, EdgeCurve, KernelEdge};
use crate::precision::{lengths_match, CIRCLE_FIT_TOLERANCE, CURVATURE_LIMIT, QUERY_ACCURACY};
use crate::Point;

/// A B-spline, stored as the Bézier segments approximating it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BSpline {
    /// Bézier segments in parameter order, each of degree three or less.
    pub segments: Vec<BezierSegment>,
    /// The start point.
    pub start_pnt: Point,
    /// The point halfway through the parameter range.
    pub mid_pnt: Point,
    /// The end point.
    pub end_pnt: Point,
    /// Polar angle of the start point about the origin.
    pub start_angle: f64,
    /// Polar angle of the end point about the origin.
    pub end_angle: f64,
    /// Winding as seen on a y-down drawing canvas.
    pub cw: bool,
    /// Whether the spline is open.
    pub is_arc: bool,
}

/// Circle parameters estimated from curvature samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleParams {
    /// Reciprocal of the mean curvature.
    pub radius: f64,
    /// Mean center of curvature.
    pub center: Point,
    /// Whether the spline is open.
    pub is_arc: bool,
}

/// A circular edge reconstructed from a B-spline.
#[derive(Clone, Debug, PartialEq)]
pub struct CircleFit {
    /// The circle or arc. A clockwise arc is stored as a reversed edge.
    pub edge: KernelEdge,
    /// Whether the fit is an arc rather than a full circle.
    pub is_arc: bool,
}

impl BSpline {
    /// Sample an edge and decompose it into Bézier segments.
    pub fn from_edge(edge: &dyn EdgeCurve, params: &ApproxParams) -> BSpline {
        let range = edge.bounds();
        let start_pnt = edge.eval(range.start);
        let mid_pnt = edge.eval(0.5 * (range.start + range.end));
        let end_pnt = edge.eval(range.end);
        let cw = (start_pnt - mid_pnt).cross_z(end_pnt - mid_pnt) < 0.0;
        let segments = bezier_decomposition(edge, params)
            .into_iter()
            .map(|poles| {
                if poles.len() > 4 {
                    log::warn!("converted spline segment has degree {} > 3", poles.len() - 1);
                }
                BezierSegment::new(poles)
            })
            .collect();
        BSpline {
            segments,
            start_pnt,
            mid_pnt,
            end_pnt,
            start_angle: normalize_angle(start_pnt.y.atan2(start_pnt.x)),
            end_angle: normalize_angle(end_pnt.y.atan2(end_pnt.x)),
            cw,
            is_arc: !edge.is_closed(),
        }
    }

    /// Whether a spline is a straight line in disguise.
    ///
    /// A control polygon is never shorter than the chord between its ends,
    /// and is exactly as long only when every pole lies in order on that
    /// chord.
    pub fn is_line(edge: &dyn EdgeCurve) -> bool {
        let Some(poles) = edge.poles() else {
            return false;
        };
        let s = edge.start();
        let e = edge.end();
        if s.is_equal(e, f64::from(f32::EPSILON)) {
            return false;
        }
        let chord = s.distance(e);
        let polygon: f64 = poles.windows(2).map(|w| w[0].distance(w[1])).sum();
        lengths_match(polygon, chord)
    }

    /// Whether curvature sampling finds the spline circular.
    pub fn is_circle(edge: &dyn EdgeCurve) -> bool {
        BSpline::circle_params(edge).is_some()
    }

    /// Estimate circle parameters from curvature.
    ///
    /// Curvature and its center are sampled at six evenly spaced
    /// parameters including both ends. The spline counts as circular when
    /// the mean absolute deviation of the curvature from its mean is below
    /// [`CURVATURE_LIMIT`]. Returns `None` when it is not circular or the
    /// curvature cannot be computed somewhere.
    pub fn circle_params(edge: &dyn EdgeCurve) -> Option<CircleParams> {
        const SAMPLES: usize = 6;
        let range = edge.bounds();
        let step = (range.end - range.start) / (SAMPLES - 1) as f64;
        let mut curvatures = [0.0; SAMPLES];
        let mut centers = [Point::ZERO; SAMPLES];
        for i in 0..SAMPLES {
            let t = if i + 1 == SAMPLES {
                range.end
            } else {
                range.start + step * i as f64
            };
            curvatures[i] = edge.curvature(t)?;
            centers[i] = edge.center_of_curvature(t)?;
        }
        let n = SAMPLES as f64;
        let avg_curve = curvatures.iter().sum::<f64>() / n;
        let error_curve = curvatures
            .iter()
            .map(|k| (avg_curve - k).abs())
            .sum::<f64>()
            / n;
        if !(error_curve < CURVATURE_LIMIT) || !(avg_curve > 0.0) {
            return None;
        }
        let sum = centers
            .iter()
            .fold(Point::ZERO, |acc, c| acc + c.to_vec3());
        let center = Point::new(sum.x / n, sum.y / n, sum.z / n);
        Some(CircleParams {
            radius: avg_curve.recip(),
            center,
            is_arc: !edge.is_closed(),
        })
    }

    /// Rebuild a spline as an explicit circle or arc.
    ///
    /// Needs at least five poles. Three interior poles are projected onto
    /// the curve, and a circle is fitted through each half: start, first
    /// projection, middle projection; then middle projection, last
    /// projection, end. Both circles must agree within
    /// [`CIRCLE_FIT_TOLERANCE`] on radius and center. The result is an arc
    /// unless the spline's ends coincide within the same tolerance.
    pub fn as_circle(edge: &dyn EdgeCurve) -> Option<CircleFit> {
        let poles = edge.poles()?;
        let n = poles.len();
        if n < 5 {
            return None;
        }
        let s = edge.start();
        let e = edge.end();
        let is_arc = !s.is_equal(e, CIRCLE_FIT_TOLERANCE);
        let pm = if n == 5 { poles[2] } else { poles[n / 2 - 1] };
        let project = |p: Point| {
            edge.nearest(p, QUERY_ACCURACY)
                .map(|nearest| edge.eval(nearest.t))
        };
        let pc1 = project(poles[1])?;
        let pc2 = project(poles[n - 2])?;
        let pcm = project(pm)?;

        let (center1, radius1) = circle_through(s, pc1, pcm)?;
        let (center2, radius2) = circle_through(pcm, pc2, e)?;
        if (radius1 - radius2).abs() >= CIRCLE_FIT_TOLERANCE
            || !center1.is_equal(center2, CIRCLE_FIT_TOLERANCE)
        {
            return None;
        }
        let edge = if is_arc {
            let (curve, clockwise) = CircleCurve::arc_through(s, pcm, e)?;
            let edge = KernelEdge::new(curve);
            if clockwise {
                edge.reverse()
            } else {
                edge
            }
        } else {
            let center = center1.midpoint(center2);
            KernelEdge::new(CircleCurve::full(center, 0.5 * (radius1 + radius2)))
        };
        Some(CircleFit { edge, is_arc })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::kernel::BSplineCurve;
    use core::f64::consts::FRAC_1_SQRT_2;

    /// A rational quadratic spline tracing a full circle.
    pub(crate) fn nurbs_circle(center: Point, r: f64) -> BSplineCurve {
        let unit = [
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 1.0),
            (-1.0, 1.0),
            (-1.0, 0.0),
            (-1.0, -1.0),
            (0.0, -1.0),
            (1.0, -1.0),
            (1.0, 0.0),
        ];
        let poles = unit
            .iter()
            .map(|&(x, y)| Point::planar(center.x + r * x, center.y + r * y))
            .collect();
        let w = FRAC_1_SQRT_2;
        BSplineCurve::new(
            poles,
            Some(vec![1.0, w, 1.0, w, 1.0, w, 1.0, w, 1.0]),
            vec![0.0, 0.0, 0.0, 0.25, 0.25, 0.5, 0.5, 0.75, 0.75, 1.0, 1.0, 1.0],
            2,
        )
        .unwrap()
    }

    /// A rational quadratic spline tracing the upper half of the unit circle.
    pub(crate) fn nurbs_half_circle() -> BSplineCurve {
        let w = FRAC_1_SQRT_2;
        BSplineCurve::new(
            vec![
                Point::planar(1.0, 0.0),
                Point::planar(1.0, 1.0),
                Point::planar(0.0, 1.0),
                Point::planar(-1.0, 1.0),
                Point::planar(-1.0, 0.0),
            ],
            Some(vec![1.0, w, 1.0, w, 1.0]),
            vec![0.0, 0.0, 0.0, 0.5, 0.5, 1.0, 1.0, 1.0],
            2,
        )
        .unwrap()
    }

    #[test]
    fn collinear_spline_is_line() {
        let c = BSplineCurve::clamped_uniform(
            vec![
                Point::planar(0.0, 0.0),
                Point::planar(1.0, 0.5),
                Point::planar(3.0, 1.5),
                Point::planar(4.0, 2.0),
            ],
            3,
        )
        .unwrap();
        assert!(BSpline::is_line(&c));
    }

    #[test]
    fn bent_spline_is_not_line() {
        let c = BSplineCurve::clamped_uniform(
            vec![
                Point::planar(0.0, 0.0),
                Point::planar(1.0, 0.5),
                Point::planar(3.0, 1.6),
                Point::planar(4.0, 2.0),
            ],
            3,
        )
        .unwrap();
        assert!(!BSpline::is_line(&c));
    }

    #[test]
    fn curvature_recognizes_circle() {
        let c = nurbs_circle(Point::planar(2.0, -1.0), 5.0);
        let params = BSpline::circle_params(&c).unwrap();
        assert!((params.radius - 5.0).abs() < 1e-4, "{params:?}");
        assert!(params.center.distance(Point::planar(2.0, -1.0)) < 1e-3);
        assert!(!params.is_arc);

        let wavy = BSplineCurve::clamped_uniform(
            vec![
                Point::planar(0.0, 0.0),
                Point::planar(1.0, 2.0),
                Point::planar(2.0, -2.0),
                Point::planar(3.0, 0.0),
            ],
            3,
        )
        .unwrap();
        assert!(!BSpline::is_circle(&wavy));
    }

    #[test]
    fn fit_full_circle() {
        let c = nurbs_circle(Point::planar(1.0, 1.0), 2.0);
        let fit = BSpline::as_circle(&c).unwrap();
        assert!(!fit.is_arc);
        let circle = fit.edge.as_circle().unwrap();
        assert!(circle.center.distance(Point::planar(1.0, 1.0)) < 1e-6);
        assert!((circle.radius - 2.0).abs() < 1e-6);
    }

    #[test]
    fn fit_arc() {
        let c = nurbs_half_circle();
        let fit = BSpline::as_circle(&c).unwrap();
        assert!(fit.is_arc);
        assert!(!fit.edge.is_reversed());
        assert!(fit.edge.start().distance(Point::planar(1.0, 0.0)) < 1e-9);
        assert!(fit.edge.end().distance(Point::planar(-1.0, 0.0)) < 1e-9);
    }

    #[test]
    fn too_few_poles_for_fit() {
        let c = BSplineCurve::clamped_uniform(
            vec![
                Point::planar(0.0, 0.0),
                Point::planar(1.0, 1.0),
                Point::planar(2.0, 1.0),
                Point::planar(3.0, 0.0),
            ],
            3,
        )
        .unwrap();
        assert!(BSpline::as_circle(&c).is_none());
    }

    #[test]
    fn decomposed_spline_fields() {
        let c = nurbs_half_circle();
        let spline = BSpline::from_edge(&c, &ApproxParams::default());
        assert!(spline.is_arc);
        assert!(!spline.segments.is_empty());
        assert!(spline.segments.iter().all(|s| s.degree() <= 3));
        assert!(spline.mid_pnt.distance(Point::planar(0.0, 1.0)) < 1e-12);
        assert!((spline.end_angle - core::f64::consts::PI).abs() < 1e-12);
    }
}
