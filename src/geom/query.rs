// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometric queries on curves.

use core::fmt::Write as _;

use crate::geom::{Geom, GeomKind};
use crate::kernel::{EdgeCurve, Line};
use crate::precision::{CLOSED_TOLERANCE, CONFUSION, QUERY_ACCURACY};
use crate::Point;

impl Geom {
    /// The point halfway along the curve by arc length.
    ///
    /// Falls back to the point at the middle of the parameter range when
    /// the arc-length search does not converge.
    pub fn midpoint(&self) -> Point {
        let edge = self.edge();
        let range = edge.bounds();
        let half = 0.5 * edge.length();
        let t = edge
            .inv_arclen(half, CONFUSION)
            .unwrap_or_else(|| {
                log::debug!("arc-length search failed, using the parameter midpoint");
                0.5 * (range.start + range.end)
            });
        edge.eval(t)
    }

    /// Points at a quarter, half and three quarters of the parameter range.
    ///
    /// Unlike [`Geom::midpoint`] these are parameter fractions, not arc
    /// length fractions. The points are flattened onto the drawing plane.
    pub fn quadrant_points(&self) -> [Point; 3] {
        let edge = self.edge();
        let range = edge.bounds();
        let span = range.end - range.start;
        [0.25, 0.5, 0.75].map(|f| edge.eval(range.start + span * f).flatten())
    }

    /// The point of this curve nearest to `p`, flattened onto the plane.
    pub fn nearest_point(&self, p: Point) -> Option<Point> {
        let edge = self.edge();
        let n = edge.nearest(p.flatten(), QUERY_ACCURACY)?;
        Some(edge.eval(n.t).flatten())
    }

    /// The point of this curve nearest to another curve, flattened onto the
    /// plane.
    pub fn nearest_point_to(&self, other: &Geom) -> Option<Point> {
        let (on_self, _) = closest_points(self.edge(), other.edge())?;
        Some(on_self.flatten())
    }

    /// Distance from `p` to the nearest point of the curve.
    pub fn min_distance(&self, p: Point) -> Option<f64> {
        let n = self.edge().nearest(p.flatten(), QUERY_ACCURACY)?;
        Some(n.distance_sq.sqrt())
    }

    /// Whether the traversed start and end meet in the drawing plane.
    pub fn is_closed(&self) -> bool {
        self.start_point()
            .flatten()
            .is_equal(self.end_point().flatten(), CLOSED_TOLERANCE)
    }

    /// Whether `p` lies on the curve.
    pub fn is_point_on_arc(&self, p: Point) -> bool {
        self.min_distance(p).is_some_and(|d| d < CONFUSION)
    }

    /// Whether the segment from `p1` to `p2` touches the curve.
    pub fn intersects_segment(&self, p1: Point, p2: Point) -> bool {
        let segment = Line::new(p1.flatten(), p2.flatten());
        if crosses_line(self.edge(), &segment) {
            return true;
        }
        closest_points(self.edge(), &segment)
            .is_some_and(|(a, b)| a.distance(b) < CONFUSION)
    }

    /// A deterministic comma-separated rendering of every field.
    ///
    /// Meant for diagnostics and comparisons, not for persistence.
    pub fn to_canonical_string(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = write!(
            out,
            "{},{},{},{},{},{},{},{},{}",
            self.geom_type().code(),
            self.extract_type.code(),
            self.class_of_edge.code(),
            u8::from(self.hlr_visible),
            u8::from(self.reversed),
            self.ref_3d,
            u8::from(self.cosmetic),
            self.source.code(),
            self.source_index,
        );
        let mut section = |fields: &[String]| {
            out.push_str(",$$$,");
            out.push_str(&fields.join(","));
        };
        let xyz = |p: &Point| [p.x.to_string(), p.y.to_string(), p.z.to_string()];
        match self.kind() {
            GeomKind::Generic(g) => {
                let mut fields = vec![g.points.len().to_string()];
                fields.extend(g.points.iter().flat_map(xyz));
                section(&fields);
            }
            GeomKind::Circle(c) => {
                let mut fields = xyz(&c.center).to_vec();
                fields.push(c.radius.to_string());
                section(&fields);
            }
            GeomKind::ArcOfCircle(a) => {
                let mut fields = xyz(&a.circle.center).to_vec();
                fields.push(a.circle.radius.to_string());
                section(&fields);
                let mut fields = Vec::new();
                fields.extend(xyz(&a.start_pnt));
                fields.extend(xyz(&a.end_pnt));
                fields.extend(xyz(&a.mid_pnt));
                fields.push(a.start_angle.to_string());
                fields.push(a.end_angle.to_string());
                fields.push(u8::from(a.cw).to_string());
                fields.push(u8::from(a.large_arc).to_string());
                section(&fields);
            }
            GeomKind::Ellipse(e) => {
                let mut fields = xyz(&e.center).to_vec();
                fields.extend([e.major, e.minor, e.angle].map(|v| v.to_string()));
                section(&fields);
            }
            GeomKind::ArcOfEllipse(a) => {
                let e = &a.ellipse;
                let mut fields = xyz(&e.center).to_vec();
                fields.extend([e.major, e.minor, e.angle].map(|v| v.to_string()));
                section(&fields);
                let mut fields = Vec::new();
                fields.extend(xyz(&a.start_pnt));
                fields.extend(xyz(&a.end_pnt));
                fields.extend(xyz(&a.mid_pnt));
                fields.push(a.start_angle.to_string());
                fields.push(a.end_angle.to_string());
                fields.push(u8::from(a.cw).to_string());
                fields.push(u8::from(a.large_arc).to_string());
                section(&fields);
            }
            GeomKind::BezierSegment(b) => {
                let mut fields = vec![b.pole_count().to_string()];
                fields.extend(b.pnts.iter().flat_map(xyz));
                section(&fields);
            }
            GeomKind::BSpline(s) => {
                let mut fields = vec![s.segments.len().to_string()];
                for seg in &s.segments {
                    fields.push(seg.pole_count().to_string());
                    fields.extend(seg.pnts.iter().flat_map(xyz));
                }
                section(&fields);
            }
        }
        out
    }
}

/// Nearest pair of points between two curves.
///
/// Both curves are sampled to find a starting pair, which is then refined
/// by projecting alternately onto each curve.
fn closest_points(a: &dyn EdgeCurve, b: &dyn EdgeCurve) -> Option<(Point, Point)> {
    const SAMPLES: usize = 64;
    const MAX_ITER: usize = 200;
    let sample = |c: &dyn EdgeCurve| -> Vec<Point> {
        let range = c.bounds();
        let step = (range.end - range.start) / SAMPLES as f64;
        (0..=SAMPLES)
            .map(|i| c.eval(range.start + step * i as f64))
            .collect()
    };
    let sa = sample(a);
    let sb = sample(b);
    let mut best: Option<(Point, Point, f64)> = None;
    for pa in &sa {
        for pb in &sb {
            let d = pa.distance_squared(*pb);
            if d.is_finite() && best.map_or(true, |(_, _, bd)| d < bd) {
                best = Some((*pa, *pb, d));
            }
        }
    }
    let (mut pa, mut pb, mut d) = best?;
    for _ in 0..MAX_ITER {
        let na = a.nearest(pb, QUERY_ACCURACY)?;
        let qa = a.eval(na.t);
        let nb = b.nearest(qa, QUERY_ACCURACY)?;
        let qb = b.eval(nb.t);
        let nd = qa.distance_squared(qb);
        if !(nd < d) {
            break;
        }
        let converged = d - nd <= QUERY_ACCURACY * QUERY_ACCURACY;
        (pa, pb, d) = (qa, qb, nd);
        if converged {
            break;
        }
    }
    Some((pa, pb))
}

/// Whether the curve crosses a segment, by a sign change of the signed
/// distance to the segment's line at a parameter inside the segment.
fn crosses_line(edge: &dyn EdgeCurve, segment: &Line) -> bool {
    const SAMPLES: usize = 128;
    let dir = segment.p1 - segment.p0;
    let len2 = dir.length_squared();
    if !(len2 > 0.0) {
        return false;
    }
    let side = |p: Point| dir.cross_z(p - segment.p0);
    let range = edge.bounds();
    let step = (range.end - range.start) / SAMPLES as f64;
    let mut t0 = range.start;
    let mut f0 = side(edge.eval(t0));
    for i in 1..=SAMPLES {
        let t1 = if i == SAMPLES {
            range.end
        } else {
            range.start + step * i as f64
        };
        let f1 = side(edge.eval(t1));
        if f0 == 0.0 || f0.signum() != f1.signum() {
            // Bisect for the crossing, then check it is within the segment.
            let (mut lo, mut hi, mut flo) = (t0, t1, f0);
            for _ in 0..60 {
                let mid = 0.5 * (lo + hi);
                let fm = side(edge.eval(mid));
                if flo == 0.0 || flo.signum() != fm.signum() {
                    hi = mid;
                } else {
                    (lo, flo) = (mid, fm);
                }
            }
            let p = edge.eval(0.5 * (lo + hi));
            let u = dir.dot(p - segment.p0) / len2;
            if (0.0..=1.0).contains(&u) {
                return true;
            }
        }
        (t0, f0) = (t1, f1);
    }
    false
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::kernel::{BSplineCurve, KernelEdge};
    use crate::TagGenerator;
    use core::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn midpoint_by_arc_length() {
        let mut tags = TagGenerator::from_seed(5);
        // A spline whose parameter runs fast on one side.
        let curve = BSplineCurve::new(
            vec![
                Point::planar(0.0, 0.0),
                Point::planar(1.0, 0.0),
                Point::planar(10.0, 0.0),
            ],
            None,
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            2,
        )
        .unwrap();
        let g = Geom::from_edge(KernelEdge::new(curve).boxed(), &mut tags).unwrap();
        let mid = g.midpoint();
        assert!(mid.distance(Point::planar(5.0, 0.0)) < 1e-6, "{mid:?}");
        // Parameter-based quadrants differ from arc-length ones.
        let quads = g.quadrant_points();
        assert!(quads[1].distance(Point::planar(3.0, 0.0)) < 1e-9, "{quads:?}");
    }

    #[test]
    fn midpoint_is_idempotent() {
        let mut tags = TagGenerator::from_seed(6);
        let g = Geom::arc_of_circle(Point::planar(1.0, 2.0), 3.0, 0.2, 2.9, &mut tags).unwrap();
        assert_eq!(g.midpoint(), g.midpoint());
        let g = Geom::ellipse(Point::ZERO, 5.0, 2.0, 0.4, &mut tags).unwrap();
        assert_eq!(g.midpoint(), g.midpoint());
    }

    #[test]
    fn circle_quadrants() {
        let mut tags = TagGenerator::from_seed(7);
        let g = Geom::circle(Point::ZERO, 1.0, &mut tags).unwrap();
        let [q1, q2, q3] = g.quadrant_points();
        assert!(q1.distance(Point::planar(0.0, 1.0)) < 1e-12);
        assert!(q2.distance(Point::planar(-1.0, 0.0)) < 1e-12);
        assert!(q3.distance(Point::planar(0.0, -1.0)) < 1e-12);
    }

    #[test]
    fn nearest_and_distance() {
        let mut tags = TagGenerator::from_seed(8);
        let g = Geom::circle(Point::ZERO, 2.0, &mut tags).unwrap();
        let p = g.nearest_point(Point::planar(5.0, 0.0)).unwrap();
        assert!(p.distance(Point::planar(2.0, 0.0)) < 1e-9);
        assert_abs_diff_eq!(g.min_distance(Point::planar(0.0, 5.0)).unwrap(), 3.0, epsilon = 1e-9);

        let line = Geom::line(Point::planar(5.0, -1.0), Point::planar(5.0, 1.0), &mut tags);
        let p = g.nearest_point_to(&line).unwrap();
        assert!(p.distance(Point::planar(2.0, 0.0)) < 1e-6, "{p:?}");
        let q = line.nearest_point_to(&g).unwrap();
        assert!(q.distance(Point::planar(5.0, 0.0)) < 1e-6, "{q:?}");
    }

    #[test]
    fn closed_curves() {
        let mut tags = TagGenerator::from_seed(9);
        assert!(Geom::circle(Point::ZERO, 1.0, &mut tags).unwrap().is_closed());
        assert!(!Geom::arc_of_circle(Point::ZERO, 1.0, 0.0, PI, &mut tags).unwrap().is_closed());
        assert!(!Geom::line(Point::ZERO, Point::planar(1.0, 0.0), &mut tags).is_closed());
    }

    #[test]
    fn point_on_arc() {
        let mut tags = TagGenerator::from_seed(10);
        let arc = Geom::arc_of_circle(Point::ZERO, 1.0, 0.0, FRAC_PI_2, &mut tags).unwrap();
        assert!(arc.is_point_on_arc(Point::planar(FRAC_PI_2.cos(), 1.0)));
        let diag = Point::planar(core::f64::consts::FRAC_1_SQRT_2, core::f64::consts::FRAC_1_SQRT_2);
        assert!(arc.is_point_on_arc(diag));
        // On the circle but outside the arc.
        assert!(!arc.is_point_on_arc(Point::planar(-1.0, 0.0)));
    }

    #[test]
    fn segment_crossing() {
        let mut tags = TagGenerator::from_seed(12);
        let arc = Geom::arc_of_circle(Point::ZERO, 1.0, 0.0, FRAC_PI_2, &mut tags).unwrap();
        assert!(arc.intersects_segment(Point::ZERO, Point::planar(2.0, 2.0)));
        assert!(!arc.intersects_segment(Point::ZERO, Point::planar(0.5, 0.5)));
        assert!(!arc.intersects_segment(Point::ZERO, Point::planar(-2.0, -2.0)));
        // Touching at the end point counts.
        assert!(arc.intersects_segment(Point::planar(1.0, 0.0), Point::planar(3.0, 0.0)));
    }

    #[test]
    fn canonical_string() {
        let mut tags = TagGenerator::from_seed(13);
        let g = Geom::circle(Point::planar(1.0, 2.0), 3.0, &mut tags).unwrap();
        assert_eq!(g.to_canonical_string(), "1,0,0,1,0,-1,0,0,-1,$$$,1,2,0,3");
        let g = Geom::line(Point::planar(0.0, 0.0), Point::planar(1.5, 0.0), &mut tags);
        assert_eq!(g.to_canonical_string(), "7,0,0,1,0,-1,0,0,-1,$$$,2,0,0,0,1.5,0,0");
    }
}
