// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closed-form intersections between lines and circles.

use arrayvec::ArrayVec;

use crate::geom::{Geom, GeomKind};
use crate::precision::{PARALLEL_LIMIT, TANGENT_CIRCLE_LIMIT, TANGENT_LINE_LIMIT};
use crate::Point;

/// Up to two intersection points.
pub type Intersections = ArrayVec<Point, 2>;

/// The simple shapes the closed forms understand.
#[derive(Clone, Copy, Debug)]
enum Simple {
    /// The infinite line through two points.
    Line(Point, Point),
    /// A full circle; arcs are treated as their whole circle.
    Circle(Point, f64),
}

impl Simple {
    fn from_geom(geom: &Geom) -> Option<Simple> {
        match geom.kind() {
            GeomKind::Generic(g) if g.points.len() >= 2 => {
                Some(Simple::Line(g.points[0], g.points[1]))
            }
            GeomKind::Circle(c) => Some(Simple::Circle(c.center, c.radius)),
            GeomKind::ArcOfCircle(a) => Some(Simple::Circle(a.circle.center, a.circle.radius)),
            _ => None,
        }
    }
}

/// Intersect two curves in the drawing plane.
///
/// A [`Generic`](crate::Generic) is taken as the line through its first
/// two points, extended to infinity, and arcs are treated as their full
/// circle. Tangent contacts within a small band produce a single point. Pairs involving any other
/// variant produce no points.
///
/// The result does not depend on argument order, apart from the order of
/// the points.
pub fn intersection(a: &Geom, b: &Geom) -> Intersections {
    let (Some(sa), Some(sb)) = (Simple::from_geom(a), Simple::from_geom(b)) else {
        return Intersections::new();
    };
    match (sa, sb) {
        (Simple::Line(p0, p1), Simple::Line(q0, q1)) => line_line(p0, p1, q0, q1),
        (Simple::Circle(c, r), Simple::Line(p0, p1))
        | (Simple::Line(p0, p1), Simple::Circle(c, r)) => circle_line(c, r, p0, p1),
        (Simple::Circle(c0, r0), Simple::Circle(c1, r1)) => circle_circle(c0, r0, c1, r1),
    }
}

impl Geom {
    /// Intersect with another curve; see [`intersection`].
    pub fn intersection(&self, other: &Geom) -> Intersections {
        intersection(self, other)
    }
}

/// Coefficients of `a x + b y + c = 0` through two points.
#[inline]
fn line_equation(s: Point, e: Point) -> (f64, f64, f64) {
    let dx = e.x - s.x;
    let dy = e.y - s.y;
    (-dy, dx, dy * s.x - dx * s.y)
}

fn line_line(p0: Point, p1: Point, q0: Point, q1: Point) -> Intersections {
    let mut out = Intersections::new();
    let (a1, b1, c1) = line_equation(p0, p1);
    let (a2, b2, c2) = line_equation(q0, q1);
    let det = a1 * b2 - a2 * b1;
    if det.abs() < PARALLEL_LIMIT {
        return out;
    }
    let x = (b1 * c2 - b2 * c1) / det;
    let y = (a2 * c1 - a1 * c2) / det;
    out.push(Point::planar(x, y));
    out
}

fn circle_line(center: Point, radius: f64, p0: Point, p1: Point) -> Intersections {
    let mut out = Intersections::new();
    let (a, b, c) = line_equation(p0, p1);
    // Move the circle to the origin.
    let c = c + a * center.x + b * center.y;
    let ab = a * a + b * b;
    if ab == 0.0 {
        return out;
    }
    let disc = radius * radius * ab - c * c;
    if disc < 0.0 {
        return out;
    }
    if disc < TANGENT_LINE_LIMIT {
        out.push(Point::planar(center.x - a * c / ab, center.y - b * c / ab));
        return out;
    }
    let root = disc.sqrt();
    for sign in [1.0, -1.0] {
        let x = (-a * c + sign * b * root) / ab;
        let y = (-b * c - sign * a * root) / ab;
        out.push(Point::planar(center.x + x, center.y + y));
    }
    out
}

fn circle_circle(c0: Point, r0: f64, c1: Point, r1: f64) -> Intersections {
    let mut out = Intersections::new();
    let d = c0.distance(c1);
    if d == 0.0 {
        return out;
    }
    let m = (c1 - c0) / d;
    let n = m.perp();
    let d0 = (r0 * r0 - r1 * r1 + d * d) / (2.0 * d);
    let disc = r0 * r0 - d0 * d0;
    if disc < 0.0 {
        return out;
    }
    let foot = (c0 + m * d0).flatten();
    if disc < TANGENT_CIRCLE_LIMIT {
        out.push(foot);
        return out;
    }
    let h = disc.sqrt();
    out.push(foot + n * h);
    out.push(foot - n * h);
    out
}

#[cfg(test)]
mod tests {
    use approx::abs_diff_eq;

    use super::*;
    use crate::TagGenerator;
    use core::f64::consts::PI;

    fn close(p: Point, x: f64, y: f64) -> bool {
        abs_diff_eq!(p.x, x, epsilon = 1e-9) && abs_diff_eq!(p.y, y, epsilon = 1e-9)
    }

    #[test]
    fn crossing_lines() {
        let mut tags = TagGenerator::from_seed(1);
        let a = Geom::line(Point::planar(0.0, 0.0), Point::planar(1.0, 0.0), &mut tags);
        let b = Geom::line(Point::planar(0.0, 0.0), Point::planar(0.0, 1.0), &mut tags);
        let pts = intersection(&a, &b);
        assert_eq!(pts.len(), 1);
        assert!(close(pts[0], 0.0, 0.0));
        // Lines are extended past their ends.
        let c = Geom::line(Point::planar(3.0, 1.0), Point::planar(3.0, 2.0), &mut tags);
        let pts = a.intersection(&c);
        assert!(close(pts[0], 3.0, 0.0), "{pts:?}");
    }

    #[test]
    fn polyline_uses_first_segment() {
        let mut tags = TagGenerator::from_seed(8);
        let poly = Geom::polyline(
            vec![
                Point::planar(0.0, 0.0),
                Point::planar(1.0, 0.0),
                Point::planar(1.0, 1.0),
            ],
            &mut tags,
        )
        .unwrap();
        let upright = Geom::line(Point::planar(2.0, -1.0), Point::planar(2.0, 1.0), &mut tags);
        let pts = intersection(&poly, &upright);
        assert_eq!(pts.len(), 1);
        assert!(close(pts[0], 2.0, 0.0), "{pts:?}");
    }

    #[test]
    fn parallel_lines() {
        let mut tags = TagGenerator::from_seed(2);
        let a = Geom::line(Point::planar(0.0, 0.0), Point::planar(1.0, 0.0), &mut tags);
        let b = Geom::line(Point::planar(0.0, 1.0), Point::planar(1.0, 1.0), &mut tags);
        assert!(intersection(&a, &b).is_empty());
    }

    #[test]
    fn two_circles() {
        let mut tags = TagGenerator::from_seed(3);
        let a = Geom::circle(Point::planar(0.0, 0.0), 2.0, &mut tags).unwrap();
        let b = Geom::circle(Point::planar(3.0, 0.0), 2.0, &mut tags).unwrap();
        let pts = intersection(&a, &b);
        assert_eq!(pts.len(), 2);
        let y = (4.0f64 - 2.25).sqrt();
        assert!(pts.iter().any(|p| close(*p, 1.5, y)), "{pts:?}");
        assert!(pts.iter().any(|p| close(*p, 1.5, -y)), "{pts:?}");
    }

    #[test]
    fn tangent_circles() {
        let mut tags = TagGenerator::from_seed(4);
        let a = Geom::circle(Point::planar(0.0, 0.0), 2.0, &mut tags).unwrap();
        let b = Geom::circle(Point::planar(4.0, 0.0), 2.0, &mut tags).unwrap();
        let pts = intersection(&a, &b);
        assert_eq!(pts.len(), 1);
        assert!(close(pts[0], 2.0, 0.0));
        let far = Geom::circle(Point::planar(10.0, 0.0), 2.0, &mut tags).unwrap();
        assert!(intersection(&a, &far).is_empty());
        let same = Geom::circle(Point::planar(0.0, 0.0), 1.0, &mut tags).unwrap();
        assert!(intersection(&a, &same).is_empty());
    }

    #[test]
    fn circle_and_line_either_order() {
        let mut tags = TagGenerator::from_seed(5);
        let circle = Geom::circle(Point::planar(1.0, 1.0), 1.0, &mut tags).unwrap();
        let line = Geom::line(Point::planar(-5.0, 1.0), Point::planar(5.0, 1.0), &mut tags);
        let pts = intersection(&circle, &line);
        assert_eq!(pts.len(), 2);
        assert!(pts.iter().any(|p| close(*p, 0.0, 1.0)), "{pts:?}");
        assert!(pts.iter().any(|p| close(*p, 2.0, 1.0)), "{pts:?}");
        let rev = intersection(&line, &circle);
        assert_eq!(rev.len(), 2);
        for p in &rev {
            assert!(pts.iter().any(|q| close(*q, p.x, p.y)));
        }

        let tangent = Geom::line(Point::planar(-5.0, 0.0), Point::planar(5.0, 0.0), &mut tags);
        let pts = intersection(&circle, &tangent);
        assert_eq!(pts.len(), 1);
        assert!(close(pts[0], 1.0, 0.0), "{pts:?}");
    }

    #[test]
    fn arcs_use_their_circle() {
        let mut tags = TagGenerator::from_seed(6);
        let arc = Geom::arc_of_circle(Point::ZERO, 1.0, 0.0, 0.5 * PI, &mut tags).unwrap();
        let line = Geom::line(Point::planar(-2.0, 0.0), Point::planar(2.0, 0.0), &mut tags);
        assert_eq!(intersection(&arc, &line).len(), 2);
    }

    #[test]
    fn other_pairs_are_empty() {
        let mut tags = TagGenerator::from_seed(7);
        let e = Geom::ellipse(Point::ZERO, 2.0, 1.0, 0.0, &mut tags).unwrap();
        let line = Geom::line(Point::planar(-5.0, 0.0), Point::planar(5.0, 0.0), &mut tags);
        assert!(intersection(&e, &line).is_empty());
    }
}
