// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Common mathematical operations

use crate::Point;

/// Gauss-Legendre quadrature, as `(weight, abscissa)` pairs on `[-1, 1]`.
pub(crate) const GAUSS_LEGENDRE_COEFFS_8: &[(f64, f64)] = &[
    (0.3626837833783620, -0.1834346424956498),
    (0.3626837833783620, 0.1834346424956498),
    (0.3137066458778873, -0.5255324099163290),
    (0.3137066458778873, 0.5255324099163290),
    (0.2223810344533745, -0.7966664774136267),
    (0.2223810344533745, 0.7966664774136267),
    (0.1012285362903763, -0.9602898564975363),
    (0.1012285362903763, 0.9602898564975363),
];

/// Integrate `f` over `[a, b]` with 8-point Gauss-Legendre.
pub(crate) fn integrate_gl8(f: &impl Fn(f64) -> f64, a: f64, b: f64) -> f64 {
    let half = 0.5 * (b - a);
    let mid = 0.5 * (a + b);
    GAUSS_LEGENDRE_COEFFS_8
        .iter()
        .map(|&(wi, xi)| wi * f(mid + half * xi))
        .sum::<f64>()
        * half
}

/// Find the minimum of a unimodal function on `[lo, hi]`.
///
/// Golden-section search, stopping once the bracket is narrower than
/// `accuracy`. Returns the argument and the value there.
pub(crate) fn golden_section_min(
    f: impl Fn(f64) -> f64,
    mut lo: f64,
    mut hi: f64,
    accuracy: f64,
) -> (f64, f64) {
    const INV_PHI: f64 = 0.6180339887498949;
    const MAX_ITER: usize = 200;
    let mut x1 = hi - INV_PHI * (hi - lo);
    let mut x2 = lo + INV_PHI * (hi - lo);
    let mut f1 = f(x1);
    let mut f2 = f(x2);
    for _ in 0..MAX_ITER {
        if (hi - lo).abs() <= accuracy {
            break;
        }
        if f1 <= f2 {
            hi = x2;
            x2 = x1;
            f2 = f1;
            x1 = hi - INV_PHI * (hi - lo);
            f1 = f(x1);
        } else {
            lo = x1;
            x1 = x2;
            f1 = f2;
            x2 = lo + INV_PHI * (hi - lo);
            f2 = f(x2);
        }
    }
    let x = 0.5 * (lo + hi);
    (x, f(x))
}

/// Center and radius of the circle through three points.
///
/// Returns `None` when the points are collinear or coincident.
pub(crate) fn circle_through(a: Point, b: Point, c: Point) -> Option<(Point, f64)> {
    let ab = b - a;
    let ac = c - a;
    let d = 2.0 * ab.cross_z(ac);
    if d.abs() < f64::EPSILON * ab.length_squared().max(ac.length_squared()).max(1.0) {
        return None;
    }
    let ab2 = ab.length_squared();
    let ac2 = ac.length_squared();
    let ux = (ac.y * ab2 - ab.y * ac2) / d;
    let uy = (ab.x * ac2 - ac.x * ab2) / d;
    let center = Point::new(a.x + ux, a.y + uy, a.z);
    let radius = center.distance(a);
    if !radius.is_finite() {
        return None;
    }
    Some((center, radius))
}

/// Wrap an angle into `[0, 2π)`.
#[inline]
pub(crate) fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(core::f64::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative input.
    if a >= core::f64::consts::TAU {
        0.0
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::PI;

    #[test]
    fn gauss_legendre_polynomial_exact() {
        let f = |x: f64| 3.0 * x * x + 2.0 * x + 1.0;
        let value = integrate_gl8(&f, 0.0, 2.0);
        assert!((value - 14.0).abs() < 1e-12);
    }

    #[test]
    fn golden_section_parabola() {
        let (x, fx) = golden_section_min(|x| (x - 0.3) * (x - 0.3) + 1.0, 0.0, 1.0, 1e-10);
        // The function is flat near the minimum, so x is only good to about sqrt(eps).
        assert!((x - 0.3).abs() < 1e-7);
        assert!((fx - 1.0).abs() < 1e-12);
    }

    #[test]
    fn circle_through_points() {
        let (center, radius) = circle_through(
            Point::planar(1.0, 0.0),
            Point::planar(0.0, 1.0),
            Point::planar(-1.0, 0.0),
        )
        .unwrap();
        assert!(center.distance(Point::ZERO) < 1e-12);
        assert!((radius - 1.0).abs() < 1e-12);

        let collinear = circle_through(
            Point::planar(0.0, 0.0),
            Point::planar(1.0, 1.0),
            Point::planar(2.0, 2.0),
        );
        assert!(collinear.is_none());
    }

    #[test]
    fn angles_wrap() {
        assert!((normalize_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-12);
        assert!((normalize_angle(5.0 * PI) - PI).abs() < 1e-12);
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!(normalize_angle(-1e-18) < core::f64::consts::TAU);
    }
}
