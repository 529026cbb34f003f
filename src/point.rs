// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Points and displacement vectors.
//!
//! Drawing geometry lives in the XY plane, but every point carries a `z`
//! coordinate so records restored from 3D sources keep their data. By
//! convention `z` is zero for projected geometry.

use core::fmt;
use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// A point in drawing space.
#[derive(Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// The x coordinate.
    pub x: f64,
    /// The y coordinate.
    pub y: f64,
    /// The z coordinate, zero for planar geometry.
    pub z: f64,
}

/// A displacement between two points.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    /// The x component.
    pub x: f64,
    /// The y component.
    pub y: f64,
    /// The z component.
    pub z: f64,
}

impl Point {
    /// The point (0, 0, 0).
    pub const ZERO: Point = Point::new(0., 0., 0.);

    /// Create a new `Point`.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Point { x, y, z }
    }

    /// Create a new `Point` in the drawing plane.
    #[inline]
    pub const fn planar(x: f64, y: f64) -> Self {
        Point { x, y, z: 0.0 }
    }

    /// Convert this point into a `Vec3` from the origin.
    #[inline]
    pub const fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// The same point projected onto the drawing plane.
    #[inline]
    #[must_use]
    pub const fn flatten(self) -> Point {
        Point::new(self.x, self.y, 0.0)
    }

    /// Linearly interpolate between two points.
    #[inline]
    pub fn lerp(self, other: Point, t: f64) -> Point {
        self + (other - self) * t
    }

    /// Determine the midpoint of two points.
    #[inline]
    pub fn midpoint(self, other: Point) -> Point {
        self.lerp(other, 0.5)
    }

    /// Euclidean distance.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self - other).length()
    }

    /// Squared Euclidean distance.
    #[inline]
    pub fn distance_squared(self, other: Point) -> f64 {
        (self - other).length_squared()
    }

    /// Whether two points are within `tolerance` of each other.
    #[inline]
    pub fn is_equal(self, other: Point, tolerance: f64) -> bool {
        self.distance(other) <= tolerance
    }

    /// Is this point finite?
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Is this point NaN?
    #[inline]
    pub fn is_nan(self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
}

impl Vec3 {
    /// The vector (0, 0, 0).
    pub const ZERO: Vec3 = Vec3::new(0., 0., 0.);

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Vec3 {
        Vec3 { x, y, z }
    }

    /// Convert this vector into a `Point`.
    #[inline]
    pub const fn to_point(self) -> Point {
        Point::new(self.x, self.y, self.z)
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// The z component of the cross product.
    ///
    /// This is the signed area spanned by the two vectors in the drawing
    /// plane, positive when `other` is counter-clockwise from `self`.
    #[inline]
    pub fn cross_z(self, other: Vec3) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Magnitude of vector.
    #[inline]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Magnitude squared of vector.
    #[inline]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    /// A unit vector in the same direction.
    ///
    /// Returns `None` for the zero vector.
    #[inline]
    pub fn normalize(self) -> Option<Vec3> {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            Some(self / len)
        } else {
            None
        }
    }

    /// The vector rotated a quarter turn counter-clockwise in the plane.
    #[inline]
    #[must_use]
    pub fn perp(self) -> Vec3 {
        Vec3::new(-self.y, self.x, self.z)
    }

    /// Angle of the vector in the plane, in radians.
    #[inline]
    pub fn atan2(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// A unit vector of the given angle in the plane.
    #[inline]
    pub fn from_angle(th: f64) -> Vec3 {
        let (s, c) = th.sin_cos();
        Vec3::new(c, s, 0.0)
    }

    /// Is this vector finite?
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    #[inline]
    fn from(v: (f64, f64)) -> Point {
        Point::planar(v.0, v.1)
    }
}

impl From<(f64, f64, f64)> for Point {
    #[inline]
    fn from(v: (f64, f64, f64)) -> Point {
        Point::new(v.0, v.1, v.2)
    }
}

impl From<Point> for (f64, f64, f64) {
    #[inline]
    fn from(p: Point) -> (f64, f64, f64) {
        (p.x, p.y, p.z)
    }
}

impl Add<Vec3> for Point {
    type Output = Point;

    #[inline]
    fn add(self, other: Vec3) -> Self {
        Point::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign<Vec3> for Point {
    #[inline]
    fn add_assign(&mut self, other: Vec3) {
        *self = *self + other;
    }
}

impl Sub<Vec3> for Point {
    type Output = Point;

    #[inline]
    fn sub(self, other: Vec3) -> Self {
        Point::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl SubAssign<Vec3> for Point {
    #[inline]
    fn sub_assign(&mut self, other: Vec3) {
        *self = *self - other;
    }
}

impl Sub<Point> for Point {
    type Output = Vec3;

    #[inline]
    fn sub(self, other: Point) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    #[inline]
    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, other: Vec3) {
        *self = *self + other;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    #[inline]
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, other: f64) -> Vec3 {
        Vec3::new(self.x * other, self.y * other, self.z * other)
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;

    #[inline]
    fn mul(self, other: Vec3) -> Vec3 {
        other * self
    }
}

impl Div<f64> for Vec3 {
    type Output = Vec3;

    /// Note: division by a scalar is implemented by multiplying by the reciprocal.
    #[inline]
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn div(self, other: f64) -> Vec3 {
        self * other.recip()
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?}, {:?})", self.x, self.y, self.z)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "(")?;
        fmt::Display::fmt(&self.x, formatter)?;
        write!(formatter, ", ")?;
        fmt::Display::fmt(&self.y, formatter)?;
        write!(formatter, ", ")?;
        fmt::Display::fmt(&self.z, formatter)?;
        write!(formatter, ")")
    }
}

#[cfg(feature = "mint")]
impl From<Point> for mint::Point3<f64> {
    #[inline]
    fn from(p: Point) -> mint::Point3<f64> {
        mint::Point3 {
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }
}

#[cfg(feature = "mint")]
impl From<mint::Point3<f64>> for Point {
    #[inline]
    fn from(p: mint::Point3<f64>) -> Point {
        Point::new(p.x, p.y, p.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_arithmetic() {
        assert_eq!(
            Point::planar(0., 0.) - Point::planar(10., 0.),
            Vec3::new(-10., 0., 0.)
        );
        assert_eq!(
            Point::planar(0., 0.) - Point::planar(-5., 5.),
            Vec3::new(5., -5., 0.)
        );
        assert_eq!(
            Point::planar(1., 2.) + Vec3::new(3., 4., 0.),
            Point::planar(4., 6.)
        );
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn distance() {
        let p1 = Point::planar(0., 10.);
        let p2 = Point::planar(0., 5.);
        assert_eq!(p1.distance(p2), 5.);

        let p1 = Point::planar(-11., 1.);
        let p2 = Point::planar(-7., -2.);
        assert_eq!(p1.distance(p2), 5.);
        assert!(p1.is_equal(p2, 5.0));
        assert!(!p1.is_equal(p2, 4.999));
    }

    #[test]
    fn normalize_zero_is_none() {
        assert!(Vec3::ZERO.normalize().is_none());
        let n = Vec3::new(3.0, 4.0, 0.0).normalize().unwrap();
        assert!((n.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cross_sign() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        assert!(x.cross_z(x.perp()) > 0.0);
        assert!(x.perp().cross_z(x) < 0.0);
    }

    #[test]
    fn display() {
        let p = Point::new(0.12345, 9.87654, 0.0);
        assert_eq!(format!("{p}"), "(0.12345, 9.87654, 0)");
        let p = Point::new(0.12345, 9.87654, 0.0);
        assert_eq!(format!("{p:.2}"), "(0.12, 9.88, 0.00)");
    }
}
