use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

use super::vector::Vec3;

/// A point in the sketch plane.
///
/// Points are plain values: two points are the same point when their
/// coordinates are equal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2d {
    pub x: f64,
    pub y: f64,
}

impl Point2d {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Distance from the origin.
    pub fn norm(&self) -> f64 {
        self.distance_to(&Self::ORIGIN)
    }

    /// z-component of `(b - self) x (c - self)`; positive for a left turn.
    pub fn turn(&self, b: &Self, c: &Self) -> f64 {
        (b.x - self.x) * (c.y - self.y) - (b.y - self.y) * (c.x - self.x)
    }

    /// Lift onto the plane `z = z`.
    pub fn at_z(&self, z: f64) -> Point3d {
        Point3d::new(self.x, self.y, z)
    }
}

impl From<Point2<f64>> for Point2d {
    fn from(p: Point2<f64>) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<Point2d> for Point2<f64> {
    fn from(p: Point2d) -> Self {
        Point2::new(p.x, p.y)
    }
}

/// A vertex of a modeled body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3d {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        (*self - *other).length()
    }

    pub fn midpoint(&self, other: &Self) -> Self {
        *self + (*other - *self) * 0.5
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl Add<Vec3> for Point3d {
    type Output = Point3d;
    fn add(self, rhs: Vec3) -> Self::Output {
        Point3d::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

/// The displacement from `rhs` to `self`.
impl Sub for Point3d {
    type Output = Vec3;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point2d_distance() {
        let a = Point2d::new(1.0, 0.0);
        let b = Point2d::new(4.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_turn_sign() {
        let a = Point2d::new(0.0, 0.0);
        let b = Point2d::new(1.0, 0.0);
        assert!(a.turn(&b, &Point2d::new(1.0, 1.0)) > 0.0);
        assert!(a.turn(&b, &Point2d::new(1.0, -1.0)) < 0.0);
        assert_eq!(a.turn(&b, &Point2d::new(2.0, 0.0)), 0.0);
    }

    #[test]
    fn test_nalgebra_conversion() {
        let p = Point2d::new(0.5, -0.25);
        let q: Point2<f64> = p.into();
        assert_eq!(Point2d::from(q), p);
    }

    #[test]
    fn test_displacement_and_midpoint() {
        let a = Point3d::new(3.0, 4.0, 5.0);
        let b = Point3d::new(1.0, 1.0, 1.0);
        assert_eq!(a - b, Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(b + (a - b), a);
        assert_eq!(a.midpoint(&b), Point3d::new(2.0, 2.5, 3.0));
        assert!((Point3d::ORIGIN.distance_to(&Point3d::new(0.0, 3.0, 4.0)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_lift_to_plane() {
        let p = Point2d::new(1.0, 2.0).at_z(-1.5);
        assert_eq!(p, Point3d::new(1.0, 2.0, -1.5));
    }
}
