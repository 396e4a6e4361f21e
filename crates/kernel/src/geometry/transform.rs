use nalgebra::{Point2, Rotation2};
use serde::{Deserialize, Serialize};

use super::point::{Point2d, Point3d};
use super::vector::Vec3;

/// Rotate `point` about the origin by `angle_degrees` (counter-clockwise).
///
/// `x' = x·cos θ − y·sin θ`, `y' = x·sin θ + y·cos θ`.
pub fn rotate(point: Point2d, angle_degrees: f64) -> Point2d {
    let rotation = Rotation2::new(angle_degrees.to_radians());
    let p: Point2<f64> = point.into();
    (rotation * p).into()
}

/// Shift `point` along the direction set by `angle_degrees`.
///
/// The offset is `radius · sin θ · (cos θ, sin θ)`. It is not a rotation: the
/// plate is first rotated with the cylinder halves and then moved by this
/// offset so it stays centered in the gap.
pub fn translate_along_direction(point: Point2d, angle_degrees: f64, radius: f64) -> Point2d {
    let half = radius / 2.0;
    let theta = angle_degrees.to_radians();
    let (sin, cos) = theta.sin_cos();
    Point2d::new(
        point.x + sin * cos * 2.0 * half,
        point.y + sin * sin * 2.0 * half,
    )
}

/// Apply [`rotate`] to every point of a sequence.
pub fn rotate_all(points: &[Point2d], angle_degrees: f64) -> Vec<Point2d> {
    points.iter().map(|p| rotate(*p, angle_degrees)).collect()
}

/// Apply [`translate_along_direction`] to every point of a sequence.
pub fn translate_all(points: &[Point2d], angle_degrees: f64, radius: f64) -> Vec<Point2d> {
    points
        .iter()
        .map(|p| translate_along_direction(*p, angle_degrees, radius))
        .collect()
}

/// Axis-aligned extent of a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3d,
    pub max: Point3d,
}

impl BoundingBox {
    pub fn new(min: Point3d, max: Point3d) -> Self {
        Self { min, max }
    }

    /// Tightest box around `points`; inverted (min > max) when empty.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3d>) -> Self {
        let inf = f64::INFINITY;
        let init = Self::new(Point3d::new(inf, inf, inf), Point3d::new(-inf, -inf, -inf));
        points.into_iter().fold(init, |bb, p| {
            Self::new(
                Point3d::new(bb.min.x.min(p.x), bb.min.y.min(p.y), bb.min.z.min(p.z)),
                Point3d::new(bb.max.x.max(p.x), bb.max.y.max(p.y), bb.max.z.max(p.z)),
            )
        })
    }

    /// True when `other` lies entirely inside `self`, boundary included.
    pub fn contains(&self, other: &Self) -> bool {
        let (a, b) = (self.min.to_array(), self.max.to_array());
        let (c, d) = (other.min.to_array(), other.max.to_array());
        (0..3).all(|i| a[i] <= c[i] && d[i] <= b[i])
    }

    pub fn center(&self) -> Point3d {
        self.min.midpoint(&self.max)
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}
