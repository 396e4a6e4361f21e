//! Ordered 2D point sequences describing cross-section outlines.

pub mod assembler;
pub mod generator;

use serde::{Deserialize, Serialize};

use crate::geometry::point::Point2d;
use crate::geometry::transform::{rotate_all, translate_all};

/// Errors raised while generating or closing a profile.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("{parameter} must be positive and finite, got {value}")]
    NonPositive { parameter: &'static str, value: f64 },

    #[error("{parameter} must be non-negative and finite, got {value}")]
    Negative { parameter: &'static str, value: f64 },

    #[error("an arc needs at least {required} points, got {provided}")]
    TooFewPoints { required: usize, provided: usize },

    #[error("closing index {index} is outside a profile of {len} points")]
    ClosingIndexOutOfRange { index: usize, len: usize },

    #[error("closed loop '{name}' degenerates to {remaining} distinct vertices")]
    Degenerate { name: String, remaining: usize },
}

/// An ordered polyline in the sketch plane.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Profile {
    points: Vec<Point2d>,
}

impl Profile {
    pub fn from_points(points: Vec<Point2d>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point2d] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Point2d> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point2d> {
        self.points.last()
    }

    /// A new profile with every point rotated about the origin.
    pub fn rotated(&self, angle_degrees: f64) -> Self {
        Self::from_points(rotate_all(&self.points, angle_degrees))
    }

    /// A new profile with every point shifted by the directional plate offset.
    pub fn translated_along(&self, angle_degrees: f64, radius: f64) -> Self {
        Self::from_points(translate_all(&self.points, angle_degrees, radius))
    }

    pub fn into_points(self) -> Vec<Point2d> {
        self.points
    }
}

impl From<Vec<Point2d>> for Profile {
    fn from(points: Vec<Point2d>) -> Self {
        Self::from_points(points)
    }
}
