//! Geometry core for the split-cylinder drag study.
//!
//! The crate turns a handful of numeric parameters into the cross-section of
//! two half-cylinders and a connecting plate, rotates it, closes each outline
//! into a loop and models the extruded bodies inside a fluid box.

pub mod geometry;
pub mod model;
pub mod profile;
pub mod section;

pub use geometry::point::{Point2d, Point3d};
pub use geometry::transform::{rotate, translate_along_direction, BoundingBox};
pub use geometry::vector::Vec3;
pub use model::{BoundaryFaces, Design, FluidDomain, ModelError};
pub use profile::assembler::{assemble, ClosedLoop, ClosingTarget, Segment};
pub use profile::generator::{lower_half_arc, rectangle, upper_half_arc};
pub use profile::{Profile, ProfileError};
pub use section::{CrossSection, CrossSectionParams};

/// Global tolerance configuration for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Points closer than this are considered coincident.
    pub coincidence: f64,
    /// Normal components within this of ±1 count as axis-aligned.
    pub normal: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincidence: 1e-9,
            normal: 1e-9,
        }
    }
}

impl Tolerance {
    pub fn points_coincident(&self, a: &Point2d, b: &Point2d) -> bool {
        a.distance_to(b) < self.coincidence
    }

    pub fn is_zero_length(&self, length: f64) -> bool {
        length.abs() < self.coincidence
    }

    /// True when `component` (of a unit normal) equals `target` within tolerance.
    pub fn normal_matches(&self, component: f64, target: f64) -> bool {
        (component - target).abs() < self.normal
    }
}
