//! The split-cylinder cross-section: two half-cylinders and the plate between them.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::profile::assembler::{assemble, ClosedLoop, ClosingTarget};
use crate::profile::generator::{lower_half_arc, rectangle, upper_half_arc};
use crate::profile::ProfileError;

pub const UPPER_HALF: &str = "half1";
pub const LOWER_HALF: &str = "half2";
pub const PLATE: &str = "plate";

/// Shape parameters of the cross-section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossSectionParams {
    /// Cylinder radius.
    pub radius: f64,
    /// Distance between the two half-cylinders.
    pub gap: f64,
    /// Clearance between the plate and each half-cylinder.
    pub plate_clearance: f64,
    /// Ring points per half-cylinder arc.
    pub arc_points: usize,
    /// Extrusion depth of every body along +z.
    pub depth: f64,
    /// Where the plate outline's closing segment returns to.
    ///
    /// Defaults to the second point, which retraces the plate's first edge.
    pub plate_closing: ClosingTarget,
}

impl Default for CrossSectionParams {
    fn default() -> Self {
        Self {
            radius: 0.5,
            gap: 0.05,
            plate_clearance: 0.025,
            arc_points: 200,
            depth: 1.0,
            plate_closing: ClosingTarget::Index(1),
        }
    }
}

impl CrossSectionParams {
    /// Plate thickness: the gap minus the clearance.
    pub fn plate_width(&self) -> f64 {
        self.gap - self.plate_clearance
    }
}

/// The three closed outlines, already rotated into place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossSection {
    /// Rotation applied to every outline, in degrees.
    pub angle: f64,
    pub upper: ClosedLoop,
    pub lower: ClosedLoop,
    pub plate: ClosedLoop,
}

impl CrossSection {
    /// Build the outlines for a geometry angle (`180 - settings angle`).
    ///
    /// Both arcs are rotated about the origin. The plate is a rectangle of
    /// half-length `radius` and width `gap - clearance`, rotated the same way
    /// and then moved by the directional plate offset.
    #[instrument(skip(params))]
    pub fn build(params: &CrossSectionParams, angle: f64) -> Result<Self, ProfileError> {
        let upper = upper_half_arc(params.radius, params.arc_points, params.gap)?.rotated(angle);
        let lower = lower_half_arc(params.radius, params.arc_points, params.gap)?.rotated(angle);
        let plate = rectangle(0.0, 0.0, params.radius, params.plate_width())?
            .rotated(angle)
            .translated_along(angle, params.radius);

        let section = Self {
            angle,
            upper: assemble(UPPER_HALF, &upper, ClosingTarget::First)?,
            lower: assemble(LOWER_HALF, &lower, ClosingTarget::First)?,
            plate: assemble(PLATE, &plate, params.plate_closing)?,
        };
        info!(
            angle,
            upper_points = section.upper.points().len(),
            lower_points = section.lower.points().len(),
            "built cross-section"
        );
        Ok(section)
    }

    /// Outlines in modeling order.
    pub fn loops(&self) -> [&ClosedLoop; 3] {
        [&self.upper, &self.lower, &self.plate]
    }
}
