use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::extrude::extrude_ring;
use super::primitives::make_box;
use super::selection::{classify_boundary_faces, BoundaryFaces, NamedSelection};
use super::store::{Body, BodyId, EntityStore, Face, FaceId};
use super::ModelError;
use crate::geometry::point::{Point2d, Point3d};
use crate::geometry::transform::BoundingBox;
use crate::profile::assembler::ClosedLoop;
use crate::section::CrossSection;
use crate::Tolerance;

pub const FLUID: &str = "Fluid";
pub const OUTLET_SELECTION: &str = "Outlet Fluid";
pub const INLET_SELECTION: &str = "Inlet Fluid";
pub const SURROUNDING_SELECTION: &str = "Surrounding Faces";

/// The box of fluid around the bodies.
///
/// Sketched on the plane `z = plane_z`, centered on `center`, spanning
/// `length` along x and `height` along y, then extruded `width` along +z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluidDomain {
    pub center: Point2d,
    pub length: f64,
    pub height: f64,
    pub width: f64,
    pub plane_z: f64,
}

impl FluidDomain {
    /// Domain for the box sizes in the settings, centered in z on bodies
    /// extruded `body_depth` from `z = 0`.
    pub fn from_box_size(length: f64, width: f64, height: f64, body_depth: f64) -> Self {
        Self {
            center: Point2d::new(0.5, 0.0),
            length,
            height,
            width,
            plane_z: body_depth / 2.0 - width / 2.0,
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        for (parameter, value) in [
            ("box length", self.length),
            ("box height", self.height),
            ("box width", self.width),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ModelError::InvalidDimension { parameter, value });
            }
        }
        Ok(())
    }

    pub fn min(&self) -> Point3d {
        Point3d::new(
            self.center.x - self.length / 2.0,
            self.center.y - self.height / 2.0,
            self.plane_z,
        )
    }

    pub fn max(&self) -> Point3d {
        Point3d::new(
            self.center.x + self.length / 2.0,
            self.center.y + self.height / 2.0,
            self.plane_z + self.width,
        )
    }
}

/// A named collection of bodies and face selections.
#[derive(Debug, Clone)]
pub struct Design {
    name: String,
    store: EntityStore,
    bodies: Vec<BodyId>,
    selections: Vec<NamedSelection>,
    tolerance: Tolerance,
}

impl Design {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            store: EntityStore::new(),
            bodies: vec![],
            selections: vec![],
            tolerance: Tolerance::default(),
        }
    }

    /// Model a complete study: the three outlines extruded `depth` from
    /// `z = 0`, the fluid box, and the six named selections.
    #[instrument(skip(section, domain), fields(angle = section.angle))]
    pub fn from_section(
        name: &str,
        section: &CrossSection,
        depth: f64,
        domain: &FluidDomain,
    ) -> Result<Self, ModelError> {
        let mut design = Self::new(name);
        let mut solids = Vec::with_capacity(3);
        for lp in section.loops() {
            solids.push((lp.name().to_string(), design.extrude_loop(lp, depth)?));
        }

        let fluid = design.add_fluid_domain(domain)?;
        let faces = design.classify_boundary_faces(fluid);
        design.create_named_selection(OUTLET_SELECTION, faces.outlet)?;
        design.create_named_selection(INLET_SELECTION, faces.inlet)?;
        design.create_named_selection(SURROUNDING_SELECTION, faces.surrounding)?;
        for (solid_name, body) in solids {
            let body_faces = design.store.bodies[body].faces.clone();
            design.create_named_selection(&solid_name, body_faces)?;
        }

        info!(
            bodies = design.bodies.len(),
            selections = design.selections.len(),
            "design complete"
        );
        Ok(design)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extrude a closed outline `depth` along +z from `z = 0`.
    pub fn extrude_loop(&mut self, outline: &ClosedLoop, depth: f64) -> Result<BodyId, ModelError> {
        self.check_body_name(outline.name())?;
        let ring = outline.ring(&self.tolerance)?;
        let body = extrude_ring(
            &mut self.store,
            outline.name(),
            &ring,
            0.0,
            depth,
            &self.tolerance,
        )?;
        self.bodies.push(body);
        Ok(body)
    }

    /// Add the fluid box as a body named `Fluid`.
    pub fn add_fluid_domain(&mut self, domain: &FluidDomain) -> Result<BodyId, ModelError> {
        domain.validate()?;
        self.check_body_name(FLUID)?;
        let body = make_box(&mut self.store, FLUID, domain.min(), domain.max());
        self.bodies.push(body);
        Ok(body)
    }

    pub fn classify_boundary_faces(&self, body: BodyId) -> BoundaryFaces {
        classify_boundary_faces(&self.store, body, &self.tolerance)
    }

    pub fn create_named_selection(
        &mut self,
        name: &str,
        faces: Vec<FaceId>,
    ) -> Result<(), ModelError> {
        if self.selections.iter().any(|s| s.name == name) {
            return Err(ModelError::DuplicateSelection(name.to_string()));
        }
        self.selections.push(NamedSelection {
            name: name.to_string(),
            faces,
        });
        Ok(())
    }

    fn check_body_name(&self, name: &str) -> Result<(), ModelError> {
        if self.body_by_name(name).is_some() {
            return Err(ModelError::DuplicateBody(name.to_string()));
        }
        Ok(())
    }

    pub fn body_by_name(&self, name: &str) -> Option<BodyId> {
        self.bodies
            .iter()
            .copied()
            .find(|&id| self.store.bodies[id].name == name)
    }

    /// Bodies in creation order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.bodies.iter().map(|&id| (id, &self.store.bodies[id]))
    }

    pub fn selections(&self) -> &[NamedSelection] {
        &self.selections
    }

    pub fn selection(&self, name: &str) -> Option<&NamedSelection> {
        self.selections.iter().find(|s| s.name == name)
    }

    pub fn face(&self, id: FaceId) -> &Face {
        &self.store.faces[id]
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn bounding_box(&self, name: &str) -> Result<BoundingBox, ModelError> {
        let body = self
            .body_by_name(name)
            .ok_or_else(|| ModelError::UnknownBody(name.to_string()))?;
        Ok(self.store.bounding_box(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::assembler::ClosingTarget;
    use crate::section::CrossSectionParams;
    use approx::assert_relative_eq;

    fn study(angle: f64) -> Design {
        let params = CrossSectionParams {
            arc_points: 24,
            ..CrossSectionParams::default()
        };
        let section = CrossSection::build(&params, angle).unwrap();
        let domain = FluidDomain::from_box_size(10.0, 5.0, 5.0, params.depth);
        Design::from_section("mono", &section, params.depth, &domain).unwrap()
    }

    #[test]
    fn test_study_has_four_bodies_and_six_selections() {
        let design = study(135.0);
        let names: Vec<&str> = design.bodies().map(|(_, b)| b.name.as_str()).collect();
        assert_eq!(names, ["half1", "half2", "plate", FLUID]);
        let selections: Vec<&str> = design.selections().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            selections,
            [
                OUTLET_SELECTION,
                INLET_SELECTION,
                SURROUNDING_SELECTION,
                "half1",
                "half2",
                "plate"
            ]
        );
        assert_eq!(design.selection(INLET_SELECTION).unwrap().faces.len(), 1);
        assert_eq!(design.selection(SURROUNDING_SELECTION).unwrap().faces.len(), 4);
        // Plate ring is 4 corners: 2 caps + 4 sides.
        assert_eq!(design.selection("plate").unwrap().faces.len(), 6);
    }

    #[test]
    fn test_plate_is_whole_for_every_closing_target() {
        for plate_closing in [
            ClosingTarget::First,
            ClosingTarget::Index(1),
            ClosingTarget::Index(2),
            ClosingTarget::Index(3),
        ] {
            let params = CrossSectionParams {
                arc_points: 24,
                plate_closing,
                ..CrossSectionParams::default()
            };
            let section = CrossSection::build(&params, 30.0).unwrap();
            let domain = FluidDomain::from_box_size(10.0, 5.0, 5.0, params.depth);
            let design = Design::from_section("mono", &section, params.depth, &domain).unwrap();

            assert_eq!(design.selection("plate").unwrap().faces.len(), 6, "{plate_closing:?}");
            let plate = design.body_by_name("plate").unwrap();
            let area = 2.0 * params.radius * params.plate_width();
            assert_relative_eq!(
                design.store().volume(plate),
                area * params.depth,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_fluid_box_matches_settings() {
        let design = study(45.0);
        let bb = design.bounding_box(FLUID).unwrap();
        assert_relative_eq!(bb.min.x, -4.5);
        assert_relative_eq!(bb.max.x, 5.5);
        assert_relative_eq!(bb.min.y, -2.5);
        assert_relative_eq!(bb.max.y, 2.5);
        assert_relative_eq!(bb.min.z, -2.0);
        assert_relative_eq!(bb.max.z, 3.0);
    }

    #[test]
    fn test_bodies_sit_inside_fluid() {
        let design = study(135.0);
        let fluid = design.bounding_box(FLUID).unwrap();
        for name in ["half1", "half2", "plate"] {
            assert!(fluid.contains(&design.bounding_box(name).unwrap()), "{name}");
        }
    }

    #[test]
    fn test_duplicate_selection_is_rejected() {
        let mut design = study(0.0);
        assert_eq!(
            design.create_named_selection("plate", vec![]),
            Err(ModelError::DuplicateSelection("plate".into()))
        );
    }

    #[test]
    fn test_duplicate_fluid_is_rejected() {
        let mut design = study(0.0);
        let domain = FluidDomain::from_box_size(1.0, 1.0, 1.0, 1.0);
        assert!(matches!(
            design.add_fluid_domain(&domain),
            Err(ModelError::DuplicateBody(_))
        ));
    }

    #[test]
    fn test_non_positive_box_is_rejected() {
        let mut design = Design::new("empty");
        let domain = FluidDomain::from_box_size(0.0, 5.0, 5.0, 1.0);
        assert!(matches!(
            design.add_fluid_domain(&domain),
            Err(ModelError::InvalidDimension { parameter: "box length", .. })
        ));
    }

    #[test]
    fn test_unknown_body() {
        let design = Design::new("empty");
        assert_eq!(
            design.bounding_box("nope"),
            Err(ModelError::UnknownBody("nope".into()))
        );
    }
}
