use serde::{Deserialize, Serialize};

use super::store::{BodyId, EntityStore, FaceId};
use crate::Tolerance;

/// A labeled group of faces that downstream meshing and solving refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSelection {
    pub name: String,
    pub faces: Vec<FaceId>,
}

impl NamedSelection {
    /// Zone name used by the meshing tool: lowercase, spaces become dashes.
    pub fn zone_name(&self) -> String {
        zone_name(&self.name)
    }
}

pub fn zone_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

/// Fluid-box faces split by outward normal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryFaces {
    /// Normal along +x.
    pub outlet: Vec<FaceId>,
    /// Normal along −x.
    pub inlet: Vec<FaceId>,
    /// Everything else.
    pub surrounding: Vec<FaceId>,
}

/// Classify the faces of `body` by the x-component of their outward normal.
pub fn classify_boundary_faces(
    store: &EntityStore,
    body: BodyId,
    tolerance: &Tolerance,
) -> BoundaryFaces {
    let mut faces = BoundaryFaces::default();
    for (id, face) in store.body_faces(body) {
        if tolerance.normal_matches(face.normal.x, 1.0) {
            faces.outlet.push(id);
        } else if tolerance.normal_matches(face.normal.x, -1.0) {
            faces.inlet.push(id);
        } else {
            faces.surrounding.push(id);
        }
    }
    faces
}
