use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::geometry::point::Point3d;
use crate::geometry::transform::BoundingBox;
use crate::geometry::vector::Vec3;

new_key_type! {
    pub struct FaceId;
    pub struct BodyId;
}

/// A planar polygonal face with an outward unit normal.
///
/// Vertices run counter-clockwise when viewed from the side the normal
/// points to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Face {
    pub vertices: Vec<Point3d>,
    pub normal: Vec3,
    pub body: BodyId,
}

impl Face {
    pub fn centroid(&self) -> Point3d {
        let n = self.vertices.len().max(1) as f64;
        let (x, y, z) = self
            .vertices
            .iter()
            .fold((0.0, 0.0, 0.0), |(x, y, z), p| (x + p.x, y + p.y, z + p.z));
        Point3d::new(x / n, y / n, z / n)
    }

    /// Area of the (planar) polygon.
    pub fn area(&self) -> f64 {
        let Some(origin) = self.vertices.first() else {
            return 0.0;
        };
        let mut sum = Vec3::ZERO;
        for w in self.vertices.windows(2).skip(1) {
            sum = sum + (w[0] - *origin).cross(&(w[1] - *origin));
        }
        sum.dot(&self.normal).abs() / 2.0
    }
}

/// A closed solid made of planar faces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub name: String,
    pub faces: Vec<FaceId>,
}

/// Arena storage for faces and bodies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityStore {
    pub faces: SlotMap<FaceId, Face>,
    pub bodies: SlotMap<BodyId, Body>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an empty body and return its key.
    pub fn insert_body(&mut self, name: &str) -> BodyId {
        self.bodies.insert(Body {
            name: name.to_string(),
            faces: vec![],
        })
    }

    /// Add a face to `body`.
    pub fn insert_face(&mut self, body: BodyId, vertices: Vec<Point3d>, normal: Vec3) -> FaceId {
        let face_id = self.faces.insert(Face {
            vertices,
            normal,
            body,
        });
        self.bodies[body].faces.push(face_id);
        face_id
    }

    pub fn body_faces(&self, body: BodyId) -> impl Iterator<Item = (FaceId, &Face)> {
        self.bodies[body]
            .faces
            .iter()
            .map(move |&id| (id, &self.faces[id]))
    }

    pub fn bounding_box(&self, body: BodyId) -> BoundingBox {
        BoundingBox::from_points(self.body_faces(body).flat_map(|(_, f)| f.vertices.iter()))
    }

    /// Signed volume by the divergence theorem; positive for outward normals.
    pub fn volume(&self, body: BodyId) -> f64 {
        self.body_faces(body)
            .map(|(_, face)| {
                let c = face.centroid();
                face.area() * face.normal.dot(&(c - Point3d::ORIGIN))
            })
            .sum::<f64>()
            / 3.0
    }
}
