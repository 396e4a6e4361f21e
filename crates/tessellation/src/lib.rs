//! Triangle meshes for modeled faces, with STL and SVG writers.

pub mod svg;
pub mod writers;

pub use svg::{mesh_to_svg, outlines_to_svg};
pub use writers::write_stl_solid;

use serde::{Deserialize, Serialize};
use splitflow_kernel::model::{BodyId, EntityStore, Face, FaceId};
use splitflow_kernel::{Point3d, Vec3};

/// A triangle mesh with per-vertex normals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// Vertex positions [x, y, z, x, y, z, ...]
    pub positions: Vec<f64>,
    /// Vertex normals [nx, ny, nz, ...]
    pub normals: Vec<f64>,
    /// Triangle indices [i0, i1, i2, ...]
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn add_vertex(&mut self, pos: Point3d, normal: Vec3) -> u32 {
        let idx = self.vertex_count() as u32;
        self.positions.extend_from_slice(&pos.to_array());
        self.normals.extend_from_slice(&normal.to_array());
        idx
    }

    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.extend_from_slice(&[i0, i1, i2]);
    }

    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.vertex_count() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|&idx| idx + offset));
    }

    pub fn position(&self, index: u32) -> Point3d {
        let i = index as usize * 3;
        Point3d::new(self.positions[i], self.positions[i + 1], self.positions[i + 2])
    }

    /// Triangles as vertex-index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Unit normal of a triangle from its winding.
    pub fn facet_normal(&self, tri: [u32; 3]) -> Vec3 {
        let [a, b, c] = tri.map(|i| self.position(i));
        (b - a).cross(&(c - a)).normalized().unwrap_or(Vec3::ZERO)
    }

    /// Signed enclosed volume; positive for a closed, outward-wound mesh.
    pub fn signed_volume(&self) -> f64 {
        self.triangles()
            .map(|tri| {
                let [a, b, c] = tri.map(|i| self.position(i) - Point3d::ORIGIN);
                a.dot(&b.cross(&c))
            })
            .sum::<f64>()
            / 6.0
    }
}

/// Fan-triangulate a planar convex face.
pub fn tessellate_face(face: &Face) -> TriangleMesh {
    let mut mesh = TriangleMesh::new();
    if face.vertices.len() < 3 {
        return mesh;
    }

    let base: Vec<u32> = face
        .vertices
        .iter()
        .map(|p| mesh.add_vertex(*p, face.normal))
        .collect();

    // Fan triangulation (works for convex polygons)
    for i in 1..(base.len() - 1) {
        mesh.add_triangle(base[0], base[i], base[i + 1]);
    }

    mesh
}

/// Tessellate a set of faces into one mesh.
pub fn tessellate_faces(store: &EntityStore, faces: &[FaceId]) -> TriangleMesh {
    let mut mesh = TriangleMesh::new();
    for &id in faces {
        mesh.merge(&tessellate_face(&store.faces[id]));
    }
    mesh
}

/// Tessellate every face of a body.
pub fn tessellate_body(store: &EntityStore, body: BodyId) -> TriangleMesh {
    tessellate_faces(store, &store.bodies[body].faces)
}
