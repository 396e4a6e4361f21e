use tracing::{info, instrument};

use super::store::{BodyId, EntityStore};
use crate::geometry::point::Point3d;
use crate::geometry::vector::Vec3;

/// Build an axis-aligned box body from two opposite corners.
#[instrument(skip(store))]
pub fn make_box(store: &mut EntityStore, name: &str, min: Point3d, max: Point3d) -> BodyId {
    info!(min = ?min.to_array(), max = ?max.to_array(), "creating box primitive");
    let (x0, y0, z0) = (min.x, min.y, min.z);
    let (x1, y1, z1) = (max.x, max.y, max.z);
    let v = [
        Point3d::new(x0, y0, z0), // 0: front-bottom-left
        Point3d::new(x1, y0, z0), // 1: front-bottom-right
        Point3d::new(x1, y1, z0), // 2: front-top-right
        Point3d::new(x0, y1, z0), // 3: front-top-left
        Point3d::new(x0, y0, z1), // 4: back-bottom-left
        Point3d::new(x1, y0, z1), // 5: back-bottom-right
        Point3d::new(x1, y1, z1), // 6: back-top-right
        Point3d::new(x0, y1, z1), // 7: back-top-left
    ];

    // Counter-clockwise seen from outside.
    let face_defs: [([usize; 4], Vec3); 6] = [
        ([0, 3, 2, 1], -Vec3::Z), // front (z = z0)
        ([4, 5, 6, 7], Vec3::Z),  // back  (z = z1)
        ([0, 4, 7, 3], -Vec3::X), // left  (x = x0)
        ([1, 2, 6, 5], Vec3::X),  // right (x = x1)
        ([0, 1, 5, 4], -Vec3::Y), // bottom (y = y0)
        ([3, 7, 6, 2], Vec3::Y),  // top    (y = y1)
    ];

    let body = store.insert_body(name);
    for (indices, normal) in face_defs {
        store.insert_face(body, indices.iter().map(|&i| v[i]).collect(), normal);
    }
    body
}
