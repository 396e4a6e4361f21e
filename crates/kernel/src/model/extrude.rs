use tracing::{debug, instrument};

use super::store::{BodyId, EntityStore};
use super::ModelError;
use crate::geometry::point::Point2d;
use crate::geometry::vector::Vec3;
use crate::profile::assembler::signed_area;
use crate::Tolerance;

/// Extrude a convex vertex ring from the plane `z = z0` along +z.
///
/// The ring is reoriented counter-clockwise if needed. The body gets a
/// bottom cap (normal −z), a top cap (normal +z) and one rectangular side
/// per ring edge with its outward normal in the xy-plane.
#[instrument(skip(store, ring, tolerance), fields(vertices = ring.len()))]
pub fn extrude_ring(
    store: &mut EntityStore,
    name: &str,
    ring: &[Point2d],
    z0: f64,
    depth: f64,
    tolerance: &Tolerance,
) -> Result<BodyId, ModelError> {
    if !(depth.is_finite() && depth > 0.0) {
        return Err(ModelError::InvalidDimension {
            parameter: "depth",
            value: depth,
        });
    }

    let mut ring = ring.to_vec();
    if signed_area(&ring) < 0.0 {
        ring.reverse();
    }
    check_convex(name, &ring, tolerance)?;

    let z1 = z0 + depth;
    let n = ring.len();
    let body = store.insert_body(name);

    let bottom = ring.iter().rev().map(|p| p.at_z(z0)).collect();
    store.insert_face(body, bottom, -Vec3::Z);

    let top = ring.iter().map(|p| p.at_z(z1)).collect();
    store.insert_face(body, top, Vec3::Z);

    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        let edge = Vec3::new(b.x - a.x, b.y - a.y, 0.0);
        // Right-hand perpendicular of a CCW edge points outward.
        let normal = Vec3::new(edge.y, -edge.x, 0.0)
            .normalized()
            .unwrap_or(Vec3::X);
        store.insert_face(
            body,
            vec![a.at_z(z0), b.at_z(z0), b.at_z(z1), a.at_z(z1)],
            normal,
        );
    }

    debug!(faces = n + 2, "extruded body");
    Ok(body)
}

fn check_convex(name: &str, ring: &[Point2d], tolerance: &Tolerance) -> Result<(), ModelError> {
    let n = ring.len();
    for i in 0..n {
        let prev = ring[(i + n - 1) % n];
        let next = ring[(i + 1) % n];
        if prev.turn(&ring[i], &next) < -tolerance.coincidence {
            return Err(ModelError::NonConvexProfile {
                name: name.to_string(),
                vertex: i,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> Vec<Point2d> {
        vec![
            Point2d::new(0.0, 0.0),
            Point2d::new(1.0, 0.0),
            Point2d::new(1.0, 1.0),
            Point2d::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_extrude_square_gives_unit_cube() {
        let mut store = EntityStore::new();
        let body = extrude_ring(&mut store, "cube", &square(), 0.0, 1.0, &Tolerance::default())
            .unwrap();
        assert_eq!(store.bodies[body].faces.len(), 6);
        assert_relative_eq!(store.volume(body), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_clockwise_ring_is_reoriented() {
        let mut store = EntityStore::new();
        let mut ring = square();
        ring.reverse();
        let body = extrude_ring(&mut store, "cube", &ring, -0.5, 2.0, &Tolerance::default())
            .unwrap();
        assert_relative_eq!(store.volume(body), 2.0, epsilon = 1e-12);
        let bb = store.bounding_box(body);
        assert_relative_eq!(bb.min.z, -0.5);
        assert_relative_eq!(bb.max.z, 1.5);
    }

    #[test]
    fn test_side_normals_point_outward() {
        let mut store = EntityStore::new();
        let body = extrude_ring(&mut store, "cube", &square(), 0.0, 1.0, &Tolerance::default())
            .unwrap();
        let center = store.bounding_box(body).center();
        for (_, face) in store.body_faces(body) {
            let outward = face.centroid() - center;
            assert!(outward.dot(&face.normal) > 0.0);
        }
    }

    #[test]
    fn test_non_convex_ring_is_rejected() {
        let ring = vec![
            Point2d::new(0.0, 0.0),
            Point2d::new(2.0, 0.0),
            Point2d::new(1.0, 0.5),
            Point2d::new(2.0, 2.0),
            Point2d::new(0.0, 2.0),
        ];
        let mut store = EntityStore::new();
        let err = extrude_ring(&mut store, "notch", &ring, 0.0, 1.0, &Tolerance::default())
            .unwrap_err();
        assert!(matches!(err, ModelError::NonConvexProfile { vertex: 2, .. }));
    }

    #[test]
    fn test_zero_depth_is_rejected() {
        let mut store = EntityStore::new();
        assert!(matches!(
            extrude_ring(&mut store, "flat", &square(), 0.0, 0.0, &Tolerance::default()),
            Err(ModelError::InvalidDimension { parameter: "depth", .. })
        ));
    }
}
