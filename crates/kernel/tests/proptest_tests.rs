//! Property-based tests for profile generation and the point transforms.

use proptest::prelude::*;

use splitflow_kernel::{
    assemble, lower_half_arc, rectangle, rotate, upper_half_arc, ClosingTarget, Point2d, Tolerance,
};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_point() -> impl Strategy<Value = Point2d> {
    (-1000.0f64..1000.0, -1000.0f64..1000.0).prop_map(|(x, y)| Point2d::new(x, y))
}

/// Rotation angle in degrees.
fn arb_angle() -> impl Strategy<Value = f64> {
    -720.0f64..720.0
}

fn arb_radius() -> impl Strategy<Value = f64> {
    0.01f64..100.0
}

fn arb_gap() -> impl Strategy<Value = f64> {
    0.0f64..10.0
}

fn arb_point_count() -> impl Strategy<Value = usize> {
    2usize..300
}

const TOL: f64 = 1e-9;

// ---------------------------------------------------------------------------
// 1. Upper arc: size, endpoints, height and radius of every ring point
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn upper_arc_shape(radius in arb_radius(), n in arb_point_count(), gap in arb_gap()) {
        let arc = upper_half_arc(radius, n, gap).unwrap();
        let pts = arc.points();
        prop_assert_eq!(pts.len(), n + 2);

        let lift = gap / 2.0;
        prop_assert!((pts[0].x - radius).abs() < TOL * radius);
        prop_assert!((pts[0].y - lift).abs() < TOL * radius);
        prop_assert!((pts[n - 1].x + radius).abs() < TOL * radius);
        prop_assert!((pts[n - 1].y - lift).abs() < TOL * radius);

        for p in &pts[..n] {
            prop_assert!(p.y >= lift - TOL * radius, "ring point below the gap: {:?}", p);
            let dy = p.y - lift;
            let r2 = p.x * p.x + dy * dy;
            prop_assert!((r2 - radius * radius).abs() < TOL * radius * radius,
                "ring point off the circle: {:?}", p);
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Lower arc mirrors the upper arc about the x-axis
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn lower_arc_mirrors_upper(radius in arb_radius(), n in arb_point_count(), gap in arb_gap()) {
        let upper = upper_half_arc(radius, n, gap).unwrap();
        let lower = lower_half_arc(radius, n, gap).unwrap();
        prop_assert_eq!(upper.len(), lower.len());
        for (u, l) in upper.points().iter().zip(lower.points()) {
            prop_assert_eq!(u.x, l.x);
            prop_assert_eq!(u.y, -l.y);
        }
    }
}

// ---------------------------------------------------------------------------
// 3. Rectangle: five points, closed, 2L by W
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn rectangle_shape(
        c in arb_point(),
        length in 0.001f64..100.0,
        width in 0.001f64..100.0,
    ) {
        let rect = rectangle(c.x, c.y, length, width).unwrap();
        let pts = rect.points();
        prop_assert_eq!(pts.len(), 5);
        prop_assert_eq!(pts[0], pts[4]);

        let xs = pts.iter().map(|p| p.x);
        let ys = pts.iter().map(|p| p.y);
        let span_x = xs.clone().fold(f64::MIN, f64::max) - xs.fold(f64::MAX, f64::min);
        let span_y = ys.clone().fold(f64::MIN, f64::max) - ys.fold(f64::MAX, f64::min);
        prop_assert!((span_x - 2.0 * length).abs() < 1e-9 * (1.0 + c.x.abs()));
        prop_assert!((span_y - width).abs() < 1e-9 * (1.0 + c.y.abs()));
    }
}

// ---------------------------------------------------------------------------
// 4. Rotation: identity at zero, inverse round-trip, preserves the norm
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn rotate_zero_is_identity(p in arb_point()) {
        let r = rotate(p, 0.0);
        prop_assert!((r.x - p.x).abs() < TOL);
        prop_assert!((r.y - p.y).abs() < TOL);
    }

    #[test]
    fn rotate_round_trip(p in arb_point(), a in arb_angle()) {
        let back = rotate(rotate(p, a), -a);
        let scale = 1.0 + p.norm();
        prop_assert!((back.x - p.x).abs() < TOL * scale, "{:?} -> {:?}", p, back);
        prop_assert!((back.y - p.y).abs() < TOL * scale, "{:?} -> {:?}", p, back);
    }

    #[test]
    fn rotate_preserves_norm(p in arb_point(), a in arb_angle()) {
        let r = rotate(p, a);
        prop_assert!((r.norm() - p.norm()).abs() < TOL * (1.0 + p.norm()));
    }
}

// ---------------------------------------------------------------------------
// 5. Assembled arcs always close into a counter-clockwise half-disk
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn arc_loop_encloses_half_disk(radius in 0.1f64..10.0, n in 3usize..200, a in arb_angle()) {
        let arc = upper_half_arc(radius, n, 0.0).unwrap().rotated(a);
        let lp = assemble("half1", &arc, ClosingTarget::First).unwrap();
        prop_assert_eq!(lp.segments().len(), arc.len());

        let area = lp.signed_area(&Tolerance::default()).unwrap();
        // Inscribed polygon of the half disk: area below πr²/2 and
        // approaching it as n grows.
        let half_disk = std::f64::consts::PI * radius * radius / 2.0;
        prop_assert!(area > 0.0);
        prop_assert!(area <= half_disk * (1.0 + 1e-9));
    }
}
