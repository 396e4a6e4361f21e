//! Closed-form outlines: two half-cylinder arcs and the connecting plate.

use std::f64::consts::PI;

use tracing::{debug, instrument};

use super::{Profile, ProfileError};
use crate::geometry::point::Point2d;

/// Smallest number of ring points that still spans `[0, π]`.
pub const MIN_ARC_POINTS: usize = 2;

fn require_positive(parameter: &'static str, value: f64) -> Result<(), ProfileError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ProfileError::NonPositive { parameter, value })
    }
}

fn require_non_negative(parameter: &'static str, value: f64) -> Result<(), ProfileError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ProfileError::Negative { parameter, value })
    }
}

fn validate_arc(radius: f64, point_count: usize, gap: f64) -> Result<(), ProfileError> {
    require_positive("radius", radius)?;
    require_non_negative("gap", gap)?;
    if point_count < MIN_ARC_POINTS {
        return Err(ProfileError::TooFewPoints {
            required: MIN_ARC_POINTS,
            provided: point_count,
        });
    }
    Ok(())
}

/// Angles `θ_i = i / (n - 1) · π` for `i` in `0..n`.
fn arc_angles(point_count: usize) -> impl Iterator<Item = f64> {
    let last = (point_count - 1) as f64;
    (0..point_count).map(move |i| i as f64 / last * PI)
}

/// Half circle above the x-axis, lifted by `gap / 2`.
///
/// Returns `point_count` ring points from `θ = 0` to `θ = π`, followed by the
/// two flat-side points `(radius, gap/2)` and `(-radius, gap/2)`.
#[instrument]
pub fn upper_half_arc(radius: f64, point_count: usize, gap: f64) -> Result<Profile, ProfileError> {
    validate_arc(radius, point_count, gap)?;
    let offset = gap / 2.0;

    let mut points: Vec<Point2d> = arc_angles(point_count)
        .map(|theta| Point2d::new(radius * theta.cos(), radius * theta.sin() + offset))
        .collect();
    points.push(Point2d::new(radius, offset));
    points.push(Point2d::new(-radius, offset));

    debug!(points = points.len(), "generated upper half arc");
    Ok(Profile::from_points(points))
}

/// Mirror of [`upper_half_arc`] below the x-axis, lowered by `gap / 2`.
#[instrument]
pub fn lower_half_arc(radius: f64, point_count: usize, gap: f64) -> Result<Profile, ProfileError> {
    validate_arc(radius, point_count, gap)?;
    let offset = gap / 2.0;

    let mut points: Vec<Point2d> = arc_angles(point_count)
        .map(|theta| Point2d::new(radius * theta.cos(), -radius * theta.sin() - offset))
        .collect();
    points.push(Point2d::new(radius, -offset));
    points.push(Point2d::new(-radius, -offset));

    debug!(points = points.len(), "generated lower half arc");
    Ok(Profile::from_points(points))
}

/// Axis-aligned rectangle centered on `(center_x, center_y)`.
///
/// `length` is the half-length: the rectangle spans `2 · length` along x and
/// `width` along y. The five points start at the bottom-left corner, run
/// counter-clockwise and repeat the first corner last.
#[instrument]
pub fn rectangle(
    center_x: f64,
    center_y: f64,
    length: f64,
    width: f64,
) -> Result<Profile, ProfileError> {
    require_positive("length", length)?;
    require_positive("width", width)?;

    let half_length = length;
    let half_width = width / 2.0;
    let bottom_left = Point2d::new(center_x - half_length, center_y - half_width);

    Ok(Profile::from_points(vec![
        bottom_left,
        Point2d::new(center_x + half_length, center_y - half_width),
        Point2d::new(center_x + half_length, center_y + half_width),
        Point2d::new(center_x - half_length, center_y + half_width),
        bottom_left,
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_upper_arc_four_points() {
        let arc = upper_half_arc(0.5, 4, 0.05).unwrap();
        assert_eq!(arc.len(), 6);

        let pts = arc.points();
        assert_relative_eq!(pts[0].x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(pts[0].y, 0.025, epsilon = 1e-12);
        assert_relative_eq!(pts[1].x, 0.5 * (PI / 3.0).cos(), epsilon = 1e-12);
        assert_relative_eq!(pts[1].y, 0.5 * (PI / 3.0).sin() + 0.025, epsilon = 1e-12);
        assert_relative_eq!(pts[3].x, -0.5, epsilon = 1e-12);
        assert_relative_eq!(pts[3].y, 0.025, epsilon = 1e-12);
        assert_eq!(pts[4], Point2d::new(0.5, 0.025));
        assert_eq!(pts[5], Point2d::new(-0.5, 0.025));
    }

    #[test]
    fn test_lower_arc_closing_points() {
        let arc = lower_half_arc(0.5, 4, 0.05).unwrap();
        let pts = arc.points();
        assert_eq!(pts[4], Point2d::new(0.5, -0.025));
        assert_eq!(pts[5], Point2d::new(-0.5, -0.025));
        assert!(pts[1].y < -0.025);
    }

    #[test]
    fn test_two_point_arc_is_diameter() {
        let arc = upper_half_arc(1.0, 2, 0.0).unwrap();
        assert_eq!(arc.len(), 4);
        assert_relative_eq!(arc.points()[1].x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(arc.points()[1].y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_single_point_arc_is_rejected() {
        let err = upper_half_arc(0.5, 1, 0.05).unwrap_err();
        assert_eq!(
            err,
            ProfileError::TooFewPoints {
                required: 2,
                provided: 1
            }
        );
        assert!(lower_half_arc(0.5, 0, 0.05).is_err());
    }

    #[test]
    fn test_bad_radius_and_gap_are_rejected() {
        assert!(matches!(
            upper_half_arc(0.0, 10, 0.05),
            Err(ProfileError::NonPositive { parameter: "radius", .. })
        ));
        assert!(matches!(
            upper_half_arc(-1.0, 10, 0.05),
            Err(ProfileError::NonPositive { .. })
        ));
        assert!(matches!(
            lower_half_arc(0.5, 10, -0.01),
            Err(ProfileError::Negative { parameter: "gap", .. })
        ));
        assert!(upper_half_arc(f64::NAN, 10, 0.05).is_err());
    }

    #[test]
    fn test_rectangle_scenario() {
        let rect = rectangle(0.0, 0.0, 0.5, 0.025).unwrap();
        let expected = [
            (-0.5, -0.0125),
            (0.5, -0.0125),
            (0.5, 0.0125),
            (-0.5, 0.0125),
            (-0.5, -0.0125),
        ];
        assert_eq!(rect.len(), 5);
        for (p, (x, y)) in rect.points().iter().zip(expected) {
            assert_relative_eq!(p.x, x, epsilon = 1e-12);
            assert_relative_eq!(p.y, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rectangle_off_center() {
        let rect = rectangle(1.0, -2.0, 0.25, 1.0).unwrap();
        assert_eq!(rect.first(), Some(&Point2d::new(0.75, -2.5)));
        assert_eq!(rect.points()[2], Point2d::new(1.25, -1.5));
    }

    #[test]
    fn test_rectangle_rejects_zero_width() {
        assert!(matches!(
            rectangle(0.0, 0.0, 0.5, 0.0),
            Err(ProfileError::NonPositive { parameter: "width", .. })
        ));
    }
}
