//! Turns point sequences into closed loops of line segments.

use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use super::{Profile, ProfileError};
use crate::Tolerance;
use crate::geometry::point::Point2d;

/// Which point the closing segment runs back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosingTarget {
    /// Close onto the first point.
    #[default]
    First,
    /// Close onto the point at this index.
    Index(usize),
}

impl ClosingTarget {
    pub fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Index(i) => i,
        }
    }
}

/// A straight edge between two sketch points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point2d,
    pub end: Point2d,
}

impl Segment {
    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }
}

/// A named point sequence plus the index its closing segment returns to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedLoop {
    name: String,
    points: Vec<Point2d>,
    closing_index: usize,
}

/// Close `profile` into a loop named `name`.
///
/// Consecutive points are joined in order and one more segment runs from the
/// last point back to the point selected by `closing`.
#[instrument(skip(profile), fields(points = profile.len()))]
pub fn assemble(
    name: &str,
    profile: &Profile,
    closing: ClosingTarget,
) -> Result<ClosedLoop, ProfileError> {
    let len = profile.len();
    if len < 2 {
        return Err(ProfileError::TooFewPoints {
            required: 2,
            provided: len,
        });
    }
    let closing_index = closing.index();
    if closing_index >= len {
        return Err(ProfileError::ClosingIndexOutOfRange {
            index: closing_index,
            len,
        });
    }
    if closing_index != 0 {
        warn!(
            name,
            closing_index, "closing segment does not return to the first point"
        );
    }

    Ok(ClosedLoop {
        name: name.to_string(),
        points: profile.points().to_vec(),
        closing_index,
    })
}

impl ClosedLoop {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[Point2d] {
        &self.points
    }

    pub fn closing_index(&self) -> usize {
        self.closing_index
    }

    /// All segments in drawing order; the closing segment is last.
    pub fn segments(&self) -> Vec<Segment> {
        let mut segments: Vec<Segment> = self
            .points
            .windows(2)
            .map(|w| Segment {
                start: w[0],
                end: w[1],
            })
            .collect();
        if let Some(last) = self.points.last() {
            segments.push(Segment {
                start: *last,
                end: self.points[self.closing_index],
            });
        }
        segments
    }

    /// The closing segment.
    pub fn closing_segment(&self) -> Segment {
        // `assemble` guarantees at least two points.
        let last = self.points[self.points.len() - 1];
        Segment {
            start: last,
            end: self.points[self.closing_index],
        }
    }

    /// The vertex ring enclosing the loop's area.
    ///
    /// The ring follows every point in order, whatever the closing index, so
    /// a closing segment that cuts across the outline does not shrink the
    /// region. Repeated vertices and collinear vertices (including
    /// back-tracking spikes such as the flat-side points of the arcs) are
    /// removed.
    pub fn ring(&self, tolerance: &Tolerance) -> Result<Vec<Point2d>, ProfileError> {
        let ring = clean_ring(&self.points, tolerance);
        if ring.len() < 3 {
            return Err(ProfileError::Degenerate {
                name: self.name.clone(),
                remaining: ring.len(),
            });
        }
        Ok(ring)
    }

    /// Signed area of the cleaned ring; positive when counter-clockwise.
    pub fn signed_area(&self, tolerance: &Tolerance) -> Result<f64, ProfileError> {
        let ring = self.ring(tolerance)?;
        Ok(signed_area(&ring))
    }
}

/// Shoelace area of a closed vertex ring.
pub fn signed_area(ring: &[Point2d]) -> f64 {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let a = ring[i];
            let b = ring[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
        / 2.0
}

fn clean_ring(points: &[Point2d], tolerance: &Tolerance) -> Vec<Point2d> {
    let mut ring: Vec<Point2d> = Vec::with_capacity(points.len());
    for p in points {
        if ring
            .last()
            .is_none_or(|prev| !tolerance.points_coincident(prev, p))
        {
            ring.push(*p);
        }
    }

    loop {
        let n = ring.len();
        if n < 3 {
            return ring;
        }
        if tolerance.points_coincident(&ring[0], &ring[n - 1]) {
            ring.pop();
            continue;
        }
        let flat = (0..n).find(|&i| {
            let prev = ring[(i + n - 1) % n];
            let next = ring[(i + 1) % n];
            let scale = prev.distance_to(&ring[i]) * next.distance_to(&ring[i]);
            tolerance.is_zero_length(prev.turn(&ring[i], &next) / scale.max(1.0))
        });
        match flat {
            Some(i) => {
                ring.remove(i);
                // Removing a spike can leave its neighbours coincident.
                let n = ring.len();
                if n >= 2 {
                    let i = i % n;
                    let prev = (i + n - 1) % n;
                    if tolerance.points_coincident(&ring[prev], &ring[i]) {
                        ring.remove(i);
                    }
                }
            }
            None => return ring,
        }
    }
}
