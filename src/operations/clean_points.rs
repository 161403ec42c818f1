use crate::diag::{DiagEvent, Diagnostics};
use crate::math::{is_finite_point, points_coincident, Point3};

/// Outcome of boundary point cleaning.
#[derive(Debug, Clone, PartialEq)]
pub enum CleanedRing {
    /// Fewer than 3 points survived — nothing to build, not an error.
    Degenerate(Vec<Point3>),
    /// A usable closed ring (last point connects back to the first).
    Closed(Vec<Point3>),
}

/// Deduplicates and validates raw boundary points.
///
/// Points with non-finite coordinates are discarded, and a point closer
/// than the tolerance to **any** already-accepted point is treated as a
/// duplicate. Order is preserved relative to first occurrence. Pure: no
/// scene access.
#[derive(Debug)]
pub struct CleanPoints {
    points: Vec<Point3>,
}

impl CleanPoints {
    /// Creates a new cleaning operation.
    #[must_use]
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    /// Executes the cleaning pass.
    pub fn execute(&self, diag: &mut Diagnostics) -> CleanedRing {
        let mut accepted: Vec<Point3> = Vec::with_capacity(self.points.len());
        for (index, point) in self.points.iter().enumerate() {
            if !is_finite_point(point) {
                diag.record(DiagEvent::InvalidPoint { index });
                continue;
            }
            if accepted.iter().any(|a| points_coincident(a, point)) {
                continue;
            }
            accepted.push(*point);
        }
        if accepted.len() < 3 {
            diag.record(DiagEvent::DegenerateRing {
                survivors: accepted.len(),
            });
            CleanedRing::Degenerate(accepted)
        } else {
            CleanedRing::Closed(accepted)
        }
    }
}
