use crate::math::{point_key, Point3, Vector3};

/// One boundary edge between two consecutive ring points.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Start point of the edge.
    pub start: Point3,
    /// End point of the edge.
    pub end: Point3,
}

impl Segment {
    /// Creates a new segment.
    #[must_use]
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    /// Returns the length of the segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Returns the unnormalized direction vector from start to end.
    #[must_use]
    pub fn delta(&self) -> Vector3 {
        self.end - self.start
    }

    /// Returns the undirected identity key of this segment.
    ///
    /// The key is the same for a segment and its reversal, and for any
    /// segment whose endpoints lie on the same tolerance-grid cells.
    #[must_use]
    pub fn key(&self) -> SegmentKey {
        SegmentKey::new(&self.start, &self.end)
    }
}

/// Undirected, tolerance-quantized identity of a boundary edge.
///
/// Used by the orchestrator to skip edges already processed in a run,
/// regardless of traversal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentKey {
    a: [i64; 3],
    b: [i64; 3],
}

impl SegmentKey {
    /// Builds the key for an endpoint pair, canonically ordered.
    #[must_use]
    pub fn new(start: &Point3, end: &Point3) -> Self {
        let ka = point_key(start);
        let kb = point_key(end);
        if kb < ka {
            Self { a: kb, b: ka }
        } else {
            Self { a: ka, b: kb }
        }
    }
}
