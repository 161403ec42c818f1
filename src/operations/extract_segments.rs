use crate::diag::{DiagEvent, Diagnostics};
use crate::geometry::Segment;
use crate::math::{points_coincident, Point3, TOLERANCE};

/// Turns a cleaned point ring into an ordered list of boundary segments.
///
/// The ring is treated as closed: the last point connects back to the
/// first. Segments shorter than the tolerance are dropped with a
/// diagnostic rather than inserted.
#[derive(Debug)]
pub struct ExtractSegments {
    ring: Vec<Point3>,
}

impl ExtractSegments {
    /// Creates a new extraction operation over a cleaned ring.
    #[must_use]
    pub fn new(ring: Vec<Point3>) -> Self {
        Self { ring }
    }

    /// Executes the extraction.
    pub fn execute(&self, diag: &mut Diagnostics) -> Vec<Segment> {
        let n = self.ring.len();
        let mut segments = Vec::with_capacity(n);
        for i in 0..n {
            let j = (i + 1) % n;
            let segment = Segment::new(self.ring[i], self.ring[j]);
            let length = segment.length();
            if length < TOLERANCE {
                diag.record(DiagEvent::DroppedSegment { index: i, length });
                continue;
            }
            segments.push(segment);
        }
        segments
    }

    /// Diagnostic check: does the ring still contain adjacent duplicate
    /// points? Not used for control flow.
    #[must_use]
    pub fn has_adjacent_duplicates(&self) -> bool {
        let n = self.ring.len();
        if n < 2 {
            return false;
        }
        (0..n).any(|i| points_coincident(&self.ring[i], &self.ring[(i + 1) % n]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn square_ring_yields_four_segments_with_wraparound() {
        let mut diag = Diagnostics::new();
        let segments = ExtractSegments::new(vec![
            p(0.0, 0.0, 0.0),
            p(5.0, 0.0, 0.0),
            p(5.0, 5.0, 0.0),
            p(0.0, 5.0, 0.0),
        ])
        .execute(&mut diag);
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[3].start, p(0.0, 5.0, 0.0));
        assert_eq!(segments[3].end, p(0.0, 0.0, 0.0));
        assert!(diag.events().is_empty());
    }

    #[test]
    fn zero_length_segment_is_dropped_with_diagnostic() {
        // Un-cleaned ring with an adjacent duplicate: the duplicate edge is
        // dropped, the rest survive.
        let mut diag = Diagnostics::new();
        let segments = ExtractSegments::new(vec![
            p(0.0, 0.0, 0.0),
            p(3.0, 0.0, 0.0),
            p(3.0, 0.0, 0.0),
            p(3.0, 3.0, 0.0),
            p(0.0, 3.0, 0.0),
        ])
        .execute(&mut diag);
        assert_eq!(segments.len(), 4);
        assert!(diag.any(|e| matches!(e, DiagEvent::DroppedSegment { index: 1, .. })));
    }

    #[test]
    fn adjacent_duplicate_check() {
        let clean = ExtractSegments::new(vec![
            p(0.0, 0.0, 0.0),
            p(3.0, 0.0, 0.0),
            p(3.0, 3.0, 0.0),
        ]);
        assert!(!clean.has_adjacent_duplicates());

        let dirty = ExtractSegments::new(vec![
            p(0.0, 0.0, 0.0),
            p(3.0, 0.0, 0.0),
            p(3.0, 0.0005, 0.0),
        ]);
        assert!(dirty.has_adjacent_duplicates());
    }

    #[test]
    fn empty_ring_yields_no_segments() {
        let mut diag = Diagnostics::new();
        let segments = ExtractSegments::new(Vec::new()).execute(&mut diag);
        assert!(segments.is_empty());
    }
}
