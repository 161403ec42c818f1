use std::collections::HashSet;

use crate::diag::{DiagEvent, Diagnostics};
use crate::error::Result;
use crate::geometry::{FaceSet, Segment, SegmentKey};
use crate::math::Point3;
use crate::scene::Scene;
use crate::settings::TapeSettings;

use super::{
    BuildStripPanel, CleanPoints, CleanedRing, ConflictPolicy, ExtractSegments, ExtrudeOutcome,
    ExtrudePanel, MaterialPolicy, ReconcileConnections,
};

/// Registry of boundary edges already processed, keyed by undirected
/// segment identity.
///
/// Prevents re-processing an edge shared by overlapping input: a polygon
/// revisiting the same edge, or batched multi-ring input sharing edges.
#[derive(Debug, Default)]
pub struct ProcessedSegments {
    keys: HashSet<SegmentKey>,
}

impl ProcessedSegments {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a key as processed. Returns `false` if it already was.
    pub fn insert(&mut self, key: SegmentKey) -> bool {
        self.keys.insert(key)
    }

    /// Number of processed edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if nothing has been processed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Summary of one boundary-ring run.
#[derive(Debug, Default)]
pub struct TapeRun {
    /// Face sets of the strips that were built (including degraded flat
    /// strips, as single-face sets).
    pub strips: Vec<FaceSet>,
    /// Segments that went through the full build.
    pub segments_processed: usize,
    /// Segments skipped: duplicates, conflicts, rejections and failures.
    pub segments_skipped: usize,
}

/// Drives the tape pipeline over one boundary ring.
///
/// Cleans the points, extracts segments, and for each not-yet-processed
/// segment builds a panel, extrudes it, applies material over the whole
/// face set and reconciles strip intersections. One failing segment never
/// aborts the ring: errors are isolated at the per-segment boundary and
/// converted into diagnostics.
///
/// The processed-segment registry lives on the orchestrator, so feeding
/// several rings through one `BuildTape` deduplicates edges across rings.
#[derive(Debug)]
pub struct BuildTape {
    settings: TapeSettings,
    processed: ProcessedSegments,
}

impl BuildTape {
    /// Creates a new orchestrator.
    #[must_use]
    pub fn new(settings: TapeSettings) -> Self {
        Self {
            settings,
            processed: ProcessedSegments::new(),
        }
    }

    /// Runs the pipeline over one boundary ring.
    ///
    /// Infallible by design: the worst outcome is fewer strips than
    /// requested, always diagnosable from the recorded events.
    pub fn execute<S, C, M>(
        &mut self,
        ring: &[Point3],
        scene: &mut S,
        conflicts: &C,
        materials: &M,
        diag: &mut Diagnostics,
    ) -> TapeRun
    where
        S: Scene,
        C: ConflictPolicy<S>,
        M: MaterialPolicy<S>,
    {
        let mut run = TapeRun::default();

        let cleaned = match CleanPoints::new(ring.to_vec()).execute(diag) {
            CleanedRing::Degenerate(_) => return run,
            CleanedRing::Closed(points) => points,
        };

        for segment in ExtractSegments::new(cleaned).execute(diag) {
            let key = segment.key();
            if !self.processed.insert(key) {
                diag.record(DiagEvent::DuplicateSegment { key });
                run.segments_skipped += 1;
                continue;
            }
            match self.build_segment(&segment, scene, conflicts, materials, diag) {
                Ok(Some(faces)) => {
                    run.strips.push(faces);
                    run.segments_processed += 1;
                }
                Ok(None) => run.segments_skipped += 1,
                Err(error) => {
                    diag.record(DiagEvent::SegmentFailed {
                        detail: error.to_string(),
                    });
                    run.segments_skipped += 1;
                }
            }
        }
        run
    }

    /// Builds one strip: panel → extrusion → material → reconciliation.
    fn build_segment<S, C, M>(
        &self,
        segment: &Segment,
        scene: &mut S,
        conflicts: &C,
        materials: &M,
        diag: &mut Diagnostics,
    ) -> Result<Option<FaceSet>>
    where
        S: Scene,
        C: ConflictPolicy<S>,
        M: MaterialPolicy<S>,
    {
        let Some(panel) = BuildStripPanel::new(segment.clone(), self.settings.width)
            .execute(scene, conflicts, diag)?
        else {
            return Ok(None);
        };

        let outcome = ExtrudePanel::new(self.settings.height, self.settings.elevation)
            .execute(panel, scene, diag)?;
        let faces = match outcome {
            ExtrudeOutcome::Extruded(faces) => faces,
            ExtrudeOutcome::Flat(face) => FaceSet::from_seed(face),
        };

        materials.apply_material(&faces, scene)?;
        // Strips meeting at ring corners intersect along side-face edges,
        // so every face of the volume gets the reconciliation pass.
        for face in &faces {
            ReconcileConnections::new(face, self.settings.material.clone()).execute(scene)?;
        }
        Ok(Some(faces))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::{NoConflicts, TapeMaterial};
    use crate::scene::{MeshScene, Scene};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn settings() -> TapeSettings {
        TapeSettings::default()
    }

    fn run_ring(ring: &[Point3]) -> (MeshScene, Diagnostics, TapeRun) {
        let mut scene = MeshScene::new();
        let mut diag = Diagnostics::new();
        let policy = TapeMaterial::new("zone tape");
        let run = BuildTape::new(settings()).execute(
            ring,
            &mut scene,
            &NoConflicts,
            &policy,
            &mut diag,
        );
        (scene, diag, run)
    }

    #[test]
    fn square_ring_builds_four_strips() {
        let (_, diag, run) = run_ring(&[
            p(0.0, 0.0, 0.0),
            p(5.0, 0.0, 0.0),
            p(5.0, 5.0, 0.0),
            p(0.0, 5.0, 0.0),
        ]);
        assert_eq!(run.segments_processed, 4);
        assert_eq!(run.segments_skipped, 0);
        assert_eq!(run.strips.len(), 4);
        // Each strip contributes a complete box. Strips of a closed ring
        // meet at shared corner edges, so later strips also discover their
        // already-built neighbors.
        assert_eq!(run.strips[0].len(), 6);
        for strip in &run.strips {
            assert!(strip.len() >= 6);
        }
        assert!(diag.events().is_empty());
    }

    #[test]
    fn square_ring_creates_six_faces_per_strip() {
        let (scene, _, run) = run_ring(&[
            p(0.0, 0.0, 0.0),
            p(5.0, 0.0, 0.0),
            p(5.0, 5.0, 0.0),
            p(0.0, 5.0, 0.0),
        ]);
        assert_eq!(run.strips.len(), 4);
        assert_eq!(scene.face_count(), 24);
    }

    #[test]
    fn every_face_of_each_strip_gets_the_tape_material() {
        let (mut scene, _, run) = run_ring(&[
            p(0.0, 0.0, 0.0),
            p(5.0, 0.0, 0.0),
            p(5.0, 5.0, 0.0),
            p(0.0, 5.0, 0.0),
        ]);
        let material = scene.ensure_material("zone tape");
        for strip in &run.strips {
            for face in strip {
                assert_eq!(scene.face_material(face).unwrap(), Some(material));
            }
        }
    }

    #[test]
    fn repeated_input_point_matches_clean_ring() {
        let (_, _, run) = run_ring(&[
            p(0.0, 0.0, 0.0),
            p(0.0, 0.0, 0.0),
            p(3.0, 0.0, 0.0),
            p(3.0, 3.0, 0.0),
            p(0.0, 3.0, 0.0),
        ]);
        assert_eq!(run.segments_processed, 4);
        assert_eq!(run.strips.len(), 4);
    }

    #[test]
    fn exact_closing_point_drops_one_segment() {
        // Closing point equals the first point, so only 3 edges remain of
        // the naive 4.
        let (_, _, run) = run_ring(&[
            p(0.0, 0.0, 0.0),
            p(3.0, 0.0, 0.0),
            p(3.0, 3.0, 0.0),
            p(0.0, 0.0, 0.0),
        ]);
        assert_eq!(run.segments_processed, 3);
    }

    #[test]
    fn degenerate_ring_builds_nothing_and_never_panics() {
        let (scene, diag, run) = run_ring(&[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)]);
        assert_eq!(run.segments_processed, 0);
        assert!(run.strips.is_empty());
        assert_eq!(scene.face_count(), 0);
        assert!(diag.any(|e| matches!(e, DiagEvent::DegenerateRing { .. })));
    }

    #[test]
    fn second_pass_over_the_same_ring_is_deduplicated() {
        let ring = [
            p(0.0, 0.0, 0.0),
            p(5.0, 0.0, 0.0),
            p(5.0, 5.0, 0.0),
            p(0.0, 5.0, 0.0),
        ];
        let mut scene = MeshScene::new();
        let mut diag = Diagnostics::new();
        let policy = TapeMaterial::new("zone tape");
        let mut tape = BuildTape::new(settings());

        let first = tape.execute(&ring, &mut scene, &NoConflicts, &policy, &mut diag);
        let second = tape.execute(&ring, &mut scene, &NoConflicts, &policy, &mut diag);

        assert_eq!(first.segments_processed, 4);
        assert_eq!(second.segments_processed, 0);
        assert_eq!(second.segments_skipped, 4);
        let duplicates = diag
            .events()
            .iter()
            .filter(|e| matches!(e, DiagEvent::DuplicateSegment { .. }))
            .count();
        assert_eq!(duplicates, 4);
    }

    #[test]
    fn reversed_shared_edge_counts_as_processed() {
        // Two rings sharing one edge, traversed in opposite directions.
        let mut scene = MeshScene::new();
        let mut diag = Diagnostics::new();
        let policy = TapeMaterial::new("zone tape");
        let mut tape = BuildTape::new(settings());

        let left = [
            p(0.0, 0.0, 0.0),
            p(3.0, 0.0, 0.0),
            p(3.0, 3.0, 0.0),
            p(0.0, 3.0, 0.0),
        ];
        let right = [
            p(3.0, 0.0, 0.0),
            p(6.0, 0.0, 0.0),
            p(6.0, 3.0, 0.0),
            p(3.0, 3.0, 0.0),
        ];
        let first = tape.execute(&left, &mut scene, &NoConflicts, &policy, &mut diag);
        let second = tape.execute(&right, &mut scene, &NoConflicts, &policy, &mut diag);

        assert_eq!(first.segments_processed, 4);
        // The (3,0)-(3,3) edge was already built by the first ring.
        assert_eq!(second.segments_processed, 3);
        assert_eq!(second.segments_skipped, 1);
    }

    #[test]
    fn conflict_veto_skips_only_the_vetoed_segment() {
        struct VetoSouthEdge;

        impl<S: Scene> ConflictPolicy<S> for VetoSouthEdge {
            fn check_conflict(&self, segment: &Segment, _width: f64, _scene: &S) -> bool {
                segment.start.y.abs() < 1e-9 && segment.end.y.abs() < 1e-9
            }
        }

        let mut scene = MeshScene::new();
        let mut diag = Diagnostics::new();
        let policy = TapeMaterial::new("zone tape");
        let run = BuildTape::new(settings()).execute(
            &[
                p(0.0, 0.0, 0.0),
                p(5.0, 0.0, 0.0),
                p(5.0, 5.0, 0.0),
                p(0.0, 5.0, 0.0),
            ],
            &mut scene,
            &VetoSouthEdge,
            &policy,
            &mut diag,
        );
        assert_eq!(run.segments_processed, 3);
        assert_eq!(run.segments_skipped, 1);
        assert!(diag.any(|e| matches!(e, DiagEvent::ConflictSkipped { .. })));
    }
}
