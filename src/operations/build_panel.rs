use crate::diag::{DiagEvent, Diagnostics, PanelReject};
use crate::error::Result;
use crate::geometry::{Segment, StripPanel};
use crate::math::{horizontal_left_normal, Point3, TOLERANCE};
use crate::scene::{FaceTag, Scene};

use super::ConflictPolicy;

/// Builds the width-offset quadrilateral for one boundary segment.
///
/// The segment is extended by half the width at each end so adjoining
/// strips meet flush at corners, then offset by ±half-width along the
/// horizontal perpendicular. The conflict-check collaborator is consulted
/// before anything is created; a veto produces "no panel", not an error.
#[derive(Debug)]
pub struct BuildStripPanel {
    segment: Segment,
    width: f64,
}

impl BuildStripPanel {
    /// Creates a new panel build operation.
    #[must_use]
    pub fn new(segment: Segment, width: f64) -> Self {
        Self { segment, width }
    }

    /// Executes the build, creating the panel face in the container.
    ///
    /// Returns `Ok(None)` when the segment is vetoed, degenerate, or the
    /// container refuses the face.
    ///
    /// # Errors
    ///
    /// Returns an error on container faults.
    pub fn execute<S: Scene>(
        &self,
        scene: &mut S,
        conflicts: &impl ConflictPolicy<S>,
        diag: &mut Diagnostics,
    ) -> Result<Option<StripPanel>> {
        if conflicts.check_conflict(&self.segment, self.width, scene) {
            diag.record(DiagEvent::ConflictSkipped {
                key: self.segment.key(),
            });
            return Ok(None);
        }

        let length = self.segment.length();
        if length < TOLERANCE {
            diag.record(DiagEvent::PanelRejected {
                reason: PanelReject::ShortSegment,
            });
            return Ok(None);
        }
        let dir = self.segment.delta() / length;
        let Some(perp) = horizontal_left_normal(&dir) else {
            diag.record(DiagEvent::PanelRejected {
                reason: PanelReject::NoHorizontalExtent,
            });
            return Ok(None);
        };

        // Extend both ends by half the width so adjoining strips overlap
        // at the corner instead of leaving a wedge-shaped gap.
        let half = self.width * 0.5;
        let a = self.segment.start - dir * half;
        let b = self.segment.end + dir * half;
        let corners: [Point3; 4] = [
            a - perp * half,
            b - perp * half,
            b + perp * half,
            a + perp * half,
        ];

        // Coplanarity check against the plane of the first three corners.
        // A deviation is recorded but the panel is still attempted; the
        // extrusion strategies tolerate near-planar input.
        let plane_normal = (corners[1] - corners[0]).cross(&(corners[2] - corners[0]));
        let plane_len = plane_normal.norm();
        if plane_len > 0.0 {
            let deviation = (corners[3] - corners[0]).dot(&(plane_normal / plane_len)).abs();
            if deviation > TOLERANCE {
                diag.record(DiagEvent::NonPlanarPanel { deviation });
            }
        }

        let Some(face) = scene.create_face(&corners, Some(FaceTag::Tape))? else {
            diag.record(DiagEvent::PanelRejected {
                reason: PanelReject::CreationFailed,
            });
            return Ok(None);
        };
        if !scene.is_face_valid(face) {
            diag.record(DiagEvent::PanelRejected {
                reason: PanelReject::CreationFailed,
            });
            return Ok(None);
        }

        // Outward normal must not point downward.
        if scene.face_normal(face)?.z < 0.0 {
            scene.reverse_face(face)?;
        }

        Ok(Some(StripPanel { face, corners }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Vector3;
    use crate::operations::NoConflicts;
    use crate::scene::MeshScene;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    struct VetoAll;

    impl<S: Scene> ConflictPolicy<S> for VetoAll {
        fn check_conflict(&self, _segment: &Segment, _width: f64, _scene: &S) -> bool {
            true
        }
    }

    fn build(segment: Segment, width: f64) -> (MeshScene, Diagnostics, Option<StripPanel>) {
        let mut scene = MeshScene::new();
        let mut diag = Diagnostics::new();
        let panel = BuildStripPanel::new(segment, width)
            .execute(&mut scene, &NoConflicts, &mut diag)
            .unwrap();
        (scene, diag, panel)
    }

    #[test]
    fn corners_are_extended_and_offset() {
        let (_, diag, panel) = build(Segment::new(p(0.0, 0.0, 0.0), p(5.0, 0.0, 0.0)), 0.05);
        let panel = panel.unwrap();
        let expected = [
            p(-0.025, -0.025, 0.0),
            p(5.025, -0.025, 0.0),
            p(5.025, 0.025, 0.0),
            p(-0.025, 0.025, 0.0),
        ];
        for (corner, want) in panel.corners.iter().zip(expected.iter()) {
            assert!((corner - want).norm() < 1e-9, "corner {corner:?} != {want:?}");
        }
        assert!(diag.events().is_empty());
    }

    #[test]
    fn corners_are_coplanar_within_tolerance() {
        let (_, diag, panel) = build(Segment::new(p(0.0, 0.0, 0.0), p(3.0, 4.0, 0.0)), 0.05);
        let panel = panel.unwrap();
        let n = (panel.corners[1] - panel.corners[0])
            .cross(&(panel.corners[2] - panel.corners[0]))
            .normalize();
        let deviation = (panel.corners[3] - panel.corners[0]).dot(&n).abs();
        assert!(deviation < TOLERANCE);
        assert!(!diag.any(|e| matches!(e, DiagEvent::NonPlanarPanel { .. })));
    }

    #[test]
    fn panel_normal_points_up() {
        let (scene, _, panel) = build(Segment::new(p(5.0, 0.0, 0.0), p(0.0, 0.0, 0.0)), 0.05);
        let panel = panel.unwrap();
        let normal = scene.face_normal(panel.face).unwrap();
        assert!(normal.z >= 0.0);
        assert!((normal - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-9);
    }

    #[test]
    fn conflict_veto_skips_segment() {
        let mut scene = MeshScene::new();
        let mut diag = Diagnostics::new();
        let panel = BuildStripPanel::new(Segment::new(p(0.0, 0.0, 0.0), p(5.0, 0.0, 0.0)), 0.05)
            .execute(&mut scene, &VetoAll, &mut diag)
            .unwrap();
        assert!(panel.is_none());
        assert_eq!(scene.face_count(), 0);
        assert!(diag.any(|e| matches!(e, DiagEvent::ConflictSkipped { .. })));
    }

    #[test]
    fn sub_tolerance_segment_is_rejected() {
        let (_, diag, panel) = build(Segment::new(p(0.0, 0.0, 0.0), p(0.0005, 0.0, 0.0)), 0.05);
        assert!(panel.is_none());
        assert!(diag.any(|e| matches!(
            e,
            DiagEvent::PanelRejected {
                reason: PanelReject::ShortSegment
            }
        )));
    }

    #[test]
    fn vertical_segment_is_rejected() {
        let (_, diag, panel) = build(Segment::new(p(0.0, 0.0, 0.0), p(0.0, 0.0, 2.0)), 0.05);
        assert!(panel.is_none());
        assert!(diag.any(|e| matches!(
            e,
            DiagEvent::PanelRejected {
                reason: PanelReject::NoHorizontalExtent
            }
        )));
    }

    #[test]
    fn sloped_segment_still_builds_and_faces_up() {
        // Ramp edge: direction has a z component, offset stays horizontal.
        let (scene, _, panel) = build(Segment::new(p(0.0, 0.0, 0.0), p(4.0, 0.0, 1.0)), 0.05);
        let panel = panel.unwrap();
        let normal = scene.face_normal(panel.face).unwrap();
        assert!(normal.z > 0.0);
    }
}
