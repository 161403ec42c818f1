use crate::error::Result;
use crate::scene::{FaceId, FaceTag, Scene};

/// Unifies appearance where adjacent strips' volumes overlap.
///
/// An edge bordered by more than two faces is evidence that two strips'
/// extruded volumes intersect. For every such edge of the given face, the
/// tape-tagged sharers are reassigned one canonical material (front and
/// back), recreating the material resource if it went missing. Geometry is
/// left untouched; overlap itself is tolerated by design.
#[derive(Debug)]
pub struct ReconcileConnections {
    face: FaceId,
    material: String,
}

impl ReconcileConnections {
    /// Creates a new reconciliation pass for one face of a completed volume.
    #[must_use]
    pub fn new(face: FaceId, material: impl Into<String>) -> Self {
        Self {
            face,
            material: material.into(),
        }
    }

    /// Executes the pass. Flags the view for refresh if anything changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the face does not exist.
    pub fn execute<S: Scene>(&self, scene: &mut S) -> Result<()> {
        let mut changed = false;
        for edge in scene.face_edges(self.face)? {
            let sharers = scene.edge_faces(edge)?;
            if sharers.len() <= 2 {
                continue;
            }
            let mut tape_faces = Vec::with_capacity(sharers.len());
            for face in sharers {
                if scene.face_tag(face)? == Some(FaceTag::Tape) {
                    tape_faces.push(face);
                }
            }
            if tape_faces.len() <= 1 {
                continue;
            }
            let canonical = scene.ensure_material(&self.material);
            for face in tape_faces {
                scene.set_face_material(face, canonical, canonical)?;
            }
            changed = true;
        }
        if changed {
            scene.request_refresh();
        }
        Ok(())
    }
}
