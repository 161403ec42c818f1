pub mod build_panel;
pub mod build_tape;
pub mod clean_points;
pub mod extract_segments;
pub mod extrude_panel;
pub mod reconcile_connections;
pub mod resolve_adjacency;

pub use build_panel::BuildStripPanel;
pub use build_tape::{BuildTape, ProcessedSegments, TapeRun};
pub use clean_points::{CleanPoints, CleanedRing};
pub use extract_segments::ExtractSegments;
pub use extrude_panel::{ExtrudeOutcome, ExtrudePanel, ExtrudeState, ExtrudeStrategy};
pub use reconcile_connections::ReconcileConnections;
pub use resolve_adjacency::ResolveAdjacency;

use crate::error::SceneResult;
use crate::geometry::{FaceSet, Segment};
use crate::scene::Scene;

/// External predicate preventing strip creation where it would intersect
/// existing scene content.
///
/// Returning `true` means "do not build, skip this segment". The policy is
/// owned by the collaborator; the panel builder only consults it.
pub trait ConflictPolicy<S: Scene + ?Sized> {
    /// Checks whether a strip of `width` along `segment` conflicts with
    /// existing geometry.
    fn check_conflict(&self, segment: &Segment, width: f64, scene: &S) -> bool;
}

/// Conflict policy that never vetoes a segment.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoConflicts;

impl<S: Scene + ?Sized> ConflictPolicy<S> for NoConflicts {
    fn check_conflict(&self, _segment: &Segment, _width: f64, _scene: &S) -> bool {
        false
    }
}

/// External collaborator that applies appearance to a completed volume.
///
/// Invoked once per strip with the whole face set, so every face of the
/// solid is covered, not just the seed.
pub trait MaterialPolicy<S: Scene + ?Sized> {
    /// Applies materials to all faces of the set.
    ///
    /// # Errors
    ///
    /// Returns an error on container faults.
    fn apply_material(&self, faces: &FaceSet, scene: &mut S) -> SceneResult<()>;
}

/// Default material policy: assigns one named material to the front and
/// back of every face in the set.
#[derive(Debug, Clone)]
pub struct TapeMaterial {
    name: String,
}

impl TapeMaterial {
    /// Creates a policy for the given material name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl<S: Scene + ?Sized> MaterialPolicy<S> for TapeMaterial {
    fn apply_material(&self, faces: &FaceSet, scene: &mut S) -> SceneResult<()> {
        let material = scene.ensure_material(&self.name);
        for face in faces {
            scene.set_face_material(face, material, material)?;
        }
        Ok(())
    }
}
