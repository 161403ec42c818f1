use crate::error::Result;
use crate::geometry::FaceSet;
use crate::scene::{FaceId, Scene};

/// Discovers the full set of faces belonging to one extruded volume.
///
/// Topological pass first: the closure of the seed face under shared-edge
/// adjacency. The manual reconstruction strategy does not always produce
/// edges shared with the seed, so when the closure stays suspiciously
/// small (fewer than 3 faces) a spatial pass adds every container face
/// whose bounds-center falls inside the seed's bounding box expanded
/// vertically by the tape height.
#[derive(Debug)]
pub struct ResolveAdjacency {
    seed: FaceId,
    height: f64,
}

impl ResolveAdjacency {
    /// Creates a new adjacency resolution query.
    #[must_use]
    pub fn new(seed: FaceId, height: f64) -> Self {
        Self { seed, height }
    }

    /// Executes the query.
    ///
    /// The result always contains the seed, is de-duplicated, and is stable:
    /// re-running on any face of the output reproduces the same set.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed face does not exist.
    pub fn execute<S: Scene>(&self, scene: &S) -> Result<FaceSet> {
        let mut faces = FaceSet::from_seed(self.seed);

        // Edge-adjacency closure.
        let mut queue = vec![self.seed];
        while let Some(face) = queue.pop() {
            for edge in scene.face_edges(face)? {
                for neighbor in scene.edge_faces(edge)? {
                    if faces.insert(neighbor) {
                        queue.push(neighbor);
                    }
                }
            }
        }

        if faces.len() >= 3 {
            return Ok(faces);
        }

        // Spatial fallback.
        let region = scene.face_bounds(self.seed)?.expanded_z(self.height);
        for face in scene.all_faces() {
            let center = scene.face_bounds(face)?.center();
            if region.contains(&center) {
                faces.insert(face);
            }
        }
        Ok(faces)
    }
}
