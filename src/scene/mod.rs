//! Host scene container contract.
//!
//! The pipeline never touches a concrete host type: every geometry edit goes
//! through the [`Scene`] trait, which exposes exactly the container
//! operations the pipeline needs. [`mesh::MeshScene`] is the in-memory
//! implementation used for testing and standalone runs.

pub mod mesh;

pub use mesh::MeshScene;

use crate::error::SceneResult;
use crate::math::{Point3, Vector3, TOLERANCE};

slotmap::new_key_type! {
    /// Unique identifier for a face in a scene container.
    pub struct FaceId;

    /// Unique identifier for an edge in a scene container.
    pub struct EdgeId;

    /// Unique identifier for a sub-container (group).
    pub struct GroupId;

    /// Unique identifier for a material resource.
    pub struct MaterialId;
}

/// Domain tag carried by a face, assigned at creation time.
///
/// Replaces material-name sniffing: a face is a tape face because it was
/// created as one, not because of what its material happens to be called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceTag {
    /// Face belongs to a marking strip volume.
    Tape,
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Builds the bounding box of a non-empty point set.
    ///
    /// Returns `None` for an empty slice.
    #[must_use]
    pub fn from_points(points: &[Point3]) -> Option<Self> {
        let first = points.first()?;
        let mut min = *first;
        let mut max = *first;
        for p in &points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }
        Some(Self { min, max })
    }

    /// Center point of the box.
    #[must_use]
    pub fn center(&self) -> Point3 {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    /// Returns the box grown vertically by `dz` in both directions.
    #[must_use]
    pub fn expanded_z(&self, dz: f64) -> Self {
        let mut out = *self;
        out.min.z -= dz;
        out.max.z += dz;
        out
    }

    /// Tolerance-inclusive containment check.
    #[must_use]
    pub fn contains(&self, p: &Point3) -> bool {
        p.x >= self.min.x - TOLERANCE
            && p.x <= self.max.x + TOLERANCE
            && p.y >= self.min.y - TOLERANCE
            && p.y <= self.max.y + TOLERANCE
            && p.z >= self.min.z - TOLERANCE
            && p.z <= self.max.z + TOLERANCE
    }
}

/// Host-provided scene container.
///
/// Every operation is a blocking call against the shared scene graph; the
/// pipeline is the only writer during a build run. Face creation may refuse
/// input (returning `Ok(None)`) and `push_pull` may fail spuriously — the
/// extrusion engine's fallback strategies exist precisely because these
/// primitives are not reliable.
pub trait Scene {
    /// Creates a polygonal face from an ordered point list.
    ///
    /// Returns `Ok(None)` if the container refuses the input (too few
    /// points, degenerate polygon).
    ///
    /// # Errors
    ///
    /// Returns an error on container faults.
    fn create_face(&mut self, points: &[Point3], tag: Option<FaceTag>)
        -> SceneResult<Option<FaceId>>;

    /// Creates an empty sub-container.
    fn create_group(&mut self) -> GroupId;

    /// Creates a face scoped to a sub-container.
    ///
    /// # Errors
    ///
    /// Returns an error if the group does not exist.
    fn create_face_in_group(
        &mut self,
        group: GroupId,
        points: &[Point3],
        tag: Option<FaceTag>,
    ) -> SceneResult<Option<FaceId>>;

    /// Flattens a sub-container's contents into the parent and discards the
    /// sub-container. Returns the merged face handles.
    ///
    /// # Errors
    ///
    /// Returns an error if the group does not exist.
    fn merge_group(&mut self, group: GroupId) -> SceneResult<Vec<FaceId>>;

    /// Drops a sub-container together with everything it contains.
    ///
    /// # Errors
    ///
    /// Returns an error if the group does not exist.
    fn discard_group(&mut self, group: GroupId) -> SceneResult<()>;

    /// Raises a face along its normal by `distance`.
    ///
    /// Returns `Ok(false)` when the primitive declines the operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the face does not exist.
    fn push_pull(&mut self, face: FaceId, distance: f64) -> SceneResult<bool>;

    /// Rigidly translates a face in place.
    ///
    /// The container may answer with a replacement handle; callers must
    /// continue with the returned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the face does not exist.
    fn translate_face(&mut self, face: FaceId, offset: &Vector3) -> SceneResult<FaceId>;

    /// Reverses the winding (and therefore the normal) of a face.
    ///
    /// # Errors
    ///
    /// Returns an error if the face does not exist.
    fn reverse_face(&mut self, face: FaceId) -> SceneResult<()>;

    /// Removes a face from the container.
    ///
    /// # Errors
    ///
    /// Returns an error if the face does not exist.
    fn remove_face(&mut self, face: FaceId) -> SceneResult<()>;

    /// Returns `true` if the handle refers to a live, non-degenerate face.
    fn is_face_valid(&self, face: FaceId) -> bool;

    /// Ordered boundary points of a face.
    ///
    /// # Errors
    ///
    /// Returns an error if the face does not exist.
    fn face_points(&self, face: FaceId) -> SceneResult<Vec<Point3>>;

    /// Unit normal of a face.
    ///
    /// # Errors
    ///
    /// Returns an error if the face does not exist or is degenerate.
    fn face_normal(&self, face: FaceId) -> SceneResult<Vector3>;

    /// Boundary edges of a face.
    ///
    /// # Errors
    ///
    /// Returns an error if the face does not exist.
    fn face_edges(&self, face: FaceId) -> SceneResult<Vec<EdgeId>>;

    /// All faces adjacent to an edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge does not exist.
    fn edge_faces(&self, edge: EdgeId) -> SceneResult<Vec<FaceId>>;

    /// Bounding box of a face.
    ///
    /// # Errors
    ///
    /// Returns an error if the face does not exist.
    fn face_bounds(&self, face: FaceId) -> SceneResult<Aabb>;

    /// All top-level faces in the container.
    fn all_faces(&self) -> Vec<FaceId>;

    /// Domain tag of a face.
    ///
    /// # Errors
    ///
    /// Returns an error if the face does not exist.
    fn face_tag(&self, face: FaceId) -> SceneResult<Option<FaceTag>>;

    /// Front material of a face, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the face does not exist.
    fn face_material(&self, face: FaceId) -> SceneResult<Option<MaterialId>>;

    /// Assigns front and back materials to a face.
    ///
    /// # Errors
    ///
    /// Returns an error if the face does not exist.
    fn set_face_material(
        &mut self,
        face: FaceId,
        front: MaterialId,
        back: MaterialId,
    ) -> SceneResult<()>;

    /// Finds the material with the given name, creating it if missing.
    fn ensure_material(&mut self, name: &str) -> MaterialId;

    /// Flags the host view for refresh after appearance changes.
    fn request_refresh(&mut self);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn aabb_from_points_and_center() {
        let b = Aabb::from_points(&[p(0.0, 0.0, 0.0), p(2.0, 4.0, 6.0), p(1.0, -2.0, 3.0)])
            .unwrap();
        assert!((b.min - p(0.0, -2.0, 0.0)).norm() < 1e-12);
        assert!((b.max - p(2.0, 4.0, 6.0)).norm() < 1e-12);
        assert!((b.center() - p(1.0, 1.0, 3.0)).norm() < 1e-12);
    }

    #[test]
    fn aabb_contains_is_tolerance_inclusive() {
        let b = Aabb::from_points(&[p(0.0, 0.0, 0.0), p(1.0, 1.0, 0.0)]).unwrap();
        // A point exactly on the boundary counts as inside.
        assert!(b.contains(&p(1.0, 0.5, 0.0)));
        assert!(!b.contains(&p(1.5, 0.5, 0.0)));
    }

    #[test]
    fn aabb_expanded_z_grows_both_ways() {
        let b = Aabb::from_points(&[p(0.0, 0.0, 1.0), p(1.0, 1.0, 1.0)])
            .unwrap()
            .expanded_z(0.5);
        assert!(b.contains(&p(0.5, 0.5, 1.4)));
        assert!(b.contains(&p(0.5, 0.5, 0.6)));
        assert!(!b.contains(&p(0.5, 0.5, 1.6)));
    }

    #[test]
    fn aabb_from_empty_slice_is_none() {
        assert!(Aabb::from_points(&[]).is_none());
    }
}
