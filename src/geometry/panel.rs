use crate::math::Point3;
use crate::scene::FaceId;

/// The flat width-offset quadrilateral built for one boundary segment.
///
/// Owns the created scene face together with its four winding-ordered
/// corners. The outward normal of the face has non-negative vertical
/// component by construction.
#[derive(Debug, Clone)]
pub struct StripPanel {
    /// The face created in the scene container.
    pub face: FaceId,
    /// Corner points in winding order.
    pub corners: [Point3; 4],
}

/// All faces considered part of one extruded volume.
///
/// Insertion-ordered and de-duplicated; always contains at least the seed
/// face it was built from. Used for bulk material application and for
/// cross-strip reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceSet {
    faces: Vec<FaceId>,
}

impl FaceSet {
    /// Creates a set containing only the seed face.
    #[must_use]
    pub fn from_seed(seed: FaceId) -> Self {
        Self { faces: vec![seed] }
    }

    /// Returns the seed face the set was built from.
    #[must_use]
    pub fn seed(&self) -> FaceId {
        self.faces[0]
    }

    /// Inserts a face if not already present. Returns `true` if inserted.
    pub fn insert(&mut self, face: FaceId) -> bool {
        if self.faces.contains(&face) {
            return false;
        }
        self.faces.push(face);
        true
    }

    /// Returns `true` if the set contains the face.
    #[must_use]
    pub fn contains(&self, face: FaceId) -> bool {
        self.faces.contains(&face)
    }

    /// Number of faces in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Always `false`: a set holds at least its seed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Iterates over the faces in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces.iter().copied()
    }
}

impl<'a> IntoIterator for &'a FaceSet {
    type Item = FaceId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, FaceId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.faces.iter().copied()
    }
}
