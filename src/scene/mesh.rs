use std::collections::HashMap;

use slotmap::SlotMap;

use crate::error::{SceneError, SceneResult};
use crate::math::{newell_normal, point_key, Point3, Vector3};

use super::{Aabb, EdgeId, FaceId, FaceTag, GroupId, MaterialId, Scene};

/// Ordered endpoint-pair key used for edge interning.
type EdgeKey = ([i64; 3], [i64; 3]);

#[derive(Debug, Clone)]
struct FaceData {
    points: Vec<Point3>,
    edges: Vec<EdgeId>,
    tag: Option<FaceTag>,
    front: Option<MaterialId>,
    back: Option<MaterialId>,
    group: Option<GroupId>,
}

#[derive(Debug, Clone)]
struct EdgeData {
    key: EdgeKey,
    faces: Vec<FaceId>,
}

/// In-memory scene container backed by slotmap arenas.
///
/// Edges are interned by their tolerance-quantized endpoint pair, so faces
/// whose boundaries coincide share edge handles — the same adjacency a
/// merging host container exposes. This is what makes edge-based face
/// discovery and cross-strip reconciliation observable in tests.
#[derive(Debug, Default)]
pub struct MeshScene {
    faces: SlotMap<FaceId, FaceData>,
    edges: SlotMap<EdgeId, EdgeData>,
    groups: SlotMap<GroupId, ()>,
    materials: SlotMap<MaterialId, String>,
    edge_index: HashMap<EdgeKey, EdgeId>,
    refresh_requested: bool,
}

impl MeshScene {
    /// Creates a new, empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a view refresh has been requested.
    #[must_use]
    pub fn refresh_requested(&self) -> bool {
        self.refresh_requested
    }

    /// Name of a material resource, if it exists.
    #[must_use]
    pub fn material_name(&self, id: MaterialId) -> Option<&str> {
        self.materials.get(id).map(String::as_str)
    }

    /// Total number of live faces, including group-scoped ones.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn face_data(&self, id: FaceId) -> SceneResult<&FaceData> {
        self.faces
            .get(id)
            .ok_or(SceneError::EntityNotFound("face"))
    }

    fn face_data_mut(&mut self, id: FaceId) -> SceneResult<&mut FaceData> {
        self.faces
            .get_mut(id)
            .ok_or(SceneError::EntityNotFound("face"))
    }

    fn intern_edge(&mut self, a: &Point3, b: &Point3) -> Option<EdgeId> {
        let ka = point_key(a);
        let kb = point_key(b);
        if ka == kb {
            return None;
        }
        let key = if kb < ka { (kb, ka) } else { (ka, kb) };
        if let Some(&id) = self.edge_index.get(&key) {
            return Some(id);
        }
        let id = self.edges.insert(EdgeData {
            key,
            faces: Vec::new(),
        });
        self.edge_index.insert(key, id);
        Some(id)
    }

    fn attach_edges(&mut self, face: FaceId, points: &[Point3]) -> Vec<EdgeId> {
        let n = points.len();
        let mut edges = Vec::with_capacity(n);
        for i in 0..n {
            let j = (i + 1) % n;
            if let Some(edge) = self.intern_edge(&points[i], &points[j]) {
                if let Some(data) = self.edges.get_mut(edge) {
                    if !data.faces.contains(&face) {
                        data.faces.push(face);
                    }
                }
                if !edges.contains(&edge) {
                    edges.push(edge);
                }
            }
        }
        edges
    }

    fn detach_edges(&mut self, face: FaceId) {
        let edge_ids = match self.faces.get(face) {
            Some(data) => data.edges.clone(),
            None => return,
        };
        for edge in edge_ids {
            let drop_edge = if let Some(data) = self.edges.get_mut(edge) {
                data.faces.retain(|f| *f != face);
                data.faces.is_empty()
            } else {
                false
            };
            if drop_edge {
                if let Some(data) = self.edges.remove(edge) {
                    self.edge_index.remove(&data.key);
                }
            }
        }
    }

    fn insert_face(
        &mut self,
        points: &[Point3],
        tag: Option<FaceTag>,
        group: Option<GroupId>,
    ) -> SceneResult<Option<FaceId>> {
        if points.len() < 3 || newell_normal(points).is_none() {
            return Ok(None);
        }
        let face = self.faces.insert(FaceData {
            points: points.to_vec(),
            edges: Vec::new(),
            tag,
            front: None,
            back: None,
            group,
        });
        let edges = self.attach_edges(face, points);
        if let Some(data) = self.faces.get_mut(face) {
            data.edges = edges;
        }
        Ok(Some(face))
    }

    fn group_faces(&self, group: GroupId) -> Vec<FaceId> {
        self.faces
            .iter()
            .filter(|(_, data)| data.group == Some(group))
            .map(|(id, _)| id)
            .collect()
    }
}

impl Scene for MeshScene {
    fn create_face(
        &mut self,
        points: &[Point3],
        tag: Option<FaceTag>,
    ) -> SceneResult<Option<FaceId>> {
        self.insert_face(points, tag, None)
    }

    fn create_group(&mut self) -> GroupId {
        self.groups.insert(())
    }

    fn create_face_in_group(
        &mut self,
        group: GroupId,
        points: &[Point3],
        tag: Option<FaceTag>,
    ) -> SceneResult<Option<FaceId>> {
        if !self.groups.contains_key(group) {
            return Err(SceneError::EntityNotFound("group"));
        }
        self.insert_face(points, tag, Some(group))
    }

    fn merge_group(&mut self, group: GroupId) -> SceneResult<Vec<FaceId>> {
        if self.groups.remove(group).is_none() {
            return Err(SceneError::EntityNotFound("group"));
        }
        let members = self.group_faces(group);
        for &face in &members {
            if let Some(data) = self.faces.get_mut(face) {
                data.group = None;
            }
        }
        Ok(members)
    }

    fn discard_group(&mut self, group: GroupId) -> SceneResult<()> {
        if self.groups.remove(group).is_none() {
            return Err(SceneError::EntityNotFound("group"));
        }
        for face in self.group_faces(group) {
            self.detach_edges(face);
            self.faces.remove(face);
        }
        Ok(())
    }

    fn push_pull(&mut self, face: FaceId, distance: f64) -> SceneResult<bool> {
        let data = self.face_data(face)?;
        let points = data.points.clone();
        let tag = data.tag;
        let group = data.group;
        let Some(normal) = newell_normal(&points) else {
            return Ok(false);
        };
        let offset: Vector3 = normal * distance;
        let top: Vec<Point3> = points.iter().map(|p| p + offset).collect();

        if self.insert_face(&top, tag, group)?.is_none() {
            return Ok(false);
        }
        let n = points.len();
        for i in 0..n {
            let j = (i + 1) % n;
            let quad = [points[i], points[j], top[j], top[i]];
            self.insert_face(&quad, tag, group)?;
        }
        Ok(true)
    }

    fn translate_face(&mut self, face: FaceId, offset: &Vector3) -> SceneResult<FaceId> {
        self.detach_edges(face);
        let points: Vec<Point3> = {
            let data = self.face_data_mut(face)?;
            data.points = data.points.iter().map(|p| p + offset).collect();
            data.points.clone()
        };
        let edges = self.attach_edges(face, &points);
        if let Some(data) = self.faces.get_mut(face) {
            data.edges = edges;
        }
        // In-memory containers keep the handle stable; hosts may not.
        Ok(face)
    }

    fn reverse_face(&mut self, face: FaceId) -> SceneResult<()> {
        self.face_data_mut(face)?.points.reverse();
        Ok(())
    }

    fn remove_face(&mut self, face: FaceId) -> SceneResult<()> {
        if !self.faces.contains_key(face) {
            return Err(SceneError::EntityNotFound("face"));
        }
        self.detach_edges(face);
        self.faces.remove(face);
        Ok(())
    }

    fn is_face_valid(&self, face: FaceId) -> bool {
        self.faces
            .get(face)
            .is_some_and(|data| data.points.len() >= 3 && newell_normal(&data.points).is_some())
    }

    fn face_points(&self, face: FaceId) -> SceneResult<Vec<Point3>> {
        Ok(self.face_data(face)?.points.clone())
    }

    fn face_normal(&self, face: FaceId) -> SceneResult<Vector3> {
        let data = self.face_data(face)?;
        newell_normal(&data.points)
            .ok_or_else(|| SceneError::InvalidFace("degenerate polygon".to_owned()))
    }

    fn face_edges(&self, face: FaceId) -> SceneResult<Vec<EdgeId>> {
        Ok(self.face_data(face)?.edges.clone())
    }

    fn edge_faces(&self, edge: EdgeId) -> SceneResult<Vec<FaceId>> {
        self.edges
            .get(edge)
            .map(|data| data.faces.clone())
            .ok_or(SceneError::EntityNotFound("edge"))
    }

    fn face_bounds(&self, face: FaceId) -> SceneResult<Aabb> {
        let data = self.face_data(face)?;
        Aabb::from_points(&data.points)
            .ok_or_else(|| SceneError::InvalidFace("face has no points".to_owned()))
    }

    fn all_faces(&self) -> Vec<FaceId> {
        self.faces
            .iter()
            .filter(|(_, data)| data.group.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    fn face_tag(&self, face: FaceId) -> SceneResult<Option<FaceTag>> {
        Ok(self.face_data(face)?.tag)
    }

    fn face_material(&self, face: FaceId) -> SceneResult<Option<MaterialId>> {
        Ok(self.face_data(face)?.front)
    }

    fn set_face_material(
        &mut self,
        face: FaceId,
        front: MaterialId,
        back: MaterialId,
    ) -> SceneResult<()> {
        let data = self.face_data_mut(face)?;
        data.front = Some(front);
        data.back = Some(back);
        Ok(())
    }

    fn ensure_material(&mut self, name: &str) -> MaterialId {
        if let Some((id, _)) = self.materials.iter().find(|(_, n)| n.as_str() == name) {
            return id;
        }
        self.materials.insert(name.to_owned())
    }

    fn request_refresh(&mut self) {
        self.refresh_requested = true;
    }
}
