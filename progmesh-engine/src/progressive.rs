//! Progressive mesh engine
//!
//! A [`ProgressiveMesh`] owns fixed-capacity vertex and face storage plus two
//! complementary history stacks. Applying the top [`VertexSplit`] refines the
//! mesh by one vertex and pushes the matching [`Contraction`]; applying the top
//! contraction undoes it and hands the split back. Neither direction ever
//! rebuilds the mesh: every edit touches only the faces around the two
//! vertices involved.

use crate::adjacency::IncidentFaces;
use crate::contraction::Contraction;
use crate::options::{EngineOptions, NormalPolicy};
use progmesh_core::{
    bounds_of, Drawable, Error, Face, FaceBuffer, Point3f, Result, Triangle, TriangleMesh,
    Vector3f, Vertex, VertexSplit,
};
use std::collections::BTreeSet;
use tracing::{debug, info, trace};

/// A triangle mesh whose level of detail can be moved one vertex split at a
/// time in either direction.
///
/// Vertices and faces are addressed by slot. Only the first
/// [`vertex_count`](Self::vertex_count) vertices and
/// [`face_count`](Self::face_count) faces are live; slots beyond that are
/// leftovers of undone splits and get overwritten when the mesh is refined
/// again.
#[derive(Debug, Clone)]
pub struct ProgressiveMesh {
    vertices: Vec<Vertex>,
    vertex_count: usize,
    faces: FaceBuffer,
    face_count: usize,
    base_vertex_count: usize,
    base_face_count: usize,
    /// Built on the first split; the base mesh alone never needs it.
    incident: Option<IncidentFaces>,
    /// Top of the stack is the next split to apply.
    splits: Vec<VertexSplit>,
    /// Top of the stack undoes the most recent split.
    contractions: Vec<Contraction>,
    options: EngineOptions,
}

impl ProgressiveMesh {
    /// Create a progressive mesh from a base mesh and its splits in
    /// application order.
    pub fn new(base: TriangleMesh, splits: Vec<VertexSplit>) -> Result<Self> {
        Self::with_options(base, splits, EngineOptions::default())
    }

    /// Create a progressive mesh with explicit engine options.
    ///
    /// The whole history is checked against the base mesh: every split must
    /// reference a live vertex, and every face it lists must contain the
    /// vertex the split introduces and nothing beyond it.
    pub fn with_options(
        base: TriangleMesh,
        splits: Vec<VertexSplit>,
        options: EngineOptions,
    ) -> Result<Self> {
        if let Some(face) = base.find_invalid_face() {
            return Err(Error::InvalidData(format!(
                "Base face {} {:?} references a vertex outside the {} base vertices",
                face,
                base.faces[face],
                base.vertex_count()
            )));
        }
        validate_history(base.vertex_count(), &splits)?;

        let base_vertex_count = base.vertex_count();
        let base_face_count = base.face_count();
        let vertex_capacity = base_vertex_count + splits.len();
        let face_capacity =
            base_face_count + splits.iter().map(VertexSplit::max_new_faces).sum::<usize>();

        let mut vertices = vec![Vertex::default(); vertex_capacity];
        for (slot, position) in base.vertices.iter().enumerate() {
            vertices[slot] = Vertex::new(*position);
        }

        let mut faces = FaceBuffer::with_capacity(face_capacity);
        for (slot, face) in base.faces.iter().enumerate() {
            faces.write(slot, Triangle::from(*face));
            faces.recompute_normal(slot, &vertices);
        }

        // Same summation order as `IncidentFaces` iteration: ascending slot.
        let mut sums = vec![Vector3f::zeros(); base_vertex_count];
        for slot in 0..base_face_count {
            let t = faces.triangle(slot);
            for (corner, &v) in t.indices.iter().enumerate() {
                if !t.indices[..corner].contains(&v) {
                    sums[v as usize] += faces.normal(slot);
                }
            }
        }
        for (vertex, sum) in vertices.iter_mut().zip(sums) {
            vertex.normal = normalize_or_zero(sum);
        }

        let mut splits = splits;
        splits.reverse();

        info!(
            vertices = base_vertex_count,
            faces = base_face_count,
            splits = splits.len(),
            max_vertices = vertex_capacity,
            max_faces = face_capacity,
            "progressive mesh created"
        );

        Ok(Self {
            vertices,
            vertex_count: base_vertex_count,
            faces,
            face_count: base_face_count,
            base_vertex_count,
            base_face_count,
            incident: None,
            splits,
            contractions: Vec::new(),
            options,
        })
    }

    /// Pop the next vertex split and apply it.
    ///
    /// Returns `false`, leaving the mesh untouched, if the mesh is already at
    /// full detail.
    ///
    /// # Panics
    ///
    /// Panics if the split does not fit the current mesh, which can only
    /// happen if the history was corrupted after construction.
    pub fn perform_vertex_split(&mut self) -> bool {
        let Some(split) = self.splits.pop() else {
            return false;
        };
        let s = split.s;
        if (s as usize) >= self.vertex_count || self.vertex_count >= self.vertices.len() {
            self.splits.push(split);
            panic!(
                "vertex split of {} does not fit a mesh with {} live vertices",
                s, self.vertex_count
            );
        }
        let mut incident = self.take_incident();
        let t = self.vertex_count as u32;

        // 1.-4. Move s, append t, record the inverse.
        let Vertex {
            position: old_position,
            normal: old_normal,
        } = self.vertices[s as usize];
        self.vertices[s as usize].position = split.s_position;
        self.vertices[t as usize] = Vertex::new(split.t_position);
        let face_offset = self.face_count;
        self.vertex_count += 1;
        let pushed = incident.push_vertex();
        debug_assert_eq!(pushed, t);

        // 5. Hand the faces that originally belonged to t back to t.
        let mut reassigned = 0usize;
        for slot in incident.snapshot(s) {
            let live = self.faces.triangle(slot);
            if let Some(corner) = is_original_face_of_t(t, &live, &split) {
                self.faces.face_mut(slot)[corner] = t;
                incident.transfer(slot, s, t);
                reassigned += 1;
            }
        }

        // 6. Recreate the faces spanning s and t.
        let mut created = 0usize;
        for face in split.created_faces() {
            let slot = self.face_count;
            self.faces.write(slot, *face);
            self.face_count += 1;
            incident.insert_face(slot, face.indices);
            created += 1;
        }

        // 7. Normals.
        let touched_faces: BTreeSet<usize> = incident
            .faces_of(s)
            .union(incident.faces_of(t))
            .copied()
            .collect();
        let mut touched_vertices = BTreeSet::from([s, t]);
        if self.options.normal_policy == NormalPolicy::Touched {
            touched_vertices.extend(self.corners_of(&touched_faces));
        }
        self.refresh_normals(&incident, &touched_faces, &touched_vertices);

        trace!(
            s,
            t,
            reassigned,
            created,
            vertices = self.vertex_count,
            faces = self.face_count,
            "vertex split"
        );

        self.contractions.push(Contraction {
            s,
            position: old_position,
            normal: old_normal,
            face_offset,
            split,
        });
        self.incident = Some(incident);
        true
    }

    /// Pop the most recent contraction and apply it, undoing the last split.
    ///
    /// Returns `false`, leaving the mesh untouched, if the mesh is already at
    /// its base level.
    pub fn perform_contraction(&mut self) -> bool {
        let contraction = match self.contractions.pop() {
            Some(contraction) => contraction,
            None => return false,
        };
        let mut incident = self.take_incident();

        let s = contraction.s;
        let truncated = contraction.removed_faces(self.face_count);
        self.vertices[s as usize].position = contraction.position;
        self.face_count = contraction.face_offset;
        self.vertex_count -= 1;
        let t = self.vertex_count as u32;

        // 1. Faces spanning s and t collapse; the rest of t's faces go to s.
        let mut orphaned = BTreeSet::new();
        let mut removed = 0usize;
        let mut rewritten = 0usize;
        for slot in incident.snapshot(t) {
            let face = self.faces.triangle(slot);
            if face.contains(s) {
                incident.remove_face(slot, face.indices);
                orphaned.extend(face.indices.iter().copied().filter(|&v| v != t));
                removed += 1;
            } else {
                self.faces.face_mut(slot).replace(t, s);
                incident.transfer(slot, t, s);
                rewritten += 1;
            }
        }
        debug_assert_eq!(removed, truncated);

        // 2. t is gone.
        incident.pop_vertex();

        // 4. Normals.
        let touched_faces = incident.faces_of(s).clone();
        match self.options.normal_policy {
            NormalPolicy::Touched => {
                let mut touched_vertices = BTreeSet::from([s]);
                touched_vertices.extend(self.corners_of(&touched_faces));
                touched_vertices.extend(orphaned);
                self.refresh_normals(&incident, &touched_faces, &touched_vertices);
            }
            NormalPolicy::Endpoints => {
                // Neighbours may lag, so s gets back the exact normal it had.
                self.refresh_normals(&incident, &touched_faces, &BTreeSet::new());
                self.vertices[s as usize].normal = contraction.normal;
            }
        }

        trace!(
            s,
            t,
            removed,
            rewritten,
            vertices = self.vertex_count,
            faces = self.face_count,
            "pair contraction"
        );

        // 3. The split goes back on its stack unchanged.
        self.splits.push(contraction.into_split());
        self.incident = Some(incident);
        true
    }

    fn take_incident(&mut self) -> IncidentFaces {
        match self.incident.take() {
            Some(incident) => incident,
            None => {
                debug!(
                    vertices = self.vertex_count,
                    faces = self.face_count,
                    "building incident-face index"
                );
                IncidentFaces::build(&self.faces, self.vertex_count, self.face_count)
            }
        }
    }

    fn corners_of(&self, slots: &BTreeSet<usize>) -> BTreeSet<u32> {
        slots
            .iter()
            .flat_map(|&slot| self.faces.triangle(slot).indices)
            .collect()
    }

    fn refresh_normals(
        &mut self,
        incident: &IncidentFaces,
        faces: &BTreeSet<usize>,
        vertices: &BTreeSet<u32>,
    ) {
        for &slot in faces {
            self.faces.recompute_normal(slot, &self.vertices);
        }
        for &v in vertices {
            let sum = incident
                .faces_of(v)
                .iter()
                .fold(Vector3f::zeros(), |acc, &slot| acc + self.faces.normal(slot));
            self.vertices[v as usize].normal = normalize_or_zero(sum);
        }
    }

    /// The live vertices
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices[..self.vertex_count]
    }

    /// The live vertices as raw bytes, ready for a vertex buffer
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.vertices())
    }

    /// The live faces as a flat index list, three indices per face
    pub fn indices(&self) -> &[u32] {
        self.faces.indices(self.face_count)
    }

    /// The live faces as raw bytes, ready for an index buffer
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.indices())
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn face_count(&self) -> usize {
        self.face_count
    }

    /// Number of indices to draw
    pub fn index_count(&self) -> usize {
        self.face_count * 3
    }

    pub fn base_vertex_count(&self) -> usize {
        self.base_vertex_count
    }

    pub fn base_face_count(&self) -> usize {
        self.base_face_count
    }

    /// Vertex slots allocated, i.e. the vertex count at full detail
    pub fn vertex_capacity(&self) -> usize {
        self.vertices.len()
    }

    /// Face slots allocated
    pub fn face_capacity(&self) -> usize {
        self.faces.capacity()
    }

    /// Live face in `slot`
    pub fn face(&self, slot: usize) -> Option<Face<'_>> {
        (slot < self.face_count).then(|| self.faces.face(slot))
    }

    /// Live triangle in `slot`
    pub fn triangle(&self, slot: usize) -> Option<Triangle> {
        self.face(slot).map(|face| face.triangle())
    }

    /// Iterator over the live triangles in slot order
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.face_count).map(move |slot| self.faces.triangle(slot))
    }

    /// Face slots incident to `vertex`, once the index has been built
    pub fn incident_faces(&self, vertex: u32) -> Option<&BTreeSet<usize>> {
        let incident = self.incident.as_ref()?;
        ((vertex as usize) < self.vertex_count).then(|| incident.faces_of(vertex))
    }

    /// Whether the incident-face index exists yet
    pub fn has_adjacency(&self) -> bool {
        self.incident.is_some()
    }

    /// Pending splits; the last element is applied next.
    pub fn splits(&self) -> &[VertexSplit] {
        &self.splits
    }

    /// Applied splits' inverses; the last element is applied next.
    pub fn contractions(&self) -> &[Contraction] {
        &self.contractions
    }

    /// The split the next [`perform_vertex_split`](Self::perform_vertex_split) applies
    pub fn next_split(&self) -> Option<&VertexSplit> {
        self.splits.last()
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Snapshot of the current level of detail
    pub fn to_triangle_mesh(&self) -> TriangleMesh {
        let vertices = self.vertices();
        let mut mesh = TriangleMesh::from_vertices_and_faces(
            vertices.iter().map(|v| v.position).collect(),
            self.triangles().map(Into::into).collect(),
        );
        mesh.set_normals(vertices.iter().map(|v| v.normal).collect());
        mesh
    }
}

impl Drawable for ProgressiveMesh {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        bounds_of(self.vertices().iter().map(|v| &v.position))
    }
}

fn normalize_or_zero(v: Vector3f) -> Vector3f {
    v.try_normalize(f32::EPSILON).unwrap_or_else(Vector3f::zeros)
}

fn validate_history(base_vertex_count: usize, splits: &[VertexSplit]) -> Result<()> {
    if base_vertex_count + splits.len() > u32::MAX as usize {
        return Err(Error::InvalidData(format!(
            "{} vertices at full detail exceed the 32-bit index range",
            base_vertex_count + splits.len()
        )));
    }

    for (i, split) in splits.iter().enumerate() {
        let t = (base_vertex_count + i) as u32;
        if split.s >= t {
            return Err(Error::InvalidData(format!(
                "Vertex split {} splits vertex {} but only {} vertices exist at that level",
                i, split.s, t
            )));
        }
        for face in &split.faces {
            if face.max_index() > t {
                return Err(Error::InvalidData(format!(
                    "Vertex split {} lists face {:?} referencing a vertex beyond {}",
                    i, face.indices, t
                )));
            }
            if !face.contains(t) {
                return Err(Error::InvalidData(format!(
                    "Vertex split {} lists face {:?} which does not contain the new vertex {}",
                    i, face.indices, t
                )));
            }
        }
    }
    Ok(())
}

/// Decide whether the live `face` of `split.s` originally belonged to `t`.
///
/// Returns the corner to rewrite: the single position where a face of the
/// split holds `t` while the live face holds `s`, all other corners being
/// equal. The first matching face of the split wins.
pub(crate) fn is_original_face_of_t(t: u32, face: &Triangle, split: &VertexSplit) -> Option<usize> {
    split.faces.iter().find_map(|original| {
        let mut corner = None;
        for i in 0..3 {
            if original[i] == t && face[i] == split.s {
                if corner.is_some() {
                    return None;
                }
                corner = Some(i);
            } else if original[i] != face[i] {
                return None;
            }
        }
        corner
    })
}
