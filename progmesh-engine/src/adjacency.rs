//! Incident-face index
//!
//! Maps every live vertex to the set of face slots that reference it. The index
//! is built once from the base mesh and then updated incrementally by every
//! split and contraction.

use progmesh_core::FaceBuffer;
use std::collections::BTreeSet;

/// Vertex → incident face slots.
///
/// Sets are ordered by slot so that anything accumulated over a vertex's faces
/// (vertex normals in particular) is summed in a reproducible order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentFaces {
    sets: Vec<BTreeSet<usize>>,
}

impl IncidentFaces {
    /// Build the index for the first `face_count` faces of `faces`, over
    /// `vertex_count` vertices.
    pub fn build(faces: &FaceBuffer, vertex_count: usize, face_count: usize) -> Self {
        let mut sets = vec![BTreeSet::new(); vertex_count];
        for slot in 0..face_count {
            let face = faces.face(slot);
            for corner in 0..3 {
                sets[face[corner] as usize].insert(slot);
            }
        }
        Self { sets }
    }

    /// Number of vertices covered by the index
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Face slots incident to `vertex`
    pub fn faces_of(&self, vertex: u32) -> &BTreeSet<usize> {
        &self.sets[vertex as usize]
    }

    /// Snapshot of the face slots incident to `vertex`, for iterating while
    /// the index is modified.
    pub fn snapshot(&self, vertex: u32) -> Vec<usize> {
        self.sets[vertex as usize].iter().copied().collect()
    }

    pub fn insert(&mut self, vertex: u32, slot: usize) -> bool {
        self.sets[vertex as usize].insert(slot)
    }

    pub fn remove(&mut self, vertex: u32, slot: usize) -> bool {
        self.sets[vertex as usize].remove(&slot)
    }

    /// Move `slot` from `from`'s set to `to`'s set
    pub fn transfer(&mut self, slot: usize, from: u32, to: u32) {
        self.remove(from, slot);
        self.insert(to, slot);
    }

    /// Register the corners of a face
    pub fn insert_face(&mut self, slot: usize, corners: [u32; 3]) {
        for v in corners {
            self.insert(v, slot);
        }
    }

    /// Remove a face from the sets of all its corners
    pub fn remove_face(&mut self, slot: usize, corners: [u32; 3]) {
        for v in corners {
            self.remove(v, slot);
        }
    }

    /// Add an empty entry for the next vertex; returns its index.
    pub fn push_vertex(&mut self) -> u32 {
        self.sets.push(BTreeSet::new());
        (self.sets.len() - 1) as u32
    }

    /// Drop the entry of the last vertex, returning the faces it still had.
    pub fn pop_vertex(&mut self) -> Option<BTreeSet<usize>> {
        self.sets.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use progmesh_core::Triangle;

    fn quad_faces() -> FaceBuffer {
        let mut faces = FaceBuffer::with_capacity(4);
        faces.write(0, Triangle::new(0, 1, 2));
        faces.write(1, Triangle::new(0, 2, 3));
        faces
    }

    #[test]
    fn test_build_only_covers_live_faces() {
        let mut faces = quad_faces();
        // A stale slot beyond the live range must not be indexed
        faces.write(2, Triangle::new(1, 2, 3));
        let index = IncidentFaces::build(&faces, 4, 2);
        assert_eq!(index.len(), 4);
        assert_eq!(index.snapshot(0), vec![0, 1]);
        assert_eq!(index.snapshot(1), vec![0]);
        assert_eq!(index.snapshot(2), vec![0, 1]);
        assert_eq!(index.snapshot(3), vec![1]);
    }

    #[test]
    fn test_incremental_updates() {
        let mut index = IncidentFaces::build(&quad_faces(), 4, 2);
        let t = index.push_vertex();
        assert_eq!(t, 4);
        assert!(index.faces_of(t).is_empty());

        index.transfer(1, 2, t);
        assert_eq!(index.snapshot(2), vec![0]);
        assert_eq!(index.snapshot(4), vec![1]);

        index.insert_face(2, [0, 2, 4]);
        assert_eq!(index.snapshot(0), vec![0, 1, 2]);
        index.remove_face(2, [0, 2, 4]);
        assert_eq!(index.snapshot(0), vec![0, 1]);

        let leftover = index.pop_vertex().unwrap();
        assert_eq!(leftover.into_iter().collect::<Vec<_>>(), vec![1]);
        assert_eq!(index.len(), 4);
    }
}
