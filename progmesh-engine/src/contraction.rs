//! Pair contraction records

use progmesh_core::{Point3f, Vector3f, VertexSplit};
use serde::{Deserialize, Serialize};

/// The inverse of an applied [`VertexSplit`].
///
/// Contracting merges the most recently added vertex back into `s`, moves `s`
/// back to `position` and truncates the live faces to `face_offset`. Under
/// [`NormalPolicy::Endpoints`](crate::NormalPolicy::Endpoints) `s` also gets
/// `normal` back. The split it undoes is kept by value and handed back to the
/// split stack unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contraction {
    pub s: u32,
    /// Position of `s` before the split
    pub position: Point3f,
    /// Normal of `s` before the split
    pub normal: Vector3f,
    /// Live face count before the split
    pub face_offset: usize,
    pub split: VertexSplit,
}

impl Contraction {
    /// Number of faces the contraction removes given the current face count
    pub fn removed_faces(&self, face_count: usize) -> usize {
        face_count.saturating_sub(self.face_offset)
    }

    pub fn into_split(self) -> VertexSplit {
        self.split
    }
}
