//! Vertex split records

use crate::point::*;
use crate::triangle::Triangle;
use serde::{Deserialize, Serialize};

/// A vertex split, the refinement step of a progressive mesh.
///
/// Splitting moves vertex `s` to `s_position` and introduces a new vertex `t`
/// at `t_position`. The new vertex always receives the next free vertex slot,
/// so its index is implied by the number of splits applied before this one.
///
/// `faces` lists the triangles of the detailed mesh that belong to `t` after
/// the split, written with `t`'s index. Triangles that also contain `s` span
/// both vertices and are created by the split; the others identify faces of
/// `s` that are handed over to `t`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexSplit {
    pub s: u32,
    pub s_position: Point3f,
    pub t_position: Point3f,
    pub faces: Vec<Triangle>,
}

impl VertexSplit {
    pub fn new(s: u32, s_position: Point3f, t_position: Point3f) -> Self {
        Self {
            s,
            s_position,
            t_position,
            faces: Vec::new(),
        }
    }

    /// Builder-style helper to attach the faces of `t`
    pub fn with_faces<I, T>(mut self, faces: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Triangle>,
    {
        self.faces.extend(faces.into_iter().map(Into::into));
        self
    }

    /// Triangles that contain both `s` and `t` and are created by the split
    pub fn created_faces(&self) -> impl Iterator<Item = &Triangle> + '_ {
        self.faces.iter().filter(move |f| f.contains(self.s))
    }

    /// Number of faces the split adds
    pub fn max_new_faces(&self) -> usize {
        self.created_faces().count()
    }
}
