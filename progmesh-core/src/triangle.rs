//! Triangles and the flat face storage shared with the renderer

use crate::point::*;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// A triangle given by three vertex indices.
///
/// Indices are `u32` because index buffers only accept unsigned types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triangle {
    pub indices: [u32; 3],
}

impl Triangle {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self { indices: [a, b, c] }
    }

    /// Check whether `vertex` is one of the three corners
    pub fn contains(&self, vertex: u32) -> bool {
        self.indices.contains(&vertex)
    }

    /// Largest vertex index referenced by the triangle
    pub fn max_index(&self) -> u32 {
        self.indices[0].max(self.indices[1]).max(self.indices[2])
    }
}

impl From<[u32; 3]> for Triangle {
    fn from(indices: [u32; 3]) -> Self {
        Self { indices }
    }
}

impl From<Triangle> for [u32; 3] {
    fn from(triangle: Triangle) -> Self {
        triangle.indices
    }
}

impl Index<usize> for Triangle {
    type Output = u32;

    fn index(&self, corner: usize) -> &u32 {
        &self.indices[corner]
    }
}

/// Unit normal of the triangle `(p0, p1, p2)`, counter-clockwise winding.
///
/// Degenerate triangles yield the zero vector.
pub fn triangle_normal(p0: &Point3f, p1: &Point3f, p2: &Point3f) -> Vector3f {
    let d1 = p1 - p0;
    let d2 = p2 - p0;
    d1.cross(&d2)
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vector3f::zeros)
}

/// Flat, fixed-capacity face storage.
///
/// Every three consecutive indices form one face; a face is identified by its
/// slot. The index array is laid out exactly as an index buffer expects it, so
/// the live prefix can be copied to the GPU without conversion. Each slot also
/// carries a cached face normal that is only meaningful after
/// [`FaceBuffer::recompute_normal`] has been called for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceBuffer {
    indices: Vec<u32>,
    normals: Vec<Vector3f>,
}

impl FaceBuffer {
    /// Allocate storage for `capacity` faces. All slots start as `(0, 0, 0)`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: vec![0; capacity * 3],
            normals: vec![Vector3f::zeros(); capacity],
        }
    }

    /// Number of face slots
    pub fn capacity(&self) -> usize {
        self.normals.len()
    }

    /// Write a face into `slot`, overwriting whatever was stored there.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is beyond the capacity.
    pub fn write(&mut self, slot: usize, triangle: Triangle) -> FaceMut<'_> {
        let mut face = self.face_mut(slot);
        for corner in 0..3 {
            face[corner] = triangle.indices[corner];
        }
        face
    }

    /// Read view of `slot`
    pub fn face(&self, slot: usize) -> Face<'_> {
        let offset = slot * 3;
        Face {
            indices: &self.indices[offset..offset + 3],
            normal: &self.normals[slot],
        }
    }

    /// Write view of `slot`
    pub fn face_mut(&mut self, slot: usize) -> FaceMut<'_> {
        let offset = slot * 3;
        FaceMut {
            indices: &mut self.indices[offset..offset + 3],
        }
    }

    /// Indices of `slot` as a triangle value
    pub fn triangle(&self, slot: usize) -> Triangle {
        self.face(slot).triangle()
    }

    /// Cached normal of `slot`
    pub fn normal(&self, slot: usize) -> Vector3f {
        self.normals[slot]
    }

    /// Recompute and cache the normal of `slot` from the given vertex positions.
    pub fn recompute_normal(&mut self, slot: usize, vertices: &[Vertex]) -> Vector3f {
        let t = self.triangle(slot);
        let normal = triangle_normal(
            &vertices[t.indices[0] as usize].position,
            &vertices[t.indices[1] as usize].position,
            &vertices[t.indices[2] as usize].position,
        );
        self.normals[slot] = normal;
        normal
    }

    /// The first `count` faces as a flat index slice
    pub fn indices(&self, count: usize) -> &[u32] {
        &self.indices[..count * 3]
    }
}

/// Read-only view of one face slot
#[derive(Debug, Clone, Copy)]
pub struct Face<'a> {
    indices: &'a [u32],
    normal: &'a Vector3f,
}

impl<'a> Face<'a> {
    pub fn triangle(&self) -> Triangle {
        Triangle::new(self.indices[0], self.indices[1], self.indices[2])
    }

    pub fn contains(&self, vertex: u32) -> bool {
        self.indices.contains(&vertex)
    }

    pub fn normal(&self) -> Vector3f {
        *self.normal
    }
}

impl Index<usize> for Face<'_> {
    type Output = u32;

    fn index(&self, corner: usize) -> &u32 {
        &self.indices[corner]
    }
}

/// Mutable view of the indices of one face slot
#[derive(Debug)]
pub struct FaceMut<'a> {
    indices: &'a mut [u32],
}

impl<'a> FaceMut<'a> {
    pub fn triangle(&self) -> Triangle {
        Triangle::new(self.indices[0], self.indices[1], self.indices[2])
    }

    pub fn contains(&self, vertex: u32) -> bool {
        self.indices.contains(&vertex)
    }

    /// Replace the first occurrence of `from` with `to`; returns the corner
    /// that was rewritten.
    pub fn replace(&mut self, from: u32, to: u32) -> Option<usize> {
        let corner = self.indices.iter().position(|&i| i == from)?;
        self.indices[corner] = to;
        Some(corner)
    }
}

impl Index<usize> for FaceMut<'_> {
    type Output = u32;

    fn index(&self, corner: usize) -> &u32 {
        &self.indices[corner]
    }
}

impl IndexMut<usize> for FaceMut<'_> {
    fn index_mut(&mut self, corner: usize) -> &mut u32 {
        &mut self.indices[corner]
    }
}
