//! Mesh data structures and functionality

use crate::point::*;
use crate::triangle::triangle_normal;
use serde::{Deserialize, Serialize};

/// A plain indexed triangle mesh.
///
/// This is the exchange format between the loader and the progressive mesh
/// engine (the base mesh) and the format of level-of-detail snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[u32; 3]>,
    pub normals: Option<Vec<Vector3f>>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            normals: None,
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            faces,
            normals: None,
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Add a vertex to the mesh
    pub fn add_vertex(&mut self, vertex: Point3f) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    /// Add a face to the mesh
    pub fn add_face(&mut self, face: [u32; 3]) {
        self.faces.push(face);
    }

    /// Calculate face normals
    pub fn calculate_face_normals(&self) -> Vec<Vector3f> {
        self.faces
            .iter()
            .map(|face| {
                triangle_normal(
                    &self.vertices[face[0] as usize],
                    &self.vertices[face[1] as usize],
                    &self.vertices[face[2] as usize],
                )
            })
            .collect()
    }

    /// Calculate vertex normals as the renormalized sum of incident face normals.
    ///
    /// Faces are accumulated in face order, which is also the order the
    /// progressive mesh engine uses, so both produce identical results. A
    /// face that repeats a vertex contributes to it once.
    pub fn calculate_vertex_normals(&self) -> Vec<Vector3f> {
        let mut sums = vec![Vector3f::zeros(); self.vertices.len()];
        for (face, normal) in self.faces.iter().zip(self.calculate_face_normals()) {
            for (corner, &v) in face.iter().enumerate() {
                if !face[..corner].contains(&v) {
                    sums[v as usize] += normal;
                }
            }
        }
        sums.into_iter()
            .map(|n| n.try_normalize(f32::EPSILON).unwrap_or_else(Vector3f::zeros))
            .collect()
    }

    /// Compute and store vertex normals
    pub fn compute_normals(&mut self) {
        self.normals = Some(self.calculate_vertex_normals());
    }

    /// Set vertex normals
    pub fn set_normals(&mut self, normals: Vec<Vector3f>) {
        if normals.len() == self.vertices.len() {
            self.normals = Some(normals);
        }
    }

    /// Index of the first face referencing a vertex that does not exist
    pub fn find_invalid_face(&self) -> Option<usize> {
        let n = self.vertices.len();
        self.faces
            .iter()
            .position(|face| face.iter().any(|&v| v as usize >= n))
    }

    /// Clear the mesh
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.faces.clear();
        self.normals = None;
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad() -> TriangleMesh {
        TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(1.0, 1.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
    }

    #[test]
    fn test_counts() {
        let mut mesh = TriangleMesh::new();
        assert!(mesh.is_empty());
        let a = mesh.add_vertex(Point3f::origin());
        let b = mesh.add_vertex(Point3f::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3f::new(0.0, 1.0, 0.0));
        mesh.add_face([a, b, c]);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
        assert!(!mesh.is_empty());
        mesh.clear();
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_vertex_normals_of_planar_quad() {
        let mut mesh = quad();
        mesh.compute_normals();
        let normals = mesh.normals.as_ref().unwrap();
        assert_eq!(normals.len(), 4);
        for n in normals {
            assert_relative_eq!(*n, Vector3f::new(0.0, 0.0, 1.0));
        }
    }

    #[test]
    fn test_unreferenced_vertex_gets_zero_normal() {
        let mut mesh = quad();
        mesh.add_vertex(Point3f::new(5.0, 5.0, 5.0));
        let normals = mesh.calculate_vertex_normals();
        assert_eq!(normals[4], Vector3f::zeros());
    }

    #[test]
    fn test_find_invalid_face() {
        let mut mesh = quad();
        assert_eq!(mesh.find_invalid_face(), None);
        mesh.add_face([0, 3, 4]);
        assert_eq!(mesh.find_invalid_face(), Some(2));
    }

    #[test]
    fn test_set_normals_rejects_wrong_length() {
        let mut mesh = quad();
        mesh.set_normals(vec![Vector3f::z(); 3]);
        assert!(mesh.normals.is_none());
        mesh.set_normals(vec![Vector3f::z(); 4]);
        assert!(mesh.normals.is_some());
    }
}
