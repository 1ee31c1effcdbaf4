//! Point and vertex types

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use bytemuck::{Pod, Zeroable};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// A mesh vertex as it is handed to the renderer.
///
/// The layout is two tightly packed `f32` triples (position, then normal), so
/// a slice of vertices can be uploaded to a vertex buffer as raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Vertex {
    pub position: Point3f,
    pub normal: Vector3f,
}

unsafe impl Pod for Vertex {}
unsafe impl Zeroable for Vertex {}

impl Vertex {
    /// Size of one vertex in bytes
    pub const SIZE: usize = std::mem::size_of::<Vertex>();

    /// Create a vertex at `position` with a zero normal
    pub fn new(position: Point3f) -> Self {
        Self {
            position,
            normal: Vector3f::zeros(),
        }
    }

    /// Create a vertex with an explicit normal
    pub fn with_normal(position: Point3f, normal: Vector3f) -> Self {
        Self { position, normal }
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self::new(Point3f::origin())
    }
}

impl From<Point3f> for Vertex {
    fn from(position: Point3f) -> Self {
        Self::new(position)
    }
}
