//! Core data structures and traits for progmesh
//!
//! This crate provides the geometry primitives shared by the progressive mesh
//! engine and the file loader: vertices, triangles, the flat face storage that
//! doubles as an index buffer, the plain `TriangleMesh` container and the
//! vertex split records that make up a progressive mesh's edit history.

pub mod point;
pub mod triangle;
pub mod mesh;
pub mod vsplit;
pub mod traits;
pub mod error;

pub use point::*;
pub use triangle::*;
pub use mesh::*;
pub use vsplit::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
