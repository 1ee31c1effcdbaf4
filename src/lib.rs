//! # progmesh
//!
//! Progressive triangle meshes for Rust.
//!
//! This is the umbrella crate that provides convenient access to all progmesh
//! functionality. You can use this crate to get everything in one place, or use
//! individual crates for more granular control over dependencies.
//!
//! ## Features
//!
//! - **Core**: Geometry primitives, the base mesh container and vertex split records
//! - **Engine**: Vertex split / pair contraction playback with incremental
//!   adjacency and normals, plus level-of-detail navigation
//! - **I/O**: The OBJ format with embedded `#vsplit` records
//!
//! ## Quick Start
//!
//! ```rust
//! use progmesh::prelude::*;
//!
//! let base = TriangleMesh::from_vertices_and_faces(
//!     vec![
//!         Point3f::new(0.0, 0.0, 0.0),
//!         Point3f::new(1.0, 0.0, 0.0),
//!         Point3f::new(1.0, 1.0, 0.0),
//!         Point3f::new(0.0, 1.0, 0.0),
//!     ],
//!     vec![[0, 1, 2], [0, 2, 3]],
//! );
//! let split = VertexSplit::new(2, Point3f::new(1.0, 0.8, 0.0), Point3f::new(0.5, 1.5, 0.0))
//!     .with_faces([[0u32, 4, 3], [0, 2, 4]]);
//!
//! let mut pm = ProgressiveMesh::new(base, vec![split]).unwrap();
//! assert!(pm.perform_vertex_split());
//! assert_eq!((pm.vertex_count(), pm.face_count()), (5, 3));
//! assert!(pm.perform_contraction());
//! assert_eq!(pm.level_of_detail().to_string(), "0/1 (0 %)");
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables io
//! - `io`: Reading and writing progressive OBJ files

// Re-export core functionality
pub use progmesh_core::*;

// Re-export sub-crates
pub use progmesh_engine as engine;

#[cfg(feature = "io")]
pub use progmesh_io as io;

/// Convenient imports for common use cases
pub mod prelude {
    pub use progmesh_core::*;

    pub use progmesh_engine::*;

    #[cfg(feature = "io")]
    pub use progmesh_io::*;
}

/// Load a progressive mesh file and prepare it for playback.
///
/// The file is read with the default [`io::ObjReadOptions`] and the engine is
/// created with the default [`engine::EngineOptions`].
#[cfg(feature = "io")]
pub fn load_progressive_mesh<P: AsRef<std::path::Path>>(path: P) -> Result<engine::ProgressiveMesh> {
    let data = io::read_progressive_mesh(path, &io::ObjReadOptions::default())?;
    engine::ProgressiveMesh::new(data.mesh, data.splits)
}
