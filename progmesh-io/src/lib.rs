//! I/O operations for progressive meshes
//!
//! This crate reads and writes the progressive OBJ format: a plain Wavefront
//! OBJ base mesh whose vertex split history is stored in `#vsplit` comment
//! lines. Files stay loadable by ordinary OBJ tools, which see the base mesh.

pub mod error;
pub mod obj;

pub use error::*;
pub use obj::{IndexBase, ObjReadOptions, ObjReader, ObjWriteOptions, ObjWriter};

use progmesh_core::{Result, TriangleMesh, VertexSplit};
use serde::{Deserialize, Serialize};

/// A base mesh together with its split history in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressiveMeshData {
    pub mesh: TriangleMesh,
    pub splits: Vec<VertexSplit>,
}

impl ProgressiveMeshData {
    pub fn new(mesh: TriangleMesh, splits: Vec<VertexSplit>) -> Self {
        Self { mesh, splits }
    }

    /// Vertex count once every split is applied
    pub fn full_vertex_count(&self) -> usize {
        self.mesh.vertex_count() + self.splits.len()
    }
}

/// Trait for reading meshes from files
pub trait MeshReader {
    fn read_mesh<P: AsRef<std::path::Path>>(path: P) -> Result<TriangleMesh>;
}

/// Trait for writing meshes to files
pub trait MeshWriter {
    fn write_mesh<P: AsRef<std::path::Path>>(mesh: &TriangleMesh, path: P) -> Result<()>;
}

fn unsupported(path: &std::path::Path) -> progmesh_core::Error {
    IoError::InvalidFormat {
        format: format!("{:?}", path.extension()),
    }
    .into()
}

/// Auto-detect format and read the base mesh, ignoring any split records
pub fn read_mesh<P: AsRef<std::path::Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("obj") | Some("pm") => obj::ObjReader::read_mesh(path),
        _ => Err(unsupported(path)),
    }
}

/// Auto-detect format and read a base mesh with its split history
pub fn read_progressive_mesh<P: AsRef<std::path::Path>>(
    path: P,
    options: &ObjReadOptions,
) -> Result<ProgressiveMeshData> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("obj") | Some("pm") => obj::ObjReader::read_progressive(path, options),
        _ => Err(unsupported(path)),
    }
}

/// Auto-detect format and write a base mesh with its split history
pub fn write_progressive_mesh<P: AsRef<std::path::Path>>(
    data: &ProgressiveMeshData,
    path: P,
    options: &ObjWriteOptions,
) -> Result<()> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("obj") | Some("pm") => obj::ObjWriter::write_progressive(data, path, options),
        _ => Err(unsupported(path)),
    }
}

#[cfg(test)]
mod tests;
