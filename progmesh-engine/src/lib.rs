//! Progressive mesh engine
//!
//! This crate replays a precomputed vertex split history on a base mesh:
//! - Vertex splits refine the mesh by one vertex
//! - Pair contractions undo them exactly
//! - Level-of-detail navigation jumps to any point of the history
//!
//! The incident-face index and all normals are maintained incrementally; the
//! mesh is never rebuilt once constructed.

pub mod adjacency;
pub mod contraction;
pub mod lod;
pub mod options;
pub mod progressive;

pub use adjacency::*;
pub use contraction::*;
pub use lod::*;
pub use options::*;
pub use progressive::*;
