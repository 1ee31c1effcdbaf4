//! OBJ format support with embedded vertex split records
//!
//! Progressive meshes are stored as a Wavefront OBJ base mesh followed by the
//! split history, one record per comment line:
//!
//! ```text
//! v 0 0 0
//! f 1 2 3
//! #vsplit 2 {1 0.8 0} {0.5 1.5 0} {(1 5 4) (1 3 5)}
//! ```
//!
//! The record reads: split vertex `2`, move it to the first brace, put the new
//! vertex at the second brace, and give it the faces in the third brace. Face
//! indices are 1-based like OBJ faces; the split vertex index is interpreted
//! according to [`IndexBase`]. Only triangle meshes are supported.

use crate::{IoError, MeshReader, MeshWriter, ProgressiveMeshData};
use itertools::Itertools;
use progmesh_core::{Point3f, Result, Triangle, TriangleMesh, VertexSplit};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// How the split vertex index of a `#vsplit` record is counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IndexBase {
    /// The index is the engine's own 0-based vertex index
    #[default]
    Zero,
    /// The index is 1-based like OBJ face indices
    One,
}

impl IndexBase {
    fn offset(self) -> u32 {
        match self {
            IndexBase::Zero => 0,
            IndexBase::One => 1,
        }
    }
}

/// Configuration for reading progressive OBJ files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjReadOptions {
    pub split_index_base: IndexBase,
}

impl ObjReadOptions {
    pub fn with_split_index_base(mut self, base: IndexBase) -> Self {
        self.split_index_base = base;
        self
    }
}

/// Configuration for writing progressive OBJ files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjWriteOptions {
    pub split_index_base: IndexBase,
}

impl ObjWriteOptions {
    pub fn with_split_index_base(mut self, base: IndexBase) -> Self {
        self.split_index_base = base;
        self
    }
}

pub struct ObjReader;
pub struct ObjWriter;

type ParseResult<T> = std::result::Result<T, String>;

impl ObjReader {
    /// Read a progressive mesh file
    pub fn read_progressive<P: AsRef<Path>>(
        path: P,
        options: &ObjReadOptions,
    ) -> Result<ProgressiveMeshData> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => IoError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => IoError::Io(e),
        })?;

        let data = Self::parse(BufReader::new(file), options)?;
        info!(
            "Loaded progressive mesh from {:?}: {} vertices, {} faces, {} vertex splits",
            path,
            data.mesh.vertex_count(),
            data.mesh.face_count(),
            data.splits.len()
        );
        Ok(data)
    }

    /// Parse a progressive mesh from a string
    pub fn parse_str(
        source: &str,
        options: &ObjReadOptions,
    ) -> std::result::Result<ProgressiveMeshData, IoError> {
        Self::parse(source.as_bytes(), options)
    }

    /// Parse a progressive mesh line by line.
    ///
    /// The first malformed `v`, `f` or `#vsplit` line aborts parsing. All other
    /// lines are ignored.
    pub fn parse<R: BufRead>(
        reader: R,
        options: &ObjReadOptions,
    ) -> std::result::Result<ProgressiveMeshData, IoError> {
        let mut data = ProgressiveMeshData::default();
        let mut ignored = 0usize;

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = i + 1;
            let l = line.trim();

            let parsed = if let Some(rest) = keyword(l, "v") {
                parse_vector(rest).map(|p| data.mesh.vertices.push(p))
            } else if let Some(rest) = keyword(l, "f") {
                parse_face(rest).map(|f| data.mesh.faces.push(f))
            } else if let Some(rest) = keyword(l, "#vsplit") {
                parse_vertex_split(rest, options.split_index_base).map(|s| data.splits.push(s))
            } else {
                if !l.is_empty() {
                    ignored += 1;
                }
                Ok(())
            };
            parsed.map_err(|message| IoError::parse(line_no, message))?;
        }

        debug!(
            vertices = data.mesh.vertex_count(),
            faces = data.mesh.face_count(),
            splits = data.splits.len(),
            ignored,
            "parsed progressive OBJ"
        );
        Ok(data)
    }
}

impl MeshReader for ObjReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
        Ok(Self::read_progressive(path, &ObjReadOptions::default())?.mesh)
    }
}

impl ObjWriter {
    /// Write a progressive mesh file
    pub fn write_progressive<P: AsRef<Path>>(
        data: &ProgressiveMeshData,
        path: P,
        options: &ObjWriteOptions,
    ) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        Self::write_progressive_to(data, &mut writer, options)?;
        writer.flush()?;
        info!(
            "Saved progressive mesh to {:?}: {} vertices, {} faces, {} vertex splits",
            path,
            data.mesh.vertex_count(),
            data.mesh.face_count(),
            data.splits.len()
        );
        Ok(())
    }

    /// Write a progressive mesh to any writer
    pub fn write_progressive_to<W: Write>(
        data: &ProgressiveMeshData,
        writer: &mut W,
        options: &ObjWriteOptions,
    ) -> std::io::Result<()> {
        write_vertices(&data.mesh, writer)?;
        for face in &data.mesh.faces {
            writeln!(writer, "f {} {} {}", face[0] + 1, face[1] + 1, face[2] + 1)?;
        }
        for split in &data.splits {
            writeln!(writer, "{}", format_vertex_split(split, options.split_index_base))?;
        }
        Ok(())
    }

    /// Format a progressive mesh as a string
    pub fn to_string(
        data: &ProgressiveMeshData,
        options: &ObjWriteOptions,
    ) -> std::io::Result<String> {
        let mut out = Vec::new();
        Self::write_progressive_to(data, &mut out, options)?;
        String::from_utf8(out)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Write a plain mesh, including `vn` lines when normals are present
    pub fn write_mesh_to<W: Write>(mesh: &TriangleMesh, writer: &mut W) -> std::io::Result<()> {
        write_vertices(mesh, writer)?;
        let with_normals = match &mesh.normals {
            Some(normals) => {
                for n in normals {
                    writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
                }
                true
            }
            None => false,
        };
        for face in &mesh.faces {
            let [a, b, c] = face.map(|i| i + 1);
            if with_normals {
                writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
            } else {
                writeln!(writer, "f {a} {b} {c}")?;
            }
        }
        Ok(())
    }
}

impl MeshWriter for ObjWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        Self::write_mesh_to(mesh, &mut writer)?;
        writer.flush()?;
        info!(
            "Saved mesh to {:?} (OBJ format): {} vertices, {} faces",
            path,
            mesh.vertex_count(),
            mesh.face_count()
        );
        Ok(())
    }
}

fn write_vertices<W: Write>(mesh: &TriangleMesh, writer: &mut W) -> std::io::Result<()> {
    for v in &mesh.vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    Ok(())
}

/// Format one `#vsplit` line
pub fn format_vertex_split(split: &VertexSplit, base: IndexBase) -> String {
    let faces = split
        .faces
        .iter()
        .map(|f| format!("({} {} {})", f[0] + 1, f[1] + 1, f[2] + 1))
        .join(" ");
    format!(
        "#vsplit {} {{{} {} {}}} {{{} {} {}}} {{{}}}",
        split.s + base.offset(),
        split.s_position.x,
        split.s_position.y,
        split.s_position.z,
        split.t_position.x,
        split.t_position.y,
        split.t_position.z,
        faces
    )
}

/// Strip `kw` from the start of `line` if it is followed by whitespace or
/// nothing, so that `v` does not match `vn`.
fn keyword<'a>(line: &'a str, kw: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(kw)?;
    (rest.is_empty() || rest.starts_with(char::is_whitespace)).then_some(rest)
}

fn parse_f32(token: &str) -> ParseResult<f32> {
    token
        .parse()
        .map_err(|_| format!("invalid coordinate '{}'", token))
}

/// Parse a 1-based OBJ index into a 0-based one
fn parse_index(token: &str) -> ParseResult<u32> {
    let index: u32 = token
        .parse()
        .map_err(|_| format!("invalid vertex index '{}'", token))?;
    index
        .checked_sub(1)
        .ok_or_else(|| "vertex indices are 1-based, found 0".to_string())
}

fn parse_vector(s: &str) -> ParseResult<Point3f> {
    let (x, y, z) = s
        .split_whitespace()
        .collect_tuple()
        .ok_or_else(|| format!("expected 3 coordinates, found '{}'", s.trim()))?;
    Ok(Point3f::new(parse_f32(x)?, parse_f32(y)?, parse_f32(z)?))
}

fn parse_indices(s: &str) -> ParseResult<[u32; 3]> {
    let (a, b, c) = s
        .split_whitespace()
        .collect_tuple()
        .ok_or_else(|| format!("expected a triangle, found '{}'", s.trim()))?;
    // `f 1/1/1 ...` refers to position 1
    let position = |t: &str| parse_index(t.split('/').next().unwrap_or(t));
    Ok([position(a)?, position(b)?, position(c)?])
}

fn parse_face(s: &str) -> ParseResult<[u32; 3]> {
    parse_indices(s)
}

/// Split `{...}` off the front of `s`, returning the inner text and the rest
fn braced(s: &str) -> ParseResult<(&str, &str)> {
    let inner = s
        .trim_start()
        .strip_prefix('{')
        .ok_or_else(|| format!("expected '{{' at '{}'", s.trim()))?;
    let end = inner.find('}').ok_or_else(|| "unclosed '{'".to_string())?;
    Ok((&inner[..end], &inner[end + 1..]))
}

fn parse_split_faces(s: &str) -> ParseResult<Vec<Triangle>> {
    let mut faces = Vec::new();
    let mut rest = s.trim_start();
    while !rest.is_empty() {
        let inner = rest
            .strip_prefix('(')
            .ok_or_else(|| format!("expected '(' at '{}'", rest))?;
        let end = inner.find(')').ok_or_else(|| "unclosed '('".to_string())?;
        faces.push(Triangle::from(parse_indices(&inner[..end])?));
        rest = inner[end + 1..].trim_start();
    }
    Ok(faces)
}

fn parse_vertex_split(s: &str, base: IndexBase) -> ParseResult<VertexSplit> {
    let s = s.trim_start();
    let (index, rest) = s
        .split_once(char::is_whitespace)
        .ok_or_else(|| "expected split vertex followed by three brace groups".to_string())?;
    let index: u32 = index
        .parse()
        .map_err(|_| format!("invalid split vertex '{}'", index))?;
    let index = index
        .checked_sub(base.offset())
        .ok_or_else(|| "split vertex index is 1-based, found 0".to_string())?;

    let (s_position, rest) = braced(rest)?;
    let (t_position, rest) = braced(rest)?;
    let (faces, rest) = braced(rest)?;
    if !rest.trim().is_empty() {
        return Err(format!("unexpected trailing text '{}'", rest.trim()));
    }

    Ok(VertexSplit {
        s: index,
        s_position: parse_vector(s_position)?,
        t_position: parse_vector(t_position)?,
        faces: parse_split_faces(faces)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword() {
        assert_eq!(keyword("v 1 2 3", "v"), Some(" 1 2 3"));
        assert_eq!(keyword("vn 1 2 3", "v"), None);
        assert_eq!(keyword("v", "v"), Some(""));
        assert_eq!(keyword("#vsplit 1", "#vsplit"), Some(" 1"));
        assert_eq!(keyword("#vsplitter", "#vsplit"), None);
    }

    #[test]
    fn test_braced() {
        let (inner, rest) = braced("  {1 2 3} {4}").unwrap();
        assert_eq!(inner, "1 2 3");
        assert_eq!(rest, " {4}");
        assert!(braced("1 2 3}").is_err());
        assert!(braced("{1 2 3").is_err());
    }

    #[test]
    fn test_parse_vertex_split() {
        let split = parse_vertex_split(" 7 {1 2 3} {-4 5.5 6e-1} {(1 2 3) (4 5 6)}", IndexBase::Zero)
            .unwrap();
        assert_eq!(split.s, 7);
        assert_eq!(split.s_position, Point3f::new(1.0, 2.0, 3.0));
        assert_eq!(split.t_position, Point3f::new(-4.0, 5.5, 0.6));
        assert_eq!(split.faces, vec![Triangle::new(0, 1, 2), Triangle::new(3, 4, 5)]);

        let one_based = parse_vertex_split("7 {1 2 3} {4 5 6} {}", IndexBase::One).unwrap();
        assert_eq!(one_based.s, 6);
        assert!(one_based.faces.is_empty());
    }

    #[test]
    fn test_parse_vertex_split_errors() {
        assert!(parse_vertex_split("x {1 2 3} {4 5 6} {}", IndexBase::Zero).is_err());
        assert!(parse_vertex_split("0 {1 2 3} {4 5 6} {}", IndexBase::One).is_err());
        assert!(parse_vertex_split("1 {1 2} {4 5 6} {}", IndexBase::Zero).is_err());
        assert!(parse_vertex_split("1 {1 2 3} {4 5 6}", IndexBase::Zero).is_err());
        assert!(parse_vertex_split("1 {1 2 3} {4 5 6} {(1 2)}", IndexBase::Zero).is_err());
        assert!(parse_vertex_split("1 {1 2 3} {4 5 6} {(1 2 -3)}", IndexBase::Zero).is_err());
        assert!(parse_vertex_split("1 {1 2 3} {4 5 6} {} extra", IndexBase::Zero).is_err());
    }

    #[test]
    fn test_face_with_texture_and_normal_refs() {
        assert_eq!(parse_face(" 1/4/7 2//8 3").unwrap(), [0, 1, 2]);
        assert!(parse_face(" 1 2 3 4").is_err());
        assert!(parse_face(" 0 1 2").is_err());
    }

    #[test]
    fn test_format_vertex_split() {
        let split = VertexSplit::new(2, Point3f::new(1.0, 0.8, 0.0), Point3f::new(0.5, 1.5, -0.0))
            .with_faces([[0u32, 4, 3], [0, 2, 4]]);
        assert_eq!(
            format_vertex_split(&split, IndexBase::Zero),
            "#vsplit 2 {1 0.8 0} {0.5 1.5 -0} {(1 5 4) (1 3 5)}"
        );
        assert!(format_vertex_split(&split, IndexBase::One).starts_with("#vsplit 3 {"));
    }
}
