//! Shared fixtures for the engine integration tests and benchmarks
//!
//! Split histories are produced by simplifying a detailed mesh: the
//! highest-index vertex is repeatedly collapsed into one of its neighbours and
//! the inverse of every collapse is recorded. Replaying the reversed records
//! on the final coarse mesh rebuilds the detailed mesh exactly.

#![allow(dead_code)]

use progmesh_core::{triangle_normal, Point3f, Triangle, TriangleMesh, Vector3f, VertexSplit};
use std::collections::BTreeSet;

/// A base mesh, its split history and the mesh the history expands to
#[derive(Debug, Clone)]
pub struct History {
    pub base: TriangleMesh,
    pub splits: Vec<VertexSplit>,
    pub detailed: TriangleMesh,
}

/// Flat `nx` x `ny` vertex grid in the z = 0 plane, counter-clockwise faces.
///
/// Vertices are numbered row by row; every cell is split along its diagonal
/// from `(x, y)` to `(x + 1, y + 1)`.
pub fn make_plane_grid(nx: usize, ny: usize) -> TriangleMesh {
    make_height_grid(nx, ny, |_, _| 0.0)
}

/// Grid like [`make_plane_grid`] with a gentle non-planar height field
pub fn make_wavy_grid(nx: usize, ny: usize) -> TriangleMesh {
    make_height_grid(nx, ny, |x, y| 0.25 * (0.9 * x).sin() * (0.7 * y).cos())
}

fn make_height_grid(nx: usize, ny: usize, height: impl Fn(f32, f32) -> f32) -> TriangleMesh {
    let mut mesh = TriangleMesh::new();
    for y in 0..ny {
        for x in 0..nx {
            let (fx, fy) = (x as f32, y as f32);
            mesh.add_vertex(Point3f::new(fx, fy, height(fx, fy)));
        }
    }
    let index = |x: usize, y: usize| (y * nx + x) as u32;
    for y in 0..ny - 1 {
        for x in 0..nx - 1 {
            let (a, b, c, d) = (index(x, y), index(x + 1, y), index(x + 1, y + 1), index(x, y + 1));
            mesh.add_face([a, b, c]);
            mesh.add_face([a, c, d]);
        }
    }
    mesh
}

/// Rename vertex `i` to `permutation[i]`
pub fn relabel(mesh: &TriangleMesh, permutation: &[u32]) -> TriangleMesh {
    let mut vertices = vec![Point3f::origin(); mesh.vertex_count()];
    for (i, p) in mesh.vertices.iter().enumerate() {
        vertices[permutation[i] as usize] = *p;
    }
    let faces = mesh
        .faces
        .iter()
        .map(|f| f.map(|v| permutation[v as usize]))
        .collect();
    TriangleMesh::from_vertices_and_faces(vertices, faces)
}

/// Deterministic shuffle of `0..n` (Fisher-Yates over a 64-bit LCG)
pub fn scrambled_numbering(n: usize, seed: u64) -> Vec<u32> {
    let mut permutation: Vec<u32> = (0..n as u32).collect();
    let mut state = seed;
    for i in (1..n).rev() {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let j = ((state >> 33) % (i as u64 + 1)) as usize;
        permutation.swap(i, j);
    }
    permutation
}

struct Collapse {
    s: u32,
    position: Point3f,
}

fn face_normal(positions: &[Point3f], face: &[u32; 3]) -> Vector3f {
    let [a, b, c] = face.map(|v| positions[v as usize]);
    (b - a).cross(&(c - a))
}

fn neighbours(faces: &[[u32; 3]], v: u32) -> BTreeSet<u32> {
    faces
        .iter()
        .filter(|f| f.contains(&v))
        .flat_map(|f| f.iter().copied())
        .filter(|&u| u != v)
        .collect()
}

fn collapsed(faces: &[[u32; 3]], s: u32, t: u32) -> Vec<[u32; 3]> {
    faces
        .iter()
        .filter(|f| !(f.contains(&s) && f.contains(&t)))
        .map(|f| f.map(|v| if v == t { s } else { v }))
        .collect()
}

/// Whether collapsing `t` into `s` with `s` moved to `position` keeps the
/// mesh a valid, consistently oriented triangulation that the split can
/// rebuild unambiguously.
fn is_valid_collapse(positions: &[Point3f], faces: &[[u32; 3]], s: u32, t: u32, position: Point3f) -> bool {
    // Link condition: the only common neighbours are the apexes of edge st
    let apexes: BTreeSet<u32> = faces
        .iter()
        .filter(|f| f.contains(&s) && f.contains(&t))
        .flat_map(|f| f.iter().copied())
        .filter(|&v| v != s && v != t)
        .collect();
    let common: BTreeSet<u32> = neighbours(faces, s)
        .intersection(&neighbours(faces, t))
        .copied()
        .collect();
    if apexes.is_empty() || common != apexes {
        return false;
    }

    let after = collapsed(faces, s, t);

    // No vertex other than t may lose all of its faces
    let mut survivors = apexes.iter().chain(std::iter::once(&s));
    if survivors.any(|&v| !after.iter().any(|f| f.contains(&v))) {
        return false;
    }

    // No two faces may coincide
    let unique: BTreeSet<[u32; 3]> = after
        .iter()
        .map(|f| {
            let mut sorted = *f;
            sorted.sort_unstable();
            sorted
        })
        .collect();
    if unique.len() != after.len() {
        return false;
    }

    // Faces around the merged vertex keep their orientation
    let mut moved = positions.to_vec();
    moved[s as usize] = position;
    faces
        .iter()
        .filter(|f| (f.contains(&s) || f.contains(&t)) && !(f.contains(&s) && f.contains(&t)))
        .all(|f| {
            let before = face_normal(positions, f);
            let rewritten = f.map(|v| if v == t { s } else { v });
            before.dot(&face_normal(&moved, &rewritten)) > 1e-6
        })
}

/// Choose the neighbour of `t` to collapse into: the one handing the most
/// faces back to `t` on refinement, then the smallest index. The merged
/// vertex goes to the edge midpoint when that keeps the mesh valid.
fn find_collapse(positions: &[Point3f], faces: &[[u32; 3]], t: u32) -> Option<Collapse> {
    neighbours(faces, t)
        .into_iter()
        .filter_map(|s| {
            let midpoint = nalgebra::center(&positions[s as usize], &positions[t as usize]);
            let position = [midpoint, positions[s as usize]]
                .into_iter()
                .find(|&p| is_valid_collapse(positions, faces, s, t, p))?;
            let reassigned = faces
                .iter()
                .filter(|f| f.contains(&t) && !f.contains(&s))
                .count();
            Some((reassigned, s, position))
        })
        .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
        .map(|(_, s, position)| Collapse { s, position })
}

/// Simplify `detailed` by up to `max_splits` collapses.
///
/// Stops early when the highest-index vertex has no valid collapse.
pub fn build_history(detailed: &TriangleMesh, max_splits: usize) -> History {
    let mut positions = detailed.vertices.clone();
    let mut faces = detailed.faces.clone();
    let mut splits = Vec::new();

    while splits.len() < max_splits && positions.len() > 3 {
        let t = (positions.len() - 1) as u32;
        let Some(Collapse { s, position }) = find_collapse(&positions, &faces, t) else {
            break;
        };

        let faces_of_t: Vec<Triangle> = faces
            .iter()
            .filter(|f| f.contains(&t))
            .map(|&f| Triangle::from(f))
            .collect();
        splits.push(VertexSplit {
            s,
            s_position: positions[s as usize],
            t_position: positions[t as usize],
            faces: faces_of_t,
        });

        faces = collapsed(&faces, s, t);
        positions[s as usize] = position;
        positions.pop();
    }

    splits.reverse();
    History {
        base: TriangleMesh::from_vertices_and_faces(positions, faces),
        splits,
        detailed: detailed.clone(),
    }
}

/// Faces of a mesh as a set, for comparisons independent of slot order
pub fn face_set<I: IntoIterator<Item = [u32; 3]>>(faces: I) -> BTreeSet<[u32; 3]> {
    faces.into_iter().collect()
}

/// Whether `a` points along `b`
pub fn parallel(a: &Vector3f, b: &Vector3f) -> bool {
    a.cross(b).norm() < 1e-5 && a.dot(b) > 0.0
}

/// Unit normal of `face`, as the engine computes it
pub fn unit_face_normal(positions: &[Point3f], face: &[u32; 3]) -> Vector3f {
    let [a, b, c] = face.map(|v| positions[v as usize]);
    triangle_normal(&a, &b, &c)
}
