//! Command-line playback of a progressive mesh
//!
//! Usage: `playback <file.obj> [--one-based] [snapshot.obj]`, e.g.
//! `cargo run -p progmesh-demos --bin playback -- demos/data/quad.obj`
//!
//! Loads the file, walks the level of detail through full detail, half detail
//! and back to the base mesh, printing each stage. With a snapshot path, the
//! half-detail mesh is exported as plain OBJ.
//!
//! Set `RUST_LOG=progmesh_engine=trace` to see every edit.

use anyhow::{bail, Context};
use progmesh_core::Drawable;
use progmesh_engine::ProgressiveMesh;
use progmesh_io::{read_progressive_mesh, IndexBase, MeshWriter, ObjReadOptions, ObjWriter};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn print_stage(label: &str, pm: &ProgressiveMesh) {
    let lod = pm.level_of_detail();
    let (min, max) = pm.bounding_box();
    println!(
        "{:<8} {:>7} vertices {:>7} faces   {}   bounds ({:.2}, {:.2}, {:.2}) - ({:.2}, {:.2}, {:.2})",
        label, lod.vertex_count, lod.face_count, lod, min.x, min.y, min.z, max.x, max.y, max.z
    );
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut path = None;
    let mut snapshot = None;
    let mut options = ObjReadOptions::default();
    for arg in std::env::args().skip(1) {
        if arg == "--one-based" {
            options = options.with_split_index_base(IndexBase::One);
        } else if path.is_none() {
            path = Some(arg);
        } else if snapshot.is_none() {
            snapshot = Some(arg);
        } else {
            bail!("unexpected argument '{}'", arg);
        }
    }
    let Some(path) = path else {
        bail!("usage: playback <file.obj> [--one-based] [snapshot.obj]");
    };

    let data = read_progressive_mesh(&path, &options)
        .with_context(|| format!("failed to load {}", path))?;
    let mut pm = ProgressiveMesh::new(data.mesh, data.splits)
        .with_context(|| format!("{} holds an inconsistent split history", path))?;

    print_stage("base", &pm);

    let applied = pm.expand_fully();
    print_stage("full", &pm);

    pm.progress_to(0.5);
    print_stage("half", &pm);

    if let Some(snapshot) = snapshot {
        ObjWriter::write_mesh(&pm.to_triangle_mesh(), &snapshot)
            .with_context(|| format!("failed to write {}", snapshot))?;
        info!("Wrote half-detail snapshot to {}", snapshot);
    }

    let undone = pm.collapse_fully();
    print_stage("base", &pm);

    info!("Applied {} splits and undid {} after the half-detail step", applied, undone);
    Ok(())
}
