//! meshinfo: load an OBJ mesh, build its GPU buffers and report them.

use anyhow::{Context, Result};
use asset::{BufferBuilder, IndexLayout, MeshBuffers};
use clap::{Parser, ValueEnum};
use renderer::DrawCall;

/// Inspect the vertex and index buffers produced for an OBJ mesh
#[derive(Parser, Debug)]
#[command(name = "meshinfo", version, about, long_about = None)]
struct Cli {
    /// Path to the .obj file
    path: String,

    /// How the index buffer is populated
    #[arg(short = 'i', long, value_enum, default_value_t = LayoutArg::Identity)]
    index_layout: LayoutArg,

    /// Print the first N vertices and indices
    #[arg(short, long, default_value_t = 0)]
    dump: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutArg {
    /// One index per vertex, drawn indexed
    Identity,
    /// Five running-counter indices per face, drawn as a vertex list
    Legacy,
}

impl From<LayoutArg> for IndexLayout {
    fn from(value: LayoutArg) -> Self {
        match value {
            LayoutArg::Identity => IndexLayout::Identity,
            LayoutArg::Legacy => IndexLayout::Legacy,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("meshinfo: path={}, index_layout={:?}", cli.path, cli.index_layout);

    let mesh = asset::load_obj_from_path(&cli.path)
        .with_context(|| format!("Failed to load mesh {}", cli.path))?;
    if !mesh.has_faces() {
        log::warn!("{} has no faces; buffers will be empty", cli.path);
    }

    let buffers = BufferBuilder::new(cli.index_layout.into())
        .build(&mesh)
        .with_context(|| format!("Failed to build buffers for {}", cli.path))?;

    report(&buffers, cli.dump);
    Ok(())
}

fn report(buffers: &MeshBuffers, dump: usize) {
    println!(
        "vertices: {} ({} bytes)",
        buffers.vertex_count(),
        buffers.vertex_bytes().len()
    );
    println!(
        "indices:  {} ({} bytes, {:?})",
        buffers.index_count(),
        buffers.index_bytes().len(),
        renderer::index_format(&buffers.indices)
    );
    println!("draw:     {:?}", DrawCall::for_buffers(buffers));

    for (i, v) in buffers.vertices.iter().take(dump).enumerate() {
        println!("v[{i}] pos={:?} uv={:?}", v.position, v.tex_coord);
    }
    for i in 0..dump.min(buffers.index_count()) {
        if let Some(index) = buffers.indices.get(i) {
            println!("i[{i}] {index}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults() {
        let cli = Cli::try_parse_from(["meshinfo", "woman.obj"]).unwrap();
        assert_eq!(cli.path, "woman.obj");
        assert_eq!(IndexLayout::from(cli.index_layout), IndexLayout::Identity);
        assert_eq!(cli.dump, 0);
    }

    #[test]
    fn parses_legacy_layout() {
        let cli =
            Cli::try_parse_from(["meshinfo", "man.obj", "--index-layout", "legacy", "-d", "4"])
                .unwrap();
        assert_eq!(IndexLayout::from(cli.index_layout), IndexLayout::Legacy);
        assert_eq!(cli.dump, 4);
    }

    #[test]
    fn rejects_unknown_layout() {
        assert!(Cli::try_parse_from(["meshinfo", "a.obj", "--index-layout", "fan"]).is_err());
    }
}
