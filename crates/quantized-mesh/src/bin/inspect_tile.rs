//! Decode a quantized-mesh tile from disk and print a JSON summary.
//!
//! Run with: `cargo run -p quantized-mesh --features test-tools --bin inspect_tile -- <file> <x> <y> <level> [--tms]`
//!
//! Pass `--tms` when `y` counts rows from the south, as in `{level}/{x}/{y}.terrain`
//! paths. Set `RUST_LOG=quantized_mesh=trace` to see per-extension logging.

use std::{env, error::Error, fs, process};

use quantized_mesh::{DecodeSettings, Edge, Extension, TileKey, decode_tile};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let tms = if let Some(position) = args.iter().position(|arg| arg == "--tms") {
        args.remove(position);
        true
    } else {
        false
    };

    let [path, x, y, level] = args.as_slice() else {
        eprintln!("usage: inspect_tile <file> <x> <y> <level> [--tms]");
        process::exit(2);
    };
    let (x, y, level): (u32, u32, u32) = (x.parse()?, y.parse()?, level.parse()?);

    let settings = DecodeSettings::default();
    let key = if tms {
        settings.tiling_scheme.key_from_tms(x, y, level)?
    } else {
        TileKey::new(x, y, level)
    };

    let bytes = fs::read(path)?;
    tracing::info!(path = %path, %key, bytes = bytes.len(), "decoding tile");
    let tile = decode_tile(&bytes, key, &settings)?;

    let edges: serde_json::Map<String, serde_json::Value> = Edge::ALL
        .iter()
        .map(|&edge| {
            let vertices = tile.mesh.skirt_vertex_range(edge);
            let indices = tile.mesh.skirt_index_range(edge);
            (
                edge.name().to_string(),
                json!({
                    "boundary_vertices": tile.mesh.edges.get(edge).len(),
                    "skirt_vertices": [vertices.start, vertices.end],
                    "skirt_indices": [indices.start, indices.end],
                }),
            )
        })
        .collect();

    let summary = json!({
        "key": { "x": key.x, "y": key.y, "level": key.level },
        "extent": {
            "west": tile.extent.west,
            "south": tile.extent.south,
            "east": tile.extent.east,
            "north": tile.extent.north,
        },
        "center": [tile.center.x, tile.center.y, tile.center.z],
        "height_range": [tile.minimum_height, tile.maximum_height],
        "bounding_sphere": {
            "center": [
                tile.bounding_sphere_center.x,
                tile.bounding_sphere_center.y,
                tile.bounding_sphere_center.z,
            ],
            "radius": tile.bounding_sphere_radius,
        },
        "skirt_height": settings.skirt_heights(level).get(Edge::West),
        "vertices": tile.mesh.vertices.len(),
        "vertices_without_skirts": tile.mesh.vertex_count_without_skirts,
        "indices": tile.mesh.indices.len(),
        "indices_without_skirts": tile.mesh.index_count_without_skirts,
        "triangles": tile.mesh.triangle_count(),
        "edges": edges,
        "extensions": tile
            .extensions
            .iter()
            .map(|extension| json!({
                "id": extension.id,
                "name": extension_name(extension.id),
                "bytes": extension.data.len(),
            }))
            .collect::<Vec<_>>(),
    });

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn extension_name(id: u8) -> &'static str {
    match id {
        Extension::OCT_VERTEX_NORMALS => "oct_vertex_normals",
        Extension::WATER_MASK => "water_mask",
        Extension::METADATA => "metadata",
        _ => "unknown",
    }
}
