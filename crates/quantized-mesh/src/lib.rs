//! Quantized-mesh terrain tiles, decoded for rendering.
//!
//! This crate wraps [`quantized_mesh_decode`] with a geographic tiling
//! scheme and decode settings, so a caller only needs the tile bytes and
//! its address:
//!
//! ```no_run
//! use quantized_mesh::{DecodeSettings, TileKey, decode_tile};
//!
//! # fn main() -> quantized_mesh::Result<()> {
//! let bytes = std::fs::read("0/0/0.terrain").unwrap_or_default();
//! let tile = decode_tile(&bytes, TileKey::new(0, 0, 0), &DecodeSettings::default())?;
//! println!("{} triangles", tile.mesh.triangle_count());
//! # Ok(())
//! # }
//! ```
//!
//! Skirt depth is derived from the tile level, so neighbouring tiles at
//! different levels still overlap along their shared edge.

pub mod constants;
mod error;
pub mod settings;
pub mod tile;
pub mod tiling;

pub use error::{Error, Result};
pub use settings::DecodeSettings;
pub use tile::{TerrainTile, decode_tile};
pub use tiling::{TileKey, TilingScheme};

pub use quantized_mesh_decode::{
    DecodeError, DecodedVertex, Edge, EdgeIndices, Ellipsoid, Extension, Extent, SkirtHeights,
    TerrainMeshBuffers, VERTEX_STRIDE,
};
