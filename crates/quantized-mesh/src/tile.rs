//! Decoded terrain tiles.

use glam::DVec3;
use quantized_mesh_decode::{
    Extension, Extent, TerrainMeshBuffers, create_vertices, parse_quantized_mesh,
};

use crate::error::Result;
use crate::settings::DecodeSettings;
use crate::tiling::TileKey;

/// A terrain tile ready for rendering.
#[derive(Debug, Clone)]
pub struct TerrainTile {
    pub key: TileKey,
    /// Geographic extent of the tile, in radians.
    pub extent: Extent,
    /// Earth-fixed origin that vertex positions are relative to.
    pub center: DVec3,
    pub minimum_height: f64,
    pub maximum_height: f64,
    pub bounding_sphere_center: DVec3,
    pub bounding_sphere_radius: f64,
    pub horizon_occlusion_point: DVec3,
    /// Extension blocks carried by the tile, undecoded.
    pub extensions: Vec<Extension>,
    /// Vertex and index buffers, skirts included.
    pub mesh: TerrainMeshBuffers,
}

impl TerrainTile {
    #[must_use]
    pub fn has_extension(&self, id: u8) -> bool {
        self.extensions.iter().any(|extension| extension.id == id)
    }

    /// Raw data of the first extension block with `id`.
    #[must_use]
    pub fn extension(&self, id: u8) -> Option<&[u8]> {
        self.extensions
            .iter()
            .find(|extension| extension.id == id)
            .map(|extension| extension.data.as_slice())
    }
}

/// Decode a quantized-mesh tile at `key` into render buffers.
///
/// Skirt heights derive from the level of `key` (see
/// [`DecodeSettings::skirt_heights`]).
///
/// # Errors
///
/// Fails if the settings are invalid, `key` lies outside the tiling scheme,
/// or the payload is malformed.
pub fn decode_tile(bytes: &[u8], key: TileKey, settings: &DecodeSettings) -> Result<TerrainTile> {
    settings.validate()?;
    let extent = settings.tiling_scheme.tile_extent(key)?;
    let mut payload = parse_quantized_mesh(bytes)?;

    for extension in &payload.extensions {
        tracing::trace!(
            %key,
            id = extension.id,
            len = extension.data.len(),
            "tile extension"
        );
    }

    let header = payload.header;
    let extensions = std::mem::take(&mut payload.extensions);
    let skirt_heights = settings.skirt_heights(key.level);
    let input = payload.into_input(extent, skirt_heights, settings.ellipsoid);
    let mesh = create_vertices(input)?;

    tracing::debug!(
        %key,
        vertices = mesh.vertex_count_without_skirts,
        skirt_vertices = mesh.vertices.len() - mesh.vertex_count_without_skirts,
        triangles = mesh.triangle_count(),
        skirt_height = skirt_heights.west,
        "decoded tile"
    );

    Ok(TerrainTile {
        key,
        extent,
        center: header.center,
        minimum_height: f64::from(header.minimum_height),
        maximum_height: f64::from(header.maximum_height),
        bounding_sphere_center: header.bounding_sphere_center,
        bounding_sphere_radius: header.bounding_sphere_radius,
        horizon_occlusion_point: header.horizon_occlusion_point,
        extensions,
        mesh,
    })
}
