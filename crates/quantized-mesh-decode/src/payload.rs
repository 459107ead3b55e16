//! Quantized-mesh tile payload parsing.
//!
//! # Format
//!
//! All values are little-endian.
//!
//! - Header (88 bytes): center (3 × f64), minimum and maximum height
//!   (2 × f32), bounding sphere center (3 × f64) and radius (f64), horizon
//!   occlusion point (3 × f64)
//! - Vertex data: `vertex_count: u32`, then the `u`, `v` and `height` arrays
//!   of `vertex_count` u16 each, zig-zag delta encoded
//! - Index data: `triangle_count: u32`, then `3 * triangle_count` u16
//!   indices, high-water-mark encoded
//! - Edge indices: west, south, east and north, each `count: u32` followed by
//!   `count` plain u16 indices
//! - Extensions: `{ id: u8, length: u32, data[length] }` until the end
//!
//! Tiles with more than 65536 vertices switch to 32-bit indices and are
//! rejected, since decoded buffers use 16-bit indices.

use glam::DVec3;

use crate::ellipsoid::Ellipsoid;
use crate::error::{DecodeError, DecodeResult};
use crate::{
    Edge, EdgeIndices, Extent, MAX_VERTEX_COUNT, QuantizedMeshInput, QuantizedVertices,
    SkirtHeights, decode_high_water_mark, decode_zigzag_deltas,
};

/// Size of the fixed tile header in bytes.
pub const HEADER_SIZE: usize = 88;

/// Fixed-size tile header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizedMeshHeader {
    /// Tile center in earth-fixed cartesian coordinates.
    pub center: DVec3,
    pub minimum_height: f32,
    pub maximum_height: f32,
    pub bounding_sphere_center: DVec3,
    pub bounding_sphere_radius: f64,
    /// Horizon occlusion point in ellipsoid-scaled space.
    pub horizon_occlusion_point: DVec3,
}

/// An extension block, kept undecoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub id: u8,
    pub data: Vec<u8>,
}

impl Extension {
    /// Oct-encoded per-vertex normals.
    pub const OCT_VERTEX_NORMALS: u8 = 1;
    /// Water mask.
    pub const WATER_MASK: u8 = 2;
    /// JSON metadata.
    pub const METADATA: u8 = 4;
}

/// A parsed tile, before vertex decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedMeshPayload {
    pub header: QuantizedMeshHeader,
    pub quantized: QuantizedVertices,
    /// Interior triangle list.
    pub indices: Vec<u16>,
    /// Boundary lists as stored in the tile (not necessarily sorted).
    pub edges: EdgeIndices,
    pub extensions: Vec<Extension>,
}

impl QuantizedMeshPayload {
    /// Build the decode input for this tile.
    ///
    /// The header center becomes the relative-to-center origin and the header
    /// heights bound the quantized heights.
    #[must_use]
    pub fn into_input(
        self,
        extent: Extent,
        skirt_heights: SkirtHeights,
        ellipsoid: Ellipsoid,
    ) -> QuantizedMeshInput {
        QuantizedMeshInput {
            quantized: self.quantized,
            indices: self.indices,
            edges: self.edges,
            minimum_height: f64::from(self.header.minimum_height),
            maximum_height: f64::from(self.header.maximum_height),
            extent,
            relative_to_center: self.header.center,
            skirt_heights,
            ellipsoid,
        }
    }
}

/// Parse a quantized-mesh-1.0 tile.
///
/// # Errors
///
/// Returns [`DecodeError::BufferTooSmall`] if the buffer cannot hold the
/// header, [`DecodeError::UnexpectedEof`] if a later section is truncated,
/// and [`DecodeError::TooManyVertices`] for tiles that need 32-bit indices.
pub fn parse_quantized_mesh(data: &[u8]) -> DecodeResult<QuantizedMeshPayload> {
    if data.len() < HEADER_SIZE {
        return Err(DecodeError::BufferTooSmall {
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }

    let mut reader = Reader::new(data);
    let header = read_header(&mut reader)?;

    let vertex_count = reader.read_count("vertex count")?;
    if vertex_count > MAX_VERTEX_COUNT {
        return Err(DecodeError::TooManyVertices {
            count: vertex_count,
        });
    }
    let u = decode_zigzag_deltas(&reader.read_u16_array(vertex_count, "u")?);
    let v = decode_zigzag_deltas(&reader.read_u16_array(vertex_count, "v")?);
    let height = decode_zigzag_deltas(&reader.read_u16_array(vertex_count, "height")?);

    let triangle_count = reader.read_count("triangle count")?;
    let index_count = triangle_count
        .checked_mul(3)
        .ok_or(DecodeError::UnexpectedEof { context: "indices" })?;
    let indices = decode_high_water_mark(&reader.read_u16_array(index_count, "indices")?);

    let mut edges = EdgeIndices::default();
    for edge in Edge::ALL {
        let count = reader.read_count(edge.name())?;
        *edges.get_mut(edge) = reader.read_u16_array(count, edge.name())?;
    }

    let mut extensions = Vec::new();
    while !reader.is_empty() {
        let id = reader.read_u8("extension header")?;
        let length = reader.read_count("extension header")?;
        let data = reader.take(length, "extension data")?.to_vec();
        extensions.push(Extension { id, data });
    }

    Ok(QuantizedMeshPayload {
        header,
        quantized: QuantizedVertices::new(u, v, height),
        indices,
        edges,
        extensions,
    })
}

fn read_header(reader: &mut Reader<'_>) -> DecodeResult<QuantizedMeshHeader> {
    let center = reader.read_dvec3("header")?;
    let minimum_height = reader.read_f32("header")?;
    let maximum_height = reader.read_f32("header")?;
    let bounding_sphere_center = reader.read_dvec3("header")?;
    let bounding_sphere_radius = reader.read_f64("header")?;
    let horizon_occlusion_point = reader.read_dvec3("header")?;

    Ok(QuantizedMeshHeader {
        center,
        minimum_height,
        maximum_height,
        bounding_sphere_center,
        bounding_sphere_radius,
        horizon_occlusion_point,
    })
}

/// Little-endian cursor over the tile bytes.
struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn is_empty(&self) -> bool {
        self.offset >= self.data.len()
    }

    fn take(&mut self, len: usize, context: &'static str) -> DecodeResult<&'a [u8]> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(DecodeError::UnexpectedEof { context })?;
        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self, context: &'static str) -> DecodeResult<[u8; N]> {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(self.take(N, context)?);
        Ok(bytes)
    }

    fn read_u8(&mut self, context: &'static str) -> DecodeResult<u8> {
        Ok(self.read_array::<1>(context)?[0])
    }

    fn read_u32(&mut self, context: &'static str) -> DecodeResult<u32> {
        Ok(u32::from_le_bytes(self.read_array(context)?))
    }

    fn read_count(&mut self, context: &'static str) -> DecodeResult<usize> {
        let count = self.read_u32(context)?;
        usize::try_from(count).map_err(|_| DecodeError::InvalidFormat {
            context,
            detail: format!("count {count} does not fit in memory"),
        })
    }

    fn read_f32(&mut self, context: &'static str) -> DecodeResult<f32> {
        Ok(f32::from_le_bytes(self.read_array(context)?))
    }

    fn read_f64(&mut self, context: &'static str) -> DecodeResult<f64> {
        Ok(f64::from_le_bytes(self.read_array(context)?))
    }

    fn read_dvec3(&mut self, context: &'static str) -> DecodeResult<DVec3> {
        Ok(DVec3::new(
            self.read_f64(context)?,
            self.read_f64(context)?,
            self.read_f64(context)?,
        ))
    }

    fn read_u16_array(&mut self, count: usize, context: &'static str) -> DecodeResult<Vec<u16>> {
        let len = count
            .checked_mul(2)
            .ok_or(DecodeError::UnexpectedEof { context })?;
        let bytes = self.take(len, context)?;
        Ok(bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect())
    }
}
