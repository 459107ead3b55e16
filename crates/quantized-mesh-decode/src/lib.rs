//! Decode quantized terrain tiles into renderable vertex and index buffers.
//!
//! This crate provides pure synchronous decoding functions for turning a
//! quantized-mesh terrain tile into an interleaved vertex buffer and a 16-bit
//! index buffer. Skirt geometry is added along the four tile edges so that
//! neighbouring tiles decoded at different precision do not show cracks.
//!
//! # Design principles
//!
//! - **Synchronous**: No async, no threading primitives
//! - **Stateless**: Every call allocates and returns its own buffers, so
//!   tiles can be decoded in parallel without coordination
//! - **Relative to center**: Positions are subtracted from the tile center in
//!   `f64` and only then narrowed to `f32`
//!
//! # Key functions
//!
//! - [`parse_quantized_mesh`]: Unpack a quantized-mesh-1.0 binary tile
//! - [`decode_vertices`]: De-quantize vertices and project them to cartesian
//! - [`sort_edge_indices`]: Order boundary vertices along their tile edge
//! - [`add_skirt`]: Append skirt vertices and triangles for one edge
//! - [`create_vertices`]: Run the whole pipeline into pre-sized buffers

mod error;

pub mod edges;
pub mod ellipsoid;
pub mod indices;
pub mod mesh;
pub mod payload;
pub mod skirt;
pub mod vertices;
pub mod zigzag;

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::{DVec3, Vec3};

pub use edges::sort_edge_indices;
pub use ellipsoid::{Cartographic, Ellipsoid, Projector};
pub use error::{DecodeError, DecodeResult};
pub use indices::decode_high_water_mark;
pub use mesh::{create_vertices, create_vertices_with_projector};
pub use payload::{Extension, QuantizedMeshHeader, QuantizedMeshPayload, parse_quantized_mesh};
pub use skirt::add_skirt;
pub use vertices::{decode_vertices, dequantize};
pub use zigzag::{decode_zigzag_deltas, zigzag_decode};

/// Largest quantized component value; maps to parametric 1.0.
pub const QUANTIZED_MAX: u16 = 32767;

/// Number of `f32` values per decoded vertex.
pub const VERTEX_STRIDE: usize = 6;

/// Largest vertex count (skirts included) addressable with `u16` indices.
pub const MAX_VERTEX_COUNT: usize = u16::MAX as usize + 1;

/// Decoded vertex record (24 bytes, six `f32`).
///
/// - `x`, `y`, `z`: cartesian position minus the tile center
/// - `height`: height above the ellipsoid in world units
/// - `u`, `v`: parametric position within the tile extent, in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct DecodedVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub height: f32,
    pub u: f32,
    pub v: f32,
}

const _: () = assert!(std::mem::size_of::<DecodedVertex>() == VERTEX_STRIDE * 4);

impl DecodedVertex {
    /// Build a vertex from a full-precision cartesian position.
    ///
    /// The center is subtracted before narrowing to `f32`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_cartesian(cartesian: DVec3, center: DVec3, height: f64, u: f32, v: f32) -> Self {
        let offset = cartesian - center;
        Self {
            x: offset.x as f32,
            y: offset.y as f32,
            z: offset.z as f32,
            height: height as f32,
            u,
            v,
        }
    }

    /// Position offset from the tile center.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Geographic bounding rectangle of a tile, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Extent {
    #[must_use]
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Geographic position at parametric `(u, v)` with the given height.
    #[must_use]
    pub fn cartographic(&self, u: f64, v: f64, height: f64) -> Cartographic {
        Cartographic {
            longitude: vertices::lerp(self.west, self.east, u),
            latitude: vertices::lerp(self.south, self.north, v),
            height,
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.north - self.south
    }
}

/// Quantized vertex components, one entry per vertex in each array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuantizedVertices {
    pub u: Vec<u16>,
    pub v: Vec<u16>,
    pub height: Vec<u16>,
}

impl QuantizedVertices {
    #[must_use]
    pub fn new(u: Vec<u16>, v: Vec<u16>, height: Vec<u16>) -> Self {
        Self { u, v, height }
    }

    /// Number of vertices, taken from the `u` array.
    #[must_use]
    pub fn len(&self) -> usize {
        self.u.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.u.is_empty()
    }
}

/// One of the four tile edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    West,
    South,
    East,
    North,
}

impl Edge {
    /// Skirt processing order. The index buffer layout depends on it.
    pub const ALL: [Edge; 4] = [Edge::West, Edge::South, Edge::East, Edge::North];

    /// West and east edges run along `v`; south and north along `u`.
    #[must_use]
    pub fn runs_along_v(self) -> bool {
        matches!(self, Edge::West | Edge::East)
    }

    /// West and north edges are walked in reverse so the skirt traces one
    /// rotational direction around the tile.
    #[must_use]
    pub fn is_reversed(self) -> bool {
        matches!(self, Edge::West | Edge::North)
    }

    /// Position of this edge in [`Edge::ALL`].
    #[must_use]
    pub fn ordinal(self) -> usize {
        match self {
            Edge::West => 0,
            Edge::South => 1,
            Edge::East => 2,
            Edge::North => 3,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Edge::West => "west",
            Edge::South => "south",
            Edge::East => "east",
            Edge::North => "north",
        }
    }
}

/// Boundary vertex indices for each tile edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeIndices {
    pub west: Vec<u16>,
    pub south: Vec<u16>,
    pub east: Vec<u16>,
    pub north: Vec<u16>,
}

impl EdgeIndices {
    #[must_use]
    pub fn new(west: Vec<u16>, south: Vec<u16>, east: Vec<u16>, north: Vec<u16>) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    #[must_use]
    pub fn get(&self, edge: Edge) -> &[u16] {
        match edge {
            Edge::West => &self.west,
            Edge::South => &self.south,
            Edge::East => &self.east,
            Edge::North => &self.north,
        }
    }

    pub fn get_mut(&mut self, edge: Edge) -> &mut Vec<u16> {
        match edge {
            Edge::West => &mut self.west,
            Edge::South => &mut self.south,
            Edge::East => &mut self.east,
            Edge::North => &mut self.north,
        }
    }

    /// Total boundary vertices over all four edges (one skirt vertex each).
    #[must_use]
    pub fn total_len(&self) -> usize {
        Edge::ALL.iter().map(|&edge| self.get(edge).len()).sum()
    }

    /// Total skirt indices: six per consecutive pair on each edge.
    #[must_use]
    pub fn skirt_index_count(&self) -> usize {
        Edge::ALL
            .iter()
            .map(|&edge| skirt::skirt_index_count(self.get(edge).len()))
            .sum()
    }
}

/// Skirt depth per edge, in world units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SkirtHeights {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl SkirtHeights {
    /// Same skirt height on every edge.
    #[must_use]
    pub fn uniform(height: f64) -> Self {
        Self {
            west: height,
            south: height,
            east: height,
            north: height,
        }
    }

    #[must_use]
    pub fn get(&self, edge: Edge) -> f64 {
        match edge {
            Edge::West => self.west,
            Edge::South => self.south,
            Edge::East => self.east,
            Edge::North => self.north,
        }
    }
}

/// Everything needed to decode one tile.
#[derive(Debug, Clone)]
pub struct QuantizedMeshInput {
    pub quantized: QuantizedVertices,
    /// Interior triangle list.
    pub indices: Vec<u16>,
    /// Boundary lists; consumed and returned sorted in [`TerrainMeshBuffers::edges`].
    pub edges: EdgeIndices,
    pub minimum_height: f64,
    pub maximum_height: f64,
    pub extent: Extent,
    pub relative_to_center: DVec3,
    pub skirt_heights: SkirtHeights,
    pub ellipsoid: Ellipsoid,
}

/// Decoded tile buffers, owned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainMeshBuffers {
    /// Interior vertices followed by west, south, east and north skirt vertices.
    pub vertices: Vec<DecodedVertex>,
    /// Interior triangles followed by west, south, east and north skirt triangles.
    pub indices: Vec<u16>,
    /// Boundary lists in their sorted order.
    pub edges: EdgeIndices,
    pub vertex_count_without_skirts: usize,
    pub index_count_without_skirts: usize,
}

impl TerrainMeshBuffers {
    /// Move the vertex and index buffers out without copying.
    #[must_use]
    pub fn into_parts(self) -> (Vec<DecodedVertex>, Vec<u16>) {
        (self.vertices, self.indices)
    }

    /// Vertex buffer as a flat `f32` slice with stride [`VERTEX_STRIDE`].
    #[must_use]
    pub fn vertex_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Vertex buffer as raw bytes, ready for GPU upload.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer as raw bytes, ready for GPU upload.
    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Range of vertex slots holding the skirt of `edge`.
    #[must_use]
    pub fn skirt_vertex_range(&self, edge: Edge) -> Range<usize> {
        let start = self.vertex_count_without_skirts
            + Edge::ALL[..edge.ordinal()]
                .iter()
                .map(|&preceding| self.edges.get(preceding).len())
                .sum::<usize>();
        start..start + self.edges.get(edge).len()
    }

    /// Range of index buffer entries holding the skirt triangles of `edge`.
    #[must_use]
    pub fn skirt_index_range(&self, edge: Edge) -> Range<usize> {
        let start = self.index_count_without_skirts
            + Edge::ALL[..edge.ordinal()]
                .iter()
                .map(|&preceding| skirt::skirt_index_count(self.edges.get(preceding).len()))
                .sum::<usize>();
        start..start + skirt::skirt_index_count(self.edges.get(edge).len())
    }
}
