//! Vertex and index buffer assembly.

use crate::ellipsoid::Projector;
use crate::error::{DecodeError, DecodeResult};
use crate::{
    Edge, MAX_VERTEX_COUNT, QUANTIZED_MAX, QuantizedMeshInput, TerrainMeshBuffers, add_skirt,
    decode_vertices, sort_edge_indices,
};

/// Decode a quantized tile into vertex and index buffers, projecting with
/// the input's ellipsoid.
///
/// See [`create_vertices_with_projector`].
pub fn create_vertices(input: QuantizedMeshInput) -> DecodeResult<TerrainMeshBuffers> {
    let ellipsoid = input.ellipsoid;
    create_vertices_with_projector(input, &ellipsoid)
}

/// Decode a quantized tile into vertex and index buffers.
///
/// Both buffers are sized up front for the interior mesh plus all four
/// skirts and never reallocate. The layout is:
///
/// - vertices: interior, then west, south, east and north skirt vertices
/// - indices: the interior triangles verbatim, then west, south, east and
///   north skirt triangles
///
/// The boundary lists are consumed, sorted along their edges, and returned
/// in [`TerrainMeshBuffers::edges`].
///
/// # Errors
///
/// Fails without partial output if the input breaks its contract: quantized
/// arrays of different lengths or with values above [`QUANTIZED_MAX`], a
/// height range with `minimum_height > maximum_height`, an interior index
/// list that is not whole triangles, any index that does not reference a
/// vertex, or more vertices (skirts included) than 16-bit indices can reach.
pub fn create_vertices_with_projector<P: Projector>(
    input: QuantizedMeshInput,
    projector: &P,
) -> DecodeResult<TerrainMeshBuffers> {
    validate(&input)?;

    let QuantizedMeshInput {
        quantized,
        indices: interior_indices,
        edges,
        minimum_height,
        maximum_height,
        extent,
        relative_to_center: center,
        skirt_heights,
        ellipsoid: _,
    } = input;

    let vertex_count_without_skirts = quantized.len();
    let vertex_capacity = vertex_count_without_skirts + edges.total_len();
    let index_capacity = interior_indices.len() + edges.skirt_index_count();

    let mut vertices = Vec::with_capacity(vertex_capacity);
    decode_vertices(
        &quantized,
        minimum_height,
        maximum_height,
        &extent,
        center,
        projector,
        &mut vertices,
    );

    let mut indices = Vec::with_capacity(index_capacity);
    indices.extend_from_slice(&interior_indices);

    let edges = sort_edge_indices(edges, &vertices)?;
    for edge in Edge::ALL {
        add_skirt(
            &mut vertices,
            &mut indices,
            edges.get(edge),
            edge.is_reversed(),
            skirt_heights.get(edge),
            &extent,
            center,
            projector,
        )?;
    }

    debug_assert_eq!(vertices.len(), vertex_capacity);
    debug_assert_eq!(indices.len(), index_capacity);

    Ok(TerrainMeshBuffers {
        vertices,
        indices,
        edges,
        vertex_count_without_skirts,
        index_count_without_skirts: interior_indices.len(),
    })
}

fn validate(input: &QuantizedMeshInput) -> DecodeResult<()> {
    let quantized = &input.quantized;
    let count = quantized.len();

    for (context, values) in [
        ("u", &quantized.u),
        ("v", &quantized.v),
        ("height", &quantized.height),
    ] {
        if values.len() != count {
            return Err(DecodeError::LengthMismatch {
                context,
                expected: count,
                actual: values.len(),
            });
        }
        if let Some((index, &value)) = values
            .iter()
            .enumerate()
            .find(|&(_, &value)| value > QUANTIZED_MAX)
        {
            return Err(DecodeError::QuantizedValueOutOfRange {
                context,
                index,
                value,
            });
        }
    }

    let (minimum, maximum) = (input.minimum_height, input.maximum_height);
    if minimum.is_nan() || maximum.is_nan() || minimum > maximum {
        return Err(DecodeError::InvalidFormat {
            context: "height range",
            detail: format!(
                "minimum height {minimum} must not exceed maximum height {maximum}"
            ),
        });
    }

    let total = count + input.edges.total_len();
    if total > MAX_VERTEX_COUNT {
        return Err(DecodeError::TooManyVertices { count: total });
    }

    if input.indices.len() % 3 != 0 {
        return Err(DecodeError::InvalidFormat {
            context: "indices",
            detail: format!(
                "{} indices do not form whole triangles",
                input.indices.len()
            ),
        });
    }
    if let Some(&index) = input
        .indices
        .iter()
        .find(|&&index| usize::from(index) >= count)
    {
        return Err(DecodeError::IndexOutOfBounds {
            context: "triangle",
            index: usize::from(index),
            len: count,
        });
    }

    Ok(())
}
