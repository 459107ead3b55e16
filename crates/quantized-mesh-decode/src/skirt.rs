//! Skirt generation along tile edges.
//!
//! A skirt is a vertical curtain hanging from a tile edge. Each boundary
//! vertex gets a lowered copy, and consecutive pairs are joined to the
//! original edge by a quad made of two triangles.

use glam::DVec3;

use crate::ellipsoid::Projector;
use crate::error::{DecodeError, DecodeResult};
use crate::{DecodedVertex, Extent, MAX_VERTEX_COUNT};

/// Number of indices a skirt adds for an edge with `edge_len` vertices.
#[must_use]
pub fn skirt_index_count(edge_len: usize) -> usize {
    6 * edge_len.saturating_sub(1)
}

/// Append the skirt for one edge.
///
/// `edge_indices` must already be sorted along the edge (see
/// [`crate::sort_edge_indices`]). When `reversed` is set the list is walked
/// back to front; west and north edges use this so that all four skirts wind
/// the same way around the tile.
///
/// Skirt vertices are rebuilt from the stored `u`, `v` and height of their
/// source vertex, lowered by `skirt_height`, projected and stored relative
/// to `center`. For every consecutive pair two triangles are appended:
/// `(previous skirt, current skirt, current edge)` and
/// `(previous skirt, current edge, previous edge)`.
///
/// Appends exactly `edge_indices.len()` vertices and
/// [`skirt_index_count`]`(edge_indices.len())` indices.
///
/// # Errors
///
/// Returns [`DecodeError::IndexOutOfBounds`] if an edge index does not
/// reference an existing vertex, or [`DecodeError::TooManyVertices`] if the
/// skirt would push the vertex count past the 16-bit index range.
#[allow(clippy::too_many_arguments)]
pub fn add_skirt<P: Projector>(
    vertices: &mut Vec<DecodedVertex>,
    indices: &mut Vec<u16>,
    edge_indices: &[u16],
    reversed: bool,
    skirt_height: f64,
    extent: &Extent,
    center: DVec3,
    projector: &P,
) -> DecodeResult<()> {
    let existing = vertices.len();
    let count = existing + edge_indices.len();
    if count > MAX_VERTEX_COUNT {
        return Err(DecodeError::TooManyVertices { count });
    }
    if let Some(&index) = edge_indices
        .iter()
        .find(|&&index| usize::from(index) >= existing)
    {
        return Err(DecodeError::IndexOutOfBounds {
            context: "skirt edge",
            index: usize::from(index),
            len: existing,
        });
    }

    // (edge vertex, skirt vertex) of the previous step.
    let mut previous: Option<(u16, u16)> = None;

    let mut emit = |index: u16| {
        let source = vertices[usize::from(index)];
        let height = f64::from(source.height) - skirt_height;
        let cartographic = extent.cartographic(f64::from(source.u), f64::from(source.v), height);
        let cartesian = projector.cartographic_to_cartesian(cartographic);

        // Bounded by MAX_VERTEX_COUNT above.
        #[allow(clippy::cast_possible_truncation)]
        let skirt_index = vertices.len() as u16;
        vertices.push(DecodedVertex::from_cartesian(
            cartesian, center, height, source.u, source.v,
        ));

        if let Some((previous_index, previous_skirt)) = previous {
            indices.extend_from_slice(&[
                previous_skirt,
                skirt_index,
                index,
                previous_skirt,
                index,
                previous_index,
            ]);
        }
        previous = Some((index, skirt_index));
    };

    if reversed {
        edge_indices.iter().rev().for_each(|&index| emit(index));
    } else {
        edge_indices.iter().for_each(|&index| emit(index));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::Cartographic;

    /// x = longitude, y = latitude, z = height.
    struct Planar;

    impl Projector for Planar {
        fn cartographic_to_cartesian(&self, c: Cartographic) -> DVec3 {
            DVec3::new(c.longitude, c.latitude, c.height)
        }
    }

    const UNIT: Extent = Extent {
        west: 0.0,
        south: 0.0,
        east: 1.0,
        north: 1.0,
    };

    fn vertex(u: f32, v: f32, height: f32) -> DecodedVertex {
        DecodedVertex {
            x: u,
            y: v,
            z: height,
            height,
            u,
            v,
        }
    }

    /// 2x2 grid: 0 = SW, 1 = SE, 2 = NW, 3 = NE.
    fn grid() -> Vec<DecodedVertex> {
        vec![
            vertex(0.0, 0.0, 5.0),
            vertex(1.0, 0.0, 6.0),
            vertex(0.0, 1.0, 7.0),
            vertex(1.0, 1.0, 8.0),
        ]
    }

    fn skirt(edge: &[u16], reversed: bool, height: f64) -> (Vec<DecodedVertex>, Vec<u16>) {
        let mut vertices = grid();
        let mut indices = Vec::new();
        add_skirt(
            &mut vertices,
            &mut indices,
            edge,
            reversed,
            height,
            &UNIT,
            DVec3::ZERO,
            &Planar,
        )
        .unwrap();
        (vertices, indices)
    }

    fn triangle_normal(vertices: &[DecodedVertex], triangle: &[u16]) -> glam::Vec3 {
        let a = vertices[usize::from(triangle[0])].position();
        let b = vertices[usize::from(triangle[1])].position();
        let c = vertices[usize::from(triangle[2])].position();
        (b - a).cross(c - a)
    }

    #[test]
    fn test_skirt_index_count() {
        assert_eq!(skirt_index_count(0), 0);
        assert_eq!(skirt_index_count(1), 0);
        assert_eq!(skirt_index_count(2), 6);
        assert_eq!(skirt_index_count(5), 24);
    }

    #[test]
    fn test_add_skirt_west_edge_two_vertices() {
        // West edge sorted by v: SW (0) then NW (2); walked in reverse.
        let (vertices, indices) = skirt(&[0, 2], true, 10.0);

        assert_eq!(vertices.len(), 6);
        // First skirt vertex copies NW, second copies SW.
        assert_eq!((vertices[4].u, vertices[4].v), (0.0, 1.0));
        assert_eq!(vertices[4].height, -3.0);
        assert_eq!((vertices[5].u, vertices[5].v), (0.0, 0.0));
        assert_eq!(vertices[5].height, -5.0);

        assert_eq!(indices, vec![4, 5, 0, 4, 0, 2]);
    }

    #[test]
    fn test_add_skirt_forward_walk() {
        // South edge sorted by u: SW (0) then SE (1).
        let (vertices, indices) = skirt(&[0, 1], false, 1.0);

        assert_eq!((vertices[4].u, vertices[5].u), (0.0, 1.0));
        assert_eq!(indices, vec![4, 5, 1, 4, 1, 0]);
    }

    #[test]
    fn test_add_skirt_preserves_uv_and_lowers_height() {
        let (vertices, _) = skirt(&[1, 3], false, 2.5);

        for (skirt_vertex, source) in vertices[4..].iter().zip([1, 3]) {
            let source = vertices[source];
            assert_eq!((skirt_vertex.u, skirt_vertex.v), (source.u, source.v));
            assert_eq!(skirt_vertex.height, source.height - 2.5);
            assert_eq!(skirt_vertex.z, source.z - 2.5);
            assert_eq!((skirt_vertex.x, skirt_vertex.y), (source.x, source.y));
        }
    }

    #[test]
    fn test_add_skirt_single_vertex_has_no_triangles() {
        let (vertices, indices) = skirt(&[3], true, 1.0);
        assert_eq!(vertices.len(), 5);
        assert!(indices.is_empty());
    }

    #[test]
    fn test_add_skirt_empty_edge() {
        let (vertices, indices) = skirt(&[], false, 1.0);
        assert_eq!(vertices.len(), 4);
        assert!(indices.is_empty());
    }

    #[test]
    fn test_add_skirt_faces_outward_on_every_edge() {
        let cases: [(&[u16], bool, glam::Vec3); 4] = [
            (&[0, 2], true, glam::Vec3::NEG_X),
            (&[0, 1], false, glam::Vec3::NEG_Y),
            (&[1, 3], false, glam::Vec3::X),
            (&[2, 3], true, glam::Vec3::Y),
        ];

        for (edge, reversed, outward) in cases {
            let (vertices, indices) = skirt(edge, reversed, 1.0);
            for triangle in indices.chunks_exact(3) {
                let normal = triangle_normal(&vertices, triangle);
                assert!(
                    normal.dot(outward) > 0.0,
                    "triangle {triangle:?} faces {normal}, expected {outward}"
                );
            }
        }
    }

    #[test]
    fn test_add_skirt_index_out_of_bounds() {
        let mut vertices = grid();
        let mut indices = Vec::new();
        let result = add_skirt(
            &mut vertices,
            &mut indices,
            &[0, 4],
            false,
            1.0,
            &UNIT,
            DVec3::ZERO,
            &Planar,
        );

        assert!(matches!(
            result,
            Err(DecodeError::IndexOutOfBounds { index: 4, .. })
        ));
        assert_eq!(vertices.len(), 4);
    }
}
