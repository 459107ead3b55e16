//! Boundary index ordering.

use crate::error::{DecodeError, DecodeResult};
use crate::{DecodedVertex, Edge, EdgeIndices};

/// Sort the four boundary lists so neighbouring entries are adjacent along
/// their tile edge.
///
/// West and east lists are ordered by the decoded `v` of the referenced
/// vertex, south and north lists by decoded `u`. The sort is stable, so
/// vertices with equal keys keep their input order.
///
/// The lists are consumed and returned reordered; callers that keep edge
/// indices around must use the returned value.
///
/// # Errors
///
/// Returns [`DecodeError::IndexOutOfBounds`] if an entry does not reference
/// one of `vertices`.
pub fn sort_edge_indices(
    mut edges: EdgeIndices,
    vertices: &[DecodedVertex],
) -> DecodeResult<EdgeIndices> {
    for edge in Edge::ALL {
        let list = edges.get_mut(edge);
        check_bounds(edge, list, vertices.len())?;

        let key = |index: u16| {
            let vertex = &vertices[usize::from(index)];
            if edge.runs_along_v() {
                vertex.v
            } else {
                vertex.u
            }
        };
        list.sort_by(|&a, &b| key(a).total_cmp(&key(b)));
    }

    Ok(edges)
}

fn check_bounds(edge: Edge, list: &[u16], len: usize) -> DecodeResult<()> {
    match list.iter().find(|&&index| usize::from(index) >= len) {
        Some(&index) => Err(DecodeError::IndexOutOfBounds {
            context: edge.name(),
            index: usize::from(index),
            len,
        }),
        None => Ok(()),
    }
}
