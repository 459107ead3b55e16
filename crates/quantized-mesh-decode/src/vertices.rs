//! Quantized vertex decoding.

use glam::DVec3;

use crate::ellipsoid::Projector;
use crate::{DecodedVertex, Extent, QUANTIZED_MAX, QuantizedVertices};

/// Linear interpolation between `start` and `end`.
#[must_use]
pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    (1.0 - t) * start + t * end
}

/// Map a quantized component in `[0, 32767]` to `[0, 1]`.
#[must_use]
pub fn dequantize(value: u16) -> f64 {
    f64::from(value) / f64::from(QUANTIZED_MAX)
}

/// Decode quantized vertices and append them to `output`.
///
/// For each vertex, `u` and `v` are de-quantized to the unit square and the
/// height is interpolated between `minimum_height` and `maximum_height`. The
/// geographic position inside `extent` is then projected and stored relative
/// to `center`.
///
/// The caller validates lengths and ranges; see [`crate::create_vertices`].
/// `output` should already have capacity for the result.
#[allow(clippy::cast_possible_truncation)]
pub fn decode_vertices<P: Projector>(
    quantized: &QuantizedVertices,
    minimum_height: f64,
    maximum_height: f64,
    extent: &Extent,
    center: DVec3,
    projector: &P,
    output: &mut Vec<DecodedVertex>,
) {
    let components = quantized
        .u
        .iter()
        .zip(&quantized.v)
        .zip(&quantized.height);

    for ((&u_raw, &v_raw), &height_raw) in components {
        let u = dequantize(u_raw);
        let v = dequantize(v_raw);
        let height = lerp(minimum_height, maximum_height, dequantize(height_raw));

        let cartesian = projector.cartographic_to_cartesian(extent.cartographic(u, v, height));

        // Parametric coordinates are kept in the buffer for the skirt pass.
        output.push(DecodedVertex::from_cartesian(
            cartesian,
            center,
            height,
            u as f32,
            v as f32,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::{Cartographic, Ellipsoid};

    /// Maps geography straight to cartesian, for exact expectations.
    struct Planar;

    impl Projector for Planar {
        fn cartographic_to_cartesian(&self, c: Cartographic) -> DVec3 {
            DVec3::new(c.longitude, c.latitude, c.height)
        }
    }

    fn decode(quantized: &QuantizedVertices, min: f64, max: f64) -> Vec<DecodedVertex> {
        let extent = Extent::new(10.0, 20.0, 30.0, 60.0);
        let mut output = Vec::with_capacity(quantized.len());
        decode_vertices(quantized, min, max, &extent, DVec3::ZERO, &Planar, &mut output);
        output
    }

    #[test]
    fn test_dequantize_bounds() {
        assert_eq!(dequantize(0), 0.0);
        assert_eq!(dequantize(QUANTIZED_MAX), 1.0);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
    }

    #[test]
    fn test_decode_vertices_empty() {
        let result = decode(&QuantizedVertices::default(), 0.0, 1.0);
        assert!(result.is_empty());
    }

    #[test]
    fn test_decode_vertices_corners_hit_extent_bounds() {
        let quantized = QuantizedVertices::new(
            vec![0, QUANTIZED_MAX],
            vec![0, QUANTIZED_MAX],
            vec![0, QUANTIZED_MAX],
        );
        let result = decode(&quantized, -5.0, 95.0);

        assert_eq!(result.len(), 2);
        assert_eq!((result[0].u, result[0].v), (0.0, 0.0));
        assert_eq!((result[0].x, result[0].y, result[0].z), (10.0, 20.0, -5.0));
        assert_eq!(result[0].height, -5.0);

        assert_eq!((result[1].u, result[1].v), (1.0, 1.0));
        assert_eq!((result[1].x, result[1].y, result[1].z), (30.0, 60.0, 95.0));
        assert_eq!(result[1].height, 95.0);
    }

    #[test]
    fn test_decode_vertices_half_height() {
        let quantized = QuantizedVertices::new(vec![0], vec![0], vec![16383]);
        let result = decode(&quantized, 0.0, 100.0);

        // 16383 / 32767 is just under one half.
        assert!((result[0].height - 50.0).abs() < 0.01);
    }

    #[test]
    fn test_decode_vertices_relative_to_center() {
        let ellipsoid = Ellipsoid::WGS84;
        let extent = Extent::new(0.1, 0.2, 0.101, 0.201);
        let quantized = QuantizedVertices::new(vec![16000], vec![9000], vec![100]);
        let center = ellipsoid.cartographic_to_cartesian(Cartographic::new(0.1005, 0.2005, 0.0));

        let mut output = Vec::with_capacity(1);
        decode_vertices(&quantized, 0.0, 1000.0, &extent, center, &ellipsoid, &mut output);

        let u = dequantize(16000);
        let v = dequantize(9000);
        let height = lerp(0.0, 1000.0, dequantize(100));
        let expected = ellipsoid.cartographic_to_cartesian(extent.cartographic(u, v, height)) - center;

        // Offsets are a few kilometers, so f32 keeps them within a centimeter.
        assert!((output[0].position().as_dvec3() - expected).length() < 1e-2);
    }
}
