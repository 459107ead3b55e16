//! Geographic tiling scheme.
//!
//! Tiles form a quadtree over a geographic extent. Level zero has
//! `root_tiles_x` by `root_tiles_y` tiles; each level doubles both counts.
//! Tile rows are counted from the north.

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

use quantized_mesh_decode::Extent;

use crate::constants::MAX_LEVEL;
use crate::error::{Error, Result};

/// Address of a tile within a tiling scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKey {
    pub x: u32,
    /// Row, counted from the north edge of the scheme.
    pub y: u32,
    pub level: u32,
}

impl TileKey {
    #[must_use]
    pub fn new(x: u32, y: u32, level: u32) -> Self {
        Self { x, y, level }
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.level, self.x, self.y)
    }
}

/// Quadtree of geographic tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilingScheme {
    pub extent: Extent,
    pub root_tiles_x: u32,
    pub root_tiles_y: u32,
}

impl Default for TilingScheme {
    /// Whole globe, two level-zero tiles split at the prime meridian.
    fn default() -> Self {
        Self {
            extent: Extent::new(-PI, -FRAC_PI_2, PI, FRAC_PI_2),
            root_tiles_x: 2,
            root_tiles_y: 1,
        }
    }
}

impl TilingScheme {
    /// Number of tiles in x and y at `level`.
    pub fn tiles_at_level(&self, level: u32) -> Result<(u32, u32)> {
        let scale = (level <= MAX_LEVEL)
            .then(|| 1u32.checked_shl(level))
            .flatten()
            .ok_or_else(|| Error::InvalidTile {
                key: TileKey::new(0, 0, level),
                detail: format!("level exceeds maximum {MAX_LEVEL}"),
            })?;

        match (
            self.root_tiles_x.checked_mul(scale),
            self.root_tiles_y.checked_mul(scale),
        ) {
            (Some(x), Some(y)) => Ok((x, y)),
            _ => Err(Error::InvalidTile {
                key: TileKey::new(0, 0, level),
                detail: "tile count overflows".to_string(),
            }),
        }
    }

    /// Geographic extent covered by `key`.
    pub fn tile_extent(&self, key: TileKey) -> Result<Extent> {
        let (tiles_x, tiles_y) = self.tiles_at_level(key.level)?;
        if key.x >= tiles_x || key.y >= tiles_y {
            return Err(Error::InvalidTile {
                key,
                detail: format!("level {} has {tiles_x}x{tiles_y} tiles", key.level),
            });
        }

        let tile_width = self.extent.width() / f64::from(tiles_x);
        let tile_height = self.extent.height() / f64::from(tiles_y);

        let west = self.extent.west + f64::from(key.x) * tile_width;
        let north = self.extent.north - f64::from(key.y) * tile_height;

        Ok(Extent::new(west, north - tile_height, west + tile_width, north))
    }

    /// Convert a TMS address (rows counted from the south, as used in
    /// `{level}/{x}/{y}.terrain` paths) into a [`TileKey`].
    pub fn key_from_tms(&self, x: u32, tms_y: u32, level: u32) -> Result<TileKey> {
        let (_, tiles_y) = self.tiles_at_level(level)?;
        let y = tiles_y
            .checked_sub(1)
            .and_then(|last| last.checked_sub(tms_y))
            .ok_or_else(|| Error::InvalidTile {
                key: TileKey::new(x, tms_y, level),
                detail: format!("TMS row outside {tiles_y} rows"),
            })?;
        Ok(TileKey::new(x, y, level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_extent(actual: Extent, expected: Extent) {
        let close = |a: f64, b: f64| (a - b).abs() < 1e-12;
        assert!(
            close(actual.west, expected.west)
                && close(actual.south, expected.south)
                && close(actual.east, expected.east)
                && close(actual.north, expected.north),
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn test_tiles_at_level() {
        let scheme = TilingScheme::default();
        assert_eq!(scheme.tiles_at_level(0).unwrap(), (2, 1));
        assert_eq!(scheme.tiles_at_level(3).unwrap(), (16, 8));
    }

    #[test]
    fn test_tiles_at_level_too_deep() {
        let scheme = TilingScheme::default();
        assert!(matches!(
            scheme.tiles_at_level(MAX_LEVEL + 1),
            Err(Error::InvalidTile { .. })
        ));
    }

    #[test]
    fn test_tile_extent_level_zero() {
        let scheme = TilingScheme::default();
        assert_extent(
            scheme.tile_extent(TileKey::new(0, 0, 0)).unwrap(),
            Extent::new(-PI, -FRAC_PI_2, 0.0, FRAC_PI_2),
        );
        assert_extent(
            scheme.tile_extent(TileKey::new(1, 0, 0)).unwrap(),
            Extent::new(0.0, -FRAC_PI_2, PI, FRAC_PI_2),
        );
    }

    #[test]
    fn test_tile_extent_rows_count_from_north() {
        let scheme = TilingScheme::default();
        // Level 1: 4x2 tiles of PI/2 square.
        assert_extent(
            scheme.tile_extent(TileKey::new(2, 1, 1)).unwrap(),
            Extent::new(0.0, -FRAC_PI_2, FRAC_PI_2, 0.0),
        );
    }

    #[test]
    fn test_tile_extent_out_of_range() {
        let scheme = TilingScheme::default();
        let key = TileKey::new(2, 0, 0);
        assert!(matches!(
            scheme.tile_extent(key),
            Err(Error::InvalidTile { key: k, .. }) if k == key
        ));
    }

    #[test]
    fn test_key_from_tms_flips_rows() {
        let scheme = TilingScheme::default();
        assert_eq!(scheme.key_from_tms(3, 0, 1).unwrap(), TileKey::new(3, 1, 1));
        assert_eq!(scheme.key_from_tms(3, 1, 1).unwrap(), TileKey::new(3, 0, 1));
        assert!(scheme.key_from_tms(0, 2, 1).is_err());
    }

    #[test]
    fn test_tile_key_display() {
        assert_eq!(TileKey::new(5, 3, 7).to_string(), "7/5/3");
    }
}
