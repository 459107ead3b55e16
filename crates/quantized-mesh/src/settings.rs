//! Decode configuration.

use std::f64::consts::TAU;

use quantized_mesh_decode::{Ellipsoid, SkirtHeights};

use crate::constants::{DEFAULT_HEIGHTMAP_WIDTH, DEFAULT_SKIRT_SCALE, HEIGHTMAP_TERRAIN_QUALITY};
use crate::error::{Error, Result};
use crate::tiling::TilingScheme;

/// Settings shared by every tile decoded from one terrain source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodeSettings {
    /// Reference surface for projecting vertices.
    pub ellipsoid: Ellipsoid,
    /// Skirt height as a multiple of the level's maximum geometric error.
    pub skirt_scale: f64,
    /// Heightmap width used for the level-zero geometric error estimate.
    pub heightmap_width: u32,
    pub tiling_scheme: TilingScheme,
}

impl Default for DecodeSettings {
    fn default() -> Self {
        Self {
            ellipsoid: Ellipsoid::WGS84,
            skirt_scale: DEFAULT_SKIRT_SCALE,
            heightmap_width: DEFAULT_HEIGHTMAP_WIDTH,
            tiling_scheme: TilingScheme::default(),
        }
    }
}

impl DecodeSettings {
    #[must_use]
    pub fn with_ellipsoid(mut self, ellipsoid: Ellipsoid) -> Self {
        self.ellipsoid = ellipsoid;
        self
    }

    #[must_use]
    pub fn with_skirt_scale(mut self, skirt_scale: f64) -> Self {
        self.skirt_scale = skirt_scale;
        self
    }

    #[must_use]
    pub fn with_heightmap_width(mut self, heightmap_width: u32) -> Self {
        self.heightmap_width = heightmap_width;
        self
    }

    #[must_use]
    pub fn with_tiling_scheme(mut self, tiling_scheme: TilingScheme) -> Self {
        self.tiling_scheme = tiling_scheme;
        self
    }

    /// Check that the settings can produce finite, non-negative skirts.
    pub fn validate(&self) -> Result<()> {
        if !self.skirt_scale.is_finite() || self.skirt_scale < 0.0 {
            return Err(Error::InvalidSettings {
                setting: "skirt_scale",
                detail: format!("{} is not a finite non-negative number", self.skirt_scale),
            });
        }
        if self.heightmap_width == 0 {
            return Err(Error::InvalidSettings {
                setting: "heightmap_width",
                detail: "must be at least 1".to_string(),
            });
        }
        if self.tiling_scheme.root_tiles_x == 0 || self.tiling_scheme.root_tiles_y == 0 {
            return Err(Error::InvalidSettings {
                setting: "tiling_scheme",
                detail: "needs at least one root tile in each direction".to_string(),
            });
        }
        Ok(())
    }

    /// Largest geometric error expected from a tile at `level`.
    #[must_use]
    pub fn level_maximum_geometric_error(&self, level: u32) -> f64 {
        level_maximum_geometric_error(
            &self.ellipsoid,
            self.heightmap_width,
            self.tiling_scheme.root_tiles_x,
            level,
        )
    }

    /// Skirt heights applied to all four edges of a tile at `level`.
    #[must_use]
    pub fn skirt_heights(&self, level: u32) -> SkirtHeights {
        SkirtHeights::uniform(self.level_maximum_geometric_error(level) * self.skirt_scale)
    }
}

/// Estimate the maximum geometric error of tiles at `level`.
///
/// Level zero accepts a quarter of the sample spacing of a
/// `heightmap_width`-wide heightmap around the equator; each level halves it.
#[must_use]
pub fn level_maximum_geometric_error(
    ellipsoid: &Ellipsoid,
    heightmap_width: u32,
    root_tiles_x: u32,
    level: u32,
) -> f64 {
    let level_zero = ellipsoid.maximum_radius() * TAU * HEIGHTMAP_TERRAIN_QUALITY
        / (f64::from(heightmap_width) * f64::from(root_tiles_x));
    level_zero / 2f64.powi(i32::try_from(level).unwrap_or(i32::MAX))
}
