//! Defaults for tile decoding.

/// Deepest supported tile level.
pub const MAX_LEVEL: u32 = 24;

/// Skirt height as a multiple of the level's maximum geometric error.
pub const DEFAULT_SKIRT_SCALE: f64 = 5.0;

/// Heightmap width used to estimate the level-zero geometric error.
pub const DEFAULT_HEIGHTMAP_WIDTH: u32 = 65;

/// Fraction of the level-zero sample spacing accepted as geometric error.
pub const HEIGHTMAP_TERRAIN_QUALITY: f64 = 0.25;
