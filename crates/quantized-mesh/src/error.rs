//! Error types for the quantized-mesh crate.

use std::fmt;

use crate::tiling::TileKey;

/// Result type for quantized-mesh operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding a terrain tile.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The tile payload could not be decoded.
    Decode(quantized_mesh_decode::DecodeError),
    /// The tile key does not exist in the tiling scheme.
    InvalidTile {
        /// The offending key.
        key: TileKey,
        /// Why the key was rejected.
        detail: String,
    },
    /// Decode settings are unusable.
    InvalidSettings {
        /// The setting that was rejected.
        setting: &'static str,
        /// Why it was rejected.
        detail: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Decode(e) => write!(f, "decode error: {e}"),
            Error::InvalidTile { key, detail } => {
                write!(f, "invalid tile {key}: {detail}")
            }
            Error::InvalidSettings { setting, detail } => {
                write!(f, "invalid setting {setting}: {detail}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<quantized_mesh_decode::DecodeError> for Error {
    fn from(e: quantized_mesh_decode::DecodeError) -> Self {
        Error::Decode(e)
    }
}
