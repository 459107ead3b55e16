//! Error types for decoding operations.
//!
//! Every variant is a broken input contract. Decoding is deterministic, so
//! retrying the same input fails the same way.

use std::fmt;

/// Errors that can occur while decoding a quantized terrain mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Input buffer is too small to hold the fixed-size tile header.
    BufferTooSmall { expected: usize, actual: usize },
    /// Payload ended in the middle of a section.
    UnexpectedEof { context: &'static str },
    /// Invalid data format or structure.
    InvalidFormat {
        context: &'static str,
        detail: String,
    },
    /// Two arrays that must describe the same vertices differ in length.
    LengthMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A quantized component exceeds [`crate::QUANTIZED_MAX`].
    QuantizedValueOutOfRange {
        context: &'static str,
        index: usize,
        value: u16,
    },
    /// An index list references a vertex that does not exist.
    IndexOutOfBounds {
        context: &'static str,
        index: usize,
        len: usize,
    },
    /// The mesh plus its skirts cannot be addressed with 16-bit indices.
    TooManyVertices { count: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall { expected, actual } => {
                write!(
                    f,
                    "buffer too small: expected at least {expected} bytes, got {actual}"
                )
            }
            Self::UnexpectedEof { context } => {
                write!(f, "unexpected end of buffer in {context}")
            }
            Self::InvalidFormat { context, detail } => {
                write!(f, "invalid format in {context}: {detail}")
            }
            Self::LengthMismatch {
                context,
                expected,
                actual,
            } => {
                write!(f, "{context} has {actual} entries, expected {expected}")
            }
            Self::QuantizedValueOutOfRange {
                context,
                index,
                value,
            } => {
                write!(
                    f,
                    "{context}[{index}] = {value} exceeds quantized maximum {}",
                    crate::QUANTIZED_MAX
                )
            }
            Self::IndexOutOfBounds {
                context,
                index,
                len,
            } => {
                write!(f, "{context} index {index} out of bounds for {len} vertices")
            }
            Self::TooManyVertices { count } => {
                write!(
                    f,
                    "{count} vertices including skirts exceed the 16-bit index range"
                )
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Result type for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;
