//! Error types for STL decoding.

use thiserror::Error;

/// Result type for STL decoding.
pub type StlResult<T> = Result<T, FormatError>;

/// Malformed or truncated STL input.
///
/// This is the only error the pipeline surfaces. Degenerate geometry
/// (no triangles, zero area, flat bounding box) is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Binary buffer ends before the 4-byte triangle count.
    #[error("binary STL has no triangle count: {available} bytes available, 84 required")]
    MissingTriangleCount {
        /// Buffer length.
        available: usize,
    },

    /// Binary buffer is shorter than its declared triangle count implies.
    #[error(
        "binary STL declares {declared} triangles ({required} bytes) but only {available} bytes are available"
    )]
    Truncated {
        /// Triangle count from the header.
        declared: u32,
        /// Bytes needed for header, count and all records.
        required: u64,
        /// Buffer length.
        available: usize,
    },

    /// ASCII `vertex` line with fewer than three numeric coordinates.
    #[error("vertex on line {line} has {found} numeric coordinates, expected 3")]
    IncompleteVertex {
        /// 1-based line number.
        line: usize,
        /// Numeric tokens found before the first non-numeric one.
        found: usize,
    },
}
