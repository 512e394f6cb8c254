//! Error types for pixenlarge-core
//!
//! Provides a unified error type for the raster data model.  Each variant
//! carries enough context to report which dimension or buffer was wrong.

use thiserror::Error;

/// pixenlarge core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Maximum sample value outside 1..=65535
    #[error("invalid maxval: {0}")]
    InvalidMaxval(u32),

    /// Component count not valid for the format
    #[error("invalid depth: {0} components per pixel")]
    InvalidDepth(u32),

    /// A row or storage buffer has the wrong length
    #[error("row length mismatch: expected {expected}, got {actual}")]
    RowLength { expected: usize, actual: usize },

    /// A buffer of `len` elements could not be allocated
    #[error("cannot allocate a buffer of {len} elements")]
    AllocationFailed { len: usize },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
