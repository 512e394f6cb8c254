//! Error types for pixenlarge-transform

use thiserror::Error;

/// Errors that can occur while enlarging an image
#[derive(Debug, Error)]
pub enum TransformError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] pixenlarge_core::Error),

    /// Raster I/O error
    #[error(transparent)]
    Io(#[from] pixenlarge_io::IoError),

    /// Scale factor below 1
    #[error("scale factor must be an integer at least 1, got {0}")]
    InvalidScaleFactor(u32),

    /// Enlarged dimensions would not be representable
    #[error(
        "scale factor {factor} too large: the maximum for this {width} x {height} image is {max_factor}"
    )]
    DimensionOverflow {
        factor: u32,
        width: u32,
        height: u32,
        max_factor: u32,
    },

    /// An output buffer is shorter than the row requires
    #[error("output buffer too small: need {needed} bytes, have {len}")]
    BufferTooSmall { needed: usize, len: usize },

    /// Invalid enlargement parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;
