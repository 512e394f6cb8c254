//! I/O error types
//!
//! Provides a unified error type for reading and writing Netpbm streams.
//! Callers of the row reader and writer only need to handle `IoError`.

use thiserror::Error;

/// Error type for raster I/O operations.
///
/// Wraps stream errors, malformed-header errors and short rasters, plus
/// data-model errors from the core crate.
#[derive(Error, Debug)]
pub enum IoError {
    /// Standard I/O error (file not found, broken pipe, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream does not start with a known magic number
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The header or raster is structurally invalid
    #[error("invalid image data: {0}")]
    InvalidData(String),

    /// The stream ended before row `row` was complete
    #[error("truncated input: end of stream inside row {row} of {height}")]
    TruncatedInput { row: u32, height: u32 },

    /// An error from the core library (e.g. row length mismatch)
    #[error("core error: {0}")]
    Core(#[from] pixenlarge_core::Error),
}

/// Convenience alias for I/O results.
pub type IoResult<T> = Result<T, IoError>;
