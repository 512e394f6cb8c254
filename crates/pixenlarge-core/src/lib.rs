//! pixenlarge-core - Basic data structures for raster enlargement
//!
//! This crate provides the data model shared by the I/O and transform
//! crates:
//!
//! - [`RasterHeader`] - Format, geometry and sample range of an image
//! - [`Raster`] - An image held entirely in memory
//! - [`packed`] - Access helpers for 1-bit packed rows
//!
//! # Example
//!
//! ```
//! use pixenlarge_core::{PixelFormat, RasterHeader};
//!
//! let header = RasterHeader::pbm(20, 4).unwrap();
//! assert_eq!(header.pixel_format(), PixelFormat::PackedBit);
//! assert_eq!(header.packed_row_bytes(), 3);
//! ```

pub mod error;
pub mod header;
pub mod packed;
pub mod raster;

pub use error::{Error, Result};
pub use header::{
    Encoding, MAX_DIMENSION, MAX_MAXVAL, PixelFormat, PnmFormat, RasterHeader, Sample,
};
pub use packed::{clear_padding, get_bit, packed_bytes, padding_mask, set_bit};
pub use raster::{Raster, RasterData, zeroed_vec};
