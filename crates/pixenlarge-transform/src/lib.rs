//! pixenlarge-transform - Integer nearest-neighbor enlargement
//!
//! Enlarges an image by an integer factor, turning every pixel into a
//! `factor` x `factor` block of the same value:
//!
//! - [`validate`] - Scale factor and output size checks
//! - [`tables`] - Bit replication tables for packed rows
//! - [`packed`] - Row enlargement for 1-bit images
//! - [`generic`] - Row enlargement for every other image
//! - [`enlarge`](mod@enlarge) - Whole-image streaming enlargement
//!
//! # Example
//!
//! ```
//! use pixenlarge_core::Encoding;
//! use pixenlarge_transform::{ScaleFactor, enlarge_mem};
//!
//! let out = enlarge_mem(b"P1 2 1 1 0", ScaleFactor::new(3).unwrap(), Encoding::Raw).unwrap();
//! assert_eq!(out, b"P4\n6 3\n\xe0\xe0\xe0");
//! ```

pub mod enlarge;
mod error;
pub mod generic;
pub mod packed;
pub mod tables;
pub mod validate;

pub use enlarge::{EnlargePath, EnlargeSummary, enlarge, enlarge_mem, enlarge_raster};
pub use error::{TransformError, TransformResult};
pub use generic::{ColumnMap, GenericRowEnlarger};
pub use packed::{
    PackedRowEnlarger, ReplicationPath, enlarge_packed_row, enlarge_packed_row_bitwise,
    packed_buffer_len, packed_output_len,
};
pub use validate::{ScaleFactor, max_scale_factor, validate_dimensions};
