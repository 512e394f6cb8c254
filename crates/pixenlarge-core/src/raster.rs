//! Raster - an in-memory image
//!
//! The enlargement engine itself works one row at a time and never holds a
//! whole image.  `Raster` exists for the whole-image convenience APIs and
//! for tests that need to inspect every output row.
//!
//! # Storage
//!
//! PBM images keep packed rows (`packed_row_bytes()` bytes each), every
//! other format keeps `samples_per_row()` samples per row.  Both are stored
//! row-major in one contiguous buffer.

use crate::error::{Error, Result};
use crate::header::{PixelFormat, RasterHeader, Sample};
use crate::packed::{clear_padding, get_bit};

/// Row-major pixel storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterData {
    /// Packed 1-bit rows
    Packed(Vec<u8>),
    /// Component samples
    Samples(Vec<Sample>),
}

/// An image held entirely in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    header: RasterHeader,
    data: RasterData,
}

impl Raster {
    /// Create a raster with all pixels zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailed`] if the image does not fit in
    /// memory.
    pub fn new(header: RasterHeader) -> Result<Self> {
        header.validate()?;
        let rows = header.height as usize;
        let data = match header.pixel_format() {
            PixelFormat::PackedBit => {
                RasterData::Packed(zeroed_vec(header.packed_row_bytes().saturating_mul(rows))?)
            }
            PixelFormat::Tuple => {
                RasterData::Samples(zeroed_vec(header.samples_per_row().saturating_mul(rows))?)
            }
        };
        Ok(Self { header, data })
    }

    /// Create a raster from existing storage.
    ///
    /// Padding bits of packed rows are cleared.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowLength`] if the storage kind or length does not
    /// match the header.
    pub fn from_data(header: RasterHeader, mut data: RasterData) -> Result<Self> {
        header.validate()?;
        let rows = header.height as usize;
        match (&mut data, header.pixel_format()) {
            (RasterData::Packed(bytes), PixelFormat::PackedBit) => {
                let row_bytes = header.packed_row_bytes();
                check_len(row_bytes.saturating_mul(rows), bytes.len())?;
                for row in bytes.chunks_exact_mut(row_bytes) {
                    clear_padding(row, header.width);
                }
            }
            (RasterData::Samples(samples), PixelFormat::Tuple) => {
                check_len(header.samples_per_row().saturating_mul(rows), samples.len())?;
            }
            (RasterData::Packed(bytes), PixelFormat::Tuple) => {
                return Err(Error::RowLength {
                    expected: header.samples_per_row().saturating_mul(rows),
                    actual: bytes.len(),
                });
            }
            (RasterData::Samples(samples), PixelFormat::PackedBit) => {
                return Err(Error::RowLength {
                    expected: header.packed_row_bytes().saturating_mul(rows),
                    actual: samples.len(),
                });
            }
        }
        Ok(Self { header, data })
    }

    /// Get the header.
    #[inline]
    pub fn header(&self) -> &RasterHeader {
        &self.header
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.header.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.header.height
    }

    /// Get the underlying storage.
    #[inline]
    pub fn data(&self) -> &RasterData {
        &self.data
    }

    /// Get packed row `y`, or `None` if out of range or not a PBM raster.
    pub fn row_packed(&self, y: u32) -> Option<&[u8]> {
        let RasterData::Packed(bytes) = &self.data else {
            return None;
        };
        let len = self.header.packed_row_bytes();
        let start = (y as usize).checked_mul(len)?;
        bytes.get(start..start + len)
    }

    /// Get mutable packed row `y`.
    pub fn row_packed_mut(&mut self, y: u32) -> Option<&mut [u8]> {
        let len = self.header.packed_row_bytes();
        let RasterData::Packed(bytes) = &mut self.data else {
            return None;
        };
        let start = (y as usize).checked_mul(len)?;
        bytes.get_mut(start..start + len)
    }

    /// Get sample row `y`, or `None` if out of range or a PBM raster.
    pub fn row_samples(&self, y: u32) -> Option<&[Sample]> {
        let RasterData::Samples(samples) = &self.data else {
            return None;
        };
        let len = self.header.samples_per_row();
        let start = (y as usize).checked_mul(len)?;
        samples.get(start..start + len)
    }

    /// Get mutable sample row `y`.
    pub fn row_samples_mut(&mut self, y: u32) -> Option<&mut [Sample]> {
        let len = self.header.samples_per_row();
        let RasterData::Samples(samples) = &mut self.data else {
            return None;
        };
        let start = (y as usize).checked_mul(len)?;
        samples.get_mut(start..start + len)
    }

    /// Get the components of the pixel at (x, y).
    ///
    /// PBM pixels are returned as a single component, 1 for black.
    /// Returns `None` if the coordinates are out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Vec<Sample>> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        match &self.data {
            RasterData::Packed(_) => {
                let row = self.row_packed(y)?;
                Some(vec![Sample::from(get_bit(row, x))])
            }
            RasterData::Samples(_) => {
                let depth = self.header.depth as usize;
                let row = self.row_samples(y)?;
                let start = x as usize * depth;
                row.get(start..start + depth).map(<[Sample]>::to_vec)
            }
        }
    }
}

/// Allocate `len` zeroed elements.
///
/// Returns [`Error::AllocationFailed`] instead of aborting when the buffer
/// cannot be allocated.
pub fn zeroed_vec<T: Clone + Default>(len: usize) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::AllocationFailed { len })?;
    buf.resize(len, T::default());
    Ok(buf)
}

fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::RowLength { expected, actual });
    }
    Ok(())
}
