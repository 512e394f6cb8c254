//! pixenlarge-io - Netpbm row I/O
//!
//! Streams PBM, PGM, PPM and PAM images one row at a time:
//!
//! - [`RasterReader`] / [`RasterWriter`] - the row-level interface the
//!   enlargement engine consumes
//! - [`PnmReader`] / [`PnmWriter`] - their Netpbm implementations
//! - [`read_raster`] / [`write_raster`] - whole-image convenience functions
//!
//! # Example
//!
//! ```
//! use pixenlarge_io::{read_raster_mem, write_raster_mem};
//! use pixenlarge_core::Encoding;
//!
//! let raster = read_raster_mem(b"P2 2 1 255 10 20").unwrap();
//! assert_eq!(raster.row_samples(0).unwrap(), &[10, 20]);
//! let raw = write_raster_mem(&raster, Encoding::Raw).unwrap();
//! assert_eq!(raw, b"P5\n2 1\n255\n\x0a\x14");
//! ```

mod error;
pub mod format;
pub mod header;
pub mod pnm;
mod scan;

pub use error::{IoError, IoResult};
pub use format::{detect_format, detect_format_from_bytes};
pub use header::{read_header, read_header_mem};
pub use pnm::{PnmReader, PnmWriter};

use pixenlarge_core::{
    Encoding, PixelFormat, Raster, RasterData, RasterHeader, Sample, packed_bytes, zeroed_vec,
};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Source of image rows, read strictly top to bottom.
pub trait RasterReader {
    /// Read the image header.  Must be called once, before any row.
    fn read_header(&mut self) -> IoResult<RasterHeader>;

    /// Read the next row of a packed 1-bit image.
    ///
    /// `row` must be exactly `packed_row_bytes()` long.  Padding bits of
    /// the final byte are returned as found in the stream.
    fn read_packed_row(&mut self, row: &mut [u8]) -> IoResult<()>;

    /// Read the next row of a tuple image into `samples_per_row()` samples.
    fn read_sample_row(&mut self, row: &mut [Sample]) -> IoResult<()>;
}

/// Sink for image rows, written strictly top to bottom.
pub trait RasterWriter {
    /// Write the image header.  Must be called once, before any row.
    fn write_header(&mut self, header: &RasterHeader) -> IoResult<()>;

    /// Write a packed 1-bit row `repeat` times.
    ///
    /// Bits beyond the image width in the final byte are ignored.
    fn write_packed_row(&mut self, row: &[u8], repeat: u32) -> IoResult<()>;

    /// Write a tuple row `repeat` times.
    fn write_sample_row(&mut self, row: &[Sample], repeat: u32) -> IoResult<()>;

    /// Complete the image and flush the stream.
    ///
    /// Fails if fewer rows were written than the header declared.
    fn finish(&mut self) -> IoResult<()>;
}

/// Read a whole image from a buffered stream.
pub fn read_raster<R: BufRead>(reader: R) -> IoResult<Raster> {
    let mut pnm = PnmReader::new(reader);
    let header = pnm.read_header()?;
    let rows = header.height as usize;
    let too_large = || IoError::InvalidData("image too large to hold in memory".to_string());

    let data = match header.pixel_format() {
        PixelFormat::PackedBit => {
            let row_len = packed_bytes(header.width);
            let total = row_len.checked_mul(rows).ok_or_else(too_large)?;
            let mut bytes: Vec<u8> = zeroed_vec(total)?;
            for row in bytes.chunks_exact_mut(row_len) {
                pnm.read_packed_row(row)?;
            }
            RasterData::Packed(bytes)
        }
        PixelFormat::Tuple => {
            let row_len = header.samples_per_row();
            let total = row_len.checked_mul(rows).ok_or_else(too_large)?;
            let mut samples: Vec<Sample> = zeroed_vec(total)?;
            for row in samples.chunks_exact_mut(row_len) {
                pnm.read_sample_row(row)?;
            }
            RasterData::Samples(samples)
        }
    };
    Ok(Raster::from_data(header, data)?)
}

/// Read a whole image from memory.
pub fn read_raster_mem(data: &[u8]) -> IoResult<Raster> {
    read_raster(data)
}

/// Read a whole image from a file.
pub fn read_raster_file<P: AsRef<Path>>(path: P) -> IoResult<Raster> {
    let file = File::open(path)?;
    read_raster(BufReader::new(file))
}

/// Write a whole image to a stream.
pub fn write_raster<W: Write>(raster: &Raster, writer: W, encoding: Encoding) -> IoResult<()> {
    let mut pnm = PnmWriter::with_encoding(writer, encoding);
    pnm.write_header(raster.header())?;
    for y in 0..raster.height() {
        match raster.data() {
            RasterData::Packed(_) => {
                let row = raster.row_packed(y).ok_or_else(|| missing_row(y, raster.height()))?;
                pnm.write_packed_row(row, 1)?;
            }
            RasterData::Samples(_) => {
                let row = raster.row_samples(y).ok_or_else(|| missing_row(y, raster.height()))?;
                pnm.write_sample_row(row, 1)?;
            }
        }
    }
    pnm.finish()
}

/// Write a whole image to memory.
pub fn write_raster_mem(raster: &Raster, encoding: Encoding) -> IoResult<Vec<u8>> {
    let mut data = Vec::new();
    write_raster(raster, &mut data, encoding)?;
    Ok(data)
}

/// Write a whole image to a file.
pub fn write_raster_file<P: AsRef<Path>>(
    raster: &Raster,
    path: P,
    encoding: Encoding,
) -> IoResult<()> {
    let file = File::create(path)?;
    write_raster(raster, BufWriter::new(file), encoding)
}

fn missing_row(y: u32, height: u32) -> IoError {
    pixenlarge_core::Error::IndexOutOfBounds {
        index: y as usize,
        len: height as usize,
    }
    .into()
}
