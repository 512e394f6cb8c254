//! Whole-image enlargement
//!
//! Drives one pass over an image: read the header, check the factor, write
//! the enlarged header, then for every input row read it, enlarge it
//! horizontally and write the result `factor` times.  Only one input row
//! and one output row are held at a time.
//!
//! The factor is checked before anything is written, so a rejected factor
//! leaves the output untouched.  Any later failure stops the pass and the
//! partial output should be discarded.

use crate::generic::GenericRowEnlarger;
use crate::packed::{PackedRowEnlarger, ReplicationPath};
use crate::validate::validate_dimensions;
use crate::{ScaleFactor, TransformError, TransformResult};
use log::{debug, trace};
use pixenlarge_core::{
    Encoding, PixelFormat, Raster, RasterData, RasterHeader, Sample, clear_padding, zeroed_vec,
};
use pixenlarge_io::{PnmReader, PnmWriter, RasterReader, RasterWriter};

/// Row enlargement path taken for an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnlargePath {
    /// Packed 1-bit rows, with the replication path for the factor
    Packed(ReplicationPath),
    /// Tuple rows through a column map
    Tuple,
}

/// Outcome of a completed enlargement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnlargeSummary {
    /// Header read from the input
    pub input: RasterHeader,
    /// Header written to the output
    pub output: RasterHeader,
    /// Path used for the rows
    pub path: EnlargePath,
    /// Number of rows written, `input.height * factor`
    pub rows_written: u64,
}

/// Enlarge the image from `reader` into `writer`.
///
/// Every input pixel becomes a `factor` x `factor` block of the same value.
/// Format, depth, maxval and tuple type are carried over unchanged.
///
/// # Errors
///
/// - [`TransformError::DimensionOverflow`] if the enlarged image would be
///   too large; nothing has been written to `writer` in that case
/// - [`TransformError::Io`] for header, row or stream failures
pub fn enlarge<R, W>(
    reader: &mut R,
    writer: &mut W,
    factor: ScaleFactor,
) -> TransformResult<EnlargeSummary>
where
    R: RasterReader + ?Sized,
    W: RasterWriter + ?Sized,
{
    let input = reader.read_header()?;
    validate_dimensions(input.width, input.height, factor)?;
    let output = input.enlarged(factor.get())?;

    let path = match input.pixel_format() {
        PixelFormat::PackedBit => {
            let enlarger = PackedRowEnlarger::new(input.width, factor)?;
            let path = EnlargePath::Packed(enlarger.path());
            log_start(&input, &output, factor, path);
            writer.write_header(&output)?;
            enlarge_packed_rows(reader, writer, &input, factor, enlarger)?;
            path
        }
        PixelFormat::Tuple => {
            let enlarger = GenericRowEnlarger::new(input.width, input.depth, factor)?;
            log_start(&input, &output, factor, EnlargePath::Tuple);
            writer.write_header(&output)?;
            enlarge_tuple_rows(reader, writer, &input, factor, enlarger)?;
            EnlargePath::Tuple
        }
    };
    writer.finish()?;

    debug!("enlarge done: {} rows written", output.height);
    Ok(EnlargeSummary {
        rows_written: u64::from(output.height),
        input,
        output,
        path,
    })
}

fn log_start(input: &RasterHeader, output: &RasterHeader, factor: ScaleFactor, path: EnlargePath) {
    debug!(
        "enlarge {:?} {}x{} by {} to {}x{} via {:?}",
        input.format, input.width, input.height, factor, output.width, output.height, path
    );
}

fn enlarge_packed_rows<R, W>(
    reader: &mut R,
    writer: &mut W,
    input: &RasterHeader,
    factor: ScaleFactor,
    mut enlarger: PackedRowEnlarger,
) -> TransformResult<()>
where
    R: RasterReader + ?Sized,
    W: RasterWriter + ?Sized,
{
    let mut row: Vec<u8> = row_buffer(input, input.packed_row_bytes())?;
    for y in 0..input.height {
        reader.read_packed_row(&mut row)?;
        clear_padding(&mut row, input.width);
        writer.write_packed_row(enlarger.enlarge(&row)?, factor.get())?;
        trace!("row {y} enlarged");
    }
    Ok(())
}

fn enlarge_tuple_rows<R, W>(
    reader: &mut R,
    writer: &mut W,
    input: &RasterHeader,
    factor: ScaleFactor,
    mut enlarger: GenericRowEnlarger,
) -> TransformResult<()>
where
    R: RasterReader + ?Sized,
    W: RasterWriter + ?Sized,
{
    let mut row: Vec<Sample> = row_buffer(input, input.samples_per_row())?;
    for y in 0..input.height {
        reader.read_sample_row(&mut row)?;
        writer.write_sample_row(enlarger.enlarge(&row)?, factor.get())?;
        trace!("row {y} enlarged");
    }
    Ok(())
}

fn row_buffer<T: Clone + Default>(input: &RasterHeader, len: usize) -> TransformResult<Vec<T>> {
    zeroed_vec(len).map_err(|e| {
        TransformError::InvalidParameters(format!(
            "input row of {}x{} does not fit in memory: {e}",
            input.width, input.depth
        ))
    })
}

/// Enlarge a Netpbm image held in memory.
///
/// # Arguments
///
/// * `data` - Complete Netpbm file contents
/// * `factor` - Magnification on both axes
/// * `encoding` - Raster encoding of the result
///
/// # Examples
///
/// ```
/// use pixenlarge_core::Encoding;
/// use pixenlarge_transform::{ScaleFactor, enlarge_mem};
///
/// let out = enlarge_mem(b"P2 1 1 9 5", ScaleFactor::new(2).unwrap(), Encoding::Plain).unwrap();
/// assert_eq!(out, b"P2\n2 2\n9\n5 5\n5 5\n");
/// ```
pub fn enlarge_mem(
    data: &[u8],
    factor: ScaleFactor,
    encoding: Encoding,
) -> TransformResult<Vec<u8>> {
    let mut reader = PnmReader::new(data);
    let mut writer = PnmWriter::with_encoding(Vec::new(), encoding);
    enlarge(&mut reader, &mut writer, factor)?;
    Ok(writer.into_inner())
}

/// Enlarge an in-memory raster.
///
/// # Errors
///
/// Returns [`TransformError::DimensionOverflow`] if the enlarged image would
/// be too large.
pub fn enlarge_raster(raster: &Raster, factor: ScaleFactor) -> TransformResult<Raster> {
    let input = raster.header();
    validate_dimensions(input.width, input.height, factor)?;
    let output = input.enlarged(factor.get())?;
    let repeat = factor.get() as usize;
    let missing_row = |y: u32| {
        TransformError::Core(pixenlarge_core::Error::IndexOutOfBounds {
            index: y as usize,
            len: input.height as usize,
        })
    };

    let data = match raster.data() {
        RasterData::Packed(_) => {
            let mut enlarger = PackedRowEnlarger::new(input.width, factor)?;
            let mut bytes = Vec::new();
            for y in 0..input.height {
                let row = raster.row_packed(y).ok_or_else(|| missing_row(y))?;
                let enlarged = enlarger.enlarge(row)?;
                for _ in 0..repeat {
                    bytes.extend_from_slice(enlarged);
                }
            }
            RasterData::Packed(bytes)
        }
        RasterData::Samples(_) => {
            let mut enlarger = GenericRowEnlarger::new(input.width, input.depth, factor)?;
            let mut samples = Vec::new();
            for y in 0..input.height {
                let row = raster.row_samples(y).ok_or_else(|| missing_row(y))?;
                let enlarged = enlarger.enlarge(row)?;
                for _ in 0..repeat {
                    samples.extend_from_slice(enlarged);
                }
            }
            RasterData::Samples(samples)
        }
    };
    Ok(Raster::from_data(output, data)?)
}
