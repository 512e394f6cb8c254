//! Enlargement of packed 1-bit rows
//!
//! A PBM row stores eight pixels per byte, most significant bit first.
//! For factors 2, 3 and 5 every input byte becomes exactly `f` output
//! bytes looked up from the tables in [`crate::tables`].  Other factors
//! build each output byte with [`general_output_byte`], once per output
//! byte.
//!
//! The table paths expand the last input byte in full, so a row whose
//! width is not a multiple of 8 produces up to `f - 1` (at most 4) bytes
//! past the end of the enlarged row.  The general path writes exactly the
//! enlarged row.  [`packed_buffer_len`] sizes the work buffer for both;
//! only the first [`packed_output_len`] bytes are part of the result.

use crate::tables::{
    DOUBLE, QUINT_FOURTH, QUINT_SECOND, TRIPLE_HIGH, TRIPLE_LOW, TRIPLE_MID,
    general_output_byte, has_table, pair_shifted,
};
use crate::{ScaleFactor, TransformError, TransformResult};
use log::debug;
use pixenlarge_core::{clear_padding, get_bit, packed_bytes, set_bit};

/// How a packed row is expanded for a given factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplicationPath {
    /// Factor 1: rows are passed through unchanged
    Identity,
    /// Factor 2: one nibble table lookup per output byte
    Double,
    /// Factor 3: three fragment tables
    Triple,
    /// Factor 5: pair shifts and two fragment tables
    Quintuple,
    /// Factor 4 or 6 and above: per-byte bit indexing
    General,
}

impl ReplicationPath {
    /// Select the path for `factor`.
    pub fn for_factor(factor: ScaleFactor) -> Self {
        match factor.get() {
            1 => Self::Identity,
            2 => Self::Double,
            3 => Self::Triple,
            5 => Self::Quintuple,
            _ => Self::General,
        }
    }
}

/// Width in pixels of a row of `in_width` pixels enlarged by `factor`.
fn enlarged_width(in_width: u32, factor: ScaleFactor) -> TransformResult<u32> {
    in_width.checked_mul(factor.get()).ok_or_else(|| {
        TransformError::InvalidParameters(format!(
            "row of {in_width} pixels cannot be enlarged by {factor}"
        ))
    })
}

/// Exact number of bytes in an enlarged packed row.
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] if the enlarged width does
/// not fit in a `u32`.
pub fn packed_output_len(in_width: u32, factor: ScaleFactor) -> TransformResult<usize> {
    Ok(packed_bytes(enlarged_width(in_width, factor)?))
}

/// Number of bytes [`enlarge_packed_row`] may write for one row.
///
/// This is [`packed_output_len`] plus, for the table factors 2, 3 and 5,
/// at most `factor - 1` bytes of overrun.
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] if the enlarged width does
/// not fit in a `u32`.
pub fn packed_buffer_len(in_width: u32, factor: ScaleFactor) -> TransformResult<usize> {
    let out_bytes = packed_output_len(in_width, factor)?;
    if !has_table(factor.get()) {
        return Ok(out_bytes);
    }
    // at most 5 bytes per input byte
    let expanded = packed_bytes(in_width) * factor.get() as usize;
    Ok(expanded.max(out_bytes))
}

/// Enlarge one packed row horizontally.
///
/// Reads the first `ceil(in_width / 8)` bytes of `input` and writes the
/// enlarged row to the start of `output`.  Padding bits after the last
/// enlarged pixel are cleared.  Bytes of `output` past the returned length
/// may be overwritten and hold no meaningful data.
///
/// # Arguments
///
/// * `input` - Packed input row
/// * `in_width` - Input width in pixels
/// * `factor` - Horizontal magnification
/// * `output` - At least [`packed_buffer_len`] bytes
///
/// # Returns
///
/// The number of bytes in the enlarged row, `ceil(in_width * factor / 8)`.
///
/// # Errors
///
/// Returns [`TransformError::BufferTooSmall`] if `input` or `output` is too
/// short.
pub fn enlarge_packed_row(
    input: &[u8],
    in_width: u32,
    factor: ScaleFactor,
    output: &mut [u8],
) -> TransformResult<usize> {
    let in_bytes = packed_bytes(in_width);
    if input.len() < in_bytes {
        return Err(TransformError::BufferTooSmall {
            needed: in_bytes,
            len: input.len(),
        });
    }
    let needed = packed_buffer_len(in_width, factor)?;
    if output.len() < needed {
        return Err(TransformError::BufferTooSmall {
            needed,
            len: output.len(),
        });
    }

    let input = &input[..in_bytes];
    let f = factor.get() as usize;
    let out_width = enlarged_width(in_width, factor)?;
    let out_bytes = packed_bytes(out_width);
    let path = ReplicationPath::for_factor(factor);
    let expanded = match path {
        ReplicationPath::General => &mut output[..out_bytes],
        _ => &mut output[..in_bytes * f],
    };

    match path {
        ReplicationPath::Identity => expanded.copy_from_slice(input),
        ReplicationPath::Double => {
            for (&src, out) in input.iter().zip(expanded.chunks_exact_mut(2)) {
                out[0] = DOUBLE[(src >> 4) as usize];
                out[1] = DOUBLE[(src & 0x0F) as usize];
            }
        }
        ReplicationPath::Triple => {
            for (&src, out) in input.iter().zip(expanded.chunks_exact_mut(3)) {
                out[0] = TRIPLE_HIGH[(src >> 5) as usize];
                out[1] = TRIPLE_MID[((src >> 2) & 0x0F) as usize];
                out[2] = TRIPLE_LOW[(src & 0x07) as usize];
            }
        }
        ReplicationPath::Quintuple => {
            for (&src, out) in input.iter().zip(expanded.chunks_exact_mut(5)) {
                out[0] = pair_shifted(src >> 6, 5);
                out[1] = QUINT_SECOND[((src >> 4) & 0x07) as usize];
                out[2] = pair_shifted(src >> 3, 4);
                out[3] = QUINT_FOURTH[((src >> 1) & 0x07) as usize];
                out[4] = pair_shifted(src, 3);
            }
        }
        ReplicationPath::General => {
            // output byte c draws only on input byte c / f
            for (c, byte) in expanded.iter_mut().enumerate() {
                let position = (c % f) as u32;
                *byte = general_output_byte(input[c / f], position, factor.get());
            }
        }
    }

    clear_padding(&mut output[..out_bytes], out_width);
    Ok(out_bytes)
}

/// Enlarge one packed row a pixel at a time.
///
/// Produces the same row as [`enlarge_packed_row`] with no tables; used as
/// the reference in tests and benchmarks.
///
/// # Errors
///
/// Returns [`TransformError::BufferTooSmall`] if `input` is too short.
pub fn enlarge_packed_row_bitwise(
    input: &[u8],
    in_width: u32,
    factor: ScaleFactor,
) -> TransformResult<Vec<u8>> {
    let in_bytes = packed_bytes(in_width);
    if input.len() < in_bytes {
        return Err(TransformError::BufferTooSmall {
            needed: in_bytes,
            len: input.len(),
        });
    }
    let out_width = enlarged_width(in_width, factor)?;
    let mut output = vec![0u8; packed_bytes(out_width)];
    for x in 0..out_width {
        set_bit(&mut output, x, get_bit(input, x / factor.get()));
    }
    Ok(output)
}

/// Reusable enlarger for the rows of one packed image
///
/// Owns the work buffer, so a whole image is enlarged with a single
/// allocation.
///
/// # Examples
///
/// ```
/// use pixenlarge_transform::{PackedRowEnlarger, ScaleFactor};
///
/// let mut enlarger = PackedRowEnlarger::new(4, ScaleFactor::new(2).unwrap()).unwrap();
/// assert_eq!(enlarger.enlarge(&[0b1011_0000]).unwrap(), &[0b1100_1111]);
/// ```
#[derive(Debug, Clone)]
pub struct PackedRowEnlarger {
    in_width: u32,
    factor: ScaleFactor,
    path: ReplicationPath,
    in_bytes: usize,
    out_bytes: usize,
    buffer: Vec<u8>,
}

impl PackedRowEnlarger {
    /// Create an enlarger for rows of `in_width` pixels.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidParameters`] if the enlarged width
    /// does not fit in a `u32`.
    pub fn new(in_width: u32, factor: ScaleFactor) -> TransformResult<Self> {
        let path = ReplicationPath::for_factor(factor);
        let out_bytes = packed_output_len(in_width, factor)?;
        let buffer = match path {
            ReplicationPath::Identity => Vec::new(),
            _ => vec![0u8; packed_buffer_len(in_width, factor)?],
        };
        debug!(
            "packed enlarger: width {in_width} factor {factor} path {path:?}, {out_bytes} bytes per row"
        );
        Ok(Self {
            in_width,
            factor,
            path,
            in_bytes: packed_bytes(in_width),
            out_bytes,
            buffer,
        })
    }

    /// Get the replication path in use.
    pub fn path(&self) -> ReplicationPath {
        self.path
    }

    /// Get the number of bytes in each enlarged row.
    pub fn output_len(&self) -> usize {
        self.out_bytes
    }

    /// Enlarge one row.
    ///
    /// The returned slice is exactly [`output_len`](Self::output_len) bytes.
    /// With factor 1 it is the input row itself.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::BufferTooSmall`] if `row` is shorter than
    /// one packed input row.
    pub fn enlarge<'a>(&'a mut self, row: &'a [u8]) -> TransformResult<&'a [u8]> {
        if row.len() < self.in_bytes {
            return Err(TransformError::BufferTooSmall {
                needed: self.in_bytes,
                len: row.len(),
            });
        }
        if self.path == ReplicationPath::Identity {
            return Ok(&row[..self.in_bytes]);
        }
        let len = enlarge_packed_row(row, self.in_width, self.factor, &mut self.buffer)?;
        Ok(&self.buffer[..len])
    }
}
