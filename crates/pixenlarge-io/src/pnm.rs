//! PNM (Portable Any Map) row streaming
//!
//! Reads and writes PBM, PGM, PPM (plain and raw) and PAM one row at a
//! time.  Neither side ever holds more than one row of the image.
//!
//! # Raster encodings
//!
//! | Format | Raw row | Plain row |
//! |---|---|---|
//! | PBM | `ceil(width/8)` packed bytes, MSB first, 1 = black | `0`/`1` characters |
//! | PGM / PPM / PAM | 1 byte per sample (maxval < 256), else 2 bytes big-endian | decimal numbers |
//!
//! PAM has no plain encoding; a writer configured for plain output still
//! writes PAM raw.

use crate::scan::{next_bit, next_number};
use crate::{IoError, IoResult, RasterReader, RasterWriter};
use log::{debug, trace};
use pixenlarge_core::{
    Encoding, PixelFormat, PnmFormat, RasterHeader, Sample, get_bit, padding_mask, set_bit,
    zeroed_vec,
};
use std::io::{BufRead, ErrorKind, Write};

/// Characters per line in plain output
const PLAIN_LINE_LEN: usize = 70;

/// Per-image reader state, created once the header has been read.
struct ReadState {
    header: RasterHeader,
    encoding: Encoding,
    /// Index of the next row to read
    row: u32,
    /// Raw sample bytes of one row
    raw: Vec<u8>,
}

/// Row-at-a-time Netpbm reader
///
/// # Examples
///
/// ```
/// use pixenlarge_io::{PnmReader, RasterReader};
///
/// let mut reader = PnmReader::new(&b"P1\n3 1\n1 0 1\n"[..]);
/// let header = reader.read_header().unwrap();
/// let mut row = vec![0u8; header.packed_row_bytes()];
/// reader.read_packed_row(&mut row).unwrap();
/// assert_eq!(row, [0b1010_0000]);
/// ```
pub struct PnmReader<R> {
    reader: R,
    state: Option<ReadState>,
}

impl<R: BufRead> PnmReader<R> {
    /// Wrap a buffered stream positioned at the magic number.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            state: None,
        }
    }

    /// Get the header, once it has been read.
    pub fn header(&self) -> Option<&RasterHeader> {
        self.state.as_ref().map(|s| &s.header)
    }

    /// Get the raster encoding, once the header has been read.
    pub fn encoding(&self) -> Option<Encoding> {
        self.state.as_ref().map(|s| s.encoding)
    }

    /// Unwrap the underlying stream.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Check that the next row may be read with the given storage and length.
fn next_read_row(
    state: &mut Option<ReadState>,
    storage: PixelFormat,
    len: usize,
) -> IoResult<&mut ReadState> {
    let state = state
        .as_mut()
        .ok_or_else(|| IoError::InvalidData("row read before header".to_string()))?;
    if state.header.pixel_format() != storage {
        return Err(IoError::InvalidData(format!(
            "{:?} image cannot be read as {:?} rows",
            state.header.format, storage
        )));
    }
    let expected = match storage {
        PixelFormat::PackedBit => state.header.packed_row_bytes(),
        PixelFormat::Tuple => state.header.samples_per_row(),
    };
    if len != expected {
        return Err(pixenlarge_core::Error::RowLength {
            expected,
            actual: len,
        }
        .into());
    }
    if state.row >= state.header.height {
        return Err(IoError::InvalidData(format!(
            "all {} rows have already been read",
            state.header.height
        )));
    }
    Ok(state)
}

fn truncated(state: &ReadState) -> IoError {
    IoError::TruncatedInput {
        row: state.row,
        height: state.header.height,
    }
}

fn map_eof(e: std::io::Error, state: &ReadState) -> IoError {
    match e.kind() {
        ErrorKind::UnexpectedEof => truncated(state),
        _ => IoError::Io(e),
    }
}

fn check_sample(value: u32, state: &ReadState) -> IoResult<Sample> {
    if value > state.header.maxval {
        return Err(IoError::InvalidData(format!(
            "sample value {} exceeds maxval {} in row {}",
            value, state.header.maxval, state.row
        )));
    }
    Ok(value as Sample)
}

impl<R: BufRead> RasterReader for PnmReader<R> {
    fn read_header(&mut self) -> IoResult<RasterHeader> {
        if self.state.is_some() {
            return Err(IoError::InvalidData("header already read".to_string()));
        }
        let (header, encoding) = crate::header::read_header(&mut self.reader)?;
        let raw = match (header.pixel_format(), encoding) {
            (PixelFormat::Tuple, Encoding::Raw) => {
                let len = header
                    .samples_per_row()
                    .saturating_mul(header.bytes_per_sample());
                zeroed_vec(len).map_err(|e| {
                    IoError::InvalidData(format!(
                        "row of {}x{} samples is too large: {e}",
                        header.width, header.depth
                    ))
                })?
            }
            _ => Vec::new(),
        };
        self.state = Some(ReadState {
            header: header.clone(),
            encoding,
            row: 0,
            raw,
        });
        Ok(header)
    }

    fn read_packed_row(&mut self, row: &mut [u8]) -> IoResult<()> {
        let state = next_read_row(&mut self.state, PixelFormat::PackedBit, row.len())?;
        match state.encoding {
            Encoding::Raw => {
                self.reader
                    .read_exact(row)
                    .map_err(|e| map_eof(e, state))?;
            }
            Encoding::Plain => {
                row.fill(0);
                for x in 0..state.header.width {
                    match next_bit(&mut self.reader)? {
                        Some(bit) => set_bit(row, x, bit),
                        None => return Err(truncated(state)),
                    }
                }
            }
        }
        trace!("read packed row {}", state.row);
        state.row += 1;
        Ok(())
    }

    fn read_sample_row(&mut self, row: &mut [Sample]) -> IoResult<()> {
        let state = next_read_row(&mut self.state, PixelFormat::Tuple, row.len())?;
        match state.encoding {
            Encoding::Raw => {
                let mut raw = std::mem::take(&mut state.raw);
                let decoded = match self.reader.read_exact(&mut raw) {
                    Ok(()) => decode_raw_samples(&raw, state.header.bytes_per_sample(), row, state),
                    Err(e) => Err(map_eof(e, state)),
                };
                state.raw = raw;
                decoded?;
            }
            Encoding::Plain => {
                for sample in row.iter_mut() {
                    match next_number(&mut self.reader)? {
                        Some(value) => *sample = check_sample(value, state)?,
                        None => return Err(truncated(state)),
                    }
                }
            }
        }
        trace!("read sample row {}", state.row);
        state.row += 1;
        Ok(())
    }
}

fn decode_raw_samples(
    raw: &[u8],
    bytes_per_sample: usize,
    row: &mut [Sample],
    state: &ReadState,
) -> IoResult<()> {
    if bytes_per_sample == 1 {
        for (sample, &byte) in row.iter_mut().zip(raw) {
            *sample = check_sample(u32::from(byte), state)?;
        }
    } else {
        for (sample, pair) in row.iter_mut().zip(raw.chunks_exact(2)) {
            let value = u16::from_be_bytes([pair[0], pair[1]]);
            *sample = check_sample(u32::from(value), state)?;
        }
    }
    Ok(())
}

/// Per-image writer state, created by `write_header`.
struct WriteState {
    header: RasterHeader,
    encoding: Encoding,
    rows_written: u64,
    /// One encoded row, reused for every row of the image
    line: Vec<u8>,
}

/// Row-at-a-time Netpbm writer
///
/// Writes raw rasters unless constructed with [`Encoding::Plain`].  Each
/// row call takes a repeat count so a row is encoded once however many
/// times it appears in the output.
pub struct PnmWriter<W: Write> {
    writer: W,
    encoding: Encoding,
    state: Option<WriteState>,
}

impl<W: Write> PnmWriter<W> {
    /// Create a writer producing raw rasters.
    pub fn new(writer: W) -> Self {
        Self::with_encoding(writer, Encoding::Raw)
    }

    /// Create a writer with the given raster encoding.
    pub fn with_encoding(writer: W, encoding: Encoding) -> Self {
        Self {
            writer,
            encoding,
            state: None,
        }
    }

    /// Get the header written so far, if any.
    pub fn header(&self) -> Option<&RasterHeader> {
        self.state.as_ref().map(|s| &s.header)
    }

    /// Unwrap the underlying stream.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn next_write_rows(
    state: &mut Option<WriteState>,
    storage: PixelFormat,
    len: usize,
    repeat: u32,
) -> IoResult<&mut WriteState> {
    let state = state
        .as_mut()
        .ok_or_else(|| IoError::InvalidData("row written before header".to_string()))?;
    if state.header.pixel_format() != storage {
        return Err(IoError::InvalidData(format!(
            "{:?} image cannot be written from {:?} rows",
            state.header.format, storage
        )));
    }
    let expected = match storage {
        PixelFormat::PackedBit => state.header.packed_row_bytes(),
        PixelFormat::Tuple => state.header.samples_per_row(),
    };
    if len != expected {
        return Err(pixenlarge_core::Error::RowLength {
            expected,
            actual: len,
        }
        .into());
    }
    if state.rows_written + u64::from(repeat) > u64::from(state.header.height) {
        return Err(IoError::InvalidData(format!(
            "writing {} more rows would exceed image height {}",
            repeat, state.header.height
        )));
    }
    Ok(state)
}

fn emit<W: Write>(writer: &mut W, state: &mut WriteState, repeat: u32) -> IoResult<()> {
    for _ in 0..repeat {
        writer.write_all(&state.line)?;
    }
    state.rows_written += u64::from(repeat);
    Ok(())
}

impl<W: Write> RasterWriter for PnmWriter<W> {
    fn write_header(&mut self, header: &RasterHeader) -> IoResult<()> {
        if self.state.is_some() {
            return Err(IoError::InvalidData("header already written".to_string()));
        }
        header.validate()?;
        let encoding = match header.format {
            PnmFormat::Pam => Encoding::Raw,
            _ => self.encoding,
        };

        let capacity = match (header.pixel_format(), encoding) {
            (PixelFormat::PackedBit, Encoding::Raw) => header.packed_row_bytes(),
            (PixelFormat::PackedBit, Encoding::Plain) => {
                let width = header.width as usize;
                width + width / PLAIN_LINE_LEN + 1
            }
            (PixelFormat::Tuple, Encoding::Raw) => header
                .samples_per_row()
                .saturating_mul(header.bytes_per_sample()),
            (PixelFormat::Tuple, Encoding::Plain) => {
                header.samples_per_row().saturating_mul(6).saturating_add(1)
            }
        };
        let mut line = Vec::new();
        line.try_reserve_exact(capacity).map_err(|_| {
            IoError::InvalidData(format!(
                "row of {}x{} samples is too large to write",
                header.width, header.depth
            ))
        })?;

        let w = &mut self.writer;
        match header.format {
            PnmFormat::Pam => {
                write!(
                    w,
                    "P7\nWIDTH {}\nHEIGHT {}\nDEPTH {}\nMAXVAL {}\n",
                    header.width, header.height, header.depth, header.maxval
                )?;
                if let Some(tuple_type) = &header.tuple_type {
                    writeln!(w, "TUPLTYPE {tuple_type}")?;
                }
                w.write_all(b"ENDHDR\n")?;
            }
            format => {
                w.write_all(format.magic(encoding))?;
                write!(w, "\n{} {}\n", header.width, header.height)?;
                if format != PnmFormat::Pbm {
                    writeln!(w, "{}", header.maxval)?;
                }
            }
        }
        debug!(
            "wrote {:?} header ({:?}): {}x{} depth={} maxval={}",
            header.format, encoding, header.width, header.height, header.depth, header.maxval
        );

        self.state = Some(WriteState {
            header: header.clone(),
            encoding,
            rows_written: 0,
            line,
        });
        Ok(())
    }

    fn write_packed_row(&mut self, row: &[u8], repeat: u32) -> IoResult<()> {
        let state = next_write_rows(&mut self.state, PixelFormat::PackedBit, row.len(), repeat)?;
        let width = state.header.width;
        state.line.clear();
        match state.encoding {
            Encoding::Raw => {
                state.line.extend_from_slice(row);
                if let Some(last) = state.line.last_mut() {
                    *last &= padding_mask(width);
                }
            }
            Encoding::Plain => {
                for x in 0..width {
                    if x > 0 && x as usize % PLAIN_LINE_LEN == 0 {
                        state.line.push(b'\n');
                    }
                    state.line.push(b'0' + get_bit(row, x));
                }
                state.line.push(b'\n');
            }
        }
        trace!("write packed row x{}", repeat);
        emit(&mut self.writer, state, repeat)
    }

    fn write_sample_row(&mut self, row: &[Sample], repeat: u32) -> IoResult<()> {
        let state = next_write_rows(&mut self.state, PixelFormat::Tuple, row.len(), repeat)?;
        let maxval = state.header.maxval;
        if let Some(&bad) = row.iter().find(|&&s| u32::from(s) > maxval) {
            return Err(IoError::InvalidData(format!(
                "sample value {bad} exceeds maxval {maxval}"
            )));
        }
        state.line.clear();
        match (state.encoding, state.header.bytes_per_sample()) {
            (Encoding::Raw, 1) => state.line.extend(row.iter().map(|&s| s as u8)),
            (Encoding::Raw, _) => {
                for &s in row {
                    state.line.extend_from_slice(&s.to_be_bytes());
                }
            }
            (Encoding::Plain, _) => {
                let mut line_start = 0;
                for (i, &s) in row.iter().enumerate() {
                    if i > 0 {
                        state.line.push(b' ');
                    }
                    let token_start = state.line.len();
                    write!(state.line, "{s}")?;
                    if i > 0 && state.line.len() - line_start > PLAIN_LINE_LEN {
                        state.line[token_start - 1] = b'\n';
                        line_start = token_start;
                    }
                }
                state.line.push(b'\n');
            }
        }
        trace!("write sample row x{}", repeat);
        emit(&mut self.writer, state, repeat)
    }

    fn finish(&mut self) -> IoResult<()> {
        let state = self
            .state
            .as_ref()
            .ok_or_else(|| IoError::InvalidData("finish called before header".to_string()))?;
        if state.rows_written != u64::from(state.header.height) {
            return Err(IoError::InvalidData(format!(
                "wrote {} of {} rows",
                state.rows_written, state.header.height
            )));
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(encoding: Encoding, header: &RasterHeader, rows: &[(&[Sample], u32)]) -> String {
        let mut writer = PnmWriter::with_encoding(Vec::new(), encoding);
        writer.write_header(header).unwrap();
        for (row, repeat) in rows {
            writer.write_sample_row(row, *repeat).unwrap();
        }
        writer.finish().unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_read_raw_pbm_rows() {
        let data = b"P4\n10 2\n\xff\xff\x80\x40";
        let mut reader = PnmReader::new(&data[..]);
        let header = reader.read_header().unwrap();
        let mut row = vec![0u8; header.packed_row_bytes()];
        reader.read_packed_row(&mut row).unwrap();
        assert_eq!(row, [0xff, 0xff]);
        reader.read_packed_row(&mut row).unwrap();
        assert_eq!(row, [0x80, 0x40]);
        assert!(matches!(
            reader.read_packed_row(&mut row),
            Err(IoError::InvalidData(_))
        ));
    }

    #[test]
    fn test_truncated_raw_row() {
        let data = b"P5\n3 2\n255\n\x01\x02\x03\x04";
        let mut reader = PnmReader::new(&data[..]);
        reader.read_header().unwrap();
        let mut row = [0 as Sample; 3];
        reader.read_sample_row(&mut row).unwrap();
        assert_eq!(row, [1, 2, 3]);
        assert!(matches!(
            reader.read_sample_row(&mut row),
            Err(IoError::TruncatedInput { row: 1, height: 2 })
        ));
    }

    #[test]
    fn test_truncated_plain_row() {
        let mut reader = PnmReader::new(&b"P1 4 1 1 0"[..]);
        reader.read_header().unwrap();
        let mut row = [0u8; 1];
        assert!(matches!(
            reader.read_packed_row(&mut row),
            Err(IoError::TruncatedInput { row: 0, .. })
        ));
    }

    #[test]
    fn test_read_16bit_samples() {
        let data = b"P5 2 1 1000\n\x03\xe8\x00\x07";
        let mut reader = PnmReader::new(&data[..]);
        reader.read_header().unwrap();
        let mut row = [0 as Sample; 2];
        reader.read_sample_row(&mut row).unwrap();
        assert_eq!(row, [1000, 7]);
    }

    #[test]
    fn test_sample_above_maxval() {
        let mut reader = PnmReader::new(&b"P2 2 1 15 3 16"[..]);
        reader.read_header().unwrap();
        let mut row = [0 as Sample; 2];
        assert!(matches!(
            reader.read_sample_row(&mut row),
            Err(IoError::InvalidData(_))
        ));
    }

    #[test]
    fn test_wrong_row_kind() {
        let mut reader = PnmReader::new(&b"P1 4 1 1 0 1 1"[..]);
        let mut samples = [0 as Sample; 4];
        assert!(reader.read_sample_row(&mut samples).is_err());
        reader.read_header().unwrap();
        assert!(reader.read_sample_row(&mut samples).is_err());
        let mut short = [0u8; 0];
        assert!(reader.read_packed_row(&mut short).is_err());
    }

    #[test]
    fn test_write_raw_pbm_masks_padding() {
        let header = RasterHeader::pbm(4, 2).unwrap();
        let mut writer = PnmWriter::new(Vec::new());
        writer.write_header(&header).unwrap();
        writer.write_packed_row(&[0xff], 2).unwrap();
        writer.finish().unwrap();
        assert_eq!(writer.into_inner(), b"P4\n4 2\n\xf0\xf0");
    }

    #[test]
    fn test_write_plain_pbm() {
        let header = RasterHeader::pbm(3, 1).unwrap();
        let mut writer = PnmWriter::with_encoding(Vec::new(), Encoding::Plain);
        writer.write_header(&header).unwrap();
        writer.write_packed_row(&[0b1010_0000], 1).unwrap();
        writer.finish().unwrap();
        assert_eq!(writer.into_inner(), b"P1\n3 1\n101\n");
    }

    #[test]
    fn test_write_plain_pgm_wraps_lines() {
        let header = RasterHeader::pgm(30, 1, 65535).unwrap();
        let row = vec![65535 as Sample; 30];
        let text = written(Encoding::Plain, &header, &[(&row, 1)]);
        let body: Vec<&str> = text.lines().skip(3).collect();
        assert!(body.len() > 1);
        assert!(body.iter().all(|line| line.len() <= PLAIN_LINE_LEN));
        let count: usize = body.iter().map(|l| l.split_whitespace().count()).sum();
        assert_eq!(count, 30);
    }

    #[test]
    fn test_write_pam_header() {
        let header = RasterHeader::pam(1, 1, 2, 255, Some("GRAYSCALE_ALPHA")).unwrap();
        let mut writer = PnmWriter::with_encoding(Vec::new(), Encoding::Plain);
        writer.write_header(&header).unwrap();
        writer.write_sample_row(&[7, 255], 1).unwrap();
        writer.finish().unwrap();
        let out = writer.into_inner();
        let expected: &[u8] =
            b"P7\nWIDTH 1\nHEIGHT 1\nDEPTH 2\nMAXVAL 255\nTUPLTYPE GRAYSCALE_ALPHA\nENDHDR\n\x07\xff";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_write_16bit_raw() {
        let header = RasterHeader::pgm(2, 1, 4095).unwrap();
        let mut writer = PnmWriter::new(Vec::new());
        writer.write_header(&header).unwrap();
        writer.write_sample_row(&[4095, 1], 1).unwrap();
        writer.finish().unwrap();
        assert_eq!(writer.into_inner(), b"P5\n2 1\n4095\n\x0f\xff\x00\x01");
    }

    #[test]
    fn test_writer_row_accounting() {
        let header = RasterHeader::pgm(1, 3, 255).unwrap();
        let mut writer = PnmWriter::new(Vec::new());
        assert!(writer.write_sample_row(&[1], 1).is_err());
        writer.write_header(&header).unwrap();
        assert!(writer.write_header(&header).is_err());
        writer.write_sample_row(&[1], 2).unwrap();
        assert!(writer.finish().is_err());
        assert!(writer.write_sample_row(&[1], 2).is_err());
        assert!(writer.write_sample_row(&[256], 1).is_err());
        writer.write_sample_row(&[2], 1).unwrap();
        writer.finish().unwrap();
        assert_eq!(writer.into_inner(), b"P5\n1 3\n255\n\x01\x01\x02");
    }

    #[test]
    fn test_read_header_row_too_large() {
        // every field is in range, one raw row is not addressable
        let data = b"P7\nWIDTH 2147483645\nHEIGHT 1\nDEPTH 4294967295\nMAXVAL 65535\nENDHDR\n";
        let mut reader = PnmReader::new(&data[..]);
        assert!(matches!(reader.read_header(), Err(IoError::InvalidData(_))));
        assert!(reader.header().is_none());
    }

    #[test]
    fn test_write_header_row_too_large() {
        let header = RasterHeader::pam(2_147_483_645, 1, u32::MAX, 65535, None).unwrap();
        let mut writer = PnmWriter::new(Vec::new());
        assert!(matches!(
            writer.write_header(&header),
            Err(IoError::InvalidData(_))
        ));
        assert!(writer.into_inner().is_empty());
    }

    #[test]
    fn test_zero_repeat_writes_nothing() {
        let header = RasterHeader::pgm(1, 1, 255).unwrap();
        let text = written(Encoding::Plain, &header, &[(&[9], 0), (&[4], 1)]);
        assert_eq!(text, "P2\n1 1\n255\n4\n");
    }
}
