//! Netpbm header parsing
//!
//! Reads everything up to the first raster byte and returns it as a
//! [`RasterHeader`].  The reader is left positioned at the start of the
//! raster.
//!
//! # Header layouts
//!
//! - PBM / PGM / PPM: magic, width, height and (except PBM) maxval as
//!   whitespace-separated decimals, `#` comments allowed between tokens.
//!   A raw raster follows exactly one whitespace byte.
//! - PAM: `P7` line, then `KEYWORD value` lines (`WIDTH`, `HEIGHT`,
//!   `DEPTH`, `MAXVAL`, `TUPLTYPE`) up to an `ENDHDR` line.

use crate::format::detect_format_from_bytes;
use crate::scan::{is_whitespace, next_byte, next_number};
use crate::{IoError, IoResult};
use log::debug;
use pixenlarge_core::{Encoding, PnmFormat, RasterHeader};
use std::io::{BufRead, ErrorKind, Read};

/// Read a Netpbm header from a stream.
///
/// # Errors
///
/// - [`IoError::UnsupportedFormat`] if the magic number is not `P1`..`P7`
/// - [`IoError::InvalidData`] if the header is malformed, incomplete, or
///   declares dimensions or a maxval outside the supported range
pub fn read_header<R: BufRead>(reader: &mut R) -> IoResult<(RasterHeader, Encoding)> {
    let mut magic = [0u8; 2];
    reader.read_exact(&mut magic).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => {
            IoError::InvalidData("stream too short for a Netpbm header".to_string())
        }
        _ => IoError::Io(e),
    })?;
    let (format, encoding) = detect_format_from_bytes(&magic)?;

    let header = match format {
        PnmFormat::Pam => read_pam_header(reader)?,
        _ => read_pnm_header(reader, format, encoding)?,
    };
    debug!(
        "read {:?} header ({:?}): {}x{} depth={} maxval={}",
        header.format, encoding, header.width, header.height, header.depth, header.maxval
    );
    Ok((header, encoding))
}

/// Read a Netpbm header from the start of a byte buffer.
pub fn read_header_mem(data: &[u8]) -> IoResult<(RasterHeader, Encoding)> {
    let mut cursor = data;
    read_header(&mut cursor)
}

fn read_pnm_header<R: BufRead>(
    reader: &mut R,
    format: PnmFormat,
    encoding: Encoding,
) -> IoResult<RasterHeader> {
    let width = header_number(reader, "width")?;
    let height = header_number(reader, "height")?;
    let maxval = match format {
        PnmFormat::Pbm => 1,
        _ => header_number(reader, "maxval")?,
    };
    let depth = if format == PnmFormat::Ppm { 3 } else { 1 };

    if encoding == Encoding::Raw {
        match next_byte(reader)? {
            Some(b) if is_whitespace(b) => {}
            Some(b) => {
                return Err(IoError::InvalidData(format!(
                    "expected whitespace before raster, found {:?}",
                    b as char
                )));
            }
            None => {
                return Err(IoError::InvalidData(
                    "stream ends right after the header".to_string(),
                ));
            }
        }
    }

    RasterHeader::new(format, width, height, depth, maxval).map_err(bad_header)
}

fn header_number<R: BufRead>(reader: &mut R, field: &str) -> IoResult<u32> {
    next_number(reader)?
        .ok_or_else(|| IoError::InvalidData(format!("header ends before {field}")))
}

fn read_pam_header<R: BufRead>(reader: &mut R) -> IoResult<RasterHeader> {
    let mut line = Vec::new();
    reader.read_until(b'\n', &mut line)?;
    if !line.iter().all(|&b| is_whitespace(b)) {
        return Err(IoError::InvalidData(
            "unexpected text after P7 magic number".to_string(),
        ));
    }

    let mut width = None;
    let mut height = None;
    let mut depth = None;
    let mut maxval = None;
    let mut tuple_type: Option<String> = None;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Err(IoError::InvalidData(
                "PAM header ends before ENDHDR".to_string(),
            ));
        }
        let text = std::str::from_utf8(&line)
            .map_err(|_| IoError::InvalidData("PAM header is not ASCII".to_string()))?
            .trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let (keyword, value) = match text.split_once(char::is_whitespace) {
            Some((keyword, value)) => (keyword, value.trim()),
            None => (text, ""),
        };
        match keyword {
            "ENDHDR" => break,
            "WIDTH" => width = Some(pam_number(keyword, value)?),
            "HEIGHT" => height = Some(pam_number(keyword, value)?),
            "DEPTH" => depth = Some(pam_number(keyword, value)?),
            "MAXVAL" => maxval = Some(pam_number(keyword, value)?),
            "TUPLTYPE" => match tuple_type.as_mut() {
                Some(existing) => {
                    existing.push(' ');
                    existing.push_str(value);
                }
                None => tuple_type = Some(value.to_string()),
            },
            _ => {
                return Err(IoError::InvalidData(format!(
                    "unrecognized PAM header keyword {keyword:?}"
                )));
            }
        }
    }

    RasterHeader::pam(
        required(width, "WIDTH")?,
        required(height, "HEIGHT")?,
        required(depth, "DEPTH")?,
        required(maxval, "MAXVAL")?,
        tuple_type.as_deref(),
    )
    .map_err(bad_header)
}

fn pam_number(keyword: &str, value: &str) -> IoResult<u32> {
    value
        .parse()
        .map_err(|_| IoError::InvalidData(format!("bad {keyword} value {value:?}")))
}

fn required(value: Option<u32>, keyword: &str) -> IoResult<u32> {
    value.ok_or_else(|| IoError::InvalidData(format!("PAM header is missing {keyword}")))
}

fn bad_header(e: pixenlarge_core::Error) -> IoError {
    IoError::InvalidData(format!("bad header: {e}"))
}
