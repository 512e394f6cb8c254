//! Byte-level scanning of Netpbm text
//!
//! Headers and plain rasters are whitespace-separated ASCII tokens with
//! `#` comments running to end of line.  These helpers pull one token at a
//! time from a `BufRead` without over-consuming, so a raw raster can start
//! immediately after the header.

use crate::{IoError, IoResult};
use std::io::{self, BufRead};

#[inline]
pub(crate) fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

pub(crate) fn peek_byte<R: BufRead>(reader: &mut R) -> io::Result<Option<u8>> {
    Ok(reader.fill_buf()?.first().copied())
}

pub(crate) fn next_byte<R: BufRead>(reader: &mut R) -> io::Result<Option<u8>> {
    let byte = peek_byte(reader)?;
    if byte.is_some() {
        reader.consume(1);
    }
    Ok(byte)
}

/// Skip whitespace and comments.
pub(crate) fn skip_separators<R: BufRead>(reader: &mut R) -> io::Result<()> {
    while let Some(b) = peek_byte(reader)? {
        if is_whitespace(b) {
            reader.consume(1);
        } else if b == b'#' {
            skip_comment(reader)?;
        } else {
            break;
        }
    }
    Ok(())
}

fn skip_comment<R: BufRead>(reader: &mut R) -> io::Result<()> {
    while let Some(b) = next_byte(reader)? {
        if b == b'\n' || b == b'\r' {
            break;
        }
    }
    Ok(())
}

/// Read the next unsigned decimal number.
///
/// Returns `Ok(None)` at end of stream.  The byte that terminates the
/// number is left unread.
pub(crate) fn next_number<R: BufRead>(reader: &mut R) -> IoResult<Option<u32>> {
    skip_separators(reader)?;
    let mut value: u64 = 0;
    let mut digits = 0usize;
    while let Some(b) = peek_byte(reader)? {
        if !b.is_ascii_digit() {
            if digits == 0 {
                return Err(IoError::InvalidData(format!(
                    "expected a decimal number, found {:?}",
                    b as char
                )));
            }
            break;
        }
        reader.consume(1);
        digits += 1;
        value = value * 10 + u64::from(b - b'0');
        if value > u64::from(u32::MAX) {
            return Err(IoError::InvalidData("number too large".to_string()));
        }
    }
    if digits == 0 {
        return Ok(None);
    }
    Ok(Some(value as u32))
}

/// Read the next `0` or `1` of a plain bitmap raster.
///
/// Returns `Ok(None)` at end of stream.
pub(crate) fn next_bit<R: BufRead>(reader: &mut R) -> IoResult<Option<u8>> {
    skip_separators(reader)?;
    match next_byte(reader)? {
        None => Ok(None),
        Some(b'0') => Ok(Some(0)),
        Some(b'1') => Ok(Some(1)),
        Some(b) => Err(IoError::InvalidData(format!(
            "expected '0' or '1' in plain bitmap, found {:?}",
            b as char
        ))),
    }
}
