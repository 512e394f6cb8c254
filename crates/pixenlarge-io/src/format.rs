//! Image format detection
//!
//! Detects Netpbm formats by examining the magic number at the start of
//! the stream.

use crate::{IoError, IoResult};
use pixenlarge_core::{Encoding, PnmFormat};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Detect the format of a file
pub fn detect_format<P: AsRef<Path>>(path: P) -> IoResult<(PnmFormat, Encoding)> {
    let mut file = File::open(path)?;
    let mut magic = [0u8; 2];
    let mut filled = 0;
    while filled < magic.len() {
        let n = file.read(&mut magic[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    detect_format_from_bytes(&magic[..filled])
}

/// Detect the format from the leading bytes of a stream
pub fn detect_format_from_bytes(data: &[u8]) -> IoResult<(PnmFormat, Encoding)> {
    if data.len() < 2 {
        return Err(IoError::InvalidData(
            "not enough data to detect format".to_string(),
        ));
    }
    PnmFormat::from_magic(&data[..2]).ok_or_else(|| {
        IoError::UnsupportedFormat(format!(
            "magic number {:?} is not a Netpbm format",
            String::from_utf8_lossy(&data[..2])
        ))
    })
}
