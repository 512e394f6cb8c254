//! Raster header - format, geometry and sample range of an image
//!
//! A [`RasterHeader`] is everything a reader learns before the first row:
//! which Netpbm family the image belongs to, its width and height, how many
//! components each pixel carries and the largest valid component value.
//!
//! # Pixel formats
//!
//! | Format | Components | maxval | Row storage |
//! |---|---|---|---|
//! | PBM | 1 | 1 | packed bits, MSB first |
//! | PGM | 1 | 1..=65535 | samples |
//! | PPM | 3 | 1..=65535 | samples |
//! | PAM | any ≥ 1 | 1..=65535 | samples |

use crate::error::{Error, Result};
use crate::packed::packed_bytes;

/// Largest width or height any stream may declare.
///
/// Kept a little below `i32::MAX` so that header fields and row byte counts
/// stay representable in signed 32-bit arithmetic downstream.
pub const MAX_DIMENSION: u32 = i32::MAX as u32 - 2;

/// Largest maxval a sample may declare.
pub const MAX_MAXVAL: u32 = 65535;

/// One component value of one pixel.
pub type Sample = u16;

/// Netpbm image family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PnmFormat {
    /// Bitmap (P1 / P4)
    Pbm,
    /// Graymap (P2 / P5)
    Pgm,
    /// Pixmap (P3 / P6)
    Ppm,
    /// Arbitrary map (P7)
    Pam,
}

/// Raster encoding of a Netpbm stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// ASCII raster (P1, P2, P3)
    Plain,
    /// Binary raster (P4, P5, P6, P7)
    #[default]
    Raw,
}

/// How rows of an image are stored in memory.
///
/// This is the distinction that selects the enlargement path: packed rows
/// go through bit replication, everything else through column mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 1 bit per pixel, 8 pixels per byte, MSB first
    PackedBit,
    /// `depth` samples per pixel
    Tuple,
}

impl PnmFormat {
    /// Get the two-byte magic number for this format and encoding.
    ///
    /// PAM has no plain variant; `P7` is returned for both encodings.
    pub fn magic(self, encoding: Encoding) -> &'static [u8; 2] {
        match (self, encoding) {
            (Self::Pbm, Encoding::Plain) => b"P1",
            (Self::Pgm, Encoding::Plain) => b"P2",
            (Self::Ppm, Encoding::Plain) => b"P3",
            (Self::Pbm, Encoding::Raw) => b"P4",
            (Self::Pgm, Encoding::Raw) => b"P5",
            (Self::Ppm, Encoding::Raw) => b"P6",
            (Self::Pam, _) => b"P7",
        }
    }

    /// Identify a format and encoding from a two-byte magic number.
    pub fn from_magic(magic: &[u8]) -> Option<(Self, Encoding)> {
        match magic {
            b"P1" => Some((Self::Pbm, Encoding::Plain)),
            b"P2" => Some((Self::Pgm, Encoding::Plain)),
            b"P3" => Some((Self::Ppm, Encoding::Plain)),
            b"P4" => Some((Self::Pbm, Encoding::Raw)),
            b"P5" => Some((Self::Pgm, Encoding::Raw)),
            b"P6" => Some((Self::Ppm, Encoding::Raw)),
            b"P7" => Some((Self::Pam, Encoding::Raw)),
            _ => None,
        }
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pbm => "pbm",
            Self::Pgm => "pgm",
            Self::Ppm => "ppm",
            Self::Pam => "pam",
        }
    }
}

/// Image metadata shared by readers, writers and the enlargement engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterHeader {
    /// Netpbm family
    pub format: PnmFormat,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Components per pixel
    pub depth: u32,
    /// Largest valid component value
    pub maxval: u32,
    /// PAM tuple type, if declared
    pub tuple_type: Option<String>,
}

impl RasterHeader {
    /// Create a PBM header.
    pub fn pbm(width: u32, height: u32) -> Result<Self> {
        Self::new(PnmFormat::Pbm, width, height, 1, 1)
    }

    /// Create a PGM header.
    pub fn pgm(width: u32, height: u32, maxval: u32) -> Result<Self> {
        Self::new(PnmFormat::Pgm, width, height, 1, maxval)
    }

    /// Create a PPM header.
    pub fn ppm(width: u32, height: u32, maxval: u32) -> Result<Self> {
        Self::new(PnmFormat::Ppm, width, height, 3, maxval)
    }

    /// Create a PAM header with an optional tuple type.
    pub fn pam(
        width: u32,
        height: u32,
        depth: u32,
        maxval: u32,
        tuple_type: Option<&str>,
    ) -> Result<Self> {
        let mut header = Self::new(PnmFormat::Pam, width, height, depth, maxval)?;
        header.tuple_type = tuple_type.map(str::to_string);
        Ok(header)
    }

    /// Create and validate a header.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimension`] if width or height is 0 or exceeds
    ///   [`MAX_DIMENSION`]
    /// - [`Error::InvalidDepth`] if `depth` does not fit the format
    /// - [`Error::InvalidMaxval`] if `maxval` does not fit the format
    pub fn new(format: PnmFormat, width: u32, height: u32, depth: u32, maxval: u32) -> Result<Self> {
        let header = Self {
            format,
            width,
            height,
            depth,
            maxval,
            tuple_type: None,
        };
        header.validate()?;
        Ok(header)
    }

    /// Check the header invariants.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0
            || self.height == 0
            || self.width > MAX_DIMENSION
            || self.height > MAX_DIMENSION
        {
            return Err(Error::InvalidDimension {
                width: self.width,
                height: self.height,
            });
        }
        let depth_ok = match self.format {
            PnmFormat::Pbm | PnmFormat::Pgm => self.depth == 1,
            PnmFormat::Ppm => self.depth == 3,
            PnmFormat::Pam => self.depth >= 1,
        };
        if !depth_ok {
            return Err(Error::InvalidDepth(self.depth));
        }
        let maxval_ok = match self.format {
            PnmFormat::Pbm => self.maxval == 1,
            _ => (1..=MAX_MAXVAL).contains(&self.maxval),
        };
        if !maxval_ok {
            return Err(Error::InvalidMaxval(self.maxval));
        }
        Ok(())
    }

    /// Row storage used for this image.
    #[inline]
    pub fn pixel_format(&self) -> PixelFormat {
        match self.format {
            PnmFormat::Pbm => PixelFormat::PackedBit,
            _ => PixelFormat::Tuple,
        }
    }

    /// Bytes in one packed row, `ceil(width / 8)`.
    #[inline]
    pub fn packed_row_bytes(&self) -> usize {
        packed_bytes(self.width)
    }

    /// Samples in one tuple row, `width * depth`.
    #[inline]
    pub fn samples_per_row(&self) -> usize {
        (self.width as usize).saturating_mul(self.depth as usize)
    }

    /// Bytes per raw sample: 1 below 256, otherwise 2 (big-endian).
    #[inline]
    pub fn bytes_per_sample(&self) -> usize {
        if self.maxval < 256 { 1 } else { 2 }
    }

    /// Header of the image enlarged by `factor` on both axes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if either product overflows or
    /// exceeds [`MAX_DIMENSION`].
    pub fn enlarged(&self, factor: u32) -> Result<Self> {
        let overflow = || Error::InvalidDimension {
            width: self.width,
            height: self.height,
        };
        let width = self.width.checked_mul(factor).ok_or_else(overflow)?;
        let height = self.height.checked_mul(factor).ok_or_else(overflow)?;
        let header = Self {
            width,
            height,
            ..self.clone()
        };
        header.validate()?;
        Ok(header)
    }
}
