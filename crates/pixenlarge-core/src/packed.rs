//! Packed bit-row access
//!
//! Monochrome rows are stored 8 pixels per byte, most significant bit
//! first.  Pixel 0 of a row is bit 7 of byte 0.  When the width is not a
//! multiple of 8 the final byte carries padding bits beyond the last pixel.
//!
//! # Padding
//!
//! Padding bits arrive with whatever value the source stream held.  Any
//! routine that spreads bits across a wider row must see them cleared
//! first, see [`clear_padding`].

/// Number of bytes needed to hold `width` packed pixels.
#[inline]
pub fn packed_bytes(width: u32) -> usize {
    (width as usize).div_ceil(8)
}

/// Zero the padding bits beyond `width` in the final byte of `row`.
///
/// Does nothing when `width` is a multiple of 8 or the row is shorter than
/// `packed_bytes(width)`.
#[inline]
pub fn clear_padding(row: &mut [u8], width: u32) {
    let used = width % 8;
    if used == 0 {
        return;
    }
    if let Some(last) = row.get_mut(packed_bytes(width) - 1) {
        *last &= padding_mask(width);
    }
}

/// Mask selecting the meaningful bits of the final byte of a row.
#[inline]
pub fn padding_mask(width: u32) -> u8 {
    match width % 8 {
        0 => 0xff,
        used => 0xff << (8 - used),
    }
}

/// Get a 1-bit pixel value.
///
/// # Panics
///
/// Panics if `x / 8` is outside `row`.
#[inline]
pub fn get_bit(row: &[u8], x: u32) -> u8 {
    (row[(x / 8) as usize] >> (7 - x % 8)) & 1
}

/// Set a 1-bit pixel value (any nonzero `val` sets the bit).
///
/// # Panics
///
/// Panics if `x / 8` is outside `row`.
#[inline]
pub fn set_bit(row: &mut [u8], x: u32, val: u8) {
    let mask = 0x80u8 >> (x % 8);
    let byte = &mut row[(x / 8) as usize];
    if val != 0 {
        *byte |= mask;
    } else {
        *byte &= !mask;
    }
}
