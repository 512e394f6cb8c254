//! Bit replication tables for packed 1-bit rows
//!
//! Enlarging a packed row by `f` turns each input byte into `f` output
//! bytes in which every input bit appears `f` times in a row.  For the
//! common small factors the output bytes are looked up directly from the
//! input bits that land in them:
//!
//! ```text
//! factor 2   in  a b c d | e f g h
//!            out aabbccdd eeffgghh                      DOUBLE[abcd] DOUBLE[efgh]
//!
//! factor 3   in  a b c | d e f | g h   (fragments overlap: c and f straddle)
//!            out aaabbbcc cdddeeef ffggghhh              TRIPLE_HIGH[abc] TRIPLE_MID[cdef] TRIPLE_LOW[fgh]
//!
//! factor 5   out aaaaabbb bbcccccd dddde eee ...         PAIR, QUINT_SECOND, PAIR, QUINT_FOURTH, PAIR
//! ```
//!
//! Every other factor goes through [`general_output_byte`], which builds
//! one output byte at a time from at most two neighbouring input bits.
//! That holds for factor 4 and for every factor of 6 or more; factors 2, 3
//! and 5 put three or more input bits into some output byte and must use
//! the tables.

/// Factor 2: a nibble with each bit doubled.
pub const DOUBLE: [u8; 16] = [
    0x00, 0x03, 0x0C, 0x0F, 0x30, 0x33, 0x3C, 0x3F, //
    0xC0, 0xC3, 0xCC, 0xCF, 0xF0, 0xF3, 0xFC, 0xFF,
];

/// Factor 3, first output byte: bits 7..5 of the input as `aaabbbcc`.
pub const TRIPLE_HIGH: [u8; 8] = [0x00, 0x03, 0x1C, 0x1F, 0xE0, 0xE3, 0xFC, 0xFF];

/// Factor 3, second output byte: bits 5..2 of the input as `cdddeeef`.
pub const TRIPLE_MID: [u8; 16] = [
    0x00, 0x01, 0x0E, 0x0F, 0x70, 0x71, 0x7E, 0x7F, //
    0x80, 0x81, 0x8E, 0x8F, 0xF0, 0xF1, 0xFE, 0xFF,
];

/// Factor 3, third output byte: bits 2..0 of the input as `ffggghhh`.
pub const TRIPLE_LOW: [u8; 8] = [0x00, 0x07, 0x38, 0x3F, 0xC0, 0xC7, 0xF8, 0xFF];

/// Factor 5, second output byte: bits 6..4 of the input as `bbcccccd`.
pub const QUINT_SECOND: [u8; 8] = [0x00, 0x01, 0x3E, 0x3F, 0xC0, 0xC1, 0xFE, 0xFF];

/// Factor 5, fourth output byte: bits 3..1 of the input as `efffffgg`.
pub const QUINT_FOURTH: [u8; 8] = [0x00, 0x03, 0x7C, 0x7F, 0x80, 0x83, 0xFC, 0xFF];

/// Two input bits, each widened to a full byte.
///
/// Shifting an entry right by `n` and keeping the low byte gives `n` copies
/// of the first bit followed by `8 - n` copies of the second.
pub const PAIR: [u16; 4] = [0x0000, 0x00FF, 0xFF00, 0xFFFF];

/// Select the low byte of `PAIR[bits] >> shift`.
#[inline]
pub fn pair_shifted(bits: u8, shift: u32) -> u8 {
    (PAIR[(bits & 0x03) as usize] >> shift) as u8
}

/// Whether `factor` has dedicated tables.
#[inline]
pub fn has_table(factor: u32) -> bool {
    matches!(factor, 2 | 3 | 5)
}

/// Output byte `position` (counted within the `factor` output bytes that
/// come from one input byte) of `source` enlarged by `factor`.
///
/// Only valid for factor 4 and factors of 6 or more.
#[inline]
pub fn general_output_byte(source: u8, position: u32, factor: u32) -> u8 {
    let factor = u64::from(factor);
    let first_out_bit = u64::from(position) * 8;
    // input bit (0 = MSB) feeding the first output bit of this byte
    let bit = (first_out_bit / factor) as u32;
    // output bits left for that input bit, counted from the byte's MSB
    let span = factor - first_out_bit % factor;

    if span >= 8 {
        ((source >> (7 - bit)) & 0x01) * 0xFF
    } else {
        pair_shifted(source >> (6 - bit), span as u32)
    }
}
