//! Two-glyph bit patterns, as painted onto a cartridge
use cpu::{WORD_BITS, bits};

/// Glyph for a set bit
pub const ONE: char = '#';

/// Glyph for a clear bit
pub const ZERO: char = '.';

/// Renders the low `width` bits of `v`, MSB first
///
/// `width` is clamped to 16.
pub fn encode(v: u16, width: u32) -> String {
    let width = width.min(WORD_BITS);
    let v = bits::truncate(i64::from(v), width);
    (0..width)
        .rev()
        .map(|i| if (v >> i) & 1 == 1 { ONE } else { ZERO })
        .collect()
}

/// Parses a glyph pattern, MSB first, keeping the low 16 bits
///
/// Returns `None` if the string is empty or contains anything other than the
/// two glyphs.
pub fn decode(s: &str) -> Option<u16> {
    if s.is_empty() {
        return None;
    }
    s.chars().try_fold(0u16, |acc, c| {
        let bit = match c {
            ONE => 1,
            ZERO => 0,
            _ => return None,
        };
        Some((acc << 1) | bit)
    })
}
