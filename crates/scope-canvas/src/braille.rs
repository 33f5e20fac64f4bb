// SPDX-License-Identifier: MIT
//
// Braille dot addressing and the ASCII fallback table.
//
// Each terminal cell is a 2×4 dot matrix addressed through the Unicode
// braille block (U+2800..U+28FF). The low byte of a braille codepoint is a
// bitfield of which dots are raised, but the bit order follows the braille
// standard's historical 6-dot-plus-extensions layout, not raster order —
// hence the fixed lookup table below. The mapping is load-bearing: glyph
// bytes produced here are compared across frames by the diff renderer and
// consumed by the EASCII table, so it must be preserved bit-for-bit.

/// First codepoint of the Unicode braille block (the empty pattern).
pub const BRAILLE_BASE: u16 = 0x2800;

/// Full block character used by the RGB-block image mode.
pub const FULL_BLOCK: u16 = 0x2588;

/// Dot-bit for each sub-cell position index `(x&1) | ((y&3) << 1)`.
///
/// Raster order (left-to-right, top-to-bottom) maps to braille dot bits:
/// top-left, top-right, mid-upper-left, mid-upper-right, mid-lower-left,
/// mid-lower-right, bottom-left, bottom-right.
pub const DOT_BITS: [u8; 8] = [
    0b0000_0001,
    0b0000_1000,
    0b0000_0010,
    0b0001_0000,
    0b0000_0100,
    0b0010_0000,
    0b0100_0000,
    0b1000_0000,
];

/// The dot bit raised by pixel `(x, y)` within its cell.
#[inline]
#[must_use]
pub const fn dot_bit(x: u32, y: u32) -> u8 {
    DOT_BITS[((x & 0b1) | ((y & 0b11) << 1)) as usize]
}

/// Whether a glyph code lies in the braille block.
#[inline]
#[must_use]
pub const fn is_braille(glyph: u16) -> bool {
    glyph & 0xFF00 == BRAILLE_BASE
}

/// The dot pattern of a braille glyph (0 for non-braille glyphs).
#[inline]
#[must_use]
pub const fn dots_of(glyph: u16) -> u8 {
    if is_braille(glyph) {
        (glyph & 0x00FF) as u8
    } else {
        0
    }
}

/// Dot pattern → ASCII-art character, for terminals without Unicode.
///
/// One character per possible 8-dot pattern, chosen for visual similarity.
/// The table is load-bearing and must not be edited entry by entry; index
/// 220 is `¿`, which is Latin-1 rather than strict ASCII but survives
/// every terminal we care about in this mode.
const EASCII_TABLE: &str = " '-'.*.|'~/~/F//-\\-~/>-&'\"\"\"/)//.\\\\\\_LLL'\"<C-=CC:\\-\\vD=D|Y|Y|)AH.!i!.ii|/\"/F/Fff//rkfPrkJJ/P/P/P//>brr>kl>&&*=fF/)vb/PPDJ)19/2/R.\\\\\\\\\\\\(=T([(((C=3-5cSct!919|7Ce,\\\\\\_\\\\\\i919i9(C|)\\\\+tv\\|719|7@9_L=L_LLL_=6[CEC[=;==c2ctJ]d=¿Z6E/\\;bsbsbj]SSd=66jj]bddsbJ]j]d]d8";

/// The ASCII-art stand-in for a dot pattern.
#[must_use]
pub fn eascii_char(dots: u8) -> char {
    EASCII_TABLE.chars().nth(dots as usize).unwrap_or(' ')
}

// ─── Tests ───────────────────────────────────────────────────────────────────
