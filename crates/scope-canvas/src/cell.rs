// SPDX-License-Identifier: MIT
//
// Cell — one terminal character position in the framebuffer.
//
// A cell carries a glyph code, a color, and interpretation flags. The glyph
// is usually a braille codepoint (dot pattern in the low byte), but a cell
// marked TEXT holds a literal character instead, and the RGB-block image
// mode parks U+2588 there. 8 bytes per cell; the diff renderer compares
// whole cells with derived PartialEq.

use crate::braille::{self, BRAILLE_BASE};
use crate::color::Rgb;

bitflags::bitflags! {
    /// How a cell's glyph is to be interpreted by the renderer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct CellFlags: u8 {
        /// Render the glyph as a literal character (text override),
        /// not as a braille dot pattern.
        const TEXT = 1 << 0;
    }
}

/// A single framebuffer cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Glyph code: braille codepoint, literal char, or U+2588.
    pub glyph: u16,
    /// Per-cell color, last-write-wins.
    pub color: Rgb,
    /// Interpretation flags.
    pub flags: CellFlags,
}

impl Cell {
    /// An empty cell: no dots set, default color.
    pub const EMPTY: Self = Self {
        glyph: BRAILLE_BASE,
        color: Rgb::WHITE,
        flags: CellFlags::empty(),
    };

    /// Whether this cell is a text override.
    #[inline]
    #[must_use]
    pub const fn is_text(self) -> bool {
        self.flags.contains(CellFlags::TEXT)
    }

    /// The cell's braille dot pattern (0 for text and block cells).
    #[inline]
    #[must_use]
    pub const fn dots(self) -> u8 {
        braille::dots_of(self.glyph)
    }

    /// Merge a dot bit into this cell, optionally resetting existing dots.
    ///
    /// A text or block glyph is displaced: the cell reverts to braille
    /// interpretation with only the dots being set now.
    pub fn set_dot(&mut self, bit: u8, color: Rgb, clear_block: bool) {
        let existing = if clear_block || self.is_text() || !braille::is_braille(self.glyph) {
            0
        } else {
            self.dots()
        };
        self.glyph = BRAILLE_BASE | u16::from(existing | bit);
        self.flags.remove(CellFlags::TEXT);
        self.color = color;
    }

    /// Turn this cell into a solid block (RGB image mode).
    pub fn set_block(&mut self, color: Rgb) {
        self.glyph = crate::braille::FULL_BLOCK;
        self.flags.remove(CellFlags::TEXT);
        self.color = color;
    }

    /// Turn this cell into a literal character.
    pub fn set_text(&mut self, ch: char, color: Rgb) {
        self.glyph = ch as u16;
        self.flags.insert(CellFlags::TEXT);
        self.color = color;
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
