// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit — the diff renderer makes those calls.
// Cursor positions are 0-indexed in our API and converted to the terminal's
// 1-indexed convention here.
//
// All functions return `io::Result` propagated from the underlying writer.
// In practice they never fail when writing to the in-memory frame buffer.

use std::io::{self, Write};

use crate::color::Rgb;

/// Move the cursor to `(col, row)` (CUP; 0-indexed API, 1-indexed wire).
#[inline]
pub fn cursor_to(w: &mut impl Write, col: u16, row: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", row + 1, col + 1)
}

/// Move the cursor to the top-left corner.
#[inline]
pub fn cursor_home(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[H")
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Reset all SGR attributes to terminal defaults (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

/// Set the foreground color with a 24-bit truecolor escape.
#[inline]
pub fn fg_rgb(w: &mut impl Write, color: Rgb) -> io::Result<()> {
    write!(w, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b)
}

/// Set the foreground color with a 3-bit SGR 30–37 escape.
#[inline]
pub fn fg_3bit(w: &mut impl Write, color: Rgb) -> io::Result<()> {
    write!(w, "\x1b[3{}m", color.to_3bit())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
