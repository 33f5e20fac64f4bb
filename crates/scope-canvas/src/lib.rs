// SPDX-License-Identifier: MIT
//
// scope-canvas — braille framebuffer and differential renderer for termscope.
//
// A terminal canvas that gives every character cell a 2×4 addressable dot
// matrix via the Unicode braille block, with per-cell 24-bit color and
// graceful degradation to 16-color and plain-ASCII terminals. Successive
// frames are diffed so only changed cells reach the terminal, which is what
// makes 15 Hz animation over a slow TTY (or an SSH link) practical.
//
// This crate intentionally avoids external TUI frameworks (ratatui,
// crossterm) in favor of direct terminal control via ANSI escape sequences
// and raw termios. The canvas knows nothing about the data being plotted —
// its whole contract is clear / set_color / point / points / line / rect /
// text / image / draw / update_shape.

pub mod ansi;
pub mod braille;
pub mod canvas;
pub mod cell;
pub mod color;
pub mod error;
pub mod grid;
pub mod input;
pub mod render;
pub mod term;

pub use canvas::{Canvas, CanvasOptions, ImageMode, PixelPoint};
pub use color::{ColorTier, Rgb};
pub use error::CanvasError;
pub use input::{KeyReader, KeyToken};
pub use term::{Size, Terminal};
