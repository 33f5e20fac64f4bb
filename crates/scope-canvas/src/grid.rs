// SPDX-License-Identifier: MIT
//
// CellGrid — the flat, row-major grid of cells the canvas paints into.
//
// One cell per terminal character. Glyph, color, and flags travel together
// inside Cell, so a reshape reallocates all three in one step and they can
// never drift out of lock-step with the terminal shape. Rows are contiguous
// for the renderer's left-to-right scan.

use crate::cell::Cell;
use crate::term::Size;

/// A 2D buffer of cells sized to the terminal character grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGrid {
    size: Size,
    cells: Vec<Cell>,
}

impl CellGrid {
    /// Create a grid of empty cells.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            cells: vec![Cell::EMPTY; size.area() as usize],
        }
    }

    /// Grid dimensions in character cells.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Whether `(col, row)` is within the grid.
    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, col: u16, row: u16) -> bool {
        col < self.size.cols && row < self.size.rows
    }

    #[inline]
    const fn index(&self, col: u16, row: u16) -> usize {
        row as usize * self.size.cols as usize + col as usize
    }

    /// Cell reference, or `None` out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, col: u16, row: u16) -> Option<&Cell> {
        if self.in_bounds(col, row) {
            Some(&self.cells[self.index(col, row)])
        } else {
            None
        }
    }

    /// Mutable cell reference, or `None` out of bounds.
    #[inline]
    pub fn get_mut(&mut self, col: u16, row: u16) -> Option<&mut Cell> {
        if self.in_bounds(col, row) {
            let idx = self.index(col, row);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// A single row as a slice, or `None` out of bounds.
    #[inline]
    #[must_use]
    pub fn row(&self, row: u16) -> Option<&[Cell]> {
        if row < self.size.rows {
            let start = self.index(0, row);
            Some(&self.cells[start..start + usize::from(self.size.cols)])
        } else {
            None
        }
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Copy another grid's contents without reallocating.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions differ — the canvas guarantees they don't.
    pub fn copy_from(&mut self, other: &Self) {
        assert_eq!(self.size, other.size, "grid shape mismatch");
        self.cells.copy_from_slice(&other.cells);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
