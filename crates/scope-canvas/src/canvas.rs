// SPDX-License-Identifier: MIT
//
// Canvas — the drawing surface and frame lifecycle.
//
// A canvas owns the cell grid, a snapshot of the last-drawn frame, and the
// diff renderer. Viewers paint with pixel-space primitives (point, line,
// rect, text, image); `draw()` diffs against the snapshot and pushes the
// minimal escape byte stream to stdout in one syscall.
//
// Coordinate policy: all primitives take sub-cell pixel coordinates as
// `(i32, i32)`, origin top-left. Anything outside the pixel shape clips
// silently — geometry is never an error, so viewers can project freely
// without bounds arithmetic.

use unicode_width::UnicodeWidthChar;

use crate::braille;
use crate::color::{ColorTier, Rgb};
use crate::error::CanvasError;
use crate::grid::CellGrid;
use crate::render::{FrameRenderer, OutputBuffer, RenderStats};
use crate::term::{self, Size};

/// Full repaint interval: every Nth frame redraws the whole screen so any
/// corruption from line noise or a concurrent writer heals itself.
const REFRESH_INTERVAL: u64 = 100;

/// A pixel position: `(x, y)`, sub-cell resolution, origin top-left.
pub type PixelPoint = (i32, i32);

// ─── Options ─────────────────────────────────────────────────────────────────

/// Canvas construction options.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanvasOptions {
    /// Render dot patterns as ASCII-art lookalikes instead of braille.
    pub ascii: bool,
    /// Color tier override. `None` autodetects from the environment.
    pub tier: Option<ColorTier>,
}

/// How raw image sample bytes are interpreted by [`Canvas::image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMode {
    /// One byte per pixel; any nonzero value raises the dot.
    Monochrome,
    /// One byte per pixel; values above 127 raise the dot.
    Grayscale8,
    /// Three bytes (RGB) per pixel; one full terminal cell per image
    /// pixel, painted as a colored solid block.
    RgbBlock,
    /// Three bytes (RGB) per pixel; one canvas dot per image pixel with
    /// per-pixel color.
    RgbFull,
}

/// Where the canvas learns its shape from.
#[derive(Debug, Clone, Copy)]
enum SizeSource {
    /// The controlling terminal, re-queried on [`Canvas::update_shape`].
    Tty,
    /// A fixed shape, for tests and embedding.
    Fixed(Size),
}

// ─── Canvas ──────────────────────────────────────────────────────────────────

/// The drawing surface: a braille-resolution framebuffer with differential
/// terminal output.
pub struct Canvas {
    source: SizeSource,
    grid: CellGrid,
    /// Last-drawn frame, `None` until the first draw and after a reshape.
    snapshot: Option<CellGrid>,
    renderer: FrameRenderer,
    out: OutputBuffer,
    color: Rgb,
    frame: u64,
}

impl Canvas {
    /// Create a canvas sized to the controlling terminal.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::NotATty`] when stdout has no terminal and the
    /// shape cannot be determined.
    pub fn new(options: CanvasOptions) -> Result<Self, CanvasError> {
        let size = term::get_size().ok_or(CanvasError::NotATty)?;
        log::debug!(
            "canvas attached to terminal: {}x{} cells ({}x{} dots)",
            size.cols,
            size.rows,
            size.pixels().0,
            size.pixels().1
        );
        Ok(Self::build(SizeSource::Tty, size, options))
    }

    /// Create a canvas with a fixed shape, independent of any terminal.
    #[must_use]
    pub fn with_size(size: Size, options: CanvasOptions) -> Self {
        Self::build(SizeSource::Fixed(size), size, options)
    }

    fn build(source: SizeSource, size: Size, options: CanvasOptions) -> Self {
        let tier = options.tier.unwrap_or_else(ColorTier::detect_from_env);
        Self {
            source,
            grid: CellGrid::new(size),
            snapshot: None,
            renderer: FrameRenderer::new(tier, options.ascii),
            out: OutputBuffer::new(),
            color: Rgb::WHITE,
            frame: 0,
        }
    }

    // ── Shape ───────────────────────────────────────────────────────────

    /// Current shape in character cells.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.grid.size()
    }

    /// Current shape in dots: `(cols × 2, rows × 4)`.
    #[inline]
    #[must_use]
    pub const fn pixel_size(&self) -> (u32, u32) {
        self.grid.size().pixels()
    }

    /// Change the shape of a fixed-size canvas. Takes effect on the next
    /// [`update_shape`](Self::update_shape); no-op for terminal-backed
    /// canvases.
    pub fn set_fixed_size(&mut self, size: Size) {
        if matches!(self.source, SizeSource::Fixed(_)) {
            self.source = SizeSource::Fixed(size);
        }
    }

    /// Re-query the shape and reallocate the grid if it changed.
    ///
    /// Returns `true` on a reshape. The snapshot is dropped, so the next
    /// draw is a full repaint.
    pub fn update_shape(&mut self) -> bool {
        let current = match self.source {
            SizeSource::Tty => term::get_size(),
            SizeSource::Fixed(s) => Some(s),
        };
        let Some(new_size) = current else {
            return false;
        };
        if new_size == self.grid.size() {
            return false;
        }
        log::info!(
            "canvas reshaped: {}x{} -> {}x{} cells",
            self.grid.size().cols,
            self.grid.size().rows,
            new_size.cols,
            new_size.rows
        );
        self.grid = CellGrid::new(new_size);
        self.snapshot = None;
        true
    }

    // ── State ───────────────────────────────────────────────────────────

    /// Reset every cell to empty. The snapshot is untouched, so the next
    /// draw emits only the cells that actually held content.
    pub fn clear(&mut self) {
        self.grid.clear();
    }

    /// Set the current drawing color for subsequent primitives.
    #[inline]
    pub const fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    /// The current drawing color.
    #[inline]
    #[must_use]
    pub const fn color(&self) -> Rgb {
        self.color
    }

    /// The color tier the canvas renders with.
    #[inline]
    #[must_use]
    pub const fn tier(&self) -> ColorTier {
        self.renderer.tier()
    }

    /// Direct cell access, for tests and inspection.
    #[inline]
    #[must_use]
    pub fn cell(&self, col: u16, row: u16) -> Option<&crate::cell::Cell> {
        self.grid.get(col, row)
    }

    // ── Primitives ──────────────────────────────────────────────────────

    /// Raise the dot at `p` in the current color. Out-of-bounds clips.
    ///
    /// With `clear_block` set, any dots already in the target cell are
    /// discarded first.
    pub fn point(&mut self, p: PixelPoint, clear_block: bool) {
        self.plot(p, self.color, clear_block);
    }

    fn plot(&mut self, (x, y): PixelPoint, color: Rgb, clear_block: bool) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        let (pw, ph) = self.grid.size().pixels();
        if x >= pw || y >= ph {
            return;
        }
        let col = (x / 2) as u16;
        let row = (y / 4) as u16;
        let bit = braille::dot_bit(x, y);
        if let Some(cell) = self.grid.get_mut(col, row) {
            cell.set_dot(bit, color, clear_block);
        }
    }

    /// Raise many dots at once, optionally with a per-point color slice.
    ///
    /// With `clear_block` set, every cell touched by the batch is wiped
    /// once up front, then all points merge in; the result does not depend
    /// on the order of the slice.
    pub fn points(&mut self, pts: &[PixelPoint], colors: Option<&[Rgb]>, clear_block: bool) {
        if clear_block {
            for &p in pts {
                // Wipe pass: resets every touched cell. Whatever bit it
                // raises is re-raised by the merge pass below.
                self.plot(p, self.color, true);
            }
        }
        for (i, &p) in pts.iter().enumerate() {
            let color = colors
                .and_then(|cs| cs.get(i).copied())
                .unwrap_or(self.color);
            self.plot(p, color, false);
        }
    }

    /// Draw a line from `p0` toward `p1`, half-open: the `p1` endpoint
    /// itself is not painted, so chained segments never double-strike
    /// their joints.
    ///
    /// Single-axis stepping: one dot per integer step along the dominant
    /// axis, the other axis computed from the slope and truncated. Shallow
    /// lines step in x, steep lines in y, exactly vertical lines are a
    /// straight column.
    pub fn line(&mut self, p0: PixelPoint, p1: PixelPoint) {
        let (x0, y0) = p0;
        let (x1, y1) = p1;
        #[allow(clippy::cast_possible_wrap)]
        let (w, h) = {
            let (w, h) = self.pixel_size();
            (w as i32, h as i32)
        };

        if x0 == x1 {
            for y in y0.min(y1).max(0)..y0.max(y1).min(h) {
                self.point((x0, y), false);
            }
            return;
        }

        // Deltas in f64: endpoints may sit anywhere in the i32 range,
        // so their difference can overflow i32. The stepping range is
        // clipped to the pixel area; steps outside it would only produce
        // points the plot pass drops anyway.
        let dx = f64::from(x1) - f64::from(x0);
        let dy = f64::from(y1) - f64::from(y0);
        let slope = dy / dx;
        if slope.abs() <= 1.0 {
            for x in x0.min(x1).max(0)..x0.max(x1).min(w) {
                let y = f64::from(y0) + slope * (f64::from(x) - f64::from(x0));
                self.point((x, y as i32), false);
            }
        } else {
            for y in y0.min(y1).max(0)..y0.max(y1).min(h) {
                let x = f64::from(x0) + (f64::from(y) - f64::from(y0)) / slope;
                self.point((x as i32, y), false);
            }
        }
    }

    /// Draw an axis-aligned rectangle outline with corners `p0` and `p1`.
    pub fn rect(&mut self, p0: PixelPoint, p1: PixelPoint) {
        self.line((p0.0, p0.1), (p0.0, p1.1));
        self.line((p0.0, p1.1), (p1.0, p1.1));
        self.line((p1.0, p1.1), (p1.0, p0.1));
        self.line((p1.0, p0.1), (p0.0, p0.1));
    }

    /// Write a text label starting at pixel position `p`, in the current
    /// color. The position snaps to the containing cell; characters past
    /// the right edge clip, as does a row outside the grid.
    ///
    /// Double-width characters occupy two columns; their continuation cell
    /// holds a text space so frame diffing stays cell-aligned.
    pub fn text(&mut self, s: &str, p: PixelPoint) {
        let col0 = p.0.div_euclid(2);
        let row = p.1.div_euclid(4);
        if row < 0 || row >= i32::from(self.grid.size().rows) {
            return;
        }
        let row = row as u16;

        let max_col = i32::from(self.grid.size().cols);
        let mut col = col0;
        for ch in s.chars() {
            let width = ch.width().unwrap_or(0);
            if width == 0 {
                continue;
            }
            if col >= max_col {
                break;
            }
            if col >= 0 {
                if let Some(cell) = self.grid.get_mut(col as u16, row) {
                    cell.set_text(ch, self.color);
                }
                if width == 2 {
                    if let Some(cont) = self.grid.get_mut(col as u16 + 1, row) {
                        cont.set_text(' ', self.color);
                    }
                }
            }
            col += width as i32;
        }
    }

    /// Blit a raster image with its top-left corner at pixel `p`.
    ///
    /// `data` is row-major samples, 1 byte per pixel for the monochrome
    /// and grayscale modes, 3 bytes (RGB) for the color modes. A slice too
    /// short for `width × height` logs a warning and draws nothing.
    pub fn image(
        &mut self,
        data: &[u8],
        width: usize,
        height: usize,
        p: PixelPoint,
        mode: ImageMode,
        clear_block: bool,
    ) {
        let samples = width * height;
        let needed = match mode {
            ImageMode::Monochrome | ImageMode::Grayscale8 => samples,
            ImageMode::RgbBlock | ImageMode::RgbFull => samples * 3,
        };
        if data.len() < needed {
            log::warn!(
                "image data too short: {} bytes for {}x{} {:?} (need {})",
                data.len(),
                width,
                height,
                mode,
                needed
            );
            return;
        }

        match mode {
            ImageMode::Monochrome => {
                for j in 0..height {
                    for i in 0..width {
                        if data[j * width + i] != 0 {
                            self.plot((p.0 + i as i32, p.1 + j as i32), self.color, clear_block);
                        }
                    }
                }
            }
            ImageMode::Grayscale8 => {
                for j in 0..height {
                    for i in 0..width {
                        if data[j * width + i] > 127 {
                            self.plot((p.0 + i as i32, p.1 + j as i32), self.color, clear_block);
                        }
                    }
                }
            }
            ImageMode::RgbBlock => {
                let col0 = p.0.div_euclid(2);
                let row0 = p.1.div_euclid(4);
                for j in 0..height {
                    for i in 0..width {
                        let (col, row) = (col0 + i as i32, row0 + j as i32);
                        if col < 0 || row < 0 {
                            continue;
                        }
                        let base = (j * width + i) * 3;
                        let color = Rgb::new(data[base], data[base + 1], data[base + 2]);
                        if let Some(cell) = self.grid.get_mut(col as u16, row as u16) {
                            cell.set_block(color);
                        }
                    }
                }
            }
            ImageMode::RgbFull => {
                for j in 0..height {
                    for i in 0..width {
                        let base = (j * width + i) * 3;
                        let color = Rgb::new(data[base], data[base + 1], data[base + 2]);
                        self.plot((p.0 + i as i32, p.1 + j as i32), color, clear_block);
                    }
                }
            }
        }
    }

    // ── Frame output ────────────────────────────────────────────────────

    /// Diff the grid against the last-drawn snapshot into the internal
    /// output buffer, without flushing. The snapshot is brought current.
    ///
    /// The first frame, the first frame after a reshape, and every
    /// [`REFRESH_INTERVAL`]th frame repaint everything; all other frames
    /// emit only the cells that changed — possibly zero bytes.
    pub fn render(&mut self) -> RenderStats {
        let full = self.snapshot.is_none() || self.frame % REFRESH_INTERVAL == 0;
        self.out.clear();
        let stats = self
            .renderer
            .render(&mut self.out, &self.grid, self.snapshot.as_ref(), full);

        match self.snapshot.as_mut() {
            Some(snap) => snap.copy_from(&self.grid),
            None => self.snapshot = Some(self.grid.clone()),
        }
        self.frame += 1;
        log::trace!(
            "frame {}: {} cells, {} bytes{}",
            self.frame,
            stats.cells_emitted,
            stats.bytes_written,
            if full { " (full)" } else { "" }
        );
        stats
    }

    /// The bytes produced by the last [`render`](Self::render), for tests
    /// and embedding.
    #[inline]
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        self.out.as_bytes()
    }

    /// Render the frame and flush it to stdout in one write.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Io`] if the stdout write fails.
    pub fn draw(&mut self) -> Result<(), CanvasError> {
        self.render();
        self.out.flush_stdout()?;
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn canvas(cols: u16, rows: u16) -> Canvas {
        Canvas::with_size(
            Size { cols, rows },
            CanvasOptions {
                ascii: false,
                tier: Some(ColorTier::TrueColor24),
            },
        )
    }

    // ── Construction ───────────────────────────────────────────────────

    #[test]
    fn headless_construction_is_not_a_tty() {
        // Only meaningful where no terminal is attached (the usual test
        // harness situation); skip silently under a real tty.
        if term::get_size().is_none() {
            let result = Canvas::new(CanvasOptions::default());
            assert!(matches!(result, Err(CanvasError::NotATty)));
        }
    }

    #[test]
    fn pixel_size_is_derived_from_cells() {
        let c = canvas(40, 10);
        assert_eq!(c.pixel_size(), (80, 40));
    }

    // ── Point mapping ──────────────────────────────────────────────────

    #[test]
    fn point_maps_to_cell_and_dot() {
        let mut c = canvas(10, 5);
        c.point((5, 6), false);
        // Pixel (5, 6) lands in cell (2, 1), sub-position (1, 2).
        let cell = c.cell(2, 1).unwrap();
        assert_eq!(cell.dots(), braille::dot_bit(1, 2));
        assert_eq!(*c.cell(0, 0).unwrap(), crate::cell::Cell::EMPTY);
    }

    #[test]
    fn point_out_of_bounds_clips() {
        let mut c = canvas(10, 5);
        c.point((-1, 0), false);
        c.point((0, -3), false);
        c.point((20, 0), false);
        c.point((0, 20), false);
        for row in 0..5 {
            for col in 0..10 {
                assert_eq!(c.cell(col, row).unwrap().dots(), 0);
            }
        }
    }

    #[test]
    fn points_in_same_cell_accumulate() {
        let mut c = canvas(10, 5);
        c.point((0, 0), false);
        c.point((1, 3), false);
        let expected = braille::dot_bit(0, 0) | braille::dot_bit(1, 3);
        assert_eq!(c.cell(0, 0).unwrap().dots(), expected);
    }

    #[test]
    fn points_batch_with_colors() {
        let mut c = canvas(10, 5);
        let pts = [(0, 0), (2, 0)];
        let colors = [Rgb::RED, Rgb::GREEN];
        c.points(&pts, Some(&colors), false);
        assert_eq!(c.cell(0, 0).unwrap().color, Rgb::RED);
        assert_eq!(c.cell(1, 0).unwrap().color, Rgb::GREEN);
    }

    #[test]
    fn points_accumulation_is_permutation_invariant() {
        let pts = [(0, 0), (5, 6), (1, 3), (0, 1), (5, 7)];
        let mut forward = canvas(10, 5);
        forward.points(&pts, None, false);

        let mut reversed: Vec<_> = pts.to_vec();
        reversed.reverse();
        let mut backward = canvas(10, 5);
        backward.points(&reversed, None, false);

        for row in 0..5 {
            for col in 0..10 {
                assert_eq!(
                    forward.cell(col, row).unwrap().dots(),
                    backward.cell(col, row).unwrap().dots()
                );
            }
        }
    }

    #[test]
    fn points_clear_block_is_order_independent() {
        let mut c = canvas(10, 5);
        c.point((0, 0), false);
        c.point((1, 0), false);
        // Replot one dot in the same cell with the wipe flag: previous
        // dots go away, only batch dots remain.
        c.points(&[(0, 1)], None, true);
        assert_eq!(c.cell(0, 0).unwrap().dots(), braille::dot_bit(0, 1));
    }

    // ── Lines ──────────────────────────────────────────────────────────

    #[test]
    fn horizontal_line_is_half_open() {
        let mut c = canvas(10, 5);
        c.line((0, 0), (8, 0));
        // Pixels x = 0..7 set; pixel 8 (cell 4) untouched.
        for col in 0..4 {
            assert_eq!(
                c.cell(col, 0).unwrap().dots(),
                braille::dot_bit(0, 0) | braille::dot_bit(1, 0)
            );
        }
        assert_eq!(c.cell(4, 0).unwrap().dots(), 0);
    }

    #[test]
    fn vertical_line_is_a_column() {
        let mut c = canvas(10, 5);
        c.line((2, 0), (2, 8));
        // Pixels y = 0..7 in pixel column 2 (cell column 1, left dot).
        let full_left =
            braille::dot_bit(0, 0) | braille::dot_bit(0, 1) | braille::dot_bit(0, 2) | braille::dot_bit(0, 3);
        assert_eq!(c.cell(1, 0).unwrap().dots(), full_left);
        assert_eq!(c.cell(1, 1).unwrap().dots(), full_left);
        assert_eq!(c.cell(1, 2).unwrap().dots(), 0);
    }

    #[test]
    fn steep_line_steps_in_y() {
        let mut c = canvas(10, 5);
        c.line((0, 0), (2, 8));
        // One dot per y step: exactly 8 dots total.
        let mut total = 0u32;
        for row in 0..5 {
            for col in 0..10 {
                total += c.cell(col, row).unwrap().dots().count_ones();
            }
        }
        assert_eq!(total, 8);
    }

    #[test]
    fn shallow_line_steps_in_x() {
        let mut c = canvas(10, 5);
        c.line((0, 0), (8, 4));
        let mut total = 0u32;
        for row in 0..5 {
            for col in 0..10 {
                total += c.cell(col, row).unwrap().dots().count_ones();
            }
        }
        assert_eq!(total, 8);
    }

    #[test]
    fn line_with_extreme_endpoints_clips_silently() {
        let mut c = canvas(10, 5);
        // Endpoint deltas far beyond the i32 range of a subtraction.
        c.line((i32::MIN, 0), (1, 0));
        assert_eq!(c.cell(0, 0).unwrap().dots(), braille::dot_bit(0, 0));
        c.line((0, i32::MIN), (1, i32::MAX));
        c.line((i32::MAX, i32::MIN), (i32::MIN, i32::MAX));
    }

    #[test]
    fn degenerate_line_paints_nothing() {
        let mut c = canvas(10, 5);
        c.line((3, 3), (3, 3));
        for row in 0..5 {
            for col in 0..10 {
                assert_eq!(c.cell(col, row).unwrap().dots(), 0);
            }
        }
    }

    #[test]
    fn rect_outline_corners_touch() {
        let mut c = canvas(10, 10);
        c.rect((0, 0), (10, 10));
        // Top-left corner cell gets dots from both the top and left edges.
        assert_ne!(c.cell(0, 0).unwrap().dots(), 0);
        // Interior stays empty.
        assert_eq!(c.cell(2, 1).unwrap().dots(), 0);
    }

    // ── Text ───────────────────────────────────────────────────────────

    #[test]
    fn text_snaps_to_cells() {
        let mut c = canvas(20, 5);
        c.text("ok", (5, 9));
        // Pixel (5, 9) is cell (2, 2).
        let first = c.cell(2, 2).unwrap();
        assert!(first.is_text());
        assert_eq!(first.glyph, u16::from(b'o'));
        assert_eq!(c.cell(3, 2).unwrap().glyph, u16::from(b'k'));
    }

    #[test]
    fn text_clips_at_right_edge() {
        let mut c = canvas(4, 2);
        c.text("abcdef", (0, 0));
        assert_eq!(c.cell(3, 0).unwrap().glyph, u16::from(b'd'));
        // No panic, overflow characters dropped.
    }

    #[test]
    fn text_off_grid_row_is_dropped() {
        let mut c = canvas(4, 2);
        c.text("hi", (0, 100));
        c.text("hi", (0, -5));
        assert_eq!(*c.cell(0, 0).unwrap(), crate::cell::Cell::EMPTY);
    }

    #[test]
    fn wide_char_occupies_two_cells() {
        let mut c = canvas(8, 2);
        c.text("値x", (0, 0));
        assert_eq!(c.cell(0, 0).unwrap().glyph, '値' as u16);
        assert_eq!(c.cell(1, 0).unwrap().glyph, u16::from(b' '));
        assert_eq!(c.cell(2, 0).unwrap().glyph, u16::from(b'x'));
    }

    // ── Images ─────────────────────────────────────────────────────────

    #[test]
    fn monochrome_image_raises_nonzero_samples() {
        let mut c = canvas(4, 2);
        let data = [0u8, 1, 0, 255];
        c.image(&data, 2, 2, (0, 0), ImageMode::Monochrome, false);
        let expected = braille::dot_bit(1, 0) | braille::dot_bit(1, 1);
        assert_eq!(c.cell(0, 0).unwrap().dots(), expected);
    }

    #[test]
    fn grayscale_image_thresholds_at_128() {
        let mut c = canvas(4, 2);
        let data = [127u8, 128];
        c.image(&data, 2, 1, (0, 0), ImageMode::Grayscale8, false);
        assert_eq!(c.cell(0, 0).unwrap().dots(), braille::dot_bit(1, 0));
    }

    #[test]
    fn rgb_block_image_fills_cells() {
        let mut c = canvas(4, 2);
        let data = [255u8, 0, 0, 0, 255, 0];
        c.image(&data, 2, 1, (0, 0), ImageMode::RgbBlock, false);
        let left = c.cell(0, 0).unwrap();
        assert_eq!(left.glyph, braille::FULL_BLOCK);
        assert_eq!(left.color, Rgb::RED);
        assert_eq!(c.cell(1, 0).unwrap().color, Rgb::GREEN);
    }

    #[test]
    fn rgb_full_image_colors_per_dot() {
        let mut c = canvas(4, 2);
        let data = [0u8, 0, 255];
        c.image(&data, 1, 1, (0, 0), ImageMode::RgbFull, false);
        let cell = c.cell(0, 0).unwrap();
        assert_eq!(cell.dots(), braille::dot_bit(0, 0));
        assert_eq!(cell.color, Rgb::BLUE);
    }

    #[test]
    fn short_image_data_draws_nothing() {
        let mut c = canvas(4, 2);
        c.image(&[1u8, 2], 2, 2, (0, 0), ImageMode::Monochrome, false);
        c.image(&[1u8, 2, 3], 2, 2, (0, 0), ImageMode::RgbFull, false);
        assert_eq!(*c.cell(0, 0).unwrap(), crate::cell::Cell::EMPTY);
    }

    // ── Frame lifecycle ────────────────────────────────────────────────

    #[test]
    fn first_render_is_full() {
        let mut c = canvas(10, 5);
        let stats = c.render();
        assert_eq!(stats.cells_emitted, 50);
        assert!(stats.bytes_written > 0);
    }

    #[test]
    fn unchanged_frame_emits_zero_bytes() {
        let mut c = canvas(10, 5);
        c.point((3, 3), false);
        c.render();
        let stats = c.render();
        assert_eq!(stats.cells_emitted, 0);
        assert_eq!(stats.bytes_written, 0);
        assert!(c.output_bytes().is_empty());
    }

    #[test]
    fn change_emits_only_dirty_cells() {
        let mut c = canvas(10, 5);
        c.render();
        c.point((0, 0), false);
        let stats = c.render();
        assert_eq!(stats.cells_emitted, 1);
    }

    #[test]
    fn clear_diffs_against_previous_content() {
        let mut c = canvas(10, 5);
        c.point((0, 0), false);
        c.point((10, 10), false);
        c.render();
        c.clear();
        let stats = c.render();
        assert_eq!(stats.cells_emitted, 2);
    }

    #[test]
    fn periodic_refresh_repaints_everything() {
        let mut c = canvas(4, 2);
        c.render(); // frame 0, full
        for _ in 1..100 {
            let stats = c.render();
            assert_eq!(stats.bytes_written, 0);
        }
        // Frame counter hits the refresh interval: full repaint despite
        // no mutation.
        let stats = c.render();
        assert_eq!(stats.cells_emitted, 8);
    }

    #[test]
    fn reshape_forces_full_repaint() {
        let mut c = canvas(10, 5);
        c.render();
        c.set_fixed_size(Size { cols: 8, rows: 4 });
        assert!(c.update_shape());
        assert_eq!(c.size(), Size { cols: 8, rows: 4 });
        let stats = c.render();
        assert_eq!(stats.cells_emitted, 32);
    }

    #[test]
    fn update_shape_without_change_is_false() {
        let mut c = canvas(10, 5);
        assert!(!c.update_shape());
    }

    #[test]
    fn ascii_canvas_renders_ascii_bytes() {
        let mut c = Canvas::with_size(
            Size { cols: 4, rows: 2 },
            CanvasOptions {
                ascii: true,
                tier: Some(ColorTier::Monochrome),
            },
        );
        c.point((0, 0), false);
        c.render();
        let output = String::from_utf8(c.output_bytes().to_vec()).unwrap();
        assert!(!output.contains('⠁'));
    }
}
