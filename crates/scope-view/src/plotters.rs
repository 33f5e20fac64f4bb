// SPDX-License-Identifier: MIT
//
// Plotters — series and angles rendered as canvas primitives.
//
// A plotter owns its screen-space rectangle in pixel coordinates and
// knows nothing about messages or threads: `plot()` is a pure
// series-to-primitives pass over a borrowed canvas. Axis range comes
// from explicit bounds when the caller has them and from nice-number
// autoscaling otherwise.

use scope_canvas::{Canvas, PixelPoint};

use crate::series::ScopeSeries;

/// A plotter's rectangle on the canvas, in pixel coordinates.
/// `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PlotBounds {
    /// The full pixel area of a canvas.
    #[must_use]
    pub fn full(pixel_shape: (u32, u32)) -> Self {
        #[allow(clippy::cast_possible_wrap)]
        Self {
            left: 0,
            top: 0,
            right: pixel_shape.0 as i32,
            bottom: pixel_shape.1 as i32,
        }
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    #[inline]
    #[must_use]
    pub const fn center(&self) -> PixelPoint {
        (
            (self.left + self.right) / 2,
            (self.top + self.bottom) / 2,
        )
    }
}

// ─── ScopePlotter ────────────────────────────────────────────────────────────

/// A scrolling oscilloscope-style line plot of one scalar series.
#[derive(Debug, Clone)]
pub struct ScopePlotter {
    series: ScopeSeries,
    bounds: PlotBounds,
    /// Fixed y range; `None` autoscales from the data each frame.
    range: Option<(f64, f64)>,
    title: Option<String>,
}

impl ScopePlotter {
    #[must_use]
    pub fn new(capacity: usize, bounds: PlotBounds) -> Self {
        Self {
            series: ScopeSeries::new(capacity),
            bounds,
            range: None,
            title: None,
        }
    }

    /// Pin the y axis instead of autoscaling.
    #[must_use]
    pub fn with_range(mut self, ymin: f64, ymax: f64) -> Self {
        self.range = Some((ymin, ymax));
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Push the next sample into the scrolling window.
    pub fn update(&mut self, value: f64) {
        self.series.update(value);
    }

    /// Move the plot rectangle (after a canvas reshape).
    pub const fn set_bounds(&mut self, bounds: PlotBounds) {
        self.bounds = bounds;
    }

    #[must_use]
    pub const fn series(&self) -> &ScopeSeries {
        &self.series
    }

    /// Render the window into the canvas: polyline over finite samples,
    /// bound labels, optional title. An all-NaN series plots nothing.
    pub fn plot(&self, canvas: &mut Canvas) {
        let Some((ymin, ymax)) = self.range.or_else(|| self.series.auto_range()) else {
            return;
        };
        if ymax <= ymin || self.bounds.width() <= 1 || self.bounds.height() <= 1 {
            return;
        }

        let b = self.bounds;
        let n = self.series.capacity();
        let span = ymax - ymin;

        let mut prev: Option<PixelPoint> = None;
        for (i, v) in self.series.iter().enumerate() {
            if !v.is_finite() {
                // A gap in the data breaks the line; never interpolate
                // through it.
                prev = None;
                continue;
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
            let x = b.left + ((b.width() - 1) as f64 * i as f64 / (n - 1) as f64) as i32;
            #[allow(clippy::cast_possible_truncation)]
            let y = b.bottom - 1 - ((f64::from(b.height() - 1)) * (v - ymin) / span) as i32;
            let p = (x, y);
            if let Some(prev) = prev {
                canvas.line(prev, p);
            }
            canvas.point(p, false);
            prev = Some(p);
        }

        canvas.text(&format_bound(ymax), (b.left, b.top));
        let mid = (ymin + ymax) / 2.0;
        canvas.text(&format_bound(mid), (b.left, (b.top + b.bottom) / 2));
        canvas.text(&format_bound(ymin), (b.left, b.bottom - 4));

        if let Some(title) = &self.title {
            #[allow(clippy::cast_possible_wrap)]
            let tx = b.center().0 - title.len() as i32;
            canvas.text(title, (tx.max(b.left), b.top));
        }
    }
}

/// Compact axis label: trims trailing noise from whole-ish numbers.
fn format_bound(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e9 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

// ─── AnglePlotter ────────────────────────────────────────────────────────────

/// A dial gauge: bounding box plus a needle from the center.
#[derive(Debug, Clone)]
pub struct AnglePlotter {
    bounds: PlotBounds,
    title: Option<String>,
}

impl AnglePlotter {
    #[must_use]
    pub const fn new(bounds: PlotBounds) -> Self {
        Self {
            bounds,
            title: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub const fn set_bounds(&mut self, bounds: PlotBounds) {
        self.bounds = bounds;
    }

    /// Render the gauge with the needle at `angle` radians
    /// (0 = right, counterclockwise positive).
    pub fn plot(&self, canvas: &mut Canvas, angle: f64) {
        let b = self.bounds;
        if b.width() <= 2 || b.height() <= 2 {
            return;
        }

        canvas.rect((b.left, b.top), (b.right - 1, b.bottom - 1));

        let center = b.center();
        let rx = f64::from(b.width() / 2 - 1);
        let ry = f64::from(b.height() / 2 - 1);
        #[allow(clippy::cast_possible_truncation)]
        let tip = (
            center.0 + (angle.cos() * rx) as i32,
            center.1 - (angle.sin() * ry) as i32,
        );
        canvas.line(center, tip);
        canvas.point(tip, false);

        if let Some(title) = &self.title {
            canvas.text(title, (b.left + 2, b.top));
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scope_canvas::{CanvasOptions, ColorTier, Size};

    fn canvas(cols: u16, rows: u16) -> Canvas {
        Canvas::with_size(
            Size { cols, rows },
            CanvasOptions {
                ascii: false,
                tier: Some(ColorTier::Monochrome),
            },
        )
    }

    fn dot_count(c: &Canvas) -> u32 {
        let size = c.size();
        let mut total = 0;
        for row in 0..size.rows {
            for col in 0..size.cols {
                total += u32::from(c.cell(col, row).unwrap().dots().count_ones());
            }
        }
        total
    }

    fn has_text(c: &Canvas) -> bool {
        let size = c.size();
        (0..size.rows)
            .any(|row| (0..size.cols).any(|col| c.cell(col, row).unwrap().is_text()))
    }

    #[test]
    fn bounds_helpers() {
        let b = PlotBounds::full((80, 40));
        assert_eq!(b.width(), 80);
        assert_eq!(b.height(), 40);
        assert_eq!(b.center(), (40, 20));
    }

    #[test]
    fn empty_series_plots_nothing() {
        let mut c = canvas(40, 10);
        let p = ScopePlotter::new(16, PlotBounds::full(c.pixel_size()));
        p.plot(&mut c);
        assert_eq!(dot_count(&c), 0);
        assert!(!has_text(&c));
    }

    #[test]
    fn single_sample_draws_point_and_labels() {
        let mut c = canvas(40, 10);
        let mut p = ScopePlotter::new(16, PlotBounds::full(c.pixel_size()));
        p.update(37.0);
        p.plot(&mut c);
        assert!(dot_count(&c) >= 1);
        assert!(has_text(&c));
    }

    #[test]
    fn autoscaled_label_is_nice_bound() {
        let mut c = canvas(40, 10);
        let mut p = ScopePlotter::new(16, PlotBounds::full(c.pixel_size()));
        p.update(37.0);
        p.plot(&mut c);
        // Top-left cells spell out the upper bound "50".
        assert_eq!(c.cell(0, 0).unwrap().glyph, u16::from(b'5'));
        assert_eq!(c.cell(1, 0).unwrap().glyph, u16::from(b'0'));
    }

    #[test]
    fn nan_breaks_the_polyline() {
        let mut dense = canvas(40, 10);
        let mut gappy = canvas(40, 10);
        let bounds = PlotBounds::full(dense.pixel_size());

        let mut p = ScopePlotter::new(5, bounds).with_range(0.0, 10.0);
        for v in [2.0, 4.0, 6.0, 8.0, 9.0] {
            p.update(v);
        }
        p.plot(&mut dense);

        let mut q = ScopePlotter::new(5, bounds).with_range(0.0, 10.0);
        for v in [2.0, 4.0, f64::NAN, 8.0, 9.0] {
            q.update(v);
        }
        q.plot(&mut gappy);

        assert!(dot_count(&gappy) < dot_count(&dense));
    }

    #[test]
    fn larger_values_render_higher() {
        let mut c = canvas(40, 10);
        let bounds = PlotBounds::full(c.pixel_size());
        let mut p = ScopePlotter::new(2, bounds).with_range(0.0, 10.0);
        p.update(1.0);
        p.update(9.0);
        p.plot(&mut c);
        // Low sample at the left edge, high sample at the right: the
        // right column's dots must sit above the left column's.
        let (w, _) = c.pixel_size();
        let low_col = 0u16;
        #[allow(clippy::cast_possible_truncation)]
        let high_col = (w as u16 - 1) / 2;
        let row_of = |col: u16| {
            (0..c.size().rows).find(|&row| c.cell(col, row).unwrap().dots() != 0)
        };
        let low_row = row_of(low_col).unwrap();
        let high_row = row_of(high_col).unwrap();
        assert!(high_row < low_row);
    }

    #[test]
    fn degenerate_bounds_plot_nothing() {
        let mut c = canvas(40, 10);
        let mut p = ScopePlotter::new(4, PlotBounds {
            left: 0,
            top: 0,
            right: 1,
            bottom: 1,
        });
        p.update(1.0);
        p.plot(&mut c);
        assert_eq!(dot_count(&c), 0);
    }

    #[test]
    fn dial_draws_border_and_needle() {
        let mut c = canvas(20, 10);
        let p = AnglePlotter::new(PlotBounds::full(c.pixel_size()));
        p.plot(&mut c, 0.0);
        // Needle at angle 0 extends right from the center along the
        // center pixel row.
        let center = PlotBounds::full(c.pixel_size()).center();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let cell = c
            .cell((center.0 / 2 + 2) as u16, (center.1 / 4) as u16)
            .unwrap();
        assert_ne!(cell.dots(), 0);
        // Border corner present.
        assert_ne!(c.cell(0, 0).unwrap().dots(), 0);
    }

    #[test]
    fn tiny_dial_is_skipped() {
        let mut c = canvas(20, 10);
        let p = AnglePlotter::new(PlotBounds {
            left: 0,
            top: 0,
            right: 2,
            bottom: 2,
        });
        p.plot(&mut c, 1.0);
        assert_eq!(dot_count(&c), 0);
    }
}
