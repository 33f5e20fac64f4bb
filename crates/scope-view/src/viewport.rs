// SPDX-License-Identifier: MIT
//
// Viewport — animated 2D pan/zoom and the world-to-screen projection.
//
// The viewport shows a square window of world space, `2 × scale` wide,
// centered on (offset_x, offset_y). The vertical half-extent follows the
// pixel aspect ratio so world circles stay round. Screen y grows downward
// while world y grows upward, so the projection flips the vertical axis.

use std::time::{Duration, Instant};

use scope_canvas::{KeyToken, PixelPoint};

use crate::anim::Animated;

/// Pan/zoom glide duration.
const ANIM_DURATION: Duration = Duration::from_millis(500);

/// Zoom step per key press.
const ZOOM_FACTOR: f64 = 1.5;

/// Pan step, as a fraction of the current scale.
const PAN_FRACTION: f64 = 0.1;

/// Animated 2D view state: scale plus offsets, all eased over 0.5 s.
#[derive(Debug, Clone)]
pub struct Viewport {
    scale: Animated,
    offset_x: Animated,
    offset_y: Animated,
}

impl Viewport {
    /// A viewport centered on the origin with the given half-extent.
    #[must_use]
    pub fn new(scale: f64) -> Self {
        Self {
            scale: Animated::new(scale, ANIM_DURATION),
            offset_x: Animated::new(0.0, ANIM_DURATION),
            offset_y: Animated::new(0.0, ANIM_DURATION),
        }
    }

    /// Current half-extent of the view in world units.
    #[inline]
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale.current()
    }

    /// Current view center in world coordinates.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> (f64, f64) {
        (self.offset_x.current(), self.offset_y.current())
    }

    /// Step all animations forward to `now`.
    pub fn advance(&mut self, now: Instant) {
        self.scale.advance(now);
        self.offset_x.advance(now);
        self.offset_y.advance(now);
    }

    /// Apply a key press to the animation targets. Returns `true` if the
    /// token was handled.
    ///
    /// Arrows pan by a tenth of the current scale; `+`/`=` zoom in,
    /// `-` zooms out. Everything else is ignored.
    ///
    /// Up and left raise the offsets, down and right lower them: the
    /// arrows slide the view window, so the content drifts the other way.
    pub fn keypress(&mut self, key: KeyToken, now: Instant) -> bool {
        let pan = self.scale.current() * PAN_FRACTION;
        match key {
            KeyToken::Up => self.offset_y.nudge_target(pan, now),
            KeyToken::Down => self.offset_y.nudge_target(-pan, now),
            KeyToken::Left => self.offset_x.nudge_target(pan, now),
            KeyToken::Right => self.offset_x.nudge_target(-pan, now),
            KeyToken::Char('+' | '=') => {
                let target = self.scale.target() / ZOOM_FACTOR;
                self.scale.set_target(target, now);
            }
            KeyToken::Char('-') => self.scale.scale_target(ZOOM_FACTOR, now),
            _ => return false,
        }
        true
    }

    /// Project a world point into pixel space for the given pixel shape.
    ///
    /// Returns `None` for non-finite results and anything outside
    /// `[0, w) × [0, h)` — dropped here so the canvas never sees it.
    #[must_use]
    pub fn project(&self, world: [f64; 2], pixel_shape: (u32, u32)) -> Option<PixelPoint> {
        let w = f64::from(pixel_shape.0);
        let h = f64::from(pixel_shape.1);
        if w <= 0.0 || h <= 0.0 {
            return None;
        }

        let x_half = self.scale.current();
        let y_half = x_half * h / w;
        let sx = w * (world[0] - self.offset_x.current() + x_half) / (2.0 * x_half);
        let sy = h * (1.0 - (world[1] - self.offset_y.current() + y_half) / (2.0 * y_half));

        if !sx.is_finite() || !sy.is_finite() {
            return None;
        }
        if sx < 0.0 || sx >= w || sy < 0.0 || sy >= h {
            return None;
        }
        #[allow(clippy::cast_possible_truncation)]
        Some((sx as i32, sy as i32))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SHAPE: (u32, u32) = (160, 80);

    #[test]
    fn origin_projects_to_center() {
        let vp = Viewport::new(10.0);
        assert_eq!(vp.project([0.0, 0.0], SHAPE), Some((80, 40)));
    }

    #[test]
    fn world_up_is_screen_up() {
        let vp = Viewport::new(10.0);
        let (_, y_origin) = vp.project([0.0, 0.0], SHAPE).unwrap();
        let (_, y_above) = vp.project([0.0, 2.0], SHAPE).unwrap();
        assert!(y_above < y_origin);
    }

    #[test]
    fn right_edge_is_excluded() {
        let vp = Viewport::new(10.0);
        // world x == +scale maps exactly onto the excluded right edge.
        assert_eq!(vp.project([10.0, 0.0], SHAPE), None);
        assert!(vp.project([9.9, 0.0], SHAPE).is_some());
    }

    #[test]
    fn out_of_view_points_are_dropped() {
        let vp = Viewport::new(1.0);
        assert_eq!(vp.project([5.0, 0.0], SHAPE), None);
        assert_eq!(vp.project([0.0, -50.0], SHAPE), None);
    }

    #[test]
    fn non_finite_world_points_are_dropped() {
        let vp = Viewport::new(1.0);
        assert_eq!(vp.project([f64::NAN, 0.0], SHAPE), None);
        assert_eq!(vp.project([0.0, f64::INFINITY], SHAPE), None);
    }

    #[test]
    fn zero_shape_drops_everything() {
        let vp = Viewport::new(1.0);
        assert_eq!(vp.project([0.0, 0.0], (0, 0)), None);
    }

    #[test]
    fn aspect_ratio_follows_pixel_shape() {
        // On a 2:1 pixel shape the vertical half-extent is half the scale,
        // so world y == scale/2 lands on the topmost pixel row and anything
        // above it is dropped.
        let vp = Viewport::new(10.0);
        assert_eq!(vp.project([0.0, 5.0], SHAPE), Some((80, 0)));
        assert_eq!(vp.project([0.0, 5.1], SHAPE), None);
    }

    #[test]
    fn zoom_keys_move_scale_target() {
        let t0 = Instant::now();
        let mut vp = Viewport::new(3.0);
        assert!(vp.keypress(KeyToken::Char('+'), t0));
        assert_eq!(vp.scale.target(), 2.0);
        assert!(vp.keypress(KeyToken::Char('-'), t0));
        assert_eq!(vp.scale.target(), 3.0);
    }

    #[test]
    fn pan_keys_move_offset_targets() {
        let t0 = Instant::now();
        let mut vp = Viewport::new(10.0);
        assert!(vp.keypress(KeyToken::Left, t0));
        assert!(vp.keypress(KeyToken::Up, t0));
        assert_eq!(vp.offset_x.target(), 1.0);
        assert_eq!(vp.offset_y.target(), 1.0);
    }

    #[test]
    fn pan_direction_per_axis() {
        // Up and left raise the offsets, down and right lower them.
        let t0 = Instant::now();
        let mut vp = Viewport::new(10.0);
        vp.keypress(KeyToken::Left, t0);
        assert_eq!(vp.offset_x.target(), 1.0);
        vp.keypress(KeyToken::Right, t0);
        vp.keypress(KeyToken::Right, t0);
        assert_eq!(vp.offset_x.target(), -1.0);
        vp.keypress(KeyToken::Down, t0);
        assert_eq!(vp.offset_y.target(), -1.0);
    }

    #[test]
    fn unhandled_keys_are_reported() {
        let mut vp = Viewport::new(1.0);
        assert!(!vp.keypress(KeyToken::Char('z'), Instant::now()));
    }

    #[test]
    fn pan_then_advance_converges() {
        let t0 = Instant::now();
        let mut vp = Viewport::new(10.0);
        vp.keypress(KeyToken::Right, t0);
        vp.advance(t0 + Duration::from_secs(1));
        assert_eq!(vp.offset(), (-1.0, 0.0));
    }
}
