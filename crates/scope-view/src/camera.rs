// SPDX-License-Identifier: MIT
//
// Camera — animated 3D orbit state and perspective projection.
//
// The camera orbits the world origin: spin rotates about the vertical
// axis, tilt pitches the result toward the viewer, and the camera sits
// `distance` behind the rotated origin. Rotation is a plain 3×3 matrix,
// recomputed only when spin or tilt actually moved this frame. Points
// behind the near plane are culled before the perspective divide can
// blow up. Depth shades each surviving point between a near and a far
// hue so structure reads even on a flat cloud.

use std::time::{Duration, Instant};

use scope_canvas::{KeyToken, PixelPoint, Rgb};

use crate::anim::Animated;

/// Camera glide duration (slower than the 2D viewport on purpose).
const ANIM_DURATION: Duration = Duration::from_secs(1);

/// Radians per arrow press.
const ANGLE_STEP: f64 = 0.2;

/// Zoom factor per `+`/`-` press.
const ZOOM_FACTOR: f64 = 1.5;

/// Distance change per `[`/`]` press, and the closest approach allowed.
const DISTANCE_STEP: f64 = 0.5;
const MIN_DISTANCE: f64 = 1.5;

/// Depth shading endpoints: warm when close, cold when far.
const NEAR_COLOR: Rgb = Rgb::new(255, 200, 0);
const FAR_COLOR: Rgb = Rgb::new(0, 80, 255);

// ─── Mat3 ────────────────────────────────────────────────────────────────────

/// A 3×3 rotation matrix, row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3(pub [[f64; 3]; 3]);

impl Mat3 {
    pub const IDENTITY: Self = Self([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

    /// Rotation about the vertical (z) axis.
    #[must_use]
    pub fn spin(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self([[cos, -sin, 0.0], [sin, cos, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Rotation about the x axis (pitch toward the viewer).
    #[must_use]
    pub fn tilt(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self([[1.0, 0.0, 0.0], [0.0, cos, -sin], [0.0, sin, cos]])
    }

    /// Matrix product `self × other`.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        let mut out = [[0.0; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, entry) in row.iter_mut().enumerate() {
                *entry = (0..3).map(|k| self.0[i][k] * other.0[k][j]).sum();
            }
        }
        Self(out)
    }

    /// Apply to a column vector.
    #[must_use]
    pub fn apply(&self, v: [f64; 3]) -> [f64; 3] {
        let dot = |row: &[f64; 3]| row[0] * v[0] + row[1] * v[1] + row[2] * v[2];
        [dot(&self.0[0]), dot(&self.0[1]), dot(&self.0[2])]
    }
}

// ─── Camera ──────────────────────────────────────────────────────────────────

/// Animated orbit camera with a cached rotation matrix.
#[derive(Debug, Clone)]
pub struct Camera {
    spin: Animated,
    tilt: Animated,
    distance: Animated,
    scale: Animated,
    rotation: Mat3,
    /// Angles the cached rotation was built from.
    rotation_spin: f64,
    rotation_tilt: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// A camera with a gentle default pose: slight tilt, medium distance.
    #[must_use]
    pub fn new() -> Self {
        let mut cam = Self {
            spin: Animated::new(0.0, ANIM_DURATION),
            tilt: Animated::new(0.5, ANIM_DURATION),
            distance: Animated::new(4.0, ANIM_DURATION),
            scale: Animated::new(1.0, ANIM_DURATION),
            rotation: Mat3::IDENTITY,
            rotation_spin: f64::NAN,
            rotation_tilt: f64::NAN,
        };
        cam.refresh_rotation();
        cam
    }

    /// Jump the whole pose without animating, for startup and tests.
    pub fn set_pose(&mut self, spin: f64, tilt: f64, distance: f64, scale: f64) {
        self.spin.snap(spin);
        self.tilt.snap(tilt);
        self.distance.snap(distance);
        self.scale.snap(scale);
        self.refresh_rotation();
    }

    #[inline]
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance.current()
    }

    #[inline]
    #[must_use]
    pub const fn rotation(&self) -> &Mat3 {
        &self.rotation
    }

    fn refresh_rotation(&mut self) {
        self.rotation_spin = self.spin.current();
        self.rotation_tilt = self.tilt.current();
        self.rotation = Mat3::tilt(self.rotation_tilt).mul(&Mat3::spin(self.rotation_spin));
    }

    /// Step all animations to `now`, rebuilding the rotation matrix only
    /// when an angle actually moved.
    pub fn advance(&mut self, now: Instant) {
        self.spin.advance(now);
        self.tilt.advance(now);
        self.distance.advance(now);
        self.scale.advance(now);
        if self.spin.current() != self.rotation_spin || self.tilt.current() != self.rotation_tilt
        {
            self.refresh_rotation();
        }
    }

    /// Apply a key press to the animation targets. Returns `true` if the
    /// token was handled.
    ///
    /// Arrows orbit, `+`/`-` zoom, `[`/`]` dolly in and out.
    pub fn keypress(&mut self, key: KeyToken, now: Instant) -> bool {
        match key {
            KeyToken::Left => self.spin.nudge_target(-ANGLE_STEP, now),
            KeyToken::Right => self.spin.nudge_target(ANGLE_STEP, now),
            KeyToken::Up => self.tilt.nudge_target(ANGLE_STEP, now),
            KeyToken::Down => self.tilt.nudge_target(-ANGLE_STEP, now),
            KeyToken::Char('+' | '=') => self.scale.scale_target(ZOOM_FACTOR, now),
            KeyToken::Char('-') => {
                let target = self.scale.target() / ZOOM_FACTOR;
                self.scale.set_target(target, now);
            }
            KeyToken::Char('[') => {
                let target = (self.distance.target() - DISTANCE_STEP).max(MIN_DISTANCE);
                self.distance.set_target(target, now);
            }
            KeyToken::Char(']') => self.distance.nudge_target(DISTANCE_STEP, now),
            _ => return false,
        }
        true
    }

    /// Project a world point, returning its pixel position and a
    /// depth-shaded color, or `None` when culled or off-screen.
    ///
    /// Points with rotated z at or behind `1 - distance` sit behind the
    /// near plane and are discarded before the perspective divide.
    #[must_use]
    pub fn project(&self, world: [f64; 3], pixel_shape: (u32, u32)) -> Option<(PixelPoint, Rgb)> {
        let w = f64::from(pixel_shape.0);
        let h = f64::from(pixel_shape.1);
        if w <= 0.0 || h <= 0.0 {
            return None;
        }

        let r = self.rotation.apply(world);
        let d = self.distance.current();
        if r[2] <= 1.0 - d {
            return None;
        }

        let denom = r[2] + d;
        let s = self.scale.current();
        let sx = w / 2.0 + (r[0] / denom) * s * (w / 2.0);
        let sy = h / 2.0 - (r[1] / denom) * s * (h / 2.0);

        if !sx.is_finite() || !sy.is_finite() {
            return None;
        }
        if sx < 0.0 || sx >= w || sy < 0.0 || sy >= h {
            return None;
        }

        #[allow(clippy::cast_possible_truncation)]
        Some(((sx as i32, sy as i32), depth_color(r[2])))
    }
}

/// Clamped linear depth shading between the near and far hues.
#[must_use]
fn depth_color(z: f64) -> Rgb {
    let t = (z + 1.0) / 2.0;
    NEAR_COLOR.lerp(FAR_COLOR, t)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
