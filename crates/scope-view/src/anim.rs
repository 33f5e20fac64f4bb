// SPDX-License-Identifier: MIT
//
// Animated — a scalar that eases toward its target.
//
// Every smooth motion in the system (pan, zoom, spin, tilt, camera
// distance) is one of these: a (current, target, start, duration) tuple
// advanced once per frame. Each target change restarts the clock, so a
// burst of key presses keeps re-extending the glide instead of queueing.
// The blend runs from wherever `current` happens to be, which gives the
// characteristic decelerating feel without any easing curve.
//
// Time is injected as `Instant` parameters so tests own the clock.

use std::time::{Duration, Instant};

/// A scalar animated linearly from its current value to a target over a
/// fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct Animated {
    current: f64,
    target: f64,
    start: Instant,
    duration: Duration,
}

impl Animated {
    /// Create a settled scalar (current == target == `value`).
    #[must_use]
    pub fn new(value: f64, duration: Duration) -> Self {
        Self {
            current: value,
            target: value,
            start: Instant::now(),
            duration,
        }
    }

    /// The animated value as of the last [`advance`](Self::advance).
    #[inline]
    #[must_use]
    pub const fn current(&self) -> f64 {
        self.current
    }

    /// The value being eased toward.
    #[inline]
    #[must_use]
    pub const fn target(&self) -> f64 {
        self.target
    }

    /// Whether the animation has converged.
    #[inline]
    #[must_use]
    pub fn is_settled(&self) -> bool {
        (self.current - self.target).abs() < f64::EPSILON
    }

    /// Set a new target and restart the animation clock.
    pub const fn set_target(&mut self, target: f64, now: Instant) {
        self.target = target;
        self.start = now;
    }

    /// Shift the target by `delta` (pan keys), restarting the clock.
    pub const fn nudge_target(&mut self, delta: f64, now: Instant) {
        self.set_target(self.target + delta, now);
    }

    /// Multiply the target by `factor` (zoom keys), restarting the clock.
    pub const fn scale_target(&mut self, factor: f64, now: Instant) {
        self.set_target(self.target * factor, now);
    }

    /// Jump both current and target to `value`, no animation.
    pub const fn snap(&mut self, value: f64) {
        self.current = value;
        self.target = value;
    }

    /// Advance the animation to time `now` and return the new current
    /// value.
    ///
    /// `fraction = clamp(elapsed / duration, 0, 1)`, then current blends
    /// `(1-fraction)*current + fraction*target`. At fraction 1 the value
    /// snaps exactly to the target, so a settled scalar never drifts.
    pub fn advance(&mut self, now: Instant) -> f64 {
        if self.current == self.target {
            return self.current;
        }
        let elapsed = now.saturating_duration_since(self.start);
        let fraction = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0);
        if fraction >= 1.0 {
            self.current = self.target;
        } else {
            self.current = (1.0 - fraction) * self.current + fraction * self.target;
        }
        self.current
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
