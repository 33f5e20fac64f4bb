// SPDX-License-Identifier: MIT
//
// ScopeSeries — a fixed-width scrolling sample window — and the "nice
// number" axis autoscaling it feeds.
//
// The ring is allocated once and never resized; NaN marks slots that have
// not been written yet (or deliberately broken samples), so a fresh series
// plots as nothing rather than as a line at zero. The oldest sample is
// always exactly N updates stale.

/// Fixed-capacity ring buffer of samples, oldest-first iteration.
#[derive(Debug, Clone)]
pub struct ScopeSeries {
    samples: Vec<f64>,
    cursor: usize,
}

impl ScopeSeries {
    /// A series of `capacity` unset (NaN) slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "series capacity must be nonzero");
        Self {
            samples: vec![f64::NAN; capacity],
            cursor: 0,
        }
    }

    /// The fixed window width.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// Overwrite the slot at the cursor and advance it.
    pub fn update(&mut self, value: f64) {
        self.samples[self.cursor] = value;
        self.cursor = (self.cursor + 1) % self.samples.len();
    }

    /// Samples oldest to newest. Unset slots come through as NaN.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        let n = self.samples.len();
        (0..n).map(move |i| self.samples[(self.cursor + i) % n])
    }

    /// Minimum and maximum over the finite samples, or `None` if there
    /// are none.
    #[must_use]
    pub fn finite_bounds(&self) -> Option<(f64, f64)> {
        let mut bounds: Option<(f64, f64)> = None;
        for v in self.iter().filter(|v| v.is_finite()) {
            bounds = Some(match bounds {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            });
        }
        bounds
    }

    /// Autoscaled plot range: upper bound is the nice bound of the
    /// largest magnitude; lower bound is 0 for all-nonnegative data and
    /// symmetric `-upper` otherwise. `None` when no sample is finite.
    #[must_use]
    pub fn auto_range(&self) -> Option<(f64, f64)> {
        let (lo, hi) = self.finite_bounds()?;
        let upper = nice_bound(lo.abs().max(hi.abs()));
        if upper == 0.0 {
            return Some((0.0, 0.0));
        }
        let lower = if lo >= 0.0 { 0.0 } else { -upper };
        Some((lower, upper))
    }
}

/// Round `x` away from zero to the nearest `{1, 2, 5} × 10^k` magnitude,
/// preserving sign. `nice_bound(37.0) == 50.0`. Zero and non-finite
/// values come back as 0.
#[must_use]
pub fn nice_bound(x: f64) -> f64 {
    if !x.is_finite() || x == 0.0 {
        return 0.0;
    }
    let mag = x.abs();
    let k = mag.log10().ceil();
    let decade = 10f64.powf(k - 1.0);
    let bound = if mag <= 2.0 * decade {
        2.0 * decade
    } else if mag <= 5.0 * decade {
        5.0 * decade
    } else {
        10.0 * decade
    };
    bound.copysign(x)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
