// SPDX-License-Identifier: MIT
//
// Color model and terminal color-tier selection.
//
// The canvas works in 24-bit RGB internally. What reaches the terminal
// depends on the negotiated ColorTier: the full 38;2;r;g;b form, a crude
// 3-bit channel threshold for 16-color terminals, or nothing at all in
// monochrome. The tier is fixed for the canvas's lifetime — picked
// explicitly by the caller or autodetected once from environment hints.
//
// Autodetection is heuristic by nature. COLORTERM=truecolor is a strong
// signal; TERM names are weaker. The caller can always override, and the
// heuristic is never treated as authoritative anywhere else in the crate.

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const RED: Self = Self::new(255, 0, 0);
    pub const GREEN: Self = Self::new(0, 255, 0);
    pub const YELLOW: Self = Self::new(255, 255, 0);
    pub const BLUE: Self = Self::new(0, 0, 255);
    pub const MAGENTA: Self = Self::new(255, 0, 255);
    pub const CYAN: Self = Self::new(0, 255, 255);
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Collapse to a 3-bit ANSI color index (one threshold per channel).
    ///
    /// Bit layout follows the classic SGR 30–37 ordering: blue is the high
    /// bit, red the low bit. `Rgb::WHITE` maps to 7, `Rgb::RED` to 1.
    #[inline]
    #[must_use]
    pub const fn to_3bit(self) -> u8 {
        ((self.b > 127) as u8) << 2 | ((self.g > 127) as u8) << 1 | (self.r > 127) as u8
    }

    /// Linear interpolation between two colors, `t` clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let ch = |a: u8, b: u8| -> u8 {
            let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                v.round().clamp(0.0, 255.0) as u8
            }
        };
        Self::new(ch(self.r, other.r), ch(self.g, other.g), ch(self.b, other.b))
    }
}

// ─── ColorTier ──────────────────────────────────────────────────────────────

/// Terminal color capability. Fixed for the lifetime of a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTier {
    /// No color escapes at all.
    Monochrome,
    /// 16-color terminals: RGB collapsed through a per-channel threshold
    /// to SGR 30–37.
    Ansi16,
    /// 24-bit truecolor (`ESC[38;2;r;g;bm`).
    TrueColor24,
}

impl ColorTier {
    /// Best-effort tier detection from `COLORTERM` / `TERM` hints.
    ///
    /// `COLORTERM` set to `truecolor` or `24bit` wins. Otherwise common
    /// xterm-family `TERM` values get truecolor (matching how virtually
    /// every emulator that sets them behaves today) and anything else
    /// falls back to 16 colors. Never returns `Monochrome` — that tier
    /// is opt-in only.
    #[must_use]
    pub fn detect(term: Option<&str>, colorterm: Option<&str>) -> Self {
        if let Some(ct) = colorterm {
            let ct = ct.to_ascii_lowercase();
            if ct.contains("truecolor") || ct.contains("24bit") {
                return Self::TrueColor24;
            }
        }
        match term {
            Some(t) if t.contains("256color") || t == "xterm" => Self::TrueColor24,
            _ => Self::Ansi16,
        }
    }

    /// Detect from the process environment.
    #[must_use]
    pub fn detect_from_env() -> Self {
        let term = std::env::var("TERM").ok();
        let colorterm = std::env::var("COLORTERM").ok();
        Self::detect(term.as_deref(), colorterm.as_deref())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_3bit_primaries() {
        assert_eq!(Rgb::BLACK.to_3bit(), 0);
        assert_eq!(Rgb::RED.to_3bit(), 1);
        assert_eq!(Rgb::GREEN.to_3bit(), 2);
        assert_eq!(Rgb::BLUE.to_3bit(), 4);
        assert_eq!(Rgb::WHITE.to_3bit(), 7);
        assert_eq!(Rgb::CYAN.to_3bit(), 6);
    }

    #[test]
    fn to_3bit_threshold_is_127() {
        assert_eq!(Rgb::new(127, 127, 127).to_3bit(), 0);
        assert_eq!(Rgb::new(128, 128, 128).to_3bit(), 7);
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, 0.0), Rgb::BLACK);
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, 1.0), Rgb::WHITE);
    }

    #[test]
    fn lerp_midpoint() {
        let mid = Rgb::BLACK.lerp(Rgb::WHITE, 0.5);
        assert_eq!(mid, Rgb::new(128, 128, 128));
    }

    #[test]
    fn lerp_clamps_t() {
        assert_eq!(Rgb::RED.lerp(Rgb::BLUE, -3.0), Rgb::RED);
        assert_eq!(Rgb::RED.lerp(Rgb::BLUE, 7.0), Rgb::BLUE);
    }

    #[test]
    fn detect_colorterm_truecolor() {
        assert_eq!(
            ColorTier::detect(Some("screen"), Some("truecolor")),
            ColorTier::TrueColor24
        );
        assert_eq!(
            ColorTier::detect(None, Some("24bit")),
            ColorTier::TrueColor24
        );
    }

    #[test]
    fn detect_xterm_family() {
        assert_eq!(
            ColorTier::detect(Some("xterm-256color"), None),
            ColorTier::TrueColor24
        );
        assert_eq!(ColorTier::detect(Some("xterm"), None), ColorTier::TrueColor24);
    }

    #[test]
    fn detect_fallback_is_ansi16() {
        assert_eq!(ColorTier::detect(Some("vt100"), None), ColorTier::Ansi16);
        assert_eq!(ColorTier::detect(None, None), ColorTier::Ansi16);
    }

    #[test]
    fn detect_never_monochrome() {
        for term in [None, Some("dumb"), Some("xterm"), Some("linux")] {
            assert_ne!(ColorTier::detect(term, None), ColorTier::Monochrome);
        }
    }
}
