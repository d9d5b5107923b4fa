//! Unit conversion between millimeters, pixels, inches and PDF points
//!
//! Millimeters are the canonical storage unit for every piece of geometry.
//! Pixels are derived at a fixed 96 DPI reference and then scaled by the
//! current zoom percentage; points are only used by the PDF emitters.
//!
//! All conversions are plain floating point math. Rounding happens only at
//! the call sites that display values (ruler labels).

use serde::{Deserialize, Serialize};

/// Reference resolution for screen pixels
pub const DEFAULT_DPI: f64 = 96.0;

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// PDF points per inch
pub const POINTS_PER_INCH: f64 = 72.0;

/// Convert millimeters to pixels at the reference resolution
pub fn mm_to_px(mm: f64) -> f64 {
    mm_to_px_at(mm, DEFAULT_DPI)
}

/// Convert millimeters to pixels at a given resolution
pub fn mm_to_px_at(mm: f64, dpi: f64) -> f64 {
    mm * dpi / MM_PER_INCH
}

/// Convert pixels at the reference resolution to millimeters
pub fn px_to_mm(px: f64) -> f64 {
    px_to_mm_at(px, DEFAULT_DPI)
}

/// Convert pixels at a given resolution to millimeters
pub fn px_to_mm_at(px: f64, dpi: f64) -> f64 {
    px * MM_PER_INCH / dpi
}

/// Convert inches to pixels at the reference resolution
pub fn in_to_px(inches: f64) -> f64 {
    inches * DEFAULT_DPI
}

/// Convert inches to millimeters
pub fn in_to_mm(inches: f64) -> f64 {
    inches * MM_PER_INCH
}

/// Convert millimeters to PDF points
pub fn mm_to_pt(mm: f64) -> f64 {
    mm / MM_PER_INCH * POINTS_PER_INCH
}

/// Convert PDF points to millimeters
pub fn pt_to_mm(pt: f64) -> f64 {
    pt / POINTS_PER_INCH * MM_PER_INCH
}

/// Normalize a rotation in degrees into `[0, 360)`.
///
/// Non-finite input collapses to 0.
pub fn normalize_rotation(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let normalized = ((degrees % 360.0) + 360.0) % 360.0;
    // -0.0 and float drift right below 360 both belong to 0
    if normalized >= 360.0 || normalized == 0.0 {
        0.0
    } else {
        normalized
    }
}

// =============================================================================
// Zoom
// =============================================================================

/// Discrete zoom ladder, in percent
pub const ZOOM_LEVELS: [u32; 9] = [25, 50, 75, 100, 125, 150, 200, 300, 400];

/// Zoom level in percent, always one rung of [`ZOOM_LEVELS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "f64", into = "u32")]
pub struct Zoom(u32);

impl Zoom {
    /// 100%
    pub const ACTUAL_SIZE: Zoom = Zoom(100);

    /// Snap an arbitrary percentage to the closest rung of the ladder.
    ///
    /// Ties resolve to the smaller rung.
    pub fn snap(percent: f64) -> Self {
        if !percent.is_finite() {
            return Self::ACTUAL_SIZE;
        }
        let mut best = ZOOM_LEVELS[0];
        for &level in ZOOM_LEVELS.iter() {
            if (level as f64 - percent).abs() < (best as f64 - percent).abs() {
                best = level;
            }
        }
        Self(best)
    }

    /// The percentage value
    pub fn percent(self) -> u32 {
        self.0
    }

    /// Multiplier applied to reference pixels (`zoom / 100`)
    pub fn factor(self) -> f64 {
        self.0 as f64 / 100.0
    }

    fn rung(self) -> usize {
        ZOOM_LEVELS
            .iter()
            .position(|&level| level == self.0)
            .unwrap_or(3)
    }

    /// One rung up, clamped at the top of the ladder
    pub fn zoom_in(self) -> Self {
        let next = (self.rung() + 1).min(ZOOM_LEVELS.len() - 1);
        Self(ZOOM_LEVELS[next])
    }

    /// One rung down, clamped at the bottom of the ladder
    pub fn zoom_out(self) -> Self {
        Self(ZOOM_LEVELS[self.rung().saturating_sub(1)])
    }

    /// Scale reference pixels to screen pixels
    pub fn apply(self, px: f64) -> f64 {
        px * self.factor()
    }

    /// Undo the zoom scaling on a screen-space pixel value
    pub fn unapply(self, screen_px: f64) -> f64 {
        screen_px / self.factor()
    }

    /// Millimeters straight to screen pixels at this zoom
    pub fn mm_to_screen(self, mm: f64) -> f64 {
        self.apply(mm_to_px(mm))
    }

    /// Screen pixels at this zoom straight to millimeters
    pub fn screen_to_mm(self, screen_px: f64) -> f64 {
        px_to_mm(self.unapply(screen_px))
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self::ACTUAL_SIZE
    }
}

impl From<f64> for Zoom {
    fn from(percent: f64) -> Self {
        Self::snap(percent)
    }
}

impl From<Zoom> for u32 {
    fn from(zoom: Zoom) -> Self {
        zoom.0
    }
}

impl std::fmt::Display for Zoom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}
