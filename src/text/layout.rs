//! Glyph placement: straight-baseline alignment and arc (curved) layout.
//!
//! Everything here is pure geometry over already-shaped glyph advances, so
//! the placement math is testable without fonts.

use crate::{
    foundation::core::Affine,
    session::model::TextAlign,
};

/// One shaped glyph in run-local coordinates (origin at the run's left edge,
/// y on the baseline).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapedGlyph {
    /// Glyph id within the run's font.
    pub id: u32,
    /// Horizontal pen position.
    pub x: f32,
    /// Vertical pen position (baseline-relative).
    pub y: f32,
    /// Horizontal advance width.
    pub advance: f32,
}

/// A shaped single-line run plus the font needed to rasterize it.
#[derive(Clone, Debug)]
pub struct ShapedRun {
    /// Glyphs in visual order.
    pub glyphs: Vec<ShapedGlyph>,
    /// Line ascent above the baseline.
    pub ascent: f32,
    /// Line descent below the baseline.
    pub descent: f32,
    /// Font the glyph ids index into.
    pub font: vello_cpu::peniko::FontData,
    /// Size the run was shaped at.
    pub font_size: f32,
    /// Letter spacing the run was shaped with. The shaper folds it into
    /// every glyph advance, including a trailing copy on the last glyph.
    pub letter_spacing: f32,
}

impl ShapedRun {
    /// Whether the run contains no drawable glyphs.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Total advance width of the run, excluding the trailing letter
    /// spacing carried by the last glyph's advance.
    pub fn width(&self) -> f64 {
        if self.glyphs.is_empty() {
            return 0.0;
        }
        let extent = self
            .glyphs
            .iter()
            .map(|g| f64::from(g.x + g.advance))
            .fold(0.0, f64::max);
        (extent - f64::from(self.letter_spacing)).max(0.0)
    }

    /// Baseline offset that vertically centers the run on y = 0.
    ///
    /// Strikethrough sits at the anchor, so "centered" means the baseline
    /// lands half the cap extent below the anchor.
    pub fn baseline_offset(&self) -> f64 {
        f64::from(self.ascent - self.descent) / 2.0
    }
}

/// Horizontal run offset that realizes `align` around the anchor at x = 0.
pub fn align_offset(align: TextAlign, width: f64) -> f64 {
    match align {
        TextAlign::Left => 0.0,
        TextAlign::Center => -width / 2.0,
        TextAlign::Right => -width,
    }
}

/// One glyph placed on an arc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcGlyph {
    /// Glyph id within the run's font.
    pub id: u32,
    /// Draw angle in radians (midpoint of the glyph's angular span).
    pub angle_rad: f64,
    /// Full placement transform: rotate about the arc center, then draw the
    /// glyph centered at the local origin.
    pub transform: Affine,
    /// The glyph's advance width.
    pub advance: f64,
}

/// Place glyph advances along a circular arc.
///
/// `curve_deg` is the total angle subtended by the whole string; the string
/// is centered on the arc, so the walk starts at `-curve_deg / 2`. The arc
/// radius follows from the total text width (advances plus letter spacing
/// between glyphs) divided by the total angle in radians. Letter spacing is
/// consumed here as an angular gap, so the advances passed in must be shaped
/// without it.
///
/// Empty input, zero total width, or a (guarded, unreachable) zero angle all
/// yield an empty placement.
pub fn arc_placements(
    advances: &[(u32, f64)],
    curve_deg: f64,
    letter_spacing_px: f64,
) -> Vec<ArcGlyph> {
    let total_angle = curve_deg.to_radians();
    if advances.is_empty() || total_angle == 0.0 {
        return Vec::new();
    }
    let gaps = (advances.len() - 1) as f64;
    let total_width: f64 =
        advances.iter().map(|&(_, w)| w).sum::<f64>() + letter_spacing_px * gaps;
    if total_width <= 0.0 {
        return Vec::new();
    }
    let radius = total_width / total_angle;
    let spacing_angle = letter_spacing_px / radius;

    let mut out = Vec::with_capacity(advances.len());
    let mut current = -total_angle / 2.0;
    for &(id, advance) in advances {
        let char_angle = advance / radius;
        let angle = current + char_angle / 2.0;
        let transform = Affine::translate((0.0, radius))
            * Affine::rotate(angle)
            * Affine::translate((0.0, -radius));
        out.push(ArcGlyph {
            id,
            angle_rad: angle,
            transform,
            advance,
        });
        current += char_angle + spacing_angle;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
