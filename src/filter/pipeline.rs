//! Lowering of adjustment settings to an ordered elementary op list.
//!
//! The op vocabulary and composition order mirror CSS filter functions:
//! every op is either a 5x4 color matrix or a gaussian blur, and ops apply
//! left to right over straight-alpha values. The tone (highlights/shadows)
//! and temperature entries are linear approximations; their formulas are a
//! fixed contract, not a placeholder for a real tone curve.

use crate::session::model::{FilterKind, LayerSettings};

/// One elementary image operation. Parameters follow CSS filter conventions:
/// percentages where 100 is identity, degrees for hue rotation, pixels for
/// blur.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterOp {
    /// `brightness(pct)`.
    Brightness(f64),
    /// `contrast(pct)`.
    Contrast(f64),
    /// `grayscale(pct)`, clamped to full desaturation at 100.
    Grayscale(f64),
    /// `sepia(pct)`, clamped to full effect at 100.
    Sepia(f64),
    /// `blur(px)` gaussian blur radius.
    Blur(f64),
    /// `saturate(pct)`.
    Saturate(f64),
    /// `hue-rotate(deg)`.
    HueRotate(f64),
}

/// Luminance weights used by the desaturating matrices (Rec. 709).
const LUMA_R: f64 = 0.2126;
const LUMA_G: f64 = 0.7152;
const LUMA_B: f64 = 0.0722;

impl FilterOp {
    /// The 5x4 color matrix for this op, or `None` for blur.
    ///
    /// Row-major `[r_row, g_row, b_row, a_row]`, five entries per row; the
    /// fifth entry is an additive offset in normalized (0..=1) channel units.
    /// Matrices operate on straight-alpha color.
    pub fn color_matrix(&self) -> Option<[f32; 20]> {
        match *self {
            FilterOp::Brightness(pct) => {
                let s = (pct / 100.0) as f32;
                Some(scale_matrix(s))
            }
            FilterOp::Contrast(pct) => {
                let s = (pct / 100.0) as f32;
                // Pivot around mid-gray.
                let o = 0.5 * (1.0 - s);
                let mut m = scale_matrix(s);
                m[4] = o;
                m[9] = o;
                m[14] = o;
                Some(m)
            }
            FilterOp::Grayscale(pct) => {
                let g = 1.0 - (pct / 100.0).clamp(0.0, 1.0);
                Some(weighted_matrix(
                    [
                        LUMA_R + (1.0 - LUMA_R) * g,
                        LUMA_G - LUMA_G * g,
                        LUMA_B - LUMA_B * g,
                    ],
                    [
                        LUMA_R - LUMA_R * g,
                        LUMA_G + (1.0 - LUMA_G) * g,
                        LUMA_B - LUMA_B * g,
                    ],
                    [
                        LUMA_R - LUMA_R * g,
                        LUMA_G - LUMA_G * g,
                        LUMA_B + (1.0 - LUMA_B) * g,
                    ],
                ))
            }
            FilterOp::Sepia(pct) => {
                let g = 1.0 - (pct / 100.0).clamp(0.0, 1.0);
                Some(weighted_matrix(
                    [
                        0.393 + 0.607 * g,
                        0.769 - 0.769 * g,
                        0.189 - 0.189 * g,
                    ],
                    [
                        0.349 - 0.349 * g,
                        0.686 + 0.314 * g,
                        0.168 - 0.168 * g,
                    ],
                    [
                        0.272 - 0.272 * g,
                        0.534 - 0.534 * g,
                        0.131 + 0.869 * g,
                    ],
                ))
            }
            FilterOp::Saturate(pct) => {
                let s = pct / 100.0;
                Some(weighted_matrix(
                    [
                        LUMA_R + (1.0 - LUMA_R) * s,
                        LUMA_G * (1.0 - s),
                        LUMA_B * (1.0 - s),
                    ],
                    [
                        LUMA_R * (1.0 - s),
                        LUMA_G + (1.0 - LUMA_G) * s,
                        LUMA_B * (1.0 - s),
                    ],
                    [
                        LUMA_R * (1.0 - s),
                        LUMA_G * (1.0 - s),
                        LUMA_B + (1.0 - LUMA_B) * s,
                    ],
                ))
            }
            FilterOp::HueRotate(deg) => {
                let (sin, cos) = deg.to_radians().sin_cos();
                Some(weighted_matrix(
                    [
                        LUMA_R + cos * (1.0 - LUMA_R) - sin * LUMA_R,
                        LUMA_G - cos * LUMA_G - sin * LUMA_G,
                        LUMA_B - cos * LUMA_B + sin * (1.0 - LUMA_B),
                    ],
                    [
                        LUMA_R - cos * LUMA_R + sin * 0.143,
                        LUMA_G + cos * (1.0 - LUMA_G) + sin * 0.140,
                        LUMA_B - cos * LUMA_B - sin * 0.283,
                    ],
                    [
                        LUMA_R - cos * LUMA_R - sin * (1.0 - LUMA_R),
                        LUMA_G - cos * LUMA_G + sin * LUMA_G,
                        LUMA_B + cos * (1.0 - LUMA_B) + sin * LUMA_B,
                    ],
                ))
            }
            FilterOp::Blur(_) => None,
        }
    }

    /// Blur radius in pixels, or `None` for matrix ops.
    pub fn blur_radius(&self) -> Option<f64> {
        match *self {
            FilterOp::Blur(px) => Some(px),
            _ => None,
        }
    }
}

fn scale_matrix(s: f32) -> [f32; 20] {
    [
        s, 0.0, 0.0, 0.0, 0.0, //
        0.0, s, 0.0, 0.0, 0.0, //
        0.0, 0.0, s, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

fn weighted_matrix(r: [f64; 3], g: [f64; 3], b: [f64; 3]) -> [f32; 20] {
    [
        r[0] as f32,
        r[1] as f32,
        r[2] as f32,
        0.0,
        0.0,
        g[0] as f32,
        g[1] as f32,
        g[2] as f32,
        0.0,
        0.0,
        b[0] as f32,
        b[1] as f32,
        b[2] as f32,
        0.0,
        0.0,
        0.0,
        0.0,
        0.0,
        1.0,
        0.0,
    ]
}

/// Lower `settings` to its ordered elementary op list.
///
/// All-default settings lower to an empty list, which callers treat as an
/// identity pass. Vignette and noise are not part of this list; they are
/// full-surface post passes in [`crate::filter::post`].
pub fn build_adjustments(settings: &LayerSettings) -> Vec<FilterOp> {
    let mut ops = Vec::new();

    match settings.filter {
        FilterKind::None => {}
        FilterKind::Brightness => ops.push(FilterOp::Brightness(settings.intensity)),
        FilterKind::Contrast => ops.push(FilterOp::Contrast(settings.intensity)),
        FilterKind::Grayscale => ops.push(FilterOp::Grayscale(settings.intensity)),
        FilterKind::Sepia => ops.push(FilterOp::Sepia(settings.intensity)),
        FilterKind::Blur => ops.push(FilterOp::Blur(settings.intensity / 10.0)),
    }

    if settings.saturation != 0.0 {
        ops.push(FilterOp::Saturate(100.0 + settings.saturation));
    }
    if settings.hue != 0.0 {
        ops.push(FilterOp::HueRotate(settings.hue));
    }
    if settings.exposure != 0.0 {
        ops.push(FilterOp::Brightness(100.0 + settings.exposure));
    }

    // Linear tone approximation: a shared brightness lift plus a contrast
    // spread between highlights and shadows.
    if settings.highlights != 0.0 || settings.shadows != 0.0 {
        ops.push(FilterOp::Brightness(
            100.0 + (settings.highlights + settings.shadows) / 2.0,
        ));
        ops.push(FilterOp::Contrast(
            100.0 + (settings.highlights - settings.shadows),
        ));
    }

    // Temperature: warm/cool hue shift plus a small saturation boost.
    if settings.temperature != 0.0 {
        ops.push(FilterOp::HueRotate(settings.temperature * 0.3));
        ops.push(FilterOp::Saturate(
            100.0 + settings.temperature.abs() * 0.2,
        ));
    }

    if settings.sharpen != 0.0 {
        ops.push(FilterOp::Contrast(100.0 + settings.sharpen));
    }

    ops
}

/// Apply `ops` left to right over a premultiplied RGBA8 buffer in place.
pub fn apply_adjustments(ops: &[FilterOp], pixels: &mut [u8], width: u32, height: u32) {
    for op in ops {
        if let Some(m) = op.color_matrix() {
            crate::render::surface::color_matrix_rgba8_premul(pixels, &m);
        } else if let Some(px) = op.blur_radius() {
            crate::render::surface::blur_rgba8_premul(pixels, width, height, px);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filter/pipeline.rs"]
mod tests;
