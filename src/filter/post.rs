//! Full-surface post passes applied after an image block is drawn and
//! filtered: vignette darkening and additive luminance noise.
//!
//! Both operate directly on premultiplied RGBA8 buffers and are no-ops at
//! zero strength.

use crate::foundation::math::hash_pixel;

/// Vignette gradient radius as a fraction of the longer surface edge.
const VIGNETTE_RADIUS_FACTOR: f64 = 0.7;

fn surface_len(width: u32, height: u32) -> usize {
    (width as usize) * (height as usize) * 4
}

/// Paint a radial vignette over the surface: fully transparent at the
/// center, black at `strength / 100` opacity at a radius of
/// `0.7 * max(width, height)`, linearly interpolated and clamped beyond.
pub fn apply_vignette(pixels: &mut [u8], width: u32, height: u32, strength: f64) {
    if strength <= 0.0 || width == 0 || height == 0 {
        return;
    }
    if pixels.len() != surface_len(width, height) {
        tracing::debug!(
            len = pixels.len(),
            width,
            height,
            "vignette skipped: surface size mismatch"
        );
        return;
    }
    let max_alpha = (strength / 100.0).clamp(0.0, 1.0);
    let cx = f64::from(width) / 2.0;
    let cy = f64::from(height) / 2.0;
    let radius = VIGNETTE_RADIUS_FACTOR * f64::from(width.max(height));
    if radius <= 0.0 {
        return;
    }

    for y in 0..height {
        let dy = (f64::from(y) + 0.5) - cy;
        let row = (y as usize) * (width as usize) * 4;
        for x in 0..width {
            let dx = (f64::from(x) + 0.5) - cx;
            let t = ((dx * dx + dy * dy).sqrt() / radius).min(1.0);
            let a_v = (t * max_alpha * 255.0).round() as u32;
            if a_v == 0 {
                continue;
            }
            // Source-over of premultiplied black.
            let inv = 255 - a_v;
            let i = row + (x as usize) * 4;
            for c in 0..3 {
                pixels[i + c] = ((u32::from(pixels[i + c]) * inv + 127) / 255) as u8;
            }
            let a = u32::from(pixels[i + 3]);
            pixels[i + 3] = (a_v + (a * inv + 127) / 255).min(255) as u8;
        }
    }
}

/// Add per-pixel luminance noise, uniform in `[-amount/2, amount/2]` with
/// `amount = strength * 2.55`, identically to R, G, and B; alpha untouched.
///
/// The noise source is a pixel-position hash keyed by `seed`, so a given
/// session renders the same grain every frame.
pub fn apply_noise(pixels: &mut [u8], width: u32, height: u32, strength: f64, seed: u64) {
    if strength <= 0.0 || width == 0 || height == 0 {
        return;
    }
    if pixels.len() != surface_len(width, height) {
        tracing::debug!(
            len = pixels.len(),
            width,
            height,
            "noise skipped: surface size mismatch"
        );
        return;
    }
    let amount = strength * 2.55;

    for y in 0..height {
        let row = (y as usize) * (width as usize) * 4;
        for x in 0..width {
            let i = row + (x as usize) * 4;
            let a = i32::from(pixels[i + 3]);
            if a == 0 {
                continue;
            }
            let unit = f64::from(hash_pixel(seed, x, y)) / f64::from(u32::MAX);
            // Straight-space delta, scaled into premultiplied channel units.
            let delta = ((unit - 0.5) * amount * f64::from(a) / 255.0).round() as i32;
            if delta == 0 {
                continue;
            }
            for c in 0..3 {
                let v = i32::from(pixels[i + c]) + delta;
                pixels[i + c] = v.clamp(0, a) as u8;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filter/post.rs"]
mod tests;
