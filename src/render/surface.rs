//! Premultiplied RGBA8 surface helpers: vello_cpu interop, compositing,
//! color-matrix application, and separable gaussian blur in Q16 fixed point.
//!
//! Every buffer here is row-major premultiplied RGBA8; helpers keep the
//! premultiplication invariant (`channel <= alpha`) on output.

use std::sync::Arc;

use crate::{
    foundation::core::{Affine, Rgba8},
    foundation::error::{UnderlayError, UnderlayResult},
    foundation::math::mul_div255_u8,
};

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> UnderlayResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| UnderlayError::render("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| UnderlayError::render("surface height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(UnderlayError::render("surface byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

pub(crate) fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> UnderlayResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Convert straight-alpha RGBA8 to premultiplied, in place.
pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// Source-over composite `src` onto `dst`, both premultiplied, with an extra
/// uniform opacity applied to `src`.
pub(crate) fn premul_over_in_place_opacity(
    dst: &mut [u8],
    src: &[u8],
    opacity: f32,
) -> UnderlayResult<()> {
    if dst.len() != src.len() || dst.len() % 4 != 0 {
        return Err(UnderlayError::render(
            "premul_over_in_place_opacity expects equal-length rgba8 buffers",
        ));
    }
    let op = ((opacity.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16;
    if op == 0 {
        return Ok(());
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = mul_div255_u8(u16::from(s[3]), op);
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - u16::from(sa);

        d[3] = add_sat_u8(sa, mul_div255_u8(u16::from(d[3]), inv));
        for c in 0..3 {
            let sc = mul_div255_u8(u16::from(s[c]), op);
            let dc = mul_div255_u8(u16::from(d[c]), inv);
            d[c] = add_sat_u8(sc, dc);
        }
    }
    Ok(())
}

/// Apply a 5x4 color matrix to a premultiplied buffer in place.
///
/// The matrix operates on straight-alpha values: each pixel is
/// unpremultiplied, transformed, clamped, and re-premultiplied.
pub(crate) fn color_matrix_rgba8_premul(pixels: &mut [u8], m: &[f32; 20]) {
    for px in pixels.chunks_exact_mut(4) {
        let pr = px[0] as f32 / 255.0;
        let pg = px[1] as f32 / 255.0;
        let pb = px[2] as f32 / 255.0;
        let pa = px[3] as f32 / 255.0;

        let inv_a = if pa > 0.0 { 1.0 / pa } else { 0.0 };
        let r = pr * inv_a;
        let g = pg * inv_a;
        let b = pb * inv_a;
        let a = pa;

        let out_r = (m[0] * r + m[1] * g + m[2] * b + m[3] * a + m[4]).clamp(0.0, 1.0);
        let out_g = (m[5] * r + m[6] * g + m[7] * b + m[8] * a + m[9]).clamp(0.0, 1.0);
        let out_b = (m[10] * r + m[11] * g + m[12] * b + m[13] * a + m[14]).clamp(0.0, 1.0);
        let out_a = (m[15] * r + m[16] * g + m[17] * b + m[18] * a + m[19]).clamp(0.0, 1.0);

        px[0] = ((out_r * out_a) * 255.0).round().clamp(0.0, 255.0) as u8;
        px[1] = ((out_g * out_a) * 255.0).round().clamp(0.0, 255.0) as u8;
        px[2] = ((out_b * out_a) * 255.0).round().clamp(0.0, 255.0) as u8;
        px[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> UnderlayResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(UnderlayError::render("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(UnderlayError::render("gaussian kernel sum is zero"));
    }

    // Normalize into Q16, nudging the center weight so the row sums exactly
    // to one.
    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

fn horizontal_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let dx = ki as i32 - radius;
                let sx = (x + dx).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += (kw as u64) * (src[idx + c] as u64);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let dy = ki as i32 - radius;
                let sy = (y + dy).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += (kw as u64) * (src[idx + c] as u64);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

/// Separable gaussian blur over a premultiplied buffer, in place.
///
/// `sigma_px` is the standard deviation; the kernel extends to three sigma.
/// Non-positive or non-finite sigma is a no-op.
pub(crate) fn blur_rgba8_premul(pixels: &mut [u8], width: u32, height: u32, sigma_px: f64) {
    if !(sigma_px.is_finite() && sigma_px > 0.0) || width == 0 || height == 0 {
        return;
    }
    let radius = (sigma_px * 3.0).ceil().min(64.0) as u32;
    let Ok(kernel) = gaussian_kernel_q16(radius, sigma_px as f32) else {
        return;
    };
    if kernel.len() == 1 {
        return;
    }
    let mut tmp = vec![0u8; pixels.len()];
    let mut out = vec![0u8; pixels.len()];
    horizontal_blur_q16(pixels, &mut tmp, width, height, &kernel);
    vertical_blur_q16(&tmp, &mut out, width, height, &kernel);
    pixels.copy_from_slice(&out);
}

/// Recolor a glyph-mask surface with a linear gradient.
///
/// The surface is expected to hold premultiplied coverage (glyphs drawn in
/// white); each pixel's color is replaced by the gradient color at its
/// position projected onto the `g0 -> g1` axis, scaled by the existing
/// alpha. Positions outside the axis clamp to the nearest stop.
pub(crate) fn linear_gradient_through_mask(
    pixels: &mut [u8],
    width: u32,
    height: u32,
    g0: (f64, f64),
    g1: (f64, f64),
    c0: Rgba8,
    c1: Rgba8,
) {
    let axis = (g1.0 - g0.0, g1.1 - g0.1);
    let len2 = axis.0 * axis.0 + axis.1 * axis.1;
    if len2 <= 0.0 {
        return;
    }

    for y in 0..height {
        let row = (y as usize) * (width as usize) * 4;
        for x in 0..width {
            let i = row + (x as usize) * 4;
            let a = pixels[i + 3];
            if a == 0 {
                continue;
            }
            let px = (f64::from(x) + 0.5, f64::from(y) + 0.5);
            let t = (((px.0 - g0.0) * axis.0 + (px.1 - g0.1) * axis.1) / len2).clamp(0.0, 1.0);
            let lerp = |s: u8, e: u8| -> u8 {
                (f64::from(s) + (f64::from(e) - f64::from(s)) * t).round() as u8
            };
            let a16 = u16::from(a);
            // Gradient alpha multiplies the mask coverage.
            let ga = mul_div255_u8(u16::from(lerp(c0.a, c1.a)), a16);
            let ga16 = u16::from(ga);
            pixels[i] = mul_div255_u8(u16::from(lerp(c0.r, c1.r)), ga16);
            pixels[i + 1] = mul_div255_u8(u16::from(lerp(c0.g, c1.g)), ga16);
            pixels[i + 2] = mul_div255_u8(u16::from(lerp(c0.b, c1.b)), ga16);
            pixels[i + 3] = ga;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
