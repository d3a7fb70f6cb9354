use super::*;

const IDENTITY: [f32; 20] = [
    1.0, 0.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 0.0, 1.0, 0.0,
];

#[test]
fn premultiply_zero_alpha_clears_color() {
    let mut px = vec![200, 100, 50, 0, 200, 100, 50, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[0, 0, 0, 0]);
    assert_eq!(&px[4..], &[200, 100, 50, 255]);
}

#[test]
fn premultiply_scales_by_alpha() {
    let mut px = vec![255, 128, 0, 128];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![128, 64, 0, 128]);
}

#[test]
fn color_matrix_identity_is_identity() {
    let mut px = vec![64, 32, 16, 255, 10, 200, 30, 128];
    let before = px.clone();
    color_matrix_rgba8_premul(&mut px, &IDENTITY);
    assert_eq!(px, before);
}

#[test]
fn color_matrix_keeps_premultiplication_valid() {
    // A brightness boost on a translucent pixel must clamp under its alpha.
    let mut m = IDENTITY;
    m[0] = 4.0;
    m[6] = 4.0;
    m[12] = 4.0;
    let mut px = vec![30, 30, 30, 64];
    color_matrix_rgba8_premul(&mut px, &m);
    assert!(px[0] <= px[3]);
    assert!(px[1] <= px[3]);
    assert!(px[2] <= px[3]);
}

#[test]
fn over_with_opaque_source_replaces_destination() {
    let mut dst = vec![10, 10, 10, 255];
    let src = vec![200, 100, 50, 255];
    premul_over_in_place_opacity(&mut dst, &src, 1.0).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn over_with_zero_opacity_is_a_noop() {
    let mut dst = vec![10, 10, 10, 255];
    let before = dst.clone();
    premul_over_in_place_opacity(&mut dst, &[200, 100, 50, 255], 0.0).unwrap();
    assert_eq!(dst, before);
}

#[test]
fn over_half_opacity_blends() {
    let mut dst = vec![0, 0, 0, 255];
    premul_over_in_place_opacity(&mut dst, &[255, 255, 255, 255], 0.5).unwrap();
    assert!(dst[0] >= 126 && dst[0] <= 129);
    assert_eq!(dst[3], 255);
}

#[test]
fn over_rejects_length_mismatch() {
    let mut dst = vec![0u8; 8];
    assert!(premul_over_in_place_opacity(&mut dst, &[0u8; 4], 1.0).is_err());
}

#[test]
fn blur_with_zero_sigma_is_a_noop() {
    let mut px = vec![10, 20, 30, 255, 200, 100, 50, 255];
    let before = px.clone();
    blur_rgba8_premul(&mut px, 2, 1, 0.0);
    assert_eq!(px, before);
}

#[test]
fn blur_spreads_an_impulse() {
    let mut px = vec![0u8; 5 * 4];
    px[8] = 255;
    px[11] = 255;
    blur_rgba8_premul(&mut px, 5, 1, 1.0);
    // Energy moved off the center pixel onto its neighbors.
    assert!(px[8] < 255);
    assert!(px[4] > 0);
    assert!(px[12] > 0);
}

#[test]
fn blur_preserves_a_uniform_field() {
    let mut px = vec![120u8; 4 * 4 * 4];
    blur_rgba8_premul(&mut px, 4, 4, 2.0);
    for &b in &px {
        assert!((i16::from(b) - 120).abs() <= 1);
    }
}

#[test]
fn gradient_mask_lerps_stops_along_the_axis() {
    // A 3x1 white mask recolored by a black-to-white horizontal gradient.
    let mut px = vec![255u8; 3 * 4];
    linear_gradient_through_mask(
        &mut px,
        3,
        1,
        (0.0, 0.5),
        (3.0, 0.5),
        Rgba8::opaque(0, 0, 0),
        Rgba8::opaque(255, 255, 255),
    );
    assert!(px[0] < px[4]);
    assert!(px[4] < px[8]);
    assert_eq!(px[3], 255);
    assert_eq!(px[7], 255);
}

#[test]
fn gradient_mask_skips_transparent_pixels_and_scales_by_coverage() {
    let mut px = vec![
        0, 0, 0, 0, // untouched
        128, 128, 128, 128, // half coverage
    ];
    linear_gradient_through_mask(
        &mut px,
        2,
        1,
        (0.0, 0.0),
        (2.0, 0.0),
        Rgba8::opaque(255, 0, 0),
        Rgba8::opaque(255, 0, 0),
    );
    assert_eq!(&px[..4], &[0, 0, 0, 0]);
    // Premultiplied red at half coverage.
    assert_eq!(px[7], 128);
    assert!(px[4] >= 127 && px[4] <= 128);
    assert_eq!(px[5], 0);
    assert_eq!(px[6], 0);
}

#[test]
fn degenerate_gradient_axis_is_a_noop() {
    let mut px = vec![255u8; 4];
    let before = px.clone();
    linear_gradient_through_mask(
        &mut px,
        1,
        1,
        (1.0, 1.0),
        (1.0, 1.0),
        Rgba8::BLACK,
        Rgba8::WHITE,
    );
    assert_eq!(px, before);
}

#[test]
fn stroke_surface_keeps_its_color_through_a_gradient_recolor() {
    // Fill mask and stroke live on separate surfaces: the recolor rewrites
    // every covered mask pixel, and the stroke composites over it in its
    // own color afterwards.
    let mut mask = vec![0u8; 2 * 4];
    mask[..4].copy_from_slice(&[255, 255, 255, 255]);
    let mut stroke = vec![0u8; 2 * 4];
    stroke[4..].copy_from_slice(&[255, 0, 0, 255]);

    let green = Rgba8::opaque(0, 255, 0);
    linear_gradient_through_mask(&mut mask, 2, 1, (0.0, 0.5), (2.0, 0.5), green, green);
    premul_over_in_place_opacity(&mut mask, &stroke, 1.0).unwrap();

    assert_eq!(&mask[..4], &[0, 255, 0, 255]);
    assert_eq!(&mask[4..], &[255, 0, 0, 255]);
}
