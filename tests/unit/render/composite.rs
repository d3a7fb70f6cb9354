use super::*;

use crate::session::commands::{AdjustmentEdit, LayerCommand};
use crate::session::model::{ImageGroup, ImagePair, LayerId};

fn solid_image(w: u32, h: u32, px: [u8; 4]) -> RasterImage {
    let mut bytes = Vec::with_capacity((w as usize) * (h as usize) * 4);
    for _ in 0..w * h {
        bytes.extend_from_slice(&px);
    }
    RasterImage::from_premul_bytes(w, h, bytes).unwrap()
}

/// Left half red, right half blue, fully opaque.
fn split_image(w: u32, h: u32) -> RasterImage {
    let mut bytes = Vec::with_capacity((w as usize) * (h as usize) * 4);
    for _ in 0..h {
        for x in 0..w {
            if x < w / 2 {
                bytes.extend_from_slice(&[255, 0, 0, 255]);
            } else {
                bytes.extend_from_slice(&[0, 0, 255, 255]);
            }
        }
    }
    RasterImage::from_premul_bytes(w, h, bytes).unwrap()
}

fn session_with(original: RasterImage) -> EditSession {
    EditSession::new(ImagePair {
        original,
        foreground: None,
    })
}

fn pixel(frame: &FrameRgba, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) as usize) * 4;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

#[test]
fn render_sizes_the_frame_to_original_times_zoom() {
    let mut engine = CompositeEngine::new();
    let mut s = session_with(solid_image(8, 6, [0, 0, 0, 255]));
    s.zoom = 2.0;
    let frame = engine.render(&s).unwrap();
    assert_eq!((frame.width, frame.height), (16, 12));
    assert_eq!(frame.data.len(), 16 * 12 * 4);
}

#[test]
fn degenerate_image_renders_nothing_without_error() {
    let mut engine = CompositeEngine::new();
    let mut s = session_with(solid_image(8, 8, [0, 0, 0, 255]));
    s.zoom = 0.0;
    let frame = engine.render(&s).unwrap();
    assert!(frame.is_empty());
}

#[test]
fn background_image_fills_the_frame() {
    let mut engine = CompositeEngine::new();
    let s = session_with(solid_image(8, 8, [180, 20, 20, 255]));
    let frame = engine.render(&s).unwrap();
    let px = pixel(&frame, 4, 4);
    assert_eq!(px[3], 255);
    assert!(px[0] > 150 && px[1] < 60 && px[2] < 60);
}

#[test]
fn global_horizontal_flip_mirrors_the_composite() {
    let mut engine = CompositeEngine::new();
    let mut s = session_with(split_image(8, 8));

    let frame = engine.render(&s).unwrap();
    assert!(pixel(&frame, 1, 4)[0] > pixel(&frame, 1, 4)[2]); // red left

    s.flip_horizontal = true;
    let flipped = engine.render(&s).unwrap();
    assert!(pixel(&flipped, 1, 4)[2] > pixel(&flipped, 1, 4)[0]); // blue left
}

#[test]
fn grayscale_filter_equalizes_background_channels() {
    let mut engine = CompositeEngine::new();
    let mut s = session_with(solid_image(8, 8, [200, 40, 90, 255]));
    s.apply_adjustment(
        ImageGroup::Background,
        &AdjustmentEdit::Filter(crate::session::model::FilterKind::Grayscale),
    );
    let frame = engine.render(&s).unwrap();
    let px = pixel(&frame, 4, 4);
    assert!((i16::from(px[0]) - i16::from(px[1])).abs() <= 1);
    assert!((i16::from(px[1]) - i16::from(px[2])).abs() <= 1);
}

#[test]
fn background_vignette_darkens_edges_only() {
    let mut engine = CompositeEngine::new();
    let mut s = session_with(solid_image(9, 9, [200, 200, 200, 255]));
    s.apply_adjustment(ImageGroup::Background, &AdjustmentEdit::Vignette(80.0));
    let frame = engine.render(&s).unwrap();
    assert!(pixel(&frame, 0, 0)[0] < pixel(&frame, 4, 4)[0]);
}

#[test]
fn foreground_cutout_draws_above_the_background() {
    let mut engine = CompositeEngine::new();
    let original = solid_image(8, 8, [255, 0, 0, 255]);
    let cutout = solid_image(8, 8, [0, 255, 0, 255]);
    let mut s = session_with(original);
    s.images.foreground = Some(cutout);

    let frame = engine.render(&s).unwrap();
    let px = pixel(&frame, 4, 4);
    assert!(px[1] > 200 && px[0] < 60);
}

#[test]
fn text_layer_without_registered_fonts_degrades_to_skipped() {
    let mut engine = CompositeEngine::new();
    let mut s = session_with(solid_image(8, 8, [50, 50, 50, 255]));
    s.apply(&LayerCommand::Add).unwrap();

    // No fonts registered: the layer fails to shape and is skipped, the
    // frame still renders.
    let frame = engine.render(&s).unwrap();
    assert_eq!((frame.width, frame.height), (8, 8));
    assert_eq!(pixel(&frame, 4, 4)[3], 255);
}

#[test]
fn render_does_not_mutate_the_session() {
    let mut engine = CompositeEngine::new();
    let mut s = session_with(solid_image(8, 8, [50, 50, 50, 255]));
    s.apply(&LayerCommand::Add).unwrap();
    let layers_before = s.layers.clone();
    let history_len = s.history().len();

    let _ = engine.render(&s).unwrap();
    assert_eq!(s.layers, layers_before);
    assert_eq!(s.history().len(), history_len);
}

#[test]
fn frame_straight_conversion_undoes_premultiplication() {
    let frame = FrameRgba {
        width: 1,
        height: 1,
        data: vec![64, 32, 0, 128],
    };
    assert_eq!(frame.to_straight_rgba(), vec![128, 64, 0, 128]);
}

fn bare_run() -> ShapedRun {
    ShapedRun {
        glyphs: Vec::new(),
        ascent: 8.0,
        descent: 2.0,
        font: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(Vec::new()), 0),
        font_size: 16.0,
        letter_spacing: 0.0,
    }
}

#[test]
fn decorations_never_enter_the_shadow_silhouette() {
    let canvas = Canvas {
        width: 40,
        height: 40,
    };
    let mut engine = CompositeEngine::new();
    let mut layer = TextLayer::new(LayerId(9), canvas);
    layer.underline = true;
    layer.strikethrough = true;
    layer.shadow = ShadowStyle {
        color: Rgba8::opaque(255, 0, 0),
        blur_px: 0.0,
        offset_x: 4.0,
        offset_y: 4.0,
    };
    let run = bare_run();
    let full = Affine::translate((20.0, 20.0));
    let shadow = layer.shadow;

    // The run has no glyphs, so an empty shadow surface means the
    // decoration bars were left out of the silhouette.
    let bytes = engine
        .rasterize_shadow(canvas, &run, &layer, full, (0.0, 0.0), &shadow, None)
        .unwrap();
    assert!(bytes.iter().all(|&b| b == 0));

    // The same pass draws the bar once it is supplied, so the emptiness
    // above is the exclusion at work, not a rasterization failure.
    let bar = DecorationLine {
        x0: -10.0,
        x1: 10.0,
        y: 0.0,
        thickness: 2.0,
    };
    let bytes = engine
        .rasterize_pass(
            canvas,
            &run,
            &layer,
            full,
            (0.0, 0.0),
            Some(shadow.color),
            None,
            &[bar],
            None,
        )
        .unwrap();
    assert!(bytes.iter().any(|&b| b != 0));
}

#[test]
fn stroke_only_pass_draws_no_fill_or_decorations() {
    let canvas = Canvas {
        width: 40,
        height: 40,
    };
    let mut engine = CompositeEngine::new();
    let layer = TextLayer::new(LayerId(3), canvas);
    let run = bare_run();
    let bar = DecorationLine {
        x0: -10.0,
        x1: 10.0,
        y: 0.0,
        thickness: 2.0,
    };
    let stroke = StrokeStyle {
        color: Rgba8::opaque(255, 0, 0),
        width_px: 4.0,
    };

    // With `fill: None` only the stroke rasterizes; a glyph-free run plus
    // ignored decorations must leave the surface untouched.
    let bytes = engine
        .rasterize_pass(
            canvas,
            &run,
            &layer,
            Affine::translate((20.0, 20.0)),
            (0.0, 0.0),
            None,
            Some(&stroke),
            &[bar],
            None,
        )
        .unwrap();
    assert!(bytes.iter().all(|&b| b == 0));
}
