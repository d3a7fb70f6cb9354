use super::*;

use crate::foundation::core::{Canvas, Point};
use crate::session::model::LayerId;

fn layer() -> TextLayer {
    TextLayer::new(
        LayerId(0),
        Canvas {
            width: 200,
            height: 100,
        },
    )
}

#[test]
fn plain_layer_renders_as_a_single_main_pass() {
    let passes = layer_passes(&layer(), 1.0);
    assert_eq!(passes.len(), 1);
    let main = &passes[0];
    assert_eq!(main.offset, (0.0, 0.0));
    assert_eq!(main.paint.fill, Fill::Solid(Rgba8::WHITE));
    assert!(main.paint.stroke.is_none());
    assert!(main.paint.shadow.is_none());
}

#[test]
fn extrusion_emits_ceil_depth_times_zoom_back_passes() {
    let mut l = layer();
    l.extrusion.depth_px = 10.0;
    l.extrusion.angle_deg = 45.0;

    let passes = layer_passes(&l, 1.0);
    assert_eq!(passes.len(), 11);

    let passes = layer_passes(&l, 0.55);
    // ceil(10 * 0.55) = 6 back passes plus the main pass.
    assert_eq!(passes.len(), 7);
}

#[test]
fn back_passes_step_inward_along_the_extrusion_vector() {
    let mut l = layer();
    l.extrusion.depth_px = 3.0;
    l.extrusion.angle_deg = 0.0;

    let passes = layer_passes(&l, 1.0);
    assert_eq!(passes.len(), 4);
    assert_eq!(passes[0].offset.0, 3.0);
    assert_eq!(passes[1].offset.0, 2.0);
    assert_eq!(passes[2].offset.0, 1.0);
    assert_eq!(passes[3].offset, (0.0, 0.0));
    for back in &passes[..3] {
        assert_eq!(back.paint.fill, Fill::Solid(l.extrusion.color));
        assert!(back.paint.stroke.is_none());
        assert!(back.paint.shadow.is_none());
        assert!(back.offset.1.abs() < 1e-12);
    }
}

#[test]
fn main_pass_scales_stroke_and_shadow_by_zoom() {
    let mut l = layer();
    l.stroke.width_px = 2.0;
    l.shadow.color = Rgba8::BLACK;
    l.shadow.blur_px = 4.0;
    l.shadow.offset_x = 1.0;

    let passes = layer_passes(&l, 2.0);
    let main = passes.last().unwrap();
    assert_eq!(main.paint.stroke.unwrap().width_px, 4.0);
    let shadow = main.paint.shadow.unwrap();
    assert_eq!(shadow.blur_px, 8.0);
    assert_eq!(shadow.offset_x, 2.0);
}

#[test]
fn disabled_stroke_and_shadow_stay_off_the_main_pass() {
    let mut l = layer();
    l.stroke.width_px = 0.0;
    l.shadow.color = Rgba8::TRANSPARENT;
    let main = *layer_passes(&l, 1.0).last().unwrap();
    assert!(main.paint.stroke.is_none());
    assert!(main.paint.shadow.is_none());
}

#[test]
fn gradient_flag_selects_the_gradient_fill() {
    let mut l = layer();
    l.use_gradient = true;
    let main = *layer_passes(&l, 1.0).last().unwrap();
    assert_eq!(main.paint.fill, Fill::Gradient(l.gradient));
}

#[test]
fn layer_transform_places_the_anchor_at_zoomed_coordinates() {
    let l = layer();
    let t = layer_transform(&l, 2.0);
    let origin = t * Point::new(0.0, 0.0);
    assert!((origin.x - 200.0).abs() < 1e-9);
    assert!((origin.y - 100.0).abs() < 1e-9);
}

#[test]
fn horizontal_flip_mirrors_local_x() {
    let mut l = layer();
    l.flip_horizontal = true;
    let t = layer_transform(&l, 1.0);
    let p = t * Point::new(10.0, 5.0);
    assert!((p.x - (l.x - 10.0)).abs() < 1e-9);
    assert!((p.y - (l.y + 5.0)).abs() < 1e-9);
}

#[test]
fn rotation_turns_the_local_frame() {
    let mut l = layer();
    l.rotation_deg = 90.0;
    let t = layer_transform(&l, 1.0);
    let p = t * Point::new(10.0, 0.0);
    // y-down frame: +x rotates onto +y.
    assert!((p.x - l.x).abs() < 1e-9);
    assert!((p.y - (l.y + 10.0)).abs() < 1e-9);
}

#[test]
fn skew_shears_the_local_frame() {
    let mut l = layer();
    l.skew_x_deg = 45.0;
    let t = layer_transform(&l, 1.0);
    let p = t * Point::new(0.0, 10.0);
    // tan(45 deg) = 1: a unit of y contributes a unit of x.
    assert!((p.x - (l.x + 10.0)).abs() < 1e-9);
}

#[test]
fn decorations_sit_relative_to_the_anchor() {
    let mut l = layer();
    l.underline = true;
    l.strikethrough = true;
    l.size_px = 30.0;

    let lines = decoration_lines(&l, 90.0, 1.0);
    assert_eq!(lines.len(), 2);

    let underline = lines[0];
    assert_eq!(underline.y, 12.0);
    assert_eq!(underline.thickness, 2.0);
    // Center alignment splits the width around the anchor.
    assert_eq!(underline.x0, -45.0);
    assert_eq!(underline.x1, 45.0);

    let strike = lines[1];
    assert_eq!(strike.y, 0.0);
}

#[test]
fn decoration_thickness_never_drops_below_one_pixel() {
    let mut l = layer();
    l.underline = true;
    l.size_px = 10.0;
    let lines = decoration_lines(&l, 20.0, 1.0);
    assert_eq!(lines[0].thickness, 1.0);
}

#[test]
fn curved_layers_draw_no_decorations() {
    let mut l = layer();
    l.underline = true;
    l.strikethrough = true;
    l.curve_deg = 45.0;
    assert!(decoration_lines(&l, 90.0, 1.0).is_empty());
}

#[test]
fn gradient_axis_spans_the_bounding_diagonal() {
    let style = GradientStyle {
        angle_deg: 0.0,
        ..GradientStyle::default()
    };
    let (g0, g1) = gradient_axis(&style, 60.0, 80.0);
    assert!((g0.0 + 50.0).abs() < 1e-9);
    assert!((g1.0 - 50.0).abs() < 1e-9);
    assert!(g0.1.abs() < 1e-9 && g1.1.abs() < 1e-9);
}
