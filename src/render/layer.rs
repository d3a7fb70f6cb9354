//! Per-layer draw planning.
//!
//! A text layer renders as an ordered sequence of glyph passes: zero or more
//! extrusion back-layers (largest offset first, painter's order), then the
//! main pass carrying the resolved fill, stroke, and shadow. Everything here
//! is pure plan construction; the composite engine executes the plan against
//! a vello_cpu context.

use crate::{
    foundation::core::{Affine, Rgba8},
    session::model::{GradientStyle, ShadowStyle, StrokeStyle, TextLayer},
    text::layout::align_offset,
};

/// Resolved glyph fill: exactly one of solid or gradient is active per pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fill {
    /// Uniform color.
    Solid(Rgba8),
    /// Linear gradient across the run's bounding diagonal.
    Gradient(GradientStyle),
}

/// Immutable description of how one glyph pass paints.
///
/// Extrusion back-layers carry no stroke or shadow; only the main pass does.
/// Passing the whole description into the draw call keeps pass state from
/// leaking between the back-layer and main passes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaintDescriptor {
    /// Glyph fill.
    pub fill: Fill,
    /// Outline stroke, when enabled.
    pub stroke: Option<StrokeStyle>,
    /// Drop shadow, when enabled.
    pub shadow: Option<ShadowStyle>,
}

/// One glyph draw pass: a run-local offset plus its paint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphPass {
    /// Offset from the layer origin, in zoomed pixels.
    pub offset: (f64, f64),
    /// How this pass paints.
    pub paint: PaintDescriptor,
}

/// Build the ordered pass list for `layer` at `zoom`.
///
/// With extrusion depth `d`, the list holds `ceil(d * zoom)` back-layer
/// passes stepping from the largest offset down to one pixel along the
/// extrusion angle, followed by the main pass at zero offset. Later passes
/// occlude earlier ones.
pub fn layer_passes(layer: &TextLayer, zoom: f64) -> Vec<GlyphPass> {
    let mut passes = Vec::new();

    let depth = (layer.extrusion.depth_px * zoom).ceil() as i64;
    if depth > 0 {
        let (sin, cos) = layer.extrusion.angle_deg.to_radians().sin_cos();
        let back = PaintDescriptor {
            fill: Fill::Solid(layer.extrusion.color),
            stroke: None,
            shadow: None,
        };
        for i in (1..=depth).rev() {
            let step = i as f64;
            passes.push(GlyphPass {
                offset: (step * cos, step * sin),
                paint: back,
            });
        }
    }

    let fill = if layer.use_gradient {
        Fill::Gradient(layer.gradient)
    } else {
        Fill::Solid(layer.color)
    };
    let stroke = (!layer.stroke.is_disabled()).then(|| StrokeStyle {
        color: layer.stroke.color,
        width_px: layer.stroke.width_px * zoom,
    });
    let shadow = (!layer.shadow.is_disabled()).then(|| ShadowStyle {
        color: layer.shadow.color,
        blur_px: layer.shadow.blur_px * zoom,
        offset_x: layer.shadow.offset_x * zoom,
        offset_y: layer.shadow.offset_y * zoom,
    });
    passes.push(GlyphPass {
        offset: (0.0, 0.0),
        paint: PaintDescriptor {
            fill,
            stroke,
            shadow,
        },
    });

    passes
}

/// The layer-local coordinate frame at `zoom`: translate the anchor, rotate,
/// mirror per the flip flags, then shear.
pub fn layer_transform(layer: &TextLayer, zoom: f64) -> Affine {
    let mut t = Affine::translate((layer.x * zoom, layer.y * zoom))
        * Affine::rotate(layer.rotation_deg.to_radians());
    if layer.flip_horizontal || layer.flip_vertical {
        let sx = if layer.flip_horizontal { -1.0 } else { 1.0 };
        let sy = if layer.flip_vertical { -1.0 } else { 1.0 };
        t *= Affine::scale_non_uniform(sx, sy);
    }
    if layer.skew_x_deg != 0.0 || layer.skew_y_deg != 0.0 {
        t *= Affine::skew(
            layer.skew_x_deg.to_radians().tan(),
            layer.skew_y_deg.to_radians().tan(),
        );
    }
    t
}

/// One underline or strikethrough bar in run-local coordinates (anchor at
/// the origin, y positive downward).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecorationLine {
    /// Left edge.
    pub x0: f64,
    /// Right edge.
    pub x1: f64,
    /// Vertical center of the bar.
    pub y: f64,
    /// Bar thickness.
    pub thickness: f64,
}

/// Decoration bars for `layer` given the measured straight-run width.
///
/// Curved layers draw no decorations. The strikethrough sits on the anchor
/// line; the underline sits `0.4 * size` below it.
pub fn decoration_lines(layer: &TextLayer, run_width: f64, zoom: f64) -> Vec<DecorationLine> {
    if layer.is_curved() {
        return Vec::new();
    }
    let size = f64::from(layer.size_px) * zoom;
    let width = run_width;
    if width <= 0.0 || size <= 0.0 {
        return Vec::new();
    }
    let thickness = (size / 15.0).max(1.0);
    let x0 = align_offset(layer.align, width);
    let x1 = x0 + width;

    let mut out = Vec::new();
    if layer.underline {
        out.push(DecorationLine {
            x0,
            x1,
            y: size * 0.4,
            thickness,
        });
    }
    if layer.strikethrough {
        out.push(DecorationLine {
            x0,
            x1,
            y: 0.0,
            thickness,
        });
    }
    out
}

/// Gradient axis endpoints for a run of the given extent, in run-center
/// coordinates: the axis passes through the center at `angle_deg`, extending
/// half the bounding diagonal to each side.
pub fn gradient_axis(
    style: &GradientStyle,
    run_width: f64,
    run_height: f64,
) -> ((f64, f64), (f64, f64)) {
    let half = (run_width * run_width + run_height * run_height).sqrt() / 2.0;
    let (sin, cos) = style.angle_deg.to_radians().sin_cos();
    ((-cos * half, -sin * half), (cos * half, sin * half))
}

#[cfg(test)]
#[path = "../../tests/unit/render/layer.rs"]
mod tests;
