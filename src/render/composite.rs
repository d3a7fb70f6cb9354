//! Frame composition: background image block, background text layers,
//! foreground (mask-composited) image block, foreground text layers.
//!
//! Rendering is a pure function of the session: the engine owns reusable
//! vello_cpu state but never mutates the session or its history. A failure
//! inside one layer is logged and skips that layer only.

use crate::{
    filter::pipeline::{apply_adjustments, build_adjustments},
    filter::post::{apply_noise, apply_vignette},
    foundation::core::{Affine, Canvas, Point, Rgba8},
    foundation::error::UnderlayResult,
    render::layer::{
        decoration_lines, gradient_axis, layer_passes, layer_transform, DecorationLine, Fill,
    },
    render::surface::{
        affine_to_cpu, blur_rgba8_premul, linear_gradient_through_mask,
        premul_over_in_place_opacity, rgba_premul_to_image,
    },
    session::model::{EditSession, LayerSettings, RasterImage, ShadowStyle, StrokeStyle, TextLayer},
    text::font::FontStore,
    text::layout::{arc_placements, ArcGlyph, ShapedRun},
};

/// A rendered frame in premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRgba {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8 bytes (`width * height * 4`).
    pub data: Vec<u8>,
}

impl FrameRgba {
    fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    /// Whether the frame has no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Convert to straight-alpha RGBA8, e.g. for PNG encoding.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = px[3];
            if a == 0 || a == 255 {
                continue;
            }
            for c in 0..3 {
                let v = (u32::from(px[c]) * 255 + u32::from(a) / 2) / u32::from(a);
                px[c] = v.min(255) as u8;
            }
        }
        out
    }
}

/// The frame compositor. Owns the font store and reusable vello_cpu state.
pub struct CompositeEngine {
    fonts: FontStore,
    ctx: Option<vello_cpu::RenderContext>,
}

impl Default for CompositeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeEngine {
    /// Construct an engine with an empty font store.
    pub fn new() -> Self {
        Self {
            fonts: FontStore::new(),
            ctx: None,
        }
    }

    /// Mutable access to the font store for registration.
    pub fn fonts_mut(&mut self) -> &mut FontStore {
        &mut self.fonts
    }

    /// Read access to the font store.
    pub fn fonts(&self) -> &FontStore {
        &self.fonts
    }

    /// Render the session to a frame sized `original * zoom`.
    ///
    /// A degenerate canvas (zero either way) renders as an empty frame; per
    /// layer failures degrade to that layer not drawing.
    #[tracing::instrument(skip(self, session), fields(zoom = session.zoom))]
    pub fn render(&mut self, session: &EditSession) -> UnderlayResult<FrameRgba> {
        let canvas = session.canvas().scaled(session.zoom);
        if canvas.is_degenerate() {
            tracing::debug!("degenerate canvas, nothing to render");
            return Ok(FrameRgba::empty());
        }
        let (w, h) = canvas.surface_dims()?;
        let (width, height) = (u32::from(w), u32::from(h));
        let mut dst = vec![0u8; (width as usize) * (height as usize) * 4];

        let flip = global_flip(session, canvas);
        let zoom = session.zoom;

        // Background image block.
        if let Err(e) = self.draw_image_block(
            &session.images.original,
            &session.background,
            flip,
            zoom,
            canvas,
            session.seed,
            &mut dst,
        ) {
            tracing::warn!(error = %e, "background image block failed, skipping");
        }

        // Background text layers, in array order.
        for layer in session.layers.iter().filter(|l| !l.foreground) {
            if let Err(e) = self.draw_text_layer(layer, flip, zoom, canvas, &mut dst) {
                tracing::warn!(layer = layer.id.0, error = %e, "layer failed, skipping");
            }
        }

        // Foreground (mask-composited) image block, when present.
        if let Some(fg) = &session.images.foreground {
            if let Err(e) = self.draw_image_block(
                fg,
                &session.foreground,
                flip,
                zoom,
                canvas,
                session.seed.wrapping_add(1),
                &mut dst,
            ) {
                tracing::warn!(error = %e, "foreground image block failed, skipping");
            }
        }

        // Foreground text layers, in array order.
        for layer in session.layers.iter().filter(|l| l.foreground) {
            if let Err(e) = self.draw_text_layer(layer, flip, zoom, canvas, &mut dst) {
                tracing::warn!(layer = layer.id.0, error = %e, "layer failed, skipping");
            }
        }

        Ok(FrameRgba {
            width,
            height,
            data: dst,
        })
    }

    /// Run vello_cpu drawing commands and read back premultiplied bytes.
    fn rasterize(
        &mut self,
        canvas: Canvas,
        f: impl FnOnce(&mut FontStore, &mut vello_cpu::RenderContext) -> UnderlayResult<()>,
    ) -> UnderlayResult<Vec<u8>> {
        let (w, h) = canvas.surface_dims()?;
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();
        let result = f(&mut self.fonts, &mut ctx);
        let out = result.and_then(|()| {
            ctx.flush();
            let mut pixmap = vello_cpu::Pixmap::new(w, h);
            ctx.render_to_pixmap(&mut pixmap);
            Ok(pixmap.data_as_u8_slice().to_vec())
        });
        self.ctx = Some(ctx);
        out
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_image_block(
        &mut self,
        image: &RasterImage,
        settings: &LayerSettings,
        flip: Affine,
        zoom: f64,
        canvas: Canvas,
        noise_seed: u64,
        dst: &mut [u8],
    ) -> UnderlayResult<()> {
        let paint = rgba_premul_to_image(&image.rgba8_premul, image.width, image.height)?;
        let transform = flip * block_placement(settings, canvas) * Affine::scale(zoom);
        let (iw, ih) = (f64::from(image.width), f64::from(image.height));

        let mut block = self.rasterize(canvas, move |_, ctx| {
            ctx.set_transform(affine_to_cpu(transform));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
            Ok(())
        })?;

        let ops = build_adjustments(settings);
        apply_adjustments(&ops, &mut block, canvas.width, canvas.height);
        apply_vignette(&mut block, canvas.width, canvas.height, settings.vignette);
        apply_noise(
            &mut block,
            canvas.width,
            canvas.height,
            settings.noise,
            noise_seed,
        );

        premul_over_in_place_opacity(dst, &block, 1.0)
    }

    fn draw_text_layer(
        &mut self,
        layer: &TextLayer,
        flip: Affine,
        zoom: f64,
        canvas: Canvas,
        dst: &mut [u8],
    ) -> UnderlayResult<()> {
        let text = layer.display_text();
        if text.trim().is_empty() {
            return Ok(());
        }
        let curved = layer.is_curved();
        let size = layer.size_px * zoom as f32;
        let spacing = layer.letter_spacing_px * zoom as f32;

        // Arc mode spaces glyphs angularly, so the run is shaped unspaced.
        let run = self.fonts.shape_line(
            &text,
            &layer.font_family,
            size,
            if curved { 0.0 } else { spacing },
            layer.bold,
            layer.italic,
        )?;
        if run.is_empty() {
            return Ok(());
        }
        let arc = curved.then(|| {
            let advances: Vec<(u32, f64)> = run
                .glyphs
                .iter()
                .map(|g| (g.id, f64::from(g.advance)))
                .collect();
            arc_placements(&advances, layer.curve_deg, f64::from(spacing))
        });
        if let Some(arc) = &arc {
            if arc.is_empty() {
                return Ok(());
            }
        }

        let full = flip * layer_transform(layer, zoom);
        let passes = layer_passes(layer, zoom);
        let decorations = decoration_lines(layer, run.width(), zoom);
        let mut layer_surf =
            vec![0u8; (canvas.width as usize) * (canvas.height as usize) * 4];

        for (i, pass) in passes.iter().enumerate() {
            let is_main = i == passes.len() - 1;

            if let Some(shadow) = pass.paint.shadow.filter(|_| is_main) {
                let bytes = self.rasterize_shadow(
                    canvas,
                    &run,
                    layer,
                    full,
                    pass.offset,
                    &shadow,
                    arc.as_deref(),
                )?;
                premul_over_in_place_opacity(&mut layer_surf, &bytes, 1.0)?;
            }

            let (fill_color, gradient) = match pass.paint.fill {
                Fill::Solid(c) => (c, None),
                // Gradient passes draw a white mask, recolored below.
                Fill::Gradient(g) => (Rgba8::WHITE, Some(g)),
            };
            // The gradient recolor replaces every covered pixel, so in
            // gradient mode the stroke rasterizes on its own surface and
            // composites in its own color afterwards.
            let stroke_with_fill = if gradient.is_some() {
                None
            } else {
                pass.paint.stroke.as_ref()
            };
            let mut bytes = self.rasterize_pass(
                canvas,
                &run,
                layer,
                full,
                pass.offset,
                Some(fill_color),
                stroke_with_fill,
                if is_main { &decorations } else { &[] },
                arc.as_deref(),
            )?;

            if let Some(g) = gradient {
                let height = f64::from(run.ascent + run.descent);
                let (a0, a1) = gradient_axis(&g, run.width(), height);
                let center = run_center(layer, &run, arc.as_deref());
                let to_canvas = full * Affine::translate(pass.offset);
                let g0 = to_canvas * Point::new(center.0 + a0.0, center.1 + a0.1);
                let g1 = to_canvas * Point::new(center.0 + a1.0, center.1 + a1.1);
                linear_gradient_through_mask(
                    &mut bytes,
                    canvas.width,
                    canvas.height,
                    (g0.x, g0.y),
                    (g1.x, g1.y),
                    g.start,
                    g.end,
                );
                if let Some(s) = pass.paint.stroke.as_ref() {
                    let stroke_bytes = self.rasterize_pass(
                        canvas,
                        &run,
                        layer,
                        full,
                        pass.offset,
                        None,
                        Some(s),
                        &[],
                        arc.as_deref(),
                    )?;
                    premul_over_in_place_opacity(&mut bytes, &stroke_bytes, 1.0)?;
                }
            }

            premul_over_in_place_opacity(&mut layer_surf, &bytes, 1.0)?;
        }

        premul_over_in_place_opacity(dst, &layer_surf, layer.opacity as f32)
    }

    /// Shadow silhouette for one pass: glyphs only, in the shadow color,
    /// then gaussian-blurred. Decorations never cast shadows.
    #[allow(clippy::too_many_arguments)]
    fn rasterize_shadow(
        &mut self,
        canvas: Canvas,
        run: &ShapedRun,
        layer: &TextLayer,
        full: Affine,
        pass_offset: (f64, f64),
        shadow: &ShadowStyle,
        arc: Option<&[ArcGlyph]>,
    ) -> UnderlayResult<Vec<u8>> {
        let offset = (
            pass_offset.0 + shadow.offset_x,
            pass_offset.1 + shadow.offset_y,
        );
        let mut bytes = self.rasterize_pass(
            canvas,
            run,
            layer,
            full,
            offset,
            Some(shadow.color),
            None,
            &[],
            arc,
        )?;
        // Canvas shadowBlur maps to half its value in sigma.
        blur_rgba8_premul(&mut bytes, canvas.width, canvas.height, shadow.blur_px / 2.0);
        Ok(bytes)
    }

    /// Rasterize one glyph pass. `fill: None` draws the stroke alone (no
    /// glyph fill, no decorations).
    #[allow(clippy::too_many_arguments)]
    fn rasterize_pass(
        &mut self,
        canvas: Canvas,
        run: &ShapedRun,
        layer: &TextLayer,
        full: Affine,
        offset: (f64, f64),
        fill: Option<Rgba8>,
        stroke: Option<&StrokeStyle>,
        decorations: &[DecorationLine],
        arc: Option<&[ArcGlyph]>,
    ) -> UnderlayResult<Vec<u8>> {
        let align_dx = crate::text::layout::align_offset(layer.align, run.width());
        let base_y = run.baseline_offset() as f32;
        let local = full * Affine::translate(offset);
        let run = run.clone();
        let stroke = stroke.copied();
        let decorations = decorations.to_vec();
        let arc = arc.map(<[ArcGlyph]>::to_vec);

        self.rasterize(canvas, move |_, ctx| {
            let paint = |c: Rgba8| vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a);

            match &arc {
                // Nothing shaped: only decorations (below) can draw.
                None if run.glyphs.is_empty() => {}
                None => {
                    ctx.set_transform(affine_to_cpu(local));
                    if let Some(c) = fill {
                        ctx.set_paint(paint(c));
                        let glyphs = run.glyphs.iter().map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x + align_dx as f32,
                            y: base_y,
                        });
                        ctx.glyph_run(&run.font)
                            .font_size(run.font_size)
                            .fill_glyphs(glyphs);
                    }

                    if let Some(s) = &stroke {
                        ctx.set_paint(paint(s.color));
                        ctx.set_stroke(
                            vello_cpu::kurbo::Stroke::new(s.width_px)
                                .with_join(vello_cpu::kurbo::Join::Round),
                        );
                        let glyphs = run.glyphs.iter().map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x + align_dx as f32,
                            y: base_y,
                        });
                        ctx.glyph_run(&run.font)
                            .font_size(run.font_size)
                            .stroke_glyphs(glyphs);
                    }
                }
                Some(arc) => {
                    for placed in arc {
                        ctx.set_transform(affine_to_cpu(local * placed.transform));
                        if let Some(c) = fill {
                            ctx.set_paint(paint(c));
                            let glyph = vello_cpu::Glyph {
                                id: placed.id,
                                x: (-placed.advance / 2.0) as f32,
                                y: base_y,
                            };
                            ctx.glyph_run(&run.font)
                                .font_size(run.font_size)
                                .fill_glyphs(std::iter::once(glyph));
                        }

                        if let Some(s) = &stroke {
                            ctx.set_paint(paint(s.color));
                            ctx.set_stroke(
                                vello_cpu::kurbo::Stroke::new(s.width_px)
                                    .with_join(vello_cpu::kurbo::Join::Round),
                            );
                            let glyph = vello_cpu::Glyph {
                                id: placed.id,
                                x: (-placed.advance / 2.0) as f32,
                                y: base_y,
                            };
                            ctx.glyph_run(&run.font)
                                .font_size(run.font_size)
                                .stroke_glyphs(std::iter::once(glyph));
                        }
                    }
                }
            }

            if let Some(c) = fill.filter(|_| !decorations.is_empty()) {
                ctx.set_transform(affine_to_cpu(local));
                ctx.set_paint(paint(c));
                for line in &decorations {
                    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                        line.x0,
                        line.y - line.thickness / 2.0,
                        line.x1,
                        line.y + line.thickness / 2.0,
                    ));
                }
            }
            Ok(())
        })
    }
}

impl std::fmt::Debug for CompositeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeEngine")
            .field("fonts", &self.fonts)
            .finish()
    }
}

/// Whole-composite mirror transform from the session's flip flags.
fn global_flip(session: &EditSession, canvas: Canvas) -> Affine {
    let mut t = Affine::IDENTITY;
    if session.flip_horizontal {
        t *= Affine::translate((f64::from(canvas.width), 0.0)) * Affine::scale_non_uniform(-1.0, 1.0);
    }
    if session.flip_vertical {
        t *= Affine::translate((0.0, f64::from(canvas.height))) * Affine::scale_non_uniform(1.0, -1.0);
    }
    t
}

/// Rotation/scale of an image block about the surface center.
fn block_placement(settings: &LayerSettings, canvas: Canvas) -> Affine {
    if settings.has_identity_placement() {
        return Affine::IDENTITY;
    }
    let cx = f64::from(canvas.width) / 2.0;
    let cy = f64::from(canvas.height) / 2.0;
    Affine::translate((cx, cy))
        * Affine::rotate(settings.rotation_deg.to_radians())
        * Affine::scale(settings.scale_pct / 100.0)
        * Affine::translate((-cx, -cy))
}

/// Run-local center point used to anchor the gradient axis.
fn run_center(layer: &TextLayer, run: &ShapedRun, arc: Option<&[ArcGlyph]>) -> (f64, f64) {
    if arc.is_some() {
        // Arc runs are centered on the local origin by construction.
        (0.0, 0.0)
    } else {
        let width = run.width();
        let x0 = crate::text::layout::align_offset(layer.align, width);
        (x0 + width / 2.0, 0.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
