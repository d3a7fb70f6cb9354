use std::sync::Arc;

use crate::{
    foundation::core::{Canvas, Rgba8},
    foundation::error::{UnderlayError, UnderlayResult},
    session::commands::LayerCommand,
    session::history::EditHistory,
};

/// Stable, creation-ordered identifier for a text layer.
///
/// Ids are allocated from a monotonically increasing session counter and never
/// reused. Draw order is container order, not id order; ids only identify.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct LayerId(pub u64);

/// Display-only case transform; never mutates the stored text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TextTransformMode {
    /// Render the text as stored.
    #[default]
    None,
    /// Render in uppercase.
    Uppercase,
    /// Render in lowercase.
    Lowercase,
}

impl TextTransformMode {
    /// Apply the display transform to `text`, producing the render string.
    pub fn apply(self, text: &str) -> String {
        match self {
            TextTransformMode::None => text.to_string(),
            TextTransformMode::Uppercase => text.to_uppercase(),
            TextTransformMode::Lowercase => text.to_lowercase(),
        }
    }
}

/// Horizontal alignment of a text run around its anchor point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TextAlign {
    /// Anchor at the left edge of the run.
    Left,
    /// Anchor at the run center.
    #[default]
    Center,
    /// Anchor at the right edge of the run.
    Right,
}

/// Drop shadow applied to the main glyph pass.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShadowStyle {
    /// Shadow color.
    pub color: Rgba8,
    /// Gaussian blur radius in pixels.
    pub blur_px: f64,
    /// Horizontal offset in pixels.
    pub offset_x: f64,
    /// Vertical offset in pixels.
    pub offset_y: f64,
}

impl Default for ShadowStyle {
    fn default() -> Self {
        Self {
            color: Rgba8::TRANSPARENT,
            blur_px: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl ShadowStyle {
    /// Return `true` when the shadow would paint nothing.
    pub fn is_disabled(&self) -> bool {
        self.color.is_transparent()
            || (self.blur_px <= 0.0 && self.offset_x == 0.0 && self.offset_y == 0.0)
    }
}

/// Outline stroke applied to the main glyph pass.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StrokeStyle {
    /// Stroke color.
    pub color: Rgba8,
    /// Stroke width in pixels; zero disables the stroke.
    pub width_px: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Rgba8::BLACK,
            width_px: 0.0,
        }
    }
}

impl StrokeStyle {
    /// Return `true` when the stroke would paint nothing.
    pub fn is_disabled(&self) -> bool {
        self.width_px <= 0.0 || self.color.is_transparent()
    }
}

/// Pseudo-3D extrusion: repeated back-layer passes along a fixed angle.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExtrusionStyle {
    /// Depth in pixels; zero disables extrusion.
    pub depth_px: f64,
    /// Back-layer color.
    pub color: Rgba8,
    /// Extrusion direction in degrees.
    pub angle_deg: f64,
}

impl Default for ExtrusionStyle {
    fn default() -> Self {
        Self {
            depth_px: 0.0,
            color: Rgba8::BLACK,
            angle_deg: 45.0,
        }
    }
}

/// Linear gradient fill parameters. Retained even while a solid fill is
/// active so toggling `use_gradient` is non-destructive.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GradientStyle {
    /// First gradient stop.
    pub start: Rgba8,
    /// Second gradient stop.
    pub end: Rgba8,
    /// Gradient axis angle in degrees.
    pub angle_deg: f64,
}

impl Default for GradientStyle {
    fn default() -> Self {
        Self {
            start: Rgba8::WHITE,
            end: Rgba8::opaque(128, 128, 128),
            angle_deg: 0.0,
        }
    }
}

/// One independently positioned, styled text element.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextLayer {
    /// Stable layer identity.
    pub id: LayerId,
    /// Stored text content (display transform applied at render time only).
    pub text: String,
    /// Display-only case transform.
    pub text_transform: TextTransformMode,
    /// Anchor x in image-pixel units at zoom 1.0.
    pub x: f64,
    /// Anchor y in image-pixel units at zoom 1.0.
    pub y: f64,
    /// Rotation in degrees, wrapped to `[0, 360)`.
    pub rotation_deg: f64,
    /// Mirror across the vertical axis.
    pub flip_horizontal: bool,
    /// Mirror across the horizontal axis.
    pub flip_vertical: bool,
    /// Horizontal shear in degrees, clamped to `[-45, 45]`.
    pub skew_x_deg: f64,
    /// Vertical shear in degrees, clamped to `[-45, 45]`.
    pub skew_y_deg: f64,
    /// Opaque font catalog key; glyphs are supplied by the font store.
    pub font_family: String,
    /// Font size in pixels.
    pub size_px: f32,
    /// Bold face selection.
    pub bold: bool,
    /// Italic face selection.
    pub italic: bool,
    /// Underline decoration (straight-mode only).
    pub underline: bool,
    /// Strikethrough decoration (straight-mode only).
    pub strikethrough: bool,
    /// Run alignment around the anchor.
    pub align: TextAlign,
    /// Additional inter-glyph advance in pixels, clamped to `[-10, 50]`.
    pub letter_spacing_px: f32,
    /// Solid fill color (active when `use_gradient` is false).
    pub color: Rgba8,
    /// Selects gradient fill instead of the solid color.
    pub use_gradient: bool,
    /// Gradient fill parameters (retained while inactive).
    pub gradient: GradientStyle,
    /// Layer opacity in `[0, 1]`.
    pub opacity: f64,
    /// Drop shadow parameters.
    pub shadow: ShadowStyle,
    /// Outline stroke parameters.
    pub stroke: StrokeStyle,
    /// Total arc angle in degrees subtended by the string, `[-360, 360]`.
    /// Magnitudes of at most one degree render as straight text.
    pub curve_deg: f64,
    /// Pseudo-3D extrusion parameters.
    pub extrusion: ExtrusionStyle,
    /// Draw above the segmented subject instead of below it.
    pub foreground: bool,
}

impl TextLayer {
    /// Allowed skew range in degrees.
    pub const SKEW_RANGE: (f64, f64) = (-45.0, 45.0);
    /// Allowed letter-spacing range in pixels.
    pub const LETTER_SPACING_RANGE: (f32, f32) = (-10.0, 50.0);
    /// Allowed arc angle range in degrees.
    pub const CURVE_RANGE: (f64, f64) = (-360.0, 360.0);

    /// Construct a layer with editor defaults, centered on `canvas`.
    pub fn new(id: LayerId, canvas: Canvas) -> Self {
        Self {
            id,
            text: "Your Text".to_string(),
            text_transform: TextTransformMode::None,
            x: f64::from(canvas.width) / 2.0,
            y: f64::from(canvas.height) / 2.0,
            rotation_deg: 0.0,
            flip_horizontal: false,
            flip_vertical: false,
            skew_x_deg: 0.0,
            skew_y_deg: 0.0,
            font_family: "default".to_string(),
            size_px: (canvas.width as f32) / 4.0,
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            align: TextAlign::Center,
            letter_spacing_px: 0.0,
            color: Rgba8::WHITE,
            use_gradient: false,
            gradient: GradientStyle::default(),
            opacity: 1.0,
            shadow: ShadowStyle::default(),
            stroke: StrokeStyle::default(),
            curve_deg: 0.0,
            extrusion: ExtrusionStyle::default(),
            foreground: false,
        }
    }

    /// The string actually rendered after the display transform.
    pub fn display_text(&self) -> String {
        self.text_transform.apply(&self.text)
    }

    /// Whether the layer renders on a curved (arc) baseline.
    pub fn is_curved(&self) -> bool {
        self.curve_deg.abs() > 1.0
    }
}

/// Named whole-image filter selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FilterKind {
    /// No named filter.
    #[default]
    None,
    /// Brightness scaling.
    Brightness,
    /// Contrast scaling.
    Contrast,
    /// Desaturation toward luminance.
    Grayscale,
    /// Sepia tone.
    Sepia,
    /// Gaussian blur (`intensity / 10` pixels).
    Blur,
}

/// Per-image adjustment settings; one instance each for the background and
/// the mask-composited foreground.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerSettings {
    /// Named filter selection.
    pub filter: FilterKind,
    /// Named filter parameter (percent, or pixels for blur after `/ 10`).
    pub intensity: f64,
    /// Additive saturation percent.
    pub saturation: f64,
    /// Hue rotation in degrees.
    pub hue: f64,
    /// Exposure as an additional brightness percent.
    pub exposure: f64,
    /// Highlight lift percent (linear tone approximation).
    pub highlights: f64,
    /// Shadow lift percent (linear tone approximation).
    pub shadows: f64,
    /// Color temperature bias (warm positive, cool negative).
    pub temperature: f64,
    /// Sharpen amount, approximated as a contrast boost.
    pub sharpen: f64,
    /// Vignette strength percent.
    pub vignette: f64,
    /// Luminance noise strength percent.
    pub noise: f64,
    /// Image rotation in degrees about the surface center.
    pub rotation_deg: f64,
    /// Image scale percent about the surface center.
    pub scale_pct: f64,
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self {
            filter: FilterKind::None,
            intensity: 100.0,
            saturation: 0.0,
            hue: 0.0,
            exposure: 0.0,
            highlights: 0.0,
            shadows: 0.0,
            temperature: 0.0,
            sharpen: 0.0,
            vignette: 0.0,
            noise: 0.0,
            rotation_deg: 0.0,
            scale_pct: 100.0,
        }
    }
}

impl LayerSettings {
    /// Return `true` when rotation/scale leave the image untransformed.
    pub fn has_identity_placement(&self) -> bool {
        self.rotation_deg == 0.0 && self.scale_pct == 100.0
    }
}

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct RasterImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8 pixel bytes.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl RasterImage {
    /// Construct from premultiplied bytes, validating dimensions and length.
    pub fn from_premul_bytes(width: u32, height: u32, bytes: Vec<u8>) -> UnderlayResult<Self> {
        if width == 0 || height == 0 {
            return Err(UnderlayError::validation(
                "raster image dimensions must be > 0",
            ));
        }
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if bytes.len() != expected {
            return Err(UnderlayError::validation(format!(
                "raster image byte length {} does not match {}x{}",
                bytes.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(bytes),
        })
    }

    /// Canvas covering this image at zoom 1.0.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Replace per-pixel alpha with an externally computed opacity mask.
    ///
    /// `mask` is one byte per pixel, row-major, 255 fully opaque. This is how
    /// the segmentation collaborator's output becomes the foreground member of
    /// an [`ImagePair`]; the engine never computes the mask itself.
    pub fn with_alpha_mask(&self, mask: &[u8]) -> UnderlayResult<RasterImage> {
        let px = (self.width as usize).saturating_mul(self.height as usize);
        if mask.len() != px {
            return Err(UnderlayError::validation(format!(
                "alpha mask length {} does not match {}x{}",
                mask.len(),
                self.width,
                self.height
            )));
        }

        let mut out = Vec::with_capacity(px * 4);
        for (src, &m) in self.rgba8_premul.chunks_exact(4).zip(mask) {
            let a = src[3];
            // Source is premultiplied; rescale color by the new/old alpha ratio.
            let new_a = crate::foundation::math::mul_div255_u8(u16::from(a), u16::from(m));
            if a == 0 || new_a == 0 {
                out.extend_from_slice(&[0, 0, 0, 0]);
                continue;
            }
            for c in 0..3 {
                let straight = (u32::from(src[c]) * 255 + u32::from(a) / 2) / u32::from(a);
                let straight = straight.min(255) as u16;
                out.push(crate::foundation::math::mul_div255_u8(
                    straight,
                    u16::from(new_a),
                ));
            }
            out.push(new_a);
        }
        RasterImage::from_premul_bytes(self.width, self.height, out)
    }
}

/// The original photo plus its optional mask-composited foreground cutout.
#[derive(Clone, Debug)]
pub struct ImagePair {
    /// The uploaded photo.
    pub original: RasterImage,
    /// The subject cutout (original with mask-derived alpha), when available.
    pub foreground: Option<RasterImage>,
}

/// Identifies which of the two image adjustment groups a settings edit targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ImageGroup {
    /// The full background photo.
    Background,
    /// The mask-composited subject cutout.
    Foreground,
}

/// A complete in-memory edit session: layers, image pair, adjustment settings,
/// global transforms, and the undo history.
///
/// Rendering never mutates the session; all mutation funnels through
/// [`EditSession::apply`], which commits the resulting layer sequence to the
/// history.
#[derive(Debug)]
pub struct EditSession {
    /// Ordered text layers; array order is the sole z-order authority.
    pub layers: Vec<TextLayer>,
    /// Adjustments for the background photo.
    pub background: LayerSettings,
    /// Adjustments for the foreground cutout.
    pub foreground: LayerSettings,
    /// The background/foreground image pair.
    pub images: ImagePair,
    /// Mirror the whole composite across the vertical axis.
    pub flip_horizontal: bool,
    /// Mirror the whole composite across the horizontal axis.
    pub flip_vertical: bool,
    /// Draw-time render scale; stored coordinates are unaffected.
    pub zoom: f64,
    /// Noise source seed for this session.
    pub seed: u64,
    next_id: u64,
    history: EditHistory,
}

impl EditSession {
    /// Create a session over an image pair with default settings and no layers.
    pub fn new(images: ImagePair) -> Self {
        Self {
            layers: Vec::new(),
            background: LayerSettings::default(),
            foreground: LayerSettings::default(),
            images,
            flip_horizontal: false,
            flip_vertical: false,
            zoom: 1.0,
            seed: 0x5eed_1ab5,
            next_id: 0,
            history: EditHistory::new(),
        }
    }

    /// Canvas of the original image at zoom 1.0.
    pub fn canvas(&self) -> Canvas {
        self.images.original.canvas()
    }

    /// Apply a layer command, replacing the layer sequence and committing the
    /// result to the edit history.
    pub fn apply(&mut self, cmd: &LayerCommand) -> UnderlayResult<()> {
        let next =
            crate::session::commands::apply(&self.layers, cmd, self.canvas(), &mut self.next_id)?;
        self.layers = next;
        self.history.commit(&self.layers);
        Ok(())
    }

    /// Apply an adjustment edit to one of the two image groups.
    pub fn apply_adjustment(
        &mut self,
        group: ImageGroup,
        edit: &crate::session::commands::AdjustmentEdit,
    ) {
        let target = match group {
            ImageGroup::Background => &mut self.background,
            ImageGroup::Foreground => &mut self.foreground,
        };
        edit.apply_to(target);
    }

    /// Step back one history entry; returns `false` at the start (no-op).
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(layers) => {
                self.layers = layers.to_vec();
                true
            }
            None => false,
        }
    }

    /// Step forward one history entry; returns `false` at the end (no-op).
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(layers) => {
                self.layers = layers.to_vec();
                true
            }
            None => false,
        }
    }

    /// Read access to the edit history.
    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    /// Find a layer by id.
    pub fn layer(&self, id: LayerId) -> Option<&TextLayer> {
        self.layers.iter().find(|l| l.id == id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/model.rs"]
mod tests;
