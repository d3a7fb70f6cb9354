use crate::{
    foundation::core::{Canvas, Rgba8},
    foundation::error::{UnderlayError, UnderlayResult},
    session::model::{
        ExtrusionStyle, FilterKind, GradientStyle, LayerId, LayerSettings, ShadowStyle,
        StrokeStyle, TextAlign, TextLayer, TextTransformMode,
    },
};

/// Subscription-gated capabilities. The gate is informational UI policy only:
/// the engine always accepts and renders gated fields regardless.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ProFeature {
    /// Gradient text fill.
    Gradient,
    /// Arc (curved) baseline layout.
    ArcCurve,
    /// Skew shear transforms.
    Skew,
    /// Letter spacing.
    LetterSpacing,
    /// Pseudo-3D extrusion.
    Extrusion,
    /// Vignette post pass.
    Vignette,
    /// Noise post pass.
    Noise,
    /// Sharpen adjustment.
    Sharpen,
    /// Highlight tone adjustment.
    Highlights,
    /// Shadow tone adjustment.
    Shadows,
    /// Color temperature adjustment.
    Temperature,
}

/// A single-field edit to one text layer.
///
/// Values are clamped into their documented ranges on application, so a
/// command stream replayed from serialized form cannot produce an
/// out-of-range layer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum LayerEdit {
    /// Replace the stored text.
    Text(String),
    /// Set the display-only case transform.
    TextTransform(TextTransformMode),
    /// Move the anchor (image-pixel units at zoom 1.0).
    Position {
        /// New anchor x.
        x: f64,
        /// New anchor y.
        y: f64,
    },
    /// Set absolute rotation; wrapped to `[0, 360)`.
    Rotation(f64),
    /// Set mirror flags.
    Flip {
        /// Mirror across the vertical axis.
        horizontal: bool,
        /// Mirror across the horizontal axis.
        vertical: bool,
    },
    /// Set shear angles; clamped to `[-45, 45]`.
    Skew {
        /// Horizontal shear in degrees.
        x_deg: f64,
        /// Vertical shear in degrees.
        y_deg: f64,
    },
    /// Set the font catalog key.
    FontFamily(String),
    /// Set the font size in pixels (floored at 1).
    Size(f32),
    /// Toggle bold.
    Bold(bool),
    /// Toggle italic.
    Italic(bool),
    /// Toggle underline.
    Underline(bool),
    /// Toggle strikethrough.
    Strikethrough(bool),
    /// Set run alignment.
    Align(TextAlign),
    /// Set letter spacing; clamped to `[-10, 50]`.
    LetterSpacing(f32),
    /// Set the solid fill color.
    Color(Rgba8),
    /// Select gradient or solid fill (both are always retained).
    UseGradient(bool),
    /// Set gradient fill parameters.
    Gradient(GradientStyle),
    /// Set layer opacity; clamped to `[0, 1]`.
    Opacity(f64),
    /// Set drop shadow parameters.
    Shadow(ShadowStyle),
    /// Set stroke parameters (width floored at 0).
    Stroke(StrokeStyle),
    /// Set the arc angle in degrees; clamped to `[-360, 360]`.
    Curve(f64),
    /// Set extrusion parameters (depth floored at 0).
    Extrusion(ExtrusionStyle),
}

impl LayerEdit {
    /// The gated capability this edit exercises, if any.
    pub fn pro_feature(&self) -> Option<ProFeature> {
        match self {
            LayerEdit::UseGradient(true) | LayerEdit::Gradient(_) => Some(ProFeature::Gradient),
            LayerEdit::Curve(_) => Some(ProFeature::ArcCurve),
            LayerEdit::Skew { .. } => Some(ProFeature::Skew),
            LayerEdit::LetterSpacing(_) => Some(ProFeature::LetterSpacing),
            LayerEdit::Extrusion(_) => Some(ProFeature::Extrusion),
            _ => None,
        }
    }

    /// Whether applying this edit is subscription-gated in the surrounding UI.
    pub fn requires_pro(&self) -> bool {
        self.pro_feature().is_some()
    }

    fn apply_to(&self, layer: &mut TextLayer) {
        match self {
            LayerEdit::Text(t) => layer.text = t.clone(),
            LayerEdit::TextTransform(m) => layer.text_transform = *m,
            LayerEdit::Position { x, y } => {
                layer.x = *x;
                layer.y = *y;
            }
            LayerEdit::Rotation(deg) => layer.rotation_deg = deg.rem_euclid(360.0),
            LayerEdit::Flip {
                horizontal,
                vertical,
            } => {
                layer.flip_horizontal = *horizontal;
                layer.flip_vertical = *vertical;
            }
            LayerEdit::Skew { x_deg, y_deg } => {
                let (lo, hi) = TextLayer::SKEW_RANGE;
                layer.skew_x_deg = x_deg.clamp(lo, hi);
                layer.skew_y_deg = y_deg.clamp(lo, hi);
            }
            LayerEdit::FontFamily(f) => layer.font_family = f.clone(),
            LayerEdit::Size(px) => layer.size_px = px.max(1.0),
            LayerEdit::Bold(v) => layer.bold = *v,
            LayerEdit::Italic(v) => layer.italic = *v,
            LayerEdit::Underline(v) => layer.underline = *v,
            LayerEdit::Strikethrough(v) => layer.strikethrough = *v,
            LayerEdit::Align(a) => layer.align = *a,
            LayerEdit::LetterSpacing(px) => {
                let (lo, hi) = TextLayer::LETTER_SPACING_RANGE;
                layer.letter_spacing_px = px.clamp(lo, hi);
            }
            LayerEdit::Color(c) => layer.color = *c,
            LayerEdit::UseGradient(v) => layer.use_gradient = *v,
            LayerEdit::Gradient(g) => layer.gradient = *g,
            LayerEdit::Opacity(o) => layer.opacity = o.clamp(0.0, 1.0),
            LayerEdit::Shadow(s) => layer.shadow = *s,
            LayerEdit::Stroke(s) => {
                layer.stroke = StrokeStyle {
                    color: s.color,
                    width_px: s.width_px.max(0.0),
                }
            }
            LayerEdit::Curve(deg) => {
                let (lo, hi) = TextLayer::CURVE_RANGE;
                layer.curve_deg = deg.clamp(lo, hi);
            }
            LayerEdit::Extrusion(e) => {
                layer.extrusion = ExtrusionStyle {
                    depth_px: e.depth_px.max(0.0),
                    color: e.color,
                    angle_deg: e.angle_deg,
                }
            }
        }
    }
}

/// A committed mutation of the layer sequence.
///
/// Each command is a pure transform `old layers -> new layers`; the session
/// feeds the result to the edit history, so every variant is one undo step.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum LayerCommand {
    /// Append a new layer with editor defaults, centered on the canvas.
    Add,
    /// Remove the identified layer.
    Delete(LayerId),
    /// Clone the identified layer under a fresh id, nudged down-right.
    Duplicate(LayerId),
    /// Add `delta_deg` to the layer's rotation, wrapping mod 360.
    Rotate {
        /// Target layer.
        id: LayerId,
        /// Rotation delta in degrees.
        delta_deg: f64,
    },
    /// Flip the layer between the background and foreground groups.
    ToggleForeground(LayerId),
    /// Apply a single-field edit.
    Edit {
        /// Target layer.
        id: LayerId,
        /// The edit to apply.
        edit: LayerEdit,
    },
    /// Move the identified layer to a new position in the draw order.
    Reorder {
        /// Target layer.
        id: LayerId,
        /// Destination index (clamped to the sequence length).
        to_index: usize,
    },
    /// Remove all layers.
    Clear,
}

/// Apply `cmd` to `layers`, returning the new sequence.
///
/// `next_id` is the session's id counter; `Add` and `Duplicate` advance it.
pub fn apply(
    layers: &[TextLayer],
    cmd: &LayerCommand,
    canvas: Canvas,
    next_id: &mut u64,
) -> UnderlayResult<Vec<TextLayer>> {
    let mut out = layers.to_vec();
    match cmd {
        LayerCommand::Add => {
            let id = LayerId(*next_id);
            *next_id += 1;
            out.push(TextLayer::new(id, canvas));
        }
        LayerCommand::Delete(id) => {
            let i = index_of(&out, *id)?;
            out.remove(i);
        }
        LayerCommand::Duplicate(id) => {
            let i = index_of(&out, *id)?;
            let mut copy = out[i].clone();
            copy.id = LayerId(*next_id);
            *next_id += 1;
            copy.x += 20.0;
            copy.y += 20.0;
            out.push(copy);
        }
        LayerCommand::Rotate { id, delta_deg } => {
            let i = index_of(&out, *id)?;
            out[i].rotation_deg = (out[i].rotation_deg + delta_deg).rem_euclid(360.0);
        }
        LayerCommand::ToggleForeground(id) => {
            let i = index_of(&out, *id)?;
            out[i].foreground = !out[i].foreground;
        }
        LayerCommand::Edit { id, edit } => {
            let i = index_of(&out, *id)?;
            edit.apply_to(&mut out[i]);
        }
        LayerCommand::Reorder { id, to_index } => {
            let i = index_of(&out, *id)?;
            let layer = out.remove(i);
            let to = (*to_index).min(out.len());
            out.insert(to, layer);
        }
        LayerCommand::Clear => out.clear(),
    }
    Ok(out)
}

fn index_of(layers: &[TextLayer], id: LayerId) -> UnderlayResult<usize> {
    layers
        .iter()
        .position(|l| l.id == id)
        .ok_or_else(|| UnderlayError::validation(format!("unknown layer id {}", id.0)))
}

/// A single-field edit to one image group's adjustment settings.
///
/// Settings edits do not participate in the undo history; only the layer
/// sequence is snapshotted.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum AdjustmentEdit {
    /// Select the named filter.
    Filter(FilterKind),
    /// Set the named filter parameter.
    Intensity(f64),
    /// Set additive saturation percent.
    Saturation(f64),
    /// Set hue rotation in degrees.
    Hue(f64),
    /// Set exposure percent.
    Exposure(f64),
    /// Set highlight lift percent.
    Highlights(f64),
    /// Set shadow lift percent.
    Shadows(f64),
    /// Set color temperature bias.
    Temperature(f64),
    /// Set sharpen amount.
    Sharpen(f64),
    /// Set vignette strength percent.
    Vignette(f64),
    /// Set noise strength percent.
    Noise(f64),
    /// Set image rotation in degrees.
    Rotation(f64),
    /// Set image scale percent.
    Scale(f64),
}

impl AdjustmentEdit {
    /// The gated capability this edit exercises, if any.
    pub fn pro_feature(&self) -> Option<ProFeature> {
        match self {
            AdjustmentEdit::Vignette(_) => Some(ProFeature::Vignette),
            AdjustmentEdit::Noise(_) => Some(ProFeature::Noise),
            AdjustmentEdit::Sharpen(_) => Some(ProFeature::Sharpen),
            AdjustmentEdit::Highlights(_) => Some(ProFeature::Highlights),
            AdjustmentEdit::Shadows(_) => Some(ProFeature::Shadows),
            AdjustmentEdit::Temperature(_) => Some(ProFeature::Temperature),
            _ => None,
        }
    }

    /// Whether applying this edit is subscription-gated in the surrounding UI.
    pub fn requires_pro(&self) -> bool {
        self.pro_feature().is_some()
    }

    pub(crate) fn apply_to(&self, settings: &mut LayerSettings) {
        match self {
            AdjustmentEdit::Filter(f) => settings.filter = *f,
            AdjustmentEdit::Intensity(v) => settings.intensity = v.max(0.0),
            AdjustmentEdit::Saturation(v) => settings.saturation = *v,
            AdjustmentEdit::Hue(v) => settings.hue = *v,
            AdjustmentEdit::Exposure(v) => settings.exposure = *v,
            AdjustmentEdit::Highlights(v) => settings.highlights = *v,
            AdjustmentEdit::Shadows(v) => settings.shadows = *v,
            AdjustmentEdit::Temperature(v) => settings.temperature = *v,
            AdjustmentEdit::Sharpen(v) => settings.sharpen = *v,
            AdjustmentEdit::Vignette(v) => settings.vignette = v.clamp(0.0, 100.0),
            AdjustmentEdit::Noise(v) => settings.noise = v.clamp(0.0, 100.0),
            AdjustmentEdit::Rotation(v) => settings.rotation_deg = *v,
            AdjustmentEdit::Scale(v) => settings.scale_pct = v.max(0.0),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/commands.rs"]
mod tests;
