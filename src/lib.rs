//! Underlay is a layered text-behind-subject compositing engine.
//!
//! It renders styled text layers above and below the subject of a photo: the
//! subject is supplied as the original image plus an externally computed
//! alpha-mask cutout, and the engine composites background image, background
//! text, the cutout, and foreground text into one frame.
//!
//! # Pipeline overview
//!
//! 1. **Mutate**: [`EditSession::apply`] runs a [`LayerCommand`] over the
//!    layer sequence and commits the result to the [`EditHistory`]
//! 2. **Render**: [`CompositeEngine::render`] turns the session into a
//!    [`FrameRgba`] (background block, background layers, foreground block,
//!    foreground layers)
//! 3. **Export**: [`encode_png`] encodes a frame rendered at zoom 1.0
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Render never mutates**: `render(session)` is a pure function of the
//!   session; all mutation funnels through commands and the history.
//! - **Premultiplied RGBA8** end-to-end: surfaces carry premultiplied pixels.
//! - **Per-layer degradation**: a failing layer is skipped and logged, never
//!   fatal to the frame.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod filter;
mod foundation;
mod render;
mod session;
mod text;

pub use assets::decode::{decode_image, encode_png};
pub use filter::pipeline::{build_adjustments, FilterOp};
pub use foundation::core::{Affine, Canvas, Point, Rect, Rgba8, Vec2};
pub use foundation::error::{UnderlayError, UnderlayResult};
pub use render::composite::{CompositeEngine, FrameRgba};
pub use render::layer::{
    decoration_lines, gradient_axis, layer_passes, layer_transform, DecorationLine, Fill,
    GlyphPass, PaintDescriptor,
};
pub use session::commands::{AdjustmentEdit, LayerCommand, LayerEdit, ProFeature};
pub use session::history::{EditHistory, HistoryEntry};
pub use session::model::{
    EditSession, ExtrusionStyle, FilterKind, GradientStyle, ImageGroup, ImagePair, LayerId,
    LayerSettings, RasterImage, ShadowStyle, StrokeStyle, TextAlign, TextLayer, TextTransformMode,
};
pub use text::font::FontStore;
pub use text::layout::{align_offset, arc_placements, ArcGlyph, ShapedGlyph, ShapedRun};
