//! Font registration and text shaping.
//!
//! Fonts are supplied as raw bytes under caller-chosen catalog keys; shaping
//! goes through Parley and produces [`ShapedRun`]s that the renderer turns into
//! glyph draw calls.

use std::collections::HashMap;

use crate::{
    foundation::error::{UnderlayError, UnderlayResult},
    text::layout::{ShapedGlyph, ShapedRun},
};

struct FontEntry {
    family_name: String,
    data: vello_cpu::peniko::FontData,
}

/// Registry of raw font data plus the Parley contexts used to shape with it.
///
/// Layer styles reference fonts by the key they were registered under; an
/// unknown key falls back to the first font registered, so a stale style
/// degrades to a wrong face rather than a dropped layer.
pub struct FontStore {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    entries: HashMap<String, FontEntry>,
    fallback_key: Option<String>,
}

impl Default for FontStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FontStore {
    /// Construct an empty store with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            entries: HashMap::new(),
            fallback_key: None,
        }
    }

    /// Register a font from raw bytes under `key`.
    ///
    /// The first registration also becomes the fallback for unknown keys.
    pub fn register(&mut self, key: &str, font_bytes: Vec<u8>) -> UnderlayResult<()> {
        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font_bytes.clone()),
            None,
        );
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            UnderlayError::validation("no font families registered from font bytes")
        })?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| UnderlayError::validation("registered font family has no name"))?
            .to_string();

        let data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        self.entries.insert(
            key.to_string(),
            FontEntry { family_name, data },
        );
        if self.fallback_key.is_none() {
            self.fallback_key = Some(key.to_string());
        }
        Ok(())
    }

    /// Whether any font has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn resolve(&self, key: &str) -> UnderlayResult<&FontEntry> {
        if let Some(entry) = self.entries.get(key) {
            return Ok(entry);
        }
        self.fallback_key
            .as_deref()
            .and_then(|k| self.entries.get(k))
            .ok_or_else(|| UnderlayError::layout("no fonts registered"))
    }

    /// Shape a single line of text.
    ///
    /// `letter_spacing_px` is applied by Parley as inter-glyph advance; pass
    /// zero when spacing is handled elsewhere (arc layout spaces glyphs
    /// angularly instead). Empty or whitespace-only shaping output yields a
    /// run with no glyphs, which callers treat as nothing to draw.
    pub fn shape_line(
        &mut self,
        text: &str,
        family_key: &str,
        size_px: f32,
        letter_spacing_px: f32,
        bold: bool,
        italic: bool,
    ) -> UnderlayResult<ShapedRun> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(UnderlayError::layout("text size_px must be finite and > 0"));
        }
        let (family_name, data) = {
            let entry = self.resolve(family_key)?;
            (entry.family_name.clone(), entry.data.clone())
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        if letter_spacing_px != 0.0 {
            builder.push_default(parley::style::StyleProperty::LetterSpacing(
                letter_spacing_px,
            ));
        }
        if bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }
        if italic {
            builder.push_default(parley::style::StyleProperty::FontStyle(
                parley::style::FontStyle::Italic,
            ));
        }

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut glyphs = Vec::new();
        let mut ascent = 0.0_f32;
        let mut descent = 0.0_f32;
        // Single-line model: everything shapes onto the first line.
        if let Some(line) = layout.lines().next() {
            let m = line.metrics();
            ascent = m.ascent;
            descent = m.descent;
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.glyphs().map(|g| ShapedGlyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                    advance: g.advance,
                }));
            }
        }

        Ok(ShapedRun {
            glyphs,
            ascent,
            descent,
            font: data,
            font_size: size_px,
            letter_spacing: letter_spacing_px,
        })
    }
}

impl std::fmt::Debug for FontStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontStore")
            .field("fonts", &self.entries.len())
            .finish()
    }
}
