use std::{collections::HashMap, path::Path, sync::Arc};

use anyhow::Context;

use crate::{
    config::FontConfig,
    foundation::error::{InstaframeError, InstaframeResult},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl TextBrushRgba8 {
    pub fn from_straight(rgba: [u8; 4]) -> Self {
        let [r, g, b, a] = rgba;
        Self { r, g, b, a }
    }
}

/// Raw bytes of one font file, shared between layout and rasterization.
#[derive(Clone, Debug)]
pub struct FontBytes(pub Arc<Vec<u8>>);

impl FontBytes {
    fn key(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

/// Fonts available to the scene compiler.
#[derive(Clone, Debug, Default)]
pub struct FontSet {
    pub caption: Option<FontBytes>,
    pub stamp: Option<FontBytes>,
}

impl FontSet {
    /// Font set with no fonts: stamps fall back to tinted discs and captions are not painted.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_bytes(caption: Option<Vec<u8>>, stamp: Option<Vec<u8>>) -> Self {
        Self {
            caption: caption.map(|b| FontBytes(Arc::new(b))),
            stamp: stamp.map(|b| FontBytes(Arc::new(b))),
        }
    }

    /// Read the configured font files.
    pub fn load(cfg: &FontConfig) -> InstaframeResult<Self> {
        fn read(path: Option<&Path>) -> InstaframeResult<Option<FontBytes>> {
            let Some(path) = path else {
                return Ok(None);
            };
            let bytes = std::fs::read(path)
                .with_context(|| format!("read font file '{}'", path.display()))?;
            Ok(Some(FontBytes(Arc::new(bytes))))
        }

        // Reuse one buffer when caption and stamps share a file.
        let caption = read(cfg.caption.as_deref())?;
        let stamp = if cfg.stamp.is_some() && cfg.stamp == cfg.caption {
            caption.clone()
        } else {
            read(cfg.stamp.as_deref())?
        };
        Ok(Self { caption, stamp })
    }
}

#[derive(Clone)]
/// Shaped text ready for rendering.
pub struct PreparedText {
    /// Fully built text layout.
    pub layout: Arc<parley::Layout<TextBrushRgba8>>,
    /// Font bytes used to build glyph outlines.
    pub font: FontBytes,
}

impl PreparedText {
    /// Width and height of the laid out text.
    pub fn size(&self) -> (f64, f64) {
        (
            f64::from(self.layout.width()),
            f64::from(self.layout.height()),
        )
    }

    /// Point in layout space that should land on the anchor when the text is centered.
    ///
    /// Horizontally the middle of the advance; vertically midway between the first line's ascent
    /// and descent, so glyph ink rather than line leading gets centered.
    pub fn visual_center(&self) -> (f64, f64) {
        let (w, h) = self.size();
        let Some(line) = self.layout.lines().next() else {
            return (w / 2.0, h / 2.0);
        };
        let m = line.metrics();
        (
            w / 2.0,
            f64::from(m.baseline) - f64::from(m.ascent - m.descent) / 2.0,
        )
    }
}

impl std::fmt::Debug for PreparedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedText")
            .field("layout_ptr", &Arc::as_ptr(&self.layout))
            .field("font_bytes_len", &self.font.0.len())
            .finish()
    }
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: HashMap<usize, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    fn family_for(&mut self, font: &FontBytes) -> InstaframeResult<String> {
        if let Some(name) = self.families.get(&font.key()) {
            return Ok(name.clone());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.0.as_ref().clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            InstaframeError::render("no font families registered from font bytes")
        })?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| InstaframeError::render("registered font family has no name"))?
            .to_string();
        self.families.insert(font.key(), family_name.clone());
        Ok(family_name)
    }

    /// Shape and lay out a single run of plain text.
    pub fn layout_plain(
        &mut self,
        text: &str,
        font: &FontBytes,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> InstaframeResult<PreparedText> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(InstaframeError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let family_name = self.family_for(font)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        Ok(PreparedText {
            layout: Arc::new(layout),
            font: font.clone(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
