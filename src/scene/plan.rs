use std::collections::HashMap;

use kurbo::Shape as _;

use crate::{
    assets::{
        decode::PreparedImage,
        svg_raster::{PHOTO_PICTOGRAM_SVG, PreparedSvg, parse_svg},
        text::{FontSet, PreparedText, TextBrushRgba8, TextLayoutEngine},
    },
    foundation::{
        core::{Affine, BezPath, Point, Rect, Rgba8Premul, Size, Vec2},
        error::InstaframeResult,
    },
    overlay::glyph::StampGlyph,
    scene::composition::CompositionScene,
};

/// Flattening tolerance for circles, in frame-local units.
const PATH_TOLERANCE: f64 = 0.05;

#[derive(Clone, Debug)]
/// Backend-agnostic draw list for one frame, in frame-local coordinates.
///
/// Ops are painted in order; the output scale is applied by the backend on top of every op's
/// transform, so the same plan produces the preview and the export.
pub struct ScenePlan {
    pub size: Size,
    pub ops: Vec<DrawOp>,
}

#[derive(Clone, Debug)]
/// Draw operation emitted by the compiler.
pub enum DrawOp {
    /// Axis-aligned solid fill.
    FillRect { rect: Rect, color: Rgba8Premul },
    /// Solid fill of `path` placed by `transform`.
    FillPath {
        path: BezPath,
        transform: Affine,
        color: Rgba8Premul,
    },
    /// Raster image mapped by `transform` (image pixels → frame-local) and cropped to `clip`.
    Image {
        image: PreparedImage,
        transform: Affine,
        clip: Rect,
    },
    /// Vector document placed by `transform` (document units → frame-local).
    Svg { svg: PreparedSvg, transform: Affine },
    /// Shaped text placed by `transform` (layout origin → frame-local).
    Text { text: PreparedText, transform: Affine },
}

/// Turns [`CompositionScene`]s into [`ScenePlan`]s, caching text layouts between frames.
pub struct SceneCompiler {
    fonts: FontSet,
    text: TextLayoutEngine,
    pictogram: PreparedSvg,
    stamp_layouts: HashMap<(StampGlyph, u32), PreparedText>,
    caption_layout: Option<(String, u32, PreparedText)>,
}

impl SceneCompiler {
    pub fn new(fonts: FontSet) -> InstaframeResult<Self> {
        Ok(Self {
            fonts,
            text: TextLayoutEngine::new(),
            pictogram: parse_svg(PHOTO_PICTOGRAM_SVG.as_bytes())?,
            stamp_layouts: HashMap::new(),
            caption_layout: None,
        })
    }

    pub fn fonts(&self) -> &FontSet {
        &self.fonts
    }

    #[tracing::instrument(skip_all, fields(stamps = scene.stamps.len()))]
    pub fn compile(&mut self, scene: &CompositionScene) -> InstaframeResult<ScenePlan> {
        let layout = &scene.layout;
        let mut ops = Vec::with_capacity(4 + scene.stamps.len());

        ops.push(DrawOp::FillRect {
            rect: layout.frame_rect(),
            color: Rgba8Premul::from_straight(layout.frame_rgba),
        });
        ops.push(DrawOp::FillRect {
            rect: layout.content_box,
            color: Rgba8Premul::from_straight(layout.content_rgba),
        });

        match &scene.photo {
            Some(image) => ops.push(DrawOp::Image {
                image: image.clone(),
                transform: cover_fit(image.width, image.height, layout.content_box),
                clip: layout.content_box,
            }),
            None => self.push_placeholder(&mut ops, scene),
        }

        if let Some(text) = self.caption_text(scene)? {
            let band = layout.caption_band();
            let (cx, cy) = text.visual_center();
            let origin = band.center() - Vec2::new(cx, cy);
            ops.push(DrawOp::Text {
                text,
                transform: Affine::translate(origin.to_vec2()),
            });
        }

        let extent = f64::from(layout.stamp_font_px);
        for stamp in &scene.stamps {
            let placement = stamp.transform().to_affine();
            match self.stamp_text(stamp.glyph(), layout.stamp_font_px)? {
                Some(text) => {
                    let (cx, cy) = text.visual_center();
                    ops.push(DrawOp::Text {
                        text,
                        transform: placement * Affine::translate(Vec2::new(-cx, -cy)),
                    });
                }
                None => ops.push(DrawOp::FillPath {
                    path: kurbo::Circle::new(Point::ZERO, extent / 2.0).to_path(PATH_TOLERANCE),
                    transform: placement,
                    color: Rgba8Premul::from_straight(stamp.glyph().fallback_rgba()),
                }),
            }
        }

        Ok(ScenePlan {
            size: scene.size(),
            ops,
        })
    }

    fn push_placeholder(&self, ops: &mut Vec<DrawOp>, scene: &CompositionScene) {
        let layout = &scene.layout;
        let center = layout.content_box.center();
        ops.push(DrawOp::FillPath {
            path: kurbo::Circle::new(Point::ZERO, layout.placeholder_diameter / 2.0)
                .to_path(PATH_TOLERANCE),
            transform: Affine::translate(center.to_vec2()),
            color: Rgba8Premul::from_straight(layout.placeholder_rgba),
        });
        let (w, h) = self.pictogram.size();
        ops.push(DrawOp::Svg {
            svg: self.pictogram.clone(),
            transform: Affine::translate((center - Vec2::new(w / 2.0, h / 2.0)).to_vec2()),
        });
    }

    fn caption_text(&mut self, scene: &CompositionScene) -> InstaframeResult<Option<PreparedText>> {
        if scene.caption.is_empty() {
            return Ok(None);
        }
        let Some(font) = &self.fonts.caption else {
            tracing::debug!("no caption font configured; caption not painted");
            return Ok(None);
        };
        let size_px = scene.layout.caption_font_px;
        if let Some((text, size_bits, prepared)) = &self.caption_layout
            && *text == scene.caption
            && *size_bits == size_px.to_bits()
        {
            return Ok(Some(prepared.clone()));
        }

        let prepared = self.text.layout_plain(
            &scene.caption,
            font,
            size_px,
            TextBrushRgba8::from_straight(scene.layout.caption_rgba),
        )?;
        self.caption_layout = Some((scene.caption.clone(), size_px.to_bits(), prepared.clone()));
        Ok(Some(prepared))
    }

    fn stamp_text(
        &mut self,
        glyph: StampGlyph,
        size_px: f32,
    ) -> InstaframeResult<Option<PreparedText>> {
        let Some(font) = &self.fonts.stamp else {
            return Ok(None);
        };
        let key = (glyph, size_px.to_bits());
        if let Some(prepared) = self.stamp_layouts.get(&key) {
            return Ok(Some(prepared.clone()));
        }
        let prepared = self.text.layout_plain(
            glyph.symbol(),
            font,
            size_px,
            TextBrushRgba8::from_straight(glyph.fallback_rgba()),
        )?;
        self.stamp_layouts.insert(key, prepared.clone());
        Ok(Some(prepared))
    }
}

/// Transform that scales an image to cover `target` (preserving aspect) and centers it.
pub(crate) fn cover_fit(width: u32, height: u32, target: Rect) -> Affine {
    let (w, h) = (f64::from(width.max(1)), f64::from(height.max(1)));
    let s = (target.width() / w).max(target.height() / h);
    Affine::translate(target.center().to_vec2())
        * Affine::scale(s)
        * Affine::translate(Vec2::new(-w / 2.0, -h / 2.0))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/plan.rs"]
mod tests;
