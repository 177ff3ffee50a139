use std::{collections::HashMap, sync::Arc};

use crate::{
    assets::{
        svg_raster::{rasterize_svg_to_premul_rgba8, svg_raster_params},
        text::FontBytes,
    },
    foundation::{
        core::{Affine, BezPath, Canvas, Point, Rect, Rgba8Premul},
        error::{InstaframeError, InstaframeResult},
    },
    render::backend::{FrameRGBA, RenderBackend},
    scene::plan::{DrawOp, ScenePlan},
};

/// How many decoded photos stay uploaded as paints between renders.
const IMAGE_CACHE_CAPACITY: usize = 2;

/// CPU rasterizer built on `vello_cpu`.
///
/// Caches converted paints across renders so that dragging a stamp over a large photo does not
/// re-convert the photo every frame. Cache entries keep their source buffers alive, which makes
/// the buffer address a stable key.
#[derive(Default)]
pub struct CpuBackend {
    images: Vec<(Arc<Vec<u8>>, vello_cpu::Image)>,
    svgs: HashMap<(usize, u32, u32), (Arc<usvg::Tree>, vello_cpu::Image)>,
    fonts: HashMap<usize, (Arc<Vec<u8>>, vello_cpu::peniko::FontData)>,
}

impl CpuBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderBackend for CpuBackend {
    #[tracing::instrument(skip(self, plan), fields(ops = plan.ops.len()))]
    fn render_plan(&mut self, plan: &ScenePlan, scale: f64) -> InstaframeResult<FrameRGBA> {
        let canvas = Canvas::for_scaled(plan.size, scale)?;
        let (w, h) = (canvas.width as u16, canvas.height as u16);
        let root = Affine::scale(scale);

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        for op in &plan.ops {
            self.draw_op(&mut ctx, root, op)?;
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

impl CpuBackend {
    fn draw_op(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        root: Affine,
        op: &DrawOp,
    ) -> InstaframeResult<()> {
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match op {
            DrawOp::FillRect { rect, color } => {
                ctx.set_transform(affine_to_cpu(root));
                ctx.set_paint(color_to_cpu(*color));
                ctx.fill_rect(&rect_to_cpu(*rect));
                Ok(())
            }
            DrawOp::FillPath {
                path,
                transform,
                color,
            } => {
                ctx.set_transform(affine_to_cpu(root * *transform));
                ctx.set_paint(color_to_cpu(*color));
                ctx.fill_path(&bezpath_to_cpu(path));
                Ok(())
            }
            DrawOp::Image {
                image,
                transform,
                clip,
            } => {
                let paint = self.image_paint_for(image)?;
                ctx.set_transform(affine_to_cpu(root));
                ctx.set_paint(paint);
                // The paint is positioned in frame-local space; filling the clip rect crops it.
                ctx.set_paint_transform(affine_to_cpu(*transform));
                ctx.fill_rect(&rect_to_cpu(*clip));
                Ok(())
            }
            DrawOp::Svg { svg, transform } => {
                let (w, h, adjust) = svg_raster_params(&svg.tree, root * *transform)?;
                let key = (Arc::as_ptr(&svg.tree) as usize, w, h);
                let paint = match self.svgs.get(&key) {
                    Some((_, paint)) => paint.clone(),
                    None => {
                        let rgba8_premul = rasterize_svg_to_premul_rgba8(&svg.tree, w, h)?;
                        let paint = premul_image(&rgba8_premul, w, h)?;
                        self.svgs.insert(key, (svg.tree.clone(), paint.clone()));
                        paint
                    }
                };

                ctx.set_transform(affine_to_cpu(adjust));
                ctx.set_paint(paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w as f64, h as f64));
                Ok(())
            }
            DrawOp::Text { text, transform } => {
                let font = self.font_for(&text.font);
                ctx.set_transform(affine_to_cpu(root * *transform));

                for line in text.layout.lines() {
                    for item in line.items() {
                        let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                            continue;
                        };

                        let brush = run.style().brush;
                        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                            brush.r, brush.g, brush.b, brush.a,
                        ));

                        // Absolute positions: run offset, advances and line baseline applied.
                        let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        });
                        ctx.glyph_run(&font)
                            .font_size(run.run().font_size())
                            .fill_glyphs(glyphs);
                    }
                }
                Ok(())
            }
        }
    }

    fn image_paint_for(
        &mut self,
        image: &crate::assets::decode::PreparedImage,
    ) -> InstaframeResult<vello_cpu::Image> {
        if let Some((_, paint)) = self
            .images
            .iter()
            .find(|(buf, _)| Arc::ptr_eq(buf, &image.rgba8_premul))
        {
            return Ok(paint.clone());
        }

        let paint = premul_image(image.rgba8_premul.as_slice(), image.width, image.height)?;
        if self.images.len() >= IMAGE_CACHE_CAPACITY {
            self.images.remove(0);
        }
        self.images.push((image.rgba8_premul.clone(), paint.clone()));
        Ok(paint)
    }

    fn font_for(&mut self, font: &FontBytes) -> vello_cpu::peniko::FontData {
        let key = Arc::as_ptr(&font.0) as usize;
        let (_, data) = self.fonts.entry(key).or_insert_with(|| {
            let blob = vello_cpu::peniko::Blob::from(font.0.as_ref().clone());
            (font.0.clone(), vello_cpu::peniko::FontData::new(blob, 0))
        });
        data.clone()
    }
}

fn premul_image(rgba8_premul: &[u8], width: u32, height: u32) -> InstaframeResult<vello_cpu::Image> {
    let pixmap = image_premul_bytes_to_pixmap(rgba8_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> InstaframeResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| InstaframeError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| InstaframeError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(InstaframeError::render(
            "prepared image byte length mismatch",
        ));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], a,
        ]));
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn color_to_cpu(c: Rgba8Premul) -> vello_cpu::peniko::Color {
    // Paint colors are straight alpha; plan colors are premultiplied.
    let unpremul = |v: u8| -> u8 {
        if c.a == 0 {
            0
        } else {
            ((u32::from(v) * 255 + u32::from(c.a) / 2) / u32::from(c.a)).min(255) as u8
        }
    };
    vello_cpu::peniko::Color::from_rgba8(unpremul(c.r), unpremul(c.g), unpremul(c.b), c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
