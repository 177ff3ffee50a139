use std::io::Cursor;

use anyhow::Context;

use crate::{
    assets::text::FontSet,
    foundation::error::{InstaframeError, InstaframeResult},
    render::{
        backend::{BackendKind, RenderBackend, create_backend},
        pipeline::render_scene,
    },
    scene::{composition::CompositionScene, plan::SceneCompiler},
};

/// Flattened export raster in straight-alpha RGBA8.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportedImage {
    pub width: u32,
    pub height: u32,
    /// Row-major straight-alpha RGBA8 bytes.
    pub rgba8: Vec<u8>,
    /// Pixels per frame-local unit the image was rendered at.
    pub scale: f64,
}

impl ExportedImage {
    /// Encode as PNG.
    pub fn encode_png(&self) -> InstaframeResult<Vec<u8>> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.rgba8.clone())
            .ok_or_else(|| InstaframeError::render("export buffer does not match its size"))?;
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode export png")?;
        Ok(buf)
    }
}

/// Renders finished compositions at the export scale.
pub struct Exporter {
    compiler: SceneCompiler,
    backend: Box<dyn RenderBackend + Send>,
    scale: f64,
}

impl Exporter {
    pub fn new(fonts: FontSet, scale: f64) -> InstaframeResult<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(InstaframeError::validation(
                "export scale must be finite and > 0",
            ));
        }
        Ok(Self {
            compiler: SceneCompiler::new(fonts)?,
            backend: create_backend(BackendKind::Cpu),
            scale,
        })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Render `scene` into a flattened raster.
    ///
    /// Fails with [`InstaframeError::Precondition`] when the scene has no photo.
    #[tracing::instrument(skip_all, fields(scale = self.scale))]
    pub fn export(&mut self, scene: &CompositionScene) -> InstaframeResult<ExportedImage> {
        if scene.photo.is_none() {
            tracing::error!("export requested without a photo");
            return Err(InstaframeError::precondition(
                "export requires a selected photo",
            ));
        }

        let frame = render_scene(
            &mut self.compiler,
            self.backend.as_mut(),
            scene,
            self.scale,
        )?
        .into_straight();

        tracing::info!(width = frame.width, height = frame.height, "scene exported");
        Ok(ExportedImage {
            width: frame.width,
            height: frame.height,
            rgba8: frame.data,
            scale: self.scale,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/exporter.rs"]
mod tests;
