use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::{
    core::{Point, Rect, ScaleLimits, Size},
    error::{InstaframeError, InstaframeResult},
};

/// Environment variable overriding [`EditorConfig::export_scale`].
pub const EXPORT_SCALE_ENV: &str = "INSTAFRAME_EXPORT_SCALE";

/// Editor-wide settings: frame geometry, render scales, transform limits and fonts.
///
/// Every field has a default matching the stock instant-film frame, so a partial JSON document
/// only needs to name what it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub layout: FrameLayout,
    /// Pixel density of exported rasters (pixels per frame-local unit).
    pub export_scale: f64,
    /// Pixel density of the live preview.
    pub preview_scale: f64,
    pub scale_limits: ScaleLimits,
    pub fonts: FontConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            layout: FrameLayout::default(),
            export_scale: 3.0,
            preview_scale: 1.0,
            scale_limits: ScaleLimits::default(),
            fonts: FontConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Read, parse and validate a JSON config file.
    pub fn from_json_file(path: &Path) -> InstaframeResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read editor config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply overrides from the process environment.
    ///
    /// Unparseable or non-positive values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(scale) = std::env::var(EXPORT_SCALE_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v > 0.0)
        {
            tracing::debug!(scale, "export scale overridden from environment");
            self.export_scale = scale;
        }
        self
    }

    pub fn validate(&self) -> InstaframeResult<()> {
        for (name, v) in [
            ("export_scale", self.export_scale),
            ("preview_scale", self.preview_scale),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(InstaframeError::validation(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        self.scale_limits.validate()?;
        self.layout.validate()
    }
}

/// Fixed geometry and colors of the frame, in frame-local units.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FrameLayout {
    pub frame_size: Size,
    /// Area the photo is cover-fitted and cropped into.
    pub content_box: Rect,
    /// Vertical gap between the content box and the caption band.
    pub caption_gap: f64,
    pub caption_band_height: f64,
    pub caption_font_px: f32,
    /// Em size of stamp glyphs; also the side of a stamp's unscaled hit square.
    pub stamp_font_px: f32,
    /// Where new stamps appear.
    pub spawn_point: Point,
    pub placeholder_diameter: f64,
    /// Straight-alpha RGBA colors.
    pub frame_rgba: [u8; 4],
    pub content_rgba: [u8; 4],
    pub caption_rgba: [u8; 4],
    pub placeholder_rgba: [u8; 4],
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self {
            frame_size: Size::new(350.0, 520.0),
            content_box: Rect::new(25.0, 36.0, 325.0, 436.0),
            caption_gap: 8.0,
            caption_band_height: 40.0,
            caption_font_px: 40.0,
            stamp_font_px: 60.0,
            spawn_point: Point::new(175.0, 260.0),
            placeholder_diameter: 74.0,
            frame_rgba: [255, 255, 255, 255],
            content_rgba: [0, 0, 0, 255],
            caption_rgba: [0, 0, 0, 255],
            placeholder_rgba: [128, 128, 128, 179],
        }
    }
}

impl FrameLayout {
    pub fn frame_rect(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.frame_size)
    }

    /// Band directly below the content box holding the caption text.
    pub fn caption_band(&self) -> Rect {
        let top = self.content_box.y1 + self.caption_gap;
        Rect::new(
            self.content_box.x0,
            top,
            self.content_box.x1,
            top + self.caption_band_height,
        )
    }

    pub fn validate(&self) -> InstaframeResult<()> {
        let frame = self.frame_rect();
        if !(self.frame_size.width > 0.0 && self.frame_size.height > 0.0) {
            return Err(InstaframeError::validation("frame size must be > 0"));
        }
        if self.content_box.width() <= 0.0 || self.content_box.height() <= 0.0 {
            return Err(InstaframeError::validation(
                "content box must have positive area",
            ));
        }
        if frame.intersect(self.content_box) != self.content_box {
            return Err(InstaframeError::validation(
                "content box must lie inside the frame",
            ));
        }
        if self.caption_band_height < 0.0 || self.caption_gap < 0.0 {
            return Err(InstaframeError::validation(
                "caption band height and gap must be >= 0",
            ));
        }
        for (name, v) in [
            ("caption_font_px", self.caption_font_px),
            ("stamp_font_px", self.stamp_font_px),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(InstaframeError::validation(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        if !frame.contains(self.spawn_point) {
            return Err(InstaframeError::validation(
                "spawn point must lie inside the frame",
            ));
        }
        if !self.placeholder_diameter.is_finite() || self.placeholder_diameter <= 0.0 {
            return Err(InstaframeError::validation(
                "placeholder diameter must be finite and > 0",
            ));
        }
        Ok(())
    }
}

/// Optional font files used for caption and stamp text.
///
/// Without a stamp font, stamps render as tinted discs; without a caption font the caption band
/// stays empty.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub caption: Option<PathBuf>,
    pub stamp: Option<PathBuf>,
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
