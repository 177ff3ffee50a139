use std::sync::Arc;

use anyhow::Context;

use crate::foundation::{
    core::Affine,
    error::{InstaframeError, InstaframeResult},
};

/// White "photo" pictogram shown inside the placeholder circle while no photo is selected.
pub(crate) const PHOTO_PICTOGRAM_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="34" height="28" viewBox="0 0 34 28">
  <rect x="1.5" y="1.5" width="31" height="25" rx="4" fill="none" stroke="#ffffff" stroke-width="3"/>
  <circle cx="11" cy="9.5" r="3" fill="#ffffff"/>
  <path d="M5 23 L13 14 L18 19 L23 12 L29 23 Z" fill="#ffffff"/>
</svg>"##;

#[derive(Clone, Debug)]
/// Parsed SVG document ready for rasterization.
pub struct PreparedSvg {
    /// Parsed SVG tree.
    pub tree: Arc<usvg::Tree>,
}

impl PreparedSvg {
    /// Logical width and height of the document.
    pub fn size(&self) -> (f64, f64) {
        let size = self.tree.size();
        (f64::from(size.width()), f64::from(size.height()))
    }
}

/// Parse SVG bytes into a prepared `usvg` tree.
pub fn parse_svg(bytes: &[u8]) -> InstaframeResult<PreparedSvg> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(PreparedSvg {
        tree: Arc::new(tree),
    })
}

/// Compute a raster size for an SVG given the full draw transform (including output scale).
///
/// The returned `(width, height, transform_adjust)` are used as:
///
/// - rasterize the SVG into a pixmap of `(width, height)`
/// - draw the resulting image with `transform_adjust` (not the original transform)
///
/// This keeps the pictogram crisp in 3x exports instead of upscaling a 1x raster.
pub(crate) fn svg_raster_params(
    tree: &usvg::Tree,
    transform: Affine,
) -> InstaframeResult<(u32, u32, Affine)> {
    fn to_px(v: f32) -> InstaframeResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(InstaframeError::render("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let size = tree.size();
    let base_w = to_px(size.width())?;
    let base_h = to_px(size.height())?;

    let [a, b, c, d, _e, _f] = transform.as_coeffs();
    let sx = (a * a + b * b).sqrt().max(1e-6);
    let sy = (c * c + d * d).sqrt().max(1e-6);

    let w = ((base_w as f64) * sx).ceil().max(1.0) as u32;
    let h = ((base_h as f64) * sy).ceil().max(1.0) as u32;

    const MAX_DIM: u32 = 8_192;
    if w > MAX_DIM || h > MAX_DIM {
        return Err(InstaframeError::render(format!(
            "svg raster size too large: {w}x{h} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    // Pixel-space coordinates of the raster map back into the SVG's logical space before the
    // original transform.
    let sx_px = (w as f64) / (base_w as f64);
    let sy_px = (h as f64) / (base_h as f64);
    let inv = Affine::scale_non_uniform(1.0 / sx_px, 1.0 / sy_px);
    let transform_adjust = transform * inv;

    Ok((w, h, transform_adjust))
}

pub(crate) fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> InstaframeResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| InstaframeError::render("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
