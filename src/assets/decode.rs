use std::{io::Cursor, sync::Arc};

use anyhow::Context;

use crate::foundation::{
    error::{InstaframeError, InstaframeResult},
    math::premultiply_rgba8_in_place,
};

/// Longest edge kept after decoding; larger photos are downsampled.
///
/// The content box is 300 units wide and exported at 3x, so anything beyond this only costs
/// memory.
pub const MAX_PHOTO_EDGE_PX: u32 = 4096;

#[derive(Clone, Debug)]
/// Decoded raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Photo selected as the frame source: the bytes the source returned plus their decoding.
#[derive(Clone, Debug)]
pub struct PreparedPhoto {
    pub bytes: Arc<Vec<u8>>,
    pub image: PreparedImage,
}

/// Decode encoded photo bytes, honoring EXIF orientation and capping the longest edge.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode_photo(bytes: Vec<u8>) -> InstaframeResult<PreparedPhoto> {
    let image = decode_image(&bytes)?;
    Ok(PreparedPhoto {
        bytes: Arc::new(bytes),
        image,
    })
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> InstaframeResult<PreparedImage> {
    use image::ImageDecoder as _;

    let mut decoder = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("sniff image format")?
        .into_decoder()
        .map_err(|e| InstaframeError::decode(e.to_string()))?;
    let orientation = decoder
        .orientation()
        .unwrap_or(image::metadata::Orientation::NoTransforms);
    let mut dyn_img = image::DynamicImage::from_decoder(decoder)
        .map_err(|e| InstaframeError::decode(e.to_string()))?;
    dyn_img.apply_orientation(orientation);

    if dyn_img.width() == 0 || dyn_img.height() == 0 {
        return Err(InstaframeError::decode("image has zero width or height"));
    }
    if dyn_img.width().max(dyn_img.height()) > MAX_PHOTO_EDGE_PX {
        tracing::debug!(
            width = dyn_img.width(),
            height = dyn_img.height(),
            "downsampling oversized photo"
        );
        dyn_img = dyn_img.resize(
            MAX_PHOTO_EDGE_PX,
            MAX_PHOTO_EDGE_PX,
            image::imageops::FilterType::Triangle,
        );
    }

    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
