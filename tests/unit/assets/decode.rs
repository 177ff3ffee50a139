use std::io::Cursor;

use super::*;

fn png_bytes(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();
    let prepared = decode_image(&png_bytes(img)).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_photo_keeps_source_bytes() {
    let bytes = png_bytes(image::RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 255])));
    let photo = decode_photo(bytes.clone()).unwrap();
    assert_eq!(photo.bytes.as_slice(), bytes.as_slice());
    assert_eq!((photo.image.width, photo.image.height), (3, 2));
}

#[test]
fn garbage_bytes_are_a_decode_error() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, InstaframeError::Decode(_)), "{err}");
}

#[test]
fn oversized_photos_are_downsampled() {
    let img = image::RgbaImage::from_pixel(MAX_PHOTO_EDGE_PX + 4, 2, image::Rgba([9, 9, 9, 255]));
    let prepared = decode_image(&png_bytes(img)).unwrap();
    assert!(prepared.width <= MAX_PHOTO_EDGE_PX);
    assert!(prepared.height >= 1);
    assert_eq!(
        prepared.rgba8_premul.len(),
        (prepared.width * prepared.height * 4) as usize
    );
}
