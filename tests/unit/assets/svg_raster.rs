use super::*;

#[test]
fn pictogram_parses_with_expected_size() {
    let svg = parse_svg(PHOTO_PICTOGRAM_SVG.as_bytes()).unwrap();
    assert_eq!(svg.size(), (34.0, 28.0));
}

#[test]
fn parse_svg_rejects_garbage() {
    assert!(parse_svg(b"<svg").is_err());
}

#[test]
fn raster_params_follow_output_scale() {
    let svg = parse_svg(PHOTO_PICTOGRAM_SVG.as_bytes()).unwrap();
    let (w, h, adjust) = svg_raster_params(&svg.tree, Affine::scale(3.0)).unwrap();
    assert_eq!((w, h), (102, 84));
    // The raster's far corner lands on the scaled document corner.
    let corner = adjust * kurbo::Point::new(102.0, 84.0);
    assert!((corner.x - 102.0).abs() < 1e-9);
    assert!((corner.y - 84.0).abs() < 1e-9);
}

#[test]
fn rasterized_pictogram_has_white_ink() {
    let svg = parse_svg(PHOTO_PICTOGRAM_SVG.as_bytes()).unwrap();
    let px = rasterize_svg_to_premul_rgba8(&svg.tree, 34, 28).unwrap();
    assert_eq!(px.len(), 34 * 28 * 4);
    assert!(px.chunks_exact(4).any(|p| p == [255, 255, 255, 255]));
    // Center of the top-left corner region stays transparent.
    assert_eq!(&px[..4], &[0, 0, 0, 0]);
}
