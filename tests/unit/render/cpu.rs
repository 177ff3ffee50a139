use std::sync::Arc;

use super::*;
use crate::{
    assets::{
        decode::{PreparedImage, PreparedPhoto},
        text::FontSet,
    },
    config::FrameLayout,
    foundation::core::{ScaleLimits, Size},
    overlay::{glyph::StampGlyph, model::OverlayModel},
    scene::{composition::CompositionScene, plan::SceneCompiler},
};

fn solid_photo(rgba: [u8; 4]) -> PreparedPhoto {
    PreparedPhoto {
        bytes: Arc::new(Vec::new()),
        image: PreparedImage {
            width: 4,
            height: 4,
            rgba8_premul: Arc::new(rgba.repeat(16)),
        },
    }
}

fn render(model: &OverlayModel, scale: f64) -> FrameRGBA {
    let layout = FrameLayout::default();
    let scene = CompositionScene::snapshot(model, &layout);
    let plan = SceneCompiler::new(FontSet::none())
        .unwrap()
        .compile(&scene)
        .unwrap();
    CpuBackend::new().render_plan(&plan, scale).unwrap()
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 3)
}

#[test]
fn empty_frame_has_white_border_black_content_and_gray_placeholder() {
    let model = OverlayModel::new(&FrameLayout::default(), ScaleLimits::default());
    let frame = render(&model, 1.0);

    assert_eq!((frame.width, frame.height), (350, 520));
    assert!(frame.premultiplied);
    assert_eq!(frame.pixel(5, 5), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(345, 515), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(40, 50), Some([0, 0, 0, 255]));

    // Gray at 70% over black, away from the pictogram.
    let [r, g, b, a] = frame.pixel(175, 206).unwrap();
    assert_eq!(a, 255);
    assert!(r == g && g == b, "{r} {g} {b}");
    assert!((80..=100).contains(&r), "{r}");
}

#[test]
fn photo_fills_content_box_and_stamps_paint_on_top() {
    let mut model = OverlayModel::new(&FrameLayout::default(), ScaleLimits::default());
    model.set_frame_source(Some(solid_photo([0, 0, 255, 255])));
    let frame = render(&model, 1.0);

    assert!(close(frame.pixel(30, 40).unwrap(), [0, 0, 255, 255]));
    assert!(close(frame.pixel(320, 430).unwrap(), [0, 0, 255, 255]));
    assert_eq!(frame.pixel(10, 10), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(175, 440), Some([255, 255, 255, 255]));

    model.add_stamp(StampGlyph::Star).unwrap();
    let frame = render(&model, 1.0);
    let tint = StampGlyph::Star.fallback_rgba();
    assert!(close(frame.pixel(175, 260).unwrap(), tint));
}

#[test]
fn output_size_follows_scale() {
    let model = OverlayModel::new(&FrameLayout::default(), ScaleLimits::default());
    let frame = render(&model, 3.0);
    assert_eq!((frame.width, frame.height), (1050, 1560));
    assert_eq!(frame.data.len(), 1050 * 1560 * 4);
    assert_eq!(frame.pixel(1040, 1550), Some([255, 255, 255, 255]));
}

#[test]
fn rejects_bad_scale() {
    let plan = ScenePlan {
        size: Size::new(10.0, 10.0),
        ops: Vec::new(),
    };
    assert!(CpuBackend::new().render_plan(&plan, 0.0).is_err());
    assert!(CpuBackend::new().render_plan(&plan, f64::NAN).is_err());
}

#[test]
fn premultiplied_plan_colors_round_trip_to_paint() {
    let c = color_to_cpu(Rgba8Premul::from_straight([128, 128, 128, 179]));
    let rgba = c.to_rgba8();
    assert!(rgba.r.abs_diff(128) <= 1 && rgba.a == 179, "{rgba:?}");
}
