use std::{collections::HashSet, f64::consts::PI, sync::Arc};

use super::*;
use crate::assets::decode::PreparedImage;

fn photo() -> PreparedPhoto {
    PreparedPhoto {
        bytes: Arc::new(vec![1, 2, 3]),
        image: PreparedImage {
            width: 2,
            height: 2,
            rgba8_premul: Arc::new(vec![255; 16]),
        },
    }
}

fn model_with_photo() -> OverlayModel {
    let mut m = OverlayModel::new(&FrameLayout::default(), ScaleLimits::default());
    m.set_frame_source(Some(photo()));
    m
}

#[test]
fn add_stamp_requires_photo() {
    let mut m = OverlayModel::new(&FrameLayout::default(), ScaleLimits::default());
    let err = m.add_stamp(StampGlyph::Heart).unwrap_err();
    assert!(matches!(err, InstaframeError::Precondition(_)));
    assert!(m.stamps().is_empty());
}

#[test]
fn add_stamp_appends_unique_ids_with_requested_glyphs() {
    let mut m = model_with_photo();
    let requested: Vec<StampGlyph> = StampGlyph::ALL.iter().copied().cycle().take(11).collect();
    let ids: Vec<StampId> = requested
        .iter()
        .map(|g| m.add_stamp(*g).unwrap())
        .collect();

    assert_eq!(m.stamps().len(), requested.len());
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len());
    for ((stamp, glyph), id) in m.stamps().iter().zip(&requested).zip(&ids) {
        assert_eq!(stamp.glyph(), *glyph);
        assert_eq!(stamp.id(), *id);
        assert_eq!(stamp.transform(), Transform::at(Point::new(175.0, 260.0)));
    }
}

#[test]
fn ids_are_not_reused_after_reset() {
    let mut m = model_with_photo();
    let first = m.add_stamp(StampGlyph::Star).unwrap();
    m.reset();
    m.set_frame_source(Some(photo()));
    let second = m.add_stamp(StampGlyph::Star).unwrap();
    assert_ne!(first, second);
}

#[test]
fn repeated_drag_is_idempotent() {
    let mut m = model_with_photo();
    let id = m.add_stamp(StampGlyph::Heart).unwrap();
    let p = Point::new(40.0, 90.0);

    assert!(m.update_transform(id, TransformOp::Translate(p)));
    let once = m.stamp(id).unwrap().transform();
    assert!(m.update_transform(id, TransformOp::Translate(p)));
    assert_eq!(m.stamp(id).unwrap().transform(), once);
    assert_eq!(once.translation(), p);
}

#[test]
fn scale_updates_respect_floor() {
    let mut m = model_with_photo();
    let id = m.add_stamp(StampGlyph::Heart).unwrap();
    m.update_transform(id, TransformOp::Scale(0.01));
    assert_eq!(m.stamp(id).unwrap().transform().scale(), 0.1);
    m.update_transform(id, TransformOp::Scale(2.5));
    assert_eq!(m.stamp(id).unwrap().transform().scale(), 2.5);
}

#[test]
fn apply_routes_to_target_only() {
    let mut m = model_with_photo();
    let a = m.add_stamp(StampGlyph::Heart).unwrap();
    let b = m.add_stamp(StampGlyph::Star).unwrap();
    assert!(m.apply(TransformUpdate {
        target: b,
        op: TransformOp::Rotate(-PI),
    }));
    assert_eq!(m.stamp(a).unwrap().transform().rotation(), 0.0);
    assert!((m.stamp(b).unwrap().transform().rotation() - PI).abs() < 1e-12);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "unknown stamp")]
fn unknown_id_panics_in_debug() {
    let mut m = model_with_photo();
    m.update_transform(StampId(999), TransformOp::Scale(2.0));
}

#[test]
fn hit_test_prefers_topmost() {
    let mut m = model_with_photo();
    let a = m.add_stamp(StampGlyph::Heart).unwrap();
    let b = m.add_stamp(StampGlyph::Star).unwrap();
    let spawn = Point::new(175.0, 260.0);
    assert_eq!(m.hit_test(spawn), Some(b));

    m.update_transform(b, TransformOp::Translate(Point::new(300.0, 60.0)));
    assert_eq!(m.hit_test(spawn), Some(a));
    assert_eq!(m.hit_test(Point::new(5.0, 5.0)), None);
}

#[test]
fn hit_bounds_follow_scale_and_rotation() {
    let mut m = model_with_photo();
    let id = m.add_stamp(StampGlyph::Heart).unwrap();
    // 60-unit square: 35 units right of center is outside at scale 1.
    let probe = Point::new(175.0 + 35.0, 260.0);
    assert_eq!(m.hit_test(probe), None);

    m.update_transform(id, TransformOp::Scale(2.0));
    assert_eq!(m.hit_test(probe), Some(id));

    // Rotated 45°, the square's corner reaches ~42 units along the axis at scale 1.
    m.update_transform(id, TransformOp::Scale(1.0));
    m.update_transform(id, TransformOp::Rotate(PI / 4.0));
    assert_eq!(m.hit_test(Point::new(175.0 + 40.0, 260.0)), Some(id));
}

#[test]
fn caption_and_reset() {
    let mut m = model_with_photo();
    m.set_caption_text("Hello");
    assert_eq!(m.caption().text(), "Hello");
    m.set_caption_text("");
    assert_eq!(m.caption().text(), "");

    m.set_caption_text("again");
    m.add_stamp(StampGlyph::Headphones).unwrap();
    m.reset();
    assert!(m.is_empty());
    assert!(m.frame_source().is_none());
    assert_eq!(m.caption().text(), "");
    assert!(m.stamps().is_empty());
}

#[test]
fn replacing_photo_keeps_overlays() {
    let mut m = model_with_photo();
    m.add_stamp(StampGlyph::Heart).unwrap();
    m.set_caption_text("keep");
    m.set_frame_source(Some(photo()));
    assert_eq!(m.stamps().len(), 1);
    assert_eq!(m.caption().text(), "keep");
}
