use std::sync::Arc;

use super::*;
use crate::{
    assets::decode::{PreparedImage, PreparedPhoto},
    config::EditorConfig,
    foundation::core::Point,
};

const SCRIPT: &str = r#"{
  "photo": "beach.jpg",
  "caption": "Summer",
  "steps": [
    { "op": "add_stamp", "glyph": "heart" },
    { "op": "add_stamp", "glyph": "star" },
    { "op": "gesture", "event": { "phase": "began", "sequence": 1, "at": { "x": 175.0, "y": 260.0 } } },
    { "op": "gesture", "event": { "phase": "changed", "sequence": 1, "change": { "kind": "drag", "value": { "x": 60.0, "y": 80.0 } } } },
    { "op": "gesture", "event": { "phase": "ended", "sequence": 1 } },
    { "op": "caption", "text": "Summer '26" }
  ]
}"#;

fn editor_with_photo() -> Editor {
    let mut e = Editor::new(EditorConfig::default()).unwrap();
    let t = e.begin_photo_load();
    e.complete_photo_load(
        t,
        Ok(PreparedPhoto {
            bytes: Arc::new(Vec::new()),
            image: PreparedImage {
                width: 1,
                height: 1,
                rgba8_premul: Arc::new(vec![0, 0, 0, 255]),
            },
        }),
    );
    e
}

#[test]
fn script_replays_stamps_gestures_and_caption() {
    let script: EditScript = serde_json::from_str(SCRIPT).unwrap();
    assert_eq!(script.photo.as_deref(), Some(Path::new("beach.jpg")));

    let mut e = editor_with_photo();
    script.apply(&mut e).unwrap();

    let stamps = e.model().stamps();
    assert_eq!(stamps.len(), 2);
    assert_eq!(stamps[0].glyph(), StampGlyph::Heart);
    assert_eq!(stamps[1].glyph(), StampGlyph::Star);
    assert_eq!(stamps[1].transform().translation(), Point::new(60.0, 80.0));
    assert_eq!(stamps[0].transform().translation(), Point::new(175.0, 260.0));
    assert_eq!(e.model().caption().text(), "Summer '26");
}

#[test]
fn stamp_step_without_photo_reports_step_index() {
    let script: EditScript = serde_json::from_str(SCRIPT).unwrap();
    let mut e = Editor::new(EditorConfig::default()).unwrap();
    let err = script.apply(&mut e).unwrap_err();
    assert!(err.to_string().contains("step 0"), "{err}");
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(serde_json::from_str::<EditScript>(r#"{"stepz": []}"#).is_err());
    assert_eq!(serde_json::from_str::<EditScript>("{}").unwrap(), EditScript::default());
}
