use super::*;

#[test]
fn names_and_symbols_parse_back() {
    for g in StampGlyph::ALL {
        assert_eq!(g.name().parse::<StampGlyph>().unwrap(), g);
        assert_eq!(g.symbol().parse::<StampGlyph>().unwrap(), g);
    }
    assert_eq!("❤".parse::<StampGlyph>().unwrap(), StampGlyph::Heart);
    assert_eq!("❤️".parse::<StampGlyph>().unwrap(), StampGlyph::Heart);
    assert!("unicorn".parse::<StampGlyph>().is_err());
}

#[test]
fn serde_uses_snake_case_names() {
    let s = serde_json::to_string(&StampGlyph::SmilingFaceWithHearts).unwrap();
    assert_eq!(s, "\"smiling_face_with_hearts\"");
    let g: StampGlyph = serde_json::from_str("\"headphones\"").unwrap();
    assert_eq!(g, StampGlyph::Headphones);
}
