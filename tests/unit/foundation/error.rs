use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        InstaframeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        InstaframeError::precondition("x")
            .to_string()
            .contains("precondition violated:")
    );
    assert!(
        InstaframeError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        InstaframeError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        InstaframeError::persistence("x")
            .to_string()
            .contains("persistence error:")
    );
    assert!(
        InstaframeError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = InstaframeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_convert() {
    let err: InstaframeError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, InstaframeError::Serde(_)));
}
