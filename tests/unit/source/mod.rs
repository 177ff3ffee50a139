use super::*;

#[tokio::test]
async fn reads_files_relative_to_root() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.png"), b"bytes").unwrap();

    let src = FsPhotoSource::with_root(dir.path());
    assert_eq!(src.load(&"a.png".into()).await.unwrap(), b"bytes".to_vec());
}

#[tokio::test]
async fn missing_file_is_unreadable_and_empty_token_is_cancelled() {
    let dir = tempfile::tempdir().unwrap();
    let src = FsPhotoSource::with_root(dir.path());
    assert!(matches!(
        src.load(&"nope.png".into()).await,
        Err(SourceError::Unreadable(_))
    ));
    assert_eq!(src.load(&"".into()).await, Err(SourceError::Cancelled));
}
