use async_trait::async_trait;

use super::*;
use crate::{export::store::InMemoryMediaStore, source::SourceError};

struct Refusing;

#[async_trait]
impl PhotoSource for Refusing {
    async fn load(&self, _selection: &SelectionToken) -> Result<Vec<u8>, SourceError> {
        Err(SourceError::Cancelled)
    }
}

fn session() -> EditorSession<Refusing, InMemoryMediaStore> {
    EditorSession::with_fonts(
        EditorConfig::default(),
        FontSet::none(),
        Refusing,
        InMemoryMediaStore::new(),
    )
    .unwrap()
}

#[tokio::test]
async fn cancelled_pick_leaves_frame_empty() {
    let s = session();
    let outcome = s.pick_photo("anything".into()).await.unwrap();
    assert_eq!(outcome, LoadOutcome::Failed);
    assert!(s.with_editor(|e| e.model().frame_source().is_none()));
}

#[tokio::test]
async fn preview_renders_at_preview_scale() {
    let s = session();
    let frame = s.preview().await.unwrap();
    assert_eq!((frame.width, frame.height), (350, 520));
}

#[tokio::test]
async fn export_without_photo_fails_without_touching_the_store() {
    let s = session();
    assert!(matches!(
        s.export().await,
        Err(InstaframeError::Precondition(_))
    ));
    assert!(s.store().saved().is_empty());
    assert!(s.take_notice().is_none());
}
