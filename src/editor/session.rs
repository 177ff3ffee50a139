use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Context;

use crate::{
    assets::{decode::decode_photo, text::FontSet},
    config::EditorConfig,
    editor::store::{Controls, Editor, LoadOutcome, Notice},
    export::{
        exporter::Exporter,
        store::{MediaStore, SavedMedia},
    },
    foundation::{
        error::{InstaframeError, InstaframeResult},
        ids::StampId,
    },
    gesture::events::GestureEvent,
    overlay::{glyph::StampGlyph, model::TransformUpdate},
    render::{backend::FrameRGBA, cpu::CpuBackend, pipeline::render_scene},
    scene::plan::SceneCompiler,
    source::{PhotoSource, SelectionToken},
};

/// Async driver around an [`Editor`].
///
/// The editor lock is only taken for synchronous state transitions and is never held across an
/// `.await`; loading, decoding, rendering and saving all happen outside it.
pub struct EditorSession<S, M> {
    editor: Arc<Mutex<Editor>>,
    source: S,
    store: M,
    fonts: FontSet,
}

impl<S: PhotoSource, M: MediaStore> EditorSession<S, M> {
    /// Build a session, loading the configured fonts.
    pub fn new(config: EditorConfig, source: S, store: M) -> InstaframeResult<Self> {
        let fonts = FontSet::load(&config.fonts)?;
        Self::with_fonts(config, fonts, source, store)
    }

    pub fn with_fonts(
        config: EditorConfig,
        fonts: FontSet,
        source: S,
        store: M,
    ) -> InstaframeResult<Self> {
        Ok(Self {
            editor: Arc::new(Mutex::new(Editor::new(config)?)),
            source,
            store,
            fonts,
        })
    }

    fn editor(&self) -> MutexGuard<'_, Editor> {
        // Editor transitions never leave half-applied state, so a poisoned lock is still usable.
        self.editor
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` against the editor under the lock.
    pub fn with_editor<R>(&self, f: impl FnOnce(&mut Editor) -> R) -> R {
        f(&mut self.editor())
    }

    pub fn controls(&self) -> Controls {
        self.editor().controls()
    }

    pub fn take_notice(&self) -> Option<Notice> {
        self.editor().take_notice()
    }

    pub fn store(&self) -> &M {
        &self.store
    }

    /// Load and decode the photo behind `selection` and make it the frame source, unless a newer
    /// pick or a reset happened in the meantime.
    #[tracing::instrument(skip(self))]
    pub async fn pick_photo(&self, selection: SelectionToken) -> InstaframeResult<LoadOutcome> {
        let ticket = self.editor().begin_photo_load();

        let result = match self.source.load(&selection).await {
            Ok(bytes) => tokio::task::spawn_blocking(move || decode_photo(bytes))
                .await
                .context("photo decode task")?,
            Err(e) => Err(InstaframeError::Other(anyhow::Error::new(e))),
        };

        Ok(self.editor().complete_photo_load(ticket, result))
    }

    pub fn add_stamp(&self, glyph: StampGlyph) -> InstaframeResult<StampId> {
        self.editor().add_stamp(glyph)
    }

    pub fn set_caption_text(&self, text: impl Into<String>) {
        self.editor().set_caption_text(text);
    }

    pub fn handle_gesture(&self, event: GestureEvent) -> Option<TransformUpdate> {
        self.editor().handle_gesture(event)
    }

    /// Render the current scene at the preview scale.
    pub async fn preview(&self) -> InstaframeResult<FrameRGBA> {
        let (scene, scale) = {
            let editor = self.editor();
            (editor.scene(), editor.config().preview_scale)
        };
        let fonts = self.fonts.clone();
        tokio::task::spawn_blocking(move || {
            let mut compiler = SceneCompiler::new(fonts)?;
            render_scene(&mut compiler, &mut CpuBackend::new(), &scene, scale)
        })
        .await
        .context("preview render task")?
    }

    /// Export the current scene and hand it to the media store.
    ///
    /// On success the editor is reset; on failure every edit is kept. Both outcomes raise a
    /// [`Notice`].
    #[tracing::instrument(skip(self))]
    pub async fn export(&self) -> InstaframeResult<SavedMedia> {
        let (job, scale) = {
            let mut editor = self.editor();
            let job = editor.begin_export()?;
            (job, editor.config().export_scale)
        };

        let fonts = self.fonts.clone();
        let scene = job.scene;
        let rendered = tokio::task::spawn_blocking(move || Exporter::new(fonts, scale)?.export(&scene))
            .await
            .context("export render task")
            .map_err(InstaframeError::from)
            .and_then(|r| r);

        let result = match rendered {
            Ok(image) => self.store.save(&image).await,
            Err(e) => Err(e),
        };

        self.editor().complete_export(job.ticket, &result);
        result
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/session.rs"]
mod tests;
