use crate::{
    assets::decode::PreparedPhoto,
    config::EditorConfig,
    export::store::SavedMedia,
    foundation::{
        error::{InstaframeError, InstaframeResult},
        ids::{ExportTicket, IdAllocator, LoadTicket, StampId},
    },
    gesture::{events::GestureEvent, reconciler::GestureReconciler},
    overlay::{
        glyph::StampGlyph,
        model::{OverlayModel, TransformUpdate},
    },
    scene::composition::CompositionScene,
};

/// Which user actions are currently available.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Controls {
    pub pick_photo: bool,
    pub add_stamp: bool,
    pub export: bool,
}

/// One-shot message raised when an export finishes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Saved(SavedMedia),
    ExportFailed(String),
}

/// What happened to a finished photo load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The photo is now the frame source.
    Applied,
    /// A newer load was issued (or the editor was reset) first; the result was dropped.
    Stale,
    /// Loading or decoding failed; the frame source is unchanged.
    Failed,
}

/// An export that has passed the gate and must be finished with [`Editor::complete_export`].
#[derive(Clone, Debug)]
pub struct ExportJob {
    pub ticket: ExportTicket,
    pub scene: CompositionScene,
}

/// Single owner of all editor state.
///
/// Every mutation goes through `&mut self`, so updates are applied one at a time in arrival
/// order. Async work (loading, rendering, saving) happens outside and reports back through the
/// ticketed `complete_*` methods.
#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    model: OverlayModel,
    reconciler: GestureReconciler,
    load_ids: IdAllocator,
    latest_load: Option<LoadTicket>,
    export_ids: IdAllocator,
    /// Ticket of the running export and the edit revision its scene was frozen at.
    export_in_flight: Option<(ExportTicket, u64)>,
    /// Bumped by every edit that changes what is painted.
    revision: u64,
    notice: Option<Notice>,
}

impl Editor {
    pub fn new(config: EditorConfig) -> InstaframeResult<Self> {
        config.validate()?;
        let model = OverlayModel::new(&config.layout, config.scale_limits);
        Ok(Self {
            config,
            model,
            reconciler: GestureReconciler::new(),
            load_ids: IdAllocator::default(),
            latest_load: None,
            export_ids: IdAllocator::default(),
            export_in_flight: None,
            revision: 0,
            notice: None,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn model(&self) -> &OverlayModel {
        &self.model
    }

    pub fn controls(&self) -> Controls {
        let has_photo = self.model.has_photo();
        Controls {
            pick_photo: true,
            add_stamp: has_photo,
            export: has_photo && self.export_in_flight.is_none(),
        }
    }

    /// Issue a ticket for a new photo load. Any older outstanding ticket becomes stale.
    pub fn begin_photo_load(&mut self) -> LoadTicket {
        let ticket = LoadTicket(self.load_ids.next_raw());
        self.latest_load = Some(ticket);
        tracing::debug!(?ticket, "photo load issued");
        ticket
    }

    /// Land the result of the load tagged `ticket`.
    pub fn complete_photo_load(
        &mut self,
        ticket: LoadTicket,
        result: InstaframeResult<PreparedPhoto>,
    ) -> LoadOutcome {
        if self.latest_load != Some(ticket) {
            tracing::debug!(?ticket, latest = ?self.latest_load, "stale photo load discarded");
            return LoadOutcome::Stale;
        }
        match result {
            Ok(photo) => {
                tracing::info!(
                    width = photo.image.width,
                    height = photo.image.height,
                    "photo selected"
                );
                self.model.set_frame_source(Some(photo));
                self.revision += 1;
                LoadOutcome::Applied
            }
            Err(e) => {
                tracing::warn!(error = %e, "photo load failed; keeping current frame");
                LoadOutcome::Failed
            }
        }
    }

    pub fn add_stamp(&mut self, glyph: StampGlyph) -> InstaframeResult<StampId> {
        let id = self.model.add_stamp(glyph)?;
        self.revision += 1;
        Ok(id)
    }

    pub fn set_caption_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.model.caption().text() != text {
            self.model.set_caption_text(text);
            self.revision += 1;
        }
    }

    /// Route one gesture event through the reconciler and apply the update it produces.
    pub fn handle_gesture(&mut self, event: GestureEvent) -> Option<TransformUpdate> {
        let update = self.reconciler.handle(&self.model, event)?;
        let applied = self.model.apply(update);
        if applied {
            self.revision += 1;
        }
        applied.then_some(update)
    }

    /// Snapshot of what is currently painted.
    pub fn scene(&self) -> CompositionScene {
        CompositionScene::snapshot(&self.model, &self.config.layout)
    }

    /// Pass the export gate and freeze the scene to export.
    pub fn begin_export(&mut self) -> InstaframeResult<ExportJob> {
        if self.export_in_flight.is_some() {
            tracing::warn!("export requested while another is in flight");
            return Err(InstaframeError::ExportInProgress);
        }
        if !self.model.has_photo() {
            tracing::error!("export invoked without a photo");
            return Err(InstaframeError::precondition(
                "export requires a photo in the frame",
            ));
        }
        let ticket = ExportTicket(self.export_ids.next_raw());
        self.export_in_flight = Some((ticket, self.revision));
        Ok(ExportJob {
            ticket,
            scene: self.scene(),
        })
    }

    /// Finish the export tagged `ticket`.
    ///
    /// Success clears the editor unless it was edited after the export began, in which case the
    /// newer edits are kept. Failure leaves every edit in place. Either way a notice is raised and
    /// the export control is re-enabled.
    pub fn complete_export(&mut self, ticket: ExportTicket, result: &InstaframeResult<SavedMedia>) {
        let frozen_at = match self.export_in_flight {
            Some((running, revision)) if running == ticket => revision,
            _ => {
                tracing::warn!(?ticket, "completion for unknown export ignored");
                return;
            }
        };
        self.export_in_flight = None;
        match result {
            Ok(saved) => {
                if frozen_at == self.revision {
                    self.reset();
                } else {
                    tracing::info!(
                        edits = self.revision - frozen_at,
                        "editor changed during export; keeping newer edits"
                    );
                }
                self.notice = Some(Notice::Saved(saved.clone()));
            }
            Err(e) => {
                tracing::warn!(error = %e, "export failed; edits kept");
                self.notice = Some(Notice::ExportFailed(e.to_string()));
            }
        }
    }

    /// Take the pending notice, if any. Each notice is returned once.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Clear photo, caption, stamps and in-flight gestures, and invalidate outstanding loads.
    pub fn reset(&mut self) {
        self.model.reset();
        self.reconciler.reset();
        self.latest_load = None;
        tracing::debug!("editor reset");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/store.rs"]
mod tests;
