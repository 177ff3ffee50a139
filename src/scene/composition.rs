use crate::{
    assets::decode::PreparedImage,
    config::FrameLayout,
    foundation::core::Size,
    overlay::model::{OverlayModel, StampOverlay},
};

/// Read-only description of everything painted into the frame at one point in time.
///
/// Preview and export both render from this type; it is cheap to clone because pixel data is
/// shared.
#[derive(Clone, Debug)]
pub struct CompositionScene {
    pub layout: FrameLayout,
    /// Decoded photo, `None` renders the placeholder.
    pub photo: Option<PreparedImage>,
    pub caption: String,
    /// Stamps in paint order.
    pub stamps: Vec<StampOverlay>,
}

impl CompositionScene {
    /// Project the current model state.
    pub fn snapshot(model: &OverlayModel, layout: &FrameLayout) -> Self {
        Self {
            layout: layout.clone(),
            photo: model.frame_source().map(|p| p.image.clone()),
            caption: model.caption().text().to_string(),
            stamps: model.stamps().to_vec(),
        }
    }

    /// Frame size in frame-local units.
    pub fn size(&self) -> Size {
        self.layout.frame_size
    }
}
