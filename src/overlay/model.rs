use crate::{
    assets::decode::PreparedPhoto,
    config::FrameLayout,
    foundation::{
        core::{Point, ScaleLimits, Transform},
        error::{InstaframeError, InstaframeResult},
        ids::{IdAllocator, StampId},
    },
    overlay::glyph::StampGlyph,
};

/// A placed, freely transformable stamp.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StampOverlay {
    id: StampId,
    glyph: StampGlyph,
    transform: Transform,
}

impl StampOverlay {
    pub fn id(&self) -> StampId {
        self.id
    }

    pub fn glyph(&self) -> StampGlyph {
        self.glyph
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Whether frame-local `point` falls inside the displayed bounds: a square of side `extent`
    /// centered on the stamp, scaled and rotated with it.
    pub fn contains(&self, point: Point, extent: f64) -> bool {
        let local = self.transform.to_affine().inverse() * point;
        let half = extent / 2.0;
        local.x.abs() <= half && local.y.abs() <= half
    }
}

/// The caption singleton. Always present, possibly empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct CaptionOverlay {
    text: String,
}

impl CaptionOverlay {
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// One field-level change applied to a stamp's [`Transform`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformOp {
    /// Absolute frame-local center.
    Translate(Point),
    /// Absolute magnification relative to gesture start.
    Scale(f64),
    /// Absolute angle in radians relative to gesture start.
    Rotate(f64),
}

/// Message consumed by [`OverlayModel::apply`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransformUpdate {
    pub target: StampId,
    pub op: TransformOp,
}

/// Owned store of everything the user placed on the frame.
///
/// This is the only mutable state behind the preview; gestures reach it exclusively through
/// [`TransformUpdate`] messages.
#[derive(Clone, Debug)]
pub struct OverlayModel {
    frame_source: Option<PreparedPhoto>,
    caption: CaptionOverlay,
    stamps: Vec<StampOverlay>,
    ids: IdAllocator,
    spawn_point: Point,
    stamp_extent: f64,
    limits: ScaleLimits,
}

impl OverlayModel {
    pub fn new(layout: &FrameLayout, limits: ScaleLimits) -> Self {
        Self {
            frame_source: None,
            caption: CaptionOverlay::default(),
            stamps: Vec::new(),
            ids: IdAllocator::default(),
            spawn_point: layout.spawn_point,
            stamp_extent: f64::from(layout.stamp_font_px),
            limits,
        }
    }

    pub fn frame_source(&self) -> Option<&PreparedPhoto> {
        self.frame_source.as_ref()
    }

    pub fn has_photo(&self) -> bool {
        self.frame_source.is_some()
    }

    /// Replace the photo. Overlays are left untouched.
    pub fn set_frame_source(&mut self, photo: Option<PreparedPhoto>) {
        self.frame_source = photo;
    }

    pub fn caption(&self) -> &CaptionOverlay {
        &self.caption
    }

    pub fn set_caption_text(&mut self, text: impl Into<String>) {
        self.caption.text = text.into();
    }

    /// Stamps in paint order (first is bottom-most).
    pub fn stamps(&self) -> &[StampOverlay] {
        &self.stamps
    }

    pub fn stamp(&self, id: StampId) -> Option<&StampOverlay> {
        self.stamps.iter().find(|s| s.id == id)
    }

    pub fn scale_limits(&self) -> ScaleLimits {
        self.limits
    }

    /// Append a new stamp at the spawn point.
    ///
    /// Requires a photo; the add-stamp controls are disabled without one.
    pub fn add_stamp(&mut self, glyph: StampGlyph) -> InstaframeResult<StampId> {
        if !self.has_photo() {
            tracing::error!(%glyph, "add_stamp invoked without a photo");
            return Err(InstaframeError::precondition(
                "add_stamp requires a photo in the frame",
            ));
        }

        let id = StampId(self.ids.next_raw());
        self.stamps.push(StampOverlay {
            id,
            glyph,
            transform: Transform::at(self.spawn_point),
        });
        tracing::debug!(%id, %glyph, count = self.stamps.len(), "stamp added");
        Ok(id)
    }

    /// Apply one transform change to the stamp `id`.
    ///
    /// Returns `false` if no such stamp exists. Stamps are never deleted individually, so that
    /// indicates a bookkeeping bug: it panics in debug builds and is logged in release builds.
    pub fn update_transform(&mut self, id: StampId, op: TransformOp) -> bool {
        let limits = self.limits;
        let Some(stamp) = self.stamps.iter_mut().find(|s| s.id == id) else {
            tracing::error!(%id, ?op, "transform update for unknown stamp");
            debug_assert!(false, "transform update for unknown stamp {id}");
            return false;
        };

        match op {
            TransformOp::Translate(p) => stamp.transform.translate(p),
            TransformOp::Scale(f) => stamp.transform.set_scale(f, limits),
            TransformOp::Rotate(a) => stamp.transform.set_rotation(a),
        }
        true
    }

    pub fn apply(&mut self, update: TransformUpdate) -> bool {
        self.update_transform(update.target, update.op)
    }

    /// Topmost stamp whose displayed bounds contain `point`.
    pub fn hit_test(&self, point: Point) -> Option<StampId> {
        self.stamps
            .iter()
            .rev()
            .find(|s| s.contains(point, self.stamp_extent))
            .map(|s| s.id)
    }

    /// Clear photo, caption and stamps in one step. Id allocation continues where it left off.
    pub fn reset(&mut self) {
        self.frame_source = None;
        self.caption.text.clear();
        self.stamps.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.frame_source.is_none() && self.caption.text.is_empty() && self.stamps.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/model.rs"]
mod tests;
