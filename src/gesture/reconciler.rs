use std::collections::BTreeMap;

use crate::{
    foundation::ids::{StampId, TouchSequence},
    gesture::events::{GestureChange, GestureEvent},
    overlay::model::{OverlayModel, TransformOp, TransformUpdate},
};

/// Upper bound on tracked sequences when end events go missing.
pub const MAX_ACTIVE_SEQUENCES: usize = 32;

/// Maps concurrent gesture streams onto [`TransformUpdate`] messages.
///
/// A sequence picks its target once, on [`GestureEvent::Began`]: the topmost stamp whose bounds
/// contain the touch point. Every later change of that sequence goes to that stamp and nowhere
/// else, even if the stamp moves out from under the finger or another stamp slides on top.
/// Sequences that start on empty frame area are tracked but produce nothing.
///
/// The reconciler only reads the model; applying the produced updates is the caller's job.
///
/// A platform that drops `Ended`/`Cancelled` events would otherwise grow the sequence table
/// forever. Each new sequence first forgets sequences locked to stamps that no longer exist,
/// then evicts the oldest (lowest numbered) sequences beyond [`MAX_ACTIVE_SEQUENCES`].
#[derive(Clone, Debug, Default)]
pub struct GestureReconciler {
    targets: BTreeMap<TouchSequence, Option<StampId>>,
}

impl GestureReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one event; returns the update to apply, if any.
    pub fn handle(&mut self, model: &OverlayModel, event: GestureEvent) -> Option<TransformUpdate> {
        match event {
            GestureEvent::Began { sequence, at } => {
                self.prune(model, sequence);
                let target = model.hit_test(at);
                if self.targets.insert(sequence, target).is_some() {
                    tracing::warn!(?sequence, "touch sequence began twice; retargeting");
                }
                tracing::trace!(?sequence, ?target, "touch sequence began");
                None
            }
            GestureEvent::Changed { sequence, change } => {
                let Some(slot) = self.targets.get(&sequence) else {
                    tracing::debug!(?sequence, "change for unknown touch sequence dropped");
                    return None;
                };
                let target = (*slot)?;
                let op = match change {
                    GestureChange::Drag(p) => TransformOp::Translate(p),
                    GestureChange::Magnify(f) => TransformOp::Scale(f),
                    GestureChange::Rotate(a) => TransformOp::Rotate(a),
                };
                Some(TransformUpdate { target, op })
            }
            GestureEvent::Ended { sequence } | GestureEvent::Cancelled { sequence } => {
                self.targets.remove(&sequence);
                None
            }
        }
    }

    /// Stamp locked to `sequence`, if the sequence is active and started on a stamp.
    pub fn target_of(&self, sequence: TouchSequence) -> Option<StampId> {
        self.targets.get(&sequence).copied().flatten()
    }

    pub fn active_sequences(&self) -> usize {
        self.targets.len()
    }

    fn prune(&mut self, model: &OverlayModel, incoming: TouchSequence) {
        self.targets
            .retain(|_, target| target.is_none_or(|id| model.stamp(id).is_some()));
        while self.targets.len() >= MAX_ACTIVE_SEQUENCES && !self.targets.contains_key(&incoming) {
            let Some((evicted, _)) = self.targets.pop_first() else {
                break;
            };
            tracing::warn!(?evicted, "too many open touch sequences; dropping the oldest");
        }
    }

    /// Forget every in-flight sequence.
    pub fn reset(&mut self) {
        self.targets.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gesture/reconciler.rs"]
mod tests;
