//! Replayable edit sessions stored as JSON.
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    editor::store::Editor,
    foundation::error::{InstaframeError, InstaframeResult},
    gesture::events::GestureEvent,
    overlay::glyph::StampGlyph,
};

/// A recorded sequence of edits.
///
/// ```json
/// {
///   "photo": "beach.jpg",
///   "caption": "Summer",
///   "steps": [
///     { "op": "add_stamp", "glyph": "heart" },
///     { "op": "gesture", "event": { "phase": "began", "sequence": 1, "at": { "x": 175.0, "y": 260.0 } } }
///   ]
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditScript {
    /// Photo to select first, relative to the script's directory.
    #[serde(default)]
    pub photo: Option<PathBuf>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub steps: Vec<EditStep>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditStep {
    AddStamp { glyph: StampGlyph },
    Caption { text: String },
    Gesture { event: GestureEvent },
}

impl EditScript {
    pub fn from_json_file(path: &Path) -> InstaframeResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read edit script '{}'", path.display()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Apply the caption and every step, in order.
    ///
    /// The photo is not loaded here; select it before applying. Stops at the first failing step
    /// and reports its index.
    pub fn apply(&self, editor: &mut Editor) -> InstaframeResult<()> {
        if let Some(caption) = &self.caption {
            editor.set_caption_text(caption.clone());
        }
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                EditStep::AddStamp { glyph } => {
                    editor.add_stamp(*glyph).map_err(|e| {
                        InstaframeError::validation(format!("step {i}: {e}"))
                    })?;
                }
                EditStep::Caption { text } => editor.set_caption_text(text.clone()),
                EditStep::Gesture { event } => {
                    editor.handle_gesture(*event);
                }
            }
        }
        tracing::debug!(steps = self.steps.len(), "edit script applied");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/script.rs"]
mod tests;
