//! Instaframe is the editing core of an instant-film photo framer.
//!
//! A photo is cover-fitted into a fixed frame, decorated with a caption and freely
//! dragged/pinched/rotated stamps, and flattened into a PNG:
//!
//! - Drive an [`Editor`] (synchronously) or an [`EditorSession`] (async, with a [`PhotoSource`] and
//!   a [`MediaStore`])
//! - Feed raw [`GestureEvent`]s; the [`GestureReconciler`] turns them into [`TransformUpdate`]s
//! - Render previews and exports from the same [`CompositionScene`] through [`render_scene`]
#![forbid(unsafe_code)]

mod assets;
mod config;
mod editor;
mod export;
mod foundation;
mod gesture;
mod overlay;
mod render;
mod scene;
mod script;
mod source;

pub use crate::assets::decode::{MAX_PHOTO_EDGE_PX, PreparedImage, PreparedPhoto, decode_photo};
pub use crate::assets::svg_raster::PreparedSvg;
pub use crate::assets::text::{FontBytes, FontSet, PreparedText};
pub use crate::config::{EXPORT_SCALE_ENV, EditorConfig, FontConfig, FrameLayout};
pub use crate::editor::session::EditorSession;
pub use crate::editor::store::{Controls, Editor, ExportJob, LoadOutcome, Notice};
pub use crate::export::exporter::{ExportedImage, Exporter};
pub use crate::export::store::{DirectoryMediaStore, InMemoryMediaStore, MediaStore, SavedMedia};
pub use crate::foundation::core::{
    Affine, Canvas, Point, Rect, Rgba8Premul, ScaleLimits, Size, Transform, Vec2,
};
pub use crate::foundation::error::{InstaframeError, InstaframeResult};
pub use crate::foundation::ids::{ExportTicket, LoadTicket, StampId, TouchSequence};
pub use crate::gesture::events::{GestureChange, GestureEvent};
pub use crate::gesture::reconciler::{GestureReconciler, MAX_ACTIVE_SEQUENCES};
pub use crate::overlay::glyph::StampGlyph;
pub use crate::overlay::model::{
    CaptionOverlay, OverlayModel, StampOverlay, TransformOp, TransformUpdate,
};
pub use crate::render::backend::{BackendKind, FrameRGBA, RenderBackend, create_backend};
pub use crate::render::cpu::CpuBackend;
pub use crate::render::pipeline::render_scene;
pub use crate::scene::composition::CompositionScene;
pub use crate::scene::plan::{DrawOp, SceneCompiler, ScenePlan};
pub use crate::script::{EditScript, EditStep};
pub use crate::source::{FsPhotoSource, PhotoSource, SelectionToken, SourceError};
