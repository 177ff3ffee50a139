use crate::{
    foundation::error::InstaframeResult,
    render::backend::{FrameRGBA, RenderBackend},
    scene::{composition::CompositionScene, plan::SceneCompiler},
};

/// Compile `scene` and rasterize it at `scale`.
///
/// Preview and export both go through here; they differ only in `scale`.
#[tracing::instrument(skip_all, fields(scale, stamps = scene.stamps.len()))]
pub fn render_scene(
    compiler: &mut SceneCompiler,
    backend: &mut dyn RenderBackend,
    scene: &CompositionScene,
    scale: f64,
) -> InstaframeResult<FrameRGBA> {
    let plan = compiler.compile(scene)?;
    let frame = backend.render_plan(&plan, scale)?;
    tracing::debug!(width = frame.width, height = frame.height, "scene rendered");
    Ok(frame)
}
