use std::rc::Rc;

use super::frame_loop::FrameLoop;
use super::gpu::GpuApi;
use super::mesh::{GeometryBuffer, QUAD_INDICES, QUAD_VERTICES};
use super::program::link;
use super::shaders::{compile, ShaderKind, ShaderSource};
use crate::config::ShaderConfig;
use crate::utils::SceneError;

/// Builds everything the frame loop draws: reads both shader files, compiles
/// and links them, uploads the quad and binds the result.
///
/// Both files are read before any compilation starts. Compile and link
/// problems are logged, not returned.
pub fn prepare_scene<G: GpuApi>(gpu: &Rc<G>, shaders: &ShaderConfig) -> Result<FrameLoop<G>, SceneError> {
    let vertex_source = ShaderSource::load(ShaderKind::Vertex, &shaders.vertex)?;
    let fragment_source = ShaderSource::load(ShaderKind::Fragment, &shaders.fragment)?;

    let geometry = GeometryBuffer::upload(gpu, &QUAD_VERTICES, &QUAD_INDICES)?;

    let vertex = compile(gpu, &vertex_source);
    let fragment = compile(gpu, &fragment_source);
    let program = link(gpu, vertex, fragment);
    if !program.is_linked() {
        log::warn!("Continuing with an unlinked program; nothing may be drawn");
    }

    Ok(FrameLoop::new(Rc::clone(gpu), program, geometry))
}
