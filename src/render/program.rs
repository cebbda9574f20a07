use std::fmt;
use std::rc::Rc;

use gl::types::{GLint, GLuint};

use super::gpu::GpuApi;
use super::shaders::CompiledStage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Linked,
    Failed,
}

/// Linked vertex + fragment program. Deleted from the GPU when dropped.
pub struct Program<G: GpuApi> {
    gpu: Rc<G>,
    id: GLuint,
    status: LinkStatus,
    diagnostics: String,
}

impl<G: GpuApi> Program<G> {
    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn status(&self) -> LinkStatus {
        self.status
    }

    pub fn is_linked(&self) -> bool {
        self.status == LinkStatus::Linked
    }

    pub fn diagnostics(&self) -> &str {
        &self.diagnostics
    }

    pub fn set_used(&self) {
        self.gpu.use_program(self.id);
    }

    /// Looks the uniform up by name on every call; nothing is cached.
    pub fn uniform_location(&self, name: &str) -> Option<GLint> {
        self.gpu.uniform_location(self.id, name)
    }

    /// Writes a `vec3` uniform of the currently used program. Returns `false`
    /// when `name` is not an active uniform.
    pub fn set_uniform_3f(&self, name: &str, x: f32, y: f32, z: f32) -> bool {
        match self.uniform_location(name) {
            Some(location) => {
                self.gpu.uniform_3_f32(location, x, y, z);
                true
            }
            None => false,
        }
    }
}

impl<G: GpuApi> fmt::Debug for Program<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program")
            .field("id", &self.id)
            .field("status", &self.status)
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

impl<G: GpuApi> Drop for Program<G> {
    fn drop(&mut self) {
        self.gpu.delete_program(self.id);
    }
}

/// Links two stages into a program, consuming them.
///
/// Both stages are detached and deleted before returning, whatever the link
/// outcome. A failed link still yields a [`Program`], with
/// [`LinkStatus::Failed`] and the driver's log.
pub fn link<G: GpuApi>(
    gpu: &Rc<G>,
    vertex: CompiledStage<G>,
    fragment: CompiledStage<G>,
) -> Program<G> {
    log::debug!("Linking shader program...");
    let id = gpu.create_program();
    gpu.attach_shader(id, vertex.handle());
    gpu.attach_shader(id, fragment.handle());
    gpu.link_program(id);

    log::debug!("Checking shader program...");
    let status = if gpu.program_link_status(id) {
        LinkStatus::Linked
    } else {
        LinkStatus::Failed
    };

    let diagnostics = gpu.program_info_log(id);
    if !diagnostics.is_empty() {
        log::debug!("{}", diagnostics.trim_end());
    } else {
        log::debug!("Shader program linked successfully");
    }
    if status == LinkStatus::Failed {
        log::warn!("Shader program {} failed to link", id);
    }

    gpu.detach_shader(id, vertex.handle());
    gpu.detach_shader(id, fragment.handle());
    drop(vertex);
    drop(fragment);

    Program {
        gpu: Rc::clone(gpu),
        id,
        status,
        diagnostics,
    }
}
