// shaders.rs - Shader stage loading and compilation

use std::fmt;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use gl::types::{GLenum, GLuint};

use super::gpu::GpuApi;
use crate::utils::SceneError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

impl ShaderKind {
    pub fn gl_enum(self) -> GLenum {
        match self {
            ShaderKind::Vertex => gl::VERTEX_SHADER,
            ShaderKind::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderKind::Vertex => f.write_str("vertex"),
            ShaderKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// Shading-language text for one stage. Immutable once read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    kind: ShaderKind,
    text: String,
}

impl ShaderSource {
    pub fn new(kind: ShaderKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Reads a stage from disk. A missing, unreadable or empty file is
    /// reported as [`SceneError::ShaderSourceUnavailable`].
    pub fn load(kind: ShaderKind, path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        log::debug!("Loading {} shader from {}", kind, path.display());

        let unavailable = |reason: String| SceneError::ShaderSourceUnavailable {
            kind,
            path: path.to_path_buf(),
            reason,
        };

        let text = fs::read_to_string(path).map_err(|e| unavailable(e.to_string()))?;
        if text.trim().is_empty() {
            return Err(unavailable("file is empty".to_string()));
        }

        Ok(Self::new(kind, text))
    }

    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileStatus {
    Success,
    Failure,
}

/// A compiled stage object. The GPU handle is deleted when this is dropped.
pub struct CompiledStage<G: GpuApi> {
    gpu: Rc<G>,
    handle: GLuint,
    kind: ShaderKind,
    status: CompileStatus,
    diagnostics: String,
}

impl<G: GpuApi> CompiledStage<G> {
    pub fn handle(&self) -> GLuint {
        self.handle
    }

    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    pub fn status(&self) -> CompileStatus {
        self.status
    }

    pub fn is_compiled(&self) -> bool {
        self.status == CompileStatus::Success
    }

    /// Driver log for this stage, empty when the driver had nothing to say.
    pub fn diagnostics(&self) -> &str {
        &self.diagnostics
    }
}

impl<G: GpuApi> fmt::Debug for CompiledStage<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledStage")
            .field("handle", &self.handle)
            .field("kind", &self.kind)
            .field("status", &self.status)
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

impl<G: GpuApi> Drop for CompiledStage<G> {
    fn drop(&mut self) {
        self.gpu.delete_shader(self.handle);
    }
}

/// Compiles one stage.
///
/// A failed compile is not an error: the stage comes back with
/// [`CompileStatus::Failure`] and its log, and linking goes ahead with it.
pub fn compile<G: GpuApi>(gpu: &Rc<G>, source: &ShaderSource) -> CompiledStage<G> {
    let kind = source.kind();
    log::debug!("Compiling {} shader", kind);

    let handle = gpu.create_shader(kind);
    gpu.shader_source(handle, source.text());
    gpu.compile_shader(handle);

    log::debug!("Checking {} shader...", kind);
    let status = if gpu.shader_compile_status(handle) {
        CompileStatus::Success
    } else {
        CompileStatus::Failure
    };

    // Drivers log warnings on success too, so the log is read either way.
    let diagnostics = gpu.shader_info_log(handle);
    if !diagnostics.is_empty() {
        log::debug!("{}", diagnostics.trim_end());
    }
    if status == CompileStatus::Failure {
        log::warn!("{} shader failed to compile", kind);
    }

    CompiledStage {
        gpu: Rc::clone(gpu),
        handle,
        kind,
        status,
        diagnostics,
    }
}
