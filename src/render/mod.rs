pub mod frame;
pub mod frame_loop;
pub mod gl_api;
pub mod gpu;
pub mod mesh;
pub mod program;
pub mod scene;
pub mod shaders;

#[cfg(test)]
pub(crate) mod fake;

pub use frame::FrameState;
pub use frame_loop::{FrameLoop, FramePlatform, LoopState};
pub use gl_api::GlApi;
pub use gpu::GpuApi;
pub use mesh::{AttributeLayout, GeometryBuffer, Vertex};
pub use program::{link, LinkStatus, Program};
pub use scene::prepare_scene;
pub use shaders::{compile, CompiledStage, ShaderKind, ShaderSource};
