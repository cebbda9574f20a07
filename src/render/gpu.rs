//! The slice of the GL driver the renderer talks to.
//!
//! Everything above this trait works with plain object names (`GLuint`) and
//! never calls `gl::*` directly, so the shader pipeline and the frame loop
//! can run against [`GlApi`](super::gl_api::GlApi) in the binary and against
//! a recording fake in tests.

use gl::types::{GLbitfield, GLenum, GLint, GLuint};

use super::shaders::ShaderKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    Array,
    ElementArray,
}

impl BufferTarget {
    pub fn gl_enum(self) -> GLenum {
        match self {
            BufferTarget::Array => gl::ARRAY_BUFFER,
            BufferTarget::ElementArray => gl::ELEMENT_ARRAY_BUFFER,
        }
    }
}

pub trait GpuApi {
    // Shader stages
    fn create_shader(&self, kind: ShaderKind) -> GLuint;
    fn shader_source(&self, shader: GLuint, source: &str);
    fn compile_shader(&self, shader: GLuint);
    fn shader_compile_status(&self, shader: GLuint) -> bool;
    /// Info log of a stage; empty when the driver reports a zero length.
    fn shader_info_log(&self, shader: GLuint) -> String;
    fn delete_shader(&self, shader: GLuint);

    // Programs
    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn detach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, program: GLuint);
    fn program_link_status(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn use_program(&self, program: GLuint);
    fn delete_program(&self, program: GLuint);
    /// `None` when the name does not resolve to an active uniform.
    fn uniform_location(&self, program: GLuint, name: &str) -> Option<GLint>;
    fn uniform_3_f32(&self, location: GLint, x: f32, y: f32, z: f32);

    // Buffers and vertex arrays
    fn create_vertex_array(&self) -> GLuint;
    fn bind_vertex_array(&self, vertex_array: GLuint);
    fn delete_vertex_array(&self, vertex_array: GLuint);
    fn create_buffer(&self) -> GLuint;
    fn bind_buffer(&self, target: BufferTarget, buffer: GLuint);
    /// Uploads `data` with `STATIC_DRAW` usage into the buffer bound to `target`.
    fn buffer_data(&self, target: BufferTarget, data: &[u8]);
    /// Reads `len` bytes back from the start of the buffer bound to `target`.
    fn read_buffer(&self, target: BufferTarget, len: usize) -> Vec<u8>;
    fn delete_buffer(&self, buffer: GLuint);
    fn vertex_attrib_pointer_f32(&self, index: GLuint, size: GLint, stride: GLint, offset: usize);
    fn enable_vertex_attrib_array(&self, index: GLuint);

    // Frame
    fn viewport(&self, x: GLint, y: GLint, width: GLint, height: GLint);
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&self, mask: GLbitfield);
    /// Indexed triangle draw from offset 0 of the bound element buffer.
    fn draw_elements_u32(&self, count: GLint);
    fn get_error(&self) -> GLenum;
}
