use std::ffi::{c_void, CStr, CString};
use std::ptr;

use gl::types::*;

use super::gpu::{BufferTarget, GpuApi};
use super::shaders::ShaderKind;
use crate::utils::StartupError;

/// [`GpuApi`] over the process-wide function pointers of the `gl` crate.
///
/// Only constructible through [`GlApi::load`], which guarantees the pointers
/// were loaded for a current context.
#[derive(Debug)]
pub struct GlApi {
    _loaded: (),
}

impl GlApi {
    /// Loads GL entry points through `loader` and checks the capabilities the
    /// renderer cannot run without.
    pub fn load<F>(mut loader: F) -> Result<Self, StartupError>
    where
        F: FnMut(&CStr) -> *const c_void,
    {
        gl::load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => loader(symbol.as_c_str()),
            Err(_) => ptr::null(),
        });

        if !gl::GenVertexArrays::is_loaded() {
            return Err(StartupError::RequiredCapabilityMissing("glGenVertexArrays"));
        }
        log::debug!("GL entry points loaded");

        Ok(Self { _loaded: () })
    }

    fn info_log(len: GLint, fetch: impl FnOnce(GLsizei, *mut GLchar)) -> String {
        if len <= 0 {
            return String::new();
        }
        let mut buffer: Vec<u8> = vec![0; len as usize];
        fetch(len, buffer.as_mut_ptr() as *mut GLchar);
        // The driver counts the trailing NUL in `len`.
        let end = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
        buffer.truncate(end);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl GpuApi for GlApi {
    fn create_shader(&self, kind: ShaderKind) -> GLuint {
        unsafe { gl::CreateShader(kind.gl_enum()) }
    }

    fn shader_source(&self, shader: GLuint, source: &str) {
        let ptr = source.as_ptr() as *const GLchar;
        let len = source.len() as GLint;
        unsafe { gl::ShaderSource(shader, 1, &ptr, &len) };
    }

    fn compile_shader(&self, shader: GLuint) {
        unsafe { gl::CompileShader(shader) };
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        let mut status = gl::FALSE as GLint;
        unsafe { gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status) };
        status == gl::TRUE as GLint
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut len = 0;
        unsafe { gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len) };
        Self::info_log(len, |len, buf| unsafe {
            gl::GetShaderInfoLog(shader, len, ptr::null_mut(), buf)
        })
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) };
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) };
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::DetachShader(program, shader) };
    }

    fn link_program(&self, program: GLuint) {
        unsafe { gl::LinkProgram(program) };
    }

    fn program_link_status(&self, program: GLuint) -> bool {
        let mut status = gl::FALSE as GLint;
        unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut status) };
        status == gl::TRUE as GLint
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut len = 0;
        unsafe { gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len) };
        Self::info_log(len, |len, buf| unsafe {
            gl::GetProgramInfoLog(program, len, ptr::null_mut(), buf)
        })
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) };
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) };
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> Option<GLint> {
        let cname = CString::new(name).ok()?;
        let location = unsafe { gl::GetUniformLocation(program, cname.as_ptr()) };
        (location != -1).then_some(location)
    }

    fn uniform_3_f32(&self, location: GLint, x: f32, y: f32, z: f32) {
        unsafe { gl::Uniform3f(location, x, y, z) };
    }

    fn create_vertex_array(&self) -> GLuint {
        let mut vao = 0;
        unsafe { gl::GenVertexArrays(1, &mut vao) };
        vao
    }

    fn bind_vertex_array(&self, vertex_array: GLuint) {
        unsafe { gl::BindVertexArray(vertex_array) };
    }

    fn delete_vertex_array(&self, vertex_array: GLuint) {
        unsafe { gl::DeleteVertexArrays(1, &vertex_array) };
    }

    fn create_buffer(&self) -> GLuint {
        let mut buffer = 0;
        unsafe { gl::GenBuffers(1, &mut buffer) };
        buffer
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: GLuint) {
        unsafe { gl::BindBuffer(target.gl_enum(), buffer) };
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        unsafe {
            gl::BufferData(
                target.gl_enum(),
                data.len() as GLsizeiptr,
                data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            )
        };
    }

    fn read_buffer(&self, target: BufferTarget, len: usize) -> Vec<u8> {
        let mut data = vec![0u8; len];
        unsafe {
            gl::GetBufferSubData(
                target.gl_enum(),
                0,
                len as GLsizeiptr,
                data.as_mut_ptr() as *mut c_void,
            )
        };
        data
    }

    fn delete_buffer(&self, buffer: GLuint) {
        unsafe { gl::DeleteBuffers(1, &buffer) };
    }

    fn vertex_attrib_pointer_f32(&self, index: GLuint, size: GLint, stride: GLint, offset: usize) {
        unsafe {
            gl::VertexAttribPointer(
                index,
                size,
                gl::FLOAT,
                gl::FALSE,
                stride,
                offset as *const c_void,
            )
        };
    }

    fn enable_vertex_attrib_array(&self, index: GLuint) {
        unsafe { gl::EnableVertexAttribArray(index) };
    }

    fn viewport(&self, x: GLint, y: GLint, width: GLint, height: GLint) {
        unsafe { gl::Viewport(x, y, width, height) };
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { gl::ClearColor(r, g, b, a) };
    }

    fn clear(&self, mask: GLbitfield) {
        unsafe { gl::Clear(mask) };
    }

    fn draw_elements_u32(&self, count: GLint) {
        unsafe { gl::DrawElements(gl::TRIANGLES, count, gl::UNSIGNED_INT, ptr::null()) };
    }

    fn get_error(&self) -> GLenum {
        unsafe { gl::GetError() }
    }
}
