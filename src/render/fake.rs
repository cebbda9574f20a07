//! In-memory [`GpuApi`] for tests.
//!
//! Keeps enough driver state to answer the questions the renderer asks:
//! which objects are alive, what was uploaded, whether a stage "compiles"
//! (a shallow syntax check) and whether a draw would read out of bounds.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use gl::types::{GLbitfield, GLenum, GLint, GLuint};

use super::gpu::{BufferTarget, GpuApi};
use super::shaders::ShaderKind;

/// The stage sources shipped in `shaders/`.
pub mod quad_shaders {
    pub const VERTEX_SRC: &str = include_str!("../../shaders/vertex_shader.glsl");
    pub const FRAGMENT_SRC: &str = include_str!("../../shaders/fragment_shader.glsl");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpuCall {
    CompileShader(GLuint),
    DeleteShader(GLuint),
    AttachShader(GLuint, GLuint),
    DetachShader(GLuint, GLuint),
    LinkProgram(GLuint),
    UseProgram(GLuint),
    Uniform3f(GLint),
    Clear,
    DrawElements(GLint),
}

struct FakeShader {
    kind: ShaderKind,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Default)]
struct FakeProgram {
    attached: Vec<GLuint>,
    linked: bool,
    log: String,
    uniforms: Vec<String>,
}

#[derive(Default)]
struct FakeVertexArray {
    element_buffer: Option<GLuint>,
    // slot -> (components, stride, offset, source buffer)
    pointers: HashMap<GLuint, (GLint, GLint, usize, GLuint)>,
    enabled: HashSet<GLuint>,
}

#[derive(Default)]
struct State {
    next_name: GLuint,
    shaders: HashMap<GLuint, FakeShader>,
    programs: HashMap<GLuint, FakeProgram>,
    vertex_arrays: HashMap<GLuint, FakeVertexArray>,
    buffers: HashMap<GLuint, Vec<u8>>,
    bound_vertex_array: GLuint,
    bound_array_buffer: GLuint,
    current_program: GLuint,
    uniform_values: HashMap<(GLuint, String), [f32; 3]>,
    calls: Vec<GpuCall>,
    validation_errors: Vec<String>,
    pending_error: GLenum,
    draws: usize,
}

impl State {
    fn name(&mut self) -> GLuint {
        self.next_name += 1;
        self.next_name
    }

    fn fail(&mut self, message: String) {
        self.validation_errors.push(message);
        self.pending_error = gl::INVALID_OPERATION;
    }
}

#[derive(Default)]
pub struct FakeGpu {
    state: RefCell<State>,
}

impl FakeGpu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.state.borrow().vertex_arrays.len()
    }

    pub fn calls(&self) -> Vec<GpuCall> {
        self.state.borrow().calls.clone()
    }

    pub fn draws(&self) -> usize {
        self.state.borrow().draws
    }

    pub fn validation_errors(&self) -> Vec<String> {
        self.state.borrow().validation_errors.clone()
    }

    /// Last value written to `name` on the current program.
    pub fn uniform_value(&self, name: &str) -> Option<[f32; 3]> {
        let state = self.state.borrow();
        state
            .uniform_values
            .get(&(state.current_program, name.to_string()))
            .copied()
    }

    pub fn attribute_enabled(&self, vertex_array: GLuint, slot: GLuint) -> bool {
        self.state
            .borrow()
            .vertex_arrays
            .get(&vertex_array)
            .map_or(false, |vao| vao.enabled.contains(&slot))
    }
}

fn check_syntax(source: &str) -> Result<String, String> {
    let trimmed = source.trim_start();
    let Some(version_line) = trimmed.lines().next().filter(|l| l.starts_with("#version")) else {
        return Err("0:1(1): error: missing #version directive".to_string());
    };

    let mut depth = 0i32;
    for c in source.chars() {
        match c {
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return Err("error: unexpected '}'".to_string());
        }
    }
    if depth != 0 {
        return Err("error: syntax error, unexpected end of file".to_string());
    }
    if !source.contains("void main") {
        return Err("error: no function with name 'main'".to_string());
    }

    if version_line.split_whitespace().count() < 3 {
        Ok("0:1(1): warning: no profile in #version, assuming core".to_string())
    } else {
        Ok(String::new())
    }
}

fn declared_uniforms(source: &str) -> impl Iterator<Item = String> + '_ {
    source
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("uniform "))
        .filter_map(|line| line.trim_end_matches(';').split_whitespace().last())
        .map(str::to_string)
}

impl GpuApi for FakeGpu {
    fn create_shader(&self, kind: ShaderKind) -> GLuint {
        let mut state = self.state.borrow_mut();
        let name = state.name();
        state.shaders.insert(
            name,
            FakeShader {
                kind,
                source: String::new(),
                compiled: false,
                log: String::new(),
            },
        );
        name
    }

    fn shader_source(&self, shader: GLuint, source: &str) {
        if let Some(s) = self.state.borrow_mut().shaders.get_mut(&shader) {
            s.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        state.calls.push(GpuCall::CompileShader(shader));
        if let Some(s) = state.shaders.get_mut(&shader) {
            match check_syntax(&s.source) {
                Ok(log) => {
                    s.compiled = true;
                    s.log = log;
                }
                Err(log) => {
                    s.compiled = false;
                    s.log = log;
                }
            }
        }
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map_or(false, |s| s.compiled)
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        state.calls.push(GpuCall::DeleteShader(shader));
        state.shaders.remove(&shader);
    }

    fn create_program(&self) -> GLuint {
        let mut state = self.state.borrow_mut();
        let name = state.name();
        state.programs.insert(name, FakeProgram::default());
        name
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        state.calls.push(GpuCall::AttachShader(program, shader));
        if let Some(p) = state.programs.get_mut(&program) {
            p.attached.push(shader);
        }
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        state.calls.push(GpuCall::DetachShader(program, shader));
        if let Some(p) = state.programs.get_mut(&program) {
            p.attached.retain(|&s| s != shader);
        }
    }

    fn link_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        state.calls.push(GpuCall::LinkProgram(program));

        let attached = match state.programs.get(&program) {
            Some(p) => p.attached.clone(),
            None => return,
        };
        let stages: Vec<&FakeShader> = attached.iter().filter_map(|s| state.shaders.get(s)).collect();

        let has = |kind| stages.iter().any(|s| s.kind == kind);
        let result = if stages.iter().any(|s| !s.compiled) {
            Err("error: linking with uncompiled shader".to_string())
        } else if !has(ShaderKind::Vertex) || !has(ShaderKind::Fragment) {
            Err("error: program lacks a vertex or fragment stage".to_string())
        } else {
            let mut uniforms: Vec<String> = Vec::new();
            for stage in &stages {
                for name in declared_uniforms(&stage.source) {
                    if !uniforms.contains(&name) {
                        uniforms.push(name);
                    }
                }
            }
            Ok(uniforms)
        };

        if let Some(p) = state.programs.get_mut(&program) {
            match result {
                Ok(uniforms) => {
                    p.linked = true;
                    p.log.clear();
                    p.uniforms = uniforms;
                }
                Err(log) => {
                    p.linked = false;
                    p.log = log;
                    p.uniforms.clear();
                }
            }
        }
    }

    fn program_link_status(&self, program: GLuint) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map_or(false, |p| p.linked)
    }

    fn program_info_log(&self, program: GLuint) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        state.calls.push(GpuCall::UseProgram(program));
        state.current_program = program;
    }

    fn delete_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        state.programs.remove(&program);
        if state.current_program == program {
            state.current_program = 0;
        }
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> Option<GLint> {
        self.state
            .borrow()
            .programs
            .get(&program)
            .and_then(|p| p.uniforms.iter().position(|u| u == name))
            .map(|index| index as GLint)
    }

    fn uniform_3_f32(&self, location: GLint, x: f32, y: f32, z: f32) {
        let mut state = self.state.borrow_mut();
        state.calls.push(GpuCall::Uniform3f(location));
        let current = state.current_program;
        let name = state
            .programs
            .get(&current)
            .and_then(|p| p.uniforms.get(location as usize))
            .cloned();
        match name {
            Some(name) => {
                state.uniform_values.insert((current, name), [x, y, z]);
            }
            None => state.fail(format!("uniform location {} invalid for program {}", location, current)),
        }
    }

    fn create_vertex_array(&self) -> GLuint {
        let mut state = self.state.borrow_mut();
        let name = state.name();
        state.vertex_arrays.insert(name, FakeVertexArray::default());
        name
    }

    fn bind_vertex_array(&self, vertex_array: GLuint) {
        self.state.borrow_mut().bound_vertex_array = vertex_array;
    }

    fn delete_vertex_array(&self, vertex_array: GLuint) {
        let mut state = self.state.borrow_mut();
        state.vertex_arrays.remove(&vertex_array);
        if state.bound_vertex_array == vertex_array {
            state.bound_vertex_array = 0;
        }
    }

    fn create_buffer(&self) -> GLuint {
        let mut state = self.state.borrow_mut();
        let name = state.name();
        state.buffers.insert(name, Vec::new());
        name
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: GLuint) {
        let mut state = self.state.borrow_mut();
        match target {
            BufferTarget::Array => state.bound_array_buffer = buffer,
            BufferTarget::ElementArray => {
                let vao = state.bound_vertex_array;
                match state.vertex_arrays.get_mut(&vao) {
                    Some(v) => v.element_buffer = Some(buffer),
                    None => state.fail("element buffer bound without a vertex array".to_string()),
                }
            }
        }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        let mut state = self.state.borrow_mut();
        let buffer = match target {
            BufferTarget::Array => Some(state.bound_array_buffer),
            BufferTarget::ElementArray => state
                .vertex_arrays
                .get(&state.bound_vertex_array)
                .and_then(|v| v.element_buffer),
        };
        let contents = match buffer {
            Some(b) => state.buffers.get_mut(&b),
            None => None,
        };
        match contents {
            Some(contents) => *contents = data.to_vec(),
            None => state.fail(format!("buffer_data on unbound {:?} target", target)),
        }
    }

    fn read_buffer(&self, target: BufferTarget, len: usize) -> Vec<u8> {
        let state = self.state.borrow();
        let buffer = match target {
            BufferTarget::Array => Some(state.bound_array_buffer),
            BufferTarget::ElementArray => state
                .vertex_arrays
                .get(&state.bound_vertex_array)
                .and_then(|v| v.element_buffer),
        };
        buffer
            .and_then(|b| state.buffers.get(&b))
            .map(|data| data.iter().copied().take(len).collect())
            .unwrap_or_default()
    }

    fn delete_buffer(&self, buffer: GLuint) {
        let mut state = self.state.borrow_mut();
        state.buffers.remove(&buffer);
        if state.bound_array_buffer == buffer {
            state.bound_array_buffer = 0;
        }
    }

    fn vertex_attrib_pointer_f32(&self, index: GLuint, size: GLint, stride: GLint, offset: usize) {
        let mut state = self.state.borrow_mut();
        let source = state.bound_array_buffer;
        let vao = state.bound_vertex_array;
        match state.vertex_arrays.get_mut(&vao) {
            Some(v) if source != 0 => {
                v.pointers.insert(index, (size, stride, offset, source));
            }
            _ => state.fail(format!("attribute {} declared without vertex array and buffer", index)),
        }
    }

    fn enable_vertex_attrib_array(&self, index: GLuint) {
        let mut state = self.state.borrow_mut();
        let vao = state.bound_vertex_array;
        match state.vertex_arrays.get_mut(&vao) {
            Some(v) => {
                v.enabled.insert(index);
            }
            None => state.fail(format!("attribute {} enabled without vertex array", index)),
        }
    }

    fn viewport(&self, _x: GLint, _y: GLint, _width: GLint, _height: GLint) {}

    fn clear_color(&self, _r: f32, _g: f32, _b: f32, _a: f32) {}

    fn clear(&self, _mask: GLbitfield) {
        self.state.borrow_mut().calls.push(GpuCall::Clear);
    }

    fn draw_elements_u32(&self, count: GLint) {
        let mut state = self.state.borrow_mut();
        state.calls.push(GpuCall::DrawElements(count));
        state.draws += 1;

        let mut problems = Vec::new();
        match state.programs.get(&state.current_program) {
            Some(p) if p.linked => {}
            _ => problems.push(format!("program {} is not a linked program", state.current_program)),
        }

        match state.vertex_arrays.get(&state.bound_vertex_array) {
            None => problems.push("no vertex array bound".to_string()),
            Some(vao) => {
                let indices: Vec<u32> = vao
                    .element_buffer
                    .and_then(|b| state.buffers.get(&b))
                    .map(|data| {
                        data.chunks_exact(4)
                            .map(|c| u32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
                            .collect()
                    })
                    .unwrap_or_default();
                if indices.len() < count as usize {
                    problems.push(format!("draw of {} indices but {} uploaded", count, indices.len()));
                }

                for slot in [0, 1] {
                    let Some(&(size, stride, offset, buffer)) = vao.pointers.get(&slot) else {
                        problems.push(format!("attribute {} has no pointer", slot));
                        continue;
                    };
                    if !vao.enabled.contains(&slot) {
                        problems.push(format!("attribute {} is disabled", slot));
                        continue;
                    }
                    let len = state.buffers.get(&buffer).map_or(0, Vec::len);
                    let read = offset + size as usize * 4;
                    for &index in indices.iter().take(count as usize) {
                        if index as usize * stride as usize + read > len {
                            problems.push(format!("attribute {} reads past buffer at index {}", slot, index));
                            break;
                        }
                    }
                }
            }
        }

        for problem in problems {
            state.fail(problem);
        }
    }

    fn get_error(&self) -> GLenum {
        std::mem::replace(&mut self.state.borrow_mut().pending_error, gl::NO_ERROR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_check() {
        assert!(check_syntax("#version 330 core\nvoid main() {}").unwrap().is_empty());
        assert!(check_syntax("#version 330\nvoid main() {}").unwrap().contains("warning"));
        assert!(check_syntax("void main() {}").is_err());
        assert!(check_syntax("#version 330 core\nvoid main() {").is_err());
        assert!(check_syntax("#version 330 core\nvoid helper() {}").is_err());
    }

    #[test]
    fn test_uniform_declarations() {
        let names: Vec<String> = declared_uniforms("uniform vec3 shift;\n  uniform mat4 mvp;\nin vec3 a;").collect();
        assert_eq!(names, vec!["shift".to_string(), "mvp".to_string()]);
    }

    #[test]
    fn test_draw_without_state_fails_validation() {
        let gpu = FakeGpu::new();
        gpu.draw_elements_u32(6);
        assert!(!gpu.validation_errors().is_empty());
        assert_eq!(gpu.get_error(), gl::INVALID_OPERATION);
        assert_eq!(gpu.get_error(), gl::NO_ERROR);
    }

    /// Four interleaved vertices (24-byte stride) with `indices` in the
    /// element buffer, both attributes enabled.
    fn hand_built_vertex_array(gpu: &FakeGpu, indices: &[u32]) {
        let vao = gpu.create_vertex_array();
        gpu.bind_vertex_array(vao);

        let vbo = gpu.create_buffer();
        gpu.bind_buffer(BufferTarget::Array, vbo);
        gpu.buffer_data(BufferTarget::Array, &[0u8; 4 * 24]);
        gpu.vertex_attrib_pointer_f32(0, 3, 24, 0);
        gpu.enable_vertex_attrib_array(0);
        gpu.vertex_attrib_pointer_f32(1, 3, 24, 12);
        gpu.enable_vertex_attrib_array(1);

        let ebo = gpu.create_buffer();
        gpu.bind_buffer(BufferTarget::ElementArray, ebo);
        let bytes: Vec<u8> = indices.iter().flat_map(|i| i.to_ne_bytes()).collect();
        gpu.buffer_data(BufferTarget::ElementArray, &bytes);
    }

    #[test]
    fn test_draw_past_vertex_buffer_fails_validation() {
        let gpu = FakeGpu::new();
        hand_built_vertex_array(&gpu, &[0, 2, 4, 2, 4, 6]);

        gpu.draw_elements_u32(6);

        let errors = gpu.validation_errors();
        assert!(errors.contains(&"attribute 0 reads past buffer at index 4".to_string()), "{:?}", errors);
        assert!(errors.contains(&"attribute 1 reads past buffer at index 4".to_string()), "{:?}", errors);
        assert_eq!(gpu.get_error(), gl::INVALID_OPERATION);
    }

    #[test]
    fn test_draw_within_vertex_buffer_reads_nothing_past() {
        let gpu = FakeGpu::new();
        hand_built_vertex_array(&gpu, &[0, 1, 2, 1, 2, 3]);

        gpu.draw_elements_u32(6);

        // No program is in use, so only that complaint remains.
        let errors = gpu.validation_errors();
        assert!(errors.iter().all(|e| !e.contains("reads past")), "{:?}", errors);
        assert_eq!(errors, vec!["program 0 is not a linked program".to_string()]);
    }
}
