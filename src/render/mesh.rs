use std::mem;
use std::rc::Rc;

use bytemuck::{Pod, Zeroable};
use gl::types::{GLint, GLuint};

use super::gpu::{BufferTarget, GpuApi};
use crate::utils::GeometryError;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }
}

/// Quad corners: top-left, top-right, bottom-left, bottom-right.
pub const QUAD_VERTICES: [Vertex; 4] = [
    Vertex::new([-0.5, 0.5, 0.0], [1.0, 0.0, 0.0]),
    Vertex::new([0.5, 0.5, 0.0], [0.0, 1.0, 0.0]),
    Vertex::new([-0.5, -0.5, 0.0], [0.0, 0.0, 1.0]),
    Vertex::new([0.5, -0.5, 0.0], [1.0, 1.0, 0.0]),
];

/// Two triangles sharing the 1-2 diagonal.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 1, 2, 3];

/// One vertex attribute read from the interleaved vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub slot: GLuint,
    pub components: GLint,
    /// Bytes between consecutive vertices.
    pub stride: GLint,
    /// Byte offset of the first component inside a vertex.
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeLayout {
    pub attributes: Vec<VertexAttribute>,
}

impl AttributeLayout {
    pub const POSITION_SLOT: GLuint = 0;
    pub const COLOR_SLOT: GLuint = 1;

    /// Position in slot 0 and color in slot 1, both from one [`Vertex`]-sized stride.
    pub fn interleaved() -> Self {
        let stride = mem::size_of::<Vertex>() as GLint;
        Self {
            attributes: vec![
                VertexAttribute {
                    slot: Self::POSITION_SLOT,
                    components: 3,
                    stride,
                    offset: mem::offset_of!(Vertex, position),
                },
                VertexAttribute {
                    slot: Self::COLOR_SLOT,
                    components: 3,
                    stride,
                    offset: mem::offset_of!(Vertex, color),
                },
            ],
        }
    }

    fn apply<G: GpuApi>(&self, gpu: &G) {
        for attribute in &self.attributes {
            gpu.vertex_attrib_pointer_f32(
                attribute.slot,
                attribute.components,
                attribute.stride,
                attribute.offset,
            );
            gpu.enable_vertex_attrib_array(attribute.slot);
        }
    }
}

/// Vertex array, vertex buffer and index buffer for one static mesh.
///
/// Uploaded once; the GPU objects are released when this is dropped.
pub struct GeometryBuffer<G: GpuApi> {
    gpu: Rc<G>,
    vertex_array: GLuint,
    vertex_buffer: GLuint,
    index_buffer: GLuint,
    vertex_count: usize,
    index_count: usize,
    layout: AttributeLayout,
}

impl<G: GpuApi> GeometryBuffer<G> {
    /// Uploads `vertices` and `indices` and declares the interleaved layout.
    ///
    /// Rejects index sets that reach past the last vertex. The vertex array
    /// is left bound, with the index buffer recorded in it.
    pub fn upload(gpu: &Rc<G>, vertices: &[Vertex], indices: &[u32]) -> Result<Self, GeometryError> {
        validate_indices(vertices.len(), indices)?;

        let vertex_array = gpu.create_vertex_array();
        gpu.bind_vertex_array(vertex_array);

        let vertex_buffer = gpu.create_buffer();
        gpu.bind_buffer(BufferTarget::Array, vertex_buffer);
        gpu.buffer_data(BufferTarget::Array, bytemuck::cast_slice(vertices));

        let layout = AttributeLayout::interleaved();
        layout.apply(gpu.as_ref());

        let index_buffer = gpu.create_buffer();
        gpu.bind_buffer(BufferTarget::ElementArray, index_buffer);
        gpu.buffer_data(BufferTarget::ElementArray, bytemuck::cast_slice(indices));

        log::debug!(
            "Uploaded {} vertices and {} indices (vao {}, vbo {}, ebo {})",
            vertices.len(),
            indices.len(),
            vertex_array,
            vertex_buffer,
            index_buffer
        );

        Ok(Self {
            gpu: Rc::clone(gpu),
            vertex_array,
            vertex_buffer,
            index_buffer,
            vertex_count: vertices.len(),
            index_count: indices.len(),
            layout,
        })
    }

    pub fn bind(&self) {
        self.gpu.bind_vertex_array(self.vertex_array);
    }

    pub fn vertex_array(&self) -> GLuint {
        self.vertex_array
    }

    pub fn vertex_buffer(&self) -> GLuint {
        self.vertex_buffer
    }

    pub fn index_buffer(&self) -> GLuint {
        self.index_buffer
    }

    pub fn index_count(&self) -> usize {
        self.index_count
    }

    pub fn layout(&self) -> &AttributeLayout {
        &self.layout
    }

    /// Reads both buffers back from the GPU.
    pub fn read_back(&self) -> (Vec<Vertex>, Vec<u32>) {
        self.bind();
        self.gpu.bind_buffer(BufferTarget::Array, self.vertex_buffer);
        let vertex_bytes = self
            .gpu
            .read_buffer(BufferTarget::Array, self.vertex_count * mem::size_of::<Vertex>());
        let index_bytes = self
            .gpu
            .read_buffer(BufferTarget::ElementArray, self.index_count * mem::size_of::<u32>());

        (
            vertex_bytes
                .chunks_exact(mem::size_of::<Vertex>())
                .map(bytemuck::pod_read_unaligned)
                .collect(),
            index_bytes
                .chunks_exact(mem::size_of::<u32>())
                .map(bytemuck::pod_read_unaligned)
                .collect(),
        )
    }
}

impl<G: GpuApi> Drop for GeometryBuffer<G> {
    fn drop(&mut self) {
        self.gpu.delete_vertex_array(self.vertex_array);
        self.gpu.delete_buffer(self.vertex_buffer);
        self.gpu.delete_buffer(self.index_buffer);
    }
}

pub fn validate_indices(vertex_count: usize, indices: &[u32]) -> Result<(), GeometryError> {
    if vertex_count == 0 || indices.is_empty() {
        return Err(GeometryError::Empty);
    }
    match indices.iter().find(|&&i| i as usize >= vertex_count) {
        Some(&index) => Err(GeometryError::IndexOutOfRange {
            index,
            vertex_count,
        }),
        None => Ok(()),
    }
}
