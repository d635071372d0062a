/// Vertex and element buffers
///
/// Both keep a CPU-side copy of their data. `set_data` and `set_subdata`
/// only touch that copy and queue an upload; the queue is flushed the next
/// time the buffer is enabled. When the GL object is (re)created the whole
/// copy is uploaded, so a deleted buffer can be enabled again.

use std::mem::{self, size_of};
use std::ops::Range;
use bytemuck::Pod;
use glam::{Vec2, Vec3, Vec4};

use crate::context::Context;
use crate::error::Result;
use crate::gl::{AttribPointer, BufferTarget, BufferUsage, IndexType, PrimitiveMode};
use crate::objects::{GlObject, Handle};

// ============================================================================
// Element types
// ============================================================================

/// Float vertex element with a fixed number of components
pub trait VertexData: Pod {
    /// Components per vertex (1..=4)
    const COMPONENTS: i32;
}

impl VertexData for f32 {
    const COMPONENTS: i32 = 1;
}

impl<const N: usize> VertexData for [f32; N]
where
    [f32; N]: Pod,
{
    const COMPONENTS: i32 = N as i32;
}

impl VertexData for Vec2 {
    const COMPONENTS: i32 = 2;
}

impl VertexData for Vec3 {
    const COMPONENTS: i32 = 3;
}

impl VertexData for Vec4 {
    const COMPONENTS: i32 = 4;
}

/// Index element accepted by glDrawElements
pub trait IndexData: Pod {
    const INDEX_TYPE: IndexType;
}

impl IndexData for u8 {
    const INDEX_TYPE: IndexType = IndexType::U8;
}

impl IndexData for u16 {
    const INDEX_TYPE: IndexType = IndexType::U16;
}

impl IndexData for u32 {
    const INDEX_TYPE: IndexType = IndexType::U32;
}

// ============================================================================
// Shared storage
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Upload {
    Full,
    Range(Range<usize>),
}

#[derive(Debug)]
struct BufferStorage {
    handle: Handle,
    target: BufferTarget,
    usage: BufferUsage,
    data: Vec<u8>,
    pending: Vec<Upload>,
}

impl BufferStorage {
    fn new(source: &'static str, target: BufferTarget, data: Vec<u8>) -> Self {
        Self {
            handle: Handle::new(source),
            target,
            usage: BufferUsage::default(),
            data,
            pending: vec![Upload::Full],
        }
    }

    fn replace(&mut self, data: Vec<u8>) {
        self.data = data;
        self.pending.clear();
        self.pending.push(Upload::Full);
    }

    fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<()> {
        let end = offset.saturating_add(bytes.len());
        if end > self.data.len() {
            crate::oogl_bail!(
                self.handle.source(),
                "set_subdata range {}..{} exceeds buffer size {}",
                offset,
                end,
                self.data.len()
            );
        }
        self.data[offset..end].copy_from_slice(bytes);
        if !self.pending.contains(&Upload::Full) {
            self.pending.push(Upload::Range(offset..end));
        }
        Ok(())
    }

    fn bind(&mut self, ctx: &Context) -> Result<()> {
        let (id, created) = self.handle.get_or_create(ctx, |gl| gl.create_buffer())?;
        if created {
            self.pending.clear();
            self.pending.push(Upload::Full);
        }

        let gl = ctx.gl();
        gl.bind_buffer(self.target, id);
        for upload in mem::take(&mut self.pending) {
            match upload {
                Upload::Full => {
                    crate::oogl_trace!(self.handle.source(), "Uploading {} bytes to handle {}", self.data.len(), id);
                    gl.buffer_data(self.target, &self.data, self.usage);
                }
                Upload::Range(range) => {
                    gl.buffer_sub_data(self.target, range.start, &self.data[range]);
                }
            }
        }

        if let Err(err) = ctx.check_error("buffer upload") {
            // contents unknown, start over on the next enable
            self.pending = vec![Upload::Full];
            gl.bind_buffer(self.target, 0);
            return Err(err);
        }
        Ok(())
    }

    fn unbind(&self, ctx: &Context) {
        ctx.gl().bind_buffer(self.target, 0);
    }

    fn delete(&mut self, ctx: &Context, handle: u32) -> Result<()> {
        ctx.gl().delete_buffer(handle)?;
        ctx.check_error("glDeleteBuffers")
    }

    fn has_pending_upload(&self) -> bool {
        !self.pending.is_empty()
    }
}

// ============================================================================
// VertexBuffer
// ============================================================================

/// Buffer of float vertex attributes (GL_ARRAY_BUFFER)
///
/// Usually attached to a `ShaderProgram` with `set_attribute`, which binds
/// it and sets up the attribute pointer while the program is enabled.
#[derive(Debug)]
pub struct VertexBuffer {
    storage: BufferStorage,
    components: i32,
    element_size: usize,
    count: usize,
}

impl VertexBuffer {
    pub fn new<T: VertexData>(data: &[T]) -> Self {
        Self {
            storage: BufferStorage::new(
                "oogl::VertexBuffer",
                BufferTarget::Array,
                bytemuck::cast_slice(data).to_vec(),
            ),
            components: T::COMPONENTS,
            element_size: size_of::<T>(),
            count: data.len(),
        }
    }

    /// Set the usage hint used by the next full upload
    pub fn with_usage(mut self, usage: BufferUsage) -> Self {
        self.storage.usage = usage;
        self
    }

    /// Replace all data; the element type may change
    pub fn set_data<T: VertexData>(&mut self, data: &[T]) {
        self.storage.replace(bytemuck::cast_slice(data).to_vec());
        self.components = T::COMPONENTS;
        self.element_size = size_of::<T>();
        self.count = data.len();
    }

    /// Overwrite vertices starting at vertex `offset`
    ///
    /// The element type must match the current data and the range must fit.
    pub fn set_subdata<T: VertexData>(&mut self, offset: usize, data: &[T]) -> Result<()> {
        if size_of::<T>() != self.element_size || T::COMPONENTS != self.components {
            crate::oogl_bail!(
                "oogl::VertexBuffer",
                "set_subdata element has {} components ({} bytes), buffer holds {} ({} bytes)",
                T::COMPONENTS,
                size_of::<T>(),
                self.components,
                self.element_size
            );
        }
        self.storage.write(offset * self.element_size, bytemuck::cast_slice(data))
    }

    /// Number of vertices
    pub fn count(&self) -> usize {
        self.count
    }

    /// Components per vertex
    pub fn components(&self) -> i32 {
        self.components
    }

    pub fn size_bytes(&self) -> usize {
        self.storage.data.len()
    }

    pub fn usage(&self) -> BufferUsage {
        self.storage.usage
    }

    pub fn has_pending_upload(&self) -> bool {
        self.storage.has_pending_upload()
    }

    pub(crate) fn attrib_pointer(&self) -> AttribPointer {
        AttribPointer {
            size: self.components,
            stride: 0,
            offset: 0,
            normalized: false,
        }
    }
}

impl GlObject for VertexBuffer {
    fn raw_handle(&self) -> &Handle {
        &self.storage.handle
    }

    fn raw_handle_mut(&mut self) -> &mut Handle {
        &mut self.storage.handle
    }

    fn enable_object(&mut self, ctx: &Context) -> Result<()> {
        self.storage.bind(ctx)
    }

    fn disable_object(&mut self, ctx: &Context) {
        self.storage.unbind(ctx);
    }

    fn delete_object(&mut self, ctx: &Context, handle: u32) -> Result<()> {
        self.storage.delete(ctx, handle)
    }
}

// ============================================================================
// ElementBuffer
// ============================================================================

/// Buffer of vertex indices (GL_ELEMENT_ARRAY_BUFFER)
#[derive(Debug)]
pub struct ElementBuffer {
    storage: BufferStorage,
    index_type: IndexType,
    count: usize,
}

impl ElementBuffer {
    pub fn new<T: IndexData>(indices: &[T]) -> Self {
        Self {
            storage: BufferStorage::new(
                "oogl::ElementBuffer",
                BufferTarget::ElementArray,
                bytemuck::cast_slice(indices).to_vec(),
            ),
            index_type: T::INDEX_TYPE,
            count: indices.len(),
        }
    }

    pub fn with_usage(mut self, usage: BufferUsage) -> Self {
        self.storage.usage = usage;
        self
    }

    /// Replace all indices; the index type may change
    pub fn set_data<T: IndexData>(&mut self, indices: &[T]) {
        self.storage.replace(bytemuck::cast_slice(indices).to_vec());
        self.index_type = T::INDEX_TYPE;
        self.count = indices.len();
    }

    /// Overwrite indices starting at index `offset`
    pub fn set_subdata<T: IndexData>(&mut self, offset: usize, indices: &[T]) -> Result<()> {
        if T::INDEX_TYPE != self.index_type {
            crate::oogl_bail!(
                "oogl::ElementBuffer",
                "set_subdata index type {:?} does not match buffer type {:?}",
                T::INDEX_TYPE,
                self.index_type
            );
        }
        self.storage.write(offset * self.index_type.size_bytes(), bytemuck::cast_slice(indices))
    }

    pub fn index_type(&self) -> IndexType {
        self.index_type
    }

    /// Number of indices
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn has_pending_upload(&self) -> bool {
        self.storage.has_pending_upload()
    }

    /// Draw all indices with the currently enabled program
    pub fn draw(&mut self, ctx: &Context, mode: PrimitiveMode) -> Result<()> {
        let count = self.count as i32;
        let index_type = self.index_type;
        self.with_enabled(ctx, |_, ctx| {
            ctx.gl().draw_elements(mode, count, index_type, 0);
            ctx.check_error("glDrawElements")
        })
    }
}

impl GlObject for ElementBuffer {
    fn raw_handle(&self) -> &Handle {
        &self.storage.handle
    }

    fn raw_handle_mut(&mut self) -> &mut Handle {
        &mut self.storage.handle
    }

    fn enable_object(&mut self, ctx: &Context) -> Result<()> {
        self.storage.bind(ctx)
    }

    fn disable_object(&mut self, ctx: &Context) {
        self.storage.unbind(ctx);
    }

    fn delete_object(&mut self, ctx: &Context, handle: u32) -> Result<()> {
        self.storage.delete(ctx, handle)
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
