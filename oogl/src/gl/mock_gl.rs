/// Mock Gl backend for unit tests (no GL context required)
///
/// Records every call as a `GlCall`, hands out object names starting at 1
/// (recycled after deletion) and can be primed to fail creation, deletion,
/// compilation or linking.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{Error, Result};
use crate::gl::{
    AttribPointer, BufferTarget, BufferUsage, Capability, Gl, IndexType, PrimitiveMode,
    ShaderStage, TextureImage, TextureParameter, TextureTarget, UniformValue,
};
use crate::utils::SlotAllocator;

// ============================================================================
// Recorded calls
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    Enable(Capability),
    Disable(Capability),
    CreateBuffer(u32),
    BindBuffer(BufferTarget, u32),
    BufferData { target: BufferTarget, len: usize, usage: BufferUsage },
    BufferSubData { target: BufferTarget, offset: usize, len: usize },
    DeleteBuffer(u32),
    CreateTexture(u32),
    BindTexture(TextureTarget, u32),
    ActiveTexture(u32),
    TexParameter(TextureTarget, TextureParameter),
    TexImage { target: TextureTarget, image: TextureImage, has_data: bool },
    DeleteTexture(u32),
    CreateShader(ShaderStage, u32),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    AttachShader(u32, u32),
    DetachShader(u32, u32),
    LinkProgram(u32),
    UseProgram(u32),
    DeleteProgram(u32),
    SetUniform(u32, UniformValue),
    VertexAttribPointer(u32, AttribPointer),
    EnableVertexAttribArray(u32),
    DisableVertexAttribArray(u32),
    DrawArrays(PrimitiveMode, i32, i32),
    DrawElements(PrimitiveMode, i32, IndexType),
}

// ============================================================================
// Mock state
// ============================================================================

#[derive(Default)]
struct MockState {
    calls: RefCell<Vec<GlCall>>,
    names: RefCell<SlotAllocator>,
    fail_next_create: Cell<bool>,
    fail_next_delete: Cell<bool>,
    compile_error: RefCell<Option<String>>,
    link_error: RefCell<Option<String>>,
    pending_error: Cell<u32>,
    inactive: RefCell<FxHashSet<String>>,
    locations: RefCell<FxHashMap<String, u32>>,
    extensions: RefCell<Vec<String>>,
}

/// Recording Gl backend
///
/// Cloning shares the state, so a test can keep a clone after moving the
/// backend into a `Context`.
#[derive(Clone, Default)]
pub struct MockGl {
    state: Rc<MockState>,
}

impl MockGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded calls
    pub fn calls(&self) -> Vec<GlCall> {
        self.state.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.state.calls.borrow_mut().clear();
    }

    /// Number of recorded calls matching `pred`
    pub fn count_calls<F: Fn(&GlCall) -> bool>(&self, pred: F) -> usize {
        self.state.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    /// Number of object names currently alive
    pub fn live_objects(&self) -> u32 {
        self.state.names.borrow().len()
    }

    pub fn fail_next_create(&self) {
        self.state.fail_next_create.set(true);
    }

    pub fn fail_next_delete(&self) {
        self.state.fail_next_delete.set(true);
    }

    pub fn set_compile_error(&self, log: Option<&str>) {
        *self.state.compile_error.borrow_mut() = log.map(str::to_string);
    }

    pub fn set_link_error(&self, log: Option<&str>) {
        *self.state.link_error.borrow_mut() = log.map(str::to_string);
    }

    /// Make the next glGetError return `code`
    pub fn set_error(&self, code: u32) {
        self.state.pending_error.set(code);
    }

    /// Report `name` as inactive in every program (no location)
    pub fn set_inactive(&self, name: &str) {
        self.state.inactive.borrow_mut().insert(name.to_string());
    }

    pub fn set_extensions(&self, names: &[&str]) {
        *self.state.extensions.borrow_mut() = names.iter().map(|s| s.to_string()).collect();
    }

    fn record(&self, call: GlCall) {
        self.state.calls.borrow_mut().push(call);
    }

    fn alloc_name(&self) -> Result<u32> {
        if self.state.fail_next_create.replace(false) {
            return Err(Error::BackendError("mock: object creation failed".to_string()));
        }
        let id = self.state.names.borrow_mut().alloc()
            .ok_or_else(|| Error::BackendError("mock: out of object names".to_string()))?;
        Ok(id + 1)
    }

    fn free_name(&self, name: u32) -> Result<()> {
        if self.state.fail_next_delete.replace(false) {
            return Err(Error::BackendError(format!("mock: failed to delete {}", name)));
        }
        let mut names = self.state.names.borrow_mut();
        if name == 0 || name > names.high_water_mark() {
            return Err(Error::BackendError(format!("mock: unknown object {}", name)));
        }
        names.free(name - 1);
        Ok(())
    }

    fn location(&self, name: &str) -> Option<u32> {
        if self.state.inactive.borrow().contains(name) {
            return None;
        }
        let mut locations = self.state.locations.borrow_mut();
        let next = locations.len() as u32;
        Some(*locations.entry(name.to_string()).or_insert(next))
    }
}

impl Gl for MockGl {
    fn enable(&self, capability: Capability) {
        self.record(GlCall::Enable(capability));
    }

    fn disable(&self, capability: Capability) {
        self.record(GlCall::Disable(capability));
    }

    fn get_error(&self) -> u32 {
        self.state.pending_error.replace(0)
    }

    fn extensions(&self) -> Vec<String> {
        self.state.extensions.borrow().clone()
    }

    fn create_buffer(&self) -> Result<u32> {
        let name = self.alloc_name()?;
        self.record(GlCall::CreateBuffer(name));
        Ok(name)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: u32) {
        self.record(GlCall::BindBuffer(target, buffer));
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        self.record(GlCall::BufferData { target, len: data.len(), usage });
    }

    fn buffer_sub_data(&self, target: BufferTarget, offset: usize, data: &[u8]) {
        self.record(GlCall::BufferSubData { target, offset, len: data.len() });
    }

    fn delete_buffer(&self, buffer: u32) -> Result<()> {
        self.record(GlCall::DeleteBuffer(buffer));
        self.free_name(buffer)
    }

    fn create_texture(&self) -> Result<u32> {
        let name = self.alloc_name()?;
        self.record(GlCall::CreateTexture(name));
        Ok(name)
    }

    fn bind_texture(&self, target: TextureTarget, texture: u32) {
        self.record(GlCall::BindTexture(target, texture));
    }

    fn active_texture(&self, unit: u32) {
        self.record(GlCall::ActiveTexture(unit));
    }

    fn tex_parameter(&self, target: TextureTarget, parameter: TextureParameter) {
        self.record(GlCall::TexParameter(target, parameter));
    }

    fn tex_image_2d(&self, image: &TextureImage, data: Option<&[u8]>) {
        self.record(GlCall::TexImage {
            target: TextureTarget::Texture2D,
            image: *image,
            has_data: data.is_some(),
        });
    }

    fn tex_image_3d(&self, image: &TextureImage, data: Option<&[u8]>) {
        self.record(GlCall::TexImage {
            target: TextureTarget::Texture3D,
            image: *image,
            has_data: data.is_some(),
        });
    }

    fn delete_texture(&self, texture: u32) -> Result<()> {
        self.record(GlCall::DeleteTexture(texture));
        self.free_name(texture)
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<u32> {
        let name = self.alloc_name()?;
        self.record(GlCall::CreateShader(stage, name));
        Ok(name)
    }

    fn compile_shader(&self, shader: u32, _source: &str) -> std::result::Result<(), String> {
        self.record(GlCall::CompileShader(shader));
        match self.state.compile_error.borrow().clone() {
            Some(log) => Err(log),
            None => Ok(()),
        }
    }

    fn delete_shader(&self, shader: u32) -> Result<()> {
        self.record(GlCall::DeleteShader(shader));
        self.free_name(shader)
    }

    fn create_program(&self) -> Result<u32> {
        let name = self.alloc_name()?;
        self.record(GlCall::CreateProgram(name));
        Ok(name)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.record(GlCall::AttachShader(program, shader));
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        self.record(GlCall::DetachShader(program, shader));
    }

    fn link_program(&self, program: u32) -> std::result::Result<(), String> {
        self.record(GlCall::LinkProgram(program));
        match self.state.link_error.borrow().clone() {
            Some(log) => Err(log),
            None => Ok(()),
        }
    }

    fn use_program(&self, program: u32) {
        self.record(GlCall::UseProgram(program));
    }

    fn delete_program(&self, program: u32) -> Result<()> {
        self.record(GlCall::DeleteProgram(program));
        self.free_name(program)
    }

    fn attrib_location(&self, _program: u32, name: &str) -> Option<u32> {
        self.location(name)
    }

    fn uniform_location(&self, _program: u32, name: &str) -> Option<u32> {
        self.location(name)
    }

    fn set_uniform(&self, location: u32, value: &UniformValue) {
        self.record(GlCall::SetUniform(location, *value));
    }

    fn vertex_attrib_pointer(&self, index: u32, pointer: &AttribPointer) {
        self.record(GlCall::VertexAttribPointer(index, *pointer));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(GlCall::EnableVertexAttribArray(index));
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        self.record(GlCall::DisableVertexAttribArray(index));
    }

    fn draw_arrays(&self, mode: PrimitiveMode, first: i32, count: i32) {
        self.record(GlCall::DrawArrays(mode, first, count));
    }

    fn draw_elements(&self, mode: PrimitiveMode, count: i32, index_type: IndexType, _offset: i32) {
        self.record(GlCall::DrawElements(mode, count, index_type));
    }
}

#[cfg(test)]
#[path = "mock_gl_tests.rs"]
mod tests;
