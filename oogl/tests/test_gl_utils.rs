#![allow(dead_code)]
//! Test utilities - a recording `Gl` backend for integration tests
//!
//! Integration tests only see the public API, so they cannot use the crate's
//! internal mock. `RecordingGl` records every call as a short text line and
//! tracks which object names are alive, which is enough to check lifecycles
//! end to end without a GL context.

use oogl::gl::{
    AttribPointer, BufferTarget, BufferUsage, Capability, Gl, IndexType, PrimitiveMode,
    ShaderStage, TextureImage, TextureParameter, TextureTarget, UniformValue,
};
use oogl::{Error, Result};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::rc::Rc;

#[derive(Default)]
struct State {
    calls: RefCell<Vec<String>>,
    next_name: Cell<u32>,
    live: RefCell<BTreeSet<u32>>,
    fail_deletes: Cell<bool>,
    inactive: RefCell<HashSet<String>>,
    locations: RefCell<HashMap<String, u32>>,
    compile_error: RefCell<Option<String>>,
}

/// Recording backend; clones share the same state
#[derive(Clone, Default)]
pub struct RecordingGl {
    state: Rc<State>,
}

impl RecordingGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded calls, oldest first
    pub fn calls(&self) -> Vec<String> {
        self.state.calls.borrow().clone()
    }

    /// Number of recorded calls starting with `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        self.state.calls.borrow().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn clear(&self) {
        self.state.calls.borrow_mut().clear();
    }

    /// Object names created and not yet deleted
    pub fn live_objects(&self) -> usize {
        self.state.live.borrow().len()
    }

    /// Make every delete fail until called again with `false`
    pub fn fail_deletes(&self, fail: bool) {
        self.state.fail_deletes.set(fail);
    }

    pub fn set_inactive(&self, name: &str) {
        self.state.inactive.borrow_mut().insert(name.to_string());
    }

    pub fn set_compile_error(&self, log: Option<&str>) {
        *self.state.compile_error.borrow_mut() = log.map(str::to_string);
    }

    fn record(&self, call: String) {
        self.state.calls.borrow_mut().push(call);
    }

    fn create(&self, kind: &str) -> Result<u32> {
        let name = self.state.next_name.get() + 1;
        self.state.next_name.set(name);
        self.state.live.borrow_mut().insert(name);
        self.record(format!("create {} {}", kind, name));
        Ok(name)
    }

    fn delete(&self, kind: &str, name: u32) -> Result<()> {
        self.record(format!("delete {} {}", kind, name));
        if self.state.fail_deletes.get() {
            return Err(Error::BackendError(format!("cannot delete {} {}", kind, name)));
        }
        if !self.state.live.borrow_mut().remove(&name) {
            return Err(Error::BackendError(format!("{} {} is not alive", kind, name)));
        }
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

impl Gl for RecordingGl {
    fn enable(&self, capability: Capability) {
        self.record(format!("enable {:?}", capability));
    }

    fn disable(&self, capability: Capability) {
        self.record(format!("disable {:?}", capability));
    }

    fn get_error(&self) -> u32 {
        0
    }

    fn extensions(&self) -> Vec<String> {
        vec!["GL_ARB_texture_float".to_string()]
    }

    fn create_buffer(&self) -> Result<u32> {
        self.create("buffer")
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: u32) {
        self.record(format!("bind buffer {:?} {}", target, buffer));
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], _usage: BufferUsage) {
        self.record(format!("buffer data {:?} {}", target, data.len()));
    }

    fn buffer_sub_data(&self, target: BufferTarget, offset: usize, data: &[u8]) {
        self.record(format!("buffer subdata {:?} {} {}", target, offset, data.len()));
    }

    fn delete_buffer(&self, buffer: u32) -> Result<()> {
        self.delete("buffer", buffer)
    }

    fn create_texture(&self) -> Result<u32> {
        self.create("texture")
    }

    fn bind_texture(&self, target: TextureTarget, texture: u32) {
        self.record(format!("bind texture {:?} {}", target, texture));
    }

    fn active_texture(&self, unit: u32) {
        self.record(format!("active texture {}", unit));
    }

    fn tex_parameter(&self, _target: TextureTarget, parameter: TextureParameter) {
        self.record(format!("tex parameter {:?}", parameter));
    }

    fn tex_image_2d(&self, image: &TextureImage, _data: Option<&[u8]>) {
        self.record(format!("tex image 2d {}x{}", image.width, image.height));
    }

    fn tex_image_3d(&self, image: &TextureImage, _data: Option<&[u8]>) {
        self.record(format!("tex image 3d {}x{}x{}", image.width, image.height, image.depth));
    }

    fn delete_texture(&self, texture: u32) -> Result<()> {
        self.delete("texture", texture)
    }

    fn create_shader(&self, _stage: ShaderStage) -> Result<u32> {
        self.create("shader")
    }

    fn compile_shader(&self, shader: u32, _source: &str) -> std::result::Result<(), String> {
        self.record(format!("compile {}", shader));
        match self.state.compile_error.borrow().clone() {
            Some(log) => Err(log),
            None => Ok(()),
        }
    }

    fn delete_shader(&self, shader: u32) -> Result<()> {
        self.delete("shader", shader)
    }

    fn create_program(&self) -> Result<u32> {
        self.create("program")
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.record(format!("attach {} {}", program, shader));
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        self.record(format!("detach {} {}", program, shader));
    }

    fn link_program(&self, program: u32) -> std::result::Result<(), String> {
        self.record(format!("link {}", program));
        Ok(())
    }

    fn use_program(&self, program: u32) {
        self.record(format!("use program {}", program));
    }

    fn delete_program(&self, program: u32) -> Result<()> {
        self.delete("program", program)
    }

    fn attrib_location(&self, _program: u32, name: &str) -> Option<u32> {
        self.location(name)
    }

    fn uniform_location(&self, _program: u32, name: &str) -> Option<u32> {
        self.location(name)
    }

    fn set_uniform(&self, location: u32, value: &UniformValue) {
        self.record(format!("uniform {} {:?}", location, value));
    }

    fn vertex_attrib_pointer(&self, index: u32, pointer: &AttribPointer) {
        self.record(format!("attrib pointer {} size {}", index, pointer.size));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(format!("enable attrib {}", index));
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        self.record(format!("disable attrib {}", index));
    }

    fn draw_arrays(&self, mode: PrimitiveMode, first: i32, count: i32) {
        self.record(format!("draw arrays {:?} {} {}", mode, first, count));
    }

    fn draw_elements(&self, mode: PrimitiveMode, count: i32, index_type: IndexType, _offset: i32) {
        self.record(format!("draw elements {:?} {} {:?}", mode, count, index_type));
    }
}
