/// ShaderProgram - linked shaders plus the inputs they consume
///
/// A program owns its two shaders, the vertex buffers bound to its
/// attributes, its uniform values and the textures bound to its samplers.
/// All of them are stored on the CPU side and pushed to GL when the program
/// is enabled:
///
/// ```text
/// enable:  compile shaders -> attach -> link (once) -> glUseProgram
///          -> push required capabilities
///          -> bind textures to their units, set sampler uniforms
///          -> flush changed uniforms
///          -> bind each attribute buffer, set its attribute pointer
/// disable: disable attribute arrays -> unbind textures
///          -> pop capabilities -> glUseProgram(0)
/// ```
///
/// Attribute and uniform names the driver does not report (typically
/// because the GLSL compiler removed them as unused) are skipped.
///
/// Uniforms set while the program is enabled are sent by `apply_uniforms`,
/// which `draw` and `draw_elements` call before drawing.

use std::collections::hash_map::Entry;
use std::mem;
use rustc_hash::FxHashMap;

use crate::context::Context;
use crate::error::{Error, Result};
use crate::gl::{Capability, PrimitiveMode, UniformValue};
use crate::objects::{
    ElementBuffer, FragmentShader, GlObject, Handle, Texture, VertexBuffer, VertexShader,
};
use crate::utils::SlotAllocator;

const SOURCE: &str = "oogl::ShaderProgram";

/// Texture units available to one program's samplers
pub const MAX_TEXTURE_UNITS: u32 = 16;

#[derive(Debug)]
struct PendingUniform {
    value: UniformValue,
    dirty: bool,
}

#[derive(Debug)]
struct Sampler {
    texture: Texture,
    unit: u32,
}

/// GLSL program built from one vertex and one fragment shader
#[derive(Debug)]
pub struct ShaderProgram {
    handle: Handle,
    vertex: VertexShader,
    fragment: FragmentShader,
    /// (vertex, fragment) shader handles currently attached
    attached: Option<(u32, u32)>,
    linked: bool,

    attributes: FxHashMap<String, VertexBuffer>,
    uniforms: FxHashMap<String, PendingUniform>,
    samplers: FxHashMap<String, Sampler>,
    units: SlotAllocator,
    capabilities: Vec<Capability>,

    // State of the current enable, undone by disable
    in_use: bool,
    enabled_arrays: Vec<u32>,
    bound_samplers: Vec<String>,
    pushed_capabilities: Vec<Capability>,
}

impl ShaderProgram {
    pub fn new(vertex: VertexShader, fragment: FragmentShader) -> Self {
        Self {
            handle: Handle::new(SOURCE),
            vertex,
            fragment,
            attached: None,
            linked: false,
            attributes: FxHashMap::default(),
            uniforms: FxHashMap::default(),
            samplers: FxHashMap::default(),
            units: SlotAllocator::with_capacity_limit(MAX_TEXTURE_UNITS),
            capabilities: Vec::new(),
            in_use: false,
            enabled_arrays: Vec::new(),
            bound_samplers: Vec::new(),
            pushed_capabilities: Vec::new(),
        }
    }

    // ===== SHADERS =====

    pub fn vertex(&self) -> &VertexShader {
        &self.vertex
    }

    /// Mutable access, e.g. to `set_source`; the program relinks on the next enable
    pub fn vertex_mut(&mut self) -> &mut VertexShader {
        &mut self.vertex
    }

    pub fn fragment(&self) -> &FragmentShader {
        &self.fragment
    }

    pub fn fragment_mut(&mut self) -> &mut FragmentShader {
        &mut self.fragment
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    // ===== ATTRIBUTES =====

    /// Bind `buffer` to the attribute `name`
    ///
    /// Returns the buffer previously bound to that name. It still owns its GL
    /// object, if any; delete it when it is no longer needed.
    pub fn set_attribute(&mut self, name: impl Into<String>, buffer: VertexBuffer) -> Option<VertexBuffer> {
        self.attributes.insert(name.into(), buffer)
    }

    pub fn attribute(&self, name: &str) -> Option<&VertexBuffer> {
        self.attributes.get(name)
    }

    /// Mutable access to update the data of an attribute in place
    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut VertexBuffer> {
        self.attributes.get_mut(name)
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<VertexBuffer> {
        self.attributes.remove(name)
    }

    // ===== UNIFORMS =====

    /// Set a uniform value; it is sent to GL on the next enable or
    /// `apply_uniforms` if it changed
    pub fn set_uniform(&mut self, name: impl Into<String>, value: impl Into<UniformValue>) {
        let value = value.into();
        match self.uniforms.entry(name.into()) {
            Entry::Occupied(mut entry) => {
                let pending = entry.get_mut();
                if pending.value != value {
                    pending.value = value;
                    pending.dirty = true;
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(PendingUniform { value, dirty: true });
            }
        }
    }

    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms.get(name).map(|u| u.value)
    }

    /// Send uniforms changed since the program was enabled
    ///
    /// Does nothing while the program is not enabled; pending values are
    /// sent by the next enable instead.
    pub fn apply_uniforms(&mut self, ctx: &Context) -> Result<()> {
        if !self.in_use {
            return Ok(());
        }
        self.handle.check_context(ctx)?;
        self.flush_uniforms(ctx, self.handle.id());
        ctx.check_error("uniform update")
    }

    /// Whether the program is currently enabled
    pub fn is_in_use(&self) -> bool {
        self.in_use
    }

    // ===== TEXTURES =====

    /// Bind `texture` to the sampler uniform `name`
    ///
    /// A sampler keeps its texture unit when its texture is replaced; new
    /// samplers get the lowest free unit. Returns the replaced texture.
    pub fn set_texture(&mut self, name: impl Into<String>, texture: impl Into<Texture>) -> Result<Option<Texture>> {
        let name = name.into();
        let texture = texture.into();

        if let Some(sampler) = self.samplers.get_mut(&name) {
            return Ok(Some(mem::replace(&mut sampler.texture, texture)));
        }

        let unit = match self.units.alloc() {
            Some(unit) => unit,
            None => crate::oogl_bail!(
                SOURCE,
                "Cannot bind sampler '{}': all {} texture units are in use",
                name,
                MAX_TEXTURE_UNITS
            ),
        };
        crate::oogl_debug!(SOURCE, "Sampler '{}' assigned to texture unit {}", name, unit);
        self.samplers.insert(name, Sampler { texture, unit });
        Ok(None)
    }

    pub fn texture(&self, name: &str) -> Option<&Texture> {
        self.samplers.get(name).map(|s| &s.texture)
    }

    pub fn texture_mut(&mut self, name: &str) -> Option<&mut Texture> {
        self.samplers.get_mut(name).map(|s| &mut s.texture)
    }

    /// Texture unit assigned to the sampler `name`
    pub fn texture_unit(&self, name: &str) -> Option<u32> {
        self.samplers.get(name).map(|s| s.unit)
    }

    /// Unbind the sampler `name` and free its texture unit
    pub fn remove_texture(&mut self, name: &str) -> Option<Texture> {
        let sampler = self.samplers.remove(name)?;
        self.units.free(sampler.unit);
        Some(sampler.texture)
    }

    // ===== CAPABILITIES =====

    /// Keep `capability` enabled (reference counted) while the program is enabled
    pub fn require_capability(&mut self, capability: Capability) {
        if !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
        }
    }

    pub fn required_capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    // ===== DRAWING =====

    /// Draw the attribute buffers as `mode` primitives
    ///
    /// The vertex count is that of the shortest attribute buffer. Inside an
    /// enabled scope the current enable is reused after `apply_uniforms`;
    /// otherwise the program is enabled for the draw only.
    pub fn draw(&mut self, ctx: &Context, mode: PrimitiveMode) -> Result<()> {
        let count = self.attributes.values().map(VertexBuffer::count).min().unwrap_or(0);
        if self.in_use {
            self.apply_uniforms(ctx)?;
            return ctx.draw_arrays(mode, 0, count as i32);
        }
        self.with_enabled(ctx, |_, ctx| ctx.draw_arrays(mode, 0, count as i32))
    }

    /// Draw indexed primitives from `indices`
    pub fn draw_elements(&mut self, ctx: &Context, mode: PrimitiveMode, indices: &mut ElementBuffer) -> Result<()> {
        if self.in_use {
            self.apply_uniforms(ctx)?;
            return indices.draw(ctx, mode);
        }
        self.with_enabled(ctx, |_, ctx| indices.draw(ctx, mode))
    }

    // ===== ENABLE STEPS =====

    /// Create, attach and link as needed; returns the program name
    fn build(&mut self, ctx: &Context) -> Result<u32> {
        let (id, created) = self.handle.get_or_create(ctx, |gl| gl.create_program())?;
        if created {
            self.attached = None;
            self.linked = false;
        }

        let vertex_recompiled = self.vertex.compile(ctx)?;
        let fragment_recompiled = self.fragment.compile(ctx)?;
        if vertex_recompiled || fragment_recompiled {
            self.linked = false;
        }

        let gl = ctx.gl();
        let shaders = (self.vertex.handle(), self.fragment.handle());
        if self.attached != Some(shaders) {
            if let Some((old_vertex, old_fragment)) = self.attached.take() {
                gl.detach_shader(id, old_vertex);
                gl.detach_shader(id, old_fragment);
            }
            gl.attach_shader(id, shaders.0);
            gl.attach_shader(id, shaders.1);
            self.attached = Some(shaders);
            self.linked = false;
        }

        if !self.linked {
            gl.link_program(id).map_err(|log| {
                crate::oogl_error!(SOURCE, "Linking handle {} failed:\n{}", id, log);
                Error::LinkFailed(log)
            })?;
            self.linked = true;
            // uniform values do not survive a relink
            for pending in self.uniforms.values_mut() {
                pending.dirty = true;
            }
            crate::oogl_debug!(SOURCE, "Linked handle {}", id);
        }
        Ok(id)
    }

    /// Textures, uniforms and attributes; any of them may fail
    fn bind_inputs(&mut self, ctx: &Context, id: u32) -> Result<()> {
        let gl = ctx.gl();

        for (name, sampler) in self.samplers.iter_mut() {
            sampler.texture.set_unit(sampler.unit);
            sampler.texture.enable_object(ctx)?;
            self.bound_samplers.push(name.clone());
            match gl.uniform_location(id, name) {
                Some(location) => gl.set_uniform(location, &UniformValue::Int(sampler.unit as i32)),
                None => crate::oogl_debug!(SOURCE, "Sampler '{}' is not active, skipped", name),
            }
        }

        self.flush_uniforms(ctx, id);

        for (name, buffer) in self.attributes.iter_mut() {
            let Some(index) = gl.attrib_location(id, name) else {
                crate::oogl_debug!(SOURCE, "Attribute '{}' is not active, skipped", name);
                continue;
            };
            buffer.enable_object(ctx)?;
            gl.enable_vertex_attrib_array(index);
            self.enabled_arrays.push(index);
            gl.vertex_attrib_pointer(index, &buffer.attrib_pointer());
            buffer.disable_object(ctx);
        }

        ctx.check_error("program enable")
    }

    fn flush_uniforms(&mut self, ctx: &Context, id: u32) {
        let gl = ctx.gl();
        for (name, pending) in self.uniforms.iter_mut().filter(|(_, u)| u.dirty) {
            match gl.uniform_location(id, name) {
                Some(location) => gl.set_uniform(location, &pending.value),
                None => crate::oogl_debug!(SOURCE, "Uniform '{}' is not active, skipped", name),
            }
            pending.dirty = false;
        }
    }
}

impl GlObject for ShaderProgram {
    fn raw_handle(&self) -> &Handle {
        &self.handle
    }

    fn raw_handle_mut(&mut self) -> &mut Handle {
        &mut self.handle
    }

    fn enable_object(&mut self, ctx: &Context) -> Result<()> {
        let id = self.build(ctx)?;

        ctx.gl().use_program(id);
        self.in_use = true;
        for &capability in &self.capabilities {
            ctx.push_enable(capability);
            self.pushed_capabilities.push(capability);
        }

        if let Err(err) = self.bind_inputs(ctx, id) {
            self.disable_object(ctx);
            return Err(err);
        }
        Ok(())
    }

    fn disable_object(&mut self, ctx: &Context) {
        let gl = ctx.gl();
        for index in self.enabled_arrays.drain(..) {
            gl.disable_vertex_attrib_array(index);
        }
        for name in mem::take(&mut self.bound_samplers) {
            if let Some(sampler) = self.samplers.get_mut(&name) {
                sampler.texture.disable_object(ctx);
            }
        }
        for capability in self.pushed_capabilities.drain(..).rev() {
            ctx.pop_enable(capability);
        }
        gl.use_program(0);
        self.in_use = false;
    }

    fn delete_dependents(&mut self, ctx: &Context) {
        for buffer in self.attributes.values_mut() {
            buffer.delete(ctx);
        }
        for sampler in self.samplers.values_mut() {
            sampler.texture.delete(ctx);
        }
        self.vertex.delete(ctx);
        self.fragment.delete(ctx);
    }

    fn delete_object(&mut self, ctx: &Context, handle: u32) -> Result<()> {
        self.attached = None;
        self.linked = false;
        ctx.gl().delete_program(handle)?;
        ctx.check_error("glDeleteProgram")
    }
}

#[cfg(test)]
#[path = "program_tests.rs"]
mod tests;
