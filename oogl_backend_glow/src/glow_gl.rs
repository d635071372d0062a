/// glow implementation of the oogl `Gl` trait
///
/// Native (desktop / GLES) targets only: object names are converted to and
/// from glow's `Native*` handle types.

use std::num::NonZeroU32;
use glow::HasContext;
use oogl::gl::{
    AttribPointer, BufferTarget, BufferUsage, Capability, Gl, IndexType, PrimitiveMode,
    ShaderStage, TextureImage, TextureParameter, TextureTarget, UniformValue,
};
use oogl::{Error, Result};

const SOURCE: &str = "oogl::glow";

/// `Gl` backend on top of a `glow::Context`
///
/// The context passed to `new` must be current on the calling thread for
/// every call made through this backend.
pub struct GlowGl {
    gl: glow::Context,
    vertex_array: Option<glow::VertexArray>,
}

impl GlowGl {
    /// Wrap a glow context
    ///
    /// Binds a default vertex array object (required by core profiles) and
    /// sets tightly packed pixel unpacking for texture uploads.
    pub fn new(gl: glow::Context) -> Result<Self> {
        let vertex_array = unsafe {
            let vertex_array = gl.create_vertex_array().map_err(|e| {
                oogl::oogl_error!(SOURCE, "Failed to create default vertex array: {}", e);
                Error::BackendError(format!("Failed to create default vertex array: {}", e))
            })?;
            gl.bind_vertex_array(Some(vertex_array));
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            vertex_array
        };

        let version = gl.version();
        oogl::oogl_info!(
            SOURCE,
            "glow backend ready (GL {}.{}{})",
            version.major,
            version.minor,
            if version.is_embedded { " ES" } else { "" }
        );

        Ok(Self {
            gl,
            vertex_array: Some(vertex_array),
        })
    }

    /// The wrapped glow context, for calls oogl does not cover
    pub fn context(&self) -> &glow::Context {
        &self.gl
    }

    /// Release the default vertex array and give the glow context back
    pub fn into_context(mut self) -> glow::Context {
        if let Some(vertex_array) = self.vertex_array.take() {
            unsafe {
                self.gl.bind_vertex_array(None);
                self.gl.delete_vertex_array(vertex_array);
            }
        }
        self.gl
    }
}

// ===== NAME CONVERSION =====

fn non_zero(name: u32, kind: &str) -> Result<NonZeroU32> {
    NonZeroU32::new(name).ok_or_else(|| Error::InvalidResource(format!("{} name 0 is not an object", kind)))
}

fn creation_error(kind: &str, message: String) -> Error {
    oogl::oogl_error!(SOURCE, "Failed to create {}: {}", kind, message);
    Error::BackendError(format!("Failed to create {}: {}", kind, message))
}

/// Map the error flag read right after a glDelete* call
fn deletion_result(kind: &str, name: u32, error: u32) -> Result<()> {
    if error == glow::NO_ERROR {
        return Ok(());
    }
    Err(Error::BackendError(format!(
        "deleting {} {} raised {} (0x{:04X})",
        kind,
        name,
        oogl::gl::gl_error_name(error),
        error
    )))
}

fn native_buffer(name: u32) -> Option<glow::Buffer> {
    NonZeroU32::new(name).map(glow::NativeBuffer)
}

fn native_texture(name: u32) -> Option<glow::Texture> {
    NonZeroU32::new(name).map(glow::NativeTexture)
}

fn native_shader(name: u32) -> Option<glow::Shader> {
    NonZeroU32::new(name).map(glow::NativeShader)
}

fn native_program(name: u32) -> Option<glow::Program> {
    NonZeroU32::new(name).map(glow::NativeProgram)
}

impl Gl for GlowGl {
    // ===== Capabilities =====

    fn enable(&self, capability: Capability) {
        unsafe { self.gl.enable(capability.gl_enum()) }
    }

    fn disable(&self, capability: Capability) {
        unsafe { self.gl.disable(capability.gl_enum()) }
    }

    fn get_error(&self) -> u32 {
        unsafe { self.gl.get_error() }
    }

    fn extensions(&self) -> Vec<String> {
        self.gl.supported_extensions().iter().cloned().collect()
    }

    // ===== Buffers =====

    fn create_buffer(&self) -> Result<u32> {
        unsafe { self.gl.create_buffer() }
            .map(|buffer| buffer.0.get())
            .map_err(|e| creation_error("buffer", e))
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: u32) {
        unsafe { self.gl.bind_buffer(target.gl_enum(), native_buffer(buffer)) }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        unsafe { self.gl.buffer_data_u8_slice(target.gl_enum(), data, usage.gl_enum()) }
    }

    fn buffer_sub_data(&self, target: BufferTarget, offset: usize, data: &[u8]) {
        unsafe { self.gl.buffer_sub_data_u8_slice(target.gl_enum(), offset as i32, data) }
    }

    fn delete_buffer(&self, buffer: u32) -> Result<()> {
        let name = non_zero(buffer, "buffer")?;
        let error = unsafe {
            self.gl.delete_buffer(glow::NativeBuffer(name));
            self.gl.get_error()
        };
        deletion_result("buffer", buffer, error)
    }

    // ===== Textures =====

    fn create_texture(&self) -> Result<u32> {
        unsafe { self.gl.create_texture() }
            .map(|texture| texture.0.get())
            .map_err(|e| creation_error("texture", e))
    }

    fn bind_texture(&self, target: TextureTarget, texture: u32) {
        unsafe { self.gl.bind_texture(target.gl_enum(), native_texture(texture)) }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) }
    }

    fn tex_parameter(&self, target: TextureTarget, parameter: TextureParameter) {
        let (name, value) = parameter.gl_pair();
        unsafe { self.gl.tex_parameter_i32(target.gl_enum(), name, value) }
    }

    fn tex_image_2d(&self, image: &TextureImage, data: Option<&[u8]>) {
        unsafe {
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                image.format.internal_format() as i32,
                image.width as i32,
                image.height as i32,
                0,
                image.format.pixel_format(),
                image.format.pixel_type(),
                data,
            )
        }
    }

    fn tex_image_3d(&self, image: &TextureImage, data: Option<&[u8]>) {
        unsafe {
            self.gl.tex_image_3d(
                glow::TEXTURE_3D,
                0,
                image.format.internal_format() as i32,
                image.width as i32,
                image.height as i32,
                image.depth as i32,
                0,
                image.format.pixel_format(),
                image.format.pixel_type(),
                data,
            )
        }
    }

    fn delete_texture(&self, texture: u32) -> Result<()> {
        let name = non_zero(texture, "texture")?;
        let error = unsafe {
            self.gl.delete_texture(glow::NativeTexture(name));
            self.gl.get_error()
        };
        deletion_result("texture", texture, error)
    }

    // ===== Shaders =====

    fn create_shader(&self, stage: ShaderStage) -> Result<u32> {
        unsafe { self.gl.create_shader(stage.gl_enum()) }
            .map(|shader| shader.0.get())
            .map_err(|e| creation_error("shader", e))
    }

    fn compile_shader(&self, shader: u32, source: &str) -> std::result::Result<(), String> {
        let shader = native_shader(shader).ok_or_else(|| "shader name 0".to_string())?;
        unsafe {
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if self.gl.get_shader_compile_status(shader) {
                Ok(())
            } else {
                Err(self.gl.get_shader_info_log(shader))
            }
        }
    }

    fn delete_shader(&self, shader: u32) -> Result<()> {
        let name = non_zero(shader, "shader")?;
        let error = unsafe {
            self.gl.delete_shader(glow::NativeShader(name));
            self.gl.get_error()
        };
        deletion_result("shader", shader, error)
    }

    // ===== Programs =====

    fn create_program(&self) -> Result<u32> {
        unsafe { self.gl.create_program() }
            .map(|program| program.0.get())
            .map_err(|e| creation_error("program", e))
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        if let (Some(program), Some(shader)) = (native_program(program), native_shader(shader)) {
            unsafe { self.gl.attach_shader(program, shader) }
        }
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        if let (Some(program), Some(shader)) = (native_program(program), native_shader(shader)) {
            unsafe { self.gl.detach_shader(program, shader) }
        }
    }

    fn link_program(&self, program: u32) -> std::result::Result<(), String> {
        let program = native_program(program).ok_or_else(|| "program name 0".to_string())?;
        unsafe {
            self.gl.link_program(program);
            if self.gl.get_program_link_status(program) {
                Ok(())
            } else {
                Err(self.gl.get_program_info_log(program))
            }
        }
    }

    fn use_program(&self, program: u32) {
        unsafe { self.gl.use_program(native_program(program)) }
    }

    fn delete_program(&self, program: u32) -> Result<()> {
        let name = non_zero(program, "program")?;
        let error = unsafe {
            self.gl.delete_program(glow::NativeProgram(name));
            self.gl.get_error()
        };
        deletion_result("program", program, error)
    }

    fn attrib_location(&self, program: u32, name: &str) -> Option<u32> {
        let program = native_program(program)?;
        unsafe { self.gl.get_attrib_location(program, name) }
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<u32> {
        let program = native_program(program)?;
        unsafe { self.gl.get_uniform_location(program, name) }.map(|location| location.0)
    }

    fn set_uniform(&self, location: u32, value: &UniformValue) {
        let location = glow::NativeUniformLocation(location);
        let location = Some(&location);
        unsafe {
            match value {
                UniformValue::Float(v) => self.gl.uniform_1_f32(location, *v),
                UniformValue::Int(v) => self.gl.uniform_1_i32(location, *v),
                UniformValue::Vec2(v) => self.gl.uniform_2_f32(location, v.x, v.y),
                UniformValue::Vec3(v) => self.gl.uniform_3_f32(location, v.x, v.y, v.z),
                UniformValue::Vec4(v) => self.gl.uniform_4_f32(location, v.x, v.y, v.z, v.w),
                UniformValue::Mat3(m) => {
                    self.gl.uniform_matrix_3_f32_slice(location, false, &m.to_cols_array())
                }
                UniformValue::Mat4(m) => {
                    self.gl.uniform_matrix_4_f32_slice(location, false, &m.to_cols_array())
                }
            }
        }
    }

    fn vertex_attrib_pointer(&self, index: u32, pointer: &AttribPointer) {
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                index,
                pointer.size,
                glow::FLOAT,
                pointer.normalized,
                pointer.stride,
                pointer.offset,
            )
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.disable_vertex_attrib_array(index) }
    }

    // ===== Drawing =====

    fn draw_arrays(&self, mode: PrimitiveMode, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(mode.gl_enum(), first, count) }
    }

    fn draw_elements(&self, mode: PrimitiveMode, count: i32, index_type: IndexType, offset: i32) {
        unsafe { self.gl.draw_elements(mode.gl_enum(), count, index_type.gl_enum(), offset) }
    }
}

#[cfg(test)]
#[path = "glow_gl_tests.rs"]
mod tests;
