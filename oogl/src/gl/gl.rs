/// Gl trait - the backend interface to the underlying graphics API

use crate::error::Result;
use crate::gl::{
    AttribPointer, BufferTarget, BufferUsage, Capability, IndexType, PrimitiveMode,
    ShaderStage, TextureImage, TextureParameter, TextureTarget, UniformValue,
};

/// Backend trait over the raw GL object model
///
/// Implemented by backend-specific types (e.g., `GlowGl`). Object names are
/// plain `u32`s, with 0 meaning "no object" (binding 0 unbinds). Every call
/// assumes the GL context the backend was created for is current.
///
/// Creation methods report failure as `Err`. Deletion methods return `Result`
/// so that callers can decide to swallow failures; compile and link report
/// the driver's info log as the error string.
pub trait Gl {
    // ===== Capabilities =====

    /// glEnable
    fn enable(&self, capability: Capability);

    /// glDisable
    fn disable(&self, capability: Capability);

    /// glGetError (0 = no error)
    fn get_error(&self) -> u32;

    /// Names of the supported extensions
    fn extensions(&self) -> Vec<String>;

    // ===== Buffers =====

    fn create_buffer(&self) -> Result<u32>;

    fn bind_buffer(&self, target: BufferTarget, buffer: u32);

    /// Allocate storage and upload `data` to the bound buffer
    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage);

    /// Overwrite part of the bound buffer's storage
    fn buffer_sub_data(&self, target: BufferTarget, offset: usize, data: &[u8]);

    fn delete_buffer(&self, buffer: u32) -> Result<()>;

    // ===== Textures =====

    fn create_texture(&self) -> Result<u32>;

    fn bind_texture(&self, target: TextureTarget, texture: u32);

    /// Select the active texture unit (0-based)
    fn active_texture(&self, unit: u32);

    fn tex_parameter(&self, target: TextureTarget, parameter: TextureParameter);

    /// Define the storage of the bound 2D texture; `None` leaves it uninitialized
    fn tex_image_2d(&self, image: &TextureImage, data: Option<&[u8]>);

    /// Define the storage of the bound 3D texture; `None` leaves it uninitialized
    fn tex_image_3d(&self, image: &TextureImage, data: Option<&[u8]>);

    fn delete_texture(&self, texture: u32) -> Result<()>;

    // ===== Shaders =====

    fn create_shader(&self, stage: ShaderStage) -> Result<u32>;

    /// Set the source and compile; `Err` carries the info log
    fn compile_shader(&self, shader: u32, source: &str) -> std::result::Result<(), String>;

    fn delete_shader(&self, shader: u32) -> Result<()>;

    // ===== Programs =====

    fn create_program(&self) -> Result<u32>;

    fn attach_shader(&self, program: u32, shader: u32);

    fn detach_shader(&self, program: u32, shader: u32);

    /// Link; `Err` carries the info log
    fn link_program(&self, program: u32) -> std::result::Result<(), String>;

    fn use_program(&self, program: u32);

    fn delete_program(&self, program: u32) -> Result<()>;

    /// Location of an active attribute, `None` if inactive or unknown
    fn attrib_location(&self, program: u32, name: &str) -> Option<u32>;

    /// Location of an active uniform, `None` if inactive or unknown
    fn uniform_location(&self, program: u32, name: &str) -> Option<u32>;

    /// Write a uniform of the program currently in use
    fn set_uniform(&self, location: u32, value: &UniformValue);

    /// glVertexAttribPointer for float data of the bound GL_ARRAY_BUFFER
    fn vertex_attrib_pointer(&self, index: u32, pointer: &AttribPointer);

    fn enable_vertex_attrib_array(&self, index: u32);

    fn disable_vertex_attrib_array(&self, index: u32);

    // ===== Drawing =====

    fn draw_arrays(&self, mode: PrimitiveMode, first: i32, count: i32);

    /// Draw `count` indices from the bound GL_ELEMENT_ARRAY_BUFFER
    fn draw_elements(&self, mode: PrimitiveMode, count: i32, index_type: IndexType, offset: i32);
}
