/// Typed GL enumerations shared by the core wrappers and the backends
///
/// Each enum maps onto the raw GLenum value via `gl_enum()`, so backends that
/// speak raw GL (glow) can forward them unchanged.

use std::hash::{Hash, Hasher};

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

// ============================================================================
// Capabilities
// ============================================================================

/// Toggleable pipeline feature controlled by glEnable/glDisable
///
/// Equality and hashing go through `gl_enum()`, so `Other(0x0BE2)` and
/// `Blend` are the same capability.
#[derive(Debug, Clone, Copy)]
pub enum Capability {
    Blend,
    CullFace,
    DepthTest,
    Dither,
    Multisample,
    PolygonOffsetFill,
    ProgramPointSize,
    SampleAlphaToCoverage,
    ScissorTest,
    StencilTest,
    FramebufferSrgb,
    /// Any other GLenum accepted by glEnable
    Other(u32),
}

impl Capability {
    pub fn gl_enum(&self) -> u32 {
        match self {
            Capability::Blend => 0x0BE2,
            Capability::CullFace => 0x0B44,
            Capability::DepthTest => 0x0B71,
            Capability::Dither => 0x0BD0,
            Capability::Multisample => 0x809D,
            Capability::PolygonOffsetFill => 0x8037,
            Capability::ProgramPointSize => 0x8642,
            Capability::SampleAlphaToCoverage => 0x809E,
            Capability::ScissorTest => 0x0C11,
            Capability::StencilTest => 0x0B90,
            Capability::FramebufferSrgb => 0x8DB9,
            Capability::Other(value) => *value,
        }
    }
}

impl PartialEq for Capability {
    fn eq(&self, other: &Self) -> bool {
        self.gl_enum() == other.gl_enum()
    }
}

impl Eq for Capability {}

impl Hash for Capability {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.gl_enum().hash(state);
    }
}

// ============================================================================
// Buffers
// ============================================================================

/// Buffer binding target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    /// GL_ARRAY_BUFFER (vertex attributes)
    Array,
    /// GL_ELEMENT_ARRAY_BUFFER (indices)
    ElementArray,
}

impl BufferTarget {
    pub fn gl_enum(&self) -> u32 {
        match self {
            BufferTarget::Array => 0x8892,
            BufferTarget::ElementArray => 0x8893,
        }
    }
}

/// Buffer usage hint passed to glBufferData
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferUsage {
    #[default]
    StaticDraw,
    DynamicDraw,
    StreamDraw,
}

impl BufferUsage {
    pub fn gl_enum(&self) -> u32 {
        match self {
            BufferUsage::StaticDraw => 0x88E4,
            BufferUsage::DynamicDraw => 0x88E8,
            BufferUsage::StreamDraw => 0x88E0,
        }
    }
}

/// Index element type for glDrawElements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    U8,
    U16,
    U32,
}

impl IndexType {
    pub fn gl_enum(&self) -> u32 {
        match self {
            IndexType::U8 => 0x1401,
            IndexType::U16 => 0x1403,
            IndexType::U32 => 0x1405,
        }
    }

    pub fn size_bytes(&self) -> usize {
        match self {
            IndexType::U8 => 1,
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

/// Primitive topology for draw calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl PrimitiveMode {
    pub fn gl_enum(&self) -> u32 {
        match self {
            PrimitiveMode::Points => 0x0000,
            PrimitiveMode::Lines => 0x0001,
            PrimitiveMode::LineLoop => 0x0002,
            PrimitiveMode::LineStrip => 0x0003,
            PrimitiveMode::Triangles => 0x0004,
            PrimitiveMode::TriangleStrip => 0x0005,
            PrimitiveMode::TriangleFan => 0x0006,
        }
    }
}

/// Layout of one float vertex attribute, as passed to glVertexAttribPointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttribPointer {
    /// Components per vertex (1..=4)
    pub size: i32,
    /// Byte distance between consecutive vertices (0 = tightly packed)
    pub stride: i32,
    /// Byte offset of the first component
    pub offset: i32,
    pub normalized: bool,
}

// ============================================================================
// Textures
// ============================================================================

/// Texture binding target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureTarget {
    Texture2D,
    Texture3D,
}

impl TextureTarget {
    pub fn gl_enum(&self) -> u32 {
        match self {
            TextureTarget::Texture2D => 0x0DE1,
            TextureTarget::Texture3D => 0x806F,
        }
    }
}

/// Pixel format of texture data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    R8_UNORM,
    RG8_UNORM,
    RGB8_UNORM,
    RGBA8_UNORM,
    R32_FLOAT,
    RGBA32_FLOAT,
}

impl TextureFormat {
    /// Sized internal format passed to glTexImage
    pub fn internal_format(&self) -> u32 {
        match self {
            TextureFormat::R8_UNORM => 0x8229,
            TextureFormat::RG8_UNORM => 0x822B,
            TextureFormat::RGB8_UNORM => 0x8051,
            TextureFormat::RGBA8_UNORM => 0x8058,
            TextureFormat::R32_FLOAT => 0x822E,
            TextureFormat::RGBA32_FLOAT => 0x8814,
        }
    }

    /// Client pixel format
    pub fn pixel_format(&self) -> u32 {
        match self {
            TextureFormat::R8_UNORM | TextureFormat::R32_FLOAT => 0x1903,
            TextureFormat::RG8_UNORM => 0x8227,
            TextureFormat::RGB8_UNORM => 0x1907,
            TextureFormat::RGBA8_UNORM | TextureFormat::RGBA32_FLOAT => 0x1908,
        }
    }

    /// Client component type
    pub fn pixel_type(&self) -> u32 {
        match self {
            TextureFormat::R32_FLOAT | TextureFormat::RGBA32_FLOAT => 0x1406,
            _ => 0x1401,
        }
    }

    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            TextureFormat::R8_UNORM => 1,
            TextureFormat::RG8_UNORM => 2,
            TextureFormat::RGB8_UNORM => 3,
            TextureFormat::RGBA8_UNORM => 4,
            TextureFormat::R32_FLOAT => 4,
            TextureFormat::RGBA32_FLOAT => 16,
        }
    }
}

/// Texture sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Nearest,
    Linear,
}

impl Filter {
    pub fn gl_enum(&self) -> u32 {
        match self {
            Filter::Nearest => 0x2600,
            Filter::Linear => 0x2601,
        }
    }
}

/// Texture coordinate wrapping mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrap {
    Repeat,
    ClampToEdge,
    MirroredRepeat,
}

impl Wrap {
    pub fn gl_enum(&self) -> u32 {
        match self {
            Wrap::Repeat => 0x2901,
            Wrap::ClampToEdge => 0x812F,
            Wrap::MirroredRepeat => 0x8370,
        }
    }
}

/// A single glTexParameteri setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureParameter {
    MinFilter(Filter),
    MagFilter(Filter),
    WrapS(Wrap),
    WrapT(Wrap),
    WrapR(Wrap),
}

impl TextureParameter {
    /// (pname, value) pair for glTexParameteri
    pub fn gl_pair(&self) -> (u32, i32) {
        match self {
            TextureParameter::MinFilter(f) => (0x2801, f.gl_enum() as i32),
            TextureParameter::MagFilter(f) => (0x2800, f.gl_enum() as i32),
            TextureParameter::WrapS(w) => (0x2802, w.gl_enum() as i32),
            TextureParameter::WrapT(w) => (0x2803, w.gl_enum() as i32),
            TextureParameter::WrapR(w) => (0x8072, w.gl_enum() as i32),
        }
    }
}

/// Storage description for glTexImage2D / glTexImage3D
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    /// 1 for 2D textures
    pub depth: u32,
    pub format: TextureFormat,
}

impl TextureImage {
    /// Byte length of a full image, `None` if it does not fit in `usize`
    pub fn byte_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.depth as usize)?
            .checked_mul(self.format.bytes_per_pixel())
    }
}

// ============================================================================
// Shaders
// ============================================================================

/// Shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(&self) -> u32 {
        match self {
            ShaderStage::Vertex => 0x8B31,
            ShaderStage::Fragment => 0x8B30,
        }
    }
}

/// Value that can be written to a uniform location
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat3(Mat3),
    Mat4(Mat4),
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self { UniformValue::Float(v) }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self { UniformValue::Int(v) }
}

impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self { UniformValue::Vec2(v) }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self { UniformValue::Vec3(v) }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self { UniformValue::Vec4(v) }
}

impl From<Mat3> for UniformValue {
    fn from(v: Mat3) -> Self { UniformValue::Mat3(v) }
}

impl From<Mat4> for UniformValue {
    fn from(v: Mat4) -> Self { UniformValue::Mat4(v) }
}

impl From<[f32; 2]> for UniformValue {
    fn from(v: [f32; 2]) -> Self { UniformValue::Vec2(Vec2::from(v)) }
}

impl From<[f32; 3]> for UniformValue {
    fn from(v: [f32; 3]) -> Self { UniformValue::Vec3(Vec3::from(v)) }
}

impl From<[f32; 4]> for UniformValue {
    fn from(v: [f32; 4]) -> Self { UniformValue::Vec4(Vec4::from(v)) }
}

impl From<(f32, f32, f32)> for UniformValue {
    fn from((x, y, z): (f32, f32, f32)) -> Self { UniformValue::Vec3(Vec3::new(x, y, z)) }
}

impl From<(f32, f32, f32, f32)> for UniformValue {
    fn from((x, y, z, w): (f32, f32, f32, f32)) -> Self {
        UniformValue::Vec4(Vec4::new(x, y, z, w))
    }
}

// ============================================================================
// Errors
// ============================================================================

pub const GL_NO_ERROR: u32 = 0;
pub const GL_OUT_OF_MEMORY: u32 = 0x0505;

/// Human readable name of a glGetError code
pub fn gl_error_name(code: u32) -> &'static str {
    match code {
        0x0000 => "GL_NO_ERROR",
        0x0500 => "GL_INVALID_ENUM",
        0x0501 => "GL_INVALID_VALUE",
        0x0502 => "GL_INVALID_OPERATION",
        0x0503 => "GL_STACK_OVERFLOW",
        0x0504 => "GL_STACK_UNDERFLOW",
        0x0505 => "GL_OUT_OF_MEMORY",
        0x0506 => "GL_INVALID_FRAMEBUFFER_OPERATION",
        _ => "unknown GL error",
    }
}
