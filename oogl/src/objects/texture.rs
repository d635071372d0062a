/// 2D and 3D textures
///
/// Shape and format are fixed at construction. Pixel data and sampling
/// parameters can be set at any time; they are applied the next time the
/// texture is enabled. The CPU-side copy of the pixels is kept, so a
/// deleted texture comes back with its contents when enabled again.

use std::mem;
use bytemuck::Pod;

use crate::context::Context;
use crate::error::Result;
use crate::gl::{Filter, TextureFormat, TextureImage, TextureParameter, TextureTarget, Wrap};
use crate::objects::{GlObject, Handle};

// ============================================================================
// Shared storage
// ============================================================================

#[derive(Debug)]
struct TextureStorage {
    handle: Handle,
    target: TextureTarget,
    image: TextureImage,
    data: Option<Vec<u8>>,
    data_dirty: bool,
    parameters: Vec<TextureParameter>,
    parameters_dirty: bool,
    unit: u32,
}

impl TextureStorage {
    fn new(source: &'static str, target: TextureTarget, image: TextureImage) -> Self {
        // GL's default min filter expects mipmaps, which are never generated here
        let mut parameters = vec![
            TextureParameter::MinFilter(Filter::Linear),
            TextureParameter::MagFilter(Filter::Linear),
            TextureParameter::WrapS(Wrap::ClampToEdge),
            TextureParameter::WrapT(Wrap::ClampToEdge),
        ];
        if target == TextureTarget::Texture3D {
            parameters.push(TextureParameter::WrapR(Wrap::ClampToEdge));
        }
        Self {
            handle: Handle::new(source),
            target,
            image,
            data: None,
            data_dirty: true,
            parameters,
            parameters_dirty: true,
            unit: 0,
        }
    }

    fn set_data(&mut self, bytes: &[u8]) -> Result<()> {
        let Some(expected) = self.image.byte_len() else {
            crate::oogl_bail!(
                self.handle.source(),
                "texture of {}x{}x{} {:?} is too large to hold in memory",
                self.image.width,
                self.image.height,
                self.image.depth,
                self.image.format
            );
        };
        if bytes.len() != expected {
            crate::oogl_bail!(
                self.handle.source(),
                "texture data has {} bytes, expected {} for {}x{}x{} {:?}",
                bytes.len(),
                expected,
                self.image.width,
                self.image.height,
                self.image.depth,
                self.image.format
            );
        }
        self.data = Some(bytes.to_vec());
        self.data_dirty = true;
        Ok(())
    }

    fn set_parameter(&mut self, parameter: TextureParameter) {
        let kind = mem::discriminant(&parameter);
        match self.parameters.iter_mut().find(|p| mem::discriminant(*p) == kind) {
            Some(existing) => *existing = parameter,
            None => self.parameters.push(parameter),
        }
        self.parameters_dirty = true;
    }

    fn parameter(&self, pred: impl Fn(&TextureParameter) -> bool) -> Option<TextureParameter> {
        self.parameters.iter().copied().find(|p| pred(p))
    }

    fn bind(&mut self, ctx: &Context) -> Result<()> {
        let (id, created) = self.handle.get_or_create(ctx, |gl| gl.create_texture())?;
        if created {
            self.data_dirty = true;
            self.parameters_dirty = true;
        }

        let gl = ctx.gl();
        gl.active_texture(self.unit);
        gl.bind_texture(self.target, id);

        if self.parameters_dirty {
            for parameter in &self.parameters {
                gl.tex_parameter(self.target, *parameter);
            }
            self.parameters_dirty = false;
        }

        if self.data_dirty {
            crate::oogl_trace!(
                self.handle.source(),
                "Uploading {}x{}x{} {:?} to handle {} (data: {})",
                self.image.width,
                self.image.height,
                self.image.depth,
                self.image.format,
                id,
                self.data.is_some()
            );
            let data = self.data.as_deref();
            match self.target {
                TextureTarget::Texture2D => gl.tex_image_2d(&self.image, data),
                TextureTarget::Texture3D => gl.tex_image_3d(&self.image, data),
            }
            self.data_dirty = false;
        }

        if let Err(err) = ctx.check_error("texture upload") {
            self.data_dirty = true;
            self.parameters_dirty = true;
            gl.bind_texture(self.target, 0);
            return Err(err);
        }
        Ok(())
    }

    fn unbind(&self, ctx: &Context) {
        let gl = ctx.gl();
        gl.active_texture(self.unit);
        gl.bind_texture(self.target, 0);
    }

    fn delete(&mut self, ctx: &Context, handle: u32) -> Result<()> {
        ctx.gl().delete_texture(handle)?;
        ctx.check_error("glDeleteTextures")
    }
}

// ============================================================================
// Texture2D
// ============================================================================

/// Two-dimensional texture (GL_TEXTURE_2D)
#[derive(Debug)]
pub struct Texture2D {
    storage: TextureStorage,
}

impl Texture2D {
    /// Texture with uninitialized storage
    pub fn new(width: u32, height: u32, format: TextureFormat) -> Self {
        let image = TextureImage { width, height, depth: 1, format };
        Self {
            storage: TextureStorage::new("oogl::Texture2D", TextureTarget::Texture2D, image),
        }
    }

    /// Texture initialized with `pixels` (row-major, tightly packed)
    pub fn from_data<T: Pod>(width: u32, height: u32, format: TextureFormat, pixels: &[T]) -> Result<Self> {
        let mut texture = Self::new(width, height, format);
        texture.set_data(pixels)?;
        Ok(texture)
    }

    /// Replace the pixels; the length must match width × height × bytes per pixel
    pub fn set_data<T: Pod>(&mut self, pixels: &[T]) -> Result<()> {
        self.storage.set_data(bytemuck::cast_slice(pixels))
    }

    pub fn set_filter(&mut self, min: Filter, mag: Filter) {
        self.storage.set_parameter(TextureParameter::MinFilter(min));
        self.storage.set_parameter(TextureParameter::MagFilter(mag));
    }

    pub fn set_wrapping(&mut self, s: Wrap, t: Wrap) {
        self.storage.set_parameter(TextureParameter::WrapS(s));
        self.storage.set_parameter(TextureParameter::WrapT(t));
    }

    pub fn width(&self) -> u32 {
        self.storage.image.width
    }

    pub fn height(&self) -> u32 {
        self.storage.image.height
    }

    pub fn format(&self) -> TextureFormat {
        self.storage.image.format
    }
}

// ============================================================================
// Texture3D
// ============================================================================

/// Three-dimensional texture (GL_TEXTURE_3D)
#[derive(Debug)]
pub struct Texture3D {
    storage: TextureStorage,
}

impl Texture3D {
    pub fn new(width: u32, height: u32, depth: u32, format: TextureFormat) -> Self {
        let image = TextureImage { width, height, depth, format };
        Self {
            storage: TextureStorage::new("oogl::Texture3D", TextureTarget::Texture3D, image),
        }
    }

    pub fn from_data<T: Pod>(
        width: u32,
        height: u32,
        depth: u32,
        format: TextureFormat,
        voxels: &[T],
    ) -> Result<Self> {
        let mut texture = Self::new(width, height, depth, format);
        texture.set_data(voxels)?;
        Ok(texture)
    }

    /// Replace the voxels; the length must match width × height × depth × bytes per pixel
    pub fn set_data<T: Pod>(&mut self, voxels: &[T]) -> Result<()> {
        self.storage.set_data(bytemuck::cast_slice(voxels))
    }

    pub fn set_filter(&mut self, min: Filter, mag: Filter) {
        self.storage.set_parameter(TextureParameter::MinFilter(min));
        self.storage.set_parameter(TextureParameter::MagFilter(mag));
    }

    pub fn set_wrapping(&mut self, s: Wrap, t: Wrap, r: Wrap) {
        self.storage.set_parameter(TextureParameter::WrapS(s));
        self.storage.set_parameter(TextureParameter::WrapT(t));
        self.storage.set_parameter(TextureParameter::WrapR(r));
    }

    pub fn width(&self) -> u32 {
        self.storage.image.width
    }

    pub fn height(&self) -> u32 {
        self.storage.image.height
    }

    pub fn depth(&self) -> u32 {
        self.storage.image.depth
    }

    pub fn format(&self) -> TextureFormat {
        self.storage.image.format
    }
}

// ============================================================================
// Texture
// ============================================================================

/// Either kind of texture, as attached to a `ShaderProgram` sampler
#[derive(Debug)]
pub enum Texture {
    Texture2D(Texture2D),
    Texture3D(Texture3D),
}

impl From<Texture2D> for Texture {
    fn from(texture: Texture2D) -> Self {
        Texture::Texture2D(texture)
    }
}

impl From<Texture3D> for Texture {
    fn from(texture: Texture3D) -> Self {
        Texture::Texture3D(texture)
    }
}

impl Texture {
    fn storage(&self) -> &TextureStorage {
        match self {
            Texture::Texture2D(t) => &t.storage,
            Texture::Texture3D(t) => &t.storage,
        }
    }

    fn storage_mut(&mut self) -> &mut TextureStorage {
        match self {
            Texture::Texture2D(t) => &mut t.storage,
            Texture::Texture3D(t) => &mut t.storage,
        }
    }

    pub fn target(&self) -> TextureTarget {
        self.storage().target
    }
}

// ============================================================================
// Common accessors and GlObject
// ============================================================================

macro_rules! texture_common {
    ($ty:ty, |$this:ident| $storage:expr, |$this_mut:ident| $storage_mut:expr) => {
        impl $ty {
            /// Texture unit the texture binds to (0-based)
            pub fn unit(&self) -> u32 {
                let $this = self;
                $storage.unit
            }

            pub fn set_unit(&mut self, unit: u32) {
                let $this_mut = self;
                $storage_mut.unit = unit;
            }

            /// Whether pixels or parameters are waiting for the next enable
            pub fn has_pending_upload(&self) -> bool {
                let $this = self;
                let storage = $storage;
                storage.data_dirty || storage.parameters_dirty
            }

            /// Current value of the min filter
            pub fn min_filter(&self) -> Option<Filter> {
                let $this = self;
                match $storage.parameter(|p| matches!(p, TextureParameter::MinFilter(_))) {
                    Some(TextureParameter::MinFilter(filter)) => Some(filter),
                    _ => None,
                }
            }
        }

        impl GlObject for $ty {
            fn raw_handle(&self) -> &Handle {
                let $this = self;
                &$storage.handle
            }

            fn raw_handle_mut(&mut self) -> &mut Handle {
                let $this_mut = self;
                &mut $storage_mut.handle
            }

            fn enable_object(&mut self, ctx: &Context) -> Result<()> {
                let $this_mut = self;
                $storage_mut.bind(ctx)
            }

            fn disable_object(&mut self, ctx: &Context) {
                let $this = self;
                $storage.unbind(ctx);
            }

            fn delete_object(&mut self, ctx: &Context, handle: u32) -> Result<()> {
                let $this_mut = self;
                $storage_mut.delete(ctx, handle)
            }
        }
    };
}

texture_common!(Texture2D, |t| &t.storage, |t| &mut t.storage);
texture_common!(Texture3D, |t| &t.storage, |t| &mut t.storage);
texture_common!(Texture, |t| t.storage(), |t| t.storage_mut());

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
