/// Vertex and fragment shaders
///
/// A shader keeps its GLSL source and compiles it the first time it is
/// enabled, and again after `set_source`. Enabling a shader has no binding
/// side effect, so disabling it does nothing.

use crate::context::Context;
use crate::error::{Error, Result};
use crate::gl::ShaderStage;
use crate::objects::{GlObject, Handle};

#[derive(Debug)]
struct ShaderObject {
    handle: Handle,
    stage: ShaderStage,
    source: String,
    compiled: bool,
}

impl ShaderObject {
    fn new(name: &'static str, stage: ShaderStage, source: String) -> Self {
        Self {
            handle: Handle::new(name),
            stage,
            source,
            compiled: false,
        }
    }

    fn set_source(&mut self, source: String) {
        self.source = source;
        self.compiled = false;
    }

    /// Compile if needed; `true` when the shader was (re)compiled by this call
    fn compile(&mut self, ctx: &Context) -> Result<bool> {
        let stage = self.stage;
        let (id, created) = self.handle.get_or_create(ctx, |gl| gl.create_shader(stage))?;
        if created {
            self.compiled = false;
        }
        if self.compiled {
            return Ok(false);
        }

        ctx.gl().compile_shader(id, &self.source).map_err(|log| {
            crate::oogl_error!(self.handle.source(), "Compilation of handle {} failed:\n{}", id, log);
            Error::CompileFailed { stage, log }
        })?;
        self.compiled = true;
        crate::oogl_debug!(self.handle.source(), "Compiled handle {}", id);
        Ok(true)
    }

    fn delete(&mut self, ctx: &Context, handle: u32) -> Result<()> {
        self.compiled = false;
        ctx.gl().delete_shader(handle)?;
        ctx.check_error("glDeleteShader")
    }
}

macro_rules! shader_type {
    ($(#[$meta:meta])* $name:ident, $stage:expr, $source:literal) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            object: ShaderObject,
        }

        impl $name {
            pub fn new(source: impl Into<String>) -> Self {
                Self {
                    object: ShaderObject::new($source, $stage, source.into()),
                }
            }

            /// Replace the GLSL source; it is recompiled on the next enable
            pub fn set_source(&mut self, source: impl Into<String>) {
                self.object.set_source(source.into());
            }

            pub fn source(&self) -> &str {
                &self.object.source
            }

            pub fn stage(&self) -> ShaderStage {
                self.object.stage
            }

            pub fn is_compiled(&self) -> bool {
                self.object.compiled
            }

            pub(crate) fn compile(&mut self, ctx: &Context) -> Result<bool> {
                self.object.compile(ctx)
            }
        }

        impl GlObject for $name {
            fn raw_handle(&self) -> &Handle {
                &self.object.handle
            }

            fn raw_handle_mut(&mut self) -> &mut Handle {
                &mut self.object.handle
            }

            fn enable_object(&mut self, ctx: &Context) -> Result<()> {
                self.object.compile(ctx).map(|_| ())
            }

            fn disable_object(&mut self, _ctx: &Context) {}

            fn delete_object(&mut self, ctx: &Context, handle: u32) -> Result<()> {
                self.object.delete(ctx, handle)
            }
        }
    };
}

shader_type!(
    /// GLSL vertex shader
    VertexShader,
    ShaderStage::Vertex,
    "oogl::VertexShader"
);

shader_type!(
    /// GLSL fragment shader
    FragmentShader,
    ShaderStage::Fragment,
    "oogl::FragmentShader"
);

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
