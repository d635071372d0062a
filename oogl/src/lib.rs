/*!
# oogl

Object-oriented wrappers around OpenGL objects.

Every wrapper (buffers, textures, shaders, programs) can be created and
filled with data without a GL context. Its GL object is created lazily the
first time it is enabled with a [`Context`], and released with an explicit
`delete`. Enabling is scoped: the object is disabled again when the guard
returned by [`GlObject::enable`] is dropped.

Capabilities toggled with glEnable/glDisable go through the context's
[`EnableRegistry`], which reference counts them so that nested users do not
turn a capability off under each other.

## Architecture

- **Gl**: backend trait; implemented for glow in `oogl_backend_glow`
- **Context**: one GL context, its backend, capability registry and config
- **GlObject**: lifecycle contract (lazy handle, scoped enable, best-effort delete)
- **VertexBuffer / ElementBuffer**: buffer objects with deferred uploads
- **Texture2D / Texture3D**: textures with deferred data and parameters
- **VertexShader / FragmentShader**: shader objects compiled on enable
- **ShaderProgram**: linked program with attributes, uniforms and samplers
*/

// Internal modules
mod error;
mod context;
mod enable_registry;
pub mod log;
pub mod gl;
pub mod objects;
pub(crate) mod utils;

// Error types
pub use error::{Error, Result};

// Context and capability tracking
pub use context::{CapabilityGuard, Config, Context, ContextId};
pub use enable_registry::EnableRegistry;

// Wrappers
pub use objects::*;

// Backend trait and GL enumerations
pub use gl::{
    Capability, Filter, Gl, PrimitiveMode, ShaderStage, TextureFormat, UniformValue, Wrap,
};

// Re-export math library at crate root
pub use glam;
