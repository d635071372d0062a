/// GL object wrappers - lifecycle trait and the concrete wrappers

// Module declarations
pub mod gl_object;
pub mod buffer;
pub mod texture;
pub mod shader;
pub mod program;

// Re-export everything from gl_object.rs
pub use gl_object::*;

// Re-export from other modules
pub use buffer::*;
pub use texture::*;
pub use shader::*;
pub use program::*;
