/// GL backend module - backend trait and typed GL enumerations

// Module declarations
pub mod gl;
pub mod types;

// Re-export everything from gl.rs
pub use gl::*;

// Re-export from other modules
pub use types::*;

// Recording mock backend for tests (no GL context required)
#[cfg(test)]
pub mod mock_gl;
