//! Error types for oogl
//!
//! This module defines the error types returned by context, allocation,
//! compilation and upload operations.

use std::fmt;
use crate::context::ContextId;
use crate::gl::ShaderStage;

/// Result type for oogl operations
pub type Result<T> = std::result::Result<T, Error>;

/// oogl errors
#[derive(Debug, Clone)]
pub enum Error {
    /// A backend primitive failed or GL reported an error
    BackendError(String),

    /// GL reported GL_OUT_OF_MEMORY
    OutOfMemory,

    /// Invalid wrapper configuration or usage (sizes, names, missing data)
    InvalidResource(String),

    /// Shader compilation failed, with the driver's info log
    CompileFailed {
        stage: ShaderStage,
        log: String,
    },

    /// Program link failed, with the driver's info log
    LinkFailed(String),

    /// A handle was used with a context other than the one that created it
    ContextMismatch {
        expected: ContextId,
        found: ContextId,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::CompileFailed { stage, log } => {
                write!(f, "{:?} shader compilation failed: {}", stage, log)
            }
            Error::LinkFailed(log) => write!(f, "Program link failed: {}", log),
            Error::ContextMismatch { expected, found } => write!(
                f,
                "Context mismatch: handle belongs to {}, used with {}",
                expected, found
            ),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
