/// Context - one GL context's backend and bookkeeping
///
/// A `Context` owns the `Gl` backend and the `EnableRegistry` for that GL
/// context. Holding a `&Context` is what entitles code to touch GPU state:
/// wrappers are created and configured without one, and only allocate their
/// GL objects when an operation is handed a context.
///
/// `Context` is single-threaded (`!Sync`), like the GL context it stands for.

use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::enable_registry::EnableRegistry;
use crate::error::{Error, Result};
use crate::gl::{gl_error_name, Capability, Gl, PrimitiveMode, GL_NO_ERROR, GL_OUT_OF_MEMORY};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a `Context`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl ContextId {
    fn next() -> Self {
        ContextId(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[cfg(test)]
    pub(crate) fn from_raw(raw: u64) -> Self {
        ContextId(raw)
    }

    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "context#{}", self.0)
    }
}

/// Context configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Query glGetError after allocations, uploads and draws
    pub check_errors: bool,
    /// Log a warning when a wrapper is dropped while still owning a GL object
    pub warn_on_leak: bool,
    /// Name used in log messages
    pub label: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            check_errors: cfg!(debug_assertions),
            warn_on_leak: true,
            label: "oogl".to_string(),
        }
    }
}

/// A GL context as seen by the wrappers
pub struct Context {
    id: ContextId,
    config: Config,
    gl: Box<dyn Gl>,
    registry: RefCell<EnableRegistry>,
}

impl Context {
    /// Wrap a backend with the default configuration
    pub fn new<G: Gl + 'static>(gl: G) -> Self {
        Self::with_config(gl, Config::default())
    }

    pub fn with_config<G: Gl + 'static>(gl: G, config: Config) -> Self {
        let id = ContextId::next();
        crate::oogl_info!("oogl::Context", "{} '{}' created", id, config.label);
        Self {
            id,
            config,
            gl: Box::new(gl),
            registry: RefCell::new(EnableRegistry::new()),
        }
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The backend, for GL calls the wrappers do not cover
    pub fn gl(&self) -> &dyn Gl {
        self.gl.as_ref()
    }

    // ===== CAPABILITIES =====

    /// Like glEnable, but reference counted (see `EnableRegistry::increment`)
    pub fn push_enable(&self, capability: Capability) {
        self.registry.borrow_mut().increment(self.gl.as_ref(), capability);
    }

    /// Like glDisable, but reference counted (see `EnableRegistry::decrement`)
    pub fn pop_enable(&self, capability: Capability) {
        self.registry.borrow_mut().decrement(self.gl.as_ref(), capability);
    }

    /// `push_enable` now, `pop_enable` when the guard is dropped
    pub fn scoped_enable(&self, capability: Capability) -> CapabilityGuard<'_> {
        self.push_enable(capability);
        CapabilityGuard { ctx: self, capability }
    }

    pub fn enable_count(&self, capability: Capability) -> u32 {
        self.registry.borrow().count(capability)
    }

    // ===== QUERIES =====

    /// Whether the backend reports the named extension
    pub fn ext_available(&self, extension_name: &str) -> bool {
        self.gl.extensions().iter().any(|ext| ext == extension_name)
    }

    /// Turn a pending GL error into an `Error`
    ///
    /// Does nothing unless `Config::check_errors` is set.
    pub fn check_error(&self, operation: &str) -> Result<()> {
        if !self.config.check_errors {
            return Ok(());
        }
        match self.gl.get_error() {
            GL_NO_ERROR => Ok(()),
            GL_OUT_OF_MEMORY => {
                crate::oogl_error!("oogl::Context", "{}: GL_OUT_OF_MEMORY", operation);
                Err(Error::OutOfMemory)
            }
            code => {
                let message = format!(
                    "{} failed with 0x{:04X} ({})",
                    operation,
                    code,
                    gl_error_name(code)
                );
                crate::oogl_error!("oogl::Context", "{}", message);
                Err(Error::BackendError(message))
            }
        }
    }

    // ===== DRAWING =====

    /// glDrawArrays with the currently enabled program and attributes
    pub fn draw_arrays(&self, mode: PrimitiveMode, first: i32, count: i32) -> Result<()> {
        self.gl.draw_arrays(mode, first, count);
        self.check_error("glDrawArrays")
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("id", &self.id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Keeps a capability pushed for its lifetime
pub struct CapabilityGuard<'a> {
    ctx: &'a Context,
    capability: Capability,
}

impl Drop for CapabilityGuard<'_> {
    fn drop(&mut self) {
        self.ctx.pop_enable(self.capability);
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
