/// GlObject trait - lifecycle shared by every GL object wrapper
///
/// Every wrapper applies deferred (lazy) allocation: it can be created and
/// given data without any GL context, and only creates its GL object the
/// first time it is enabled with a `Context`. The lifecycle is
///
/// ```text
/// Unallocated (handle 0) --enable--> Allocated (handle > 0) --delete--> Deleted (handle 0)
/// ```
///
/// Enabling is scoped: `enable` returns an `EnableGuard` that runs the
/// disable hook when dropped, on every exit path including `?` and panics.
///
/// Wrappers never touch GL from `Drop` (there may be no current context).
/// GL objects are released with an explicit `delete`; dropping a wrapper
/// that still owns one only logs a warning.

use std::ops::{Deref, DerefMut};

use crate::context::{Context, ContextId};
use crate::error::{Error, Result};
use crate::gl::Gl;

// ============================================================================
// Handle
// ============================================================================

/// Name of one GL object, owned exclusively by one wrapper
#[derive(Debug)]
pub struct Handle {
    id: u32,
    context: Option<ContextId>,
    source: &'static str,
    warn_on_leak: bool,
}

impl Handle {
    /// An unallocated handle; `source` names the owner in log messages
    pub fn new(source: &'static str) -> Self {
        Self {
            id: 0,
            context: None,
            source,
            warn_on_leak: true,
        }
    }

    /// GL object name, 0 when not allocated
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_allocated(&self) -> bool {
        self.id > 0
    }

    /// Context that created the object, if allocated
    pub fn context(&self) -> Option<ContextId> {
        self.context
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    /// Fail with `ContextMismatch` if the object belongs to another context
    pub fn check_context(&self, ctx: &Context) -> Result<()> {
        match self.context {
            Some(owner) if owner != ctx.id() => Err(Error::ContextMismatch {
                expected: owner,
                found: ctx.id(),
            }),
            _ => Ok(()),
        }
    }

    /// Return the GL name, creating the object first if needed
    ///
    /// The flag is `true` when the object was created by this call, in which
    /// case the caller must (re)upload everything it holds on the CPU side.
    pub fn get_or_create<F>(&mut self, ctx: &Context, create: F) -> Result<(u32, bool)>
    where
        F: FnOnce(&dyn Gl) -> Result<u32>,
    {
        if self.id > 0 {
            self.check_context(ctx)?;
            return Ok((self.id, false));
        }

        let id = create(ctx.gl()).map_err(|err| {
            crate::oogl_error!(self.source, "Allocation failed: {}", err);
            err
        })?;
        if id == 0 {
            crate::oogl_error!(self.source, "Backend returned object name 0");
            return Err(Error::BackendError(format!("{}: backend returned object name 0", self.source)));
        }

        self.id = id;
        self.context = Some(ctx.id());
        self.warn_on_leak = ctx.config().warn_on_leak;
        crate::oogl_debug!(self.source, "Allocated handle {} in {}", id, ctx.id());
        Ok((id, true))
    }

    /// Forget the GL name without deleting anything
    pub(crate) fn release(&mut self) {
        self.id = 0;
        self.context = None;
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        if self.id > 0 && self.warn_on_leak {
            let owner = self.context.map(|c| c.to_string()).unwrap_or_default();
            crate::oogl_warn!(
                self.source,
                "Dropped while still owning handle {} in {}; call delete() with that context to free it",
                self.id,
                owner
            );
        }
    }
}

// ============================================================================
// GlObject
// ============================================================================

/// Lifecycle contract implemented by every wrapper
///
/// Implementors provide the three hooks (`enable_object`, `disable_object`,
/// `delete_object`) and access to their `Handle`; the scoped enable, lazy
/// handle and best-effort delete are shared.
pub trait GlObject {
    fn raw_handle(&self) -> &Handle;

    fn raw_handle_mut(&mut self) -> &mut Handle;

    /// Allocate if needed and make the object current (bind, use, compile...)
    fn enable_object(&mut self, ctx: &Context) -> Result<()>;

    /// Undo `enable_object`; must not fail
    fn disable_object(&mut self, ctx: &Context);

    /// Delete the GL object named `handle`
    fn delete_object(&mut self, ctx: &Context, handle: u32) -> Result<()>;

    /// Delete objects owned by this one (called by `delete` before the object itself)
    fn delete_dependents(&mut self, _ctx: &Context) {}

    /// The GL name of the underlying object, 0 if not allocated
    fn handle(&self) -> u32 {
        self.raw_handle().id()
    }

    fn is_allocated(&self) -> bool {
        self.raw_handle().is_allocated()
    }

    /// Enable the object until the returned guard is dropped
    fn enable<'a>(&'a mut self, ctx: &'a Context) -> Result<EnableGuard<'a, Self>>
    where
        Self: Sized,
    {
        self.enable_object(ctx)?;
        Ok(EnableGuard { object: self, ctx })
    }

    /// Run `f` with the object enabled; it is disabled afterwards whatever `f` returns
    fn with_enabled<R, F>(&mut self, ctx: &Context, f: F) -> Result<R>
    where
        Self: Sized,
        F: FnOnce(&mut Self, &Context) -> Result<R>,
    {
        let mut guard = self.enable(ctx)?;
        f(&mut *guard, ctx)
    }

    /// Delete the GL object. The right context should be passed.
    ///
    /// Failures are logged and swallowed: the handle is 0 afterwards in any
    /// case. Deleting an unallocated object does nothing.
    fn delete(&mut self, ctx: &Context) {
        self.delete_dependents(ctx);

        let handle = self.handle();
        if handle > 0 {
            let source = self.raw_handle().source();
            let result = match self.raw_handle().check_context(ctx) {
                Ok(()) => self.delete_object(ctx, handle),
                Err(err) => Err(err),
            };
            match result {
                Ok(()) => crate::oogl_debug!(source, "Deleted handle {}", handle),
                Err(err) => crate::oogl_warn!(source, "Failed to delete handle {} (ignored): {}", handle, err),
            }
        }
        self.raw_handle_mut().release();
    }
}

// ============================================================================
// EnableGuard
// ============================================================================

/// Keeps an object enabled; runs its disable hook when dropped
pub struct EnableGuard<'a, T: GlObject> {
    object: &'a mut T,
    ctx: &'a Context,
}

impl<'a, T: GlObject> EnableGuard<'a, T> {
    pub fn context(&self) -> &'a Context {
        self.ctx
    }
}

impl<T: GlObject> Deref for EnableGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &*self.object
    }
}

impl<T: GlObject> DerefMut for EnableGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut *self.object
    }
}

impl<T: GlObject> Drop for EnableGuard<'_, T> {
    fn drop(&mut self) {
        self.object.disable_object(self.ctx);
    }
}

#[cfg(test)]
#[path = "gl_object_tests.rs"]
mod tests;
