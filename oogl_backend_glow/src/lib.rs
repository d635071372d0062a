/*!
# oogl - glow backend

Implements the [`oogl::Gl`] backend trait on top of the
[glow](https://crates.io/crates/glow) bindings.

Window and context creation stay with the application: build a
`glow::Context` from your windowing library's loader, wrap it in
[`GlowGl`] and hand that to [`oogl::Context::new`].

```no_run
# fn loader(_: &str) -> *const std::ffi::c_void { std::ptr::null() }
use oogl_backend_glow::GlowGl;

let gl = unsafe { glow::Context::from_loader_function(loader) };
let backend = GlowGl::new(gl)?;
let ctx = oogl::Context::new(backend);
# Ok::<(), oogl::Error>(())
```
*/

mod glow_gl;

pub use glow_gl::GlowGl;

// Re-export the bindings so callers build their context with the same version
pub use glow;
