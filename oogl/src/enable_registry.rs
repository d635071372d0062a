/// EnableRegistry - reference-counted glEnable/glDisable
///
/// Replacement for the deprecated glPushAttrib/glPopAttrib state stack.
/// Nested users of a capability each `increment` on entry and `decrement`
/// on exit; the real glEnable is issued on the 0 → 1 transition and the
/// real glDisable on the 1 → 0 transition.
///
/// Only correct as long as nobody calls glEnable/glDisable for the same
/// capability behind the registry's back.

use rustc_hash::FxHashMap;
use crate::gl::{Capability, Gl};

/// Per-context activation counters, keyed by capability
#[derive(Debug, Default)]
pub struct EnableRegistry {
    counts: FxHashMap<Capability, u32>,
}

impl EnableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more user of `capability`, enabling it if it was off
    pub fn increment(&mut self, gl: &dyn Gl, capability: Capability) {
        let count = self.counts.entry(capability).or_insert(0);
        if *count == 0 {
            crate::oogl_trace!("oogl::EnableRegistry", "glEnable({:?})", capability);
            gl.enable(capability);
        }
        *count += 1;
    }

    /// Count one user of `capability` less, disabling it when the last one leaves
    ///
    /// Decrementing a capability that is already at 0 does nothing.
    pub fn decrement(&mut self, gl: &dyn Gl, capability: Capability) {
        let count = self.counts.entry(capability).or_insert(0);
        if *count == 1 {
            crate::oogl_trace!("oogl::EnableRegistry", "glDisable({:?})", capability);
            gl.disable(capability);
        }
        *count = count.saturating_sub(1);
    }

    /// Current number of users of `capability` (0 if never seen)
    pub fn count(&self, capability: Capability) -> u32 {
        self.counts.get(&capability).copied().unwrap_or(0)
    }

    /// Whether the registry believes `capability` is enabled
    pub fn is_enabled(&self, capability: Capability) -> bool {
        self.count(capability) > 0
    }
}

#[cfg(test)]
#[path = "enable_registry_tests.rs"]
mod tests;
