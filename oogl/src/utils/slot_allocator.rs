use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Allocates and recycles small `u32` indices, lowest free index first.
///
/// Used for texture unit assignment, where low units are preferred and
/// the number of units is bounded by the driver, and for the object names
/// handed out by the test backend.
///
/// # Example
///
/// ```ignore
/// let mut units = SlotAllocator::with_capacity_limit(16);
/// let a = units.alloc();   // Some(0)
/// let b = units.alloc();   // Some(1)
/// units.free(0);
/// let c = units.alloc();   // Some(0) (recycled)
/// ```
#[derive(Debug)]
pub struct SlotAllocator {
    free_list: BinaryHeap<Reverse<u32>>,
    next_id: u32,
    len: u32,
    limit: Option<u32>,
}

impl SlotAllocator {
    /// Create an unbounded allocator
    pub fn new() -> Self {
        Self {
            free_list: BinaryHeap::new(),
            next_id: 0,
            len: 0,
            limit: None,
        }
    }

    /// Create an allocator that never hands out an index >= `limit`
    pub fn with_capacity_limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::new()
        }
    }

    /// Allocate the lowest available index, `None` when the limit is reached
    pub fn alloc(&mut self) -> Option<u32> {
        let id = match self.free_list.pop() {
            Some(Reverse(id)) => id,
            None => {
                if self.limit.is_some_and(|limit| self.next_id >= limit) {
                    return None;
                }
                let id = self.next_id;
                self.next_id += 1;
                id
            }
        };
        self.len += 1;
        Some(id)
    }

    /// Return an index to the pool for reuse
    pub fn free(&mut self, id: u32) {
        debug_assert!(id < self.next_id, "freeing an unallocated slot: {}", id);
        self.len -= 1;
        self.free_list.push(Reverse(id));
    }

    /// Highest index ever allocated + 1
    pub fn high_water_mark(&self) -> u32 {
        self.next_id
    }

    /// Number of currently allocated indices
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for SlotAllocator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "slot_allocator_tests.rs"]
mod tests;
