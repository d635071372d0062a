/// Small helpers shared by the wrappers

pub mod slot_allocator;

pub use slot_allocator::SlotAllocator;
