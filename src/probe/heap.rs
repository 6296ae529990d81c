//! Heap accounting through a counting global allocator
//!
//! Install it in a binary to make memory deltas available:
//!
//! ```ignore
//! #[global_allocator]
//! static GLOBAL: quickbench::TrackingAllocator = quickbench::TrackingAllocator;
//! ```
//!
//! Without it `AllocatorMemoryProbe` reports nothing and results carry no
//! memory column.

use super::MemoryProbe;
use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

static LIVE_BYTES: AtomicUsize = AtomicUsize::new(0);
static INSTALLED: AtomicBool = AtomicBool::new(false);

/// System allocator wrapper that keeps a live-byte count
pub struct TrackingAllocator;

impl TrackingAllocator {
    /// True once any allocation has gone through this allocator
    pub fn is_installed() -> bool {
        INSTALLED.load(Ordering::Relaxed)
    }

    pub fn live_bytes() -> usize {
        LIVE_BYTES.load(Ordering::Relaxed)
    }

    #[inline]
    fn record_alloc(size: usize) {
        LIVE_BYTES.fetch_add(size, Ordering::Relaxed);
        INSTALLED.store(true, Ordering::Relaxed);
    }
}

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ret = System.alloc(layout);
        if !ret.is_null() {
            Self::record_alloc(layout.size());
        }
        ret
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ret = System.alloc_zeroed(layout);
        if !ret.is_null() {
            Self::record_alloc(layout.size());
        }
        ret
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        LIVE_BYTES.fetch_sub(layout.size(), Ordering::Relaxed);
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let ret = System.realloc(ptr, layout, new_size);
        if !ret.is_null() {
            let old_size = layout.size();
            if new_size >= old_size {
                LIVE_BYTES.fetch_add(new_size - old_size, Ordering::Relaxed);
            } else {
                LIVE_BYTES.fetch_sub(old_size - new_size, Ordering::Relaxed);
            }
        }
        ret
    }
}

/// Reads live heap bytes from `TrackingAllocator`
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocatorMemoryProbe;

impl MemoryProbe for AllocatorMemoryProbe {
    fn live_bytes(&self) -> Option<u64> {
        TrackingAllocator::is_installed().then(|| TrackingAllocator::live_bytes() as u64)
    }
}
