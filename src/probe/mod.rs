//! Measurement probes
//!
//! The runner never reads process-wide counters directly. Every quantity it
//! samples comes through one of these point-in-time probes, so tests can drive
//! the harness with scripted values.
//!
//! - `Clock`: monotonic wall clock, always available
//! - `CpuProbe`: process CPU time, `None` when the host cannot report it
//! - `MemoryProbe`: live heap bytes, `None` when heap tracking is off
//! - `GcTrigger`: optional request to reclaim memory before a run

pub mod heap;
pub mod system;

pub use heap::{AllocatorMemoryProbe, TrackingAllocator};
pub use system::{MallocTrim, MonotonicClock, NoGc, RusageCpuProbe};

use crate::types::CpuTime;
use std::time::Duration;

/// Monotonic time source
pub trait Clock: Send {
    /// Time elapsed since an arbitrary, fixed origin
    fn now(&self) -> Duration;
}

/// Process CPU time source
pub trait CpuProbe: Send {
    fn sample(&self) -> Option<CpuTime>;
}

/// Heap usage source
pub trait MemoryProbe: Send {
    /// Bytes currently allocated on the heap
    fn live_bytes(&self) -> Option<u64>;
}

/// Best-effort memory reclamation capability
pub trait GcTrigger: Send {
    fn is_available(&self) -> bool;

    /// Request reclamation. Returns whether a request was actually issued.
    fn try_collect(&self) -> bool;
}

/// The set of probes a runner samples
pub struct Probes {
    pub clock: Box<dyn Clock>,
    pub cpu: Box<dyn CpuProbe>,
    pub memory: Box<dyn MemoryProbe>,
    pub gc: Box<dyn GcTrigger>,
}

impl Probes {
    /// Probes backed by the host: `Instant`, `getrusage`, the tracking
    /// allocator and `malloc_trim` where each is supported.
    pub fn system() -> Self {
        Self {
            clock: Box::new(MonotonicClock::new()),
            cpu: Box::new(RusageCpuProbe),
            memory: Box::new(AllocatorMemoryProbe),
            gc: system::default_gc_trigger(),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_cpu(mut self, cpu: impl CpuProbe + 'static) -> Self {
        self.cpu = Box::new(cpu);
        self
    }

    pub fn with_memory(mut self, memory: impl MemoryProbe + 'static) -> Self {
        self.memory = Box::new(memory);
        self
    }

    pub fn with_gc(mut self, gc: impl GcTrigger + 'static) -> Self {
        self.gc = Box::new(gc);
        self
    }
}

impl Default for Probes {
    fn default() -> Self {
        Self::system()
    }
}
