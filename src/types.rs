//! Core types for measurements and results

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// CPU time consumed by the process, split by mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTime {
    pub user: Duration,
    pub system: Duration,
}

impl CpuTime {
    pub fn total(&self) -> Duration {
        self.user + self.system
    }

    /// Difference between two snapshots; counters never run backwards
    pub fn since(&self, earlier: &CpuTime) -> CpuTime {
        CpuTime {
            user: self.user.saturating_sub(earlier.user),
            system: self.system.saturating_sub(earlier.system),
        }
    }
}

/// Cost of a single workload invocation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Wall-clock duration in milliseconds
    pub duration_ms: f64,
    /// Heap growth in bytes, floored at zero
    pub memory_delta: Option<u64>,
    pub cpu: Option<CpuTime>,
}

impl Measurement {
    /// Heap growth between two live-byte snapshots, clamped at zero.
    ///
    /// A shrinking heap (memory released mid-call) is reported as no growth.
    pub fn clamp_memory_delta(before: u64, after: u64) -> u64 {
        after.saturating_sub(before)
    }
}

/// Aggregate record for one named run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub name: String,
    pub iterations: u64,
    /// Milliseconds, recomputed as `average_time * iterations`
    pub total_time: f64,
    /// Mean milliseconds per iteration
    pub average_time: f64,
    /// Mean heap growth per iteration in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_memory: Option<f64>,
    /// Mean CPU seconds (user + system) per iteration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_time: Option<f64>,
}

impl BenchmarkResult {
    /// Average memory converted to mebibytes
    pub fn average_memory_mib(&self) -> Option<f64> {
        self.average_memory.map(|bytes| bytes / 1024.0 / 1024.0)
    }
}
