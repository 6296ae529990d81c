//! Host-backed probes
//! Thin safe wrappers over `Instant`, `getrusage` and `malloc_trim`

use super::{Clock, CpuProbe, GcTrigger};
use crate::types::CpuTime;
use std::time::{Duration, Instant};

/// Wall clock backed by `Instant`
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline(always)]
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Process CPU time via `getrusage(RUSAGE_SELF)`
#[derive(Debug, Clone, Copy, Default)]
pub struct RusageCpuProbe;

#[cfg(unix)]
fn timeval_to_duration(tv: libc::timeval) -> Duration {
    Duration::new(tv.tv_sec as u64, (tv.tv_usec as u32) * 1000)
}

impl CpuProbe for RusageCpuProbe {
    #[cfg(unix)]
    fn sample(&self) -> Option<CpuTime> {
        unsafe {
            let mut usage: libc::rusage = std::mem::zeroed();
            if libc::getrusage(libc::RUSAGE_SELF, &mut usage) == 0 {
                return Some(CpuTime {
                    user: timeval_to_duration(usage.ru_utime),
                    system: timeval_to_duration(usage.ru_stime),
                });
            }
        }
        None
    }

    #[cfg(not(unix))]
    fn sample(&self) -> Option<CpuTime> {
        None
    }
}

/// Reclamation is not supported on this host
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGc;

impl GcTrigger for NoGc {
    fn is_available(&self) -> bool {
        false
    }

    fn try_collect(&self) -> bool {
        false
    }
}

/// Returns freed heap pages to the OS with glibc's `malloc_trim`
#[derive(Debug, Clone, Copy, Default)]
pub struct MallocTrim;

impl GcTrigger for MallocTrim {
    fn is_available(&self) -> bool {
        cfg!(all(target_os = "linux", target_env = "gnu"))
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    fn try_collect(&self) -> bool {
        unsafe {
            libc::malloc_trim(0);
        }
        true
    }

    #[cfg(not(all(target_os = "linux", target_env = "gnu")))]
    fn try_collect(&self) -> bool {
        false
    }
}

/// The best reclamation trigger this host offers
pub fn default_gc_trigger() -> Box<dyn GcTrigger> {
    if MallocTrim.is_available() {
        Box::new(MallocTrim)
    } else {
        Box::new(NoGc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hint::black_box;

    #[test]
    fn test_clock_is_monotonic() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[cfg(unix)]
    #[test]
    fn test_rusage_advances_under_load() {
        let probe = RusageCpuProbe;
        let before = probe.sample().expect("getrusage should work on unix");

        let mut acc = 0u64;
        for i in 0..20_000_000u64 {
            acc = acc.wrapping_add(black_box(i) ^ 0x5555);
        }
        black_box(acc);

        let after = probe.sample().unwrap();
        assert!(after.total() >= before.total());
    }

    #[test]
    fn test_no_gc_is_inert() {
        assert!(!NoGc.is_available());
        assert!(!NoGc.try_collect());
    }

    #[test]
    fn test_default_trigger_matches_host() {
        let trigger = default_gc_trigger();
        assert_eq!(trigger.is_available(), MallocTrim.is_available());
        assert_eq!(trigger.try_collect(), trigger.is_available());
    }
}
