//! Quickbench
//!
//! In-process micro-benchmark harness for quick relative comparisons between
//! small snippets.
//!
//! ## Architecture
//! - Bench: timing loop, ordered suites, comparison report
//! - Probe: injectable clock, CPU, heap and reclamation probes
//! - Config: run options and logging settings
//! - Workloads: toy snippets used by the demo binary
//!
//! ```no_run
//! use quickbench::workloads::{fibonacci, sieve};
//! use quickbench::{BenchmarkRunner, RunConfig, Suite};
//! use std::hint::black_box;
//!
//! let mut runner = BenchmarkRunner::new();
//! let mut suite = Suite::new()
//!     .add("fibonacci(20)", || {
//!         black_box(fibonacci(20));
//!     })
//!     .add("sieve(10_000)", || {
//!         black_box(sieve(10_000));
//!     });
//!
//! runner.compare(&mut suite, 100, &RunConfig::default())?;
//! runner.print_results()?;
//! # Ok::<(), quickbench::BenchError>(())
//! ```

pub mod bench;
pub mod config;
pub mod error;
pub mod probe;
pub mod types;
pub mod workloads;

pub use bench::{BenchmarkRunner, Outcome, Report, Suite};
pub use config::{Config, LoggingConfig, RunConfig, DEFAULT_ITERATIONS};
pub use error::{BenchError, Result};
pub use probe::{Probes, TrackingAllocator};
pub use types::{BenchmarkResult, CpuTime, Measurement};
