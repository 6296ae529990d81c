//! Benchmark module
//! Timing loop, ordered suites and the comparison report

pub mod report;
pub mod runner;
pub mod suite;

pub use report::{fastest_index, Report, ReportRow, Slowdown};
pub use runner::BenchmarkRunner;
pub use suite::{Outcome, Suite, Workload};
