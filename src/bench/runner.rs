//! Timing loop and result aggregation

use crate::bench::report::Report;
use crate::bench::suite::{Outcome, Suite};
use crate::config::RunConfig;
use crate::error::{BenchError, Result};
use crate::probe::Probes;
use crate::types::{BenchmarkResult, Measurement};
use std::hint::black_box;
use std::time::Duration;
use tracing::{debug, info};

/// Running sums over one run's measurements
struct Accumulator {
    iterations: u64,
    duration_ms: f64,
    memory: Option<u64>,
    cpu: Option<Duration>,
}

impl Accumulator {
    fn new(config: &RunConfig) -> Self {
        Self {
            iterations: 0,
            duration_ms: 0.0,
            memory: config.collect_memory.then_some(0),
            cpu: config.collect_cpu.then_some(Duration::ZERO),
        }
    }

    /// An axis missing from any single measurement is dropped for the run.
    fn push(&mut self, m: &Measurement) {
        self.iterations += 1;
        self.duration_ms += m.duration_ms;
        self.memory = self
            .memory
            .zip(m.memory_delta)
            .map(|(sum, delta)| sum.saturating_add(delta));
        self.cpu = self.cpu.zip(m.cpu).map(|(sum, cpu)| sum + cpu.total());
    }

    fn finish(self, name: &str) -> BenchmarkResult {
        let n = self.iterations.max(1) as f64;
        let average_time = self.duration_ms / n;

        BenchmarkResult {
            name: name.to_string(),
            iterations: self.iterations,
            total_time: average_time * n,
            average_time,
            average_memory: self.memory.map(|sum| sum as f64 / n),
            cpu_time: self.cpu.map(|sum| sum.as_secs_f64() / n),
        }
    }
}

/// Times workloads and keeps an ordered log of their results
pub struct BenchmarkRunner {
    probes: Probes,
    results: Vec<BenchmarkResult>,
}

impl BenchmarkRunner {
    /// Runner sampling the host's clock, CPU and heap probes
    pub fn new() -> Self {
        Self::with_probes(Probes::system())
    }

    pub fn with_probes(probes: Probes) -> Self {
        Self {
            probes,
            results: Vec::new(),
        }
    }

    /// Results in invocation order
    pub fn results(&self) -> &[BenchmarkResult] {
        &self.results
    }

    /// Time `iterations` sequential calls of `workload` and log the result.
    ///
    /// A failing workload aborts the run and nothing is logged for `name`.
    pub fn run<F, R>(
        &mut self,
        name: &str,
        mut workload: F,
        iterations: u64,
        config: &RunConfig,
    ) -> Result<&BenchmarkResult>
    where
        F: FnMut() -> R,
        R: Outcome,
    {
        validate_name(name)?;
        validate_iterations(iterations)?;

        info!("starting: {}", name);

        if config.force_gc_before_run && self.probes.gc.is_available() {
            let issued = self.probes.gc.try_collect();
            debug!("reclaim requested before {}: {}", name, issued);
        }

        if config.warm_up {
            black_box(workload())
                .into_result()
                .map_err(|source| workload_error(name, source))?;
        }

        let mut acc = Accumulator::new(config);
        for _ in 0..iterations {
            let (measurement, outcome) = self.measure_once(&mut workload, config);
            outcome
                .into_result()
                .map_err(|source| workload_error(name, source))?;
            acc.push(&measurement);
        }

        let result = acc.finish(name);
        debug!(
            "{}: avg {:.3}ms over {} iterations",
            name, result.average_time, result.iterations
        );
        self.results.push(result);

        info!("done: {}", name);
        Ok(&self.results[self.results.len() - 1])
    }

    /// Run every workload in `suite`, in order, with shared settings.
    ///
    /// Stops at the first failure; results already logged are kept.
    pub fn compare(
        &mut self,
        suite: &mut Suite<'_>,
        iterations: u64,
        config: &RunConfig,
    ) -> Result<&mut Self> {
        validate_iterations(iterations)?;
        for (name, workload) in suite.iter_mut() {
            self.run(name, workload, iterations, config)?;
        }
        Ok(self)
    }

    /// `run` for async callers. Yields once before starting; the timed loop
    /// itself never suspends.
    pub async fn run_async<F, R>(
        &mut self,
        name: &str,
        workload: F,
        iterations: u64,
        config: &RunConfig,
    ) -> Result<&BenchmarkResult>
    where
        F: FnMut() -> R,
        R: Outcome,
    {
        tokio::task::yield_now().await;
        self.run(name, workload, iterations, config)
    }

    /// `compare` for async callers, yielding to the executor between entries
    pub async fn compare_async(
        &mut self,
        suite: &mut Suite<'_>,
        iterations: u64,
        config: &RunConfig,
    ) -> Result<&mut Self> {
        validate_iterations(iterations)?;
        for (name, workload) in suite.iter_mut() {
            tokio::task::yield_now().await;
            self.run(name, workload, iterations, config)?;
        }
        Ok(self)
    }

    /// Snapshot the log into a comparison report
    pub fn report(&self) -> Result<Report> {
        Report::from_results(&self.results)
    }

    /// The comparison table and slowdown summary as text
    pub fn render_report(&self) -> Result<String> {
        Ok(self.report()?.to_string())
    }

    /// Print the comparison report to stdout
    pub fn print_results(&self) -> Result<()> {
        println!("{}", self.report()?);
        Ok(())
    }

    pub fn clear(&mut self) -> &mut Self {
        self.results.clear();
        self
    }

    #[inline]
    fn measure_once<F, R>(&self, workload: &mut F, config: &RunConfig) -> (Measurement, R)
    where
        F: FnMut() -> R,
    {
        let probes = &self.probes;

        let cpu_before = config.collect_cpu.then(|| probes.cpu.sample()).flatten();
        let mem_before = config
            .collect_memory
            .then(|| probes.memory.live_bytes())
            .flatten();
        let start = probes.clock.now();

        let outcome = black_box(workload());

        let end = probes.clock.now();
        let cpu_after = cpu_before.and_then(|_| probes.cpu.sample());
        let mem_after = mem_before.and_then(|_| probes.memory.live_bytes());

        let measurement = Measurement {
            duration_ms: end.saturating_sub(start).as_secs_f64() * 1000.0,
            memory_delta: mem_before
                .zip(mem_after)
                .map(|(before, after)| Measurement::clamp_memory_delta(before, after)),
            cpu: cpu_before
                .zip(cpu_after)
                .map(|(before, after)| after.since(&before)),
        };

        (measurement, outcome)
    }
}

impl Default for BenchmarkRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BenchmarkRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchmarkRunner")
            .field("results", &self.results)
            .finish_non_exhaustive()
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(BenchError::invalid("name", "must not be empty"));
    }
    Ok(())
}

fn validate_iterations(iterations: u64) -> Result<()> {
    if iterations < 1 {
        return Err(BenchError::invalid(
            "iterations",
            format!("must be at least 1, got {iterations}"),
        ));
    }
    Ok(())
}

fn workload_error(name: &str, source: anyhow::Error) -> BenchError {
    BenchError::Workload {
        name: name.to_string(),
        source: source.into(),
    }
}
