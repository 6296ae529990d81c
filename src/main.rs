//! Quickbench CLI
//! Compares the bundled toy workloads
//!
//! Usage: quickbench [ITERATIONS] [--json]

use quickbench::workloads::{array_ops, fibonacci, matrix_multiply, sieve};
use quickbench::{BenchmarkRunner, Config, LoggingConfig, Suite, TrackingAllocator};
use std::env;
use std::hint::black_box;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

/// The demo workloads are heavy; keep the default pass short.
const DEMO_ITERATIONS: u64 = 5;

fn init_logging(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if logging.json_output {
        builder
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
    } else {
        builder.try_init().map_err(|e| anyhow::anyhow!(e))?;
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_logging(&config.logging)?;

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║          QUICKBENCH v0.1.0 - micro-benchmark harness          ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    // Check CLI args
    let args: Vec<String> = env::args().skip(1).collect();
    let json = args.iter().any(|a| a == "--json");
    let iterations = match args.iter().find(|a| !a.starts_with("--")) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid iteration count {raw:?}: {e}"))?,
        None => config.iterations_or(DEMO_ITERATIONS),
    };

    info!(
        "Running {} iterations per workload (warm-up: {}, cpu: {}, memory: {})",
        iterations, config.run.warm_up, config.run.collect_cpu, config.run.collect_memory
    );

    let mut suite = Suite::new()
        .add("fibonacci(30)", || {
            black_box(fibonacci(black_box(30)));
        })
        .add("prime(1_000_000)", || {
            black_box(sieve(black_box(1_000_000)));
        })
        .add("matrix multiply(100)", || {
            black_box(matrix_multiply(black_box(100)));
        })
        .add("array operations(1_000_000)", || {
            black_box(array_ops(black_box(1_000_000)));
        });

    let mut runner = BenchmarkRunner::new();
    runner
        .compare_async(&mut suite, iterations, &config.run)
        .await?;

    runner.print_results()?;

    if json {
        println!("\n{}", runner.report()?.to_json()?);
    }

    Ok(())
}
