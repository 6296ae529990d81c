use proptest::prelude::*;
use quickbench::probe::{Clock, CpuProbe, MemoryProbe, NoGc};
use quickbench::{BenchError, BenchmarkRunner, CpuTime, Probes, RunConfig, Suite};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::hint::black_box;
use std::time::Duration;

/// Replays per-read durations, one entry per clock read, then advances by
/// `fallback` once the script runs out
struct ReplayClock {
    now: Cell<Duration>,
    steps: RefCell<VecDeque<Duration>>,
    fallback: Duration,
}

impl ReplayClock {
    fn new(steps: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            now: Cell::new(Duration::ZERO),
            steps: RefCell::new(steps.into_iter().collect()),
            fallback: Duration::ZERO,
        }
    }

    /// Advances by `step` on every read
    fn steady(step: Duration) -> Self {
        Self {
            fallback: step,
            ..Self::new([])
        }
    }
}

impl Clock for ReplayClock {
    fn now(&self) -> Duration {
        let step = self
            .steps
            .borrow_mut()
            .pop_front()
            .unwrap_or(self.fallback);
        self.now.set(self.now.get() + step);
        self.now.get()
    }
}

struct ReplayMemory(RefCell<VecDeque<u64>>);

impl MemoryProbe for ReplayMemory {
    fn live_bytes(&self) -> Option<u64> {
        self.0.borrow_mut().pop_front()
    }
}

struct NoCpu;

impl CpuProbe for NoCpu {
    fn sample(&self) -> Option<CpuTime> {
        None
    }
}

fn busy_loop() {
    let mut acc = 0u64;
    for i in 0..100_000u64 {
        acc = acc.wrapping_add(black_box(i));
    }
    black_box(acc);
}

#[test]
fn steady_clock_outlasts_long_runs() {
    let probes = Probes::system()
        .with_clock(ReplayClock::steady(Duration::from_millis(2)))
        .with_cpu(NoCpu)
        .with_memory(ReplayMemory(RefCell::new(VecDeque::new())))
        .with_gc(NoGc);
    let mut runner = BenchmarkRunner::with_probes(probes);

    let result = runner
        .run("steady", || {}, 500, &RunConfig::default())
        .unwrap();
    assert_eq!(result.iterations, 500);
    assert!((result.average_time - 2.0).abs() < 1e-9);
    assert!((result.total_time - 1000.0).abs() < 1e-6);
}

#[test]
fn noop_scenario() {
    let mut runner = BenchmarkRunner::new();
    let result = runner.run("noop", || {}, 10, &RunConfig::default()).unwrap();

    assert_eq!(result.iterations, 10);
    assert!(result.average_time >= 0.0);
    assert!((result.total_time - result.average_time * 10.0).abs() <= 1e-9);
}

#[test]
fn busy_loop_is_slower_than_noop() {
    let mut runner = BenchmarkRunner::new();
    let mut suite = Suite::new().add("a", busy_loop).add("b", || {});

    runner.compare(&mut suite, 5, &RunConfig::default()).unwrap();

    let report = runner.report().unwrap();
    assert_eq!(report.fastest, "b");
    assert_eq!(report.slowdowns.len(), 1);
    assert_eq!(report.slowdowns[0].name, "a");
    assert!(report.slowdowns[0].ratio.unwrap() > 1.0);

    let text = runner.render_report().unwrap();
    assert!(text.contains("Fastest test: b"));
    assert!(text.contains("a is "));
}

#[test]
fn raising_on_third_call_records_nothing() {
    let mut runner = BenchmarkRunner::new();
    let mut calls = 0;
    let config = RunConfig {
        warm_up: false,
        ..RunConfig::default()
    };

    let err = runner
        .run(
            "flaky",
            || {
                calls += 1;
                if calls == 3 {
                    return Err(std::io::Error::other("third call"));
                }
                Ok(())
            },
            10,
            &config,
        )
        .unwrap_err();

    assert!(matches!(err, BenchError::Workload { .. }));
    assert!(runner.results().iter().all(|r| r.name != "flaky"));
}

#[test]
fn report_is_idempotent_and_clear_empties() {
    let mut runner = BenchmarkRunner::new();
    let mut suite = Suite::new().add("x", || {}).add("y", busy_loop);
    runner.compare(&mut suite, 3, &RunConfig::timing_only()).unwrap();

    let first = runner.render_report().unwrap();
    let second = runner.render_report().unwrap();
    assert_eq!(first, second);

    runner.clear();
    assert!(matches!(
        runner.render_report(),
        Err(BenchError::EmptyResultSet)
    ));
    assert!(matches!(runner.print_results(), Err(BenchError::EmptyResultSet)));
}

#[test]
fn equal_averages_pick_first_inserted() {
    let probes = Probes::system()
        .with_clock(ReplayClock::steady(Duration::from_millis(1)))
        .with_cpu(NoCpu)
        .with_memory(ReplayMemory(RefCell::new(VecDeque::new())))
        .with_gc(NoGc);
    let mut runner = BenchmarkRunner::with_probes(probes);
    let mut suite = Suite::new().add("first", || {}).add("second", || {});

    runner.compare(&mut suite, 4, &RunConfig::default()).unwrap();
    assert_eq!(runner.report().unwrap().fastest, "first");
}

#[tokio::test]
async fn async_compare_matches_sync_order() {
    let mut runner = BenchmarkRunner::new();
    let mut suite = Suite::new()
        .add("one", || {})
        .add("two", || {})
        .add("three", || {});

    runner
        .compare_async(&mut suite, 2, &RunConfig::timing_only())
        .await
        .unwrap();

    let names: Vec<_> = runner.results().iter().map(|r| r.name.clone()).collect();
    assert_eq!(names, vec!["one", "two", "three"]);
}

proptest! {
    #[test]
    fn total_time_tracks_average(
        steps_us in prop::collection::vec(0u64..50_000, 1..40),
    ) {
        let iterations = steps_us.len() as u64;
        // Two clock reads per iteration: the "before" read costs nothing,
        // the "after" read advances by the iteration's duration.
        let reads = steps_us
            .iter()
            .flat_map(|&us| [Duration::ZERO, Duration::from_micros(us)]);
        let probes = Probes::system()
            .with_clock(ReplayClock::new(reads))
            .with_cpu(NoCpu)
            .with_gc(NoGc);
        let mut runner = BenchmarkRunner::with_probes(probes);

        let result = runner
            .run("prop", || {}, iterations, &RunConfig::timing_only())
            .unwrap();

        let expected_ms = steps_us.iter().sum::<u64>() as f64 / 1000.0;
        prop_assert_eq!(result.iterations, iterations);
        prop_assert!((result.total_time - result.average_time * iterations as f64).abs() <= 1e-9);
        prop_assert!((result.total_time - expected_ms).abs() <= 1e-6);
    }

    #[test]
    fn memory_average_never_negative(
        samples in prop::collection::vec((0u64..1_000_000, 0u64..1_000_000), 1..30),
    ) {
        let iterations = samples.len() as u64;
        let expected: u64 = samples.iter().map(|&(b, a)| a.saturating_sub(b)).sum();
        let reads: VecDeque<u64> = samples.iter().flat_map(|&(b, a)| [b, a]).collect();

        let probes = Probes::system()
            .with_clock(ReplayClock::steady(Duration::from_micros(1)))
            .with_cpu(NoCpu)
            .with_memory(ReplayMemory(RefCell::new(reads)))
            .with_gc(NoGc);
        let mut runner = BenchmarkRunner::with_probes(probes);
        let config = RunConfig { collect_cpu: false, ..RunConfig::default() };

        let result = runner.run("mem", || {}, iterations, &config).unwrap();
        let average = result.average_memory.unwrap();

        prop_assert!(average >= 0.0);
        prop_assert!((average - expected as f64 / iterations as f64).abs() <= 1e-6);
    }

    #[test]
    fn compare_keeps_input_order(count in 1usize..12) {
        let mut runner = BenchmarkRunner::with_probes(
            Probes::system()
                .with_clock(ReplayClock::steady(Duration::from_micros(3)))
                .with_cpu(NoCpu)
                .with_gc(NoGc),
        );
        let names: Vec<String> = (0..count).rev().map(|i| format!("case-{i}")).collect();
        let mut suite = Suite::new();
        for name in &names {
            suite.insert(name.clone(), || {});
        }

        runner.compare(&mut suite, 1, &RunConfig::timing_only()).unwrap();

        let logged: Vec<String> = runner.results().iter().map(|r| r.name.clone()).collect();
        prop_assert_eq!(logged, names);
    }
}
