//! Comparison report: result table plus slowdown summary

use crate::error::{BenchError, Result};
use crate::types::BenchmarkResult;
use serde::Serialize;
use std::fmt;

const HEADER_NAME: &str = "Test Name";
const HEADER_TOTAL: &str = "Total Time (ms)";
const HEADER_ITERATIONS: &str = "Iterations";
const HEADER_AVERAGE: &str = "Avg Time (ms)";
const HEADER_MEMORY: &str = "Memory Usage (MiB)";
const HEADER_CPU: &str = "CPU Time (s)";
const HEADER_RATIO: &str = "RAM to CPU ratio (MiB/s)";

/// One table row, already formatted for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub name: String,
    pub total_time: String,
    pub iterations: u64,
    pub average_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_mib: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_seconds: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_per_cpu: Option<String>,
}

impl ReportRow {
    fn from_result(result: &BenchmarkResult) -> Self {
        let memory_mib = result.average_memory_mib().map(|mib| format!("{mib:.2}"));
        let cpu_seconds = result.cpu_time.map(|secs| format!("{secs:.3}"));
        let memory_per_cpu = match (&memory_mib, &cpu_seconds) {
            (Some(mem), Some(cpu)) => ratio_from_display(mem, cpu),
            _ => None,
        };

        Self {
            name: result.name.clone(),
            total_time: format!("{:.3}", result.total_time),
            iterations: result.iterations,
            average_time: format!("{:.3}", result.average_time),
            memory_mib,
            cpu_seconds,
            memory_per_cpu,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// MiB per CPU-second, computed from the rounded display strings rather
/// than the raw values. A CPU figure that rounds to zero yields `None`.
fn ratio_from_display(memory_mib: &str, cpu_seconds: &str) -> Option<String> {
    let memory: f64 = memory_mib.parse().ok()?;
    let cpu: f64 = cpu_seconds.parse().ok()?;
    if cpu == 0.0 {
        return None;
    }
    Some(format!("{:.2}", memory / cpu))
}

/// How much slower a result is than the fastest
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slowdown {
    pub name: String,
    /// `average_time / fastest.average_time` rounded to 2 dp; `None` when
    /// the fastest average is zero
    pub ratio: Option<f64>,
}

/// Read-only projection of a result log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub fastest: String,
    pub rows: Vec<ReportRow>,
    pub slowdowns: Vec<Slowdown>,
}

/// Index of the result with the lowest average time; earliest wins ties
pub fn fastest_index(results: &[BenchmarkResult]) -> Option<usize> {
    results
        .iter()
        .enumerate()
        .reduce(|best, current| {
            if current.1.average_time < best.1.average_time {
                current
            } else {
                best
            }
        })
        .map(|(index, _)| index)
}

impl Report {
    /// Fails with `EmptyResultSet` when there is nothing to compare
    pub fn from_results(results: &[BenchmarkResult]) -> Result<Self> {
        let fastest_at = fastest_index(results).ok_or(BenchError::EmptyResultSet)?;
        let fastest = &results[fastest_at];

        let slowdowns = results
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != fastest_at)
            .map(|(_, result)| Slowdown {
                name: result.name.clone(),
                ratio: (fastest.average_time > 0.0)
                    .then(|| round2(result.average_time / fastest.average_time)),
            })
            .collect();

        Ok(Self {
            fastest: fastest.name.clone(),
            rows: results.iter().map(ReportRow::from_result).collect(),
            slowdowns,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn table(&self) -> (Vec<&'static str>, Vec<Vec<String>>) {
        let has_memory = self.rows.iter().any(|r| r.memory_mib.is_some());
        let has_cpu = self.rows.iter().any(|r| r.cpu_seconds.is_some());
        let has_ratio = has_memory && has_cpu;

        let mut headers = vec![HEADER_NAME, HEADER_TOTAL, HEADER_ITERATIONS, HEADER_AVERAGE];
        if has_memory {
            headers.push(HEADER_MEMORY);
        }
        if has_cpu {
            headers.push(HEADER_CPU);
        }
        if has_ratio {
            headers.push(HEADER_RATIO);
        }

        let cells = self
            .rows
            .iter()
            .map(|row| {
                let mut cells = vec![
                    row.name.clone(),
                    row.total_time.clone(),
                    row.iterations.to_string(),
                    row.average_time.clone(),
                ];
                if has_memory {
                    cells.push(row.memory_mib.clone().unwrap_or_else(|| "-".to_string()));
                }
                if has_cpu {
                    cells.push(row.cpu_seconds.clone().unwrap_or_else(|| "-".to_string()));
                }
                if has_ratio {
                    let ratio = match (&row.memory_mib, &row.cpu_seconds) {
                        (Some(_), Some(_)) => {
                            row.memory_per_cpu.clone().unwrap_or_else(|| "n/a".to_string())
                        }
                        _ => "-".to_string(),
                    };
                    cells.push(ratio);
                }
                cells
            })
            .collect();

        (headers, cells)
    }
}

fn write_rule(f: &mut fmt::Formatter<'_>, widths: &[usize]) -> fmt::Result {
    for width in widths {
        write!(f, "+{}", "-".repeat(width + 2))?;
    }
    writeln!(f, "+")
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (headers, rows) = self.table();

        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                rows.iter()
                    .map(|row| row[col].chars().count())
                    .chain(std::iter::once(header.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write_rule(f, &widths)?;
        for (header, width) in headers.iter().zip(&widths) {
            write!(f, "| {:<width$} ", header, width = width)?;
        }
        writeln!(f, "|")?;
        write_rule(f, &widths)?;

        for row in &rows {
            for (col, (cell, width)) in row.iter().zip(&widths).enumerate() {
                // Names read left to right, figures line up on the right
                if col == 0 {
                    write!(f, "| {:<width$} ", cell, width = width)?;
                } else {
                    write!(f, "| {:>width$} ", cell, width = width)?;
                }
            }
            writeln!(f, "|")?;
        }
        write_rule(f, &widths)?;

        write!(f, "\nFastest test: {}", self.fastest)?;
        for slowdown in &self.slowdowns {
            match slowdown.ratio {
                Some(ratio) => write!(
                    f,
                    "\n{} is {:.2}x slower than {}",
                    slowdown.name, ratio, self.fastest
                )?,
                None => write!(
                    f,
                    "\n{} cannot be compared with {} (zero average time)",
                    slowdown.name, self.fastest
                )?,
            }
        }
        Ok(())
    }
}
