//! Report module: collects raw per-phase timings and prints them.
//!
//! Nothing is aggregated. Every timed phase of every run is one row.

use serde::Serialize;
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

/// Name used in log lines and the report header for the measured layer.
pub const LAYER_NAME: &str = "SQLite DAO";

/// Timed phases of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    InsertOneByOne,
    UpdateOneByOne,
    DeleteAll,
    CreateBatch,
    UpdateBatch,
    LoadAll,
    AccessProperties,
}

impl Operation {
    /// Verb phrase placed before the entity count in log lines.
    pub fn description(self) -> &'static str {
        match self {
            Operation::InsertOneByOne => "Inserted (one-by-one)",
            Operation::UpdateOneByOne => "Updated (one-by-one)",
            Operation::DeleteAll => "Deleted all",
            Operation::CreateBatch => "Created (batch)",
            Operation::UpdateBatch => "Updated (batch)",
            Operation::LoadAll => "Loaded (batch)",
            Operation::AccessProperties => "Accessed properties of",
        }
    }
}

/// Which pass of the suite a measurement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "index")]
pub enum RunLabel {
    Warmup,
    Run(usize),
    /// Outside any run: the deletes between and after runs.
    Suite,
}

impl fmt::Display for RunLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunLabel::Warmup => write!(f, "warmup"),
            RunLabel::Run(i) => write!(f, "run {}", i + 1),
            RunLabel::Suite => write!(f, "suite"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub run: RunLabel,
    pub operation: Operation,
    /// Rows touched by the phase. Zero for `DeleteAll`.
    pub count: usize,
    #[serde(rename = "elapsed_us", serialize_with = "serialize_micros")]
    pub elapsed: Duration,
}

impl Measurement {
    /// Log line in the `"<layer>: <operation> <n> entities in <t> ms"` format.
    pub fn log_line(&self) -> String {
        match self.operation {
            Operation::DeleteAll => format!(
                "{LAYER_NAME}: {} entities in {} ms",
                self.operation.description(),
                self.elapsed.as_millis()
            ),
            _ => format!(
                "{LAYER_NAME}: {} {} entities in {} ms",
                self.operation.description(),
                self.count,
                self.elapsed.as_millis()
            ),
        }
    }
}

fn serialize_micros<S>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX))
}

/// Every measurement of a suite, in the order they were taken.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchReport {
    pub measurements: Vec<Measurement>,
}

impl BenchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, measurement: Measurement) {
        self.measurements.push(measurement);
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    pub fn for_run(&self, run: RunLabel) -> impl Iterator<Item = &Measurement> {
        self.measurements.iter().filter(move |m| m.run == run)
    }

    /// Write one JSON object per measurement.
    pub fn write_json_lines<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for m in &self.measurements {
            serde_json::to_writer(&mut *out, m)?;
            writeln!(out)?;
        }
        Ok(())
    }
}

/// Print the raw measurement table.
pub fn print_report(report: &BenchReport) {
    println!("\n{}", "=".repeat(80));
    println!("  {LAYER_NAME} CRUD Benchmark Report");
    println!("{}", "=".repeat(80));

    if report.is_empty() {
        println!("\n  No measurements recorded.");
        println!();
        return;
    }

    println!(
        "\n  {:10} {:24} {:>10} {:>12} {:>10}",
        "Run", "Operation", "Entities", "Time (µs)", "Time (ms)"
    );
    println!("  {}", "-".repeat(70));

    let mut previous_run = None;
    for m in &report.measurements {
        if previous_run.is_some() && previous_run != Some(m.run) {
            println!();
        }
        previous_run = Some(m.run);

        let count = match m.operation {
            Operation::DeleteAll => "-".to_string(),
            _ => m.count.to_string(),
        };
        println!(
            "  {:10} {:24} {:>10} {:>12} {:>10.2}",
            m.run.to_string(),
            m.operation.description(),
            count,
            m.elapsed.as_micros(),
            m.elapsed.as_secs_f64() * 1000.0,
        );
    }

    println!("\n{}", "=".repeat(80));
    println!();
}
