//! Standalone benchmark runner that prints the raw timing report.
//!
//! Configuration comes from `ORM_BENCH_*` environment variables (and a `.env`
//! file, if present):
//!
//!   ORM_BENCH_IN_MEMORY=true        use an in-memory database
//!   ORM_BENCH_DB_PATH=path          database file (default `test-db`)
//!   ORM_BENCH_BATCH_SIZE=n          entities per timed run (default 10000)
//!   ORM_BENCH_RUNS=n                timed runs (default 8)
//!   ORM_BENCH_REPORT_JSON=true      print JSON lines instead of the table
//!
//! Usage:
//!   cargo run --release
//!   ORM_BENCH_IN_MEMORY=true cargo run --release

use anyhow::Result;
use orm_bench::config::BenchConfig;
use orm_bench::report::print_report;
use orm_bench::runner::BenchmarkRunner;
use std::io;
use std::process;

fn run(config: BenchConfig) -> Result<()> {
    let report_json = config.report_json;
    let runner = BenchmarkRunner::new(config)?;

    let semantics = runner.run_semantics_check()?;
    log::debug!("Semantics probe: {semantics:?}");

    let report = runner.run_full_suite()?;

    if report_json {
        let stdout = io::stdout();
        report.write_json_lines(&mut stdout.lock())?;
    } else {
        print_report(&report);
    }
    Ok(())
}

fn main() {
    let config = BenchConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {e}. Exiting.");
        process::exit(1);
    });

    perf_core::initialize_logger(config.log_level, config.log_file.as_deref()).unwrap_or_else(
        |e| {
            eprintln!("Failed to initialize logger: {e}. Exiting.");
            process::exit(1);
        },
    );

    log::info!(
        "Running CRUD benchmark: warmup {}, {} runs of {} entities, store {:?}",
        config.warmup_size,
        config.runs,
        config.batch_size,
        config.location
    );

    if let Err(e) = run(config) {
        log::error!("Benchmark aborted: {e:#}");
        process::exit(1);
    }
}
