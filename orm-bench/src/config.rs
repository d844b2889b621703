//! Benchmark configuration read from `ORM_BENCH_*` environment variables.
//!
//! A `.env` file in the working directory is loaded first when present.
//! Every variable is optional; see [`BenchConfig::default`] for the values
//! used when one is unset.

use crate::error::ConfigError;
use crate::store::{StoreLocation, StoreOptions};
use log::LevelFilter;
use perf_core::constants::{BATCH_SIZE, DEFAULT_DB_NAME, RUNS, WARMUP_SIZE};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_RUN_PERFORMANCE_TESTS: &str = "ORM_BENCH_RUN_PERFORMANCE_TESTS";
pub const ENV_IN_MEMORY: &str = "ORM_BENCH_IN_MEMORY";
pub const ENV_DB_PATH: &str = "ORM_BENCH_DB_PATH";
pub const ENV_BATCH_SIZE: &str = "ORM_BENCH_BATCH_SIZE";
pub const ENV_RUNS: &str = "ORM_BENCH_RUNS";
pub const ENV_WARMUP_SIZE: &str = "ORM_BENCH_WARMUP_SIZE";
pub const ENV_LOG_LEVEL: &str = "ORM_BENCH_LOG_LEVEL";
pub const ENV_LOG_FILE: &str = "ORM_BENCH_LOG_FILE";
pub const ENV_JOURNAL_MODE: &str = "ORM_BENCH_JOURNAL_MODE";
pub const ENV_REPORT_JSON: &str = "ORM_BENCH_REPORT_JSON";

const JOURNAL_MODES: [&str; 6] = ["DELETE", "TRUNCATE", "PERSIST", "MEMORY", "WAL", "OFF"];

#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    /// When false the full suite logs that it is disabled and does nothing.
    pub run_performance_tests: bool,
    pub location: StoreLocation,
    pub store: StoreOptions,
    pub batch_size: usize,
    pub runs: usize,
    pub warmup_size: usize,
    pub log_level: LevelFilter,
    pub log_file: Option<String>,
    pub report_json: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            run_performance_tests: true,
            location: StoreLocation::File(PathBuf::from(DEFAULT_DB_NAME)),
            store: StoreOptions::default(),
            batch_size: BATCH_SIZE,
            runs: RUNS,
            warmup_size: WARMUP_SIZE,
            log_level: LevelFilter::Info,
            log_file: None,
            report_json: false,
        }
    }
}

impl BenchConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => log::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => log::warn!("Ignoring unreadable .env file: {e}"),
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let in_memory = parse_var(&lookup, ENV_IN_MEMORY, parse_bool)?.unwrap_or(false);
        let location = if in_memory {
            StoreLocation::InMemory
        } else {
            let path = lookup(ENV_DB_PATH)
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DB_NAME.to_string());
            StoreLocation::File(PathBuf::from(path))
        };

        let journal_mode = match lookup(ENV_JOURNAL_MODE) {
            Some(raw) => parse_journal_mode(&raw)
                .map_err(|reason| invalid(ENV_JOURNAL_MODE, &raw, reason))?,
            None => defaults.store.journal_mode.clone(),
        };

        Ok(Self {
            run_performance_tests: parse_var(&lookup, ENV_RUN_PERFORMANCE_TESTS, parse_bool)?
                .unwrap_or(defaults.run_performance_tests),
            location,
            store: StoreOptions { journal_mode },
            batch_size: parse_var(&lookup, ENV_BATCH_SIZE, parse_count)?
                .unwrap_or(defaults.batch_size),
            runs: parse_var(&lookup, ENV_RUNS, parse_count)?.unwrap_or(defaults.runs),
            warmup_size: parse_var(&lookup, ENV_WARMUP_SIZE, parse_count)?
                .unwrap_or(defaults.warmup_size),
            log_level: parse_var(&lookup, ENV_LOG_LEVEL, parse_level)?
                .unwrap_or(defaults.log_level),
            log_file: lookup(ENV_LOG_FILE).filter(|f| !f.trim().is_empty()),
            report_json: parse_var(&lookup, ENV_REPORT_JSON, parse_bool)?
                .unwrap_or(defaults.report_json),
        })
    }
}

fn parse_var<F, T>(
    lookup: &F,
    var: &'static str,
    parse: fn(&str) -> Result<T, String>,
) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(raw) => parse(raw.trim())
            .map(Some)
            .map_err(|reason| invalid(var, &raw, reason)),
        None => Ok(None),
    }
}

fn invalid(var: &'static str, value: &str, reason: String) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason,
    }
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err("expected true or false".to_string()),
    }
}

fn parse_count(raw: &str) -> Result<usize, String> {
    raw.parse::<usize>()
        .map_err(|e| format!("expected a non-negative integer ({e})"))
}

fn parse_level(raw: &str) -> Result<LevelFilter, String> {
    LevelFilter::from_str(raw).map_err(|_| "expected off, error, warn, info, debug or trace".to_string())
}

fn parse_journal_mode(raw: &str) -> Result<String, String> {
    let mode = raw.trim().to_ascii_uppercase();
    if JOURNAL_MODES.contains(&mode.as_str()) {
        Ok(mode)
    } else {
        Err(format!("expected one of {}", JOURNAL_MODES.join(", ")))
    }
}
