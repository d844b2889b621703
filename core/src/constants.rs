//! Benchmark sizing and schema names shared by the runner and its tests.

/// Entities per timed run.
pub const BATCH_SIZE: usize = 10_000;

/// Timed repetitions after the warmup pass.
pub const RUNS: usize = 8;

/// Entities used by the single warmup pass.
pub const WARMUP_SIZE: usize = 100;

/// One-by-one phases operate on `count / ONE_BY_ONE_DIVISOR` entities.
pub const ONE_BY_ONE_DIVISOR: usize = 10;

/// Default on-disk database name.
pub const DEFAULT_DB_NAME: &str = "test-db";

pub const SIMPLE_ENTITY_NOT_NULL_TABLE: &str = "SIMPLE_ENTITY_NOT_NULL";
pub const MINIMAL_ENTITY_TABLE: &str = "MINIMAL_ENTITY";

/// Log target used for every timing line.
pub const LOG_TARGET: &str = "DAO";
