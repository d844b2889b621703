//! Benchmark runner: drives the fixed CRUD phase sequence through the DAO.
//!
//! One full suite is a warmup pass followed by `runs` timed passes. Each pass
//! generates a fresh entity list and times, in order:
//!
//! | Phase               | Rows      | Transaction          |
//! |---------------------|-----------|----------------------|
//! | Insert one-by-one   | n / 10    | one per row          |
//! | Update one-by-one   | n / 10    | one per row          |
//! | Delete all          | all       | one                  |
//! | Create batch        | n         | one for all rows     |
//! | Update batch        | n         | one for all rows     |
//! | Load all            | n         | none                 |
//! | Access properties   | n         | none (in memory)     |
//!
//! Any failure aborts the suite; there is no retry and no partial report.

use crate::config::BenchConfig;
use crate::dao::Dao;
use crate::report::{BenchReport, Measurement, Operation, RunLabel, LAYER_NAME};
use crate::store::DbHelper;
use anyhow::{ensure, Context, Result};
use perf_core::constants::{LOG_TARGET, ONE_BY_ONE_DIVISOR, SIMPLE_ENTITY_NOT_NULL_TABLE};
use perf_core::types::{MinimalEntity, SimpleEntityNotNull};
use std::hint::black_box;
use std::ptr;
use std::time::{Duration, Instant};

/// Fields read per entity by [`access_properties`], id included.
pub const ENTITY_FIELD_COUNT: usize = 10;

/// Outcome of [`BenchmarkRunner::run_semantics_check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticsReport {
    /// Key SQLite generated for the probe row.
    pub generated_id: i64,
    /// Whether the inserted value had its id filled in by `create`.
    pub key_written_back: bool,
    /// Whether the inserted value and both loaded values are separate instances.
    pub distinct_instances: bool,
}

pub struct BenchmarkRunner {
    helper: DbHelper,
    config: BenchConfig,
}

impl BenchmarkRunner {
    /// Open the configured store and create the benchmark table.
    pub fn new(config: BenchConfig) -> Result<Self> {
        let helper = DbHelper::open(config.location.clone(), &config.store)?;
        Dao::<SimpleEntityNotNull>::new(helper.connection())
            .create_table_if_not_exists()
            .context("create benchmark table")?;
        Ok(Self { helper, config })
    }

    pub fn helper(&self) -> &DbHelper {
        &self.helper
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    fn dao(&self) -> Dao<'_, SimpleEntityNotNull> {
        Dao::new(self.helper.connection())
    }

    /// Warmup, then `runs` timed passes of `batch_size` entities.
    pub fn run_full_suite(&self) -> Result<BenchReport> {
        let mut report = BenchReport::new();
        if !self.config.run_performance_tests {
            log::info!(target: LOG_TARGET, "{LAYER_NAME} performance tests are disabled.");
            return Ok(report);
        }

        self.run_tests(RunLabel::Warmup, self.config.warmup_size, &mut report)?;

        for i in 0..self.config.runs {
            self.delete_all(RunLabel::Run(i), &mut report)?;
            self.run_tests(RunLabel::Run(i), self.config.batch_size, &mut report)?;
        }
        self.delete_all(RunLabel::Suite, &mut report)?;
        log::info!(target: LOG_TARGET, "---------------End");

        Ok(report)
    }

    /// One pass of the phase sequence over `entity_count` fresh entities.
    pub fn run_tests(
        &self,
        run: RunLabel,
        entity_count: usize,
        report: &mut BenchReport,
    ) -> Result<()> {
        log::info!(target: LOG_TARGET, "---------------Start: {entity_count}");

        let list = SimpleEntityNotNull::batch(entity_count);
        let dao = self.dao();

        self.run_one_by_one(run, &list, entity_count / ONE_BY_ONE_DIVISOR, report)?;

        self.delete_all(run, report)?;

        let start = Instant::now();
        dao.call_batch_tasks(|| {
            for entity in &list {
                dao.create(entity)?;
            }
            Ok(())
        })
        .context("batch create")?;
        record(report, run, Operation::CreateBatch, list.len(), start.elapsed());

        let start = Instant::now();
        dao.call_batch_tasks(|| {
            for entity in &list {
                dao.update(entity)?;
            }
            Ok(())
        })
        .context("batch update")?;
        record(report, run, Operation::UpdateBatch, list.len(), start.elapsed());

        let start = Instant::now();
        let reloaded = dao.query_for_all().context("load all")?;
        record(report, run, Operation::LoadAll, reloaded.len(), start.elapsed());

        let start = Instant::now();
        access_properties(&reloaded);
        record(
            report,
            run,
            Operation::AccessProperties,
            reloaded.len(),
            start.elapsed(),
        );

        log::info!(target: LOG_TARGET, "---------------End: {entity_count}");
        Ok(())
    }

    /// Timed single-row inserts, then single-row updates, of the first `count` entities.
    pub fn run_one_by_one(
        &self,
        run: RunLabel,
        list: &[SimpleEntityNotNull],
        count: usize,
        report: &mut BenchReport,
    ) -> Result<()> {
        let dao = self.dao();
        let subset = &list[..count.min(list.len())];

        let start = Instant::now();
        for entity in subset {
            dao.create(entity)
                .with_context(|| format!("insert entity {}", entity.id))?;
        }
        record(report, run, Operation::InsertOneByOne, subset.len(), start.elapsed());

        let start = Instant::now();
        for entity in subset {
            dao.update(entity)
                .with_context(|| format!("update entity {}", entity.id))?;
        }
        record(report, run, Operation::UpdateOneByOne, subset.len(), start.elapsed());

        Ok(())
    }

    /// Timed raw `DELETE` of every benchmark row.
    pub fn delete_all(&self, run: RunLabel, report: &mut BenchReport) -> Result<()> {
        let start = Instant::now();
        self.dao()
            .execute_raw(&format!("DELETE FROM {SIMPLE_ENTITY_NOT_NULL_TABLE}"))
            .context("delete all")?;
        record(report, run, Operation::DeleteAll, 0, start.elapsed());
        Ok(())
    }

    /// Insert one [`MinimalEntity`] and check how the layer treats keys and instances.
    ///
    /// Expected: the inserted value keeps `id == None`, and the value from
    /// `query_for_all` and the one from `query_for_id` are two separate
    /// instances carrying the same generated id.
    pub fn run_semantics_check(&self) -> Result<SemanticsReport> {
        let dao = Dao::<MinimalEntity>::new(self.helper.connection());
        dao.create_table_if_not_exists()
            .context("create minimal entity table")?;

        let data = MinimalEntity::new();
        dao.create(&data).context("insert minimal entity")?;
        ensure!(
            data.id.is_none(),
            "create wrote a key back into the caller's entity"
        );

        let data2 = dao
            .query_for_all()?
            .into_iter()
            .next()
            .context("no minimal entity row after insert")?;
        let generated_id = data2.id.context("loaded minimal entity has no id")?;
        let data3 = dao.query_for_id(&generated_id)?;

        let distinct_instances = !ptr::eq(&data, &data2) && !ptr::eq(&data2, &data3);
        ensure!(distinct_instances, "loads returned a shared instance");
        ensure!(
            data2.id == data3.id,
            "load-all id {:?} differs from load-by-id id {:?}",
            data2.id,
            data3.id
        );

        log::info!(
            target: LOG_TARGET,
            "{LAYER_NAME}: generated key {generated_id} not written back; loads are distinct instances"
        );

        Ok(SemanticsReport {
            generated_id,
            key_written_back: data.id.is_some(),
            distinct_instances,
        })
    }
}

/// Read every field of every entity once. Returns the number of fields read.
pub fn access_properties(entities: &[SimpleEntityNotNull]) -> usize {
    for entity in entities {
        black_box(entity.id);
        black_box(entity.simple_boolean);
        black_box(entity.simple_byte);
        black_box(entity.simple_short);
        black_box(entity.simple_int);
        black_box(entity.simple_long);
        black_box(entity.simple_float);
        black_box(entity.simple_double);
        black_box(entity.simple_string.as_str());
        black_box(entity.simple_byte_array.as_slice());
    }
    entities.len() * ENTITY_FIELD_COUNT
}

fn record(
    report: &mut BenchReport,
    run: RunLabel,
    operation: Operation,
    count: usize,
    elapsed: Duration,
) {
    let measurement = Measurement {
        run,
        operation,
        count,
        elapsed,
    };
    log::info!(target: LOG_TARGET, "{}", measurement.log_line());
    report.push(measurement);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreLocation;

    fn small_config() -> BenchConfig {
        BenchConfig {
            location: StoreLocation::InMemory,
            batch_size: 50,
            runs: 2,
            warmup_size: 20,
            ..BenchConfig::default()
        }
    }

    #[test]
    fn run_tests_records_phases_in_order() {
        let runner = BenchmarkRunner::new(small_config()).unwrap();
        let mut report = BenchReport::new();
        runner.run_tests(RunLabel::Run(0), 50, &mut report).unwrap();

        let phases: Vec<(Operation, usize)> = report
            .measurements
            .iter()
            .map(|m| (m.operation, m.count))
            .collect();
        assert_eq!(
            phases,
            vec![
                (Operation::InsertOneByOne, 5),
                (Operation::UpdateOneByOne, 5),
                (Operation::DeleteAll, 0),
                (Operation::CreateBatch, 50),
                (Operation::UpdateBatch, 50),
                (Operation::LoadAll, 50),
                (Operation::AccessProperties, 50),
            ]
        );
    }

    #[test]
    fn run_tests_leaves_all_rows_stored() {
        let runner = BenchmarkRunner::new(small_config()).unwrap();
        let mut report = BenchReport::new();
        runner.run_tests(RunLabel::Warmup, 30, &mut report).unwrap();

        assert_eq!(runner.dao().count_of().unwrap(), 30);
    }

    #[test]
    fn repeated_run_without_delete_fails() {
        let runner = BenchmarkRunner::new(small_config()).unwrap();
        let mut report = BenchReport::new();
        runner.run_tests(RunLabel::Run(0), 20, &mut report).unwrap();

        // The one-by-one phase collides with the rows of the previous pass.
        let err = runner.run_tests(RunLabel::Run(1), 20, &mut report).unwrap_err();
        assert!(format!("{err:#}").contains("insert entity 0"), "{err:#}");
    }

    #[test]
    fn disabled_suite_records_nothing() {
        let config = BenchConfig {
            run_performance_tests: false,
            ..small_config()
        };
        let runner = BenchmarkRunner::new(config).unwrap();
        assert!(runner.run_full_suite().unwrap().is_empty());
    }

    #[test]
    fn access_properties_reads_every_field() {
        let list = SimpleEntityNotNull::batch(7);
        assert_eq!(access_properties(&list), 70);
        assert_eq!(access_properties(&[]), 0);
    }

    #[test]
    fn one_by_one_count_is_capped_by_list() {
        let runner = BenchmarkRunner::new(small_config()).unwrap();
        let mut report = BenchReport::new();
        let list = SimpleEntityNotNull::batch(3);
        runner
            .run_one_by_one(RunLabel::Warmup, &list, 10, &mut report)
            .unwrap();

        assert_eq!(report.measurements[0].count, 3);
        assert_eq!(runner.dao().count_of().unwrap(), 3);
    }
}
