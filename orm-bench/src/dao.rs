//! Generic data-access object over a SQLite connection.
//!
//! An [`Entity`] describes how one Rust type maps onto one table. A [`Dao`]
//! renders the CRUD statements for that mapping once and executes them
//! through the connection's prepared-statement cache.
//!
//! Semantics worth knowing about:
//! - [`Dao::create`] takes the entity by shared reference, so a key generated
//!   by SQLite is never written back into the caller's value.
//! - Every query constructs fresh owned values; there is no identity map.

use crate::error::DaoError;
use rusqlite::types::FromSql;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row, ToSql};
use std::fmt::Display;
use std::marker::PhantomData;

/// Mapping between a Rust type and a table.
pub trait Entity: Sized {
    type Id: ToSql + FromSql + Display;

    const TABLE: &'static str;
    const ID_COLUMN: &'static str;
    /// Data columns, excluding the id, in the order used by
    /// [`Entity::bind_values`] and [`Entity::from_row`].
    const COLUMNS: &'static [&'static str];
    /// `CREATE TABLE IF NOT EXISTS ...` statement for the table.
    const CREATE_TABLE: &'static str;

    /// Row key, or `None` to let the store generate one on insert.
    fn id(&self) -> Option<Self::Id>;

    /// Values of [`Entity::COLUMNS`], in order.
    fn bind_values(&self) -> Vec<&dyn ToSql>;

    /// Build a value from a row laid out as `id, COLUMNS...`.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// SQL text rendered once per DAO.
#[derive(Debug, Clone)]
struct Statements {
    insert: String,
    update: String,
    select_all: String,
    select_by_id: String,
    count: String,
}

impl Statements {
    fn render<T: Entity>() -> Self {
        let all_columns: Vec<&str> = std::iter::once(T::ID_COLUMN)
            .chain(T::COLUMNS.iter().copied())
            .collect();
        let column_list = all_columns.join(", ");
        let placeholders = (1..=all_columns.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");

        let id_param = T::COLUMNS.len() + 1;
        // Id-only tables still need a syntactically valid SET clause.
        let assignments = if T::COLUMNS.is_empty() {
            format!("{} = ?{id_param}", T::ID_COLUMN)
        } else {
            T::COLUMNS
                .iter()
                .enumerate()
                .map(|(i, col)| format!("{col} = ?{}", i + 1))
                .collect::<Vec<_>>()
                .join(", ")
        };

        Self {
            insert: format!(
                "INSERT INTO {} ({column_list}) VALUES ({placeholders})",
                T::TABLE
            ),
            update: format!(
                "UPDATE {} SET {assignments} WHERE {} = ?{id_param}",
                T::TABLE,
                T::ID_COLUMN
            ),
            select_all: format!(
                "SELECT {column_list} FROM {} ORDER BY {}",
                T::TABLE,
                T::ID_COLUMN
            ),
            select_by_id: format!(
                "SELECT {column_list} FROM {} WHERE {} = ?1",
                T::TABLE,
                T::ID_COLUMN
            ),
            count: format!("SELECT COUNT(*) FROM {}", T::TABLE),
        }
    }
}

/// CRUD access to the table of `T`.
pub struct Dao<'c, T> {
    conn: &'c Connection,
    sql: Statements,
    _entity: PhantomData<fn() -> T>,
}

impl<'c, T: Entity> Dao<'c, T> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            conn,
            sql: Statements::render::<T>(),
            _entity: PhantomData,
        }
    }

    pub fn connection(&self) -> &'c Connection {
        self.conn
    }

    pub fn create_table_if_not_exists(&self) -> Result<(), DaoError> {
        self.conn.execute_batch(T::CREATE_TABLE)?;
        Ok(())
    }

    /// Insert one row. A `None` id binds NULL so SQLite assigns the rowid.
    pub fn create(&self, entity: &T) -> Result<(), DaoError> {
        let id = entity.id();
        let mut values: Vec<&dyn ToSql> = Vec::with_capacity(T::COLUMNS.len() + 1);
        values.push(&id);
        values.extend(entity.bind_values());

        let mut stmt = self.conn.prepare_cached(&self.sql.insert)?;
        stmt.execute(params_from_iter(values))?;
        Ok(())
    }

    /// Overwrite every data column of the row with the entity's id.
    pub fn update(&self, entity: &T) -> Result<(), DaoError> {
        let id = entity.id().ok_or(DaoError::MissingId { table: T::TABLE })?;
        let mut values = entity.bind_values();
        values.push(&id);

        let mut stmt = self.conn.prepare_cached(&self.sql.update)?;
        let changed = stmt.execute(params_from_iter(values))?;
        if changed == 0 {
            return Err(DaoError::NotFound {
                table: T::TABLE,
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Load every row, ordered by id.
    pub fn query_for_all(&self) -> Result<Vec<T>, DaoError> {
        let mut stmt = self.conn.prepare_cached(&self.sql.select_all)?;
        let rows = stmt
            .query_map([], |row| T::from_row(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn query_for_id(&self, id: &T::Id) -> Result<T, DaoError> {
        let mut stmt = self.conn.prepare_cached(&self.sql.select_by_id)?;
        stmt.query_row([id], |row| T::from_row(row))
            .optional()?
            .ok_or_else(|| DaoError::NotFound {
                table: T::TABLE,
                id: id.to_string(),
            })
    }

    pub fn count_of(&self) -> Result<usize, DaoError> {
        let count: i64 = self.conn.query_row(&self.sql.count, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Run `tasks` inside a single transaction.
    ///
    /// Commits when `tasks` returns `Ok`, rolls back otherwise. When the
    /// connection is already inside a transaction, `tasks` joins it.
    pub fn call_batch_tasks<R, F>(&self, tasks: F) -> Result<R, DaoError>
    where
        F: FnOnce() -> Result<R, DaoError>,
    {
        if !self.conn.is_autocommit() {
            return tasks();
        }

        let tx = self.conn.unchecked_transaction()?;
        let result = tasks()?;
        tx.commit()?;
        Ok(result)
    }

    /// Execute raw SQL outside the entity mapping.
    pub fn execute_raw(&self, sql: &str) -> Result<(), DaoError> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perf_core::types::{MinimalEntity, SimpleEntityNotNull};

    fn open() -> Connection {
        Connection::open_in_memory().expect("open in-memory SQLite")
    }

    #[test]
    fn rendered_statements_use_all_columns() {
        let sql = Statements::render::<SimpleEntityNotNull>();
        assert!(sql.insert.starts_with("INSERT INTO SIMPLE_ENTITY_NOT_NULL (_id, "));
        assert!(sql.insert.ends_with("?10)"));
        assert!(sql.update.ends_with("WHERE _id = ?10"));
        assert!(sql.select_all.ends_with("ORDER BY _id"));
    }

    #[test]
    fn create_then_query_by_id() {
        let conn = open();
        let dao = Dao::<SimpleEntityNotNull>::new(&conn);
        dao.create_table_if_not_exists().unwrap();

        let entity = SimpleEntityNotNull::from_seed(5);
        dao.create(&entity).unwrap();

        let loaded = dao.query_for_id(&5).unwrap();
        assert_eq!(loaded, entity);
    }

    #[test]
    fn update_missing_row_is_not_found() {
        let conn = open();
        let dao = Dao::<SimpleEntityNotNull>::new(&conn);
        dao.create_table_if_not_exists().unwrap();

        let err = dao.update(&SimpleEntityNotNull::from_seed(1)).unwrap_err();
        assert!(matches!(err, DaoError::NotFound { .. }), "got {err:?}");
    }

    #[test]
    fn update_without_id_is_rejected() {
        let conn = open();
        let dao = Dao::<MinimalEntity>::new(&conn);
        dao.create_table_if_not_exists().unwrap();

        let err = dao.update(&MinimalEntity::new()).unwrap_err();
        assert!(matches!(err, DaoError::MissingId { .. }), "got {err:?}");
    }

    #[test]
    fn query_for_unknown_id_is_not_found() {
        let conn = open();
        let dao = Dao::<SimpleEntityNotNull>::new(&conn);
        dao.create_table_if_not_exists().unwrap();

        let err = dao.query_for_id(&404).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No row with id 404 in table 'SIMPLE_ENTITY_NOT_NULL'"
        );
    }

    #[test]
    fn duplicate_key_is_a_sqlite_error() {
        let conn = open();
        let dao = Dao::<SimpleEntityNotNull>::new(&conn);
        dao.create_table_if_not_exists().unwrap();

        let entity = SimpleEntityNotNull::from_seed(3);
        dao.create(&entity).unwrap();
        assert!(matches!(dao.create(&entity), Err(DaoError::Sqlite(_))));
    }

    #[test]
    fn failed_batch_rolls_back() {
        let conn = open();
        let dao = Dao::<SimpleEntityNotNull>::new(&conn);
        dao.create_table_if_not_exists().unwrap();

        let result = dao.call_batch_tasks(|| {
            dao.create(&SimpleEntityNotNull::from_seed(1))?;
            dao.create(&SimpleEntityNotNull::from_seed(2))?;
            dao.create(&SimpleEntityNotNull::from_seed(1))
        });

        assert!(result.is_err());
        assert_eq!(dao.count_of().unwrap(), 0);
        assert!(conn.is_autocommit());
    }

    #[test]
    fn nested_batch_joins_outer_transaction() {
        let conn = open();
        let dao = Dao::<SimpleEntityNotNull>::new(&conn);
        dao.create_table_if_not_exists().unwrap();

        let inserted = dao
            .call_batch_tasks(|| {
                dao.create(&SimpleEntityNotNull::from_seed(1))?;
                dao.call_batch_tasks(|| dao.create(&SimpleEntityNotNull::from_seed(2)))?;
                dao.count_of()
            })
            .unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(dao.count_of().unwrap(), 2);
    }

    #[test]
    fn execute_raw_clears_table() {
        let conn = open();
        let dao = Dao::<SimpleEntityNotNull>::new(&conn);
        dao.create_table_if_not_exists().unwrap();
        for entity in SimpleEntityNotNull::batch(4) {
            dao.create(&entity).unwrap();
        }

        dao.execute_raw("DELETE FROM SIMPLE_ENTITY_NOT_NULL").unwrap();
        assert_eq!(dao.count_of().unwrap(), 0);
    }
}
