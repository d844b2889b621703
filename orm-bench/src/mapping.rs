//! Table mappings for the benchmark entities.

use crate::dao::Entity;
use perf_core::constants::{MINIMAL_ENTITY_TABLE, SIMPLE_ENTITY_NOT_NULL_TABLE};
use perf_core::types::{MinimalEntity, SimpleEntityNotNull};
use rusqlite::{Row, ToSql};

impl Entity for SimpleEntityNotNull {
    type Id = i64;

    const TABLE: &'static str = SIMPLE_ENTITY_NOT_NULL_TABLE;
    const ID_COLUMN: &'static str = "_id";
    const COLUMNS: &'static [&'static str] = &[
        "SIMPLE_BOOLEAN",
        "SIMPLE_BYTE",
        "SIMPLE_SHORT",
        "SIMPLE_INT",
        "SIMPLE_LONG",
        "SIMPLE_FLOAT",
        "SIMPLE_DOUBLE",
        "SIMPLE_STRING",
        "SIMPLE_BYTE_ARRAY",
    ];
    const CREATE_TABLE: &'static str = "CREATE TABLE IF NOT EXISTS SIMPLE_ENTITY_NOT_NULL (
        _id INTEGER PRIMARY KEY NOT NULL,
        SIMPLE_BOOLEAN INTEGER NOT NULL,
        SIMPLE_BYTE INTEGER NOT NULL,
        SIMPLE_SHORT INTEGER NOT NULL,
        SIMPLE_INT INTEGER NOT NULL,
        SIMPLE_LONG INTEGER NOT NULL,
        SIMPLE_FLOAT REAL NOT NULL,
        SIMPLE_DOUBLE REAL NOT NULL,
        SIMPLE_STRING TEXT NOT NULL,
        SIMPLE_BYTE_ARRAY BLOB NOT NULL
    );";

    fn id(&self) -> Option<i64> {
        Some(self.id)
    }

    fn bind_values(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.simple_boolean as &dyn ToSql,
            &self.simple_byte,
            &self.simple_short,
            &self.simple_int,
            &self.simple_long,
            &self.simple_float,
            &self.simple_double,
            &self.simple_string,
            &self.simple_byte_array,
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            simple_boolean: row.get(1)?,
            simple_byte: row.get(2)?,
            simple_short: row.get(3)?,
            simple_int: row.get(4)?,
            simple_long: row.get(5)?,
            simple_float: row.get(6)?,
            simple_double: row.get(7)?,
            simple_string: row.get(8)?,
            simple_byte_array: row.get(9)?,
        })
    }
}

impl Entity for MinimalEntity {
    type Id = i64;

    const TABLE: &'static str = MINIMAL_ENTITY_TABLE;
    const ID_COLUMN: &'static str = "_id";
    const COLUMNS: &'static [&'static str] = &[];
    const CREATE_TABLE: &'static str =
        "CREATE TABLE IF NOT EXISTS MINIMAL_ENTITY (_id INTEGER PRIMARY KEY AUTOINCREMENT);";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn bind_values(&self) -> Vec<&dyn ToSql> {
        Vec::new()
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::Dao;
    use rusqlite::Connection;

    #[test]
    fn ddl_matches_table_names() {
        assert!(SimpleEntityNotNull::CREATE_TABLE.contains(SimpleEntityNotNull::TABLE));
        assert!(MinimalEntity::CREATE_TABLE.contains(MinimalEntity::TABLE));
        for column in SimpleEntityNotNull::COLUMNS {
            assert!(
                SimpleEntityNotNull::CREATE_TABLE.contains(column),
                "missing column {column}"
            );
        }
    }

    #[test]
    fn bind_values_cover_every_column() {
        let entity = SimpleEntityNotNull::from_seed(0);
        assert_eq!(entity.bind_values().len(), SimpleEntityNotNull::COLUMNS.len());
    }

    #[test]
    fn extreme_values_survive_a_round_trip() {
        let conn = Connection::open_in_memory().unwrap();
        let dao = Dao::<SimpleEntityNotNull>::new(&conn);
        dao.create_table_if_not_exists().unwrap();

        let entity = SimpleEntityNotNull {
            id: 1,
            simple_boolean: true,
            simple_byte: i8::MAX,
            simple_short: i16::MAX,
            simple_int: i32::MAX,
            simple_long: i64::MAX,
            simple_float: f32::MAX,
            simple_double: f64::MAX,
            simple_string: "greenrobot greenDAO".to_string(),
            simple_byte_array: vec![42, 0xEF, 23, 0, 127, 0x80],
        };
        dao.create(&entity).unwrap();

        assert_eq!(dao.query_for_id(&1).unwrap(), entity);
    }

    #[test]
    fn minimal_entity_gets_generated_key() {
        let conn = Connection::open_in_memory().unwrap();
        let dao = Dao::<MinimalEntity>::new(&conn);
        dao.create_table_if_not_exists().unwrap();

        dao.create(&MinimalEntity::new()).unwrap();
        dao.create(&MinimalEntity::new()).unwrap();

        let ids: Vec<Option<i64>> = dao
            .query_for_all()
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
    }

    #[test]
    fn minimal_entity_update_is_valid_sql() {
        let conn = Connection::open_in_memory().unwrap();
        let dao = Dao::<MinimalEntity>::new(&conn);
        dao.create_table_if_not_exists().unwrap();
        dao.create(&MinimalEntity::new()).unwrap();

        dao.update(&MinimalEntity { id: Some(1) }).unwrap();
    }
}
