//! Persistence and configuration error types.

use thiserror::Error;

/// Failures reported by the DAO layer.
#[derive(Error, Debug)]
pub enum DaoError {
    /// Any failure from SQLite itself: constraint violation, I/O, bad SQL.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// No row with the given id exists.
    #[error("No row with id {id} in table '{table}'")]
    NotFound { table: &'static str, id: String },

    /// An update was requested for an entity that has no id yet.
    #[error("Entity for table '{table}' has no id")]
    MissingId { table: &'static str },
}

/// Invalid benchmark configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}
