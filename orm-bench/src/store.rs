//! Ownership of the embedded database used by one benchmark run.
//!
//! A [`DbHelper`] opens either a private in-memory database or a database
//! file. File databases are deleted before opening, so every run starts from
//! an empty store, and again when the helper is dropped.

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// SQLite writes these next to the main database file.
const SIDE_FILE_SUFFIXES: [&str; 3] = ["-wal", "-shm", "-journal"];

/// Where the benchmark database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    InMemory,
    File(PathBuf),
}

/// Connection settings applied right after opening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub journal_mode: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            journal_mode: "WAL".to_string(),
        }
    }
}

pub struct DbHelper {
    // Declared before `_files` so the connection closes before the files go.
    conn: Connection,
    location: StoreLocation,
    _files: Option<DatabaseFiles>,
}

impl DbHelper {
    pub fn open(location: StoreLocation, options: &StoreOptions) -> Result<Self> {
        let (conn, files) = match &location {
            StoreLocation::InMemory => (
                Connection::open_in_memory().context("open in-memory SQLite")?,
                None,
            ),
            StoreLocation::File(path) => {
                delete_database(path)
                    .with_context(|| format!("delete stale database {}", path.display()))?;
                let files = DatabaseFiles { path: path.clone() };
                let conn = Connection::open(path)
                    .with_context(|| format!("open SQLite database {}", path.display()))?;
                (conn, Some(files))
            }
        };
        configure_connection(&conn, options)?;
        log::debug!("Opened benchmark store {:?}", location);

        Ok(Self {
            conn,
            location,
            _files: files,
        })
    }

    pub fn in_memory() -> Result<Self> {
        Self::open(StoreLocation::InMemory, &StoreOptions::default())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }
}

/// Deletes the database file and its side files when dropped.
struct DatabaseFiles {
    path: PathBuf,
}

impl Drop for DatabaseFiles {
    fn drop(&mut self) {
        match delete_database(&self.path) {
            Ok(()) => log::debug!("Deleted benchmark database {}", self.path.display()),
            Err(e) => log::warn!(
                "Failed to delete benchmark database {}: {e}",
                self.path.display()
            ),
        }
    }
}

/// Configure a connection for benchmarking.
pub fn configure_connection(conn: &Connection, options: &StoreOptions) -> Result<()> {
    let journal_mode: String = conn
        .query_row(
            &format!("PRAGMA journal_mode = {}", options.journal_mode),
            [],
            |row| row.get(0),
        )
        .with_context(|| format!("set journal_mode = {}", options.journal_mode))?;
    conn.execute_batch(
        "PRAGMA synchronous = NORMAL;
         PRAGMA temp_store = MEMORY;",
    )
    .context("configure connection")?;
    log::debug!("SQLite journal_mode is {journal_mode}");
    Ok(())
}

/// Remove a database file and its side files. Missing files are not an error.
pub fn delete_database(path: &Path) -> io::Result<()> {
    remove_if_exists(path)?;
    for suffix in SIDE_FILE_SUFFIXES {
        let mut side = path.as_os_str().to_owned();
        side.push(suffix);
        remove_if_exists(Path::new(&side))?;
    }
    Ok(())
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
