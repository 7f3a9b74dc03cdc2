//! SQLite storage bootstrap for saved favorites.
//!
//! # Responsibility
//! - Open and configure the SQLite file backing saved favorites.
//! - Migrate the favorites schema and verify its shape before use.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Restaurant/menu data is not read or written before the schema is
//!   migrated and verified.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_at, open_db_in_memory, IN_MEMORY_PATH};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or preparing the favorites database.
#[derive(Debug)]
pub enum DbError {
    /// Connection or pragma failure outside any migration step.
    Sqlite(rusqlite::Error),
    /// Migration `version` failed; nothing from that step was committed.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file was written by a newer build.
    UnsupportedSchemaVersion { db_version: u32, latest_supported: u32 },
    /// A migrated database lacks a column the favorites store reads.
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "favorites database error: {err}"),
            Self::Migration { version, source } => {
                write!(f, "favorites schema migration {version} failed: {source}")
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "favorites schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::MissingColumn { table, column } => {
                write!(f, "favorites schema is missing column {table}.{column}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::MissingColumn { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
