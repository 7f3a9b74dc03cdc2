//! Favorites schema migrations.
//!
//! # Responsibility
//! - Bring a database up to the favorites schema, one version per step.
//! - Check that the tables and columns the store queries are present.
//!
//! # Invariants
//! - Each step commits its DDL together with its `user_version` bump.
//! - A failed step leaves the database at the previous version.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Schema steps by version, oldest first.
const STEPS: &[(u32, &str)] = &[(1, include_str!("0001_favorites.sql"))];

/// Columns the restaurant store reads and writes, per table.
const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("restaurants", &["uuid", "name", "created_at"]),
    (
        "menus",
        &["uuid", "restaurant_uuid", "name", "price", "position"],
    ),
];

/// Returns the newest schema version this build can write.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |(version, _)| *version)
}

/// Migrates `conn` to [`latest_version`] and verifies the resulting schema.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let latest = latest_version();
    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }

    for &(version, sql) in STEPS.iter().filter(|(version, _)| *version > current) {
        run_step(conn, version, sql).map_err(|source| DbError::Migration { version, source })?;
        info!("event=db_migrate module=db status=ok version={version}");
    }

    verify_schema(conn)
}

fn run_step(conn: &mut Connection, version: u32, sql: &str) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(sql)?;
    tx.pragma_update(None, "user_version", version)?;
    tx.commit()
}

fn verify_schema(conn: &Connection) -> DbResult<()> {
    for &(table, columns) in REQUIRED_COLUMNS {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
        let present = stmt
            .query_map([], |row| row.get::<_, String>("name"))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        let missing = columns
            .iter()
            .find(|&&column| !present.iter().any(|name| name == column));
        if let Some(&column) = missing {
            return Err(DbError::MissingColumn { table, column });
        }
    }
    Ok(())
}
