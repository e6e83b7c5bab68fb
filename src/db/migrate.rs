//! Schema migrations.
//!
//! Each migration is applied at most once; applied versions are recorded in
//! the `log` table with operation `migration_applied`, the same table the
//! audit trail uses.

use crate::db::store::{LEGACY_STORAGE_KEY, STORAGE_KEY};
use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension, params};

type Migration = (&'static str, &'static str, fn(&Connection) -> rusqlite::Result<()>);

const MIGRATIONS: &[Migration] = &[
    (
        "20250301_0001_create_kv_store",
        "Created kv_store table for state snapshots",
        create_kv_store,
    ),
    (
        "20250301_0002_index_log_operation",
        "Indexed log table by operation",
        index_log_operation,
    ),
    (
        "20250412_0003_rename_legacy_snapshot_key",
        "Moved legacy snapshot key to the current key",
        rename_legacy_snapshot_key,
    ),
];

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

fn create_kv_store(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS kv_store (
            key        TEXT PRIMARY KEY,
            value      TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
}

fn index_log_operation(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("CREATE INDEX IF NOT EXISTS idx_log_operation ON log(operation);")
}

/// Snapshots written under the old key are moved, never overwriting a
/// snapshot already stored under the current key.
fn rename_legacy_snapshot_key(conn: &Connection) -> rusqlite::Result<()> {
    let current: Option<String> = conn
        .query_row(
            "SELECT key FROM kv_store WHERE key = ?1",
            [STORAGE_KEY],
            |row| row.get(0),
        )
        .optional()?;

    if current.is_none() {
        conn.execute(
            "UPDATE kv_store SET key = ?1 WHERE key = ?2",
            params![STORAGE_KEY, LEGACY_STORAGE_KEY],
        )?;
    } else {
        conn.execute("DELETE FROM kv_store WHERE key = ?1", [LEGACY_STORAGE_KEY])?;
    }
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> rusqlite::Result<bool> {
    let mut chk = conn.prepare_cached(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Public entry point: run all pending migrations.
/// Returns the versions applied by this call.
///
/// Called by `db::initialize::init_db`.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut applied = Vec::new();

    for (version, description, apply) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }

        apply(conn).map_err(|e| AppError::Migration(format!("{}: {}", version, e)))?;

        conn.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (?1, 'migration_applied', ?2, ?3)",
            params![chrono::Local::now().to_rfc3339(), *version, *description],
        )?;

        applied.push(*version);
    }

    Ok(applied)
}

/// Versions recorded as applied, oldest first.
pub fn applied_versions(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
