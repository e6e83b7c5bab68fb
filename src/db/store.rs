//! Persistence gateway for the state snapshot.
//!
//! The whole `AppState` is stored as one JSON document under a single key;
//! reads and writes always move the full document.

use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::state::AppState;
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};

/// Key the snapshot is stored under.
pub const STORAGE_KEY: &str = "office_tracker_data_v2";

/// Key used by releases before the v2 snapshot layout.
pub const LEGACY_STORAGE_KEY: &str = "office_tracker_data";

pub trait StateStore {
    /// `Ok(None)` when nothing was stored yet; `Err` when the stored
    /// document cannot be read or decoded.
    fn load(&mut self) -> AppResult<Option<AppState>>;

    /// Replace the stored document.
    fn save(&mut self, state: &AppState) -> AppResult<()>;

    /// Append an audit line for a committed change. Stores without an audit
    /// trail ignore it.
    fn record(&mut self, _operation: &str, _target: &str, _message: &str) -> AppResult<()> {
        Ok(())
    }
}

/// SQLite-backed store (`kv_store` table).
pub struct SqliteStore {
    pool: DbPool,
    key: String,
}

impl SqliteStore {
    pub fn open(path: &str) -> AppResult<Self> {
        Ok(Self::from_pool(DbPool::new(path)?))
    }

    pub fn in_memory() -> AppResult<Self> {
        Ok(Self::from_pool(DbPool::in_memory()?))
    }

    pub fn from_pool(pool: DbPool) -> Self {
        Self {
            pool,
            key: STORAGE_KEY.to_string(),
        }
    }

    pub fn conn(&self) -> &Connection {
        &self.pool.conn
    }

    /// Raw stored document, if any.
    pub fn raw_document(&self) -> AppResult<Option<String>> {
        let value = self
            .pool
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                [&self.key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Overwrite the stored document verbatim. Used to import snapshots and
    /// in tests to simulate corruption.
    pub fn write_raw_document(&mut self, doc: &str) -> AppResult<()> {
        self.pool.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![self.key, doc, Local::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

impl StateStore for SqliteStore {
    fn load(&mut self) -> AppResult<Option<AppState>> {
        match self.raw_document()? {
            Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, state: &AppState) -> AppResult<()> {
        let doc = serde_json::to_string(state)?;
        self.write_raw_document(&doc)
    }

    fn record(&mut self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        ttlog(&self.pool.conn, operation, target, message)
    }
}

/// In-process store holding the serialized document, so the JSON codec is
/// exercised exactly as with SQLite.
#[derive(Debug, Default)]
pub struct MemoryStore {
    doc: Option<String>,
    saves: usize,
    fail_saves: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(doc: impl Into<String>) -> Self {
        Self {
            doc: Some(doc.into()),
            ..Self::default()
        }
    }

    pub fn document(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves
    }

    /// Make every following `save` fail with an I/O error.
    pub fn fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }
}

impl StateStore for MemoryStore {
    fn load(&mut self) -> AppResult<Option<AppState>> {
        match &self.doc {
            Some(doc) => Ok(Some(serde_json::from_str(doc)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, state: &AppState) -> AppResult<()> {
        if self.fail_saves {
            return Err(std::io::Error::other("store is read-only").into());
        }
        self.doc = Some(serde_json::to_string(state)?);
        self.saves += 1;
        Ok(())
    }
}
