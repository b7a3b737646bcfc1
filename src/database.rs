use crate::dlog;
use crate::error::StoreError;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

pub const DEFAULT_STORAGE_KEY: &str = "workouts";

/// Single-key backing store for the serialized ledger.
///
/// Reads and writes are all-or-nothing; `read_all` returns `None` when
/// nothing was ever written.
pub trait Store {
    fn read_all(&self) -> Result<Option<String>, StoreError>;
    fn write_all(&mut self, value: &str) -> Result<(), StoreError>;
}

/// Key/value table in a SQLite file.
pub struct SqliteStore {
    conn: Connection,
    key: String,
}

impl SqliteStore {
    pub fn open(path: &Path, key: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        tracing::info!(path = %path.display(), key, "opened workout store");
        Self::with_connection(conn, key)
    }

    pub fn open_in_memory(key: &str) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?, key)
    }

    fn with_connection(conn: Connection, key: &str) -> Result<Self, StoreError> {
        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS kv (
              key    TEXT PRIMARY KEY NOT NULL,
              value  TEXT NOT NULL
            );
            ",
        )?;
        Ok(Self {
            conn,
            key: key.to_string(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Store for SqliteStore {
    fn read_all(&self) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                [&self.key],
                |row| row.get(0),
            )
            .optional()?;
        dlog!("store_read key={} found={}", self.key, value.is_some());
        Ok(value)
    }

    fn write_all(&mut self, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            r"
            INSERT INTO kv (key, value) VALUES (?1, ?2)
            ON CONFLICT (key) DO UPDATE SET value = excluded.value
            ",
            params![self.key, value],
        )?;
        dlog!("store_write key={} bytes={}", self.key, value.len());
        Ok(())
    }
}

/// In-process store, for headless use and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    value: Option<String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Number of successful `write_all` calls.
    pub const fn writes(&self) -> usize {
        self.writes
    }
}

impl Store for MemoryStore {
    fn read_all(&self) -> Result<Option<String>, StoreError> {
        Ok(self.value.clone())
    }

    fn write_all(&mut self, value: &str) -> Result<(), StoreError> {
        self.value = Some(value.to_string());
        self.writes += 1;
        Ok(())
    }
}
