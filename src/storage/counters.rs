//! Monotonic counters behind an injected store: in-memory atomics or a SQLite table.

use crate::error::StoreError;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterKey {
    SitesChecked,
    ThreatsBlocked,
}

impl CounterKey {
    pub fn as_str(self) -> &'static str {
        match self {
            CounterKey::SitesChecked => "sitesChecked",
            CounterKey::ThreatsBlocked => "threatsBlocked",
        }
    }
}

pub trait CounterStore: Send + Sync {
    /// Add one and return the new value.
    fn increment(&self, key: CounterKey) -> Result<u64, StoreError>;
    fn get(&self, key: CounterKey) -> Result<u64, StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryCounters {
    sites_checked: AtomicU64,
    threats_blocked: AtomicU64,
}

impl MemoryCounters {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: CounterKey) -> &AtomicU64 {
        match key {
            CounterKey::SitesChecked => &self.sites_checked,
            CounterKey::ThreatsBlocked => &self.threats_blocked,
        }
    }
}

impl CounterStore for MemoryCounters {
    fn increment(&self, key: CounterKey) -> Result<u64, StoreError> {
        Ok(self.slot(key).fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn get(&self, key: CounterKey) -> Result<u64, StoreError> {
        Ok(self.slot(key).load(Ordering::Relaxed))
    }
}

pub struct SqliteCounters {
    conn: Mutex<Connection>,
}

impl SqliteCounters {
    /// Open or create DB at path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS counters (
                k TEXT PRIMARY KEY,
                v INTEGER NOT NULL DEFAULT 0
            );
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl CounterStore for SqliteCounters {
    fn increment(&self, key: CounterKey) -> Result<u64, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let v: i64 = conn.query_row(
            "INSERT INTO counters (k, v) VALUES (?1, 1)
             ON CONFLICT(k) DO UPDATE SET v = v + 1
             RETURNING v",
            params![key.as_str()],
            |row| row.get(0),
        )?;
        Ok(v as u64)
    }

    fn get(&self, key: CounterKey) -> Result<u64, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let v: Option<i64> = conn
            .query_row(
                "SELECT v FROM counters WHERE k = ?1",
                params![key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(v.unwrap_or(0) as u64)
    }
}
