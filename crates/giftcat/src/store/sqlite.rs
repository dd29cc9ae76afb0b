//! File-backed session store.
//!
//! Stands in for browser session storage when the flow runs outside a browser:
//! values survive process restarts the way storage survives page navigation.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, OptionalExtension};

use super::{migrations, DraftStore, StoreError};

/// Thread-safe handle over a single SQLite connection.
///
/// Cloning is cheap (inner `Arc`). All access is serialized through a `Mutex`.
#[derive(Clone)]
pub struct SqliteDraftStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDraftStore {
    /// Opens (or creates) the store at the given path and runs pending migrations.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        migrations::run_all(&conn)?;

        log::info!("Session store opened at {}", path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens an in-memory store for testing.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        migrations::run_all(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        f(&conn)
    }

    /// Returns the RFC 3339 timestamp of the last write to `key`.
    pub fn updated_at(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.with_conn(|conn| {
            let ts = conn
                .query_row(
                    "SELECT updated_at FROM session_entries WHERE key = ?1",
                    params![key],
                    |r| r.get(0),
                )
                .optional()?;
            Ok(ts)
        })
    }
}

impl DraftStore for SqliteDraftStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.with_conn(|conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM session_entries WHERE key = ?1",
                    params![key],
                    |r| r.get(0),
                )
                .optional()?;
            Ok(value)
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let now = chrono::Utc::now().to_rfc3339();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO session_entries (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
                params![key, value, now],
            )?;
            Ok(())
        })?;
        log::debug!("Stored session key '{}' ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM session_entries WHERE key = ?1", params![key])?;
            Ok(())
        })
    }
}
