//! Session store error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from session store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error from rusqlite.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error when creating the store directory.
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A migration failed to apply.
    #[error("Migration failed at version {version}: {reason}")]
    Migration { version: u32, reason: String },

    /// The store lock was poisoned.
    #[error("Store lock poisoned")]
    LockPoisoned,

    /// A stored value could not be encoded or decoded.
    #[error("Failed to encode stored value: {0}")]
    Encode(#[source] serde_json::Error),
}
