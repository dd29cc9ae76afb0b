//! Session-scoped key/value storage for cross-page handoff.
//!
//! Each documented key has exactly one writer:
//! - [`keys::CATALOG_ID`] and [`keys::URL_COUNT`] are written by the item submitter.
//! - [`keys::DRAFT`] is written by the polling coordinator, once, on success.

pub mod error;
pub mod memory;
pub mod migrations;
pub mod sqlite;

use std::path::PathBuf;

pub use error::StoreError;
pub use memory::MemoryDraftStore;
pub use sqlite::SqliteDraftStore;

use crate::catalog::CatalogDraft;

pub mod keys {
    /// Catalog identifier of the latest submission.
    pub const CATALOG_ID: &str = "catalogId";
    /// Number of items in the latest submission, stored as a decimal string.
    pub const URL_COUNT: &str = "urlCount";
    /// JSON-encoded [`CatalogDraft`](crate::catalog::CatalogDraft).
    pub const DRAFT: &str = "giftDraft_enriched_v1";
}

pub trait DraftStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Writes the draft under [`keys::DRAFT`].
pub fn save_draft(store: &dyn DraftStore, draft: &CatalogDraft) -> Result<(), StoreError> {
    let json = draft.to_json().map_err(StoreError::Encode)?;
    store.set(keys::DRAFT, &json)
}

/// Reads the draft stored under [`keys::DRAFT`], if any.
pub fn load_draft(store: &dyn DraftStore) -> Result<Option<CatalogDraft>, StoreError> {
    match store.get(keys::DRAFT)? {
        Some(json) => CatalogDraft::from_json(&json)
            .map(Some)
            .map_err(StoreError::Encode),
        None => Ok(None),
    }
}

/// Returns the canonical store path: `~/.giftcat/data/session.db`.
pub fn default_store_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".giftcat").join("data").join("session.db"))
}
