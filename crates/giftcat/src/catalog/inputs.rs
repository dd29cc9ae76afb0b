//! Session inputs: the catalog identifier and the number of submitted items.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PreconditionError;
use crate::store::{keys, DraftStore};

use super::SLOT_COUNT;

/// Opaque token identifying one catalog submission.
///
/// An empty string is treated as absent, the same way the query string and
/// session storage lookups treat it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogId(String);

impl CatalogId {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Number of catalog items the user submitted, always in `1..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpectedItemCount(u8);

impl ExpectedItemCount {
    pub const MAX: u8 = SLOT_COUNT as u8;

    pub fn new(count: u8) -> Result<Self, PreconditionError> {
        if (1..=Self::MAX).contains(&count) {
            Ok(Self(count))
        } else {
            Err(PreconditionError::InvalidItemCount(count.to_string()))
        }
    }

    /// Parses a stored count the way the submit page writes it.
    ///
    /// Surrounding whitespace is ignored and integral decimals such as `"2.0"`
    /// are accepted. Empty input is reported as missing.
    pub fn parse(raw: &str) -> Result<Self, PreconditionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PreconditionError::MissingItemCount);
        }

        let invalid = || PreconditionError::InvalidItemCount(raw.to_string());
        let value: f64 = trimmed.parse().map_err(|_| invalid())?;
        if !value.is_finite() || value.fract() != 0.0 || value < 1.0 || value > Self::MAX as f64
        {
            return Err(invalid());
        }

        Ok(Self(value as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ExpectedItemCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated inputs for one polling session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInputs {
    pub catalog_id: CatalogId,
    pub expected_count: ExpectedItemCount,
}

impl SessionInputs {
    pub fn new(catalog_id: CatalogId, expected_count: ExpectedItemCount) -> Self {
        Self {
            catalog_id,
            expected_count,
        }
    }

    /// Resolves the session inputs from the `id` query parameter and session storage.
    ///
    /// The query parameter wins; `catalogId` in storage is the fallback used when
    /// the page is refreshed. The item count only ever comes from storage.
    pub fn resolve(
        query_id: Option<&str>,
        store: &dyn DraftStore,
    ) -> Result<Self, PreconditionError> {
        let from_query = query_id.and_then(CatalogId::parse);
        let catalog_id = match from_query {
            Some(id) => id,
            None => read_key(store, keys::CATALOG_ID)?
                .as_deref()
                .and_then(CatalogId::parse)
                .ok_or(PreconditionError::MissingCatalogId)?,
        };

        let raw_count =
            read_key(store, keys::URL_COUNT)?.ok_or(PreconditionError::MissingItemCount)?;
        let expected_count = ExpectedItemCount::parse(&raw_count)?;

        Ok(Self {
            catalog_id,
            expected_count,
        })
    }
}

fn read_key(store: &dyn DraftStore, key: &str) -> Result<Option<String>, PreconditionError> {
    store
        .get(key)
        .map_err(|e| PreconditionError::StoreUnavailable(e.to_string()))
}
