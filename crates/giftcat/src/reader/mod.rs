//! Readers for the backend's spreadsheet-backed endpoints.
//!
//! The traits are the seam the polling coordinator depends on; [`BackendClient`]
//! implements both against the real HTTP endpoints.

pub mod envelope;
pub mod error;
pub mod http;

use async_trait::async_trait;

use crate::catalog::{CatalogContentRecord, CatalogId, StatusRecord};

pub use error::FetchError;
pub use http::BackendClient;

/// Reads the OGP completion status row for a catalog.
#[async_trait]
pub trait StatusReader: Send + Sync {
    async fn read_status(&self, catalog_id: &CatalogId) -> Result<StatusRecord, FetchError>;
}

/// Reads the finalized per-item content for a catalog.
#[async_trait]
pub trait ContentReader: Send + Sync {
    async fn read_content(
        &self,
        catalog_id: &CatalogId,
    ) -> Result<CatalogContentRecord, FetchError>;
}
