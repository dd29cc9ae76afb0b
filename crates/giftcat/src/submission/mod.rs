//! Item-input submission: the step that starts a catalog and seeds the session
//! store with `catalogId` and `urlCount` for the polling session that follows.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::{CatalogId, ExpectedItemCount};
use crate::reader::{BackendClient, FetchError};
use crate::sanitize;
use crate::store::{keys, DraftStore, StoreError};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The item-input form as posted to `/api/items_input`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsInput {
    pub catalog_id: String,
    pub url_count: u8,
    pub title1: String,
    pub url1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url3: Option<String>,
}

impl ItemsInput {
    pub fn validate(&self) -> Result<(), SubmitError> {
        if self.catalog_id.is_empty() {
            return Err(invalid("catalogId", "must not be empty"));
        }

        if ExpectedItemCount::new(self.url_count).is_err() {
            return Err(invalid(
                "urlCount",
                format!("must be between 1 and {}, got {}", ExpectedItemCount::MAX, self.url_count),
            ));
        }

        if self.title1.is_empty() {
            return Err(invalid("title1", "must not be empty"));
        }

        if let Err(reason) = check_absolute_url(&self.url1) {
            return Err(invalid("url1", reason));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SubmitError {
    SubmitError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn check_absolute_url(raw: &str) -> Result<(), String> {
    let parsed = url::Url::parse(raw).map_err(|e| e.to_string())?;
    if parsed.cannot_be_a_base() || !parsed.has_host() {
        return Err(format!("'{}' is not an absolute URL", raw));
    }
    Ok(())
}

/// Result of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub catalog_id: CatalogId,
}

/// Picks the catalog id from the reply body: `catalog_id`, then `catalogId`,
/// then the id that was submitted. An unparseable body falls through.
pub(crate) fn resolve_catalog_id(body: &str, submitted: &str) -> Option<CatalogId> {
    let reply: serde_json::Value = serde_json::from_str(body).unwrap_or_default();

    ["catalog_id", "catalogId"]
        .iter()
        .filter_map(|key| reply.get(*key).and_then(|v| v.as_str()))
        .find_map(CatalogId::parse)
        .or_else(|| CatalogId::parse(submitted))
}

impl BackendClient {
    /// Posts the item form and records the resulting session inputs.
    ///
    /// Nothing is written to the store unless the backend accepts the form.
    pub async fn submit_items(
        &self,
        input: &ItemsInput,
        store: &dyn DraftStore,
    ) -> Result<SubmissionReceipt, SubmitError> {
        input.validate()?;

        let url = self.endpoint(&["api", "items_input"])?;
        let raw = self.post_json(url.clone(), input).await?;

        if !raw.success {
            warn!(
                url = %url,
                status = raw.status,
                body = %sanitize::truncate_body(&raw.body),
                "Item submission rejected"
            );
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: raw.status,
            }
            .into());
        }

        let catalog_id = resolve_catalog_id(&raw.body, &input.catalog_id)
            .ok_or_else(|| invalid("catalogId", "must not be empty"))?;

        store.set(keys::CATALOG_ID, catalog_id.as_str())?;
        store.set(keys::URL_COUNT, &input.url_count.to_string())?;

        info!(catalog_id = %catalog_id, url_count = input.url_count, "Items submitted");

        Ok(SubmissionReceipt { catalog_id })
    }

    /// Asks the backend to start OGP generation for a submitted catalog and
    /// returns its reply as-is.
    pub async fn start_status_check(
        &self,
        catalog_id: &CatalogId,
    ) -> Result<serde_json::Value, SubmitError> {
        let url = self.endpoint(&["api", "start_status_check"])?;
        let body = serde_json::json!({ "catalogId": catalog_id.as_str() });
        let raw = self.post_json(url.clone(), &body).await?;

        if !raw.success {
            warn!(
                url = %url,
                status = raw.status,
                body = %sanitize::truncate_body(&raw.body),
                "Status check request rejected"
            );
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: raw.status,
            }
            .into());
        }

        let reply: serde_json::Value =
            serde_json::from_str(&raw.body).map_err(FetchError::InvalidBody)?;
        info!(catalog_id = %catalog_id, "Status check started");
        Ok(reply)
    }
}
