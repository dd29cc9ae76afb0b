//! Publishing a finished catalog so it can be shared by link.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::reader::{BackendClient, FetchError};
use crate::sanitize;

use super::ShareError;

/// Exact number of items a published catalog carries.
pub const PUBLISHED_ITEM_COUNT: usize = 3;

const TITLE_MAX: usize = 120;
const MESSAGE_MAX: usize = 1000;
const NAME_MAX: usize = 120;
const DESC_SHORT_MAX: usize = 80;
const DESC_LONG_MAX: usize = 800;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItemInput {
    pub name: String,
    pub url: String,
    /// Absolute URL, or empty for no image.
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc_short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc_long: Option<String>,
}

/// The catalog as posted to `POST /api/catalog`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogInput {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub items: Vec<CatalogItemInput>,
}

/// Where a published catalog can be read back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishReceipt {
    pub share_id: String,
    pub share_url: String,
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ShareError {
    ShareError::Invalid {
        field: field.into(),
        reason: reason.into(),
    }
}

fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<(), ShareError> {
    let len = value.chars().count();
    if len < min {
        return Err(invalid(field, "must not be empty"));
    }
    if len > max {
        return Err(invalid(
            field,
            format!("must be at most {} characters, got {}", max, len),
        ));
    }
    Ok(())
}

fn check_url(field: &str, value: &str) -> Result<(), ShareError> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| invalid(field, format!("'{}' is not a URL: {}", value, e)))
}

impl CatalogItemInput {
    fn validate(&self, index: usize) -> Result<(), ShareError> {
        let field = |name: &str| format!("items[{}].{}", index, name);

        check_len(&field("name"), &self.name, 1, NAME_MAX)?;
        check_url(&field("url"), &self.url)?;
        if !self.image_url.is_empty() {
            check_url(&field("imageUrl"), &self.image_url)?;
        }
        if let Some(desc) = &self.desc_short {
            check_len(&field("descShort"), desc, 0, DESC_SHORT_MAX)?;
        }
        if let Some(desc) = &self.desc_long {
            check_len(&field("descLong"), desc, 0, DESC_LONG_MAX)?;
        }
        Ok(())
    }
}

impl CatalogInput {
    pub fn validate(&self) -> Result<(), ShareError> {
        check_len("title", &self.title, 1, TITLE_MAX)?;
        if let Some(message) = &self.message {
            check_len("message", message, 0, MESSAGE_MAX)?;
        }

        if self.items.len() != PUBLISHED_ITEM_COUNT {
            return Err(invalid(
                "items",
                format!(
                    "must contain exactly {} items, got {}",
                    PUBLISHED_ITEM_COUNT,
                    self.items.len()
                ),
            ));
        }

        self.items
            .iter()
            .enumerate()
            .try_for_each(|(index, item)| item.validate(index))
    }
}

/// Reads a publish reply. A reply without a share id is unusable.
pub(crate) fn parse_receipt(body: &str) -> Result<PublishReceipt, ShareError> {
    let receipt: PublishReceipt = serde_json::from_str(body).map_err(FetchError::InvalidBody)?;
    if receipt.share_id.is_empty() {
        return Err(ShareError::InvalidReply("empty shareId".to_string()));
    }
    Ok(receipt)
}

impl BackendClient {
    /// Publishes a catalog and returns its share id and URL.
    ///
    /// Nothing is sent unless the catalog passes validation.
    pub async fn publish_catalog(&self, catalog: &CatalogInput) -> Result<PublishReceipt, ShareError> {
        catalog.validate()?;

        let url = self.endpoint(&["api", "catalog"])?;
        let raw = self.post_json(url.clone(), catalog).await?;

        if !raw.success {
            warn!(
                url = %url,
                status = raw.status,
                body = %sanitize::truncate_body(&raw.body),
                "Catalog publish rejected"
            );
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: raw.status,
            }
            .into());
        }

        let receipt = parse_receipt(&raw.body)?;
        info!(share_id = %receipt.share_id, share_url = %receipt.share_url, "Catalog published");
        Ok(receipt)
    }
}
