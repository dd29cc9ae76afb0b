//! Catalog sharing: publishing a catalog and rendering its read-only page.

mod publish;

pub use publish::{CatalogInput, CatalogItemInput, PublishReceipt, PUBLISHED_ITEM_COUNT};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::reader::{BackendClient, FetchError};

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("Catalog '{0}' not found")]
    NotFound(String),

    #[error("Invalid {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("Unusable publish reply: {0}")]
    InvalidReply(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedItem {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub desc_short: Option<String>,
    #[serde(default)]
    pub desc_long: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedCatalog {
    pub title: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub items: Vec<SharedItem>,
}

/// Parses a share reply. Anything without a non-empty title is not a catalog.
pub(crate) fn parse_shared_catalog(body: &str) -> Option<SharedCatalog> {
    serde_json::from_str::<SharedCatalog>(body)
        .ok()
        .filter(|catalog| !catalog.title.is_empty())
}

impl BackendClient {
    pub async fn fetch_shared_catalog(&self, share_id: &str) -> Result<SharedCatalog, ShareError> {
        let url = self.endpoint(&["api", "catalog", share_id])?;
        let raw = self.get_raw(url.clone()).await?;

        if !raw.success {
            warn!(url = %url, status = raw.status, "Shared catalog unavailable");
            return Err(ShareError::NotFound(share_id.to_string()));
        }

        let catalog =
            parse_shared_catalog(&raw.body).ok_or_else(|| ShareError::NotFound(share_id.to_string()))?;
        debug!(share_id, items = catalog.items.len(), "Shared catalog loaded");
        Ok(catalog)
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Only `http` and `https` URLs become links; anything else is shown as plain text.
fn web_link(raw: &str) -> Option<&str> {
    let parsed = url::Url::parse(raw).ok()?;
    matches!(parsed.scheme(), "http" | "https").then_some(raw)
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n\
         <meta charset=\"utf-8\" />\n\
         <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\" />\n\
         <title>{}</title>\n\
         <div id=\"app\">{}</div>\n",
        title, body
    )
}

pub fn render_share_page(catalog: &SharedCatalog) -> String {
    let title = escape_html(&catalog.title);

    let mut body = format!("<h1>{}</h1>", title);
    if let Some(message) = catalog.message.as_deref().filter(|m| !m.is_empty()) {
        body.push_str(&format!("<p>{}</p>", escape_html(message)));
    }

    body.push_str("<div>");
    for item in &catalog.items {
        let name = escape_html(&item.name);
        match web_link(&item.url) {
            Some(href) => body.push_str(&format!(
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener\"><div>{}</div></a>",
                escape_html(href),
                name
            )),
            None => body.push_str(&format!("<div>{}</div>", name)),
        }
    }
    body.push_str("</div>");

    page(&format!("{} | Gift Catalog", title), &body)
}

pub fn render_not_found_page() -> String {
    page("Gift Catalog", "<p>Catalog not found.</p>")
}
