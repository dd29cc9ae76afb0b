//! HTTP client for the gift-catalog backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::{CatalogContentRecord, CatalogId, StatusRecord};
use crate::config::schema::HttpConfig;
use crate::sanitize;

use super::envelope;
use super::error::{FetchError, Result};
use super::{ContentReader, StatusReader};

/// Client for the backend's JSON endpoints, rooted at a base URL.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
}

/// A response body together with its HTTP status.
pub(crate) struct RawResponse {
    pub status: u16,
    pub success: bool,
    pub body: String,
}

fn create_http_client(http: &HttpConfig) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(http.connect_timeout_secs))
        .timeout(Duration::from_secs(http.request_timeout_secs))
        .build()
        .map_err(|e| FetchError::Client(e.to_string()))
}

impl BackendClient {
    pub fn new(base_url: &str, http: &HttpConfig) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|e| FetchError::InvalidUrl {
            url: sanitize::redact_url(base_url),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl {
                url: sanitize::redact_url(base_url),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self {
            client: create_http_client(http)?,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds an endpoint URL below the base URL. Each segment is percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl {
                url: sanitize::redact_url(self.base_url.as_str()),
                reason: "URL cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issues a GET and returns the body of a success response.
    pub(crate) async fn get_text(&self, url: Url) -> Result<String> {
        let raw = self.send(self.client.get(url.clone()), &url).await?;
        if !raw.success {
            warn!(
                url = %url,
                status = raw.status,
                body = %sanitize::truncate_body(&raw.body),
                "Backend returned non-success status"
            );
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: raw.status,
            });
        }
        Ok(raw.body)
    }

    /// Issues a GET and returns the raw response regardless of status.
    pub(crate) async fn get_raw(&self, url: Url) -> Result<RawResponse> {
        self.send(self.client.get(url.clone()), &url).await
    }

    /// POSTs a JSON body and returns the raw response regardless of status.
    pub(crate) async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &T,
    ) -> Result<RawResponse> {
        self.send(self.client.post(url.clone()).json(body), &url)
            .await
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &Url) -> Result<RawResponse> {
        debug!(url = %url, "Sending backend request");

        let response = request.send().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            source: e,
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            source: e,
        })?;

        debug!(url = %url, status = status.as_u16(), bytes = body.len(), "Backend responded");

        Ok(RawResponse {
            status: status.as_u16(),
            success: status.is_success(),
            body,
        })
    }
}

#[async_trait]
impl StatusReader for BackendClient {
    async fn read_status(&self, catalog_id: &CatalogId) -> Result<StatusRecord> {
        let url = self.endpoint(&["api", "sheets", "ogp_status", catalog_id.as_str()])?;
        let body = self.get_text(url).await?;
        envelope::parse_status_body(catalog_id, &body)
    }
}

#[async_trait]
impl ContentReader for BackendClient {
    async fn read_content(&self, catalog_id: &CatalogId) -> Result<CatalogContentRecord> {
        let url = self.endpoint(&["api", "sheets", "catalog", catalog_id.as_str()])?;
        let body = self.get_text(url).await?;
        envelope::parse_catalog_body(catalog_id, &body)
    }
}
