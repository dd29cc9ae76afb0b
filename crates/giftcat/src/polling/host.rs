//! The host environment a polling session runs in: timers, page navigation and
//! blocking user notices.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::catalog::CatalogId;

/// Page the session hands the user to when it ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "lowercase")]
pub enum Destination {
    /// Confirmation page for a finished catalog.
    Confirm { catalog_id: CatalogId },
    /// Gift selection page, used after a content failure or timeout.
    Select,
    /// Catalog creation entry point, used when the session cannot start.
    Create,
}

impl Destination {
    pub const CONFIRM_PAGE: &'static str = "confirm.html";
    pub const SELECT_PAGE: &'static str = "giveselect.html";
    pub const CREATE_PAGE: &'static str = "create.html";

    /// Relative location of the page, including the query string.
    pub fn href(&self) -> String {
        match self {
            Destination::Confirm { catalog_id } => {
                let encoded: String =
                    url::form_urlencoded::byte_serialize(catalog_id.as_str().as_bytes()).collect();
                format!("{}?id={}", Self::CONFIRM_PAGE, encoded)
            }
            Destination::Select => Self::SELECT_PAGE.to_string(),
            Destination::Create => Self::CREATE_PAGE.to_string(),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}

/// Blocking notice shown to the user before a failure redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// Catalog id or item count missing.
    SessionInvalid,
    /// Status reported completion but the content could not be read.
    ContentFetchFailed,
    /// The retry budget ran out.
    Timeout,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::SessionInvalid => "Something went wrong. Please start over.",
            Notice::ContentFetchFailed => "Failed to load the gift details.",
            Notice::Timeout => "Loading the gift details is taking longer than expected. Please try again.",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Suspends the session between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real timer backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Moves the user to another page. Called exactly once per session.
pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: &Destination);
}

/// Shows a notice the user must acknowledge. Returns once acknowledged.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}
