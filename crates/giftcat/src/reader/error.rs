//! Backend fetch error types.

use thiserror::Error;

/// Errors from a single request to the backend.
///
/// The polling coordinator does not distinguish between variants: for the
/// status endpoint every variant is a missed attempt, for the content endpoint
/// every variant is fatal.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read.
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success HTTP status.
    #[error("Request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// The body is not JSON, or not the JSON shape we expect.
    #[error("Invalid response body: {0}")]
    InvalidBody(#[source] serde_json::Error),

    /// The body failed validation against the embedded response schema.
    #[error("Response failed schema validation: {errors}")]
    SchemaValidation { errors: String },

    /// The body parsed but reported `success: false`.
    #[error("Backend reported failure: {reason}")]
    Unsuccessful { reason: String },

    /// The endpoint URL could not be built from the base URL.
    #[error("Invalid backend URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The HTTP client could not be constructed.
    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

/// Result type for backend fetches.
pub type Result<T> = std::result::Result<T, FetchError>;
