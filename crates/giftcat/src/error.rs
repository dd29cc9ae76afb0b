use std::path::PathBuf;
use thiserror::Error;

use crate::reader::FetchError;
use crate::share::ShareError;
use crate::store::StoreError;
use crate::submission::SubmitError;

#[derive(Error, Debug)]
pub enum GiftcatError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session precondition failed: {0}")]
    Precondition(#[from] PreconditionError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Submission error: {0}")]
    Submit(#[from] SubmitError),

    #[error("Share error: {0}")]
    Share(#[from] ShareError),

    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },
}

/// Inputs that must be present before a polling session may start.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("No catalog id in the query string or session storage")]
    MissingCatalogId,

    #[error("No item count in session storage")]
    MissingItemCount,

    #[error("Item count '{0}' is not an integer between 1 and 3")]
    InvalidItemCount(String),

    #[error("Session storage unavailable: {0}")]
    StoreUnavailable(String),
}

pub type Result<T> = std::result::Result<T, GiftcatError>;
