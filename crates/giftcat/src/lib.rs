pub mod catalog;
pub mod config;
pub mod error;
pub mod polling;
pub mod reader;
pub mod sanitize;
pub mod share;
pub mod store;
pub mod submission;
mod validation;

pub use catalog::{
    CatalogContentRecord, CatalogDraft, CatalogId, ExpectedItemCount, SessionInputs, StatusRecord,
};
pub use config::{load_config, Config};
pub use error::{ConfigError, GiftcatError, PreconditionError, Result};
pub use polling::{
    Destination, Navigator, Notice, Notifier, PollPolicy, PollingCoordinator, SessionOutcome,
    Sleeper, TerminalReason, TokioSleeper,
};
pub use reader::{BackendClient, ContentReader, FetchError, StatusReader};
pub use share::{
    render_not_found_page, render_share_page, CatalogInput, CatalogItemInput, PublishReceipt,
    ShareError, SharedCatalog,
};
pub use store::{DraftStore, MemoryDraftStore, SqliteDraftStore, StoreError};
pub use submission::{ItemsInput, SubmissionReceipt, SubmitError};
