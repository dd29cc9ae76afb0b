//! Catalog data shapes shared by the readers, the polling coordinator and the
//! draft store.

pub mod content;
pub mod draft;
pub mod inputs;
pub mod status;

pub use content::{CatalogContentRecord, ContentItem};
pub use draft::{CatalogDraft, DraftSlot, DraftSlots};
pub use inputs::{CatalogId, ExpectedItemCount, SessionInputs};
pub use status::{StatusObservation, StatusRecord, DONE_SENTINEL};

/// Number of item slots a catalog can hold.
pub const SLOT_COUNT: usize = 3;
