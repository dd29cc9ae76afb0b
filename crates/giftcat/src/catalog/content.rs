//! Finalized per-item content read from the catalog table.

use super::inputs::CatalogId;
use super::SLOT_COUNT;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentItem {
    pub title: String,
    pub long_description: String,
    /// Inline image payload (usually a data URL). Can be large.
    pub image_data: String,
}

/// Content for all three item slots of one catalog. Missing fields are empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogContentRecord {
    pub catalog_id: CatalogId,
    pub items: [ContentItem; SLOT_COUNT],
}

impl CatalogContentRecord {
    pub fn new(catalog_id: CatalogId, items: [ContentItem; SLOT_COUNT]) -> Self {
        Self { catalog_id, items }
    }
}
