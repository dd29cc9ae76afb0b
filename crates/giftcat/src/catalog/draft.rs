//! The normalized draft handed to the confirmation page.
//!
//! Field names on the wire (`perUrl`, `desc`, `imgData`) are the ones the
//! confirmation page reads, so they must not change.

use serde::{Deserialize, Serialize};

use super::content::{CatalogContentRecord, ContentItem};
use super::inputs::CatalogId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSlot {
    /// Product URL, filled in by the confirmation step.
    pub url: String,
    pub title: String,
    #[serde(rename = "desc")]
    pub description: String,
    #[serde(rename = "imgData")]
    pub image_data: String,
}

impl From<&ContentItem> for DraftSlot {
    fn from(item: &ContentItem) -> Self {
        Self {
            url: String::new(),
            title: item.title.clone(),
            description: item.long_description.clone(),
            image_data: item.image_data.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSlots {
    pub slot1: DraftSlot,
    pub slot2: DraftSlot,
    pub slot3: DraftSlot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDraft {
    pub catalog_id: CatalogId,
    #[serde(rename = "perUrl")]
    pub per_slot: DraftSlots,
}

impl CatalogDraft {
    /// Maps the three content slots onto the three draft slots, leaving `url` empty.
    pub fn from_content(catalog_id: CatalogId, content: &CatalogContentRecord) -> Self {
        let [first, second, third] = &content.items;
        Self {
            catalog_id,
            per_slot: DraftSlots {
                slot1: first.into(),
                slot2: second.into(),
                slot3: third.into(),
            },
        }
    }

    pub fn slots(&self) -> [&DraftSlot; 3] {
        [&self.per_slot.slot1, &self.per_slot.slot2, &self.per_slot.slot3]
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> CatalogContentRecord {
        let item = |t: &str, d: &str, i: &str| ContentItem {
            title: t.to_string(),
            long_description: d.to_string(),
            image_data: i.to_string(),
        };
        CatalogContentRecord::new(
            CatalogId::parse("cat-42").unwrap(),
            [
                item("A", "d1", "i1"),
                item("B", "d2", "i2"),
                ContentItem::default(),
            ],
        )
    }

    #[test]
    fn test_from_content_maps_slots_in_order() {
        let draft = CatalogDraft::from_content(CatalogId::parse("cat-42").unwrap(), &content());

        assert_eq!(draft.per_slot.slot1.title, "A");
        assert_eq!(draft.per_slot.slot1.description, "d1");
        assert_eq!(draft.per_slot.slot1.image_data, "i1");
        assert_eq!(draft.per_slot.slot2.title, "B");
        assert_eq!(draft.per_slot.slot3, DraftSlot::default());
        assert!(draft.slots().iter().all(|s| s.url.is_empty()));
    }

    #[test]
    fn test_json_uses_confirmation_page_keys() {
        let draft = CatalogDraft::from_content(CatalogId::parse("cat-42").unwrap(), &content());
        let value: serde_json::Value = serde_json::from_str(&draft.to_json().unwrap()).unwrap();

        assert_eq!(value["catalogId"], "cat-42");
        assert_eq!(
            value["perUrl"]["slot1"],
            serde_json::json!({"url": "", "title": "A", "desc": "d1", "imgData": "i1"})
        );
    }

    #[test]
    fn test_normalization_is_byte_identical() {
        let record = content();
        let a = CatalogDraft::from_content(record.catalog_id.clone(), &record)
            .to_json()
            .unwrap();
        let b = CatalogDraft::from_content(record.catalog_id.clone(), &record)
            .to_json()
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_json_reads_back_draft() {
        let draft = CatalogDraft::from_content(CatalogId::parse("cat-42").unwrap(), &content());
        let parsed = CatalogDraft::from_json(&draft.to_json().unwrap()).unwrap();
        assert_eq!(parsed, draft);
    }
}
