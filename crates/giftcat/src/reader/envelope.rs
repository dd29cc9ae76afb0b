//! Structural validation of backend responses.
//!
//! Bodies are checked against an embedded JSON Schema first and only then
//! deserialized, so a typed record is produced only from a body that has the
//! documented shape.

use serde::Deserialize;
use serde_json::Value;

use crate::catalog::{CatalogContentRecord, CatalogId, ContentItem, StatusRecord};
use crate::validation::EmbeddedSchema;

use super::error::{FetchError, Result};

const STATUS_SCHEMA_JSON: &str = include_str!("../../../../schema/ogp-status-response.json");
const CATALOG_SCHEMA_JSON: &str = include_str!("../../../../schema/catalog-response.json");

static STATUS_SCHEMA: EmbeddedSchema = EmbeddedSchema::new("ogp_status", STATUS_SCHEMA_JSON);
static CATALOG_SCHEMA: EmbeddedSchema = EmbeddedSchema::new("catalog", CATALOG_SCHEMA_JSON);

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(alias = "status", alias = "catalog")]
    payload: Option<T>,
}

impl<T> Envelope<T> {
    fn into_payload(self, field: &str) -> Result<T> {
        if !self.success {
            return Err(FetchError::Unsuccessful {
                reason: self
                    .error
                    .unwrap_or_else(|| "success flag is false".to_string()),
            });
        }
        self.payload.ok_or_else(|| FetchError::SchemaValidation {
            errors: format!("missing '{}' in successful response", field),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireStatus {
    #[serde(default)]
    url_count: Option<Value>,
    #[serde(default)]
    item1: Option<String>,
    #[serde(default)]
    item2: Option<String>,
    #[serde(default)]
    item3: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireCatalog {
    #[serde(default)]
    gift1_title: Option<String>,
    #[serde(default)]
    gift1_desc400: Option<String>,
    #[serde(default)]
    gift1_img: Option<String>,
    #[serde(default)]
    gift2_title: Option<String>,
    #[serde(default)]
    gift2_desc400: Option<String>,
    #[serde(default)]
    gift2_img: Option<String>,
    #[serde(default)]
    gift3_title: Option<String>,
    #[serde(default)]
    gift3_desc400: Option<String>,
    #[serde(default)]
    gift3_img: Option<String>,
}

fn item(title: Option<String>, desc: Option<String>, img: Option<String>) -> ContentItem {
    ContentItem {
        title: title.unwrap_or_default(),
        long_description: desc.unwrap_or_default(),
        image_data: img.unwrap_or_default(),
    }
}

/// `urlCount` is informational, so anything that is not a whole number in `u32`
/// range reads as 0 instead of spoiling the record.
fn lenient_count(raw: Option<&Value>) -> u32 {
    let number = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let Some(number) = number else {
        return 0;
    };
    if number.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&number) {
        number as u32
    } else {
        0
    }
}

fn parse_validated<T: for<'de> Deserialize<'de>>(
    schema: &EmbeddedSchema,
    body: &str,
) -> Result<Envelope<T>> {
    let value: Value = serde_json::from_str(body).map_err(FetchError::InvalidBody)?;
    schema
        .validate(&value)
        .map_err(|failure| FetchError::SchemaValidation {
            errors: failure.describe(),
        })?;
    serde_json::from_value(value).map_err(FetchError::InvalidBody)
}

/// Parses a `GET /api/sheets/ogp_status/{id}` body into a [`StatusRecord`].
pub fn parse_status_body(catalog_id: &CatalogId, body: &str) -> Result<StatusRecord> {
    let status: WireStatus = parse_validated(&STATUS_SCHEMA, body)?.into_payload("status")?;

    Ok(StatusRecord::new(
        catalog_id.clone(),
        lenient_count(status.url_count.as_ref()),
        [
            status.item1.unwrap_or_default(),
            status.item2.unwrap_or_default(),
            status.item3.unwrap_or_default(),
        ],
    ))
}

/// Parses a `GET /api/sheets/catalog/{id}` body into a [`CatalogContentRecord`].
pub fn parse_catalog_body(catalog_id: &CatalogId, body: &str) -> Result<CatalogContentRecord> {
    let c: WireCatalog = parse_validated(&CATALOG_SCHEMA, body)?.into_payload("catalog")?;

    Ok(CatalogContentRecord::new(
        catalog_id.clone(),
        [
            item(c.gift1_title, c.gift1_desc400, c.gift1_img),
            item(c.gift2_title, c.gift2_desc400, c.gift2_img),
            item(c.gift3_title, c.gift3_desc400, c.gift3_img),
        ],
    ))
}
