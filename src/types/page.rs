//! HAL envelopes: paged search results and code lists.
//!
//! Search endpoints wrap their items as `{"_embedded": {"<key>": [...]},
//! "page": {...}, "_links": {...}}` and omit `_embedded` entirely when
//! nothing matched. Some code-list endpoints answer with a bare JSON array
//! instead; [`decode_list`] inspects the shape before decoding.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::Links;
use super::enhet::Enhet;
use super::oppdateringer::Oppdatering;
use super::underenhet::Underenhet;

/// Paging metadata of a search response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u64,
    #[serde(default)]
    pub number: u64,
}

impl PageInfo {
    /// Whether another page follows this one.
    pub fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages
    }
}

/// One page of items from a HAL search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HalPage<T> {
    pub items: Vec<T>,
    pub page: Option<PageInfo>,
    pub links: Links,
}

impl<T> Default for HalPage<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: None,
            links: Links::new(),
        }
    }
}

#[derive(Deserialize)]
struct RawPage {
    #[serde(rename = "_embedded", default)]
    embedded: Map<String, Value>,
    #[serde(default)]
    page: Option<PageInfo>,
    #[serde(rename = "_links", default)]
    links: Links,
}

impl<T: DeserializeOwned> HalPage<T> {
    /// Decode a HAL page whose items live under `_embedded.<key>`.
    pub fn from_value(value: Value, key: &str) -> serde_json::Result<Self> {
        let mut raw: RawPage = serde_json::from_value(value)?;
        let items = match raw.embedded.remove(key) {
            Some(items) => serde_json::from_value(items)?,
            None => Vec::new(),
        };
        Ok(Self {
            items,
            page: raw.page,
            links: raw.links,
        })
    }
}

impl<T> HalPage<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Total matches across all pages, if the server reported it.
    pub fn total_elements(&self) -> Option<u64> {
        self.page.map(|page| page.total_elements)
    }
}

impl<T> IntoIterator for HalPage<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Search results from `/enheter`.
pub type Enheter = HalPage<Enhet>;
/// Search results from `/underenheter`.
pub type Underenheter = HalPage<Underenhet>;
/// A page of the entity or sub-entity change feed.
pub type Oppdateringer = HalPage<Oppdatering>;

/// Decode a code list that is either a bare array or a HAL object with
/// the items under `_embedded.<key>`.
pub fn decode_list<T: DeserializeOwned>(value: Value, key: &str) -> serde_json::Result<Vec<T>> {
    match value {
        Value::Array(_) => serde_json::from_value(value),
        Value::Object(_) => HalPage::from_value(value, key).map(|page| page.items),
        other => Err(serde_json::Error::custom(format!(
            "expected a JSON array or object, found {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Kommune;
    use serde_json::json;

    #[test]
    fn missing_embedded_means_no_hits() {
        let page: Enheter = HalPage::from_value(
            json!({"page": {"size": 20, "totalElements": 0, "totalPages": 0, "number": 0}}),
            "enheter",
        )
        .unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_elements(), Some(0));
        assert!(!page.page.unwrap().has_next());
    }

    #[test]
    fn code_list_accepts_both_shapes() {
        let bare: Vec<Kommune> =
            decode_list(json!([{"nummer": "0301", "navn": "OSLO"}]), "kommuner").unwrap();
        let wrapped: Vec<Kommune> = decode_list(
            json!({"_embedded": {"kommuner": [{"nummer": "0301", "navn": "OSLO"}]}}),
            "kommuner",
        )
        .unwrap();
        assert_eq!(bare, wrapped);
        assert_eq!(bare[0].navn, "OSLO");
    }

    #[test]
    fn code_list_rejects_scalars() {
        assert!(decode_list::<Kommune>(json!("oops"), "kommuner").is_err());
    }
}
