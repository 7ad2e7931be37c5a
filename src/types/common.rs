//! Building blocks shared by the registry records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A HAL hyperlink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

/// HAL `_links` object, keyed by relation (`self`, `next`, ...).
pub type Links = BTreeMap<String, Link>;

/// Code/description pair used throughout the registry
/// (organisation form, industry code, sector code, role type, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kode {
    pub kode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beskrivelse: Option<String>,
    #[serde(rename = "_links", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: Links,
}

impl Kode {
    pub fn new(kode: impl Into<String>, beskrivelse: impl Into<String>) -> Self {
        Self {
            kode: kode.into(),
            beskrivelse: Some(beskrivelse.into()),
            links: Links::new(),
        }
    }
}

/// Postal or business address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adresse {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adresse: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postnummer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poststed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kommune: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kommunenummer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub land: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landkode: Option<String>,
}

/// Whether a single-record body describes a deleted entity.
///
/// Decided on the raw JSON before decoding: the registry marks deleted
/// records with `respons_klasse` or a `slettedato` field.
pub(crate) fn is_deleted_record(value: &serde_json::Value) -> bool {
    let marked = value
        .get("respons_klasse")
        .and_then(serde_json::Value::as_str)
        .is_some_and(|class| class.starts_with("Slettet"));
    marked || value.get("slettedato").is_some()
}
