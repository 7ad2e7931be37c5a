//! Change feeds (`/oppdateringer/...`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::Links;

/// One change to an entity or sub-entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Oppdatering {
    pub oppdateringsid: u64,
    pub dato: String,
    pub organisasjonsnummer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endringstype: Option<String>,
    /// Field-level changes, present when requested with `includeChanges`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endringer: Option<Value>,
    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

/// One role change event, in the registry's CloudEvents format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolleOppdatering {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub hendelsestype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specversion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datacontenttype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RolleOppdatering {
    /// Organisation number of the entity whose roles changed.
    pub fn organisasjonsnummer(&self) -> Option<&str> {
        self.data
            .as_ref()?
            .get("organisasjonsnummer")?
            .as_str()
    }
}
