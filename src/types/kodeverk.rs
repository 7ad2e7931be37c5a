//! Code lists: municipalities and organisation forms.

use serde::{Deserialize, Serialize};

use super::common::Links;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kommune {
    pub nummer: String,
    pub navn: String,
    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organisasjonsform {
    pub kode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beskrivelse: Option<String>,
    /// Date the form was retired, if no longer in use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utgaatt: Option<String>,
    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

impl Organisasjonsform {
    pub fn is_utgaatt(&self) -> bool {
        self.utgaatt.is_some()
    }
}
