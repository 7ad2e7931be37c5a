//! Sub-entities (`/underenheter`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{Adresse, Kode, Links, is_deleted_record};

/// An active sub-entity (a business location of a main entity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Underenhet {
    pub organisasjonsnummer: String,
    pub navn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisasjonsform: Option<Kode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overordnet_enhet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hjemmeside: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postadresse: Option<Adresse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beliggenhetsadresse: Option<Adresse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registreringsdato_enhetsregisteret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oppstartsdato: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dato_eierskifte: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nedleggelsesdato: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naeringskode1: Option<Kode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naeringskode2: Option<Kode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naeringskode3: Option<Kode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hjelpeenhetskode: Option<Kode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antall_ansatte: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub har_registrert_antall_ansatte: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registrert_i_mvaregisteret: Option<bool>,
    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

/// A sub-entity that has been deleted from the register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlettetUnderenhet {
    pub organisasjonsnummer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisasjonsform: Option<Kode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overordnet_enhet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slettedato: Option<String>,
    #[serde(
        rename = "respons_klasse",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub respons_klasse: Option<String>,
    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

/// Result of looking up a single sub-entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UnderenhetOppslag {
    Aktiv(Box<Underenhet>),
    Slettet(SlettetUnderenhet),
}

impl UnderenhetOppslag {
    /// Decode a lookup body, choosing the variant from its deletion markers.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        if is_deleted_record(&value) {
            serde_json::from_value(value).map(Self::Slettet)
        } else {
            serde_json::from_value(value).map(|underenhet| Self::Aktiv(Box::new(underenhet)))
        }
    }

    pub fn organisasjonsnummer(&self) -> &str {
        match self {
            Self::Aktiv(underenhet) => &underenhet.organisasjonsnummer,
            Self::Slettet(slettet) => &slettet.organisasjonsnummer,
        }
    }

    pub fn navn(&self) -> Option<&str> {
        match self {
            Self::Aktiv(underenhet) => Some(&underenhet.navn),
            Self::Slettet(slettet) => slettet.navn.as_deref(),
        }
    }

    pub fn is_slettet(&self) -> bool {
        matches!(self, Self::Slettet(_))
    }

    pub fn as_aktiv(&self) -> Option<&Underenhet> {
        match self {
            Self::Aktiv(underenhet) => Some(underenhet),
            Self::Slettet(_) => None,
        }
    }

    pub fn as_slettet(&self) -> Option<&SlettetUnderenhet> {
        match self {
            Self::Slettet(slettet) => Some(slettet),
            Self::Aktiv(_) => None,
        }
    }

    pub fn into_aktiv(self) -> Option<Underenhet> {
        match self {
            Self::Aktiv(underenhet) => Some(*underenhet),
            Self::Slettet(_) => None,
        }
    }
}
