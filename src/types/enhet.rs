//! Main entities (`/enheter`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{Adresse, Kode, Links, is_deleted_record};

/// An active main entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enhet {
    pub organisasjonsnummer: String,
    pub navn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisasjonsform: Option<Kode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hjemmeside: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epostadresse: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobil: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postadresse: Option<Adresse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forretningsadresse: Option<Adresse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registreringsdato_enhetsregisteret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stiftelsesdato: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naeringskode1: Option<Kode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naeringskode2: Option<Kode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naeringskode3: Option<Kode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hjelpeenhetskode: Option<Kode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institusjonell_sektorkode: Option<Kode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antall_ansatte: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub har_registrert_antall_ansatte: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overordnet_enhet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registrert_i_mvaregisteret: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registrert_i_foretaksregisteret: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registrert_i_stiftelsesregisteret: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registrert_i_frivillighetsregisteret: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub siste_innsendte_aarsregnskap: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub konkurs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub konkursdato: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub under_avvikling: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub under_avviklingsdato: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub under_tvangsavvikling_eller_tvangsopplosning: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maalform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vedtektsdato: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vedtektsfestet_formaal: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aktivitet: Vec<String>,
    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

/// A main entity that has been deleted from the register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlettetEnhet {
    pub organisasjonsnummer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisasjonsform: Option<Kode>,
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

/// Result of looking up a single main entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnhetOppslag {
    Aktiv(Box<Enhet>),
    Slettet(SlettetEnhet),
}

impl EnhetOppslag {
    /// Decode a lookup body, choosing the variant from its deletion markers.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        if is_deleted_record(&value) {
            serde_json::from_value(value).map(Self::Slettet)
        } else {
            serde_json::from_value(value).map(|enhet| Self::Aktiv(Box::new(enhet)))
        }
    }

    pub fn organisasjonsnummer(&self) -> &str {
        match self {
            Self::Aktiv(enhet) => &enhet.organisasjonsnummer,
            Self::Slettet(slettet) => &slettet.organisasjonsnummer,
        }
    }

    pub fn navn(&self) -> Option<&str> {
        match self {
            Self::Aktiv(enhet) => Some(&enhet.navn),
            Self::Slettet(slettet) => slettet.navn.as_deref(),
        }
    }

    pub fn is_slettet(&self) -> bool {
        matches!(self, Self::Slettet(_))
    }

    pub fn as_aktiv(&self) -> Option<&Enhet> {
        match self {
            Self::Aktiv(enhet) => Some(enhet),
            Self::Slettet(_) => None,
        }
    }

    pub fn as_slettet(&self) -> Option<&SlettetEnhet> {
        match self {
            Self::Slettet(slettet) => Some(slettet),
            Self::Aktiv(_) => None,
        }
    }

    pub fn into_aktiv(self) -> Option<Enhet> {
        match self {
            Self::Aktiv(enhet) => Some(*enhet),
            Self::Slettet(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn active_entity_decodes_camel_case_fields() {
        let oppslag = EnhetOppslag::from_value(json!({
            "organisasjonsnummer": "987654321",
            "navn": "Test Company AS",
            "organisasjonsform": {"kode": "AS", "beskrivelse": "Aksjeselskap"},
            "registrertIMvaregisteret": true,
            "underTvangsavviklingEllerTvangsopplosning": false,
            "registreringsdatoEnhetsregisteret": "2023-01-01",
            "_links": {"self": {"href": "https://example.test/enheter/987654321"}}
        }))
        .unwrap();

        let enhet = oppslag.as_aktiv().unwrap();
        assert_eq!(enhet.navn, "Test Company AS");
        assert_eq!(enhet.registrert_i_mvaregisteret, Some(true));
        assert_eq!(enhet.under_tvangsavvikling_eller_tvangsopplosning, Some(false));
        assert_eq!(
            enhet.registreringsdato_enhetsregisteret.as_deref(),
            Some("2023-01-01")
        );
        assert_eq!(enhet.links["self"].href, "https://example.test/enheter/987654321");
    }

    #[test]
    fn deleted_entity_is_selected_by_marker() {
        let oppslag = EnhetOppslag::from_value(json!({
            "respons_klasse": "SlettetEnhet",
            "organisasjonsnummer": "123456780",
            "navn": "Deleted Company AS",
            "slettedato": "2024-02-15"
        }))
        .unwrap();

        assert!(oppslag.is_slettet());
        assert_eq!(oppslag.organisasjonsnummer(), "123456780");
        assert_eq!(
            oppslag.as_slettet().unwrap().slettedato.as_deref(),
            Some("2024-02-15")
        );
    }

    #[test]
    fn active_shape_error_is_not_masked() {
        // no deletion marker, missing required navn: must fail, not fall back
        let err = EnhetOppslag::from_value(json!({"organisasjonsnummer": "1"}));
        assert!(err.is_err());
    }
}
