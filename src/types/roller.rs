//! Role data (`/enheter/{orgnr}/roller`).

use serde::{Deserialize, Serialize};

use super::common::{Kode, Links};

/// All roles registered on a main entity, grouped by role group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roller {
    #[serde(default)]
    pub rollegrupper: Vec<Rollegruppe>,
    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

impl Roller {
    /// Every role across all groups.
    pub fn iter(&self) -> impl Iterator<Item = &Rolle> {
        self.rollegrupper.iter().flat_map(|gruppe| gruppe.roller.iter())
    }

    /// Roles of the given type code (e.g. `"DAGL"`, `"LEDE"`).
    pub fn by_type<'a>(&'a self, kode: &'a str) -> impl Iterator<Item = &'a Rolle> {
        self.iter().filter(move |rolle| rolle.rolletype.kode == kode)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rollegruppe {
    #[serde(rename = "type")]
    pub gruppetype: Kode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sist_endret: Option<String>,
    #[serde(default)]
    pub roller: Vec<Rolle>,
}

/// A single role held by a person or another entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rolle {
    #[serde(rename = "type")]
    pub rolletype: Kode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<RollePerson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhet: Option<RolleEnhet>,
    #[serde(default)]
    pub fratraadt: bool,
    #[serde(default)]
    pub avregistrert: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rekkefolge: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollePerson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fodselsdato: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navn: Option<Personnavn>,
    #[serde(default)]
    pub er_doed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personnavn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fornavn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mellomnavn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etternavn: Option<String>,
}

impl Personnavn {
    /// Name parts joined by single spaces, skipping absent ones.
    pub fn fullt_navn(&self) -> String {
        [&self.fornavn, &self.mellomnavn, &self.etternavn]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// An entity holding a role (e.g. an auditor firm).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolleEnhet {
    pub organisasjonsnummer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisasjonsform: Option<Kode>,
    #[serde(default)]
    pub navn: Vec<String>,
    #[serde(default)]
    pub er_slettet: bool,
}
