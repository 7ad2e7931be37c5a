//! Search and feed filters.
//!
//! Every field is optional; unset fields never reach the query string.
//! List-valued filters are sent comma-separated, which is how the registry
//! expects multi-value parameters.

use serde::Serialize;
use serde_json::Value;

use crate::Result;
use crate::error::{BrregError, ErrorContext, ErrorKind};

/// Filters for `/enheter` searches and downloads.
///
/// ```rust
/// # use brreg::EnhetQuery;
/// let query = EnhetQuery::new().navn("Equinor").organisasjonsform(["ASA"]).size(5);
/// assert_eq!(query.size, Some(5));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhetQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navn: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub organisasjonsnummer: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub organisasjonsform: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overordnet_enhet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hjemmeside: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kommunenummer: Option<String>,
    #[serde(
        rename = "postadresse.kommunenummer",
        skip_serializing_if = "Option::is_none"
    )]
    pub postadresse_kommunenummer: Option<String>,
    #[serde(
        rename = "forretningsadresse.kommunenummer",
        skip_serializing_if = "Option::is_none"
    )]
    pub forretningsadresse_kommunenummer: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub naeringskode: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sektorkode: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fra_antall_ansatte: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub til_antall_ansatte: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub konkurs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub under_avvikling: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub under_tvangsavvikling_eller_tvangsopplosning: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrert_i_mvaregisteret: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrert_i_foretaksregisteret: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrert_i_stiftelsesregisteret: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrert_i_frivillighetsregisteret: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fra_registreringsdato_enhetsregisteret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub til_registreringsdato_enhetsregisteret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fra_stiftelsesdato: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub til_stiftelsesdato: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl EnhetQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navn(mut self, navn: impl Into<String>) -> Self {
        self.navn = Some(navn.into());
        self
    }

    pub fn organisasjonsnummer<S: Into<String>>(mut self, nr: impl IntoIterator<Item = S>) -> Self {
        self.organisasjonsnummer = nr.into_iter().map(Into::into).collect();
        self
    }

    pub fn organisasjonsform<S: Into<String>>(mut self, koder: impl IntoIterator<Item = S>) -> Self {
        self.organisasjonsform = koder.into_iter().map(Into::into).collect();
        self
    }

    pub fn kommunenummer(mut self, nr: impl Into<String>) -> Self {
        self.kommunenummer = Some(nr.into());
        self
    }

    pub fn naeringskode<S: Into<String>>(mut self, koder: impl IntoIterator<Item = S>) -> Self {
        self.naeringskode = koder.into_iter().map(Into::into).collect();
        self
    }

    pub fn konkurs(mut self, konkurs: bool) -> Self {
        self.konkurs = Some(konkurs);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }
}

/// Filters for `/underenheter` searches and downloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnderenhetQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navn: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub organisasjonsnummer: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub organisasjonsform: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overordnet_enhet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hjemmeside: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kommunenummer: Option<String>,
    #[serde(
        rename = "beliggenhetsadresse.kommunenummer",
        skip_serializing_if = "Option::is_none"
    )]
    pub beliggenhetsadresse_kommunenummer: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub naeringskode: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fra_antall_ansatte: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub til_antall_ansatte: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrert_i_mvaregisteret: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fra_oppstartsdato: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub til_oppstartsdato: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fra_registreringsdato_enhetsregisteret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub til_registreringsdato_enhetsregisteret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl UnderenhetQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navn(mut self, navn: impl Into<String>) -> Self {
        self.navn = Some(navn.into());
        self
    }

    pub fn overordnet_enhet(mut self, orgnr: impl Into<String>) -> Self {
        self.overordnet_enhet = Some(orgnr.into());
        self
    }

    pub fn kommunenummer(mut self, nr: impl Into<String>) -> Self {
        self.kommunenummer = Some(nr.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }
}

/// Filters for the change feeds under `/oppdateringer`.
///
/// Entity feeds use `dato`/`oppdateringsid`; the role feed uses
/// `after_time`/`after_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OppdateringQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dato: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oppdateringsid: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_id: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub organisasjonsnummer: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_changes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl OppdateringQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dato(mut self, dato: impl Into<String>) -> Self {
        self.dato = Some(dato.into());
        self
    }

    pub fn oppdateringsid(mut self, id: u64) -> Self {
        self.oppdateringsid = Some(id);
        self
    }

    pub fn after_time(mut self, time: impl Into<String>) -> Self {
        self.after_time = Some(time.into());
        self
    }

    pub fn after_id(mut self, id: u64) -> Self {
        self.after_id = Some(id);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }
}

/// Filters for `/matrikkelenhet` (cadastral unit) lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrikkelQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kommunenummer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gardsnummer: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bruksnummer: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub festenummer: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seksjonsnummer: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

/// Render a filter struct as ordered query parameters.
///
/// Nulls are dropped, arrays are joined with `,` and scalars are rendered
/// without JSON quoting. Keys come out sorted.
pub fn query_params<Q: Serialize>(query: &Q) -> Result<Vec<(String, String)>> {
    let map = match serde_json::to_value(query) {
        Ok(Value::Object(map)) => map,
        Ok(other) => return Err(invalid_query(format!("expected a struct, found {other}"))),
        Err(e) => return Err(invalid_query(e.to_string())),
    };

    let mut params: Vec<(String, String)> = map
        .into_iter()
        .filter_map(|(key, value)| render(value).map(|rendered| (key, rendered)))
        .collect();
    params.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(params)
}

fn render(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Array(items) => {
            let parts: Vec<String> = items.into_iter().filter_map(render).collect();
            (!parts.is_empty()).then(|| parts.join(","))
        }
        other => Some(other.to_string()),
    }
}

fn invalid_query(message: String) -> BrregError {
    BrregError::new(
        ErrorKind::Validation,
        ErrorContext::new(format!("invalid query: {message}")),
    )
}
