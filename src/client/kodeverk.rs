//! Code list operations.

use super::{BrregClient, filtered_get, path_segment};
use crate::Result;
use crate::pipeline::RequestDescriptor;
use crate::types::{Kode, Kommune, MatrikkelQuery, Organisasjonsform};

impl BrregClient {
    pub async fn kommuner(&self) -> Result<Vec<Kommune>> {
        let request = RequestDescriptor::get("/kommuner").cached_as("kommuner");
        self.fetch_list(request, "kommuner").await
    }

    pub async fn get_kommune(&self, kommunenummer: &str) -> Result<Kommune> {
        let nr = path_segment("kommunenummer", kommunenummer)?;
        let request = RequestDescriptor::get(format!("/kommuner/{nr}"))
            .fingerprint(format!("kommune:{nr}"));
        self.fetch_json(request).await
    }

    /// All organisation forms, active and retired.
    pub async fn organisasjonsformer(&self) -> Result<Vec<Organisasjonsform>> {
        let request = RequestDescriptor::get("/organisasjonsformer").cached_as("organisasjonsformer");
        self.fetch_list(request, "organisasjonsformer").await
    }

    /// Organisation forms valid for main entities.
    pub async fn organisasjonsformer_enheter(&self) -> Result<Vec<Organisasjonsform>> {
        let request = RequestDescriptor::get("/organisasjonsformer/enheter")
            .cached_as("organisasjonsformer_enheter");
        self.fetch_list(request, "organisasjonsformer").await
    }

    /// Organisation forms valid for sub-entities.
    pub async fn organisasjonsformer_underenheter(&self) -> Result<Vec<Organisasjonsform>> {
        let request = RequestDescriptor::get("/organisasjonsformer/underenheter")
            .cached_as("organisasjonsformer_underenheter");
        self.fetch_list(request, "organisasjonsformer").await
    }

    pub async fn get_organisasjonsform(&self, kode: &str) -> Result<Organisasjonsform> {
        let kode = path_segment("organisasjonskode", kode)?;
        let request = RequestDescriptor::get(format!("/organisasjonsformer/{kode}"))
            .fingerprint(format!("organisasjonsform:{kode}"));
        self.fetch_json(request).await
    }

    /// Industry codes (NACE).
    pub async fn naeringskoder(&self) -> Result<Vec<Kode>> {
        let request = RequestDescriptor::get("/kodeverk/naeringskoder").cached_as("naeringskoder");
        self.fetch_list(request, "naeringskoder").await
    }

    /// Institutional sector codes.
    pub async fn sektorkoder(&self) -> Result<Vec<Kode>> {
        let request = RequestDescriptor::get("/kodeverk/sektorkoder").cached_as("sektorkoder");
        self.fetch_list(request, "sektorkoder").await
    }

    /// Cadastral units, passed through as raw JSON.
    pub async fn matrikkelenheter(&self, query: &MatrikkelQuery) -> Result<serde_json::Value> {
        let request = filtered_get("/matrikkelenhet", query)?.cached_as("matrikkelenhet");
        self.fetch_json(request).await
    }
}
