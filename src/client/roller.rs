//! Role operations.

use super::{ACCEPT_ZIP, BrregClient, path_segment};
use crate::Result;
use crate::pipeline::{ApiResponse, RequestDescriptor};
use crate::types::{Kode, Roller};

impl BrregClient {
    /// All roles registered on a main entity.
    pub async fn get_enhet_roller(&self, organisasjonsnummer: &str) -> Result<Roller> {
        let orgnr = path_segment("organisasjonsnummer", organisasjonsnummer)?;
        let request = RequestDescriptor::get(format!("/enheter/{orgnr}/roller"))
            .fingerprint(format!("roller:{orgnr}"));
        self.fetch_json(request).await
    }

    /// Role group types (e.g. board, management).
    pub async fn rollegruppetyper(&self) -> Result<Vec<Kode>> {
        let request = RequestDescriptor::get("/roller/rollegruppetyper").cached_as("rollegruppetyper");
        self.fetch_list(request, "rollegruppetyper").await
    }

    /// Role types (e.g. `DAGL`, `LEDE`, `REVI`).
    pub async fn rolletyper(&self) -> Result<Vec<Kode>> {
        let request = RequestDescriptor::get("/roller/rolletyper").cached_as("rolletyper");
        self.fetch_list(request, "rolletyper").await
    }

    /// Representative roles, passed through as raw JSON.
    pub async fn rolle_representanter(&self) -> Result<serde_json::Value> {
        let request = RequestDescriptor::get("/roller/representanter").cached_as("representanter");
        self.fetch_json(request).await
    }

    /// Complete role dataset as a zip archive.
    pub async fn download_roller_totalbestand(&self) -> Result<ApiResponse> {
        self.fetch(RequestDescriptor::get("/roller/totalbestand").accept(ACCEPT_ZIP))
            .await
    }
}
