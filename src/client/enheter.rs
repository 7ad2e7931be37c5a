//! Entity and sub-entity operations.

use super::{ACCEPT_CSV, ACCEPT_SPREADSHEET, BrregClient, filtered_get, path_segment};
use crate::Result;
use crate::batch::{BatchResults, execute_many};
use crate::pipeline::{ACCEPT_JSON, ApiResponse, RequestDescriptor};
use crate::types::{
    EnhetOppslag, EnhetQuery, Enheter, UnderenhetOppslag, UnderenhetQuery, Underenheter,
};

impl BrregClient {
    /// Look up a main entity by organisation number.
    ///
    /// Deleted entities come back as [`EnhetOppslag::Slettet`].
    pub async fn get_enhet(&self, organisasjonsnummer: &str) -> Result<EnhetOppslag> {
        let orgnr = path_segment("organisasjonsnummer", organisasjonsnummer)?;
        let request = RequestDescriptor::get(format!("/enheter/{orgnr}"))
            .fingerprint(format!("enhet:{orgnr}"));
        let response = self.fetch(request).await?;
        EnhetOppslag::from_value(response.json_value()?)
            .map_err(|e| response.data_error(format!("unexpected entity body: {e}")))
    }

    /// Search main entities.
    pub async fn search_enheter(&self, query: &EnhetQuery) -> Result<Enheter> {
        let request = filtered_get("/enheter", query)?.cached_as("search_enheter");
        self.fetch_page(request, "enheter").await
    }

    /// Bulk download of main entities as JSON.
    pub async fn download_enheter_json(&self, query: &EnhetQuery) -> Result<ApiResponse> {
        self.fetch(filtered_get("/enheter/lastned", query)?.accept(ACCEPT_JSON))
            .await
    }

    pub async fn download_enheter_csv(&self, query: &EnhetQuery) -> Result<ApiResponse> {
        self.fetch(filtered_get("/enheter/lastned/csv", query)?.accept(ACCEPT_CSV))
            .await
    }

    pub async fn download_enheter_spreadsheet(&self, query: &EnhetQuery) -> Result<ApiResponse> {
        let request = filtered_get("/enheter/lastned/regneark", query)?.accept(ACCEPT_SPREADSHEET);
        self.fetch(request).await
    }

    /// Look up a sub-entity by organisation number.
    pub async fn get_underenhet(&self, organisasjonsnummer: &str) -> Result<UnderenhetOppslag> {
        let orgnr = path_segment("organisasjonsnummer", organisasjonsnummer)?;
        let request = RequestDescriptor::get(format!("/underenheter/{orgnr}"))
            .fingerprint(format!("underenhet:{orgnr}"));
        let response = self.fetch(request).await?;
        UnderenhetOppslag::from_value(response.json_value()?)
            .map_err(|e| response.data_error(format!("unexpected sub-entity body: {e}")))
    }

    /// Search sub-entities.
    pub async fn search_underenheter(&self, query: &UnderenhetQuery) -> Result<Underenheter> {
        let request = filtered_get("/underenheter", query)?.cached_as("search_underenheter");
        self.fetch_page(request, "underenheter").await
    }

    pub async fn download_underenheter_json(&self, query: &UnderenhetQuery) -> Result<ApiResponse> {
        self.fetch(filtered_get("/underenheter/lastned", query)?.accept(ACCEPT_JSON))
            .await
    }

    pub async fn download_underenheter_csv(&self, query: &UnderenhetQuery) -> Result<ApiResponse> {
        self.fetch(filtered_get("/underenheter/lastned/csv", query)?.accept(ACCEPT_CSV))
            .await
    }

    pub async fn download_underenheter_spreadsheet(
        &self,
        query: &UnderenhetQuery,
    ) -> Result<ApiResponse> {
        let request =
            filtered_get("/underenheter/lastned/regneark", query)?.accept(ACCEPT_SPREADSHEET);
        self.fetch(request).await
    }

    /// Look up many main entities concurrently.
    ///
    /// Every input number gets an entry, in input order; failures are
    /// recorded per key instead of aborting the batch.
    pub async fn get_enheter_batch<I, S>(
        &self,
        organisasjonsnumre: I,
    ) -> BatchResults<String, EnhetOppslag>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys = organisasjonsnumre.into_iter().map(Into::into);
        execute_many(keys, self.batch_concurrency, move |orgnr: String| async move {
            self.get_enhet(&orgnr).await
        })
        .await
    }

    /// Look up many sub-entities concurrently. See [`get_enheter_batch`](Self::get_enheter_batch).
    pub async fn get_underenheter_batch<I, S>(
        &self,
        organisasjonsnumre: I,
    ) -> BatchResults<String, UnderenhetOppslag>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys = organisasjonsnumre.into_iter().map(Into::into);
        execute_many(keys, self.batch_concurrency, move |orgnr: String| async move {
            self.get_underenhet(&orgnr).await
        })
        .await
    }
}
