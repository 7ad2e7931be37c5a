//! Change feed operations.

use super::{BrregClient, filtered_get};
use crate::Result;
use crate::types::{OppdateringQuery, Oppdateringer, RolleOppdatering};

impl BrregClient {
    /// Changes to main entities since `query.dato` / `query.oppdateringsid`.
    pub async fn enhet_oppdateringer(&self, query: &OppdateringQuery) -> Result<Oppdateringer> {
        let request =
            filtered_get("/oppdateringer/enheter", query)?.cached_as("oppdateringer_enheter");
        self.fetch_page(request, "oppdaterteEnheter").await
    }

    /// Changes to sub-entities since `query.dato` / `query.oppdateringsid`.
    pub async fn underenhet_oppdateringer(&self, query: &OppdateringQuery) -> Result<Oppdateringer> {
        let request = filtered_get("/oppdateringer/underenheter", query)?
            .cached_as("oppdateringer_underenheter");
        self.fetch_page(request, "oppdaterteUnderenheter").await
    }

    /// Role change events after `query.after_time` / `query.after_id`.
    pub async fn rolle_oppdateringer(&self, query: &OppdateringQuery) -> Result<Vec<RolleOppdatering>> {
        let request = filtered_get("/oppdateringer/roller", query)?.cached_as("oppdateringer_roller");
        self.fetch_list(request, "oppdateringer").await
    }
}
