//! Server-side table endpoint

use async_trait::async_trait;
use serde_json::Value;

use crate::DashboardClient;
use crate::api::query::Column;
use crate::api::query::PageRequest;
use crate::api::query::PageResponse;
use crate::api::query::wire;
use crate::error::ApiError;
use crate::error::Error;
use crate::store::RecordStore;

impl DashboardClient {
    /// Fetches one page of table data in a single round trip.
    ///
    /// Encodes the request, issues `GET /api/table`, and decodes the
    /// envelope with the page invariants enforced. For interactive use
    /// prefer [`TableController`](crate::controller::TableController),
    /// which owns the pagination/sort/search state and discards stale
    /// responses.
    pub async fn table_page(
        &self,
        request: &PageRequest,
        columns: &[Column],
    ) -> Result<PageResponse, Error> {
        let params = wire::encode_request(request, columns)?;
        let raw = self.fetch_table(&params).await?;
        Ok(wire::decode_response(raw, request)?)
    }
}

#[async_trait]
impl RecordStore for DashboardClient {
    async fn fetch_table(&self, params: &[(String, String)]) -> Result<Value, Error> {
        let request = self.http_get("api/table")?.query(&params);
        let response = request.send().await.map_err(ApiError::from)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::http(status, body).into());
        }

        // JSON syntax failures are transport errors; everything past this
        // point is the codec's concern.
        let body = response.text().await.map_err(ApiError::from)?;
        let value = serde_json::from_str(&body)
            .map_err(|e| ApiError::parse_with_body(e.to_string(), body))?;
        Ok(value)
    }
}
