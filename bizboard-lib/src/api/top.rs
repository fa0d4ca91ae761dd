//! Top-N aggregation endpoints

use crate::DashboardClient;
use crate::error::Error;
use crate::model::CityCount;
use crate::model::StateCount;

impl DashboardClient {
    /// Fetches the top states by record count from
    /// `GET /api/top-states?limit=N`.
    pub async fn top_states(&self, limit: usize) -> Result<Vec<StateCount>, Error> {
        let request = self
            .http_get("api/top-states")?
            .query(&[("limit", limit.to_string())]);
        self.send_json(request).await
    }

    /// Fetches the top cities by record count from
    /// `GET /api/top-cities?limit=N`.
    pub async fn top_cities(&self, limit: usize) -> Result<Vec<CityCount>, Error> {
        let request = self
            .http_get("api/top-cities")?
            .query(&[("limit", limit.to_string())]);
        self.send_json(request).await
    }
}
