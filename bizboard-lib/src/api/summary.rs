//! Summary counters endpoint

use crate::DashboardClient;
use crate::error::Error;
use crate::model::Summary;

impl DashboardClient {
    /// Fetches the dashboard's summary counters from `GET /api/summary`.
    pub async fn summary(&self) -> Result<Summary, Error> {
        let request = self.http_get("api/summary")?;
        self.send_json(request).await
    }
}
