//! CSV export endpoint

use crate::DashboardClient;
use crate::error::Error;

impl DashboardClient {
    /// Downloads the full record set as CSV from `GET /download/csv`.
    pub async fn export_csv(&self) -> Result<String, Error> {
        let request = self.http_get("download/csv")?;
        self.send_text(request).await
    }
}
