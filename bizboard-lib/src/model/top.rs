//! Top-N aggregation payloads

use serde::Deserialize;
use serde::Serialize;

/// One row of the `GET /api/top-states` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCount {
    /// The state name; `"Unknown"` for records with no state.
    #[serde(rename = "State")]
    pub state: String,
    /// Number of records in that state.
    pub count: u64,
}

/// One row of the `GET /api/top-cities` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityCount {
    /// The city name; `"Unknown"` for records with no city.
    #[serde(rename = "City")]
    pub city: String,
    /// The state the city belongs to.
    #[serde(rename = "State")]
    pub state: String,
    /// Number of records in that city.
    pub count: u64,
}

impl CityCount {
    /// Display label in the `City (State)` form the dashboard renders.
    pub fn label(&self) -> String {
        format!("{} ({})", self.city, self.state)
    }
}
