//! Summary counter payload

use serde::Deserialize;
use serde::Serialize;

/// The dashboard's summary counters, as returned by `GET /api/summary`.
///
/// Consumed verbatim for display; the client performs no aggregation of
/// its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Total number of records in the store.
    pub total_records: u64,
    /// Number of distinct states.
    pub unique_states: u64,
    /// Number of distinct cities.
    pub unique_cities: u64,
    /// Number of distinct owner names.
    pub unique_owners: u64,
    /// Records with a phone number present.
    pub phones_present: u64,
    /// Records with no phone number.
    pub phones_missing: u64,
    /// Records sharing business name, city and state with another record.
    pub potential_duplicates: u64,
}

impl Summary {
    /// Percentage of records with a phone number, rounded to the nearest
    /// whole percent. Zero when the store is empty.
    pub fn phones_present_percent(&self) -> u64 {
        if self.total_records == 0 {
            return 0;
        }
        (self.phones_present * 100 + self.total_records / 2) / self.total_records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_percentage_rounds() {
        let summary = Summary {
            total_records: 3,
            unique_states: 1,
            unique_cities: 1,
            unique_owners: 3,
            phones_present: 2,
            phones_missing: 1,
            potential_duplicates: 0,
        };
        // 2/3 = 66.7%, rounds to 67
        assert_eq!(summary.phones_present_percent(), 67);
    }

    #[test]
    fn phone_percentage_empty_store() {
        let summary = Summary {
            total_records: 0,
            unique_states: 0,
            unique_cities: 0,
            unique_owners: 0,
            phones_present: 0,
            phones_missing: 0,
            potential_duplicates: 0,
        };
        assert_eq!(summary.phones_present_percent(), 0);
    }
}
