//! In-memory record store.

use std::cmp::Ordering;

use async_trait::async_trait;
use serde_json::Value;
use serde_json::json;

use super::RecordStore;
use crate::api::query::Column;
use crate::api::query::Direction;
use crate::api::query::PageRequest;
use crate::api::query::wire;
use crate::error::Error;
use crate::model::Record;

/// A record store holding the full record set in process.
///
/// Implements the same semantics as the dashboard's HTTP backend:
/// case-insensitive substring search across every field, stable multi-key
/// sorting, and a clamped pagination slice. Used by tests and by the CLI's
/// offline demo mode.
///
/// # Example
///
/// ```
/// use bizboard_lib::model::Record;
/// use bizboard_lib::store::MemoryStore;
///
/// let store = MemoryStore::new(vec![
///     Record::new().set("Business Name", "Acme Corp").set("State", "CA"),
///     Record::new().set("Business Name", "Bolt Ltd").set("State", "TX"),
/// ]);
/// assert_eq!(store.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<Record>,
}

impl MemoryStore {
    /// Creates a store over the given records. Insertion order is the
    /// store's stable secondary order.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Returns the number of records in the store.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Resolves a parsed request to `(total, filtered, page indices)`.
    ///
    /// Ties under the full sort directive list fall back to insertion
    /// order, so the ordering is total: identical requests always paginate
    /// identically and a record can neither repeat across pages nor fall
    /// between them.
    fn select(&self, request: &PageRequest, columns: &[Column]) -> (u64, u64, Vec<usize>) {
        let needle = request.search.trim().to_lowercase();
        let mut indices: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| needle.is_empty() || matches(record, &needle))
            .map(|(i, _)| i)
            .collect();

        let filtered = indices.len() as u64;

        if !request.order.is_empty() {
            indices.sort_by(|&a, &b| {
                for key in &request.order {
                    let field = columns[key.column].field();
                    let ord = sort_value(&self.records[a], field)
                        .cmp(&sort_value(&self.records[b], field));
                    let ord = match key.direction {
                        Direction::Asc => ord,
                        Direction::Desc => ord.reverse(),
                    };
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.cmp(&b)
            });
        }

        let page: Vec<usize> = indices
            .into_iter()
            .skip(request.offset as usize)
            .take(request.page_size as usize)
            .collect();

        (self.records.len() as u64, filtered, page)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch_table(&self, params: &[(String, String)]) -> Result<Value, Error> {
        let (request, columns) = wire::parse_request(params)?;
        let (total, filtered, page) = self.select(&request, &columns);

        let data: Vec<Value> = page
            .into_iter()
            .map(|i| serde_json::to_value(&self.records[i]).unwrap_or(Value::Null))
            .collect();

        Ok(json!({
            "draw": request.draw,
            "recordsTotal": total,
            "recordsFiltered": filtered,
            "data": data,
        }))
    }
}

/// Case-insensitive substring match across every field of the record.
fn matches(record: &Record, needle: &str) -> bool {
    record
        .fields()
        .keys()
        .any(|field| record.display(field).to_lowercase().contains(needle))
}

/// Sort key for one field. Records missing the field sort first.
fn sort_value(record: &Record, field: &str) -> Option<String> {
    match record.get(field) {
        None | Some(Value::Null) => None,
        Some(_) => Some(record.display(field).to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::query::SortKey;
    use crate::api::query::wire::decode_response;
    use crate::api::query::wire::encode_request;

    const STATES: [&str; 5] = ["CA", "TX", "NY", "WA", "FL"];

    fn columns() -> Vec<Column> {
        vec![
            Column::new("Business Name"),
            Column::new("Owner Name"),
            Column::new("City"),
            Column::new("State"),
            Column::new("Mobile Number"),
        ]
    }

    fn seeded_store() -> MemoryStore {
        let mut records = Vec::new();
        for i in 0..25 {
            let name = match i {
                3 => "Acme Corp".to_string(),
                11 => "Acme Supplies".to_string(),
                _ => format!("Biz {i:02}"),
            };
            let owner = if i == 19 { "Joe Acme" } else { "Owner" };
            let mut record = Record::new()
                .set("Business Name", name)
                .set("Owner Name", owner)
                .set("City", format!("City {}", i % 4))
                .set("State", STATES[i % STATES.len()]);
            if i % 3 != 0 {
                record.insert("Mobile Number", format!("555-01{i:02}"));
            }
            records.push(record);
        }
        MemoryStore::new(records)
    }

    async fn fetch(store: &MemoryStore, request: &PageRequest) -> Value {
        let params = encode_request(request, &columns()).unwrap();
        store.fetch_table(&params).await.unwrap()
    }

    #[tokio::test]
    async fn first_page_of_unfiltered_store() {
        let store = seeded_store();
        let request = PageRequest::new(1).with_page_size(10);

        let page = decode_response(fetch(&store, &request).await, &request).unwrap();

        assert_eq!(page.len(), 10);
        assert_eq!(page.records_filtered(), 25);
        assert_eq!(page.records_total(), 25);
        assert_eq!(page.rows()[0].get_str("Business Name"), Some("Biz 00"));
    }

    #[tokio::test]
    async fn search_reports_filtered_count() {
        let store = seeded_store();
        let request = PageRequest::new(2).with_page_size(10).with_search("Acme");

        let page = decode_response(fetch(&store, &request).await, &request).unwrap();

        assert_eq!(page.records_filtered(), 3);
        assert_eq!(page.records_total(), 25);
        assert_eq!(page.len(), 3);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_spans_fields() {
        let store = seeded_store();
        let request = PageRequest::new(3).with_page_size(10).with_search("jOe");

        let page = decode_response(fetch(&store, &request).await, &request).unwrap();

        // Matches on Owner Name, not Business Name.
        assert_eq!(page.records_filtered(), 1);
        assert_eq!(page.rows()[0].get_str("Owner Name"), Some("Joe Acme"));
    }

    #[tokio::test]
    async fn identical_requests_yield_identical_responses() {
        let store = seeded_store();
        let request = PageRequest::new(4)
            .with_page_size(10)
            .with_order(vec![SortKey::asc(3)]);

        let first = fetch(&store, &request).await;
        let second = fetch(&store, &request).await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn descending_sort_orders_by_field() {
        let store = seeded_store();
        let request = PageRequest::new(5)
            .with_page_size(10)
            .with_order(vec![SortKey::desc(3)]);

        let page = decode_response(fetch(&store, &request).await, &request).unwrap();

        assert_eq!(page.rows()[0].get_str("State"), Some("WA"));
    }

    #[tokio::test]
    async fn equal_sort_keys_paginate_without_gaps_or_duplicates() {
        // All records share the sort key, so only the tie-break orders them.
        let records: Vec<Record> = (0..25)
            .map(|i| {
                Record::new()
                    .set("Business Name", format!("Biz {i:02}"))
                    .set("State", "TX")
            })
            .collect();
        let store = MemoryStore::new(records);

        let mut seen = Vec::new();
        for page_index in 0..3 {
            let request = PageRequest::new(page_index + 1)
                .with_offset(page_index * 10)
                .with_page_size(10)
                .with_order(vec![SortKey::asc(3)]);
            let page = decode_response(fetch(&store, &request).await, &request).unwrap();
            for row in page.rows() {
                seen.push(row.get_str("Business Name").unwrap().to_string());
            }
        }

        let expected: Vec<String> = (0..25).map(|i| format!("Biz {i:02}")).collect();
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn offset_past_the_end_returns_empty_page() {
        let store = seeded_store();
        let request = PageRequest::new(6).with_offset(1000).with_page_size(10);

        let page = decode_response(fetch(&store, &request).await, &request).unwrap();

        assert!(page.is_empty());
        assert_eq!(page.records_filtered(), 25);
    }

    #[tokio::test]
    async fn records_missing_the_sort_field_come_first() {
        let records = vec![
            Record::new().set("Business Name", "Zed").set("State", "TX"),
            Record::new().set("Business Name", "NoState"),
            Record::new().set("Business Name", "Ark").set("State", "CA"),
        ];
        let store = MemoryStore::new(records);
        let request = PageRequest::new(7)
            .with_page_size(10)
            .with_order(vec![SortKey::asc(3)]);

        let page = decode_response(fetch(&store, &request).await, &request).unwrap();
        let names: Vec<_> = page
            .rows()
            .iter()
            .map(|r| r.get_str("Business Name").unwrap())
            .collect();

        assert_eq!(names, ["NoState", "Ark", "Zed"]);
    }
}
