//! Wire codec for the table query protocol.
//!
//! Translates between [`PageRequest`] / [`PageResponse`] and the flat
//! key-value query / JSON envelope the `/api/table` endpoint speaks. All
//! functions here are pure; transport concerns (HTTP status, JSON syntax)
//! live at the store boundary.

use serde_json::Value;

use crate::api::query::Column;
use crate::api::query::Direction;
use crate::api::query::PageRequest;
use crate::api::query::PageResponse;
use crate::api::query::SortKey;
use crate::error::ProtocolError;
use crate::model::Record;

/// Default page size a server assumes when `length` is absent.
const DEFAULT_LENGTH: u64 = 25;

/// Encodes a page request as the flat query sent to the table endpoint.
///
/// The column-to-field mapping is included on every request so the server
/// stays stateless. Rejects disallowed page sizes and sort directives
/// pointing outside the column list instead of sending them.
pub fn encode_request(
    request: &PageRequest,
    columns: &[Column],
) -> Result<Vec<(String, String)>, ProtocolError> {
    if !PageRequest::page_size_allowed(request.page_size) {
        return Err(ProtocolError::PageSizeNotAllowed(request.page_size));
    }
    for key in &request.order {
        if key.column >= columns.len() {
            return Err(ProtocolError::UnknownSortColumn {
                column: key.column,
                columns: columns.len(),
            });
        }
    }

    let mut params = Vec::with_capacity(4 + 2 * request.order.len() + columns.len());
    params.push(("draw".to_string(), request.draw.to_string()));
    params.push(("start".to_string(), request.offset.to_string()));
    params.push(("length".to_string(), request.page_size.to_string()));
    params.push(("search[value]".to_string(), request.search.clone()));

    for (i, key) in request.order.iter().enumerate() {
        params.push((format!("order[{i}][column]"), key.column.to_string()));
        params.push((format!("order[{i}][dir]"), key.direction.as_str().to_string()));
    }
    for (i, column) in columns.iter().enumerate() {
        params.push((format!("columns[{i}][data]"), column.field().to_string()));
    }

    Ok(params)
}

/// Parses a flat query back into a page request and its column mapping.
///
/// This is the server-side inverse of [`encode_request`], used by the
/// in-memory store. `draw` is required; `start` and `length` default to
/// `0` and `25` when absent. Malformed numeric values are rejected.
pub fn parse_request(
    params: &[(String, String)],
) -> Result<(PageRequest, Vec<Column>), ProtocolError> {
    let draw = match param(params, "draw") {
        Some(value) => parse_u64("draw", value)?,
        None => return Err(ProtocolError::MissingField("draw")),
    };
    let offset = match param(params, "start") {
        Some(value) => parse_u64("start", value)?,
        None => 0,
    };
    let page_size = match param(params, "length") {
        Some(value) => parse_u64("length", value)?,
        None => DEFAULT_LENGTH,
    };
    if page_size == 0 {
        return Err(ProtocolError::BadParameter {
            name: "length".to_string(),
            value: "0".to_string(),
        });
    }
    let search = param(params, "search[value]").unwrap_or_default().to_string();

    let mut columns = Vec::new();
    while let Some(field) = param(params, &format!("columns[{}][data]", columns.len())) {
        columns.push(Column::new(field));
    }

    let mut order = Vec::new();
    while let Some(value) = param(params, &format!("order[{}][column]", order.len())) {
        let name = format!("order[{}][column]", order.len());
        let column: usize = value.parse().map_err(|_| ProtocolError::BadParameter {
            name,
            value: value.to_string(),
        })?;
        if column >= columns.len() {
            return Err(ProtocolError::UnknownSortColumn {
                column,
                columns: columns.len(),
            });
        }
        let dir_name = format!("order[{}][dir]", order.len());
        let direction: Direction = match param(params, &dir_name) {
            Some(dir) => dir.parse()?,
            None => {
                return Err(ProtocolError::BadParameter {
                    name: dir_name,
                    value: String::new(),
                });
            }
        };
        order.push(SortKey { column, direction });
    }

    let request = PageRequest {
        draw,
        offset,
        page_size,
        search,
        order,
    };
    Ok((request, columns))
}

/// Decodes a raw JSON envelope into a page response, enforcing the page
/// invariants against the request that produced it.
///
/// The body has already survived JSON parsing; anything rejected here is
/// a protocol violation, not a transport error.
pub fn decode_response(body: Value, request: &PageRequest) -> Result<PageResponse, ProtocolError> {
    let envelope = body.as_object().ok_or(ProtocolError::NotAnObject)?;

    let draw = required_u64(envelope, "draw")?;
    let records_total = required_u64(envelope, "recordsTotal")?;
    let records_filtered = required_u64(envelope, "recordsFiltered")?;

    let data = envelope
        .get("data")
        .ok_or(ProtocolError::MissingField("data"))?
        .as_array()
        .ok_or(ProtocolError::BadField {
            field: "data",
            expected: "an array",
        })?;
    let mut rows = Vec::with_capacity(data.len());
    for element in data {
        if !element.is_object() {
            return Err(ProtocolError::BadField {
                field: "data",
                expected: "an array of objects",
            });
        }
        let record: Record =
            serde_json::from_value(element.clone()).map_err(|_| ProtocolError::BadField {
                field: "data",
                expected: "an array of objects",
            })?;
        rows.push(record);
    }

    if records_filtered > records_total {
        return Err(ProtocolError::CountInvariant {
            filtered: records_filtered,
            total: records_total,
        });
    }
    if rows.len() as u64 > request.page_size {
        return Err(ProtocolError::PageOverflow {
            rows: rows.len(),
            page_size: request.page_size,
        });
    }
    if rows.len() as u64 > records_filtered {
        return Err(ProtocolError::RowsExceedFiltered {
            rows: rows.len(),
            filtered: records_filtered,
        });
    }
    if draw != request.draw {
        return Err(ProtocolError::DrawMismatch {
            sent: request.draw,
            echoed: draw,
        });
    }

    Ok(PageResponse::new(draw, records_total, records_filtered, rows))
}

fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

fn parse_u64(name: &str, value: &str) -> Result<u64, ProtocolError> {
    value.parse().map_err(|_| ProtocolError::BadParameter {
        name: name.to_string(),
        value: value.to_string(),
    })
}

fn required_u64(
    envelope: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<u64, ProtocolError> {
    envelope
        .get(field)
        .ok_or(ProtocolError::MissingField(field))?
        .as_u64()
        .ok_or(ProtocolError::BadField {
            field,
            expected: "a non-negative integer",
        })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("Business Name"),
            Column::new("Owner Name"),
            Column::new("City"),
            Column::new("State"),
            Column::new("Mobile Number"),
        ]
    }

    #[test]
    fn encode_emits_flat_query() {
        let request = PageRequest::new(7)
            .with_offset(20)
            .with_page_size(10)
            .with_search("acme")
            .with_order(vec![SortKey::desc(3), SortKey::asc(0)]);

        let params = encode_request(&request, &columns()).unwrap();

        assert!(params.contains(&("draw".to_string(), "7".to_string())));
        assert!(params.contains(&("start".to_string(), "20".to_string())));
        assert!(params.contains(&("length".to_string(), "10".to_string())));
        assert!(params.contains(&("search[value]".to_string(), "acme".to_string())));
        assert!(params.contains(&("order[0][column]".to_string(), "3".to_string())));
        assert!(params.contains(&("order[0][dir]".to_string(), "desc".to_string())));
        assert!(params.contains(&("order[1][column]".to_string(), "0".to_string())));
        assert!(params.contains(&("order[1][dir]".to_string(), "asc".to_string())));
        assert!(params.contains(&("columns[0][data]".to_string(), "Business Name".to_string())));
        assert!(params.contains(&("columns[4][data]".to_string(), "Mobile Number".to_string())));
    }

    #[test]
    fn encode_rejects_disallowed_page_size() {
        let request = PageRequest::new(1).with_page_size(33);
        assert_eq!(
            encode_request(&request, &columns()),
            Err(ProtocolError::PageSizeNotAllowed(33))
        );
    }

    #[test]
    fn encode_rejects_out_of_range_sort_column() {
        let request = PageRequest::new(1).with_order(vec![SortKey::asc(5)]);
        assert_eq!(
            encode_request(&request, &columns()),
            Err(ProtocolError::UnknownSortColumn {
                column: 5,
                columns: 5,
            })
        );
    }

    #[test]
    fn encode_parse_round_trip() {
        let request = PageRequest::new(3)
            .with_offset(50)
            .with_page_size(25)
            .with_search("smith")
            .with_order(vec![SortKey::asc(2), SortKey::desc(1)]);

        let params = encode_request(&request, &columns()).unwrap();
        let (parsed, parsed_columns) = parse_request(&params).unwrap();

        assert_eq!(parsed, request);
        assert_eq!(parsed_columns, columns());
    }

    #[test]
    fn parse_applies_server_defaults() {
        let params = vec![("draw".to_string(), "1".to_string())];
        let (request, cols) = parse_request(&params).unwrap();
        assert_eq!(request.offset, 0);
        assert_eq!(request.page_size, 25);
        assert_eq!(request.search, "");
        assert!(request.order.is_empty());
        assert!(cols.is_empty());
    }

    #[test]
    fn parse_requires_draw() {
        assert_eq!(
            parse_request(&[]),
            Err(ProtocolError::MissingField("draw"))
        );
    }

    #[test]
    fn parse_rejects_malformed_offset() {
        let params = vec![
            ("draw".to_string(), "1".to_string()),
            ("start".to_string(), "twenty".to_string()),
        ];
        assert_eq!(
            parse_request(&params),
            Err(ProtocolError::BadParameter {
                name: "start".to_string(),
                value: "twenty".to_string(),
            })
        );
    }

    fn envelope(draw: u64, total: u64, filtered: u64, rows: usize) -> Value {
        let data: Vec<Value> = (0..rows)
            .map(|i| json!({ "Business Name": format!("Biz {i}") }))
            .collect();
        json!({
            "draw": draw,
            "recordsTotal": total,
            "recordsFiltered": filtered,
            "data": data,
        })
    }

    #[test]
    fn decode_accepts_valid_envelope() {
        let request = PageRequest::new(2).with_page_size(10);
        let page = decode_response(envelope(2, 25, 25, 10), &request).unwrap();
        assert_eq!(page.draw(), 2);
        assert_eq!(page.records_total(), 25);
        assert_eq!(page.records_filtered(), 25);
        assert_eq!(page.len(), 10);
        assert_eq!(page.rows()[3].get_str("Business Name"), Some("Biz 3"));
    }

    #[test]
    fn decode_rejects_filtered_above_total() {
        let request = PageRequest::new(1).with_page_size(10);
        assert_eq!(
            decode_response(envelope(1, 25, 40, 10), &request),
            Err(ProtocolError::CountInvariant {
                filtered: 40,
                total: 25,
            })
        );
    }

    #[test]
    fn decode_rejects_oversized_page() {
        let request = PageRequest::new(1).with_page_size(10);
        assert_eq!(
            decode_response(envelope(1, 25, 25, 11), &request),
            Err(ProtocolError::PageOverflow {
                rows: 11,
                page_size: 10,
            })
        );
    }

    #[test]
    fn decode_rejects_rows_exceeding_filtered() {
        let request = PageRequest::new(1).with_page_size(10);
        assert_eq!(
            decode_response(envelope(1, 25, 3, 5), &request),
            Err(ProtocolError::RowsExceedFiltered {
                rows: 5,
                filtered: 3,
            })
        );
    }

    #[test]
    fn decode_rejects_draw_mismatch() {
        let request = PageRequest::new(2).with_page_size(10);
        assert_eq!(
            decode_response(envelope(1, 25, 25, 10), &request),
            Err(ProtocolError::DrawMismatch { sent: 2, echoed: 1 })
        );
    }

    #[test]
    fn decode_rejects_missing_counts() {
        let request = PageRequest::new(1).with_page_size(10);
        let body = json!({ "draw": 1, "recordsFiltered": 5, "data": [] });
        assert_eq!(
            decode_response(body, &request),
            Err(ProtocolError::MissingField("recordsTotal"))
        );
    }

    #[test]
    fn decode_rejects_non_object_body() {
        let request = PageRequest::new(1);
        assert_eq!(
            decode_response(json!([1, 2, 3]), &request),
            Err(ProtocolError::NotAnObject)
        );
    }

    #[test]
    fn decode_rejects_non_object_rows() {
        let request = PageRequest::new(1).with_page_size(10);
        let body = json!({
            "draw": 1,
            "recordsTotal": 2,
            "recordsFiltered": 2,
            "data": ["not a record"],
        });
        assert_eq!(
            decode_response(body, &request),
            Err(ProtocolError::BadField {
                field: "data",
                expected: "an array of objects",
            })
        );
    }
}
