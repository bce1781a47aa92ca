//! Common types used throughout the client
//!
//! This module contains the record and page types shared by the
//! request layer, the paginator and the endpoint adapters.

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

/// One row returned by the API, kept as an opaque JSON object
pub type Record = JsonObject;

// ============================================================================
// Response Fields
// ============================================================================

/// Field holding the records of a page
pub const DATA_FIELD: &str = "data";

/// Canonical cursor field, also used as the query parameter name
pub const CURSOR_FIELD: &str = "pagination_key";

/// Alternate cursor spelling some responses use
pub const CURSOR_FIELD_ALT: &str = "paginationKey";

// ============================================================================
// Page
// ============================================================================

/// One server response: its records and the cursor for the next page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    /// Records in server order
    pub data: Vec<Record>,
    /// Cursor to request the next page, if there is one
    pub pagination_key: Option<String>,
    /// Entries of `data` that were not JSON objects and were dropped
    #[serde(skip)]
    pub skipped: usize,
}

impl Page {
    /// Build a page from a decoded response body
    ///
    /// The body must be a JSON object. A missing or null `data` field yields an
    /// empty page; non-object entries inside `data` are skipped and counted in
    /// `skipped`. The cursor is
    /// read from `pagination_key` first, then `paginationKey`.
    pub fn from_value(body: JsonValue) -> Result<Self> {
        let JsonValue::Object(mut map) = body else {
            return Err(Error::decode("response body is not a JSON object"));
        };

        let items = match map.remove(DATA_FIELD) {
            Some(JsonValue::Array(items)) => items,
            Some(JsonValue::Null) | None => Vec::new(),
            Some(other) => {
                return Err(Error::decode(format!(
                    "'{DATA_FIELD}' is not an array: {other}"
                )))
            }
        };

        let received = items.len();
        let data: Vec<Record> = items
            .into_iter()
            .filter_map(|item| match item {
                JsonValue::Object(record) => Some(record),
                _ => None,
            })
            .collect();
        let skipped = received - data.len();
        if skipped > 0 {
            warn!(
                "Skipped {} of {} '{}' entries that are not JSON objects",
                skipped, received, DATA_FIELD
            );
        }

        let pagination_key = cursor_value(map.get(CURSOR_FIELD))
            .or_else(|| cursor_value(map.get(CURSOR_FIELD_ALT)));

        Ok(Self {
            data,
            pagination_key,
            skipped,
        })
    }

    /// Parse a page from raw response text
    pub fn from_body(body: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(body)
            .map_err(|e| Error::decode(format!("invalid JSON body: {e}")))?;
        Self::from_value(value)
    }

    /// Number of records in this page
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the page carried no records
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Null and empty cursors cannot advance a request, so they count as absent
fn cursor_value(value: Option<&JsonValue>) -> Option<String> {
    match value? {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ============================================================================
// Aggregated Result
// ============================================================================

/// Records accumulated across every page of a paginated request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregatedResult {
    /// Records in page-arrival order, then within-page order
    pub records: Vec<Record>,
    /// Number of pages fetched
    pub pages: usize,
}

impl AggregatedResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page's records
    pub fn push_page(&mut self, page: Vec<Record>) {
        self.records.extend(page);
        self.pages += 1;
    }

    /// Number of records collected so far
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records were collected
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the result, keeping only the records
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_from_value() {
        let page = Page::from_value(json!({
            "data": [{"Code": "7203"}, {"Code": "6758"}],
            "pagination_key": "abc"
        }))
        .unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page.data[0]["Code"], "7203");
        assert_eq!(page.pagination_key.as_deref(), Some("abc"));
        assert!(page.pagination_key.is_some());
    }

    #[test]
    fn test_page_camel_case_cursor() {
        let page = Page::from_value(json!({"data": [], "paginationKey": "xyz"})).unwrap();
        assert_eq!(page.pagination_key.as_deref(), Some("xyz"));
    }

    #[test]
    fn test_page_prefers_snake_case_cursor() {
        let page = Page::from_value(json!({
            "data": [],
            "pagination_key": "snake",
            "paginationKey": "camel"
        }))
        .unwrap();
        assert_eq!(page.pagination_key.as_deref(), Some("snake"));
    }

    #[test]
    fn test_page_null_or_empty_cursor_is_absent() {
        let page = Page::from_value(json!({"data": [], "pagination_key": null})).unwrap();
        assert!(page.pagination_key.is_none());

        let page = Page::from_value(json!({"data": [], "paginationKey": ""})).unwrap();
        assert!(page.pagination_key.is_none());
    }

    #[test]
    fn test_page_missing_data() {
        let page = Page::from_value(json!({"message": "ok"})).unwrap();
        assert!(page.is_empty());
        assert!(page.pagination_key.is_none());
    }

    #[test]
    fn test_page_counts_skipped_entries() {
        let page = Page::from_value(json!({
            "data": [{"Code": "7203"}, 42, "junk", null, {"Code": "6758"}]
        }))
        .unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page.skipped, 3);

        let clean = Page::from_value(json!({"data": [{"Code": "7203"}]})).unwrap();
        assert_eq!(clean.skipped, 0);
    }

    #[test]
    fn test_page_rejects_non_object() {
        assert!(Page::from_value(json!([1, 2, 3])).is_err());
        assert!(Page::from_value(json!({"data": "nope"})).is_err());
        assert!(Page::from_body("not json").is_err());
    }

    #[test]
    fn test_aggregated_result_push() {
        let mut result = AggregatedResult::new();
        let first = Page::from_value(json!({"data": [{"n": 1}, {"n": 2}]})).unwrap();
        let second = Page::from_value(json!({"data": [{"n": 3}]})).unwrap();

        result.push_page(first.data);
        result.push_page(second.data);

        assert_eq!(result.pages, 2);
        assert_eq!(result.len(), 3);
        let order: Vec<_> = result.records.iter().map(|r| r["n"].clone()).collect();
        assert_eq!(order, vec![json!(1), json!(2), json!(3)]);
    }
}
