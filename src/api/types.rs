// src/api/types.rs
//! Wire-level response types shared across API operations.

use serde::Deserialize;
use serde_json::Value;

/// Generic paginated response from the Notion API.
///
/// Every listing endpoint (block children, database queries, paginated
/// properties) wraps its results in this envelope: an ordered result
/// array, a has-more flag, and an opaque cursor for the next page.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginatedList {
    #[serde(default)]
    pub object: String,
    pub results: Vec<Value>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

impl PaginatedList {
    /// A single complete page of results — the shape returned by calls
    /// that are never followed by a cursor.
    pub fn complete(results: Vec<Value>) -> Self {
        Self {
            object: "list".to_string(),
            results,
            next_cursor: None,
            has_more: false,
        }
    }

    /// A partial page pointing at the next cursor.
    pub fn partial(results: Vec<Value>, next_cursor: impl Into<String>) -> Self {
        Self {
            object: "list".to_string(),
            results,
            next_cursor: Some(next_cursor.into()),
            has_more: true,
        }
    }
}

/// Error response body from the Notion API.
#[derive(Debug, Clone, Deserialize)]
pub struct NotionApiErrorResponse {
    pub code: String,
    pub message: String,
}
