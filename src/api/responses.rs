// src/api/responses.rs
//! Wire shapes of Notion API responses.
//!
//! Blocks and pages are kept loosely typed (`type` plus a map of the remaining
//! fields) because the block vocabulary is open-ended and page properties are
//! user-defined; the parser projects them onto the domain model.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Envelope returned by every cursor-paginated listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginatedResponse<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// Converts every result, failing on the first item that does not convert.
    pub fn try_map<U, E, F>(self, convert: F) -> Result<PaginatedResponse<U>, E>
    where
        F: FnMut(T) -> Result<U, E>,
    {
        Ok(PaginatedResponse {
            results: self
                .results
                .into_iter()
                .map(convert)
                .collect::<Result<Vec<_>, E>>()?,
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        })
    }
}

/// A block as returned by `GET /blocks/{id}/children`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub has_children: bool,
    /// All remaining fields, including the payload keyed by `kind`.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A page as returned by `GET /pages/{id}` or a database query.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPage {
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// The error object Notion returns with non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct NotionErrorBody {
    pub code: String,
    pub message: String,
}

/// Minimal view of a freshly created page.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCreatedPage {
    pub id: String,
    #[serde(default)]
    pub url: String,
}
