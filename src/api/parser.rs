// src/api/parser.rs
//! Projects Notion API responses onto the domain model.

use super::client::ApiResponse;
use super::responses::{NotionErrorBody, PaginatedResponse, RawBlock, RawPage};
use crate::error::{preview_body, AppError, NotionErrorCode};
use crate::model::{Block, BlockContent, BlockKind, Page, PageTitle, TextRun};
use crate::types::{BlockId, PageId, WorkflowStatus};
use serde_json::{Map, Value};

/// Names of the database properties the processor reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSchema {
    pub title_property: String,
    pub status_property: String,
}

impl Default for PageSchema {
    fn default() -> Self {
        Self {
            title_property: "Name".to_string(),
            status_property: "Status".to_string(),
        }
    }
}

/// Parse any Notion API response, mapping non-success statuses to `AppError::NotionService`.
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    if !result.status.is_success() {
        return Err(parse_error_response(&result));
    }

    serde_json::from_str(&result.data).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", result.url, e);
        AppError::MalformedResponse(format!("{} (body: {})", e, preview_body(&result.data)))
    })
}

fn parse_error_response(result: &ApiResponse<String>) -> AppError {
    match serde_json::from_str::<NotionErrorBody>(&result.data) {
        Ok(body) => AppError::NotionService {
            code: NotionErrorCode::from_api_response(&body.code),
            message: body.message,
            status: result.status,
        },
        Err(_) => AppError::NotionService {
            code: NotionErrorCode::from_http_status(result.status.as_u16()),
            message: format!("HTTP {} from {}", result.status, result.url),
            status: result.status,
        },
    }
}

/// Converts a raw block into the domain block.
pub fn parse_block(raw: RawBlock) -> Result<Block, AppError> {
    let id = BlockId::parse(&raw.id)?;
    let payload = raw.fields.get(&raw.kind).and_then(Value::as_object);

    let content = BlockContent {
        rich_text: payload.and_then(|p| p.get("rich_text")).map(text_runs),
        language: payload
            .and_then(|p| p.get("language"))
            .and_then(Value::as_str)
            .map(str::to_string),
    };

    Ok(Block {
        id,
        kind: BlockKind::parse(&raw.kind),
        has_children: raw.has_children,
        content,
    })
}

/// Reads a rich text array; entries without `plain_text` contribute an empty run.
fn text_runs(value: &Value) -> Vec<TextRun> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    TextRun::new(
                        item.get("plain_text")
                            .and_then(Value::as_str)
                            .unwrap_or_default(),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Converts a raw page using the configured property names.
pub fn parse_page(raw: RawPage, schema: &PageSchema) -> Result<Page, AppError> {
    let id = PageId::parse(&raw.id)?;
    let title = extract_title(&raw.properties, &schema.title_property);
    let status = extract_status(&raw.properties, &schema.status_property);

    Ok(Page {
        id,
        title,
        status,
        url: raw.url,
    })
}

/// Title from the named property, falling back to whichever property has type `title`.
fn extract_title(properties: &Map<String, Value>, name: &str) -> PageTitle {
    let runs = properties
        .get(name)
        .and_then(|prop| prop.get("title"))
        .or_else(|| {
            properties
                .values()
                .find(|prop| prop.get("type").and_then(Value::as_str) == Some("title"))
                .and_then(|prop| prop.get("title"))
        })
        .map(text_runs)
        .unwrap_or_default();
    PageTitle::from_runs(&runs)
}

/// Status name from a `status` or `select` property.
fn extract_status(properties: &Map<String, Value>, name: &str) -> Option<WorkflowStatus> {
    let prop = properties.get(name)?;
    prop.get("status")
        .or_else(|| prop.get("select"))
        .and_then(|value| value.get("name"))
        .and_then(Value::as_str)
        .map(WorkflowStatus::new)
}

/// Parse a single page response.
pub fn parse_page_response(
    result: ApiResponse<String>,
    schema: &PageSchema,
) -> Result<Page, AppError> {
    let raw: RawPage = parse_api_response(result)?;
    parse_page(raw, schema)
}

/// Parse one page of a block children listing.
pub fn parse_blocks_pagination(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<Block>, AppError> {
    let response: PaginatedResponse<RawBlock> = parse_api_response(result)?;
    response.try_map(parse_block)
}

/// Parse one page of a database query.
pub fn parse_pages_pagination(
    result: ApiResponse<String>,
    schema: &PageSchema,
) -> Result<PaginatedResponse<Page>, AppError> {
    let response: PaginatedResponse<RawPage> = parse_api_response(result)?;
    response.try_map(|raw| parse_page(raw, schema))
}
