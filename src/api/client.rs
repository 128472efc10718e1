// src/api/client.rs
//! HTTP client for the Notion API.
//!
//! A thin wrapper around reqwest that handles authentication and request
//! plumbing, plus the `NotionRepository` implementation built on top of it.

use super::parser::{
    parse_api_response, parse_blocks_pagination, parse_page_response, parse_pages_pagination,
    PageSchema,
};
use super::responses::{PaginatedResponse, RawCreatedPage};
use super::types::{BlockDraft, CreatedPage, NewPage};
use super::{NotionRepository, PageRequest};
use crate::config::NotionSettings;
use crate::error::AppError;
use crate::model::{Block, Page};
use crate::types::{ApiKey, DatabaseId, NotionId, PageId, WorkflowStatus};
use reqwest::{header, Client, Response};
use serde::Serialize;
use serde_json::{json, Value};

const API_BASE_URL: &str = "https://api.notion.com/v1";

/// Most children the API accepts in a single create or append request.
const MAX_CHILDREN_PER_REQUEST: usize = 100;

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
    schema: PageSchema,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(settings: &NotionSettings) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(&settings.api_key, &settings.version)?)
            .build()?;
        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
            schema: settings.schema.clone(),
        })
    }

    /// Points the client at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn create_headers(api_key: &ApiKey, version: &str) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_str(version).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid Notion version '{}': {}", version, e))
            })?,
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    /// Makes a GET request to the specified endpoint.
    pub async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("GET {}", url);
        Ok(self.client.get(url).query(query).send().await?)
    }

    /// Makes a POST request with JSON body to the specified endpoint.
    pub async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("POST {}", url);
        Ok(self.client.post(url).json(body).send().await?)
    }

    /// Makes a PATCH request with JSON body to the specified endpoint.
    pub async fn patch<T: Serialize>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("PATCH {}", url);
        Ok(self.client.patch(url).json(body).send().await?)
    }

    async fn append_children(&self, parent: &PageId, children: &[BlockDraft]) -> Result<(), AppError> {
        let endpoint = format!("blocks/{}/children", parent.to_dashed());
        let body = json!({ "children": drafts_to_json(children) });
        let response = self.patch(&endpoint, &body).await?;
        let result = extract_response_text(response).await?;
        parse_api_response::<Value>(result).map(|_| ())
    }
}

fn drafts_to_json(drafts: &[BlockDraft]) -> Vec<Value> {
    drafts.iter().map(BlockDraft::to_json).collect()
}

/// Body of a paginated database query.
fn query_body(request: &PageRequest) -> Value {
    let mut body = json!({ "page_size": request.page_size });
    if let Some(cursor) = &request.start_cursor {
        body["start_cursor"] = json!(cursor);
    }
    body
}

#[async_trait::async_trait]
impl NotionRepository for NotionHttpClient {
    async fn query_database(
        &self,
        database: &DatabaseId,
        request: PageRequest,
    ) -> Result<PaginatedResponse<Page>, AppError> {
        let endpoint = format!("databases/{}/query", database.to_dashed());
        let response = self.post(&endpoint, &query_body(&request)).await?;
        let result = extract_response_text(response).await?;
        parse_pages_pagination(result, &self.schema)
    }

    async fn list_children(
        &self,
        parent: &NotionId,
        request: PageRequest,
    ) -> Result<PaginatedResponse<Block>, AppError> {
        let endpoint = format!("blocks/{}/children", parent.to_hyphenated());
        let mut query = vec![("page_size", request.page_size.to_string())];
        if let Some(cursor) = request.start_cursor {
            query.push(("start_cursor", cursor));
        }
        let response = self.get(&endpoint, &query).await?;
        let result = extract_response_text(response).await?;
        parse_blocks_pagination(result)
    }

    async fn retrieve_page(&self, id: &PageId) -> Result<Page, AppError> {
        let endpoint = format!("pages/{}", id.to_dashed());
        let response = self.get(&endpoint, &[]).await?;
        let result = extract_response_text(response).await?;
        parse_page_response(result, &self.schema)
    }

    async fn update_status(&self, id: &PageId, status: &WorkflowStatus) -> Result<(), AppError> {
        let endpoint = format!("pages/{}", id.to_dashed());
        let body = json!({
            "properties": {
                self.schema.status_property.as_str(): { "status": { "name": status.as_str() } }
            }
        });
        let response = self.patch(&endpoint, &body).await?;
        let result = extract_response_text(response).await?;
        parse_api_response::<Value>(result)?;
        log::debug!("Set status of {} to '{}'", id, status);
        Ok(())
    }

    async fn create_page(&self, page: &NewPage) -> Result<CreatedPage, AppError> {
        let split = page.children.len().min(MAX_CHILDREN_PER_REQUEST);
        let (first, rest) = page.children.split_at(split);

        let body = json!({
            "parent": { "page_id": page.parent.to_dashed() },
            "properties": {
                "title": { "title": [{ "type": "text", "text": { "content": page.title } }] }
            },
            "children": drafts_to_json(first),
        });
        let response = self.post("pages", &body).await?;
        let result = extract_response_text(response).await?;
        let raw: RawCreatedPage = parse_api_response(result)?;
        let id = PageId::parse(&raw.id)?;

        for chunk in rest.chunks(MAX_CHILDREN_PER_REQUEST) {
            self.append_children(&id, chunk).await?;
        }

        Ok(CreatedPage { id, url: raw.url })
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
