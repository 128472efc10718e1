// src/api/fake.rs
//! In-memory `NotionRepository` for unit tests.

use super::{CreatedPage, NewPage, NotionRepository, PageRequest, PaginatedResponse};
use crate::error::{AppError, NotionErrorCode};
use crate::model::{Block, Page};
use crate::types::{DatabaseId, NotionId, PageId, WorkflowStatus};
use reqwest::StatusCode;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
pub(crate) struct FakeNotion {
    pages: Mutex<Vec<Page>>,
    children: HashMap<String, Vec<Block>>,
    failing_children: HashSet<String>,
    failing_status: bool,
    failing_create: bool,
    calls: Mutex<Vec<String>>,
    created: Mutex<Vec<NewPage>>,
}

fn service_error(code: NotionErrorCode, status: StatusCode) -> AppError {
    AppError::NotionService {
        message: format!("fake {}", code),
        code,
        status,
    }
}

/// Serves `items` one page at a time, using the offset as the cursor.
fn paginate<T: Clone>(items: &[T], request: &PageRequest) -> PaginatedResponse<T> {
    let start = request
        .start_cursor
        .as_deref()
        .and_then(|c| c.parse::<usize>().ok())
        .unwrap_or(0);
    let end = (start + request.page_size).min(items.len());
    let has_more = end < items.len();
    PaginatedResponse {
        results: items[start..end].to_vec(),
        next_cursor: has_more.then(|| end.to_string()),
        has_more,
    }
}

impl FakeNotion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, page: Page) -> Self {
        self.pages.lock().unwrap().push(page);
        self
    }

    pub fn with_children(mut self, parent: impl Into<NotionId>, blocks: Vec<Block>) -> Self {
        self.children
            .insert(parent.into().as_str().to_string(), blocks);
        self
    }

    pub fn failing_children(mut self, parent: impl Into<NotionId>) -> Self {
        self.failing_children
            .insert(parent.into().as_str().to_string());
        self
    }

    pub fn failing_status_updates(mut self) -> Self {
        self.failing_status = true;
        self
    }

    pub fn failing_page_creation(mut self) -> Self {
        self.failing_create = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn children_fetches(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with("children:"))
            .count()
    }

    pub fn status_of(&self, id: &PageId) -> Option<WorkflowStatus> {
        self.pages
            .lock()
            .unwrap()
            .iter()
            .find(|p| &p.id == id)
            .and_then(|p| p.status.clone())
    }

    pub fn created_pages(&self) -> Vec<NewPage> {
        self.created.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl NotionRepository for FakeNotion {
    async fn query_database(
        &self,
        _database: &DatabaseId,
        request: PageRequest,
    ) -> Result<PaginatedResponse<Page>, AppError> {
        self.record("query".to_string());
        let pages = self.pages.lock().unwrap().clone();
        Ok(paginate(&pages, &request))
    }

    async fn list_children(
        &self,
        parent: &NotionId,
        request: PageRequest,
    ) -> Result<PaginatedResponse<Block>, AppError> {
        self.record(format!("children:{}", parent));
        if self.failing_children.contains(parent.as_str()) {
            return Err(service_error(
                NotionErrorCode::InternalError,
                StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
        let blocks = self
            .children
            .get(parent.as_str())
            .cloned()
            .unwrap_or_default();
        Ok(paginate(&blocks, &request))
    }

    async fn retrieve_page(&self, id: &PageId) -> Result<Page, AppError> {
        self.record(format!("page:{}", id));
        self.pages
            .lock()
            .unwrap()
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| service_error(NotionErrorCode::ObjectNotFound, StatusCode::NOT_FOUND))
    }

    async fn update_status(&self, id: &PageId, status: &WorkflowStatus) -> Result<(), AppError> {
        self.record(format!("status:{}:{}", id, status));
        if self.failing_status {
            return Err(service_error(
                NotionErrorCode::ValidationFailed,
                StatusCode::BAD_REQUEST,
            ));
        }
        let mut pages = self.pages.lock().unwrap();
        match pages.iter_mut().find(|p| &p.id == id) {
            Some(page) => {
                page.status = Some(status.clone());
                Ok(())
            }
            None => Err(service_error(
                NotionErrorCode::ObjectNotFound,
                StatusCode::NOT_FOUND,
            )),
        }
    }

    async fn create_page(&self, page: &NewPage) -> Result<CreatedPage, AppError> {
        self.record(format!("create:{}", page.title));
        if self.failing_create {
            return Err(service_error(
                NotionErrorCode::RestrictedResource,
                StatusCode::FORBIDDEN,
            ));
        }
        self.created.lock().unwrap().push(page.clone());
        let id = PageId::new_v4();
        Ok(CreatedPage {
            url: format!("https://www.notion.so/{}", id),
            id,
        })
    }
}
