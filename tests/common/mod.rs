// tests/common/mod.rs
//! Shared fixtures: an in-memory workspace and a scripted HTTP server.
#![allow(dead_code)]

use notion2post::api::{CreatedPage, NewPage};
use notion2post::{
    AppError, Block, BlockId, BlockKind, DatabaseId, NotionErrorCode, NotionId, NotionRepository,
    Page, PageId, PageRequest, PageTitle, PaginatedResponse, WorkflowStatus,
};
use std::collections::HashMap;
use std::io::Read as _;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

// ---------------------------------------------------------------------------
// In-memory workspace
// ---------------------------------------------------------------------------

/// A database held in memory. Page statuses change when updated.
#[derive(Default)]
pub struct MemoryWorkspace {
    pages: Mutex<Vec<Page>>,
    children: HashMap<String, Vec<Block>>,
    created: Mutex<Vec<NewPage>>,
    status_writes: Mutex<usize>,
}

impl MemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, page: Page, blocks: Vec<Block>) -> Self {
        let id = NotionId::from(&page.id);
        self.with_blocks(id, blocks).push_page(page)
    }

    pub fn with_blocks(mut self, parent: impl Into<NotionId>, blocks: Vec<Block>) -> Self {
        self.children
            .insert(parent.into().as_str().to_string(), blocks);
        self
    }

    fn push_page(self, page: Page) -> Self {
        self.pages.lock().unwrap().push(page);
        self
    }

    pub fn status_of(&self, id: &PageId) -> Option<WorkflowStatus> {
        self.pages
            .lock()
            .unwrap()
            .iter()
            .find(|p| &p.id == id)
            .and_then(|p| p.status.clone())
    }

    pub fn set_status(&self, id: &PageId, status: &str) {
        if let Some(page) = self.pages.lock().unwrap().iter_mut().find(|p| &p.id == id) {
            page.status = Some(WorkflowStatus::new(status));
        }
    }

    pub fn status_writes(&self) -> usize {
        *self.status_writes.lock().unwrap()
    }

    pub fn created_pages(&self) -> Vec<NewPage> {
        self.created.lock().unwrap().clone()
    }
}

fn not_found() -> AppError {
    AppError::NotionService {
        code: NotionErrorCode::ObjectNotFound,
        message: "not found".to_string(),
        status: reqwest::StatusCode::NOT_FOUND,
    }
}

fn window<T: Clone>(items: &[T], request: &PageRequest) -> PaginatedResponse<T> {
    let start = request
        .start_cursor
        .as_deref()
        .and_then(|c| c.parse::<usize>().ok())
        .unwrap_or(0);
    let end = (start + request.page_size).min(items.len());
    PaginatedResponse {
        results: items[start..end].to_vec(),
        next_cursor: (end < items.len()).then(|| end.to_string()),
        has_more: end < items.len(),
    }
}

#[async_trait::async_trait]
impl NotionRepository for MemoryWorkspace {
    async fn query_database(
        &self,
        _database: &DatabaseId,
        request: PageRequest,
    ) -> Result<PaginatedResponse<Page>, AppError> {
        let pages = self.pages.lock().unwrap().clone();
        Ok(window(&pages, &request))
    }

    async fn list_children(
        &self,
        parent: &NotionId,
        request: PageRequest,
    ) -> Result<PaginatedResponse<Block>, AppError> {
        let blocks = self
            .children
            .get(parent.as_str())
            .cloned()
            .unwrap_or_default();
        Ok(window(&blocks, &request))
    }

    async fn retrieve_page(&self, id: &PageId) -> Result<Page, AppError> {
        self.pages
            .lock()
            .unwrap()
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn update_status(&self, id: &PageId, status: &WorkflowStatus) -> Result<(), AppError> {
        let mut pages = self.pages.lock().unwrap();
        let page = pages.iter_mut().find(|p| &p.id == id).ok_or_else(not_found)?;
        page.status = Some(status.clone());
        *self.status_writes.lock().unwrap() += 1;
        Ok(())
    }

    async fn create_page(&self, page: &NewPage) -> Result<CreatedPage, AppError> {
        self.created.lock().unwrap().push(page.clone());
        let id = PageId::new_v4();
        Ok(CreatedPage {
            url: format!("https://www.notion.so/{}", id),
            id,
        })
    }
}

pub fn page(title: &str, status: &str) -> Page {
    Page {
        id: PageId::new_v4(),
        title: PageTitle::new(title),
        status: Some(WorkflowStatus::new(status)),
        url: String::new(),
    }
}

pub fn block(kind: BlockKind, text: &str) -> Block {
    Block::text(BlockId::new_v4(), kind, text)
}

// ---------------------------------------------------------------------------
// Scripted HTTP server
// ---------------------------------------------------------------------------

/// A request as the stub saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path plus query string.
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn path(&self) -> &str {
        self.url.split('?').next().unwrap_or_default()
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is json")
    }
}

pub struct StubReply {
    pub status: u16,
    pub body: String,
}

impl StubReply {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

type Handler = dyn Fn(&RecordedRequest) -> StubReply + Send + 'static;

/// Answers every request with `handler` on a background thread.
pub struct HttpStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl HttpStub {
    pub fn spawn<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> StubReply + Send + 'static,
    {
        let handler: Box<Handler> = Box::new(handler);
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start stub server");
        let base_url = format!("http://{}", server.server_addr());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }
            let mut request = match server.recv_timeout(Duration::from_millis(50)) {
                Ok(Some(request)) => request,
                Ok(None) => continue,
                Err(_) => break,
            };

            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);
            let recorded = RecordedRequest {
                method: request.method().to_string(),
                url: request.url().to_string(),
                headers: request
                    .headers()
                    .iter()
                    .map(|h| (h.field.to_string(), h.value.to_string()))
                    .collect(),
                body,
            };

            let reply = handler(&recorded);
            seen.lock().unwrap().push(recorded);

            let header =
                tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                    .expect("build header");
            let response = tiny_http::Response::from_string(reply.body)
                .with_status_code(reply.status)
                .with_header(header);
            let _ = request.respond(response);
        });

        Self {
            base_url,
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for HttpStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
