// src/api/mod.rs
//! Notion API interaction.
//!
//! Everything above this module talks to Notion through `NotionRepository`;
//! HTTP details and wire shapes stay inside.

pub mod client;
#[cfg(test)]
pub(crate) mod fake;
pub mod pagination;
pub mod parser;
mod responses;
mod types;

use crate::error::AppError;
use crate::model::{Block, Page};
use crate::types::{DatabaseId, NotionId, PageId, WorkflowStatus};

/// The operations the sync needs from a Notion workspace.
///
/// Listing methods return one page of results; use the helpers in
/// [`pagination`] to follow cursors.
#[async_trait::async_trait]
pub trait NotionRepository: Send + Sync {
    async fn query_database(
        &self,
        database: &DatabaseId,
        request: PageRequest,
    ) -> Result<PaginatedResponse<Page>, AppError>;

    async fn list_children(
        &self,
        parent: &NotionId,
        request: PageRequest,
    ) -> Result<PaginatedResponse<Block>, AppError>;

    async fn retrieve_page(&self, id: &PageId) -> Result<Page, AppError>;

    /// Sets the workflow status property of a page.
    async fn update_status(&self, id: &PageId, status: &WorkflowStatus) -> Result<(), AppError>;

    async fn create_page(&self, page: &NewPage) -> Result<CreatedPage, AppError>;
}

pub use client::NotionHttpClient;
pub use pagination::{list_all_children, list_database_pages, Listing, PageRequest};
pub use parser::PageSchema;
pub use responses::PaginatedResponse;
pub use types::{BlockDraft, CreatedPage, NewPage};
