// src/api/pagination.rs
//! Cursor-following listing over Notion's paginated endpoints.
//!
//! Listings are fail-open: a page that cannot be fetched discards everything
//! gathered so far and yields an empty listing, with the failure attached so
//! callers can still count it.

use super::responses::PaginatedResponse;
use super::NotionRepository;
use crate::constants::NOTION_API_PAGE_SIZE;
use crate::error::{AppError, FetchError};
use crate::model::{Block, Page};
use crate::types::{DatabaseId, NotionId};
use std::future::Future;

/// Cursor position for one request of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page_size: usize,
    pub start_cursor: Option<String>,
}

impl PageRequest {
    pub fn first() -> Self {
        Self {
            page_size: NOTION_API_PAGE_SIZE,
            start_cursor: None,
        }
    }

    fn after(cursor: String) -> Self {
        Self {
            page_size: NOTION_API_PAGE_SIZE,
            start_cursor: Some(cursor),
        }
    }
}

/// Every item of a listing in server order, or nothing plus the failure.
#[derive(Debug)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub failure: Option<FetchError>,
}

impl<T> Listing<T> {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// The items, empty when the listing failed.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// The items of a complete listing, or the failure that emptied it.
    pub fn into_result(self) -> Result<Vec<T>, FetchError> {
        match self.failure {
            Some(failure) => Err(failure),
            None => Ok(self.items),
        }
    }
}

/// Follows `next_cursor` until the server reports no more results.
///
/// A response claiming `has_more` without a cursor ends the listing.
pub async fn fetch_listing<T, F, Fut>(resource: &str, mut fetch_page: F) -> Listing<T>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    let mut items = Vec::new();
    let mut request = PageRequest::first();
    let mut pages_fetched = 0usize;

    loop {
        let response = match fetch_page(request).await {
            Ok(response) => response,
            Err(source) => {
                log::warn!(
                    "Listing {} failed after {} page(s): {}",
                    resource,
                    pages_fetched,
                    source
                );
                return Listing {
                    items: Vec::new(),
                    failure: Some(FetchError {
                        resource: resource.to_string(),
                        source,
                    }),
                };
            }
        };

        pages_fetched += 1;
        items.extend(response.results);

        match (response.has_more, response.next_cursor) {
            (true, Some(cursor)) => request = PageRequest::after(cursor),
            (true, None) => {
                log::debug!("{} reported more results without a cursor", resource);
                break;
            }
            (false, _) => break,
        }
    }

    log::debug!(
        "Listed {} item(s) of {} in {} page(s)",
        items.len(),
        resource,
        pages_fetched
    );
    Listing {
        items,
        failure: None,
    }
}

/// Every child of `parent`, across all pages.
pub async fn list_all_children(repo: &dyn NotionRepository, parent: &NotionId) -> Listing<Block> {
    let resource = format!("children of {}", parent);
    fetch_listing(&resource, |request| repo.list_children(parent, request)).await
}

/// Every page of the database, across all pages.
pub async fn list_database_pages(repo: &dyn NotionRepository, database: &DatabaseId) -> Listing<Page> {
    let resource = format!("database {}", database);
    fetch_listing(&resource, |request| repo.query_database(database, request)).await
}
