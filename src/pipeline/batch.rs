// src/pipeline/batch.rs
//! Runs the page processor over every candidate page, one at a time.

use super::processor::{PageOutcome, PageProcessor, StatusChange};
use crate::api::list_database_pages;
use crate::error::{FetchError, PageError, PublishError, StatusUpdateError};
use crate::publish::OutputStrategy;
use crate::types::{DatabaseId, PageId, WorkflowStatus};

/// Tally of one batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub pages_seen: usize,
    pub published: usize,
    pub staged: usize,
    pub skipped: usize,
    pub status_updates: usize,
    /// Published pages with at least one subtree missing.
    pub incomplete_pages: usize,
    pub failed: Vec<(PageId, PageError)>,
    pub status_failures: Vec<StatusUpdateError>,
    /// Set when the database listing itself failed.
    pub listing_failure: Option<FetchError>,
    /// Where the output strategy put its combined output, if it has one.
    pub finish_location: Option<String>,
    pub finish_error: Option<PublishError>,
}

impl BatchReport {
    /// True when nothing failed, including status writes.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
            && self.status_failures.is_empty()
            && self.listing_failure.is_none()
            && self.finish_error.is_none()
    }

    fn record_status(&mut self, change: StatusChange) {
        match change {
            StatusChange::Updated(_) => self.status_updates += 1,
            StatusChange::Unchanged => {}
            StatusChange::Failed(error) => self.status_failures.push(error),
        }
    }

    pub fn log_summary(&self) {
        log::info!(
            "Batch complete: {} page(s) seen, {} published, {} staged, {} skipped, {} failed, {} status update(s)",
            self.pages_seen,
            self.published,
            self.staged,
            self.skipped,
            self.failed.len(),
            self.status_updates
        );
        if let Some(location) = &self.finish_location {
            log::info!("Combined output: {}", location);
        }
        for (page_id, error) in &self.failed {
            log::error!("Page {} failed: {}", page_id, error);
        }
        for error in &self.status_failures {
            log::warn!("{}", error);
        }
        if self.incomplete_pages > 0 {
            log::warn!(
                "{} published page(s) are missing subtrees that could not be listed",
                self.incomplete_pages
            );
        }
    }
}

pub struct BatchDriver<'a> {
    processor: PageProcessor<'a>,
}

impl<'a> BatchDriver<'a> {
    pub fn new(processor: PageProcessor<'a>) -> Self {
        Self { processor }
    }

    /// Processes every page of the database.
    pub async fn run(
        &self,
        database: &DatabaseId,
        output: &mut dyn OutputStrategy,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        let listing = list_database_pages(self.processor.repository(), database).await;

        if let Some(failure) = listing.failure {
            log::error!("Could not list pages of database {}: {}", database, failure);
            report.listing_failure = Some(failure);
        } else if listing.items.is_empty() {
            log::info!("No pages found in database {}", database);
        } else {
            log::info!("Found {} page(s) in database {}", listing.items.len(), database);
        }

        let ids = listing.items.into_iter().map(|page| page.id).collect();
        self.process_all(ids, output, report).await
    }

    /// Processes one page as a batch of one.
    pub async fn run_single(&self, page_id: &PageId, output: &mut dyn OutputStrategy) -> BatchReport {
        self.process_all(vec![page_id.clone()], output, BatchReport::default())
            .await
    }

    async fn process_all(
        &self,
        page_ids: Vec<PageId>,
        output: &mut dyn OutputStrategy,
        mut report: BatchReport,
    ) -> BatchReport {
        let mut deferred: Vec<(PageId, WorkflowStatus)> = Vec::new();

        for page_id in page_ids {
            report.pages_seen += 1;
            match self.processor.process(&page_id, output).await {
                Ok(PageOutcome::Skipped(reason)) => {
                    log::debug!("Page {} skipped: {:?}", page_id, reason);
                    report.skipped += 1;
                }
                Ok(PageOutcome::Published {
                    status,
                    dropped_subtrees,
                    ..
                }) => {
                    report.published += 1;
                    if dropped_subtrees > 0 {
                        report.incomplete_pages += 1;
                    }
                    report.record_status(status);
                }
                Ok(PageOutcome::Staged {
                    pending_status,
                    dropped_subtrees,
                }) => {
                    report.staged += 1;
                    if dropped_subtrees > 0 {
                        report.incomplete_pages += 1;
                    }
                    if let Some(target) = pending_status {
                        deferred.push((page_id, target));
                    }
                }
                Err(error) => {
                    log::error!("Page {} failed: {}", page_id, error);
                    report.failed.push((page_id, error));
                }
            }
        }

        match output.finish().await {
            Ok(location) => {
                report.finish_location = location;
                for (page_id, target) in deferred {
                    let change = self.processor.advance_status(&page_id, target).await;
                    report.record_status(change);
                }
            }
            Err(error) => {
                log::error!(
                    "Finishing {} failed; {} staged status update(s) withheld: {}",
                    output.describe(),
                    deferred.len(),
                    error
                );
                report.finish_error = Some(error);
            }
        }

        report
    }
}
