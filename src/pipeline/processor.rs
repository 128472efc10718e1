// src/pipeline/processor.rs
//! Processes one page: gate, walk, summarize, assemble, publish, advance status.

use super::workflow::StatusVocabulary;
use crate::api::{list_all_children, NotionRepository};
use crate::config::SyncConfig;
use crate::error::{FetchError, PageError, StatusUpdateError};
use crate::formatting::{walk_blocks, DocumentTemplate, WalkOptions};
use crate::model::Block;
use crate::publish::{Delivery, OutputStrategy};
use crate::summarize::{summarize_or_truncate, Summarizer};
use crate::types::{NotionId, PageId, WorkflowStatus};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// Why a page produced no document.
#[derive(Debug)]
pub enum SkipReason {
    /// The page's status is done or not started.
    ExcludedStatus(WorkflowStatus),
    NoBlocks,
    /// The root block listing failed.
    BlocksUnavailable(FetchError),
    /// Blocks exist but none of them rendered any text.
    NoText,
}

/// What happened to the page's workflow status after delivery.
#[derive(Debug)]
pub enum StatusChange {
    Updated(WorkflowStatus),
    Unchanged,
    /// Content is out but the status write failed; nothing corrects this.
    Failed(StatusUpdateError),
}

#[derive(Debug)]
pub enum PageOutcome {
    Skipped(SkipReason),
    Published {
        location: String,
        status: StatusChange,
        /// Subtrees whose listing failed and so are missing from the document.
        dropped_subtrees: usize,
    },
    /// Held by the output strategy; the status write waits for its `finish`.
    Staged {
        pending_status: Option<WorkflowStatus>,
        dropped_subtrees: usize,
    },
}

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

pub struct PageProcessor<'a> {
    repo: &'a dyn NotionRepository,
    template: &'a DocumentTemplate,
    workflow: StatusVocabulary,
    walk: WalkOptions,
    summarizer: Option<&'a dyn Summarizer>,
    summary_max_chars: usize,
    dump_dir: Option<PathBuf>,
    clock: fn() -> NaiveDateTime,
}

impl<'a> PageProcessor<'a> {
    pub fn new(repo: &'a dyn NotionRepository, template: &'a DocumentTemplate) -> Self {
        Self {
            repo,
            template,
            workflow: StatusVocabulary::default(),
            walk: WalkOptions::default(),
            summarizer: None,
            summary_max_chars: crate::constants::SUMMARY_MAX_CHARS,
            dump_dir: None,
            clock: local_now,
        }
    }

    /// A processor using every setting of `config` except the summarizer.
    pub fn from_config(
        repo: &'a dyn NotionRepository,
        template: &'a DocumentTemplate,
        config: &SyncConfig,
    ) -> Self {
        let mut processor = Self::new(repo, template)
            .with_workflow(config.workflow.clone())
            .with_walk_options(config.walk.clone())
            .with_summary_max_chars(config.summary_max_chars);
        if let Some(dir) = &config.dump_blocks {
            processor = processor.with_block_dump(dir.clone());
        }
        processor
    }

    pub fn with_workflow(mut self, workflow: StatusVocabulary) -> Self {
        self.workflow = workflow;
        self
    }

    pub fn with_walk_options(mut self, walk: WalkOptions) -> Self {
        self.walk = walk;
        self
    }

    pub fn with_summarizer(mut self, summarizer: &'a dyn Summarizer) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn with_summary_max_chars(mut self, max_chars: usize) -> Self {
        self.summary_max_chars = max_chars;
        self
    }

    /// Root blocks of every processed page are written to `<dir>/<page-id>.json`.
    pub fn with_block_dump(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dump_dir = Some(dir.into());
        self
    }

    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn repository(&self) -> &'a dyn NotionRepository {
        self.repo
    }

    pub async fn process(
        &self,
        page_id: &PageId,
        output: &mut dyn OutputStrategy,
    ) -> Result<PageOutcome, PageError> {
        let page = self
            .repo
            .retrieve_page(page_id)
            .await
            .map_err(|source| PageError::Unavailable {
                page_id: page_id.to_string(),
                source,
            })?;

        if let Some(status) = page
            .status
            .as_ref()
            .filter(|status| self.workflow.is_excluded(Some(*status)))
        {
            log::info!("Skipping '{}': status is '{}'", page.title, status);
            return Ok(PageOutcome::Skipped(SkipReason::ExcludedStatus(
                status.clone(),
            )));
        }
        log::info!("Processing '{}' ({})", page.title, page.id);

        let roots = list_all_children(self.repo, &NotionId::from(&page.id)).await;
        if let Some(failure) = roots.failure {
            log::warn!("Skipping '{}': {}", page.title, failure);
            return Ok(PageOutcome::Skipped(SkipReason::BlocksUnavailable(failure)));
        }
        if roots.items.is_empty() {
            log::info!("Skipping '{}': page has no blocks", page.title);
            return Ok(PageOutcome::Skipped(SkipReason::NoBlocks));
        }
        if let Some(dir) = &self.dump_dir {
            dump_blocks(dir, &page.id, &roots.items);
        }

        let walk = walk_blocks(self.repo, roots.items, &self.walk).await;
        let dropped_subtrees = walk.fetch_failures.len();
        if dropped_subtrees > 0 {
            log::warn!(
                "'{}' is missing {} subtree(s) that could not be listed",
                page.title,
                dropped_subtrees
            );
        }
        let full_text = walk.full_text();
        if full_text.is_empty() {
            log::info!("Skipping '{}': no text to publish", page.title);
            return Ok(PageOutcome::Skipped(SkipReason::NoText));
        }

        let summary = match self.summarizer {
            Some(summarizer) => {
                let summary =
                    summarize_or_truncate(summarizer, &full_text, self.summary_max_chars).await;
                log::info!("[{}] summary: {}", page.title, summary.text);
                Some(summary.text)
            }
            None => None,
        };

        let document = self
            .template
            .assemble(
                &page.id,
                page.title.as_str(),
                (self.clock)(),
                summary,
                full_text,
            )
            .map_err(|source| PageError::Assembly {
                page_id: page.id.to_string(),
                source,
            })?;

        let target = self
            .workflow
            .status_after_publish(page.status.as_ref())
            .cloned();

        match output.publish(&document).await? {
            Delivery::Published { location } => {
                let status = match target {
                    Some(target) => self.advance_status(&page.id, target).await,
                    None => StatusChange::Unchanged,
                };
                Ok(PageOutcome::Published {
                    location,
                    status,
                    dropped_subtrees,
                })
            }
            Delivery::Staged => Ok(PageOutcome::Staged {
                pending_status: target,
                dropped_subtrees,
            }),
        }
    }

    /// Writes `target` as the page's status, reporting rather than propagating failure.
    pub async fn advance_status(&self, page_id: &PageId, target: WorkflowStatus) -> StatusChange {
        match self.repo.update_status(page_id, &target).await {
            Ok(()) => {
                log::info!("Page {} moved to '{}'", page_id, target);
                StatusChange::Updated(target)
            }
            Err(source) => {
                let error = StatusUpdateError {
                    page_id: page_id.to_string(),
                    target,
                    source,
                };
                log::warn!("{}", error);
                StatusChange::Failed(error)
            }
        }
    }
}

/// Best effort: a failed dump is logged and otherwise ignored.
fn dump_blocks(dir: &Path, page_id: &PageId, blocks: &[Block]) {
    let path = dir.join(format!("{}.json", page_id));
    let written = serde_json::to_string_pretty(blocks)
        .map_err(std::io::Error::other)
        .and_then(|json| {
            std::fs::create_dir_all(dir)?;
            std::fs::write(&path, json)
        });
    match written {
        Ok(()) => log::info!("Block data saved to {}", path.display()),
        Err(e) => log::warn!("Could not save block data to {}: {}", path.display(), e),
    }
}
