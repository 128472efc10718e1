// src/publish/summary_page.rs
//! Collects page summaries into one new Notion page per batch.

use super::{Delivery, OutputStrategy};
use crate::api::{BlockDraft, NewPage, NotionRepository};
use crate::constants::NOTION_RICH_TEXT_MAX_CHARS;
use crate::error::PublishError;
use crate::formatting::RenderedDocument;
use crate::summarize::truncate_summary;
use crate::types::PageId;
use chrono::NaiveDate;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
struct StagedEntry {
    title: String,
    summary: String,
}

pub struct SummaryPage {
    repo: Arc<dyn NotionRepository>,
    parent: PageId,
    summary_max_chars: usize,
    date: NaiveDate,
    staged: Vec<StagedEntry>,
}

impl SummaryPage {
    pub fn new(
        repo: Arc<dyn NotionRepository>,
        parent: PageId,
        summary_max_chars: usize,
        date: NaiveDate,
    ) -> Self {
        Self {
            repo,
            parent,
            summary_max_chars,
            date,
            staged: Vec::new(),
        }
    }

    pub fn staged_count(&self) -> usize {
        self.staged.len()
    }

    fn title(&self) -> String {
        format!("Summary {}", self.date.format("%Y-%m-%d"))
    }

    fn blocks(&self) -> Vec<BlockDraft> {
        self.staged
            .iter()
            .flat_map(|entry| {
                std::iter::once(BlockDraft::Heading2(entry.title.clone())).chain(
                    split_text_into_chunks(&entry.summary, NOTION_RICH_TEXT_MAX_CHARS)
                        .into_iter()
                        .map(BlockDraft::Paragraph),
                )
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl OutputStrategy for SummaryPage {
    async fn publish(&mut self, document: &RenderedDocument) -> Result<Delivery, PublishError> {
        let summary = match &document.summary {
            Some(summary) => summary.clone(),
            None => truncate_summary(&document.body, self.summary_max_chars),
        };
        self.staged.push(StagedEntry {
            title: document.title.clone(),
            summary,
        });
        log::debug!("Staged '{}' for the summary page", document.title);
        Ok(Delivery::Staged)
    }

    async fn finish(&mut self) -> Result<Option<String>, PublishError> {
        if self.staged.is_empty() {
            log::info!("Nothing staged; no summary page created");
            return Ok(None);
        }

        let page = NewPage {
            parent: self.parent.clone(),
            title: self.title(),
            children: self.blocks(),
        };
        let created = self
            .repo
            .create_page(&page)
            .await
            .map_err(PublishError::SummaryPage)?;

        log::info!(
            "Created summary page '{}' with {} entries: {}",
            page.title,
            self.staged.len(),
            created.url
        );
        self.staged.clear();
        Ok(Some(created.url))
    }

    fn describe(&self) -> String {
        format!("summary page under {}", self.parent)
    }
}

/// Splits text on whitespace into chunks of at most `max_chars` characters.
///
/// Words are joined with single spaces. A word longer than `max_chars` is cut
/// into pieces of exactly that size.
pub fn split_text_into_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let needed = if current.is_empty() {
            word_len
        } else {
            current_len + 1 + word_len
        };

        if needed <= max_chars {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_len = needed;
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }

        if word_len <= max_chars {
            current.push_str(word);
            current_len = word_len;
        } else {
            let chars: Vec<char> = word.chars().collect();
            let pieces = chars
                .chunks(max_chars)
                .map(|piece| piece.iter().collect::<String>());
            let mut last = String::new();
            for piece in pieces {
                if !last.is_empty() {
                    chunks.push(std::mem::take(&mut last));
                }
                last = piece;
            }
            current_len = last.chars().count();
            current = last;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
