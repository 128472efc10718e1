// src/summarize/mod.rs
//! Optional page summaries with a deterministic fallback.

mod openai;

pub use openai::OpenAiSummarizer;

use crate::constants::TRUNCATION_MARKER;
use crate::error::SummarizeError;

/// Shortens text. Implementations may fail; callers fall back to truncation.
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError>;
}

/// Where a summary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySource {
    Model,
    /// The model failed and the source text was truncated instead.
    Fallback,
}

/// A summary bounded by the configured length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub text: String,
    pub source: SummarySource,
}

/// Cuts `text` to at most `max_chars` characters at a word boundary and marks the cut.
///
/// Newlines become spaces. Text already within the limit is returned trimmed.
pub fn truncate_summary(text: &str, max_chars: usize) -> String {
    let flattened = text.trim().replace('\n', " ");
    if flattened.chars().count() <= max_chars {
        return flattened;
    }

    let head: String = flattened.chars().take(max_chars).collect();
    let cut = match head.rfind(' ') {
        Some(index) => &head[..index],
        None => head.as_str(),
    };
    format!("{}{}", cut, TRUNCATION_MARKER)
}

/// Asks the summarizer, bounding its output; truncates the source on failure.
pub async fn summarize_or_truncate(
    summarizer: &dyn Summarizer,
    text: &str,
    max_chars: usize,
) -> Summary {
    match summarizer.summarize(text).await {
        Ok(summary) => Summary {
            text: truncate_summary(&summary, max_chars),
            source: SummarySource::Model,
        },
        Err(e) => {
            log::warn!("Summarization failed, truncating source text instead: {}", e);
            Summary {
                text: truncate_summary(text, max_chars),
                source: SummarySource::Fallback,
            }
        }
    }
}
