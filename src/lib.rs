// src/lib.rs
//! notion2post library: publishes the pages of a Notion database as markdown posts.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `PageError`, `PublishError`, `ValidationError`
//! - **Configuration**: `SyncConfig`, `CommandLineInput`
//! - **Domain model**: `Page`, `Block`, `BlockKind`, `TextRun`
//! - **API client**: `NotionRepository`, `NotionHttpClient`, listing helpers
//! - **Formatting**: `walk_blocks`, `render_block`, `DocumentTemplate`
//! - **Summaries**: `Summarizer`, `OpenAiSummarizer`, `truncate_summary`
//! - **Publishing**: `OutputStrategy`, `PublishSink` and their implementations
//! - **Pipeline**: `PageProcessor`, `BatchDriver`

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod formatting;
pub mod model;
pub mod pipeline;
pub mod publish;
pub mod summarize;
pub mod types;

// --- Error Handling ---
pub use crate::error::{
    AppError, FetchError, NotionErrorCode, PageError, PublishError, StatusUpdateError,
    SummarizeError,
};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, OutputKind, OutputTarget, SyncConfig};

// --- Domain Model ---
pub use crate::model::{Block, BlockContent, BlockKind, Page, PageTitle, TextRun};

// --- Domain Types ---
pub use crate::types::{
    ApiKey, BlockId, DatabaseId, NotionId, PageId, RepoSlug, SecretToken, ValidatedUrl,
    WorkflowStatus,
};

// --- API Client ---
pub use crate::api::{
    list_all_children, list_database_pages, Listing, NotionHttpClient, NotionRepository,
    PageRequest, PageSchema, PaginatedResponse,
};

// --- Formatting ---
pub use crate::formatting::{
    render_block, walk_blocks, DocumentTemplate, NumberingPolicy, RenderedDocument, WalkOptions,
    WalkReport,
};

// --- Summaries ---
pub use crate::summarize::{truncate_summary, OpenAiSummarizer, Summarizer};

// --- Publishing ---
pub use crate::publish::{
    Delivery, GitHubContentsSink, LocalDirectorySink, OutputStrategy, PublishEach, PublishSink,
    SummaryPage,
};

// --- Pipeline ---
pub use crate::pipeline::{
    BatchDriver, BatchReport, PageOutcome, PageProcessor, SkipReason, StatusChange,
    StatusVocabulary,
};
