// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role.

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100. We use the maximum to minimize
/// round-trips while walking block trees.
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// Default nesting depth at which the block walker stops expanding children.
///
/// 50 levels is far deeper than any real Notion page.
pub const NOTION_MAX_FETCH_DEPTH: usize = 50;

/// Notion API version sent when `NOTION_VERSION` is not set.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Maximum length of a single rich text `content` string accepted by Notion.
pub const NOTION_RICH_TEXT_MAX_CHARS: usize = 2000;

// ---------------------------------------------------------------------------
// Formatting boundaries
// ---------------------------------------------------------------------------

/// Indentation unit repeated once per nesting level for non-code lines.
pub const INDENT_UNIT: &str = "  ";

/// Deepest markdown heading level.
pub const MAX_HEADING_LEVEL: u8 = 6;

/// Directory inside the target repository that receives posts.
pub const DEFAULT_POST_DIR: &str = "_posts";

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Upper bound on summary length, in characters.
pub const SUMMARY_MAX_CHARS: usize = 300;

/// Marker appended to any truncated summary.
pub const TRUNCATION_MARKER: &str = "...";

/// Completion budget requested from the summarization model.
pub const SUMMARY_MAX_TOKENS: u32 = 500;

/// Sampling temperature for summaries.
pub const SUMMARY_TEMPERATURE: f32 = 0.5;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
