// src/api/types.rs
//! Write-side request shapes for the Notion API.

use crate::types::PageId;
use serde_json::{json, Value};

/// A block to be appended to a new page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockDraft {
    Heading2(String),
    Paragraph(String),
}

impl BlockDraft {
    /// Wire form: a block object with one plain text run.
    pub fn to_json(&self) -> Value {
        let (kind, content) = match self {
            BlockDraft::Heading2(text) => ("heading_2", text),
            BlockDraft::Paragraph(text) => ("paragraph", text),
        };
        json!({
            "object": "block",
            "type": kind,
            kind: {
                "rich_text": [{ "type": "text", "text": { "content": content } }]
            }
        })
    }
}

/// A page to be created under an existing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPage {
    pub parent: PageId,
    pub title: String,
    pub children: Vec<BlockDraft>,
}

/// Identity of a page the API just created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPage {
    pub id: PageId,
    pub url: String,
}
