// src/formatting/markdown.rs
//! Per-kind markdown rules for a single block.
//!
//! Rendering is pure: a block, its depth, and its position among numbered
//! siblings go in, zero or more lines come out. Children are the walker's
//! concern.

use crate::constants::{INDENT_UNIT, MAX_HEADING_LEVEL};
use crate::model::{Block, BlockKind};

/// How numbered list items are prefixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum NumberingPolicy {
    /// Every item gets `1.`; markdown renderers number the list themselves.
    #[default]
    Literal,
    /// Consecutive numbered siblings count up, restarting after any other block.
    Sequential,
}

impl NumberingPolicy {
    fn marker(self, ordinal: usize) -> String {
        match self {
            NumberingPolicy::Literal => "1. ".to_string(),
            NumberingPolicy::Sequential => format!("{}. ", ordinal.max(1)),
        }
    }
}

/// Renders one block at `depth`.
///
/// `ordinal` is the 1-based position of the block within its run of
/// consecutive numbered siblings; it is ignored for every other kind.
pub fn render_block(
    block: &Block,
    depth: usize,
    ordinal: usize,
    numbering: NumberingPolicy,
) -> Vec<String> {
    if block.kind == BlockKind::Code {
        return render_code(block);
    }

    let Some(text) = block.plain_text() else {
        return Vec::new();
    };

    let prefix = match &block.kind {
        BlockKind::Heading(level) => heading_marker(*level),
        BlockKind::BulletedListItem => "- ".to_string(),
        BlockKind::NumberedListItem => numbering.marker(ordinal),
        _ => String::new(),
    };

    vec![format!("{}{}{}", indent(depth), prefix, text)]
}

/// Fenced code, padded with blank lines and never indented.
fn render_code(block: &Block) -> Vec<String> {
    let language = block.content.language.as_deref().unwrap_or_default();
    let source = block.plain_text().unwrap_or_default();

    let mut lines = Vec::with_capacity(4 + source.lines().count());
    lines.push(String::new());
    lines.push(format!("```{}", language));
    lines.extend(source.lines().map(str::to_string));
    lines.push("```".to_string());
    lines.push(String::new());
    lines
}

/// `#` repeated for the level, clamped to what markdown supports.
pub fn heading_marker(level: u8) -> String {
    let level = level.clamp(1, MAX_HEADING_LEVEL) as usize;
    format!("{} ", "#".repeat(level))
}

fn indent(depth: usize) -> String {
    INDENT_UNIT.repeat(depth)
}
