// src/formatting/mod.rs
//! Turns block trees into markdown and markdown into publishable posts.

mod document;
mod markdown;
mod walker;

pub use document::{post_path, slugify, DocumentTemplate, RenderedDocument, DEFAULT_POST_TEMPLATE};
pub use markdown::{heading_marker, render_block, NumberingPolicy};
pub use walker::{walk_blocks, WalkOptions, WalkReport};
