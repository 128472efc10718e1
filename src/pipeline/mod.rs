// src/pipeline/mod.rs
//! Page processing and the batch that drives it.

mod batch;
mod processor;
mod workflow;

pub use batch::{BatchDriver, BatchReport};
pub use processor::{PageOutcome, PageProcessor, SkipReason, StatusChange};
pub use workflow::StatusVocabulary;
