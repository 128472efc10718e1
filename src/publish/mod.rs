// src/publish/mod.rs
//! Output strategies: where rendered documents go.
//!
//! A strategy either delivers each document as it arrives (`PublishEach` over
//! a `PublishSink`) or collects documents and delivers them together when the
//! batch finishes (`SummaryPage`).

mod github;
mod local;
mod summary_page;

pub use github::GitHubContentsSink;
pub use local::LocalDirectorySink;
pub use summary_page::{split_text_into_chunks, SummaryPage};

use crate::error::PublishError;
use crate::formatting::RenderedDocument;

/// What an output strategy did with one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Delivered; `location` names where it landed.
    Published { location: String },
    /// Held until `finish`.
    Staged,
}

/// The unit of work a batch publishes through.
#[async_trait::async_trait]
pub trait OutputStrategy: Send {
    async fn publish(&mut self, document: &RenderedDocument) -> Result<Delivery, PublishError>;

    /// Delivers anything staged. Returns the location of the combined output, if any.
    async fn finish(&mut self) -> Result<Option<String>, PublishError> {
        Ok(None)
    }

    fn describe(&self) -> String;
}

/// Creates or overwrites one document at a path.
#[async_trait::async_trait]
pub trait PublishSink: Send + Sync {
    /// Upserts `content` at `path`, returning where it can be found.
    async fn upsert(&self, path: &str, content: &str, message: &str)
        -> Result<String, PublishError>;

    fn describe(&self) -> String;
}

/// Publishes every document immediately through a sink.
pub struct PublishEach<S> {
    sink: S,
}

impl<S: PublishSink> PublishEach<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[async_trait::async_trait]
impl<S: PublishSink> OutputStrategy for PublishEach<S> {
    async fn publish(&mut self, document: &RenderedDocument) -> Result<Delivery, PublishError> {
        let location = self
            .sink
            .upsert(&document.path, &document.content, &document.commit_message())
            .await?;
        log::info!("Published '{}' to {}", document.title, location);
        Ok(Delivery::Published { location })
    }

    fn describe(&self) -> String {
        self.sink.describe()
    }
}
