mod block;

pub use block::{concat_runs, Block, BlockContent, BlockKind, TextRun};

use crate::types::{PageId, WorkflowStatus};
use serde::{Deserialize, Serialize};

/// A page of the notes database. Its content tree is fetched separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub title: PageTitle,
    pub status: Option<WorkflowStatus>,
    pub url: String,
}

impl Page {
    /// Get the page title
    pub fn title(&self) -> &PageTitle {
        &self.title
    }
}

/// Page title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageTitle(String);

impl PageTitle {
    pub fn new(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    pub fn from_runs(runs: &[TextRun]) -> Self {
        Self(concat_runs(runs))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PageTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
