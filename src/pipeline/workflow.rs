// src/pipeline/workflow.rs
//! The publication workflow a page moves through.

use crate::types::WorkflowStatus;

/// Status names as configured in the notes database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusVocabulary {
    pub not_started: WorkflowStatus,
    pub ready: WorkflowStatus,
    pub done: WorkflowStatus,
}

impl Default for StatusVocabulary {
    fn default() -> Self {
        Self {
            not_started: WorkflowStatus::new("Not started"),
            ready: WorkflowStatus::new("Ready to publish"),
            done: WorkflowStatus::new("Done"),
        }
    }
}

impl StatusVocabulary {
    /// Pages in these states are never rendered.
    pub fn is_excluded(&self, status: Option<&WorkflowStatus>) -> bool {
        matches!(status, Some(s) if *s == self.done || *s == self.not_started)
    }

    /// The status to write once a page's content has been delivered, if any.
    pub fn status_after_publish(&self, current: Option<&WorkflowStatus>) -> Option<&WorkflowStatus> {
        match current {
            Some(status) if *status == self.ready => Some(&self.done),
            _ => None,
        }
    }
}
