// src/error.rs
//! Application error types with structured error handling.
//!
//! `AppError` covers transport, API and configuration failures. The remaining
//! types name the failure of one step of page processing, so the batch driver
//! can decide per step whether to fall back, skip, or abort the current page.

use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::types::WorkflowStatus;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// API rate limit exceeded
    RateLimited,
    /// The requested object does not exist or is inaccessible
    ObjectNotFound,
    /// API key is invalid or expired
    Unauthorized,
    /// API key lacks permission for this resource
    RestrictedResource,
    /// Request body contains invalid JSON
    InvalidJson,
    /// Request parameters failed Notion's validation
    ValidationFailed,
    /// Conflict with current state of the resource
    Conflict,
    /// Notion internal server error
    InternalError,
    /// Notion is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    /// Parse a Notion API error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "object_not_found" => Self::ObjectNotFound,
            "unauthorized" => Self::Unauthorized,
            "restricted_resource" => Self::RestrictedResource,
            "invalid_json" => Self::InvalidJson,
            "validation_error" => Self::ValidationFailed,
            "conflict_error" => Self::Conflict,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    /// Whether this error means the resource simply doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound | Self::HttpStatus(404))
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RestrictedResource => write!(f, "restricted_resource"),
            Self::InvalidJson => write!(f, "invalid_json"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::Conflict => write!(f, "conflict_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Notion API returned an error ({code}): {message}")]
    NotionService {
        code: NotionErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template file not found at {path}: {source}")]
    TemplateNotFound {
        path: String,
        source: std::io::Error,
    },

    #[error("Template render error for template {name}: {message}")]
    TemplateRenderError { name: String, message: String },

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// A paginated listing could not be completed.
#[derive(Error, Debug)]
#[error("Failed to list {resource}: {source}")]
pub struct FetchError {
    pub resource: String,
    #[source]
    pub source: AppError,
}

/// The summarization collaborator did not produce a summary.
#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("Summarizer request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Summarizer returned an error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Summarizer response was malformed: {0}")]
    Malformed(String),

    #[error("Summarizer returned no text")]
    EmptyOutput,
}

/// The publish sink rejected or could not accept a document.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Could not look up the current version of {path} ({status}): {body}")]
    VersionLookup {
        path: String,
        status: u16,
        body: String,
    },

    #[error("Publishing {path} was rejected ({status}): {body}")]
    Rejected {
        path: String,
        status: u16,
        body: String,
    },

    #[error("Invalid GitHub API base URL {url}: {reason}")]
    InvalidApiBase { url: String, reason: String },

    #[error("Publish transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed publish response: {0}")]
    MalformedResponse(String),

    #[error("Failed to create summary page: {0}")]
    SummaryPage(#[source] AppError),
}

/// The final workflow status write failed after content was published.
#[derive(Error, Debug)]
#[error("Failed to set status of page {page_id} to '{target}': {source}")]
pub struct StatusUpdateError {
    pub page_id: String,
    pub target: WorkflowStatus,
    #[source]
    pub source: AppError,
}

/// Processing of a single page was aborted.
#[derive(Error, Debug)]
pub enum PageError {
    #[error("Page {page_id} could not be retrieved: {source}")]
    Unavailable {
        page_id: String,
        #[source]
        source: AppError,
    },

    #[error("Document assembly failed for page {page_id}: {source}")]
    Assembly {
        page_id: String,
        #[source]
        source: AppError,
    },

    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// Shortens a response body for inclusion in logs and error messages.
pub fn preview_body(body: &str) -> String {
    if body.chars().count() <= ERROR_BODY_PREVIEW_LENGTH {
        return body.to_string();
    }
    let preview: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
    format!("{}...", preview)
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_round_trip_through_display() {
        for code in ["rate_limited", "object_not_found", "validation_error"] {
            assert_eq!(NotionErrorCode::from_api_response(code).to_string(), code);
        }
        assert_eq!(
            NotionErrorCode::from_api_response("brand_new_code"),
            NotionErrorCode::Unknown("brand_new_code".to_string())
        );
    }

    #[test]
    fn not_found_covers_bare_404() {
        assert!(NotionErrorCode::ObjectNotFound.is_not_found());
        assert!(NotionErrorCode::from_http_status(404).is_not_found());
        assert!(!NotionErrorCode::from_http_status(500).is_not_found());
    }

    #[test]
    fn body_preview_is_char_safe() {
        let body = "가".repeat(ERROR_BODY_PREVIEW_LENGTH + 10);
        let preview = preview_body(&body);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), ERROR_BODY_PREVIEW_LENGTH + 3);
        assert_eq!(preview_body("short"), "short");
    }
}
