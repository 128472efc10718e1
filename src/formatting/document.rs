// src/formatting/document.rs
//! Assembles the publishable post: front matter, optional summary, body.

use crate::error::AppError;
use crate::types::PageId;
use chrono::NaiveDateTime;
use handlebars::Handlebars;
use serde_json::json;
use std::path::Path;

const TEMPLATE_NAME: &str = "post";

/// Jekyll-style post with front matter.
pub const DEFAULT_POST_TEMPLATE: &str = concat!(
    "---\n",
    "layout: post\n",
    "title: \"{{front_matter_title}}\"\n",
    "date: {{date}}\n",
    "---\n",
    "\n",
    "## {{title}}\n",
    "\n",
    "{{#if summary}}**Summary:** {{summary}}\n\n{{/if}}",
    "{{body}}\n",
);

/// A page ready to hand to an output strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub page_id: PageId,
    pub title: String,
    pub timestamp: NaiveDateTime,
    pub summary: Option<String>,
    /// Trimmed markdown body.
    pub body: String,
    /// Target path relative to the publishing root.
    pub path: String,
    /// Fully assembled text.
    pub content: String,
}

impl RenderedDocument {
    pub fn commit_message(&self) -> String {
        format!("Add new blog post: {}", self.path)
    }
}

/// Registered post template.
pub struct DocumentTemplate {
    engine: Handlebars<'static>,
    post_dir: String,
}

impl DocumentTemplate {
    /// The built-in template.
    pub fn built_in(post_dir: impl Into<String>) -> Result<Self, AppError> {
        Self::from_source(DEFAULT_POST_TEMPLATE, post_dir)
    }

    /// Loads a template file, falling back to the built-in one when `path` is `None`.
    pub fn load(path: Option<&Path>, post_dir: impl Into<String>) -> Result<Self, AppError> {
        let Some(path) = path else {
            return Self::built_in(post_dir);
        };
        let source = std::fs::read_to_string(path).map_err(|e| AppError::TemplateNotFound {
            path: path.display().to_string(),
            source: e,
        })?;
        log::info!("Using post template {}", path.display());
        Self::from_source(&source, post_dir)
    }

    fn from_source(source: &str, post_dir: impl Into<String>) -> Result<Self, AppError> {
        let mut engine = Handlebars::new();
        engine.register_escape_fn(handlebars::no_escape);
        engine
            .register_template_string(TEMPLATE_NAME, source)
            .map_err(|e| AppError::TemplateRenderError {
                name: TEMPLATE_NAME.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            engine,
            post_dir: post_dir.into(),
        })
    }

    /// Builds the document for one page.
    pub fn assemble(
        &self,
        page_id: &PageId,
        title: &str,
        timestamp: NaiveDateTime,
        summary: Option<String>,
        body: String,
    ) -> Result<RenderedDocument, AppError> {
        let data = json!({
            "title": title,
            "front_matter_title": escape_front_matter(title),
            "date": timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            "summary": summary,
            "body": body,
        });
        let content = self
            .engine
            .render(TEMPLATE_NAME, &data)
            .map_err(|e| AppError::TemplateRenderError {
                name: TEMPLATE_NAME.to_string(),
                message: e.to_string(),
            })?;

        Ok(RenderedDocument {
            page_id: page_id.clone(),
            title: title.to_string(),
            path: post_path(&self.post_dir, timestamp, title),
            timestamp,
            summary,
            body,
            content,
        })
    }
}

/// `<post_dir>/<YYYY-MM-DD>-<slug>.md`
pub fn post_path(post_dir: &str, timestamp: NaiveDateTime, title: &str) -> String {
    let file = format!("{}-{}.md", timestamp.format("%Y-%m-%d"), slugify(title));
    let dir = post_dir.trim_end_matches('/');
    if dir.is_empty() {
        file
    } else {
        format!("{}/{}", dir, file)
    }
}

/// Spaces and path separators become `-`; everything else is kept.
pub fn slugify(title: &str) -> String {
    let slug: String = title
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '-',
            other => other,
        })
        .collect();
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

fn escape_front_matter(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
