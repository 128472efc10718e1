// src/publish/local.rs
//! Writes documents under a local directory.
//!
//! The directory plays the role of a checked-out site repository; re-publishing
//! a document overwrites the file in place.

use super::PublishSink;
use crate::error::PublishError;
use std::fs;
use std::path::{Component, Path, PathBuf};

pub struct LocalDirectorySink {
    root: PathBuf,
}

impl LocalDirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `path` under the root, refusing anything that would escape it.
    fn target(&self, path: &str) -> Result<PathBuf, PublishError> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(PublishError::Io {
                path: relative.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "document path must stay inside the output directory",
                ),
            });
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait::async_trait]
impl PublishSink for LocalDirectorySink {
    async fn upsert(
        &self,
        path: &str,
        content: &str,
        message: &str,
    ) -> Result<String, PublishError> {
        let target = self.target(path)?;
        log::debug!("Writing {} bytes to {}", content.len(), target.display());

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| PublishError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let existed = target.exists();
        fs::write(&target, content).map_err(|source| PublishError::Io {
            path: target.clone(),
            source,
        })?;

        log::info!(
            "{} {} ({})",
            if existed { "Updated" } else { "Created" },
            target.display(),
            message
        );
        Ok(target.display().to_string())
    }

    fn describe(&self) -> String {
        format!("local directory {}", self.root.display())
    }
}
