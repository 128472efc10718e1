// src/publish/github.rs
//! Upserts files through the GitHub contents API.
//!
//! The current blob sha is looked up immediately before each write and sent
//! back with it, so an existing file is replaced rather than rejected.

use super::PublishSink;
use crate::error::{preview_body, PublishError};
use crate::types::{RepoSlug, SecretToken};
use base64::Engine as _;
use reqwest::{header, StatusCode};
use serde::Deserialize;
use serde_json::json;
use url::Url;

const USER_AGENT: &str = concat!("notion2post/", env!("CARGO_PKG_VERSION"));
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

#[derive(Debug, Deserialize)]
struct ContentEntry {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    content: Option<PutContent>,
}

#[derive(Debug, Deserialize)]
struct PutContent {
    #[serde(default)]
    html_url: Option<String>,
}

pub struct GitHubContentsSink {
    client: reqwest::Client,
    api_base: Url,
    repo: RepoSlug,
    token: SecretToken,
    branch: Option<String>,
}

impl GitHubContentsSink {
    pub fn new(
        api_base: &str,
        repo: RepoSlug,
        token: SecretToken,
        branch: Option<String>,
    ) -> Result<Self, PublishError> {
        let parsed = Url::parse(api_base).map_err(|e| PublishError::InvalidApiBase {
            url: api_base.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(PublishError::InvalidApiBase {
                url: api_base.to_string(),
                reason: "not a hierarchical URL".to_string(),
            });
        }
        Ok(Self {
            client: reqwest::Client::builder().user_agent(USER_AGENT).build()?,
            api_base: parsed,
            repo,
            token,
            branch,
        })
    }

    /// Each segment of `path` is percent-encoded, so `#` and `?` in a post
    /// title stay part of the file name.
    fn contents_url(&self, path: &str) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["repos", self.repo.owner(), self.repo.name(), "contents"])
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        url
    }

    fn request(&self, method: reqwest::Method, url: &Url) -> reqwest::RequestBuilder {
        self.client
            .request(method, url.clone())
            .header(header::AUTHORIZATION, format!("token {}", self.token.as_str()))
            .header(header::ACCEPT, GITHUB_ACCEPT)
    }

    /// The sha of the file currently at `path`, or `None` when it does not exist yet.
    async fn current_sha(&self, path: &str, url: &Url) -> Result<Option<String>, PublishError> {
        let mut request = self.request(reqwest::Method::GET, url);
        if let Some(branch) = &self.branch {
            request = request.query(&[("ref", branch)]);
        }
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        match status {
            StatusCode::OK => {
                let entry: ContentEntry = serde_json::from_str(&body)
                    .map_err(|e| PublishError::MalformedResponse(e.to_string()))?;
                Ok(Some(entry.sha))
            }
            StatusCode::NOT_FOUND => Ok(None),
            other => Err(PublishError::VersionLookup {
                path: path.to_string(),
                status: other.as_u16(),
                body: preview_body(&body),
            }),
        }
    }
}

#[async_trait::async_trait]
impl PublishSink for GitHubContentsSink {
    async fn upsert(
        &self,
        path: &str,
        content: &str,
        message: &str,
    ) -> Result<String, PublishError> {
        let url = self.contents_url(path);
        let sha = self.current_sha(path, &url).await?;
        log::debug!(
            "PUT {} ({})",
            url,
            if sha.is_some() { "update" } else { "create" }
        );

        let mut body = json!({
            "message": message,
            "content": base64::engine::general_purpose::STANDARD.encode(content.as_bytes()),
        });
        if let Some(sha) = &sha {
            body["sha"] = json!(sha);
        }
        if let Some(branch) = &self.branch {
            body["branch"] = json!(branch);
        }

        let response = self
            .request(reqwest::Method::PUT, &url)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let raw = response.text().await?;

        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(PublishError::Rejected {
                path: path.to_string(),
                status: status.as_u16(),
                body: preview_body(&raw),
            });
        }

        let location = serde_json::from_str::<PutResponse>(&raw)
            .ok()
            .and_then(|r| r.content)
            .and_then(|c| c.html_url)
            .unwrap_or_else(|| format!("{}:{}", self.repo, path));
        Ok(location)
    }

    fn describe(&self) -> String {
        match &self.branch {
            Some(branch) => format!("GitHub repository {} ({})", self.repo, branch),
            None => format!("GitHub repository {}", self.repo),
        }
    }
}
