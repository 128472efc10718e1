// src/config.rs
use crate::api::PageSchema;
use crate::constants::{
    DEFAULT_NOTION_VERSION, DEFAULT_POST_DIR, NOTION_MAX_FETCH_DEPTH, SUMMARY_MAX_CHARS,
};
use crate::error::AppError;
use crate::formatting::{NumberingPolicy, WalkOptions};
use crate::pipeline::StatusVocabulary;
use crate::types::{
    ApiKey, DatabaseId, PageId, RepoSlug, SecretToken, ValidatedUrl, ValidationError,
    WorkflowStatus,
};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_GPT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Where rendered documents go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputKind {
    /// Upsert one file per page into a GitHub repository
    Github,
    /// Write one file per page into a local directory
    Local,
    /// Collect summaries into a single new Notion page
    SummaryPage,
}

/// Parsed and validated command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Output strategy for rendered pages
    #[arg(long, value_enum, default_value_t = OutputKind::Github)]
    pub output: OutputKind,

    /// Target directory for `--output local`
    #[arg(long)]
    pub local_dir: Option<String>,

    /// Parent page (URL or ID) that receives the summary page for `--output summary-page`
    #[arg(long)]
    pub summary_parent: Option<String>,

    /// Branch to commit to (defaults to the repository's default branch)
    #[arg(long)]
    pub branch: Option<String>,

    /// Summarize each page with the configured language model
    #[arg(long, default_value_t = false)]
    pub summarize: bool,

    /// Maximum summary length in characters
    #[arg(long, default_value_t = SUMMARY_MAX_CHARS)]
    pub summary_max_chars: usize,

    /// How numbered list items are numbered
    #[arg(long, value_enum, default_value_t = NumberingPolicy::Literal)]
    pub numbering: NumberingPolicy,

    /// Nesting depth beyond which child blocks are not fetched
    #[arg(long, default_value_t = NOTION_MAX_FETCH_DEPTH)]
    pub max_depth: usize,

    /// Name of the status property in the database
    #[arg(long, default_value = "Status")]
    pub status_property: String,

    /// Name of the title property in the database
    #[arg(long, default_value = "Name")]
    pub title_property: String,

    /// Status value for pages that have not been started
    #[arg(long, default_value = "Not started")]
    pub status_not_started: String,

    /// Status value for pages that are ready to publish
    #[arg(long, default_value = "Ready to publish")]
    pub status_ready: String,

    /// Status value for published pages
    #[arg(long, default_value = "Done")]
    pub status_done: String,

    /// Directory inside the target that receives posts
    #[arg(long, default_value = DEFAULT_POST_DIR)]
    pub post_dir: String,

    /// Handlebars template for posts (defaults to the built-in Jekyll layout)
    #[arg(long)]
    pub template: Option<String>,

    /// Write each page's fetched blocks as JSON into this directory
    #[arg(long)]
    pub dump_blocks: Option<String>,

    /// Process only this page (URL or ID) instead of querying the database
    #[arg(long)]
    pub page: Option<String>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Settings for the Notion API.
#[derive(Debug, Clone)]
pub struct NotionSettings {
    pub api_key: ApiKey,
    pub version: String,
    pub database_id: DatabaseId,
    pub schema: PageSchema,
}

/// Settings for the summarization model.
#[derive(Debug, Clone)]
pub struct SummarizerSettings {
    pub api_key: SecretToken,
    pub model: String,
    pub base_url: ValidatedUrl,
}

/// Resolved output strategy.
#[derive(Debug, Clone)]
pub enum OutputTarget {
    GitHub {
        token: SecretToken,
        repo: RepoSlug,
        branch: Option<String>,
        api_base: ValidatedUrl,
    },
    LocalDirectory(PathBuf),
    SummaryPage {
        parent: PageId,
    },
}

/// Resolved configuration, built once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub notion: NotionSettings,
    pub workflow: StatusVocabulary,
    pub walk: WalkOptions,
    pub summarizer: Option<SummarizerSettings>,
    pub summary_max_chars: usize,
    pub output: OutputTarget,
    pub post_dir: String,
    pub template: Option<PathBuf>,
    pub dump_blocks: Option<PathBuf>,
    pub single_page: Option<PageId>,
    pub verbose: bool,
}

impl SyncConfig {
    /// Resolves a complete configuration from CLI input and the process environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with(cli, |key| std::env::var(key).ok())
    }

    /// Resolves a configuration using `env` to look up environment variables.
    pub fn resolve_with<F>(cli: CommandLineInput, env: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            env(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| {
                    AppError::MissingConfiguration(format!(
                        "{} environment variable not set",
                        key
                    ))
                })
        };

        let notion = NotionSettings {
            api_key: ApiKey::new(required("NOTION_SECRET")?)?,
            version: env("NOTION_VERSION").unwrap_or_else(|| DEFAULT_NOTION_VERSION.to_string()),
            database_id: DatabaseId::parse(&required("NOTION_DATABASE_ID")?)?,
            schema: PageSchema {
                title_property: cli.title_property,
                status_property: cli.status_property,
            },
        };

        let summarizer = if cli.summarize {
            Some(SummarizerSettings {
                api_key: SecretToken::new(required("OPENAI_API_KEY")?)?,
                model: env("GPT_MODEL").unwrap_or_else(|| DEFAULT_GPT_MODEL.to_string()),
                base_url: ValidatedUrl::parse(
                    &env("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
                )?,
            })
        } else {
            None
        };

        if cli.summary_max_chars < 10 {
            return Err(ValidationError::OutOfBounds {
                value: u32::try_from(cli.summary_max_chars).unwrap_or(u32::MAX),
                min: 10,
                max: u32::MAX,
            }
            .into());
        }

        let output = match cli.output {
            OutputKind::Github => OutputTarget::GitHub {
                token: SecretToken::new(required("GITHUB_TOKEN")?)?,
                repo: RepoSlug::parse(&required("GITHUB_REPO")?)?,
                branch: cli.branch,
                api_base: ValidatedUrl::parse(
                    &env("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
                )?,
            },
            OutputKind::Local => OutputTarget::LocalDirectory(
                cli.local_dir.map(PathBuf::from).ok_or_else(|| {
                    AppError::MissingConfiguration(
                        "--local-dir is required with --output local".to_string(),
                    )
                })?,
            ),
            OutputKind::SummaryPage => OutputTarget::SummaryPage {
                parent: PageId::parse(cli.summary_parent.as_deref().ok_or_else(|| {
                    AppError::MissingConfiguration(
                        "--summary-parent is required with --output summary-page".to_string(),
                    )
                })?)?,
            },
        };

        let single_page = cli.page.as_deref().map(PageId::parse).transpose()?;

        Ok(SyncConfig {
            notion,
            workflow: StatusVocabulary {
                not_started: WorkflowStatus::new(cli.status_not_started),
                ready: WorkflowStatus::new(cli.status_ready),
                done: WorkflowStatus::new(cli.status_done),
            },
            walk: WalkOptions {
                numbering: cli.numbering,
                max_depth: cli.max_depth,
            },
            summarizer,
            summary_max_chars: cli.summary_max_chars,
            output,
            post_dir: cli.post_dir.trim_matches('/').to_string(),
            template: cli.template.map(PathBuf::from),
            dump_blocks: cli.dump_blocks.map(PathBuf::from),
            single_page,
            verbose: cli.verbose,
        })
    }
}
