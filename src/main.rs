// src/main.rs

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion2post::{
    BatchDriver, BatchReport, CommandLineInput, DocumentTemplate, GitHubContentsSink,
    LocalDirectorySink, NotionHttpClient, NotionRepository, OpenAiSummarizer, OutputStrategy,
    OutputTarget, PageProcessor, PublishEach, Summarizer, SummaryPage, SyncConfig,
};
use std::fs;
use std::process::ExitCode;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_file_path = std::env::temp_dir().join("notion2post.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {M} - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Builds the output strategy selected on the command line.
fn build_output(
    config: &SyncConfig,
    repo: Arc<dyn NotionRepository>,
) -> anyhow::Result<Box<dyn OutputStrategy>> {
    let output: Box<dyn OutputStrategy> = match &config.output {
        OutputTarget::GitHub {
            token,
            repo: slug,
            branch,
            api_base,
        } => Box::new(PublishEach::new(
            GitHubContentsSink::new(api_base.base(), slug.clone(), token.clone(), branch.clone())
                .context("building GitHub client")?,
        )),
        OutputTarget::LocalDirectory(root) => {
            Box::new(PublishEach::new(LocalDirectorySink::new(root.clone())))
        }
        OutputTarget::SummaryPage { parent } => Box::new(SummaryPage::new(
            repo,
            parent.clone(),
            config.summary_max_chars,
            chrono::Local::now().date_naive(),
        )),
    };
    log::info!("Publishing to {}", output.describe());
    Ok(output)
}

/// Runs one sync over the configured database, or over a single page.
async fn execute_sync(config: &SyncConfig) -> anyhow::Result<BatchReport> {
    let client = NotionHttpClient::new(&config.notion).context("building Notion client")?;
    let repo: Arc<dyn NotionRepository> = Arc::new(client);

    let template = DocumentTemplate::load(config.template.as_deref(), config.post_dir.as_str())
        .context("loading post template")?;

    let summarizer = config
        .summarizer
        .as_ref()
        .map(OpenAiSummarizer::new)
        .transpose()
        .context("building summarizer")?;

    let mut output = build_output(config, repo.clone())?;

    let mut processor = PageProcessor::from_config(repo.as_ref(), &template, config);
    if let Some(summarizer) = &summarizer {
        processor = processor.with_summarizer(summarizer as &dyn Summarizer);
    }
    let driver = BatchDriver::new(processor);

    let report = match &config.single_page {
        Some(page_id) => {
            log::info!("Processing single page {}", page_id);
            driver.run_single(page_id, output.as_mut()).await
        }
        None => {
            log::info!("Querying database {}", config.notion.database_id);
            driver
                .run(&config.notion.database_id, output.as_mut())
                .await
        }
    };

    Ok(report)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = SyncConfig::resolve(cli)?;

    let report = execute_sync(&config).await?;
    report.log_summary();

    if report.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
