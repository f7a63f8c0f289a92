// src/main.rs
use anyhow::Context;
use chrono::Local;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion2blog::output::{deliver, DeliveryTarget, OutputPlan, OutputReport};
use notion2blog::{
    render_document, AppError, CachedTransport, CommandLineInput, Delivery, NotionCatalog,
    NotionHttpClient, NotionWebApi, PostCatalog, SiteConfig,
};
use serde_json::Value;
use std::fs;

/// Sets up logging configuration.
///
/// Console logs go to stderr so stdout carries only the JSON document.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notion2blog.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(log_level)))
                .build("stderr", Box::new(stderr_appender)),
        )
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(LevelFilter::Debug),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Builds the catalog for the configured database, cached unless disabled.
async fn build_catalog(config: &SiteConfig) -> Result<Box<dyn PostCatalog>, AppError> {
    let http_client = NotionHttpClient::new(config.token.as_ref())?;
    let root = config.root_id.clone();

    if config.no_cache {
        log::info!("Cache disabled, all requests go to Notion");
        let api = NotionWebApi::new(http_client).with_time_zone(config.time_zone.as_str());
        return Ok(Box::new(NotionCatalog::new(api, root, config.concurrency)));
    }

    log::info!("Cache enabled (TTL: {}s)", config.cache_ttl);
    let transport = CachedTransport::new(http_client, config.cache_ttl).await;
    let api = NotionWebApi::new(transport).with_time_zone(config.time_zone.as_str());
    Ok(Box::new(NotionCatalog::new(api, root, config.concurrency)))
}

/// Sends the document to the configured output file, or stdout.
struct JsonDelivery<'a> {
    config: &'a SiteConfig,
}

impl Delivery for JsonDelivery<'_> {
    fn deliver(&self, document: &Value) -> Result<OutputReport, AppError> {
        let content = if self.config.pretty {
            serde_json::to_string_pretty(document)?
        } else {
            serde_json::to_string(document)?
        };

        let target = match &self.config.output_file {
            Some(path) => DeliveryTarget::WriteFile {
                path: path.clone(),
                content,
            },
            None => DeliveryTarget::PrintToStdout { content },
        };

        let report = deliver(OutputPlan::new().with_operation(target));
        if let Some(failure) = report.failed.first() {
            return Err(AppError::Io(std::io::Error::other(failure.error.clone())));
        }
        Ok(report)
    }
}

/// Runs fetch, render and delivery for one configuration.
async fn execute_pipeline(config: &SiteConfig) -> anyhow::Result<()> {
    let catalog = build_catalog(config)
        .await
        .context("Failed to set up the Notion client")?;

    let document = render_document(catalog.as_ref(), &config.request, &Local::now())
        .await
        .with_context(|| format!("Failed to render blog {}", config.root_id))?;

    let report = JsonDelivery { config }.deliver(&document)?;
    for completed in &report.completed {
        if let DeliveryTarget::WriteFile { path, .. } = &completed.operation {
            eprintln!("✓ Wrote {} bytes to {}", completed.bytes_written, path.display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = SiteConfig::resolve(cli)?;

    execute_pipeline(&config).await
}
