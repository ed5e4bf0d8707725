use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use tally_augment::{AugmentedParser, Augmenter, HttpCompletionClient, PromptLabels};
use tally_parse::{ExpenseParser, TaxonomySet};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod render;

use config::AppConfig;

/// Turn free-form expense messages into structured records.
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Parse natural-language expense messages", long_about = None)]
#[command(version)]
struct Cli {
    /// Messages to parse; one per line from stdin when omitted
    messages: Vec<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Taxonomy dataset, overrides the config file
    #[arg(long)]
    taxonomy: Option<PathBuf>,

    /// Reference instant in RFC 3339, instead of the system clock
    #[arg(long)]
    now: Option<DateTime<Utc>>,

    /// Print each record as a JSON line
    #[arg(long)]
    json: bool,

    /// Skip the completion service even when a key is configured
    #[arg(long)]
    no_augment: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(path) = cli.taxonomy.clone() {
        config.taxonomy_path = Some(path);
    }

    let parser = build_parser(&config, cli.no_augment)?;
    let instant = cli.now.unwrap_or_else(Utc::now);

    if cli.messages.is_empty() {
        for line in std::io::stdin().lock().lines() {
            let line = line.context("reading stdin")?;
            if line.trim().is_empty() {
                continue;
            }
            emit(&parser, &line, instant, cli.json).await?;
        }
    } else {
        for message in &cli.messages {
            emit(&parser, message, instant, cli.json).await?;
        }
    }
    Ok(())
}

fn build_parser(
    config: &AppConfig,
    no_augment: bool,
) -> Result<AugmentedParser<HttpCompletionClient>> {
    let loaded = match &config.taxonomy_path {
        Some(path) => TaxonomySet::from_path(path),
        None => TaxonomySet::builtin(),
    };
    let labels = loaded.as_ref().ok().map(PromptLabels::from_taxonomies);
    let parser = ExpenseParser::from_loaded(loaded);

    if !config.augmentation_enabled() {
        tracing::debug!("no completion API key configured, augmentation off");
    }
    let augmenter = match config.augmentation.active_key() {
        Some(key) if !no_augment => {
            let aug = &config.augmentation;
            let client = HttpCompletionClient::new(&aug.base_url, &aug.model, key, aug.timeout())
                .context("building completion client")?;
            tracing::info!(endpoint = %client.endpoint(), "augmentation enabled");
            Some(
                Augmenter::new(client)
                    .with_timeout(aug.timeout())
                    .with_labels(labels.unwrap_or_default()),
            )
        }
        _ => None,
    };

    Ok(AugmentedParser::new(parser, augmenter))
}

async fn emit(
    parser: &AugmentedParser<HttpCompletionClient>,
    text: &str,
    instant: DateTime<Utc>,
    json: bool,
) -> Result<()> {
    let record = parser.parse_augmented_at(text, instant).await;
    if json {
        println!("{}", serde_json::to_string(&record)?);
    } else {
        println!("{}", render::summary(&record));
    }
    Ok(())
}
