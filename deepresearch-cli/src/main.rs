//! Deep Research CLI: terminal interface for the research pipeline.
//!
//! Provides both single-query and interactive modes.

mod repl;

use clap::Parser;
use deepresearch_core::config::{ModelPreset, ResearchConfig, SearchDepth};
use deepresearch_core::error::{ResearchError, SearchError};
use deepresearch_core::search::SearchOptions;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Deep Research: plan, search and synthesize a cited report
#[derive(Parser, Debug)]
#[command(name = "deepresearch", version, about, long_about = None)]
struct Cli {
    /// Research topic (starts interactive mode if omitted)
    query: Option<String>,

    /// Use advanced search depth (basic otherwise)
    #[arg(long)]
    advanced: bool,

    /// Model preset: local, deepseek-cloud, gpt-cloud
    #[arg(short, long)]
    model: Option<ModelPreset>,

    /// Maximum results per search query
    #[arg(long)]
    max_results: Option<u32>,

    /// Only search these domains (repeatable)
    #[arg(long = "include-domain")]
    include_domains: Vec<String>,

    /// Never search these domains (repeatable)
    #[arg(long = "exclude-domain")]
    exclude_domains: Vec<String>,

    /// Directory reports are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Workspace directory
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Per-run search overrides. Depth is always set: `--advanced` or basic.
    fn search_options(&self) -> SearchOptions {
        let depth = if self.advanced {
            SearchDepth::Advanced
        } else {
            SearchDepth::Basic
        };
        let mut options = SearchOptions::default().with_depth(depth);
        if let Some(max) = self.max_results {
            options = options.with_max_results(max);
        }
        if !self.include_domains.is_empty() {
            options.include_domains = Some(self.include_domains.clone());
        }
        if !self.exclude_domains.is_empty() {
            options.exclude_domains = Some(self.exclude_domains.clone());
        }
        options
    }

    fn apply_overrides(&self, config: &mut ResearchConfig) {
        if let Some(preset) = self.model {
            config.llm.model = preset.model_name().to_string();
        }
        if let Some(dir) = &self.output_dir {
            config.report.output_dir = dir.clone();
        }
    }
}

/// Setup advice shown under a session error, when there is any.
fn startup_hint(err: &ResearchError) -> Option<String> {
    match err {
        ResearchError::Search(SearchError::MissingApiKey { var }) => Some(format!(
            "Please create a .env file with your {var}.\nExample: {var}=tvly-..."
        )),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "deepresearch", "deepresearch")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "deepresearch.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let mut config = deepresearch_core::config::load_config(Some(&workspace), None)?;
    cli.apply_overrides(&mut config);

    let session = match repl::ResearchSession::new(config, cli.search_options()) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start research session");
            eprintln!("Error: {}", e);
            if let Some(hint) = startup_hint(&e) {
                eprintln!("{}", hint);
            }
            std::process::exit(1);
        }
    };

    session.print_banner();

    if let Some(query) = &cli.query {
        if session.run_research(query).await.is_err() {
            std::process::exit(1);
        }
        Ok(())
    } else {
        session.run_interactive().await
    }
}
