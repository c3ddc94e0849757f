//! hn-crawl main entry point
//!
//! This is the command-line interface for the resumable Hacker News crawler.

use anyhow::Context;
use clap::Parser;
use hn_crawl::config::load_config_with_hash;
use hn_crawl::crawler::{run_crawl, CrawlRequest};
use hn_crawl::output::{load_summary, print_report, print_run, print_summary};
use hn_crawl::storage::{RunLog, SqliteStorage};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// hn-crawl: a resumable Hacker News thread crawler
///
/// Pulls stories matching a search query, walks their comment trees and
/// stores every item exactly once. Interrupted crawls resume on the next
/// invocation with the same database.
#[derive(Parser, Debug)]
#[command(name = "hn-crawl")]
#[command(version)]
#[command(about = "A resumable Hacker News thread crawler", long_about = None)]
struct Cli {
    /// Search query for stories
    #[arg(long, required_unless_present = "stats")]
    query: Option<String>,

    /// Only stories created within this many days
    #[arg(long, default_value_t = 30)]
    days: u32,

    /// Number of pages of search results to fetch
    #[arg(long, default_value_t = 5)]
    pages: u32,

    /// Path to an optional TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "query")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = load_config_with_hash(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(path) = &cli.config {
        tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            config_hash
        );
    }

    if cli.stats {
        return handle_stats(&config.output.database_path);
    }

    let request = CrawlRequest {
        query: cli.query.unwrap_or_default(),
        days_ago: cli.days,
        page_count: cli.pages,
    };

    tracing::info!("Starting crawling process...");
    let report = run_crawl(config, &config_hash, &request)
        .await
        .context("Crawl failed")?;
    tracing::info!("Crawling process completed");

    print_report(&report);
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hn_crawl=info,warn"),
            1 => EnvFilter::new("hn_crawl=debug,info"),
            2 => EnvFilter::new("hn_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --stats mode: prints counts from the database
fn handle_stats(database_path: &str) -> anyhow::Result<()> {
    let path = Path::new(database_path);
    if !path.exists() {
        anyhow::bail!("Database not found: {}", database_path);
    }

    let storage = SqliteStorage::new(path)
        .with_context(|| format!("Failed to open database {}", database_path))?;

    print_summary(&load_summary(&storage)?);
    if let Some(run) = storage.get_latest_run()? {
        print_run(&run);
    }

    Ok(())
}
