//! Crawler coordinator - main crawl orchestration logic
//!
//! This module sequences one crawl invocation:
//! - Recording the run
//! - Ingesting story pages
//! - Draining the comment frontier
//! - Reading the final counts back from storage

use crate::config::Config;
use crate::crawler::build_http_client;
use crate::crawler::ingestor::{IngestReport, StoryIngestor};
use crate::crawler::walker::{CommentWalker, DrainReport};
use crate::output::{load_summary, CrawlSummary};
use crate::storage::{open_storage, RunCounters, RunLog, SqliteStorage};
use crate::CrawlError;
use reqwest::Client;

/// Arguments of one crawl invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    /// Search query string
    pub query: String,

    /// Lookback window for story creation time, in days
    pub days_ago: u32,

    /// Number of search result pages to pull
    pub page_count: u32,
}

/// Outcome of one crawl invocation
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub run_id: i64,

    /// Totals read back from storage after the run
    pub summary: CrawlSummary,

    pub ingest: IngestReport,
    pub drain: DrainReport,
}

impl CrawlReport {
    /// Per-run counters as recorded in the run log
    pub fn counters(&self) -> RunCounters {
        counters_for(&self.ingest, &self.drain)
    }
}

fn counters_for(ingest: &IngestReport, drain: &DrainReport) -> RunCounters {
    RunCounters {
        stories_stored: ingest.stories_stored,
        comments_stored: drain.comments_stored,
        pages_failed: ingest.pages_failed,
        fetch_failures: drain.fetch_failures,
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    storage: SqliteStorage,
    client: Client,
    config_hash: String,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Opens the database and artifact directories named in the config and
    /// builds the HTTP client.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlError)` - Failed to initialize
    pub fn new(config: Config) -> Result<Self, CrawlError> {
        let storage = open_storage(&config.output)?;
        Self::with_storage(config, storage)
    }

    /// Creates a coordinator over an already opened storage
    pub fn with_storage(config: Config, storage: SqliteStorage) -> Result<Self, CrawlError> {
        let client = build_http_client(&config.http)?;

        Ok(Self {
            config,
            storage,
            client,
            config_hash: crate::config::DEFAULT_CONFIG_HASH.to_string(),
        })
    }

    /// Sets the config hash recorded with each run
    pub fn with_config_hash(mut self, config_hash: impl Into<String>) -> Self {
        self.config_hash = config_hash.into();
        self
    }

    /// The storage this coordinator writes to
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Runs one crawl: story ingestion, then the comment frontier
    ///
    /// Safe to call repeatedly against the same storage; each call resumes
    /// from whatever is already stored and scheduled.
    pub async fn run(&mut self, request: &CrawlRequest) -> Result<CrawlReport, CrawlError> {
        let run_id = self.storage.create_run(
            &request.query,
            request.days_ago,
            request.page_count,
            &self.config_hash,
        )?;
        tracing::info!(
            "Starting crawl run {} (query: {:?}, days: {}, pages: {})",
            run_id,
            request.query,
            request.days_ago,
            request.page_count
        );

        let ingested = StoryIngestor::new(&mut self.storage, &self.client, &self.config.api)
            .ingest(&request.query, request.days_ago, request.page_count)
            .await;
        let ingest = match ingested {
            Ok(report) => report,
            Err(e) => return Err(self.abort(run_id, RunCounters::default(), e)),
        };
        tracing::info!(
            "Story ingestion finished: {} stored, {} already known, {} pages failed",
            ingest.stories_stored,
            ingest.stories_skipped,
            ingest.pages_failed
        );

        let drained = CommentWalker::new(&mut self.storage, &self.client, &self.config.api)
            .drain()
            .await;
        let drain = match drained {
            Ok(report) => report,
            Err(e) => {
                let counters = counters_for(&ingest, &DrainReport::default());
                return Err(self.abort(run_id, counters, e));
            }
        };

        let counters = counters_for(&ingest, &drain);
        self.storage.complete_run(run_id, &counters)?;

        let summary = load_summary(&self.storage)?;
        tracing::info!("Crawl run {} completed. {}", run_id, summary);

        Ok(CrawlReport {
            run_id,
            summary,
            ingest,
            drain,
        })
    }

    /// Records a run as failed and hands the error back
    fn abort(&mut self, run_id: i64, counters: RunCounters, error: CrawlError) -> CrawlError {
        tracing::error!("Crawl run {} failed: {}", run_id, error);
        if let Err(e) = self.storage.fail_run(run_id, &counters) {
            tracing::error!("Failed to record run {} as failed: {}", run_id, e);
        }
        error
    }
}

/// Runs one crawl against the storage named in `config`
///
/// # Example
///
/// ```no_run
/// use hn_crawl::config::Config;
/// use hn_crawl::crawler::{run_crawl, CrawlRequest};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let request = CrawlRequest {
///     query: "rust".to_string(),
///     days_ago: 30,
///     page_count: 5,
/// };
/// let report = run_crawl(Config::default(), "default", &request).await?;
/// println!("{}", report.summary);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: Config,
    config_hash: &str,
    request: &CrawlRequest,
) -> Result<CrawlReport, CrawlError> {
    let mut coordinator = Coordinator::new(config)?.with_config_hash(config_hash);
    coordinator.run(request).await
}
