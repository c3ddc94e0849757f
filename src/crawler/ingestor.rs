//! Story ingestion from the search API
//!
//! Pages through search results, stores each story once and seeds the ledger
//! with the story's directly listed comment identifiers. Comment bodies are
//! never fetched here; that is the walker's job.

use crate::config::ApiConfig;
use crate::crawler::endpoints::{created_after, search_url};
use crate::crawler::fetcher::fetch_body;
use crate::output::load_summary;
use crate::state::{child_identifiers, identifier_from_value, ItemKind};
use crate::storage::{CrawlStore, RecordOutcome};
use crate::CrawlError;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// One page of search results
#[derive(Debug, Deserialize)]
struct SearchPage {
    hits: Vec<Value>,
}

/// Counters for one ingestion pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Stories stored for the first time
    pub stories_stored: u64,

    /// Stories already stored by an earlier run (or earlier page)
    pub stories_skipped: u64,

    /// Comment identifiers newly scheduled from stored stories
    pub comments_scheduled: u64,

    /// Pages whose request or body failed
    pub pages_failed: u64,
}

/// Paginated story puller
pub struct StoryIngestor<'a, S: CrawlStore> {
    store: &'a mut S,
    client: &'a Client,
    api: &'a ApiConfig,
}

impl<'a, S: CrawlStore> StoryIngestor<'a, S> {
    pub fn new(store: &'a mut S, client: &'a Client, api: &'a ApiConfig) -> Self {
        Self { store, client, api }
    }

    /// Ingests `page_count` pages of stories matching `query`
    ///
    /// Only stories created within the last `days_ago` days are requested.
    /// A failed page is counted and skipped; the remaining pages still run.
    /// Storage errors end the pass.
    pub async fn ingest(
        &mut self,
        query: &str,
        days_ago: u32,
        page_count: u32,
    ) -> Result<IngestReport, CrawlError> {
        let cutoff = created_after(Utc::now(), days_ago);
        let mut report = IngestReport::default();

        for page in 0..page_count {
            let url = search_url(&self.api.search_endpoint, query, cutoff, page)?;
            tracing::info!("Fetching stories from page {}", page);

            let body = match fetch_body(self.client, &url).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!("Failed to fetch stories for page {}: {}", page, e);
                    report.pages_failed += 1;
                    continue;
                }
            };

            let search_page: SearchPage = match serde_json::from_str(&body) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!("Unreadable search results for page {}: {}", page, e);
                    report.pages_failed += 1;
                    continue;
                }
            };

            for hit in &search_page.hits {
                self.ingest_story(hit, &mut report)?;
            }

            let summary = load_summary(&*self.store)?;
            tracing::info!("{}", summary);
        }

        Ok(report)
    }

    /// Stores one search hit and schedules its children
    fn ingest_story(&mut self, hit: &Value, report: &mut IngestReport) -> Result<(), CrawlError> {
        let Some(story_id) = hit.get("objectID").and_then(identifier_from_value) else {
            tracing::warn!("Skipping search hit without a usable objectID");
            return Ok(());
        };

        let payload = serde_json::to_string(hit)?;
        let children = child_identifiers(hit, "children");
        match self
            .store
            .record_fetched(ItemKind::Story, &story_id, &payload, &children)?
        {
            RecordOutcome::AlreadyExists => {
                tracing::debug!("Skipping already crawled story {}", story_id);
                report.stories_skipped += 1;
            }
            RecordOutcome::Stored { scheduled } => {
                tracing::info!("Stored story {}", story_id);
                for comment_id in &scheduled {
                    tracing::debug!("Scheduled comment {} for crawling", comment_id);
                }
                report.stories_stored += 1;
                report.comments_scheduled += scheduled.len() as u64;
            }
        }

        Ok(())
    }
}
