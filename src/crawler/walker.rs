//! Comment frontier walker
//!
//! Drains every scheduled comment from the ledger breadth-first by discovery
//! order, storing each one and scheduling the nested comments it lists.

use crate::config::ApiConfig;
use crate::crawler::endpoints::item_url;
use crate::crawler::fetcher::fetch_body;
use crate::crawler::frontier::Frontier;
use crate::state::{child_identifiers, ItemKind};
use crate::storage::{CrawlStore, RecordOutcome};
use crate::CrawlError;
use reqwest::Client;
use serde_json::Value;

/// Counters for one drain pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Comments stored during this pass
    pub comments_stored: u64,

    /// Fetches that failed; those comments stay scheduled
    pub fetch_failures: u64,

    /// Frontier entries that were already stored when popped
    pub skipped: u64,

    /// Nested comments discovered and scheduled during this pass
    pub discovered: u64,
}

/// BFS walker over the comment graph
pub struct CommentWalker<'a, S: CrawlStore> {
    store: &'a mut S,
    client: &'a Client,
    api: &'a ApiConfig,
}

impl<'a, S: CrawlStore> CommentWalker<'a, S> {
    pub fn new(store: &'a mut S, client: &'a Client, api: &'a ApiConfig) -> Self {
        Self { store, client, api }
    }

    /// Fetches scheduled comments until the frontier is empty
    ///
    /// The frontier starts as every scheduled comment in the ledger. A failed
    /// fetch is counted and dropped from this pass without touching the
    /// ledger, so the next run retries it.
    pub async fn drain(&mut self) -> Result<DrainReport, CrawlError> {
        let mut frontier = Frontier::new(self.store.list_scheduled(ItemKind::Comment)?);
        let mut report = DrainReport::default();

        tracing::info!("Fetching {} scheduled comments", frontier.len());

        while let Some(comment_id) = frontier.pop() {
            // Stored through another path while its entry was still scheduled
            if self.store.exists(&comment_id)? {
                tracing::debug!("Skipping already stored comment {}", comment_id);
                self.store.mark_successful(&comment_id)?;
                report.skipped += 1;
                continue;
            }

            let url = item_url(&self.api.item_endpoint, &comment_id)?;
            let body = match fetch_body(self.client, &url).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!("Failed to fetch comment {}: {}", comment_id, e);
                    report.fetch_failures += 1;
                    continue;
                }
            };

            let payload: Value = match serde_json::from_str(&body) {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::warn!("Unreadable payload for comment {}: {}", comment_id, e);
                    report.fetch_failures += 1;
                    continue;
                }
            };

            let kids = child_identifiers(&payload, "kids");
            let scheduled = match self
                .store
                .record_fetched(ItemKind::Comment, &comment_id, &body, &kids)?
            {
                RecordOutcome::Stored { scheduled } => scheduled,
                RecordOutcome::AlreadyExists => continue,
            };
            report.comments_stored += 1;
            tracing::info!("Stored comment {}", comment_id);

            for kid_id in scheduled {
                tracing::debug!("Scheduled nested comment {} for crawling", kid_id);
                if frontier.push(kid_id) {
                    report.discovered += 1;
                }
            }

            if report.comments_stored % 100 == 0 {
                tracing::info!(
                    "Progress: {} comments stored, {} in frontier, {} failed",
                    report.comments_stored,
                    frontier.len(),
                    report.fetch_failures
                );
            }
        }

        tracing::info!(
            "Frontier drained: {} stored, {} failed, {} enqueued this run",
            report.comments_stored,
            report.fetch_failures,
            frontier.total_enqueued()
        );

        Ok(report)
    }
}
