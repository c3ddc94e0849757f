//! Statistics generation from the crawl database
//!
//! This module provides functionality for extracting and displaying
//! crawl counts from the storage layer.

use crate::crawler::CrawlReport;
use crate::state::{ItemKind, LedgerStatus};
use crate::storage::{ContentStore, CrawlLedger, RunRecord};
use crate::CrawlError;
use std::fmt;

/// Aggregate counts over everything stored so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Stored stories
    pub stories: u64,

    /// Stored comments
    pub comments: u64,

    /// Ledger entries still waiting for a successful fetch
    pub scheduled: u64,

    /// Ledger entries fetched and stored
    pub completed: u64,
}

impl fmt::Display for CrawlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats - Stories: {}, Comments: {}, Scheduled: {}, Completed: {}",
            self.stories, self.comments, self.scheduled, self.completed
        )
    }
}

/// Loads the aggregate counts from storage
///
/// # Arguments
///
/// * `store` - The content store and ledger to query
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Successfully loaded counts
/// * `Err(CrawlError)` - Failed to query storage
pub fn load_summary<S>(store: &S) -> Result<CrawlSummary, CrawlError>
where
    S: ContentStore + CrawlLedger + ?Sized,
{
    Ok(CrawlSummary {
        stories: store.count(ItemKind::Story)?,
        comments: store.count(ItemKind::Comment)?,
        scheduled: store.count_by_status(LedgerStatus::Scheduled)?,
        completed: store.count_by_status(LedgerStatus::Successful)?,
    })
}

/// Prints the aggregate counts to stdout
pub fn print_summary(summary: &CrawlSummary) {
    println!("{}", summary);
}

/// Prints the outcome of a crawl run to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Run {} ===\n", report.run_id);

    println!("This run:");
    println!("  Stories stored: {}", report.ingest.stories_stored);
    println!("  Stories already known: {}", report.ingest.stories_skipped);
    println!("  Search pages failed: {}", report.ingest.pages_failed);
    println!("  Comments stored: {}", report.drain.comments_stored);
    println!("  Comment fetches failed: {}", report.drain.fetch_failures);
    println!();

    print_summary(&report.summary);
}

/// Prints a recorded run to stdout
pub fn print_run(run: &RunRecord) {
    println!(
        "Last run {} ({}): query {:?}, {} days, {} pages",
        run.id,
        run.status.to_db_string(),
        run.query,
        run.days_ago,
        run.page_count
    );
    println!("  Started: {}", run.started_at);
    if let Some(finished) = &run.finished_at {
        println!("  Finished: {}", finished);
    }
    println!(
        "  Stored {} stories and {} comments; {} pages and {} comments failed",
        run.counters.stories_stored,
        run.counters.comments_stored,
        run.counters.pages_failed,
        run.counters.fetch_failures
    );
}
