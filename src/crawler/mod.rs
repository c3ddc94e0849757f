//! Crawler module for pulling stories and comments
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching against the search and item APIs
//! - Story ingestion from paginated search results
//! - Breadth-first draining of the comment frontier
//! - Overall crawl coordination

mod coordinator;
mod endpoints;
mod fetcher;
mod frontier;
mod ingestor;
mod walker;

pub use coordinator::{run_crawl, Coordinator, CrawlReport, CrawlRequest};
pub use endpoints::{created_after, item_url, search_url};
pub use fetcher::{build_http_client, fetch_body, fetch_url, FetchFailure, FetchResult};
pub use frontier::Frontier;
pub use ingestor::{IngestReport, StoryIngestor};
pub use walker::{CommentWalker, DrainReport};
