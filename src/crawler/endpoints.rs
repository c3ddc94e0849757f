//! Upstream request URLs
//!
//! Builds search-page and item URLs from the configured endpoints.

use crate::CrawlError;
use chrono::{DateTime, Duration, Utc};
use url::Url;

/// Unix timestamp `days_ago` days before `now`
///
/// Plain duration arithmetic; no calendar rules apply. A window reaching past
/// the representable range clamps to the epoch.
pub fn created_after(now: DateTime<Utc>, days_ago: u32) -> i64 {
    now.checked_sub_signed(Duration::days(i64::from(days_ago)))
        .map(|cutoff| cutoff.timestamp())
        .unwrap_or(0)
}

/// Search URL for one page of stories created after `created_after`
///
/// Produces `<endpoint>?query=Q&tags=story&numericFilters=created_at_i>T&page=P`.
pub fn search_url(
    endpoint: &str,
    query: &str,
    created_after: i64,
    page: u32,
) -> Result<Url, CrawlError> {
    let mut url = Url::parse(endpoint)?;
    url.query_pairs_mut()
        .append_pair("query", query)
        .append_pair("tags", "story")
        .append_pair("numericFilters", &format!("created_at_i>{}", created_after))
        .append_pair("page", &page.to_string());
    Ok(url)
}

/// Item URL `<endpoint>/<identifier>.json`
pub fn item_url(endpoint: &str, identifier: &str) -> Result<Url, CrawlError> {
    let mut url = Url::parse(endpoint)?;
    url.path_segments_mut()
        .map_err(|_| CrawlError::Endpoint(endpoint.to_string()))?
        .pop_if_empty()
        .push(&format!("{}.json", identifier));
    Ok(url)
}
