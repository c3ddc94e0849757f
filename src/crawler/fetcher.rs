//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client from the configured user agent and timeouts
//! - GET requests against the search and item APIs
//! - Classifying failures (bad status vs. transport error)
//!
//! There is no retry logic here. A failed request is reported to the caller,
//! which counts it and moves on; re-running the crawl is the retry.

use crate::config::HttpConfig;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Upstream answered 200 OK
    Success {
        /// Response body
        body: String,
    },

    /// Upstream answered with any other status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, truncated body, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Why a fetch produced no usable body
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(String),
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP client configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use hn_crawl::config::HttpConfig;
/// use hn_crawl::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a single GET request
///
/// Only `200 OK` counts as success; the upstream APIs have no structured
/// error body, so the status code is all that is kept on failure.
pub async fn fetch_url(client: &Client, url: &Url) -> FetchResult {
    match client.get(url.clone()).send().await {
        Ok(response) => {
            let status = response.status();

            if status != StatusCode::OK {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success { body },
                Err(e) => FetchResult::NetworkError {
                    error: e.to_string(),
                },
            }
        }
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            FetchResult::NetworkError { error }
        }
    }
}

/// Fetches a URL and returns its body, or why there is none
pub async fn fetch_body(client: &Client, url: &Url) -> Result<String, FetchFailure> {
    match fetch_url(client, url).await {
        FetchResult::Success { body } => Ok(body),
        FetchResult::HttpError { status_code } => Err(FetchFailure::Status(status_code)),
        FetchResult::NetworkError { error } => Err(FetchFailure::Network(error)),
    }
}
