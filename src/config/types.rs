use serde::Deserialize;

/// Main configuration structure for the crawler
///
/// Every section and key is optional; a missing config file yields the
/// same values as `Config::default()`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Upstream API endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Search endpoint returning pages of story hits
    #[serde(rename = "search-endpoint", default = "default_search_endpoint")]
    pub search_endpoint: String,

    /// Item endpoint; items are fetched from `<item-endpoint>/<id>.json`
    #[serde(rename = "item-endpoint", default = "default_item_endpoint")]
    pub item_endpoint: String,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(
        rename = "connect-timeout-secs",
        default = "default_connect_timeout_secs"
    )]
    pub connect_timeout_secs: u64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,

    /// Directory holding the `stories/` and `comments/` JSON exports
    #[serde(rename = "artifact-dir", default = "default_artifact_dir")]
    pub artifact_dir: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            search_endpoint: default_search_endpoint(),
            item_endpoint: default_item_endpoint(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            artifact_dir: default_artifact_dir(),
        }
    }
}

fn default_search_endpoint() -> String {
    "https://hn.algolia.com/api/v1/search".to_string()
}

fn default_item_endpoint() -> String {
    "https://hacker-news.firebaseio.com/v0/item".to_string()
}

fn default_user_agent() -> String {
    format!("hn-crawl/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_database_path() -> String {
    "hn_data.db".to_string()
}

fn default_artifact_dir() -> String {
    ".".to_string()
}
