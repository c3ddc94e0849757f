//! Storage module for persisting crawl data
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - The de-duplicated content store of item payloads
//! - The crawl ledger of scheduled and completed identifiers
//! - Per-item JSON exports for tooling outside the crawler
//! - Run tracking

mod artifacts;
mod schema;
mod sqlite;
mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use artifacts::ArtifactExporter;
pub use sqlite::SqliteStorage;
pub use traits::{
    ContentStore, CrawlLedger, CrawlStore, MarkOutcome, PutOutcome, RecordOutcome, RunLog,
    ScheduleOutcome, StorageError, StorageResult,
};

use crate::config::OutputConfig;
use crate::state::{ItemKind, LedgerStatus};
use crate::CrawlError;

use std::path::Path;

/// Opens the database and artifact directories named by the output config
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Storage that also exports every newly stored item
/// * `Err(CrawlError)` - Failed to open the database or create the directories
pub fn open_storage(output: &OutputConfig) -> Result<SqliteStorage, CrawlError> {
    let exporter = ArtifactExporter::new(&output.artifact_dir)?;
    let storage = SqliteStorage::new(Path::new(&output.database_path))?;
    Ok(storage.with_artifacts(exporter))
}

/// Represents a stored item in the database
#[derive(Debug, Clone)]
pub struct StoredItem {
    pub id: i64,
    pub kind: ItemKind,
    pub identifier: String,
    pub content: String,
    pub stored_at: String,
}

/// Represents a crawl ledger entry
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub id: i64,
    pub kind: ItemKind,
    pub identifier: String,
    pub status: LedgerStatus,
    pub scheduled_at: String,
    pub completed_at: Option<String>,
}

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub query: String,
    pub days_ago: u32,
    pub page_count: u32,
    pub config_hash: String,
    pub status: RunStatus,
    pub counters: RunCounters,
}

/// Per-run counters recorded when a run finishes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    pub stories_stored: u64,
    pub comments_stored: u64,
    pub pages_failed: u64,
    pub fetch_failures: u64,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_status_invalid() {
        assert_eq!(RunStatus::from_db_string("interrupted"), None);
        assert_eq!(
            RunStatus::from_db_string("completed"),
            Some(RunStatus::Completed)
        );
    }

    #[test]
    fn test_open_storage_creates_artifact_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputConfig {
            database_path: dir.path().join("crawl.db").to_string_lossy().into_owned(),
            artifact_dir: dir.path().join("out").to_string_lossy().into_owned(),
        };

        open_storage(&output).unwrap();

        assert!(dir.path().join("crawl.db").exists());
        assert!(dir.path().join("out/stories").is_dir());
        assert!(dir.path().join("out/comments").is_dir());
    }
}
