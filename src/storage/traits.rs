//! Storage traits and error types
//!
//! The content store and the crawl ledger are separate contracts so that
//! components depend only on what they use; `CrawlStore` joins them and adds
//! the atomic store-and-complete step.

use crate::state::{ItemKind, LedgerStatus};
use crate::storage::{LedgerEntry, RunCounters, RunRecord, StoredItem};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Outcome of storing an item payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// The payload was stored for the first time
    Stored,

    /// An item with this identifier already exists; nothing changed
    AlreadyExists,
}

/// Outcome of scheduling an identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Scheduled,

    /// The identifier already has a ledger entry (scheduled or successful)
    AlreadyScheduled,
}

/// Outcome of marking an identifier successful
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    Marked,
    NotFound,
}

/// Durable, de-duplicated storage of fetched item payloads
pub trait ContentStore {
    /// Stores a payload unless the identifier is already present
    ///
    /// This is the global dedup gate: a second `put` for the same identifier
    /// returns `AlreadyExists` whatever kind it is given.
    fn put(&mut self, identifier: &str, kind: ItemKind, payload: &str)
        -> StorageResult<PutOutcome>;

    /// Returns true if a payload is stored for this identifier
    fn exists(&self, identifier: &str) -> StorageResult<bool>;

    /// Counts stored items of the given kind
    fn count(&self, kind: ItemKind) -> StorageResult<u64>;

    /// Gets a stored item by identifier
    fn get_item(&self, identifier: &str) -> StorageResult<Option<StoredItem>>;
}

/// Durable record of scheduled and completed identifiers
pub trait CrawlLedger {
    /// Schedules an identifier; a no-op if it already has an entry
    fn schedule(&mut self, kind: ItemKind, identifier: &str) -> StorageResult<ScheduleOutcome>;

    /// Advances an entry to successful
    ///
    /// Marking an already successful entry is a no-op `Marked`.
    fn mark_successful(&mut self, identifier: &str) -> StorageResult<MarkOutcome>;

    /// Lists scheduled identifiers of a kind, in scheduling order
    fn list_scheduled(&self, kind: ItemKind) -> StorageResult<Vec<String>>;

    /// Returns true if the identifier has a ledger entry or a stored item
    ///
    /// This is the single de-duplication check used before any identifier is
    /// scheduled or added to a frontier.
    fn is_known(&self, identifier: &str) -> StorageResult<bool>;

    /// Counts ledger entries with the given status
    fn count_by_status(&self, status: LedgerStatus) -> StorageResult<u64>;

    /// Gets the ledger entry for an identifier
    fn get_entry(&self, identifier: &str) -> StorageResult<Option<LedgerEntry>>;
}

/// Outcome of recording a fetched item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Item stored; `scheduled` lists the children newly added to the ledger
    Stored { scheduled: Vec<String> },

    /// Item was already stored; nothing was written
    AlreadyExists,
}

/// Content store and ledger sharing one transactional backend
pub trait CrawlStore: ContentStore + CrawlLedger {
    /// Stores a fetched payload, marks its ledger entry successful and
    /// schedules its child comments
    ///
    /// All writes happen in one transaction, so an item is never successful
    /// while its children are missing from the ledger. A missing ledger
    /// entry for the item itself is created in the same step. Children that
    /// are already known are left alone. If the item already exists nothing
    /// is written.
    fn record_fetched(
        &mut self,
        kind: ItemKind,
        identifier: &str,
        payload: &str,
        children: &[String],
    ) -> StorageResult<RecordOutcome>;
}

/// Bookkeeping of crawl invocations
pub trait RunLog {
    /// Creates a new run in the `running` state and returns its ID
    fn create_run(
        &mut self,
        query: &str,
        days_ago: u32,
        page_count: u32,
        config_hash: &str,
    ) -> StorageResult<i64>;

    /// Marks a run as completed with its final counters
    fn complete_run(&mut self, run_id: i64, counters: &RunCounters) -> StorageResult<()>;

    /// Marks a run as failed with whatever counters it reached
    fn fail_run(&mut self, run_id: i64, counters: &RunCounters) -> StorageResult<()>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;
}
