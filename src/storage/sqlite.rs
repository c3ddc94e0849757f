//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the content store,
//! crawl ledger and run log.

use crate::state::{ItemKind, LedgerStatus};
use crate::storage::artifacts::ArtifactExporter;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{
    ContentStore, CrawlLedger, CrawlStore, MarkOutcome, PutOutcome, RecordOutcome, RunLog,
    ScheduleOutcome, StorageError, StorageResult,
};
use crate::storage::{LedgerEntry, RunCounters, RunRecord, RunStatus, StoredItem};
use crate::CrawlError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
    artifacts: Option<ArtifactExporter>,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(CrawlError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, CrawlError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn,
            artifacts: None,
        })
    }

    /// Creates an in-memory database without artifact exports
    pub fn new_in_memory() -> Result<Self, CrawlError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn,
            artifacts: None,
        })
    }

    /// Enables per-item exports for every newly stored item
    pub fn with_artifacts(mut self, exporter: ArtifactExporter) -> Self {
        self.artifacts = Some(exporter);
        self
    }

    /// Writes the export file for a newly stored item
    ///
    /// Export failures are logged and swallowed: the database row is already
    /// committed and remains authoritative.
    fn export_artifact(&self, kind: ItemKind, identifier: &str, payload: &str) {
        if let Some(exporter) = &self.artifacts {
            match exporter.export(kind, identifier, payload) {
                Ok(path) => tracing::trace!("Exported {} {} to {}", kind, identifier, path.display()),
                Err(e) => tracing::warn!("Failed to export {} {}: {}", kind, identifier, e),
            }
        }
    }

    fn count_query(&self, sql: &str, param: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(sql, params![param], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn parse_kind(s: &str) -> StorageResult<ItemKind> {
    ItemKind::from_db_string(s)
        .ok_or_else(|| StorageError::InvalidRecord(format!("unknown item kind '{}'", s)))
}

fn parse_status(s: &str) -> StorageResult<LedgerStatus> {
    LedgerStatus::from_db_string(s)
        .ok_or_else(|| StorageError::InvalidRecord(format!("unknown ledger status '{}'", s)))
}

impl ContentStore for SqliteStorage {
    fn put(
        &mut self,
        identifier: &str,
        kind: ItemKind,
        payload: &str,
    ) -> StorageResult<PutOutcome> {
        let now = Utc::now().to_rfc3339();
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO items (kind, identifier, content, stored_at) VALUES (?1, ?2, ?3, ?4)",
            params![kind.to_db_string(), identifier, payload, now],
        )?;

        if inserted == 0 {
            return Ok(PutOutcome::AlreadyExists);
        }

        self.export_artifact(kind, identifier, payload);
        Ok(PutOutcome::Stored)
    }

    fn exists(&self, identifier: &str) -> StorageResult<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM items WHERE identifier = ?1)",
            params![identifier],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn count(&self, kind: ItemKind) -> StorageResult<u64> {
        self.count_query(
            "SELECT COUNT(*) FROM items WHERE kind = ?1",
            kind.to_db_string(),
        )
    }

    fn get_item(&self, identifier: &str) -> StorageResult<Option<StoredItem>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, kind, identifier, content, stored_at FROM items WHERE identifier = ?1",
                params![identifier],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(id, kind, identifier, content, stored_at)| {
            Ok(StoredItem {
                id,
                kind: parse_kind(&kind)?,
                identifier,
                content,
                stored_at,
            })
        })
        .transpose()
    }
}

impl CrawlLedger for SqliteStorage {
    fn schedule(&mut self, kind: ItemKind, identifier: &str) -> StorageResult<ScheduleOutcome> {
        let now = Utc::now().to_rfc3339();
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO crawl_ledger (kind, identifier, status, scheduled_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                kind.to_db_string(),
                identifier,
                LedgerStatus::Scheduled.to_db_string(),
                now
            ],
        )?;

        Ok(if inserted == 0 {
            ScheduleOutcome::AlreadyScheduled
        } else {
            ScheduleOutcome::Scheduled
        })
    }

    fn mark_successful(&mut self, identifier: &str) -> StorageResult<MarkOutcome> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE crawl_ledger SET status = ?1, completed_at = COALESCE(completed_at, ?2)
             WHERE identifier = ?3",
            params![LedgerStatus::Successful.to_db_string(), now, identifier],
        )?;

        Ok(if updated == 0 {
            MarkOutcome::NotFound
        } else {
            MarkOutcome::Marked
        })
    }

    fn list_scheduled(&self, kind: ItemKind) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT identifier FROM crawl_ledger WHERE kind = ?1 AND status = ?2 ORDER BY id ASC",
        )?;

        let identifiers = stmt
            .query_map(
                params![
                    kind.to_db_string(),
                    LedgerStatus::Scheduled.to_db_string()
                ],
                |row| row.get(0),
            )?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(identifiers)
    }

    fn is_known(&self, identifier: &str) -> StorageResult<bool> {
        let known: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM crawl_ledger WHERE identifier = ?1)
                 OR EXISTS(SELECT 1 FROM items WHERE identifier = ?1)",
            params![identifier],
            |row| row.get(0),
        )?;
        Ok(known)
    }

    fn count_by_status(&self, status: LedgerStatus) -> StorageResult<u64> {
        self.count_query(
            "SELECT COUNT(*) FROM crawl_ledger WHERE status = ?1",
            status.to_db_string(),
        )
    }

    fn get_entry(&self, identifier: &str) -> StorageResult<Option<LedgerEntry>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, kind, identifier, status, scheduled_at, completed_at
                 FROM crawl_ledger WHERE identifier = ?1",
                params![identifier],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, Option<String>>(5)?,
                    ))
                },
            )
            .optional()?;

        row.map(
            |(id, kind, identifier, status, scheduled_at, completed_at)| {
                Ok(LedgerEntry {
                    id,
                    kind: parse_kind(&kind)?,
                    identifier,
                    status: parse_status(&status)?,
                    scheduled_at,
                    completed_at,
                })
            },
        )
        .transpose()
    }
}

impl CrawlStore for SqliteStorage {
    fn record_fetched(
        &mut self,
        kind: ItemKind,
        identifier: &str,
        payload: &str,
        children: &[String],
    ) -> StorageResult<RecordOutcome> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        let inserted = tx.execute(
            "INSERT OR IGNORE INTO items (kind, identifier, content, stored_at) VALUES (?1, ?2, ?3, ?4)",
            params![kind.to_db_string(), identifier, payload, now],
        )?;

        if inserted == 0 {
            // Dropping the transaction rolls it back; nothing was written.
            return Ok(RecordOutcome::AlreadyExists);
        }

        tx.execute(
            "INSERT OR IGNORE INTO crawl_ledger (kind, identifier, status, scheduled_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                kind.to_db_string(),
                identifier,
                LedgerStatus::Scheduled.to_db_string(),
                now
            ],
        )?;
        tx.execute(
            "UPDATE crawl_ledger SET status = ?1, completed_at = COALESCE(completed_at, ?2)
             WHERE identifier = ?3",
            params![LedgerStatus::Successful.to_db_string(), now, identifier],
        )?;

        let mut scheduled = Vec::new();
        {
            let mut schedule_child = tx.prepare(
                "INSERT OR IGNORE INTO crawl_ledger (kind, identifier, status, scheduled_at)
                 SELECT ?1, ?2, ?3, ?4
                 WHERE NOT EXISTS (SELECT 1 FROM items WHERE identifier = ?2)",
            )?;
            for child in children {
                let inserted = schedule_child.execute(params![
                    ItemKind::Comment.to_db_string(),
                    child,
                    LedgerStatus::Scheduled.to_db_string(),
                    now
                ])?;
                if inserted > 0 {
                    scheduled.push(child.clone());
                }
            }
        }

        tx.commit()?;

        self.export_artifact(kind, identifier, payload);
        Ok(RecordOutcome::Stored { scheduled })
    }
}

impl RunLog for SqliteStorage {
    fn create_run(
        &mut self,
        query: &str,
        days_ago: u32,
        page_count: u32,
        config_hash: &str,
    ) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, query, days_ago, page_count, config_hash, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                now,
                query,
                days_ago,
                page_count,
                config_hash,
                RunStatus::Running.to_db_string()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn complete_run(&mut self, run_id: i64, counters: &RunCounters) -> StorageResult<()> {
        finish_run(&self.conn, run_id, RunStatus::Completed, counters)
    }

    fn fail_run(&mut self, run_id: i64, counters: &RunCounters) -> StorageResult<()> {
        finish_run(&self.conn, run_id, RunStatus::Failed, counters)
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                &format!("{} WHERE id = ?1", RUN_SELECT),
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                &format!("{} ORDER BY id DESC LIMIT 1", RUN_SELECT),
                [],
                run_from_row,
            )
            .optional()?;
        Ok(run)
    }
}

const RUN_SELECT: &str = "SELECT id, started_at, finished_at, query, days_ago, page_count,
    config_hash, status, stories_stored, comments_stored, pages_failed, fetch_failures FROM runs";

fn run_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        query: row.get(3)?,
        days_ago: row.get(4)?,
        page_count: row.get(5)?,
        config_hash: row.get(6)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(7)?)
            .unwrap_or(RunStatus::Failed),
        counters: RunCounters {
            stories_stored: row.get::<_, i64>(8)? as u64,
            comments_stored: row.get::<_, i64>(9)? as u64,
            pages_failed: row.get::<_, i64>(10)? as u64,
            fetch_failures: row.get::<_, i64>(11)? as u64,
        },
    })
}

fn finish_run(
    conn: &Connection,
    run_id: i64,
    status: RunStatus,
    counters: &RunCounters,
) -> StorageResult<()> {
    let now = Utc::now().to_rfc3339();
    let updated = conn.execute(
        "UPDATE runs SET status = ?1, finished_at = ?2, stories_stored = ?3,
         comments_stored = ?4, pages_failed = ?5, fetch_failures = ?6 WHERE id = ?7",
        params![
            status.to_db_string(),
            now,
            counters.stories_stored as i64,
            counters.comments_stored as i64,
            counters.pages_failed as i64,
            counters.fetch_failures as i64,
            run_id
        ],
    )?;

    if updated == 0 {
        return Err(StorageError::RunNotFound(run_id));
    }
    Ok(())
}
