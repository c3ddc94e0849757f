//! Test helpers for the storage traits

use crate::state::{ItemKind, LedgerStatus};
use crate::storage::{
    ContentStore, CrawlLedger, CrawlStore, LedgerEntry, MarkOutcome, PutOutcome, RecordOutcome,
    ScheduleOutcome, SqliteStorage, StorageError, StorageResult, StoredItem,
};

/// Store that fails every call once one fetched item has been committed
///
/// Stands in for a process that stops right after a commit; the inner
/// storage then holds exactly what a restarted crawl would find.
pub(crate) struct HaltAfterRecord {
    pub(crate) inner: SqliteStorage,
    halted: bool,
}

impl HaltAfterRecord {
    pub(crate) fn new(inner: SqliteStorage) -> Self {
        Self {
            inner,
            halted: false,
        }
    }

    fn check(&self) -> StorageResult<()> {
        if self.halted {
            return Err(StorageError::InvalidRecord("storage halted".to_string()));
        }
        Ok(())
    }
}

impl ContentStore for HaltAfterRecord {
    fn put(
        &mut self,
        identifier: &str,
        kind: ItemKind,
        payload: &str,
    ) -> StorageResult<PutOutcome> {
        self.check()?;
        self.inner.put(identifier, kind, payload)
    }

    fn exists(&self, identifier: &str) -> StorageResult<bool> {
        self.check()?;
        self.inner.exists(identifier)
    }

    fn count(&self, kind: ItemKind) -> StorageResult<u64> {
        self.check()?;
        self.inner.count(kind)
    }

    fn get_item(&self, identifier: &str) -> StorageResult<Option<StoredItem>> {
        self.check()?;
        self.inner.get_item(identifier)
    }
}

impl CrawlLedger for HaltAfterRecord {
    fn schedule(&mut self, kind: ItemKind, identifier: &str) -> StorageResult<ScheduleOutcome> {
        self.check()?;
        self.inner.schedule(kind, identifier)
    }

    fn mark_successful(&mut self, identifier: &str) -> StorageResult<MarkOutcome> {
        self.check()?;
        self.inner.mark_successful(identifier)
    }

    fn list_scheduled(&self, kind: ItemKind) -> StorageResult<Vec<String>> {
        self.check()?;
        self.inner.list_scheduled(kind)
    }

    fn is_known(&self, identifier: &str) -> StorageResult<bool> {
        self.check()?;
        self.inner.is_known(identifier)
    }

    fn count_by_status(&self, status: LedgerStatus) -> StorageResult<u64> {
        self.check()?;
        self.inner.count_by_status(status)
    }

    fn get_entry(&self, identifier: &str) -> StorageResult<Option<LedgerEntry>> {
        self.check()?;
        self.inner.get_entry(identifier)
    }
}

impl CrawlStore for HaltAfterRecord {
    fn record_fetched(
        &mut self,
        kind: ItemKind,
        identifier: &str,
        payload: &str,
        children: &[String],
    ) -> StorageResult<RecordOutcome> {
        self.check()?;
        let outcome = self
            .inner
            .record_fetched(kind, identifier, payload, children)?;
        self.halted = true;
        Ok(outcome)
    }
}
