//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the crawl database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track crawl invocations
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    query TEXT NOT NULL,
    days_ago INTEGER NOT NULL,
    page_count INTEGER NOT NULL,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL,
    stories_stored INTEGER NOT NULL DEFAULT 0,
    comments_stored INTEGER NOT NULL DEFAULT 0,
    pages_failed INTEGER NOT NULL DEFAULT 0,
    fetch_failures INTEGER NOT NULL DEFAULT 0
);

-- Stored item payloads, at most one per identifier regardless of kind
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    kind TEXT NOT NULL,
    identifier TEXT NOT NULL UNIQUE,
    content TEXT NOT NULL,
    stored_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_items_kind ON items(kind);

-- Crawl ledger: one entry per scheduled or completed identifier
CREATE TABLE IF NOT EXISTS crawl_ledger (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    kind TEXT NOT NULL,
    identifier TEXT NOT NULL UNIQUE,
    status TEXT NOT NULL CHECK (status IN ('scheduled', 'successful')),
    scheduled_at TEXT NOT NULL,
    completed_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_crawl_ledger_kind_status ON crawl_ledger(kind, status);

-- A successful entry never goes back to scheduled
CREATE TRIGGER IF NOT EXISTS crawl_ledger_status_monotonic
BEFORE UPDATE OF status ON crawl_ledger
WHEN OLD.status = 'successful' AND NEW.status <> 'successful'
BEGIN
    SELECT RAISE(ABORT, 'ledger status cannot move back from successful');
END;
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
