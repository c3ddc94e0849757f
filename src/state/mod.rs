//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `ItemKind`: story or comment, plus identifier normalization helpers
//! - `LedgerStatus`: the monotonic scheduled -> successful status of a ledger entry

mod item_kind;
mod ledger_status;

// Re-export main types
pub use item_kind::{child_identifiers, identifier_from_value, ItemKind};
pub use ledger_status::LedgerStatus;
