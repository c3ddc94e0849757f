/// Ledger status definitions for tracking crawl progress
///
/// A ledger entry only ever moves forward: `Scheduled -> Successful`.
/// There is no failure state; an item whose fetch keeps
/// failing simply stays scheduled until a later run succeeds.
use std::fmt;

/// Crawl status of a single identifier in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerStatus {
    /// Identifier is known and waiting to be fetched
    Scheduled,

    /// Identifier was fetched and its payload stored
    Successful,
}

impl LedgerStatus {
    /// Converts the status to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Successful => "successful",
        }
    }

    /// Parses a status from its database string representation
    ///
    /// Returns None if the string doesn't match any known status.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(Self::Scheduled),
            "successful" => Some(Self::Successful),
            _ => None,
        }
    }
}

impl fmt::Display for LedgerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}
