//! Item kinds and identifier handling
//!
//! Stories and comments share one identifier space upstream. The search API
//! returns identifiers as strings (`objectID`) while the item API returns
//! them as integers (`kids`), so both are normalized to a string here.

use serde_json::Value;
use std::fmt;

/// The kind of an upstream item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Story,
    Comment,
}

impl ItemKind {
    /// Database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Story => "story",
            Self::Comment => "comment",
        }
    }

    /// Parses a kind from its database string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "story" => Some(Self::Story),
            "comment" => Some(Self::Comment),
            _ => None,
        }
    }

    /// Name of the artifact directory holding exports of this kind
    pub fn artifact_dir_name(&self) -> &'static str {
        match self {
            Self::Story => "stories",
            Self::Comment => "comments",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// Normalizes a JSON identifier value into its string form
///
/// Strings are taken as-is (if non-empty), integers are rendered in decimal.
/// Anything else yields `None`.
pub fn identifier_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) if n.is_u64() || n.is_i64() => Some(n.to_string()),
        _ => None,
    }
}

/// Extracts the child identifiers listed under `field` in an item payload
///
/// A missing field, a `null` payload, or a non-array field all yield an empty
/// list. Entries that are not usable identifiers are dropped.
pub fn child_identifiers(payload: &Value, field: &str) -> Vec<String> {
    payload
        .get(field)
        .and_then(Value::as_array)
        .map(|children| children.iter().filter_map(identifier_from_value).collect())
        .unwrap_or_default()
}
