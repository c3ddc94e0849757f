//! Per-item JSON exports
//!
//! Every newly stored item is also written to
//! `<root>/stories/<id>.json` or `<root>/comments/<id>.json` for ad-hoc
//! inspection. The database stays the source of truth; the files are a
//! one-way export.

use crate::state::ItemKind;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Writes item payloads into per-kind directories
#[derive(Debug, Clone)]
pub struct ArtifactExporter {
    root: PathBuf,
}

impl ArtifactExporter {
    /// Creates the exporter, creating `stories/` and `comments/` under `root`
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        for kind in [ItemKind::Story, ItemKind::Comment] {
            fs::create_dir_all(root.join(kind.artifact_dir_name()))?;
        }
        Ok(Self { root })
    }

    /// Path of the export file for an item
    pub fn path_for(&self, kind: ItemKind, identifier: &str) -> PathBuf {
        self.root
            .join(kind.artifact_dir_name())
            .join(format!("{}.json", file_stem(identifier)))
    }

    /// Writes the payload of an item, replacing any previous export
    pub fn export(&self, kind: ItemKind, identifier: &str, payload: &str) -> io::Result<PathBuf> {
        let path = self.path_for(kind, identifier);
        fs::write(&path, payload)?;
        Ok(path)
    }
}

/// Maps an identifier to a file stem that stays inside its directory
///
/// Bytes outside `[A-Za-z0-9_-]` are written as `%XX`, so distinct
/// identifiers always get distinct files.
fn file_stem(identifier: &str) -> String {
    if identifier.is_empty() {
        return "%".to_string();
    }

    let mut stem = String::with_capacity(identifier.len());
    for byte in identifier.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("%{:02X}", byte));
        }
    }
    stem
}
