//! Listing entries
//!
//! Directory entries as reported to protocol adapters.

use std::fs::Metadata;
use std::time::SystemTime;

/// Kind of a listed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Symlinks, sockets, and anything else that is neither.
    Other,
}

/// One entry in a directory listing, or the result of a metadata query.
#[derive(Debug, Clone)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
    /// Byte size for files; directories report 0.
    pub size: u64,
    pub modified: Option<SystemTime>,
}

impl Entry {
    /// Builds an entry from real filesystem metadata.
    pub fn from_metadata(name: impl Into<String>, metadata: &Metadata) -> Self {
        let kind = if metadata.is_dir() {
            EntryKind::Directory
        } else if metadata.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };
        Entry {
            name: name.into(),
            kind,
            size: if metadata.is_dir() { 0 } else { metadata.len() },
            modified: metadata.modified().ok(),
        }
    }

    /// Fallback entry for children whose metadata could not be read.
    pub(crate) fn opaque(name: impl Into<String>) -> Self {
        Entry {
            name: name.into(),
            kind: EntryKind::Other,
            size: 0,
            modified: None,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}
