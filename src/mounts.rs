//! Mount tables
//!
//! A mount binds a virtual name at the namespace root to a real directory.
//! Each user carries their own ordered table, built whole from the
//! configuration record; there is no runtime mutation API. Changes to a
//! user's mounts take effect for sessions opened after a reload.

use std::path::PathBuf;

/// A single virtual-name to real-directory binding.
#[derive(Debug, Clone)]
pub struct MountEntry {
    /// Virtual name, a single path segment directly under the root.
    pub name: String,
    /// Real directory backing the mount. Must be absolute.
    pub root: PathBuf,
    /// Set at load time when the root was missing. The entry stays visible
    /// so operators can see the misconfiguration; resolution re-checks the
    /// disk on every call.
    pub unusable: bool,
}

impl MountEntry {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        MountEntry {
            name: name.into(),
            root: root.into(),
            unusable: false,
        }
    }
}

/// An ordered set of mounts for one user.
///
/// Order follows the configuration record and is preserved through
/// listings before sorting. Names are unique and matched case-sensitively.
#[derive(Debug, Clone, Default)]
pub struct MountTable {
    entries: Vec<MountEntry>,
}

impl MountTable {
    /// Builds a table, rejecting duplicate virtual names.
    pub fn new(entries: Vec<MountEntry>) -> Result<Self, String> {
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.name == entry.name) {
                return Err(format!("duplicate mount name: {}", entry.name));
            }
        }
        Ok(MountTable { entries })
    }

    /// Looks up a mount by its virtual name. Case-sensitive.
    pub fn find(&self, name: &str) -> Option<&MountEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn entries(&self) -> &[MountEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
