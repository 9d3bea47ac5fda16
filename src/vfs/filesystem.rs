//! Virtual filesystem operations
//!
//! `VirtualFs` executes the filesystem contract over one user's mount
//! table: listing, metadata, reads, writes, and the mutating operations.
//! Every call resolves afresh against the real filesystem; nothing is
//! cached between calls.

use crate::error::VfsError;
use crate::mounts::MountTable;
use crate::vfs::entry::{Entry, EntryKind};
use crate::vfs::path;
use crate::vfs::resolve::{Resolved, ResolvedPath, resolve};
use log::{info, warn};
use std::fs::{self, File, OpenOptions};
use std::path::Path;

/// One user's view of the filesystem.
///
/// Holds the mount table snapshot taken when the session was opened;
/// reloading the configuration never changes a live `VirtualFs`.
#[derive(Debug, Clone)]
pub struct VirtualFs {
    mounts: MountTable,
}

impl VirtualFs {
    pub fn new(mounts: MountTable) -> Self {
        VirtualFs { mounts }
    }

    pub fn mounts(&self) -> &MountTable {
        &self.mounts
    }

    /// Resolves a virtual path without touching the target itself.
    pub fn resolve(&self, virtual_path: &str) -> Result<Resolved<'_>, VfsError> {
        resolve(&self.mounts, virtual_path)
    }

    /// Lists a directory. The synthetic root lists the mount names.
    ///
    /// Entries are sorted byte-wise ascending by name, independent of the
    /// mount registration order.
    pub fn list(&self, virtual_path: &str) -> Result<Vec<Entry>, VfsError> {
        let mut entries = match self.resolve(virtual_path)? {
            Resolved::Root => self.list_root(),
            Resolved::Path(resolved) => list_real(&resolved, virtual_path)?,
        };
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        info!("Listed {} ({} entries)", virtual_path, entries.len());
        Ok(entries)
    }

    fn list_root(&self) -> Vec<Entry> {
        self.mounts
            .entries()
            .iter()
            .map(|mount| Entry {
                name: mount.name.clone(),
                kind: EntryKind::Directory,
                size: 0,
                modified: fs::metadata(&mount.root)
                    .ok()
                    .and_then(|m| m.modified().ok()),
            })
            .collect()
    }

    /// Single-entry metadata. The synthetic root reports itself as a
    /// directory.
    pub fn metadata(&self, virtual_path: &str) -> Result<Entry, VfsError> {
        match self.resolve(virtual_path)? {
            Resolved::Root => Ok(Entry {
                name: "/".to_string(),
                kind: EntryKind::Directory,
                size: 0,
                modified: None,
            }),
            Resolved::Path(resolved) => {
                let metadata =
                    fs::metadata(&resolved.real).map_err(|e| VfsError::io(virtual_path, e))?;
                Ok(Entry::from_metadata(resolved.name(), &metadata))
            }
        }
    }

    /// Existence probe; adapters use it to pick upload versus overwrite.
    ///
    /// Does not follow a final symlink: a dangling link still exists as a
    /// directory entry.
    pub fn exists(&self, virtual_path: &str) -> Result<bool, VfsError> {
        match self.resolve(virtual_path)? {
            Resolved::Root => Ok(true),
            Resolved::Path(resolved) => Ok(resolved.real.symlink_metadata().is_ok()),
        }
    }

    /// Opens a file for reading.
    pub fn open_for_read(&self, virtual_path: &str) -> Result<File, VfsError> {
        let resolved = self.expect_mount_path(virtual_path, "open")?;
        let metadata = fs::metadata(&resolved.real).map_err(|e| VfsError::io(virtual_path, e))?;
        if metadata.is_dir() {
            return Err(VfsError::Forbidden(format!(
                "{}: is a directory",
                resolved.virtual_path
            )));
        }
        let file = File::open(&resolved.real).map_err(|e| VfsError::io(virtual_path, e))?;
        info!(
            "Opened {} for read (real: {})",
            resolved.virtual_path,
            resolved.real.display()
        );
        Ok(file)
    }

    /// Opens a file for writing, creating or truncating it.
    ///
    /// Whether this counts as an upload or an overwrite is the caller's
    /// permission concern; see [`exists`](Self::exists).
    pub fn open_for_write(&self, virtual_path: &str) -> Result<File, VfsError> {
        let resolved = self.expect_mount_path(virtual_path, "write to")?;
        if resolved.is_mount_root() {
            return Err(VfsError::Forbidden(format!(
                "{}: is a mount point",
                resolved.virtual_path
            )));
        }
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&resolved.real)
            .map_err(|e| VfsError::io(virtual_path, e))?;
        info!(
            "Opened {} for write (real: {})",
            resolved.virtual_path,
            resolved.real.display()
        );
        Ok(file)
    }

    /// Creates a directory. The parent must already exist.
    pub fn create_directory(&self, virtual_path: &str) -> Result<(), VfsError> {
        let resolved = self.expect_mount_path(virtual_path, "create")?;
        fs::create_dir(&resolved.real).map_err(|e| VfsError::io(virtual_path, e))?;
        info!(
            "Created directory {} (real: {})",
            resolved.virtual_path,
            resolved.real.display()
        );
        Ok(())
    }

    /// Removes an empty directory. Mount roots cannot be removed.
    pub fn remove_directory(&self, virtual_path: &str) -> Result<(), VfsError> {
        let resolved = self.expect_mount_path(virtual_path, "remove")?;
        if resolved.is_mount_root() {
            warn!("Refused to remove mount point {}", resolved.virtual_path);
            return Err(VfsError::Forbidden(format!(
                "{}: is a mount point",
                resolved.virtual_path
            )));
        }
        fs::remove_dir(&resolved.real).map_err(|e| VfsError::io(virtual_path, e))?;
        info!(
            "Removed directory {} (real: {})",
            resolved.virtual_path,
            resolved.real.display()
        );
        Ok(())
    }

    /// Deletes a file.
    pub fn delete_file(&self, virtual_path: &str) -> Result<(), VfsError> {
        let resolved = self.expect_mount_path(virtual_path, "delete")?;
        if resolved.is_mount_root() {
            return Err(VfsError::Forbidden(format!(
                "{}: is a mount point",
                resolved.virtual_path
            )));
        }
        fs::remove_file(&resolved.real).map_err(|e| VfsError::io(virtual_path, e))?;
        info!(
            "Deleted {} (real: {})",
            resolved.virtual_path,
            resolved.real.display()
        );
        Ok(())
    }

    /// Renames within a single mount.
    ///
    /// Both endpoints must resolve inside the same mount, and mount roots
    /// can be neither moved nor replaced.
    pub fn rename(&self, from: &str, to: &str) -> Result<(), VfsError> {
        let source = self.expect_mount_path(from, "rename")?;
        let target = self.expect_mount_path(to, "rename to")?;

        if source.mount.name != target.mount.name {
            warn!(
                "Refused cross-mount rename {} -> {}",
                source.virtual_path, target.virtual_path
            );
            return Err(VfsError::Forbidden(format!(
                "{} -> {}: cannot rename across mounts",
                source.virtual_path, target.virtual_path
            )));
        }
        if source.is_mount_root() {
            return Err(VfsError::Forbidden(format!(
                "{}: is a mount point",
                source.virtual_path
            )));
        }
        if target.is_mount_root() {
            return Err(VfsError::Forbidden(format!(
                "{}: is a mount point",
                target.virtual_path
            )));
        }

        fs::rename(&source.real, &target.real).map_err(|e| VfsError::io(from, e))?;
        info!(
            "Renamed {} -> {} (real: {} -> {})",
            source.virtual_path,
            target.virtual_path,
            source.real.display(),
            target.real.display()
        );
        Ok(())
    }

    /// Maps a real path produced by resolution back to its virtual form.
    ///
    /// Returns `None` for paths outside every mount and for paths with
    /// non-UTF-8 components.
    pub fn to_virtual(&self, real: &Path) -> Option<String> {
        for mount in self.mounts.entries() {
            let Ok(root) = mount.root.canonicalize() else {
                continue;
            };
            if let Ok(rel) = real.strip_prefix(&root) {
                let segments = path::real_to_segments(rel)?;
                return Some(path::join(&mount.name, &segments));
            }
        }
        None
    }

    fn expect_mount_path(
        &self,
        virtual_path: &str,
        action: &str,
    ) -> Result<ResolvedPath<'_>, VfsError> {
        match self.resolve(virtual_path)? {
            Resolved::Root => Err(VfsError::Forbidden(format!(
                "cannot {} the virtual root",
                action
            ))),
            Resolved::Path(resolved) => Ok(resolved),
        }
    }
}

fn list_real(resolved: &ResolvedPath<'_>, virtual_path: &str) -> Result<Vec<Entry>, VfsError> {
    let dir = fs::read_dir(&resolved.real).map_err(|e| VfsError::io(virtual_path, e))?;
    let mut entries = Vec::new();
    for child in dir {
        let child = child.map_err(|e| VfsError::io(virtual_path, e))?;
        let name = child.file_name().to_string_lossy().into_owned();
        match child.metadata() {
            Ok(metadata) => entries.push(Entry::from_metadata(name, &metadata)),
            Err(e) => {
                warn!("Could not stat {}/{}: {}", resolved.virtual_path, name, e);
                entries.push(Entry::opaque(name));
            }
        }
    }
    Ok(entries)
}
