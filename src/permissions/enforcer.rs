//! Permission enforcement
//!
//! The pure gate consulted before every filesystem operation. `check` never
//! touches the disk; callers run it before resolving or mutating anything.

use crate::error::VfsError;
use crate::permissions::Permissions;
use crate::vfs::path;
use std::fmt;

/// Filesystem operations subject to permission checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Directory listings and read-only navigation.
    List,
    Download,
    /// Write to a path that does not exist yet.
    Upload,
    /// Write to an existing path. Requires both `upload` and `overwrite`.
    Overwrite,
    Delete,
    Rename,
    CreateDir,
    RemoveDir,
}

impl Operation {
    /// True for operations that change the filesystem.
    pub fn is_mutation(self) -> bool {
        !matches!(self, Operation::List | Operation::Download)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::List => "list",
            Operation::Download => "download",
            Operation::Upload => "upload",
            Operation::Overwrite => "overwrite",
            Operation::Delete => "delete",
            Operation::Rename => "rename",
            Operation::CreateDir => "create directory",
            Operation::RemoveDir => "remove directory",
        };
        write!(f, "{}", label)
    }
}

/// Checks whether `permissions` allow `operation` on `virtual_path`.
///
/// Pure with respect to the filesystem: the same arguments always produce
/// the same result. Mutations of the synthetic root are denied regardless
/// of the granted flags.
pub fn check(
    permissions: &Permissions,
    operation: Operation,
    virtual_path: &str,
) -> Result<(), VfsError> {
    if operation.is_mutation() && path::is_root(virtual_path) {
        return Err(VfsError::Forbidden(format!(
            "{}: cannot modify the virtual root",
            virtual_path
        )));
    }

    let allowed = match operation {
        Operation::List => permissions.list,
        Operation::Download => permissions.download,
        Operation::Upload => permissions.upload,
        Operation::Overwrite => permissions.upload && permissions.overwrite,
        Operation::Delete => permissions.delete,
        Operation::Rename => permissions.rename,
        Operation::CreateDir => permissions.create_dir,
        Operation::RemoveDir => permissions.remove_dir,
    };

    if allowed {
        Ok(())
    } else {
        Err(VfsError::Forbidden(format!(
            "{} permission required for {}",
            operation, virtual_path
        )))
    }
}
