//! Sessions
//!
//! The result of authentication: the user's identity, their permission
//! flags, and a virtual filesystem over a snapshot of their mounts.

use crate::error::VfsError;
use crate::permissions::{self, Operation, Permissions};
use crate::users::User;
use crate::vfs::VirtualFs;

/// An authenticated session.
///
/// Holds the mount table as it was at authentication time; configuration
/// reloads affect only sessions opened afterwards. Immutable and safe to
/// share across threads for the connection's lifetime.
#[derive(Debug)]
pub struct Session {
    username: String,
    permissions: Permissions,
    fs: VirtualFs,
}

impl Session {
    pub(crate) fn new(user: &User) -> Self {
        Session {
            username: user.username().to_string(),
            permissions: *user.permissions(),
            fs: VirtualFs::new(user.mounts().clone()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn permissions(&self) -> &Permissions {
        &self.permissions
    }

    /// The session's filesystem view.
    pub fn fs(&self) -> &VirtualFs {
        &self.fs
    }

    /// Permission gate for `operation` on `virtual_path`; adapters run it
    /// before the corresponding filesystem call.
    pub fn check(&self, operation: Operation, virtual_path: &str) -> Result<(), VfsError> {
        permissions::check(&self.permissions, operation, virtual_path)
    }
}
