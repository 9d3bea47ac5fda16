//! User accounts
//!
//! The configured identity: stored digest, permission flags, and the
//! user's mount table.

use crate::auth::PasswordDigest;
use crate::mounts::MountTable;
use crate::permissions::Permissions;

/// One configured user.
#[derive(Debug, Clone)]
pub struct User {
    username: String,
    digest: Option<PasswordDigest>,
    permissions: Permissions,
    mounts: MountTable,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        digest: Option<PasswordDigest>,
        permissions: Permissions,
        mounts: MountTable,
    ) -> Self {
        User {
            username: username.into(),
            digest,
            permissions,
            mounts,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn permissions(&self) -> &Permissions {
        &self.permissions
    }

    pub fn mounts(&self) -> &MountTable {
        &self.mounts
    }

    /// Locked accounts have no usable digest and never authenticate.
    /// Records with an empty or malformed stored hash land here.
    pub fn is_locked(&self) -> bool {
        self.digest.is_none()
    }

    pub(crate) fn digest(&self) -> Option<&PasswordDigest> {
        self.digest.as_ref()
    }
}
