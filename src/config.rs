//! Configuration management
//!
//! Loads the persisted user/mount record and validates it structurally.
//! Filesystem-dependent checks (root existence, creation) happen when the
//! user store is built, not here.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::permissions::Permissions;

/// The persisted configuration record.
#[derive(Debug, Deserialize, Clone)]
pub struct ConfigFile {
    /// Create mount roots that do not exist yet instead of flagging them.
    /// Environment: VMOUNT_CREATE_MISSING_ROOTS
    #[serde(default)]
    pub create_missing_roots: bool,

    pub users: Vec<UserRecord>,
}

/// One user record.
#[derive(Debug, Deserialize, Clone)]
pub struct UserRecord {
    pub username: String,

    /// Stored digest in `salt$hash` form. Empty locks the account.
    #[serde(default)]
    pub password_hash: String,

    /// Omitted flags default to denied.
    #[serde(default)]
    pub permissions: Permissions,

    /// Ordered mount bindings; the order is preserved in the mount table.
    #[serde(default)]
    pub mounts: Vec<MountRecord>,
}

/// One virtual-name to real-directory binding.
#[derive(Debug, Deserialize, Clone)]
pub struct MountRecord {
    pub name: String,
    pub root: PathBuf,
}

impl ConfigFile {
    /// Loads configuration from `path` with environment overrides.
    pub fn load(path: &str) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("VMOUNT"))
            .build()?;

        let cfg: ConfigFile = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Structural validation of the record.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let mut usernames = HashSet::new();
        for user in &self.users {
            if user.username.trim().is_empty() {
                return Err(config::ConfigError::Message(
                    "username cannot be empty".into(),
                ));
            }
            if !usernames.insert(user.username.as_str()) {
                return Err(config::ConfigError::Message(format!(
                    "duplicate username: {}",
                    user.username
                )));
            }

            let mut names = HashSet::new();
            for mount in &user.mounts {
                if !is_valid_mount_name(&mount.name) {
                    return Err(config::ConfigError::Message(format!(
                        "invalid mount name '{}' for user '{}'",
                        mount.name, user.username
                    )));
                }
                if !names.insert(mount.name.as_str()) {
                    return Err(config::ConfigError::Message(format!(
                        "duplicate mount name '{}' for user '{}'",
                        mount.name, user.username
                    )));
                }
                if !mount.root.is_absolute() {
                    return Err(config::ConfigError::Message(format!(
                        "mount root {} for user '{}' must be absolute",
                        mount.root.display(),
                        user.username
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Mount names live directly under the virtual root, so they must be a
/// single, non-dot path segment.
fn is_valid_mount_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains('/') && !name.contains('\\')
}
