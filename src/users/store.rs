//! User store
//!
//! The process-wide user table, built from the configuration record and
//! replaced atomically on reload.

use crate::auth::PasswordDigest;
use crate::config::ConfigFile;
use crate::mounts::{MountEntry, MountTable};
use crate::users::account::User;
use config::ConfigError;
use log::{error, info, warn};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::sync::Arc;

/// All configured users, keyed by username.
#[derive(Debug, Default)]
pub struct UserStore {
    users: HashMap<String, User>,
}

/// Shared handle to the store: sessions read through it at login, the
/// reloader replaces the whole table under the write lock.
pub type SharedUserStore = Arc<RwLock<UserStore>>;

impl UserStore {
    /// Builds the store from a configuration record.
    ///
    /// Mounts whose roots are missing are flagged unusable and kept, so a
    /// typo never silently hides a share. With `create_missing_roots` set,
    /// missing roots are created instead.
    pub fn from_config(cfg: &ConfigFile) -> Result<Self, ConfigError> {
        let mut users = HashMap::with_capacity(cfg.users.len());
        for record in &cfg.users {
            let digest = match record.password_hash.as_str() {
                "" => {
                    warn!(
                        "User '{}' has no password hash; account is locked",
                        record.username
                    );
                    None
                }
                stored => match PasswordDigest::parse(stored) {
                    Ok(digest) => Some(digest),
                    Err(e) => {
                        warn!(
                            "User '{}' has an unusable password hash ({}); account is locked",
                            record.username, e
                        );
                        None
                    }
                },
            };

            let mut entries = Vec::with_capacity(record.mounts.len());
            for mount in &record.mounts {
                let mut entry = MountEntry::new(mount.name.clone(), mount.root.clone());
                if !entry.root.is_dir() {
                    if cfg.create_missing_roots {
                        match fs::create_dir_all(&entry.root) {
                            Ok(()) => info!(
                                "Created mount root {} for user '{}'",
                                entry.root.display(),
                                record.username
                            ),
                            Err(e) => {
                                error!(
                                    "Failed to create mount root {} for user '{}': {}",
                                    entry.root.display(),
                                    record.username,
                                    e
                                );
                                entry.unusable = true;
                            }
                        }
                    } else {
                        warn!(
                            "Mount '{}' for user '{}' has a missing root {}",
                            entry.name,
                            record.username,
                            entry.root.display()
                        );
                        entry.unusable = true;
                    }
                }
                entries.push(entry);
            }

            let mounts = MountTable::new(entries)
                .map_err(|e| ConfigError::Message(format!("user '{}': {}", record.username, e)))?;

            let user = User::new(record.username.clone(), digest, record.permissions, mounts);
            if users.insert(record.username.clone(), user).is_some() {
                return Err(ConfigError::Message(format!(
                    "duplicate username: {}",
                    record.username
                )));
            }
        }
        info!("User store built ({} users)", users.len());
        Ok(UserStore { users })
    }

    /// Loads and validates the configuration at `path`, then builds the
    /// store from it.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let cfg = ConfigFile::load(path)?;
        Self::from_config(&cfg)
    }

    /// Looks up a user by exact username.
    pub fn user(&self, username: &str) -> Option<&User> {
        self.users.get(username)
    }

    /// Iterates all users in unspecified order.
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Wraps the store for sharing between sessions and the reloader.
    pub fn into_shared(self) -> SharedUserStore {
        Arc::new(RwLock::new(self))
    }
}

/// Reloads the configuration at `path` into `shared`.
///
/// The replacement store is built and validated entirely outside the lock,
/// then swapped in whole: no reader ever observes a half-updated table,
/// and on any error the previous store stays in place. Sessions opened
/// before the swap keep their mount snapshots.
pub fn reload(shared: &SharedUserStore, path: &str) -> Result<(), ConfigError> {
    let store = UserStore::load(path)?;
    let count = store.len();
    *shared.write() = store;
    info!("Reloaded user store from {} ({} users)", path, count);
    Ok(())
}
