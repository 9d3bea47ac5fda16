//! Authentication
//!
//! Validates credentials against the user store and opens sessions.

use crate::auth::digest::{self, PasswordDigest};
use crate::error::VfsError;
use crate::session::Session;
use crate::users::UserStore;
use log::{info, warn};
use std::sync::LazyLock;

/// Digest used when no stored digest is available, so unknown usernames
/// and locked accounts burn the same hashing work as real ones.
static PLACEHOLDER: LazyLock<PasswordDigest> = LazyLock::new(digest::placeholder);

/// Authenticates `username` with `password` and opens a session.
///
/// The session snapshots the user's mount table; configuration reloads
/// never affect it. Unknown usernames, locked accounts, and wrong
/// passwords are indistinguishable to the caller: every failure is
/// `InvalidCredential`, and every path performs the same digest work.
pub fn authenticate(
    store: &UserStore,
    username: &str,
    password: &str,
) -> Result<Session, VfsError> {
    let user = store.user(username);

    let verified = match user.and_then(|u| u.digest()) {
        Some(stored) => stored.verify(password),
        None => {
            PLACEHOLDER.verify(password);
            false
        }
    };

    match user {
        Some(user) if verified => {
            info!("User '{}' authenticated", username);
            Ok(Session::new(user))
        }
        _ => {
            warn!("Failed login attempt for '{}'", username);
            Err(VfsError::InvalidCredential)
        }
    }
}
