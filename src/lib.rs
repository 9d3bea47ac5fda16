//! Multi-mount virtual filesystem layer for file-transfer services.
//!
//! Each user gets a private namespace: named mounts under a synthetic
//! root, resolved onto real directories with traversal containment and
//! gated by per-user permission flags. Protocol engines drive it through
//! [`authenticate`] and the resulting [`Session`].

pub mod auth;
pub mod config;
pub mod error;
pub mod mounts;
pub mod permissions;
pub mod session;
pub mod users;
pub mod vfs;

pub use auth::authenticate;
pub use error::VfsError;
pub use permissions::{Operation, Permissions};
pub use session::Session;
pub use users::{SharedUserStore, UserStore};
pub use vfs::VirtualFs;
