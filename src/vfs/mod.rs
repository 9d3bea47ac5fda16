//! Virtual filesystem
//!
//! A per-user virtual namespace: mount names under a synthetic root, path
//! resolution with traversal containment, and the filesystem operations a
//! protocol adapter drives.

pub mod entry;
pub mod filesystem;
pub mod path;
pub mod resolve;

pub use entry::{Entry, EntryKind};
pub use filesystem::VirtualFs;
pub use resolve::{Resolved, ResolvedPath};
