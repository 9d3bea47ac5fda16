//! Error types
//!
//! Defines the error surface of the virtual filesystem layer.

use std::fmt;
use std::io;

/// Errors returned by filesystem, permission, and authentication operations.
#[derive(Debug)]
pub enum VfsError {
    /// The virtual path does not name anything: no mount matches its first
    /// segment, or the resolved real path does not exist.
    NotFound(String),
    /// The operation is denied: a missing permission flag, a traversal
    /// attempt, a mutation of the synthetic root, or an OS-level denial.
    Forbidden(String),
    /// Authentication failed. Carries no detail: unknown usernames and
    /// wrong passwords must be indistinguishable to the caller.
    InvalidCredential,
    /// An underlying I/O failure unrelated to permissions or existence.
    IoError(io::Error),
}

impl fmt::Display for VfsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VfsError::NotFound(p) => write!(f, "Not found: {}", p),
            VfsError::Forbidden(r) => write!(f, "Forbidden: {}", r),
            VfsError::InvalidCredential => write!(f, "Invalid username or password"),
            VfsError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for VfsError {}

impl From<io::Error> for VfsError {
    fn from(error: io::Error) -> Self {
        VfsError::IoError(error)
    }
}

impl VfsError {
    /// Classifies an I/O failure on the given virtual path.
    ///
    /// Missing paths become `NotFound`, OS permission denials become
    /// `Forbidden`; everything else is carried as `IoError`.
    pub fn io(virtual_path: &str, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => VfsError::NotFound(virtual_path.to_string()),
            io::ErrorKind::PermissionDenied => {
                VfsError::Forbidden(format!("{}: permission denied", virtual_path))
            }
            _ => VfsError::IoError(error),
        }
    }
}
