//! Error handlers
//!
//! Logging and protocol reply-code mapping for adapters.

use crate::error::types::VfsError;
use log::error;

/// Log a filesystem-layer error.
pub fn handle_error(err: &VfsError) {
    error!("Filesystem error: {}", err);
}

/// Default FTP reply code for an error, for protocol adapters.
pub fn error_to_ftp_code(err: &VfsError) -> u16 {
    match err {
        VfsError::NotFound(_) => 550,
        VfsError::Forbidden(_) => 550,
        VfsError::InvalidCredential => 530,
        VfsError::IoError(_) => 451,
    }
}
