//! Permission system
//!
//! Per-user permission flags and the pure enforcement gate.

pub mod enforcer;
pub mod flags;

pub use enforcer::{Operation, check};
pub use flags::Permissions;
