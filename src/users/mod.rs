//! User management
//!
//! User accounts and the reloadable process-wide store.

pub mod account;
pub mod store;

pub use account::User;
pub use store::{SharedUserStore, UserStore, reload};
