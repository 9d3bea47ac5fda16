//! Authentication system
//!
//! Salted password digests and credential validation.

pub mod authenticator;
pub mod digest;

pub use authenticator::authenticate;
pub use digest::PasswordDigest;
