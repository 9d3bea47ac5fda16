//! Password digests
//!
//! Credentials are stored as `salt$hash`: a 16-byte random salt in hex,
//! then the hex SHA-256 of the salt's hex form concatenated with the
//! password. Plaintext passwords never touch the store or the logs.

use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use std::fmt;

/// A parsed salted password digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    salt: String,
    hash: String,
}

impl PasswordDigest {
    /// Generates a digest for `password` with a fresh random salt.
    pub fn generate(password: &str) -> Self {
        let mut salt_bytes = [0u8; 16];
        OsRng.fill_bytes(&mut salt_bytes);
        let salt = hex::encode(salt_bytes);
        let hash = compute(&salt, password);
        PasswordDigest { salt, hash }
    }

    /// Parses the stored `salt$hash` form.
    pub fn parse(stored: &str) -> Result<Self, String> {
        let (salt, hash) = stored
            .split_once('$')
            .ok_or_else(|| "missing '$' separator".to_string())?;
        if salt.len() != 32 || !salt.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err("salt must be 32 hex characters".to_string());
        }
        if hash.len() != 64 || !hash.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err("hash must be 64 hex characters".to_string());
        }
        Ok(PasswordDigest {
            salt: salt.to_string(),
            hash: hash.to_string(),
        })
    }

    /// Checks `password` against the digest in constant time.
    pub fn verify(&self, password: &str) -> bool {
        let computed = compute(&self.salt, password);
        constant_time_eq(computed.as_bytes(), self.hash.as_bytes())
    }
}

/// Renders the stored `salt$hash` form.
impl fmt::Display for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}${}", self.salt, self.hash)
    }
}

fn compute(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// All-zero digest used to equalize work on lookups that cannot succeed.
/// No password hashes to it.
pub(crate) fn placeholder() -> PasswordDigest {
    PasswordDigest {
        salt: "0".repeat(32),
        hash: "0".repeat(64),
    }
}

/// Compares two byte strings without short-circuiting on the first
/// mismatch. Lengths are public here (hex digests are fixed-width).
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
