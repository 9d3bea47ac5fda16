//! Permission flags
//!
//! The per-user permission set persisted in the configuration record.

use serde::Deserialize;
use std::fmt;

/// Per-user operation permissions.
///
/// Persisted as eight named booleans; omitted flags default to denied.
/// `bits`/`from_bits` give the compact mask form for adapters that carry
/// permissions in a single byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Permissions {
    pub list: bool,
    pub download: bool,
    pub upload: bool,
    pub overwrite: bool,
    pub delete: bool,
    pub rename: bool,
    pub create_dir: bool,
    pub remove_dir: bool,
}

impl Permissions {
    /// Grants every permission.
    pub fn all() -> Self {
        Permissions {
            list: true,
            download: true,
            upload: true,
            overwrite: true,
            delete: true,
            rename: true,
            create_dir: true,
            remove_dir: true,
        }
    }

    /// Packs the flags into a byte, bit 0 = list through bit 7 = remove_dir.
    pub fn bits(&self) -> u8 {
        let mut bits = 0u8;
        if self.list {
            bits |= 1;
        }
        if self.download {
            bits |= 1 << 1;
        }
        if self.upload {
            bits |= 1 << 2;
        }
        if self.overwrite {
            bits |= 1 << 3;
        }
        if self.delete {
            bits |= 1 << 4;
        }
        if self.rename {
            bits |= 1 << 5;
        }
        if self.create_dir {
            bits |= 1 << 6;
        }
        if self.remove_dir {
            bits |= 1 << 7;
        }
        bits
    }

    /// Unpacks a byte produced by [`Permissions::bits`].
    pub fn from_bits(bits: u8) -> Self {
        Permissions {
            list: bits & 1 != 0,
            download: bits & (1 << 1) != 0,
            upload: bits & (1 << 2) != 0,
            overwrite: bits & (1 << 3) != 0,
            delete: bits & (1 << 4) != 0,
            rename: bits & (1 << 5) != 0,
            create_dir: bits & (1 << 6) != 0,
            remove_dir: bits & (1 << 7) != 0,
        }
    }
}

/// Compact flag string for logs: one letter per granted permission
/// (`lrwodfmk`), `-` for each denied one.
impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters = [
            (self.list, 'l'),
            (self.download, 'r'),
            (self.upload, 'w'),
            (self.overwrite, 'o'),
            (self.delete, 'd'),
            (self.rename, 'f'),
            (self.create_dir, 'm'),
            (self.remove_dir, 'k'),
        ];
        for (granted, letter) in letters {
            write!(f, "{}", if granted { letter } else { '-' })?;
        }
        Ok(())
    }
}
