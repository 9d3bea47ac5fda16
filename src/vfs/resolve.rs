//! Path resolution
//!
//! Maps virtual paths onto real filesystem locations, one mount at a time,
//! with traversal containment. Resolution is stateless: every call re-reads
//! the mount root from disk.

use crate::error::VfsError;
use crate::mounts::{MountEntry, MountTable};
use crate::vfs::path;
use log::warn;
use std::path::{Path, PathBuf};

/// Outcome of resolving a virtual path.
#[derive(Debug)]
pub enum Resolved<'a> {
    /// The synthetic root `/`. It exists only as a listing of mount names.
    Root,
    /// A path inside one mount.
    Path(ResolvedPath<'a>),
}

/// A virtual path resolved into a real location inside its mount.
#[derive(Debug)]
pub struct ResolvedPath<'a> {
    pub mount: &'a MountEntry,
    /// Canonical form of the mount root at resolution time.
    pub root: PathBuf,
    /// Real path: `root` joined with the normalized relative segments.
    pub real: PathBuf,
    /// Normalized virtual form, e.g. `/docs/reports/q1.csv`.
    pub virtual_path: String,
}

impl ResolvedPath<'_> {
    /// True when the path names the mount root itself.
    pub fn is_mount_root(&self) -> bool {
        self.real == self.root
    }

    /// Final virtual segment: the file or directory name.
    pub fn name(&self) -> &str {
        self.virtual_path.rsplit('/').next().unwrap_or_default()
    }
}

/// Resolves `virtual_path` against `mounts`.
///
/// `.` segments are discarded and `..` pops the previous segment; a pop
/// past the mount root is refused, as is a `..` before any mount is
/// matched. The first segment selects the mount by exact name. The result
/// is containment-checked against the canonical mount root before it is
/// returned, so neither `..` sequences nor symlinked ancestors can escape.
pub fn resolve<'a>(
    mounts: &'a MountTable,
    virtual_path: &str,
) -> Result<Resolved<'a>, VfsError> {
    let segments = path::segments(virtual_path);

    let Some((first, rest)) = segments.split_first() else {
        return Ok(Resolved::Root);
    };

    if *first == ".." {
        warn!("Denied traversal above the virtual root: {}", virtual_path);
        return Err(VfsError::Forbidden(format!(
            "{}: escapes the virtual root",
            virtual_path
        )));
    }

    let mount = mounts
        .find(first)
        .ok_or_else(|| VfsError::NotFound(virtual_path.to_string()))?;

    // A vanished root means the virtual name currently points at nothing.
    let root = mount
        .root
        .canonicalize()
        .map_err(|e| VfsError::io(virtual_path, e))?;

    // Collapse the remaining segments. Pops are applied to the virtual
    // segments, never to symlink targets.
    let mut rel: Vec<&str> = Vec::with_capacity(rest.len());
    for segment in rest {
        if *segment == ".." {
            if rel.pop().is_none() {
                warn!(
                    "Denied traversal out of mount '{}': {}",
                    mount.name, virtual_path
                );
                return Err(VfsError::Forbidden(format!(
                    "{}: escapes mount '{}'",
                    virtual_path, mount.name
                )));
            }
        } else {
            rel.push(segment);
        }
    }

    let mut real = root.clone();
    for segment in &rel {
        real.push(segment);
    }

    ensure_contained(&real, &root, virtual_path)?;

    let virtual_path = path::join(&mount.name, &rel);

    Ok(Resolved::Path(ResolvedPath {
        mount,
        root,
        real,
        virtual_path,
    }))
}

/// Verifies `real` cannot escape `root` through symlinked components.
///
/// Canonicalizes the deepest existing ancestor of `real` and requires it to
/// remain under the canonical `root`. An existing portion that cannot be
/// canonicalized (a dangling symlink, for example) is refused.
fn ensure_contained(real: &Path, root: &Path, virtual_path: &str) -> Result<(), VfsError> {
    let mut probe = real;
    while probe.symlink_metadata().is_err() {
        match probe.parent() {
            Some(parent) => probe = parent,
            None => {
                return Err(VfsError::Forbidden(format!(
                    "{}: escapes its mount",
                    virtual_path
                )));
            }
        }
    }

    let canonical = probe
        .canonicalize()
        .map_err(|_| VfsError::Forbidden(format!("{}: escapes its mount", virtual_path)))?;

    if canonical.starts_with(root) {
        Ok(())
    } else {
        warn!(
            "Denied escape from {}: {} resolves to {}",
            root.display(),
            real.display(),
            canonical.display()
        );
        Err(VfsError::Forbidden(format!(
            "{}: escapes its mount",
            virtual_path
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn table(mounts: &[(&str, &Path)]) -> MountTable {
        let entries = mounts
            .iter()
            .map(|(name, root)| MountEntry::new(*name, *root))
            .collect();
        MountTable::new(entries).unwrap()
    }

    fn expect_path<'a>(resolved: Resolved<'a>) -> ResolvedPath<'a> {
        match resolved {
            Resolved::Path(p) => p,
            Resolved::Root => panic!("expected a mount path, got the root"),
        }
    }

    #[test]
    fn test_empty_and_dot_paths_resolve_to_root() {
        let dir = TempDir::new().unwrap();
        let mounts = table(&[("c", dir.path())]);
        for vpath in ["/", "", "//", "/./."] {
            assert!(matches!(resolve(&mounts, vpath).unwrap(), Resolved::Root));
        }
    }

    #[test]
    fn test_redundant_segments_normalize() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("reports")).unwrap();
        fs::write(dir.path().join("reports/q1.csv"), b"q1").unwrap();

        let mounts = table(&[("c", dir.path())]);
        let resolved = expect_path(resolve(&mounts, "/c/reports/../reports/q1.csv").unwrap());
        assert_eq!(resolved.virtual_path, "/c/reports/q1.csv");
        assert_eq!(resolved.real, resolved.root.join("reports/q1.csv"));
        assert_eq!(resolved.name(), "q1.csv");

        // Same location through a `.`-littered spelling.
        let again = expect_path(resolve(&mounts, "//c/./reports/q1.csv").unwrap());
        assert_eq!(again.real, resolved.real);
    }

    #[test]
    fn test_escape_past_mount_root_is_forbidden() {
        let dir = TempDir::new().unwrap();
        let mounts = table(&[("c", dir.path())]);
        let err = resolve(&mounts, "/c/../../etc/passwd").unwrap_err();
        assert!(matches!(err, VfsError::Forbidden(_)));
    }

    #[test]
    fn test_escape_above_virtual_root_is_forbidden() {
        let dir = TempDir::new().unwrap();
        let mounts = table(&[("c", dir.path())]);
        let err = resolve(&mounts, "/../c").unwrap_err();
        assert!(matches!(err, VfsError::Forbidden(_)));
    }

    #[test]
    fn test_unknown_mount_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mounts = table(&[("c", dir.path())]);
        let err = resolve(&mounts, "/d/file.txt").unwrap_err();
        assert!(matches!(err, VfsError::NotFound(_)));
    }

    #[test]
    fn test_mount_names_match_case_sensitively() {
        let dir = TempDir::new().unwrap();
        let mounts = table(&[("Docs", dir.path())]);
        assert!(matches!(
            resolve(&mounts, "/Docs").unwrap(),
            Resolved::Path(_)
        ));
        let err = resolve(&mounts, "/docs").unwrap_err();
        assert!(matches!(err, VfsError::NotFound(_)));
    }

    #[test]
    fn test_missing_root_is_not_found() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("vanished");
        let mounts = table(&[("c", gone.as_path())]);
        let err = resolve(&mounts, "/c/file.txt").unwrap_err();
        assert!(matches!(err, VfsError::NotFound(_)));
    }

    #[test]
    fn test_nonexistent_leaf_under_existing_parent_resolves() {
        // Upload targets do not exist yet; resolution must still succeed.
        let dir = TempDir::new().unwrap();
        let mounts = table(&[("c", dir.path())]);
        let resolved = expect_path(resolve(&mounts, "/c/new-upload.bin").unwrap());
        assert!(!resolved.real.exists());
        assert!(resolved.real.starts_with(&resolved.root));
    }

    #[test]
    fn test_mount_root_itself_resolves() {
        let dir = TempDir::new().unwrap();
        let mounts = table(&[("c", dir.path())]);
        let resolved = expect_path(resolve(&mounts, "/c").unwrap());
        assert!(resolved.is_mount_root());
        assert_eq!(resolved.virtual_path, "/c");
        assert_eq!(resolved.name(), "c");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_is_forbidden() {
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("secret.txt"), b"s").unwrap();

        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("leak")).unwrap();

        let mounts = table(&[("c", dir.path())]);
        let err = resolve(&mounts, "/c/leak/secret.txt").unwrap_err();
        assert!(matches!(err, VfsError::Forbidden(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_inside_mount_is_allowed() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data/file.txt"), b"x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("data"), dir.path().join("alias")).unwrap();

        let mounts = table(&[("c", dir.path())]);
        let resolved = expect_path(resolve(&mounts, "/c/alias/file.txt").unwrap());
        assert!(resolved.real.starts_with(&resolved.root));
    }
}
