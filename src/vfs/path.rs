//! Virtual path handling
//!
//! Virtual paths are slash-delimited strings rooted at `/`. Parsing drops
//! empty segments and `.`; `..` is kept for the resolver to apply.

use std::path::Path;

/// Splits a virtual path into its meaningful segments.
pub fn segments(virtual_path: &str) -> Vec<&str> {
    virtual_path
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect()
}

/// True when the virtual path names the synthetic root.
pub fn is_root(virtual_path: &str) -> bool {
    segments(virtual_path).is_empty()
}

/// Builds the virtual form `/mount/segment/...` from a mount name and
/// normalized relative segments.
pub fn join(mount: &str, rel: &[&str]) -> String {
    let mut joined = String::with_capacity(mount.len() + 1);
    joined.push('/');
    joined.push_str(mount);
    for segment in rel {
        joined.push('/');
        joined.push_str(segment);
    }
    joined
}

/// Converts a real relative path into virtual segments, refusing non-UTF-8
/// components.
pub fn real_to_segments(rel: &Path) -> Option<Vec<&str>> {
    rel.components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()
}
