//! Path string normalization.
//!
//! Eclipse metadata files always use forward slashes, regardless of the
//! platform the build ran on.

/// Removes extra path separators and converts backslashes to forward slashes.
///
/// Runs of one or more backslashes become a single `/`, then runs of forward
/// slashes collapse to one. Idempotent; an empty string stays empty.
pub fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_slash = false;
    for c in path.chars() {
        if c == '\\' || c == '/' {
            if !prev_slash {
                out.push('/');
            }
            prev_slash = true;
        } else {
            out.push(c);
            prev_slash = false;
        }
    }
    out
}

/// Strips `root` (plus a following `/`) from the front of `path`.
///
/// Both arguments are expected to be normalized already. Returns the path
/// unchanged when it does not live under the root.
pub fn relativize(path: &str, root: &str) -> String {
    match path.strip_prefix(root) {
        Some(rest) => rest.strip_prefix('/').unwrap_or(rest).to_string(),
        None => path.to_string(),
    }
}
