//! Request path to filesystem path resolution.
//!
//! Every file the server touches goes through [`PathResolver::resolve`]. The
//! steps run in a fixed order:
//!
//! 1. Percent-decode the URI path.
//! 2. Normalize it segment by segment. Empty and `.` segments are dropped,
//!    and `..` pops a segment. Popping past the root is refused.
//! 3. Join the result onto the canonical root and canonicalize it. When the
//!    target does not exist, its deepest existing ancestor is canonicalized
//!    instead.
//! 4. Refuse anything whose canonical form is not under the canonical root.
//! 5. Only then report a missing target.
//!
//! Step 4 always runs before step 5, so existence is never reported for a
//! path outside the root.

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::http::response::StatusCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    /// The path escapes the document root.
    Forbidden,
    /// The path is inside the root but nothing exists there.
    NotFound,
}

impl ResolveError {
    pub fn status(&self) -> StatusCode {
        match self {
            ResolveError::Forbidden => StatusCode::Forbidden,
            ResolveError::NotFound => StatusCode::NotFound,
        }
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::Forbidden => f.write_str("path escapes document root"),
            ResolveError::NotFound => f.write_str("path not found"),
        }
    }
}

impl std::error::Error for ResolveError {}

/// A canonical, existing path under the document root.
///
/// Only [`PathResolver::resolve`] constructs one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath(PathBuf);

impl ResolvedPath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for ResolvedPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Creates a resolver for `root`, which must exist.
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().canonicalize()?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("document root {} is not a directory", root.display()),
            ));
        }
        Ok(Self { root })
    }

    /// The canonical document root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, uri: &str) -> Result<ResolvedPath, ResolveError> {
        let decoded = urlencoding::decode(uri).map_err(|_| ResolveError::NotFound)?;
        if decoded.contains('\0') {
            return Err(ResolveError::Forbidden);
        }

        let segments = normalize_segments(&decoded)?;
        let joined = segments
            .iter()
            .fold(self.root.clone(), |path, segment| path.join(segment));

        let (canonical, exists) = canonical_form(&joined);
        if !canonical.starts_with(&self.root) {
            return Err(ResolveError::Forbidden);
        }
        if !exists {
            return Err(ResolveError::NotFound);
        }

        Ok(ResolvedPath(canonical))
    }
}

/// Splits `path` on `/` and folds `.` and `..` away.
///
/// Runs of slashes and `/./` collapse. A `..` with nothing left to pop is an
/// attempt to leave the root.
pub fn normalize_segments(path: &str) -> Result<Vec<&str>, ResolveError> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(ResolveError::Forbidden);
                }
            }
            name => segments.push(name),
        }
    }
    Ok(segments)
}

/// Canonicalizes `path`, reporting whether it exists.
///
/// For a missing path the deepest existing ancestor is canonicalized and the
/// missing tail appended unchanged. The tail holds no `.` or `..` after
/// normalization.
fn canonical_form(path: &Path) -> (PathBuf, bool) {
    if let Ok(canonical) = path.canonicalize() {
        return (canonical, true);
    }

    let mut existing = path.to_path_buf();
    let mut missing: Vec<OsString> = Vec::new();
    while let Some(name) = existing.file_name().map(|n| n.to_os_string()) {
        missing.push(name);
        existing.pop();
        if let Ok(mut canonical) = existing.canonicalize() {
            canonical.extend(missing.iter().rev());
            return (canonical, false);
        }
    }

    (path.to_path_buf(), false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_slashes_and_dots() {
        assert_eq!(normalize_segments("a//./b/").unwrap(), vec!["a", "b"]);
        assert_eq!(normalize_segments("/.//a/.../b").unwrap(), vec!["a", "...", "b"]);
        assert_eq!(normalize_segments("a/../b").unwrap(), vec!["b"]);
        assert!(normalize_segments("").unwrap().is_empty());
    }

    #[test]
    fn refuses_to_climb_above_root() {
        assert_eq!(normalize_segments(".."), Err(ResolveError::Forbidden));
        assert_eq!(normalize_segments("a/../../b"), Err(ResolveError::Forbidden));
        assert_eq!(normalize_segments("/.././../etc"), Err(ResolveError::Forbidden));
    }
}
