//! Normalized path handling

use std::path::{Path, PathBuf};

/// A path stored with forward slashes and no trailing separator.
///
/// Worktree and repository paths are compared as strings when the
/// catalogs match directory names, so every path entering the core goes
/// through this type first. Conversion back to a native `PathBuf` happens
/// only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy().replace('\\', "/");
        let trimmed = raw.trim_end_matches('/');
        let inner = if trimmed.is_empty() && raw.starts_with('/') {
            "/".to_string()
        } else {
            trimmed.to_string()
        };
        Self { inner }
    }

    /// Resolve symlinks and relative segments when the path exists.
    ///
    /// Falls back to the path unchanged when it cannot be canonicalized
    /// (for example because it does not exist yet).
    pub fn canonical(&self) -> Self {
        match dunce::canonicalize(self.to_native()) {
            Ok(resolved) => Self::new(resolved),
            Err(_) => self.clone(),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        let segment = segment.trim_start_matches('/');
        if self.inner.is_empty() {
            return Self::new(segment);
        }
        if self.inner == "/" {
            return Self::new(format!("/{segment}"));
        }
        Self::new(format!("{}/{}", self.inner, segment))
    }

    /// Get the final path component.
    pub fn file_name(&self) -> Option<&str> {
        match self.inner.rsplit('/').next() {
            Some("") | None => None,
            Some(name) => Some(name),
        }
    }

    /// Get the extension of the final component, if any.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        }
    }

    /// Check if this path exists on the filesystem.
    ///
    /// Symlinks count as existing even when dangling, so a broken link left
    /// where a worktree should go still blocks creation.
    pub fn exists(&self) -> bool {
        self.to_native().symlink_metadata().is_ok()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }
}

/// Returns true when `name` is a single, non-special path component.
///
/// Used to reject directory names such as `..` or `a/b` before they are
/// joined onto the root directory.
pub fn is_plain_segment(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
