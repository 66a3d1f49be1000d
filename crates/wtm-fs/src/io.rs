//! Directory operations used by the worktree lifecycle

use std::fs;
use std::time::{Duration, SystemTime};

use backoff::ExponentialBackoff;

use crate::{Error, NormalizedPath, Result};

/// Retry settings for filesystem operations that can fail transiently.
///
/// Directory removal races with editors, indexers and antivirus scanners
/// holding handles inside the tree, mostly on Windows.
#[derive(Debug, Clone, Copy)]
pub struct RobustnessConfig {
    /// Upper bound on the total time spent retrying
    pub max_elapsed: Duration,
    /// Delay before the first retry
    pub initial_interval: Duration,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            max_elapsed: Duration::from_secs(2),
            initial_interval: Duration::from_millis(50),
        }
    }
}

impl RobustnessConfig {
    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: self.initial_interval,
            initial_interval: self.initial_interval,
            max_elapsed_time: Some(self.max_elapsed),
            ..ExponentialBackoff::default()
        }
    }
}

/// Remove a directory tree, retrying transient failures.
///
/// A path that is already gone counts as success.
pub fn remove_dir_forced(path: &NormalizedPath, robustness: RobustnessConfig) -> Result<()> {
    let native = path.to_native();

    let op = || match fs::remove_dir_all(&native) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(backoff::Error::permanent(e))
        }
        Err(e) => {
            tracing::debug!(path = %native.display(), error = %e, "Retrying directory removal");
            Err(backoff::Error::transient(e))
        }
    };

    backoff::retry(robustness.backoff(), op).map_err(|e| {
        let source = match e {
            backoff::Error::Permanent(err) => err,
            backoff::Error::Transient { err, .. } => err,
        };
        Error::RemoveFailed {
            path: native.clone(),
            source,
        }
    })
}

/// Modification time of `path`.
pub fn modified_time(path: &NormalizedPath) -> Result<SystemTime> {
    let native = path.to_native();
    fs::metadata(&native)
        .and_then(|meta| meta.modified())
        .map_err(|e| Error::io(&native, e))
}

/// Names of the direct child directories of `path`, sorted.
///
/// Entries whose names are not valid UTF-8 are skipped.
pub fn child_dir_names(path: &NormalizedPath) -> Result<Vec<String>> {
    let native = path.to_native();
    let entries = fs::read_dir(&native).map_err(|e| Error::io(&native, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(&native, e))?;
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if !is_dir {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native = path.to_native();
    fs::read_to_string(&native).map_err(|e| Error::io(&native, e))
}
