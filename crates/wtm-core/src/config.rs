//! Settings resolution
//!
//! Two values drive the whole tool: the root directory repositories are
//! discovered under, and the worktree suffix delimiter. Each resolves from
//! the first source that sets it: explicit override (CLI flag or
//! environment variable), then `<config_dir>/wtm/config.toml`, then the
//! default.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use wtm_fs::{ConfigStore, NormalizedPath, RepoPath};
use wtm_git::WorktreeNaming;

use crate::Result;

/// Contents of `config.toml`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub root: Option<PathBuf>,
    pub suffix: Option<String>,
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Default, Clone)]
pub struct SettingsOverrides {
    pub root: Option<PathBuf>,
    pub suffix: Option<String>,
    /// Config file to read instead of the default location
    pub config: Option<PathBuf>,
}

/// Resolved settings shared by every workflow.
#[derive(Debug, Clone)]
pub struct Settings {
    root: NormalizedPath,
    naming: WorktreeNaming,
}

impl Settings {
    pub fn new(root: impl Into<NormalizedPath>, naming: WorktreeNaming) -> Self {
        Self {
            root: root.into(),
            naming,
        }
    }

    /// Load settings from the user config file and apply `overrides`.
    pub fn load(overrides: SettingsOverrides) -> Result<Self> {
        let path = overrides.config.clone().or_else(default_config_path);
        let file: Option<FileConfig> = match path {
            Some(path) => ConfigStore::new().load_optional(&NormalizedPath::new(path))?,
            None => None,
        };
        let cwd = std::env::current_dir()?;
        Self::resolve(overrides, file.unwrap_or_default(), &cwd)
    }

    /// Combine sources without touching the environment.
    ///
    /// `cwd` is the fallback root when no source sets one.
    pub fn resolve(overrides: SettingsOverrides, file: FileConfig, cwd: &Path) -> Result<Self> {
        let root = overrides
            .root
            .or(file.root)
            .map(|p| expand_home(&p))
            .unwrap_or_else(|| cwd.to_path_buf());
        let root = if root.is_relative() {
            cwd.join(root)
        } else {
            root
        };

        let naming = match overrides.suffix.or(file.suffix) {
            Some(suffix) => WorktreeNaming::new(suffix)?,
            None => WorktreeNaming::default(),
        };

        let root = NormalizedPath::new(root).canonical();
        if !root.is_dir() {
            tracing::warn!(root = %root, "Root directory does not exist");
        }
        tracing::debug!(root = %root, suffix = naming.suffix(), "Resolved settings");

        Ok(Self { root, naming })
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn naming(&self) -> &WorktreeNaming {
        &self.naming
    }

    /// Path of the worktree directory `dir_name` under the root.
    pub fn worktree_path(&self, dir_name: &str) -> NormalizedPath {
        self.root.join(dir_name)
    }
}

/// `<config_dir>/wtm/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| {
        dir.join(RepoPath::AppConfigDir)
            .join(RepoPath::ConfigFile)
    })
}

fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
