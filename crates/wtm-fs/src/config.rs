//! Configuration file loading

use crate::{Error, NormalizedPath, Result, io};
use serde::de::DeserializeOwned;

/// Loads configuration files, choosing the parser from the file extension.
#[derive(Debug, Default)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load and parse the configuration at `path`.
    ///
    /// Only `.toml` files are supported.
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let extension = path.extension().unwrap_or("");
        if !extension.eq_ignore_ascii_case("toml") {
            return Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            });
        }

        let content = io::read_text(path)?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_native(),
            format: "TOML".into(),
            message: e.to_string(),
        })
    }

    /// Like [`ConfigStore::load`], but a missing file yields `Ok(None)`.
    pub fn load_optional<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<Option<T>> {
        if !path.exists() {
            tracing::debug!(path = %path, "No config file, using defaults");
            return Ok(None);
        }
        self.load(path).map(Some)
    }
}
