//! Error types for wtm-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from wtm-core
    #[error(transparent)]
    Core(#[from] wtm_core::Error),

    /// Error from wtm-fs
    #[error(transparent)]
    Fs(#[from] wtm_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Interactive prompt error
    #[error("Interactive prompt error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// A cancelled prompt or an empty list, reported without an error banner.
    pub fn is_silent_abort(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_silent_abort())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Core(wtm_core::Error::NoSelection))
    }
}
