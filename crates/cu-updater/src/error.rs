// error.rs — Error types for the update pipeline.

use std::path::PathBuf;

use thiserror::Error;

use cu_ack::AckError;
use cu_actions::ActionError;
use cu_changelog::ChangelogError;

#[derive(Debug, Error)]
pub enum UpdaterError {
    /// No changelog at the configured location.
    #[error("changelog not found at {}", .0.display())]
    ChangelogNotFound(PathBuf),

    #[error(transparent)]
    Changelog(ChangelogError),

    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse updater config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error(transparent)]
    Ack(#[from] AckError),

    #[error(transparent)]
    Actions(#[from] ActionError),
}

impl From<ChangelogError> for UpdaterError {
    fn from(e: ChangelogError) -> Self {
        match e {
            ChangelogError::NotFound(path) => UpdaterError::ChangelogNotFound(path),
            other => UpdaterError::Changelog(other),
        }
    }
}
