// error.rs — Error types for action handlers and handler configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActionError {
    /// Reading the handlers config failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse handlers config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("handler command not found: {0}")]
    CommandNotFound(String),

    #[error("failed to launch handler: {0}")]
    LaunchFailed(String),

    /// A handler could not complete and has no structured failure to report.
    #[error("handler failed: {0}")]
    HandlerFailed(String),
}
