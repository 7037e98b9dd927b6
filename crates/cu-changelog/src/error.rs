// error.rs — Error types for changelog reading.
//
// Parsing itself never fails: malformed versions and metadata fall back to
// defaults. Only getting the document off disk can go wrong.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a changelog document.
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// The changelog file does not exist.
    #[error("changelog not found at {0}")]
    NotFound(PathBuf),

    /// The changelog file exists but could not be read.
    #[error("failed to read changelog at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}
