// error.rs — Error types for the acknowledgment store.

use thiserror::Error;

/// Errors that can occur while persisting acknowledgments.
///
/// Loading never fails (a bad file loads as an empty store), so these only
/// come from writes.
#[derive(Debug, Error)]
pub enum AckError {
    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    /// Failed to serialize the store.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
