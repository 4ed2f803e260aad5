//! Structured error types for thotindex.
//!
//! Loading is the only surface that reports errors to the operator;
//! interactive edits are corrected (clamped) or ignored instead.

/// All errors that can occur while loading or persisting a document.
#[derive(Debug, thiserror::Error)]
pub enum ThotError {
    /// Transcription data malformed or unreadable; the load aborts.
    #[error("Load error: {0}")]
    Load(String),

    /// A record disagrees with the document's established column count
    /// in a way that cannot be repaired by padding or truncation.
    #[error("Schema mismatch: {0}")]
    Schema(String),

    /// Configuration file malformed.
    #[error("Config error: {0}")]
    Config(String),

    /// JSON (de)serialization error from serde_json.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ThotError>;

impl From<String> for ThotError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for ThotError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}
