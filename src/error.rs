//! Centralized error types for mailindex.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that abort an operation as a whole.
///
/// Per-file problems during ingestion never surface here; they are folded
/// into the run's counters instead.
#[derive(Error, Debug)]
pub enum IndexerError {
    /// The ingestion root could not be accessed at all.
    #[error("Path is not accessible '{path}': {source}")]
    PathNotAccessible {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The ingestion root exists but is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A configuration value is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The search engine could not be reached or refused a request.
    #[error(transparent)]
    Engine(#[from] SinkError),
}

/// Convenience alias for `Result<T, IndexerError>`.
pub type Result<T> = std::result::Result<T, IndexerError>;

/// Why raw content could not be turned into an email record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The content lacks a `From:` line or a `To:` line.
    #[error("content does not look like an email: missing {missing} header")]
    InvalidFormat { missing: &'static str },
}

/// Failures reported by a document sink or by the search engine client.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("search engine HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search engine returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode search engine response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Rejection from a sink that does not speak HTTP.
    #[error("document rejected: {0}")]
    Rejected(String),
}

impl SinkError {
    pub fn status(status: StatusCode, body: String) -> Self {
        Self::Status { status, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_format_names_missing_header() {
        let err = ParseError::InvalidFormat { missing: "To:" };
        assert_eq!(
            err.to_string(),
            "content does not look like an email: missing To: header"
        );
    }

    #[test]
    fn test_status_error_carries_body() {
        let err = SinkError::status(StatusCode::BAD_REQUEST, "bad mapping".to_string());
        let text = err.to_string();
        assert!(text.contains("400"));
        assert!(text.contains("bad mapping"));
    }

    #[test]
    fn test_engine_error_is_transparent() {
        let err = IndexerError::from(SinkError::Rejected("full".to_string()));
        assert_eq!(err.to_string(), "document rejected: full");
    }
}
