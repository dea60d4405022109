//! Error types for the music organizer.

use thiserror::Error;

/// Main error type for all organizer operations.
#[derive(Debug, Error)]
pub enum OrganizerError {
    /// Last.fm answered with an error envelope (`{"error": 6, "message": ...}`).
    #[error("Last.fm error {code}: {message}")]
    Api { code: i64, message: String },

    /// A field the caller depends on was absent from the response.
    #[error("Missing field in response: {0}")]
    MissingField(&'static str),

    /// HTTP request failed.
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Local favorites store failed.
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// The favorites store lock was poisoned by a panicking writer.
    #[error("Database lock poisoned")]
    LockPoisoned,

    /// A blocking store task panicked or was cancelled.
    #[error("Task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    /// I/O operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for organizer operations.
pub type Result<T> = std::result::Result<T, OrganizerError>;
