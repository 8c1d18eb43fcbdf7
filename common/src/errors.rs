//! Error types shared across the workspace.

use thiserror::Error;

/// Result alias used throughout the workspace.
pub type AppResult<T> = Result<T, AppError>;

/// Application error taxonomy.
///
/// Connection and query failures carry the underlying driver message
/// verbatim; callers decide what to do with it (there is no automatic
/// retry).
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid invocation arguments (empty server/database, unknown
    /// database type).
    #[error("invalid argument: {0}")]
    Validation(String),

    /// Password authentication requested with an incomplete credential
    /// pair. Raised before any network I/O.
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    /// The session could not be established (authentication rejected, host
    /// unreachable, handshake timeout, TLS failure).
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Server-side execution error or client-side command timeout.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Anything outside the categories above. Still flows through the
    /// connection cleanup path and maps to a non-zero exit status.
    #[error("unexpected fault: {0}")]
    Unexpected(#[from] anyhow::Error),
}
