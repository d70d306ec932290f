//! Error types for the feed server.

use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors returned by the feed server.
///
/// The display strings are the messages clients see in GraphQL `errors`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServerError {
    /// Missing, malformed or expired credential.
    #[error("Not authenticated!")]
    NotAuthenticated,

    /// Authenticated user may not touch the resource.
    #[error("Not authorized!")]
    NotAuthorized,

    /// Unknown post.
    #[error("No post found!")]
    PostNotFound,

    /// Validation failed.
    #[error("Invalid input.")]
    InvalidInput(Vec<String>),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// HTTP status the error is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            ServerError::NotAuthenticated => 401,
            ServerError::NotAuthorized => 403,
            ServerError::PostNotFound => 404,
            ServerError::InvalidInput(_) => 422,
            ServerError::Internal(_) => 500,
        }
    }

    /// Returns true if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}
