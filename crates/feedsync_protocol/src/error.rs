//! Error types for protocol decoding.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors raised while decoding server payloads.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The payload was not valid JSON for the expected shape.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server answered with a GraphQL `errors` array.
    #[error("server reported errors: {}", .0.join("; "))]
    Graph(Vec<String>),

    /// The envelope carried neither `data` nor `errors`.
    #[error("response carried no data")]
    MissingData,
}

impl ProtocolError {
    /// Returns true if the server itself rejected the operation.
    pub fn is_application(&self) -> bool {
        matches!(self, ProtocolError::Graph(_))
    }
}
