//! Error types for the feed client.

use feedsync_protocol::ProtocolError;
use serde::Serialize;
use thiserror::Error;

/// Result type for feed operations.
pub type FeedResult<T> = Result<T, FeedError>;

/// Errors that can occur while talking to the feed server.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// Network failure or non-success HTTP status.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// HTTP status, if a response arrived.
        status: Option<u16>,
    },

    /// The server answered with a structured error payload.
    #[error("server rejected the request: {}", .0.join("; "))]
    Application(Vec<String>),

    /// The response could not be decoded.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The transport was closed.
    #[error("not connected to server")]
    NotConnected,
}

impl FeedError {
    /// Creates a transport error for a request that never got a response.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: None,
        }
    }

    /// Creates a transport error for a non-success HTTP status.
    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Creates an application error with a single message.
    pub fn application(message: impl Into<String>) -> Self {
        Self::Application(vec![message.into()])
    }

    /// Returns true for network and HTTP-level failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, FeedError::Transport { .. } | FeedError::NotConnected)
    }

    /// Returns true if the server rejected the operation itself.
    pub fn is_application(&self) -> bool {
        matches!(self, FeedError::Application(_))
    }
}

impl From<ProtocolError> for FeedError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::Graph(messages) => FeedError::Application(messages),
            other => FeedError::Protocol(other.to_string()),
        }
    }
}

/// The synchronizer operation an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Fetching the user status on initialization.
    FetchStatus,
    /// Sending a new user status.
    UpdateStatus,
    /// Loading a page of posts.
    LoadPosts,
    /// Creating or updating a post (including its image upload).
    SavePost,
    /// Deleting a post.
    DeletePost,
}

impl Operation {
    /// The message shown to the user when this operation fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::FetchStatus => "Unable to fetch user status",
            Operation::UpdateStatus => "Unable to update user status!",
            Operation::LoadPosts => "Fetching posts failed!",
            Operation::SavePost => "Saving the post failed!",
            Operation::DeletePost => "Deleting the post failed!",
        }
    }
}

/// The single user-facing error the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorNotice {
    /// Operation that failed.
    pub operation: Operation,
    /// Message for the user.
    pub message: String,
    /// Underlying cause, rendered as text.
    pub detail: String,
    /// Underlying cause.
    #[serde(skip)]
    pub cause: FeedError,
}

impl ErrorNotice {
    /// Normalizes a failure of `operation` into a notice.
    pub fn new(operation: Operation, cause: FeedError) -> Self {
        Self {
            operation,
            message: operation.failure_message().to_string(),
            detail: cause.to_string(),
            cause,
        }
    }
}
