//! # FeedSync Engine
//!
//! Client-side synchronizer for one page of a remote post feed.
//!
//! This crate provides:
//! - `FeedSynchronizer`, the owner of the cached page, status and edit state
//! - The `FeedApi` port and a `MockFeedApi` for tests
//! - `HttpTransport`, a GraphQL-over-HTTP `FeedApi` on top of an injected
//!   `HttpClient`
//! - A single user-facing `ErrorNotice` slot for failed operations
//!
//! ## Architecture
//!
//! Presentation intents call synchronizer operations, which call the
//! `FeedApi`, mutate local state and emit a fresh `FeedView`:
//!
//! ```text
//! Intent -> FeedSynchronizer -> FeedApi -> state mutation -> FeedView
//! ```
//!
//! ## Key Invariants
//!
//! - The server is authoritative for posts, totals and status
//! - A page holds at most `PAGE_SIZE` posts after a local create
//! - Deleting re-fetches the current page instead of splicing locally
//! - Only one error is surfaced at a time; nothing is retried automatically

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod http;
mod intent;
mod state;
mod transport;

pub use config::FeedConfig;
pub use error::{ErrorNotice, FeedError, FeedResult, Operation};
pub use http::{
    FormPart, FormValue, HttpBody, HttpClient, HttpMethod, HttpRequest, HttpResponse,
    HttpTransport,
};
pub use intent::{Direction, Intent, PostDraft};
pub use state::{EditMode, FeedSynchronizer, FeedView};
pub use transport::{ApiCall, FeedApi, ImageFile, MockFeedApi};

pub use feedsync_protocol::{Post, PostId, PostsPage, PAGE_SIZE};
