//! # FeedSync Server
//!
//! In-memory reference feed server for FeedSync.
//!
//! This crate provides:
//! - Per-user status lines
//! - Posts listed newest first in fixed-size pages
//! - Creator-only update and delete
//! - Image upload path assignment, dropping the replaced image
//! - Bearer authentication (HMAC-SHA256 tokens)
//!
//! # Authentication
//!
//! Without a secret the bearer token is the user id. With one, tokens are
//! signed and expire:
//!
//! ```rust
//! use feedsync_server::{FeedServer, ServerConfig};
//!
//! let secret = b"my-secure-secret-32-bytes-long!".to_vec();
//! let server = FeedServer::new(ServerConfig::default().with_auth(secret));
//!
//! let user = server.register_user("Max");
//! let token = server.issue_token(&user).unwrap();
//! assert!(server.get_status(Some(token.as_str())).is_ok());
//! ```
//!
//! # Errors
//!
//! Failures are [`ServerError`] values whose display strings are the
//! messages clients receive; [`ServerError::status_code`] gives the HTTP
//! status they travel with.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod auth;
mod config;
mod error;
mod handler;
mod server;
mod store;

pub use auth::{AuthConfig, TokenValidator};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{RequestHandler, UploadedImage};
pub use server::FeedServer;
pub use store::{PostStore, User};
