//! # FeedSync Protocol
//!
//! Wire model and request documents for the feed API.
//!
//! This crate provides:
//! - `Post` and `PostsPage`, the records exchanged with the server
//! - GraphQL query/mutation documents for every feed operation
//! - Response envelopes (`data` / `errors`) and the image upload reply
//! - String escaping rules for values embedded in query documents
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod error;
mod messages;
mod page;
mod post;

pub use document::{escape_string, escape_upload_path, GraphQuery, POST_FIELDS};
pub use error::{ProtocolError, ProtocolResult};
pub use messages::{
    CreatePostData, DeletePostData, DeletedPost, GetPostsData, GraphError, GraphResponse,
    SetUserStatusData, UpdatePostData, UploadResponse, UserStatusData,
};
pub use page::{last_page, PostsPage, PAGE_SIZE};
pub use post::{Creator, Post, PostId, PostInput};
