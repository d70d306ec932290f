//! GraphQL query documents.
//!
//! Arguments are embedded directly into the document text, so every value
//! goes through one of two escaping rules:
//!
//! - user text (titles, content, status) is escaped as a GraphQL string
//! - image paths returned by the upload endpoint get their first backslash
//!   doubled, which is the form the feed server expects

use crate::post::{PostId, PostInput};
use serde::Serialize;

/// Selection set requested for every post returned by the server.
pub const POST_FIELDS: &str = "_id title content imageUrl creator { name } createdAt";

/// A GraphQL request body: `{"query": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphQuery {
    /// The query or mutation document.
    pub query: String,
}

impl GraphQuery {
    fn new(query: String) -> Self {
        Self { query }
    }

    /// Serializes the request body.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Fetches the current user's status.
    pub fn get_user_status() -> Self {
        Self::new("query { getUserStatus }".to_string())
    }

    /// Replaces the current user's status.
    pub fn set_user_status(status: &str) -> Self {
        Self::new(format!(
            "mutation {{ setUserStatus(newStatus: \"{}\") }}",
            escape_string(status)
        ))
    }

    /// Lists one page of posts.
    pub fn get_posts(page: i64) -> Self {
        Self::new(format!(
            "query {{ getPosts(currentPage: {page}) {{ totalPosts posts {{ {POST_FIELDS} }} }} }}"
        ))
    }

    /// Creates a post.
    pub fn create_post(input: &PostInput) -> Self {
        Self::new(format!(
            "mutation {{ createPost(postInput: {}) {{ {POST_FIELDS} }} }}",
            post_input(input)
        ))
    }

    /// Updates an existing post.
    pub fn update_post(id: &PostId, input: &PostInput) -> Self {
        Self::new(format!(
            "mutation {{ updatePost(id: \"{}\", postInput: {}) {{ {POST_FIELDS} }} }}",
            escape_string(id.as_str()),
            post_input(input)
        ))
    }

    /// Deletes a post.
    pub fn delete_post(id: &PostId) -> Self {
        Self::new(format!(
            "mutation {{ deletePost(id: \"{}\") {{ _id }} }}",
            escape_string(id.as_str())
        ))
    }
}

fn post_input(input: &PostInput) -> String {
    format!(
        "{{title: \"{}\", content: \"{}\", imageUrl: \"{}\"}}",
        escape_string(&input.title),
        escape_string(&input.content),
        escape_upload_path(&input.image_url)
    )
}

/// Escapes `value` for use inside a double-quoted GraphQL string.
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Doubles the first backslash of an uploaded image path.
///
/// Upload paths carry a single `\` separator (`images\name.png`); only that
/// first occurrence is doubled.
pub fn escape_upload_path(path: &str) -> String {
    path.replacen('\\', "\\\\", 1)
}
