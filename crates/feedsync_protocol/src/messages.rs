//! Response envelopes.

use crate::error::{ProtocolError, ProtocolResult};
use crate::page::PostsPage;
use crate::post::{Post, PostId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A GraphQL response: `data`, `errors`, or both.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphResponse<T> {
    /// Payload, `null` when the operation failed.
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    /// Errors reported by the server.
    #[serde(default)]
    pub errors: Vec<GraphError>,
}

impl<T: DeserializeOwned> GraphResponse<T> {
    /// Decodes a response body.
    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Decodes a response body and unwraps its payload.
    ///
    /// Any entry in `errors` fails the whole operation, even when `data`
    /// is partially present.
    pub fn decode_data(bytes: &[u8]) -> ProtocolResult<T> {
        Self::decode(bytes)?.into_result()
    }
}

impl<T> GraphResponse<T> {
    /// Converts the envelope into its payload or an error.
    pub fn into_result(self) -> ProtocolResult<T> {
        if !self.errors.is_empty() {
            return Err(ProtocolError::Graph(
                self.errors.into_iter().map(|e| e.message).collect(),
            ));
        }
        self.data.ok_or(ProtocolError::MissingData)
    }
}

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GraphError {
    /// Human-readable message.
    pub message: String,
    /// Application status code, when the server attaches one.
    #[serde(default)]
    pub status: Option<u16>,
}

/// Payload of `getUserStatus`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserStatusData {
    /// The stored status.
    #[serde(rename = "getUserStatus")]
    pub status: String,
}

/// Payload of `setUserStatus`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetUserStatusData {
    /// The status as stored by the server.
    #[serde(rename = "setUserStatus")]
    pub status: String,
}

/// Payload of `getPosts`.
#[derive(Debug, Clone, Deserialize)]
pub struct GetPostsData {
    /// The requested page.
    #[serde(rename = "getPosts")]
    pub page: PostsPage,
}

/// Payload of `createPost`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostData {
    /// The stored post.
    #[serde(rename = "createPost")]
    pub post: Post,
}

/// Payload of `updatePost`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePostData {
    /// The stored post.
    #[serde(rename = "updatePost")]
    pub post: Post,
}

/// Payload of `deletePost`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeletePostData {
    /// Acknowledgement.
    #[serde(rename = "deletePost")]
    pub deleted: DeletedPost,
}

/// Acknowledgement returned by `deletePost`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeletedPost {
    /// Id of the removed post.
    #[serde(rename = "_id")]
    pub id: PostId,
}

/// Reply of the image upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Informational message.
    #[serde(default)]
    pub message: Option<String>,
    /// Server path of the stored image; absent when no file was sent.
    #[serde(default)]
    pub file_path: Option<String>,
}

impl UploadResponse {
    /// Decodes an upload reply.
    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
