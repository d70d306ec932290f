//! Main feed server.

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::handler::{RequestHandler, UploadedImage};
use feedsync_protocol::{Post, PostId, PostInput, PostsPage, UploadResponse};

/// The reference feed server.
///
/// Holds users, posts and image paths in memory and answers the feed
/// operations the client issues. It has no network listener; tests and
/// tools call it directly or wrap it in a transport.
///
/// # Example
///
/// ```
/// use feedsync_server::{FeedServer, ServerConfig};
/// use feedsync_protocol::PostInput;
///
/// let server = FeedServer::new(ServerConfig::default());
/// let user = server.register_user("Max");
/// let token = server.issue_token(&user).unwrap();
///
/// let post = server
///     .create_post(Some(token.as_str()), &PostInput::new("Hello", "World!", ""))
///     .unwrap();
/// let page = server.list_posts(Some(token.as_str()), 1).unwrap();
/// assert_eq!(page.posts[0].id, post.id);
/// ```
pub struct FeedServer {
    handler: RequestHandler,
}

impl FeedServer {
    /// Creates a new feed server.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            handler: RequestHandler::new(config),
        }
    }

    /// Registers a user and returns its id.
    pub fn register_user(&self, name: &str) -> String {
        self.handler.register_user(name)
    }

    /// Issues a bearer token for a registered user.
    pub fn issue_token(&self, user_id: &str) -> ServerResult<String> {
        self.handler.issue_token(user_id)
    }

    /// Handles `getUserStatus`.
    pub fn get_status(&self, token: Option<&str>) -> ServerResult<String> {
        self.handler.get_status(token)
    }

    /// Handles `setUserStatus`.
    pub fn set_status(&self, token: Option<&str>, status: &str) -> ServerResult<String> {
        self.handler.set_status(token, status)
    }

    /// Handles `getPosts`.
    pub fn list_posts(&self, token: Option<&str>, page: i64) -> ServerResult<PostsPage> {
        self.handler.list_posts(token, page)
    }

    /// Handles `createPost`.
    pub fn create_post(&self, token: Option<&str>, input: &PostInput) -> ServerResult<Post> {
        self.handler.create_post(token, input)
    }

    /// Handles `updatePost`.
    pub fn update_post(
        &self,
        token: Option<&str>,
        id: &PostId,
        input: &PostInput,
    ) -> ServerResult<Post> {
        self.handler.update_post(token, id, input)
    }

    /// Handles `deletePost`.
    pub fn delete_post(&self, token: Option<&str>, id: &PostId) -> ServerResult<PostId> {
        self.handler.delete_post(token, id)
    }

    /// Handles the image upload endpoint.
    pub fn upload_image(
        &self,
        token: Option<&str>,
        image: Option<UploadedImage>,
        old_path: Option<&str>,
    ) -> ServerResult<UploadResponse> {
        self.handler.upload_image(token, image, old_path)
    }

    /// Returns the number of stored posts.
    pub fn post_count(&self) -> usize {
        self.handler.post_count()
    }

    /// Returns true if the image path is stored.
    pub fn has_image(&self, path: &str) -> bool {
        self.handler.has_image(path)
    }

    /// Server configuration.
    pub fn config(&self) -> &ServerConfig {
        self.handler.config()
    }
}
