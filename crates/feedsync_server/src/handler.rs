//! Request handlers for the feed operations.

use crate::auth::{AuthConfig, TokenValidator};
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::store::{PostStore, User};
use chrono::Utc;
use feedsync_protocol::{Creator, Post, PostId, PostInput, PostsPage, UploadResponse};
use parking_lot::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// An image received by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// Original file name.
    pub file_name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    /// Creates an uploaded image.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// Handles feed requests against a [`PostStore`].
///
/// Every operation takes the bearer token the request carried. With
/// authentication enabled the token must be a signed token from
/// [`TokenValidator`]; otherwise it is the user id itself.
pub struct RequestHandler {
    config: ServerConfig,
    store: RwLock<PostStore>,
    validator: Option<TokenValidator>,
}

impl RequestHandler {
    /// Creates a handler with an empty store.
    pub fn new(config: ServerConfig) -> Self {
        let validator = match (&config.auth_secret, config.require_auth) {
            (Some(secret), true) => Some(TokenValidator::new(AuthConfig::new(secret.clone()))),
            _ => None,
        };
        Self {
            config,
            store: RwLock::new(PostStore::new()),
            validator,
        }
    }

    /// Server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Registers a user and returns the new user id.
    pub fn register_user(&self, name: &str) -> String {
        let id = Uuid::new_v4().simple().to_string();
        self.store.write().insert_user(
            id.clone(),
            User {
                name: name.to_string(),
                status: self.config.default_status.clone(),
            },
        );
        info!(user = %id, name, "user registered");
        id
    }

    /// Issues the bearer token for a registered user.
    pub fn issue_token(&self, user_id: &str) -> ServerResult<String> {
        if self.store.read().user(user_id).is_none() {
            return Err(ServerError::NotAuthenticated);
        }
        match &self.validator {
            Some(validator) => validator.create_token(user_id),
            None => Ok(user_id.to_string()),
        }
    }

    /// Resolves the token to a registered user id.
    pub fn authenticate(&self, token: Option<&str>) -> ServerResult<String> {
        let token = token.ok_or(ServerError::NotAuthenticated)?;
        let user_id = match &self.validator {
            Some(validator) => validator.validate_token(token)?,
            None => token.to_string(),
        };
        if self.store.read().user(&user_id).is_none() {
            debug!(user = %user_id, "token for unknown user");
            return Err(ServerError::NotAuthenticated);
        }
        Ok(user_id)
    }

    /// Returns the caller's status.
    pub fn get_status(&self, token: Option<&str>) -> ServerResult<String> {
        let user_id = self.authenticate(token)?;
        self.store
            .read()
            .user(&user_id)
            .map(|user| user.status.clone())
            .ok_or(ServerError::NotAuthenticated)
    }

    /// Stores the caller's status, trimmed, and returns what was stored.
    pub fn set_status(&self, token: Option<&str>, status: &str) -> ServerResult<String> {
        let user_id = self.authenticate(token)?;
        let mut store = self.store.write();
        let user = store
            .user_mut(&user_id)
            .ok_or(ServerError::NotAuthenticated)?;
        user.status = status.trim().to_string();
        debug!(user = %user_id, status = %user.status, "status updated");
        Ok(user.status.clone())
    }

    /// Lists one page, newest first.
    ///
    /// Pages outside `1..=last` yield no posts but still report the total.
    pub fn list_posts(&self, token: Option<&str>, page: i64) -> ServerResult<PostsPage> {
        self.authenticate(token)?;
        let store = self.store.read();
        let total = store.post_count() as u64;
        if page < 1 {
            return Ok(PostsPage::empty(total));
        }

        let size = self.config.page_size;
        let skip = usize::try_from(page - 1)
            .ok()
            .and_then(|p| p.checked_mul(size))
            .unwrap_or(usize::MAX);
        Ok(PostsPage::new(total, store.newest(skip, size)))
    }

    /// Creates a post owned by the caller.
    pub fn create_post(&self, token: Option<&str>, input: &PostInput) -> ServerResult<Post> {
        let user_id = self.authenticate(token)?;
        self.validate(input)?;

        let mut store = self.store.write();
        let name = store
            .user(&user_id)
            .map(|user| user.name.clone())
            .ok_or(ServerError::NotAuthenticated)?;
        let post = Post {
            id: PostId::new(Uuid::new_v4().simple().to_string()),
            title: input.title.clone(),
            content: input.content.clone(),
            image_url: input.image_url.clone(),
            creator: Creator { name },
            created_at: Utc::now(),
        };
        store.insert_post(post.clone(), user_id);
        info!(post = %post.id, "post created");
        Ok(post)
    }

    /// Updates a post. Only its creator may do so.
    pub fn update_post(
        &self,
        token: Option<&str>,
        id: &PostId,
        input: &PostInput,
    ) -> ServerResult<Post> {
        let user_id = self.authenticate(token)?;
        self.validate(input)?;

        let mut store = self.store.write();
        Self::check_owner(&store, id, &user_id)?;
        let post = store.post_mut(id).ok_or(ServerError::PostNotFound)?;
        post.title = input.title.clone();
        post.content = input.content.clone();
        post.image_url = input.image_url.clone();
        info!(post = %id, "post updated");
        Ok(post.clone())
    }

    /// Deletes a post and its image. Only its creator may do so.
    pub fn delete_post(&self, token: Option<&str>, id: &PostId) -> ServerResult<PostId> {
        let user_id = self.authenticate(token)?;

        let mut store = self.store.write();
        Self::check_owner(&store, id, &user_id)?;
        let post = store.remove_post(id).ok_or(ServerError::PostNotFound)?;
        if !post.image_url.is_empty() {
            store.remove_image(&post.image_url);
        }
        info!(post = %id, "post deleted");
        Ok(post.id)
    }

    /// Stores an uploaded image and drops the one it replaces.
    ///
    /// Without a file nothing is stored and the reply carries no path.
    pub fn upload_image(
        &self,
        token: Option<&str>,
        image: Option<UploadedImage>,
        old_path: Option<&str>,
    ) -> ServerResult<UploadResponse> {
        self.authenticate(token)?;
        let Some(image) = image else {
            return Ok(UploadResponse {
                message: Some("No file provided!".into()),
                file_path: None,
            });
        };

        let path = format!(
            "{}\\{}-{}",
            self.config.image_dir,
            Uuid::new_v4().simple(),
            image.file_name
        );
        let mut store = self.store.write();
        if let Some(old) = old_path.filter(|old| !old.is_empty()) {
            store.remove_image(old);
        }
        store.insert_image(path.clone());
        debug!(path = %path, size = image.bytes.len(), "image stored");

        Ok(UploadResponse {
            message: Some("File stored.".into()),
            file_path: Some(path),
        })
    }

    /// Number of stored posts.
    pub fn post_count(&self) -> usize {
        self.store.read().post_count()
    }

    /// Whether an image path is stored.
    pub fn has_image(&self, path: &str) -> bool {
        self.store.read().has_image(path)
    }

    fn validate(&self, input: &PostInput) -> ServerResult<()> {
        let min = self.config.min_text_len;
        let mut problems = Vec::new();
        if input.title.trim().chars().count() < min {
            problems.push("Title is invalid.".to_string());
        }
        if input.content.trim().chars().count() < min {
            problems.push("Content is invalid.".to_string());
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ServerError::InvalidInput(problems))
        }
    }

    fn check_owner(store: &PostStore, id: &PostId, user_id: &str) -> ServerResult<()> {
        let (_, creator_id) = store.post(id).ok_or(ServerError::PostNotFound)?;
        if creator_id != user_id {
            return Err(ServerError::NotAuthorized);
        }
        Ok(())
    }
}
