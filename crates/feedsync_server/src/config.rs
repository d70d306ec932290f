//! Server configuration.

use feedsync_protocol::PAGE_SIZE;

/// Configuration for the reference feed server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Posts per page.
    pub page_size: usize,
    /// Minimum trimmed length of post titles and contents.
    pub min_text_len: usize,
    /// Whether bearer tokens must be HMAC-signed.
    pub require_auth: bool,
    /// Secret key for token signing (if auth enabled).
    pub auth_secret: Option<Vec<u8>>,
    /// Directory prefix of stored image paths.
    pub image_dir: String,
    /// Status given to newly registered users.
    pub default_status: String,
}

impl ServerConfig {
    /// Creates a configuration with plain user-id tokens.
    pub fn new() -> Self {
        Self {
            page_size: PAGE_SIZE,
            min_text_len: 5,
            require_auth: false,
            auth_secret: None,
            image_dir: "images".into(),
            default_status: "I am new!".into(),
        }
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Sets the minimum title and content length.
    pub fn with_min_text_len(mut self, len: usize) -> Self {
        self.min_text_len = len;
        self
    }

    /// Enables signed tokens with the given secret.
    pub fn with_auth(mut self, secret: Vec<u8>) -> Self {
        self.require_auth = true;
        self.auth_secret = Some(secret);
        self
    }

    /// Sets the image directory prefix.
    pub fn with_image_dir(mut self, dir: impl Into<String>) -> Self {
        self.image_dir = dir.into();
        self
    }

    /// Sets the status of new users.
    pub fn with_default_status(mut self, status: impl Into<String>) -> Self {
        self.default_status = status.into();
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}
