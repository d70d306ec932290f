//! Configuration for the feed client.

use feedsync_protocol::PAGE_SIZE;
use std::time::Duration;

/// Configuration for talking to a feed server.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Server base URL (e.g. `http://localhost:8080`).
    pub endpoint: String,
    /// Path of the GraphQL endpoint.
    pub graphql_path: String,
    /// Path of the image upload endpoint.
    pub upload_path: String,
    /// Bearer credential supplied by the host application.
    pub token: Option<String>,
    /// Posts per page, as fixed by the server.
    pub page_size: usize,
    /// Request timeout.
    pub timeout: Duration,
}

impl FeedConfig {
    /// Creates a new configuration for the given server.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            graphql_path: "/graphql".to_string(),
            upload_path: "/postImage".to_string(),
            token: None,
            page_size: PAGE_SIZE,
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the bearer credential.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the GraphQL endpoint path.
    pub fn with_graphql_path(mut self, path: impl Into<String>) -> Self {
        self.graphql_path = path.into();
        self
    }

    /// Sets the upload endpoint path.
    pub fn with_upload_path(mut self, path: impl Into<String>) -> Self {
        self.upload_path = path.into();
        self
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the GraphQL endpoint.
    pub fn graphql_url(&self) -> String {
        join_url(&self.endpoint, &self.graphql_path)
    }

    /// Full URL of the upload endpoint.
    pub fn upload_url(&self) -> String {
        join_url(&self.endpoint, &self.upload_path)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
