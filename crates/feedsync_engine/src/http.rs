//! HTTP transport implementation.
//!
//! Structured operations are GraphQL documents POSTed as JSON; images go
//! through a separate multipart PUT because the GraphQL endpoint only
//! accepts JSON. The actual HTTP client is abstracted via a trait to allow
//! different implementations (reqwest, hyper, test doubles).

use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};
use crate::transport::{FeedApi, ImageFile};
use feedsync_protocol::{
    CreatePostData, DeletePostData, GetPostsData, GraphQuery, GraphResponse, Post, PostId,
    PostInput, PostsPage, SetUserStatusData, UpdatePostData, UploadResponse, UserStatusData,
};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// POST.
    Post,
    /// PUT.
    Put,
}

/// One field of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    /// Field name.
    pub name: String,
    /// Field value.
    pub value: FormValue,
}

/// A multipart field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    /// Plain text field.
    Text(String),
    /// File field.
    File(ImageFile),
}

/// Request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpBody {
    /// `application/json` bytes.
    Json(Vec<u8>),
    /// `multipart/form-data` fields.
    Multipart(Vec<FormPart>),
}

/// An outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Method.
    pub method: HttpMethod,
    /// Absolute URL.
    pub url: String,
    /// Bearer credential for the `Authorization` header.
    pub bearer: Option<String>,
    /// Body.
    pub body: HttpBody,
}

/// A received response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Raw body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual HTTP transport.
pub trait HttpClient: Send + Sync {
    /// Sends a request. `Err` means no response was received.
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, String>;

    /// Checks if the client is connected/healthy.
    fn is_healthy(&self) -> bool;
}

/// GraphQL-over-HTTP feed API.
pub struct HttpTransport<C: HttpClient> {
    config: FeedConfig,
    client: C,
    connected: AtomicBool,
    last_error: RwLock<Option<String>>,
}

impl<C: HttpClient> HttpTransport<C> {
    /// Creates a new HTTP transport.
    pub fn new(config: FeedConfig, client: C) -> Self {
        Self {
            config,
            client,
            connected: AtomicBool::new(true),
            last_error: RwLock::new(None),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Returns the last transport error message.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    fn send(&self, method: HttpMethod, url: String, body: HttpBody) -> FeedResult<Vec<u8>> {
        if !self.is_connected() {
            return Err(FeedError::NotConnected);
        }

        let request = HttpRequest {
            method,
            url,
            bearer: self.config.token.clone(),
            body,
        };
        debug!(method = ?request.method, url = %request.url, "sending feed request");

        let response = self.client.send(request).map_err(|e| {
            *self.last_error.write() = Some(e.clone());
            FeedError::network(e)
        })?;

        if !response.is_success() {
            let message = failure_message(&response);
            *self.last_error.write() = Some(message.clone());
            return Err(FeedError::http_status(response.status, message));
        }

        *self.last_error.write() = None;
        Ok(response.body)
    }

    fn post_graph<T: DeserializeOwned>(&self, query: GraphQuery) -> FeedResult<T> {
        let body = query
            .to_json()
            .map_err(|e| FeedError::Protocol(format!("Failed to encode request: {e}")))?;
        let response = self.send(
            HttpMethod::Post,
            self.config.graphql_url(),
            HttpBody::Json(body),
        )?;
        Ok(GraphResponse::<T>::decode_data(&response)?)
    }
}

/// Builds a transport error message, preferring GraphQL error text.
fn failure_message(response: &HttpResponse) -> String {
    match GraphResponse::<serde_json::Value>::decode(&response.body) {
        Ok(envelope) if !envelope.errors.is_empty() => envelope
            .errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; "),
        _ => format!("HTTP {}", response.status),
    }
}

impl<C: HttpClient> FeedApi for HttpTransport<C> {
    fn get_status(&self) -> FeedResult<String> {
        let data: UserStatusData = self.post_graph(GraphQuery::get_user_status())?;
        Ok(data.status)
    }

    fn set_status(&self, status: &str) -> FeedResult<String> {
        let data: SetUserStatusData = self.post_graph(GraphQuery::set_user_status(status))?;
        Ok(data.status)
    }

    fn list_posts(&self, page: i64) -> FeedResult<PostsPage> {
        let data: GetPostsData = self.post_graph(GraphQuery::get_posts(page))?;
        Ok(data.page)
    }

    fn create_post(&self, input: &PostInput) -> FeedResult<Post> {
        let data: CreatePostData = self.post_graph(GraphQuery::create_post(input))?;
        Ok(data.post)
    }

    fn update_post(&self, id: &PostId, input: &PostInput) -> FeedResult<Post> {
        let data: UpdatePostData = self.post_graph(GraphQuery::update_post(id, input))?;
        Ok(data.post)
    }

    fn delete_post(&self, id: &PostId) -> FeedResult<()> {
        let _: DeletePostData = self.post_graph(GraphQuery::delete_post(id))?;
        Ok(())
    }

    fn upload_image(
        &self,
        image: &ImageFile,
        previous: Option<&str>,
    ) -> FeedResult<Option<String>> {
        let mut parts = vec![FormPart {
            name: "image".to_string(),
            value: FormValue::File(image.clone()),
        }];
        if let Some(previous) = previous {
            parts.push(FormPart {
                name: "oldPath".to_string(),
                value: FormValue::Text(previous.to_string()),
            });
        }

        let response = self.send(
            HttpMethod::Put,
            self.config.upload_url(),
            HttpBody::Multipart(parts),
        )?;
        Ok(UploadResponse::decode(&response)?.file_path)
    }

    fn page_size(&self) -> usize {
        self.config.page_size
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst) && self.client.is_healthy()
    }

    fn close(&self) -> FeedResult<()> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }
}
