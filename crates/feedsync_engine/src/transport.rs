//! The remote feed API port.

use crate::error::{FeedError, FeedResult};
use feedsync_protocol::{Post, PostId, PostInput, PostsPage, PAGE_SIZE};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// The operations the synchronizer needs from the feed server.
///
/// This trait abstracts the network layer, allowing for different
/// implementations (GraphQL over HTTP, in-memory servers, mocks).
pub trait FeedApi: Send + Sync {
    /// Fetches the current user's status.
    fn get_status(&self) -> FeedResult<String>;

    /// Stores a new status and returns the value the server kept.
    fn set_status(&self, status: &str) -> FeedResult<String>;

    /// Lists one page of posts. Out-of-range pages are passed through.
    fn list_posts(&self, page: i64) -> FeedResult<PostsPage>;

    /// Creates a post.
    fn create_post(&self, input: &PostInput) -> FeedResult<Post>;

    /// Updates a post.
    fn update_post(&self, id: &PostId, input: &PostInput) -> FeedResult<Post>;

    /// Deletes a post.
    fn delete_post(&self, id: &PostId) -> FeedResult<()>;

    /// Uploads an image, replacing `previous` if given.
    ///
    /// Returns the stored path, or `None` if the server stored nothing.
    fn upload_image(&self, image: &ImageFile, previous: Option<&str>)
        -> FeedResult<Option<String>>;

    /// Posts per page the server uses.
    fn page_size(&self) -> usize {
        PAGE_SIZE
    }

    /// Checks if the transport is connected.
    fn is_connected(&self) -> bool;

    /// Closes the transport.
    fn close(&self) -> FeedResult<()>;
}

impl<T: FeedApi + ?Sized> FeedApi for &T {
    fn get_status(&self) -> FeedResult<String> {
        (**self).get_status()
    }

    fn set_status(&self, status: &str) -> FeedResult<String> {
        (**self).set_status(status)
    }

    fn list_posts(&self, page: i64) -> FeedResult<PostsPage> {
        (**self).list_posts(page)
    }

    fn create_post(&self, input: &PostInput) -> FeedResult<Post> {
        (**self).create_post(input)
    }

    fn update_post(&self, id: &PostId, input: &PostInput) -> FeedResult<Post> {
        (**self).update_post(id, input)
    }

    fn delete_post(&self, id: &PostId) -> FeedResult<()> {
        (**self).delete_post(id)
    }

    fn upload_image(
        &self,
        image: &ImageFile,
        previous: Option<&str>,
    ) -> FeedResult<Option<String>> {
        (**self).upload_image(image, previous)
    }

    fn page_size(&self) -> usize {
        (**self).page_size()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn close(&self) -> FeedResult<()> {
        (**self).close()
    }
}

/// An image selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// Original file name.
    pub file_name: String,
    /// MIME type (e.g. `image/png`).
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Creates an image file.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// A call recorded by [`MockFeedApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// `get_status`.
    GetStatus,
    /// `set_status` with the sent value.
    SetStatus(String),
    /// `list_posts` with the requested page.
    ListPosts(i64),
    /// `create_post`.
    CreatePost(PostInput),
    /// `update_post`.
    UpdatePost(PostId, PostInput),
    /// `delete_post`.
    DeletePost(PostId),
    /// `upload_image` with the file name and replaced path.
    UploadImage {
        /// Uploaded file name.
        file_name: String,
        /// Path sent as the image being replaced.
        previous: Option<String>,
    },
}

/// A scripted feed API for testing.
///
/// Unset responses fall back to: status echo for `set_status`, success for
/// `delete_post`, and a protocol error for everything else.
#[derive(Debug)]
pub struct MockFeedApi {
    connected: AtomicBool,
    calls: Mutex<Vec<ApiCall>>,
    status_response: Mutex<Option<FeedResult<String>>>,
    set_status_response: Mutex<Option<FeedResult<String>>>,
    pages: Mutex<HashMap<i64, FeedResult<PostsPage>>>,
    save_response: Mutex<Option<FeedResult<Post>>>,
    delete_response: Mutex<Option<FeedResult<()>>>,
    upload_response: Mutex<Option<FeedResult<Option<String>>>>,
}

impl MockFeedApi {
    /// Creates a new mock API.
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(true),
            calls: Mutex::new(Vec::new()),
            status_response: Mutex::new(None),
            set_status_response: Mutex::new(None),
            pages: Mutex::new(HashMap::new()),
            save_response: Mutex::new(None),
            delete_response: Mutex::new(None),
            upload_response: Mutex::new(None),
        }
    }

    /// Sets the `get_status` response.
    pub fn set_status_response(&self, response: FeedResult<String>) {
        *self.status_response.lock() = Some(response);
    }

    /// Sets the `set_status` response.
    pub fn set_status_update_response(&self, response: FeedResult<String>) {
        *self.set_status_response.lock() = Some(response);
    }

    /// Sets the `list_posts` response for one page.
    pub fn set_page(&self, page: i64, response: FeedResult<PostsPage>) {
        self.pages.lock().insert(page, response);
    }

    /// Sets the response of both `create_post` and `update_post`.
    pub fn set_save_response(&self, response: FeedResult<Post>) {
        *self.save_response.lock() = Some(response);
    }

    /// Sets the `delete_post` response.
    pub fn set_delete_response(&self, response: FeedResult<()>) {
        *self.delete_response.lock() = Some(response);
    }

    /// Sets the `upload_image` response.
    pub fn set_upload_response(&self, response: FeedResult<Option<String>>) {
        *self.upload_response.lock() = Some(response);
    }

    /// Sets the connected state.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Returns every call made so far.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().clone()
    }

    /// Forgets recorded calls.
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: ApiCall) -> FeedResult<()> {
        self.calls.lock().push(call);
        if self.is_connected() {
            Ok(())
        } else {
            Err(FeedError::NotConnected)
        }
    }

    fn scripted<T: Clone>(slot: &Mutex<Option<FeedResult<T>>>, what: &str) -> FeedResult<T> {
        slot.lock()
            .clone()
            .unwrap_or_else(|| Err(FeedError::Protocol(format!("No mock {what} response set"))))
    }
}

impl Default for MockFeedApi {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedApi for MockFeedApi {
    fn get_status(&self) -> FeedResult<String> {
        self.record(ApiCall::GetStatus)?;
        Self::scripted(&self.status_response, "status")
    }

    fn set_status(&self, status: &str) -> FeedResult<String> {
        self.record(ApiCall::SetStatus(status.to_string()))?;
        self.set_status_response
            .lock()
            .clone()
            .unwrap_or_else(|| Ok(status.to_string()))
    }

    fn list_posts(&self, page: i64) -> FeedResult<PostsPage> {
        self.record(ApiCall::ListPosts(page))?;
        self.pages
            .lock()
            .get(&page)
            .cloned()
            .unwrap_or_else(|| Err(FeedError::Protocol(format!("No mock page {page} set"))))
    }

    fn create_post(&self, input: &PostInput) -> FeedResult<Post> {
        self.record(ApiCall::CreatePost(input.clone()))?;
        Self::scripted(&self.save_response, "save")
    }

    fn update_post(&self, id: &PostId, input: &PostInput) -> FeedResult<Post> {
        self.record(ApiCall::UpdatePost(id.clone(), input.clone()))?;
        Self::scripted(&self.save_response, "save")
    }

    fn delete_post(&self, id: &PostId) -> FeedResult<()> {
        self.record(ApiCall::DeletePost(id.clone()))?;
        self.delete_response.lock().clone().unwrap_or(Ok(()))
    }

    fn upload_image(
        &self,
        image: &ImageFile,
        previous: Option<&str>,
    ) -> FeedResult<Option<String>> {
        self.record(ApiCall::UploadImage {
            file_name: image.file_name.clone(),
            previous: previous.map(str::to_string),
        })?;
        Self::scripted(&self.upload_response, "upload")
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn close(&self) -> FeedResult<()> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_connection() {
        let api = MockFeedApi::new();
        assert!(api.is_connected());

        api.set_connected(false);
        assert!(!api.is_connected());
        assert!(matches!(api.get_status(), Err(FeedError::NotConnected)));

        api.set_connected(true);
        api.close().unwrap();
        assert!(!api.is_connected());
    }

    #[test]
    fn mock_records_calls() {
        let api = MockFeedApi::new();
        api.set_status_response(Ok("busy".into()));

        assert_eq!(api.get_status().unwrap(), "busy");
        assert_eq!(api.set_status("free").unwrap(), "free");
        assert!(api.list_posts(2).is_err());

        assert_eq!(
            api.calls(),
            vec![
                ApiCall::GetStatus,
                ApiCall::SetStatus("free".into()),
                ApiCall::ListPosts(2),
            ]
        );

        api.clear_calls();
        assert!(api.calls().is_empty());
    }

    #[test]
    fn borrowed_api_forwards() {
        let api = MockFeedApi::new();
        let borrowed = &api;
        assert_eq!(borrowed.set_status("x").unwrap(), "x");
        assert_eq!(api.calls(), vec![ApiCall::SetStatus("x".into())]);
    }

    #[test]
    fn mock_unset_save_is_error() {
        let api = MockFeedApi::new();
        let err = api.create_post(&PostInput::default()).unwrap_err();
        assert_eq!(err, FeedError::Protocol("No mock save response set".into()));
        assert!(api.delete_post(&PostId::new("x")).is_ok());
    }
}
