//! Feed synchronizer state machine.

use crate::error::{ErrorNotice, FeedError, FeedResult, Operation};
use crate::intent::{Direction, Intent, PostDraft};
use crate::transport::FeedApi;
use feedsync_protocol::{last_page, Post, PostId, PostInput};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Edit mode of the post editor.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditMode {
    /// Editor closed.
    #[default]
    Idle,
    /// Editor open. `draft` is a copy of the post being edited, or `None`
    /// when composing a new post.
    Composing {
        /// Copy of the edited post.
        draft: Option<Post>,
    },
}

impl EditMode {
    /// Returns true while the editor is open.
    pub fn is_composing(&self) -> bool {
        matches!(self, EditMode::Composing { .. })
    }

    /// The post being edited, if any.
    pub fn draft(&self) -> Option<&Post> {
        match self {
            EditMode::Composing { draft } => draft.as_ref(),
            EditMode::Idle => None,
        }
    }
}

/// Snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedView {
    /// Posts on the current page.
    pub posts: Vec<Post>,
    /// Total posts on the server.
    pub total_posts: u64,
    /// Current page (1-based, unclamped).
    pub current_page: i64,
    /// `ceil(total_posts / page_size)`.
    pub last_page: u64,
    /// Posts are being loaded.
    pub is_loading: bool,
    /// Editor is open.
    pub editing: bool,
    /// Post being edited.
    pub edit_draft: Option<Post>,
    /// A submit is in flight.
    pub edit_loading: bool,
    /// User status.
    pub status: String,
    /// Current error notice.
    pub error: Option<ErrorNotice>,
}

type Listener = Box<dyn FnMut(&FeedView) + Send>;

/// Keeps one page of posts and the user status consistent with a
/// [`FeedApi`].
///
/// Every operation runs to completion before returning, so local state is
/// never observed half-updated. Failures never escape: they are stored as
/// the current [`ErrorNotice`].
pub struct FeedSynchronizer<A: FeedApi> {
    api: A,
    page_size: usize,
    posts: Vec<Post>,
    total_posts: u64,
    current_page: i64,
    posts_loading: bool,
    status: String,
    edit_mode: EditMode,
    edit_loading: bool,
    error: Option<ErrorNotice>,
    listener: Option<Listener>,
}

impl<A: FeedApi> FeedSynchronizer<A> {
    /// Creates a synchronizer on page 1 with posts marked as loading.
    ///
    /// The page size is taken from the API.
    pub fn new(api: A) -> Self {
        Self {
            page_size: api.page_size(),
            api,
            posts: Vec::new(),
            total_posts: 0,
            current_page: 1,
            posts_loading: true,
            status: String::new(),
            edit_mode: EditMode::Idle,
            edit_loading: false,
            error: None,
            listener: None,
        }
    }

    /// Overrides the page size used for truncation and page counts.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Starts on `page` instead of page 1.
    pub fn with_page(mut self, page: i64) -> Self {
        self.current_page = page;
        self
    }

    /// Registers a callback invoked with a fresh view after every change.
    pub fn set_listener(&mut self, listener: impl FnMut(&FeedView) + Send + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Returns the underlying API.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Posts on the current page.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Total posts reported by the server.
    pub fn total_posts(&self) -> u64 {
        self.total_posts
    }

    /// Current page number.
    pub fn current_page(&self) -> i64 {
        self.current_page
    }

    /// Last page number derived from the total.
    pub fn last_page(&self) -> u64 {
        last_page(self.total_posts, self.page_size)
    }

    /// Whether posts are loading.
    pub fn is_loading(&self) -> bool {
        self.posts_loading
    }

    /// Cached user status.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Editor state.
    pub fn edit_mode(&self) -> &EditMode {
        &self.edit_mode
    }

    /// Whether a submit is in flight.
    pub fn edit_loading(&self) -> bool {
        self.edit_loading
    }

    /// Current error notice.
    pub fn error(&self) -> Option<&ErrorNotice> {
        self.error.as_ref()
    }

    /// Builds the presentation snapshot.
    pub fn view(&self) -> FeedView {
        FeedView {
            posts: self.posts.clone(),
            total_posts: self.total_posts,
            current_page: self.current_page,
            last_page: self.last_page(),
            is_loading: self.posts_loading,
            editing: self.edit_mode.is_composing(),
            edit_draft: self.edit_mode.draft().cloned(),
            edit_loading: self.edit_loading,
            status: self.status.clone(),
            error: self.error.clone(),
        }
    }

    /// Fetches the user status, then loads the current page.
    pub fn initialize(&mut self) {
        info!(page = self.current_page, "initializing feed");
        match self.api.get_status() {
            Ok(status) => self.status = status,
            Err(e) => self.surface(Operation::FetchStatus, e),
        }
        self.notify();
        self.load_page(None);
    }

    /// Loads a page.
    ///
    /// `None` reloads the current page and keeps the displayed posts until
    /// the response arrives. A direction moves the page number by one and
    /// clears the displayed posts first. Page numbers are not clamped, but
    /// a move past the `i64` range is reported as a load failure and no
    /// request is sent.
    pub fn load_page(&mut self, direction: Option<Direction>) {
        if let Some(direction) = direction {
            let Some(page) = self.current_page.checked_add(direction.offset()) else {
                self.surface(
                    Operation::LoadPosts,
                    FeedError::Protocol(format!(
                        "cannot move {direction:?} from page {}",
                        self.current_page
                    )),
                );
                self.notify();
                return;
            };
            self.current_page = page;
            self.posts.clear();
        }
        self.posts_loading = true;
        self.notify();

        let page = self.current_page;
        debug!(page, "loading posts");
        match self.api.list_posts(page) {
            Ok(loaded) => {
                debug!(page, count = loaded.posts.len(), total = loaded.total_posts, "posts loaded");
                self.posts = loaded.posts;
                self.total_posts = loaded.total_posts;
            }
            Err(e) => self.surface(Operation::LoadPosts, e),
        }
        self.posts_loading = false;
        self.notify();
    }

    /// Local status edit from the input field. No network call.
    pub fn set_status_input(&mut self, value: impl Into<String>) {
        self.status = value.into();
        self.notify();
    }

    /// Sends a new status. On success the server's echo replaces the local
    /// value; on failure the locally typed value stays.
    pub fn update_status(&mut self, new_status: &str) {
        self.status = new_status.to_string();
        self.notify();

        match self.api.set_status(new_status) {
            Ok(echo) => {
                info!(status = %echo, "status updated");
                self.status = echo;
            }
            Err(e) => self.surface(Operation::UpdateStatus, e),
        }
        self.notify();
    }

    /// Opens the editor for a new post.
    pub fn begin_create(&mut self) {
        self.edit_mode = EditMode::Composing { draft: None };
        self.notify();
    }

    /// Opens the editor on a copy of the post with `id`.
    ///
    /// Returns false and leaves all state untouched if the post is not on
    /// the current page.
    pub fn begin_edit(&mut self, id: &PostId) -> bool {
        let Some(post) = self.posts.iter().find(|p| &p.id == id).cloned() else {
            debug!(%id, "edit requested for post not on this page");
            return false;
        };
        self.edit_mode = EditMode::Composing { draft: Some(post) };
        self.notify();
        true
    }

    /// Closes the editor and drops the draft.
    pub fn cancel_edit(&mut self) {
        self.edit_mode = EditMode::Idle;
        self.notify();
    }

    /// Saves the editor contents.
    ///
    /// Updates the edited post in place, or prepends a created post and
    /// drops the last one when the page is already full. The total count
    /// is left as is on create. The editor is closed whatever the outcome.
    pub fn submit_edit(&mut self, draft: PostDraft) {
        self.edit_loading = true;
        self.notify();

        let editing = self.edit_mode.draft().cloned();
        match self.save_post(editing.as_ref(), draft) {
            Ok(saved) => match editing {
                Some(original) => self.replace_post(&original.id, saved),
                None => self.prepend_post(saved),
            },
            Err(e) => self.surface(Operation::SavePost, e),
        }

        self.edit_mode = EditMode::Idle;
        self.edit_loading = false;
        self.notify();
    }

    /// Deletes a post and re-fetches the current page.
    pub fn delete_post(&mut self, id: &PostId) {
        self.posts_loading = true;
        self.notify();

        match self.api.delete_post(id) {
            Ok(()) => {
                info!(%id, "post deleted");
                self.load_page(None);
            }
            Err(e) => {
                self.posts_loading = false;
                self.surface(Operation::DeletePost, e);
                self.notify();
            }
        }
    }

    /// Clears the current error. Nothing is retried.
    pub fn dismiss_error(&mut self) {
        self.error = None;
        self.notify();
    }

    /// Routes a presentation intent to its operation.
    pub fn dispatch(&mut self, intent: Intent) {
        match intent {
            Intent::LoadNext => self.load_page(Some(Direction::Next)),
            Intent::LoadPrevious => self.load_page(Some(Direction::Previous)),
            Intent::NewPost => self.begin_create(),
            Intent::StartEdit(id) => {
                self.begin_edit(&id);
            }
            Intent::CancelEdit => self.cancel_edit(),
            Intent::SubmitEdit(draft) => self.submit_edit(draft),
            Intent::DeletePost(id) => self.delete_post(&id),
            Intent::StatusInput(value) => self.set_status_input(value),
            Intent::UpdateStatus(value) => self.update_status(&value),
            Intent::DismissError => self.dismiss_error(),
        }
    }

    /// Uploads the image if one was picked, then creates or updates.
    fn save_post(&self, editing: Option<&Post>, draft: PostDraft) -> FeedResult<Post> {
        let image_url = match &draft.image {
            Some(image) => self
                .api
                .upload_image(image, editing.map(|p| p.image_url.as_str()))?
                .unwrap_or_default(),
            None => editing.map(|p| p.image_url.clone()).unwrap_or_default(),
        };

        let input = PostInput::new(draft.title, draft.content, image_url);
        match editing {
            Some(post) => self.api.update_post(&post.id, &input),
            None => self.api.create_post(&input),
        }
    }

    fn replace_post(&mut self, id: &PostId, saved: Post) {
        match self.posts.iter_mut().find(|p| &p.id == id) {
            Some(slot) => *slot = saved,
            None => warn!(%id, "updated post is no longer on this page"),
        }
    }

    fn prepend_post(&mut self, saved: Post) {
        if self.posts.len() >= self.page_size {
            self.posts.pop();
        }
        self.posts.insert(0, saved);
    }

    fn surface(&mut self, operation: Operation, error: FeedError) {
        warn!(?operation, %error, "feed operation failed");
        self.error = Some(ErrorNotice::new(operation, error));
    }

    fn notify(&mut self) {
        if self.listener.is_none() {
            return;
        }
        let view = self.view();
        if let Some(listener) = self.listener.as_mut() {
            listener(&view);
        }
    }
}
