//! Presentation-layer intents.

use crate::transport::ImageFile;
use feedsync_protocol::PostId;

/// Page navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// One page forward.
    Next,
    /// One page back.
    Previous,
}

impl Direction {
    /// Page number delta.
    pub fn offset(&self) -> i64 {
        match self {
            Direction::Next => 1,
            Direction::Previous => -1,
        }
    }
}

/// The fields submitted from the post editor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostDraft {
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Newly selected image, if any.
    pub image: Option<ImageFile>,
}

impl PostDraft {
    /// Creates a draft without an image.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            image: None,
        }
    }

    /// Attaches an image to upload on submit.
    pub fn with_image(mut self, image: ImageFile) -> Self {
        self.image = Some(image);
        self
    }
}

/// Everything the presentation layer can ask the synchronizer to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Go to the next page.
    LoadNext,
    /// Go to the previous page.
    LoadPrevious,
    /// Open the editor for a new post.
    NewPost,
    /// Open the editor on an existing post.
    StartEdit(PostId),
    /// Close the editor.
    CancelEdit,
    /// Submit the editor.
    SubmitEdit(PostDraft),
    /// Delete a post.
    DeletePost(PostId),
    /// Status input changed (local only).
    StatusInput(String),
    /// Submit a new status.
    UpdateStatus(String),
    /// Dismiss the current error.
    DismissError,
}
