//! One-shot feed commands.

use super::render::{self, OutputFormat};
use super::ensure_ok;
use feedsync_engine::{FeedApi, FeedSynchronizer, ImageFile, PostDraft, PostId};
use std::error::Error;
use std::io::Write;
use tracing::info;

/// Fields given on the command line for `new` and `edit`.
#[derive(Debug, Clone, Default)]
pub struct PostFields {
    /// New title.
    pub title: Option<String>,
    /// New content.
    pub content: Option<String>,
    /// Image to upload.
    pub image: Option<ImageFile>,
}

/// Prints the status, or sets it when `new_status` is given.
pub fn status<A: FeedApi, W: Write>(
    api: A,
    new_status: Option<String>,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let mut sync = FeedSynchronizer::new(api);
    match new_status {
        Some(value) => sync.update_status(&value),
        None => sync.initialize(),
    }
    ensure_ok(&sync)?;
    render::status(out, sync.status(), format)?;
    Ok(())
}

/// Prints one page of the feed.
pub fn list<A: FeedApi, W: Write>(
    api: A,
    page: i64,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let mut sync = FeedSynchronizer::new(api).with_page(page);
    sync.initialize();
    ensure_ok(&sync)?;
    render::view(out, &sync.view(), format)?;
    Ok(())
}

/// Creates a post and prints it.
pub fn create<A: FeedApi, W: Write>(
    api: A,
    fields: PostFields,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let title = fields.title.ok_or("a title is required")?;
    let content = fields.content.ok_or("content is required")?;
    let mut draft = PostDraft::new(title, content);
    draft.image = fields.image;

    let mut sync = FeedSynchronizer::new(api);
    sync.begin_create();
    sync.submit_edit(draft);
    ensure_ok(&sync)?;

    let created = sync.posts().first().ok_or("server returned no post")?;
    info!(post = %created.id, "created post");
    render::post(out, created, format)?;
    Ok(())
}

/// Edits a post found on `page`. Omitted fields keep their current value.
pub fn edit<A: FeedApi, W: Write>(
    api: A,
    page: i64,
    id: &PostId,
    fields: PostFields,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let mut sync = FeedSynchronizer::new(api).with_page(page);
    sync.initialize();
    ensure_ok(&sync)?;

    if !sync.begin_edit(id) {
        return Err(format!("post {id} is not on page {page}").into());
    }
    let current = sync
        .edit_mode()
        .draft()
        .cloned()
        .ok_or("editor did not open")?;

    let mut draft = PostDraft::new(
        fields.title.unwrap_or(current.title),
        fields.content.unwrap_or(current.content),
    );
    draft.image = fields.image;
    sync.submit_edit(draft);
    ensure_ok(&sync)?;

    let edited = sync
        .posts()
        .iter()
        .find(|post| &post.id == id)
        .ok_or("edited post left the page")?;
    render::post(out, edited, format)?;
    Ok(())
}

/// Deletes a post found on `page` and prints the refreshed page.
pub fn delete<A: FeedApi, W: Write>(
    api: A,
    page: i64,
    id: &PostId,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let mut sync = FeedSynchronizer::new(api).with_page(page);
    sync.initialize();
    ensure_ok(&sync)?;

    sync.delete_post(id);
    ensure_ok(&sync)?;
    info!(post = %id, "deleted post");
    render::view(out, &sync.view(), format)?;
    Ok(())
}
