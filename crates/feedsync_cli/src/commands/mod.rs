//! CLI command implementations.

pub mod browse;
pub mod feed;
pub mod render;

use feedsync_engine::{FeedApi, FeedSynchronizer, ImageFile};
use std::error::Error;
use std::path::Path;

/// Turns the synchronizer's error notice into a command failure.
pub fn ensure_ok<A: FeedApi>(sync: &FeedSynchronizer<A>) -> Result<(), Box<dyn Error>> {
    match sync.error() {
        Some(notice) => Err(format!("{} ({})", notice.message, notice.detail).into()),
        None => Ok(()),
    }
}

/// Reads an image file for upload.
pub fn load_image(path: &Path) -> Result<ImageFile, Box<dyn Error>> {
    let bytes = std::fs::read(path).map_err(|e| format!("cannot read {:?}: {e}", path))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| format!("not a file path: {:?}", path))?;
    Ok(ImageFile::new(file_name, content_type(path), bytes))
}

fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
