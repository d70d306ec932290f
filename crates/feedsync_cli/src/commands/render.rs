//! Output rendering.

use clap::ValueEnum;
use feedsync_engine::{FeedView, Post};
use std::io::{self, Write};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Writes the whole feed view.
pub fn view<W: Write>(out: &mut W, view: &FeedView, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, view)?;
            writeln!(out)
        }
        OutputFormat::Text => {
            writeln!(out, "Status: {}", view.status)?;
            writeln!(
                out,
                "Page {} of {} ({} posts)",
                view.current_page, view.last_page, view.total_posts
            )?;
            if view.is_loading {
                writeln!(out, "Loading...")?;
            } else if view.posts.is_empty() {
                writeln!(out, "No posts found.")?;
            }
            for post in &view.posts {
                post_text(out, post)?;
            }
            if let Some(error) = &view.error {
                writeln!(out, "Error: {} ({})", error.message, error.detail)?;
            }
            Ok(())
        }
    }
}

/// Writes a single post.
pub fn post<W: Write>(out: &mut W, post: &Post, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, post)?;
            writeln!(out)
        }
        OutputFormat::Text => post_text(out, post),
    }
}

/// Writes the user status.
pub fn status<W: Write>(out: &mut W, status: &str, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, &serde_json::json!({ "status": status }))?;
            writeln!(out)
        }
        OutputFormat::Text => writeln!(out, "Status: {status}"),
    }
}

fn post_text<W: Write>(out: &mut W, post: &Post) -> io::Result<()> {
    writeln!(out, "[{}] {}", post.id, post.title)?;
    writeln!(
        out,
        "    Posted by {} on {}",
        post.creator_name(),
        post.display_date()
    )?;
    writeln!(out, "    {}", post.content)?;
    if !post.image_url.is_empty() {
        writeln!(out, "    Image: {}", post.image_url)?;
    }
    Ok(())
}
