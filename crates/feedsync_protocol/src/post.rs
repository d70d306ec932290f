//! Post records.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, server-assigned post identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    /// Wraps a server-assigned id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The author of a post, as the feed exposes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    /// Display name.
    pub name: String,
}

/// A single feed post.
///
/// Field names follow the server's JSON shape (`_id`, `imageUrl`,
/// `createdAt`), so the same struct decodes listing and mutation replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Server-assigned identity. Never changes.
    #[serde(rename = "_id")]
    pub id: PostId,
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Server path of the attached image (may be empty).
    #[serde(rename = "imageUrl", default)]
    pub image_url: String,
    /// Author.
    pub creator: Creator,
    /// Creation timestamp.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Returns the author's display name.
    pub fn creator_name(&self) -> &str {
        &self.creator.name
    }

    /// Renders the creation date as `M/D/YYYY` in the local time zone.
    pub fn display_date(&self) -> String {
        self.display_date_in(&Local)
    }

    /// Renders the creation date as `M/D/YYYY` in `zone`.
    pub fn display_date_in<Tz>(&self, zone: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        self.created_at
            .with_timezone(zone)
            .format("%-m/%-d/%Y")
            .to_string()
    }
}

/// Editable fields sent with create and update mutations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostInput {
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Image path as returned by the upload endpoint, unescaped.
    pub image_url: String,
}

impl PostInput {
    /// Creates a new post input.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            image_url: image_url.into(),
        }
    }
}
