//! Pagination constants and page payloads.

use crate::post::Post;
use serde::{Deserialize, Serialize};

/// Number of posts the server places on one page.
pub const PAGE_SIZE: usize = 3;

/// One page of posts as returned by `getPosts`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsPage {
    /// Total number of posts across all pages.
    pub total_posts: u64,
    /// Posts on the requested page, in server order.
    pub posts: Vec<Post>,
}

impl PostsPage {
    /// Creates a page payload.
    pub fn new(total_posts: u64, posts: Vec<Post>) -> Self {
        Self { total_posts, posts }
    }

    /// An empty page that still reports the collection total.
    pub fn empty(total_posts: u64) -> Self {
        Self {
            total_posts,
            posts: Vec::new(),
        }
    }
}

/// Returns the last page number for `total` posts: `ceil(total / page_size)`.
///
/// A `page_size` of zero yields page 0.
pub fn last_page(total: u64, page_size: usize) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size as u64)
}
