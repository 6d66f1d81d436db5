//! Post listing and search.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::Post;
use crate::error::DomainError;
use crate::ports::{PostFilter, PostRepository};

/// Posts per listing page.
pub const PAGE_SIZE: u64 = 5;

/// One page of a post listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostPage {
    pub posts: Vec<Post>,
    /// 1-based page number that was asked for.
    pub page: u64,
    pub page_size: u64,
    /// Number of posts matching the filter across all pages.
    pub total: u64,
    pub total_pages: u64,
}

impl PostPage {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Row offset of a 1-based page, or `None` when the page holds nothing.
fn page_offset(page: u64, page_size: u64, total: u64) -> Option<u64> {
    let offset = page.checked_sub(1)?.checked_mul(page_size)?;
    (offset < total).then_some(offset)
}

fn page_count(total: u64, page_size: u64) -> u64 {
    total.div_ceil(page_size)
}

#[derive(Clone)]
pub struct PostListing {
    posts: Arc<dyn PostRepository>,
}

impl PostListing {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// List posts, optionally restricted to those whose title or content
    /// contains `query`. Pages past the end come back empty.
    pub async fn list_posts(&self, query: Option<&str>, page: u64) -> Result<PostPage, DomainError> {
        let filter = PostFilter::search(query);
        let total = self.posts.count(&filter).await?;

        let posts = match page_offset(page, PAGE_SIZE, total) {
            Some(offset) => self.posts.search(&filter, offset, PAGE_SIZE).await?,
            None => Vec::new(),
        };

        tracing::debug!(
            query = ?filter.query,
            page,
            total,
            returned = posts.len(),
            "Listed posts"
        );

        Ok(PostPage {
            posts,
            page,
            page_size: PAGE_SIZE,
            total,
            total_pages: page_count(total, PAGE_SIZE),
        })
    }
}
