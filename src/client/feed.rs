//! Displayed blog list and its pagination.

use super::filter::FilterState;
use crate::models::{Blog, Pagination};

/// One page as decoded from the listing endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogPage {
    pub blogs: Vec<Blog>,
    pub pagination: Pagination,
}

/// How a fetched page is merged into the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Fresh fetch: the page becomes the whole list.
    Replace,
    /// Load-more: the page is added after the current list.
    Append,
}

/// What the feed screen should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedView {
    Loading,
    /// Offer a retry.
    Error { message: String },
    /// Valid but empty page; `offer_reset` when filters narrowed it.
    Empty { offer_reset: bool },
    Items,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogFeed {
    pub blogs: Vec<Blog>,
    pub pagination: Pagination,
    pub loading: bool,
    pub error: Option<String>,
}

impl BlogFeed {
    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Merge a completed fetch. Whatever completes last overwrites the pagination.
    pub fn apply(&mut self, page: BlogPage, mode: LoadMode) {
        match mode {
            LoadMode::Replace => self.blogs = page.blogs,
            LoadMode::Append => self.blogs.extend(page.blogs),
        }
        self.pagination = page.pagination;
        self.loading = false;
        self.error = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    /// Page to request for load-more, if there is one.
    pub fn next_page(&self) -> Option<u32> {
        self.pagination
            .has_next
            .then(|| self.pagination.current_page + 1)
    }

    pub fn view(&self, filters: &FilterState) -> FeedView {
        if let Some(message) = &self.error {
            return FeedView::Error {
                message: message.clone(),
            };
        }
        if self.loading && self.blogs.is_empty() {
            return FeedView::Loading;
        }
        if self.blogs.is_empty() {
            return FeedView::Empty {
                offer_reset: filters.has_active_filters(),
            };
        }
        FeedView::Items
    }
}
