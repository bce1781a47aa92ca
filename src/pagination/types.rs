//! Pagination types
//!
//! Cursor bookkeeping for one paginated fetch.

use crate::types::Page;

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available behind this cursor
    Continue {
        /// Value to send as `pagination_key`
        cursor: String,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Create a continuation
    pub fn with_cursor(cursor: impl Into<String>) -> Self {
        Self::Continue {
            cursor: cursor.into(),
        }
    }
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Pages processed so far
    pub page: usize,
    /// Total records fetched so far
    pub total_fetched: u64,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// 1-based number of the page about to be requested
    pub fn next_page_number(&self) -> usize {
        self.page + 1
    }

    /// Record a page and work out what follows it
    pub fn advance(&mut self, page: &Page) -> NextPage {
        self.page += 1;
        self.total_fetched += page.len() as u64;

        match &page.pagination_key {
            Some(cursor) => NextPage::with_cursor(cursor.clone()),
            None => NextPage::Done,
        }
    }
}
