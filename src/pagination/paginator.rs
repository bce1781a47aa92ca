//! Cursor-following aggregation over a `RetryingRequester`

use super::types::{NextPage, PaginationState};
use crate::error::{Error, Result};
use crate::http::{RetryingRequester, Transport};
use crate::types::{AggregatedResult, StringMap, CURSOR_FIELD};
use std::time::Duration;
use tracing::{debug, info};

/// Fetches every page behind a URL
#[derive(Debug)]
pub struct Paginator<'a, T> {
    requester: &'a RetryingRequester<T>,
}

impl<'a, T: Transport> Paginator<'a, T> {
    /// Create a paginator over a requester
    pub fn new(requester: &'a RetryingRequester<T>) -> Self {
        Self { requester }
    }

    /// Fetch all pages and concatenate their records in arrival order.
    ///
    /// Each follow-up request repeats `base_params` with `pagination_key` set
    /// to the previous page's cursor. A page that exhausts its retries turns
    /// into `Error::PageFetch`; the records gathered so far are discarded.
    pub async fn fetch_all(
        &self,
        url: &str,
        base_params: &StringMap,
        timeout: Duration,
    ) -> Result<AggregatedResult> {
        let mut params = base_params.clone();
        let mut state = PaginationState::new();
        let mut result = AggregatedResult::new();

        loop {
            let page_number = state.next_page_number();
            let page = self
                .requester
                .fetch(url, &params, timeout)
                .await
                .map_err(|e| page_error(url, page_number, e))?;

            let next = state.advance(&page);
            result.push_page(page.data);

            match next {
                NextPage::Continue { cursor } => {
                    debug!("{} page {} -> pagination_key={}", url, page_number, cursor);
                    params.insert(CURSOR_FIELD.to_string(), cursor);
                }
                NextPage::Done => break,
            }
        }

        info!(
            "Fetched {} pages, {} records from {}",
            state.page, state.total_fetched, url
        );
        Ok(result)
    }
}

/// Exhaustion is tagged with the failing page; caller errors pass through
fn page_error(url: &str, page: usize, error: Error) -> Error {
    if error.is_exhausted() {
        Error::PageFetch {
            endpoint: url.to_string(),
            page,
            source: Box::new(error),
        }
    } else {
        error
    }
}
