//! Financial statement summaries endpoint

use super::JQuantsClient;
use crate::dates::{compact_date, non_blank};
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::pagination::Paginator;
use crate::types::{Record, StringMap};
use tracing::info;

/// Path of the statements endpoint
pub const STATEMENTS_PATH: &str = "fins/summary";

impl<T: Transport> JQuantsClient<T> {
    /// Fetch statement summaries by code, by disclosure date, or both.
    ///
    /// At least one of `code` and `date` is required; blank strings count as
    /// missing. Fails if any page cannot be fetched.
    pub async fn fetch_statements(
        &self,
        code: Option<&str>,
        date: Option<&str>,
    ) -> Result<Vec<Record>> {
        let code = non_blank(code);
        let date = non_blank(date);

        if code.is_none() && date.is_none() {
            return Err(Error::validation("Either code or date must be provided"));
        }

        let mut params = StringMap::new();
        if let Some(code) = code {
            params.insert("code".to_string(), code.to_string());
        }
        if let Some(date) = date {
            params.insert("date".to_string(), compact_date(date)?);
        }

        info!(
            "fetch_statements code={:?} date={:?} sleep={:.1}s",
            code,
            params.get("date"),
            self.config.sleep_sec
        );

        let url = self.config.endpoint(STATEMENTS_PATH);
        let result = Paginator::new(&self.requester)
            .fetch_all(&url, &params, self.config.page_timeout())
            .await?;

        info!(
            "fetch_statements fetched {} pages, {} records",
            result.pages,
            result.len()
        );
        Ok(result.into_records())
    }
}
