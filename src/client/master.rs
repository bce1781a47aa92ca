//! Equities master endpoint

use super::JQuantsClient;
use crate::dates::resolve_master_date;
use crate::error::Result;
use crate::http::Transport;
use crate::pagination::Paginator;
use crate::types::{Record, StringMap};
use tracing::{debug, info, warn};

/// Path of the equities master endpoint
pub const MASTER_PATH: &str = "equities/master";

impl<T: Transport> JQuantsClient<T> {
    /// Look up one security in the equities master.
    ///
    /// Returns the first record of the response, or `None` when the code is
    /// empty, the server has no match, or every retry failed. Answers are
    /// cached per code and resolved date; failed lookups are not.
    pub async fn fetch_master_record(&self, code: &str, date: Option<&str>) -> Result<Option<Record>> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(None);
        }

        let date = resolve_master_date(self.config.master_date_override.as_deref(), date)?;
        let key = (code.to_string(), date.clone());

        let cached = self.master_cache().get(&key).cloned();
        if let Some(cached) = cached {
            debug!("equities master cache hit: code={} date={}", code, date);
            return Ok(cached);
        }

        let mut params = StringMap::new();
        params.insert("code".to_string(), code.to_string());
        params.insert("date".to_string(), date);

        let url = self.config.endpoint(MASTER_PATH);
        let page = match self
            .requester
            .fetch(&url, &params, self.config.lookup_timeout())
            .await
        {
            Ok(page) => page,
            Err(e) if e.is_exhausted() => {
                warn!("equities master lookup for {} gave up: {}", code, e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let record = page.data.into_iter().next();
        let mut cache = self.master_cache();
        if let Some(((old_code, old_date), _)) = cache.insert(key, record.clone()) {
            debug!(
                "equities master cache full ({}), evicted code={} date={}",
                cache.capacity(),
                old_code,
                old_date
            );
        }
        Ok(record)
    }

    /// Fetch the whole equities master for a date, following every page.
    ///
    /// Fails if any page cannot be fetched; never returns a partial list.
    pub async fn fetch_all_master_records(&self, date: Option<&str>) -> Result<Vec<Record>> {
        let date = resolve_master_date(self.config.master_date_override.as_deref(), date)?;

        let mut params = StringMap::new();
        params.insert("date".to_string(), date.clone());

        let url = self.config.endpoint(MASTER_PATH);
        let result = Paginator::new(&self.requester)
            .fetch_all(&url, &params, self.config.page_timeout())
            .await?;

        info!(
            "fetch_all_master_records date={} fetched {} records",
            date,
            result.len()
        );
        Ok(result.into_records())
    }
}
