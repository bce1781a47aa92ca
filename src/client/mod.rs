//! J-Quants client
//!
//! `JQuantsClient` shapes the parameters of each endpoint and unwraps what
//! the request layer returns:
//! - `fetch_master_record` - one security from the equities master (cached)
//! - `fetch_all_master_records` - the whole equities master, all pages
//! - `fetch_statements` - financial statement summaries, all pages
//!
//! A client issues its requests one at a time. Share it between tasks only
//! if they take turns; the throttle assumes sequential calls.

mod master;
mod statements;

pub use master::MASTER_PATH;
pub use statements::STATEMENTS_PATH;

use crate::cache::{CacheStats, LruCache};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{ReqwestTransport, RetryingRequester, Transport};
use crate::types::Record;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Cache key of a single master lookup: code and compact date
type MasterKey = (String, String);

/// Typed client for the J-Quants API
pub struct JQuantsClient<T = ReqwestTransport> {
    config: ClientConfig,
    requester: RetryingRequester<T>,
    master_cache: Mutex<LruCache<MasterKey, Option<Record>>>,
}

impl JQuantsClient<ReqwestTransport> {
    /// Create a client that talks HTTP through reqwest
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new()?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create a client from defaults overlaid with the environment
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }
}

impl<T: Transport> JQuantsClient<T> {
    /// Create a client over any transport
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let requester = RetryingRequester::new(transport, &config);
        let master_cache = Mutex::new(LruCache::new(config.cache_capacity));
        Self {
            config,
            requester,
            master_cache,
        }
    }

    /// Number of cached master lookups
    pub fn cached_lookups(&self) -> usize {
        self.master_cache().len()
    }

    /// Hit/miss/eviction counters of the master lookup cache
    pub fn cache_stats(&self) -> CacheStats {
        self.master_cache().stats()
    }

    /// Forget every cached master lookup
    pub fn clear_cache(&self) {
        self.master_cache().clear();
    }

    fn master_cache(&self) -> MutexGuard<'_, LruCache<MasterKey, Option<Record>>> {
        // A panic mid-update cannot leave the cache inconsistent, so a poisoned
        // lock is still usable.
        self.master_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> std::fmt::Debug for JQuantsClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JQuantsClient")
            .field("config", &self.config)
            .field("requester", &self.requester)
            .finish_non_exhaustive()
    }
}
