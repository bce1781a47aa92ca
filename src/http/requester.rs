//! Retrying requester
//!
//! Turns one logical GET into as many attempts as the retry budget allows:
//! - a fixed throttle sleep before every attempt
//! - `Retry-After` or exponential backoff with jitter on HTTP 429
//! - fixed backoff on network errors and other bad statuses
//! - `Error::RetriesExhausted` once the budget is spent

use super::retry::{uniform_jitter, AttemptOutcome, RetryDecision, RetryPolicy};
use super::transport::{RawResponse, RequestConfig, Transport, API_KEY_HEADER};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::types::{Page, StringMap};
use std::time::Duration;
use tracing::{debug, error, warn};

/// Longest body excerpt kept in an `HttpStatus` error
const MAX_ERROR_BODY: usize = 512;

/// Issues GETs through a `Transport`, retrying per a `RetryPolicy`
pub struct RetryingRequester<T> {
    transport: T,
    api_key: Option<String>,
    sleep: Duration,
    policy: RetryPolicy,
    jitter: fn() -> f64,
}

impl<T: Transport> RetryingRequester<T> {
    /// Create a requester from a client config
    pub fn new(transport: T, config: &ClientConfig) -> Self {
        Self {
            transport,
            api_key: config.api_key().map(str::to_string),
            sleep: config.sleep_interval(),
            policy: RetryPolicy::from_config(config),
            jitter: uniform_jitter,
        }
    }

    /// Replace the jitter source used for rate-limit backoff
    #[must_use]
    pub fn with_jitter(mut self, jitter: fn() -> f64) -> Self {
        self.jitter = jitter;
        self
    }

    /// Fetch one page.
    ///
    /// Fails fast with `Error::MissingApiKey` before any attempt. Every other
    /// failure is retried until the budget is spent, which yields
    /// `Error::RetriesExhausted`.
    pub async fn fetch(&self, url: &str, params: &StringMap, timeout: Duration) -> Result<Page> {
        let api_key = self.api_key.as_deref().ok_or(Error::MissingApiKey)?;
        let request = RequestConfig::new(url)
            .query_map(params)
            .header(API_KEY_HEADER, api_key)
            .timeout(timeout);

        let max_retries = self.policy.max_retries;
        let mut last_error = None;

        for attempt in 0..max_retries {
            if !self.sleep.is_zero() {
                tokio::time::sleep(self.sleep).await;
            }

            let outcome = match self.transport.get(&request).await {
                Ok(response) => match classify(response) {
                    Ok(page) => {
                        debug!(
                            "GET {} succeeded on attempt {}/{} ({} records)",
                            url,
                            attempt + 1,
                            max_retries,
                            page.len()
                        );
                        return Ok(page);
                    }
                    Err(outcome) => outcome,
                },
                Err(e) if e.is_retryable() => AttemptOutcome::Failed(e),
                Err(e) => return Err(e),
            };

            match self.policy.decide(attempt, &outcome, self.jitter) {
                RetryDecision::Retry { wait } => {
                    match &outcome {
                        AttemptOutcome::RateLimited { .. } => warn!(
                            "Rate limited (429). Retry in {:.1}s (attempt {}/{})",
                            wait.as_secs_f64(),
                            attempt + 1,
                            max_retries
                        ),
                        AttemptOutcome::Failed(e) => warn!(
                            "Request error: {}. Retry in {:.1}s (attempt {}/{})",
                            e,
                            wait.as_secs_f64(),
                            attempt + 1,
                            max_retries
                        ),
                    }
                    tokio::time::sleep(wait).await;
                    last_error = Some(outcome.into_error());
                }
                RetryDecision::GiveUp => {
                    last_error = Some(outcome.into_error());
                    break;
                }
            }
        }

        let last_error = last_error.map_or_else(
            || "no attempts allowed".to_string(),
            |e| e.to_string(),
        );
        error!(
            "Request to {} failed after {} attempts: {}",
            url, max_retries, last_error
        );
        Err(Error::RetriesExhausted {
            attempts: max_retries,
            last_error,
        })
    }
}

impl<T> std::fmt::Debug for RetryingRequester<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryingRequester")
            .field("has_api_key", &self.api_key.is_some())
            .field("sleep", &self.sleep)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Sort a response into a page or a failed outcome
fn classify(response: RawResponse) -> std::result::Result<Page, AttemptOutcome> {
    if response.is_rate_limited() {
        return Err(AttemptOutcome::RateLimited {
            retry_after: response.retry_after,
        });
    }

    if !response.is_success() {
        let mut body = response.body;
        if body.len() > MAX_ERROR_BODY {
            let cut = (0..=MAX_ERROR_BODY)
                .rev()
                .find(|&i| body.is_char_boundary(i))
                .unwrap_or(0);
            body.truncate(cut);
        }
        return Err(AttemptOutcome::Failed(Error::http_status(
            response.status,
            body,
        )));
    }

    Page::from_body(&response.body).map_err(AttemptOutcome::Failed)
}
