//! HTTP module
//!
//! Provides the retrying request layer the endpoint adapters are built on.
//!
//! # Features
//!
//! - **Transport Seam**: `Transport` trait with a reqwest implementation
//! - **Throttling**: Fixed sleep before every attempt
//! - **Rate Limits**: `Retry-After` or exponential backoff with jitter on 429
//! - **Retry Budget**: One bounded attempt count shared by all failure kinds

mod requester;
mod retry;
mod transport;

pub use requester::RetryingRequester;
pub use retry::{parse_retry_after, uniform_jitter, AttemptOutcome, RetryDecision, RetryPolicy};
pub use transport::{RawResponse, ReqwestTransport, RequestConfig, Transport, API_KEY_HEADER};

#[cfg(test)]
pub(crate) mod testing;
