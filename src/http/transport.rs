//! HTTP transport
//!
//! A `Transport` performs exactly one GET and reports what came back. It never
//! retries or sleeps; that belongs to the requester. `ReqwestTransport` is the
//! production implementation.

use crate::error::{Error, Result};
use crate::types::StringMap;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Absolute URL
    pub url: String,
    /// Query parameters
    pub query: StringMap,
    /// Request headers
    pub headers: StringMap,
    /// Timeout for this request
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Replace all query parameters
    #[must_use]
    pub fn query_map(mut self, params: &StringMap) -> Self {
        self.query.clone_from(params);
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// What the server answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw `Retry-After` header value
    pub retry_after: Option<String>,
    /// Response body
    pub body: String,
}

impl RawResponse {
    /// Create a response with a body and no headers
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            retry_after: None,
            body: body.into(),
        }
    }

    /// Set the `Retry-After` header
    #[must_use]
    pub fn with_retry_after(mut self, value: impl Into<String>) -> Self {
        self.retry_after = Some(value.into());
        self
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// HTTP 429
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }
}

/// Performs one HTTP GET
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the response, whatever its status.
    ///
    /// Errors are reserved for failures below HTTP: connection, timeout,
    /// body read.
    async fn get(&self, request: &RequestConfig) -> Result<RawResponse>;
}

/// `Transport` backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport with the crate's user agent
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("jquants-client/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client))
    }

    /// Wrap an existing reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, request: &RequestConfig) -> Result<RawResponse> {
        let mut req = self.client.get(&request.url);

        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if !request.query.is_empty() {
            req = req.query(&request.query);
        }

        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        let response = req
            .send()
            .await
            .map_err(|e| classify(e, request.timeout))?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| classify(e, request.timeout))?;

        debug!("GET {} -> {}", request.url, status);
        let raw = RawResponse::new(status, body);
        Ok(match retry_after {
            Some(value) => raw.with_retry_after(value),
            None => raw,
        })
    }
}

fn classify(error: reqwest::Error, timeout: Option<Duration>) -> Error {
    if error.is_timeout() {
        return Error::Timeout {
            timeout_ms: timeout.map_or(0, |t| t.as_millis() as u64),
        };
    }
    if error.is_connect() {
        return Error::connection(error.to_string());
    }
    Error::Http(error)
}
