//! Scripted transport for tests that must not touch the network

use super::transport::{RawResponse, RequestConfig, Transport};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

/// Replays queued responses in order and records every request.
///
/// Once the script runs dry every call fails with a connection error.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    script: Arc<Mutex<VecDeque<Result<RawResponse>>>>,
    requests: Arc<Mutex<Vec<(Instant, RequestConfig)>>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, response: Result<RawResponse>) -> &Self {
        self.script.lock().unwrap().push_back(response);
        self
    }

    pub(crate) fn push_json(&self, body: Value) -> &Self {
        self.push(Ok(RawResponse::new(200, body.to_string())))
    }

    pub(crate) fn push_status(&self, status: u16) -> &Self {
        self.push(Ok(RawResponse::new(status, "")))
    }

    pub(crate) fn push_connection_errors(&self, count: usize) -> &Self {
        for _ in 0..count {
            self.push(Err(Error::connection("connection refused")));
        }
        self
    }

    pub(crate) fn requests(&self) -> Vec<RequestConfig> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, r)| r.clone())
            .collect()
    }

    pub(crate) fn request_times(&self) -> Vec<Instant> {
        self.requests.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, request: &RequestConfig) -> Result<RawResponse> {
        self.requests
            .lock()
            .unwrap()
            .push((Instant::now(), request.clone()));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::connection("script exhausted")))
    }
}
