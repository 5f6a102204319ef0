//! In-memory transport for tests

use crate::transport::{ApiRequest, ApiResponse, StoryTransport};
use crate::StoryError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

type Handler = dyn Fn(&ApiRequest) -> Result<ApiResponse, StoryError> + Send + Sync;

/// Mock transport that answers from a handler or a canned sequence
///
/// Every request is recorded so tests can assert on what was sent.
///
/// # Examples
///
/// ```
/// use mintmatrix_story::{ApiResponse, MockTransport};
/// use serde_json::json;
///
/// let transport = MockTransport::sequence(vec![Ok(ApiResponse::ok(json!({"data": []})))]);
/// assert_eq!(transport.call_count(), 0);
/// ```
#[derive(Clone)]
pub struct MockTransport {
    handler: Option<Arc<Handler>>,
    queue: Arc<Mutex<VecDeque<Result<ApiResponse, StoryError>>>>,
    calls: Arc<Mutex<Vec<ApiRequest>>>,
}

impl MockTransport {
    /// Answer every request with `handler`
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&ApiRequest) -> Result<ApiResponse, StoryError> + Send + Sync + 'static,
    {
        Self {
            handler: Some(Arc::new(handler)),
            queue: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer requests with `responses` in order; a 500 once they run out
    pub fn sequence(responses: Vec<Result<ApiResponse, StoryError>>) -> Self {
        Self {
            handler: None,
            queue: Arc::new(Mutex::new(responses.into())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer every request with the same status and null body
    pub fn always_status(status: u16) -> Self {
        Self::new(move |_| Ok(ApiResponse::status(status)))
    }

    /// Requests received so far
    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of requests received
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

#[async_trait]
impl StoryTransport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, StoryError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }
        if let Some(handler) = &self.handler {
            return handler(request);
        }
        self.queue
            .lock()
            .ok()
            .and_then(|mut q| q.pop_front())
            .unwrap_or_else(|| Ok(ApiResponse::status(500)))
    }
}
